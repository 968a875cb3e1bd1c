use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::hierarchy::{CityAggregate, Hierarchy};

pub const DEFAULT_LIMIT: usize = 6;

/// How sibling cities are ranked on a city page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NearbyStrategy {
    /// Most stores first.
    #[default]
    Count,
    /// Closest first, by planar distance between city coordinates.
    Distance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityRef {
    pub name: String,
    pub slug: String,
    pub store_count: usize,
}

impl From<&CityAggregate> for CityRef {
    fn from(c: &CityAggregate) -> Self {
        CityRef {
            name: c.name.clone(),
            slug: c.slug.clone(),
            store_count: c.store_count,
        }
    }
}

/// Up to `limit` other cities in the same state as `city_slug`.
///
/// Unknown state or city gives an empty list. Distance ranking falls back to
/// count ranking when the data has no usable coordinates.
pub fn find_nearby(
    hierarchy: &Hierarchy,
    state_slug: &str,
    city_slug: &str,
    limit: usize,
    strategy: NearbyStrategy,
) -> Vec<CityRef> {
    let Some((state, reference)) = hierarchy.city(state_slug, city_slug) else {
        return Vec::new();
    };
    let siblings: Vec<&CityAggregate> = state
        .cities
        .iter()
        .filter(|c| c.slug != reference.slug)
        .collect();

    let ranked = match strategy {
        NearbyStrategy::Count => by_count(siblings),
        NearbyStrategy::Distance => match by_distance(reference, &siblings) {
            Some(ranked) => ranked,
            None => {
                info!(
                    state = %state.name,
                    city = %reference.name,
                    "no coordinates for distance ranking, using store counts"
                );
                by_count(siblings)
            }
        },
    };

    ranked.into_iter().take(limit).map(CityRef::from).collect()
}

fn by_count(mut cities: Vec<&CityAggregate>) -> Vec<&CityAggregate> {
    cities.sort_by(|a, b| b.store_count.cmp(&a.store_count));
    cities
}

/// Located siblings by ascending distance, then unlocated ones by count.
/// `None` when the reference city or every sibling lacks coordinates.
fn by_distance<'a>(
    reference: &CityAggregate,
    siblings: &[&'a CityAggregate],
) -> Option<Vec<&'a CityAggregate>> {
    let origin = reference.coordinates?;

    let mut located: Vec<(f64, &CityAggregate)> = siblings
        .iter()
        .filter_map(|c| c.coordinates.map(|p| (planar_distance(origin, p), *c)))
        .collect();
    if located.is_empty() && !siblings.is_empty() {
        return None;
    }
    if located.len() < siblings.len() {
        warn!(
            city = %reference.name,
            missing = siblings.len() - located.len(),
            "some cities have no coordinates, ranking them last"
        );
    }

    located.sort_by(|a, b| a.0.total_cmp(&b.0));
    let unlocated: Vec<&CityAggregate> = siblings
        .iter()
        .filter(|c| c.coordinates.is_none())
        .copied()
        .collect();

    let mut ranked: Vec<&CityAggregate> = located.into_iter().map(|(_, c)| c).collect();
    ranked.extend(by_count(unlocated));
    Some(ranked)
}

/// Straight-line distance in degree space. Not a geodesic.
pub fn planar_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}
