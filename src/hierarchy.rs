use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::sanitize::StoreRecord;
use crate::slug::slugify;

/// Slug used when a group name has no sluggable characters.
const UNNAMED_SLUG: &str = "unnamed";

#[derive(Debug, Clone, Serialize)]
pub struct CityAggregate {
    pub name: String,
    pub slug: String,
    pub store_count: usize,
    pub total_reviews: u64,
    /// First located row of the city in table order.
    pub coordinates: Option<(f64, f64)>,
    pub stores: Vec<StoreRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateAggregate {
    pub name: String,
    pub slug: String,
    pub store_count: usize,
    pub city_count: usize,
    pub total_reviews: u64,
    pub cities: Vec<CityAggregate>,
    #[serde(skip)]
    by_slug: HashMap<String, usize>,
    #[serde(skip)]
    by_name: HashMap<String, usize>,
}

impl StateAggregate {
    pub fn city(&self, slug: &str) -> Option<&CityAggregate> {
        self.by_slug.get(slug).map(|&i| &self.cities[i])
    }

    pub fn city_by_name(&self, name: &str) -> Option<&CityAggregate> {
        self.by_name.get(name).map(|&i| &self.cities[i])
    }
}

/// State → city → store view of the flat table. Built once, read-only after.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Hierarchy {
    states: Vec<StateAggregate>,
    #[serde(skip)]
    by_slug: HashMap<String, usize>,
    #[serde(skip)]
    by_name: HashMap<String, usize>,
    excluded: usize,
}

impl Hierarchy {
    /// States in first-appearance order of the flat table.
    pub fn states(&self) -> &[StateAggregate] {
        &self.states
    }

    pub fn state(&self, slug: &str) -> Option<&StateAggregate> {
        self.by_slug.get(slug).map(|&i| &self.states[i])
    }

    pub fn state_by_name(&self, name: &str) -> Option<&StateAggregate> {
        self.by_name.get(name).map(|&i| &self.states[i])
    }

    pub fn city(
        &self,
        state_slug: &str,
        city_slug: &str,
    ) -> Option<(&StateAggregate, &CityAggregate)> {
        let state = self.state(state_slug)?;
        Some((state, state.city(city_slug)?))
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn city_count(&self) -> usize {
        self.states.iter().map(|s| s.city_count).sum()
    }

    pub fn store_count(&self) -> usize {
        self.states.iter().map(|s| s.store_count).sum()
    }

    pub fn total_reviews(&self) -> u64 {
        self.states.iter().map(|s| s.total_reviews).sum()
    }

    /// Rows left out because city or state was empty.
    pub fn excluded(&self) -> usize {
        self.excluded
    }
}

/// Hands out unique slugs within one level of the hierarchy.
#[derive(Default)]
struct SlugAllocator {
    taken: HashMap<String, usize>,
}

impl SlugAllocator {
    fn allocate(&mut self, name: &str) -> String {
        let mut base = slugify(name);
        if base.is_empty() {
            base = UNNAMED_SLUG.to_string();
        }
        let seen = self.taken.entry(base.clone()).or_insert(0);
        *seen += 1;
        if *seen == 1 {
            return base;
        }

        let mut n = *seen;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.taken.contains_key(&candidate) {
                warn!(name, slug = %candidate, "slug collision, disambiguated");
                self.taken.insert(candidate.clone(), 1);
                return candidate;
            }
            n += 1;
        }
    }
}

struct CityGroup<'a> {
    name: &'a str,
    rows: Vec<&'a StoreRecord>,
}

struct StateGroup<'a> {
    name: &'a str,
    cities: Vec<CityGroup<'a>>,
    city_pos: HashMap<&'a str, usize>,
}

/// Group the flat table into states and cities.
///
/// Names are grouped exactly as written, so "Portland" and "portland" are
/// two groups. Rows without a city or state are skipped and counted.
pub fn build_hierarchy(table: &[StoreRecord]) -> Hierarchy {
    let mut groups: Vec<StateGroup> = Vec::new();
    let mut state_pos: HashMap<&str, usize> = HashMap::new();
    let mut excluded = 0usize;

    for rec in table {
        if !rec.is_located() {
            excluded += 1;
            continue;
        }

        let si = match state_pos.get(rec.state.as_str()) {
            Some(&i) => i,
            None => {
                groups.push(StateGroup {
                    name: &rec.state,
                    cities: Vec::new(),
                    city_pos: HashMap::new(),
                });
                state_pos.insert(&rec.state, groups.len() - 1);
                groups.len() - 1
            }
        };

        let group = &mut groups[si];
        let ci = match group.city_pos.get(rec.city.as_str()) {
            Some(&i) => i,
            None => {
                group.cities.push(CityGroup {
                    name: &rec.city,
                    rows: Vec::new(),
                });
                group.city_pos.insert(&rec.city, group.cities.len() - 1);
                group.cities.len() - 1
            }
        };
        group.cities[ci].rows.push(rec);
    }

    let mut state_slugs = SlugAllocator::default();
    let mut states = Vec::with_capacity(groups.len());
    let mut by_slug = HashMap::with_capacity(groups.len());
    let mut by_name = HashMap::with_capacity(groups.len());

    for group in groups {
        let slug = state_slugs.allocate(group.name);
        let state = build_state(group, slug);
        by_slug.insert(state.slug.clone(), states.len());
        by_name.insert(state.name.clone(), states.len());
        states.push(state);
    }

    let hierarchy = Hierarchy {
        states,
        by_slug,
        by_name,
        excluded,
    };
    info!(
        states = hierarchy.state_count(),
        cities = hierarchy.city_count(),
        stores = hierarchy.store_count(),
        excluded,
        "hierarchy built"
    );
    hierarchy
}

fn build_state(group: StateGroup<'_>, slug: String) -> StateAggregate {
    let mut city_slugs = SlugAllocator::default();
    let mut cities: Vec<CityAggregate> = group
        .cities
        .into_iter()
        .map(|c| {
            let slug = city_slugs.allocate(c.name);
            build_city(c, slug)
        })
        .collect();

    cities.sort_by(|a, b| {
        b.store_count
            .cmp(&a.store_count)
            .then(b.total_reviews.cmp(&a.total_reviews))
    });

    let by_slug = cities
        .iter()
        .enumerate()
        .map(|(i, c)| (c.slug.clone(), i))
        .collect();
    let by_name = cities
        .iter()
        .enumerate()
        .map(|(i, c)| (c.name.clone(), i))
        .collect();

    StateAggregate {
        name: group.name.to_string(),
        slug,
        store_count: cities.iter().map(|c| c.store_count).sum(),
        city_count: cities.len(),
        total_reviews: cities.iter().map(|c| c.total_reviews).sum(),
        cities,
        by_slug,
        by_name,
    }
}

fn build_city(group: CityGroup<'_>, slug: String) -> CityAggregate {
    let coordinates = group.rows.iter().find_map(|r| r.coordinates());
    let mut stores: Vec<StoreRecord> = group.rows.into_iter().cloned().collect();
    stores.sort_by(|a, b| {
        b.rating
            .total_cmp(&a.rating)
            .then(b.review_count.cmp(&a.review_count))
    });

    CityAggregate {
        name: group.name.to_string(),
        slug,
        store_count: stores.len(),
        total_reviews: stores.iter().map(|s| s.review_count).sum(),
        coordinates,
        stores,
    }
}
