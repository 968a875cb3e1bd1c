use std::collections::HashSet;

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;

use crate::directory::Directory;
use crate::hierarchy::{CityAggregate, Hierarchy, StateAggregate};
use crate::nearby::{find_nearby, CityRef, NearbyStrategy};

/// US census regions used to group states on the home page.
pub const REGIONS: &[(&str, &[&str])] = &[
    (
        "Northeast",
        &[
            "Maine", "New Hampshire", "Vermont", "Massachusetts", "Rhode Island",
            "Connecticut", "New York", "Pennsylvania", "New Jersey",
        ],
    ),
    (
        "Midwest",
        &[
            "Ohio", "Indiana", "Michigan", "Illinois", "Wisconsin", "Minnesota",
            "Iowa", "Missouri", "North Dakota", "South Dakota", "Nebraska", "Kansas",
        ],
    ),
    (
        "South",
        &[
            "Delaware", "Maryland", "Virginia", "West Virginia", "North Carolina",
            "South Carolina", "Georgia", "Florida", "Kentucky", "Tennessee", "Alabama",
            "Mississippi", "Arkansas", "Louisiana", "Oklahoma", "Texas",
        ],
    ),
    (
        "West",
        &[
            "Montana", "Idaho", "Wyoming", "Colorado", "New Mexico", "Arizona", "Utah",
            "Nevada", "Washington", "Oregon", "California", "Alaska", "Hawaii",
        ],
    ),
];

pub const OTHER_REGION: &str = "Other";

/// Per-request knobs the views need from settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    pub nearby_strategy: NearbyStrategy,
    pub nearby_limit: usize,
    pub popular_cities: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        ViewOptions {
            nearby_strategy: NearbyStrategy::Count,
            nearby_limit: crate::nearby::DEFAULT_LIMIT,
            popular_cities: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSummary {
    pub name: String,
    pub slug: String,
    pub store_count: usize,
    pub city_count: usize,
}

impl From<&StateAggregate> for StateSummary {
    fn from(s: &StateAggregate) -> Self {
        StateSummary {
            name: s.name.clone(),
            slug: s.slug.clone(),
            store_count: s.store_count,
            city_count: s.city_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularCity {
    pub name: String,
    pub state: String,
    pub state_slug: String,
    pub city_slug: String,
    pub store_count: usize,
}

/// Data every page shows: navigation and headline totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteContext {
    pub states: Vec<StateSummary>,
    pub popular_cities: Vec<PopularCity>,
    pub total_stores: usize,
    pub total_cities: usize,
    pub total_states: usize,
    pub current_year: i32,
}

pub fn site_context(dir: &Directory, opts: &ViewOptions) -> SiteContext {
    let h = dir.hierarchy();

    let mut states: Vec<StateSummary> = h.states().iter().map(StateSummary::from).collect();
    states.sort_by(|a, b| a.name.cmp(&b.name));

    let mut popular: Vec<PopularCity> = h
        .states()
        .iter()
        .flat_map(|s| {
            s.cities.iter().map(move |c| PopularCity {
                name: c.name.clone(),
                state: s.name.clone(),
                state_slug: s.slug.clone(),
                city_slug: c.slug.clone(),
                store_count: c.store_count,
            })
        })
        .collect();
    popular.sort_by(|a, b| b.store_count.cmp(&a.store_count));
    popular.truncate(opts.popular_cities);

    SiteContext {
        states,
        popular_cities: popular,
        total_stores: h.store_count(),
        total_cities: h.city_count(),
        total_states: h.state_count(),
        current_year: Local::now().year(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub name: &'static str,
    pub states: Vec<StateSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeView {
    pub regions: Vec<Region>,
}

/// States grouped by region, each region alphabetical. Regions with no
/// states are left out; unlisted states land in "Other".
pub fn home(h: &Hierarchy) -> HomeView {
    let mut regions: Vec<Region> = REGIONS
        .iter()
        .map(|(name, _)| Region {
            name: *name,
            states: Vec::new(),
        })
        .collect();
    let mut other = Region {
        name: OTHER_REGION,
        states: Vec::new(),
    };

    for state in h.states() {
        let slot = REGIONS
            .iter()
            .position(|(_, members)| members.contains(&state.name.as_str()));
        match slot {
            Some(i) => regions[i].states.push(StateSummary::from(state)),
            None => other.states.push(StateSummary::from(state)),
        }
    }
    regions.push(other);

    regions.retain(|r| !r.states.is_empty());
    for region in &mut regions {
        region.states.sort_by(|a, b| a.name.cmp(&b.name));
    }
    HomeView { regions }
}

#[derive(Debug, Clone, Serialize)]
pub struct StateView<'a> {
    pub state: &'a StateAggregate,
    /// Already ordered by store count, then reviews.
    pub cities: &'a [CityAggregate],
}

pub fn state_view<'a>(h: &'a Hierarchy, state_slug: &str) -> Option<StateView<'a>> {
    let state = h.state(state_slug)?;
    Some(StateView {
        state,
        cities: &state.cities,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct CityView<'a> {
    pub state: &'a StateAggregate,
    pub city: &'a CityAggregate,
    pub nearby: Vec<CityRef>,
}

pub fn city_view<'a>(
    h: &'a Hierarchy,
    state_slug: &str,
    city_slug: &str,
    opts: &ViewOptions,
) -> Option<CityView<'a>> {
    let (state, city) = h.city(state_slug, city_slug)?;
    let nearby = find_nearby(h, state_slug, city_slug, opts.nearby_limit, opts.nearby_strategy);
    Some(CityView { state, city, nearby })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreHit {
    pub name: String,
    pub city: String,
    pub state: String,
    /// Route slugs; absent when the store is not placed in the hierarchy.
    pub state_slug: Option<String>,
    pub city_slug: Option<String>,
    pub rating: f64,
    pub review_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityHit {
    pub name: String,
    pub state: String,
    pub state_slug: String,
    pub city_slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateHit {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub stores: Vec<StoreHit>,
    pub cities: Vec<CityHit>,
    pub states: Vec<StateHit>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty() && self.cities.is_empty() && self.states.is_empty()
    }

    pub fn total(&self) -> usize {
        self.stores.len() + self.cities.len() + self.states.len()
    }
}

/// Case-insensitive substring scan of the flat table.
///
/// Stores match on name, cities on city name (one hit per city and state),
/// states on state name (one hit per state). Results keep table order.
pub fn search(dir: &Directory, query: &str) -> SearchResults {
    let needle = query.trim().to_lowercase();
    let mut results = SearchResults {
        query: needle.clone(),
        ..SearchResults::default()
    };
    if needle.is_empty() {
        return results;
    }

    let h = dir.hierarchy();
    let mut seen_cities: HashSet<(&str, &str)> = HashSet::new();
    let mut seen_states: HashSet<&str> = HashSet::new();

    for rec in dir.table() {
        let state = h.state_by_name(&rec.state);
        let city = state.and_then(|s| s.city_by_name(&rec.city));

        if rec.name.to_lowercase().contains(&needle) {
            results.stores.push(StoreHit {
                name: rec.name.clone(),
                city: rec.city.clone(),
                state: rec.state.clone(),
                state_slug: state.map(|s| s.slug.clone()),
                city_slug: city.map(|c| c.slug.clone()),
                rating: rec.rating,
                review_count: rec.review_count,
            });
        }

        if let (Some(s), Some(c)) = (state, city) {
            if rec.city.to_lowercase().contains(&needle)
                && seen_cities.insert((rec.city.as_str(), rec.state.as_str()))
            {
                results.cities.push(CityHit {
                    name: c.name.clone(),
                    state: s.name.clone(),
                    state_slug: s.slug.clone(),
                    city_slug: c.slug.clone(),
                });
            }
        }

        if let Some(s) = state {
            if rec.state.to_lowercase().contains(&needle)
                && seen_states.insert(rec.state.as_str())
            {
                results.states.push(StateHit {
                    name: s.name.clone(),
                    slug: s.slug.clone(),
                });
            }
        }
    }

    results
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: NaiveDate,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

/// Every public page: fixed pages first, then each state followed by its cities.
pub fn sitemap_entries(h: &Hierarchy, base_url: &str, today: NaiveDate) -> Vec<SitemapEntry> {
    let base = base_url.trim_end_matches('/');
    let entry = |path: String, changefreq: &'static str, priority: &'static str| SitemapEntry {
        loc: format!("{base}{path}"),
        lastmod: today,
        changefreq,
        priority,
    };

    let mut entries = vec![
        entry("/".to_string(), "daily", "1.0"),
        entry("/about".to_string(), "weekly", "0.5"),
        entry("/sitemap".to_string(), "weekly", "0.3"),
    ];
    for state in h.states() {
        entries.push(entry(format!("/state/{}", state.slug), "daily", "0.8"));
        for city in &state.cities {
            entries.push(entry(
                format!("/state/{}/{}", state.slug, city.slug),
                "daily",
                "0.6",
            ));
        }
    }
    entries
}
