//! Consignment store directory: loads a flat store table, groups it into
//! states and cities, and serves browsable pages over it.

pub mod directory;
pub mod error;
pub mod hierarchy;
pub mod loader;
pub mod nearby;
pub mod render;
pub mod sanitize;
pub mod server;
pub mod settings;
pub mod slug;
pub mod views;

pub use directory::Directory;
pub use error::{LoadError, RowError};
pub use hierarchy::{build_hierarchy, CityAggregate, Hierarchy, StateAggregate};
pub use loader::{load, FlatTable, LoadOptions, Loaded, Origin, SourceDescriptor};
pub use nearby::{find_nearby, CityRef, NearbyStrategy};
pub use sanitize::StoreRecord;
pub use settings::Settings;
pub use slug::slugify;
