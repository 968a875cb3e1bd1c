use tracing::{info, warn};

use crate::error::LoadError;
use crate::hierarchy::{build_hierarchy, Hierarchy};
use crate::loader::{self, FlatTable, Loaded, Origin};
use crate::settings::Settings;

/// Everything the site serves, built once at startup and shared read-only.
#[derive(Debug)]
pub struct Directory {
    table: FlatTable,
    hierarchy: Hierarchy,
    origin: Origin,
    load_error: Option<LoadError>,
    skipped_rows: usize,
}

impl Directory {
    pub fn load(settings: &Settings) -> Directory {
        let loaded = loader::load(&settings.source(), &settings.load_options());
        Directory::from_loaded(loaded)
    }

    pub fn from_loaded(loaded: Loaded) -> Directory {
        if loaded.skipped_rows > 0 {
            warn!(skipped = loaded.skipped_rows, "some rows were dropped while loading");
        }
        let hierarchy = build_hierarchy(&loaded.table);
        info!(
            origin = ?loaded.origin,
            stores = loaded.table.len(),
            states = hierarchy.state_count(),
            "directory ready"
        );
        Directory {
            table: loaded.table,
            hierarchy,
            origin: loaded.origin,
            load_error: loaded.error,
            skipped_rows: loaded.skipped_rows,
        }
    }

    /// Directory over an in-memory table, as if loaded from `origin`.
    pub fn from_table(table: FlatTable, origin: Origin) -> Directory {
        Directory::from_loaded(Loaded {
            table,
            origin,
            error: None,
            skipped_rows: 0,
        })
    }

    pub fn table(&self) -> &FlatTable {
        &self.table
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Why the configured source was not used, if it wasn't.
    pub fn load_error(&self) -> Option<&LoadError> {
        self.load_error.as_ref()
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn is_empty(&self) -> bool {
        self.hierarchy.is_empty()
    }
}
