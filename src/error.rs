use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a dataset source could not produce a table.
///
/// None of these escape `loader::load`; they are reported on `Loaded::error`
/// so callers can tell "no data" apart from "bad schema".
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no readable data source found (tried: {})", display_paths(.tried))]
    SourceNotFound { tried: Vec<PathBuf> },
    #[error("{}: missing required columns: {}", .path.display(), .missing.join(", "))]
    SchemaInvalid { path: PathBuf, missing: Vec<String> },
    #[error("{}: source contains no rows", .path.display())]
    EmptySource { path: PathBuf },
    #[error("{}: unsupported source format", .path.display())]
    UnsupportedFormat { path: PathBuf },
    #[error("{}: read failed: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: parse failed: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },
}

/// A single row that could not be coerced into a store record.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RowError {
    #[error("column '{column}' holds a structured value, expected a scalar")]
    NotScalar { column: String },
    #[error("row is not an object")]
    NotAnObject,
    #[error("column '{column}' is not valid UTF-8")]
    InvalidUtf8 { column: String },
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_missing_columns() {
        let err = LoadError::SchemaInvalid {
            path: PathBuf::from("data/stores.csv"),
            missing: vec!["state".into(), "rating".into()],
        };
        assert_eq!(
            err.to_string(),
            "data/stores.csv: missing required columns: state, rating"
        );
    }

    #[test]
    fn not_found_lists_attempted_paths() {
        let err = LoadError::SourceNotFound {
            tried: vec![PathBuf::from("a.json"), PathBuf::from("b.csv")],
        };
        assert!(err.to_string().contains("a.json, b.csv"));

        let err = LoadError::SourceNotFound { tried: Vec::new() };
        assert!(err.to_string().contains("tried: nothing"));
    }
}
