use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::{LoadError, RowError};
use crate::sanitize::{sanitize, Columns, RawRecord, StoreRecord};

/// The sanitized, unaggregated store table.
pub type FlatTable = Vec<StoreRecord>;

pub const DEFAULT_JSON_FILE: &str = "consignment_stores.json";
pub const DEFAULT_SPREADSHEET_FILE: &str =
    "SEO_Optimized_Consignment_Stores_Sample_Dataset.xlsx";
pub const DEFAULT_CSV_FILE: &str = "SEO_Optimized_Consignment_Stores_Sample_Dataset.csv";

const SAMPLE_JSON: &str = include_str!("../data/sample_stores.json");

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceDescriptor {
    /// Exactly this file.
    Path(PathBuf),
    /// Every `dir/file` pair, file names in priority order.
    Discover {
        dirs: Vec<PathBuf>,
        file_names: Vec<String>,
    },
}

impl Default for SourceDescriptor {
    fn default() -> Self {
        SourceDescriptor::Discover {
            dirs: vec![PathBuf::from("data"), PathBuf::from("."), PathBuf::from("..")],
            file_names: default_file_names(),
        }
    }
}

/// JSON first, then the spreadsheet, then its CSV export.
pub fn default_file_names() -> Vec<String> {
    vec![
        DEFAULT_JSON_FILE.to_string(),
        DEFAULT_SPREADSHEET_FILE.to_string(),
        DEFAULT_CSV_FILE.to_string(),
    ]
}

impl SourceDescriptor {
    /// Candidate paths in the order they are tried.
    pub fn candidates(&self) -> Vec<PathBuf> {
        match self {
            SourceDescriptor::Path(p) => vec![p.clone()],
            SourceDescriptor::Discover { dirs, file_names } => file_names
                .iter()
                .flat_map(|name| dirs.iter().map(move |dir| dir.join(name)))
                .collect(),
        }
    }
}

/// What to hand back when no source yields a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Fallback {
    #[default]
    Empty,
    Sample,
}

/// Accepted source column names per logical field, first match wins.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ColumnMap {
    pub name: Vec<String>,
    pub address: Vec<String>,
    pub city: Vec<String>,
    pub state: Vec<String>,
    pub rating: Vec<String>,
    pub review_count: Vec<String>,
    pub description: Vec<String>,
    pub website: Vec<String>,
    pub phone: Vec<String>,
    pub photo: Vec<String>,
    pub latitude: Vec<String>,
    pub longitude: Vec<String>,
    pub categories: Vec<String>,
    pub hours: Vec<String>,
}

fn aliases(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for ColumnMap {
    fn default() -> Self {
        ColumnMap {
            name: aliases(&["Business Name", "name", "Store Name"]),
            address: aliases(&["Address", "address"]),
            city: aliases(&["City", "city"]),
            state: aliases(&["State", "state"]),
            rating: aliases(&["Rating", "rating"]),
            review_count: aliases(&["Number of Reviews", "review_count", "Review Count"]),
            description: aliases(&["New SEO Description V2", "description", "Description"]),
            website: aliases(&["Site", "website"]),
            phone: aliases(&["Phone", "phone"]),
            photo: aliases(&["Photo", "photo"]),
            latitude: aliases(&["Latitude", "latitude"]),
            longitude: aliases(&["Longitude", "longitude"]),
            categories: aliases(&["Categories", "categories"]),
            hours: aliases(&["Hours", "hours"]),
        }
    }
}

impl ColumnMap {
    /// Match aliases against the headers a source actually has.
    /// Err carries a description of each required field that matched nothing.
    pub fn resolve(&self, headers: &BTreeSet<String>) -> Result<Columns, Vec<String>> {
        let pick = |names: &[String]| names.iter().find(|n| headers.contains(*n)).cloned();

        let cols = Columns {
            name: pick(&self.name),
            address: pick(&self.address),
            city: pick(&self.city),
            state: pick(&self.state),
            rating: pick(&self.rating),
            review_count: pick(&self.review_count),
            description: pick(&self.description),
            website: pick(&self.website),
            phone: pick(&self.phone),
            photo: pick(&self.photo),
            latitude: pick(&self.latitude),
            longitude: pick(&self.longitude),
            categories: pick(&self.categories),
            hours: pick(&self.hours),
        };

        let required = [
            ("name", &cols.name, &self.name),
            ("address", &cols.address, &self.address),
            ("city", &cols.city, &self.city),
            ("state", &cols.state, &self.state),
            ("rating", &cols.rating, &self.rating),
            ("review_count", &cols.review_count, &self.review_count),
        ];
        let missing: Vec<String> = required
            .iter()
            .filter(|(_, found, _)| found.is_none())
            .map(|(field, _, tried)| format!("{field} ({})", tried.join(" | ")))
            .collect();

        if missing.is_empty() {
            Ok(cols)
        } else {
            Err(missing)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub columns: ColumnMap,
    pub fallback: Fallback,
}

/// Where the returned table came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Origin {
    File(PathBuf),
    Sample,
    Empty,
}

/// Result of a load. Always usable; `error` says why a fallback was taken.
#[derive(Debug)]
pub struct Loaded {
    pub table: FlatTable,
    pub origin: Origin,
    pub error: Option<LoadError>,
    pub skipped_rows: usize,
}

impl Loaded {
    pub fn is_fallback(&self) -> bool {
        !matches!(self.origin, Origin::File(_))
    }
}

/// Load the store table from the first candidate that yields one.
///
/// Every candidate gets one attempt. When none succeeds the configured
/// fallback table is returned and the last error is kept on the result.
pub fn load(source: &SourceDescriptor, opts: &LoadOptions) -> Loaded {
    let candidates = source.candidates();
    let mut last_err = None;
    let mut attempted = 0usize;

    for path in &candidates {
        if !path.is_file() {
            info!(path = %path.display(), "no data source here");
            continue;
        }
        attempted += 1;
        info!(path = %path.display(), "loading data source");

        match load_file(path, &opts.columns) {
            Ok((table, skipped_rows)) => {
                info!(
                    path = %path.display(),
                    records = table.len(),
                    skipped = skipped_rows,
                    "data source loaded"
                );
                return Loaded {
                    table,
                    origin: Origin::File(path.clone()),
                    error: None,
                    skipped_rows,
                };
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "data source rejected");
                last_err = Some(e);
            }
        }
    }

    if attempted == 0 {
        info!(tried = candidates.len(), "no data source candidate exists");
    }
    let err = last_err.unwrap_or(LoadError::SourceNotFound { tried: candidates });
    fallback(opts, err)
}

fn fallback(opts: &LoadOptions, err: LoadError) -> Loaded {
    match opts.fallback {
        Fallback::Empty => {
            error!(error = %err, "no data loaded, serving an empty directory");
            Loaded {
                table: Vec::new(),
                origin: Origin::Empty,
                error: Some(err),
                skipped_rows: 0,
            }
        }
        Fallback::Sample => {
            error!(error = %err, "no data loaded, serving the built-in sample");
            let table = sample_table();
            Loaded {
                table,
                origin: Origin::Sample,
                error: Some(err),
                skipped_rows: 0,
            }
        }
    }
}

/// The small built-in demo dataset.
pub fn sample_table() -> FlatTable {
    let path = Path::new("<built-in sample>");
    parse_json(path, SAMPLE_JSON)
        .and_then(|sheet| build_table(path, sheet, &ColumnMap::default()))
        .map(|(table, _)| table)
        .unwrap_or_default()
}

/// Read, validate and sanitize a single source file.
pub fn load_file(path: &Path, columns: &ColumnMap) -> Result<(FlatTable, usize), LoadError> {
    let sheet = read_rows(path)?;
    build_table(path, sheet, columns)
}

type Rows = Vec<Result<RawRecord, RowError>>;

/// Raw rows plus the header row, when the format has one.
struct Sheet {
    headers: Option<BTreeSet<String>>,
    rows: Rows,
}

fn read_rows(path: &Path) -> Result<Sheet, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "json" => {
            let raw = fs::read_to_string(path).map_err(|source| LoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            parse_json(path, &raw)
        }
        "csv" => read_delimited(path, b','),
        "tsv" => read_delimited(path, b'\t'),
        "xlsx" | "xlsm" | "xls" | "ods" => read_workbook(path),
        _ => Err(LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// JSON sources are an array of objects. Non-object elements become row
/// errors so they are dropped and counted with the other bad rows.
fn parse_json(path: &Path, raw: &str) -> Result<Sheet, LoadError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let Value::Array(items) = value else {
        return Err(LoadError::Parse {
            path: path.to_path_buf(),
            reason: "expected an array of objects".to_string(),
        });
    };

    let rows = items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(map),
            _ => Err(RowError::NotAnObject),
        })
        .collect();
    Ok(Sheet {
        headers: None,
        rows,
    })
}

/// Delimited export with a header row. Empty cells read as missing. A record
/// that is not valid UTF-8 becomes a row error, not a file error.
fn read_delimited(path: &Path, delimiter: u8) -> Result<Sheet, LoadError> {
    let parse_err = |e: csv::Error| LoadError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .map_err(|e| match e.into_kind() {
            csv::ErrorKind::Io(source) => LoadError::Read {
                path: path.to_path_buf(),
                source,
            },
            other => LoadError::Parse {
                path: path.to_path_buf(),
                reason: format!("{other:?}"),
            },
        })?;

    let headers: Vec<String> = rdr
        .byte_headers()
        .map_err(parse_err)?
        .iter()
        .map(|h| {
            String::from_utf8_lossy(h)
                .trim()
                .trim_start_matches('\u{feff}')
                .to_string()
        })
        .collect();

    let mut rows = Vec::new();
    for record in rdr.byte_records() {
        let record = record.map_err(parse_err)?;
        rows.push(decode_record(&headers, &record));
    }
    Ok(Sheet {
        headers: Some(header_set(&headers)),
        rows,
    })
}

fn decode_record(headers: &[String], record: &csv::ByteRecord) -> Result<RawRecord, RowError> {
    let mut row = RawRecord::new();
    for (header, cell) in headers.iter().zip(record.iter()) {
        let cell = std::str::from_utf8(cell).map_err(|_| RowError::InvalidUtf8 {
            column: header.clone(),
        })?;
        row.insert(header.clone(), text_cell(cell));
    }
    Ok(row)
}

/// First worksheet of an Excel or OpenDocument workbook; row one is the header.
fn read_workbook(path: &Path) -> Result<Sheet, LoadError> {
    let parse_err = |reason: String| LoadError::Parse {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| parse_err(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| parse_err("workbook has no worksheets".to_string()))?
        .map_err(|e| parse_err(e.to_string()))?;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = match sheet_rows.next() {
        Some(cells) => cells.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => Vec::new(),
    };

    let rows = sheet_rows
        .filter(|cells| cells.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|cells| {
            let mut row = RawRecord::new();
            for (header, cell) in headers.iter().zip(cells) {
                row.insert(header.clone(), workbook_cell(cell));
            }
            Ok(row)
        })
        .collect();

    Ok(Sheet {
        headers: Some(header_set(&headers)),
        rows,
    })
}

fn workbook_cell(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) => text_cell(s),
        Data::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Data::Int(i) => Value::from(*i),
        Data::Bool(b) => Value::Bool(*b),
        other => text_cell(&other.to_string()),
    }
}

fn text_cell(cell: &str) -> Value {
    if cell.trim().is_empty() {
        Value::Null
    } else {
        Value::String(cell.to_string())
    }
}

fn header_set(headers: &[String]) -> BTreeSet<String> {
    headers.iter().filter(|h| !h.is_empty()).cloned().collect()
}

fn build_table(
    path: &Path,
    sheet: Sheet,
    columns: &ColumnMap,
) -> Result<(FlatTable, usize), LoadError> {
    let Sheet { headers, rows } = sheet;
    let empty = || LoadError::EmptySource {
        path: path.to_path_buf(),
    };

    // JSON objects may omit keys, so there a column exists if any row has it.
    let headers: BTreeSet<String> = match headers {
        Some(h) if !h.is_empty() => h,
        _ => rows.iter().flatten().flat_map(|r| r.keys().cloned()).collect(),
    };
    if headers.is_empty() && rows.is_empty() {
        return Err(empty());
    }

    let cols = columns
        .resolve(&headers)
        .map_err(|missing| LoadError::SchemaInvalid {
            path: path.to_path_buf(),
            missing,
        })?;
    if rows.is_empty() {
        return Err(empty());
    }

    let results: Vec<_> = rows
        .par_iter()
        .map(|row| match row {
            Ok(raw) => sanitize(raw, &cols),
            Err(e) => Err(e.clone()),
        })
        .collect();

    let mut table = Vec::with_capacity(results.len());
    let mut skipped = 0usize;
    for (i, result) in results.into_iter().enumerate() {
        match result {
            Ok(rec) => table.push(rec),
            Err(e) => {
                skipped += 1;
                warn!(path = %path.display(), row = i, error = %e, "dropping row");
            }
        }
    }

    table.sort_by(|a, b| b.review_count.cmp(&a.review_count));
    Ok((table, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    const CSV_HEADER: &str =
        "Business Name,Address,City,State,Rating,Number of Reviews,Site,Phone,Photo\n";

    #[test]
    fn discover_orders_file_names_before_dirs() {
        let src = SourceDescriptor::Discover {
            dirs: vec![PathBuf::from("data"), PathBuf::from(".")],
            file_names: vec!["a.json".into(), "b.csv".into()],
        };
        assert_eq!(
            src.candidates(),
            vec![
                PathBuf::from("data/a.json"),
                PathBuf::from("./a.json"),
                PathBuf::from("data/b.csv"),
                PathBuf::from("./b.csv"),
            ]
        );
    }

    #[test]
    fn resolve_picks_first_present_alias() {
        let headers: BTreeSet<String> = [
            "name",
            "Store Name",
            "Address",
            "City",
            "State",
            "Rating",
            "Review Count",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let cols = ColumnMap::default().resolve(&headers).unwrap();
        assert_eq!(cols.name.as_deref(), Some("name"));
        assert_eq!(cols.review_count.as_deref(), Some("Review Count"));
        assert_eq!(cols.photo, None);
    }

    #[test]
    fn resolve_reports_every_missing_field() {
        let headers: BTreeSet<String> =
            ["Business Name", "City"].iter().map(|s| s.to_string()).collect();
        let missing = ColumnMap::default().resolve(&headers).unwrap_err();
        assert_eq!(missing.len(), 4);
        assert!(missing[0].starts_with("address"));
        assert!(missing.iter().any(|m| m.starts_with("state (State | state)")));
    }

    #[test]
    fn csv_is_sorted_by_review_count() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!(
            "{CSV_HEADER}\
             A,1 Main,Austin,Texas,4.5,10,,,\n\
             B,2 Main,Austin,Texas,4.0,250,b.com,,\n\
             C,3 Main,Dallas,Texas,3.0,1,,555,\n"
        );
        let path = write(dir.path(), "stores.csv", &body);
        let (table, skipped) = load_file(&path, &ColumnMap::default()).unwrap();
        assert_eq!(skipped, 0);
        let names: Vec<_> = table.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        assert_eq!(table[0].website.as_deref(), Some("https://b.com"));
        assert_eq!(table[2].phone.as_deref(), Some("555"));
        assert_eq!(table[1].photo, None);
    }

    #[test]
    fn tsv_uses_tab_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let body = "name\taddress\tcity\tstate\trating\treview_count\n\
                    A\t1 Main\tAustin\tTexas\t4.5\t3\n";
        let path = write(dir.path(), "stores.tsv", body);
        let (table, _) = load_file(&path, &ColumnMap::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].review_count, 3);
    }

    #[test]
    fn json_rows_with_structured_cells_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"[
            {"name": "A", "address": "", "city": "X", "state": "Y",
             "rating": 4, "review_count": 2},
            {"name": {"bad": true}, "address": "", "city": "X", "state": "Y",
             "rating": 4, "review_count": 2},
            7
        ]"#;
        let path = write(dir.path(), "stores.json", body);
        let (table, skipped) = load_file(&path, &ColumnMap::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(skipped, 2);
    }

    #[test]
    fn undecodable_csv_record_drops_only_that_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stores.csv");
        let mut body = CSV_HEADER.as_bytes().to_vec();
        body.extend_from_slice(b"A,1 Main,Austin,Texas,4.5,10,,,\n");
        body.extend_from_slice(b"Caf\xe9 Resale,2 Main,Austin,Texas,4.0,20,,,\n");
        body.extend_from_slice(b"C,3 Main,Dallas,Texas,3.0,1,,,\n");
        fs::write(&path, body).unwrap();

        let (table, skipped) = load_file(&path, &ColumnMap::default()).unwrap();
        assert_eq!(skipped, 1);
        let names: Vec<_> = table.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn header_only_csv_checks_schema_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "no_state.csv",
            "Business Name,Address,City,Rating,Number of Reviews\n",
        );
        match load_file(&path, &ColumnMap::default()) {
            Err(LoadError::SchemaInvalid { missing, .. }) => {
                assert_eq!(missing, vec!["state (State | state)".to_string()]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }

        let path = write(dir.path(), "header_only.csv", CSV_HEADER);
        assert!(matches!(
            load_file(&path, &ColumnMap::default()),
            Err(LoadError::EmptySource { .. })
        ));
        let path = write(dir.path(), "blank.csv", "");
        assert!(matches!(
            load_file(&path, &ColumnMap::default()),
            Err(LoadError::EmptySource { .. })
        ));
    }

    #[test]
    fn xlsx_first_sheet_is_read() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/stores.xlsx");
        let (table, skipped) = load_file(&path, &ColumnMap::default()).unwrap();
        assert_eq!(skipped, 0);
        let names: Vec<_> = table.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Lakeview Closet", "Hill Country Resale", "Second Look"]);

        assert_eq!(table[0].review_count, 100);
        assert_eq!(table[0].rating, 4.8);
        assert_eq!(table[0].phone.as_deref(), Some("3125550100"));
        assert!(table[0].categories.is_empty());
        assert_eq!(table[2].categories, vec!["Clothing", "Shoes"]);
        assert_eq!(table[2].hours.as_deref(), Some("Mon-Sat 10-6"));
    }

    #[test]
    fn corrupt_workbook_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "stores.xlsx", "PK not really a zip");
        assert!(matches!(
            load_file(&path, &ColumnMap::default()),
            Err(LoadError::Parse { .. })
        ));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "stores.txt", "name,city");
        assert!(matches!(
            load_file(&path, &ColumnMap::default()),
            Err(LoadError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "stores.json", "{not json");
        assert!(matches!(
            load_file(&path, &ColumnMap::default()),
            Err(LoadError::Parse { .. })
        ));
        let path = write(dir.path(), "object.json", r#"{"name": "A"}"#);
        assert!(matches!(
            load_file(&path, &ColumnMap::default()),
            Err(LoadError::Parse { .. })
        ));
    }

    #[test]
    fn failing_candidate_falls_through_to_next() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "stores.json", "[]");
        write(
            dir.path(),
            "stores.csv",
            &format!("{CSV_HEADER}A,1 Main,Austin,Texas,4.5,10,,,\n"),
        );
        let src = SourceDescriptor::Discover {
            dirs: vec![dir.path().to_path_buf()],
            file_names: vec!["stores.json".into(), "stores.csv".into()],
        };
        let loaded = load(&src, &LoadOptions::default());
        assert_eq!(loaded.origin, Origin::File(dir.path().join("stores.csv")));
        assert_eq!(loaded.table.len(), 1);
        assert!(loaded.error.is_none());
    }

    #[test]
    fn nothing_found_returns_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let src = SourceDescriptor::Path(dir.path().join("missing.json"));
        let loaded = load(&src, &LoadOptions::default());
        assert!(loaded.table.is_empty());
        assert_eq!(loaded.origin, Origin::Empty);
        assert!(matches!(loaded.error, Some(LoadError::SourceNotFound { .. })));
        assert!(loaded.is_fallback());
    }

    #[test]
    fn sample_fallback_is_usable() {
        let dir = tempfile::tempdir().unwrap();
        let opts = LoadOptions {
            fallback: Fallback::Sample,
            ..LoadOptions::default()
        };
        let loaded = load(&SourceDescriptor::Path(dir.path().join("none.csv")), &opts);
        assert_eq!(loaded.origin, Origin::Sample);
        assert!(!loaded.table.is_empty());
        assert!(loaded.table.iter().all(|r| r.is_located()));
        assert!(loaded
            .table
            .windows(2)
            .all(|w| w[0].review_count >= w[1].review_count));
    }
}
