use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::RowError;
use crate::slug::slugify;

static PARAGRAPH_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\n[ \t\r]*\n\s*").unwrap());
static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\n\s*").unwrap());
static SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^https?://").unwrap());

/// Sentences accumulate into one paragraph until it passes this many chars.
const PARAGRAPH_CHARS: usize = 250;

/// One untyped row as read from the source: column name → scalar cell.
pub type RawRecord = Map<String, Value>;

/// Source column names resolved for one dataset. `None` means the source has
/// no such column and every row reads it as missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Columns {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub rating: Option<String>,
    pub review_count: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub photo: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub categories: Option<String>,
    pub hours: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreRecord {
    pub name: String,
    pub slug: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub rating: f64,
    pub review_count: u64,
    pub description_paragraphs: Vec<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub photo: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub categories: Vec<String>,
    pub hours: Option<String>,
}

impl StoreRecord {
    /// Rows without a city or state cannot be placed in the hierarchy.
    pub fn is_located(&self) -> bool {
        !self.city.is_empty() && !self.state.is_empty()
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// Coerce one raw row into a typed record. Malformed scalars fall back to
/// defaults; only structurally wrong cells fail the row.
pub fn sanitize(raw: &RawRecord, cols: &Columns) -> Result<StoreRecord, RowError> {
    let name = text(cell(raw, &cols.name)?);
    let description = text(cell(raw, &cols.description)?);

    Ok(StoreRecord {
        slug: slugify(&name),
        name,
        address: text(cell(raw, &cols.address)?),
        city: text(cell(raw, &cols.city)?),
        state: text(cell(raw, &cols.state)?),
        rating: number(cell(raw, &cols.rating)?).unwrap_or(0.0),
        review_count: count(cell(raw, &cols.review_count)?),
        description_paragraphs: format_description(&description),
        website: clean_url(&text(cell(raw, &cols.website)?)),
        phone: non_empty(text(cell(raw, &cols.phone)?)),
        photo: clean_url(&text(cell(raw, &cols.photo)?)),
        latitude: number(cell(raw, &cols.latitude)?),
        longitude: number(cell(raw, &cols.longitude)?),
        categories: split_list(&text(cell(raw, &cols.categories)?)),
        hours: non_empty(text(cell(raw, &cols.hours)?)),
    })
}

fn cell<'a>(raw: &'a RawRecord, column: &Option<String>) -> Result<Option<&'a Value>, RowError> {
    let Some(column) = column else {
        return Ok(None);
    };
    match raw.get(column) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(_) | Value::Object(_)) => Err(RowError::NotScalar {
            column: column.clone(),
        }),
        Some(v) => Ok(Some(v)),
    }
}

/// Display form of a scalar cell, trimmed. Integral floats lose their ".0"
/// so spreadsheet-typed phone numbers and zip codes read naturally.
pub fn text(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (None, Some(u), _) => u.to_string(),
            (None, None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

fn number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

/// Review counts: thousands separators allowed, fraction truncated,
/// anything unparseable or negative is zero.
fn count(value: Option<&Value>) -> u64 {
    let parsed = match value {
        Some(Value::String(s)) => s.trim().replace(',', "").parse::<f64>().ok(),
        other => number(other),
    };
    match parsed {
        Some(f) if f.is_finite() && f > 0.0 => f.trunc() as u64,
        _ => 0,
    }
}

/// Comma-separated list cell, entries trimmed, blanks dropped.
fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Split a description into display paragraphs.
///
/// Blank lines are explicit paragraph breaks. Otherwise single line breaks
/// are folded into spaces and sentences (split on ". ") are packed into a
/// paragraph until it has grown past `PARAGRAPH_CHARS`.
pub fn format_description(description: &str) -> Vec<String> {
    let description = description.trim();
    if description.is_empty() {
        return Vec::new();
    }

    if PARAGRAPH_BREAK_RE.is_match(description) {
        return PARAGRAPH_BREAK_RE
            .split(description)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
    }

    let description = LINE_BREAK_RE.replace_all(description, " ");
    let mut paragraphs = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut char_count = 0usize;

    for sentence in description.split(". ") {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        let mut sentence = sentence.to_string();
        if !sentence.ends_with('.') {
            sentence.push('.');
        }
        let len = sentence.chars().count();

        if char_count > PARAGRAPH_CHARS {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
            }
            current = vec![sentence];
            char_count = len;
        } else {
            current.push(sentence);
            char_count += len;
        }
    }

    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }
    paragraphs
}

/// Normalize a website or photo URL. Empty means "none".
pub fn clean_url(raw: &str) -> Option<String> {
    let url = raw.trim();
    if url.is_empty() {
        return None;
    }
    let url = if SCHEME_RE.is_match(url) {
        url.to_string()
    } else if let Some(rest) = url.strip_prefix("//") {
        format!("https://{rest}")
    } else {
        format!("https://{url}")
    };
    Some(url.replace(' ', "%20"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn default_columns() -> Columns {
        Columns {
            name: Some("name".into()),
            address: Some("address".into()),
            city: Some("city".into()),
            state: Some("state".into()),
            rating: Some("rating".into()),
            review_count: Some("review_count".into()),
            description: Some("description".into()),
            website: Some("website".into()),
            phone: Some("phone".into()),
            photo: Some("photo".into()),
            latitude: Some("latitude".into()),
            longitude: Some("longitude".into()),
            categories: Some("categories".into()),
            hours: Some("hours".into()),
        }
    }

    fn row(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn malformed_review_count_defaults_to_zero() {
        let raw = row(json!({
            "name": "A",
            "city": "Springfield",
            "state": "Illinois",
            "rating": "4.7",
            "review_count": "not-a-number",
            "description": ""
        }));
        let rec = sanitize(&raw, &default_columns()).unwrap();
        assert_eq!(rec.rating, 4.7);
        assert_eq!(rec.review_count, 0);
        assert!(rec.description_paragraphs.is_empty());
        assert_eq!(rec.slug, "a");
        assert_eq!(rec.website, None);
        assert_eq!(rec.phone, None);
        assert_eq!(rec.address, "");
    }

    #[test]
    fn strings_are_trimmed_and_numbers_stringified() {
        let raw = row(json!({
            "name": "  Second Act  ",
            "city": " Austin ",
            "state": "Texas",
            "phone": 5125550100.0,
            "rating": 4,
            "review_count": 12.9
        }));
        let rec = sanitize(&raw, &default_columns()).unwrap();
        assert_eq!(rec.name, "Second Act");
        assert_eq!(rec.city, "Austin");
        assert_eq!(rec.phone.as_deref(), Some("5125550100"));
        assert_eq!(rec.rating, 4.0);
        assert_eq!(rec.review_count, 12);
    }

    #[test]
    fn review_count_handles_separators_and_negatives() {
        let cols = default_columns();
        let rec = sanitize(&row(json!({"review_count": "1,234"})), &cols).unwrap();
        assert_eq!(rec.review_count, 1234);
        let rec = sanitize(&row(json!({"review_count": -5})), &cols).unwrap();
        assert_eq!(rec.review_count, 0);
        let rec = sanitize(&row(json!({"review_count": "NaN"})), &cols).unwrap();
        assert_eq!(rec.review_count, 0);
    }

    #[test]
    fn non_finite_rating_defaults() {
        let rec = sanitize(&row(json!({"rating": "inf"})), &default_columns()).unwrap();
        assert_eq!(rec.rating, 0.0);
    }

    #[test]
    fn structured_cell_fails_the_row() {
        let raw = row(json!({"name": "A", "rating": [4.5]}));
        assert_eq!(
            sanitize(&raw, &default_columns()),
            Err(RowError::NotScalar {
                column: "rating".into()
            })
        );
    }

    #[test]
    fn unmapped_columns_read_as_missing() {
        let raw = row(json!({"name": "A", "Photo": "x.jpg"}));
        let rec = sanitize(&raw, &Columns::default()).unwrap();
        assert_eq!(rec.name, "");
        assert_eq!(rec.photo, None);
    }

    #[test]
    fn coordinates_need_both_axes() {
        let cols = default_columns();
        let located = row(json!({"latitude": "39.78", "longitude": -89.65}));
        let rec = sanitize(&located, &cols).unwrap();
        assert_eq!(rec.coordinates(), Some((39.78, -89.65)));
        let half = row(json!({"latitude": "39.78", "longitude": ""}));
        let rec = sanitize(&half, &cols).unwrap();
        assert_eq!(rec.coordinates(), None);
    }

    #[test]
    fn urls_get_scheme_and_encoded_spaces() {
        assert_eq!(clean_url(""), None);
        assert_eq!(clean_url("   "), None);
        assert_eq!(
            clean_url(" example.com/my shop "),
            Some("https://example.com/my%20shop".into())
        );
        assert_eq!(clean_url("http://a.com"), Some("http://a.com".into()));
        assert_eq!(clean_url("HTTPS://a.com"), Some("HTTPS://a.com".into()));
        assert_eq!(
            clean_url("//cdn.example.com/p.jpg"),
            Some("https://cdn.example.com/p.jpg".into())
        );
    }

    #[test]
    fn blank_lines_make_paragraphs() {
        let paras = format_description("First part.\n\n  Second part.\nThird.\n \n\nLast.");
        assert_eq!(paras, vec!["First part.", "Second part.\nThird.", "Last."]);
    }

    #[test]
    fn wrapped_line_stays_in_one_paragraph() {
        let paras =
            format_description("Family owned since 1990 and\nstill going strong. Come visit");
        assert_eq!(paras, vec!["Family owned since 1990 and still going strong. Come visit."]);
    }

    #[test]
    fn categories_split_and_hours_kept() {
        let raw = row(json!({
            "name": "A",
            "categories": " Clothing, Furniture ,, Books ",
            "hours": " Mon-Sat 10-6 "
        }));
        let rec = sanitize(&raw, &default_columns()).unwrap();
        assert_eq!(rec.categories, vec!["Clothing", "Furniture", "Books"]);
        assert_eq!(rec.hours.as_deref(), Some("Mon-Sat 10-6"));

        let rec = sanitize(&row(json!({"name": "B"})), &default_columns()).unwrap();
        assert!(rec.categories.is_empty());
        assert_eq!(rec.hours, None);
    }

    #[test]
    fn short_description_is_one_paragraph() {
        let paras = format_description("Great store. Friendly staff");
        assert_eq!(paras, vec!["Great store. Friendly staff."]);
    }

    #[test]
    fn long_description_splits_after_threshold() {
        let sentence = "x".repeat(99);
        let text = vec![sentence.as_str(); 5].join(". ");
        let paras = format_description(&text);
        // 100 + 100 + 100 passes 250, so the fourth sentence starts a new paragraph.
        assert_eq!(paras.len(), 2);
        assert_eq!(paras[0].matches('.').count(), 3);
        assert_eq!(paras[1].matches('.').count(), 2);
        assert!(paras.iter().all(|p| p.ends_with('.')));
    }

    #[test]
    fn blank_sentences_are_skipped() {
        let paras = format_description("One. . Two.");
        assert_eq!(paras, vec!["One. Two."]);
    }
}
