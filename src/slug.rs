use serde_json::Value;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Turn a display name into a URL-safe identifier.
///
/// Lowercase ASCII letters and digits separated by single hyphens; accented
/// letters are transliterated, apostrophes vanish, everything else becomes a
/// separator. Empty input gives an empty slug.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.nfkd().filter(|c| !is_combining_mark(*c)) {
        if matches!(ch, '\'' | '\u{2019}' | '\u{2018}') {
            continue;
        }
        if ch.is_ascii_alphanumeric() {
            let mut buf = [0; 4];
            let part = ch.to_ascii_lowercase().encode_utf8(&mut buf);
            push_part(&mut out, &mut pending_dash, part);
            continue;
        }
        match transliterate(ch) {
            Some(repl) => push_part(&mut out, &mut pending_dash, repl),
            None => pending_dash = true,
        }
    }

    out
}

/// Slug for a loosely typed cell: null slugs to "", numbers and booleans
/// slug their display form.
pub fn slugify_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => slugify(s),
        Value::Bool(b) => slugify(if *b { "true" } else { "false" }),
        Value::Number(n) => slugify(&n.to_string()),
        // Structured values have no meaningful display name.
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}

fn push_part(out: &mut String, pending_dash: &mut bool, part: &str) {
    if *pending_dash && !out.is_empty() {
        out.push('-');
    }
    out.push_str(part);
    *pending_dash = false;
}

/// Letters that survive NFKD decomposition as non-ASCII.
fn transliterate(ch: char) -> Option<&'static str> {
    let repl = match ch {
        'ß' => "ss",
        'æ' | 'Æ' => "ae",
        'œ' | 'Œ' => "oe",
        'ø' | 'Ø' => "o",
        'ł' | 'Ł' => "l",
        'đ' | 'Đ' | 'ð' | 'Ð' => "d",
        'þ' | 'Þ' => "th",
        'ı' => "i",
        _ => return None,
    };
    Some(repl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lowercases_and_collapses_separators() {
        assert_eq!(slugify("Second Chance Consignment"), "second-chance-consignment");
        assert_eq!(slugify("  Hello---World!! "), "hello-world");
        assert_eq!(slugify("St. Louis"), "st-louis");
        assert_eq!(slugify("Winston-Salem"), "winston-salem");
    }

    #[test]
    fn strips_apostrophes_without_separator() {
        assert_eq!(slugify("Bob's Resale"), "bobs-resale");
        assert_eq!(slugify("Coeur d’Alene"), "coeur-dalene");
    }

    #[test]
    fn transliterates_accents() {
        assert_eq!(slugify("Café Élégance"), "cafe-elegance");
        assert_eq!(slugify("Straße"), "strasse");
        assert_eq!(slugify("Ærø Bøtik"), "aero-botik");
        assert_eq!(slugify("Española"), "espanola");
    }

    #[test]
    fn empty_and_symbol_only_input_gives_empty_slug() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("日本"), "");
    }

    #[test]
    fn values_slug_their_display_form() {
        assert_eq!(slugify_value(&Value::Null), "");
        assert_eq!(slugify_value(&json!("New York")), "new-york");
        assert_eq!(slugify_value(&json!(12)), "12");
        assert_eq!(slugify_value(&json!(4.5)), "4-5");
        assert_eq!(slugify_value(&json!(true)), "true");
        assert_eq!(slugify_value(&json!({"a": 1})), "");
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "Plain Ascii Name",
            "Café Élégance & Co.",
            "Mother's -- Closet!!",
            "",
            "   ",
            "Straße 9½",
            "ÆØÅ",
        ];
        for input in inputs {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "input {input:?}");
        }
        let once = slugify_value(&Value::Null);
        assert_eq!(slugify(&once), once);
    }
}
