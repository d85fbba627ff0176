//! Schema validation for incoming book payloads.
//!
//! This is the boundary between untrusted request data (`serde_json::Value`)
//! and the typed [`Book`] record. Validation never short-circuits: every
//! invalid or missing field is reported in one pass.

use serde::Serialize;
use serde_json::{Map, Value};

use super::models::Book;

/// Validation mode. Create takes `isbn` from the body; update takes it from
/// the URL path and ignores any `isbn` in the body.
#[derive(Debug, Clone, Copy)]
pub enum Mode<'a> {
    Create,
    Update { isbn: &'a str },
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub reason: String,
}

impl Violation {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate a candidate payload and normalize it into a [`Book`].
///
/// Unknown extra fields are ignored. On failure the returned list names
/// every offending field.
pub fn validate(candidate: &Value, mode: Mode<'_>) -> Result<Book, Vec<Violation>> {
    let Some(map) = candidate.as_object() else {
        return Err(vec![Violation::new("body", "must be a JSON object")]);
    };

    let mut violations = Vec::new();

    let isbn = match mode {
        Mode::Create => string_field(map, "isbn", &mut violations),
        Mode::Update { isbn } => Some(isbn.to_string()),
    };
    let amazon_url = url_field(map, "amazon_url", &mut violations);
    let author = string_field(map, "author", &mut violations);
    let language = string_field(map, "language", &mut violations);
    let pages = positive_int_field(map, "pages", &mut violations);
    let publisher = string_field(map, "publisher", &mut violations);
    let title = string_field(map, "title", &mut violations);
    let year = int_field(map, "year", &mut violations);

    match (
        isbn, amazon_url, author, language, pages, publisher, title, year,
    ) {
        (
            Some(isbn),
            Some(amazon_url),
            Some(author),
            Some(language),
            Some(pages),
            Some(publisher),
            Some(title),
            Some(year),
        ) if violations.is_empty() => Ok(Book {
            isbn,
            amazon_url,
            author,
            language,
            pages,
            publisher,
            title,
            year,
        }),
        _ => Err(violations),
    }
}

fn string_field(
    map: &Map<String, Value>,
    field: &'static str,
    violations: &mut Vec<Violation>,
) -> Option<String> {
    match map.get(field) {
        None | Some(Value::Null) => {
            violations.push(Violation::new(field, "is required"));
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            violations.push(Violation::new(field, "must not be empty"));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            violations.push(Violation::new(field, "must be a string"));
            None
        }
    }
}

fn url_field(
    map: &Map<String, Value>,
    field: &'static str,
    violations: &mut Vec<Violation>,
) -> Option<String> {
    let value = string_field(map, field, violations)?;
    if value.starts_with("http://") || value.starts_with("https://") {
        Some(value)
    } else {
        violations.push(Violation::new(field, "must be an http(s) URL"));
        None
    }
}

fn int_field(
    map: &Map<String, Value>,
    field: &'static str,
    violations: &mut Vec<Violation>,
) -> Option<i32> {
    match map.get(field) {
        None | Some(Value::Null) => {
            violations.push(Violation::new(field, "is required"));
            None
        }
        Some(Value::Number(n)) => match n.as_i64().and_then(|v| i32::try_from(v).ok()) {
            Some(v) => Some(v),
            None => {
                violations.push(Violation::new(field, "must be an integer"));
                None
            }
        },
        Some(_) => {
            violations.push(Violation::new(field, "must be an integer"));
            None
        }
    }
}

fn positive_int_field(
    map: &Map<String, Value>,
    field: &'static str,
    violations: &mut Vec<Violation>,
) -> Option<i32> {
    let value = int_field(map, field, violations)?;
    if value > 0 {
        Some(value)
    } else {
        violations.push(Violation::new(field, "must be greater than zero"));
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate() -> Value {
        json!({
            "isbn": "0691161518",
            "amazon_url": "http://a.co/eobPtX2",
            "author": "Matthew Lane",
            "language": "english",
            "pages": 264,
            "publisher": "Princeton University Press",
            "title": "Power-Up",
            "year": 2017
        })
    }

    fn fields_of(violations: &[Violation]) -> Vec<&'static str> {
        violations.iter().map(|v| v.field).collect()
    }

    #[test]
    fn valid_create_payload_normalizes() {
        let book = validate(&candidate(), Mode::Create).unwrap();
        assert_eq!(book.isbn, "0691161518");
        assert_eq!(book.pages, 264);
        assert_eq!(book.year, 2017);
        assert_eq!(book.title, "Power-Up");
    }

    #[test]
    fn create_requires_isbn_from_body() {
        let mut payload = candidate();
        payload.as_object_mut().unwrap().remove("isbn");

        let violations = validate(&payload, Mode::Create).unwrap_err();
        assert_eq!(fields_of(&violations), vec!["isbn"]);
    }

    #[test]
    fn update_takes_isbn_from_path_and_ignores_body() {
        let mut payload = candidate();
        payload["isbn"] = json!("9999999999");

        let book = validate(&payload, Mode::Update { isbn: "0691161518" }).unwrap();
        assert_eq!(book.isbn, "0691161518");
    }

    #[test]
    fn all_missing_fields_are_reported_in_one_pass() {
        let mut payload = candidate();
        {
            let map = payload.as_object_mut().unwrap();
            map.remove("author");
            map.remove("pages");
            map.remove("title");
        }

        let violations = validate(&payload, Mode::Create).unwrap_err();
        let fields = fields_of(&violations);
        assert!(fields.contains(&"author"));
        assert!(fields.contains(&"pages"));
        assert!(fields.contains(&"title"));
        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn wrong_typed_fields_are_reported() {
        let mut payload = candidate();
        payload["language"] = json!(5);
        payload["pages"] = json!("264");

        let violations = validate(&payload, Mode::Create).unwrap_err();
        let fields = fields_of(&violations);
        assert!(fields.contains(&"language"));
        assert!(fields.contains(&"pages"));
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn empty_strings_are_rejected() {
        let mut payload = candidate();
        payload["publisher"] = json!("   ");

        let violations = validate(&payload, Mode::Create).unwrap_err();
        assert_eq!(fields_of(&violations), vec!["publisher"]);
        assert_eq!(violations[0].reason, "must not be empty");
    }

    #[test]
    fn pages_must_be_positive() {
        let mut payload = candidate();
        payload["pages"] = json!(0);

        let violations = validate(&payload, Mode::Create).unwrap_err();
        assert_eq!(fields_of(&violations), vec!["pages"]);
    }

    #[test]
    fn fractional_numbers_are_not_integers() {
        let mut payload = candidate();
        payload["year"] = json!(2017.5);

        let violations = validate(&payload, Mode::Create).unwrap_err();
        assert_eq!(fields_of(&violations), vec!["year"]);
        assert_eq!(violations[0].reason, "must be an integer");
    }

    #[test]
    fn unknown_extra_fields_are_ignored() {
        let mut payload = candidate();
        payload["series"] = json!("none");

        assert!(validate(&payload, Mode::Create).is_ok());
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        let violations = validate(&json!([1, 2, 3]), Mode::Create).unwrap_err();
        assert_eq!(fields_of(&violations), vec!["body"]);
    }
}
