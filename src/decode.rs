//! Field decoding policy for NASA API payloads.
//!
//! Every field the client reads is addressed by a JSON pointer listed here and
//! decoded by one of the typed accessors below. The policy is the same for all
//! of them:
//!
//! | JSON value              | Result                          |
//! |-------------------------|---------------------------------|
//! | absent or `null`        | `Ok(None)`, caller applies default |
//! | expected type           | `Ok(Some(value))`               |
//! | numeric/bool as string  | parsed, `Unparsable` on failure |
//! | anything else           | `FieldError::WrongType`         |
//!
//! Defaults for absent fields live next to the pointers so the whole table can
//! be read in one place.

use crate::error::FieldError;
use chrono::NaiveDate;
use serde_json::Value;

// Feed entry fields (relative to one asteroid object).
pub const NEO_ID: &str = "/id";
pub const NEO_NAME: &str = "/name";
pub const NEO_DIAMETER_MAX_KM: &str = "/estimated_diameter/kilometers/estimated_diameter_max";
pub const NEO_HAZARDOUS: &str = "/is_potentially_hazardous_asteroid";
// Only the first close-approach event is read.
pub const NEO_APPROACH_DATE: &str = "/close_approach_data/0/close_approach_date";
pub const NEO_MISS_DISTANCE_KM: &str = "/close_approach_data/0/miss_distance/kilometers";
pub const NEO_ORBITING_BODY: &str = "/close_approach_data/0/orbiting_body";

// Picture-of-the-day fields.
pub const APOD_COPYRIGHT: &str = "/copyright";
pub const APOD_DATE: &str = "/date";
pub const APOD_EXPLANATION: &str = "/explanation";
pub const APOD_HD_URL: &str = "/hdurl";
pub const APOD_MEDIA_TYPE: &str = "/media_type";
pub const APOD_SERVICE_VERSION: &str = "/service_version";
pub const APOD_TITLE: &str = "/title";
pub const APOD_URL: &str = "/url";

// Defaults for absent fields.
pub const DEFAULT_TEXT: &str = "";
pub const DEFAULT_DIAMETER_KM: f64 = 0.0;
pub const DEFAULT_HAZARDOUS: bool = false;
pub const DEFAULT_MISS_DISTANCE_KM: f64 = 0.0;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn lookup<'a>(value: &'a Value, pointer: &str) -> Option<&'a Value> {
    value.pointer(pointer).filter(|v| !v.is_null())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reads a number. Numeric strings (the feed sends miss distances that way) are parsed.
pub fn number(value: &Value, pointer: &'static str) -> Result<Option<f64>, FieldError> {
    match lookup(value, pointer) {
        None => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or(FieldError::Unparsable {
            pointer,
            expected: "number",
            value: n.to_string(),
        }),
        Some(Value::String(s)) => {
            match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Some(n)),
                // NaN and infinities parse but are not usable measurements.
                _ => Err(FieldError::Unparsable {
                    pointer,
                    expected: "number",
                    value: s.clone(),
                }),
            }
        }
        Some(other) => Err(FieldError::WrongType {
            pointer,
            expected: "number",
            found: type_name(other),
        }),
    }
}

pub fn flag(value: &Value, pointer: &'static str) -> Result<Option<bool>, FieldError> {
    match lookup(value, pointer) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(FieldError::Unparsable {
                pointer,
                expected: "boolean",
                value: s.clone(),
            }),
        },
        Some(other) => Err(FieldError::WrongType {
            pointer,
            expected: "boolean",
            found: type_name(other),
        }),
    }
}

/// Reads a scalar as text. Numbers and booleans are rendered with their JSON form.
pub fn text(value: &Value, pointer: &'static str) -> Result<Option<String>, FieldError> {
    match lookup(value, pointer) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(v.to_string())),
        Some(other) => Err(FieldError::WrongType {
            pointer,
            expected: "string",
            found: type_name(other),
        }),
    }
}

/// Reads a `YYYY-MM-DD` date. Anything after the first ten characters (a time
/// component) is ignored.
pub fn date(value: &Value, pointer: &'static str) -> Result<Option<NaiveDate>, FieldError> {
    let Some(raw) = text(value, pointer)? else {
        return Ok(None);
    };
    let day = raw.trim();
    let day = day.get(..10).unwrap_or(day);
    NaiveDate::parse_from_str(day, DATE_FORMAT)
        .map(Some)
        .map_err(|_| FieldError::Unparsable {
            pointer,
            expected: "date",
            value: raw,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_and_null_fields_are_none() {
        let v = json!({ "name": null });
        assert_eq!(text(&v, NEO_NAME), Ok(None));
        assert_eq!(number(&v, NEO_DIAMETER_MAX_KM), Ok(None));
        assert_eq!(flag(&v, NEO_HAZARDOUS), Ok(None));
        assert_eq!(date(&v, NEO_APPROACH_DATE), Ok(None));
    }

    #[test]
    fn numbers_accept_numeric_strings() {
        let v = json!({ "close_approach_data": [{ "miss_distance": { "kilometers": "1234.5" } }] });
        assert_eq!(number(&v, NEO_MISS_DISTANCE_KM), Ok(Some(1234.5)));

        let bad = json!({ "close_approach_data": [{ "miss_distance": { "kilometers": "far" } }] });
        assert!(matches!(
            number(&bad, NEO_MISS_DISTANCE_KM),
            Err(FieldError::Unparsable { .. })
        ));
    }

    #[test]
    fn non_finite_numeric_strings_are_rejected() {
        for raw in ["NaN", "inf", "-infinity"] {
            let v = json!({ "close_approach_data": [{ "miss_distance": { "kilometers": raw } }] });
            assert!(
                matches!(number(&v, NEO_MISS_DISTANCE_KM), Err(FieldError::Unparsable { .. })),
                "{raw} should not decode"
            );
        }
    }

    #[test]
    fn wrong_type_is_reported_with_pointer() {
        let v = json!({ "is_potentially_hazardous_asteroid": [1, 2] });
        assert_eq!(
            flag(&v, NEO_HAZARDOUS),
            Err(FieldError::WrongType {
                pointer: NEO_HAZARDOUS,
                expected: "boolean",
                found: "array",
            })
        );
    }

    #[test]
    fn text_renders_numeric_ids() {
        let v = json!({ "id": 3542519 });
        assert_eq!(text(&v, NEO_ID), Ok(Some("3542519".to_string())));
    }

    #[test]
    fn dates_ignore_trailing_time() {
        let v = json!({ "date": "2023-07-04T10:00:00" });
        assert_eq!(date(&v, APOD_DATE), Ok(NaiveDate::from_ymd_opt(2023, 7, 4)));

        let bad = json!({ "date": "July 4th" });
        assert!(date(&bad, APOD_DATE).is_err());
    }
}
