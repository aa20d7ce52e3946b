//! Lenient field decoders for the backend's JSON payloads.
//!
//! A single malformed record must never sink a whole snapshot, so numbers,
//! ids, labels and timestamps fall back to zero / "absent" instead of
//! surfacing an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Integer(i64),
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawList {
    Items(Vec<RawScalar>),
    Other(IgnoredAny),
}

/// Treats `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawScalar>::deserialize(deserializer)?;
    Ok(raw.and_then(scalar_to_number).unwrap_or(0.0))
}

pub(crate) fn lenient_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawScalar>::deserialize(deserializer)?;
    Ok(raw.and_then(scalar_to_number))
}

/// Whole numbers given as numbers or numeric strings. Fractions, overflow
/// and anything else decode as absent.
pub(crate) fn lenient_optional_integer<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let raw = Option::<RawScalar>::deserialize(deserializer)?;
    Ok(raw
        .and_then(scalar_to_integer)
        .and_then(|value| T::try_from(value).ok()))
}

/// Free text; numbers are kept in their printed form.
pub(crate) fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawScalar>::deserialize(deserializer)?;
    Ok(raw.and_then(scalar_to_text))
}

pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_optional_text(deserializer).map(Option::unwrap_or_default)
}

/// Labels backed by a `From<String>` enum. Unreadable values use the default.
pub(crate) fn lenient_label<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<String> + Default,
{
    lenient_optional_text(deserializer).map(|text| text.map(T::from).unwrap_or_default())
}

/// A list of labels. Unreadable entries are skipped; a non-list is empty.
pub(crate) fn lenient_text_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawList>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawList::Items(items)) => items.into_iter().filter_map(scalar_to_text).collect(),
        _ => BTreeSet::new(),
    })
}

pub(crate) fn lenient_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawScalar>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawScalar::Text(text)) => parse_timestamp(&text),
        Some(RawScalar::Integer(millis)) => DateTime::from_timestamp_millis(millis),
        Some(RawScalar::Number(millis)) if millis.is_finite() => {
            DateTime::from_timestamp_millis(millis as i64)
        }
        _ => None,
    })
}

fn scalar_to_number(raw: RawScalar) -> Option<f64> {
    let value = match raw {
        RawScalar::Integer(value) => value as f64,
        RawScalar::Number(value) => value,
        RawScalar::Text(text) => text.trim().parse::<f64>().ok()?,
        RawScalar::Other(_) => return None,
    };
    value.is_finite().then_some(value)
}

fn scalar_to_integer(raw: RawScalar) -> Option<i64> {
    match raw {
        RawScalar::Integer(value) => Some(value),
        RawScalar::Number(value) => {
            let whole = value.is_finite()
                && value.fract() == 0.0
                && value >= i64::MIN as f64
                && value < i64::MAX as f64;
            whole.then_some(value as i64)
        }
        RawScalar::Text(text) => text.trim().parse::<i64>().ok(),
        RawScalar::Other(_) => None,
    }
}

fn scalar_to_text(raw: RawScalar) -> Option<String> {
    match raw {
        RawScalar::Integer(value) => Some(value.to_string()),
        RawScalar::Number(value) => Some(value.to_string()),
        RawScalar::Text(text) => Some(text),
        RawScalar::Other(_) => None,
    }
}

/// Parses the timestamp shapes the backend and the dashboard forms emit.
/// Values without an offset are read as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "lenient_number")]
        amount: f64,
        #[serde(default, deserialize_with = "lenient_timestamp")]
        at: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "lenient_optional_integer")]
        year: Option<i32>,
        #[serde(default, deserialize_with = "lenient_optional_integer")]
        id: Option<i64>,
        #[serde(default, deserialize_with = "lenient_optional_text")]
        note: Option<String>,
        #[serde(default, deserialize_with = "lenient_text_set")]
        tags: BTreeSet<String>,
    }

    fn fields(value: serde_json::Value) -> Fields {
        serde_json::from_value(value).expect("fields decode")
    }

    #[test]
    fn numbers_fall_back_to_zero() {
        assert_eq!(fields(json!({ "amount": 125.5 })).amount, 125.5);
        assert_eq!(fields(json!({ "amount": " 80 " })).amount, 80.0);
        assert_eq!(fields(json!({ "amount": "n/a" })).amount, 0.0);
        assert_eq!(fields(json!({ "amount": null })).amount, 0.0);
        assert_eq!(fields(json!({ "amount": true })).amount, 0.0);
        assert_eq!(fields(json!({ "amount": "NaN" })).amount, 0.0);
        assert_eq!(fields(json!({})).amount, 0.0);
    }

    #[test]
    fn timestamps_accept_common_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(fields(json!({ "at": "2024-03-01" })).at, Some(expected));
        assert_eq!(
            fields(json!({ "at": "2024-03-01T00:00:00.000Z" })).at,
            Some(expected)
        );
        assert_eq!(
            fields(json!({ "at": "2024-03-01T00:00:00" })).at,
            Some(expected)
        );
        assert_eq!(
            fields(json!({ "at": "2024-02-29T19:00:00-05:00" })).at,
            Some(expected)
        );
        assert_eq!(
            fields(json!({ "at": expected.timestamp_millis() })).at,
            Some(expected)
        );
    }

    #[test]
    fn unreadable_timestamps_are_absent() {
        assert_eq!(fields(json!({ "at": "yesterday" })).at, None);
        assert_eq!(fields(json!({ "at": "" })).at, None);
        assert_eq!(fields(json!({ "at": null })).at, None);
        assert_eq!(fields(json!({ "at": [] })).at, None);
    }

    #[test]
    fn integers_accept_numeric_strings() {
        assert_eq!(fields(json!({ "year": 2021 })).year, Some(2021));
        assert_eq!(fields(json!({ "year": "2021" })).year, Some(2021));
        assert_eq!(fields(json!({ "year": 2021.0 })).year, Some(2021));
        assert_eq!(fields(json!({ "id": " 7 " })).id, Some(7));
    }

    #[test]
    fn unreadable_integers_are_absent() {
        assert_eq!(fields(json!({ "year": "dos mil" })).year, None);
        assert_eq!(fields(json!({ "year": 2021.5 })).year, None);
        assert_eq!(fields(json!({ "year": 3_000_000_000_i64 })).year, None);
        assert_eq!(fields(json!({ "year": {} })).year, None);
        assert_eq!(fields(json!({ "id": null })).id, None);
    }

    #[test]
    fn text_keeps_numbers_and_drops_structures() {
        assert_eq!(fields(json!({ "note": 42 })).note.as_deref(), Some("42"));
        assert_eq!(fields(json!({ "note": "Frenos" })).note.as_deref(), Some("Frenos"));
        assert_eq!(fields(json!({ "note": ["Frenos"] })).note, None);
    }

    #[test]
    fn text_sets_skip_unreadable_entries() {
        let tags = fields(json!({ "tags": ["frenos", null, 12, {}] })).tags;
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec!["12", "frenos"]);
        assert!(fields(json!({ "tags": "frenos" })).tags.is_empty());
        assert!(fields(json!({ "tags": null })).tags.is_empty());
    }
}
