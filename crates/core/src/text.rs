//! Free-text input helpers.

use serde::{Deserialize, Deserializer};

/// Normalise an optional free-text field: trims, and maps blank to `None`.
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Normalise a clearable patch field. An absent field stays absent; a
/// present one is trimmed, and a blank value becomes an explicit clear.
pub fn normalize_clearable(value: Option<Option<String>>) -> Option<Option<String>> {
    value.map(|inner| normalize_optional(inner.as_deref()))
}

/// Deserialize a field that distinguishes "absent" from "explicitly null".
///
/// Use with `#[serde(default, deserialize_with = "deserialize_clearable")]`:
/// a missing key yields `None` through `default`, `null` yields
/// `Some(None)`, and a value yields `Some(Some(v))`.
pub fn deserialize_clearable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_clearable")]
        notes: Option<Option<String>>,
    }

    #[test]
    fn blank_optional_becomes_none() {
        assert_eq!(normalize_optional(Some("   ")), None);
        assert_eq!(normalize_optional(Some(" 555-0100 ")), Some("555-0100".into()));
        assert_eq!(normalize_optional(None), None);
    }

    #[test]
    fn clearable_distinguishes_absent_null_and_value() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        let value: Patch = serde_json::from_str(r#"{"notes": "call back"}"#).unwrap();

        assert_eq!(absent.notes, None);
        assert_eq!(null.notes, Some(None));
        assert_eq!(value.notes, Some(Some("call back".into())));
    }

    #[test]
    fn blank_clearable_becomes_explicit_clear() {
        assert_eq!(normalize_clearable(None), None);
        assert_eq!(normalize_clearable(Some(None)), Some(None));
        assert_eq!(normalize_clearable(Some(Some("  ".into()))), Some(None));
        assert_eq!(
            normalize_clearable(Some(Some(" mornings ".into()))),
            Some(Some("mornings".into()))
        );
    }
}
