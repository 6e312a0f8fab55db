//! Lenient field decoders for request bodies written by the SPA.
//!
//! Form inputs arrive as numbers or numeric strings, and clearing an input
//! sends `""` or `null`. Use these with `#[serde(default, deserialize_with)]`
//! so a missing key stays `None`.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer, de::Error};
use uuid::Uuid;

use crate::{error::AppError, ledger::parse_date};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// `12.5`, `"12.5"` → `Some(12.5)`; `""`, `null` → `None`.
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::Number(value)) => Ok(Some(value)),
        Some(NumberOrString::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<f64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid number '{text}'")))
        }
        None => Ok(None),
    }
}

/// Present keys become `Some(..)`; `null` and `""` become `Some(None)`.
pub fn nullable_number<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    number(deserializer).map(Some)
}

/// `""` and `null` → `None`.
pub fn uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => Uuid::parse_str(text.trim())
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid id '{text}'"))),
        None => Ok(None),
    }
}

pub fn nullable_uuid<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    uuid(deserializer).map(Some)
}

/// `?today=YYYY-MM-DD`, defaulting to the current UTC date.
pub fn reference_date(raw: Option<&str>) -> Result<NaiveDate, AppError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Ok(parse_date(value)?),
        None => Ok(Utc::now().date_naive()),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use uuid::Uuid;

    use super::{nullable_number, nullable_uuid, number, reference_date};
    use crate::error::AppError;

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Body {
        #[serde(default, deserialize_with = "number")]
        rate: Option<f64>,
        #[serde(default, deserialize_with = "nullable_number")]
        project_rate: Option<Option<f64>>,
        #[serde(default, deserialize_with = "nullable_uuid")]
        project_id: Option<Option<Uuid>>,
    }

    fn parse(json: &str) -> Body {
        serde_json::from_str(json).expect("body should parse")
    }

    #[test]
    fn numbers_accept_numeric_strings() {
        assert_eq!(parse(r#"{"rate": 12.5}"#).rate, Some(12.5));
        assert_eq!(parse(r#"{"rate": " 200 "}"#).rate, Some(200.0));
        assert_eq!(parse(r#"{"rate": ""}"#).rate, None);
        assert!(serde_json::from_str::<Body>(r#"{"rate": "ten"}"#).is_err());
    }

    #[test]
    fn nullable_fields_tell_missing_from_cleared() {
        let body = parse("{}");
        assert_eq!(body.project_rate, None);
        assert_eq!(body.project_id, None);

        let body = parse(r#"{"projectRate": null, "projectId": ""}"#);
        assert_eq!(body.project_rate, Some(None));
        assert_eq!(body.project_id, Some(None));

        let id = Uuid::new_v4();
        let body = parse(&format!(r#"{{"projectRate": "95", "projectId": "{id}"}}"#));
        assert_eq!(body.project_rate, Some(Some(95.0)));
        assert_eq!(body.project_id, Some(Some(id)));
    }

    #[test]
    fn reference_date_rejects_garbage() {
        assert!(matches!(
            reference_date(Some("yesterday")),
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(
            reference_date(Some("2026-03-15")).expect("valid date").to_string(),
            "2026-03-15"
        );
    }
}
