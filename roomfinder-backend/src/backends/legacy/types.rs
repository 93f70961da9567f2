//! Legacy PHP API types
//!
//! The PHP endpoints send numbers as strings (`"price": "25000"`) and use
//! `"1"`/`"0"` for booleans, so most fields go through the `flex_*` helpers.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Response envelope shared by every `*.php` endpoint.
///
/// The payload sits next to the status fields under an endpoint-specific key.
#[derive(Debug, Deserialize)]
pub struct LegacyEnvelope {
    #[serde(rename = "Result", deserialize_with = "flex_string")]
    pub result: String,
    #[serde(rename = "ResponseCode", default, deserialize_with = "flex_string")]
    pub response_code: String,
    #[serde(rename = "ResponseMsg", default)]
    pub response_msg: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl LegacyEnvelope {
    pub fn is_success(&self) -> bool {
        self.result.eq_ignore_ascii_case("true")
    }
}

#[derive(Debug, Deserialize)]
pub struct LegacyProperty {
    #[serde(deserialize_with = "flex_string")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "property_title")]
    pub property_type: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(deserialize_with = "flex_f64")]
    pub price: f64,
    #[serde(default, rename = "plimit", deserialize_with = "flex_opt_u32")]
    pub person_limit: Option<u32>,
    #[serde(default, rename = "beds", deserialize_with = "flex_opt_u32")]
    pub bedrooms: Option<u32>,
    #[serde(default, rename = "bathroom", deserialize_with = "flex_opt_u32")]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default, rename = "facility_select")]
    pub facilities: Option<String>,
    #[serde(default, rename = "add_user_id", deserialize_with = "flex_opt_string")]
    pub owner_id: Option<String>,
    #[serde(default, rename = "rate", deserialize_with = "flex_opt_f64")]
    pub rating: Option<f64>,
    #[serde(default, rename = "total_review", deserialize_with = "flex_opt_u32")]
    pub review_count: Option<u32>,
    #[serde(default = "available", deserialize_with = "flex_bool")]
    pub status: bool,
}

fn available() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct LegacyReview {
    #[serde(deserialize_with = "flex_string")]
    pub id: String,
    #[serde(default, deserialize_with = "flex_opt_string")]
    pub pid: Option<String>,
    #[serde(default, rename = "user_title")]
    pub user_name: Option<String>,
    #[serde(rename = "user_rate", deserialize_with = "flex_f64")]
    pub rating: f64,
    #[serde(default, rename = "user_desc")]
    pub comment: String,
    #[serde(default, rename = "review_date")]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LegacyNotification {
    #[serde(deserialize_with = "flex_string")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "flex_bool")]
    pub is_read: bool,
    #[serde(default)]
    pub datetime: Option<String>,
}

// ============ Flexible scalars ============

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn flex_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(value_to_string(Value::deserialize(d)?).unwrap_or_default())
}

fn flex_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(value_to_string(Value::deserialize(d)?).filter(|s| !s.is_empty()))
}

fn flex_opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    use serde::de::Error;
    match Value::deserialize(d)? {
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid number: {s}"))),
        Value::Null => Ok(None),
        other => Err(D::Error::custom(format!("invalid number: {other}"))),
    }
}

fn flex_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(flex_opt_f64(d)?.unwrap_or_default())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn flex_opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(flex_opt_f64(d)?
        .filter(|n| *n >= 0.0)
        .map(|n| n.min(f64::from(u32::MAX)) as u32))
}

fn flex_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_keeps_payload_keys() {
        let json = r#"{"Result":"true","ResponseCode":"200","ResponseMsg":"ok","reviewlist":[]}"#;
        let env: LegacyEnvelope = serde_json::from_str(json).unwrap();
        assert!(env.is_success());
        assert!(env.payload.contains_key("reviewlist"));
    }

    #[test]
    fn numeric_response_code_accepted() {
        let json = r#"{"Result":"false","ResponseCode":401,"ResponseMsg":"User not found"}"#;
        let env: LegacyEnvelope = serde_json::from_str(json).unwrap();
        assert!(!env.is_success());
        assert_eq!(env.response_code, "401");
    }

    #[test]
    fn property_with_string_numbers() {
        let json = r#"{
            "id": 12, "title": "Villa Kribi", "price": "85000", "plimit": "6",
            "beds": 3, "bathroom": "", "rate": "4.5", "status": "1"
        }"#;
        let p: LegacyProperty = serde_json::from_str(json).unwrap();
        assert_eq!(p.id, "12");
        assert_eq!(p.price, 85000.0);
        assert_eq!(p.person_limit, Some(6));
        assert_eq!(p.bedrooms, Some(3));
        assert_eq!(p.bathrooms, None);
        assert_eq!(p.rating, Some(4.5));
        assert!(p.status);
    }

    #[test]
    fn bad_price_is_an_error() {
        let json = r#"{"id": "1", "title": "x", "price": "free"}"#;
        assert!(serde_json::from_str::<LegacyProperty>(json).is_err());
    }
}
