use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::TokenError;

/// Standard alphabet, padding optional, trailing bits tolerated.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decoded token payload. Nothing in here is cryptographically trusted.
///
/// Only `userName` feeds access decisions. The other known claims are read
/// leniently: a value of an unexpected type stays in `extra` instead of
/// failing the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: Option<String>,
    /// Coarse category ("factory"). Never used for access decisions.
    pub role: Option<String>,
    /// The role key that access decisions are made on, despite the name.
    pub user_name: Option<String>,
    #[serde(rename = "iat")]
    pub issued_at: Option<i64>,
    #[serde(rename = "exp")]
    pub expires_at: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for Claims {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Claims::from)
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(mut map: Map<String, Value>) -> Self {
        let user_id = take(&mut map, "userId", |value| match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        let role = take(&mut map, "role", string);
        let user_name = take(&mut map, "userName", string);
        let issued_at =
            take(&mut map, "iat", timestamp).or_else(|| take(&mut map, "issuedAt", timestamp));
        let expires_at =
            take(&mut map, "exp", timestamp).or_else(|| take(&mut map, "expiresAt", timestamp));

        Claims {
            user_id,
            role,
            user_name,
            issued_at,
            expires_at,
            extra: map,
        }
    }
}

/// Remove `key` from the map only if `read` accepts its value.
fn take<T>(
    map: &mut Map<String, Value>,
    key: &str,
    read: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let value = map.get(key).and_then(read)?;
    map.remove(key);
    Some(value)
}

fn string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

/// Seconds since the epoch; fractional seconds are truncated.
fn timestamp(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|secs| secs.trunc() as i64))
}

impl Claims {
    /// The role selector carried by the token, if it carries a non-empty one.
    pub fn role_key(&self) -> Option<&str> {
        self.user_name.as_deref().filter(|name| !name.is_empty())
    }

    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        self.expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Tokens without an expiry never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now.timestamp())
    }
}

/// Decode the payload segment of a `header.payload.signature` token.
///
/// The signature is NOT checked. Anyone able to write the token's storage
/// location can forge arbitrary claims, so the result is only fit for
/// deciding what the dashboard displays.
pub fn try_decode(token: &str) -> Result<Claims, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();

    if parts.len() != 3 {
        return Err(TokenError::Shape(parts.len()));
    }

    let payload: String = parts[1]
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    let bytes = PAYLOAD_ENGINE.decode(payload)?;
    let text = String::from_utf8(bytes)?;

    Ok(serde_json::from_str(&text)?)
}

/// Like [`try_decode`], but every failure collapses to `None`.
pub fn decode(token: &str) -> Option<Claims> {
    match try_decode(token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to decode access token");
            None
        }
    }
}
