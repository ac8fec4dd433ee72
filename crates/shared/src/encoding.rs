//! Icon payload encoding.
//!
//! Icons travel as raw bytes inside the engine and as standard base64 text
//! once a result is rendered for the presentation layer.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Deserializer, Serializer};
use thiserror::Error;

/// Error type for icon decoding.
#[derive(Debug, Error)]
pub enum IconEncodingError {
    #[error("Invalid icon encoding")]
    InvalidEncoding,
}

/// Encodes icon bytes as standard base64.
pub fn encode_icon(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes a standard base64 icon payload.
pub fn decode_icon(encoded: &str) -> Result<Vec<u8>, IconEncodingError> {
    STANDARD
        .decode(encoded)
        .map_err(|_| IconEncodingError::InvalidEncoding)
}

/// Serde helper: `Option<Vec<u8>>` as a nullable base64 string.
pub fn serialize_icon<S>(icon: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match icon {
        Some(bytes) => serializer.serialize_some(&encode_icon(bytes)),
        None => serializer.serialize_none(),
    }
}

/// Serde helper: nullable base64 string into `Option<Vec<u8>>`.
pub fn deserialize_icon<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded: Option<String> = Option::deserialize(deserializer)?;
    encoded
        .map(|s| decode_icon(&s).map_err(serde::de::Error::custom))
        .transpose()
}
