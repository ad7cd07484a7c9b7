// ABOUTME: Typed JSON encoding and decoding of stored values
// ABOUTME: Maps serde failures to storage errors that name the offending key
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{AppResult, StorageError};

/// Encode `value` for storage under `key`
///
/// # Errors
///
/// Returns a serialization error naming `key`
pub fn encode<T: Serialize>(key: &str, value: &T) -> AppResult<String> {
    serde_json::to_string(value).map_err(|source| {
        StorageError::Serialization {
            key: key.to_owned(),
            source,
        }
        .into()
    })
}

/// Decode the raw value stored under `key`
///
/// # Errors
///
/// Returns a serialization error naming `key`
pub fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> AppResult<T> {
    serde_json::from_str(raw).map_err(|source| {
        StorageError::Serialization {
            key: key.to_owned(),
            source,
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_decode_error_names_key() {
        let error = decode::<u32>("calippo_daily_goal", "\"lots\"").unwrap_err();
        assert_eq!(error.code, ErrorCode::SerializationError);
        assert!(error.message.contains("calippo_daily_goal"));
    }

    #[test]
    fn test_encode_decode() {
        let raw = encode("theme", &"dark").unwrap();
        let value: String = decode("theme", &raw).unwrap();
        assert_eq!(value, "dark");
    }
}
