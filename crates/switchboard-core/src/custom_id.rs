//! Compact custom id codec for interactive components.
//!
//! Buttons, select menus and modals carry an opaque identifier of at most
//! [`CUSTOM_ID_LIMIT`] characters that the platform hands back verbatim when
//! the user interacts with them. Switchboard packs a handler name and a small
//! JSON payload into that identifier so routing needs no server-side state:
//!
//! ```text
//! 0:<name>:<json>     with bound data
//! 0:<name>            without bound data
//! ```
//!
//! The leading `0` is the format version.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use switchboard_core::custom_id::{decode, encode};
//!
//! let id = encode("gy_new", Some(&json!({"t": 123, "i": "Gift", "q": 2}))).unwrap();
//! assert_eq!(id, r#"0:gy_new:{"t":123,"i":"Gift","q":2}"#);
//!
//! let token = decode(&id).unwrap();
//! assert_eq!(token.name, "gy_new");
//! assert_eq!(token.data["q"], 2);
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{DecodeError, EncodingError};

/// Hard limit the platform puts on component identifiers.
pub const CUSTOM_ID_LIMIT: usize = 100;

/// Encoded identifiers must be strictly shorter than this many characters.
///
/// Kept below [`CUSTOM_ID_LIMIT`] to leave room for the platform counting
/// characters differently than we do.
pub const CUSTOM_ID_BUDGET: usize = 95;

const VERSION_PREFIX: &str = "0:";
const DELIMITER: char = ':';

/// Decoded form of a component identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomToken {
    /// Name of the handler the component routes to.
    pub name: String,
    /// Bound payload; [`Value::Null`] when the identifier carries none.
    pub data: Value,
}

impl CustomToken {
    /// Creates a token without bound data.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Value::Null,
        }
    }

    /// Binds a serializable payload to the token.
    pub fn with_data<T: Serialize + ?Sized>(mut self, data: &T) -> Result<Self, EncodingError> {
        self.data =
            serde_json::to_value(data).map_err(|e| EncodingError::Serialize(e.to_string()))?;
        Ok(self)
    }

    /// Returns `true` if the token carries bound data.
    pub fn has_data(&self) -> bool {
        !self.data.is_null()
    }

    /// Deserializes the bound payload into `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }

    /// Encodes this token into a component identifier.
    pub fn encode(&self) -> Result<String, EncodingError> {
        encode(&self.name, Some(&self.data))
    }
}

impl std::str::FromStr for CustomToken {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

/// Encodes a handler name and optional payload into a component identifier.
///
/// `None` and `Some(Value::Null)` both produce the short `0:<name>` form.
///
/// # Errors
///
/// - [`EncodingError::ReservedDelimiter`] if `name` contains `:`
/// - [`EncodingError::BudgetExceeded`] if the result has
///   [`CUSTOM_ID_BUDGET`] characters or more
pub fn encode(name: &str, data: Option<&Value>) -> Result<String, EncodingError> {
    if name.contains(DELIMITER) {
        return Err(EncodingError::ReservedDelimiter(name.to_string()));
    }

    let mut encoded = String::with_capacity(VERSION_PREFIX.len() + name.len());
    encoded.push_str(VERSION_PREFIX);
    encoded.push_str(name);

    if let Some(data) = data.filter(|d| !d.is_null()) {
        let payload =
            serde_json::to_string(data).map_err(|e| EncodingError::Serialize(e.to_string()))?;
        encoded.push(DELIMITER);
        encoded.push_str(&payload);
    }

    // The platform counts characters, not bytes.
    let len = encoded.chars().count();
    if len >= CUSTOM_ID_BUDGET {
        return Err(EncodingError::BudgetExceeded {
            len,
            limit: CUSTOM_ID_BUDGET,
        });
    }

    Ok(encoded)
}

/// Decodes a component identifier produced by [`encode`].
///
/// Whether `name` belongs to a registered handler is not checked here.
pub fn decode(token: &str) -> Result<CustomToken, DecodeError> {
    let rest = token
        .strip_prefix(VERSION_PREFIX)
        .ok_or_else(|| DecodeError::UnsupportedVersion(token.to_string()))?;

    let (name, payload) = match rest.split_once(DELIMITER) {
        Some((name, payload)) => (name, payload),
        None => (rest, ""),
    };

    let data = if payload.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(payload).map_err(|e| DecodeError::InvalidPayload(e.to_string()))?
    };

    Ok(CustomToken {
        name: name.to_string(),
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_encode_with_data() {
        let data = json!({"t": 123, "i": "Gift", "q": 2});
        let encoded = encode("gy_new", Some(&data)).unwrap();
        assert_eq!(encoded, r#"0:gy_new:{"t":123,"i":"Gift","q":2}"#);

        let token = decode(&encoded).unwrap();
        assert_eq!(token.name, "gy_new");
        assert_eq!(token.data, data);
    }

    #[test]
    fn test_encode_without_data() {
        assert_eq!(encode("close", None).unwrap(), "0:close");
        assert_eq!(encode("close", Some(&Value::Null)).unwrap(), "0:close");

        let token = decode("0:close").unwrap();
        assert_eq!(token, CustomToken::new("close"));
        assert!(!token.has_data());
    }

    #[test]
    fn test_trailing_delimiter_decodes_to_null() {
        let token = decode("0:close:").unwrap();
        assert_eq!(token.name, "close");
        assert_eq!(token.data, Value::Null);
    }

    #[test]
    fn test_round_trip_values() {
        let samples = [
            json!(1),
            json!("text: with colons"),
            json!([1, 2, 3]),
            json!({"nested": {"a": [true, false]}}),
            json!(false),
        ];

        for data in samples {
            let encoded = encode("page", Some(&data)).unwrap();
            let token = decode(&encoded).unwrap();
            assert_eq!(token.name, "page");
            assert_eq!(token.data, data);
        }
    }

    #[test]
    fn test_budget_boundary() {
        // "0:" + 92 chars = 94 characters, just under the budget.
        let name = "a".repeat(92);
        assert!(encode(&name, None).is_ok());

        let name = "a".repeat(93);
        assert_eq!(
            encode(&name, None),
            Err(EncodingError::BudgetExceeded { len: 95, limit: 95 })
        );
    }

    #[test]
    fn test_long_name_with_data_fails() {
        let name = "n".repeat(90);
        let result = encode(&name, Some(&json!({"x": 1})));
        assert!(matches!(result, Err(EncodingError::BudgetExceeded { .. })));
    }

    #[test]
    fn test_budget_counts_characters_not_bytes() {
        // 60 two-byte characters: 122 bytes but only 62 characters encoded.
        let name = "é".repeat(60);
        let encoded = encode(&name, None).unwrap();
        assert_eq!(encoded.chars().count(), 62);
        assert!(encoded.len() > CUSTOM_ID_BUDGET);
    }

    #[test]
    fn test_name_with_delimiter_is_rejected() {
        assert_eq!(
            encode("a:b", None),
            Err(EncodingError::ReservedDelimiter("a:b".to_string()))
        );
    }

    #[test]
    fn test_decode_foreign_identifiers() {
        assert!(matches!(
            decode("help_page_2"),
            Err(DecodeError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            decode("1:name"),
            Err(DecodeError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            decode("0:name:{broken"),
            Err(DecodeError::InvalidPayload(_))
        ));
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Page {
        index: u32,
        query: String,
    }

    #[test]
    fn test_typed_payload() {
        let page = Page {
            index: 3,
            query: "rust".to_string(),
        };
        let encoded = CustomToken::new("search")
            .with_data(&page)
            .unwrap()
            .encode()
            .unwrap();
        assert_eq!(encoded, r#"0:search:{"index":3,"query":"rust"}"#);

        let token: CustomToken = encoded.parse().unwrap();
        assert_eq!(token.data_as::<Page>().unwrap(), page);
    }
}
