//! # Canonical Serialization: JCS Byte Production
//!
//! `CanonicalBytes` is the only byte form that is ever signed or digested in
//! Podbox. Credential payloads, email claims and ticket claims all pass
//! through `CanonicalBytes::new()` before a signature is produced, and a
//! verifier checks the signature against the exact bytes it received.
//!
//! ## Security Invariant
//!
//! The inner `Vec<u8>` is private. Any function that signs or hashes takes
//! `&CanonicalBytes`, so a "signed over a differently serialized copy" bug
//! cannot be written without going around the type.
//!
//! ## Rules
//!
//! 1. **Reject floats.** JCS number formatting for non-integers differs
//!    between implementations; counts and amounts must be integers or strings.
//! 2. **Timestamps are strings.** `Timestamp` serializes as
//!    `YYYY-MM-DDTHH:MM:SSZ`, so no datetime normalization happens here.
//! 3. **RFC 8785 output** via `serde_jcs`: sorted keys, compact separators.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()` (and
///   [`CanonicalBytes::from_canonical_str`], which re-checks the input).
/// - No float appears anywhere in the encoded value.
/// - Object keys are sorted, separators are compact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains a
    /// non-integer number, or `SerializationFailed` if serde cannot encode it.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Wrap a string that claims to already be canonical JSON.
    ///
    /// The string is parsed and re-canonicalized; if the result differs from
    /// the input byte-for-byte the claim was false and
    /// `CanonicalizationError::NotCanonical` is returned. Used by verifiers
    /// that want to insist a received message is in canonical form.
    pub fn from_canonical_str(s: &str) -> Result<Self, CanonicalizationError> {
        let value: Value = serde_json::from_str(s)?;
        let canonical = Self::new(&value)?;
        if canonical.as_bytes() != s.as_bytes() {
            return Err(CanonicalizationError::NotCanonical);
        }
        Ok(canonical)
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The canonical bytes as a UTF-8 string. JCS output is always UTF-8.
    pub fn as_str(&self) -> &str {
        // serde_jcs only ever produces String output, and the inner buffer
        // is never mutated after construction.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Consume into the canonical JSON string.
    pub fn into_string(self) -> String {
        String::from_utf8(self.0).unwrap_or_default()
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Object(map) => map.values().try_for_each(reject_floats),
        Value::Array(arr) => arr.iter().try_for_each(reject_floats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_sorted_and_compact() {
        let data = serde_json::json!({"ticketId": "t", "action": "checkin", "eventId": "e"});
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        assert_eq!(
            cb.as_str(),
            r#"{"action":"checkin","eventId":"e","ticketId":"t"}"#
        );
    }

    #[test]
    fn nested_objects_are_sorted() {
        let data = serde_json::json!({
            "pcd": {"type": "email-pcd", "pcd": "{}"},
            "context": {"ticketId": "b", "eventId": "a"}
        });
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(
            cb.as_str(),
            r#"{"context":{"eventId":"a","ticketId":"b"},"pcd":{"pcd":"{}","type":"email-pcd"}}"#
        );
    }

    #[test]
    fn float_is_rejected_even_when_deeply_nested() {
        let data = serde_json::json!({"a": {"b": [{"c": 2.5}]}});
        match CanonicalBytes::new(&data) {
            Err(CanonicalizationError::FloatRejected(f)) => assert_eq!(f, 2.5),
            other => panic!("expected FloatRejected, got {other:?}"),
        }
    }

    #[test]
    fn integers_and_null_pass_through() {
        let data = serde_json::json!({"count": -42, "big": 9999999999i64, "none": null});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_str(), r#"{"big":9999999999,"count":-42,"none":null}"#);
    }

    #[test]
    fn unicode_is_not_escaped() {
        let data = serde_json::json!({"attendeeName": "Zo\u{00eb}"});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert!(cb.as_str().contains('\u{00eb}'));
    }

    #[test]
    fn from_canonical_str_accepts_canonical_input() {
        let cb = CanonicalBytes::from_canonical_str(r#"{"a":1,"b":"x"}"#).unwrap();
        assert_eq!(cb.as_str(), r#"{"a":1,"b":"x"}"#);
    }

    #[test]
    fn from_canonical_str_rejects_whitespace_drift() {
        let result = CanonicalBytes::from_canonical_str("{\"a\": 1}");
        assert!(matches!(result, Err(CanonicalizationError::NotCanonical)));
    }

    #[test]
    fn from_canonical_str_rejects_unsorted_keys() {
        let result = CanonicalBytes::from_canonical_str(r#"{"b":1,"a":2}"#);
        assert!(matches!(result, Err(CanonicalizationError::NotCanonical)));
    }

    #[test]
    fn into_string_matches_as_str() {
        let cb = CanonicalBytes::new(&serde_json::json!([1, 2, 3])).unwrap();
        let s = cb.as_str().to_string();
        assert_eq!(cb.into_string(), s);
    }
}
