//! Binary codec helpers for the `WebAuthn` wire formats
//!
//! `Base64URL` (RFC 4648 §5, unpadded) is the transport encoding for every
//! binary field that crosses the client/server boundary; CBOR is the
//! structure encoding inside attestation objects and authenticator data.
//! The parsers above this module never touch the underlying engines
//! directly, so a codec failure always surfaces through a wrapped parse
//! error with a stable reason code.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ciborium::de::from_reader;
use ciborium::value::Value;
use std::io::Cursor;

/// Decode failure reported by the CBOR codec
pub type CborError = ciborium::de::Error<std::io::Error>;

/// Encode bytes as an unpadded `Base64URL` string
#[must_use]
pub fn base64url_encode(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decode an unpadded `Base64URL` string
///
/// # Errors
///
/// Returns the underlying decode error when `input` is not valid unpadded
/// `Base64URL` (padded input is rejected too).
pub fn base64url_decode(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(input)
}

/// Decode the first CBOR item in the buffer
///
/// Trailing bytes after the item are ignored, matching the decode-first
/// semantics the wire format relies on.
///
/// # Errors
///
/// Returns a [`CborError`] when the buffer does not start with a
/// well-formed CBOR item.
pub fn decode_cbor(bytes: &[u8]) -> Result<Value, CborError> {
    from_reader(bytes)
}

/// Decode the first CBOR item in the buffer and report how many bytes it
/// consumed
///
/// Authenticator data embeds a COSE key between the credential id and any
/// extension map with no length prefix; the only way to find its end is to
/// decode it and look at the read position.
///
/// # Errors
///
/// Returns a [`CborError`] when the buffer does not start with a
/// well-formed CBOR item.
pub fn decode_cbor_prefix(bytes: &[u8]) -> Result<(Value, usize), CborError> {
    let mut cursor = Cursor::new(bytes);
    let value = from_reader(&mut cursor)?;
    let consumed = usize::try_from(cursor.position()).unwrap_or(bytes.len());
    Ok((value, consumed))
}

/// Look up a text-keyed entry in a CBOR map
///
/// Returns `None` when `value` is not a map or the key is absent.
#[must_use]
pub fn map_text_entry<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.as_map().and_then(|map| {
        map.iter()
            .find(|(k, _)| k.as_text() == Some(key))
            .map(|(_, v)| v)
    })
}

/// Look up an integer-keyed entry in a CBOR map
///
/// COSE maps key their parameters by small (possibly negative) integer
/// labels.
#[must_use]
pub fn map_integer_entry(value: &Value, label: i64) -> Option<&Value> {
    value.as_map().and_then(|map| {
        map.iter()
            .find(|(k, _)| k.as_integer() == Some(label.into()))
            .map(|(_, v)| v)
    })
}
