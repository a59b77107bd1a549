//! Builders for raw ceremony payloads
//!
//! These assemble byte-level structures the parser tests feed in, both
//! well-formed and deliberately broken. Panics are fine here; builders
//! only run under test.

use ciborium::value::{Integer, Value};

use crate::codec;
use crate::types::{SerializedAssertionResponse, SerializedAttestationResponse};

/// Serialize any CBOR value to bytes
///
/// # Panics
///
/// Panics when CBOR serialization fails, which an in-memory writer
/// does not.
#[must_use]
pub fn to_cbor_bytes(value: &Value) -> Vec<u8> {
    let mut bytes = Vec::new();
    ciborium::ser::into_writer(value, &mut bytes).expect("in-memory CBOR serialization");
    bytes
}

/// CBOR integer value
#[must_use]
pub fn cbor_int(value: i64) -> Value {
    Value::Integer(Integer::from(value))
}

/// CBOR byte string value
#[must_use]
pub fn cbor_bytes(bytes: &[u8]) -> Value {
    Value::Bytes(bytes.to_vec())
}

/// An empty CBOR map (the attStmt of fmt "none")
#[must_use]
pub fn empty_map() -> Value {
    Value::Map(Vec::new())
}

/// Serialize a COSE-style map with integer labels
#[must_use]
pub fn cose_map(entries: &[(i64, Value)]) -> Vec<u8> {
    let map = Value::Map(
        entries
            .iter()
            .map(|(label, value)| (cbor_int(*label), value.clone()))
            .collect(),
    );
    to_cbor_bytes(&map)
}

/// Assemble a raw authenticator data buffer: fixed prefix plus whatever
/// tail the flags call for
#[must_use]
pub fn auth_data(rp_id_hash: &[u8; 32], flags: u8, sign_count: u32, tail: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(37 + tail.len());
    out.extend_from_slice(rp_id_hash);
    out.push(flags);
    out.extend_from_slice(&sign_count.to_be_bytes());
    out.extend_from_slice(tail);
    out
}

/// Assemble an attested-credential-data tail
///
/// # Panics
///
/// Panics when the credential id is longer than a u16 length field can
/// describe.
#[must_use]
pub fn attested_credential_data(
    aaguid: &[u8; 16],
    credential_id: &[u8],
    cose_key: &[u8],
) -> Vec<u8> {
    let id_len = u16::try_from(credential_id.len()).expect("credential id fits a u16 length");
    let mut out = Vec::with_capacity(18 + credential_id.len() + cose_key.len());
    out.extend_from_slice(aaguid);
    out.extend_from_slice(&id_len.to_be_bytes());
    out.extend_from_slice(credential_id);
    out.extend_from_slice(cose_key);
    out
}

/// Serialize an attestation object map
#[must_use]
pub fn attestation_object(fmt: &str, att_stmt: Value, auth_data: &[u8]) -> Vec<u8> {
    let map = Value::Map(vec![
        (
            Value::Text("fmt".to_string()),
            Value::Text(fmt.to_string()),
        ),
        (Value::Text("attStmt".to_string()), att_stmt),
        (
            Value::Text("authData".to_string()),
            Value::Bytes(auth_data.to_vec()),
        ),
    ]);
    to_cbor_bytes(&map)
}

/// `Base64URL` form of [`attestation_object`]
#[must_use]
pub fn attestation_object_b64(fmt: &str, att_stmt: Value, auth_data: &[u8]) -> String {
    codec::base64url_encode(&attestation_object(fmt, att_stmt, auth_data))
}

/// clientDataJSON bytes for a ceremony
#[must_use]
pub fn client_data_json(ceremony_type: &str, challenge: &str, origin: &str) -> Vec<u8> {
    serde_json::json!({
        "type": ceremony_type,
        "challenge": challenge,
        "origin": origin,
        "crossOrigin": false,
    })
    .to_string()
    .into_bytes()
}

/// Wrap ceremony payloads in the serialized registration response shape
#[must_use]
pub fn serialized_attestation(
    credential_id_b64: &str,
    client_data_b64: &str,
    attestation_object_b64: &str,
) -> SerializedAttestationResponse {
    SerializedAttestationResponse {
        id: credential_id_b64.to_string(),
        raw_id: credential_id_b64.to_string(),
        r#type: "public-key".to_string(),
        client_data_json: client_data_b64.to_string(),
        attestation_object: attestation_object_b64.to_string(),
        transports: None,
    }
}

/// Wrap ceremony payloads in the serialized authentication response shape
#[must_use]
pub fn serialized_assertion(
    credential_id_b64: &str,
    client_data_b64: &str,
    authenticator_data_b64: &str,
    signature_b64: &str,
    user_handle_b64: Option<&str>,
) -> SerializedAssertionResponse {
    SerializedAssertionResponse {
        id: credential_id_b64.to_string(),
        raw_id: credential_id_b64.to_string(),
        r#type: "public-key".to_string(),
        client_data_json: client_data_b64.to_string(),
        authenticator_data: authenticator_data_b64.to_string(),
        signature: signature_b64.to_string(),
        user_handle: user_handle_b64.map(ToString::to_string),
    }
}
