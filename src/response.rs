//! Ceremony response parsing
//!
//! Entry points that turn the serialized payloads sent by a client into
//! fully typed records. Parsing is all-or-nothing: the first failure
//! aborts with a [`ParseError`] and no partial structure escapes. The raw
//! clientDataJSON and authenticator data bytes are retained on the parsed
//! records because byte-exact copies are the signature base material for
//! the verification step.

use ciborium::value::Value;

use crate::authenticator_data::AuthenticatorData;
use crate::client_data::ClientData;
use crate::codec;
use crate::errors::ParseError;

/// Parsed registration (attestation) payload
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAttestationResponse {
    /// Decoded clientDataJSON record
    pub client_data: ClientData,
    /// Attestation object as a decoded CBOR map
    pub attestation_object: Value,
    /// Authenticator data parsed out of the attestation object
    pub authenticator_data: AuthenticatorData,
    /// Attestation statement (attStmt) for the declared format
    pub attestation_statement: Value,
    /// Raw clientDataJSON bytes
    pub client_data_raw: Vec<u8>,
    /// Raw authenticator data bytes
    pub auth_data_raw: Vec<u8>,
}

/// Parsed authentication (assertion) payload
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAssertionResponse {
    /// Decoded clientDataJSON record
    pub client_data: ClientData,
    /// Parsed authenticator data
    pub authenticator_data: AuthenticatorData,
    /// Signature over the authenticator data and client data hash
    pub signature: Vec<u8>,
    /// User handle the authenticator chose to reveal, if any
    pub user_handle: Option<Vec<u8>>,
    /// Raw clientDataJSON bytes
    pub client_data_raw: Vec<u8>,
    /// Raw authenticator data bytes
    pub auth_data_raw: Vec<u8>,
}

/// Parse a registration response
///
/// Both arguments are the unpadded `Base64URL` strings produced by the
/// client serialization layer: the clientDataJSON document and the CBOR
/// attestation object.
///
/// # Errors
///
/// [`ParseError::ClientDataJson`] for a bad client data document,
/// [`ParseError::AttestationObjectCbor`] when the attestation object is
/// not `Base64URL` or not well-formed CBOR,
/// [`ParseError::AttestationObjectStructure`] when fmt, attStmt, or
/// authData is missing or has the wrong type,
/// [`ParseError::AuthDataNotBuffer`] when authData is not a byte string,
/// and any [`AuthenticatorData::parse`] error for the embedded buffer.
pub fn parse_attestation_response(
    client_data_json: &str,
    attestation_object: &str,
) -> Result<ParsedAttestationResponse, ParseError> {
    let client_data_raw = codec::base64url_decode(client_data_json)
        .map_err(|e| ParseError::ClientDataJson(e.to_string()))?;
    let client_data = ClientData::from_bytes(&client_data_raw)?;

    let attestation_bytes = codec::base64url_decode(attestation_object)
        .map_err(|e| ParseError::AttestationObjectCbor(e.to_string()))?;
    let attestation: Value = codec::decode_cbor(&attestation_bytes)
        .map_err(|e| ParseError::AttestationObjectCbor(e.to_string()))?;

    let fields = (
        codec::map_text_entry(&attestation, "fmt"),
        codec::map_text_entry(&attestation, "attStmt"),
        codec::map_text_entry(&attestation, "authData"),
    );
    let (Some(fmt), Some(att_stmt), Some(auth_data)) = fields else {
        return Err(ParseError::AttestationObjectStructure(
            "missing fmt, attStmt, or authData".to_string(),
        ));
    };
    if fmt.as_text().is_none() || att_stmt.as_map().is_none() {
        return Err(ParseError::AttestationObjectStructure(
            "fmt must be a text string and attStmt a map".to_string(),
        ));
    }
    let Some(auth_data_bytes) = auth_data.as_bytes() else {
        return Err(ParseError::AuthDataNotBuffer);
    };

    let authenticator_data = AuthenticatorData::parse(auth_data_bytes)?;
    let attestation_statement = att_stmt.clone();
    let auth_data_raw = auth_data_bytes.clone();

    Ok(ParsedAttestationResponse {
        client_data,
        attestation_object: attestation,
        authenticator_data,
        attestation_statement,
        client_data_raw,
        auth_data_raw,
    })
}

/// Parse an authentication response
///
/// `client_data_json`, `authenticator_data`, and `signature` are unpadded
/// `Base64URL` strings; `user_handle` is present only when the
/// authenticator disclosed one. Unlike registration, the authenticator
/// data here is a bare buffer with no CBOR wrapping.
///
/// # Errors
///
/// [`ParseError::ClientDataJson`] for a bad client data document,
/// [`ParseError::AuthenticatorData`] when the authenticator data string
/// does not decode, [`ParseError::Base64`] when the signature or user
/// handle does not decode, and any [`AuthenticatorData::parse`] error for
/// the decoded buffer.
pub fn parse_assertion_response(
    client_data_json: &str,
    authenticator_data: &str,
    signature: &str,
    user_handle: Option<&str>,
) -> Result<ParsedAssertionResponse, ParseError> {
    let client_data_raw = codec::base64url_decode(client_data_json)
        .map_err(|e| ParseError::ClientDataJson(e.to_string()))?;
    let client_data = ClientData::from_bytes(&client_data_raw)?;

    let auth_data_raw = codec::base64url_decode(authenticator_data)
        .map_err(|e| ParseError::AuthenticatorData(e.to_string()))?;
    let parsed_auth_data = AuthenticatorData::parse(&auth_data_raw)?;

    let signature = codec::base64url_decode(signature).map_err(|e| ParseError::Base64 {
        field: "signature",
        detail: e.to_string(),
    })?;
    let user_handle = match user_handle {
        Some(handle) => Some(codec::base64url_decode(handle).map_err(|e| ParseError::Base64 {
            field: "userHandle",
            detail: e.to_string(),
        })?),
        None => None,
    };

    Ok(ParsedAssertionResponse {
        client_data,
        authenticator_data: parsed_auth_data,
        signature,
        user_handle,
        client_data_raw,
        auth_data_raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{base64url_decode, base64url_encode};
    use crate::testing::builders;
    use crate::testing::vectors;

    #[test]
    fn test_parses_none_attestation_response() {
        let parsed = parse_attestation_response(
            vectors::REG_CLIENT_DATA_B64,
            vectors::REG_ATTESTATION_OBJECT_NONE_B64,
        )
        .unwrap();

        assert_eq!(parsed.client_data.r#type, "webauthn.create");
        assert_eq!(parsed.client_data.challenge, vectors::REG_CHALLENGE);
        assert_eq!(parsed.client_data.origin, vectors::ORIGIN);

        let attested = parsed.authenticator_data.attested_credential_data.unwrap();
        assert_eq!(attested.credential_id, vectors::CREDENTIAL_ID);
        assert_eq!(attested.credential_public_key, vectors::ES256_COSE_KEY);
        assert_eq!(parsed.authenticator_data.sign_count, 0);
        assert!(parsed.authenticator_data.flags.user_verified);

        // Raw bytes survive for the signature base
        assert_eq!(
            parsed.client_data_raw,
            base64url_decode(vectors::REG_CLIENT_DATA_B64).unwrap()
        );
        assert_eq!(parsed.auth_data_raw.len(), 148);
    }

    #[test]
    fn test_parses_packed_attestation_statement() {
        let parsed = parse_attestation_response(
            vectors::REG_CLIENT_DATA_B64,
            vectors::REG_ATTESTATION_OBJECT_PACKED_B64,
        )
        .unwrap();
        let alg = codec::map_text_entry(&parsed.attestation_statement, "alg")
            .and_then(Value::as_integer)
            .unwrap();
        assert_eq!(i64::try_from(alg).unwrap(), -7);
        assert!(codec::map_text_entry(&parsed.attestation_statement, "sig").is_some());
    }

    #[test]
    fn test_rejects_attestation_object_bad_base64() {
        let err =
            parse_attestation_response(vectors::REG_CLIENT_DATA_B64, "!!!not-base64!!!")
                .unwrap_err();
        assert_eq!(err.reason(), "attestation_object_cbor_error");
    }

    #[test]
    fn test_rejects_attestation_object_bad_cbor() {
        let garbage = base64url_encode(&[0xff, 0xff, 0xff]);
        let err =
            parse_attestation_response(vectors::REG_CLIENT_DATA_B64, &garbage).unwrap_err();
        assert_eq!(err.reason(), "attestation_object_cbor_error");
    }

    #[test]
    fn test_rejects_attestation_object_missing_fields() {
        // A map with fmt only
        let map = Value::Map(vec![(
            Value::Text("fmt".to_string()),
            Value::Text("none".to_string()),
        )]);
        let object = base64url_encode(&builders::to_cbor_bytes(&map));
        let err = parse_attestation_response(vectors::REG_CLIENT_DATA_B64, &object).unwrap_err();
        assert_eq!(err.reason(), "attestation_object_invalid_structure");
    }

    #[test]
    fn test_rejects_non_map_attestation_object() {
        let object = base64url_encode(&builders::to_cbor_bytes(&Value::Text(
            "not a map".to_string(),
        )));
        let err = parse_attestation_response(vectors::REG_CLIENT_DATA_B64, &object).unwrap_err();
        assert_eq!(err.reason(), "attestation_object_invalid_structure");
    }

    #[test]
    fn test_rejects_auth_data_that_is_not_a_byte_string() {
        let map = Value::Map(vec![
            (
                Value::Text("fmt".to_string()),
                Value::Text("none".to_string()),
            ),
            (Value::Text("attStmt".to_string()), Value::Map(Vec::new())),
            (
                Value::Text("authData".to_string()),
                Value::Text("oops".to_string()),
            ),
        ]);
        let object = base64url_encode(&builders::to_cbor_bytes(&map));
        let err = parse_attestation_response(vectors::REG_CLIENT_DATA_B64, &object).unwrap_err();
        assert_eq!(err.reason(), "auth_data_not_buffer");
    }

    #[test]
    fn test_rejects_truncated_auth_data_inside_attestation_object() {
        let object = builders::attestation_object_b64("none", builders::empty_map(), &[0u8; 20]);
        let err = parse_attestation_response(vectors::REG_CLIENT_DATA_B64, &object).unwrap_err();
        assert_eq!(err.reason(), "auth_data_too_short");
    }

    #[test]
    fn test_parses_assertion_response() {
        let parsed = parse_assertion_response(
            vectors::ES256_CLIENT_DATA_B64,
            vectors::ES256_AUTHENTICATOR_DATA_B64,
            vectors::ES256_SIGNATURE_B64,
            Some("dXNlci1oYW5kbGU"),
        )
        .unwrap();

        assert_eq!(parsed.client_data.r#type, "webauthn.get");
        assert_eq!(parsed.authenticator_data.sign_count, 6);
        assert!(parsed.authenticator_data.flags.user_present);
        assert!(parsed
            .authenticator_data
            .attested_credential_data
            .is_none());
        assert_eq!(parsed.user_handle.as_deref(), Some(b"user-handle".as_slice()));
        assert_eq!(
            parsed.signature,
            base64url_decode(vectors::ES256_SIGNATURE_B64).unwrap()
        );
    }

    #[test]
    fn test_assertion_user_handle_is_optional() {
        let parsed = parse_assertion_response(
            vectors::ES256_CLIENT_DATA_B64,
            vectors::ES256_AUTHENTICATOR_DATA_B64,
            vectors::ES256_SIGNATURE_B64,
            None,
        )
        .unwrap();
        assert!(parsed.user_handle.is_none());
    }

    #[test]
    fn test_rejects_assertion_bad_authenticator_data_base64() {
        let err = parse_assertion_response(
            vectors::ES256_CLIENT_DATA_B64,
            "%%%",
            vectors::ES256_SIGNATURE_B64,
            None,
        )
        .unwrap_err();
        assert_eq!(err.reason(), "authenticator_data_parsing_error");
    }

    #[test]
    fn test_rejects_assertion_bad_signature_base64() {
        let err = parse_assertion_response(
            vectors::ES256_CLIENT_DATA_B64,
            vectors::ES256_AUTHENTICATOR_DATA_B64,
            "sig with spaces",
            None,
        )
        .unwrap_err();
        assert_eq!(err.reason(), "base64_decode_error");
    }

    #[test]
    fn test_rejects_assertion_bad_user_handle_base64() {
        let err = parse_assertion_response(
            vectors::ES256_CLIENT_DATA_B64,
            vectors::ES256_AUTHENTICATOR_DATA_B64,
            vectors::ES256_SIGNATURE_B64,
            Some("=padded="),
        )
        .unwrap_err();
        assert_eq!(err.reason(), "base64_decode_error");
    }

    #[test]
    fn test_rejects_assertion_bad_client_data() {
        let err = parse_assertion_response(
            "bm90IGpzb24",
            vectors::ES256_AUTHENTICATOR_DATA_B64,
            vectors::ES256_SIGNATURE_B64,
            None,
        )
        .unwrap_err();
        assert_eq!(err.reason(), "client_data_json_parsing_error");
    }
}
