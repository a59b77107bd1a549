//! Error taxonomy for passkey parsing and verification
//!
//! Failures split into two categories. [`ParseError`] means the payload
//! itself was malformed; the caller rejects the ceremony and lets the
//! client retry with a fresh challenge. [`VerifyError`] means the payload
//! parsed but a ceremony check failed; the caller surfaces a failed
//! registration or authentication and never downgrades it to success.
//!
//! Every variant carries a stable machine-readable reason, distinct from
//! the human-readable message, so callers can branch or aggregate without
//! string matching. Both categories flatten into [`ErrorDetail`] for
//! transport as JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Malformed ceremony payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// clientDataJSON was not `Base64URL`, not UTF-8, or not the expected JSON shape
    #[error("failed to parse clientDataJSON: {0}")]
    ClientDataJson(String),

    /// Authenticator data buffer ended before a declared field
    #[error("authenticator data too short: {0}")]
    AuthDataTooShort(String),

    /// Extension flag set but no bytes remain
    #[error("authenticator data declares extensions but none are present")]
    ExtensionsMissing,

    /// Embedded COSE public key was not well-formed CBOR
    #[error("failed to decode COSE public key: {0}")]
    CosePublicKey(String),

    /// Extension bytes were not well-formed CBOR
    #[error("failed to decode extension data: {0}")]
    ExtensionsCbor(String),

    /// Attestation object was not `Base64URL` or not well-formed CBOR
    #[error("failed to decode attestation object: {0}")]
    AttestationObjectCbor(String),

    /// Attestation object lacks fmt, attStmt, or authData
    #[error("invalid attestation object structure: {0}")]
    AttestationObjectStructure(String),

    /// The authData entry of an attestation object was not a byte string
    #[error("attestation object authData is not a byte string")]
    AuthDataNotBuffer,

    /// Assertion authenticator data could not be decoded
    #[error("failed to decode assertion authenticator data: {0}")]
    AuthenticatorData(String),

    /// Some other `Base64URL` field failed to decode
    #[error("invalid Base64URL in {field}: {detail}")]
    Base64 {
        /// Wire field that failed to decode
        field: &'static str,
        /// Decoder message
        detail: String,
    },
}

impl ParseError {
    /// Error category on the wire
    pub const CODE: &'static str = "parsing_error";

    /// Stable machine-readable reason
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::ClientDataJson(_) => "client_data_json_parsing_error",
            Self::AuthDataTooShort(_) => "auth_data_too_short",
            Self::ExtensionsMissing => "auth_data_extensions_missing",
            Self::CosePublicKey(_) => "cose_public_key_decode_error",
            Self::ExtensionsCbor(_) => "extensions_cbor_decode_error",
            Self::AttestationObjectCbor(_) => "attestation_object_cbor_error",
            Self::AttestationObjectStructure(_) => "attestation_object_invalid_structure",
            Self::AuthDataNotBuffer => "auth_data_not_buffer",
            Self::AuthenticatorData(_) => "authenticator_data_parsing_error",
            Self::Base64 { .. } => "base64_decode_error",
        }
    }

    /// Flatten into the wire form
    #[must_use]
    pub fn detail(&self) -> ErrorDetail {
        ErrorDetail {
            code: Self::CODE.to_string(),
            reason: self.reason().to_string(),
            message: self.to_string(),
        }
    }
}

/// Ceremony verification failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// Client data type does not match the ceremony being completed
    #[error("unexpected client data type {found:?}, expected {expected:?}")]
    TypeMismatch {
        /// Ceremony type string the server expected
        expected: &'static str,
        /// Type string the client sent
        found: String,
    },

    /// Challenge in the client data does not match the issued challenge
    #[error("challenge does not match the issued challenge")]
    ChallengeMismatch,

    /// Origin in the client data does not match the relying party origin
    #[error("origin {found:?} does not match expected origin {expected:?}")]
    OriginMismatch {
        /// Origin the server expected
        expected: String,
        /// Origin the client reported
        found: String,
    },

    /// rpIdHash does not match the configured relying party id
    #[error("relying party id hash does not match {rp_id:?}")]
    RpIdMismatch {
        /// Relying party id the hash was checked against
        rp_id: String,
    },

    /// User presence flag not set
    #[error("user presence flag is not set")]
    UserNotPresent,

    /// User verification required by policy but the flag is not set
    #[error("user verification required but the flag is not set")]
    UserNotVerified,

    /// Registration response carries no attested credential data
    #[error("authenticator data carries no attested credential data")]
    CredentialDataMissing,

    /// COSE public key could not be decoded into a usable key
    #[error("invalid COSE public key: {0}")]
    InvalidPublicKey(String),

    /// COSE algorithm outside the supported set
    #[error("unsupported COSE algorithm {0}")]
    UnsupportedAlgorithm(i64),

    /// Attestation format rejected by the configured policy
    #[error("unsupported attestation format {fmt:?}")]
    UnsupportedAttestationFormat {
        /// Format string the authenticator declared
        fmt: String,
    },

    /// Attestation statement lacks required fields for its format
    #[error("malformed attestation statement: {0}")]
    MalformedAttestationStatement(String),

    /// Attestation signature did not verify
    #[error("attestation signature verification failed")]
    InvalidAttestationSignature,

    /// Assertion signature did not verify
    #[error("signature verification failed")]
    InvalidSignature,

    /// Signature counter did not advance; possible cloned authenticator
    #[error("signature counter did not advance (stored {stored}, asserted {asserted}); possible cloned authenticator")]
    CounterRegression {
        /// Counter recorded after the last successful authentication
        stored: u32,
        /// Counter the authenticator just asserted
        asserted: u32,
    },
}

impl VerifyError {
    /// Error category on the wire
    pub const CODE: &'static str = "verification_error";

    /// Stable machine-readable reason
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::ChallengeMismatch => "invalid_challenge",
            Self::OriginMismatch { .. } => "invalid_origin",
            Self::RpIdMismatch { .. } => "rp_id_mismatch",
            Self::UserNotPresent => "user_not_present",
            Self::UserNotVerified => "user_not_verified",
            Self::CredentialDataMissing => "credential_data_missing",
            Self::InvalidPublicKey(_) => "invalid_public_key",
            Self::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            Self::UnsupportedAttestationFormat { .. } => "unsupported_attestation_format",
            Self::MalformedAttestationStatement(_) => "malformed_attestation_statement",
            Self::InvalidAttestationSignature => "invalid_attestation_signature",
            Self::InvalidSignature => "invalid_signature",
            Self::CounterRegression { .. } => "counter_mismatch",
        }
    }

    /// Flatten into the wire form
    #[must_use]
    pub fn detail(&self) -> ErrorDetail {
        ErrorDetail {
            code: Self::CODE.to_string(),
            reason: self.reason().to_string(),
            message: self.to_string(),
        }
    }
}

/// Either failure category, for callers driving a whole ceremony
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasskeyError {
    /// The payload was malformed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A ceremony check failed
    #[error(transparent)]
    Verify(#[from] VerifyError),
}

impl PasskeyError {
    /// Error category on the wire
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Parse(_) => ParseError::CODE,
            Self::Verify(_) => VerifyError::CODE,
        }
    }

    /// Stable machine-readable reason
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Parse(e) => e.reason(),
            Self::Verify(e) => e.reason(),
        }
    }

    /// Flatten into the wire form
    #[must_use]
    pub fn detail(&self) -> ErrorDetail {
        match self {
            Self::Parse(e) => e.detail(),
            Self::Verify(e) => e.detail(),
        }
    }
}

/// Wire form of a failure: stable code and reason plus the display message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Failure category (`parsing_error` or `verification_error`)
    pub code: String,
    /// Machine-readable reason for the specific check that failed
    pub reason: String,
    /// Human-readable description
    pub message: String,
}
