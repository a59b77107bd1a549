//! Wire inputs, verification policies, and persistence-facing records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ParseError;
use crate::response::{
    parse_assertion_response, parse_attestation_response, ParsedAssertionResponse,
    ParsedAttestationResponse,
};

/// Registration response as serialized by the client layer
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SerializedAttestationResponse {
    pub id: String,     // Base64URL credential id
    pub raw_id: String, // Base64URL raw credential id (same bytes as id)
    pub r#type: String, // Always "public-key"
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String, // Base64URL clientDataJSON document
    pub attestation_object: String, // Base64URL CBOR attestation object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transports: Option<Vec<String>>, // Transports the client observed
}

impl SerializedAttestationResponse {
    /// Parse the embedded payloads into a typed record
    ///
    /// # Errors
    ///
    /// Any [`ParseError`] from [`parse_attestation_response`].
    pub fn parse(&self) -> Result<ParsedAttestationResponse, ParseError> {
        parse_attestation_response(&self.client_data_json, &self.attestation_object)
    }
}

/// Authentication response as serialized by the client layer
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SerializedAssertionResponse {
    pub id: String,     // Base64URL credential id
    pub raw_id: String, // Base64URL raw credential id
    pub r#type: String, // Always "public-key"
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String, // Base64URL clientDataJSON document
    pub authenticator_data: String, // Base64URL raw authenticator data
    pub signature: String, // Base64URL assertion signature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_handle: Option<String>, // Base64URL user handle, if disclosed
}

impl SerializedAssertionResponse {
    /// Parse the embedded payloads into a typed record
    ///
    /// # Errors
    ///
    /// Any [`ParseError`] from [`parse_assertion_response`].
    pub fn parse(&self) -> Result<ParsedAssertionResponse, ParseError> {
        parse_assertion_response(
            &self.client_data_json,
            &self.authenticator_data,
            &self.signature,
            self.user_handle.as_deref(),
        )
    }
}

/// User verification requirement for a ceremony
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserVerificationPolicy {
    /// The UV flag must be set or the ceremony fails
    Required,
    /// UV is recorded when present but not enforced
    #[default]
    Preferred,
    /// UV is not requested; presence alone suffices
    Discouraged,
}

impl UserVerificationPolicy {
    /// Whether a ceremony without the UV flag must be rejected
    #[must_use]
    pub const fn requires_verification(self) -> bool {
        matches!(self, Self::Required)
    }
}

/// Attestation-format acceptance policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttestationPolicy {
    /// Accept formats the engine cannot verify, without provenance checks
    #[default]
    Permissive,
    /// Reject any attestation the engine cannot verify cryptographically
    Strict,
}

/// Policy knobs applied by the verification engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationPolicy {
    /// User verification requirement
    #[serde(default)]
    pub user_verification: UserVerificationPolicy,
    /// Attestation acceptance
    #[serde(default)]
    pub attestation: AttestationPolicy,
}

/// Stored credential state, owned by the caller's persistence layer
///
/// The engine never stores anything itself; this is the slice of caller
/// state an authentication check needs.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StoredCredential {
    pub credential_id: String,       // Base64URL credential id
    pub public_key: Vec<u8>,         // Raw COSE key bytes from registration
    pub sign_count: u32,             // Counter after the last authentication
    pub user_handle: Option<String>, // User handle the credential belongs to
}

impl StoredCredential {
    /// Build the stored form of a freshly registered credential
    #[must_use]
    pub fn from_registration(
        credential: &RegisteredCredential,
        user_handle: Option<String>,
    ) -> Self {
        Self {
            credential_id: credential.credential_id.clone(),
            public_key: credential.public_key.clone(),
            sign_count: credential.sign_count,
            user_handle,
        }
    }
}

/// Credential record produced by a successful registration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RegisteredCredential {
    pub credential_id: String,      // Base64URL credential id
    pub public_key: Vec<u8>,        // Raw COSE key bytes, persisted verbatim
    pub sign_count: u32,            // Initial signature counter
    pub aaguid: Uuid,               // Authenticator model (zeros if undisclosed)
    pub attestation_format: String, // Format the authenticator declared
    pub user_verified: bool,        // UV flag at registration
    pub backup_eligible: bool,      // BE flag at registration
    pub backed_up: bool,            // BS flag at registration
    pub created_at: DateTime<Utc>,  // When the registration verified
}

/// Outcome of a successful authentication
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct VerifiedAuthentication {
    /// New counter value; persist it atomically with the read of the old one
    pub sign_count: u32,
    /// UV flag for this ceremony
    pub user_verified: bool,
    /// BS flag for this ceremony
    pub backed_up: bool,
    /// User handle the authenticator disclosed, if any
    pub user_handle: Option<Vec<u8>>,
    /// When the authentication verified
    pub authenticated_at: DateTime<Utc>,
}
