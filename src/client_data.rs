//! Client data parsing
//!
//! The clientDataJSON document is assembled by the browser during a
//! ceremony and reaches the server as an unpadded `Base64URL` string.
//! Decoding is strict: a `Base64URL`, UTF-8, or JSON failure, or a document
//! missing one of the required fields, is a parse error carrying the
//! `client_data_json_parsing_error` reason.

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::errors::ParseError;

/// Token binding information reported by the client (rarely present)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBinding {
    /// Binding status ("present" or "supported")
    pub status: String,
    /// `Base64URL` token binding id, when status is "present"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Decoded clientDataJSON record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientData {
    /// Ceremony type: "webauthn.create" or "webauthn.get"
    pub r#type: String,
    /// Challenge echoed by the client, still Base64URL-encoded
    pub challenge: String,
    /// Origin the ceremony ran on, as the browser saw it
    pub origin: String,
    /// Whether the ceremony ran in a cross-origin frame
    #[serde(
        default,
        rename = "crossOrigin",
        skip_serializing_if = "Option::is_none"
    )]
    pub cross_origin: Option<bool>,
    /// Token binding negotiated with the client, if any
    #[serde(
        default,
        rename = "tokenBinding",
        skip_serializing_if = "Option::is_none"
    )]
    pub token_binding: Option<TokenBinding>,
}

impl ClientData {
    /// Decode a Base64URL-encoded clientDataJSON string
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::ClientDataJson`] when the input is not valid
    /// `Base64URL` or the decoded bytes are not the expected JSON document.
    pub fn parse(client_data_json: &str) -> Result<Self, ParseError> {
        let bytes = codec::base64url_decode(client_data_json)
            .map_err(|e| ParseError::ClientDataJson(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Decode raw clientDataJSON bytes
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::ClientDataJson`] when the bytes are not UTF-8
    /// JSON with the required `type`, `challenge`, and `origin` fields.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        serde_json::from_slice(bytes).map_err(|e| ParseError::ClientDataJson(e.to_string()))
    }
}
