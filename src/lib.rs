#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

//! Server-side parsing and verification for `WebAuthn` passkey ceremonies
//!
//! The crate takes the two payloads a browser hands back during a
//! ceremony (registration or authentication), decodes every layer
//! (`Base64URL`, JSON, CBOR, the fixed authenticator data layout), runs the
//! ceremony checks in order, and verifies the signature. It holds no
//! state: challenges, credential records, and counter writes belong to
//! the caller, which is what keeps the engine synchronous and
//! side-effect-free.
//!
//! Typical flow: issue a challenge with [`generate_challenge`], hand it
//! to the client, then feed the client's response to
//! [`Passgate::complete_registration`] or
//! [`Passgate::complete_authentication`] together with the stored state.
//! The lower-level pieces ([`response`], [`verify`], [`cose`]) are public
//! for callers that manage relying party parameters per request.

/// Version of the passgate crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod authenticator_data;
pub mod client_data;
pub mod codec;
pub mod cose;
pub mod crypto;
pub mod errors;
pub mod response;
pub mod service;
pub mod settings;
pub mod types;
pub mod verify;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use authenticator_data::{AuthenticatorData, AuthenticatorFlags};
pub use client_data::ClientData;
pub use cose::{CoseAlgorithm, CosePublicKey};
pub use crypto::{generate_challenge, generate_user_handle};
pub use errors::{ErrorDetail, ParseError, PasskeyError, VerifyError};
pub use response::{
    parse_assertion_response, parse_attestation_response, ParsedAssertionResponse,
    ParsedAttestationResponse,
};
pub use service::Passgate;
pub use settings::PassgateSettings;
pub use types::{
    AttestationPolicy, RegisteredCredential, SerializedAssertionResponse,
    SerializedAttestationResponse, StoredCredential, UserVerificationPolicy, VerificationPolicy,
    VerifiedAuthentication,
};
pub use verify::{verify_authentication, verify_registration};
