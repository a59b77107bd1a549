//! Ceremony verification engine
//!
//! The engine consumes parsed responses plus the expected ceremony
//! parameters (and, for authentication, stored credential state) and
//! either accepts or rejects with a distinct [`VerifyError`] per failed
//! check. Checks run in a fixed order and stop at the first failure.
//!
//! Everything here is synchronous and side-effect-free: challenge
//! issuance, credential lookup, and state writes stay with the caller.

mod authentication;
mod registration;

pub use authentication::verify_authentication;
pub use registration::verify_registration;

use crate::authenticator_data::AuthenticatorFlags;
use crate::client_data::ClientData;
use crate::crypto;
use crate::errors::VerifyError;
use crate::types::VerificationPolicy;

/// Client data type string for registration ceremonies
pub(crate) const CEREMONY_CREATE: &str = "webauthn.create";
/// Client data type string for authentication ceremonies
pub(crate) const CEREMONY_GET: &str = "webauthn.get";

/// Client data checks shared by both ceremonies: type, challenge, origin
///
/// Challenge comparison is string equality on the `Base64URL` forms, and
/// origin comparison is exact; a trailing slash or scheme difference is a
/// mismatch.
pub(crate) fn check_client_data(
    client_data: &ClientData,
    expected_type: &'static str,
    expected_challenge: &str,
    expected_origin: &str,
) -> Result<(), VerifyError> {
    if client_data.r#type != expected_type {
        return Err(VerifyError::TypeMismatch {
            expected: expected_type,
            found: client_data.r#type.clone(),
        });
    }
    if client_data.challenge != expected_challenge {
        return Err(VerifyError::ChallengeMismatch);
    }
    if client_data.origin != expected_origin {
        return Err(VerifyError::OriginMismatch {
            expected: expected_origin.to_string(),
            found: client_data.origin.clone(),
        });
    }
    Ok(())
}

/// rpIdHash must equal the SHA-256 of the configured relying party id
pub(crate) fn check_rp_id_hash(rp_id_hash: &[u8; 32], rp_id: &str) -> Result<(), VerifyError> {
    if crypto::sha256(rp_id.as_bytes()) != rp_id_hash.as_slice() {
        return Err(VerifyError::RpIdMismatch {
            rp_id: rp_id.to_string(),
        });
    }
    Ok(())
}

/// User presence always, user verification when the policy demands it
pub(crate) fn check_user_flags(
    flags: AuthenticatorFlags,
    policy: &VerificationPolicy,
) -> Result<(), VerifyError> {
    if !flags.user_present {
        return Err(VerifyError::UserNotPresent);
    }
    if policy.user_verification.requires_verification() && !flags.user_verified {
        return Err(VerifyError::UserNotVerified);
    }
    Ok(())
}
