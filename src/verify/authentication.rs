//! Authentication ceremony verification

use chrono::Utc;
use log::debug;

use super::{check_client_data, check_rp_id_hash, check_user_flags, CEREMONY_GET};
use crate::cose::CosePublicKey;
use crate::crypto;
use crate::errors::VerifyError;
use crate::response::ParsedAssertionResponse;
use crate::types::{VerificationPolicy, VerifiedAuthentication};

/// Verify an authentication ceremony against a stored credential
///
/// `stored_public_key` is the raw COSE key persisted at registration and
/// `stored_sign_count` the counter recorded after the last successful
/// authentication. On success the returned record carries the new counter
/// value; reading the old value and writing the new one atomically (a
/// compare-and-set on the credential row) is the caller's job.
///
/// # Errors
///
/// A distinct [`VerifyError`] for the first check that fails, including
/// [`VerifyError::CounterRegression`] when the signature counter did not
/// advance.
pub fn verify_authentication(
    response: &ParsedAssertionResponse,
    stored_public_key: &[u8],
    stored_sign_count: u32,
    expected_challenge: &str,
    expected_origin: &str,
    rp_id: &str,
    policy: &VerificationPolicy,
) -> Result<VerifiedAuthentication, VerifyError> {
    check_client_data(
        &response.client_data,
        CEREMONY_GET,
        expected_challenge,
        expected_origin,
    )?;
    check_rp_id_hash(&response.authenticator_data.rp_id_hash, rp_id)?;
    let flags = response.authenticator_data.flags;
    check_user_flags(flags, policy)?;

    // Counter before signature: a cloned-authenticator signal must not be
    // masked by a signature failure from the clone.
    let sign_count = response.authenticator_data.sign_count;
    check_sign_count(stored_sign_count, sign_count)?;

    let public_key = CosePublicKey::parse(stored_public_key)?;
    let base = crypto::signature_base(&response.auth_data_raw, &response.client_data_raw);
    crypto::verify_signature(&public_key, &base, &response.signature)?;

    debug!("authentication verified for rp {rp_id} (counter {stored_sign_count} -> {sign_count})");

    Ok(VerifiedAuthentication {
        sign_count,
        user_verified: flags.user_verified,
        backed_up: flags.backed_up,
        user_handle: response.user_handle.clone(),
        authenticated_at: Utc::now(),
    })
}

/// Signature counter monotonicity
///
/// A zero on either side means the authenticator does not keep a counter,
/// and the check is skipped. When both sides are nonzero the asserted
/// value must be strictly greater than the stored one.
pub(crate) fn check_sign_count(stored: u32, asserted: u32) -> Result<(), VerifyError> {
    if stored != 0 && asserted != 0 && asserted <= stored {
        return Err(VerifyError::CounterRegression { stored, asserted });
    }
    Ok(())
}
