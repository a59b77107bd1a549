//! Registration ceremony verification

use chrono::Utc;
use ciborium::value::Value;
use log::{debug, warn};

use super::{check_client_data, check_rp_id_hash, check_user_flags, CEREMONY_CREATE};
use crate::codec;
use crate::cose::CosePublicKey;
use crate::crypto;
use crate::errors::VerifyError;
use crate::response::ParsedAttestationResponse;
use crate::types::{AttestationPolicy, RegisteredCredential, VerificationPolicy};

/// Verify a registration ceremony
///
/// Checks run in order: client data type, challenge, origin, relying
/// party id hash, user presence and verification flags, presence of
/// attested credential data, key decodability, and finally the
/// attestation statement under the configured policy. On success the
/// returned [`RegisteredCredential`] is the record the caller persists.
///
/// # Errors
///
/// A distinct [`VerifyError`] for the first check that fails.
pub fn verify_registration(
    response: &ParsedAttestationResponse,
    expected_challenge: &str,
    expected_origin: &str,
    rp_id: &str,
    policy: &VerificationPolicy,
) -> Result<RegisteredCredential, VerifyError> {
    check_client_data(
        &response.client_data,
        CEREMONY_CREATE,
        expected_challenge,
        expected_origin,
    )?;
    check_rp_id_hash(&response.authenticator_data.rp_id_hash, rp_id)?;
    let flags = response.authenticator_data.flags;
    check_user_flags(flags, policy)?;

    let Some(attested) = response.authenticator_data.attested_credential_data.as_ref() else {
        return Err(VerifyError::CredentialDataMissing);
    };

    // The key must decode to a supported algorithm before anything is
    // persisted; a credential that could never authenticate is rejected
    // here rather than at first use.
    let public_key = CosePublicKey::parse(&attested.credential_public_key)?;

    let fmt = attestation_format(&response.attestation_object)?;
    verify_attestation_statement(
        fmt,
        &response.attestation_statement,
        &response.auth_data_raw,
        &response.client_data_raw,
        &public_key,
        policy.attestation,
    )?;

    debug!(
        "registration verified for rp {rp_id} (fmt {fmt:?}, alg {})",
        public_key.algorithm().identifier()
    );

    Ok(RegisteredCredential {
        credential_id: codec::base64url_encode(&attested.credential_id),
        public_key: attested.credential_public_key.clone(),
        sign_count: response.authenticator_data.sign_count,
        aaguid: attested.aaguid,
        attestation_format: fmt.to_string(),
        user_verified: flags.user_verified,
        backup_eligible: flags.backup_eligible,
        backed_up: flags.backed_up,
        created_at: Utc::now(),
    })
}

fn attestation_format(attestation_object: &Value) -> Result<&str, VerifyError> {
    codec::map_text_entry(attestation_object, "fmt")
        .and_then(Value::as_text)
        .ok_or_else(|| VerifyError::MalformedAttestationStatement("missing fmt".to_string()))
}

/// Attestation statement check for the declared format
///
/// "none" carries no statement and passes unconditionally. "packed"
/// self-attestation is verified against the credential key. Statements
/// the engine cannot verify (packed with a certificate chain, or an
/// unrecognized format) pass only under the permissive policy, with a
/// warning, so deployments that do not care about provenance keep
/// working.
fn verify_attestation_statement(
    fmt: &str,
    att_stmt: &Value,
    auth_data_raw: &[u8],
    client_data_raw: &[u8],
    credential_key: &CosePublicKey,
    policy: AttestationPolicy,
) -> Result<(), VerifyError> {
    match fmt {
        "none" => Ok(()),
        "packed" => verify_packed_statement(
            att_stmt,
            auth_data_raw,
            client_data_raw,
            credential_key,
            policy,
        ),
        other => match policy {
            AttestationPolicy::Strict => Err(VerifyError::UnsupportedAttestationFormat {
                fmt: other.to_string(),
            }),
            AttestationPolicy::Permissive => {
                warn!("accepting unverified attestation format {other:?}");
                Ok(())
            }
        },
    }
}

fn verify_packed_statement(
    att_stmt: &Value,
    auth_data_raw: &[u8],
    client_data_raw: &[u8],
    credential_key: &CosePublicKey,
    policy: AttestationPolicy,
) -> Result<(), VerifyError> {
    let alg = codec::map_text_entry(att_stmt, "alg")
        .and_then(Value::as_integer)
        .and_then(|i| i64::try_from(i).ok())
        .ok_or_else(|| VerifyError::MalformedAttestationStatement("missing alg".to_string()))?;
    let sig = codec::map_text_entry(att_stmt, "sig")
        .and_then(Value::as_bytes)
        .ok_or_else(|| VerifyError::MalformedAttestationStatement("missing sig".to_string()))?;

    if codec::map_text_entry(att_stmt, "x5c").is_some() {
        // Certificate chain validation is outside this engine's scope.
        return match policy {
            AttestationPolicy::Strict => Err(VerifyError::UnsupportedAttestationFormat {
                fmt: "packed (x5c)".to_string(),
            }),
            AttestationPolicy::Permissive => {
                warn!("accepting packed attestation without validating its certificate chain");
                Ok(())
            }
        };
    }

    // Self-attestation: the statement is signed with the credential key
    // itself, over the same message shape an assertion signs.
    if alg != credential_key.algorithm().identifier() {
        return Err(VerifyError::MalformedAttestationStatement(format!(
            "alg {alg} does not match the credential key"
        )));
    }
    let base = crypto::signature_base(auth_data_raw, client_data_raw);
    crypto::verify_signature(credential_key, &base, sig)
        .map_err(|_| VerifyError::InvalidAttestationSignature)
}
