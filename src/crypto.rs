//! Cryptographic primitives for ceremony verification
//!
//! Challenge and user-handle generation pull from the system secure
//! random source. Signature verification dispatches on the COSE key shape
//! and always goes through ring's unparsed-key interface, so nothing is
//! ever built from untrusted input beyond the raw point or modulus bytes.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ring::digest;
use ring::rand::{SecureRandom, SystemRandom};
use ring::signature::{self, RsaPublicKeyComponents, UnparsedPublicKey};

use crate::cose::CosePublicKey;
use crate::errors::VerifyError;

/// Byte length of a freshly generated challenge
pub const CHALLENGE_LEN: usize = 32;

/// Byte length of a freshly generated user handle
pub const USER_HANDLE_LEN: usize = 16;

/// Generate a ceremony challenge: 32 random bytes, Base64URL-encoded
///
/// The caller stores the returned string and passes it back as the
/// expected challenge when completing the ceremony.
///
/// # Panics
///
/// Panics if the system random source fails, which ring treats as
/// unrecoverable.
#[must_use]
pub fn generate_challenge() -> String {
    let mut bytes = [0u8; CHALLENGE_LEN];
    SystemRandom::new()
        .fill(&mut bytes)
        .expect("system random source failed");
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate an opaque user handle: 16 random bytes, Base64URL-encoded
///
/// # Panics
///
/// Panics if the system random source fails, which ring treats as
/// unrecoverable.
#[must_use]
pub fn generate_user_handle() -> String {
    let mut bytes = [0u8; USER_HANDLE_LEN];
    SystemRandom::new()
        .fill(&mut bytes)
        .expect("system random source failed");
    URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 digest
#[must_use]
pub fn sha256(data: &[u8]) -> Vec<u8> {
    digest::digest(&digest::SHA256, data).as_ref().to_vec()
}

/// Assemble the signed message for a ceremony: the raw authenticator data
/// followed by the SHA-256 of the raw clientDataJSON bytes
#[must_use]
pub fn signature_base(auth_data: &[u8], client_data_json: &[u8]) -> Vec<u8> {
    let mut base = auth_data.to_vec();
    base.extend_from_slice(&sha256(client_data_json));
    base
}

/// Verify a ceremony signature with a decoded COSE key
///
/// ES256 signatures arrive ASN.1 DER-encoded, Ed25519 and RS256
/// signatures raw, which is what the corresponding ring algorithms
/// expect.
///
/// # Errors
///
/// Returns [`VerifyError::InvalidSignature`] when the signature does not
/// verify under the key.
pub fn verify_signature(
    public_key: &CosePublicKey,
    message: &[u8],
    sig: &[u8],
) -> Result<(), VerifyError> {
    let outcome = match public_key {
        CosePublicKey::Ec2 { x, y } => {
            // SEC1 uncompressed point
            let mut point = Vec::with_capacity(1 + x.len() + y.len());
            point.push(0x04);
            point.extend_from_slice(x);
            point.extend_from_slice(y);
            UnparsedPublicKey::new(&signature::ECDSA_P256_SHA256_ASN1, &point).verify(message, sig)
        }
        CosePublicKey::Okp { x } => {
            UnparsedPublicKey::new(&signature::ED25519, x).verify(message, sig)
        }
        CosePublicKey::Rsa { n, e } => RsaPublicKeyComponents { n, e }.verify(
            &signature::RSA_PKCS1_2048_8192_SHA256,
            message,
            sig,
        ),
    };
    outcome.map_err(|_| VerifyError::InvalidSignature)
}
