//! Authenticator data parsing
//!
//! The authenticator data layout is fixed by the `WebAuthn` wire format:
//!
//! ```text
//! rpIdHash (32) | flags (1) | signCount (4, big-endian)
//! [attestedCredentialData: aaguid (16) | credentialIdLength (2, big-endian)
//!     | credentialId | credentialPublicKey (COSE map, CBOR)]
//! [extensions (CBOR map)]
//! ```
//!
//! Attested credential data is present exactly when the AT flag is set,
//! extensions exactly when the ED flag is set. All integers are network
//! byte order. A buffer that ends before a declared field is always a hard
//! parse failure; nothing partial escapes this module.

use ciborium::value::Value;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codec;
use crate::errors::ParseError;

/// Byte length of the fixed rpIdHash, flags, and signCount prefix
pub const FIXED_PREFIX_LEN: usize = 37;

const FLAG_UP: u8 = 0x01;
const FLAG_BE: u8 = 0x02;
const FLAG_UV: u8 = 0x04;
const FLAG_BS: u8 = 0x08;
const FLAG_AT: u8 = 0x40;
const FLAG_ED: u8 = 0x80;

/// Bit-decoded authenticator flags byte
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)] // Mirrors the wire flags byte bit for bit
pub struct AuthenticatorFlags {
    /// UP: a user was present for the ceremony
    pub user_present: bool,
    /// UV: the user was verified (PIN, biometric)
    pub user_verified: bool,
    /// BE: the credential is eligible for multi-device backup
    pub backup_eligible: bool,
    /// BS: the credential is currently backed up
    pub backed_up: bool,
    /// AT: attested credential data follows the fixed prefix
    pub attested_credential_data_included: bool,
    /// ED: an extension map closes the buffer
    pub extension_data_included: bool,
}

impl AuthenticatorFlags {
    /// Decode a raw flags byte
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            user_present: byte & FLAG_UP != 0,
            user_verified: byte & FLAG_UV != 0,
            backup_eligible: byte & FLAG_BE != 0,
            backed_up: byte & FLAG_BS != 0,
            attested_credential_data_included: byte & FLAG_AT != 0,
            extension_data_included: byte & FLAG_ED != 0,
        }
    }
}

/// Credential material attached when the AT flag is set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestedCredentialData {
    /// Authenticator model identifier (all zeros when undisclosed)
    pub aaguid: Uuid,
    /// Credential id minted by the authenticator
    pub credential_id: Vec<u8>,
    /// Credential public key as raw COSE CBOR bytes
    ///
    /// Kept verbatim rather than decoded: this is the exact byte string a
    /// relying party persists and later feeds back for assertion checks.
    /// Parsing only confirms it is a well-formed CBOR map.
    pub credential_public_key: Vec<u8>,
}

/// Parsed authenticator data record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatorData {
    /// SHA-256 of the relying party id the credential is scoped to
    pub rp_id_hash: [u8; 32],
    /// Decoded flags byte
    pub flags: AuthenticatorFlags,
    /// Usage counter; 0 means the authenticator does not keep one
    pub sign_count: u32,
    /// Present exactly when `flags.attested_credential_data_included`
    pub attested_credential_data: Option<AttestedCredentialData>,
    /// Extension map, present exactly when `flags.extension_data_included`
    pub extensions: Option<Value>,
}

impl AuthenticatorData {
    /// Parse a raw authenticator data buffer
    ///
    /// # Errors
    ///
    /// [`ParseError::AuthDataTooShort`] when the buffer ends before a
    /// declared field, [`ParseError::ExtensionsMissing`] when the ED flag
    /// is set with no bytes left, and [`ParseError::CosePublicKey`] or
    /// [`ParseError::ExtensionsCbor`] when an embedded CBOR item fails to
    /// decode.
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        if buffer.len() < FIXED_PREFIX_LEN {
            return Err(ParseError::AuthDataTooShort(format!(
                "need {FIXED_PREFIX_LEN} bytes for rpIdHash, flags, and signCount, have {}",
                buffer.len()
            )));
        }

        let mut rp_id_hash = [0u8; 32];
        rp_id_hash.copy_from_slice(&buffer[..32]);
        let flags = AuthenticatorFlags::from_byte(buffer[32]);
        let sign_count = u32::from_be_bytes([buffer[33], buffer[34], buffer[35], buffer[36]]);

        let mut offset = FIXED_PREFIX_LEN;

        let attested_credential_data = if flags.attested_credential_data_included {
            let (attested, consumed) = parse_attested_credential_data(&buffer[offset..])?;
            offset += consumed;
            Some(attested)
        } else {
            None
        };

        let extensions = if flags.extension_data_included {
            if buffer.len() <= offset {
                return Err(ParseError::ExtensionsMissing);
            }
            let value = codec::decode_cbor(&buffer[offset..])
                .map_err(|e| ParseError::ExtensionsCbor(e.to_string()))?;
            Some(value)
        } else {
            None
        };

        Ok(Self {
            rp_id_hash,
            flags,
            sign_count,
            attested_credential_data,
            extensions,
        })
    }
}

/// Parse the attested-credential-data section, returning it together with
/// the number of bytes it occupied
fn parse_attested_credential_data(
    bytes: &[u8],
) -> Result<(AttestedCredentialData, usize), ParseError> {
    // aaguid plus the two-byte credential id length
    if bytes.len() < 18 {
        return Err(ParseError::AuthDataTooShort(format!(
            "need 18 bytes for AAGUID and credential id length, have {}",
            bytes.len()
        )));
    }
    let mut aaguid = [0u8; 16];
    aaguid.copy_from_slice(&bytes[..16]);
    let id_len = usize::from(u16::from_be_bytes([bytes[16], bytes[17]]));
    let mut offset = 18;

    if bytes.len() < offset + id_len {
        return Err(ParseError::AuthDataTooShort(format!(
            "need {id_len} bytes for the credential id, have {}",
            bytes.len() - offset
        )));
    }
    let credential_id = bytes[offset..offset + id_len].to_vec();
    offset += id_len;

    // The COSE key has no length prefix; decode it to find its end and
    // keep the raw bytes it covered.
    let (key_value, key_len) = codec::decode_cbor_prefix(&bytes[offset..])
        .map_err(|e| ParseError::CosePublicKey(e.to_string()))?;
    if key_value.as_map().is_none() {
        return Err(ParseError::CosePublicKey(
            "COSE key is not a CBOR map".to_string(),
        ));
    }
    let credential_public_key = bytes[offset..offset + key_len].to_vec();
    offset += key_len;

    Ok((
        AttestedCredentialData {
            aaguid: Uuid::from_bytes(aaguid),
            credential_id,
            credential_public_key,
        },
        offset,
    ))
}
