//! COSE public key decoding
//!
//! Credential public keys travel as `COSE_Key` CBOR maps (RFC 9052 §7)
//! embedded in attested credential data, and relying parties persist the
//! raw map bytes verbatim. This module turns those bytes into a typed key
//! for the verification engine. Only shapes the engine can actually
//! verify are accepted: EC2 over P-256 (ES256), OKP over Ed25519 (`EdDSA`),
//! and RSA with SHA-256 (RS256).

use ciborium::value::Value;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::errors::VerifyError;

// COSE_Key parameter labels (RFC 9052 §7, RFC 8230 §4)
const LABEL_KTY: i64 = 1;
const LABEL_ALG: i64 = 3;
const LABEL_CRV: i64 = -1;
const LABEL_X: i64 = -2;
const LABEL_Y: i64 = -3;
const LABEL_RSA_N: i64 = -1;
const LABEL_RSA_E: i64 = -2;

const KTY_OKP: i64 = 1;
const KTY_EC2: i64 = 2;
const KTY_RSA: i64 = 3;

const CRV_P256: i64 = 1;
const CRV_ED25519: i64 = 6;

/// COSE algorithm identifiers supported by the verification engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoseAlgorithm {
    /// ECDSA over P-256 with SHA-256 (COSE -7)
    Es256,
    /// `EdDSA` over Ed25519 (COSE -8)
    Eddsa,
    /// `RSASSA-PKCS1-v1_5` with SHA-256 (COSE -257)
    Rs256,
}

impl CoseAlgorithm {
    /// Numeric COSE identifier
    #[must_use]
    pub const fn identifier(self) -> i64 {
        match self {
            Self::Es256 => -7,
            Self::Eddsa => -8,
            Self::Rs256 => -257,
        }
    }
}

impl TryFrom<i64> for CoseAlgorithm {
    type Error = VerifyError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -7 => Ok(Self::Es256),
            -8 => Ok(Self::Eddsa),
            -257 => Ok(Self::Rs256),
            other => Err(VerifyError::UnsupportedAlgorithm(other)),
        }
    }
}

/// Decoded credential public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CosePublicKey {
    /// P-256 point for ES256, both coordinates 32 bytes
    Ec2 {
        /// X coordinate
        x: Vec<u8>,
        /// Y coordinate
        y: Vec<u8>,
    },
    /// Ed25519 point for `EdDSA`, 32 bytes
    Okp {
        /// Compressed point
        x: Vec<u8>,
    },
    /// RSA modulus and public exponent for RS256
    Rsa {
        /// Modulus, big-endian
        n: Vec<u8>,
        /// Public exponent, big-endian
        e: Vec<u8>,
    },
}

impl CosePublicKey {
    /// Decode a `COSE_Key` map from its raw CBOR bytes
    ///
    /// # Errors
    ///
    /// [`VerifyError::InvalidPublicKey`] when the bytes are not a
    /// well-formed COSE key of a known shape, and
    /// [`VerifyError::UnsupportedAlgorithm`] when the declared algorithm
    /// is outside the supported set.
    pub fn parse(bytes: &[u8]) -> Result<Self, VerifyError> {
        let value = codec::decode_cbor(bytes)
            .map_err(|e| VerifyError::InvalidPublicKey(e.to_string()))?;

        let kty = integer_entry(&value, LABEL_KTY)
            .ok_or_else(|| VerifyError::InvalidPublicKey("missing kty parameter".to_string()))?;
        let alg = integer_entry(&value, LABEL_ALG)
            .ok_or_else(|| VerifyError::InvalidPublicKey("missing alg parameter".to_string()))?;
        let alg = CoseAlgorithm::try_from(alg)?;

        match (kty, alg) {
            (KTY_EC2, CoseAlgorithm::Es256) => {
                let crv = integer_entry(&value, LABEL_CRV).ok_or_else(|| {
                    VerifyError::InvalidPublicKey("missing crv parameter".to_string())
                })?;
                if crv != CRV_P256 {
                    return Err(VerifyError::InvalidPublicKey(format!(
                        "unexpected curve {crv} for an ES256 key"
                    )));
                }
                let x = bytes_entry(&value, LABEL_X, "x")?;
                let y = bytes_entry(&value, LABEL_Y, "y")?;
                if x.len() != 32 || y.len() != 32 {
                    return Err(VerifyError::InvalidPublicKey(
                        "P-256 coordinates must be 32 bytes".to_string(),
                    ));
                }
                Ok(Self::Ec2 { x, y })
            }
            (KTY_OKP, CoseAlgorithm::Eddsa) => {
                let crv = integer_entry(&value, LABEL_CRV).ok_or_else(|| {
                    VerifyError::InvalidPublicKey("missing crv parameter".to_string())
                })?;
                if crv != CRV_ED25519 {
                    return Err(VerifyError::InvalidPublicKey(format!(
                        "unexpected curve {crv} for an EdDSA key"
                    )));
                }
                let x = bytes_entry(&value, LABEL_X, "x")?;
                if x.len() != 32 {
                    return Err(VerifyError::InvalidPublicKey(
                        "Ed25519 points must be 32 bytes".to_string(),
                    ));
                }
                Ok(Self::Okp { x })
            }
            (KTY_RSA, CoseAlgorithm::Rs256) => {
                let n = bytes_entry(&value, LABEL_RSA_N, "n")?;
                let e = bytes_entry(&value, LABEL_RSA_E, "e")?;
                if n.is_empty() || e.is_empty() {
                    return Err(VerifyError::InvalidPublicKey(
                        "RSA parameters must be non-empty".to_string(),
                    ));
                }
                Ok(Self::Rsa { n, e })
            }
            _ => Err(VerifyError::InvalidPublicKey(format!(
                "key type {kty} does not match algorithm {}",
                alg.identifier()
            ))),
        }
    }

    /// Algorithm this key verifies under
    #[must_use]
    pub const fn algorithm(&self) -> CoseAlgorithm {
        match self {
            Self::Ec2 { .. } => CoseAlgorithm::Es256,
            Self::Okp { .. } => CoseAlgorithm::Eddsa,
            Self::Rsa { .. } => CoseAlgorithm::Rs256,
        }
    }
}

fn integer_entry(value: &Value, label: i64) -> Option<i64> {
    codec::map_integer_entry(value, label)
        .and_then(Value::as_integer)
        .and_then(|i| i64::try_from(i).ok())
}

fn bytes_entry(value: &Value, label: i64, name: &str) -> Result<Vec<u8>, VerifyError> {
    codec::map_integer_entry(value, label)
        .and_then(Value::as_bytes)
        .cloned()
        .ok_or_else(|| VerifyError::InvalidPublicKey(format!("missing {name} parameter")))
}
