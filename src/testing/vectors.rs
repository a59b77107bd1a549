//! Fixed ceremony payloads with real signatures
//!
//! Generated once with an independent COSE/`WebAuthn` implementation and
//! checked there before being frozen here, so every signature verifies
//! and tampering with any byte is detectable. All vectors are bound to
//! the same relying party ([`RP_ID`], [`ORIGIN`]), and the ES256
//! credential is shared by the registration and assertion vectors so a
//! full register-then-authenticate flow can run against fixed data.

use ciborium::value::Value;

use super::builders;
use crate::codec;

/// Relying party id every vector is bound to
pub const RP_ID: &str = "example.com";
/// Origin every vector is bound to
pub const ORIGIN: &str = "https://example.com";

/// AAGUID carried by the registration vectors
pub const AAGUID: &[u8; 16] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
/// Credential id shared by all vectors
pub const CREDENTIAL_ID: &[u8] = &[
    0xa0, 0xa1, 0xa2, 0xa3, 0xa4, 0xa5, 0xa6, 0xa7, 0xa8, 0xa9, 0xaa, 0xab, 0xac, 0xad, 0xae,
    0xaf,
];
/// `Base64URL` form of [`CREDENTIAL_ID`]
pub const CREDENTIAL_ID_B64: &str = "oKGio6SlpqeoqaqrrK2urw";

// Registration: flags 0x45 (UP, UV, AT), counter 0, ES256 credential key.

/// Challenge issued for the registration vectors
pub const REG_CHALLENGE: &str = "8QAcM10_SKM1flyfSyqHDw";
/// clientDataJSON for the registration vectors
pub const REG_CLIENT_DATA_B64: &str = "eyJ0eXBlIjoid2ViYXV0aG4uY3JlYXRlIiwiY2hhbGxlbmdlIjoiOFFBY00xMF9TS00xZmx5ZlN5cUhEdyIsIm9yaWdpbiI6Imh0dHBzOi8vZXhhbXBsZS5jb20iLCJjcm9zc09yaWdpbiI6ZmFsc2V9";
/// Registration authenticator data on its own, outside any attestation object
pub const REG_AUTH_DATA_B64: &str = "o3mm9u6vuaVeN4wRgDTidR5oL6ufLTCrE9ISVYbOGUdFAAAAAAABAgMEBQYHCAkKCwwNDg8AEKChoqOkpaanqKmqq6ytrq-lAQIDJiABIVggM52nXrhCJJoPzEfezPWc8yEF6Zyhi7FodGgeK9_8_-QiWCAomk8jpZyTqSZKzqu8raSyjf2Zf0J5m_GRgNPzLAvWtQ";
/// Attestation object with fmt "none" and an empty statement
pub const REG_ATTESTATION_OBJECT_NONE_B64: &str = "o2NmbXRkbm9uZWdhdHRTdG10oGhhdXRoRGF0YViUo3mm9u6vuaVeN4wRgDTidR5oL6ufLTCrE9ISVYbOGUdFAAAAAAABAgMEBQYHCAkKCwwNDg8AEKChoqOkpaanqKmqq6ytrq-lAQIDJiABIVggM52nXrhCJJoPzEfezPWc8yEF6Zyhi7FodGgeK9_8_-QiWCAomk8jpZyTqSZKzqu8raSyjf2Zf0J5m_GRgNPzLAvWtQ";
/// Attestation object with fmt "packed" and a valid self-attestation signature
pub const REG_ATTESTATION_OBJECT_PACKED_B64: &str = "o2NmbXRmcGFja2VkZ2F0dFN0bXSiY2FsZyZjc2lnWEcwRQIhAItUEodAgwDmH4YOAKbUmSIsjbaJDrCGG8USut_6RN40AiAOUhPWgchYqvCoURy6P9CYcmUpVXAVGnb7e9drKxBk5mhhdXRoRGF0YViUo3mm9u6vuaVeN4wRgDTidR5oL6ufLTCrE9ISVYbOGUdFAAAAAAABAgMEBQYHCAkKCwwNDg8AEKChoqOkpaanqKmqq6ytrq-lAQIDJiABIVggM52nXrhCJJoPzEfezPWc8yEF6Zyhi7FodGgeK9_8_-QiWCAomk8jpZyTqSZKzqu8raSyjf2Zf0J5m_GRgNPzLAvWtQ";
/// The packed object above with one signature byte flipped
pub const REG_ATTESTATION_OBJECT_PACKED_BADSIG_B64: &str = "o2NmbXRmcGFja2VkZ2F0dFN0bXSiY2FsZyZjc2lnWEcwRQIhAItUEodAgwDmH4YOAKbUmSIsjbaJDrCGG8USut_6RN40AiAOUhPWgchYqvCoURy6P9CYcmUpVXAVGnb7e9drKxBkGWhhdXRoRGF0YViUo3mm9u6vuaVeN4wRgDTidR5oL6ufLTCrE9ISVYbOGUdFAAAAAAABAgMEBQYHCAkKCwwNDg8AEKChoqOkpaanqKmqq6ytrq-lAQIDJiABIVggM52nXrhCJJoPzEfezPWc8yEF6Zyhi7FodGgeK9_8_-QiWCAomk8jpZyTqSZKzqu8raSyjf2Zf0J5m_GRgNPzLAvWtQ";

// ES256 assertion: flags 0x05 (UP, UV), counter 6, same credential as
// the registration vectors.

/// Challenge issued for the ES256 assertion
pub const ES256_CHALLENGE: &str = "EnoFDwplOlxSabMxfM_7hw";
/// clientDataJSON for the ES256 assertion
pub const ES256_CLIENT_DATA_B64: &str = "eyJ0eXBlIjoid2ViYXV0aG4uZ2V0IiwiY2hhbGxlbmdlIjoiRW5vRkR3cGxPbHhTYWJNeGZNXzdodyIsIm9yaWdpbiI6Imh0dHBzOi8vZXhhbXBsZS5jb20iLCJjcm9zc09yaWdpbiI6ZmFsc2V9";
/// Raw authenticator data for the ES256 assertion
pub const ES256_AUTHENTICATOR_DATA_B64: &str = "o3mm9u6vuaVeN4wRgDTidR5oL6ufLTCrE9ISVYbOGUcFAAAABg";
/// ASN.1 DER ECDSA signature for the ES256 assertion
pub const ES256_SIGNATURE_B64: &str = "MEYCIQCbY9C2I-2ztIKMkN75DTVBRZr_cJXbtm5VTgP_e7Rt0QIhAOL4MI2NDJJtGuOtRfrSez-RuIsnyQBMfl1C3wdVfyIV";

// Presence-only assertion: flags 0x01 (UP only), counter 7, signed with
// the ES256 credential key.

/// Challenge issued for the presence-only assertion
pub const UP_ONLY_CHALLENGE: &str = "-hiUTmsFvYEmztc0r7qXMA";
/// clientDataJSON for the presence-only assertion
pub const UP_ONLY_CLIENT_DATA_B64: &str = "eyJ0eXBlIjoid2ViYXV0aG4uZ2V0IiwiY2hhbGxlbmdlIjoiLWhpVVRtc0Z2WUVtenRjMHI3cVhNQSIsIm9yaWdpbiI6Imh0dHBzOi8vZXhhbXBsZS5jb20iLCJjcm9zc09yaWdpbiI6ZmFsc2V9";
/// Raw authenticator data for the presence-only assertion
pub const UP_ONLY_AUTHENTICATOR_DATA_B64: &str = "o3mm9u6vuaVeN4wRgDTidR5oL6ufLTCrE9ISVYbOGUcBAAAABw";
/// Signature for the presence-only assertion
pub const UP_ONLY_SIGNATURE_B64: &str = "MEUCIQC2jL0LUwE9pmi38XHXwYDgylWcnPPSZQjNtPv_J1--4QIgPXeFnjEI6TowLBpFx3BwKgVJ2bY1QoGNvly1gNEbDbw";

// Ed25519 assertion: flags 0x05, counter 10.

/// Challenge issued for the Ed25519 assertion
pub const ED25519_CHALLENGE: &str = "vSYVxKum13mVPKYsDrem2A";
/// clientDataJSON for the Ed25519 assertion
pub const ED25519_CLIENT_DATA_B64: &str = "eyJ0eXBlIjoid2ViYXV0aG4uZ2V0IiwiY2hhbGxlbmdlIjoidlNZVnhLdW0xM21WUEtZc0RyZW0yQSIsIm9yaWdpbiI6Imh0dHBzOi8vZXhhbXBsZS5jb20iLCJjcm9zc09yaWdpbiI6ZmFsc2V9";
/// Raw authenticator data for the Ed25519 assertion
pub const ED25519_AUTHENTICATOR_DATA_B64: &str = "o3mm9u6vuaVeN4wRgDTidR5oL6ufLTCrE9ISVYbOGUcFAAAACg";
/// Raw Ed25519 signature
pub const ED25519_SIGNATURE_B64: &str = "B9m0P2_7co3ML97Yfx1RzkmMVX6rxmoB3b7OCeDA51MuO0qekmtTAQVU9YeRx8cWEuGbjG3aIfrvaewqhyi8BQ";

// RS256 assertion: flags 0x05, counter 3, 2048-bit key.

/// Challenge issued for the RS256 assertion
pub const RS256_CHALLENGE: &str = "61Tb6Kofharbu7Bu0C0cQQ";
/// clientDataJSON for the RS256 assertion
pub const RS256_CLIENT_DATA_B64: &str = "eyJ0eXBlIjoid2ViYXV0aG4uZ2V0IiwiY2hhbGxlbmdlIjoiNjFUYjZLb2ZoYXJidTdCdTBDMGNRUSIsIm9yaWdpbiI6Imh0dHBzOi8vZXhhbXBsZS5jb20iLCJjcm9zc09yaWdpbiI6ZmFsc2V9";
/// Raw authenticator data for the RS256 assertion
pub const RS256_AUTHENTICATOR_DATA_B64: &str = "o3mm9u6vuaVeN4wRgDTidR5oL6ufLTCrE9ISVYbOGUcFAAAAAw";
/// `RSASSA-PKCS1-v1_5` signature, 256 bytes
pub const RS256_SIGNATURE_B64: &str = "Kwn7Eq6UfUqYC22JVri58gqSv-BUvg-Oz8davLOWpH5O4pUzFYKU-Xba0GtoKfaRGKtseTlO5uwb_xhIpPag4a5njJVwxhrAO3rHzKTVij3BIBJnYXj-k0mHer71zTrVi6newtp9VGutj1Ukjgx4q93NAtiEtcEcOYp7jfb98mS76rEuZ9MZsInOqZPqBXcT3c8Ud6FWtxTZsfJj9eCtOqCPVBF38X-SYyMgPFDj3p4MsdlVC7wCT5tmWRWLCVReu9CZLnMtNmC80vfTWCOOujKicGIZJXFEHV5nTfU7xYowXGrPAt2CiDcPn4J5rgqU5iLf89yuRQcj43FlnKUJ0A";

// Parser fixtures without signatures.

/// Authenticator data with AT and ED both set (flags 0xC5, counter 9,
/// extensions {"credProtect": 2})
pub const AT_ED_AUTH_DATA_B64: &str = "o3mm9u6vuaVeN4wRgDTidR5oL6ufLTCrE9ISVYbOGUfFAAAACQABAgMEBQYHCAkKCwwNDg8AEKChoqOkpaanqKmqq6ytrq-lAQIDJiABIVggM52nXrhCJJoPzEfezPWc8yEF6Zyhi7FodGgeK9_8_-QiWCAomk8jpZyTqSZKzqu8raSyjf2Zf0J5m_GRgNPzLAvWtaFrY3JlZFByb3RlY3QC";
/// Authenticator data with ED but not AT (flags 0x81, counter 2)
pub const ED_ONLY_AUTH_DATA_B64: &str = "o3mm9u6vuaVeN4wRgDTidR5oL6ufLTCrE9ISVYbOGUeBAAAAAqFrY3JlZFByb3RlY3QC";

/// ES256 COSE key (EC2, P-256) for the shared credential
pub const ES256_COSE_KEY: &[u8] = &[
    165, 1, 2, 3, 38, 32, 1, 33, 88, 32, 51, 157, 167, 94, 184, 66, 36, 154, 15, 204, 71, 222,
    204, 245, 156, 243, 33, 5, 233, 156, 161, 139, 177, 104, 116, 104, 30, 43, 223, 252, 255, 228,
    34, 88, 32, 40, 154, 79, 35, 165, 156, 147, 169, 38, 74, 206, 171, 188, 173, 164, 178, 141,
    253, 153, 127, 66, 121, 155, 241, 145, 128, 211, 243, 44, 11, 214, 181,
];

/// Ed25519 COSE key (OKP)
pub const ED25519_COSE_KEY: &[u8] = &[
    164, 1, 1, 3, 39, 32, 6, 33, 88, 32, 93, 157, 200, 111, 150, 145, 229, 55, 76, 212, 100, 112,
    228, 18, 27, 47, 21, 198, 215, 238, 8, 40, 35, 32, 174, 16, 87, 198, 94, 234, 202, 176,
];

/// RS256 COSE key (RSA 2048, e = 65537)
pub const RS256_COSE_KEY: &[u8] = &[
    164, 1, 3, 3, 57, 1, 0, 32, 89, 1, 0, 189, 169, 111, 150, 208, 110, 213, 168, 209, 189, 215,
    66, 217, 225, 163, 211, 79, 109, 210, 147, 26, 200, 155, 93, 126, 123, 44, 180, 114, 99, 229,
    80, 191, 179, 99, 163, 165, 30, 119, 129, 64, 75, 226, 135, 208, 3, 116, 54, 10, 71, 220, 27,
    80, 55, 66, 180, 175, 117, 140, 27, 8, 127, 91, 66, 215, 143, 119, 186, 191, 53, 92, 240, 92,
    171, 0, 67, 29, 136, 221, 184, 1, 86, 240, 112, 179, 143, 52, 20, 3, 15, 53, 41, 29, 10, 148,
    25, 198, 58, 180, 59, 168, 131, 118, 9, 132, 60, 131, 29, 168, 232, 108, 151, 104, 97, 175,
    114, 225, 94, 121, 140, 13, 7, 171, 179, 212, 183, 149, 69, 224, 92, 214, 61, 218, 94, 25,
    232, 32, 166, 190, 79, 188, 202, 89, 5, 111, 13, 10, 104, 82, 3, 111, 241, 194, 168, 241, 54,
    91, 112, 255, 108, 37, 94, 30, 141, 28, 211, 35, 83, 0, 197, 37, 125, 98, 203, 22, 134, 34,
    83, 239, 201, 26, 134, 84, 101, 19, 87, 97, 162, 145, 124, 210, 107, 69, 60, 45, 59, 221, 85,
    149, 47, 183, 36, 152, 10, 156, 255, 30, 186, 144, 30, 148, 103, 144, 95, 236, 107, 53, 149,
    187, 196, 149, 135, 213, 109, 93, 44, 245, 10, 69, 147, 10, 138, 35, 239, 93, 11, 113, 152, 2,
    71, 200, 179, 34, 157, 116, 157, 185, 79, 7, 240, 75, 169, 79, 151, 228, 209, 33, 67, 1, 0, 1,
];

/// Rewrap the registration authenticator data under a different
/// attestation format with an empty statement
///
/// # Panics
///
/// Panics when [`REG_AUTH_DATA_B64`] does not decode, which a fixed
/// vector does not.
#[must_use]
pub fn reg_attestation_object_with_format(fmt: &str) -> String {
    let auth_data = codec::base64url_decode(REG_AUTH_DATA_B64).expect("fixed vector decodes");
    builders::attestation_object_b64(fmt, Value::Map(Vec::new()), &auth_data)
}
