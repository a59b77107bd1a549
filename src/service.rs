//! Passkey service
//!
//! Thin orchestration over the parsers and the verification engine: the
//! service holds the relying party settings and supplies the expected
//! origin, relying party id, and policy for each ceremony. Challenge
//! issuance, credential lookup, and persistence stay with the caller, so
//! the service is freely shareable across threads.

use log::debug;

use crate::errors::PasskeyError;
use crate::settings::PassgateSettings;
use crate::types::{
    RegisteredCredential, SerializedAssertionResponse, SerializedAttestationResponse,
    StoredCredential, VerifiedAuthentication,
};
use crate::verify;

/// Passkey registration and authentication over configured settings
#[derive(Debug, Clone)]
pub struct Passgate {
    settings: PassgateSettings,
}

impl Passgate {
    /// Create a service from settings
    #[must_use]
    pub fn new(settings: PassgateSettings) -> Self {
        Self { settings }
    }

    /// Settings the service verifies against
    #[must_use]
    pub fn settings(&self) -> &PassgateSettings {
        &self.settings
    }

    /// Parse and verify a registration response
    ///
    /// `expected_challenge` is the challenge issued for this ceremony,
    /// still in its `Base64URL` form. On success the caller persists the
    /// returned credential record.
    ///
    /// # Errors
    ///
    /// [`PasskeyError::Parse`] when the payload is malformed,
    /// [`PasskeyError::Verify`] when a ceremony check fails.
    pub fn complete_registration(
        &self,
        response: &SerializedAttestationResponse,
        expected_challenge: &str,
    ) -> Result<RegisteredCredential, PasskeyError> {
        let parsed = response.parse()?;
        let credential = verify::verify_registration(
            &parsed,
            expected_challenge,
            &self.settings.relying_party.origin,
            &self.settings.relying_party.id,
            &self.settings.policy,
        )?;
        debug!("registered credential {}", credential.credential_id);
        Ok(credential)
    }

    /// Parse and verify an authentication response
    ///
    /// `credential` is the stored record the caller looked up by the
    /// response's credential id. On success the caller persists the
    /// returned `sign_count`, atomically with the read of the stored one.
    ///
    /// # Errors
    ///
    /// [`PasskeyError::Parse`] when the payload is malformed,
    /// [`PasskeyError::Verify`] when a ceremony check fails.
    pub fn complete_authentication(
        &self,
        response: &SerializedAssertionResponse,
        credential: &StoredCredential,
        expected_challenge: &str,
    ) -> Result<VerifiedAuthentication, PasskeyError> {
        let parsed = response.parse()?;
        let verified = verify::verify_authentication(
            &parsed,
            &credential.public_key,
            credential.sign_count,
            expected_challenge,
            &self.settings.relying_party.origin,
            &self.settings.relying_party.id,
            &self.settings.policy,
        )?;
        debug!(
            "authenticated credential {} (counter {} -> {})",
            credential.credential_id, credential.sign_count, verified.sign_count
        );
        Ok(verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ParseError, VerifyError};
    use crate::settings::RelyingPartySettings;
    use crate::testing::builders;
    use crate::testing::vectors;

    fn service() -> Passgate {
        Passgate::new(PassgateSettings {
            relying_party: RelyingPartySettings {
                id: vectors::RP_ID.to_string(),
                name: "Example".to_string(),
                origin: vectors::ORIGIN.to_string(),
            },
            ..PassgateSettings::default()
        })
    }

    #[test]
    fn test_complete_registration() {
        let response = builders::serialized_attestation(
            vectors::CREDENTIAL_ID_B64,
            vectors::REG_CLIENT_DATA_B64,
            vectors::REG_ATTESTATION_OBJECT_NONE_B64,
        );
        let credential = service()
            .complete_registration(&response, vectors::REG_CHALLENGE)
            .unwrap();
        assert_eq!(credential.credential_id, vectors::CREDENTIAL_ID_B64);
        assert_eq!(credential.sign_count, 0);
    }

    #[test]
    fn test_complete_authentication() {
        let response = builders::serialized_assertion(
            vectors::CREDENTIAL_ID_B64,
            vectors::ES256_CLIENT_DATA_B64,
            vectors::ES256_AUTHENTICATOR_DATA_B64,
            vectors::ES256_SIGNATURE_B64,
            None,
        );
        let stored = StoredCredential {
            credential_id: vectors::CREDENTIAL_ID_B64.to_string(),
            public_key: vectors::ES256_COSE_KEY.to_vec(),
            sign_count: 5,
            user_handle: None,
        };
        let verified = service()
            .complete_authentication(&response, &stored, vectors::ES256_CHALLENGE)
            .unwrap();
        assert_eq!(verified.sign_count, 6);
    }

    #[test]
    fn test_registration_parse_failure_maps_to_parse_category() {
        let response = builders::serialized_attestation(
            vectors::CREDENTIAL_ID_B64,
            vectors::REG_CLIENT_DATA_B64,
            "@@not base64@@",
        );
        let err = service()
            .complete_registration(&response, vectors::REG_CHALLENGE)
            .unwrap_err();
        assert!(matches!(
            err,
            PasskeyError::Parse(ParseError::AttestationObjectCbor(_))
        ));
        assert_eq!(err.detail().code, "parsing_error");
    }

    #[test]
    fn test_authentication_verify_failure_maps_to_verify_category() {
        let response = builders::serialized_assertion(
            vectors::CREDENTIAL_ID_B64,
            vectors::ES256_CLIENT_DATA_B64,
            vectors::ES256_AUTHENTICATOR_DATA_B64,
            vectors::ES256_SIGNATURE_B64,
            None,
        );
        let stored = StoredCredential {
            credential_id: vectors::CREDENTIAL_ID_B64.to_string(),
            public_key: vectors::ES256_COSE_KEY.to_vec(),
            // Asserted counter is 6: stored 6 means no advance
            sign_count: 6,
            user_handle: None,
        };
        let err = service()
            .complete_authentication(&response, &stored, vectors::ES256_CHALLENGE)
            .unwrap_err();
        assert_eq!(
            err,
            PasskeyError::Verify(VerifyError::CounterRegression {
                stored: 6,
                asserted: 6,
            })
        );
        assert_eq!(err.reason(), "counter_mismatch");
    }

    #[test]
    fn test_service_rejects_challenge_reuse_across_ceremonies() {
        // An assertion completed against the registration challenge fails
        let response = builders::serialized_assertion(
            vectors::CREDENTIAL_ID_B64,
            vectors::ES256_CLIENT_DATA_B64,
            vectors::ES256_AUTHENTICATOR_DATA_B64,
            vectors::ES256_SIGNATURE_B64,
            None,
        );
        let stored = StoredCredential {
            credential_id: vectors::CREDENTIAL_ID_B64.to_string(),
            public_key: vectors::ES256_COSE_KEY.to_vec(),
            sign_count: 0,
            user_handle: None,
        };
        let err = service()
            .complete_authentication(&response, &stored, vectors::REG_CHALLENGE)
            .unwrap_err();
        assert_eq!(err.reason(), "invalid_challenge");
    }
}
