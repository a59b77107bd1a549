//! End-to-end ceremony flows over the public API
//!
//! These tests drive the same sequence a relying party does: configure
//! the service, complete a registration, persist the returned record,
//! then complete authentications against it.

use passgate::testing::{builders, vectors};
use passgate::{
    AttestationPolicy, Passgate, PassgateSettings, PasskeyError, StoredCredential,
    UserVerificationPolicy, VerifyError,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn test_settings() -> PassgateSettings {
    let mut settings = PassgateSettings::default();
    settings.relying_party.id = vectors::RP_ID.to_string();
    settings.relying_party.name = "Example".to_string();
    settings.relying_party.origin = vectors::ORIGIN.to_string();
    settings
}

#[test]
fn test_register_then_authenticate_round_trip() {
    init_logging();
    let service = Passgate::new(test_settings());

    // Registration with the challenge the server issued for it
    let registration = builders::serialized_attestation(
        vectors::CREDENTIAL_ID_B64,
        vectors::REG_CLIENT_DATA_B64,
        vectors::REG_ATTESTATION_OBJECT_NONE_B64,
    );
    let credential = service
        .complete_registration(&registration, vectors::REG_CHALLENGE)
        .unwrap();
    assert_eq!(credential.credential_id, vectors::CREDENTIAL_ID_B64);
    assert_eq!(credential.attestation_format, "none");
    assert!(credential.user_verified);

    // Persist, then authenticate against the stored record
    let mut stored = StoredCredential::from_registration(&credential, None);
    let assertion = builders::serialized_assertion(
        vectors::CREDENTIAL_ID_B64,
        vectors::ES256_CLIENT_DATA_B64,
        vectors::ES256_AUTHENTICATOR_DATA_B64,
        vectors::ES256_SIGNATURE_B64,
        None,
    );
    let verified = service
        .complete_authentication(&assertion, &stored, vectors::ES256_CHALLENGE)
        .unwrap();
    assert_eq!(verified.sign_count, 6);
    assert!(verified.user_verified);

    // After persisting the new counter, replaying the same assertion is
    // a counter regression
    stored.sign_count = verified.sign_count;
    let err = service
        .complete_authentication(&assertion, &stored, vectors::ES256_CHALLENGE)
        .unwrap_err();
    assert_eq!(err.reason(), "counter_mismatch");
}

#[test]
fn test_packed_attestation_under_strict_policy() {
    init_logging();
    let mut settings = test_settings();
    settings.policy.attestation = AttestationPolicy::Strict;
    let service = Passgate::new(settings);

    let good = builders::serialized_attestation(
        vectors::CREDENTIAL_ID_B64,
        vectors::REG_CLIENT_DATA_B64,
        vectors::REG_ATTESTATION_OBJECT_PACKED_B64,
    );
    let credential = service
        .complete_registration(&good, vectors::REG_CHALLENGE)
        .unwrap();
    assert_eq!(credential.attestation_format, "packed");

    let bad = builders::serialized_attestation(
        vectors::CREDENTIAL_ID_B64,
        vectors::REG_CLIENT_DATA_B64,
        vectors::REG_ATTESTATION_OBJECT_PACKED_BADSIG_B64,
    );
    let err = service
        .complete_registration(&bad, vectors::REG_CHALLENGE)
        .unwrap_err();
    assert_eq!(
        err,
        PasskeyError::Verify(VerifyError::InvalidAttestationSignature)
    );
}

#[test]
fn test_strict_policy_rejects_formats_the_engine_cannot_verify() {
    let mut settings = test_settings();
    settings.policy.attestation = AttestationPolicy::Strict;
    let service = Passgate::new(settings);

    let response = builders::serialized_attestation(
        vectors::CREDENTIAL_ID_B64,
        vectors::REG_CLIENT_DATA_B64,
        &vectors::reg_attestation_object_with_format("tpm"),
    );
    let err = service
        .complete_registration(&response, vectors::REG_CHALLENGE)
        .unwrap_err();
    assert_eq!(err.reason(), "unsupported_attestation_format");

    // The permissive default accepts the same response
    let permissive = Passgate::new(test_settings());
    let credential = permissive
        .complete_registration(&response, vectors::REG_CHALLENGE)
        .unwrap();
    assert_eq!(credential.attestation_format, "tpm");
}

#[test]
fn test_authenticates_ed25519_credential() {
    let service = Passgate::new(test_settings());
    let stored = StoredCredential {
        credential_id: vectors::CREDENTIAL_ID_B64.to_string(),
        public_key: vectors::ED25519_COSE_KEY.to_vec(),
        sign_count: 9,
        user_handle: None,
    };
    let assertion = builders::serialized_assertion(
        vectors::CREDENTIAL_ID_B64,
        vectors::ED25519_CLIENT_DATA_B64,
        vectors::ED25519_AUTHENTICATOR_DATA_B64,
        vectors::ED25519_SIGNATURE_B64,
        None,
    );
    let verified = service
        .complete_authentication(&assertion, &stored, vectors::ED25519_CHALLENGE)
        .unwrap();
    assert_eq!(verified.sign_count, 10);
}

#[test]
fn test_authenticates_rs256_credential() {
    let service = Passgate::new(test_settings());
    let stored = StoredCredential {
        credential_id: vectors::CREDENTIAL_ID_B64.to_string(),
        public_key: vectors::RS256_COSE_KEY.to_vec(),
        sign_count: 2,
        user_handle: Some("dXNlcg".to_string()),
    };
    let assertion = builders::serialized_assertion(
        vectors::CREDENTIAL_ID_B64,
        vectors::RS256_CLIENT_DATA_B64,
        vectors::RS256_AUTHENTICATOR_DATA_B64,
        vectors::RS256_SIGNATURE_B64,
        None,
    );
    let verified = service
        .complete_authentication(&assertion, &stored, vectors::RS256_CHALLENGE)
        .unwrap();
    assert_eq!(verified.sign_count, 3);
}

#[test]
fn test_user_verification_policy_gates_presence_only_assertions() {
    let stored = StoredCredential {
        credential_id: vectors::CREDENTIAL_ID_B64.to_string(),
        public_key: vectors::ES256_COSE_KEY.to_vec(),
        sign_count: 0,
        user_handle: None,
    };
    let assertion = builders::serialized_assertion(
        vectors::CREDENTIAL_ID_B64,
        vectors::UP_ONLY_CLIENT_DATA_B64,
        vectors::UP_ONLY_AUTHENTICATOR_DATA_B64,
        vectors::UP_ONLY_SIGNATURE_B64,
        None,
    );

    // Preferred: records the missing UV but accepts
    let service = Passgate::new(test_settings());
    let verified = service
        .complete_authentication(&assertion, &stored, vectors::UP_ONLY_CHALLENGE)
        .unwrap();
    assert!(!verified.user_verified);

    // Required: rejects the same assertion
    let mut settings = test_settings();
    settings.policy.user_verification = UserVerificationPolicy::Required;
    let strict = Passgate::new(settings);
    let err = strict
        .complete_authentication(&assertion, &stored, vectors::UP_ONLY_CHALLENGE)
        .unwrap_err();
    assert_eq!(err, PasskeyError::Verify(VerifyError::UserNotVerified));
}

#[test]
fn test_stale_challenge_is_rejected_before_any_crypto() {
    let service = Passgate::new(test_settings());
    let stored = StoredCredential {
        credential_id: vectors::CREDENTIAL_ID_B64.to_string(),
        public_key: vectors::ES256_COSE_KEY.to_vec(),
        sign_count: 0,
        user_handle: None,
    };

    // Client data echoing yesterday's challenge; the signature does not
    // matter because the challenge check runs first
    let stale_client_data = passgate::codec::base64url_encode(&builders::client_data_json(
        "webauthn.get",
        "c3RhbGUtY2hhbGxlbmdl",
        vectors::ORIGIN,
    ));
    let assertion = builders::serialized_assertion(
        vectors::CREDENTIAL_ID_B64,
        &stale_client_data,
        vectors::ES256_AUTHENTICATOR_DATA_B64,
        vectors::ES256_SIGNATURE_B64,
        None,
    );
    let err = service
        .complete_authentication(&assertion, &stored, &passgate::generate_challenge())
        .unwrap_err();
    assert_eq!(err.reason(), "invalid_challenge");
}

#[test]
fn test_origin_swap_is_rejected() {
    let mut settings = test_settings();
    settings.relying_party.origin = "https://other.example.com".to_string();
    let service = Passgate::new(settings);
    let stored = StoredCredential {
        credential_id: vectors::CREDENTIAL_ID_B64.to_string(),
        public_key: vectors::ES256_COSE_KEY.to_vec(),
        sign_count: 0,
        user_handle: None,
    };
    let assertion = builders::serialized_assertion(
        vectors::CREDENTIAL_ID_B64,
        vectors::ES256_CLIENT_DATA_B64,
        vectors::ES256_AUTHENTICATOR_DATA_B64,
        vectors::ES256_SIGNATURE_B64,
        None,
    );
    let err = service
        .complete_authentication(&assertion, &stored, vectors::ES256_CHALLENGE)
        .unwrap_err();
    assert_eq!(err.reason(), "invalid_origin");
}

#[test]
fn test_parse_failures_and_verify_failures_keep_their_categories() {
    let service = Passgate::new(test_settings());

    // Truncated attestation object: a parse failure
    let broken = builders::serialized_attestation(
        vectors::CREDENTIAL_ID_B64,
        vectors::REG_CLIENT_DATA_B64,
        "oWNmbXQ",
    );
    let err = service
        .complete_registration(&broken, vectors::REG_CHALLENGE)
        .unwrap_err();
    assert!(matches!(err, PasskeyError::Parse(_)));
    let detail = err.detail();
    assert_eq!(detail.code, "parsing_error");

    // Wrong challenge: a verification failure with the same wire shape
    let ok_payload = builders::serialized_attestation(
        vectors::CREDENTIAL_ID_B64,
        vectors::REG_CLIENT_DATA_B64,
        vectors::REG_ATTESTATION_OBJECT_NONE_B64,
    );
    let err = service
        .complete_registration(&ok_payload, "d3JvbmcgY2hhbGxlbmdl")
        .unwrap_err();
    assert!(matches!(err, PasskeyError::Verify(_)));
    let detail = err.detail();
    assert_eq!(detail.code, "verification_error");
    assert_eq!(detail.reason, "invalid_challenge");

    // Details serialize flat for transport
    let json = serde_json::to_value(&detail).unwrap();
    assert_eq!(json["reason"], "invalid_challenge");
    assert!(json["message"].is_string());
}

#[test]
fn test_generated_challenges_are_distinct_and_decodable() {
    let service = Passgate::new(test_settings());
    assert_eq!(service.settings().relying_party.id, vectors::RP_ID);

    let challenges: Vec<String> = (0..8).map(|_| passgate::generate_challenge()).collect();
    for challenge in &challenges {
        let bytes = passgate::codec::base64url_decode(challenge).unwrap();
        assert_eq!(bytes.len(), 32);
    }
    let mut deduped = challenges.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), challenges.len());
}
