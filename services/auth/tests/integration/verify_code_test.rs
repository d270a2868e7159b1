use std::sync::Arc;
use std::time::Duration;

use ringpass_auth::error::AuthServiceError;
use ringpass_auth::usecase::verify::{VerifyCodeInput, VerifyCodeUseCase, find_or_create_user};
use ringpass_auth_types::token::SessionTokenIssuer;
use ringpass_testing::auth::TEST_JWT_SECRET;

use crate::helpers::{
    CODE, MockCodeStore, MockUserRepo, PHONE, RacingUserRepo, UnavailableCodeStore, test_user,
};

fn issuer() -> Arc<SessionTokenIssuer> {
    Arc::new(SessionTokenIssuer::new(TEST_JWT_SECRET.as_bytes()))
}

fn input(phone: &str, code: &str) -> VerifyCodeInput {
    VerifyCodeInput {
        phone: phone.to_owned(),
        code: code.to_owned(),
    }
}

fn pending_code() -> MockCodeStore {
    MockCodeStore::with_code(PHONE, CODE, Duration::from_secs(120))
}

#[tokio::test]
async fn should_register_new_user_and_issue_token() {
    let users = MockUserRepo::default();
    let tokens = issuer();
    let uc = VerifyCodeUseCase {
        codes: pending_code(),
        users: users.clone(),
        tokens: tokens.clone(),
    };

    let out = uc.execute(input(PHONE, CODE)).await.unwrap();

    assert!(out.created);
    assert_eq!(out.user.phone, PHONE);
    assert_eq!(users.all().len(), 1);
    assert_eq!(tokens.validate(&out.token.token).unwrap(), out.user.id);
}

#[tokio::test]
async fn should_reuse_existing_user() {
    let existing = test_user(41, PHONE);
    let users = MockUserRepo::new(vec![existing.clone()]);
    let uc = VerifyCodeUseCase {
        codes: pending_code(),
        users: users.clone(),
        tokens: issuer(),
    };

    let out = uc.execute(input(PHONE, CODE)).await.unwrap();

    assert!(!out.created);
    assert_eq!(out.user, existing);
    assert_eq!(users.all().len(), 1);
}

#[tokio::test]
async fn should_consume_code_on_success() {
    let codes = pending_code();
    let uc = VerifyCodeUseCase {
        codes: codes.clone(),
        users: MockUserRepo::default(),
        tokens: issuer(),
    };

    uc.execute(input(PHONE, CODE)).await.unwrap();
    let second = uc.execute(input(PHONE, CODE)).await;

    assert!(codes.pending(PHONE).is_none());
    assert!(
        matches!(second, Err(AuthServiceError::InvalidOtp)),
        "expected InvalidOtp on replay, got {second:?}"
    );
}

#[tokio::test]
async fn should_keep_code_through_repeated_wrong_guesses() {
    let codes = pending_code();
    let users = MockUserRepo::default();
    let uc = VerifyCodeUseCase {
        codes: codes.clone(),
        users: users.clone(),
        tokens: issuer(),
    };

    for guess in ["000000", "111111", "482914", "48291", "999999"] {
        let result = uc.execute(input(PHONE, guess)).await;
        assert!(
            matches!(result, Err(AuthServiceError::InvalidOtp)),
            "expected InvalidOtp for {guess}, got {result:?}"
        );
    }
    assert_eq!(codes.pending(PHONE).as_deref(), Some(CODE));
    assert!(users.all().is_empty(), "no user may be created on failure");

    uc.execute(input(PHONE, CODE)).await.unwrap();
}

#[tokio::test]
async fn should_reject_when_no_code_was_requested() {
    let uc = VerifyCodeUseCase {
        codes: MockCodeStore::default(),
        users: MockUserRepo::default(),
        tokens: issuer(),
    };

    let result = uc.execute(input(PHONE, CODE)).await;

    assert!(matches!(result, Err(AuthServiceError::InvalidOtp)), "got {result:?}");
}

#[tokio::test(start_paused = true)]
async fn should_reject_expired_code_like_wrong_code() {
    let uc = VerifyCodeUseCase {
        codes: pending_code(),
        users: MockUserRepo::default(),
        tokens: issuer(),
    };

    tokio::time::advance(Duration::from_secs(121)).await;
    let expired = uc.execute(input(PHONE, CODE)).await.unwrap_err();
    let wrong = uc.execute(input(PHONE, "000000")).await.unwrap_err();

    assert!(matches!(expired, AuthServiceError::InvalidOtp), "got {expired:?}");
    assert_eq!(expired.kind(), wrong.kind());
    assert_eq!(expired.to_string(), wrong.to_string());
}

#[tokio::test]
async fn should_reject_missing_fields() {
    let uc = VerifyCodeUseCase {
        codes: pending_code(),
        users: MockUserRepo::default(),
        tokens: issuer(),
    };

    for (phone, code) in [("", CODE), (PHONE, ""), ("  ", "")] {
        let result = uc.execute(input(phone, code)).await;
        assert!(
            matches!(result, Err(AuthServiceError::InvalidRequest)),
            "expected InvalidRequest for ({phone:?}, {code:?}), got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_fail_internal_when_code_store_is_down() {
    let uc = VerifyCodeUseCase {
        codes: UnavailableCodeStore,
        users: MockUserRepo::default(),
        tokens: issuer(),
    };

    let result = uc.execute(input(PHONE, CODE)).await;

    assert!(
        matches!(result, Err(AuthServiceError::Internal(_))),
        "store failure must not look like a wrong code, got {result:?}"
    );
}

#[tokio::test]
async fn should_resolve_concurrent_first_verifications_to_one_user() {
    let repo = RacingUserRepo::new();

    let (a, b) = tokio::join!(
        find_or_create_user(&repo, PHONE),
        find_or_create_user(&repo, PHONE),
    );
    let (a, a_created) = a.unwrap();
    let (b, b_created) = b.unwrap();

    assert_eq!(a.id, b.id);
    assert!(a_created ^ b_created, "exactly one caller registers the user");
    assert_eq!(repo.inner.all().len(), 1);
}
