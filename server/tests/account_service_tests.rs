mod test_utils;

use cirrus_server_lib::account_service;
use cirrus_server_lib::ClientError;
use cirrus_shared::api::{
    ChangeNameError, ChangeNameRequest, ChangePasswordError, ChangePasswordRequest, GetMeRequest,
    LoginError, LoginRequest, SignupError, SignupRequest,
};
use cirrus_shared::tier::SubscriptionTier;
use cirrus_server_lib::RequestContext;
use uuid::Uuid;

use test_utils::{random_email, signed_up_user, test_state};

#[tokio::test]
async fn signup_starts_on_the_free_tier_with_a_live_session() {
    let (state, _, _dir) = test_state();
    let email = random_email();

    let (user_id, token, session) = signed_up_user(&state, &email).await;

    assert_eq!(session.user_id, user_id);
    assert_eq!(session.tier, SubscriptionTier::Free);
    assert!(state.sessions.get(&token).is_some());
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let (state, _, _dir) = test_state();
    let email = random_email();
    signed_up_user(&state, &email).await;

    let result = account_service::signup(
        &state,
        SignupRequest {
            name: "other".to_string(),
            email: email.clone(),
            password: "password456".to_string(),
            confirm_password: "password456".to_string(),
        },
    )
    .await;

    match result {
        Err(ClientError(SignupError::EmailTaken)) => {}
        other => panic!("expected EmailTaken, got {other:?}"),
    }
}

#[tokio::test]
async fn mismatched_signup_passwords_rejected() {
    let (state, _, _dir) = test_state();

    let result = account_service::signup(
        &state,
        SignupRequest {
            name: "probe".to_string(),
            email: random_email(),
            password: "password123".to_string(),
            confirm_password: "password124".to_string(),
        },
    )
    .await;

    match result {
        Err(ClientError(SignupError::PasswordsDontMatch)) => {}
        other => panic!("expected PasswordsDontMatch, got {other:?}"),
    }
}

#[tokio::test]
async fn login_distinguishes_unknown_user_from_bad_password() {
    let (state, _, _dir) = test_state();
    let email = random_email();
    signed_up_user(&state, &email).await;

    let unknown = account_service::login(
        &state,
        LoginRequest {
            email: random_email(),
            password: "password123".to_string(),
        },
    )
    .await;
    match unknown {
        Err(ClientError(LoginError::UserNotFound)) => {}
        other => panic!("expected UserNotFound, got {other:?}"),
    }

    let bad_password = account_service::login(
        &state,
        LoginRequest { email, password: "not the password".to_string() },
    )
    .await;
    match bad_password {
        Err(ClientError(LoginError::InvalidPassword)) => {}
        other => panic!("expected InvalidPassword, got {other:?}"),
    }
}

#[tokio::test]
async fn email_lookup_is_case_insensitive() {
    let (state, _, _dir) = test_state();
    let email = random_email();
    signed_up_user(&state, &email).await;

    let (identity, _) = account_service::login(
        &state,
        LoginRequest { email: email.to_uppercase(), password: "password123".to_string() },
    )
    .await
    .unwrap();
    assert_eq!(identity.email, email);
}

#[tokio::test]
async fn me_reflects_the_stored_account() {
    let (state, _, _dir) = test_state();
    let (user_id, _, session) = signed_up_user(&state, &random_email()).await;

    let identity = account_service::get_me(RequestContext {
        server_state: &state,
        request: GetMeRequest {},
        session,
    })
    .await
    .unwrap();

    assert_eq!(identity.id, user_id);
    assert_eq!(identity.name, "probe");
}

#[tokio::test]
async fn name_change_updates_account_and_live_sessions() {
    let (state, _, _dir) = test_state();
    let (user_id, token, session) = signed_up_user(&state, &random_email()).await;

    let resp = account_service::change_name(RequestContext {
        server_state: &state,
        request: ChangeNameRequest { user_id, new_name: "renamed".to_string() },
        session: session.clone(),
    })
    .await
    .unwrap();
    assert_eq!(resp.name, "renamed");

    // the live session sees the new name without a fresh login
    assert_eq!(state.sessions.get(&token).unwrap().name, "renamed");

    let unchanged = account_service::change_name(RequestContext {
        server_state: &state,
        request: ChangeNameRequest { user_id, new_name: "renamed".to_string() },
        session,
    })
    .await;
    match unchanged {
        Err(ClientError(ChangeNameError::NameUnchanged)) => {}
        other => panic!("expected NameUnchanged, got {other:?}"),
    }
}

#[tokio::test]
async fn name_change_for_another_user_is_forbidden() {
    let (state, _, _dir) = test_state();
    let (_, _, session) = signed_up_user(&state, &random_email()).await;

    let result = account_service::change_name(RequestContext {
        server_state: &state,
        request: ChangeNameRequest { user_id: Uuid::new_v4(), new_name: "hijack".to_string() },
        session,
    })
    .await;

    match result {
        Err(ClientError(ChangeNameError::NotPermitted)) => {}
        other => panic!("expected NotPermitted, got {other:?}"),
    }
}

#[tokio::test]
async fn password_change_requires_the_current_password() {
    let (state, _, _dir) = test_state();
    let email = random_email();
    let (user_id, _, session) = signed_up_user(&state, &email).await;

    let wrong = account_service::change_password(RequestContext {
        server_state: &state,
        request: ChangePasswordRequest {
            user_id,
            current_password: "not the password".to_string(),
            new_password: "fresh-password".to_string(),
            confirm_new_password: "fresh-password".to_string(),
        },
        session: session.clone(),
    })
    .await;
    match wrong {
        Err(ClientError(ChangePasswordError::WrongCurrentPassword)) => {}
        other => panic!("expected WrongCurrentPassword, got {other:?}"),
    }

    account_service::change_password(RequestContext {
        server_state: &state,
        request: ChangePasswordRequest {
            user_id,
            current_password: "password123".to_string(),
            new_password: "fresh-password".to_string(),
            confirm_new_password: "fresh-password".to_string(),
        },
        session,
    })
    .await
    .unwrap();

    account_service::login(
        &state,
        LoginRequest { email, password: "fresh-password".to_string() },
    )
    .await
    .unwrap();
}
