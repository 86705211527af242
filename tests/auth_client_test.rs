//! Sign-in, sign-out and admin sign-in against the mocked auth service

mod helpers;

use assert_matches::assert_matches;
use helpers::*;
use serial_test::serial;
use TechMeet::models::Role;
use TechMeet::services::auth::ADMIN_REQUIRED_MESSAGE;
use TechMeet::utils::errors::HostedAuthError;
use TechMeet::PortalError;

#[tokio::test]
async fn test_invalid_credentials() {
    let (backend, state) = offline_state().await;
    backend.mock_sign_in_invalid().await;

    let err = state.services.auth_service
        .sign_in("jane@school.edu", "wrong-password")
        .await
        .unwrap_err();

    assert_matches!(err, PortalError::HostedAuth(HostedAuthError::InvalidCredentials));
    assert_eq!(err.status_code(), 401);
}

#[tokio::test]
async fn test_repeated_failures_are_rate_limited() {
    let (backend, state) = offline_state().await;
    backend.mock_sign_in_invalid().await;
    let auth = &state.services.auth_service;

    for _ in 0..3 {
        assert_matches!(
            auth.sign_in("jane@school.edu", "wrong").await,
            Err(PortalError::HostedAuth(HostedAuthError::InvalidCredentials))
        );
    }

    let err = auth.sign_in("JANE@school.edu", "wrong").await.unwrap_err();
    assert_matches!(err, PortalError::RateLimitExceeded);
    assert_eq!(err.status_code(), 429);

    // Other accounts are unaffected
    assert_matches!(
        auth.sign_in("john@school.edu", "wrong").await,
        Err(PortalError::HostedAuth(HostedAuthError::InvalidCredentials))
    );
}

#[tokio::test]
async fn test_empty_credentials_skip_the_backend() {
    let (backend, state) = offline_state().await;

    let result = state.services.auth_service.sign_in("  ", "secret").await;
    assert_matches!(result, Err(PortalError::InvalidInput(_)));
    assert!(backend.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sign_out_calls_logout() {
    let (backend, state) = offline_state().await;
    backend.mock_sign_out(1).await;

    state.services.auth_service.sign_out("some-token").await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_sign_in_loads_profile() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let teacher = create_profile(&ctx.db, Role::Teacher).await;
    ctx.backend.mock_sign_in_success(&teacher.email, teacher.id).await;

    let signed_in = ctx.state.services.auth_service
        .sign_in(&teacher.email, "secret123")
        .await
        .unwrap();

    assert_eq!(signed_in.profile.id, teacher.id);
    assert_eq!(signed_in.session.user.id, teacher.id);

    let profile = ctx.state.services.auth_service
        .authenticate(&signed_in.session.access_token)
        .await
        .unwrap();
    assert_eq!(profile.role, Role::Teacher);
}

#[tokio::test]
#[serial]
async fn test_admin_sign_in_rejects_and_signs_out_non_admins() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let student = create_profile(&ctx.db, Role::Student).await;
    ctx.backend.mock_sign_in_success(&student.email, student.id).await;
    ctx.backend.mock_sign_out(1).await;

    let err = ctx.state.services.auth_service
        .sign_in_admin(&student.email, "secret123")
        .await
        .unwrap_err();

    assert_matches!(err, PortalError::PermissionDenied(_));
    assert_eq!(err.user_message(), ADMIN_REQUIRED_MESSAGE);
}

#[tokio::test]
#[serial]
async fn test_admin_sign_in_accepts_admins() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let admin = create_profile(&ctx.db, Role::Admin).await;
    ctx.backend.mock_sign_in_success(&admin.email, admin.id).await;
    ctx.backend.mock_sign_out(0).await;

    let signed_in = ctx.state.services.auth_service
        .sign_in_admin(&admin.email, "secret123")
        .await
        .unwrap();
    assert_eq!(signed_in.profile.role, Role::Admin);
}
