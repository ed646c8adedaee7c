//! Unit tests for the token service

use std::collections::HashMap;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::token::{AuthPrincipalInfo, AuthPrincipalType, TokenInfo};
use crate::domain::entities::TokenCategory;
use crate::domain::identifier;
use crate::errors::TokenError;
use crate::repositories::store::MockColumnStore;
use crate::repositories::token::TokenRecordStore;
use crate::services::token::{TokenCodec, TokenService, TokenServiceConfig};

const PERSISTENCE_MS: i64 = 60_000;

fn test_config() -> TokenServiceConfig {
    let mut config = TokenServiceConfig::default();
    config.secret_salt = String::from("salt");
    config.max_persistence_age_ms = PERSISTENCE_MS;
    config
}

fn test_service(config: TokenServiceConfig) -> (TokenService<MockColumnStore>, MockColumnStore) {
    let store = MockColumnStore::new();
    (TokenService::new(store.clone(), config), store)
}

fn sample_principal() -> AuthPrincipalInfo {
    AuthPrincipalInfo::new(
        AuthPrincipalType::ApplicationUser,
        Uuid::from_u128(0x0011_2233_4455_6677_8899_aabb_ccdd_eeff),
        Uuid::from_u128(0xffee_ddcc_bbaa_9988_7766_5544_3322_1100),
    )
}

#[tokio::test]
async fn test_issue_then_validate() {
    let (service, _store) = test_service(test_config());

    let token = service
        .issue(TokenCategory::Access, None, None, None)
        .await
        .unwrap();
    let info = service.validate(&token).await.unwrap();

    assert_eq!(info.token_type, "access");
    assert!(info.accessed >= info.created);
    assert!(info.inactive >= 0);
    assert!(info.principal.is_none());
    assert!(info.state.is_empty());
}

#[tokio::test]
async fn test_issue_carries_principal_and_state() {
    let (service, _store) = test_service(test_config());
    let mut state = HashMap::new();
    state.insert("plan".to_string(), json!("pro"));

    let token = service
        .issue_access_with_state(sample_principal(), state.clone())
        .await
        .unwrap();
    let info = service.validate(&token).await.unwrap();

    assert_eq!(info.principal, Some(sample_principal()));
    assert_eq!(info.state, state);
}

#[tokio::test]
async fn test_issue_typed_sets_type_tag() {
    let (service, _store) = test_service(test_config());

    let token = service
        .issue_typed(TokenCategory::Email, "password_reset", None)
        .await
        .unwrap();
    let info = service.validate(&token).await.unwrap();

    assert_eq!(info.token_type, "password_reset");
}

#[tokio::test]
async fn test_repeated_validation_keeps_activity_monotonic() {
    let (service, _store) = test_service(test_config());
    let token = service
        .issue(TokenCategory::Access, None, None, None)
        .await
        .unwrap();

    let first = service.validate(&token).await.unwrap();
    let second = service.validate(&token).await.unwrap();

    assert!(second.accessed >= first.accessed);
    assert!(second.inactive >= first.inactive);
    assert_eq!(second.created, first.created);
}

#[tokio::test]
async fn test_tampered_token_is_bad() {
    let (service, _store) = test_service(test_config());
    let token = service
        .issue(TokenCategory::Access, None, None, None)
        .await
        .unwrap();

    let mut tampered: Vec<char> = token.chars().collect();
    let last = tampered.len() - 1;
    tampered[last] = if tampered[last] == 'A' { 'B' } else { 'A' };
    let tampered: String = tampered.into_iter().collect();

    let result = service.validate(&tampered).await;
    assert!(matches!(result, Err(TokenError::BadToken { .. })));
}

#[tokio::test]
async fn test_token_from_other_salt_is_bad() {
    let (service, _store) = test_service(test_config());
    let mut other_config = test_config();
    other_config.secret_salt = String::from("other salt");
    let (other_service, _other_store) = test_service(other_config);

    let token = other_service
        .issue(TokenCategory::Access, None, None, None)
        .await
        .unwrap();

    let result = service.validate(&token).await;
    assert!(matches!(result, Err(TokenError::BadToken { .. })));
}

#[tokio::test]
async fn test_past_absolute_expiration_is_expired() {
    let config = test_config();
    let max_age = config.access_expires_ms;
    let (service, _store) = test_service(config);

    let issued = Utc::now().timestamp_millis() - max_age - 2_000;
    let uuid = identifier::time_uuid_at(issued);
    let token = TokenCodec::new("salt").encode(TokenCategory::Access, &uuid, issued + max_age);

    match service.validate(&token).await {
        Err(TokenError::ExpiredToken { elapsed_ms }) => assert!(elapsed_ms >= 2_000),
        other => panic!("expected ExpiredToken, got {:?}", other.map(|i| i.uuid)),
    }
}

#[tokio::test]
async fn test_signature_is_checked_before_expiration() {
    let config = test_config();
    let max_age = config.access_expires_ms;
    let (service, _store) = test_service(config);

    let issued = Utc::now().timestamp_millis() - max_age - 2_000;
    let uuid = identifier::time_uuid_at(issued);
    let token = TokenCodec::new("wrong salt").encode(TokenCategory::Access, &uuid, issued + max_age);

    // Expired *and* forged must read as forged
    let result = service.validate(&token).await;
    assert!(matches!(result, Err(TokenError::BadToken { .. })));
}

#[tokio::test]
async fn test_signed_token_without_record_is_invalid() {
    let (service, _store) = test_service(test_config());

    let uuid = identifier::time_uuid_at(Utc::now().timestamp_millis());
    let token = TokenCodec::new("salt").encode(TokenCategory::Offline, &uuid, 0);

    let result = service.validate(&token).await;
    assert!(matches!(result, Err(TokenError::InvalidToken { .. })));
}

#[tokio::test]
async fn test_record_ttl_lapse_invalidates_token() {
    let (service, store) = test_service(test_config());
    let token = service
        .issue(TokenCategory::Access, None, None, None)
        .await
        .unwrap();

    store.advance_millis(PERSISTENCE_MS + 1_000);

    let result = service.validate(&token).await;
    assert!(matches!(result, Err(TokenError::InvalidToken { .. })));
}

#[tokio::test]
async fn test_max_token_age_matches_configuration() {
    let config = test_config();
    let access_expires = config.access_expires_ms;
    let (service, _store) = test_service(config);

    let access = service
        .issue(TokenCategory::Access, None, None, None)
        .await
        .unwrap();
    assert_eq!(service.max_token_age(&access).unwrap(), access_expires);

    let offline = service
        .issue(TokenCategory::Offline, None, None, None)
        .await
        .unwrap();
    assert_eq!(service.max_token_age(&offline).unwrap(), i64::MAX);
}

#[tokio::test]
async fn test_refresh_reuses_identifier_and_preserves_record() {
    let (service, _store) = test_service(test_config());
    let mut state = HashMap::new();
    state.insert("plan".to_string(), json!("pro"));

    let token = service
        .issue_access_with_state(sample_principal(), state.clone())
        .await
        .unwrap();
    let before = service.validate(&token).await.unwrap();

    let refreshed = service.refresh(&token).await.unwrap();
    let after = service.validate(&refreshed).await.unwrap();

    assert_eq!(after.uuid, before.uuid);
    assert_eq!(after.created, before.created);
    assert_eq!(after.principal, before.principal);
    assert_eq!(after.state, before.state);
    assert!(after.accessed >= before.accessed);

    // A second refresh still resolves to the same record
    let again = service.refresh(&refreshed).await.unwrap();
    let final_info = service.validate(&again).await.unwrap();
    assert_eq!(final_info.uuid, before.uuid);
    assert_eq!(final_info.principal, before.principal);
    assert_eq!(final_info.state, before.state);
}

#[tokio::test]
async fn test_refresh_extends_record_lifetime() {
    let (service, store) = test_service(test_config());
    let token = service
        .issue(TokenCategory::Access, None, None, None)
        .await
        .unwrap();

    store.advance_millis(PERSISTENCE_MS - 5_000);
    let refreshed = service.refresh(&token).await.unwrap();

    // Past the original TTL but inside the window reset by the refresh
    store.advance_millis(10_000);
    assert!(service.validate(&refreshed).await.is_ok());
}

#[tokio::test]
async fn test_refresh_with_fresh_identifier() {
    let mut config = test_config();
    config.refresh_reuses_id = false;
    let (service, _store) = test_service(config);
    let mut state = HashMap::new();
    state.insert("plan".to_string(), json!("pro"));

    let token = service
        .issue_access_with_state(sample_principal(), state.clone())
        .await
        .unwrap();
    let before = service.validate(&token).await.unwrap();

    let refreshed = service.refresh(&token).await.unwrap();
    let after = service.validate(&refreshed).await.unwrap();

    assert_ne!(after.uuid, before.uuid);
    assert_eq!(after.principal, before.principal);
    assert_eq!(after.state, before.state);
    assert_eq!(after.token_type, before.token_type);
    assert!(after.created >= before.created);
}

#[tokio::test]
async fn test_expiry_window_slides_when_measured_from_last_use() {
    let mut config = test_config();
    config.expires_from_last_use = true;
    config.access_expires_ms = 30_000;
    let salt = config.secret_salt.clone();
    let (service, store) = test_service(config);

    // Older than the absolute window, but validated recently
    let now = Utc::now().timestamp_millis();
    let created = now - 60_000;
    let uuid = identifier::time_uuid_at(created);
    let records = TokenRecordStore::new(store.clone(), PERSISTENCE_MS);
    let mut info = TokenInfo::issued_at(uuid, created, None, None, None);
    info.accessed = now - 1_000;
    records.put(&info).await.unwrap();

    let token = TokenCodec::new(salt).encode(TokenCategory::Access, &uuid, created + 30_000);
    assert!(service.validate(&token).await.is_ok());

    // Let the sliding window lapse
    let mut stale = info.clone();
    stale.accessed = now - 31_000;
    records.put(&stale).await.unwrap();

    let result = service.validate(&token).await;
    assert!(matches!(result, Err(TokenError::ExpiredToken { .. })));
}

#[tokio::test]
async fn test_store_failure_surfaces_as_store_error() {
    let (service, store) = test_service(test_config());
    let token = service
        .issue(TokenCategory::Access, None, None, None)
        .await
        .unwrap();

    store.fail_requests(true);
    let result = service.validate(&token).await;
    assert!(matches!(result, Err(TokenError::Store(_))));
}
