use std::sync::Arc;

use aprov_infrastructure::MemoryStore;

use super::*;
use crate::test_support::{MockAuthApi, MockBiometric, token};

struct Fixture {
    auth: Arc<MockAuthApi>,
    biometric: Arc<MockBiometric>,
    store: Arc<MemoryStore>,
    slot: TokenSlot,
    manager: SessionManager,
}

fn fixture_with(biometric: MockBiometric, store: Arc<MemoryStore>) -> Fixture {
    let auth = Arc::new(MockAuthApi::new());
    let biometric = Arc::new(biometric);
    let slot = TokenSlot::new();
    let manager = SessionManager::new(auth.clone(), biometric.clone(), store.clone(), slot.clone());
    Fixture {
        auth,
        biometric,
        store,
        slot,
        manager,
    }
}

fn fixture() -> Fixture {
    fixture_with(
        MockBiometric::available(vec![BiometricKind::Fingerprint, BiometricKind::Face]),
        Arc::new(MemoryStore::new()),
    )
}

async fn logged_in(f: &Fixture) {
    f.auth.push_login(Ok(token("acc-1", Some("ref-1"))));
    assert!(f.manager.login("admin", "secret").await);
}

#[tokio::test]
async fn login_publishes_token_and_persists() {
    let f = fixture();
    logged_in(&f).await;

    assert!(f.manager.is_authenticated().await);
    assert_eq!(f.slot.get().as_deref(), Some("acc-1"));

    let user = f.manager.user().await.unwrap();
    assert_eq!(user.name, "admin");
    assert_eq!(user.refresh_token.as_deref(), Some("ref-1"));

    let persisted: PersistedSession = load_json(f.store.as_ref(), AUTH_STORAGE_KEY)
        .await
        .unwrap()
        .unwrap();
    assert!(persisted.is_authenticated);
    assert_eq!(persisted.user, Some(user));
}

#[tokio::test]
async fn failed_login_stays_anonymous() {
    let f = fixture();
    f.auth
        .push_login(Err(AprovError::authentication("HTTP 401: invalid")));

    assert!(!f.manager.login("admin", "wrong").await);
    assert!(!f.manager.is_authenticated().await);
    assert!(!f.manager.is_loading().await);
    assert!(f.manager.error().await.is_some());
    assert!(f.slot.get().is_none());
}

#[tokio::test]
async fn refresh_keeps_previous_refresh_token_when_omitted() {
    let f = fixture();
    logged_in(&f).await;

    f.auth.push_refresh(Ok(token("acc-2", None)));
    let user = f.manager.refresh().await.unwrap();

    assert_eq!(user.token, "acc-2");
    assert_eq!(user.refresh_token.as_deref(), Some("ref-1"));
    assert_eq!(f.slot.get().as_deref(), Some("acc-2"));
    assert_eq!(f.auth.refresh_calls(), vec!["ref-1"]);

    f.auth.push_refresh(Ok(token("acc-3", Some("ref-2"))));
    let user = f.manager.refresh().await.unwrap();
    assert_eq!(user.refresh_token.as_deref(), Some("ref-2"));
}

#[tokio::test]
async fn enable_biometric_reports_each_precondition() {
    let f = fixture();
    assert_eq!(
        f.manager.enable_biometric().await.unwrap(),
        BiometricEnableOutcome::NoRefresh
    );

    let no_hw = fixture_with(MockBiometric::without_hardware(), Arc::new(MemoryStore::new()));
    logged_in(&no_hw).await;
    assert_eq!(
        no_hw.manager.enable_biometric().await.unwrap(),
        BiometricEnableOutcome::NoHardware
    );

    let not_enrolled = fixture_with(MockBiometric::not_enrolled(), Arc::new(MemoryStore::new()));
    logged_in(&not_enrolled).await;
    assert_eq!(
        not_enrolled.manager.enable_biometric().await.unwrap(),
        BiometricEnableOutcome::NotEnrolled
    );
    assert!(!not_enrolled.manager.biometric_enabled().await);
}

#[tokio::test]
async fn enable_biometric_prefers_face() {
    let f = fixture();
    logged_in(&f).await;

    assert!(f.manager.enable_biometric().await.unwrap().is_ok());
    assert!(f.manager.biometric_enabled().await);
    assert_eq!(f.manager.biometric_kind().await, BiometricKind::Face);

    f.manager.disable_biometric().await.unwrap();
    assert!(!f.manager.biometric_enabled().await);
    assert_eq!(f.manager.biometric_kind().await, BiometricKind::None);
    assert_eq!(f.slot.get().as_deref(), Some("acc-1"));
}

#[tokio::test]
async fn biometric_session_hydrates_locked() {
    let store = Arc::new(MemoryStore::new());
    {
        let f = fixture_with(
            MockBiometric::available(vec![BiometricKind::Fingerprint]),
            store.clone(),
        );
        logged_in(&f).await;
        f.manager.enable_biometric().await.unwrap();
    }

    let f = fixture_with(
        MockBiometric::available(vec![BiometricKind::Fingerprint]),
        store,
    );
    f.manager.hydrate().await.unwrap();

    assert!(f.manager.is_hydrated().await);
    assert!(!f.manager.is_authenticated().await);
    assert!(f.manager.biometric_enabled().await);
    assert!(f.slot.get().is_none());

    f.auth.push_refresh(Ok(token("acc-9", None)));
    assert_eq!(f.manager.try_auto_biometric_login().await, AutoLoginOutcome::LoggedIn);
    assert!(f.manager.is_authenticated().await);
    assert_eq!(f.slot.get().as_deref(), Some("acc-9"));
}

#[tokio::test]
async fn plain_session_hydrates_authenticated() {
    let store = Arc::new(MemoryStore::new());
    {
        let f = fixture_with(MockBiometric::without_hardware(), store.clone());
        logged_in(&f).await;
    }

    let f = fixture_with(MockBiometric::without_hardware(), store);
    f.manager.hydrate().await.unwrap();
    assert!(f.manager.is_authenticated().await);
    assert_eq!(f.slot.get().as_deref(), Some("acc-1"));
}

#[tokio::test]
async fn auto_login_is_one_shot_per_foreground_cycle() {
    let f = fixture();
    logged_in(&f).await;
    f.manager.enable_biometric().await.unwrap();
    f.manager.hydrate().await.unwrap();
    assert!(!f.manager.is_authenticated().await);

    f.biometric.set_passes(false);
    assert_eq!(
        f.manager.try_auto_biometric_login().await,
        AutoLoginOutcome::ChallengeFailed
    );
    assert_eq!(
        f.manager.try_auto_biometric_login().await,
        AutoLoginOutcome::AlreadyAttempted
    );
    assert_eq!(f.biometric.prompt_count(), 1);

    f.manager.begin_foreground_cycle();
    f.biometric.set_passes(true);
    f.auth.push_refresh(Ok(token("acc-2", None)));
    assert_eq!(f.manager.try_auto_biometric_login().await, AutoLoginOutcome::LoggedIn);
    assert_eq!(
        f.manager.try_auto_biometric_login().await,
        AutoLoginOutcome::AlreadyAuthenticated
    );
}

#[tokio::test]
async fn rejected_refresh_token_hard_resets_session() {
    let f = fixture();
    logged_in(&f).await;
    f.manager.enable_biometric().await.unwrap();
    f.manager.hydrate().await.unwrap();
    assert!(!f.manager.is_authenticated().await);

    f.auth
        .push_refresh(Err(AprovError::authentication("HTTP 401: expired")));
    assert_eq!(
        f.manager.try_auto_biometric_login().await,
        AutoLoginOutcome::SessionReset
    );

    assert!(f.manager.user().await.is_none());
    assert!(!f.manager.biometric_enabled().await);
    assert!(f.slot.get().is_none());
    assert!(f.store.get(AUTH_STORAGE_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn server_failure_during_auto_login_also_resets_session() {
    let f = fixture();
    logged_in(&f).await;
    f.manager.enable_biometric().await.unwrap();
    f.manager.hydrate().await.unwrap();

    f.auth.push_refresh(Err(AprovError::Http {
        status: 500,
        message: "boom".into(),
    }));
    assert_eq!(
        f.manager.try_auto_biometric_login().await,
        AutoLoginOutcome::SessionReset
    );

    assert!(!f.manager.is_authenticated().await);
    assert!(!f.manager.biometric_enabled().await);
    assert!(f.manager.user().await.is_none());
    assert!(f.slot.get().is_none());
    assert_eq!(f.manager.error().await.as_deref(), Some("HTTP 500: boom"));
}

#[tokio::test]
async fn transport_failure_during_auto_login_resets_session() {
    let f = fixture();
    logged_in(&f).await;
    f.manager.enable_biometric().await.unwrap();
    f.manager.hydrate().await.unwrap();

    f.auth.push_refresh(Err(AprovError::Transport {
        message: "unreachable".into(),
        timeout: true,
    }));
    assert_eq!(
        f.manager.try_auto_biometric_login().await,
        AutoLoginOutcome::SessionReset
    );
    assert!(!f.manager.biometric_enabled().await);
    assert!(f.manager.user().await.is_none());
    assert_eq!(f.manager.error().await.as_deref(), Some("Connection timed out"));
}

#[tokio::test]
async fn manual_biometric_login_requires_enabled_flag() {
    let f = fixture();
    logged_in(&f).await;

    let err = f.manager.biometric_login().await.unwrap_err();
    assert!(err.is_authentication());

    f.manager.enable_biometric().await.unwrap();
    f.auth.push_refresh(Ok(token("acc-5", Some("ref-5"))));
    let user = f.manager.biometric_login().await.unwrap();
    assert_eq!(user.token, "acc-5");
}

#[tokio::test]
async fn logout_clears_everything() {
    let f = fixture();
    logged_in(&f).await;
    f.manager.enable_biometric().await.unwrap();

    f.manager.logout().await.unwrap();

    assert!(!f.manager.is_authenticated().await);
    assert!(f.manager.user().await.is_none());
    assert!(!f.manager.biometric_enabled().await);
    assert!(f.slot.get().is_none());
    assert!(f.store.is_empty().await);
}

#[tokio::test]
async fn set_user_publishes_or_withdraws_token() {
    let f = fixture();
    f.manager
        .set_user(Some(User {
            username: "admin".into(),
            name: "Admin".into(),
            token: "acc-7".into(),
            refresh_token: None,
        }))
        .await
        .unwrap();
    assert!(f.manager.is_authenticated().await);
    assert_eq!(f.slot.get().as_deref(), Some("acc-7"));

    f.manager.set_user(None).await.unwrap();
    assert!(!f.manager.is_authenticated().await);
    assert!(f.slot.get().is_none());
}
