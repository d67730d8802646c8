//! Session store flows across storage scopes and overlapping calls.

use std::sync::Arc;
use std::time::Duration;

use skygarden_protocol::{LoginRequest, Role};
use skygarden_session::{MockAuthenticator, SessionConfig, SessionStore};
use skygarden_storage::{MemoryStorage, ScopedStorage};

type ScopedStore = SessionStore<Arc<MockAuthenticator>, ScopedStorage<MemoryStorage>>;

fn store(auth: &Arc<MockAuthenticator>, shared: &Arc<MemoryStorage>, scope: &str) -> ScopedStore {
    SessionStore::new(
        Arc::clone(auth),
        ScopedStorage::new(Arc::clone(shared), scope).unwrap(),
        SessionConfig::default(),
    )
}

#[tokio::test(start_paused = true)]
async fn test_scoped_stores_do_not_share_sessions() {
    let auth = Arc::new(MockAuthenticator::default());
    let shared = Arc::new(MemoryStorage::new());

    let alice = store(&auth, &shared, "alice");
    alice.restore().await;
    assert!(alice.login(LoginRequest::new("alice@shop.io", "secret1")).await);

    let bob = store(&auth, &shared, "bob");
    assert_eq!(bob.restore().await, None);

    let alice_again = store(&auth, &shared, "alice");
    let restored = alice_again.restore().await.unwrap();
    assert_eq!(restored.email, "alice@shop.io");
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_logins_run_one_after_another() {
    let auth = Arc::new(MockAuthenticator::default());
    let shared = Arc::new(MemoryStorage::new());
    let store = Arc::new(store(&auth, &shared, "tab"));
    store.restore().await;

    let started = tokio::time::Instant::now();
    let first = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.login(LoginRequest::new("one@shop.io", "secret1")).await })
    };
    let second = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.login(LoginRequest::new("two@shop.io", "secret1")).await })
    };

    assert!(first.await.unwrap());
    assert!(second.await.unwrap());

    // Two full 800 ms delays, not one shared one.
    assert!(started.elapsed() >= Duration::from_millis(1600));

    let snapshot = store.snapshot();
    assert_eq!(snapshot.revision, 2);
    let persisted = store_identity_email(&auth, &shared).await;
    assert_eq!(snapshot.identity.unwrap().email, persisted);
}

#[tokio::test(start_paused = true)]
async fn test_switch_role_survives_restore() {
    let auth = Arc::new(MockAuthenticator::default());
    let shared = Arc::new(MemoryStorage::new());

    let first = store(&auth, &shared, "tab");
    first.restore().await;
    first.login(LoginRequest::new("sam@shop.io", "secret1")).await;
    first.switch_role(Role::Buyer).await.unwrap();

    let second = store(&auth, &shared, "tab");
    assert_eq!(second.restore().await.unwrap().role, Role::Buyer);
}

async fn store_identity_email(
    auth: &Arc<MockAuthenticator>,
    shared: &Arc<MemoryStorage>,
) -> String {
    let reader = store(auth, shared, "tab");
    reader.restore().await.unwrap().email
}
