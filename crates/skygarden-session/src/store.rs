//! The session store: sole owner of the signed-in identity.
//!
//! Responsibilities:
//! - Restore the persisted identity at start-up
//! - Sign users in and up through an [`Authenticator`]
//! - Sign out and forget the persisted identity
//! - Switch the demo role and tell dependents to refresh
//! - Publish every change as a [`SessionSnapshot`]
//!
//! # Concurrency note
//!
//! Mutating operations are serialized by an async mutex, so two
//! overlapping logins can't interleave their writes to storage. Readers
//! never take that lock: they read the latest snapshot from the `watch`
//! channel.

use skygarden_protocol::{
    AuthRequest, Codec, Identity, JsonCodec, LoginRequest, RegisterRequest, Role,
};
use skygarden_storage::Storage;
use tokio::sync::{Mutex, watch};

use crate::auth::validate_confirmation;
use crate::{Authenticator, SessionConfig, SessionError, SessionPhase, SessionSnapshot};

/// Shown when an operation fails for a reason the user can't fix.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Shown when the persisted identity couldn't be cleared.
pub const LOGOUT_FAILED_MESSAGE: &str = "Failed to log out";

/// Holds at most one [`Identity`] and keeps it in durable storage.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ restore() ──→ login()/register() ──→ switch_role() ──→ logout()
///  [Restoring]  [Ready, absent]   [Ready, present]    [present, rev+1]  [absent]
/// ```
pub struct SessionStore<A, S> {
    auth: A,
    storage: S,
    codec: JsonCodec,
    config: SessionConfig,
    state: watch::Sender<SessionSnapshot>,
    ops: Mutex<()>,
}

impl<A: Authenticator, S: Storage> SessionStore<A, S> {
    /// Creates a store in the `Restoring` phase. Call
    /// [`restore`](Self::restore) before relying on `is_authenticated`.
    pub fn new(auth: A, storage: S, config: SessionConfig) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self {
            auth,
            storage,
            codec: JsonCodec,
            config,
            state,
            ops: Mutex::new(()),
        }
    }

    /// A receiver that observes every future snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Reads the persisted identity and moves to `Ready`.
    ///
    /// A stored value that no longer decodes is deleted and treated as
    /// signed out; a storage failure is logged and also treated as signed
    /// out. Neither is fatal.
    pub async fn restore(&self) -> Option<Identity> {
        let _op = self.ops.lock().await;
        let identity = match self.load().await {
            Ok(identity) => identity,
            Err(SessionError::Codec(e)) => {
                tracing::warn!(error = %e, "discarding unreadable stored identity");
                if let Err(e) = self.storage.remove(&self.config.storage_key).await {
                    tracing::warn!(error = %e, "failed to discard stored identity");
                }
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to read stored identity");
                None
            }
        };

        match &identity {
            Some(found) => {
                tracing::info!(user_id = %found.id, role = %found.role, "session restored")
            }
            None => tracing::debug!("no stored session"),
        }

        let restored = identity.clone();
        self.state.send_modify(|s| {
            s.phase = SessionPhase::Ready;
            if s.identity != restored {
                s.identity = restored;
                s.revision += 1;
            }
        });
        identity
    }

    /// Signs in. Returns `false` and sets `auth_error` on any failure,
    /// leaving the session untouched.
    pub async fn login(&self, req: LoginRequest) -> bool {
        let _op = self.ops.lock().await;
        self.begin();
        let result = self.try_login(&req).await;
        self.settle("login", result)
    }

    /// Creates an account and signs it in. Same failure contract as
    /// [`login`](Self::login).
    pub async fn register(&self, req: RegisterRequest) -> bool {
        let _op = self.ops.lock().await;
        self.begin();
        let result = self.try_register(&req).await;
        self.settle("register", result)
    }

    /// Dispatches a tagged auth form submission.
    pub async fn submit(&self, req: AuthRequest) -> bool {
        match req {
            AuthRequest::Login(req) => self.login(req).await,
            AuthRequest::Register(req) => self.register(req).await,
        }
    }

    /// Signs out and forgets the persisted identity.
    ///
    /// Returns `false` only if the provider or storage refuses; the
    /// identity is then kept so storage and memory stay in agreement.
    pub async fn logout(&self) -> bool {
        let _op = self.ops.lock().await;
        self.begin();

        let result = match self.auth.logout().await {
            Ok(()) => self
                .storage
                .remove(&self.config.storage_key)
                .await
                .map_err(SessionError::from),
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(()) => {
                tracing::info!("signed out");
                self.publish(None);
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "logout failed");
                self.fail(LOGOUT_FAILED_MESSAGE.to_string());
                false
            }
        }
    }

    /// Overwrites the signed-in user's role (demo affordance).
    ///
    /// Persists the change and bumps the snapshot revision so dependent
    /// views rebuild anything they cached from the old role.
    ///
    /// # Errors
    /// - [`SessionError::NotAuthenticated`] if nobody is signed in
    /// - [`SessionError::Storage`] / [`SessionError::Codec`] if the change
    ///   couldn't be persisted; the session keeps the old role
    pub async fn switch_role(&self, role: Role) -> Result<Identity, SessionError> {
        let _op = self.ops.lock().await;
        let current = self.identity().ok_or(SessionError::NotAuthenticated)?;
        let updated = current.with_role(role);
        self.persist(&updated).await?;
        tracing::info!(user_id = %updated.id, from = %current.role, to = %role, "role switched");
        self.publish(Some(updated.clone()));
        Ok(updated)
    }

    // -- internals --------------------------------------------------------

    async fn try_login(&self, req: &LoginRequest) -> Result<Identity, SessionError> {
        let identity = self.auth.login(req).await?;
        self.persist(&identity).await?;
        Ok(identity)
    }

    async fn try_register(&self, req: &RegisterRequest) -> Result<Identity, SessionError> {
        validate_confirmation(req)?;
        let identity = self.auth.register(req).await?;
        self.persist(&identity).await?;
        Ok(identity)
    }

    async fn load(&self) -> Result<Option<Identity>, SessionError> {
        let Some(text) = self.storage.get(&self.config.storage_key).await? else {
            return Ok(None);
        };
        Ok(Some(self.codec.decode(&text)?))
    }

    async fn persist(&self, identity: &Identity) -> Result<(), SessionError> {
        let text = self.codec.encode(identity)?;
        self.storage.set(&self.config.storage_key, &text).await?;
        Ok(())
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.processing = true;
            s.auth_error = None;
        });
    }

    fn settle(&self, op: &'static str, result: Result<Identity, SessionError>) -> bool {
        match result {
            Ok(identity) => {
                tracing::info!(op, user_id = %identity.id, role = %identity.role, "signed in");
                self.publish(Some(identity));
                true
            }
            Err(SessionError::Auth(e)) => {
                if e.is_validation() {
                    tracing::debug!(op, error = %e, "auth request failed validation");
                } else {
                    tracing::warn!(op, error = %e, "identity provider rejected auth request");
                }
                self.fail(e.to_string());
                false
            }
            Err(e) => {
                tracing::error!(op, error = %e, "auth request failed unexpectedly");
                self.fail(UNEXPECTED_ERROR_MESSAGE.to_string());
                false
            }
        }
    }

    fn publish(&self, identity: Option<Identity>) {
        self.state.send_modify(|s| {
            s.identity = identity;
            s.processing = false;
            s.revision += 1;
        });
    }

    fn fail(&self, message: String) {
        self.state.send_modify(|s| {
            s.processing = false;
            s.auth_error = Some(message);
        });
    }
}

// =========================================================================
// Tests
// =========================================================================
