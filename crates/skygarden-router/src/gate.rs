//! The auth gate: may a protected route render right now?

use skygarden_protocol::{Identity, Role};
use skygarden_session::SessionSnapshot;
use tokio::sync::watch;

use crate::Route;

/// What the gate observes in a snapshot.
///
/// ```text
///   Loading ──(restore completes)──→ Authenticated | Unauthenticated
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// The persisted session hasn't been read yet.
    Loading,
    Authenticated(Identity),
    Unauthenticated,
}

impl GateState {
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        if !snapshot.is_restored() {
            return Self::Loading;
        }
        match &snapshot.identity {
            Some(identity) => Self::Authenticated(identity.clone()),
            None => Self::Unauthenticated,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

/// What the caller should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Show the loading placeholder; make no navigation decision yet.
    Placeholder,
    /// Navigate away (to the public entry view).
    Redirect(Route),
    /// Render the protected content for this identity.
    Render(Identity),
    /// Signed in, but the route requires a different role.
    Denied { required: Role, actual: Role },
}

/// Guard for one protected route.
///
/// The gate never reads storage; it decides from the snapshot it's given.
/// That keeps the store the single writer and reader of the persisted
/// identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthGate {
    required_role: Option<Role>,
    entry: Route,
}

impl Default for AuthGate {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthGate {
    /// A gate that only checks for a signed-in user.
    pub fn new() -> Self {
        Self {
            required_role: None,
            entry: Route::Home,
        }
    }

    /// A gate that also demands a specific role.
    pub fn requiring(role: Role) -> Self {
        Self {
            required_role: Some(role),
            ..Self::new()
        }
    }

    pub fn required_role(&self) -> Option<Role> {
        self.required_role
    }

    /// Where unauthenticated visitors are sent.
    pub fn entry(&self) -> Route {
        self.entry
    }

    pub fn decide(&self, snapshot: &SessionSnapshot) -> GateDecision {
        match GateState::from_snapshot(snapshot) {
            GateState::Loading => GateDecision::Placeholder,
            GateState::Unauthenticated => GateDecision::Redirect(self.entry),
            GateState::Authenticated(identity) => match self.required_role {
                Some(required) if identity.role != required => {
                    tracing::debug!(
                        user_id = %identity.id,
                        %required,
                        actual = %identity.role,
                        "role mismatch at gate"
                    );
                    GateDecision::Denied {
                        required,
                        actual: identity.role,
                    }
                }
                _ => GateDecision::Render(identity),
            },
        }
    }

    /// Waits until the session is restored, then decides.
    ///
    /// If the store goes away before restoring, the last snapshot is
    /// still `Restoring` and the answer stays `Placeholder`.
    pub async fn wait_resolved(
        &self,
        rx: &mut watch::Receiver<SessionSnapshot>,
    ) -> GateDecision {
        let resolved = rx
            .wait_for(|s| s.is_restored())
            .await
            .map(|snapshot| self.decide(&snapshot));
        match resolved {
            Ok(decision) => decision,
            Err(_) => {
                tracing::warn!("session store dropped before restore completed");
                self.decide(&rx.borrow())
            }
        }
    }
}
