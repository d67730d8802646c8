//! The application shell: one browser tab's worth of state.
//!
//! A [`Shell`] owns a [`SessionStore`], the current location, and the
//! local view state (dashboard tabs, marketing drafts). It turns user
//! events into store calls and renders a [`Frame`] for whatever the
//! location shows now.
//!
//! ```text
//!   event ──→ Shell ──→ SessionStore ──(snapshot)──→ AuthGate ──→ RoleRouter ──→ Frame
//! ```
//!
//! Local view state is rebuilt whenever the snapshot's `revision` moves,
//! so a role switch or sign-out never leaves stale tabs behind.

use serde::Serialize;
use skygarden_protocol::{AuthRequest, Identity, Role};
use skygarden_router::{
    AdminDashboard, BuyerDashboard, DashboardView, GateDecision, HomeView, MarketingSuite,
    RoleRouter, Route, RouteTable, View, ViewContext, ViewError,
};
use skygarden_session::{Authenticator, SessionSnapshot, SessionStore};
use skygarden_storage::Storage;

use crate::SkygardenError;

/// A rendered page: where the shell is, what it shows, and the session
/// it was rendered from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub path: String,
    pub view: View,
    pub session: SessionSnapshot,
}

/// View state that lives only as long as one session revision.
#[derive(Debug, Clone, Default)]
struct LocalState {
    admin: AdminDashboard,
    buyer: BuyerDashboard,
    marketing: MarketingSuite,
}

pub struct Shell<A, S> {
    session: SessionStore<A, S>,
    routes: RouteTable,
    router: RoleRouter,
    path: String,
    route: Option<Route>,
    local: LocalState,
    seen_revision: u64,
}

impl<A: Authenticator, S: Storage> Shell<A, S> {
    /// Creates a shell at `/`. Call [`boot`](Self::boot) before rendering
    /// anything but the loading view.
    pub fn new(session: SessionStore<A, S>, routes: RouteTable) -> Self {
        let seen_revision = session.snapshot().revision;
        Self {
            session,
            routes,
            router: RoleRouter,
            path: Route::Home.path().to_string(),
            route: Some(Route::Home),
            local: LocalState::default(),
            seen_revision,
        }
    }

    /// Restores the persisted session.
    pub async fn boot(&mut self) -> Option<Identity> {
        self.session.restore().await
    }

    pub fn session(&self) -> &SessionStore<A, S> {
        &self.session
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Moves to `path`. Unknown paths are kept and render `NotFound`.
    pub fn navigate(&mut self, path: &str) {
        self.route = Route::parse(path);
        self.path = match self.route {
            Some(route) => route.path().to_string(),
            None => path.to_string(),
        };
        tracing::debug!(path = %self.path, "navigate");
    }

    /// Submits the sign-in or sign-up form. On success the shell moves
    /// to the dashboard; on failure it stays put and the error is in the
    /// next frame's session.
    pub async fn submit(&mut self, req: AuthRequest) -> bool {
        let ok = self.session.submit(req).await;
        if ok {
            self.navigate(Route::Dashboard.path());
        }
        ok
    }

    /// Signs out and returns to the home page.
    pub async fn logout(&mut self) -> bool {
        let ok = self.session.logout().await;
        if ok {
            self.navigate(Route::Home.path());
        }
        ok
    }

    /// Changes the signed-in user's role by name.
    pub async fn switch_role(&mut self, role: &str) -> Result<Identity, SkygardenError> {
        let role: Role = role.parse()?;
        Ok(self.session.switch_role(role).await?)
    }

    /// Switches the marketing panel. Only a seller on `/marketing` has one.
    pub fn select_panel(&mut self, panel: &str) -> Result<(), SkygardenError> {
        self.sync_revision();
        if !self.on_marketing() {
            return Err(ViewError::NotOnView("marketing panels").into());
        }
        self.local.marketing.select_panel(panel)?;
        Ok(())
    }

    /// Switches the tab strip of whatever the current view shows.
    pub fn select_tab(&mut self, tab: &str) -> Result<(), SkygardenError> {
        self.sync_revision();
        if self.on_marketing() {
            return Ok(self.local.marketing.select_tab(tab)?);
        }
        match self.dashboard_role() {
            Some(Role::Admin) => self.local.admin.tabs.select(tab)?,
            Some(Role::Buyer) => self.local.buyer.tabs.select(tab)?,
            // Seller sections are routes, not tabs.
            Some(Role::Seller) | None => return Err(ViewError::NotOnView("tabs").into()),
        }
        Ok(())
    }

    /// Edits a form draft on the active marketing panel.
    pub fn edit_draft(&mut self, field: &str, value: &str) -> Result<(), SkygardenError> {
        self.sync_revision();
        if !self.on_marketing() {
            return Err(ViewError::NotOnView("form drafts").into());
        }
        self.local.marketing.edit_draft(field, value)?;
        Ok(())
    }

    /// Renders the current location.
    ///
    /// A protected route seen while signed out redirects to `/`, so the
    /// returned frame's `path` may differ from the one navigated to.
    pub fn render(&mut self) -> Frame {
        self.sync_revision();
        let snapshot = self.session.snapshot();
        let view = self.view_for(&snapshot);
        Frame {
            path: self.path.clone(),
            view,
            session: snapshot,
        }
    }

    // -- internals --------------------------------------------------------

    fn view_for(&mut self, snapshot: &SessionSnapshot) -> View {
        let Some(route) = self.route else {
            return View::NotFound {
                path: self.path.clone(),
            };
        };

        let Some(gate) = self.routes.gate(route) else {
            // The public home page shows the dashboard to signed-in users.
            return match (snapshot.is_restored(), &snapshot.identity) {
                (false, _) => View::Loading,
                (true, Some(identity)) => {
                    View::Dashboard(self.dashboard(identity, Route::Dashboard))
                }
                (true, None) => View::Home(HomeView::new(
                    snapshot.auth_error.clone(),
                    snapshot.processing,
                )),
            };
        };

        match gate.decide(snapshot) {
            GateDecision::Placeholder => View::Loading,
            GateDecision::Redirect(target) => {
                tracing::debug!(from = %route, to = %target, "redirecting unauthenticated visitor");
                self.navigate(target.path());
                self.view_for(snapshot)
            }
            GateDecision::Render(identity) => View::Dashboard(self.dashboard(&identity, route)),
            GateDecision::Denied { required, actual } => View::Unauthorized { required, actual },
        }
    }

    fn dashboard(&self, identity: &Identity, active: Route) -> DashboardView {
        let ctx = ViewContext {
            user_name: &identity.name,
            active,
            marketing: &self.local.marketing,
        };
        let mut view = self.router.route(Some(identity.role), ctx);
        match &mut view {
            DashboardView::Admin(admin) => *admin = self.local.admin.clone(),
            DashboardView::Buyer(buyer) => *buyer = self.local.buyer.clone(),
            DashboardView::Seller(_) | DashboardView::InvalidRole { .. } => {}
        }
        view
    }

    /// The role whose dashboard the current location shows, if any.
    fn dashboard_role(&self) -> Option<Role> {
        let snapshot = self.session.snapshot();
        if !snapshot.is_restored() {
            return None;
        }
        let route = self.route?;
        let identity = snapshot.identity.as_ref()?;
        match self.routes.gate(route) {
            None => Some(identity.role),
            Some(gate) => match gate.decide(&snapshot) {
                GateDecision::Render(identity) => Some(identity.role),
                _ => None,
            },
        }
    }

    fn on_marketing(&self) -> bool {
        self.route == Some(Route::Marketing) && self.dashboard_role() == Some(Role::Seller)
    }

    fn sync_revision(&mut self) {
        let revision = self.session.snapshot().revision;
        if revision != self.seen_revision {
            tracing::debug!(
                from = self.seen_revision,
                to = revision,
                "session changed; resetting view state"
            );
            self.local = LocalState::default();
            self.seen_revision = revision;
        }
    }
}
