//! The application's URL paths.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use skygarden_protocol::Role;

use crate::AuthGate;

/// Every navigable path.
///
/// `Home` (`/`) is public and doubles as the sign-in page; everything
/// else sits behind the [`AuthGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Home,
    Dashboard,
    Marketing,
    Products,
    Analytics,
    Settings,
    Support,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Home,
        Route::Dashboard,
        Route::Marketing,
        Route::Products,
        Route::Analytics,
        Route::Settings,
        Route::Support,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Dashboard => "/dashboard",
            Self::Marketing => "/marketing",
            Self::Products => "/products",
            Self::Analytics => "/analytics",
            Self::Settings => "/settings",
            Self::Support => "/support",
        }
    }

    /// Resolves a request path. Query strings, fragments and trailing
    /// slashes are ignored; unknown paths return `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Self::ALL.into_iter().find(|r| r.path() == normalized)
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Home)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Which role, if any, each protected route demands.
///
/// The default table demands none: every signed-in user may open every
/// protected route and sees the dashboard for their own role.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    required: HashMap<Route, Role>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts `route` to users with `role`.
    pub fn require(mut self, route: Route, role: Role) -> Self {
        self.required.insert(route, role);
        self
    }

    pub fn required_role(&self, route: Route) -> Option<Role> {
        self.required.get(&route).copied()
    }

    /// The gate guarding `route`, or `None` for public routes.
    pub fn gate(&self, route: Route) -> Option<AuthGate> {
        if !route.is_protected() {
            return None;
        }
        Some(match self.required_role(route) {
            Some(role) => AuthGate::requiring(role),
            None => AuthGate::new(),
        })
    }
}
