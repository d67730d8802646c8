//! Serializable view models.
//!
//! These carry structure only (titles, tab strips, stat slots, drafts).
//! Figures are the fixed placeholder values every dashboard shows.

use serde::Serialize;
use skygarden_protocol::Role;

use crate::{MarketingSuite, Route, ViewError};

/// Shown on the home page under the sign-in form.
pub const DEMO_NOTICE: &str =
    "Using mock authentication. Any valid email format and password (min 6 chars) will work.";

// ---------------------------------------------------------------------------
// TabStrip
// ---------------------------------------------------------------------------

/// A fixed set of tab names with one active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabStrip {
    options: &'static [&'static str],
    active: &'static str,
}

impl TabStrip {
    /// The first option starts active. `options` must be non-empty.
    pub fn new(options: &'static [&'static str]) -> Self {
        Self {
            options,
            active: options.first().copied().unwrap_or_default(),
        }
    }

    pub fn active(&self) -> &'static str {
        self.active
    }

    pub fn options(&self) -> &'static [&'static str] {
        self.options
    }

    /// Activates `name`. Unknown names leave the strip unchanged.
    pub fn select(&mut self, name: &str) -> Result<(), ViewError> {
        match self.options.iter().find(|o| **o == name) {
            Some(option) => {
                self.active = option;
                Ok(())
            }
            None => Err(ViewError::UnknownTab {
                name: name.to_string(),
                options: self.options,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: &'static str,
    pub detail: &'static str,
}

// ---------------------------------------------------------------------------
// Sidebar navigation
// ---------------------------------------------------------------------------

/// One sidebar link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
}

const fn nav(label: &'static str, href: &'static str) -> NavItem {
    NavItem { label, href }
}

const ADMIN_NAV: &[NavItem] = &[
    nav("User Management", "/users"),
    nav("Platform Analytics", "/analytics"),
    nav("Dashboard", "/dashboard"),
    nav("Settings", "/settings"),
];

const SELLER_NAV: &[NavItem] = &[
    nav("Products", "/products"),
    nav("Marketing", "/marketing"),
    nav("Analytics", "/analytics"),
    nav("Dashboard", "/dashboard"),
    nav("Settings", "/settings"),
];

const BUYER_NAV: &[NavItem] = &[
    nav("My Orders", "/orders"),
    nav("Browse Products", "/browse"),
    nav("Dashboard", "/dashboard"),
    nav("Settings", "/settings"),
];

/// Sidebar links for `role`: its own entries first, then the shared
/// Dashboard and Settings links.
pub fn nav_for(role: Role) -> &'static [NavItem] {
    match role {
        Role::Admin => ADMIN_NAV,
        Role::Seller => SELLER_NAV,
        Role::Buyer => BUYER_NAV,
    }
}

// ---------------------------------------------------------------------------
// Dashboards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminDashboard {
    pub nav: &'static [NavItem],
    pub stats: [StatCard; 3],
    pub tabs: TabStrip,
}

impl Default for AdminDashboard {
    fn default() -> Self {
        Self {
            nav: nav_for(Role::Admin),
            stats: [
                StatCard {
                    title: "Total Users",
                    value: "1,248",
                    detail: "+12% from last month",
                },
                StatCard {
                    title: "Active Sellers",
                    value: "342",
                    detail: "+8% from last month",
                },
                StatCard {
                    title: "Platform Revenue",
                    value: "$48,352",
                    detail: "+15% from last month",
                },
            ],
            tabs: TabStrip::new(&["users", "analytics", "settings"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuyerDashboard {
    pub nav: &'static [NavItem],
    pub stats: [StatCard; 3],
    pub tabs: TabStrip,
}

impl Default for BuyerDashboard {
    fn default() -> Self {
        Self {
            nav: nav_for(Role::Buyer),
            stats: [
                StatCard {
                    title: "Total Orders",
                    value: "12",
                    detail: "3 in transit",
                },
                StatCard {
                    title: "Wishlist Items",
                    value: "24",
                    detail: "5 on sale",
                },
                StatCard {
                    title: "Reward Points",
                    value: "1,250",
                    detail: "$12.50 in rewards",
                },
            ],
            tabs: TabStrip::new(&["orders", "browse", "account"]),
        }
    }
}

/// Sections of the seller dashboard. Highlighted from the active route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SellerTab {
    Overview,
    Products,
    Analytics,
    Settings,
    Marketing,
}

impl SellerTab {
    pub fn for_route(route: Route) -> Self {
        match route {
            Route::Products => Self::Products,
            Route::Analytics => Self::Analytics,
            Route::Settings => Self::Settings,
            Route::Marketing => Self::Marketing,
            Route::Home | Route::Dashboard | Route::Support => Self::Overview,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellerDashboard {
    pub user_name: String,
    pub nav: &'static [NavItem],
    /// Path of the highlighted sidebar link.
    pub active_path: &'static str,
    pub tab: SellerTab,
    /// Present only when `tab` is `Marketing`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing: Option<MarketingSuite>,
}

/// The role-specific dashboard, or the invalid-role fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum DashboardView {
    Admin(AdminDashboard),
    Seller(SellerDashboard),
    Buyer(BuyerDashboard),
    /// The identity carried no role, or one this build doesn't know.
    InvalidRole { role: Option<String> },
}

impl DashboardView {
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Admin(_) => Some(Role::Admin),
            Self::Seller(_) => Some(Role::Seller),
            Self::Buyer(_) => Some(Role::Buyer),
            Self::InvalidRole { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Page-level views
// ---------------------------------------------------------------------------

/// The public home page with the sign-in form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeView {
    pub auth_error: Option<String>,
    pub processing: bool,
    pub demo_notice: &'static str,
}

impl HomeView {
    pub fn new(auth_error: Option<String>, processing: bool) -> Self {
        Self {
            auth_error,
            processing,
            demo_notice: DEMO_NOTICE,
        }
    }
}

/// Everything a frame can show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    /// Session not restored yet.
    Loading,
    Home(HomeView),
    Dashboard(DashboardView),
    Unauthorized { required: Role, actual: Role },
    NotFound { path: String },
}
