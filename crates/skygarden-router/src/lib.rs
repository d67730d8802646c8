//! Access control and view selection for SkyGarden.
//!
//! Everything here is a pure function of a
//! [`SessionSnapshot`](skygarden_session::SessionSnapshot) plus local view
//! state; nothing in this crate mutates the session.
//!
//! # Key types
//!
//! - [`Route`] / [`RouteTable`]: the URL paths and which role each needs
//! - [`AuthGate`]: loading / redirect / render decision for protected routes
//! - [`RoleRouter`]: role → dashboard variant, with an invalid-role fallback
//! - [`View`], [`DashboardView`]: serializable view models
//! - [`MarketingSuite`]: the seller's four tabbed marketing panels

mod error;
mod gate;
mod marketing;
mod router;
mod routes;
mod views;

pub use error::ViewError;
pub use gate::{AuthGate, GateDecision, GateState};
pub use marketing::{
    AffiliatePanel, CartPanel, DelayUnit, EmailPanel, MarketingPanel, MarketingSuite, SeoPanel,
};
pub use router::{RoleRouter, ViewContext};
pub use routes::{Route, RouteTable};
pub use views::{
    AdminDashboard, BuyerDashboard, DEMO_NOTICE, DashboardView, HomeView, NavItem,
    SellerDashboard, SellerTab, StatCard, TabStrip, View, nav_for,
};
