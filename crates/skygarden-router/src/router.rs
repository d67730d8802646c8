//! Role → dashboard selection.

use std::str::FromStr;

use skygarden_protocol::Role;

use crate::{
    AdminDashboard, BuyerDashboard, DashboardView, MarketingSuite, Route, SellerDashboard,
    SellerTab, nav_for,
};

/// What the router needs besides the role.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub user_name: &'a str,
    pub active: Route,
    pub marketing: &'a MarketingSuite,
}

/// Picks exactly one dashboard variant per role.
///
/// Stateless; the result depends only on the role and the context.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleRouter;

impl RoleRouter {
    pub fn route(&self, role: Option<Role>, ctx: ViewContext<'_>) -> DashboardView {
        match role {
            Some(Role::Admin) => DashboardView::Admin(AdminDashboard::default()),
            Some(Role::Buyer) => DashboardView::Buyer(BuyerDashboard::default()),
            Some(Role::Seller) => {
                let tab = SellerTab::for_route(ctx.active);
                DashboardView::Seller(SellerDashboard {
                    user_name: ctx.user_name.to_string(),
                    nav: nav_for(Role::Seller),
                    active_path: ctx.active.path(),
                    tab,
                    marketing: (tab == SellerTab::Marketing).then(|| ctx.marketing.clone()),
                })
            }
            None => DashboardView::InvalidRole { role: None },
        }
    }

    /// Routes a role given by name. Unrecognized names fall back to
    /// [`DashboardView::InvalidRole`] rather than failing.
    pub fn route_name(&self, role: &str, ctx: ViewContext<'_>) -> DashboardView {
        match Role::from_str(role) {
            Ok(role) => self.route(Some(role), ctx),
            Err(_) => {
                tracing::warn!(role, "no dashboard for role");
                DashboardView::InvalidRole {
                    role: Some(role.to_string()),
                }
            }
        }
    }
}
