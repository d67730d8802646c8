//! The seller's marketing suite: four tool panels, each with its own tab
//! strip and form drafts.
//!
//! Drafts are local. Nothing here is persisted, and panels never share
//! state with each other.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::{TabStrip, ViewError};

// ---------------------------------------------------------------------------
// MarketingPanel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketingPanel {
    #[default]
    Seo,
    Email,
    Cart,
    Affiliate,
}

impl MarketingPanel {
    pub const ALL: [MarketingPanel; 4] = [Self::Seo, Self::Email, Self::Cart, Self::Affiliate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seo => "seo",
            Self::Email => "email",
            Self::Cart => "cart",
            Self::Affiliate => "affiliate",
        }
    }
}

impl fmt::Display for MarketingPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketingPanel {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ViewError::UnknownPanel(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Panels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeoPanel {
    pub tabs: TabStrip,
    pub search_term: String,
}

impl Default for SeoPanel {
    fn default() -> Self {
        Self {
            tabs: TabStrip::new(&[
                "keyword-analysis",
                "meta-tags",
                "content-optimization",
                "performance",
            ]),
            search_term: String::new(),
        }
    }
}

impl SeoPanel {
    fn edit(&mut self, field: &str, value: &str) -> Result<(), ViewError> {
        match field {
            "search_term" => self.search_term = value.to_string(),
            _ => return Err(unknown_field(MarketingPanel::Seo, field)),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailPanel {
    pub tabs: TabStrip,
    pub selected_template: Option<String>,
    pub selected_audience: Option<String>,
}

impl Default for EmailPanel {
    fn default() -> Self {
        Self {
            tabs: TabStrip::new(&["campaigns", "templates", "audiences", "analytics"]),
            selected_template: None,
            selected_audience: None,
        }
    }
}

impl EmailPanel {
    fn edit(&mut self, field: &str, value: &str) -> Result<(), ViewError> {
        // An empty value clears the selection.
        let selection = (!value.is_empty()).then(|| value.to_string());
        match field {
            "template" => self.selected_template = selection,
            "audience" => self.selected_audience = selection,
            _ => return Err(unknown_field(MarketingPanel::Email, field)),
        }
        Ok(())
    }
}

/// Unit for the abandoned-cart reminder delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DelayUnit {
    Minutes,
    #[default]
    Hours,
    Days,
}

impl FromStr for DelayUnit {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minutes" => Ok(Self::Minutes),
            "hours" => Ok(Self::Hours),
            "days" => Ok(Self::Days),
            other => Err(ViewError::InvalidValue {
                field: "reminder_unit",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartPanel {
    pub tabs: TabStrip,
    pub reminder_delay: u32,
    pub reminder_unit: DelayUnit,
}

impl Default for CartPanel {
    fn default() -> Self {
        Self {
            tabs: TabStrip::new(&["overview", "campaigns", "settings"]),
            reminder_delay: 1,
            reminder_unit: DelayUnit::Hours,
        }
    }
}

impl CartPanel {
    fn edit(&mut self, field: &str, value: &str) -> Result<(), ViewError> {
        match field {
            "reminder_delay" => self.reminder_delay = parse_count("reminder_delay", value)?,
            "reminder_unit" => self.reminder_unit = value.parse()?,
            _ => return Err(unknown_field(MarketingPanel::Cart, field)),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AffiliatePanel {
    pub tabs: TabStrip,
    pub program_name: String,
    /// Minimum payout in whole dollars.
    pub min_payout: u32,
    pub cookie_days: u32,
}

impl Default for AffiliatePanel {
    fn default() -> Self {
        Self {
            tabs: TabStrip::new(&["overview", "affiliates", "commissions", "settings"]),
            program_name: "SkyGarden Affiliate Program".to_string(),
            min_payout: 50,
            cookie_days: 30,
        }
    }
}

impl AffiliatePanel {
    fn edit(&mut self, field: &str, value: &str) -> Result<(), ViewError> {
        match field {
            "program_name" => self.program_name = value.to_string(),
            "min_payout" => self.min_payout = parse_count("min_payout", value)?,
            "cookie_days" => self.cookie_days = parse_count("cookie_days", value)?,
            _ => return Err(unknown_field(MarketingPanel::Affiliate, field)),
        }
        Ok(())
    }
}

fn parse_count(field: &'static str, value: &str) -> Result<u32, ViewError> {
    value.trim().parse().map_err(|_| ViewError::InvalidValue {
        field,
        value: value.to_string(),
    })
}

fn unknown_field(panel: MarketingPanel, field: &str) -> ViewError {
    ViewError::UnknownField {
        panel: panel.as_str(),
        field: field.to_string(),
    }
}

// ---------------------------------------------------------------------------
// MarketingSuite
// ---------------------------------------------------------------------------

/// All four panels plus which one is showing.
///
/// Tab selection and draft edits apply to the active panel only; switching
/// panels keeps each panel's state where it was left.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarketingSuite {
    pub active: MarketingPanel,
    pub seo: SeoPanel,
    pub email: EmailPanel,
    pub cart: CartPanel,
    pub affiliate: AffiliatePanel,
}

impl MarketingSuite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_panel(&mut self, name: &str) -> Result<MarketingPanel, ViewError> {
        self.active = name.parse()?;
        Ok(self.active)
    }

    /// Switches the active panel's tab.
    pub fn select_tab(&mut self, name: &str) -> Result<(), ViewError> {
        self.active_tabs_mut().select(name)
    }

    /// The active panel's tab strip.
    pub fn active_tabs(&self) -> &TabStrip {
        match self.active {
            MarketingPanel::Seo => &self.seo.tabs,
            MarketingPanel::Email => &self.email.tabs,
            MarketingPanel::Cart => &self.cart.tabs,
            MarketingPanel::Affiliate => &self.affiliate.tabs,
        }
    }

    fn active_tabs_mut(&mut self) -> &mut TabStrip {
        match self.active {
            MarketingPanel::Seo => &mut self.seo.tabs,
            MarketingPanel::Email => &mut self.email.tabs,
            MarketingPanel::Cart => &mut self.cart.tabs,
            MarketingPanel::Affiliate => &mut self.affiliate.tabs,
        }
    }

    /// Updates one form draft on the active panel.
    ///
    /// | panel       | fields                                      |
    /// |-------------|---------------------------------------------|
    /// | `seo`       | `search_term`                               |
    /// | `email`     | `template`, `audience` (empty clears)       |
    /// | `cart`      | `reminder_delay`, `reminder_unit`           |
    /// | `affiliate` | `program_name`, `min_payout`, `cookie_days` |
    pub fn edit_draft(&mut self, field: &str, value: &str) -> Result<(), ViewError> {
        match self.active {
            MarketingPanel::Seo => self.seo.edit(field, value),
            MarketingPanel::Email => self.email.edit(field, value),
            MarketingPanel::Cart => self.cart.edit(field, value),
            MarketingPanel::Affiliate => self.affiliate.edit(field, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_suite_shows_seo_defaults() {
        let suite = MarketingSuite::new();

        assert_eq!(suite.active, MarketingPanel::Seo);
        assert_eq!(suite.active_tabs().active(), "keyword-analysis");
        assert_eq!(suite.cart.reminder_unit, DelayUnit::Hours);
        assert_eq!(suite.affiliate.min_payout, 50);
        assert_eq!(suite.affiliate.cookie_days, 30);
    }

    #[test]
    fn test_select_panel_unknown_is_rejected() {
        let mut suite = MarketingSuite::new();
        let err = suite.select_panel("social").unwrap_err();

        assert_eq!(err, ViewError::UnknownPanel("social".into()));
        assert_eq!(suite.active, MarketingPanel::Seo);
    }

    #[test]
    fn test_select_tab_applies_to_active_panel_only() {
        let mut suite = MarketingSuite::new();
        suite.select_panel("cart").unwrap();
        suite.select_tab("settings").unwrap();

        assert_eq!(suite.cart.tabs.active(), "settings");
        assert_eq!(suite.affiliate.tabs.active(), "overview");

        // Panel state survives switching away and back.
        suite.select_panel("seo").unwrap();
        suite.select_panel("cart").unwrap();
        assert_eq!(suite.active_tabs().active(), "settings");
    }

    #[test]
    fn test_select_tab_from_another_panel_is_rejected() {
        let mut suite = MarketingSuite::new();
        assert!(matches!(
            suite.select_tab("affiliates"),
            Err(ViewError::UnknownTab { .. })
        ));
    }

    #[test]
    fn test_edit_draft_cart_fields() {
        let mut suite = MarketingSuite::new();
        suite.select_panel("cart").unwrap();

        suite.edit_draft("reminder_delay", "3").unwrap();
        suite.edit_draft("reminder_unit", "days").unwrap();

        assert_eq!(suite.cart.reminder_delay, 3);
        assert_eq!(suite.cart.reminder_unit, DelayUnit::Days);
    }

    #[test]
    fn test_edit_draft_invalid_number_keeps_previous_value() {
        let mut suite = MarketingSuite::new();
        suite.select_panel("affiliate").unwrap();

        let err = suite.edit_draft("cookie_days", "a month").unwrap_err();

        assert_eq!(
            err,
            ViewError::InvalidValue {
                field: "cookie_days",
                value: "a month".into()
            }
        );
        assert_eq!(suite.affiliate.cookie_days, 30);
    }

    #[test]
    fn test_edit_draft_unknown_field_names_the_panel() {
        let mut suite = MarketingSuite::new();
        let err = suite.edit_draft("cookie_days", "7").unwrap_err();

        assert_eq!(
            err,
            ViewError::UnknownField {
                panel: "seo",
                field: "cookie_days".into()
            }
        );
    }

    #[test]
    fn test_edit_draft_email_empty_clears_selection() {
        let mut suite = MarketingSuite::new();
        suite.select_panel("email").unwrap();

        suite.edit_draft("template", "welcome").unwrap();
        assert_eq!(suite.email.selected_template.as_deref(), Some("welcome"));

        suite.edit_draft("template", "").unwrap();
        assert_eq!(suite.email.selected_template, None);
    }
}
