//! Error types for view-state operations.

/// Rejected edits to local view state (tab, panel, form draft).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// The tab name isn't one of the strip's options.
    #[error("unknown tab {name:?}; expected one of {options:?}")]
    UnknownTab {
        name: String,
        options: &'static [&'static str],
    },

    /// The marketing panel name isn't `seo | email | cart | affiliate`.
    #[error("unknown marketing panel {0:?}")]
    UnknownPanel(String),

    /// The active panel has no draft field with this name.
    #[error("panel {panel} has no field {field:?}")]
    UnknownField { panel: &'static str, field: String },

    /// The draft value doesn't fit the field (e.g. text in a number).
    #[error("invalid value {value:?} for {field}")]
    InvalidValue { field: &'static str, value: String },

    /// The current view has nothing of this kind to act on, e.g. a tab
    /// switch on the home page.
    #[error("no {0} on the current view")]
    NotOnView(&'static str),
}
