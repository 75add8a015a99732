//! Page/filter/result-count state for paginated listing screens, kept
//! consistent with a shareable query string.

pub mod controller;
pub mod query;
pub mod screens;
pub mod view;

use serde::Serialize;
use thiserror::Error;

pub use controller::{FetchOutcome, FetchRequest, ListController, ListQueryState};
pub use query::{FilterSpec, ListQuery, ListScreen};
pub use view::{ApiListSource, ListSnapshot, ListSource, ListView};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    #[error("Screen '{screen}' has no filter named '{name}'")]
    UnknownFilter { screen: &'static str, name: String },
}

/// What a listing screen should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ViewStatus {
    Idle,
    /// Skeleton while a fetch is in flight
    Loading,
    Ready,
    /// Fetch succeeded with zero results
    Empty,
    Error {
        message: String,
        /// Logical failures render inline, the rest as a panel
        inline: bool,
    },
}

impl ViewStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, ViewStatus::Error { .. })
    }
}
