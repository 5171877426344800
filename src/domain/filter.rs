//! Visibility filter selecting which todos a view shows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Closed set of list filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisibilityFilter {
    #[default]
    ShowAll,
    ShowActive,
    ShowCompleted,
}

impl VisibilityFilter {
    pub const ALL: [VisibilityFilter; 3] = [
        VisibilityFilter::ShowAll,
        VisibilityFilter::ShowActive,
        VisibilityFilter::ShowCompleted,
    ];

    /// Whether a todo with the given completion state passes this filter.
    pub fn matches(self, completed: bool) -> bool {
        match self {
            VisibilityFilter::ShowAll => true,
            VisibilityFilter::ShowActive => !completed,
            VisibilityFilter::ShowCompleted => completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VisibilityFilter::ShowAll => "SHOW_ALL",
            VisibilityFilter::ShowActive => "SHOW_ACTIVE",
            VisibilityFilter::ShowCompleted => "SHOW_COMPLETED",
        }
    }
}

impl fmt::Display for VisibilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisibilityFilter {
    type Err = DomainError;

    /// Accepts canonical names (`SHOW_ACTIVE`) and short names (`active`), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SHOW_ALL" | "ALL" => Ok(VisibilityFilter::ShowAll),
            "SHOW_ACTIVE" | "ACTIVE" => Ok(VisibilityFilter::ShowActive),
            "SHOW_COMPLETED" | "COMPLETED" => Ok(VisibilityFilter::ShowCompleted),
            _ => Err(DomainError::InvalidFilter(s.to_string())),
        }
    }
}
