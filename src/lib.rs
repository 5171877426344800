//! todotree: an in-memory todo tree with derived list views.
//!
//! [`TodoListStore`] owns the tree and serves the flattened (`todos`) and
//! filtered (`filtered_todos`) views; every structural edit goes through it.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod tree_traits;
pub mod util;

pub use application::{ApplicationError, ApplicationResult, TodoListStore, DEMO_TODOS};
pub use domain::{DomainError, DomainResult, TodoArena, TodoId, TodoNode, VisibilityFilter};
