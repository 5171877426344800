//! Application layer: the todo list store
//!
//! Owns the tree, tracks view state and keeps derived views in step with mutations.

pub mod error;
pub mod store;

pub use error::{ApplicationError, ApplicationResult};
pub use store::{TodoListStore, DEMO_TODOS};
