//! Domain layer: the todo tree and its vocabulary
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod filter;

pub use arena::{PostOrderIterator, PreOrderIterator, TodoArena, TodoId, TodoNode};
pub use error::{DomainError, DomainResult};
pub use filter::VisibilityFilter;
