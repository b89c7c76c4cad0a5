//! # SparkBlog Core
//!
//! The client-side heart of SparkBlog: the editor session that drafts, generates
//! and persists posts, the post collection that keeps the owner's list in sync,
//! and the dashboard controller that wires the two together.
//!
//! Every external collaborator (identity, persistence, text generation,
//! confirmation prompts, notifications) is a trait in [`ports`], injected at
//! construction time.

pub mod collection;
pub mod dashboard;
pub mod display;
pub mod domain;
pub mod editor;
pub mod error;
mod flight;
pub mod ports;

#[cfg(test)]
mod testing;

pub use collection::{DeleteOutcome, PostCollection, RefreshToken};
pub use dashboard::{Dashboard, View};
pub use editor::{EditorMode, EditorSession, SavedPost};
pub use error::{DomainError, Operation, SessionError};
pub use flight::OpState;
