//! Survey form management core
//!
//! - [`ranking`]: keeps sibling ranks contiguous
//! - [`naming`]: scope-local unique names
//! - [`replication`]: standard -> mission deep copies and in-scope duplicates
//! - [`guard`]: refuses removals that would orphan answers
//! - [`operations`]: transactional edits built on the above

pub mod config;
pub mod error;
pub mod guard;
pub mod model;
pub mod naming;
pub mod operations;
pub mod ranking;
pub mod replication;
pub mod store;

pub use error::{DeletionError, EntityKind, Error, ReplicationError, Result, StoreError, ValidationError};
