//! Replication of forms, questions and option sets
//!
//! Two flavours:
//! - duplicate: copy within the source's own scope, linking shared children
//! - instantiate: copy a standard template into a mission, copying shared
//!   children once and keeping a `standard_id` backlink on every copy
//!
//! Copying a mission record into another mission is refused; lineage is
//! always standard -> mission.

mod context;
mod engine;

pub use context::ReplicationContext;
pub use engine::Replicator;
