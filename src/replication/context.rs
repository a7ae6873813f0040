use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

use crate::error::EntityKind;
use crate::model::MissionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CopyKey {
    kind: EntityKind,
    source: Uuid,
    mission_id: MissionId,
}

/// Copies made so far, keyed by source record and target mission.
///
/// Holds ids only. Pass the same context to several replicate calls to share
/// copies of options, questions and option sets between them.
#[derive(Debug, Clone, Default)]
pub struct ReplicationContext {
    copies: HashMap<CopyKey, Uuid>,
    created: BTreeMap<EntityKind, usize>,
}

impl ReplicationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the copy of `source` already made for `mission_id`
    pub fn copy_of(&self, kind: EntityKind, source: Uuid, mission_id: MissionId) -> Option<Uuid> {
        self.copies
            .get(&CopyKey { kind, source, mission_id })
            .copied()
    }

    pub fn register(&mut self, kind: EntityKind, source: Uuid, mission_id: MissionId, copy: Uuid) {
        self.copies.insert(CopyKey { kind, source, mission_id }, copy);
    }

    pub(crate) fn record_created(&mut self, kind: EntityKind) {
        *self.created.entry(kind).or_insert(0) += 1;
    }

    /// Number of records of `kind` created through this context
    pub fn created(&self, kind: EntityKind) -> usize {
        self.created.get(&kind).copied().unwrap_or(0)
    }

    /// Per-kind creation counts, for reporting
    pub fn created_counts(&self) -> &BTreeMap<EntityKind, usize> {
        &self.created
    }

    pub fn total_created(&self) -> usize {
        self.created.values().sum()
    }
}
