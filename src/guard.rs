//! Deletion guard
//!
//! Structural removals are refused while answers depend on the record. Callers
//! check here first, delete, then re-sequence the remaining siblings.

use uuid::Uuid;

use crate::error::{DeletionError, EntityKind, Error, Result};
use crate::model::Optioning;

/// Record whose removal needs a usage check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageTarget {
    /// Counts responses to the form
    Form(Uuid),
    Questioning(Uuid),
    /// Answers through any questioning of the question
    Question(Uuid),
    /// Answers choosing the option through any questioning
    OptionItem(Uuid),
    /// Answers choosing the optioning's option on questions using its set
    Optioning(Uuid),
}

impl UsageTarget {
    pub fn kind(&self) -> EntityKind {
        match self {
            UsageTarget::Form(_) => EntityKind::Form,
            UsageTarget::Questioning(_) => EntityKind::Questioning,
            UsageTarget::Question(_) => EntityKind::Question,
            UsageTarget::OptionItem(_) => EntityKind::OptionItem,
            UsageTarget::Optioning(_) => EntityKind::Optioning,
        }
    }

    pub fn id(&self) -> Uuid {
        match *self {
            UsageTarget::Form(id)
            | UsageTarget::Questioning(id)
            | UsageTarget::Question(id)
            | UsageTarget::OptionItem(id)
            | UsageTarget::Optioning(id) => id,
        }
    }
}

/// What the usage layer knows without running a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerCount {
    Precomputed(u64),
    NeedsQuery,
}

/// Usage-count collaborator consulted before removals
pub trait UsageQuery {
    /// Cheap lookup; `NeedsQuery` when no cached count exists
    fn answer_count(&self, target: UsageTarget) -> Result<AnswerCount>;

    /// Live count
    fn query_answer_count(&self, target: UsageTarget) -> Result<u64>;

    /// Cached count when available, live count otherwise
    fn count(&self, target: UsageTarget) -> Result<u64> {
        match self.answer_count(target)? {
            AnswerCount::Precomputed(count) => Ok(count),
            AnswerCount::NeedsQuery => self.query_answer_count(target),
        }
    }
}

/// Refuse removal of `target` while anything references it
pub fn guard_delete<U: UsageQuery + ?Sized>(target: UsageTarget, usage: &U) -> Result<()> {
    let count = usage.count(target)?;
    if count > 0 {
        log::warn!("Refusing to remove {} {}: {} answer(s) depend on it", target.kind(), target.id(), count);
        return Err(DeletionError::InUse {
            kind: target.kind(),
            id: target.id(),
            count,
        }
        .into());
    }

    log::debug!("{} {} is unused, removal permitted", target.kind(), target.id());
    Ok(())
}

/// Check an option set edit that removes `removed` from `current`.
///
/// Emptying the set is refused before any usage lookup happens.
pub fn guard_option_set_edit<U: UsageQuery + ?Sized>(
    option_set_id: Uuid,
    current: &[Optioning],
    removed: &[Uuid],
    usage: &U,
) -> Result<()> {
    let remaining = current.iter().filter(|o| !removed.contains(&o.id)).count();
    if remaining == 0 {
        return Err(DeletionError::EmptyNotAllowed { option_set_id }.into());
    }

    for optioning in current.iter().filter(|o| removed.contains(&o.id)) {
        guard_delete(UsageTarget::Optioning(optioning.id), usage)?;
    }
    Ok(())
}

/// Pull the deletion error out of a crate error, if that's what it is
pub fn as_deletion_error(err: &Error) -> Option<&DeletionError> {
    match err {
        Error::Deletion(inner) => Some(inner),
        _ => None,
    }
}
