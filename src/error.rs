//! Error types for the survey core
//!
//! Library code returns [`Error`]; the binary wraps it in `anyhow` at the
//! command boundary.

use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Kinds of records the core manipulates, used in error and log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum EntityKind {
    Mission,
    Form,
    Questioning,
    Question,
    OptionSet,
    Optioning,
    OptionItem,
    Response,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Mission => "mission",
            EntityKind::Form => "form",
            EntityKind::Questioning => "questioning",
            EntityKind::Question => "question",
            EntityKind::OptionSet => "option set",
            EntityKind::Optioning => "optioning",
            EntityKind::OptionItem => "option",
            EntityKind::Response => "response",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{kind} name can't be blank")]
    BlankName { kind: EntityKind },

    #[error("at least one translation must be filled in")]
    BlankTranslations,

    #[error("question code '{code}' must start with a letter and contain 2-20 letters, digits or underscores")]
    InvalidCode { code: String },

    #[error("select questions need an option set")]
    MissingOptionSet,

    #[error("option set must have at least one option")]
    EmptyOptionSet,

    #[error("could not find a free name for '{candidate}' after {attempts} attempts")]
    NameExhausted { candidate: String, attempts: usize },

    #[error("{kind} name '{name}' is already taken")]
    NameTaken { kind: EntityKind, name: String },

    #[error("form {form_id} is published and can't be changed structurally")]
    FormPublished { form_id: Uuid },

    #[error("form {form_id} is not published")]
    FormNotPublished { form_id: Uuid },

    #[error("{kind} {id} belongs to a different scope")]
    ScopeMismatch { kind: EntityKind, id: Uuid },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeletionError {
    #[error("{kind} {id} can't be removed, it has {count} answer(s)")]
    InUse { kind: EntityKind, id: Uuid, count: u64 },

    #[error("option set {option_set_id} must keep at least one option")]
    EmptyNotAllowed { option_set_id: Uuid },
}

impl DeletionError {
    /// Stable machine-readable reason code
    pub fn reason(&self) -> &'static str {
        match self {
            DeletionError::InUse { .. } => "in_use",
            DeletionError::EmptyNotAllowed { .. } => "empty_not_allowed",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplicationError {
    #[error("{kind} {id} belongs to another mission; only standard {kind}s can be copied across missions")]
    CrossMission { kind: EntityKind, id: Uuid },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: Uuid },

    #[error("snapshot I/O failed")]
    Io(#[from] std::io::Error),

    #[error("snapshot is not valid JSON")]
    Snapshot(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Deletion(#[from] DeletionError),

    #[error(transparent)]
    Replication(#[from] ReplicationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deletion_reasons() {
        let id = Uuid::new_v4();
        let in_use = DeletionError::InUse { kind: EntityKind::OptionItem, id, count: 3 };
        let empty = DeletionError::EmptyNotAllowed { option_set_id: id };

        assert_eq!(in_use.reason(), "in_use");
        assert_eq!(empty.reason(), "empty_not_allowed");
        assert!(in_use.to_string().contains("3 answer(s)"));
    }

    #[test]
    fn test_error_is_transparent() {
        let err: Error = ValidationError::EmptyOptionSet.into();
        assert_eq!(err.to_string(), "option set must have at least one option");
    }
}
