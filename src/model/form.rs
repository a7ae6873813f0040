use chrono::{DateTime, Utc};
use rand::{Rng, distr::Alphanumeric};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MissionId, Named, Scoped};
use crate::ranking::Ranked;

const VERSION_CODE_LENGTH: usize = 6;

/// A survey form. Owns its questionings and its current version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub id: Uuid,
    pub mission_id: Option<MissionId>,
    pub name: String,
    pub published: bool,
    pub downloads: u32,
    pub upgrade_needed: bool,
    pub current_version: FormVersion,
    /// Template this form was copied from
    pub standard_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Form {
    /// Replace the current version with the next one and reset the download counter
    pub fn upgrade_version(&mut self) {
        self.current_version = self.current_version.next();
        self.downloads = 0;
        self.upgrade_needed = false;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Scoped for Form {
    fn mission_id(&self) -> Option<MissionId> {
        self.mission_id
    }
}

impl Named for Form {
    fn unique_key(&self) -> &str {
        &self.name
    }
}

/// Version stamp handed out to data-collection clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormVersion {
    pub sequence: u32,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

impl FormVersion {
    pub fn initial() -> Self {
        Self {
            sequence: 1,
            code: generate_code(),
            created_at: Utc::now(),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            sequence: self.sequence + 1,
            code: generate_code(),
            created_at: Utc::now(),
        }
    }
}

fn generate_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(VERSION_CODE_LENGTH)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

/// Places a question on a form at a given rank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Questioning {
    pub id: Uuid,
    pub form_id: Uuid,
    pub question_id: Uuid,
    pub rank: Option<u32>,
    pub hidden: bool,
    pub required: bool,
    pub condition: Option<Condition>,
    pub standard_id: Option<Uuid>,
}

impl Questioning {
    pub fn new(form_id: Uuid, question_id: Uuid, rank: Option<u32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            form_id,
            question_id,
            rank,
            hidden: false,
            required: false,
            condition: None,
            standard_id: None,
        }
    }

    pub fn depends_on(&self, qing_id: Uuid) -> bool {
        self.condition.as_ref().is_some_and(|c| c.ref_qing_id == qing_id)
    }
}

impl Ranked for Questioning {
    fn rank(&self) -> Option<u32> {
        self.rank
    }

    fn set_rank(&mut self, rank: u32) {
        self.rank = Some(rank);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum ConditionOp {
    Eq,
    Neq,
    Lt,
    Gt,
    Leq,
    Geq,
}

/// Display condition: show the questioning only when `ref_qing_id`'s answer matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub ref_qing_id: Uuid,
    pub op: ConditionOp,
    pub value: Option<String>,
    pub option_id: Option<Uuid>,
}
