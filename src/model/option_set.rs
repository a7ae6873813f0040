use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MissionId, Named, Scoped, Translations};
use crate::ranking::Ranked;

/// Named, ordered list of options. Owns its optionings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSet {
    pub id: Uuid,
    pub mission_id: Option<MissionId>,
    pub name: String,
    pub standard_id: Option<Uuid>,
}

impl Scoped for OptionSet {
    fn mission_id(&self) -> Option<MissionId> {
        self.mission_id
    }
}

impl Named for OptionSet {
    fn unique_key(&self) -> &str {
        &self.name
    }
}

/// Join record placing an option in a set at a rank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Optioning {
    pub id: Uuid,
    pub option_set_id: Uuid,
    pub option_id: Uuid,
    pub rank: Option<u32>,
    pub standard_id: Option<Uuid>,
}

impl Optioning {
    pub fn new(option_set_id: Uuid, option_id: Uuid, rank: Option<u32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            option_set_id,
            option_id,
            rank,
            standard_id: None,
        }
    }
}

impl Ranked for Optioning {
    fn rank(&self) -> Option<u32> {
        self.rank
    }

    fn set_rank(&mut self, rank: u32) {
        self.rank = Some(rank);
    }
}

/// A selectable answer. Shared between option sets; never owned by one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionItem {
    pub id: Uuid,
    pub mission_id: Option<MissionId>,
    pub name: Translations,
    pub value: Option<i64>,
    pub standard_id: Option<Uuid>,
}

impl Scoped for OptionItem {
    fn mission_id(&self) -> Option<MissionId> {
        self.mission_id
    }
}
