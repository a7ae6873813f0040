use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MissionId, Named, Scoped, Translations};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    LongText,
    Integer,
    Decimal,
    Date,
    SelectOne,
    SelectMultiple,
}

impl QuestionType {
    pub fn has_options(&self) -> bool {
        matches!(self, QuestionType::SelectOne | QuestionType::SelectMultiple)
    }
}

/// A reusable question. Forms reference it through questionings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub mission_id: Option<MissionId>,
    pub code: String,
    pub qtype: QuestionType,
    pub name: Translations,
    pub option_set_id: Option<Uuid>,
    pub standard_id: Option<Uuid>,
}

impl Scoped for Question {
    fn mission_id(&self) -> Option<MissionId> {
        self.mission_id
    }
}

impl Named for Question {
    fn unique_key(&self) -> &str {
        &self.code
    }
}
