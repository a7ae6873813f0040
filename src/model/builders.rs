//! Fluent builders that normalize and validate records before they exist
//!
//! Names are trimmed, counters start at zero, codes are checked against the
//! code pattern. Nothing reaches the store without going through one of these
//! or through replication.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use super::{
    Form, FormVersion, Mission, MissionId, OptionItem, OptionSet, Optioning, Question,
    QuestionType, Translations,
};
use crate::error::{EntityKind, ValidationError};

static CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]{1,19}$").expect("valid question code regex"));

fn clean_name(name: &str, kind: EntityKind) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::BlankName { kind });
    }
    Ok(name.to_string())
}

/// Builder for missions
pub struct MissionBuilder {
    name: String,
}

impl MissionBuilder {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }

    pub fn build(self) -> Result<Mission, ValidationError> {
        Ok(Mission {
            id: Uuid::new_v4(),
            name: clean_name(&self.name, EntityKind::Mission)?,
            created_at: Utc::now(),
        })
    }
}

/// Builder for forms; new forms are unpublished, never downloaded, at version 1
pub struct FormBuilder {
    name: String,
    mission_id: Option<MissionId>,
}

impl FormBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            mission_id: None,
        }
    }

    /// Place the form in a mission (default is standard)
    pub fn mission(mut self, mission_id: Option<MissionId>) -> Self {
        self.mission_id = mission_id;
        self
    }

    pub fn build(self) -> Result<Form, ValidationError> {
        let now = Utc::now();
        Ok(Form {
            id: Uuid::new_v4(),
            mission_id: self.mission_id,
            name: clean_name(&self.name, EntityKind::Form)?,
            published: false,
            downloads: 0,
            upgrade_needed: false,
            current_version: FormVersion::initial(),
            standard_id: None,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Builder for questions
pub struct QuestionBuilder {
    code: String,
    qtype: QuestionType,
    mission_id: Option<MissionId>,
    name: Translations,
    option_set_id: Option<Uuid>,
}

impl QuestionBuilder {
    pub fn new(code: &str, qtype: QuestionType) -> Self {
        Self {
            code: code.to_string(),
            qtype,
            mission_id: None,
            name: Translations::new(),
            option_set_id: None,
        }
    }

    pub fn mission(mut self, mission_id: Option<MissionId>) -> Self {
        self.mission_id = mission_id;
        self
    }

    /// Add the question title in one locale
    pub fn title(mut self, locale: &str, text: &str) -> Self {
        self.name.set(locale, text);
        self
    }

    pub fn option_set(mut self, option_set_id: Uuid) -> Self {
        self.option_set_id = Some(option_set_id);
        self
    }

    pub fn build(self) -> Result<Question, ValidationError> {
        let code = self.code.trim().to_string();
        if !CODE_PATTERN.is_match(&code) {
            return Err(ValidationError::InvalidCode { code });
        }
        if self.name.is_blank() {
            return Err(ValidationError::BlankTranslations);
        }

        // Option sets only make sense on select questions
        let option_set_id = if self.qtype.has_options() {
            Some(self.option_set_id.ok_or(ValidationError::MissingOptionSet)?)
        } else {
            None
        };

        Ok(Question {
            id: Uuid::new_v4(),
            mission_id: self.mission_id,
            code,
            qtype: self.qtype,
            name: self.name,
            option_set_id,
            standard_id: None,
        })
    }
}

/// Builder for options
pub struct OptionItemBuilder {
    mission_id: Option<MissionId>,
    name: Translations,
    value: Option<i64>,
}

impl OptionItemBuilder {
    pub fn new() -> Self {
        Self {
            mission_id: None,
            name: Translations::new(),
            value: None,
        }
    }

    pub fn mission(mut self, mission_id: Option<MissionId>) -> Self {
        self.mission_id = mission_id;
        self
    }

    pub fn name(mut self, locale: &str, text: &str) -> Self {
        self.name.set(locale, text);
        self
    }

    pub fn value(mut self, value: i64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn build(self) -> Result<OptionItem, ValidationError> {
        if self.name.is_blank() {
            return Err(ValidationError::BlankTranslations);
        }
        Ok(OptionItem {
            id: Uuid::new_v4(),
            mission_id: self.mission_id,
            name: self.name,
            value: self.value,
            standard_id: None,
        })
    }
}

impl Default for OptionItemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for option sets; ranks follow the order options are added
pub struct OptionSetBuilder {
    name: String,
    mission_id: Option<MissionId>,
    option_ids: Vec<Uuid>,
}

impl OptionSetBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            mission_id: None,
            option_ids: Vec::new(),
        }
    }

    pub fn mission(mut self, mission_id: Option<MissionId>) -> Self {
        self.mission_id = mission_id;
        self
    }

    pub fn option(mut self, option_id: Uuid) -> Self {
        self.option_ids.push(option_id);
        self
    }

    pub fn options(mut self, option_ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.option_ids.extend(option_ids);
        self
    }

    pub fn build(self) -> Result<(OptionSet, Vec<Optioning>), ValidationError> {
        let name = clean_name(&self.name, EntityKind::OptionSet)?;
        if self.option_ids.is_empty() {
            return Err(ValidationError::EmptyOptionSet);
        }

        let set = OptionSet {
            id: Uuid::new_v4(),
            mission_id: self.mission_id,
            name,
            standard_id: None,
        };
        let optionings = self
            .option_ids
            .into_iter()
            .enumerate()
            .map(|(index, option_id)| Optioning::new(set.id, option_id, Some(index as u32 + 1)))
            .collect();

        Ok((set, optionings))
    }
}
