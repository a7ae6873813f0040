//! Domain model for forms, questions and option sets
//!
//! Every record either belongs to a mission or is a standard template
//! (`mission_id == None`). Standard records are the sources for replication;
//! mission records are the editable copies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub mod answer;
pub mod builders;
pub mod form;
pub mod option_set;
pub mod question;

pub use answer::{Answer, Response};
pub use builders::{FormBuilder, MissionBuilder, OptionItemBuilder, OptionSetBuilder, QuestionBuilder};
pub use form::{Condition, ConditionOp, Form, FormVersion, Questioning};
pub use option_set::{OptionItem, OptionSet, Optioning};
pub use question::{Question, QuestionType};

pub type MissionId = Uuid;

/// A tenant. Everything that isn't standard hangs off one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Records that live either in a mission or in the standard library
pub trait Scoped {
    fn mission_id(&self) -> Option<MissionId>;

    fn is_standard(&self) -> bool {
        self.mission_id().is_none()
    }
}

/// Records whose name must be unique among their scope siblings
pub trait Named: Scoped {
    fn unique_key(&self) -> &str;
}

/// Human readable scope label for logs and CLI output
pub fn scope_label(mission_id: Option<MissionId>) -> String {
    match mission_id {
        Some(id) => format!("mission {}", id),
        None => "standard".to_string(),
    }
}

/// Locale -> text map used for question titles and option names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translations(BTreeMap<String, String>);

impl Translations {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Single-locale shorthand
    pub fn single(locale: &str, text: &str) -> Self {
        let mut translations = Self::new();
        translations.set(locale, text);
        translations
    }

    /// Set a translation; blank text removes the locale
    pub fn set(&mut self, locale: &str, text: &str) {
        let (locale, text) = (locale.trim(), text.trim());
        if text.is_empty() {
            self.0.remove(locale);
        } else {
            self.0.insert(locale.to_string(), text.to_string());
        }
    }

    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    /// Text for `locale`, falling back to `fallback`, then to any translation
    pub fn best(&self, locale: &str, fallback: &str) -> Option<&str> {
        self.get(locale)
            .or_else(|| self.get(fallback))
            .or_else(|| self.0.values().next().map(String::as_str))
    }

    pub fn is_blank(&self) -> bool {
        self.0.values().all(|text| text.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(locale, text)| (locale.as_str(), text.as_str()))
    }
}

impl<L: AsRef<str>, T: AsRef<str>> FromIterator<(L, T)> for Translations {
    fn from_iter<I: IntoIterator<Item = (L, T)>>(iter: I) -> Self {
        let mut translations = Self::new();
        for (locale, text) in iter {
            translations.set(locale.as_ref(), text.as_ref());
        }
        translations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translations_drop_blank_entries() {
        let translations: Translations = [("en", "  Yes "), ("fr", "   ")].into_iter().collect();
        assert_eq!(translations.get("en"), Some("Yes"));
        assert_eq!(translations.get("fr"), None);
        assert!(!translations.is_blank());
    }

    #[test]
    fn test_translations_fallback() {
        let translations: Translations = [("fr", "Oui"), ("sw", "Ndiyo")].into_iter().collect();
        assert_eq!(translations.best("sw", "en"), Some("Ndiyo"));
        assert_eq!(translations.best("de", "fr"), Some("Oui"));
        assert_eq!(translations.best("de", "en"), Some("Oui"));
        assert_eq!(Translations::new().best("en", "en"), None);
    }

    #[test]
    fn test_blank_text_clears_padded_locale() {
        let mut translations = Translations::single(" en", "Yes");
        assert_eq!(translations.get("en"), Some("Yes"));

        translations.set("en ", "  ");
        assert_eq!(translations.get("en"), None);
        assert!(translations.is_blank());
    }
}
