//! In-memory store with JSON snapshot persistence

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use uuid::Uuid;

use super::{Store, StoreResult};
use crate::error::{EntityKind, Result, StoreError};
use crate::guard::{AnswerCount, UsageQuery, UsageTarget};
use crate::model::{
    Answer, Form, Mission, MissionId, OptionItem, OptionSet, Optioning, Question, Questioning,
    Response,
};
use crate::ranking::Ranked;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Tables {
    #[serde(default)]
    missions: BTreeMap<Uuid, Mission>,
    #[serde(default)]
    forms: BTreeMap<Uuid, Form>,
    #[serde(default)]
    questionings: BTreeMap<Uuid, Questioning>,
    #[serde(default)]
    questions: BTreeMap<Uuid, Question>,
    #[serde(default)]
    option_sets: BTreeMap<Uuid, OptionSet>,
    #[serde(default)]
    optionings: BTreeMap<Uuid, Optioning>,
    #[serde(default)]
    options: BTreeMap<Uuid, OptionItem>,
    #[serde(default)]
    responses: BTreeMap<Uuid, Response>,
    #[serde(default)]
    answers: BTreeMap<Uuid, Answer>,
}

/// Whole graph held in maps keyed by id
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Tables,
    /// Answer counts cached by `precompute_usage`; dropped on any write
    usage_cache: Option<HashMap<UsageTarget, u64>>,
}

fn fetch<T: Clone>(table: &BTreeMap<Uuid, T>, kind: EntityKind, id: Uuid) -> StoreResult<T> {
    table.get(&id).cloned().ok_or(StoreError::NotFound { kind, id })
}

fn remove<T>(table: &mut BTreeMap<Uuid, T>, kind: EntityKind, id: Uuid) -> StoreResult<T> {
    table.remove(&id).ok_or(StoreError::NotFound { kind, id })
}

fn by_rank<T: Ranked>(mut items: Vec<T>) -> Vec<T> {
    items.sort_by_key(|item| (item.rank().is_none(), item.rank()));
    items
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot; a missing file yields an empty store
    pub fn open(path: &Path) -> StoreResult<Self> {
        if !path.exists() {
            log::info!("No snapshot at {:?}, starting with an empty store", path);
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)?;
        let tables: Tables = serde_json::from_str(&content)?;
        log::debug!(
            "Loaded snapshot {:?}: {} forms, {} option sets, {} questions",
            path,
            tables.forms.len(),
            tables.option_sets.len(),
            tables.questions.len()
        );

        Ok(Self {
            tables,
            usage_cache: None,
        })
    }

    pub fn save_to(&self, path: &Path) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.tables)?;
        fs::write(path, content)?;
        log::debug!("Saved snapshot to {:?}", path);
        Ok(())
    }

    pub fn insert_response(&mut self, response: Response) {
        self.invalidate();
        self.tables.responses.insert(response.id, response);
    }

    pub fn insert_answer(&mut self, answer: Answer) {
        self.invalidate();
        self.tables.answers.insert(answer.id, answer);
    }

    /// Cache answer counts for every form, questioning, question, option and optioning
    pub fn precompute_usage(&mut self) {
        let mut cache = HashMap::new();
        let targets: Vec<UsageTarget> = self
            .tables
            .forms
            .keys()
            .map(|id| UsageTarget::Form(*id))
            .chain(self.tables.questionings.keys().map(|id| UsageTarget::Questioning(*id)))
            .chain(self.tables.questions.keys().map(|id| UsageTarget::Question(*id)))
            .chain(self.tables.options.keys().map(|id| UsageTarget::OptionItem(*id)))
            .chain(self.tables.optionings.keys().map(|id| UsageTarget::Optioning(*id)))
            .collect();

        for target in targets {
            cache.insert(target, self.live_count(target));
        }
        log::debug!("Precomputed usage for {} records", cache.len());
        self.usage_cache = Some(cache);
    }

    pub fn has_precomputed_usage(&self) -> bool {
        self.usage_cache.is_some()
    }

    fn invalidate(&mut self) {
        self.usage_cache = None;
    }

    fn live_count(&self, target: UsageTarget) -> u64 {
        let answers = self.tables.answers.values();
        let count = match target {
            UsageTarget::Form(form_id) => {
                return self.tables.responses.values().filter(|r| r.form_id == form_id).count() as u64;
            }
            UsageTarget::Questioning(qing_id) => answers.filter(|a| a.questioning_id == qing_id).count(),
            UsageTarget::Question(question_id) => answers
                .filter(|a| {
                    self.tables
                        .questionings
                        .get(&a.questioning_id)
                        .is_some_and(|q| q.question_id == question_id)
                })
                .count(),
            UsageTarget::OptionItem(option_id) => answers.filter(|a| a.option_id == Some(option_id)).count(),
            UsageTarget::Optioning(optioning_id) => {
                let Some(optioning) = self.tables.optionings.get(&optioning_id) else {
                    return 0;
                };
                answers
                    .filter(|a| a.option_id == Some(optioning.option_id))
                    .filter(|a| {
                        self.tables
                            .questionings
                            .get(&a.questioning_id)
                            .and_then(|qing| self.tables.questions.get(&qing.question_id))
                            .is_some_and(|question| question.option_set_id == Some(optioning.option_set_id))
                    })
                    .count()
            }
        };
        count as u64
    }
}

impl UsageQuery for MemoryStore {
    fn answer_count(&self, target: UsageTarget) -> Result<AnswerCount> {
        Ok(match &self.usage_cache {
            Some(cache) => AnswerCount::Precomputed(cache.get(&target).copied().unwrap_or(0)),
            None => AnswerCount::NeedsQuery,
        })
    }

    fn query_answer_count(&self, target: UsageTarget) -> Result<u64> {
        Ok(self.live_count(target))
    }
}

impl Store for MemoryStore {
    fn mission(&self, id: MissionId) -> StoreResult<Mission> {
        fetch(&self.tables.missions, EntityKind::Mission, id)
    }

    fn missions(&self) -> StoreResult<Vec<Mission>> {
        let mut missions: Vec<Mission> = self.tables.missions.values().cloned().collect();
        missions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(missions)
    }

    fn save_mission(&mut self, mission: Mission) -> StoreResult<()> {
        self.tables.missions.insert(mission.id, mission);
        Ok(())
    }

    fn form(&self, id: Uuid) -> StoreResult<Form> {
        fetch(&self.tables.forms, EntityKind::Form, id)
    }

    fn forms(&self, scope: Option<MissionId>) -> StoreResult<Vec<Form>> {
        Ok(self.tables.forms.values().filter(|f| f.mission_id == scope).cloned().collect())
    }

    fn save_form(&mut self, form: Form) -> StoreResult<()> {
        self.invalidate();
        self.tables.forms.insert(form.id, form);
        Ok(())
    }

    fn delete_form(&mut self, id: Uuid) -> StoreResult<()> {
        self.invalidate();
        remove(&mut self.tables.forms, EntityKind::Form, id)?;
        self.tables.questionings.retain(|_, q| q.form_id != id);
        Ok(())
    }

    fn questioning(&self, id: Uuid) -> StoreResult<Questioning> {
        fetch(&self.tables.questionings, EntityKind::Questioning, id)
    }

    fn questionings(&self, form_id: Uuid) -> StoreResult<Vec<Questioning>> {
        let items = self.tables.questionings.values().filter(|q| q.form_id == form_id).cloned().collect();
        Ok(by_rank(items))
    }

    fn questionings_for_question(&self, question_id: Uuid) -> StoreResult<Vec<Questioning>> {
        Ok(self.tables.questionings.values().filter(|q| q.question_id == question_id).cloned().collect())
    }

    fn conditioned_on_option(&self, option_id: Uuid) -> StoreResult<Vec<Questioning>> {
        Ok(self
            .tables
            .questionings
            .values()
            .filter(|q| q.condition.as_ref().is_some_and(|c| c.option_id == Some(option_id)))
            .cloned()
            .collect())
    }

    fn save_questioning(&mut self, questioning: Questioning) -> StoreResult<()> {
        self.invalidate();
        self.tables.questionings.insert(questioning.id, questioning);
        Ok(())
    }

    fn delete_questioning(&mut self, id: Uuid) -> StoreResult<()> {
        self.invalidate();
        remove(&mut self.tables.questionings, EntityKind::Questioning, id).map(|_| ())
    }

    fn question(&self, id: Uuid) -> StoreResult<Question> {
        fetch(&self.tables.questions, EntityKind::Question, id)
    }

    fn questions(&self, scope: Option<MissionId>) -> StoreResult<Vec<Question>> {
        Ok(self.tables.questions.values().filter(|q| q.mission_id == scope).cloned().collect())
    }

    fn save_question(&mut self, question: Question) -> StoreResult<()> {
        self.invalidate();
        self.tables.questions.insert(question.id, question);
        Ok(())
    }

    fn delete_question(&mut self, id: Uuid) -> StoreResult<()> {
        self.invalidate();
        remove(&mut self.tables.questions, EntityKind::Question, id).map(|_| ())
    }

    fn option_set(&self, id: Uuid) -> StoreResult<OptionSet> {
        fetch(&self.tables.option_sets, EntityKind::OptionSet, id)
    }

    fn option_sets(&self, scope: Option<MissionId>) -> StoreResult<Vec<OptionSet>> {
        Ok(self.tables.option_sets.values().filter(|s| s.mission_id == scope).cloned().collect())
    }

    fn save_option_set(&mut self, set: OptionSet) -> StoreResult<()> {
        self.invalidate();
        self.tables.option_sets.insert(set.id, set);
        Ok(())
    }

    fn optioning(&self, id: Uuid) -> StoreResult<Optioning> {
        fetch(&self.tables.optionings, EntityKind::Optioning, id)
    }

    fn optionings(&self, option_set_id: Uuid) -> StoreResult<Vec<Optioning>> {
        let items = self
            .tables
            .optionings
            .values()
            .filter(|o| o.option_set_id == option_set_id)
            .cloned()
            .collect();
        Ok(by_rank(items))
    }

    fn optionings_for_option(&self, option_id: Uuid) -> StoreResult<Vec<Optioning>> {
        Ok(self.tables.optionings.values().filter(|o| o.option_id == option_id).cloned().collect())
    }

    fn save_optioning(&mut self, optioning: Optioning) -> StoreResult<()> {
        self.invalidate();
        self.tables.optionings.insert(optioning.id, optioning);
        Ok(())
    }

    fn delete_optioning(&mut self, id: Uuid) -> StoreResult<()> {
        self.invalidate();
        remove(&mut self.tables.optionings, EntityKind::Optioning, id).map(|_| ())
    }

    fn option_item(&self, id: Uuid) -> StoreResult<OptionItem> {
        fetch(&self.tables.options, EntityKind::OptionItem, id)
    }

    fn save_option_item(&mut self, option: OptionItem) -> StoreResult<()> {
        self.invalidate();
        self.tables.options.insert(option.id, option);
        Ok(())
    }

    fn delete_option_item(&mut self, id: Uuid) -> StoreResult<()> {
        self.invalidate();
        remove(&mut self.tables.options, EntityKind::OptionItem, id).map(|_| ())
    }

    fn find_copy(&self, kind: EntityKind, standard_id: Uuid, mission_id: MissionId) -> StoreResult<Option<Uuid>> {
        let scope = Some(mission_id);
        let standard = Some(standard_id);
        let found = match kind {
            EntityKind::Form => self
                .tables
                .forms
                .values()
                .find(|f| f.mission_id == scope && f.standard_id == standard)
                .map(|f| f.id),
            EntityKind::Question => self
                .tables
                .questions
                .values()
                .find(|q| q.mission_id == scope && q.standard_id == standard)
                .map(|q| q.id),
            EntityKind::OptionSet => self
                .tables
                .option_sets
                .values()
                .find(|s| s.mission_id == scope && s.standard_id == standard)
                .map(|s| s.id),
            EntityKind::OptionItem => self
                .tables
                .options
                .values()
                .find(|o| o.mission_id == scope && o.standard_id == standard)
                .map(|o| o.id),
            // Owned children are always copied with their parent
            EntityKind::Mission
            | EntityKind::Questioning
            | EntityKind::Optioning
            | EntityKind::Response => None,
        };
        Ok(found)
    }

    fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let snapshot = self.tables.clone();
        match f(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                log::warn!("Rolling back transaction: {}", err);
                self.tables = snapshot;
                self.invalidate();
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FormBuilder, OptionItemBuilder, OptionSetBuilder, QuestionBuilder, QuestionType};

    fn seeded() -> (MemoryStore, Form, Questioning, Optioning) {
        let mut store = MemoryStore::new();
        let option = OptionItemBuilder::new().name("en", "Yes").build().unwrap();
        let (set, optionings) = OptionSetBuilder::new("Yes/No").option(option.id).build().unwrap();
        let question = QuestionBuilder::new("agree", QuestionType::SelectOne)
            .title("en", "Do you agree?")
            .option_set(set.id)
            .build()
            .unwrap();
        let form = FormBuilder::new("Poll").build().unwrap();
        let qing = Questioning::new(form.id, question.id, Some(1));

        store.save_option_item(option).unwrap();
        store.save_option_set(set).unwrap();
        for optioning in &optionings {
            store.save_optioning(optioning.clone()).unwrap();
        }
        store.save_question(question).unwrap();
        store.save_form(form.clone()).unwrap();
        store.save_questioning(qing.clone()).unwrap();

        (store, form, qing, optionings[0].clone())
    }

    fn answer(store: &mut MemoryStore, form: &Form, qing: &Questioning, option_id: Option<Uuid>) {
        let response = Response { id: Uuid::new_v4(), form_id: form.id };
        store.insert_answer(Answer {
            id: Uuid::new_v4(),
            response_id: response.id,
            questioning_id: qing.id,
            option_id,
            value: None,
        });
        store.insert_response(response);
    }

    #[test]
    fn test_live_counts() {
        let (mut store, form, qing, optioning) = seeded();
        answer(&mut store, &form, &qing, Some(optioning.option_id));

        assert_eq!(store.count(UsageTarget::Form(form.id)).unwrap(), 1);
        assert_eq!(store.count(UsageTarget::Questioning(qing.id)).unwrap(), 1);
        assert_eq!(store.count(UsageTarget::Question(qing.question_id)).unwrap(), 1);
        assert_eq!(store.count(UsageTarget::OptionItem(optioning.option_id)).unwrap(), 1);
        assert_eq!(store.count(UsageTarget::Optioning(optioning.id)).unwrap(), 1);
    }

    #[test]
    fn test_precomputed_counts_are_dropped_on_write() {
        let (mut store, form, qing, _) = seeded();
        store.precompute_usage();
        assert_eq!(
            store.answer_count(UsageTarget::Questioning(qing.id)).unwrap(),
            AnswerCount::Precomputed(0)
        );

        answer(&mut store, &form, &qing, None);
        assert!(!store.has_precomputed_usage());
        assert_eq!(store.answer_count(UsageTarget::Questioning(qing.id)).unwrap(), AnswerCount::NeedsQuery);
        assert_eq!(store.count(UsageTarget::Questioning(qing.id)).unwrap(), 1);
    }

    #[test]
    fn test_delete_form_cascades_questionings() {
        let (mut store, form, qing, _) = seeded();
        store.delete_form(form.id).unwrap();
        assert!(matches!(
            store.questioning(qing.id),
            Err(StoreError::NotFound { kind: EntityKind::Questioning, .. })
        ));
    }

    #[test]
    fn test_failed_transaction_rolls_back() {
        let (mut store, form, _, _) = seeded();
        let result: Result<()> = store.transaction(|tx| {
            tx.delete_form(form.id)?;
            Err(crate::error::ValidationError::EmptyOptionSet.into())
        });

        assert!(result.is_err());
        assert!(store.form(form.id).is_ok());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let (store, form, qing, _) = seeded();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        store.save_to(&path).unwrap();
        let reopened = MemoryStore::open(&path).unwrap();

        assert_eq!(reopened.form(form.id).unwrap(), form);
        assert_eq!(reopened.questionings(form.id).unwrap(), vec![qing]);
    }

    #[test]
    fn test_missing_snapshot_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::open(&dir.path().join("absent.json")).unwrap();
        assert!(store.missions().unwrap().is_empty());
    }
}
