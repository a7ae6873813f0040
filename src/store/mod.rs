//! Persistence collaborator
//!
//! The core only talks to storage through [`Store`]. [`MemoryStore`] is the
//! bundled implementation, persisted as a JSON snapshot by the CLI.

use uuid::Uuid;

use crate::error::{EntityKind, Result, StoreError};
use crate::model::{
    Form, Mission, MissionId, OptionItem, OptionSet, Optioning, Question, Questioning,
};

pub mod memory;

pub use memory::MemoryStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Load/save/delete access to the entity graph.
///
/// Scope arguments are `None` for the standard library and `Some(mission)` for
/// a mission. Child listings come back ordered by rank, unranked rows last.
pub trait Store {
    fn mission(&self, id: MissionId) -> StoreResult<Mission>;
    fn missions(&self) -> StoreResult<Vec<Mission>>;
    fn save_mission(&mut self, mission: Mission) -> StoreResult<()>;

    fn form(&self, id: Uuid) -> StoreResult<Form>;
    fn forms(&self, scope: Option<MissionId>) -> StoreResult<Vec<Form>>;
    fn save_form(&mut self, form: Form) -> StoreResult<()>;
    /// Deletes the form and its questionings
    fn delete_form(&mut self, id: Uuid) -> StoreResult<()>;

    fn questioning(&self, id: Uuid) -> StoreResult<Questioning>;
    fn questionings(&self, form_id: Uuid) -> StoreResult<Vec<Questioning>>;
    /// Every questioning placing `question_id`, across all forms
    fn questionings_for_question(&self, question_id: Uuid) -> StoreResult<Vec<Questioning>>;
    /// Questionings whose display condition names `option_id`
    fn conditioned_on_option(&self, option_id: Uuid) -> StoreResult<Vec<Questioning>>;
    fn save_questioning(&mut self, questioning: Questioning) -> StoreResult<()>;
    fn delete_questioning(&mut self, id: Uuid) -> StoreResult<()>;

    fn question(&self, id: Uuid) -> StoreResult<Question>;
    fn questions(&self, scope: Option<MissionId>) -> StoreResult<Vec<Question>>;
    fn save_question(&mut self, question: Question) -> StoreResult<()>;
    fn delete_question(&mut self, id: Uuid) -> StoreResult<()>;

    fn option_set(&self, id: Uuid) -> StoreResult<OptionSet>;
    fn option_sets(&self, scope: Option<MissionId>) -> StoreResult<Vec<OptionSet>>;
    fn save_option_set(&mut self, set: OptionSet) -> StoreResult<()>;

    fn optioning(&self, id: Uuid) -> StoreResult<Optioning>;
    fn optionings(&self, option_set_id: Uuid) -> StoreResult<Vec<Optioning>>;
    /// Every optioning that places `option_id`, across all sets
    fn optionings_for_option(&self, option_id: Uuid) -> StoreResult<Vec<Optioning>>;
    fn save_optioning(&mut self, optioning: Optioning) -> StoreResult<()>;
    fn delete_optioning(&mut self, id: Uuid) -> StoreResult<()>;

    fn option_item(&self, id: Uuid) -> StoreResult<OptionItem>;
    fn save_option_item(&mut self, option: OptionItem) -> StoreResult<()>;
    fn delete_option_item(&mut self, id: Uuid) -> StoreResult<()>;

    /// Id of the copy of standard record `standard_id` living in `mission_id`, if any
    fn find_copy(&self, kind: EntityKind, standard_id: Uuid, mission_id: MissionId) -> StoreResult<Option<Uuid>>;

    /// Run `f` atomically: if it fails, every change it made is rolled back
    fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T>;
}
