//! Fixture builders shared by the integration tests
#![allow(dead_code)]

use survey_cli::model::{
    Answer, Condition, ConditionOp, Form, Mission, MissionId, OptionItemBuilder, OptionSet, Question,
    QuestionBuilder, QuestionType, Questioning, Response,
};
use survey_cli::operations;
use survey_cli::store::{MemoryStore, Store};
use uuid::Uuid;

pub fn mission(store: &mut MemoryStore, name: &str) -> Mission {
    operations::create_mission(store, name).unwrap()
}

pub fn option(store: &mut MemoryStore, scope: Option<MissionId>, label: &str) -> Uuid {
    let option = OptionItemBuilder::new().mission(scope).name("en", label).build().unwrap();
    operations::create_option_item(store, option).unwrap().id
}

pub fn option_set(store: &mut MemoryStore, scope: Option<MissionId>, name: &str, option_ids: &[Uuid]) -> OptionSet {
    operations::create_option_set(store, name, scope, option_ids).unwrap().0
}

pub fn text_question(store: &mut MemoryStore, scope: Option<MissionId>, code: &str) -> Question {
    let question = QuestionBuilder::new(code, QuestionType::Text)
        .mission(scope)
        .title("en", code)
        .build()
        .unwrap();
    operations::create_question(store, question).unwrap()
}

pub fn select_question(store: &mut MemoryStore, scope: Option<MissionId>, code: &str, set_id: Uuid) -> Question {
    let question = QuestionBuilder::new(code, QuestionType::SelectOne)
        .mission(scope)
        .title("en", code)
        .option_set(set_id)
        .build()
        .unwrap();
    operations::create_question(store, question).unwrap()
}

/// Form holding `question_ids` at ranks 1..N
pub fn form_with(store: &mut MemoryStore, scope: Option<MissionId>, name: &str, question_ids: &[Uuid]) -> (Form, Vec<Questioning>) {
    let form = operations::create_form(store, name, scope).unwrap();
    let qings = question_ids
        .iter()
        .map(|id| operations::add_questioning(store, form.id, *id).unwrap())
        .collect();
    (store.form(form.id).unwrap(), qings)
}

pub fn show_if_option(store: &mut MemoryStore, qing_id: Uuid, ref_qing_id: Uuid, option_id: Uuid) {
    let condition = Condition {
        ref_qing_id,
        op: ConditionOp::Eq,
        value: None,
        option_id: Some(option_id),
    };
    operations::set_condition(store, qing_id, Some(condition)).unwrap();
}

/// One response with one answer; returns the response id
pub fn answer(store: &mut MemoryStore, form_id: Uuid, qing_id: Uuid, option_id: Option<Uuid>) -> Uuid {
    let response = Response { id: Uuid::new_v4(), form_id };
    store.insert_answer(Answer {
        id: Uuid::new_v4(),
        response_id: response.id,
        questioning_id: qing_id,
        option_id,
        value: None,
    });
    store.insert_response(response.clone());
    response.id
}

/// Standard sets "A" and "B" sharing one option
pub struct SharedSets {
    pub shared: Uuid,
    pub only_a: Uuid,
    pub only_b: Uuid,
    pub a: OptionSet,
    pub b: OptionSet,
}

pub fn shared_sets(store: &mut MemoryStore) -> SharedSets {
    let shared = option(store, None, "Yes");
    let only_a = option(store, None, "No");
    let only_b = option(store, None, "Maybe");
    let a = option_set(store, None, "A", &[shared, only_a]);
    let b = option_set(store, None, "B", &[shared, only_b]);
    SharedSets { shared, only_a, only_b, a, b }
}
