mod common;

use survey_cli::model::Named;
use survey_cli::replication::{ReplicationContext, Replicator};
use survey_cli::store::{MemoryStore, Store};
use survey_cli::{EntityKind, Error, ReplicationError, operations};

use common::*;

fn option_ids(store: &MemoryStore, set_id: uuid::Uuid) -> Vec<uuid::Uuid> {
    store.optionings(set_id).unwrap().into_iter().map(|o| o.option_id).collect()
}

#[test]
fn test_shared_option_copied_once_per_context() {
    let mut store = MemoryStore::new();
    let sets = shared_sets(&mut store);
    let kenya = mission(&mut store, "Kenya");

    let mut ctx = ReplicationContext::new();
    let mut replicator = Replicator::new(&mut store);
    let copy_a = replicator.replicate_option_set(sets.a.id, Some(kenya.id), &mut ctx).unwrap();
    let copy_b = replicator.replicate_option_set(sets.b.id, Some(kenya.id), &mut ctx).unwrap();

    let a_options = option_ids(&store, copy_a.id);
    let b_options = option_ids(&store, copy_b.id);
    assert_eq!(a_options[0], b_options[0], "shared option should be copied once");
    assert_ne!(a_options[1], b_options[1]);
    assert_eq!(ctx.created(EntityKind::OptionItem), 3);
    assert_eq!(ctx.created(EntityKind::OptionSet), 2);

    let shared_copy = store.option_item(a_options[0]).unwrap();
    assert_eq!(shared_copy.standard_id, Some(sets.shared));
    assert_eq!(shared_copy.mission_id, Some(kenya.id));
    assert_eq!(store.option_item(b_options[1]).unwrap().standard_id, Some(sets.only_b));
    assert_eq!(store.option_item(a_options[1]).unwrap().standard_id, Some(sets.only_a));
}

#[test]
fn test_shared_option_found_in_mission_across_contexts() {
    let mut store = MemoryStore::new();
    let sets = shared_sets(&mut store);
    let kenya = mission(&mut store, "Kenya");

    let copy_a = Replicator::new(&mut store)
        .replicate_option_set(sets.a.id, Some(kenya.id), &mut ReplicationContext::new())
        .unwrap();
    let mut second = ReplicationContext::new();
    let copy_b = Replicator::new(&mut store)
        .replicate_option_set(sets.b.id, Some(kenya.id), &mut second)
        .unwrap();

    assert_eq!(option_ids(&store, copy_a.id)[0], option_ids(&store, copy_b.id)[0]);
    assert_eq!(second.created(EntityKind::OptionItem), 1);
}

#[test]
fn test_template_name_kept_then_suffixed() {
    let mut store = MemoryStore::new();
    let kenya = mission(&mut store, "Kenya");
    let (template, _) = form_with(&mut store, None, "Stuff", &[]);

    let mut replicator = Replicator::new(&mut store);
    let first = replicator.replicate_form(template.id, Some(kenya.id), &mut ReplicationContext::new()).unwrap();
    let second = replicator.replicate_form(template.id, Some(kenya.id), &mut ReplicationContext::new()).unwrap();

    assert_eq!(first.name, "Stuff");
    assert_eq!(second.name, "Stuff 2");
}

#[test]
fn test_duplicate_in_own_mission_always_suffixed() {
    let mut store = MemoryStore::new();
    let kenya = mission(&mut store, "Kenya");
    let yes = option(&mut store, Some(kenya.id), "Yes");
    let set = option_set(&mut store, Some(kenya.id), "Stuff", &[yes]);

    let mut replicator = Replicator::new(&mut store);
    let copy = replicator.replicate_option_set(set.id, None, &mut ReplicationContext::new()).unwrap();
    let again = replicator.replicate_option_set(set.id, Some(kenya.id), &mut ReplicationContext::new()).unwrap();

    assert_eq!(copy.name, "Stuff 2");
    assert_eq!(again.name, "Stuff 3");
    assert_eq!(copy.standard_id, None);
    assert_eq!(option_ids(&store, copy.id), option_ids(&store, set.id));
}

#[test]
fn test_standard_duplicate_stays_standard() {
    let mut store = MemoryStore::new();
    let question = text_question(&mut store, None, "age");

    let copy = Replicator::new(&mut store)
        .replicate_question(question.id, None, &mut ReplicationContext::new())
        .unwrap();

    assert_eq!(copy.code, "age2");
    assert_eq!(copy.mission_id, None);
    assert_eq!(copy.unique_key(), "age2");
}

#[test]
fn test_form_instantiation_copies_graph_with_backlinks() {
    let mut store = MemoryStore::new();
    let sets = shared_sets(&mut store);
    let kenya = mission(&mut store, "Kenya");
    let likes = select_question(&mut store, None, "likes", sets.a.id);
    let why = text_question(&mut store, None, "why");
    let (template, qings) = form_with(&mut store, None, "Household", &[likes.id, why.id]);
    show_if_option(&mut store, qings[1].id, qings[0].id, sets.shared);
    operations::publish_form(&mut store, template.id).unwrap();

    let mut ctx = ReplicationContext::new();
    let copy = Replicator::new(&mut store).replicate_form(template.id, Some(kenya.id), &mut ctx).unwrap();

    assert_eq!(copy.mission_id, Some(kenya.id));
    assert_eq!(copy.standard_id, Some(template.id));
    assert!(!copy.published);
    assert_eq!(copy.downloads, 0);
    assert_eq!(copy.current_version.sequence, 1);

    let copied = store.questionings(copy.id).unwrap();
    assert_eq!(copied.len(), 2);
    assert_eq!(copied[0].standard_id, Some(qings[0].id));
    assert_eq!(copied[1].standard_id, Some(qings[1].id));
    assert_eq!(copied.iter().map(|q| q.rank).collect::<Vec<_>>(), vec![Some(1), Some(2)]);

    let likes_copy = store.question(copied[0].question_id).unwrap();
    assert_eq!(likes_copy.standard_id, Some(likes.id));
    assert_eq!(likes_copy.mission_id, Some(kenya.id));
    let set_copy = store.option_set(likes_copy.option_set_id.unwrap()).unwrap();
    assert_eq!(set_copy.standard_id, Some(sets.a.id));

    let condition = copied[1].condition.clone().unwrap();
    assert_eq!(condition.ref_qing_id, copied[0].id);
    let option_copy = store.option_item(condition.option_id.unwrap()).unwrap();
    assert_eq!(option_copy.standard_id, Some(sets.shared));
    assert_eq!(option_ids(&store, set_copy.id)[0], option_copy.id);

    // the template itself is untouched
    let originals = store.questionings(template.id).unwrap();
    assert_eq!(originals[1].condition.as_ref().unwrap().ref_qing_id, qings[0].id);
    assert_eq!(ctx.created(EntityKind::Form), 1);
    assert_eq!(ctx.created(EntityKind::Question), 2);
}

#[test]
fn test_second_instantiation_reuses_mission_questions() {
    let mut store = MemoryStore::new();
    let kenya = mission(&mut store, "Kenya");
    let age = text_question(&mut store, None, "age");
    let (template, _) = form_with(&mut store, None, "Census", &[age.id]);

    let mut replicator = Replicator::new(&mut store);
    let first = replicator.replicate_form(template.id, Some(kenya.id), &mut ReplicationContext::new()).unwrap();
    let second = replicator.replicate_form(template.id, Some(kenya.id), &mut ReplicationContext::new()).unwrap();

    let first_q = store.questionings(first.id).unwrap()[0].question_id;
    let second_q = store.questionings(second.id).unwrap()[0].question_id;
    assert_eq!(first_q, second_q);
    assert_eq!(store.questions(Some(kenya.id)).unwrap().len(), 1);
}

#[test]
fn test_duplicate_form_links_questions_and_remaps_conditions() {
    let mut store = MemoryStore::new();
    let kenya = mission(&mut store, "Kenya");
    let yes = option(&mut store, Some(kenya.id), "Yes");
    let set = option_set(&mut store, Some(kenya.id), "Yes/No", &[yes]);
    let smokes = select_question(&mut store, Some(kenya.id), "smokes", set.id);
    let packs = text_question(&mut store, Some(kenya.id), "packs");
    let (form, qings) = form_with(&mut store, Some(kenya.id), "Health", &[smokes.id, packs.id]);
    show_if_option(&mut store, qings[1].id, qings[0].id, yes);

    let copy = Replicator::new(&mut store)
        .replicate_form(form.id, None, &mut ReplicationContext::new())
        .unwrap();

    assert_eq!(copy.name, "Health 2");
    assert_eq!(copy.standard_id, None);
    let copied = store.questionings(copy.id).unwrap();
    assert_eq!(copied[0].question_id, smokes.id);
    assert_eq!(copied[1].question_id, packs.id);
    assert!(copied.iter().all(|q| q.standard_id.is_none()));

    let condition = copied[1].condition.clone().unwrap();
    assert_eq!(condition.ref_qing_id, copied[0].id);
    assert_eq!(condition.option_id, Some(yes));
}

#[test]
fn test_cross_mission_replication_refused() {
    let mut store = MemoryStore::new();
    let kenya = mission(&mut store, "Kenya");
    let peru = mission(&mut store, "Peru");
    let (form, _) = form_with(&mut store, Some(kenya.id), "Health", &[]);

    let err = Replicator::new(&mut store)
        .replicate_form(form.id, Some(peru.id), &mut ReplicationContext::new())
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Replication(ReplicationError::CrossMission { kind: EntityKind::Form, id }) if id == form.id
    ));
    assert!(store.forms(Some(peru.id)).unwrap().is_empty());
}

#[test]
fn test_failed_replication_rolls_back_in_transaction() {
    let mut store = MemoryStore::new();
    let kenya = mission(&mut store, "Kenya");
    let peru = mission(&mut store, "Peru");
    let age = text_question(&mut store, None, "age");
    let (template, _) = form_with(&mut store, None, "Census", &[age.id]);
    let (local, _) = form_with(&mut store, Some(peru.id), "Local", &[]);

    let result = store.transaction(|tx| {
        let mut ctx = ReplicationContext::new();
        let mut replicator = Replicator::new(tx);
        replicator.replicate_form(template.id, Some(kenya.id), &mut ctx)?;
        replicator.replicate_form(local.id, Some(kenya.id), &mut ctx)
    });

    assert!(result.is_err());
    assert!(store.forms(Some(kenya.id)).unwrap().is_empty());
    assert!(store.questions(Some(kenya.id)).unwrap().is_empty());
}

#[test]
fn test_name_exhaustion_is_a_validation_error() {
    let mut store = MemoryStore::new();
    let (form, _) = form_with(&mut store, None, "Stuff", &[]);
    operations::create_form(&mut store, "Stuff 2", None).unwrap();

    let err = Replicator::new(&mut store)
        .with_max_name_attempts(1)
        .replicate_form(form.id, None, &mut ReplicationContext::new())
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn test_long_code_copy_stays_within_code_pattern() {
    let mut store = MemoryStore::new();
    let kenya = mission(&mut store, "Kenya");
    let long_code = "abcdefghijklmnopqrst";
    let standard = text_question(&mut store, None, long_code);
    text_question(&mut store, Some(kenya.id), long_code);

    let copy = Replicator::new(&mut store)
        .replicate_question(standard.id, Some(kenya.id), &mut ReplicationContext::new())
        .unwrap();

    assert_eq!(copy.code, "abcdefghijklmnopqrs2");
    let rebuilt = survey_cli::model::QuestionBuilder::new(&copy.code, survey_cli::model::QuestionType::Text)
        .title("en", "Copy")
        .build();
    assert!(rebuilt.is_ok());
}
