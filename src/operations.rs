//! Structural edits and lifecycle transitions
//!
//! Every function runs inside [`Store::transaction`]: it either applies fully
//! or leaves the store as it was.

use uuid::Uuid;

use crate::error::{DeletionError, EntityKind, Result, ValidationError};
use crate::guard::{UsageQuery, UsageTarget, guard_delete, guard_option_set_edit};
use crate::model::{
    Condition, Form, FormBuilder, Mission, MissionBuilder, MissionId, Named, OptionItem, OptionSet,
    OptionSetBuilder, Optioning, Question, Questioning, scope_label,
};
use crate::ranking::{RankFix, Ranked, fix_ranks};
use crate::store::Store;

fn ensure_mission<S: Store>(store: &S, mission_id: Option<MissionId>) -> Result<()> {
    if let Some(id) = mission_id {
        store.mission(id)?;
    }
    Ok(())
}

fn ensure_name_free<N: Named>(kind: EntityKind, name: &str, siblings: &[N]) -> Result<()> {
    if siblings.iter().any(|s| s.unique_key() == name) {
        return Err(ValidationError::NameTaken { kind, name: name.to_string() }.into());
    }
    Ok(())
}

fn ensure_editable(form: &Form) -> Result<()> {
    if form.published {
        return Err(ValidationError::FormPublished { form_id: form.id }.into());
    }
    Ok(())
}

/// Downloaded forms need a new version once their structure changes
fn mark_structure_changed<S: Store>(store: &mut S, mut form: Form) -> Result<()> {
    if form.downloads > 0 && !form.upgrade_needed {
        log::info!("Form '{}' was downloaded {} time(s), flagging for upgrade", form.name, form.downloads);
        form.upgrade_needed = true;
    }
    form.touch();
    store.save_form(form)?;
    Ok(())
}

// ============================================================================
// Creation
// ============================================================================

pub fn create_mission<S: Store>(store: &mut S, name: &str) -> Result<Mission> {
    let mission = MissionBuilder::new(name).build()?;
    store.transaction(|tx| {
        let existing = tx.missions()?;
        if existing.iter().any(|m| m.name == mission.name) {
            return Err(ValidationError::NameTaken { kind: EntityKind::Mission, name: mission.name.clone() }.into());
        }
        tx.save_mission(mission.clone())?;
        log::info!("Created mission '{}' ({})", mission.name, mission.id);
        Ok(mission)
    })
}

pub fn create_form<S: Store>(store: &mut S, name: &str, mission_id: Option<MissionId>) -> Result<Form> {
    let form = FormBuilder::new(name).mission(mission_id).build()?;
    store.transaction(|tx| {
        ensure_mission(tx, mission_id)?;
        ensure_name_free(EntityKind::Form, &form.name, &tx.forms(mission_id)?)?;
        tx.save_form(form.clone())?;
        log::info!("Created form '{}' in {}", form.name, scope_label(mission_id));
        Ok(form)
    })
}

/// Save a built option. The option's scope must exist.
pub fn create_option_item<S: Store>(store: &mut S, option: OptionItem) -> Result<OptionItem> {
    store.transaction(|tx| {
        ensure_mission(tx, option.mission_id)?;
        tx.save_option_item(option.clone())?;
        Ok(option)
    })
}

/// Create an option set over existing options, ranked in the given order
pub fn create_option_set<S: Store>(
    store: &mut S,
    name: &str,
    mission_id: Option<MissionId>,
    option_ids: &[Uuid],
) -> Result<(OptionSet, Vec<Optioning>)> {
    let (set, optionings) = OptionSetBuilder::new(name)
        .mission(mission_id)
        .options(option_ids.iter().copied())
        .build()?;

    store.transaction(|tx| {
        ensure_mission(tx, mission_id)?;
        ensure_name_free(EntityKind::OptionSet, &set.name, &tx.option_sets(mission_id)?)?;
        for option_id in option_ids {
            let option = tx.option_item(*option_id)?;
            if option.mission_id != mission_id {
                return Err(ValidationError::ScopeMismatch { kind: EntityKind::OptionItem, id: option.id }.into());
            }
        }

        tx.save_option_set(set.clone())?;
        for optioning in &optionings {
            tx.save_optioning(optioning.clone())?;
        }
        log::info!("Created option set '{}' with {} options", set.name, optionings.len());
        Ok((set, optionings))
    })
}

/// Save a built question after checking its code and option set
pub fn create_question<S: Store>(store: &mut S, question: Question) -> Result<Question> {
    store.transaction(|tx| {
        ensure_mission(tx, question.mission_id)?;
        ensure_name_free(EntityKind::Question, &question.code, &tx.questions(question.mission_id)?)?;
        if let Some(set_id) = question.option_set_id {
            let set = tx.option_set(set_id)?;
            if set.mission_id != question.mission_id {
                return Err(ValidationError::ScopeMismatch { kind: EntityKind::OptionSet, id: set.id }.into());
            }
        }
        tx.save_question(question.clone())?;
        log::info!("Created question '{}' in {}", question.code, scope_label(question.mission_id));
        Ok(question)
    })
}

// ============================================================================
// Questionings
// ============================================================================

/// Append a question to the end of a form
pub fn add_questioning<S: Store>(store: &mut S, form_id: Uuid, question_id: Uuid) -> Result<Questioning> {
    store.transaction(|tx| {
        let form = tx.form(form_id)?;
        ensure_editable(&form)?;

        let question = tx.question(question_id)?;
        if question.mission_id != form.mission_id {
            return Err(ValidationError::ScopeMismatch { kind: EntityKind::Question, id: question.id }.into());
        }

        let next_rank = tx.questionings(form_id)?.len() as u32 + 1;
        let qing = Questioning::new(form_id, question_id, Some(next_rank));
        tx.save_questioning(qing.clone())?;
        mark_structure_changed(tx, form)?;
        log::debug!("Added question '{}' to form {} at rank {}", question.code, form_id, next_rank);
        Ok(qing)
    })
}

/// Attach (or clear) a display condition. The referenced questioning must be
/// on the same form.
pub fn set_condition<S: Store>(store: &mut S, qing_id: Uuid, condition: Option<Condition>) -> Result<Questioning> {
    store.transaction(|tx| {
        let mut qing = tx.questioning(qing_id)?;
        ensure_editable(&tx.form(qing.form_id)?)?;

        if let Some(condition) = &condition {
            let referenced = tx.questioning(condition.ref_qing_id)?;
            if referenced.form_id != qing.form_id || referenced.id == qing.id {
                return Err(ValidationError::ScopeMismatch { kind: EntityKind::Questioning, id: referenced.id }.into());
            }
        }

        qing.condition = condition;
        tx.save_questioning(qing.clone())?;
        Ok(qing)
    })
}

/// Remove a questioning that has no answers, then close the rank gap
pub fn remove_questioning<S: Store + UsageQuery>(store: &mut S, qing_id: Uuid) -> Result<Vec<Questioning>> {
    store.transaction(|tx| detach_questioning(tx, qing_id))
}

fn detach_questioning<S: Store + UsageQuery>(tx: &mut S, qing_id: Uuid) -> Result<Vec<Questioning>> {
    let qing = tx.questioning(qing_id)?;
    let form = tx.form(qing.form_id)?;
    ensure_editable(&form)?;
    guard_delete(UsageTarget::Questioning(qing_id), &*tx)?;

    tx.delete_questioning(qing_id)?;

    let mut remaining = tx.questionings(form.id)?;
    for dependent in remaining.iter_mut().filter(|q| q.depends_on(qing_id)) {
        log::info!("Clearing condition on questioning {} after removing {}", dependent.id, qing_id);
        dependent.condition = None;
        tx.save_questioning(dependent.clone())?;
    }

    let fixed = fix_questioning_ranks(tx, form.id, remaining, RankFix { reload: false, persist: true })?;
    mark_structure_changed(tx, form)?;
    Ok(fixed)
}

/// Delete a question that has no answers, taking it off every form that
/// places it. Refused while any of those forms is published.
pub fn delete_question<S: Store + UsageQuery>(store: &mut S, question_id: Uuid) -> Result<()> {
    store.transaction(|tx| {
        let question = tx.question(question_id)?;
        guard_delete(UsageTarget::Question(question_id), &*tx)?;

        for qing in tx.questionings_for_question(question_id)? {
            detach_questioning(tx, qing.id)?;
        }
        tx.delete_question(question_id)?;
        log::info!("Deleted question '{}'", question.code);
        Ok(())
    })
}

/// Move a questioning to 1-based `position`, shifting the others
pub fn move_questioning<S: Store>(store: &mut S, qing_id: Uuid, position: u32) -> Result<Vec<Questioning>> {
    store.transaction(|tx| {
        let qing = tx.questioning(qing_id)?;
        let form = tx.form(qing.form_id)?;
        ensure_editable(&form)?;

        let mut siblings: Vec<Questioning> = tx.questionings(form.id)?.into_iter().filter(|q| q.id != qing_id).collect();
        let index = (position.max(1) as usize - 1).min(siblings.len());
        siblings.insert(index, qing);
        for (i, item) in siblings.iter_mut().enumerate() {
            item.set_rank(i as u32 + 1);
        }

        let fixed = fix_questioning_ranks(tx, form.id, siblings, RankFix { reload: false, persist: true })?;
        mark_structure_changed(tx, form)?;
        Ok(fixed)
    })
}

/// Re-sequence a form's questionings to ranks 1..N
pub fn fix_questioning_ranks<S: Store>(
    store: &mut S,
    form_id: Uuid,
    items: Vec<Questioning>,
    opts: RankFix,
) -> Result<Vec<Questioning>> {
    let items = if opts.reload { store.questionings(form_id)? } else { items };
    let before: Vec<(Uuid, Option<u32>)> = items.iter().map(|q| (q.id, q.rank)).collect();
    let fixed = fix_ranks(items);

    if opts.persist {
        for qing in fixed.iter().filter(|q| !before.contains(&(q.id, q.rank))) {
            store.save_questioning(qing.clone())?;
        }
    }
    log::debug!("Fixed ranks for {} questionings on form {}", fixed.len(), form_id);
    Ok(fixed)
}

// ============================================================================
// Option sets
// ============================================================================

/// Drop display conditions that test for `option_id`. With `option_set_id`,
/// only conditions on questions answered from that set are dropped.
fn clear_option_conditions<S: Store>(tx: &mut S, option_id: Uuid, option_set_id: Option<Uuid>) -> Result<()> {
    for mut qing in tx.conditioned_on_option(option_id)? {
        if let (Some(set_id), Some(condition)) = (option_set_id, &qing.condition) {
            let referenced = tx.questioning(condition.ref_qing_id)?;
            if tx.question(referenced.question_id)?.option_set_id != Some(set_id) {
                continue;
            }
        }
        log::info!("Clearing condition on questioning {} that tested option {}", qing.id, option_id);
        qing.condition = None;
        tx.save_questioning(qing)?;
    }
    Ok(())
}

/// Remove optionings from a set. The set keeps at least one option and
/// optionings with answers are refused.
pub fn remove_optionings<S: Store + UsageQuery>(
    store: &mut S,
    option_set_id: Uuid,
    optioning_ids: &[Uuid],
) -> Result<Vec<Optioning>> {
    let mut unique: Vec<Uuid> = Vec::with_capacity(optioning_ids.len());
    for id in optioning_ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }

    store.transaction(|tx| {
        tx.option_set(option_set_id)?;
        let current = tx.optionings(option_set_id)?;
        if let Some(stray) = unique.iter().find(|id| !current.iter().any(|o| o.id == **id)) {
            return Err(ValidationError::ScopeMismatch { kind: EntityKind::Optioning, id: *stray }.into());
        }
        guard_option_set_edit(option_set_id, &current, &unique, &*tx)?;

        for optioning in current.iter().filter(|o| unique.contains(&o.id)) {
            tx.delete_optioning(optioning.id)?;
            clear_option_conditions(tx, optioning.option_id, Some(option_set_id))?;
        }
        log::info!("Removed {} option(s) from option set {}", unique.len(), option_set_id);

        let remaining = tx.optionings(option_set_id)?;
        fix_optioning_ranks(tx, option_set_id, remaining, RankFix { reload: false, persist: true })
    })
}

/// Re-sequence a set's optionings to ranks 1..N
pub fn fix_optioning_ranks<S: Store>(
    store: &mut S,
    option_set_id: Uuid,
    items: Vec<Optioning>,
    opts: RankFix,
) -> Result<Vec<Optioning>> {
    let items = if opts.reload { store.optionings(option_set_id)? } else { items };
    let before: Vec<(Uuid, Option<u32>)> = items.iter().map(|o| (o.id, o.rank)).collect();
    let fixed = fix_ranks(items);

    if opts.persist {
        for optioning in fixed.iter().filter(|o| !before.contains(&(o.id, o.rank))) {
            store.save_optioning(optioning.clone())?;
        }
    }
    Ok(fixed)
}

/// Delete an option everywhere it is used. Refused while answers choose it or
/// when it is the last option of any set.
pub fn delete_option_item<S: Store + UsageQuery>(store: &mut S, option_id: Uuid) -> Result<()> {
    store.transaction(|tx| {
        tx.option_item(option_id)?;
        guard_delete(UsageTarget::OptionItem(option_id), &*tx)?;

        for optioning in tx.optionings_for_option(option_id)? {
            let set_id = optioning.option_set_id;
            if tx.optionings(set_id)?.len() <= 1 {
                return Err(DeletionError::EmptyNotAllowed { option_set_id: set_id }.into());
            }
            tx.delete_optioning(optioning.id)?;
            fix_optioning_ranks(tx, set_id, Vec::new(), RankFix::default())?;
        }

        clear_option_conditions(tx, option_id, None)?;
        tx.delete_option_item(option_id)?;
        log::info!("Deleted option {}", option_id);
        Ok(())
    })
}

// ============================================================================
// Form lifecycle
// ============================================================================

/// Delete a form that has no responses, along with its questionings
pub fn delete_form<S: Store + UsageQuery>(store: &mut S, form_id: Uuid) -> Result<()> {
    store.transaction(|tx| {
        let form = tx.form(form_id)?;
        guard_delete(UsageTarget::Form(form_id), &*tx)?;
        tx.delete_form(form_id)?;
        log::info!("Deleted form '{}'", form.name);
        Ok(())
    })
}

/// Publish a form, first upgrading its version if its structure changed
/// since it was last downloaded
pub fn publish_form<S: Store>(store: &mut S, form_id: Uuid) -> Result<Form> {
    store.transaction(|tx| {
        let mut form = tx.form(form_id)?;
        if form.published {
            return Ok(form);
        }
        if form.upgrade_needed {
            form.upgrade_version();
            log::info!("Upgraded form '{}' to version {}", form.name, form.current_version.sequence);
        }
        form.published = true;
        form.touch();
        tx.save_form(form.clone())?;
        log::info!("Published form '{}'", form.name);
        Ok(form)
    })
}

pub fn unpublish_form<S: Store>(store: &mut S, form_id: Uuid) -> Result<Form> {
    store.transaction(|tx| {
        let mut form = tx.form(form_id)?;
        form.published = false;
        form.touch();
        tx.save_form(form.clone())?;
        log::info!("Unpublished form '{}'", form.name);
        Ok(form)
    })
}

/// Count a download by a data-collection client; only published forms can be downloaded
pub fn record_download<S: Store>(store: &mut S, form_id: Uuid) -> Result<Form> {
    store.transaction(|tx| {
        let mut form = tx.form(form_id)?;
        if !form.published {
            return Err(ValidationError::FormNotPublished { form_id }.into());
        }
        form.downloads += 1;
        tx.save_form(form.clone())?;
        Ok(form)
    })
}
