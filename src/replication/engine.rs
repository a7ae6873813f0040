use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

use super::ReplicationContext;
use crate::error::{EntityKind, ReplicationError, Result};
use crate::model::{
    Form, FormVersion, MissionId, Named, OptionItem, OptionSet, Optioning, Question, Questioning,
    scope_label,
};
use crate::naming::{self, DEFAULT_MAX_ATTEMPTS};
use crate::store::Store;

/// How a replicate call behaves, decided from source scope and target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Sibling copy in the source's own scope; shared children are linked
    Duplicate { scope: Option<MissionId> },
    /// Standard template copied into a mission; shared children are deduplicated
    Instantiate { mission_id: MissionId },
}

fn mode_for(
    kind: EntityKind,
    id: Uuid,
    source_scope: Option<MissionId>,
    target: Option<MissionId>,
) -> Result<Mode> {
    match (source_scope, target) {
        (scope, None) => Ok(Mode::Duplicate { scope }),
        (Some(own), Some(target)) if own == target => Ok(Mode::Duplicate { scope: Some(own) }),
        (Some(_), Some(_)) => Err(ReplicationError::CrossMission { kind, id }.into()),
        (None, Some(mission_id)) => Ok(Mode::Instantiate { mission_id }),
    }
}

fn sibling_keys<N: Named>(siblings: &[N]) -> impl Iterator<Item = &str> {
    siblings.iter().map(Named::unique_key)
}

/// Deep-copies forms, questions and option sets.
///
/// Copies are written through the store as they are made; wrap calls in
/// [`Store::transaction`] to make a replication all-or-nothing.
pub struct Replicator<'a, S: Store> {
    store: &'a mut S,
    max_name_attempts: usize,
}

impl<'a, S: Store> Replicator<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self {
            store,
            max_name_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_name_attempts(mut self, max_name_attempts: usize) -> Self {
        self.max_name_attempts = max_name_attempts;
        self
    }

    // ============================================================================
    // Forms
    // ============================================================================

    /// Copy a form with its questionings.
    ///
    /// Without a target (or with the form's own mission) this duplicates the form
    /// in place. With a target, a standard form is copied into that mission.
    pub fn replicate_form(
        &mut self,
        source_id: Uuid,
        target: Option<MissionId>,
        ctx: &mut ReplicationContext,
    ) -> Result<Form> {
        let source = self.store.form(source_id)?;
        let mode = mode_for(EntityKind::Form, source.id, source.mission_id, target)?;
        if let Mode::Instantiate { mission_id } = mode {
            self.store.mission(mission_id)?;
        }

        let scope = match mode {
            Mode::Duplicate { scope } => scope,
            Mode::Instantiate { mission_id } => Some(mission_id),
        };
        let siblings = self.store.forms(scope)?;
        let name = naming::try_unique_name(&source.name, sibling_keys(&siblings), self.max_name_attempts)?;

        let now = Utc::now();
        let copy = Form {
            id: Uuid::new_v4(),
            mission_id: scope,
            name,
            published: false,
            downloads: 0,
            upgrade_needed: false,
            current_version: FormVersion::initial(),
            standard_id: match mode {
                Mode::Duplicate { .. } => None,
                Mode::Instantiate { .. } => Some(source.id),
            },
            created_at: now,
            updated_at: now,
        };
        self.store.save_form(copy.clone())?;
        ctx.record_created(EntityKind::Form);

        self.copy_questionings(&source, &copy, mode, ctx)?;

        log::info!(
            "Replicated form '{}' -> '{}' in {}",
            source.name,
            copy.name,
            scope_label(copy.mission_id)
        );
        Ok(copy)
    }

    fn copy_questionings(
        &mut self,
        source: &Form,
        copy: &Form,
        mode: Mode,
        ctx: &mut ReplicationContext,
    ) -> Result<()> {
        let originals = self.store.questionings(source.id)?;

        // Conditions point at other questionings of the same form, so every
        // copy needs an id before any condition can be remapped.
        let mut qing_map: HashMap<Uuid, Uuid> = HashMap::new();
        let mut copies = Vec::with_capacity(originals.len());
        for original in &originals {
            let question_id = match mode {
                Mode::Duplicate { .. } => original.question_id,
                Mode::Instantiate { mission_id } => self.shared_question(original.question_id, mission_id, ctx)?,
            };
            let qing = Questioning {
                id: Uuid::new_v4(),
                form_id: copy.id,
                question_id,
                standard_id: match mode {
                    Mode::Duplicate { .. } => None,
                    Mode::Instantiate { .. } => Some(original.id),
                },
                ..original.clone()
            };
            qing_map.insert(original.id, qing.id);
            copies.push(qing);
        }

        for mut qing in copies {
            if let Some(mut condition) = qing.condition.take() {
                match qing_map.get(&condition.ref_qing_id) {
                    Some(ref_copy) => {
                        condition.ref_qing_id = *ref_copy;
                        if let (Mode::Instantiate { mission_id }, Some(option_id)) = (mode, condition.option_id) {
                            condition.option_id = Some(self.shared_option(option_id, mission_id, ctx)?);
                        }
                        qing.condition = Some(condition);
                    }
                    None => log::warn!(
                        "Dropping condition on questioning {}: referenced questioning {} is not on the form",
                        qing.id,
                        condition.ref_qing_id
                    ),
                }
            }
            self.store.save_questioning(qing)?;
            ctx.record_created(EntityKind::Questioning);
        }

        log::debug!("Copied {} questionings onto form {}", originals.len(), copy.id);
        Ok(())
    }

    // ============================================================================
    // Questions
    // ============================================================================

    /// Copy a question. Duplicates link the same option set; copies into a
    /// mission bring their option set along.
    pub fn replicate_question(
        &mut self,
        source_id: Uuid,
        target: Option<MissionId>,
        ctx: &mut ReplicationContext,
    ) -> Result<Question> {
        let source = self.store.question(source_id)?;
        match mode_for(EntityKind::Question, source.id, source.mission_id, target)? {
            Mode::Duplicate { scope } => {
                let siblings = self.store.questions(scope)?;
                let code = naming::try_unique_code(&source.code, sibling_keys(&siblings), self.max_name_attempts)?;
                let copy = Question {
                    id: Uuid::new_v4(),
                    code,
                    standard_id: None,
                    ..source
                };
                self.store.save_question(copy.clone())?;
                ctx.record_created(EntityKind::Question);
                log::info!("Duplicated question as '{}' in {}", copy.code, scope_label(scope));
                Ok(copy)
            }
            Mode::Instantiate { mission_id } => {
                self.store.mission(mission_id)?;
                self.instantiate_question(&source, mission_id, ctx)
            }
        }
    }

    fn shared_question(&mut self, source_id: Uuid, mission_id: MissionId, ctx: &mut ReplicationContext) -> Result<Uuid> {
        if let Some(existing) = self.existing_copy(EntityKind::Question, source_id, mission_id, ctx)? {
            return Ok(existing);
        }
        let source = self.store.question(source_id)?;
        Ok(self.instantiate_question(&source, mission_id, ctx)?.id)
    }

    fn instantiate_question(
        &mut self,
        source: &Question,
        mission_id: MissionId,
        ctx: &mut ReplicationContext,
    ) -> Result<Question> {
        let siblings = self.store.questions(Some(mission_id))?;
        let code = naming::try_unique_code(&source.code, sibling_keys(&siblings), self.max_name_attempts)?;

        let id = Uuid::new_v4();
        ctx.register(EntityKind::Question, source.id, mission_id, id);

        let option_set_id = match source.option_set_id {
            Some(set_id) => Some(self.shared_option_set(set_id, mission_id, ctx)?),
            None => None,
        };

        let copy = Question {
            id,
            mission_id: Some(mission_id),
            code,
            qtype: source.qtype,
            name: source.name.clone(),
            option_set_id,
            standard_id: Some(source.id),
        };
        self.store.save_question(copy.clone())?;
        ctx.record_created(EntityKind::Question);
        log::debug!("Copied question '{}' into mission {} as '{}'", source.code, mission_id, copy.code);
        Ok(copy)
    }

    // ============================================================================
    // Option sets
    // ============================================================================

    /// Copy an option set with its optionings.
    ///
    /// Duplicates point at the same options. Copies into a mission reuse any
    /// option already copied through `ctx` or present in the mission.
    pub fn replicate_option_set(
        &mut self,
        source_id: Uuid,
        target: Option<MissionId>,
        ctx: &mut ReplicationContext,
    ) -> Result<OptionSet> {
        let source = self.store.option_set(source_id)?;
        match mode_for(EntityKind::OptionSet, source.id, source.mission_id, target)? {
            Mode::Duplicate { scope } => {
                let siblings = self.store.option_sets(scope)?;
                let name = naming::try_unique_name(&source.name, sibling_keys(&siblings), self.max_name_attempts)?;
                let copy = OptionSet {
                    id: Uuid::new_v4(),
                    mission_id: scope,
                    name,
                    standard_id: None,
                };
                self.store.save_option_set(copy.clone())?;
                ctx.record_created(EntityKind::OptionSet);

                for optioning in self.store.optionings(source.id)? {
                    self.store.save_optioning(Optioning::new(copy.id, optioning.option_id, optioning.rank))?;
                    ctx.record_created(EntityKind::Optioning);
                }

                log::info!("Duplicated option set '{}' as '{}'", source.name, copy.name);
                Ok(copy)
            }
            Mode::Instantiate { mission_id } => {
                self.store.mission(mission_id)?;
                self.instantiate_option_set(&source, mission_id, ctx)
            }
        }
    }

    fn shared_option_set(&mut self, source_id: Uuid, mission_id: MissionId, ctx: &mut ReplicationContext) -> Result<Uuid> {
        if let Some(existing) = self.existing_copy(EntityKind::OptionSet, source_id, mission_id, ctx)? {
            return Ok(existing);
        }
        let source = self.store.option_set(source_id)?;
        Ok(self.instantiate_option_set(&source, mission_id, ctx)?.id)
    }

    fn instantiate_option_set(
        &mut self,
        source: &OptionSet,
        mission_id: MissionId,
        ctx: &mut ReplicationContext,
    ) -> Result<OptionSet> {
        let siblings = self.store.option_sets(Some(mission_id))?;
        let name = naming::try_unique_name(&source.name, sibling_keys(&siblings), self.max_name_attempts)?;

        let copy = OptionSet {
            id: Uuid::new_v4(),
            mission_id: Some(mission_id),
            name,
            standard_id: Some(source.id),
        };
        ctx.register(EntityKind::OptionSet, source.id, mission_id, copy.id);
        self.store.save_option_set(copy.clone())?;
        ctx.record_created(EntityKind::OptionSet);

        for optioning in self.store.optionings(source.id)? {
            let option_id = self.shared_option(optioning.option_id, mission_id, ctx)?;
            self.store.save_optioning(Optioning {
                id: Uuid::new_v4(),
                option_set_id: copy.id,
                option_id,
                rank: optioning.rank,
                standard_id: Some(optioning.id),
            })?;
            ctx.record_created(EntityKind::Optioning);
        }

        log::info!("Copied option set '{}' into mission {} as '{}'", source.name, mission_id, copy.name);
        Ok(copy)
    }

    // ============================================================================
    // Options
    // ============================================================================

    fn shared_option(&mut self, source_id: Uuid, mission_id: MissionId, ctx: &mut ReplicationContext) -> Result<Uuid> {
        if let Some(existing) = self.existing_copy(EntityKind::OptionItem, source_id, mission_id, ctx)? {
            return Ok(existing);
        }

        let source = self.store.option_item(source_id)?;
        let copy = OptionItem {
            id: Uuid::new_v4(),
            mission_id: Some(mission_id),
            standard_id: Some(source.id),
            ..source
        };
        ctx.register(EntityKind::OptionItem, source_id, mission_id, copy.id);
        self.store.save_option_item(copy.clone())?;
        ctx.record_created(EntityKind::OptionItem);
        Ok(copy.id)
    }

    /// Copy already made through `ctx`, or already present in the mission
    fn existing_copy(
        &self,
        kind: EntityKind,
        source_id: Uuid,
        mission_id: MissionId,
        ctx: &mut ReplicationContext,
    ) -> Result<Option<Uuid>> {
        if let Some(copy) = ctx.copy_of(kind, source_id, mission_id) {
            log::debug!("Reusing {} copy {} of {}", kind, copy, source_id);
            return Ok(Some(copy));
        }

        let found = self.store.find_copy(kind, source_id, mission_id)?;
        if let Some(copy) = found {
            log::debug!("Linking existing {} copy {} of {} in mission {}", kind, copy, source_id, mission_id);
            ctx.register(kind, source_id, mission_id, copy);
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selection() {
        let id = Uuid::new_v4();
        let (m1, m2) = (Uuid::new_v4(), Uuid::new_v4());

        assert_eq!(mode_for(EntityKind::Form, id, None, None).unwrap(), Mode::Duplicate { scope: None });
        assert_eq!(
            mode_for(EntityKind::Form, id, Some(m1), None).unwrap(),
            Mode::Duplicate { scope: Some(m1) }
        );
        assert_eq!(
            mode_for(EntityKind::Form, id, Some(m1), Some(m1)).unwrap(),
            Mode::Duplicate { scope: Some(m1) }
        );
        assert_eq!(
            mode_for(EntityKind::Form, id, None, Some(m2)).unwrap(),
            Mode::Instantiate { mission_id: m2 }
        );
        assert!(mode_for(EntityKind::Form, id, Some(m1), Some(m2)).is_err());
    }
}
