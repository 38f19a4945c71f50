//! In-memory implementations of the training contracts for unit tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use chrono::NaiveDateTime;
use diesel::result::Error as DieselError;

use crate::data::models::{
    ExpressionId, ItemId, MemberRole, MemberStatus, Membership, NewTraining, NodeId, PoolEntry,
    Training, TrainingAnswer, TrainingExpression, TrainingId, TrainingItem, TrainingMeta,
    TrainingType, Transcription, TranscriptionTypeId, UserId,
};

use super::contracts::{MembershipSource, TrainingRegistry, VocabularySource};
use super::error::{Result, TrainingError};

#[derive(Default)]
pub struct FakeMemberships {
    entries: HashMap<(UserId, NodeId), Membership>,
    failing: bool,
}

impl FakeMemberships {
    pub fn with(
        mut self,
        user_id: UserId,
        node_id: NodeId,
        role: MemberRole,
        status: MemberStatus,
    ) -> Self {
        self.entries.insert((user_id, node_id), Membership { role, status });
        self
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }
}

impl MembershipSource for FakeMemberships {
    fn membership(&self, user_id: UserId, node_id: NodeId) -> Result<Option<Membership>> {
        if self.failing {
            return Err(TrainingError::DatabaseError(DieselError::BrokenTransactionManager));
        }
        Ok(self.entries.get(&(user_id, node_id)).copied())
    }
}

struct FakeAnswer {
    node_id: NodeId,
    answer: TrainingAnswer,
}

#[derive(Default)]
pub struct FakeVocabulary {
    slices: BTreeMap<NodeId, Vec<ExpressionId>>,
    folders: Vec<NodeId>,
    answers: HashMap<ExpressionId, Vec<FakeAnswer>>,
}

impl FakeVocabulary {
    pub fn with_slice(mut self, node_id: NodeId, expressions: Vec<ExpressionId>) -> Self {
        self.slices.insert(node_id, expressions);
        self
    }

    pub fn with_folder(mut self, node_id: NodeId) -> Self {
        self.folders.push(node_id);
        self
    }

    pub fn with_answer(
        mut self,
        expression_id: ExpressionId,
        node_id: NodeId,
        target_id: ExpressionId,
        value: &str,
    ) -> Self {
        self.answers.entry(expression_id).or_default().push(FakeAnswer {
            node_id,
            answer: TrainingAnswer {
                id: target_id,
                value: value.to_string(),
                transcriptions: Vec::new(),
            },
        });
        self
    }

    /// Attaches a transcription to every recorded answer with `target_id`.
    pub fn with_transcription(
        mut self,
        target_id: ExpressionId,
        id: i32,
        kind: TranscriptionTypeId,
        value: &str,
    ) -> Self {
        for answer in self.answers.values_mut().flatten() {
            if answer.answer.id == target_id {
                answer.answer.transcriptions.push(Transcription {
                    id,
                    kind,
                    value: value.to_string(),
                });
            }
        }
        self
    }
}

impl VocabularySource for FakeVocabulary {
    fn resolve_scope(&self, raw_ids: &[NodeId]) -> Result<Vec<NodeId>> {
        let mut scope: Vec<_> = raw_ids
            .iter()
            .copied()
            .filter(|id| self.slices.contains_key(id))
            .collect();
        scope.sort_unstable();
        scope.dedup();
        Ok(scope)
    }

    fn pool(&self, scope: &[NodeId]) -> Result<Vec<PoolEntry>> {
        let mut ids: Vec<ExpressionId> = scope
            .iter()
            .filter_map(|node| self.slices.get(node))
            .flatten()
            .copied()
            .collect();
        ids.sort_unstable();
        ids.dedup();

        Ok(ids
            .into_iter()
            .map(|id| PoolEntry {
                id,
                value: format!("expression-{id}"),
            })
            .collect())
    }

    fn translations_for(
        &self,
        expression_id: ExpressionId,
        scope: &[NodeId],
        transcription_type: Option<TranscriptionTypeId>,
    ) -> Result<Vec<TrainingAnswer>> {
        Ok(self
            .answers
            .get(&expression_id)
            .into_iter()
            .flatten()
            .filter(|a| scope.contains(&a.node_id))
            .map(|a| {
                let mut answer = a.answer.clone();
                if let Some(kind) = transcription_type {
                    answer.transcriptions.retain(|t| t.kind == kind);
                }
                answer
            })
            .collect())
    }
}

struct StoredTraining {
    owner_id: UserId,
    kind: TrainingType,
    scope: Vec<NodeId>,
    transcription_type: Option<TranscriptionTypeId>,
    items: Vec<TrainingItem>,
}

#[derive(Default)]
struct RegistryState {
    trainings: BTreeMap<TrainingId, StoredTraining>,
    next_item_id: ItemId,
    persist_calls: usize,
}

type Hook = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
pub struct FakeRegistry {
    state: Mutex<RegistryState>,
    incomplete_items_hook: Option<Hook>,
}

impl FakeRegistry {
    /// Runs `hook` at the start of every `incomplete_items` call.
    pub fn on_incomplete_items(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.incomplete_items_hook = Some(Box::new(hook));
        self
    }

    pub fn persist_calls(&self) -> usize {
        self.state.lock().unwrap().persist_calls
    }

    pub fn item_count(&self, training_id: TrainingId) -> usize {
        self.state.lock().unwrap().trainings[&training_id].items.len()
    }

    pub fn lowest_incomplete_cycle(&self, training_id: TrainingId) -> Option<u32> {
        self.state.lock().unwrap().trainings[&training_id]
            .items
            .iter()
            .filter(|i| !i.complete)
            .map(|i| i.cycle)
            .min()
    }
}

fn to_training(id: TrainingId, stored: &StoredTraining) -> Training {
    Training {
        id,
        owner_id: stored.owner_id,
        kind: stored.kind,
        scope: stored.scope.clone(),
        transcription_type: stored.transcription_type,
        meta: TrainingMeta::from_items(&stored.items),
        created_at: NaiveDateTime::default(),
    }
}

fn with_expression(item: &TrainingItem) -> TrainingItem {
    TrainingItem {
        expression: Some(TrainingExpression {
            id: item.expression_id,
            value: format!("expression-{}", item.expression_id),
        }),
        ..item.clone()
    }
}

impl TrainingRegistry for FakeRegistry {
    fn find_existing(
        &self,
        owner_id: UserId,
        kind: TrainingType,
        scope: &[NodeId],
        transcription_type: Option<TranscriptionTypeId>,
    ) -> Result<Option<Training>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .trainings
            .iter()
            .find(|(_, t)| {
                t.owner_id == owner_id
                    && t.kind == kind
                    && t.scope == scope
                    && t.transcription_type == transcription_type
            })
            .map(|(id, t)| to_training(*id, t)))
    }

    fn persist(&self, training: NewTraining) -> Result<Training> {
        let mut state = self.state.lock().unwrap();
        state.persist_calls += 1;

        let id = state.trainings.len() as TrainingId + 1;
        let mut items = Vec::with_capacity(training.items.len());
        for planned in training.items {
            state.next_item_id += 1;
            items.push(TrainingItem {
                id: state.next_item_id,
                training_id: id,
                expression_id: planned.expression_id,
                stage: planned.stage,
                cycle: planned.cycle,
                complete: false,
                expression: None,
            });
        }

        let stored = StoredTraining {
            owner_id: training.owner_id,
            kind: training.kind,
            scope: training.scope,
            transcription_type: training.transcription_type,
            items,
        };
        let result = to_training(id, &stored);
        state.trainings.insert(id, stored);
        Ok(result)
    }

    fn get(&self, training_id: TrainingId) -> Result<Training> {
        let state = self.state.lock().unwrap();
        state
            .trainings
            .get(&training_id)
            .map(|t| to_training(training_id, t))
            .ok_or(TrainingError::NotFound("training"))
    }

    fn get_by_item(&self, item_id: ItemId) -> Result<Training> {
        let state = self.state.lock().unwrap();
        state
            .trainings
            .iter()
            .find(|(_, t)| t.items.iter().any(|i| i.id == item_id))
            .map(|(id, t)| to_training(*id, t))
            .ok_or(TrainingError::NotFound("training"))
    }

    fn list(&self, owner_id: UserId) -> Result<Vec<Training>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .trainings
            .iter()
            .rev()
            .filter(|(_, t)| t.owner_id == owner_id)
            .map(|(id, t)| to_training(*id, t))
            .collect())
    }

    fn item(&self, item_id: ItemId) -> Result<TrainingItem> {
        let state = self.state.lock().unwrap();
        state
            .trainings
            .values()
            .flat_map(|t| t.items.iter())
            .find(|i| i.id == item_id)
            .map(with_expression)
            .ok_or(TrainingError::NotFound("training item"))
    }

    fn incomplete_items(&self, training_id: TrainingId) -> Result<Vec<TrainingItem>> {
        if let Some(hook) = &self.incomplete_items_hook {
            hook();
        }
        let state = self.state.lock().unwrap();
        let training = state
            .trainings
            .get(&training_id)
            .ok_or(TrainingError::NotFound("training"))?;
        Ok(training
            .items
            .iter()
            .filter(|i| !i.complete)
            .map(with_expression)
            .collect())
    }

    fn reset(&self, training_id: TrainingId) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let training = state
            .trainings
            .get_mut(&training_id)
            .ok_or(TrainingError::NotFound("training"))?;
        training.items.iter_mut().for_each(|i| i.complete = false);
        Ok(())
    }

    fn mark_complete(&self, item_id: ItemId) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let item = state
            .trainings
            .values_mut()
            .flat_map(|t| t.items.iter_mut())
            .find(|i| i.id == item_id)
            .ok_or(TrainingError::NotFound("training item"))?;
        item.complete = true;
        Ok(())
    }
}
