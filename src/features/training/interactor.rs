use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::data::models::{
    ItemId, NewTraining, NodeId, Training, TrainingAnswer, TrainingId, TrainingItem, TrainingType,
    TranscriptionTypeId, UserId,
};

use super::contracts::{MembershipSource, TrainingRegistry, VocabularySource};
use super::error::{Result, TrainingError};
use super::permission::PermissionGate;
use super::progress::ProgressTracker;

/// Entry point for every training use case.
///
/// Owner-scoped operations always reload the training and compare its owner
/// with the caller before doing anything else.
pub struct TrainingInteractor {
    registry: Arc<dyn TrainingRegistry>,
    vocabulary: Arc<dyn VocabularySource>,
    gate: PermissionGate,
    tracker: ProgressTracker,
    rng: Mutex<StdRng>,
}

impl TrainingInteractor {
    pub fn new(
        registry: Arc<dyn TrainingRegistry>,
        vocabulary: Arc<dyn VocabularySource>,
        memberships: Arc<dyn MembershipSource>,
    ) -> Self {
        Self::with_rng(registry, vocabulary, memberships, StdRng::from_entropy())
    }

    pub fn with_rng(
        registry: Arc<dyn TrainingRegistry>,
        vocabulary: Arc<dyn VocabularySource>,
        memberships: Arc<dyn MembershipSource>,
        rng: StdRng,
    ) -> Self {
        Self {
            tracker: ProgressTracker::new(registry.clone(), vocabulary.clone()),
            gate: PermissionGate::new(memberships),
            registry,
            vocabulary,
            rng: Mutex::new(rng),
        }
    }

    /// Returns the caller's existing training for the same type, scope and
    /// transcription type, or builds and stores a new one.
    pub fn create(
        &self,
        owner_id: UserId,
        kind: TrainingType,
        raw_scope: &[NodeId],
        transcription_type: Option<TranscriptionTypeId>,
    ) -> Result<Training> {
        let requested = canonical_scope(raw_scope);
        if requested.is_empty() {
            return Err(TrainingError::InvalidRequest(
                "there must be at least one node".into(),
            ));
        }

        let scope = self.vocabulary.resolve_scope(&requested)?;
        if scope.is_empty() {
            return Err(TrainingError::InvalidRequest(
                "none of the requested nodes is a slice".into(),
            ));
        }

        if !self.gate.authorize(owner_id, &scope)? {
            log::warn!(
                "User {} denied training over nodes {:?}",
                owner_id,
                scope
            );
            return Err(TrainingError::Forbidden(
                "at least read access to every node is required",
            ));
        }

        if let Some(existing) = self
            .registry
            .find_existing(owner_id, kind, &scope, transcription_type)?
        {
            log::info!(
                "Reusing training {} for user {} ({:?}, {} nodes)",
                existing.id,
                owner_id,
                kind,
                scope.len()
            );
            return Ok(existing);
        }

        let pool = self.vocabulary.pool(&scope)?;
        if pool.is_empty() {
            return Err(TrainingError::InvalidRequest(
                "the selected nodes contain no expressions".into(),
            ));
        }

        let items = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            kind.strategy().plan(&pool, &mut *rng)
        };

        let training = self.registry.persist(NewTraining {
            owner_id,
            kind,
            scope,
            transcription_type,
            items,
        })?;

        log::info!(
            "Built training {} for user {} ({:?}): {} expressions, {} stages",
            training.id,
            owner_id,
            kind,
            training.meta.unique_item_count,
            training.meta.stage_count
        );

        Ok(training)
    }

    pub fn get(&self, actor_id: UserId, training_id: TrainingId) -> Result<Training> {
        let training = self.registry.get(training_id)?;
        ensure_owner(&training, actor_id)?;
        Ok(training)
    }

    pub fn list(&self, actor_id: UserId) -> Result<Vec<Training>> {
        self.registry.list(actor_id)
    }

    pub fn reset(&self, actor_id: UserId, training_id: TrainingId) -> Result<()> {
        let training = self.registry.get(training_id)?;
        ensure_owner(&training, actor_id)?;

        self.registry.reset(training_id)?;
        log::debug!("Training {} reset by user {}", training_id, actor_id);
        Ok(())
    }

    pub fn next(&self, actor_id: UserId, training_id: TrainingId) -> Result<TrainingItem> {
        let training = self.registry.get(training_id)?;
        ensure_owner(&training, actor_id)?;

        self.tracker.next_item(training.id, &self.rng)
    }

    pub fn item(&self, actor_id: UserId, item_id: ItemId) -> Result<TrainingItem> {
        let training = self.registry.get_by_item(item_id)?;
        ensure_owner(&training, actor_id)?;

        self.registry.item(item_id)
    }

    pub fn item_answers(&self, actor_id: UserId, item_id: ItemId) -> Result<Vec<TrainingAnswer>> {
        let training = self.registry.get_by_item(item_id)?;
        ensure_owner(&training, actor_id)?;

        self.tracker.item_answers(&training, item_id)
    }

    pub fn mark_complete(&self, actor_id: UserId, item_id: ItemId) -> Result<()> {
        let training = self.registry.get_by_item(item_id)?;
        ensure_owner(&training, actor_id)?;

        self.tracker.mark_complete(item_id)?;
        log::debug!("Item {} of training {} completed", item_id, training.id);
        Ok(())
    }
}

fn ensure_owner(training: &Training, actor_id: UserId) -> Result<()> {
    if training.owner_id != actor_id {
        log::warn!(
            "User {} tried to access training {} owned by {}",
            actor_id,
            training.id,
            training.owner_id
        );
        return Err(TrainingError::not_owner());
    }
    Ok(())
}

/// Sorted and deduplicated, so scopes compare as sets.
pub fn canonical_scope(raw: &[NodeId]) -> Vec<NodeId> {
    let mut scope = raw.to_vec();
    scope.sort_unstable();
    scope.dedup();
    scope
}
