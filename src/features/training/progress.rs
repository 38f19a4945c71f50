use std::sync::{Arc, Mutex};

use rand::RngCore;
use rand::seq::SliceRandom;

use crate::data::models::{ItemId, Training, TrainingAnswer, TrainingId, TrainingItem};

use super::contracts::{TrainingRegistry, VocabularySource};
use super::error::{Result, TrainingError};

/// Serves items of a training and records answers.
pub struct ProgressTracker {
    registry: Arc<dyn TrainingRegistry>,
    vocabulary: Arc<dyn VocabularySource>,
}

impl ProgressTracker {
    pub fn new(registry: Arc<dyn TrainingRegistry>, vocabulary: Arc<dyn VocabularySource>) -> Self {
        Self {
            registry,
            vocabulary,
        }
    }

    /// Random incomplete item from the lowest incomplete cycle.
    ///
    /// The rng is shared by every caller, so it is only locked for the pick
    /// and never across storage reads.
    pub fn next_item<R: RngCore>(
        &self,
        training_id: TrainingId,
        rng: &Mutex<R>,
    ) -> Result<TrainingItem> {
        let pending = self.registry.incomplete_items(training_id)?;

        let mut rng = rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        select_next(&pending, &mut *rng)
            .cloned()
            .ok_or(TrainingError::NotFound("incomplete training item"))
    }

    /// Acceptable answers for the item, limited to the training's scope.
    pub fn item_answers(
        &self,
        training: &Training,
        item_id: ItemId,
    ) -> Result<Vec<TrainingAnswer>> {
        let item = self.registry.item(item_id)?;
        if item.training_id != training.id {
            return Err(TrainingError::NotFound("training item"));
        }

        self.vocabulary.translations_for(
            item.expression_id,
            &training.scope,
            training.transcription_type,
        )
    }

    pub fn mark_complete(&self, item_id: ItemId) -> Result<()> {
        self.registry.mark_complete(item_id)
    }
}

/// Cycles are exhausted in increasing order across the whole training; the
/// pick inside the lowest cycle is uniform.
pub fn select_next<'a>(
    items: &'a [TrainingItem],
    rng: &mut dyn RngCore,
) -> Option<&'a TrainingItem> {
    let lowest = items
        .iter()
        .filter(|item| !item.complete)
        .map(|item| item.cycle)
        .min()?;

    let candidates: Vec<&TrainingItem> = items
        .iter()
        .filter(|item| !item.complete && item.cycle == lowest)
        .collect();

    candidates.choose(rng).copied()
}
