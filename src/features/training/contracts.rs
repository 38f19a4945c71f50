//! Contracts the training engine needs from the rest of the system.
//!
//! The engine only ever talks to these traits. SQLite implementations live in
//! `data::repositories`, in-memory ones in the test fakes.

use crate::data::models::{
    ExpressionId, ItemId, Membership, NewTraining, NodeId, PoolEntry, Training, TrainingAnswer,
    TrainingId, TrainingItem, TrainingType, TranscriptionTypeId, UserId,
};

use super::error::Result;

/// Group membership lookup backing the permission gate.
pub trait MembershipSource: Send + Sync {
    /// Membership of `user_id` in the group that contains `node_id`, if any.
    fn membership(&self, user_id: UserId, node_id: NodeId) -> Result<Option<Membership>>;
}

/// Read access to the vocabulary catalog.
pub trait VocabularySource: Send + Sync {
    /// Keeps only ids of existing slices. Output is sorted and deduplicated.
    fn resolve_scope(&self, raw_ids: &[NodeId]) -> Result<Vec<NodeId>>;

    /// Deduplicated expressions attached to the given slices, ordered by id.
    fn pool(&self, scope: &[NodeId]) -> Result<Vec<PoolEntry>>;

    /// Translations of `expression_id` recorded in the given slices.
    ///
    /// With a `transcription_type`, only transcriptions of that type are
    /// attached; the answers themselves are not filtered.
    fn translations_for(
        &self,
        expression_id: ExpressionId,
        scope: &[NodeId],
        transcription_type: Option<TranscriptionTypeId>,
    ) -> Result<Vec<TrainingAnswer>>;
}

/// Storage of trainings and their items.
///
/// Every read that returns a `Training` attaches meta computed from the
/// current item rows.
pub trait TrainingRegistry: Send + Sync {
    /// Exact match on owner, type, canonical scope and transcription type.
    fn find_existing(
        &self,
        owner_id: UserId,
        kind: TrainingType,
        scope: &[NodeId],
        transcription_type: Option<TranscriptionTypeId>,
    ) -> Result<Option<Training>>;

    /// Writes the training and all of its items atomically.
    fn persist(&self, training: NewTraining) -> Result<Training>;

    fn get(&self, training_id: TrainingId) -> Result<Training>;

    fn get_by_item(&self, item_id: ItemId) -> Result<Training>;

    /// Trainings owned by `owner_id`, newest first.
    fn list(&self, owner_id: UserId) -> Result<Vec<Training>>;

    /// A single item with its expression attached.
    fn item(&self, item_id: ItemId) -> Result<TrainingItem>;

    /// All items not yet completed, with their expressions attached.
    fn incomplete_items(&self, training_id: TrainingId) -> Result<Vec<TrainingItem>>;

    /// Clears the completion flag of every item of the training.
    fn reset(&self, training_id: TrainingId) -> Result<()>;

    /// Idempotent.
    fn mark_complete(&self, item_id: ItemId) -> Result<()>;
}
