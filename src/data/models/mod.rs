pub mod api_models;
pub mod catalog_models;
pub mod training_models;

pub use api_models::{ApiResponse, CreateTrainingRequest};
pub use catalog_models::{MemberRole, MemberStatus, Membership, NodeType};
pub use training_models::{
    ExpressionId, ItemId, NewTraining, NewTrainingItemRow, NewTrainingRow, NodeId, PlannedItem,
    PoolEntry, Training, TrainingAnswer, TrainingExpression, TrainingId, TrainingItem,
    TrainingItemRow, TrainingMeta, TrainingRow, TrainingType, Transcription, TranscriptionTypeId,
    UserId,
};
