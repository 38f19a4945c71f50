pub mod contracts;
pub mod error;
pub mod error_responses;
pub mod interactor;
pub mod permission;
pub mod plan;
pub mod progress;

#[cfg(test)]
pub(crate) mod testing;

pub use contracts::{MembershipSource, TrainingRegistry, VocabularySource};
pub use error::{Result, TrainingError};
pub use interactor::TrainingInteractor;
pub use permission::PermissionGate;
pub use plan::{CyclesPlan, DirectPlan, MIN_CHUNK_SIZE, PlanStrategy};
pub use progress::ProgressTracker;
