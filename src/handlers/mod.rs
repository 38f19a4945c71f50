pub mod training;

pub use training::training_router;
