pub mod catalog;
pub mod training;

pub use catalog::CatalogRepository;
pub use training::TrainingRepository;
