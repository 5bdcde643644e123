pub mod details;

pub use details::TrainingSessionDetail;
