pub mod model;
mod page;
mod roster;
mod view_model;

pub use page::TrainingSessionDetail;
