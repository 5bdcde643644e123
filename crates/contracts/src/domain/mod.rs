pub mod a001_training_session;
pub mod common;
