pub mod a001_training_session;
