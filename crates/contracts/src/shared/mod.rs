pub mod artifact;
pub mod attendance;
pub mod config;
pub mod upload_rules;
