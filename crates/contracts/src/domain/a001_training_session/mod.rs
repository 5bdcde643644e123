pub mod aggregate;
pub mod documents;
pub mod draft;
pub mod grading;
pub mod readiness;
pub mod submission;

pub use aggregate::*;
pub use draft::FinalizationDraft;
pub use readiness::{BlockingReason, Readiness, ReviewRole};
