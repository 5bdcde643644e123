//! Shared contracts between the training console frontend and the HR API.
//!
//! Everything here is pure data and rules: no I/O, no browser types.

pub mod domain;
pub mod shared;
pub mod system;
