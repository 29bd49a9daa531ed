//! Patient portal handlers.

pub mod plans;
pub mod profile;
pub mod recipes;
