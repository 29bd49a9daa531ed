//! Nutritionist (admin) portal handlers.

pub mod allowed_items;
pub mod categories;
pub mod patients;
pub mod payments;
pub mod plans;
pub mod recipes;
pub mod settings;
