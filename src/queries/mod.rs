//! Read/write query functions over the SQLite schema, one module per table.

pub mod admin;
pub mod allowed_item;
pub mod category;
pub mod patient;
pub mod payment;
pub mod plan;
pub mod recipe;
pub mod reset_token;

/// Current unix timestamp in seconds, the storage format for all
/// `created_at`/`updated_at` columns.
pub fn now_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
