pub mod auth;
pub mod role;

pub use auth::{auth_middleware, Auth};
pub use role::{require_admin, require_patient};
