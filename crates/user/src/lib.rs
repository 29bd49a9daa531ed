//! Account domain: password hashing, session tokens and reset tokens for
//! both portals (nutritionist/admin and patient).

pub mod error;
pub mod jwt;
pub mod password;
pub mod reset;

pub use error::{UserError, UserResult};
pub use jwt::{generate_token, validate_token, AuthAccount, Claims};
pub use password::{hash_password, verify_password};
pub use reset::{generate_reset_token, hash_reset_token, ResetToken, RESET_TOKEN_TTL_SECONDS};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which portal an account belongs to. Admins are the nutritionist side,
/// patients the client side; the two live in separate tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Patient,
}
