//! Signed session tokens carried in the `auth_token` cookie.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::UserResult;
use crate::Role;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Account ID (admin or patient)
    pub sub: String,
    /// Which portal the account belongs to
    pub role: Role,
    /// Expiration timestamp
    pub exp: u64,
}

/// Account information extracted from a validated token
#[derive(Debug, Clone)]
pub struct AuthAccount {
    pub account_id: String,
    pub role: Role,
}

/// Issue a session token for an account
pub fn generate_token(
    account_id: String,
    role: Role,
    secret: &str,
    lifetime_seconds: u64,
) -> UserResult<String> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let claims = Claims {
        sub: account_id,
        role,
        exp: now + lifetime_seconds,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Validate and decode a session token
pub fn validate_token(token: &str, secret: &str) -> UserResult<AuthAccount> {
    let validation = Validation::default();

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;

    Ok(AuthAccount {
        account_id: token_data.claims.sub,
        role: token_data.claims.role,
    })
}
