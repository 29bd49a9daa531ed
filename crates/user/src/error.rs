use thiserror::Error;

pub type UserResult<T> = Result<T, UserError>;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Password hashing error: {0}")]
    HashingError(String),

    #[error("Invalid or expired session token")]
    InvalidToken,

    #[error("Token error: {0}")]
    TokenError(String),
}

impl From<jsonwebtoken::errors::Error> for UserError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature | ErrorKind::InvalidToken | ErrorKind::InvalidSignature => {
                UserError::InvalidToken
            }
            _ => UserError::TokenError(err.to_string()),
        }
    }
}
