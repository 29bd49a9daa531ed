use jsonwebtoken::{encode, EncodingKey, Header};
use nutriplan_user::{generate_token, validate_token, Claims, Role, UserError};
use std::time::{SystemTime, UNIX_EPOCH};

const SECRET: &str = "test_secret_key_minimum_32_characters_long";

#[test]
fn test_token_round_trip() {
    let token = generate_token("patient-1".to_string(), Role::Patient, SECRET, 3600)
        .expect("Failed to generate token");

    let account = validate_token(&token, SECRET).expect("Failed to validate token");
    assert_eq!(account.account_id, "patient-1");
    assert_eq!(account.role, Role::Patient);
}

#[test]
fn test_admin_role_survives_round_trip() {
    let token = generate_token("admin-1".to_string(), Role::Admin, SECRET, 3600).unwrap();
    let account = validate_token(&token, SECRET).unwrap();
    assert_eq!(account.role, Role::Admin);
}

#[test]
fn test_wrong_secret_is_rejected() {
    let token = generate_token("patient-1".to_string(), Role::Patient, SECRET, 3600).unwrap();

    let result = validate_token(&token, "another_secret_that_is_also_32_chars!");
    assert!(matches!(result, Err(UserError::InvalidToken)));
}

#[test]
fn test_expired_token_is_rejected() {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();

    // Well past the validator's default 60s leeway.
    let claims = Claims {
        sub: "patient-1".to_string(),
        role: Role::Patient,
        exp: now - 600,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let result = validate_token(&token, SECRET);
    assert!(matches!(result, Err(UserError::InvalidToken)));
}

#[test]
fn test_tampered_token_is_rejected() {
    let token = generate_token("patient-1".to_string(), Role::Patient, SECRET, 3600).unwrap();

    let mut tampered = token;
    tampered.push('x');
    assert!(validate_token(&tampered, SECRET).is_err());
}
