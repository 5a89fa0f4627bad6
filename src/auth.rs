//! Password hashing and API token exchange.

use crate::error::{AppError, FieldErrors, NON_FIELD_ERRORS};
use crate::models::{self, Token, User};
use crate::service::Gateway;
use argon2::{
    password_hash::{rand_core::OsRng, Error, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::RngCore;
use serde_json::{Map, Value};

pub fn hash_password(pw: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default().hash_password(pw.as_bytes(), &salt)?.to_string())
}

/// False for a wrong password and for a stored value that is not a PHC hash string.
pub fn verify_password(hash: &str, pw: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(pw.as_bytes(), &parsed_hash)
        .is_ok()
}

/// 40 lowercase hex characters from 20 random bytes.
pub fn generate_key() -> String {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Check a username/password pair against active users.
pub async fn authenticate(gateway: &Gateway, username: &str, password: &str) -> Result<Option<User>, AppError> {
    let Some(record) = gateway
        .find_one(models::user::NAME, "username", &Value::from(username))
        .await?
    else {
        return Ok(None);
    };
    let user: User = models::from_record(&record)?;
    if user.is_active && verify_password(&user.password, password) {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

/// Exchange credentials for the user's token, creating it on first use.
pub async fn obtain_token(gateway: &Gateway, username: &str, password: &str) -> Result<String, AppError> {
    let mut errors = FieldErrors::new();
    if username.is_empty() {
        errors.add("username", crate::serializer::REQUIRED);
    }
    if password.is_empty() {
        errors.add("password", crate::serializer::REQUIRED);
    }
    errors.into_result()?;

    let user = authenticate(gateway, username, password).await?.ok_or_else(|| {
        AppError::field(NON_FIELD_ERRORS, "Unable to log in with provided credentials.")
    })?;

    if let Some(existing) = gateway
        .find_one(models::token::NAME, "user", &Value::from(user.id))
        .await?
    {
        let token: Token = models::from_record(&existing)?;
        return Ok(token.key);
    }

    let mut fields = Map::new();
    fields.insert("key".into(), Value::String(generate_key()));
    fields.insert("user".into(), Value::from(user.id));
    let created = gateway.create(models::token::NAME, fields).await?;
    let token: Token = models::from_record(&created)?;
    tracing::info!(user = user.id, "issued api token");
    Ok(token.key)
}

/// Resolve a token key to its user. `None` for unknown keys.
pub async fn user_for_token(gateway: &Gateway, key: &str) -> Result<Option<User>, AppError> {
    let Some(record) = gateway
        .find_one(models::token::NAME, "key", &Value::from(key))
        .await?
    else {
        return Ok(None);
    };
    let token: Token = models::from_record(&record)?;
    match gateway.get(models::user::NAME, token.user).await {
        Ok(user) => Ok(Some(models::from_record(&user)?)),
        Err(AppError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
