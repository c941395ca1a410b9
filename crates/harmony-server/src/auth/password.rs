use std::sync::LazyLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against an Argon2id hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Like [`verify_password`], but a stored hash that cannot be parsed counts as
/// a mismatch.
pub fn password_matches(password: &str, hash: &str) -> bool {
    match verify_password(password, hash) {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!("stored password hash is unreadable: {e}");
            false
        }
    }
}

static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("harmony-timing-equaliser").ok());

/// Spend one verification's worth of time when no account matched, so login
/// latency does not reveal which emails are registered.
pub fn burn_verification() {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password("not-the-password", hash);
    }
}
