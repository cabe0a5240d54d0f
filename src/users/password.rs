use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::error;

pub fn hash_password(plain: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            e
        })?
        .to_string();
    Ok(hash)
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash cannot be parsed.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, password_hash::Error> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        e
    })?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

lazy_static! {
    static ref DUMMY_HASH: String =
        hash_password("timing-equalizer-not-a-real-password").unwrap_or_default();
}

/// Computes the dummy hash up front so the first unknown-email request
/// does not pay for hashing as well as verifying.
pub fn warm_dummy_hash() -> bool {
    lazy_static::initialize(&DUMMY_HASH);
    if DUMMY_HASH.is_empty() {
        error!("dummy hash unavailable; unknown-email timing is not equalized");
        return false;
    }
    true
}

/// Burns one verification against a throwaway hash so an unknown email
/// costs the same as a wrong password.
pub fn verify_against_dummy(plain: &str) {
    let _ = verify_password(plain, &DUMMY_HASH);
}
