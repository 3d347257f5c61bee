//! Admin authorization for mutating operations
//!
//! Replaces the ambient "admin mode" session flag with an explicit
//! capability: every mutating service call takes an `&AdminToken`,
//! and the only way to obtain one is `authorize`, which verifies the
//! passphrase against the Argon2 hash stored in settings.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};

/// Proof of admin authorization for the current session
///
/// The field is private, so a token cannot be constructed outside
/// this module.
#[derive(Debug)]
pub struct AdminToken(());

#[cfg(test)]
impl AdminToken {
    /// Construct a token directly in unit tests
    pub(crate) fn for_tests() -> Self {
        Self(())
    }
}

/// Hash a passphrase and store it in the settings
pub fn set_passphrase(settings: &mut Settings, passphrase: &str) -> LedgerResult<()> {
    if passphrase.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Admin passphrase may not be empty".into(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| LedgerError::Config(format!("Failed to hash passphrase: {}", e)))?;

    settings.admin_passphrase_hash = Some(hash.to_string());
    Ok(())
}

/// Verify a passphrase and mint an admin token
pub fn authorize(settings: &Settings, passphrase: &str) -> LedgerResult<AdminToken> {
    let stored = settings.admin_passphrase_hash.as_deref().ok_or_else(|| {
        LedgerError::Unauthorized("no admin passphrase is set; run `hearth init` first".into())
    })?;

    let parsed = PasswordHash::new(stored)
        .map_err(|e| LedgerError::Config(format!("Stored passphrase hash is invalid: {}", e)))?;

    Argon2::default()
        .verify_password(passphrase.as_bytes(), &parsed)
        .map_err(|_| LedgerError::Unauthorized("incorrect admin passphrase".into()))?;

    Ok(AdminToken(()))
}
