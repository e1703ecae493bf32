//! Argon2id password hashing, verification, and strength validation.
//!
//! All password hashes use the Argon2id variant (version 0x13) with a
//! cryptographically random salt generated via [`OsRng`]. The PHC string
//! format is used for storage so that algorithm parameters and salt are
//! embedded in the hash itself; verification always honours the parameters
//! recorded in the stored hash.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

/// Memory cost in KiB (64 MiB).
pub const MEMORY_COST_KIB: u32 = 65_536;
/// Number of passes.
pub const TIME_COST: u32 = 3;
/// Degree of parallelism.
pub const PARALLELISM: u32 = 1;

/// Minimum password length enforced when provisioning accounts.
pub const MIN_PASSWORD_LENGTH: usize = 12;

/// Plaintext used to build the dummy hash for missing accounts.
const DUMMY_PASSWORD: &str = "atlas-dummy-password-for-timing";

/// Argon2id hasher with fixed cost parameters for new hashes.
pub struct PasswordHasher {
    params: Params,
    dummy_hash: OnceLock<String>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
            .expect("recommended Argon2 parameters are valid");
        Self {
            params,
            dummy_hash: OnceLock::new(),
        }
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .field("p_cost", &self.params.p_cost())
            .finish()
    }
}

impl PasswordHasher {
    /// Build a hasher with explicit cost parameters.
    pub fn with_params(
        memory_kib: u32,
        time_cost: u32,
        parallelism: u32,
    ) -> Result<Self, argon2::Error> {
        Ok(Self {
            params: Params::new(memory_kib, time_cost, parallelism, None)?,
            dummy_hash: OnceLock::new(),
        })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// Returns the PHC-formatted hash string (includes algorithm, params, salt, and hash).
    pub fn hash(&self, password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon2().hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// Verify a plaintext candidate against a stored PHC-formatted hash.
    ///
    /// Returns `Ok(true)` on a match and `Ok(false)` on a mismatch. A stored
    /// hash that cannot be parsed is an `Err`, not a mismatch.
    pub fn verify(
        &self,
        stored_hash: &str,
        candidate: &str,
    ) -> Result<bool, argon2::password_hash::Error> {
        let parsed_hash = PasswordHash::new(stored_hash)?;
        match self.argon2().verify_password(candidate.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Run one verification against a throwaway hash.
    ///
    /// Used when no account matched so that the response takes as long as a
    /// wrong-password attempt. The result is always ignored.
    pub fn verify_dummy(&self, candidate: &str) {
        let dummy = self.dummy_hash.get_or_init(|| {
            self.hash(DUMMY_PASSWORD).unwrap_or_else(|e| {
                tracing::error!(error = %e, "Failed to build dummy password hash");
                String::new()
            })
        });
        if !dummy.is_empty() {
            let _ = self.verify(dummy, candidate);
        }
    }
}

/// Validate that a password meets minimum strength requirements.
///
/// Currently enforces a minimum character length. Returns `Ok(())` when the
/// password is acceptable, or `Err` with a human-readable explanation.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_hasher() -> PasswordHasher {
        PasswordHasher::with_params(1024, 1, 1).expect("cheap params are valid")
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("correct-horse-battery-staple").expect("hashing should succeed");

        assert!(hash.starts_with("$argon2id$v=19$"), "expected argon2id v19 PHC prefix");

        let verified = hasher
            .verify(&hash, "correct-horse-battery-staple")
            .expect("verify should succeed");
        assert!(verified, "correct password should verify as true");
    }

    #[test]
    fn test_wrong_password_fails() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("real-password").expect("hashing should succeed");
        let verified = hasher.verify(&hash, "wrong-password").expect("verify should succeed");
        assert!(!verified, "wrong password should verify as false");
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let hasher = cheap_hasher();
        let a = hasher.hash("same-password").unwrap();
        let b = hasher.hash("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_uses_params_from_stored_hash() {
        let stored = PasswordHasher::with_params(2048, 2, 1)
            .unwrap()
            .hash("rotated-params")
            .unwrap();
        assert!(stored.contains("m=2048,t=2,p=1"));

        // A hasher configured differently still verifies the older hash.
        assert!(cheap_hasher().verify(&stored, "rotated-params").unwrap());
    }

    #[test]
    fn test_default_uses_recommended_params() {
        let debug = format!("{:?}", PasswordHasher::default());
        assert!(debug.contains("65536"));
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(cheap_hasher().verify("not-a-phc-string", "anything").is_err());
    }

    #[test]
    fn test_verify_dummy_does_not_panic() {
        let hasher = cheap_hasher();
        hasher.verify_dummy("whatever");
        hasher.verify_dummy("again");
        assert!(hasher.dummy_hash.get().is_some());
    }

    #[test]
    fn test_password_too_short() {
        let result = validate_password_strength("short", MIN_PASSWORD_LENGTH);
        let msg = result.unwrap_err();
        assert!(
            msg.contains("at least 12 characters"),
            "error message should state the minimum length"
        );
    }

    #[test]
    fn test_password_meets_minimum() {
        assert!(validate_password_strength("twelve_chars", 12).is_ok());
        assert!(validate_password_strength("this-is-a-long-enough-password", 12).is_ok());
    }
}
