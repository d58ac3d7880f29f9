//! Password hashing: bcrypt by default, argon2id as an alternative.

use std::str::FromStr;

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Argon2,
};
use bcrypt::BcryptError;
use tracing::warn;

use crate::config::MIN_BCRYPT_COST;
use crate::error::{AppError, AppResult};

pub const DEFAULT_BCRYPT_COST: u32 = 14;

/// bcrypt only reads this many bytes of input; longer passwords are refused.
pub const BCRYPT_MAX_PASSWORD_BYTES: usize = 72;

const ARGON2_PREFIX: &str = "$argon2";

/// Algorithm used for newly created hashes. Verification accepts either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordAlgorithm {
    Bcrypt,
    Argon2,
}

impl FromStr for PasswordAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bcrypt" => Ok(Self::Bcrypt),
            "argon2" | "argon2id" => Ok(Self::Argon2),
            _ => Err(s.to_string()),
        }
    }
}

/// Salted adaptive password hashing.
///
/// Both hashes embed their salt and work parameters, so `verify` needs only
/// the stored string. Digest comparison is constant time in both crates.
/// Hashing is CPU bound; async callers should run it on a blocking thread.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    algorithm: PasswordAlgorithm,
    bcrypt_cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            algorithm: PasswordAlgorithm::Bcrypt,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl PasswordHasher {
    pub fn new(algorithm: PasswordAlgorithm, bcrypt_cost: u32) -> AppResult<Self> {
        if bcrypt_cost < MIN_BCRYPT_COST {
            return Err(AppError::Config(format!(
                "bcrypt cost {} is below the minimum of {}",
                bcrypt_cost, MIN_BCRYPT_COST
            )));
        }
        Ok(Self {
            algorithm,
            bcrypt_cost,
        })
    }

    pub fn bcrypt(cost: u32) -> AppResult<Self> {
        Self::new(PasswordAlgorithm::Bcrypt, cost)
    }

    pub fn algorithm(&self) -> PasswordAlgorithm {
        self.algorithm
    }

    /// Hash `plaintext` with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> AppResult<String> {
        match self.algorithm {
            PasswordAlgorithm::Bcrypt => {
                bcrypt::non_truncating_hash(plaintext, self.bcrypt_cost).map_err(|e| match e {
                    BcryptError::Truncation(_) => AppError::Validation(format!(
                        "password must be at most {} bytes",
                        BCRYPT_MAX_PASSWORD_BYTES
                    )),
                    other => AppError::Hashing(format!("bcrypt: {}", other)),
                })
            }
            PasswordAlgorithm::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                let hash = Argon2::default()
                    .hash_password(plaintext.as_bytes(), &salt)
                    .map_err(|e| AppError::Hashing(format!("argon2: {}", e)))?
                    .to_string();
                Ok(hash)
            }
        }
    }

    /// True iff `plaintext` matches `hashed`. A mismatch or an unreadable
    /// stored hash is `false`, never an error.
    pub fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        if hashed.starts_with(ARGON2_PREFIX) {
            return match PasswordHash::new(hashed) {
                Ok(parsed) => Argon2::default()
                    .verify_password(plaintext.as_bytes(), &parsed)
                    .is_ok(),
                Err(e) => {
                    warn!(error = %e, "stored argon2 hash is unreadable");
                    false
                }
            };
        }
        match bcrypt::non_truncating_verify(plaintext, hashed) {
            Ok(matched) => matched,
            // No accepted password can exceed the limit, so nothing matches.
            Err(BcryptError::Truncation(_)) => false,
            Err(e) => {
                warn!(error = %e, "stored bcrypt hash is unreadable");
                false
            }
        }
    }
}
