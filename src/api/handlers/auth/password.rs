//! Password hashing using Argon2id.
//!
//! Hashes are salted PHC strings; verification re-derives and compares, it
//! never decrypts. A malformed stored hash is a verifier failure, not a
//! mismatch, and the two must stay distinguishable for the login flow.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Outcome of comparing a candidate password against a stored hash.
#[derive(Debug, PartialEq, Eq)]
pub enum VerifyOutcome {
    Match,
    Mismatch,
}

/// Hash a password with a fresh random salt.
///
/// # Errors
/// Returns an error if the hasher itself fails; never because of the
/// password's content.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a candidate password against a stored PHC hash string.
///
/// # Errors
/// Returns an error when the stored hash is malformed or the verifier
/// fails; a plain wrong password is `Ok(VerifyOutcome::Mismatch)`.
pub fn verify_password(
    password: &str,
    hash: &str,
) -> Result<VerifyOutcome, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(VerifyOutcome::Match),
        Err(argon2::password_hash::Error::Password) => Ok(VerifyOutcome::Mismatch),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let password = "CorrectHorseBatteryStaple1";
        let hash = hash_password(password).expect("hashing should succeed");

        assert_ne!(hash, password);
        assert_eq!(verify_password(password, &hash), Ok(VerifyOutcome::Match));
        assert_eq!(
            verify_password("WrongPassword1", &hash),
            Ok(VerifyOutcome::Mismatch)
        );
    }

    #[test]
    fn same_password_hashes_differently() {
        let password = "CorrectHorseBatteryStaple1";
        let first = hash_password(password).expect("hashing should succeed");
        let second = hash_password(password).expect("hashing should succeed");
        // Fresh salt per hash
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_is_an_error_not_a_mismatch() {
        let result = verify_password("whatever", "not-a-phc-string");
        assert!(result.is_err());
    }
}
