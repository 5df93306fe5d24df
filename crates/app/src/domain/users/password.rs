//! Password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};

use crate::domain::users::errors::UsersServiceError;

/// Hash a plaintext password into a PHC string.
pub(crate) fn hash_password(password: &str) -> Result<String, UsersServiceError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|error| UsersServiceError::PasswordHash(error.to_string()))
}

#[cfg(test)]
mod tests {
    use argon2::{PasswordHash, PasswordVerifier};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn hash_verifies_against_the_original_password() -> TestResult {
        let hash = hash_password("correct horse")?;
        let parsed = PasswordHash::new(&hash)?;

        assert!(Argon2::default().verify_password(b"correct horse", &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"wrong", &parsed).is_err());

        Ok(())
    }

    #[test]
    fn hashes_are_salted() -> TestResult {
        assert_ne!(hash_password("secret")?, hash_password("secret")?);

        Ok(())
    }
}
