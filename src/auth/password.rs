use crate::error::AppError;
use bcrypt::{hash, verify};

/// bcrypt only reads this many bytes of input; anything after would be ignored.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// bcrypt password hasher with a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes `password` with a fresh random salt, so two calls never return the same string.
    ///
    /// Passwords longer than [`MAX_PASSWORD_BYTES`] are refused rather than truncated.
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::BadRequest(format!(
                "Password must be at most {} bytes long",
                MAX_PASSWORD_BYTES
            )));
        }
        hash(password, self.cost)
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
    }

    /// Returns whether `password` matches `hashed_password`.
    ///
    /// A malformed stored hash is treated as a mismatch, as is an over-long password.
    pub fn verify(&self, password: &str, hashed_password: &str) -> bool {
        if password.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        match verify(password, hashed_password) {
            Ok(matches) => matches,
            Err(e) => {
                log::debug!("Password verification failed on stored hash: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[test]
    fn test_password_hashing_and_verification() {
        let password = "test_password123";
        let hashed = hasher().hash(password).unwrap();

        assert!(hasher().verify(password, &hashed));
        assert!(!hasher().verify("wrong_password", &hashed));
        assert!(!hasher().verify("", &hashed));
    }

    #[test]
    fn test_hash_is_salted() {
        let first = hasher().hash("password123").unwrap();
        let second = hasher().hash("password123").unwrap();

        assert_ne!(first, second);
        assert_eq!(first.len(), second.len());
        assert!(hasher().verify("password123", &first));
        assert!(hasher().verify("password123", &second));
    }

    #[test]
    fn test_verify_with_invalid_hash_fails_closed() {
        assert!(!hasher().verify("test_password123", "invalidhashformat"));
        assert!(!hasher().verify("test_password123", ""));
    }

    #[test]
    fn test_invalid_cost_is_an_error() {
        assert!(matches!(
            PasswordHasher::new(2).hash("password123"),
            Err(AppError::InternalServerError(_))
        ));
    }

    #[test]
    fn test_over_long_passwords_are_refused() {
        let at_limit = "p".repeat(MAX_PASSWORD_BYTES);
        let hashed = hasher().hash(&at_limit).unwrap();
        assert!(hasher().verify(&at_limit, &hashed));

        let longer = format!("{}suffix", at_limit);
        assert!(!hasher().verify(&longer, &hashed));
        assert!(matches!(
            hasher().hash(&longer),
            Err(AppError::BadRequest(_))
        ));
    }
}
