pub mod extractors;
pub mod guard;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::AccountResponse;

// Re-export necessary items
pub use extractors::{AuthenticatedUser, VerifiedOwner};
pub use guard::verify_ownership;
pub use middleware::{AuthMiddleware, OwnershipGuard};
pub use password::PasswordHasher;
pub use token::{Claims, TokenService};

/// Represents the payload for a sign-in request.
///
/// The email format is not checked: a malformed email simply matches no account and
/// fails like any other bad credential.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(max = 255))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Represents the payload for a sign-up request.
///
/// Password strength is not checked here: the account service reports a short password
/// as `WeakPassword`, after the duplicate-email check.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    pub password: String,
}

/// Response structure after successful sign-up or sign-in.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The authenticated account.
    pub user: AccountResponse,
    /// The access token to send as `Authorization: Bearer <token>`.
    pub token: String,
}
