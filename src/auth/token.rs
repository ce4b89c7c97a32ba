use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default access token lifetime: 1440 minutes.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 1440;

/// Represents the claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the account id in canonical hyphenated form.
    pub sub: String,
    /// Email of the account at issuance.
    pub email: String,
    /// Expiration timestamp (seconds since epoch). The token is invalid from this instant on.
    pub exp: i64,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
}

impl Claims {
    /// The subject as a `Uuid`, if it is a canonical UUID string.
    pub fn subject_id(&self) -> Option<Uuid> {
        crate::auth::guard::parse_owner_id(&self.sub)
    }
}

/// Issues and verifies HS256-signed access tokens with a server-held secret.
///
/// Stateless: tokens are valid until `exp` and cannot be revoked.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    default_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, default_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            default_ttl,
        }
    }

    /// Lifetime used for tokens minted at registration and login.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issues a token for `subject_id` valid for `ttl` from now.
    pub fn issue(&self, subject_id: Uuid, email: &str, ttl: Duration) -> Result<String, AppError> {
        self.issue_at(subject_id, email, ttl, Utc::now())
    }

    pub fn issue_at(
        &self,
        subject_id: Uuid,
        email: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: subject_id.to_string(),
            email: email.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verifies signature and expiry. Every failure collapses to `None`.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Option<Claims> {
        // expiry is checked below against `now` so the boundary is exact
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) if now.timestamp() < data.claims.exp => Some(data.claims),
            Ok(data) => {
                log::debug!("Rejected expired token for subject {}", data.claims.sub);
                None
            }
            Err(e) => {
                log::debug!("Rejected token: {}", e);
                None
            }
        }
    }
}
