use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::token::Claims;
use crate::error::AppError;

/// The claims of the authenticated caller, placed in request extensions by `AuthMiddleware`.
///
/// If the claims are missing the route was mounted without authentication, and the
/// request is rejected as unauthenticated.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>().cloned() {
            Some(claims) => ready(Ok(AuthenticatedUser(claims))),
            None => {
                let err = AppError::Unauthorized("Could not validate credentials".to_string());
                ready(Err(err.into()))
            }
        }
    }
}

/// An owner id that `OwnershipGuard` has matched against the caller's token.
///
/// Handlers that touch owner-scoped data take this instead of reading the path, so they
/// cannot be reached with an unverified owner. Missing means forbidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedOwner(pub Uuid);

impl FromRequest for VerifiedOwner {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<VerifiedOwner>().copied() {
            Some(owner) => ready(Ok(owner)),
            None => {
                let err = AppError::Forbidden("Access denied".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
