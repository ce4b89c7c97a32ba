use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::auth::extractors::VerifiedOwner;
use crate::auth::guard::{parse_owner_id, verify_ownership};
use crate::auth::token::{Claims, TokenService};
use crate::error::AppError;

/// Name of the path segment that carries the owner id, e.g. `/api/{user_id}/tasks`.
pub const OWNER_PATH_PARAM: &str = "user_id";

const INVALID_CREDENTIALS: &str = "Could not validate credentials";

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Ends the chain with the error rendered as a response, so outer middleware
/// (access log, CORS) still sees a normal response.
pub(crate) fn reject<B>(
    req: ServiceRequest,
    app_err: AppError,
) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>>
where
    B: 'static,
{
    let response = req.error_response(app_err).map_into_right_body();
    Box::pin(async move { Ok(response) })
}

/// Authentication interceptor: verifies the bearer token and stores its `Claims`
/// in the request extensions. Missing and invalid tokens are rejected identically.
pub struct AuthMiddleware {
    tokens: Rc<TokenService>,
}

impl AuthMiddleware {
    pub fn new(tokens: TokenService) -> Self {
        Self {
            tokens: Rc::new(tokens),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    tokens: Rc<TokenService>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let claims = bearer_token(&req).and_then(|token| self.tokens.verify(token));

        match claims {
            Some(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            None => {
                log::warn!(
                    target: "security",
                    "Authentication failed for {} {}",
                    req.method(),
                    req.path()
                );
                reject(req, AppError::Unauthorized(INVALID_CREDENTIALS.into()))
            }
        }
    }
}

/// Ownership interceptor: must run after [`AuthMiddleware`]. Compares the token subject
/// with the `{user_id}` path segment and, on success, stores a [`VerifiedOwner`].
/// On failure the request never reaches a handler.
pub struct OwnershipGuard;

impl<S, B> Transform<S, ServiceRequest> for OwnershipGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = OwnershipGuardService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(OwnershipGuardService { service }))
    }
}

pub struct OwnershipGuardService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for OwnershipGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let decision: Result<_, AppError> = {
            let extensions = req.extensions();
            let path_owner = req.match_info().get(OWNER_PATH_PARAM).unwrap_or_default();
            let decision = match extensions.get::<Claims>() {
                None => Err(AppError::Unauthorized(INVALID_CREDENTIALS.into())),
                Some(claims) if verify_ownership(path_owner, claims) => parse_owner_id(path_owner)
                    .ok_or_else(|| AppError::Forbidden("Access denied".into())),
                Some(claims) => {
                    log::warn!(
                        target: "security",
                        "Ownership denied: subject {} addressed owner {:?} on {} {}",
                        claims.sub,
                        path_owner,
                        req.method(),
                        req.path()
                    );
                    Err(AppError::Forbidden(
                        "Access denied: cannot access another user's resources".into(),
                    ))
                }
            };
            decision
        };

        match decision {
            Ok(owner_id) => {
                req.extensions_mut().insert(VerifiedOwner(owner_id));
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(app_err) => reject(req, app_err),
        }
    }
}
