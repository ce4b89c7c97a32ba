use crate::{
    auth::{AuthResponse, LoginRequest, RegisterRequest},
    error::AppError,
    models::AccountResponse,
    services::AccountService,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new account
///
/// Creates the account and returns it with an access token.
///
/// ## Responses:
/// - `200 OK`: `{ "user": ..., "token": ... }`.
/// - `400 Bad Request`: the email is already registered or the password is too short.
/// - `422 Unprocessable Entity`: the payload is malformed.
#[post("/signup")]
pub async fn signup(
    accounts: web::Data<AccountService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let (account, token) = accounts
        .register(&register_data.email, &register_data.password)
        .await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        user: AccountResponse::from(&account),
        token,
    }))
}

/// Sign in
///
/// An unknown email and a wrong password produce the same `401` response.
#[post("/signin")]
pub async fn signin(
    accounts: web::Data<AccountService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    match accounts
        .login(&login_data.email, &login_data.password)
        .await?
    {
        Some((account, token)) => Ok(HttpResponse::Ok().json(AuthResponse {
            user: AccountResponse::from(&account),
            token,
        })),
        None => Err(AppError::Unauthorized("Invalid credentials".into())),
    }
}
