use actix_web::{delete, get, web, HttpResponse, Responder};
use serde_json::json;

use crate::{
    auth::VerifiedOwner, error::AppError, models::AccountResponse, services::AccountService,
};

/// Returns the caller's own account.
#[get("")]
pub async fn get_account(
    owner: VerifiedOwner,
    accounts: web::Data<AccountService>,
) -> Result<impl Responder, AppError> {
    match accounts.find(owner.0).await? {
        Some(account) => Ok(HttpResponse::Ok().json(AccountResponse::from(&account))),
        None => Err(AppError::NotFound("Account not found".into())),
    }
}

/// Deletes the caller's account together with all of its tasks.
#[delete("")]
pub async fn close_account(
    owner: VerifiedOwner,
    accounts: web::Data<AccountService>,
) -> Result<impl Responder, AppError> {
    if !accounts.close(owner.0).await? {
        return Err(AppError::NotFound("Account not found".into()));
    }
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
