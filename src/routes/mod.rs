pub mod accounts;
pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

use crate::auth::{AuthMiddleware, OwnershipGuard, TokenService};
use crate::error::AppError;
use crate::rate_limit::{RateLimit, RateLimiter};
use crate::services::{AccountService, TaskService};

/// Everything the route table needs, built once and cloned into each worker.
#[derive(Clone)]
pub struct AppState {
    pub accounts: web::Data<AccountService>,
    pub tasks: web::Data<TaskService>,
    pub tokens: TokenService,
    pub limiter: RateLimiter,
}

impl AppState {
    pub fn new(
        accounts: AccountService,
        tasks: TaskService,
        tokens: TokenService,
        limiter: RateLimiter,
    ) -> Self {
        Self {
            accounts: web::Data::new(accounts),
            tasks: web::Data::new(tasks),
            tokens,
            limiter,
        }
    }
}

/// Registers the whole route table.
///
/// Owner-scoped routes run authentication, then the ownership check, then rate limiting.
/// Sign-up and sign-in only pass through the rate limiter.
pub fn configure(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        let json_config = web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into());

        cfg.app_data(state.accounts.clone())
            .app_data(state.tasks.clone())
            .app_data(json_config)
            .service(health::index)
            .service(health::health)
            .service(
                web::scope("/api")
                    // registered before the owner scope so "auth" is never read as an owner id
                    .service(
                        web::scope("/auth")
                            .wrap(RateLimit::new(state.limiter.clone()))
                            .service(auth::signup)
                            .service(auth::signin),
                    )
                    .service(
                        web::scope("/{user_id}")
                            .wrap(RateLimit::new(state.limiter.clone()))
                            .wrap(OwnershipGuard)
                            .wrap(AuthMiddleware::new(state.tokens.clone()))
                            .service(accounts::get_account)
                            .service(accounts::close_account)
                            .service(
                                web::scope("/tasks")
                                    .service(tasks::list_tasks)
                                    .service(tasks::create_task)
                                    .service(tasks::get_task)
                                    .service(tasks::update_task)
                                    .service(tasks::delete_task)
                                    .service(tasks::set_completion),
                            ),
                    ),
            );
    }
}
