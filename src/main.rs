use std::process;
use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, App, HttpServer};
use sqlx::postgres::PgPoolOptions;

use tasklist::auth::{PasswordHasher, TokenService};
use tasklist::config::Config;
use tasklist::rate_limit::{RateLimitPolicy, RateLimiter};
use tasklist::routes::{self, AppState};
use tasklist::services::{AccountService, TaskService};
use tasklist::store::PgStore;

const BUCKET_PURGE_INTERVAL: Duration = Duration::from_secs(300);

fn cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    let pool = match PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            process::exit(1);
        }
    };

    let store = Arc::new(PgStore::new(pool));
    if let Err(e) = store.ensure_schema().await {
        log::error!("Failed to prepare database schema: {}", e);
        process::exit(1);
    }

    let tokens = TokenService::new(
        &config.jwt_secret,
        chrono::Duration::minutes(config.token_ttl_minutes),
    );
    let limiter = RateLimiter::new(RateLimitPolicy::per_minute(config.rate_limit_per_minute));
    let state = AppState::new(
        AccountService::new(
            store.clone(),
            PasswordHasher::new(config.bcrypt_cost),
            tokens.clone(),
        ),
        TaskService::new(store),
        tokens,
        limiter.clone(),
    );

    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(BUCKET_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = limiter.purge_idle(BUCKET_PURGE_INTERVAL);
            if purged > 0 {
                log::debug!("Purged {} idle rate-limit buckets", purged);
            }
        }
    });

    let frontend_urls = config.frontend_urls.clone();
    log::info!("Starting server at {}", config.server_url());

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&frontend_urls))
            .wrap(Logger::default())
            .configure(routes::configure(state.clone()))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
