#![doc = "The `tasklist` library crate."]
#![doc = ""]
#![doc = "Accounts, bearer-token authentication and per-owner task lists behind an actix-web"]
#![doc = "route table. The binary (`main.rs`) wires these pieces to PostgreSQL and serves them."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod rate_limit;
pub mod routes;
pub mod services;
pub mod store;

pub use crate::error::AppError;
