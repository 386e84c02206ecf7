//! # Garagebook backend library

#[macro_use]
extern crate tracing;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

mod config;
mod sanitize;
mod session;

pub mod controllers;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod schema;
pub mod schemas;

pub use config::{Config, SsoConfig};
pub use error::{CsrfError, Error, InternalServerError, OAuthError};
pub use sanitize::strip_markup;
pub use session::{Session, SessionData};

pub type DbPool = deadpool_diesel::postgres::Pool;
pub type DbConn = deadpool_diesel::postgres::Object;
pub type RedisConn = redis::aio::MultiplexedConnection;

/// Common state of the app
#[derive(Clone)]
pub struct AppState {
	pub config:           Config,
	pub sso_config:       SsoConfig,
	pub database_pool:    DbPool,
	pub redis_connection: RedisConn,
	pub cookie_jar_key:   Key,
}

impl FromRef<AppState> for Config {
	fn from_ref(input: &AppState) -> Self { input.config.clone() }
}

impl FromRef<AppState> for SsoConfig {
	fn from_ref(input: &AppState) -> Self { input.sso_config.clone() }
}

impl FromRef<AppState> for DbPool {
	fn from_ref(input: &AppState) -> Self { input.database_pool.clone() }
}

impl FromRef<AppState> for RedisConn {
	fn from_ref(input: &AppState) -> Self { input.redis_connection.clone() }
}

impl FromRef<AppState> for Key {
	fn from_ref(input: &AppState) -> Self { input.cookie_jar_key.clone() }
}
