use axum_extra::extract::cookie::Key;
use deadpool_diesel::postgres::{Manager, Pool};
use openidconnect::{ClientId, ClientSecret, IssuerUrl};
use time::Duration;
use url::Url;

use crate::RedisConn;

#[derive(Clone, Debug)]
pub struct Config {
	pub production: bool,

	pub database_url: String,
	pub redis_url:    String,

	pub frontend_url: Url,
	pub backend_url:  Url,

	pub access_token_name:     String,
	pub access_token_lifetime: Duration,
}

/// OpenID Connect provider credentials
#[derive(Clone, Debug)]
pub struct SsoConfig {
	pub issuer_url:    IssuerUrl,
	pub client_id:     ClientId,
	pub client_secret: ClientSecret,
}

impl Config {
	fn get_env_var(var: &str) -> String {
		std::env::var(var).unwrap_or_else(|_| panic!("{var} must be set"))
	}

	/// Create a new [`Config`] from environment variables
	///
	/// # Panics
	/// Panics if an environment variable is missing or malformed
	#[must_use]
	pub fn from_env() -> Self {
		let production =
			std::env::var("PRODUCTION").is_ok_and(|v| v == "true");

		let database_url = Self::get_env_var("DATABASE_URL");
		let redis_url = Self::get_env_var("REDIS_URL");

		let frontend_url =
			Url::parse(&Self::get_env_var("FRONTEND_URL")).unwrap();
		let backend_url = Url::parse(&Self::get_env_var("BACKEND_URL")).unwrap();

		let access_token_name = Self::get_env_var("ACCESS_TOKEN_NAME");
		let access_token_lifetime = Duration::minutes(
			Self::get_env_var("ACCESS_TOKEN_LIFETIME_MINUTES")
				.parse::<i64>()
				.unwrap(),
		);

		Self {
			production,
			database_url,
			redis_url,
			frontend_url,
			backend_url,
			access_token_name,
			access_token_lifetime,
		}
	}

	/// Create a database pool for the given config
	///
	/// # Panics
	/// Panics if creating the pool fails
	#[must_use]
	pub fn create_database_pool(&self) -> Pool {
		let manager = Manager::new(
			self.database_url.to_string(),
			deadpool_diesel::Runtime::Tokio1,
		);

		Pool::builder(manager).build().unwrap()
	}

	/// Connect to the redis session store
	///
	/// # Panics
	/// Panics if the connection cannot be established
	pub async fn create_redis_connection(&self) -> RedisConn {
		let client = redis::Client::open(self.redis_url.as_str()).unwrap();

		client.get_multiplexed_async_connection().await.unwrap()
	}

	/// Derive the private cookie jar key from the `COOKIE_JAR_SECRET`
	/// environment variable
	///
	/// # Panics
	/// Panics if the secret is missing or shorter than 32 bytes
	#[must_use]
	pub fn create_cookie_jar_key(&self) -> Key {
		let secret = Self::get_env_var("COOKIE_JAR_SECRET");

		Key::derive_from(secret.as_bytes())
	}
}

impl SsoConfig {
	/// Create a new [`SsoConfig`] from environment variables
	///
	/// # Panics
	/// Panics if an environment variable is missing or malformed
	#[must_use]
	pub fn from_env() -> Self {
		let issuer_url =
			IssuerUrl::new(Config::get_env_var("OIDC_ISSUER_URL")).unwrap();
		let client_id = ClientId::new(Config::get_env_var("OIDC_CLIENT_ID"));
		let client_secret =
			ClientSecret::new(Config::get_env_var("OIDC_CLIENT_SECRET"));

		Self { issuer_url, client_id, client_secret }
	}
}
