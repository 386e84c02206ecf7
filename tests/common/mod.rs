use axum::http::StatusCode;
use axum_extra::extract::cookie::Key;
use axum_test::TestServer;
use garagebook::schemas::auth::CsrfTokenResponse;
use garagebook::{AppState, Config, SsoConfig, routes};
use openidconnect::{ClientId, ClientSecret, IssuerUrl};
use time::Duration;
use url::Url;

mod mock_db;
mod mock_redis;

use mock_db::{DATABASE_PROVIDER, DatabaseGuard};
use mock_redis::{RedisUrlGuard, RedisUrlProvider};

#[allow(dead_code)]
pub struct TestEnv {
	pub app:         TestServer,
	pub db_guard:    DatabaseGuard,
	pub redis_guard: RedisUrlGuard,
}

impl TestEnv {
	/// Get a test environment with throwaway resources for running tests
	///
	/// # Panics
	/// Panics if building the test server fails
	pub async fn new() -> Self {
		let config = test_config();
		let sso_config = test_sso_config();

		let test_pool_guard = (*DATABASE_PROVIDER).acquire().await;
		let test_pool = test_pool_guard.create_pool();

		let redis_guard = RedisUrlProvider::acquire();
		let redis_connection = redis_guard.connect().await;

		let cookie_jar_key = Key::from(&[0u8; 64]);

		let state = AppState {
			config,
			sso_config,
			database_pool: test_pool,
			redis_connection,
			cookie_jar_key,
		};
		let app = routes::get_app_router(state);

		let test_server =
			TestServer::builder().save_cookies().build(app).unwrap();

		TestEnv {
			app:         test_server,
			db_guard:    test_pool_guard,
			redis_guard,
		}
	}

	/// Authenticate as the given principal via the dev login shortcut
	///
	/// # Panics
	/// Panics if the login fails
	#[allow(dead_code)]
	pub async fn login(self, nickname: &str) -> Self {
		let response = self
			.app
			.post("/auth/dev-login")
			.json(&serde_json::json!({ "nickname": nickname }))
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);

		self
	}

	/// Fetch the current session's anti-forgery token
	///
	/// # Panics
	/// Panics if the token endpoint fails
	#[allow(dead_code)]
	pub async fn csrf_token(&self) -> String {
		let response = self.app.get("/auth/csrf-token").await;

		assert_eq!(response.status_code(), StatusCode::OK);

		response.json::<CsrfTokenResponse>().csrf_token
	}
}

fn test_config() -> Config {
	Config {
		production: false,

		database_url: std::env::var("DATABASE_URL").unwrap(),
		redis_url:    std::env::var("REDIS_URL").unwrap(),

		frontend_url: Url::parse("http://localhost:5173/").unwrap(),
		backend_url:  Url::parse("http://localhost/").unwrap(),

		access_token_name:     "garagebook_access_token".to_string(),
		access_token_lifetime: Duration::hours(1),
	}
}

// SSO is never exercised in tests, dummy credentials are enough
fn test_sso_config() -> SsoConfig {
	SsoConfig {
		issuer_url:    IssuerUrl::new(
			"https://issuer.example.com".to_string(),
		)
		.unwrap(),
		client_id:     ClientId::new("garagebook-test".to_string()),
		client_secret: ClientSecret::new("garagebook-test-secret".to_string()),
	}
}
