//! Controllers for authentication and session management

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::PrivateCookieJar;
use axum_extra::extract::cookie::Cookie;
use serde_json::json;

use crate::error::Error;
use crate::schemas::auth::{CsrfTokenResponse, DevLoginRequest};
use crate::{Config, RedisConn, Session};

pub mod sso;

/// Expose the current session's anti-forgery token
///
/// Clients echo this token in the `x-csrf-token` header of every mutating
/// request
#[instrument(skip_all)]
pub(crate) async fn get_csrf_token(
	session: Session,
) -> Result<impl IntoResponse, Error> {
	let response = CsrfTokenResponse { csrf_token: session.data.csrf_token };

	Ok((StatusCode::OK, Json(response)))
}

/// Delete the current session and clear its cookie
#[instrument(skip_all)]
pub(crate) async fn logout(
	State(config): State<Config>,
	State(mut r_conn): State<RedisConn>,
	session: Session,
	jar: PrivateCookieJar,
) -> Result<impl IntoResponse, Error> {
	Session::delete(session.id, &mut r_conn).await?;

	let access_token = Cookie::build(config.access_token_name).path("/");
	let jar = jar.remove(access_token);

	info!("logged out principal {}", session.data.nickname);

	Ok((jar, Json(json!({ "message": "Logged out successfully" }))))
}

/// Create a session for a given nickname without going through the identity
/// provider
///
/// Only available outside production; local clients and the integration
/// tests use this to authenticate without a live provider
#[instrument(skip(config, r_conn, jar))]
pub(crate) async fn dev_login(
	State(config): State<Config>,
	State(mut r_conn): State<RedisConn>,
	jar: PrivateCookieJar,
	Json(request): Json<DevLoginRequest>,
) -> Result<impl IntoResponse, Error> {
	if config.production {
		return Err(Error::NotFound("Route".to_string()));
	}

	let session = Session::create(
		config.access_token_lifetime,
		request.nickname,
		&mut r_conn,
	)
	.await?;

	let access_token_cookie = session.to_access_token_cookie(
		config.access_token_name,
		config.access_token_lifetime,
		config.production,
	);

	let jar = jar.add(access_token_cookie);

	info!("logged in principal {} via dev login", session.data.nickname);

	Ok((jar, Json(json!({ "message": "Logged in successfully" }))))
}
