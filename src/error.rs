//! Library-wide error types and [`From`] impls

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Serialize;
use thiserror::Error;

/// Path unauthenticated callers are redirected to
pub const LOGIN_PATH: &str = "/auth/login";

/// Top level application error, can be converted into a [`Response`]
#[derive(Debug, Error)]
pub enum Error {
	/// Request has no valid session
	#[error("unauthenticated")]
	Unauthenticated,
	/// Request/operation forbidden
	#[error("Unauthorized access")]
	Forbidden,
	/// Resource not found
	#[error("{0} not found")]
	NotFound(String),
	/// One or more request fields violate their rule
	#[error("validation failed")]
	ValidationFailed(Vec<FieldViolation>),
	/// Missing or mismatched anti-forgery token
	#[error(transparent)]
	CsrfError(#[from] CsrfError),
	/// Any error related to the delegated login flow
	#[error(transparent)]
	OAuthError(#[from] OAuthError),
	/// An error that should never happen
	#[error("{0}")]
	Infallible(String),
	/// Opaque internal server error
	#[error("internal server error")]
	InternalServerError,
}

/// A single violated request field
#[derive(Clone, Debug, Serialize)]
pub struct FieldViolation {
	pub field:  String,
	pub reason: String,
}

/// Any error related to the per-session anti-forgery token
#[derive(Debug, Error)]
pub enum CsrfError {
	#[error("missing anti-forgery token")]
	MissingToken,
	#[error("invalid anti-forgery token")]
	TokenMismatch,
}

/// Any error related to OpenID Connect login
#[derive(Debug, Error)]
pub enum OAuthError {
	#[error("invalid CSRF state")]
	InvalidCsrfState,
	#[error("missing CSRF state cookie")]
	MissingCsrfStateCookie,
	#[error("missing nonce cookie")]
	MissingNonceCookie,
	#[error("provider discovery failed")]
	DiscoveryFailed(String),
	#[error("authorization code exchange failed")]
	ExchangeFailed(String),
	#[error("missing ID token in provider response")]
	MissingIdToken,
	#[error("ID token verification failed")]
	ClaimsVerification(String),
	#[error("missing nickname claim in ID token")]
	MissingNicknameClaim,
}

/// A list of possible internal errors
///
/// API end users should never see these details
#[derive(Debug, Error)]
pub enum InternalServerError {
	/// Error executing some database operation
	#[error("database error -- {0:?}")]
	DatabaseError(diesel::result::Error),
	/// Error interacting with a database connection
	#[error("database interaction error -- {0:?}")]
	DatabaseInteractionError(deadpool_diesel::InteractError),
	/// Error acquiring database pool connection
	#[error("database pool error -- {0:?}")]
	PoolError(deadpool_diesel::PoolError),
	/// Error executing some redis operation
	#[error("redis error -- {0:?}")]
	RedisError(redis::RedisError),
	/// Error related to `serde_json`
	#[error("serde_json error -- {0:?}")]
	SerdeJsonError(serde_json::Error),
	/// Attempted to extract a session from a request that has not been
	/// authorized
	#[error("attempted to extract session without checking authorization")]
	SessionWithoutAuthError,
	/// Failed to parse a url
	#[error("could not parse url -- {0:?}")]
	UrlParseError(url::ParseError),
}

/// Convert an error into a [`Response`]
///
/// Unauthenticated requests are redirected to the login entry point instead
/// of receiving a JSON error
impl IntoResponse for Error {
	fn into_response(self) -> Response {
		error!("{self:?}");

		match self {
			Self::Unauthenticated => {
				Redirect::to(LOGIN_PATH).into_response()
			},
			Self::ValidationFailed(violations) => {
				let body = serde_json::json!({ "errors": violations });

				(StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
			},
			_ => {
				let body = serde_json::json!({ "message": self.to_string() });

				let status = match self {
					Self::Forbidden | Self::CsrfError(_) => {
						StatusCode::FORBIDDEN
					},
					Self::NotFound(_) => StatusCode::NOT_FOUND,
					Self::OAuthError(
						OAuthError::DiscoveryFailed(_)
						| OAuthError::ExchangeFailed(_),
					) => StatusCode::BAD_GATEWAY,
					Self::OAuthError(_) => StatusCode::FORBIDDEN,
					_ => StatusCode::INTERNAL_SERVER_ERROR,
				};

				(status, axum::Json(body)).into_response()
			},
		}
	}
}

// Map internal server errors to application errors
impl From<InternalServerError> for Error {
	fn from(value: InternalServerError) -> Self {
		error!("internal server error -- {value}");

		Self::InternalServerError
	}
}

/// Map aggregated validation errors to application errors, reporting every
/// violated field
impl From<validator::ValidationErrors> for Error {
	fn from(err: validator::ValidationErrors) -> Self {
		let mut violations = Vec::new();

		for (field, errors) in err.field_errors() {
			for error in errors {
				violations.push(FieldViolation {
					field:  field.to_string(),
					reason: error.to_string(),
				});
			}
		}

		Self::ValidationFailed(violations)
	}
}

impl From<deadpool_diesel::InteractError> for Error {
	fn from(value: deadpool_diesel::InteractError) -> Self {
		InternalServerError::DatabaseInteractionError(value).into()
	}
}

impl From<diesel::result::Error> for Error {
	fn from(err: diesel::result::Error) -> Self {
		InternalServerError::DatabaseError(err).into()
	}
}

impl From<deadpool_diesel::PoolError> for Error {
	fn from(value: deadpool_diesel::PoolError) -> Self {
		InternalServerError::PoolError(value).into()
	}
}

impl From<redis::RedisError> for Error {
	fn from(err: redis::RedisError) -> Self {
		InternalServerError::RedisError(err).into()
	}
}

impl From<url::ParseError> for Error {
	fn from(err: url::ParseError) -> Self {
		InternalServerError::UrlParseError(err).into()
	}
}
