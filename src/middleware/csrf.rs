//! Middleware enforcing the per-session anti-forgery token on mutating
//! requests

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::Request;
use axum::http::{Method, Response};
use axum::response::IntoResponse;
use tower::{Layer, Service};
use uuid::Uuid;

use crate::AppState;
use crate::error::{CsrfError, Error, InternalServerError};
use crate::session::Session;

/// Name of the request header carrying the session's anti-forgery token
pub const CSRF_TOKEN_HEADER: &str = "x-csrf-token";

/// Middleware layer that rejects mutating requests whose anti-forgery token
/// does not match the one stored in the session
///
/// Must be applied inside an [`AuthLayer`](crate::middleware::AuthLayer);
/// safe methods pass through untouched
#[derive(Clone)]
pub struct CsrfLayer {
	state: AppState,
}

impl CsrfLayer {
	#[must_use]
	pub fn new(state: AppState) -> Self { Self { state } }
}

impl<S> Layer<S> for CsrfLayer {
	type Service = CsrfMiddleware<S>;

	fn layer(&self, inner: S) -> Self::Service {
		CsrfMiddleware { inner, state: self.state.clone() }
	}
}

#[derive(Clone)]
pub struct CsrfMiddleware<S> {
	inner: S,
	state: AppState,
}

impl<S> Service<Request<Body>> for CsrfMiddleware<S>
where
	S: Service<Request, Response = Response<Body>> + Clone + Send + 'static,
	S::Future: Send + 'static,
{
	type Error = S::Error;
	type Future = Pin<
		Box<
			dyn Future<Output = Result<Self::Response, Self::Error>>
				+ Send
				+ 'static,
		>,
	>;
	type Response = S::Response;

	fn poll_ready(
		&mut self,
		cx: &mut Context<'_>,
	) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	#[instrument(skip_all)]
	fn call(&mut self, req: Request<Body>) -> Self::Future {
		let cloned_inner = self.inner.clone();
		let mut inner = std::mem::replace(&mut self.inner, cloned_inner);

		let state = self.state.clone();

		Box::pin(async move {
			if matches!(
				*req.method(),
				Method::GET | Method::HEAD | Method::OPTIONS
			) {
				return inner.call(req).await;
			}

			let Some(session_id) =
				req.extensions().get::<Uuid>().copied()
			else {
				return Ok(Error::from(
					InternalServerError::SessionWithoutAuthError,
				)
				.into_response());
			};

			let token = req
				.headers()
				.get(CSRF_TOKEN_HEADER)
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned);

			let Some(token) = token else {
				info!("got mutating request without anti-forgery token");

				return Ok(Error::from(CsrfError::MissingToken).into_response());
			};

			let mut r_conn = state.redis_connection;

			let session = match Session::get(session_id, &mut r_conn).await {
				Ok(s) => s,
				Err(e) => return Ok(e.into_response()),
			};

			let Some(session) = session else {
				return Ok(Error::Unauthenticated.into_response());
			};

			if session.data.csrf_token != token {
				warn!(
					"got mutating request with mismatched anti-forgery token \
					 for session {}",
					session_id
				);

				return Ok(Error::from(CsrfError::TokenMismatch).into_response());
			}

			inner.call(req).await
		})
	}
}
