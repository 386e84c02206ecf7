use std::time::Duration;

use axum::Router;
use axum::routing::{delete, get, post};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::controllers::auth::sso::{sso_callback, sso_login};
use crate::controllers::auth::{dev_login, get_csrf_token, logout};
use crate::controllers::healthcheck;
use crate::controllers::reservation::{
	create_reservation,
	delete_reservation,
	get_reservations,
};
use crate::middleware::{AuthLayer, CsrfLayer};

/// Get the app router
pub fn get_app_router(state: AppState) -> Router {
	let api_routes = Router::new()
		.route("/healthcheck", get(healthcheck))
		.nest("/auth", auth_routes(&state))
		.nest("/reservations", reservation_routes(&state));

	Router::new()
		.merge(api_routes)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(TimeoutLayer::new(Duration::from_secs(10)))
				.layer(CompressionLayer::new()),
		)
		.with_state(state)
}

/// Authentication routes
fn auth_routes(state: &AppState) -> Router<AppState> {
	let protected = Router::new()
		.route("/csrf-token", get(get_csrf_token))
		.route("/logout", post(logout))
		.route_layer(CsrfLayer::new(state.clone()))
		.route_layer(AuthLayer::new(state.clone()));

	Router::new()
		.route("/login", get(sso_login))
		.route("/callback", get(sso_callback))
		.route("/dev-login", post(dev_login))
		.merge(protected)
}

/// Reservation routes, all owner-scoped and auth protected
fn reservation_routes(state: &AppState) -> Router<AppState> {
	Router::new()
		.route("/", get(get_reservations).post(create_reservation))
		.route("/{id}", delete(delete_reservation))
		.route_layer(CsrfLayer::new(state.clone()))
		.route_layer(AuthLayer::new(state.clone()))
}
