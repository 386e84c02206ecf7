use axum::http::StatusCode;
use serde_json::{Value, json};

mod common;

use common::TestEnv;

#[tokio::test(flavor = "multi_thread")]
async fn unauthenticated_requests_redirect_to_login() {
	let env = TestEnv::new().await;

	let response = env.app.get("/reservations").await;

	assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
	assert_eq!(response.header("location"), "/auth/login");

	let response = env.app.post("/reservations").json(&json!({})).await;

	assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
	assert_eq!(response.header("location"), "/auth/login");

	let response = env.app.delete("/reservations/1").await;

	assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
	assert_eq!(response.header("location"), "/auth/login");
}

#[tokio::test(flavor = "multi_thread")]
async fn csrf_token_endpoint_requires_auth() {
	let env = TestEnv::new().await;

	let response = env.app.get("/auth/csrf-token").await;

	assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
	assert_eq!(response.header("location"), "/auth/login");
}

#[tokio::test(flavor = "multi_thread")]
async fn csrf_token_is_stable_per_session() {
	let env = TestEnv::new().await.login("alice").await;

	let first = env.csrf_token().await;
	let second = env.csrf_token().await;

	assert!(!first.is_empty());
	assert_eq!(first, second);
}

#[tokio::test(flavor = "multi_thread")]
async fn mutating_request_without_csrf_token_is_rejected() {
	let env = TestEnv::new().await.login("alice").await;

	let response = env
		.app
		.post("/reservations")
		.json(&json!({
			"date": "2024-06-01",
			"time": "10 AM",
			"location": "Lot A",
			"vehicle_no": "XYZ123",
			"mileage": "1500",
		}))
		.await;

	assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

	// The request never reached the service logic
	let response = env.app.get("/reservations").await;

	assert_eq!(response.json::<Vec<Value>>().len(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn mutating_request_with_wrong_csrf_token_is_rejected() {
	let env = TestEnv::new().await.login("alice").await;

	let response = env
		.app
		.post("/reservations")
		.add_header("x-csrf-token", "not-the-token")
		.json(&json!({
			"date": "2024-06-01",
			"time": "10 AM",
			"location": "Lot A",
			"vehicle_no": "XYZ123",
			"mileage": "1500",
		}))
		.await;

	assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

	let response = env.app.get("/reservations").await;

	assert_eq!(response.json::<Vec<Value>>().len(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn logout_invalidates_session() {
	let env = TestEnv::new().await.login("alice").await;
	let token = env.csrf_token().await;

	let response = env
		.app
		.post("/auth/logout")
		.add_header("x-csrf-token", token.as_str())
		.await;

	assert_eq!(response.status_code(), StatusCode::OK);

	let response = env.app.get("/reservations").await;

	assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
	assert_eq!(response.header("location"), "/auth/login");
}

#[tokio::test(flavor = "multi_thread")]
async fn dev_login_creates_usable_session() {
	let env = TestEnv::new().await;

	let response = env
		.app
		.post("/auth/dev-login")
		.json(&json!({ "nickname": "alice" }))
		.await;

	assert_eq!(response.status_code(), StatusCode::OK);

	let response = env.app.get("/reservations").await;

	assert_eq!(response.status_code(), StatusCode::OK);
}
