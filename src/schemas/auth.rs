use serde::{Deserialize, Serialize};

/// The current session's anti-forgery token, as returned by the read-only
/// token endpoint
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CsrfTokenResponse {
	pub csrf_token: String,
}

/// Request body for the non-production login shortcut
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DevLoginRequest {
	pub nickname: String,
}
