//! Delegated login against the OpenID Connect identity provider
//!
//! The provider is an external collaborator; all this module needs from it
//! is a verified ID token with a stable nickname-like claim.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect};
use axum_extra::extract::PrivateCookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use openidconnect::core::{
	CoreClient,
	CoreIdTokenClaims,
	CoreProviderMetadata,
	CoreResponseType,
};
use openidconnect::reqwest::blocking::ClientBuilder;
use openidconnect::reqwest::redirect::Policy;
use openidconnect::{
	AuthenticationFlow,
	AuthorizationCode,
	CsrfToken,
	Nonce,
	RedirectUrl,
	Scope,
};
use serde::Deserialize;
use time::Duration;

use crate::error::{Error, OAuthError};
use crate::{Config, RedisConn, Session, SsoConfig};

#[must_use]
pub fn make_cookie(
	name: String,
	value: String,
	domain: String,
	lifespan: Duration,
) -> Cookie<'static> {
	let mut cookie = Cookie::new(name, value);

	cookie.set_domain(domain);
	cookie.set_max_age(lifespan);
	cookie.set_http_only(true);
	cookie.set_secure(true);
	cookie.set_same_site(SameSite::Lax);
	cookie.set_path("/");

	cookie
}

/// Start the delegated login flow by redirecting to the identity provider
#[instrument(skip(config, sso_config, jar))]
pub(crate) async fn sso_login(
	State(config): State<Config>,
	State(sso_config): State<SsoConfig>,
	mut jar: PrivateCookieJar,
) -> Result<impl IntoResponse, Error> {
	let domain = config
		.backend_url
		.domain()
		.ok_or_else(|| {
			Error::Infallible("backend url has no domain".to_string())
		})?
		.to_string();

	let (auth_url, csrf_state, nonce) = tokio::task::block_in_place(|| {
		let http_client = ClientBuilder::new()
			.redirect(Policy::none())
			.build()
			.map_err(|e| OAuthError::DiscoveryFailed(e.to_string()))?;

		let provider_metadata = CoreProviderMetadata::discover(
			&sso_config.issuer_url,
			&http_client,
		)
		.map_err(|e| OAuthError::DiscoveryFailed(e.to_string()))?;

		let client = CoreClient::from_provider_metadata(
			provider_metadata,
			sso_config.client_id.clone(),
			Some(sso_config.client_secret.clone()),
		)
		.set_redirect_uri(RedirectUrl::new(
			config.backend_url.join("auth/callback")?.to_string(),
		)?);

		let data = client
			.authorize_url(
				AuthenticationFlow::<CoreResponseType>::AuthorizationCode,
				CsrfToken::new_random,
				Nonce::new_random,
			)
			.add_scope(Scope::new("openid".to_string()))
			.add_scope(Scope::new("email".to_string()))
			.add_scope(Scope::new("profile".to_string()))
			.url();

		Ok::<_, Error>(data)
	})?;

	let csrf_cookie = make_cookie(
		"csrf-state".into(),
		csrf_state.into_secret(),
		domain.clone(),
		Duration::seconds(120),
	);

	let nonce_cookie = make_cookie(
		"nonce-cookie".into(),
		nonce.secret().to_owned(),
		domain,
		Duration::seconds(120),
	);

	jar = jar.add(csrf_cookie);
	jar = jar.add(nonce_cookie);

	Ok((jar, Redirect::to(auth_url.as_ref())))
}

#[derive(Clone, Debug, Deserialize)]
pub struct OAuthResponse {
	pub code:  String,
	pub state: String,
}

/// Complete the delegated login flow and create a session for the resolved
/// principal
#[instrument(skip(config, sso_config, r_conn, jar))]
pub(crate) async fn sso_callback(
	State(config): State<Config>,
	State(sso_config): State<SsoConfig>,
	State(mut r_conn): State<RedisConn>,
	Query(query): Query<OAuthResponse>,
	mut jar: PrivateCookieJar,
) -> Result<impl IntoResponse, Error> {
	let csrf_cookie =
		jar.get("csrf-state").ok_or(OAuthError::MissingCsrfStateCookie)?;
	let nonce_cookie =
		jar.get("nonce-cookie").ok_or(OAuthError::MissingNonceCookie)?;

	let csrf_state = csrf_cookie.value().to_owned();
	let nonce = nonce_cookie.value().to_owned();

	jar = jar.remove(csrf_cookie);
	jar = jar.remove(nonce_cookie);

	if csrf_state != query.state {
		return Err(OAuthError::InvalidCsrfState.into());
	}

	let id_token_claims: CoreIdTokenClaims = tokio::task::block_in_place(
		|| {
			let http_client = ClientBuilder::new()
				.redirect(Policy::none())
				.build()
				.map_err(|e| OAuthError::DiscoveryFailed(e.to_string()))?;

			let provider_metadata = CoreProviderMetadata::discover(
				&sso_config.issuer_url,
				&http_client,
			)
			.map_err(|e| OAuthError::DiscoveryFailed(e.to_string()))?;

			let client = CoreClient::from_provider_metadata(
				provider_metadata,
				sso_config.client_id.clone(),
				Some(sso_config.client_secret.clone()),
			)
			.set_redirect_uri(RedirectUrl::new(
				config.backend_url.join("auth/callback")?.to_string(),
			)?);

			let token_response = client
				.exchange_code(AuthorizationCode::new(query.code))
				.map_err(|e| OAuthError::ExchangeFailed(e.to_string()))?
				.request(&http_client)
				.map_err(|e| OAuthError::ExchangeFailed(e.to_string()))?;

			let id_token_verifier = client.id_token_verifier();

			let claims = token_response
				.extra_fields()
				.id_token()
				.ok_or(OAuthError::MissingIdToken)?
				.claims(&id_token_verifier, &Nonce::new(nonce))
				.map_err(|e| OAuthError::ClaimsVerification(e.to_string()))?
				.to_owned();

			Ok::<_, Error>(claims)
		},
	)?;

	// The principal's stable identifier: the nickname claim, falling back to
	// preferred_username
	let nickname = id_token_claims
		.nickname()
		.and_then(|n| n.get(None))
		.map(|n| n.as_str().to_owned())
		.or_else(|| {
			id_token_claims
				.preferred_username()
				.map(|u| u.as_str().to_owned())
		})
		.ok_or(OAuthError::MissingNicknameClaim)?;

	let session =
		Session::create(config.access_token_lifetime, nickname, &mut r_conn)
			.await?;

	let access_token_cookie = session.to_access_token_cookie(
		config.access_token_name.clone(),
		config.access_token_lifetime,
		config.production,
	);

	let jar = jar.add(access_token_cookie);

	info!("logged in principal {} from sso", session.data.nickname);

	Ok((jar, Redirect::to(config.frontend_url.as_str())))
}
