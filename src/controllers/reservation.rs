//! Controllers for the reservation resource
//!
//! Every route requires an authenticated session; reservations are only ever
//! visible to, and deletable by, their owner.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use validator::Validate;

use crate::error::Error;
use crate::models::Reservation;
use crate::schemas::reservation::{
	CreateReservationRequest,
	ReservationResponse,
};
use crate::{DbPool, Session};

/// Get all reservations owned by the current principal
#[instrument(skip(pool))]
pub(crate) async fn get_reservations(
	State(pool): State<DbPool>,
	session: Session,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let reservations =
		Reservation::for_username(session.data.nickname, &conn).await?;

	let response: Vec<ReservationResponse> =
		reservations.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(response)))
}

/// Validate, sanitize, and persist a new reservation for the current
/// principal
///
/// On any validation failure nothing is persisted and every violated field
/// is reported
#[instrument(skip(pool))]
pub(crate) async fn create_reservation(
	State(pool): State<DbPool>,
	session: Session,
	Json(request): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	// The owner always comes from the session, never from the client
	let new_reservation = request.into_insertable(session.data.nickname)?;

	let conn = pool.get().await?;
	new_reservation.insert(&conn).await?;

	Ok((
		StatusCode::OK,
		Json(json!({ "message": "Reservation created successfully" })),
	))
}

/// Delete a reservation owned by the current principal
///
/// Non-owners get a [`Forbidden`](Error::Forbidden) response that leaks
/// nothing about the record
#[instrument(skip(pool))]
pub(crate) async fn delete_reservation(
	State(pool): State<DbPool>,
	session: Session,
	Path(r_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let Some(reservation) = Reservation::get_by_id(r_id, &conn).await? else {
		return Err(Error::NotFound("Reservation".to_string()));
	};

	if reservation.username != session.data.nickname {
		return Err(Error::Forbidden);
	}

	Reservation::delete_by_id(r_id, &conn).await?;

	Ok((
		StatusCode::OK,
		Json(json!({ "message": "Reservation deleted successfully" })),
	))
}
