use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::ValidationError;
use validator_derive::Validate;

use crate::error::Error;
use crate::models::{NewReservation, Reservation, TimeSlot};
use crate::strip_markup;

/// Candidate fields for a new reservation
///
/// Fields arrive as strings (the booking page posts form text) and are all
/// optional at the serde level so that a missing field surfaces as a
/// validation violation rather than a deserialization failure; validation
/// reports every violated field at once
#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
pub struct CreateReservationRequest {
	#[validate(
		required(message = "Invalid date format", code = "date"),
		custom(
			function = validate_date,
			message = "Invalid date format",
			code = "date"
		)
	)]
	pub date:       Option<String>,
	#[validate(
		required(message = "Invalid time", code = "time"),
		custom(
			function = validate_time_slot,
			message = "Invalid time",
			code = "time"
		)
	)]
	pub time:       Option<String>,
	#[validate(
		required(message = "Location is required", code = "location"),
		custom(
			function = validate_present,
			message = "Location is required",
			code = "location"
		)
	)]
	pub location:   Option<String>,
	#[validate(
		required(message = "Vehicle number is required", code = "vehicle_no"),
		custom(
			function = validate_present,
			message = "Vehicle number is required",
			code = "vehicle_no"
		)
	)]
	pub vehicle_no: Option<String>,
	#[validate(
		required(message = "Mileage must be a number", code = "mileage"),
		custom(
			function = validate_mileage,
			message = "Mileage must be a number",
			code = "mileage"
		)
	)]
	pub mileage:    Option<String>,
	pub message:    Option<String>,
}

impl CreateReservationRequest {
	/// Convert an already-validated request into an insertable record owned
	/// by the given principal
	///
	/// The free-text message is stripped of all markup; any client-supplied
	/// owner is ignored in favor of the session principal
	pub fn into_insertable(
		self,
		username: String,
	) -> Result<NewReservation, Error> {
		let date = self
			.date
			.as_deref()
			.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
			.ok_or_else(|| {
				Error::Infallible(
					"converted an unvalidated reservation date".to_string(),
				)
			})?;

		let time_slot = self
			.time
			.as_deref()
			.and_then(TimeSlot::from_label)
			.ok_or_else(|| {
				Error::Infallible(
					"converted an unvalidated reservation time slot"
						.to_string(),
				)
			})?;

		let mileage = self
			.mileage
			.as_deref()
			.and_then(|m| m.trim().parse::<f64>().ok())
			.ok_or_else(|| {
				Error::Infallible(
					"converted an unvalidated reservation mileage".to_string(),
				)
			})?;

		let location = self.location.map(|l| l.trim().to_string()).ok_or_else(
			|| {
				Error::Infallible(
					"converted an unvalidated reservation location"
						.to_string(),
				)
			},
		)?;

		let vehicle_no = self
			.vehicle_no
			.map(|v| v.trim().to_string())
			.ok_or_else(|| {
				Error::Infallible(
					"converted an unvalidated reservation vehicle number"
						.to_string(),
				)
			})?;

		Ok(NewReservation {
			username,
			date,
			time_slot,
			location,
			vehicle_no,
			mileage,
			message: self.message.map(|m| strip_markup(&m)),
		})
	}
}

fn validate_date(date: &str) -> Result<(), ValidationError> {
	NaiveDate::parse_from_str(date, "%Y-%m-%d")
		.map(|_| ())
		.map_err(|_| ValidationError::new("date"))
}

fn validate_time_slot(time: &str) -> Result<(), ValidationError> {
	TimeSlot::from_label(time)
		.map(|_| ())
		.ok_or_else(|| ValidationError::new("time"))
}

fn validate_present(value: &str) -> Result<(), ValidationError> {
	if value.trim().is_empty() {
		return Err(ValidationError::new("required"));
	}

	Ok(())
}

fn validate_mileage(mileage: &str) -> Result<(), ValidationError> {
	match mileage.trim().parse::<f64>() {
		Ok(value) if value.is_finite() => Ok(()),
		_ => Err(ValidationError::new("mileage")),
	}
}

#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ReservationResponse {
	pub id:         i32,
	pub username:   String,
	pub date:       NaiveDate,
	pub time:       TimeSlot,
	pub location:   String,
	pub vehicle_no: String,
	pub mileage:    f64,
	pub message:    Option<String>,
	pub created_at: NaiveDateTime,
}

impl From<Reservation> for ReservationResponse {
	fn from(value: Reservation) -> Self {
		Self {
			id:         value.id,
			username:   value.username,
			date:       value.date,
			time:       value.time_slot,
			location:   value.location,
			vehicle_no: value.vehicle_no,
			mileage:    value.mileage,
			message:    value.message,
			created_at: value.created_at,
		}
	}
}
