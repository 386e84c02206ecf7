use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

use crate::DbConn;
use crate::error::Error;
use crate::schema::reservation;

/// The fixed set of bookable slot labels
#[derive(
	Clone, Copy, DbEnum, Debug, Deserialize, PartialEq, Eq, Serialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::TimeSlot"]
pub enum TimeSlot {
	#[serde(rename = "10 AM")]
	TenAm,
	#[serde(rename = "11 AM")]
	ElevenAm,
	#[serde(rename = "12 PM")]
	TwelvePm,
}

impl TimeSlot {
	pub const LABELS: [&'static str; 3] = ["10 AM", "11 AM", "12 PM"];

	/// Parse a slot label as sent by clients
	#[must_use]
	pub fn from_label(label: &str) -> Option<Self> {
		match label {
			"10 AM" => Some(Self::TenAm),
			"11 AM" => Some(Self::ElevenAm),
			"12 PM" => Some(Self::TwelvePm),
			_ => None,
		}
	}
}

/// A single vehicle service reservation
#[derive(Clone, Debug, Deserialize, Queryable, Selectable, Serialize)]
#[diesel(table_name = reservation)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Reservation {
	pub id:         i32,
	pub username:   String,
	pub date:       NaiveDate,
	pub time_slot:  TimeSlot,
	pub location:   String,
	pub vehicle_no: String,
	pub mileage:    f64,
	pub message:    Option<String>,
	pub created_at: NaiveDateTime,
}

impl Reservation {
	/// Get all the reservations owned by the given principal
	#[instrument(skip(conn))]
	pub async fn for_username(
		owner: String,
		conn: &DbConn,
	) -> Result<Vec<Self>, Error> {
		let reservations = conn
			.interact(move |conn| {
				use crate::schema::reservation::dsl::*;

				reservation
					.filter(username.eq(owner))
					.select(Reservation::as_select())
					.get_results(conn)
			})
			.await??;

		Ok(reservations)
	}

	/// Get a [`Reservation`] given its id, if it exists
	#[instrument(skip(conn))]
	pub async fn get_by_id(
		r_id: i32,
		conn: &DbConn,
	) -> Result<Option<Self>, Error> {
		let found = conn
			.interact(move |conn| {
				use crate::schema::reservation::dsl::*;

				reservation
					.find(r_id)
					.select(Reservation::as_select())
					.first(conn)
					.optional()
			})
			.await??;

		Ok(found)
	}

	/// Delete a [`Reservation`] given its id
	///
	/// Losing a concurrent delete race for the same id reports the same way
	/// as a stale id
	#[instrument(skip(conn))]
	pub async fn delete_by_id(r_id: i32, conn: &DbConn) -> Result<(), Error> {
		let deleted = conn
			.interact(move |conn| {
				use crate::schema::reservation::dsl::*;

				diesel::delete(reservation.find(r_id)).execute(conn)
			})
			.await??;

		if deleted == 0 {
			return Err(Error::NotFound("Reservation".to_string()));
		}

		info!("deleted reservation with id {r_id}");

		Ok(())
	}
}

#[derive(Clone, Debug, Deserialize, Insertable, Serialize)]
#[diesel(table_name = reservation)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewReservation {
	pub username:   String,
	pub date:       NaiveDate,
	pub time_slot:  TimeSlot,
	pub location:   String,
	pub vehicle_no: String,
	pub mileage:    f64,
	pub message:    Option<String>,
}

impl NewReservation {
	/// Insert this [`NewReservation`]
	#[instrument(skip(conn))]
	pub async fn insert(self, conn: &DbConn) -> Result<Reservation, Error> {
		let created = conn
			.interact(|conn| {
				use crate::schema::reservation::dsl::*;

				diesel::insert_into(reservation)
					.values(self)
					.returning(Reservation::as_returning())
					.get_result(conn)
			})
			.await??;

		info!(
			"created reservation {} for principal {}",
			created.id, created.username
		);

		Ok(created)
	}
}
