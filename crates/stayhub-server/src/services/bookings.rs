use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthIdentity;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};

/// Only "pending" is reachable today: creation does not auto-confirm, and no
/// transition endpoint is exposed yet. Confirm/cancel hang off this enum and
/// the overlap query below when they land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub guest_id: String,
    pub listing_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub total_price: f64,
    pub status: BookingStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateBookingRequest {
    pub listing_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub total_price: Option<f64>,
    pub guests: Option<u32>,
}

const PRICE_TOLERANCE: f64 = 0.005;

pub fn create_booking(
    pool: &DbPool,
    identity: &AuthIdentity,
    req: CreateBookingRequest,
) -> AppResult<Booking> {
    let (Some(listing_id), Some(start_date), Some(end_date), Some(total_price), Some(guests)) = (
        req.listing_id,
        req.start_date,
        req.end_date,
        req.total_price,
        req.guests,
    ) else {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    };

    let check_in = parse_date(&start_date)?;
    let check_out = parse_date(&end_date)?;
    if check_out <= check_in {
        return Err(AppError::BadRequest(
            "checkOut must be after checkIn".to_string(),
        ));
    }
    if guests < 1 {
        return Err(AppError::BadRequest(
            "guests must be at least 1".to_string(),
        ));
    }

    let conn = pool.get()?;
    let (price, max_guests, availability) = conn
        .query_row(
            "SELECT price, max_guests, availability FROM listings WHERE id = ?1",
            rusqlite::params![listing_id],
            |row| {
                Ok((
                    row.get::<_, f64>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, bool>(2)?,
                ))
            },
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                AppError::NotFound("Listing not found".to_string())
            }
            e => AppError::Database(e),
        })?;

    if !availability {
        return Err(AppError::BadRequest(
            "Listing is not available for booking".to_string(),
        ));
    }
    if guests > max_guests {
        return Err(AppError::BadRequest(format!(
            "guests exceeds the listing capacity of {max_guests}"
        )));
    }

    let nights = (check_out - check_in).num_days();
    let expected = nights as f64 * price;
    if (total_price - expected).abs() > PRICE_TOLERANCE {
        return Err(AppError::BadRequest(format!(
            "totalPrice must be {expected} for {nights} nights"
        )));
    }

    // Confirmed bookings hold the dates; pendings contend and get resolved
    // at confirmation time. Ranges are half-open, so a stay may begin on
    // another booking's check-out day.
    let overlapping: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings \
         WHERE listing_id = ?1 AND status = 'confirmed' AND check_in < ?2 AND check_out > ?3",
        rusqlite::params![listing_id, fmt_date(check_out), fmt_date(check_in)],
        |row| row.get(0),
    )?;
    if overlapping > 0 {
        return Err(AppError::Overlap(
            "Listing is already booked for those dates".to_string(),
        ));
    }

    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();
    conn.execute(
        "INSERT INTO bookings (id, guest_id, listing_id, check_in, check_out, guests, \
         total_price, status, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        rusqlite::params![
            id,
            identity.id,
            listing_id,
            fmt_date(check_in),
            fmt_date(check_out),
            guests,
            total_price,
            BookingStatus::Pending.as_str(),
            now,
            now,
        ],
    )?;

    Ok(Booking {
        id,
        guest_id: identity.id.clone(),
        listing_id,
        check_in,
        check_out,
        guests,
        total_price,
        status: BookingStatus::Pending,
        created_at: now.clone(),
        updated_at: now,
    })
}

fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid date '{value}', expected YYYY-MM-DD")))
}

fn fmt_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
