use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::auth::AuthIdentity;
use crate::error::{AppError, AppResult};
use crate::models::Role;
use crate::routes::AppState;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    /// [longitude, latitude]
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub host_id: String,
    pub title: String,
    pub description: String,
    pub location: Location,
    pub price: f64,
    pub images: Vec<String>,
    pub amenities: Vec<String>,
    pub max_guests: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub property_type: String,
    pub availability: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Listing plus the owning host's public contact fields, the shape the
/// search and detail endpoints return.
#[derive(Debug, Serialize)]
pub struct ListingWithHost {
    #[serde(flatten)]
    pub listing: Listing,
    pub host: HostSummary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateListingRequest {
    pub title: String,
    pub description: String,
    pub location: Location,
    pub price: f64,
    pub images: Vec<String>,
    pub amenities: Vec<String>,
    pub max_guests: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub property_type: String,
    pub availability: bool,
}

impl Default for CreateListingRequest {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            location: Location::default(),
            price: 0.0,
            images: Vec::new(),
            amenities: Vec::new(),
            max_guests: 1,
            bedrooms: 0,
            bathrooms: 0,
            property_type: String::new(),
            availability: true,
        }
    }
}

/// Allow-list of mutable fields. Anything else in the payload (id, hostId,
/// timestamps) is ignored rather than merged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateListingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<Location>,
    pub price: Option<f64>,
    pub images: Option<Vec<String>>,
    pub amenities: Option<Vec<String>>,
    pub max_guests: Option<u32>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub property_type: Option<String>,
    pub availability: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingsQuery {
    pub location: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

const LISTING_COLUMNS: &str =
    "id, host_id, title, description, location_address, location_city, location_state, \
     location_country, longitude, latitude, price, images, amenities, max_guests, bedrooms, \
     bathrooms, property_type, availability, created_at, updated_at";

const LISTING_WITH_HOST_SELECT: &str =
    "SELECT l.id, l.host_id, l.title, l.description, l.location_address, l.location_city, \
     l.location_state, l.location_country, l.longitude, l.latitude, l.price, l.images, \
     l.amenities, l.max_guests, l.bedrooms, l.bathrooms, l.property_type, l.availability, \
     l.created_at, l.updated_at, u.name, u.email \
     FROM listings l JOIN users u ON u.id = l.host_id";

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListingsQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let mut sql = String::from(LISTING_WITH_HOST_SELECT);
    let mut clauses: Vec<&str> = Vec::new();
    let mut params: Vec<rusqlite::types::Value> = Vec::new();

    if let Some(location) = &query.location {
        clauses.push(
            "(instr(lower(l.location_city), lower(?)) > 0 \
             OR instr(lower(l.location_country), lower(?)) > 0)",
        );
        params.push(location.clone().into());
        params.push(location.clone().into());
    }
    if let Some(min_price) = query.min_price {
        clauses.push("l.price >= ?");
        params.push(min_price.into());
    }
    if let Some(max_price) = query.max_price {
        clauses.push("l.price <= ?");
        params.push(max_price.into());
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY l.created_at DESC");

    let conn = state.db.get()?;
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(params),
        listing_with_host_from_row,
    )?;
    let listings: Result<Vec<_>, _> = rows.collect();
    let listings = listings?;

    Ok(Json(json!({ "count": listings.len(), "data": listings })))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    let listing = conn
        .query_row(
            &format!("{LISTING_WITH_HOST_SELECT} WHERE l.id = ?1"),
            rusqlite::params![id],
            listing_with_host_from_row,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AppError::NotFound("Listing not found".into()),
            e => AppError::Database(e),
        })?;

    Ok(Json(json!({ "data": listing })))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthIdentity>,
    Json(body): Json<CreateListingRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let conn = state.db.get()?;

    // Only hosts may create listings
    let role: String = conn
        .query_row(
            "SELECT role FROM users WHERE id = ?1",
            rusqlite::params![identity.id],
            |row| row.get(0),
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                AppError::Forbidden("Only hosts can create listings".into())
            }
            e => AppError::Database(e),
        })?;
    if Role::parse_or_default(Some(&role)) != Role::Host {
        return Err(AppError::Forbidden("Only hosts can create listings".into()));
    }

    if body.price < 0.0 || !body.price.is_finite() {
        return Err(AppError::BadRequest(
            "price must be a non-negative number".into(),
        ));
    }

    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();
    let images = serde_json::to_string(&body.images)?;
    let amenities = serde_json::to_string(&body.amenities)?;

    conn.execute(
        "INSERT INTO listings (id, host_id, title, description, location_address, location_city, \
         location_state, location_country, longitude, latitude, price, images, amenities, \
         max_guests, bedrooms, bathrooms, property_type, availability, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
        rusqlite::params![
            id,
            identity.id,
            body.title,
            body.description,
            body.location.address,
            body.location.city,
            body.location.state,
            body.location.country,
            body.location.coordinates[0],
            body.location.coordinates[1],
            body.price,
            images,
            amenities,
            body.max_guests,
            body.bedrooms,
            body.bathrooms,
            body.property_type,
            body.availability,
            now,
            now,
        ],
    )?;

    let listing = Listing {
        id,
        host_id: identity.id,
        title: body.title,
        description: body.description,
        location: body.location,
        price: body.price,
        images: body.images,
        amenities: body.amenities,
        max_guests: body.max_guests,
        bedrooms: body.bedrooms,
        bathrooms: body.bathrooms,
        property_type: body.property_type,
        availability: body.availability,
        created_at: now.clone(),
        updated_at: now,
    };

    Ok((StatusCode::CREATED, Json(json!({ "data": listing }))))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthIdentity>,
    Path(id): Path<String>,
    Json(body): Json<UpdateListingRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if let Some(price) = body.price {
        if price < 0.0 || !price.is_finite() {
            return Err(AppError::BadRequest(
                "price must be a non-negative number".into(),
            ));
        }
    }

    let images = body.images.as_ref().map(serde_json::to_string).transpose()?;
    let amenities = body
        .amenities
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    let loc = body.location.as_ref();
    let now = chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();

    // Conditional write keyed on both id and owner; zero rows affected
    // means no such listing or not ours.
    let conn = state.db.get()?;
    let affected = conn.execute(
        "UPDATE listings SET \
         title = COALESCE(?1, title), \
         description = COALESCE(?2, description), \
         location_address = COALESCE(?3, location_address), \
         location_city = COALESCE(?4, location_city), \
         location_state = COALESCE(?5, location_state), \
         location_country = COALESCE(?6, location_country), \
         longitude = COALESCE(?7, longitude), \
         latitude = COALESCE(?8, latitude), \
         price = COALESCE(?9, price), \
         images = COALESCE(?10, images), \
         amenities = COALESCE(?11, amenities), \
         max_guests = COALESCE(?12, max_guests), \
         bedrooms = COALESCE(?13, bedrooms), \
         bathrooms = COALESCE(?14, bathrooms), \
         property_type = COALESCE(?15, property_type), \
         availability = COALESCE(?16, availability), \
         updated_at = ?17 \
         WHERE id = ?18 AND host_id = ?19",
        rusqlite::params![
            body.title,
            body.description,
            loc.map(|l| l.address.clone()),
            loc.map(|l| l.city.clone()),
            loc.map(|l| l.state.clone()),
            loc.map(|l| l.country.clone()),
            loc.map(|l| l.coordinates[0]),
            loc.map(|l| l.coordinates[1]),
            body.price,
            images,
            amenities,
            body.max_guests,
            body.bedrooms,
            body.bathrooms,
            body.property_type,
            body.availability,
            now,
            id,
            identity.id,
        ],
    )?;

    if affected == 0 {
        return Err(ownership_failure(&conn, &id, "update"));
    }

    let listing = conn.query_row(
        &format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = ?1"),
        rusqlite::params![id],
        listing_from_row,
    )?;

    Ok(Json(json!({ "data": listing })))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthIdentity>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    let affected = conn.execute(
        "DELETE FROM listings WHERE id = ?1 AND host_id = ?2",
        rusqlite::params![id, identity.id],
    )?;

    if affected == 0 {
        return Err(ownership_failure(&conn, &id, "delete"));
    }

    // Bookings referencing the listing are left untouched
    Ok(Json(json!({ "ok": true })))
}

pub async fn host_listings(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthIdentity>,
) -> AppResult<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {LISTING_COLUMNS} FROM listings WHERE host_id = ?1 ORDER BY created_at DESC"
    ))?;
    let rows = stmt.query_map(rusqlite::params![identity.id], listing_from_row)?;
    let listings: Result<Vec<_>, _> = rows.collect();
    let listings = listings?;

    Ok(Json(json!({ "count": listings.len(), "data": listings })))
}

/// Zero rows from a conditional write means either the listing does not
/// exist or the caller is not its host; probe which for the right status.
fn ownership_failure(conn: &rusqlite::Connection, listing_id: &str, action: &str) -> AppError {
    match conn.query_row(
        "SELECT host_id FROM listings WHERE id = ?1",
        rusqlite::params![listing_id],
        |row| row.get::<_, String>(0),
    ) {
        Ok(_) => AppError::Forbidden(format!("You can only {action} your own listings")),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            AppError::NotFound("Listing not found".to_string())
        }
        Err(e) => AppError::Database(e),
    }
}

fn listing_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Listing> {
    let images: String = row.get(11)?;
    let amenities: String = row.get(12)?;
    Ok(Listing {
        id: row.get(0)?,
        host_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        location: Location {
            address: row.get(4)?,
            city: row.get(5)?,
            state: row.get(6)?,
            country: row.get(7)?,
            coordinates: [row.get(8)?, row.get(9)?],
        },
        price: row.get(10)?,
        images: serde_json::from_str(&images).unwrap_or_default(),
        amenities: serde_json::from_str(&amenities).unwrap_or_default(),
        max_guests: row.get(13)?,
        bedrooms: row.get(14)?,
        bathrooms: row.get(15)?,
        property_type: row.get(16)?,
        availability: row.get(17)?,
        created_at: row.get(18)?,
        updated_at: row.get(19)?,
    })
}

fn listing_with_host_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ListingWithHost> {
    let listing = listing_from_row(row)?;
    let host = HostSummary {
        id: listing.host_id.clone(),
        name: row.get(20)?,
        email: row.get(21)?,
    };
    Ok(ListingWithHost { listing, host })
}
