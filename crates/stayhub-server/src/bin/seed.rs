//! Populates the database with a demo host and sample listings.
//!
//! Run with `cargo run --bin seed`. Idempotent: does nothing if the demo
//! host already owns listings.

use uuid::Uuid;

use stayhub_server::auth::password;
use stayhub_server::config::Config;
use stayhub_server::db;

const DEMO_HOST_EMAIL: &str = "host@stayhub.demo";

const PROPERTY_TYPES: &[&str] = &[
    "Apartment", "House", "Villa", "Cabin", "Cottage", "Townhouse", "Condo", "Bungalow", "Loft",
    "Farm",
];

const AMENITIES: &[&str] = &[
    "WiFi",
    "Air conditioning",
    "Kitchen",
    "Heating",
    "Washer",
    "Free parking",
    "Pool",
    "Hot tub",
    "TV",
    "Gym",
    "BBQ grill",
    "Breakfast included",
    "Pets allowed",
    "Beachfront",
    "EV charger",
];

// city, state, country, [longitude, latitude]
const LOCATIONS: &[(&str, &str, &str, [f64; 2])] = &[
    ("Mumbai", "Maharashtra", "India", [72.8777, 19.0760]),
    ("Delhi", "Delhi", "India", [77.1025, 28.7041]),
    ("Bangalore", "Karnataka", "India", [77.5946, 12.9716]),
    ("Hyderabad", "Telangana", "India", [78.4867, 17.3850]),
    ("Chennai", "Tamil Nadu", "India", [80.2707, 13.0827]),
    ("Kolkata", "West Bengal", "India", [88.3639, 22.5726]),
    ("Pune", "Maharashtra", "India", [73.8567, 18.5204]),
    ("Jaipur", "Rajasthan", "India", [75.7873, 26.9124]),
    ("Goa", "Goa", "India", [74.1240, 15.2993]),
];

fn main() {
    dotenvy::from_filename("../../.env").ok();
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("stayhub_server=info,seed=info")
        .init();

    let config = Config::from_env();
    let pool = db::create_pool(&config.sqlite_path);
    let conn = pool.get().expect("Failed to get connection");

    let now = chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();

    // Demo host account (password: "password123")
    let host_id = match conn
        .query_row(
            "SELECT id FROM users WHERE email = ?1",
            rusqlite::params![DEMO_HOST_EMAIL],
            |row| row.get::<_, String>(0),
        ) {
        Ok(id) => id,
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            let id = Uuid::new_v4().to_string();
            let password_hash =
                password::hash_password("password123").expect("Failed to hash password");
            conn.execute(
                "INSERT INTO users (id, email, name, password_hash, role, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, 'host', ?5, ?6)",
                rusqlite::params![id, DEMO_HOST_EMAIL, "Demo Host", password_hash, now, now],
            )
            .expect("Failed to insert demo host");
            id
        }
        Err(e) => panic!("Failed to look up demo host: {e}"),
    };

    let existing: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM listings WHERE host_id = ?1",
            rusqlite::params![host_id],
            |row| row.get(0),
        )
        .expect("Failed to count listings");
    if existing > 0 {
        tracing::info!("Demo host already owns {existing} listings, nothing to do");
        return;
    }

    let mut inserted = 0u32;
    for (i, (city, state, country, coordinates)) in LOCATIONS.iter().enumerate() {
        let property_type = PROPERTY_TYPES[i % PROPERTY_TYPES.len()];
        let amenities: Vec<&str> = AMENITIES
            .iter()
            .skip(i % 4)
            .step_by(3)
            .copied()
            .collect();
        let price = 1000.0 + 500.0 * (i % 5) as f64;
        let max_guests = 2 + (i % 5) as u32;
        let bedrooms = 1 + (i % 3) as u32;

        conn.execute(
            "INSERT INTO listings (id, host_id, title, description, location_address, \
             location_city, location_state, location_country, longitude, latitude, price, \
             images, amenities, max_guests, bedrooms, bathrooms, property_type, availability, \
             created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, 1, ?18, ?19)",
            rusqlite::params![
                Uuid::new_v4().to_string(),
                host_id,
                format!("Cozy {property_type} in {city}"),
                format!("A comfortable {} stay in the heart of {city}, {country}.", property_type.to_lowercase()),
                format!("{} Main Street", 10 + i),
                city,
                state,
                country,
                coordinates[0],
                coordinates[1],
                price,
                serde_json::to_string(&[format!(
                    "https://images.stayhub.demo/{}.jpg",
                    city.to_lowercase()
                )])
                .unwrap(),
                serde_json::to_string(&amenities).unwrap(),
                max_guests,
                bedrooms,
                1 + (i % 2) as u32,
                property_type,
                now,
                now,
            ],
        )
        .expect("Failed to insert listing");
        inserted += 1;
    }

    tracing::info!("Seeded {inserted} listings for {DEMO_HOST_EMAIL}");
}
