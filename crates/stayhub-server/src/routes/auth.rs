use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::middleware::TOKEN_COOKIE;
use crate::auth::{password, token, AuthIdentity};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{Role, User, UserPublic};
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let name = body.name.unwrap_or_default();
    let email = body.email.unwrap_or_default();
    let pass = body.password.unwrap_or_default();

    // Validate input
    if name.is_empty() || email.is_empty() || pass.is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }
    if !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if pass.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    let role = Role::parse_or_default(body.role.as_deref());
    let password_hash = password::hash_password(&pass)?;
    let user_id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();

    // Insert user
    let conn = state.db.get()?;
    let result = conn.execute(
        "INSERT INTO users (id, email, name, password_hash, role, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![user_id, email, name, password_hash, role.as_str(), now, now],
    );

    match result {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        Err(e) => return Err(AppError::Database(e)),
    }

    let token = token::issue_token(&state.config.jwt_secret, &user_id, &email)?;
    let cookie = build_token_cookie(token.clone(), &state.config);

    Ok((
        StatusCode::CREATED,
        jar.add(cookie),
        Json(json!({ "token": token })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let email = body.email.unwrap_or_default();
    let pass = body.password.unwrap_or_default();

    if email.is_empty() || pass.is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    let conn = state.db.get()?;
    let user_result = conn.query_row(
        "SELECT id, email, name, password_hash, role, created_at, updated_at FROM users WHERE email = ?1",
        rusqlite::params![email],
        user_from_row,
    );

    let user = match user_result {
        Ok(u) => u,
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            return Err(AppError::NotFound("Invalid email or password".to_string()));
        }
        Err(e) => return Err(AppError::Database(e)),
    };

    if !password::verify_password(&pass, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    let token = token::issue_token(&state.config.jwt_secret, &user.id, &user.email)?;
    let cookie = build_token_cookie(token.clone(), &state.config);

    Ok((jar.add(cookie), Json(json!({ "token": token }))))
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthIdentity>,
) -> AppResult<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    let user = conn
        .query_row(
            "SELECT id, email, name, password_hash, role, created_at, updated_at FROM users WHERE id = ?1",
            rusqlite::params![identity.id],
            user_from_row,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AppError::NotFound("User not found".to_string()),
            e => AppError::Database(e),
        })?;

    Ok(Json(json!({ "user": UserPublic::from(user) })))
}

/// Stateless logout: the cookie is cleared but an already-issued token stays
/// valid until its natural expiry.
pub async fn logout(jar: CookieJar) -> AppResult<impl IntoResponse> {
    let removal = Cookie::build(TOKEN_COOKIE)
        .path("/")
        .max_age(time::Duration::ZERO)
        .http_only(true)
        .build();

    Ok((jar.add(removal), Json(json!({ "ok": true }))))
}

fn build_token_cookie(token: String, config: &Config) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .max_age(time::Duration::seconds(token::TOKEN_TTL_SECS))
        .http_only(true)
        .secure(config.secure_cookies)
        .same_site(axum_extra::extract::cookie::SameSite::Lax)
        .build()
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let role: String = row.get(4)?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        role: Role::parse_or_default(Some(&role)),
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
