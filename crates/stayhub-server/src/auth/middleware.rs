use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::auth::token;
use crate::error::AppError;
use crate::routes::AppState;

pub const TOKEN_COOKIE: &str = "token";

/// Gate for authenticated routes. The token is taken from the session cookie,
/// falling back to an `Authorization: Bearer` header; the cookie wins when
/// both are present. On success the decoded identity is exposed to handlers
/// as a request extension.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| bearer_token(request.headers()))
        .ok_or_else(|| AppError::Unauthorized("Access denied, no token provided".to_string()))?;

    let identity = token::verify_token(&state.config.jwt_secret, &token)?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.to_string())
}
