use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::AuthIdentity;
use crate::error::{AppError, AppResult};

/// Tokens are valid for one hour from issuance and cannot be refreshed or
/// revoked; logout only clears the cookie.
pub const TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: i64,
}

pub fn issue_token(secret: &str, user_id: &str, email: &str) -> AppResult<String> {
    let exp = (Utc::now() + Duration::seconds(TOKEN_TTL_SECS)).timestamp();
    let claims = Claims {
        id: Some(user_id.to_string()),
        email: Some(email.to_string()),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("jwt encode: {e}")))
}

pub fn verify_token(secret: &str, token: &str) -> AppResult<AuthIdentity> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    let id = data.claims.id.ok_or_else(|| {
        AppError::Unauthorized("Invalid token structure, missing user ID".to_string())
    })?;

    Ok(AuthIdentity {
        id,
        email: data.claims.email.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issued_token_verifies() {
        let token = issue_token(SECRET, "user-1", "a@b.c").unwrap();
        let identity = verify_token(SECRET, &token).unwrap();
        assert_eq!(identity.id, "user-1");
        assert_eq!(identity.email, "a@b.c");
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = issue_token(SECRET, "user-1", "a@b.c").unwrap();
        assert!(verify_token("other-secret", &token).is_err());

        let mut forged = token;
        forged.push('x');
        assert!(verify_token(SECRET, &forged).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = Claims {
            id: Some("user-1".into()),
            email: Some("a@b.c".into()),
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(SECRET, &token).is_err());
    }

    #[test]
    fn token_without_user_id_is_rejected() {
        let claims = Claims {
            id: None,
            email: Some("a@b.c".into()),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(SECRET, &token).is_err());
    }
}
