use bcrypt::{hash, verify};

use crate::error::{AppError, AppResult};

const HASH_COST: u32 = 10;

pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, HASH_COST).map_err(|e| AppError::Internal(format!("bcrypt hash: {e}")))
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    verify(password, password_hash)
        .map_err(|e| AppError::Internal(format!("bcrypt verify: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hashed = hash_password("correct horse").unwrap();
        assert_ne!(hashed, "correct horse");
        assert!(verify_password("correct horse", &hashed).unwrap());
        assert!(!verify_password("wrong horse", &hashed).unwrap());
    }
}
