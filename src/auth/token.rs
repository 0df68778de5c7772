use crate::error::AppError;
use crate::models::AccountRole;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject of the token: the account id.
    pub sub: Uuid,
    /// Account role at the time the token was issued.
    pub role: AccountRole,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
}

/// A freshly signed token together with its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signing material and token lifetime, built once from configuration and
/// shared through application state.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, lifetime_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: Duration::hours(lifetime_hours.max(1)),
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Signs a token for `user_id` that expires after the configured lifetime.
    pub fn issue(&self, user_id: Uuid, role: AccountRole) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| AppError::InternalServerError("Token expiry overflow".into()))?;

        let claims = Claims {
            sub: user_id,
            role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verifies a token's signature and expiry and returns its claims.
    ///
    /// Returns `AppError::Unauthorized` if the token is malformed, its signature
    /// is invalid, or it has expired.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_generation_and_verification() {
        let keys = TokenKeys::new("test_secret_for_gen_verify", 24);
        let user_id = Uuid::new_v4();
        let issued = keys.issue(user_id, AccountRole::Talent).unwrap();
        let claims = keys.verify(&issued.token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, AccountRole::Talent);
        assert_eq!(claims.exp as i64, issued.expires_at.timestamp());
    }

    #[test]
    fn test_token_expiration() {
        let keys = TokenKeys::new("test_secret_for_expiration", 24);
        let past = Utc::now() - Duration::hours(2);
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: AccountRole::Admin,
            exp: past.timestamp() as usize,
            iat: (past - Duration::hours(1)).timestamp() as usize,
        };
        let expired_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test_secret_for_expiration".as_bytes()),
        )
        .unwrap();

        match keys.verify(&expired_token) {
            Err(AppError::Unauthorized(msg)) => {
                assert!(msg.contains("Invalid token: ExpiredSignature"));
            }
            Ok(_) => panic!("Token should have been invalid due to expiration"),
            Err(e) => panic!("Unexpected error type for expired token: {:?}", e),
        }
    }

    #[test]
    fn test_invalid_token_signature() {
        let issued = TokenKeys::new("one_secret", 24)
            .issue(Uuid::new_v4(), AccountRole::Client)
            .unwrap();

        match TokenKeys::new("a_completely_different_secret", 24).verify(&issued.token) {
            Err(AppError::Unauthorized(msg)) => {
                assert!(msg.contains("Invalid token: InvalidSignature"));
            }
            Ok(_) => panic!("Token should have been invalid due to signature mismatch"),
            Err(e) => panic!("Unexpected error type for invalid signature: {:?}", e),
        }
    }

    #[test]
    fn test_garbage_token_is_unauthorized() {
        let keys = TokenKeys::new("secret", 24);
        assert!(matches!(
            keys.verify("not-a-jwt"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
