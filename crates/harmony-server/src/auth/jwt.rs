use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,
    /// Token ID, the primary key of the matching `auth_tokens` row
    pub jti: Uuid,
    /// Issued at
    pub iat: i64,
    /// Expiration
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, token_id: Uuid, issued: DateTime<Utc>, expires: DateTime<Utc>) -> Self {
        Self {
            sub: user_id,
            jti: token_id,
            iat: issued.timestamp(),
            exp: expires.timestamp(),
        }
    }
}

/// Sign claims with HS256.
pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validate signature and expiry, and return the claims.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-for-jwt";

    fn claims_expiring_in(delta: Duration) -> Claims {
        let now = Utc::now();
        Claims::new(Uuid::new_v4(), Uuid::new_v4(), now, now + delta)
    }

    #[test]
    fn test_encode_and_decode() {
        let claims = claims_expiring_in(Duration::hours(10));
        let token = encode_token(&claims, SECRET).unwrap();
        assert_eq!(decode_token(&token, SECRET).unwrap(), claims);
    }

    #[test]
    fn test_ttl_is_carried_in_claims() {
        let claims = claims_expiring_in(Duration::hours(10));
        assert_eq!(claims.exp - claims.iat, 36_000);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = encode_token(&claims_expiring_in(Duration::hours(1)), SECRET).unwrap();
        assert!(decode_token(&token, "wrong-secret").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = encode_token(&claims_expiring_in(Duration::minutes(-5)), SECRET).unwrap();
        assert!(decode_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(decode_token("not-a-valid-jwt", SECRET).is_err());
        assert!(decode_token("", SECRET).is_err());
    }

    #[test]
    fn test_distinct_token_ids_give_distinct_tokens() {
        let now = Utc::now();
        let user = Uuid::new_v4();
        let exp = now + Duration::hours(1);
        let a = encode_token(&Claims::new(user, Uuid::new_v4(), now, exp), SECRET).unwrap();
        let b = encode_token(&Claims::new(user, Uuid::new_v4(), now, exp), SECRET).unwrap();
        assert_ne!(a, b);
    }
}
