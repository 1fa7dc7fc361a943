//! Session token service
//!
//! Session tokens are JWTs signed with HS256 over the configured secret.
//! The subject is the user id and tokens expire 7 days after issuance; the
//! session row stored alongside carries its own expiry with a configurable
//! buffer subtracted.

use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Session lifetime in seconds (7 days)
pub const SESSION_TTL_SECONDS: u64 = 604_800;

/// Claims carried by a session token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Signs and validates session tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Initialize a new token service from the signing secret
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;

        TokenService {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a session token for a user
    pub fn issue(&self, user_id: Uuid) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + SESSION_TTL_SECONDS,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return the claims
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_and_validate_round_trip() {
        let service = TokenService::new("unit-test-signing-secret");
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp, claims.iat + SESSION_TTL_SECONDS);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let service = TokenService::new("unit-test-signing-secret");
        let other = TokenService::new("some-other-secret");

        let token = other.issue(Uuid::new_v4()).unwrap();
        assert!(service.validate(&token).is_err());
    }

    #[test]
    fn rejects_tampered_token() {
        let service = TokenService::new("unit-test-signing-secret");
        let token = service.issue(Uuid::new_v4()).unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });

        assert!(service.validate(&tampered).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let secret = "unit-test-signing-secret";
        let service = TokenService::new(secret);

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: now - 2 * SESSION_TTL_SECONDS,
            exp: now - SESSION_TTL_SECONDS,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        assert!(service.validate(&token).is_err());
    }
}
