use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// How long a session token stays valid after it is issued.
pub const SESSION_TTL_HOURS: i64 = 72;

/// Represents the claims encoded within a session JWT.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Identifier of the authenticated user.
    pub user_id: i32,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Issues and validates HS256 session tokens.
///
/// The secret is fixed when the service is built at startup and is never mutated afterwards.
/// Every method is a pure function of the token, the secret and the clock.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit instant in `validate_token_at`.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::hours(SESSION_TTL_HOURS),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Generates a token for `user_id` that expires `SESSION_TTL_HOURS` from now.
    pub fn issue_token(&self, user_id: i32) -> Result<String, AppError> {
        self.issue_token_at(user_id, Utc::now())
    }

    pub fn issue_token_at(&self, user_id: i32, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            user_id,
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies the signature and expiry of `token` and returns its claims.
    ///
    /// Malformed tokens, foreign signatures and expired tokens all yield `AppError::Unauthorized`.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        self.validate_token_at(token, Utc::now())
    }

    pub fn validate_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        if claims.exp <= now.timestamp() {
            return Err(AppError::Unauthorized("Invalid token: ExpiredSignature".into()));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(b"test_secret_for_tokens")
    }

    #[test]
    fn test_token_generation_and_verification() {
        let tokens = service();
        let token = tokens.issue_token(1).unwrap();
        let claims = tokens.validate_token(&token).unwrap();
        assert_eq!(claims.user_id, 1);
    }

    #[test]
    fn test_token_lifetime_is_72_hours() {
        let tokens = service();
        let issued_at = Utc::now();
        let token = tokens.issue_token_at(9, issued_at).unwrap();

        let accepted = tokens
            .validate_token_at(&token, issued_at + Duration::hours(1))
            .unwrap();
        assert_eq!(accepted.user_id, 9);
        assert_eq!(accepted.exp, (issued_at + Duration::hours(72)).timestamp());

        match tokens.validate_token_at(&token, issued_at + Duration::hours(73)) {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("ExpiredSignature")),
            other => panic!("Token should have expired, got {:?}", other),
        }
    }

    #[test]
    fn test_token_expired_in_the_past() {
        let tokens = service();
        let token = tokens
            .issue_token_at(2, Utc::now() - Duration::hours(80))
            .unwrap();
        assert!(matches!(
            tokens.validate_token(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_invalid_token_signature() {
        let token = TokenService::new(b"a_completely_different_secret")
            .issue_token(3)
            .unwrap();

        match service().validate_token(&token) {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("InvalidSignature")),
            other => panic!("Token should have been rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_token() {
        assert!(matches!(
            service().validate_token("not-a-jwt"),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            service().validate_token(""),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_token_without_expiry_is_rejected() {
        #[derive(Serialize)]
        struct NoExpiry {
            user_id: i32,
        }

        let secret = b"test_secret_for_tokens";
        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoExpiry { user_id: 4 },
            &EncodingKey::from_secret(secret),
        )
        .unwrap();

        assert!(matches!(
            service().validate_token(&token),
            Err(AppError::Unauthorized(_))
        ));
    }
}
