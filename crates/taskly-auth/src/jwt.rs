//! Session token handling (HS256 JSON Web Tokens)

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Lifetime of a session token issued at sign-up or sign-in
pub const SESSION_TOKEN_VALIDITY_DAYS: i64 = 7;

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(subject: String, validity: Duration) -> Self {
        let now = Utc::now();
        let exp = now + validity;

        Self {
            sub: subject,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Subject parsed as a user ID, if it is one
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// JWT errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT encoding error: {0}")]
    EncodingError(jsonwebtoken::errors::Error),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,
}

/// Issues and verifies session tokens with a process-wide HMAC secret
///
/// The secret is handed in at construction; nothing here reads configuration
/// or environment on its own.
///
/// Verification checks ONLY:
/// - Signature (using the secret)
/// - Expiration (no leeway)
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    validity: Duration,
}

impl TokenCodec {
    /// Create a codec using HMAC-SHA256 with the given secret
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            validity: Duration::days(SESSION_TOKEN_VALIDITY_DAYS),
        }
    }

    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Issue a token whose subject is `user_id`
    pub fn issue(&self, user_id: &Uuid) -> Result<String, JwtError> {
        let claims = SessionClaims::new(user_id.to_string(), self.validity);
        self.encode(&claims)
    }

    /// Sign arbitrary claims with this codec's secret
    pub fn encode(&self, claims: &SessionClaims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(JwtError::EncodingError)
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, JwtError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::InvalidToken,
            })?;

        if token_data.claims.is_expired() {
            return Err(JwtError::TokenExpired);
        }

        Ok(token_data.claims)
    }

    /// User ID carried by `token`, or `None` for any token that does not verify
    ///
    /// This is the one place where a bad signature, a malformed token, an
    /// expired token and a non-UUID subject all become "no identity".
    pub fn subject(&self, token: &str) -> Option<Uuid> {
        self.verify(token).ok().and_then(|claims| claims.user_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &[u8] = b"test_secret_key_1234567890";

    #[test]
    fn test_issue_then_verify_returns_subject() {
        let codec = TokenCodec::new(TEST_SECRET);
        let user_id = Uuid::new_v4();

        let token = codec.issue(&user_id).unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.user_id(), Some(user_id));
        assert_eq!(codec.subject(&token), Some(user_id));
    }

    #[test]
    fn test_default_validity_is_seven_days() {
        let codec = TokenCodec::new(TEST_SECRET);
        let token = codec.issue(&Uuid::new_v4()).unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
        assert_eq!(codec.validity(), Duration::days(7));
    }

    #[test]
    fn test_expired_token() {
        let codec = TokenCodec::new(TEST_SECRET);
        let claims = SessionClaims::new(Uuid::new_v4().to_string(), Duration::seconds(-10));
        assert!(claims.is_expired());

        let token = codec.encode(&claims).unwrap();

        assert!(matches!(codec.verify(&token), Err(JwtError::TokenExpired)));
        assert_eq!(codec.subject(&token), None);
    }

    #[test]
    fn test_expired_via_validity() {
        let codec = TokenCodec::new(TEST_SECRET).with_validity(Duration::seconds(-1));
        let token = codec.issue(&Uuid::new_v4()).unwrap();

        assert!(matches!(codec.verify(&token), Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret() {
        let issuer = TokenCodec::new(b"wrong-secret-key");
        let codec = TokenCodec::new(TEST_SECRET);

        let token = issuer.issue(&Uuid::new_v4()).unwrap();

        assert!(matches!(codec.verify(&token), Err(JwtError::InvalidToken)));
        assert_eq!(codec.subject(&token), None);
    }

    #[test]
    fn test_malformed_tokens() {
        let codec = TokenCodec::new(TEST_SECRET);

        for token in ["", "garbage", "a.b.c", "Bearer x.y.z"] {
            assert!(
                matches!(codec.verify(token), Err(JwtError::InvalidToken)),
                "{token:?} should be rejected"
            );
            assert_eq!(codec.subject(token), None);
        }
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let codec = TokenCodec::new(TEST_SECRET);
        let token = codec.issue(&Uuid::new_v4()).unwrap();

        let other = codec.issue(&Uuid::new_v4()).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        parts[1] = other_parts[1];
        let forged = parts.join(".");

        assert!(codec.verify(&forged).is_err());
    }

    #[test]
    fn test_non_uuid_subject_is_no_identity() {
        let codec = TokenCodec::new(TEST_SECRET);
        let claims = SessionClaims::new("not-a-uuid".to_string(), Duration::hours(1));
        let token = codec.encode(&claims).unwrap();

        assert!(codec.verify(&token).is_ok());
        assert_eq!(codec.subject(&token), None);
    }

    #[test]
    fn test_claims_serialize_compactly() {
        let claims = SessionClaims::new("user-1".to_string(), Duration::hours(1));
        let json = serde_json::to_value(&claims).unwrap();

        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert_eq!(object["sub"], "user-1");
        assert!(object.contains_key("iat"));
        assert!(object.contains_key("exp"));
    }
}
