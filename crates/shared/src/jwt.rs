//! Token issuing and validation for API sessions.
//!
//! Two token lifetimes share one signing key: a short-lived access
//! token sent on every request and a long-lived refresh token that is
//! also tracked as a session row, so revoking the session kills the
//! refresh path even while the signature stays valid.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Claims;

/// Signing secret and token lifetimes.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC signing secret.
    pub secret: String,
    /// Access token lifetime in minutes.
    pub access_token_expires_minutes: i64,
    /// Refresh token lifetime in days.
    pub refresh_token_expires_days: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_token_expires_minutes: 15,
            refresh_token_expires_days: 7,
        }
    }
}

/// Errors from signing or validating tokens.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Signing failed.
    #[error("failed to sign token: {0}")]
    Sign(String),

    /// The token is past its expiry claim.
    #[error("token has expired")]
    Expired,

    /// Bad signature, malformed payload, or wrong algorithm.
    #[error("token rejected: {0}")]
    Rejected(String),
}

/// Issues and validates the signed tokens the API hands out.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Builds a service from the configured secret and lifetimes.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_token_expires_minutes),
            refresh_ttl: Duration::days(config.refresh_token_expires_days),
        }
    }

    /// Signs an access token scoped to one user in one organization.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Sign` if encoding fails.
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        org_id: Uuid,
        role: &str,
    ) -> Result<String, JwtError> {
        self.sign(user_id, org_id, role, self.access_ttl)
    }

    /// Signs a refresh token with the longer lifetime.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Sign` if encoding fails.
    pub fn generate_refresh_token(
        &self,
        user_id: Uuid,
        org_id: Uuid,
        role: &str,
    ) -> Result<String, JwtError> {
        self.sign(user_id, org_id, role, self.refresh_ttl)
    }

    fn sign(
        &self,
        user_id: Uuid,
        org_id: Uuid,
        role: &str,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let claims = Claims::new(user_id, org_id, role, Utc::now() + ttl);
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Sign(e.to_string()))
    }

    /// Checks the signature and expiry of a token and returns its
    /// claims.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` for a stale token and
    /// `JwtError::Rejected` for anything else that fails validation.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Rejected(e.to_string()),
            })
    }

    /// Seconds until a freshly issued access token expires.
    #[must_use]
    pub fn access_token_expires_in(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    /// Expiry instant for a refresh token issued now.
    #[must_use]
    pub fn refresh_token_expires_at(&self) -> DateTime<Utc> {
        Utc::now() + self.refresh_ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_secret(secret: &str) -> JwtService {
        JwtService::new(JwtConfig {
            secret: secret.to_string(),
            ..JwtConfig::default()
        })
    }

    #[test]
    fn test_access_token_round_trip() {
        let service = service_with_secret("site-office-secret");
        let user_id = Uuid::new_v4();
        let org_id = Uuid::new_v4();

        let token = service
            .generate_access_token(user_id, org_id, "operator")
            .unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.organization_id(), org_id);
        assert_eq!(claims.role, "operator");
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = service_with_secret("secret-a");
        let verifier = service_with_secret("secret-b");

        let token = issuer
            .generate_access_token(Uuid::new_v4(), Uuid::new_v4(), "owner")
            .unwrap();

        assert!(matches!(
            verifier.validate_token(&token),
            Err(JwtError::Rejected(_))
        ));
    }

    #[test]
    fn test_expired_token_reports_expired() {
        let service = JwtService::new(JwtConfig {
            secret: "site-office-secret".to_string(),
            access_token_expires_minutes: -5,
            refresh_token_expires_days: 7,
        });

        let token = service
            .generate_access_token(Uuid::new_v4(), Uuid::new_v4(), "viewer")
            .unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::Expired)
        ));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let service = service_with_secret("site-office-secret");
        assert!(service.validate_token("not.a.token").is_err());
    }

    #[test]
    fn test_refresh_outlives_access() {
        let service = service_with_secret("site-office-secret");
        let expires_in = service.access_token_expires_in();
        assert_eq!(expires_in, 15 * 60);
        assert!(service.refresh_token_expires_at() > Utc::now());
    }
}
