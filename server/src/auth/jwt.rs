//! JWT token service
//!
//! Issues and validates the bearer tokens used by the staff console
//! (cashier token generation, guard attendance, admin operations).

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::models::{Staff, StaffRole};

/// JWT settings, loaded from [`Config`](crate::core::config::Config).
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Signing secret (at least 32 bytes in production)
    pub secret: String,
    pub expiration_minutes: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "eventflow-development-secret-change-me!!".to_string(),
            expiration_minutes: 12 * 60,
            issuer: "eventflow-server".to_string(),
        }
    }
}

/// Claims carried in a staff token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Staff row id
    pub sub: String,
    pub username: String,
    /// ADMIN / CASHIER / GUARD
    pub role: StaffRole,
    /// Event a GUARD is posted at, if any
    pub assigned_event_id: Option<i64>,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),
}

#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn issue(&self, staff: &Staff) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: staff.id.to_string(),
            username: staff.username.clone(),
            role: staff.role,
            assigned_event_id: staff.assigned_event_id,
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(data.claims)
    }

    /// Extract the token from an `Authorization: Bearer <token>` header.
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

/// Authenticated staff context, injected by the auth middleware.
#[derive(Debug, Clone)]
pub struct CurrentStaff {
    pub id: i64,
    pub username: String,
    pub role: StaffRole,
    pub assigned_event_id: Option<i64>,
}

impl From<Claims> for CurrentStaff {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub.parse().unwrap_or_default(),
            username: claims.username,
            role: claims.role,
            assigned_event_id: claims.assigned_event_id,
        }
    }
}

impl CurrentStaff {
    pub fn is_admin(&self) -> bool {
        self.role == StaffRole::Admin
    }

    /// Admins pass every role gate.
    pub fn has_role(&self, roles: &[StaffRole]) -> bool {
        self.is_admin() || roles.contains(&self.role)
    }
}
