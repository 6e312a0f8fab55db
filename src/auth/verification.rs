use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// HS256 keys for email verification links.
#[derive(Clone)]
pub struct VerificationKeys {
    enc: EncodingKey,
    dec: DecodingKey,
}

impl VerificationKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationClaims {
    /// Email address being verified.
    pub sub: String,
    /// One-time id, mirrored in the `verifications` table.
    pub jti: String,
    pub iat: usize,
    pub exp: usize,
}

impl VerificationClaims {
    pub fn new(email: &str, jti: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: email.to_string(),
            jti: jti.to_string(),
            iat: now.timestamp().max(0) as usize,
            exp: (now + ttl).timestamp().max(0) as usize,
        }
    }
}

pub fn encode_verification(
    keys: &VerificationKeys,
    claims: &VerificationClaims,
) -> Result<String, AppError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".into());

    encode(&header, claims, &keys.enc)
        .map_err(|err| AppError::internal_with_source("Token encoding failed", err))
}

pub fn decode_verification(
    keys: &VerificationKeys,
    token: &str,
) -> Result<VerificationClaims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    decode::<VerificationClaims>(token, &keys.dec, &validation)
        .map(|data| data.claims)
        .map_err(|err| {
            tracing::debug!(error = %err, "rejected verification token");
            AppError::bad_request("Invalid or expired token")
        })
}
