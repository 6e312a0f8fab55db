use std::sync::Arc;

use crate::{config::AuthConfig, error::AppError};

use super::{
    providers::{GoogleProvider, SocialProviders},
    verification::VerificationKeys,
};

/// Registers every social provider that has credentials configured.
pub fn build_social_providers(cfg: &AuthConfig) -> Result<SocialProviders, AppError> {
    let mut providers = SocialProviders::new();
    if let Some(google) = cfg.google.as_ref() {
        providers.add(Arc::new(GoogleProvider::new(google)))?;
        tracing::info!("google sign-in enabled");
    }
    Ok(providers)
}

pub fn build_verification_keys(cfg: &AuthConfig) -> VerificationKeys {
    VerificationKeys::from_secret(cfg.secret.as_bytes())
}
