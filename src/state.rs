use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    auth::{providers::SocialProviders, verification::VerificationKeys},
    config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub social_providers: SocialProviders,
    pub verification_keys: VerificationKeys,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: DatabaseConnection,
        social_providers: SocialProviders,
        verification_keys: VerificationKeys,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            db,
            social_providers,
            verification_keys,
        })
    }
}
