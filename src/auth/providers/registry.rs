use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{db::dao::account_dao::ProviderTokens, error::AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialProviderId {
    Google,
}

impl SocialProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            SocialProviderId::Google => "google",
        }
    }
}

impl std::str::FromStr for SocialProviderId {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "google" => Ok(SocialProviderId::Google),
            other => Err(AppError::bad_request(format!(
                "Unsupported social provider: {other}"
            ))),
        }
    }
}

/// What a provider tells us about the person who just signed in.
#[derive(Debug, Clone)]
pub struct SocialProfile {
    pub account_id: String,
    pub email: String,
    pub email_verified: bool,
    pub name: String,
    pub image: Option<String>,
    pub tokens: ProviderTokens,
}

#[async_trait]
pub trait SocialProvider: Send + Sync {
    fn id(&self) -> SocialProviderId;

    /// URL the browser is sent to; `state` comes back on the callback.
    fn authorization_url(&self, state: &str, redirect_uri: &str) -> Result<String, AppError>;

    async fn exchange_code(&self, code: &str, redirect_uri: &str)
    -> Result<SocialProfile, AppError>;
}

#[derive(Clone, Default)]
pub struct SocialProviders {
    providers: HashMap<SocialProviderId, Arc<dyn SocialProvider>>,
}

impl SocialProviders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: Arc<dyn SocialProvider>) -> Result<Self, AppError> {
        self.add(provider)?;
        Ok(self)
    }

    pub fn add(&mut self, provider: Arc<dyn SocialProvider>) -> Result<(), AppError> {
        let id = provider.id();
        if self.providers.contains_key(&id) {
            return Err(AppError::conflict(format!(
                "Social provider already registered: {}",
                id.as_str()
            )));
        }
        self.providers.insert(id, provider);
        Ok(())
    }

    pub fn get(&self, id: SocialProviderId) -> Result<&dyn SocialProvider, AppError> {
        self.providers
            .get(&id)
            .map(|provider| provider.as_ref())
            .ok_or_else(|| {
                AppError::bad_request(format!(
                    "Social provider not configured: {}",
                    id.as_str()
                ))
            })
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
