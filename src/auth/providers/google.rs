use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;

use super::registry::{SocialProfile, SocialProvider, SocialProviderId};
use crate::{config::GoogleConfig, db::dao::account_dao::ProviderTokens, error::AppError};

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SCOPES: &str = "openid email profile";

/// Google OAuth2 authorization-code flow.
pub struct GoogleProvider {
    client_id: String,
    client_secret: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
    refresh_token: Option<String>,
    id_token: Option<String>,
    scope: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    name: Option<String>,
    picture: Option<String>,
}

impl GoogleProvider {
    pub fn new(cfg: &GoogleConfig) -> Self {
        Self {
            client_id: cfg.client_id.clone(),
            client_secret: cfg.client_secret.clone(),
            http: Client::new(),
        }
    }

    async fn fetch_tokens(&self, code: &str, redirect_uri: &str) -> Result<TokenResponse, AppError> {
        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|err| AppError::internal_with_source("Google token request failed", err))?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "google rejected the authorization code");
            return Err(AppError::unauthorized("Google sign-in failed"));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|err| AppError::internal_with_source("Unexpected Google token response", err))
    }

    async fn fetch_user(&self, access_token: &str) -> Result<UserInfo, AppError> {
        let response = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|err| AppError::internal_with_source("Google userinfo request failed", err))?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "google userinfo request was rejected");
            return Err(AppError::unauthorized("Google sign-in failed"));
        }

        response
            .json::<UserInfo>()
            .await
            .map_err(|err| AppError::internal_with_source("Unexpected Google userinfo response", err))
    }
}

#[async_trait]
impl SocialProvider for GoogleProvider {
    fn id(&self) -> SocialProviderId {
        SocialProviderId::Google
    }

    fn authorization_url(&self, state: &str, redirect_uri: &str) -> Result<String, AppError> {
        let url = Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("state", state),
                ("access_type", "offline"),
                ("prompt", "select_account"),
            ],
        )
        .map_err(|err| AppError::internal_with_source("Failed to build Google URL", err))?;
        Ok(url.to_string())
    }

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<SocialProfile, AppError> {
        let tokens = self.fetch_tokens(code, redirect_uri).await?;
        let user = self.fetch_user(&tokens.access_token).await?;

        let email = user
            .email
            .ok_or_else(|| AppError::bad_request("Google account has no email address"))?;
        let name = user
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| email.clone());

        Ok(SocialProfile {
            account_id: user.sub,
            email,
            email_verified: user.email_verified,
            name,
            image: user.picture,
            tokens: ProviderTokens {
                access_token: Some(tokens.access_token),
                refresh_token: tokens.refresh_token,
                id_token: tokens.id_token,
                access_token_expires_at: tokens
                    .expires_in
                    .map(|secs| (Utc::now() + Duration::seconds(secs)).fixed_offset()),
                scope: tokens.scope,
            },
        })
    }
}
