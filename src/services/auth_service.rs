use chrono::{Duration, Utc};
use reqwest::Url;

use crate::{
    auth::{
        password::{hash_password, verify_password},
        providers::{SocialProfile, SocialProviderId, SocialProviders},
        session_token::generate_token,
        verification::{
            VerificationClaims, VerificationKeys, decode_verification, encode_verification,
        },
    },
    config::AuthConfig,
    db::dao::{AccountDao, DaoBase, UserDao, VerificationDao, user_dao::normalize_email},
    db::entities::{session, user},
    error::AppError,
    services::session_service::{ClientMeta, SessionService},
};

const CALLBACK_PATH: &str = "/api/auth/callback";
const VERIFY_PATH: &str = "/api/auth/verify-email";
const OAUTH_STATE_TTL_MINUTES: i64 = 10;
const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone)]
pub struct SignUp {
    pub name: String,
    pub email: String,
    pub password: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: user::Model,
    pub session: session::Model,
}

#[derive(Debug, Clone)]
pub struct SocialSignIn {
    pub signed_in: SignedIn,
    /// Where the browser goes after the callback.
    pub redirect_to: String,
}

fn oauth_state_identifier(state: &str) -> String {
    format!("oauth-state:{state}")
}

fn email_verification_identifier(email: &str) -> String {
    format!("email-verification:{email}")
}

#[derive(Clone)]
pub struct AuthService<'a> {
    user_dao: UserDao,
    account_dao: AccountDao,
    verification_dao: VerificationDao,
    sessions: SessionService<'a>,
    providers: &'a SocialProviders,
    keys: &'a VerificationKeys,
}

impl<'a> AuthService<'a> {
    pub fn new(
        user_dao: UserDao,
        account_dao: AccountDao,
        verification_dao: VerificationDao,
        sessions: SessionService<'a>,
        providers: &'a SocialProviders,
        keys: &'a VerificationKeys,
    ) -> Self {
        Self {
            user_dao,
            account_dao,
            verification_dao,
            sessions,
            providers,
            keys,
        }
    }

    fn cfg(&self) -> &'a AuthConfig {
        self.sessions.config()
    }

    pub async fn sign_up(&self, input: SignUp, meta: ClientMeta) -> Result<SignedIn, AppError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("Name is required"));
        }
        let email = validate_email(&input.email)?;

        if self.user_dao.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User already exists"));
        }

        let password_hash = hash_password(&input.password)?;
        let user = self
            .user_dao
            .create_user(name, &email, false, input.image)
            .await?;
        self.account_dao
            .create_credential(user.id, password_hash)
            .await?;
        let session = self.sessions.issue(user.id, meta, true).await?;

        tracing::info!(user_id = %user.id, "user signed up");
        Ok(SignedIn { user, session })
    }

    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        remember_me: bool,
        meta: ClientMeta,
    ) -> Result<SignedIn, AppError> {
        let user = self
            .user_dao
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        let hash = self
            .account_dao
            .find_credential(user.id)
            .await?
            .and_then(|account| account.password)
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        if !verify_password(password, &hash) {
            tracing::info!(user_id = %user.id, "rejected sign-in attempt");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let session = self.sessions.issue(user.id, meta, remember_me).await?;
        tracing::info!(user_id = %user.id, "user signed in");
        Ok(SignedIn { user, session })
    }

    pub async fn sign_out(&self, token: &str) -> Result<(), AppError> {
        if self.sessions.revoke_token(token).await? {
            tracing::info!("user signed out");
        }
        Ok(())
    }

    /// Stores a CSRF state and returns the provider's authorization URL.
    pub async fn start_social(
        &self,
        provider: &str,
        callback_url: Option<&str>,
    ) -> Result<String, AppError> {
        let id: SocialProviderId = provider.parse()?;
        let provider = self.providers.get(id)?;
        let state = generate_token();
        let redirect_to = safe_redirect(self.cfg(), callback_url);
        let now = Utc::now().fixed_offset();

        self.verification_dao
            .create_verification(
                &oauth_state_identifier(&state),
                &redirect_to,
                now + Duration::minutes(OAUTH_STATE_TTL_MINUTES),
            )
            .await?;
        if let Err(err) = self.verification_dao.purge_expired(now).await {
            tracing::warn!(error = %err, "failed to purge expired verifications");
        }

        provider.authorization_url(&state, &self.callback_uri(id))
    }

    pub async fn finish_social(
        &self,
        provider: &str,
        code: &str,
        state: &str,
        meta: ClientMeta,
    ) -> Result<SocialSignIn, AppError> {
        let id: SocialProviderId = provider.parse()?;
        let provider = self.providers.get(id)?;

        let pending = self
            .verification_dao
            .find_active(
                &oauth_state_identifier(state),
                None,
                Utc::now().fixed_offset(),
            )
            .await?
            .ok_or_else(|| AppError::bad_request("Invalid or expired OAuth state"))?;
        self.verification_dao.delete(pending.id).await?;

        let profile = provider.exchange_code(code, &self.callback_uri(id)).await?;
        let user = self.link_social_user(id, profile).await?;
        let session = self.sessions.issue(user.id, meta, true).await?;

        tracing::info!(user_id = %user.id, provider = id.as_str(), "user signed in");
        Ok(SocialSignIn {
            signed_in: SignedIn { user, session },
            redirect_to: pending.value,
        })
    }

    /// Existing provider accounts get fresh tokens. A new account is attached
    /// to the user with the same email only when the provider verified that
    /// email; otherwise a new user is created.
    async fn link_social_user(
        &self,
        id: SocialProviderId,
        profile: SocialProfile,
    ) -> Result<user::Model, AppError> {
        if let Some(account) = self
            .account_dao
            .find_by_provider(id.as_str(), &profile.account_id)
            .await?
        {
            let user_id = account.user_id;
            self.account_dao.store_tokens(account, profile.tokens).await?;
            return Ok(self.user_dao.find_by_id(user_id).await?);
        }

        let user = match self.user_dao.find_by_email(&profile.email).await? {
            Some(user) if profile.email_verified && !user.email_verified => {
                self.user_dao.mark_email_verified(user.id).await?
            }
            Some(user) if profile.email_verified => user,
            Some(user) => {
                tracing::info!(
                    user_id = %user.id,
                    provider = id.as_str(),
                    "refusing to link unverified social email"
                );
                return Err(AppError::conflict(
                    "An account with this email already exists",
                ));
            }
            None => {
                self.user_dao
                    .create_user(
                        &profile.name,
                        &profile.email,
                        profile.email_verified,
                        profile.image.clone(),
                    )
                    .await?
            }
        };

        self.account_dao
            .create_social(user.id, id.as_str(), &profile.account_id, profile.tokens)
            .await?;
        Ok(user)
    }

    /// Unknown or already verified addresses succeed silently.
    pub async fn send_verification_email(&self, email: &str) -> Result<(), AppError> {
        let email = validate_email(email)?;
        let Some(user) = self.user_dao.find_by_email(&email).await? else {
            tracing::debug!("verification requested for unknown email");
            return Ok(());
        };
        if user.email_verified {
            return Ok(());
        }

        let ttl = Duration::minutes(self.cfg().verification_ttl_minutes);
        let jti = generate_token();
        self.verification_dao
            .create_verification(
                &email_verification_identifier(&email),
                &jti,
                Utc::now().fixed_offset() + ttl,
            )
            .await?;

        let token = encode_verification(self.keys, &VerificationClaims::new(&email, &jti, ttl))?;
        let link = self.verify_link(&token)?;
        tracing::info!(user_id = %user.id, link = %link, "verification email queued");
        Ok(())
    }

    pub async fn verify_email(&self, token: &str) -> Result<user::Model, AppError> {
        let claims = decode_verification(self.keys, token)?;
        let email = normalize_email(&claims.sub);

        let pending = self
            .verification_dao
            .find_active(
                &email_verification_identifier(&email),
                Some(&claims.jti),
                Utc::now().fixed_offset(),
            )
            .await?
            .ok_or_else(|| AppError::bad_request("Invalid or expired token"))?;
        self.verification_dao.delete(pending.id).await?;

        let user = self
            .user_dao
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        if user.email_verified {
            return Ok(user);
        }

        let user = self.user_dao.mark_email_verified(user.id).await?;
        tracing::info!(user_id = %user.id, "email verified");
        Ok(user)
    }

    fn callback_uri(&self, id: SocialProviderId) -> String {
        format!(
            "{}{CALLBACK_PATH}/{}",
            self.cfg().base_url.trim_end_matches('/'),
            id.as_str()
        )
    }

    fn verify_link(&self, token: &str) -> Result<Url, AppError> {
        let base = format!("{}{VERIFY_PATH}", self.cfg().base_url.trim_end_matches('/'));
        Url::parse_with_params(&base, &[("token", token)])
            .map_err(|err| AppError::internal_with_source("Failed to build verification link", err))
    }
}

fn validate_email(raw: &str) -> Result<String, AppError> {
    let email = normalize_email(raw);
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.contains('@')
        })
        && !email.chars().any(char::is_whitespace);
    if !valid {
        return Err(AppError::bad_request("Invalid email address"));
    }
    Ok(email)
}

/// Relative paths and URLs on the frontend origin are kept; anything else
/// falls back to the frontend root.
fn safe_redirect(cfg: &AuthConfig, callback_url: Option<&str>) -> String {
    let frontend = cfg.frontend_url.trim_end_matches('/');
    match callback_url.map(str::trim).filter(|url| !url.is_empty()) {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => {
            format!("{frontend}{path}")
        }
        Some(url) if url == frontend || url.starts_with(&format!("{frontend}/")) => {
            url.to_string()
        }
        _ => frontend.to_string(),
    }
}
