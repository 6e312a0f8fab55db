use chrono::{DateTime, Duration, FixedOffset, Utc};
use uuid::Uuid;

use crate::{
    auth::session_token::generate_token,
    config::AuthConfig,
    db::dao::{DaoBase, DaoLayerError, SessionDao, UserDao, session_dao::NewSession},
    db::entities::{session, user},
    error::AppError,
    services::crud_service::{CrudErrors, CrudOp, CrudService},
};

/// Request details recorded on a new session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub user: user::Model,
    pub session: session::Model,
    /// The expiry was pushed out on this lookup.
    pub refreshed: bool,
}

#[derive(Clone)]
pub struct SessionService<'a> {
    session_dao: SessionDao,
    user_dao: UserDao,
    cfg: &'a AuthConfig,
}

impl<'a> SessionService<'a> {
    pub fn new(session_dao: SessionDao, user_dao: UserDao, cfg: &'a AuthConfig) -> Self {
        Self {
            session_dao,
            user_dao,
            cfg,
        }
    }

    pub fn config(&self) -> &'a AuthConfig {
        self.cfg
    }

    fn ttl(&self) -> Duration {
        Duration::days(self.cfg.session_ttl_days)
    }

    fn update_age(&self) -> Duration {
        Duration::hours(self.cfg.session_update_age_hours)
    }

    /// `persistent = false` marks a browser-session cookie; refreshes keep
    /// it that way.
    pub async fn issue(
        &self,
        user_id: Uuid,
        meta: ClientMeta,
        persistent: bool,
    ) -> Result<session::Model, AppError> {
        let new = NewSession {
            user_id,
            token: generate_token(),
            expires_at: Utc::now().fixed_offset() + self.ttl(),
            ip_address: meta.ip_address,
            user_agent: meta.user_agent,
            persistent,
        };
        self.session_dao
            .create_session(new)
            .await
            .map_err(|err| self.map_error(CrudOp::Create, err))
    }

    pub async fn resolve(&self, token: &str) -> Result<Option<ResolvedSession>, AppError> {
        self.resolve_at(token, Utc::now().fixed_offset()).await
    }

    /// Looks up a session token, dropping it when expired and sliding its
    /// expiry forward once `session_update_age_hours` have passed since the
    /// last extension.
    pub async fn resolve_at(
        &self,
        token: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<Option<ResolvedSession>, AppError> {
        let Some(session) = self.session_dao.find_by_token(token).await? else {
            return Ok(None);
        };

        if session.expires_at <= now {
            self.session_dao.delete_by_token(token).await?;
            tracing::debug!(session_id = %session.id, "expired session removed");
            return Ok(None);
        }

        let user = match self.user_dao.find_by_id(session.user_id).await {
            Ok(user) => user,
            Err(DaoLayerError::NotFound { .. }) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let last_extended = session.expires_at - self.ttl();
        if now - last_extended < self.update_age() {
            return Ok(Some(ResolvedSession {
                user,
                session,
                refreshed: false,
            }));
        }

        let session = self
            .session_dao
            .extend(session, now + self.ttl())
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))?;
        Ok(Some(ResolvedSession {
            user,
            session,
            refreshed: true,
        }))
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<session::Model>, AppError> {
        Ok(self
            .session_dao
            .list_active_for_user(user_id, Utc::now().fixed_offset())
            .await?)
    }

    /// Only the owner's sessions can be revoked; returns whether one was.
    pub async fn revoke(&self, user_id: Uuid, token: &str) -> Result<bool, AppError> {
        let revoked = self.session_dao.delete_for_user(user_id, token).await?;
        if revoked {
            tracing::info!(user_id = %user_id, "session revoked");
        }
        Ok(revoked)
    }

    pub async fn revoke_token(&self, token: &str) -> Result<bool, AppError> {
        Ok(self.session_dao.delete_by_token(token).await?)
    }
}

impl CrudService for SessionService<'_> {
    type Dao = SessionDao;

    fn dao(&self) -> &Self::Dao {
        &self.session_dao
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            create_failed: "Create session failed",
            not_found: "Session not found",
            update_failed: "Session refresh failed",
            ..CrudErrors::default()
        }
    }
}
