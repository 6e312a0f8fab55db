use sea_orm::DatabaseConnection;

use crate::{
    config::{AuthConfig, SettingsDefaults},
    db::dao::DaoContext,
    services::{
        auth_service::AuthService, project_service::ProjectService,
        schedule_service::ScheduleService, session_service::SessionService,
        settings_service::SettingsService, user_service::UserService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db)
    }

    pub fn user(&self) -> UserService {
        UserService::new(self.daos.user())
    }

    pub fn project(&self) -> ProjectService {
        ProjectService::new(self.daos.project(), self.daos.schedule())
    }

    pub fn settings<'a>(&self, defaults: &'a SettingsDefaults) -> SettingsService<'a> {
        SettingsService::new(self.daos.settings(), defaults)
    }

    pub fn schedule<'a>(&self, defaults: &'a SettingsDefaults) -> ScheduleService<'a> {
        ScheduleService::new(
            self.daos.schedule(),
            self.daos.project(),
            self.settings(defaults),
        )
    }

    pub fn session<'a>(&self, cfg: &'a AuthConfig) -> SessionService<'a> {
        SessionService::new(self.daos.session(), self.daos.user(), cfg)
    }

    pub fn auth<'a>(&self, state: &'a AppState) -> AuthService<'a> {
        AuthService::new(
            self.daos.user(),
            self.daos.account(),
            self.daos.verification(),
            self.session(&state.config.auth),
            &state.social_providers,
            &state.verification_keys,
        )
    }
}
