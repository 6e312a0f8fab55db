use sea_orm::DatabaseConnection;

use super::{
    AccountDao, DaoBase, ProjectDao, ScheduleDao, SessionDao, SettingsDao, UserDao,
    VerificationDao,
};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn user(&self) -> UserDao {
        DaoBase::new(&self.db)
    }

    pub fn session(&self) -> SessionDao {
        DaoBase::new(&self.db)
    }

    pub fn account(&self) -> AccountDao {
        DaoBase::new(&self.db)
    }

    pub fn verification(&self) -> VerificationDao {
        DaoBase::new(&self.db)
    }

    pub fn project(&self) -> ProjectDao {
        DaoBase::new(&self.db)
    }

    pub fn schedule(&self) -> ScheduleDao {
        DaoBase::new(&self.db)
    }

    pub fn settings(&self) -> SettingsDao {
        DaoBase::new(&self.db)
    }
}
