pub mod account_dao;
pub mod base;
pub mod base_traits;
mod context;
pub mod error;
pub mod project_dao;
pub mod schedule_dao;
pub mod session_dao;
pub mod settings_dao;
pub mod user_dao;
pub mod verification_dao;

pub use account_dao::AccountDao;
pub use base::{ColumnFilter, CompareOp, DaoBase, DaoPager, FilterOp, PaginatedResponse};
pub use base_traits::{
    HasCreatedAtColumn, HasIdActiveModel, HasOwnerColumn, TimestampedActiveModel,
};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use project_dao::ProjectDao;
pub use schedule_dao::{ScheduleDao, ScheduleRange};
pub use session_dao::SessionDao;
pub use settings_dao::SettingsDao;
pub use user_dao::UserDao;
pub use verification_dao::VerificationDao;
