pub mod auth_service;
pub mod context;
pub mod crud_service;
pub mod project_service;
pub mod schedule_service;
pub mod session_service;
pub mod settings_service;
pub mod user_service;

pub use context::ServiceContext;
