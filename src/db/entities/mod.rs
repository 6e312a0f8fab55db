#[allow(unused_imports)]
pub mod prelude {
    pub use super::account::Entity as Account;
    pub use super::project::Entity as Project;
    pub use super::schedule::Entity as Schedule;
    pub use super::session::Entity as Session;
    pub use super::user::Entity as User;
    pub use super::user_settings::Entity as UserSettings;
    pub use super::verification::Entity as Verification;
}

pub mod account;
pub mod project;
pub mod schedule;
pub mod session;
pub mod user;
pub mod user_settings;
pub mod verification;
