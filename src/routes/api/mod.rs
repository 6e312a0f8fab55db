pub mod auth;
pub mod payload;
pub mod project;
pub mod public;
mod router;
pub mod schedule;
pub mod settings;
pub mod user;

pub use router::router;
