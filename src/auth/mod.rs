pub mod bootstrap;
pub mod password;
pub mod providers;
pub mod session_token;
pub mod verification;
