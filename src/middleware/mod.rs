mod guards;
mod json_error;
mod panic;
mod session_cookie;

pub use guards::{AuthSession, MaybeSession};
pub use json_error::json_error_middleware;
pub use panic::catch_panic_layer;
pub use session_cookie::session_cookie_middleware;
pub(crate) use session_cookie::RefreshedSession;
