pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: i64 = 3000;
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:3000",
    "http://127.0.0.1:5173",
];
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info";
pub const DEFAULT_DB_MAX_CONNECTIONS: i64 = 10;
pub const DEFAULT_DB_MIN_IDLE: i64 = 2;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
pub const DEFAULT_COOKIE_NAME: &str = "shiftbook.session_token";
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 7;
pub const DEFAULT_SESSION_UPDATE_AGE_HOURS: i64 = 24;
pub const DEFAULT_VERIFICATION_TTL_MINUTES: i64 = 60;
pub const DEV_AUTH_SECRET: &str = "shiftbook-dev-secret-change-me";

pub const DEFAULT_HOURLY_RATE: f64 = 147.0;
pub const DEFAULT_TAX_RATE: f64 = 0.30;
pub const DEFAULT_MONTHLY_GOAL_HOURS: f64 = 160.0;
pub const DEFAULT_DATE_FORMAT: &str = "en-US";
pub const DEFAULT_TIME_FORMAT: &str = "24h";
pub const DEFAULT_TIMEZONE: &str = "Europe/Stockholm";
