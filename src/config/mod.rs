pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{
    AppConfig, AuthConfig, DatabaseConfig, GeneralConfig, GoogleConfig, LoggingConfig,
    SettingsDefaults,
};
pub use envconfig::EnvConfig;
