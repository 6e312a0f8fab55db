use std::path::Path;

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "SHIFTBOOK";
    const SEPARATOR: &'static str = "__";
    /// Keys whose environment value is a comma separated list.
    const LIST_KEYS: &'static [&'static str] = &[];

    fn load_dotenv() {
        // Load .env from crate root (falls back to current dir if missing)
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let _ = dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv());
    }

    fn finalize(self) -> Self {
        self
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn from_env() -> Result<Self> {
        Self::load_dotenv();

        let mut environment = config_rs::Environment::with_prefix(Self::PREFIX)
            .prefix_separator("_")
            .separator(Self::SEPARATOR)
            .try_parsing(true);
        if !Self::LIST_KEYS.is_empty() {
            environment = environment.list_separator(",");
            for key in Self::LIST_KEYS {
                environment = environment.with_list_parse_key(key);
            }
        }

        let settings = config_rs::Config::builder()
            .add_source(environment)
            .build()
            .context("failed to read environment variables for config")?;

        let cfg = settings
            .try_deserialize::<Self>()
            .context("failed to deserialize environment into config")?
            .finalize();

        cfg.validate()?;
        Ok(cfg)
    }
}
