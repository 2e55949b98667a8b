use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://carsales.db?mode=rwc";
pub const DEFAULT_LOG_FILTER: &str = "carsales=info,service=info,sea_orm=warn";

/// Runtime settings.
///
/// Sources, lowest precedence first: built-in defaults, an optional
/// `carsales.toml` in the working directory, `CARSALES_*` environment
/// variables, then `DATABASE_URL`. A `.env` file is loaded into the
/// environment beforehand.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub log_filter: String,
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?
            .add_source(File::with_name("carsales").required(false))
            .add_source(Environment::with_prefix("CARSALES"));

        if let Ok(database_url) = std::env::var("DATABASE_URL") {
            builder = builder.set_override("database_url", database_url)?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }
}
