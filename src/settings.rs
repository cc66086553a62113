use config::{Config, Environment};
use serde::Deserialize;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    /// SQLite database file, created on first start.
    pub db_path: String,
    pub listen_addr: String,
}

impl Settings {
    /// Reads `DB_PATH` and `LISTEN_ADDR` from the process environment, after
    /// loading a `.env` file when one exists.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::load(Environment::default())
    }

    pub fn load(source: Environment) -> anyhow::Result<Self> {
        let settings = Config::builder()
            .set_default("listen_addr", DEFAULT_LISTEN_ADDR)?
            .add_source(source)
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
