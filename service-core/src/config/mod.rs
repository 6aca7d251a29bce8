use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on requests handled at once. This is the deployment
    /// scaling knob, applied as a global concurrency limit by the server.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_port() -> u16 {
    8080
}

fn default_max_concurrency() -> usize {
    10
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
