use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Default Gemini API base. Overridable so tests and self-hosted gateways can
/// point the service elsewhere.
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_IMAGE_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone)]
pub struct FacilityImageConfig {
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub models: ModelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    /// API key for the generative-image endpoint. Supplied via environment,
    /// never present in source or configuration files committed to the repo.
    pub api_key: Secret<String>,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Model used for facility photo generation.
    pub image_model: String,
}

impl FacilityImageConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(FacilityImageConfig {
            common: common_config,
            google: GoogleConfig {
                api_key: Secret::new(get_env("GOOGLE_API_KEY", None, is_prod)?),
                api_base: get_env("GENAI_API_BASE", Some(DEFAULT_API_BASE), is_prod)?,
            },
            models: ModelConfig {
                image_model: get_env("GENAI_IMAGE_MODEL", Some(DEFAULT_IMAGE_MODEL), is_prod)?,
            },
        })
    }
}

/// Read an environment variable. Defaults only apply outside production;
/// a production deployment must set every value explicitly.
fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    if let Ok(val) = env::var(key) {
        return Ok(val);
    }

    match default {
        Some(def) if !is_prod => Ok(def.to_string()),
        _ => Err(AppError::ConfigError(anyhow::anyhow!(
            "{key} is required but not set"
        ))),
    }
}
