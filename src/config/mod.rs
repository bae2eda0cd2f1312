use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Postgres connection URL. Optional so `--demo` can run without one.
    pub database_url: Option<String>,
    /// Key for the generative-text API; summaries fall back to static text
    /// when absent.
    pub gemini_api_key: Option<String>,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,
    /// Directory that generated legal documents are written to
    #[serde(default = "default_output_dir")]
    pub studio_output_dir: String,
    /// Number the marketing `wa.me` links point at
    #[serde(default = "default_whatsapp_number")]
    pub studio_whatsapp_number: String,
}

fn default_gemini_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_output_dir() -> String {
    "documents".to_string()
}

fn default_whatsapp_number() -> String {
    "1234567890".to_string()
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables from a `.env` file are loaded first if one exists.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>().context("invalid environment configuration")?;

        Ok(config)
    }

    /// The database URL, required outside demo mode
    pub fn database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL must be set (or run with --demo)")
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    Config::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_settings() {
        let vars = vec![("DATABASE_URL".to_string(), "postgres://localhost/studio".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.database_url().unwrap(), "postgres://localhost/studio");
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_model, "gemini-3-flash-preview");
        assert_eq!(config.studio_output_dir, "documents");
        assert_eq!(config.studio_whatsapp_number, "1234567890");
    }

    #[test]
    fn missing_database_url_is_an_error_only_when_asked_for() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert!(config.database_url().is_err());
    }
}
