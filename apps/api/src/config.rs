use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::assist::llm_client::DEFAULT_MODEL;
use crate::export::raster::MIN_SCALE;
use crate::render::Paper;

const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// File holding client-scoped AI credentials.
    pub credential_store: PathBuf,
    /// Raster capture scale, never below `MIN_SCALE`.
    pub export_scale: f32,
    pub paper: Paper,
    pub llm_model: String,
    /// How long an untouched document stays open.
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup, so tests need not touch the process env.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let export_scale = get("FOLIO_EXPORT_SCALE")
            .unwrap_or_else(|| "2.0".to_string())
            .parse::<f32>()
            .context("FOLIO_EXPORT_SCALE must be a number")?;

        let paper_key = get("FOLIO_PAPER").unwrap_or_else(|| "a4".to_string());
        let paper = Paper::from_key(&paper_key)
            .ok_or_else(|| anyhow!("FOLIO_PAPER must be 'a4' or 'letter', got '{paper_key}'"))?;

        let session_ttl = get("FOLIO_SESSION_TTL_SECS")
            .unwrap_or_else(|| DEFAULT_SESSION_TTL_SECS.to_string())
            .parse::<u64>()
            .context("FOLIO_SESSION_TTL_SECS must be a whole number of seconds")?;
        if session_ttl == 0 {
            return Err(anyhow!("FOLIO_SESSION_TTL_SECS must be greater than zero"));
        }

        Ok(Config {
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            credential_store: get("FOLIO_CREDENTIAL_STORE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".folio/credentials.json")),
            export_scale: export_scale.max(MIN_SCALE),
            paper,
            llm_model: get("FOLIO_LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            session_ttl: Duration::from_secs(session_ttl),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            credential_store: PathBuf::from(".folio/credentials.json"),
            export_scale: MIN_SCALE,
            paper: Paper::A4,
            llm_model: DEFAULT_MODEL.to_string(),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn make_env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.paper, Paper::A4);
        assert_eq!(config.export_scale, 2.0);
        assert_eq!(config.llm_model, DEFAULT_MODEL);
        assert_eq!(config.session_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn test_session_ttl() {
        let env = make_env(&[("FOLIO_SESSION_TTL_SECS", "900")]);
        let config = Config::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.session_ttl, Duration::from_secs(900));

        let env = make_env(&[("FOLIO_SESSION_TTL_SECS", "0")]);
        assert!(Config::from_lookup(|k| env.get(k).cloned()).is_err());
    }

    #[test]
    fn test_scale_is_clamped() {
        let env = make_env(&[("FOLIO_EXPORT_SCALE", "1.25")]);
        let config = Config::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.export_scale, 2.0);

        let env = make_env(&[("FOLIO_EXPORT_SCALE", "3")]);
        let config = Config::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.export_scale, 3.0);
    }

    #[test]
    fn test_bad_values_fail() {
        let env = make_env(&[("PORT", "eighty")]);
        assert!(Config::from_lookup(|k| env.get(k).cloned()).is_err());

        let env = make_env(&[("FOLIO_PAPER", "legal")]);
        assert!(Config::from_lookup(|k| env.get(k).cloned()).is_err());
    }

    #[test]
    fn test_letter_paper() {
        let env = make_env(&[("FOLIO_PAPER", "Letter")]);
        let config = Config::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.paper, Paper::Letter);
    }
}
