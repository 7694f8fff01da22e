//! Startup configuration.
//!
//! API keys come from an optional TOML secrets file, with environment
//! variables taking precedence. Everything else has a default and may be
//! overridden through `LYRICFLOW_*` variables (see [`EnvVars`]).

mod env;

pub use env::EnvVars;

use crate::errors::ConfigError;
use crate::providers::GenerationSettings;
use env::{invalid, EnvParser};
use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Secrets file read when `LYRICFLOW_SECRETS_FILE` is unset and the file exists.
pub const DEFAULT_SECRETS_FILE: &str = ".streamlit/secrets.toml";

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// API keys for the external services.
#[derive(Clone, PartialEq, Eq)]
pub struct Secrets {
    /// Genius API token.
    pub genius_api_key: String,
    /// OpenAI API key.
    pub openai_api_key: String,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("genius_api_key", &"<redacted>")
            .field("openai_api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
struct SecretsFile {
    #[serde(rename = "GENIUS_API_KEY")]
    genius_api_key: Option<String>,
    #[serde(rename = "OPENAI_API_KEY")]
    openai_api_key: Option<String>,
}

impl SecretsFile {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API keys.
    pub secrets: Secrets,
    /// Model and temperature for both pipeline stages.
    pub generation: GenerationSettings,
    /// Server listen address.
    pub bind: SocketAddr,
    /// Overrides the OpenAI API base URL.
    pub openai_base_url: Option<String>,
    /// HTTP client timeout. `None` keeps the client default.
    pub timeout: Option<Duration>,
    /// Enables debug logging and stage output logging.
    pub verbose: bool,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a secret is missing, a value is out of range, or
    /// the secrets file cannot be read.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup` instead of the process
    /// environment.
    ///
    /// # Errors
    ///
    /// See [`from_env`](Self::from_env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::load(lookup, Some(Path::new(DEFAULT_SECRETS_FILE)))
    }

    /// Reads `default_secrets` when no secrets file is configured and it
    /// exists. `None` skips the fallback.
    fn load(
        lookup: impl Fn(&str) -> Option<String>,
        default_secrets: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let env = EnvParser::new(lookup);

        let file = match env.string(EnvVars::SECRETS_FILE) {
            Some(path) => SecretsFile::load(Path::new(&path))?,
            None => match default_secrets {
                Some(default) if default.is_file() => SecretsFile::load(default)?,
                _ => SecretsFile::default(),
            },
        };

        let secret = |name: &str, from_file: Option<String>| {
            env.string(name)
                .or_else(|| from_file.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()))
                .ok_or_else(|| ConfigError::MissingSecret {
                    name: name.to_string(),
                })
        };
        let secrets = Secrets {
            genius_api_key: secret(EnvVars::GENIUS_API_KEY, file.genius_api_key)?,
            openai_api_key: secret(EnvVars::OPENAI_API_KEY, file.openai_api_key)?,
        };

        let mut generation = GenerationSettings::default();
        if let Some(model) = env.string(EnvVars::MODEL) {
            generation = generation.with_model(model);
        }
        if let Some(temperature) = env.f32(EnvVars::TEMPERATURE, 0.0, 2.0)? {
            generation = generation.with_temperature(temperature);
        }

        let bind_raw = env
            .string(EnvVars::BIND)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| invalid(EnvVars::BIND, format!("'{bind_raw}': {e}")))?;

        let timeout = env
            .u64(EnvVars::TIMEOUT_SECS, 1, 600)?
            .map(Duration::from_secs);

        Ok(Self {
            secrets,
            generation,
            bind,
            openai_base_url: env.string(EnvVars::OPENAI_BASE_URL),
            timeout,
            verbose: env.bool(EnvVars::VERBOSE)?.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    fn secrets_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_env_only() {
        let config = AppConfig::load(
            lookup(&[("GENIUS_API_KEY", "g"), ("OPENAI_API_KEY", "o")]),
            None,
        )
        .unwrap();

        assert_eq!(config.secrets.genius_api_key, "g");
        assert_eq!(config.secrets.openai_api_key, "o");
        assert_eq!(config.generation, GenerationSettings::default());
        assert_eq!(config.bind, "127.0.0.1:8501".parse::<SocketAddr>().unwrap());
        assert_eq!(config.timeout, None);
        assert!(!config.verbose);
    }

    #[test]
    fn test_file_with_env_override() {
        let file = secrets_file("GENIUS_API_KEY = \"from-file\"\nOPENAI_API_KEY = \"file-openai\"\n");
        let path = file.path().to_string_lossy().to_string();

        let config = AppConfig::from_lookup(lookup(&[
            ("LYRICFLOW_SECRETS_FILE", path.as_str()),
            ("OPENAI_API_KEY", "from-env"),
        ]))
        .unwrap();

        assert_eq!(config.secrets.genius_api_key, "from-file");
        assert_eq!(config.secrets.openai_api_key, "from-env");
    }

    #[test]
    fn test_missing_secret() {
        let file = secrets_file("GENIUS_API_KEY = \"g\"\n");
        let path = file.path().to_string_lossy().to_string();

        let err = AppConfig::from_lookup(lookup(&[("LYRICFLOW_SECRETS_FILE", path.as_str())])).unwrap_err();

        assert!(matches!(err, ConfigError::MissingSecret { ref name } if name == "OPENAI_API_KEY"));
    }

    #[test]
    fn test_bad_secrets_file() {
        let file = secrets_file("GENIUS_API_KEY = ");
        let path = file.path().to_string_lossy().to_string();

        let err = AppConfig::from_lookup(lookup(&[("LYRICFLOW_SECRETS_FILE", path.as_str())])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = AppConfig::from_lookup(lookup(&[("LYRICFLOW_SECRETS_FILE", "/nonexistent/secrets.toml")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_optional_settings() {
        let config = AppConfig::load(lookup(&[
            ("GENIUS_API_KEY", "g"),
            ("OPENAI_API_KEY", "o"),
            ("LYRICFLOW_MODEL", "gpt-4o-mini"),
            ("LYRICFLOW_TEMPERATURE", "0.2"),
            ("LYRICFLOW_BIND", "0.0.0.0:9000"),
            ("LYRICFLOW_OPENAI_BASE_URL", "http://localhost:1234/v1"),
            ("LYRICFLOW_TIMEOUT_SECS", "5"),
            ("LYRICFLOW_VERBOSE", "true"),
        ]), None)
        .unwrap();

        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.openai_base_url.as_deref(), Some("http://localhost:1234/v1"));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert!(config.verbose);
    }

    #[test]
    fn test_invalid_settings() {
        let base = [("GENIUS_API_KEY", "g"), ("OPENAI_API_KEY", "o")];
        for (name, value) in [
            ("LYRICFLOW_TEMPERATURE", "3"),
            ("LYRICFLOW_BIND", "not-an-address"),
            ("LYRICFLOW_TIMEOUT_SECS", "0"),
        ] {
            let mut vars = base.to_vec();
            vars.push((name, value));
            let err = AppConfig::load(lookup(&vars), None).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { .. }), "{name}");
        }
    }

    #[test]
    fn test_default_secrets_file_fallback() {
        let file = secrets_file("GENIUS_API_KEY = \"g\"\nOPENAI_API_KEY = \"o\"\n");

        let config = AppConfig::load(lookup(&[]), Some(file.path())).unwrap();
        assert_eq!(config.secrets.openai_api_key, "o");

        let missing = Path::new("/nonexistent/secrets.toml");
        let err = AppConfig::load(lookup(&[]), Some(missing)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret { .. }));

        let err = AppConfig::load(lookup(&[("LYRICFLOW_SECRETS_FILE", "  ")]), None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret { .. }));
    }

    #[test]
    fn test_secrets_debug_is_redacted() {
        let secrets = Secrets {
            genius_api_key: "g-secret".to_string(),
            openai_api_key: "sk-secret".to_string(),
        };
        let debug = format!("{secrets:?}");
        assert!(!debug.contains("g-secret"));
        assert!(!debug.contains("sk-secret"));
    }
}
