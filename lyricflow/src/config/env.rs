//! Environment variable parsing.

use crate::errors::ConfigError;

/// Environment variable names read at startup.
pub struct EnvVars;

impl EnvVars {
    /// Genius API token.
    pub const GENIUS_API_KEY: &'static str = "GENIUS_API_KEY";
    /// OpenAI API key.
    pub const OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";
    /// Path of the TOML secrets file.
    pub const SECRETS_FILE: &'static str = "LYRICFLOW_SECRETS_FILE";
    /// Chat model name.
    pub const MODEL: &'static str = "LYRICFLOW_MODEL";
    /// Sampling temperature, 0.0 to 2.0.
    pub const TEMPERATURE: &'static str = "LYRICFLOW_TEMPERATURE";
    /// Server listen address.
    pub const BIND: &'static str = "LYRICFLOW_BIND";
    /// OpenAI-compatible API base URL.
    pub const OPENAI_BASE_URL: &'static str = "LYRICFLOW_OPENAI_BASE_URL";
    /// HTTP client timeout in seconds.
    pub const TIMEOUT_SECS: &'static str = "LYRICFLOW_TIMEOUT_SECS";
    /// Debug logging and stage output logging.
    pub const VERBOSE: &'static str = "LYRICFLOW_VERBOSE";
}

/// Reads variables through a lookup function so tests need not touch the
/// process environment.
pub(crate) struct EnvParser<F> {
    lookup: F,
}

impl<F> EnvParser<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub(crate) fn new(lookup: F) -> Self {
        Self { lookup }
    }

    /// Trimmed value, with blank treated as unset.
    pub(crate) fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub(crate) fn bool(&self, name: &str) -> Result<Option<bool>, ConfigError> {
        let Some(value) = self.string(name) else {
            return Ok(None);
        };
        match value.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(invalid(
                name,
                format!("'{value}' is not a boolean. Use: true/false, 1/0, yes/no, on/off"),
            )),
        }
    }

    pub(crate) fn u64(&self, name: &str, min: u64, max: u64) -> Result<Option<u64>, ConfigError> {
        let Some(value) = self.string(name) else {
            return Ok(None);
        };
        let parsed = value
            .parse::<u64>()
            .map_err(|_| invalid(name, format!("'{value}' is not a positive integer")))?;
        if parsed < min || parsed > max {
            return Err(invalid(
                name,
                format!("must be between {min} and {max}, got {parsed}"),
            ));
        }
        Ok(Some(parsed))
    }

    pub(crate) fn f32(&self, name: &str, min: f32, max: f32) -> Result<Option<f32>, ConfigError> {
        let Some(value) = self.string(name) else {
            return Ok(None);
        };
        let parsed = value
            .parse::<f32>()
            .map_err(|_| invalid(name, format!("'{value}' is not a number")))?;
        if !(min..=max).contains(&parsed) {
            return Err(invalid(
                name,
                format!("must be between {min} and {max}, got {parsed}"),
            ));
        }
        Ok(Some(parsed))
    }
}

pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parser(vars: &[(&str, &str)]) -> EnvParser<impl Fn(&str) -> Option<String>> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        EnvParser::new(move |name: &str| vars.get(name).cloned())
    }

    #[test]
    fn test_blank_is_unset() {
        assert_eq!(parser(&[("A", "   ")]).string("A"), None);
        assert_eq!(parser(&[("A", " x ")]).string("A"), Some("x".to_string()));
    }

    #[test]
    fn test_bool_values() {
        let p = parser(&[("A", "yes"), ("B", "off"), ("C", "maybe")]);
        assert_eq!(p.bool("A").unwrap(), Some(true));
        assert_eq!(p.bool("B").unwrap(), Some(false));
        assert!(p.bool("C").is_err());
        assert_eq!(p.bool("D").unwrap(), None);
    }

    #[test]
    fn test_ranges() {
        let p = parser(&[("T", "2.5"), ("S", "0"), ("N", "abc")]);
        assert!(p.f32("T", 0.0, 2.0).is_err());
        assert!(p.u64("S", 1, 600).is_err());
        assert!(p.u64("N", 1, 600).is_err());
    }
}
