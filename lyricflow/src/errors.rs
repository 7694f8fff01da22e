//! Error types for lyricflow.
//!
//! Pipeline wiring problems, template problems and provider failures each get
//! their own type so callers can match on them; the crate-wide
//! [`LyricflowError`] wraps all of them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// The main error type for lyricflow operations.
#[derive(Debug, Error)]
pub enum LyricflowError {
    /// A pipeline validation error occurred.
    #[error("{0}")]
    Validation(#[from] PipelineValidationError),

    /// A template referenced a variable missing from the context.
    #[error("{0}")]
    MissingVariable(#[from] MissingVariableError),

    /// A prompt template could not be parsed.
    #[error("{0}")]
    Template(#[from] TemplateError),

    /// A generation or lyrics provider failed.
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// The song query was rejected before any lookup.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Startup configuration was missing or invalid.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// A generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LyricflowError {
    /// Returns the provider error if this error came from a provider.
    #[must_use]
    pub fn as_provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Provider(err) => Some(err),
            _ => None,
        }
    }
}

/// Metadata about a contract error for better diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ContractErrorInfo {
    /// Error code (e.g., "CONTRACT-MISSING_VAR").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
    /// Additional context key-value pairs.
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl ContractErrorInfo {
    /// Creates a new contract error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
            context: HashMap::new(),
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Adds a single context entry.
    #[must_use]
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// Error raised when a pipeline is wired incorrectly.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PipelineValidationError {
    /// The error message.
    pub message: String,
    /// The stages (by output key) involved in the error.
    pub stages: Vec<String>,
    /// Optional contract error info.
    pub error_info: Option<ContractErrorInfo>,
}

impl PipelineValidationError {
    /// Creates a new pipeline validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stages: Vec::new(),
            error_info: None,
        }
    }

    /// Sets the stages involved.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<String>) -> Self {
        self.stages = stages;
        self
    }

    /// Sets the contract error info.
    #[must_use]
    pub fn with_error_info(mut self, info: ContractErrorInfo) -> Self {
        self.error_info = Some(info);
        self
    }

    /// Returns the contract code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.error_info.as_ref().map(|info| info.code.as_str())
    }
}

/// Error raised when a stage needs a context key that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing variable: stage '{stage}' requires '{key}' which is not in the context")]
pub struct MissingVariableError {
    /// The stage that needed the key.
    pub stage: String,
    /// The missing key.
    pub key: String,
}

impl MissingVariableError {
    /// Creates a new missing variable error.
    #[must_use]
    pub fn new(stage: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            key: key.into(),
        }
    }
}

/// Error raised when a prompt template is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid template at byte {position}: {reason}")]
pub struct TemplateError {
    /// Byte offset of the offending character.
    pub position: usize,
    /// What went wrong.
    pub reason: String,
}

impl TemplateError {
    /// Creates a new template error.
    #[must_use]
    pub fn new(position: usize, reason: impl Into<String>) -> Self {
        Self {
            position,
            reason: reason.into(),
        }
    }
}

/// Classification of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ProviderErrorKind {
    /// The provider throttled the request (HTTP 429).
    RateLimited,
    /// The credentials were rejected (HTTP 401/403).
    Authentication,
    /// Any other non-success HTTP status.
    Http {
        /// The HTTP status code.
        status: u16,
    },
    /// The request never produced a response.
    Network,
    /// The response body did not have the expected shape.
    MalformedResponse,
}

impl ProviderErrorKind {
    /// Maps an HTTP status code to an error kind.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimited,
            401 | 403 => Self::Authentication,
            _ => Self::Http { status },
        }
    }
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate limited"),
            Self::Authentication => write!(f, "authentication failed"),
            Self::Http { status } => write!(f, "HTTP {status}"),
            Self::Network => write!(f, "network error"),
            Self::MalformedResponse => write!(f, "malformed response"),
        }
    }
}

/// Error returned by a lyrics or generation provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{provider} {kind}: {message}")]
pub struct ProviderError {
    /// Which provider failed (e.g. "openai", "genius").
    pub provider: String,
    /// The failure classification.
    pub kind: ProviderErrorKind,
    /// Detail from the provider or transport.
    pub message: String,
}

impl ProviderError {
    /// Creates a new provider error.
    #[must_use]
    pub fn new(
        provider: impl Into<String>,
        kind: ProviderErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            kind,
            message: message.into(),
        }
    }

    /// Creates a rate-limited error.
    #[must_use]
    pub fn rate_limited(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(provider, ProviderErrorKind::RateLimited, message)
    }

    /// Creates a malformed-response error.
    #[must_use]
    pub fn malformed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(provider, ProviderErrorKind::MalformedResponse, message)
    }

    /// Returns true if the provider throttled the request.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.kind == ProviderErrorKind::RateLimited
    }
}

/// Error raised while loading startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required secret was absent or blank.
    #[error("Missing secret: {name}")]
    MissingSecret {
        /// The secret name.
        name: String,
    },

    /// A setting had an unusable value.
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue {
        /// The setting name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The secrets file could not be read.
    #[error("Failed to read secrets file: {0}")]
    Io(#[from] std::io::Error),

    /// The secrets file was not valid TOML.
    #[error("Failed to parse secrets file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Provides default suggestions for contract error codes.
pub struct ContractSuggestions;

impl ContractSuggestions {
    /// Gets a suggestion for a given error code.
    #[must_use]
    pub fn get(code: &str) -> Option<&'static str> {
        match code {
            "CONTRACT-EMPTY" => Some("Add at least one stage to the pipeline before building."),
            "CONTRACT-MISSING_VAR" => Some(
                "Declare the variable as a pipeline input or move the stage producing it \
                 before the stage that references it.",
            ),
            "CONTRACT-OUTPUT_CONFLICT" => Some(
                "Give every stage a distinct output key that is not also an input variable.",
            ),
            "CONTRACT-UNKNOWN_OUTPUT" => Some(
                "Only declare output variables that some stage produces.",
            ),
            "CONTRACT-EMPTY_NAME" => Some("Names and keys must contain non-whitespace characters."),
            _ => None,
        }
    }
}
