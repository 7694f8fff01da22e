//! Pipeline results.

use crate::context::Context;
use crate::errors::MissingVariableError;
use serde::Serialize;

/// The final context restricted to the declared output keys, in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PipelineResult {
    values: Context,
}

impl PipelineResult {
    /// Projects `ctx` onto `output_keys`.
    ///
    /// # Errors
    ///
    /// Returns `MissingVariableError` if an output key is absent.
    pub fn from_context(
        pipeline: &str,
        ctx: &Context,
        output_keys: &[String],
    ) -> Result<Self, MissingVariableError> {
        let mut values = Context::new();
        for key in output_keys {
            let value = ctx
                .get(key)
                .ok_or_else(|| MissingVariableError::new(pipeline, key))?;
            values.insert(key.clone(), value);
        }
        Ok(Self { values })
    }

    /// Gets an output value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key)
    }

    /// Returns output keys in declaration order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.values.keys()
    }

    /// Iterates `(key, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.values.iter()
    }

    /// Returns the number of outputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no outputs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_projection_keeps_declared_order() {
        let ctx = Context::from_inputs([("lyrics", "l"), ("summary", "s"), ("genre", "g")]);
        let result =
            PipelineResult::from_context("p", &ctx, &["genre".to_string(), "summary".to_string()]).unwrap();

        assert_eq!(result.keys(), vec!["genre", "summary"]);
        assert_eq!(result.get("lyrics"), None);
        assert_eq!(serde_json::to_string(&result).unwrap(), r#"{"genre":"g","summary":"s"}"#);
    }

    #[test]
    fn test_projection_missing_key() {
        let err = PipelineResult::from_context("p", &Context::new(), &["genre".to_string()]).unwrap_err();
        assert_eq!(err.key, "genre");
    }
}
