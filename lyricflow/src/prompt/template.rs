//! Prompt templates with named placeholders.

use crate::context::Context;
use crate::errors::{MissingVariableError, TemplateError};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A parsed prompt template.
///
/// `{name}` is replaced with the context value for `name`. `{{` and `}}`
/// produce literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
    segments: Vec<Segment>,
    variables: Vec<String>,
}

impl PromptTemplate {
    /// Parses a template string.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` for unbalanced braces, empty placeholders,
    /// or placeholder names that are not identifiers.
    pub fn from_template(source: impl Into<String>) -> Result<Self, TemplateError> {
        let source = source.into();
        let segments = parse(&source)?;

        let mut variables: Vec<String> = Vec::new();
        for segment in &segments {
            if let Segment::Variable(name) = segment {
                if !variables.contains(name) {
                    variables.push(name.clone());
                }
            }
        }

        Ok(Self {
            source,
            segments,
            variables,
        })
    }

    /// Returns the raw template text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns referenced variable names in first-appearance order.
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Renders the template against a context.
    ///
    /// # Errors
    ///
    /// Returns `MissingVariableError` naming the first variable absent from
    /// the context. `stage` is only used for the error message.
    pub fn render(&self, stage: &str, ctx: &Context) -> Result<String, MissingVariableError> {
        if let Some(missing) = self.variables.iter().find(|name| !ctx.contains_key(name)) {
            return Err(MissingVariableError::new(stage, missing));
        }

        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(name) => out.push_str(ctx.get(name).unwrap_or_default()),
            }
        }
        Ok(out)
    }
}

impl FromStr for PromptTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_template(s)
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse(source: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    literal.push('{');
                    continue;
                }

                let mut name = String::new();
                let mut closed = false;
                for (inner_pos, inner) in chars.by_ref() {
                    match inner {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(TemplateError::new(inner_pos, "nested '{' in placeholder")),
                        _ => name.push(inner),
                    }
                }

                if !closed {
                    return Err(TemplateError::new(pos, "unclosed placeholder"));
                }
                if name.is_empty() {
                    return Err(TemplateError::new(pos, "empty placeholder"));
                }
                if !is_identifier(&name) {
                    return Err(TemplateError::new(
                        pos,
                        format!("placeholder '{name}' is not an identifier"),
                    ));
                }

                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Variable(name));
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    literal.push('}');
                } else {
                    return Err(TemplateError::new(pos, "single '}' outside a placeholder"));
                }
            }
            _ => literal.push(ch),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
