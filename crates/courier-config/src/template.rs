//! `{{identifier}}` template rendering.
//!
//! Grammar, applied in a single left-to-right pass:
//!
//! ```text
//! token      = "{{" , { " " } , identifier , { " " } , "}}"
//! identifier = segment , { "." , segment }
//! segment    = ( ALPHA | "_" ) , { ALPHA | DIGIT | "_" | "-" }
//! ```
//!
//! Text outside tokens is copied verbatim. A token whose identifier is absent
//! from the context is an error; nothing is ever rendered as an empty string
//! or left as a literal placeholder.

use serde_json::Value;
use thiserror::Error;

use crate::props::PropertyBag;

/// Template rendering failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The identifier does not exist in the context (or is null).
    #[error("Unresolved template identifier '{identifier}'")]
    Unresolved {
        /// The dotted identifier as written in the template.
        identifier: String,
    },

    /// The identifier names a nested bag or list instead of a scalar.
    #[error("Template identifier '{identifier}' does not name a scalar value")]
    NotScalar {
        /// The dotted identifier as written in the template.
        identifier: String,
    },

    /// The template does not follow the token grammar.
    #[error("Malformed template at byte {offset}: {reason}")]
    Malformed {
        /// Byte offset of the offending `{{`.
        offset: usize,
        /// What is wrong with the token.
        reason: String,
    },
}

/// Render `template`, substituting every token from `context`.
///
/// # Errors
///
/// Returns [`TemplateError`] on the first token that is malformed, missing
/// from the context, or not a scalar.
pub fn resolve_template(template: &str, context: &PropertyBag) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut offset: usize = 0;

    while let Some((literal, tail)) = rest.split_once("{{") {
        out.push_str(literal);
        let token_offset = offset.saturating_add(literal.len());

        let Some((raw, after)) = tail.split_once("}}") else {
            return Err(TemplateError::Malformed {
                offset: token_offset,
                reason: "unterminated '{{'".to_owned(),
            });
        };

        let identifier = raw.trim_matches(' ');
        check_identifier(identifier).map_err(|reason| TemplateError::Malformed {
            offset: token_offset,
            reason,
        })?;

        let value = context
            .lookup(identifier)
            .filter(|v| !v.is_null())
            .ok_or_else(|| TemplateError::Unresolved {
                identifier: identifier.to_owned(),
            })?;
        render_scalar(identifier, value, &mut out)?;

        // "{{" + raw + "}}"
        offset = token_offset.saturating_add(raw.len()).saturating_add(4);
        rest = after;
    }

    out.push_str(rest);
    Ok(out)
}

fn check_identifier(identifier: &str) -> Result<(), String> {
    if identifier.is_empty() {
        return Err("empty identifier".to_owned());
    }
    for segment in identifier.split('.') {
        let mut chars = segment.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
            Some(c) => {
                return Err(format!(
                    "identifier segment '{segment}' cannot start with '{c}'"
                ));
            },
            None => return Err(format!("empty segment in identifier '{identifier}'")),
        }
        if let Some(c) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-')) {
            return Err(format!("invalid character '{c}' in identifier '{identifier}'"));
        }
    }
    Ok(())
}

fn render_scalar(identifier: &str, value: &Value, out: &mut String) -> Result<(), TemplateError> {
    match value {
        Value::String(s) => out.push_str(s),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Null => {
            return Err(TemplateError::Unresolved {
                identifier: identifier.to_owned(),
            });
        },
        Value::Array(_) | Value::Object(_) => {
            return Err(TemplateError::NotScalar {
                identifier: identifier.to_owned(),
            });
        },
    }
    Ok(())
}
