//! Compilation of `{name}` path templates into anchored regexes

use regex::Regex;
use thiserror::Error;

use super::PathParams;

/// Regex fragment a placeholder compiles to: one or more non-slash characters
const SEGMENT: &str = "[^/]+";

/// Template or method rejected at registration time
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("unsupported HTTP method `{0}`")]
    UnsupportedMethod(String),

    #[error("placeholder `{{{name}}}` appears more than once in `{template}`")]
    DuplicatePlaceholder { template: String, name: String },

    #[error("placeholders `{{{first}}}` and `{{{second}}}` have no literal separator in `{template}`")]
    AdjacentPlaceholders {
        template: String,
        first: String,
        second: String,
    },

    #[error("template `{template}` did not compile: {source}")]
    Pattern {
        template: String,
        #[source]
        source: regex::Error,
    },
}

/// A compiled path template
///
/// `{name}` is a placeholder when `name` is an identifier
/// (`[A-Za-z_][A-Za-z0-9_]*`). Any other brace, including an unmatched one,
/// is literal text.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    source: String,
    regex: Regex,
    placeholders: Vec<String>,
}

impl PathTemplate {
    pub fn compile(template: &str) -> Result<Self, RouteError> {
        let mut pattern = String::from("^");
        let mut placeholders: Vec<String> = Vec::new();
        let mut literal = String::new();
        // Placeholder emitted with no literal text since
        let mut pending: Option<String> = None;

        let mut rest = template;
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let name = after
                .find('}')
                .map(|close| &after[..close])
                .filter(|name| is_identifier(name));

            let Some(name) = name else {
                literal.push_str(&rest[..=open]);
                rest = after;
                continue;
            };

            literal.push_str(&rest[..open]);
            if literal.is_empty() {
                if let Some(first) = pending.take() {
                    return Err(RouteError::AdjacentPlaceholders {
                        template: template.to_string(),
                        first,
                        second: name.to_string(),
                    });
                }
            }
            if placeholders.iter().any(|p| p == name) {
                return Err(RouteError::DuplicatePlaceholder {
                    template: template.to_string(),
                    name: name.to_string(),
                });
            }

            pattern.push_str(&regex::escape(&literal));
            literal.clear();
            pattern.push_str(&format!("(?P<{}>{})", name, SEGMENT));
            placeholders.push(name.to_string());
            pending = Some(name.to_string());
            rest = &after[name.len() + 1..];
        }
        literal.push_str(rest);
        pattern.push_str(&regex::escape(&literal));
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|source| RouteError::Pattern {
            template: template.to_string(),
            source,
        })?;

        Ok(Self {
            source: template.to_string(),
            regex,
            placeholders,
        })
    }

    /// The template as registered
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder names in the order they appear
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Match the whole of `path`, returning the captured placeholder values
    pub fn captures(&self, path: &str) -> Option<PathParams> {
        let caps = self.regex.captures(path)?;
        let mut params = PathParams::new();
        for name in &self.placeholders {
            if let Some(value) = caps.name(name) {
                params.insert(name.as_str(), value.as_str());
            }
        }
        Some(params)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
