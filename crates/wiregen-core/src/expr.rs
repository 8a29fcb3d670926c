//! Expression templates and interpolation
//!
//! An [`Expression`] is the template string used by a service's `returns`
//! statement and property values. Two marker forms are recognized:
//!
//! - `${NAME}` - environment-variable interpolation, rewritten to a
//!   runtime `os.Getenv` call
//! - `@{NAME}` / `@{NAME(args)}` - service reference; the parenthesized
//!   form invokes a parameterized accessor with explicit call arguments
//!
//! Markers are extracted by an explicit lexer producing a typed token
//! stream rather than regex scanning, so braces nested inside call
//! arguments do not truncate a marker.

use serde::{Deserialize, Serialize};

use crate::ast::GoFile;
use crate::error::{Error, Result};
use crate::graph::ServiceGraph;

/// One lexed segment of an expression template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Verbatim text between markers.
    Literal(String),
    /// `${NAME}` environment-variable marker.
    EnvRef(String),
    /// `@{NAME}` or `@{NAME(args)}` service-reference marker.
    ServiceRef {
        /// Referenced service name.
        name: String,
        /// Call arguments from the parenthesized form, if any.
        args: Option<String>,
    },
}

/// A template string usable in a service's construction or property
/// values. Immutable once parsed from the input document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expression(String);

impl Expression {
    /// Creates an expression from raw template text.
    pub fn new(raw: impl Into<String>) -> Self {
        Expression(raw.into())
    }

    /// Raw template text.
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Lexes the template into a token stream. An unterminated marker is
    /// kept as literal text; expression text is not validated beyond the
    /// marker syntax.
    pub fn tokens(&self) -> Vec<Token> {
        let chars: Vec<char> = self.0.chars().collect();
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut pos = 0;

        while pos < chars.len() {
            let sigil = chars[pos];
            if (sigil == '$' || sigil == '@') && chars.get(pos + 1) == Some(&'{') {
                if let Some(end) = find_closing_brace(&chars, pos + 2) {
                    if !literal.is_empty() {
                        tokens.push(Token::Literal(std::mem::take(&mut literal)));
                    }
                    let inner: String = chars[pos + 2..end].iter().collect();
                    if sigil == '$' {
                        tokens.push(Token::EnvRef(inner));
                    } else {
                        tokens.push(parse_service_ref(&inner));
                    }
                    pos = end + 1;
                    continue;
                }
            }

            literal.push(sigil);
            pos += 1;
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        tokens
    }

    /// Referenced service names with any call-argument suffix stripped,
    /// deduplicated, in first-seen order.
    pub fn dependency_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for token in self.tokens() {
            if let Token::ServiceRef { name, .. } = token {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Raw reference text including call-argument suffixes, deduplicated,
    /// in first-seen order.
    pub fn dependencies(&self) -> Vec<String> {
        let mut refs = Vec::new();
        for token in self.tokens() {
            if let Token::ServiceRef { name, args } = token {
                let raw = match args {
                    Some(args) => format!("{name}({args})"),
                    None => name,
                };
                if !refs.contains(&raw) {
                    refs.push(raw);
                }
            }
        }
        refs
    }

    /// Rewrites the template into final Go expression text.
    ///
    /// Environment markers become `os.Getenv("NAME")` and idempotently
    /// request the `os` import on `file`. Service-reference markers:
    ///
    /// - with `emitting_dependency_params`, the dependency is already a
    ///   local parameter in this context, so the bare name is emitted;
    /// - the call-arguments form invokes the named accessor directly;
    /// - a reference to a service missing from `graph` aborts with a
    ///   configuration error naming it;
    /// - a reference whose container slot is itself function-typed emits
    ///   a bare field access (the stored closure is directly callable);
    /// - anything else emits a zero-argument accessor invocation.
    pub fn resolve(
        &self,
        graph: &ServiceGraph,
        file: &mut GoFile,
        emitting_dependency_params: bool,
    ) -> Result<String> {
        let mut out = String::new();

        for token in self.tokens() {
            match token {
                Token::Literal(text) => out.push_str(&text),
                Token::EnvRef(name) => {
                    file.add_import("os", "");
                    out.push_str(&format!("os.Getenv(\"{name}\")"));
                }
                Token::ServiceRef { name, args } => {
                    if emitting_dependency_params {
                        out.push_str(&name);
                    } else if let Some(args) = args {
                        out.push_str(&format!("container.Get{name}({args})"));
                    } else if !graph.contains(&name) {
                        return Err(Error::UnknownService { name });
                    } else if graph.slot_type(&name)?.is_function() {
                        out.push_str(&format!("container.{name}"));
                    } else {
                        out.push_str(&format!("container.Get{name}()"));
                    }
                }
            }
        }

        Ok(out)
    }
}

/// Finds the index of the `}` closing a marker whose body starts at
/// `start`, tracking nested braces inside the marker body.
fn find_closing_brace(chars: &[char], start: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut pos = start;
    while pos < chars.len() {
        match chars[pos] {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
            }
            _ => {}
        }
        pos += 1;
    }
    None
}

/// Splits a service-reference body into name and optional call arguments.
fn parse_service_ref(inner: &str) -> Token {
    match inner.find('(') {
        Some(open) => {
            let name = inner[..open].to_string();
            let rest = &inner[open + 1..];
            let args = rest.strip_suffix(')').unwrap_or(rest).to_string();
            Token::ServiceRef {
                name,
                args: Some(args),
            }
        }
        None => Token::ServiceRef {
            name: inner.to_string(),
            args: None,
        },
    }
}

impl From<&str> for Expression {
    fn from(raw: &str) -> Self {
        Expression::new(raw)
    }
}

impl From<String> for Expression {
    fn from(raw: String) -> Self {
        Expression(raw)
    }
}
