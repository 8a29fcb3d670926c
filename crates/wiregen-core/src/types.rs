//! Textual Go type signatures
//!
//! A [`TypeSignature`] wraps the raw descriptor string from the input
//! document (`*Person`, `github.com/acme/mail.Sender`, `func (int) bool`)
//! and derives every attribute the synthesizer needs on demand. The value
//! is immutable; all derivations are pure functions of the string.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Matches `func (args) (ret1, ret2)` - explicit parenthesized multi-return.
static FUNC_MULTI_RETURN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"func\s*\((.*?)\)\s*\((.*)\)").unwrap());

/// Matches `func (args) ret` with a single bare or absent return.
static FUNC_SINGLE_RETURN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"func\s*\((.*?)\)\s*(.*)").unwrap());

/// Matches a trailing versioned path segment such as `v2` or `v10`.
static VERSION_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^v\d+$").unwrap());

/// A string-encoded Go type descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeSignature(String);

impl TypeSignature {
    /// Creates a signature from raw descriptor text.
    pub fn new(raw: impl Into<String>) -> Self {
        TypeSignature(raw.into())
    }

    /// Raw descriptor text as written in the description document.
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// True when the descriptor is empty (field absent in the document).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True for function-shaped signatures, detected by the literal
    /// `func` prefix.
    pub fn is_function(&self) -> bool {
        self.0.starts_with("func")
    }

    /// A signature is pointer-flavored iff it starts with the pointer
    /// marker or is function-shaped (functions are nilable as-is).
    pub fn is_pointer(&self) -> bool {
        self.0.starts_with('*') || self.is_function()
    }

    /// Full package path: everything before the final dot, pointer marker
    /// stripped. Empty for functions and unqualified names.
    pub fn package_name(&self) -> String {
        if self.is_function() || !self.0.contains('.') {
            return String::new();
        }

        let stripped = self.0.trim_start_matches('*');
        let parts: Vec<&str> = stripped.split('.').collect();
        parts[..parts.len() - 1].join(".")
    }

    /// Package path with a trailing `v<digits>` segment stripped.
    pub fn unversioned_package_name(&self) -> String {
        if self.is_function() {
            return String::new();
        }

        let package_name = self.package_name();
        let mut parts: Vec<&str> = package_name.split('/').collect();
        if VERSION_SEGMENT.is_match(parts[parts.len() - 1]) {
            parts.pop();
        }

        parts.join("/")
    }

    /// Short package name usable as an import alias: the last unversioned
    /// path segment with dashes replaced by underscores. Falls back to the
    /// full package path when the last segment is empty (single-segment
    /// paths).
    pub fn local_package_name(&self) -> String {
        if self.is_function() {
            return String::new();
        }

        let unversioned = self.unversioned_package_name();
        let mut last = unversioned.rsplit('/').next().unwrap_or("").to_string();
        if last.is_empty() {
            last = self.package_name();
        }

        last.replace('-', "_")
    }

    /// The final dotted component with any leading pointer marker removed.
    /// Function shapes render as their full signature.
    pub fn entity_name(&self) -> String {
        if self.is_function() {
            return self.to_string();
        }

        let last = self.0.rsplit('.').next().unwrap_or("");
        last.trim_start_matches('*').to_string()
    }

    /// `local_package_name.entity_name`, with the leading dot trimmed when
    /// there is no package.
    pub fn local_entity_name(&self) -> String {
        if self.is_function() {
            return self.to_string();
        }

        let name = format!("{}.{}", self.local_package_name(), self.entity_name());
        name.trim_start_matches('.').to_string()
    }

    /// Local entity name with the pointer marker restored when the
    /// signature is pointer-flavored.
    pub fn local_entity_type(&self) -> String {
        if self.is_function() {
            return self.to_string();
        }

        let name = self.local_entity_name();
        if self.is_pointer() {
            format!("*{name}")
        } else {
            name
        }
    }

    /// Allocation-expression form: `&` instead of `*` for pointer types,
    /// so the synthesizer emits a composite-literal address instead of a
    /// dereference.
    pub fn create_local_entity_type(&self) -> String {
        if self.is_function() {
            return self.to_string();
        }

        let name = self.local_entity_name();
        if self.is_pointer() {
            format!("&{name}")
        } else {
            name
        }
    }

    /// Local entity name with a forced pointer marker.
    pub fn local_entity_pointer_type(&self) -> String {
        if self.is_function() {
            return self.to_string();
        }

        let name = self.local_entity_name();
        if name.starts_with('*') {
            name
        } else {
            format!("*{name}")
        }
    }

    /// Parses a function shape into its argument-list substring and zero
    /// or more return substrings. Two alternative patterns are tried: the
    /// explicit parenthesized multi-return form first, then the single
    /// bare-or-absent return form. An empty substring means zero entries.
    ///
    /// Fails loudly on text that carries the `func` prefix but no
    /// parseable shape; that is a configuration error in the input
    /// document, not a recoverable condition.
    pub fn function_shape(&self) -> Result<(String, Vec<String>)> {
        if let Some(caps) = FUNC_MULTI_RETURN.captures(&self.0) {
            return Ok((caps[1].to_string(), split_args(&caps[2])));
        }

        match FUNC_SINGLE_RETURN.captures(&self.0) {
            Some(caps) => Ok((caps[1].to_string(), split_args(&caps[2]))),
            None => Err(Error::MalformedType {
                signature: self.0.clone(),
            }),
        }
    }
}

fn split_args(s: &str) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }

    s.split(',').map(str::to_string).collect()
}

impl fmt::Display for TypeSignature {
    /// Function shapes are re-rendered in normalized form; everything else
    /// echoes the raw text. A shape that fails to parse also echoes raw so
    /// that `Display` stays total.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_function() {
            if let Ok((args, returns)) = self.function_shape() {
                return match returns.len() {
                    0 => write!(f, "func ({args})"),
                    1 => write!(f, "func ({args}) {}", returns[0]),
                    _ => write!(f, "func ({args}) ({})", returns.join(",")),
                };
            }
        }

        write!(f, "{}", self.0)
    }
}

impl From<&str> for TypeSignature {
    fn from(raw: &str) -> Self {
        TypeSignature::new(raw)
    }
}

impl From<String> for TypeSignature {
    fn from(raw: String) -> Self {
        TypeSignature(raw)
    }
}
