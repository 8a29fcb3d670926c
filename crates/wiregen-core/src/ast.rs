//! Go syntax-node model
//!
//! The synthesizer assembles these nodes; [`crate::emit`] serializes them.
//! The model is deliberately small: leaf expressions stay as raw Go text,
//! only the shapes the container generator produces (struct, var, func,
//! guard/assign/return statements, function literals) get typed nodes.

use std::collections::BTreeMap;

/// A generated Go source file: header comments, package clause, import
/// set and top-level declarations.
#[derive(Debug, Clone, Default)]
pub struct GoFile {
    /// Header comment lines, emitted verbatim above the package clause.
    pub header: Vec<String>,
    /// Package name for the package clause.
    pub package: String,
    /// Import path -> alias (empty alias means none). Keyed by path so
    /// each module is imported exactly once and iteration is sorted.
    imports: BTreeMap<String, String>,
    /// Top-level declarations in emission order.
    pub decls: Vec<GoDecl>,
}

impl GoFile {
    /// Creates an empty file for the given package.
    pub fn new(package: impl Into<String>) -> Self {
        GoFile {
            package: package.into(),
            ..GoFile::default()
        }
    }

    /// Registers an import. Idempotent: requesting the same path twice is
    /// a no-op, the first alias wins.
    pub fn add_import(&mut self, path: impl Into<String>, alias: impl Into<String>) {
        self.imports.entry(path.into()).or_insert_with(|| alias.into());
    }

    /// Imports sorted by path, as `(path, alias)` pairs.
    pub fn imports(&self) -> impl Iterator<Item = (&str, &str)> {
        self.imports.iter().map(|(p, a)| (p.as_str(), a.as_str()))
    }
}

/// A named, typed slot: a struct field or a function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoField {
    /// Field or parameter name.
    pub name: String,
    /// Type text.
    pub ty: String,
}

impl GoField {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        GoField {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// An expression: raw Go text or a function literal.
#[derive(Debug, Clone, PartialEq)]
pub enum GoExpr {
    /// Verbatim expression text.
    Raw(String),
    /// `func(params) result { body }`
    FuncLit {
        /// Parameter list.
        params: Vec<GoField>,
        /// Single result type, empty for none.
        result: String,
        /// Literal body.
        body: Vec<GoStmt>,
    },
}

/// A statement inside a function body.
#[derive(Debug, Clone, PartialEq)]
pub enum GoStmt {
    /// `lhs := rhs`
    Define {
        /// Left-hand side.
        lhs: String,
        /// Right-hand side.
        rhs: GoExpr,
    },
    /// `lhs = rhs`
    Assign {
        /// Left-hand side.
        lhs: String,
        /// Right-hand side.
        rhs: GoExpr,
    },
    /// `if cond { body }`
    If {
        /// Condition text.
        cond: String,
        /// Guarded statements.
        body: Vec<GoStmt>,
    },
    /// `return expr`
    Return(GoExpr),
    /// Verbatim statement text (the user-supplied `error` clause).
    Raw(String),
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum GoDecl {
    /// `type Name struct { fields }`
    Struct {
        /// Type name.
        name: String,
        /// Fields in emission order.
        fields: Vec<GoField>,
    },
    /// `var name Type`
    Var {
        /// Variable name.
        name: String,
        /// Declared type.
        ty: String,
    },
    /// `func (receiver) Name(params) results { body }`
    Func {
        /// Function name.
        name: String,
        /// Optional method receiver.
        receiver: Option<GoField>,
        /// Parameter list.
        params: Vec<GoField>,
        /// Result types; zero, one or many.
        results: Vec<String>,
        /// Body statements.
        body: Vec<GoStmt>,
    },
}
