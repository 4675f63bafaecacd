//! Symbolic names, schema names, and bound variables.

use super::span::Span;
use smol_str::SmolStr;

/// The two lexical forms a name in a Cypher grammar position can take.
///
/// `SchemaName` covers both plain symbolic names and reserved words used in a
/// name position (e.g. a label called `COUNT`), mirroring the grammar's
/// `schemaName -> symbolicName | reservedWord` alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaName {
    Symbolic(SymbolicName),
    ReservedWord(SmolStr),
}

impl SchemaName {
    pub fn text(&self) -> &str {
        match self {
            SchemaName::Symbolic(name) => name.text(),
            SchemaName::ReservedWord(word) => word.as_str(),
        }
    }
}

/// The lexical form a symbolic name was written in.
///
/// Beyond plain and backtick-escaped identifiers, the grammar lets a handful
/// of reserved words stand in name positions (`MATCH (count) RETURN count`),
/// and identifiers spelled entirely from hex letters are their own lexical
/// class. For the reserved-word forms the kind alone carries the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolicNameForm {
    /// A plain unquoted identifier.
    Unescaped,
    /// A backtick-delimited identifier, e.g. `` `my var` ``.
    Escaped,
    /// An unquoted identifier consisting only of the letters `a`-`f`.
    HexLetter,
    Count,
    Filter,
    Extract,
    Any,
    None,
    Single,
}

impl SymbolicNameForm {
    /// Classifies a plain identifier as [`HexLetter`](Self::HexLetter) or
    /// [`Unescaped`](Self::Unescaped) by its spelling.
    pub fn classify(text: &str) -> Self {
        if !text.is_empty() && text.chars().all(|c| c.is_ascii_hexdigit() && c.is_ascii_alphabetic())
        {
            SymbolicNameForm::HexLetter
        } else {
            SymbolicNameForm::Unescaped
        }
    }
}

/// A symbolic name: an identifier used as a variable, label, type, or property key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolicName {
    pub value: SmolStr,
    pub form: SymbolicNameForm,
    pub span: Span,
}

impl SymbolicName {
    pub fn new(value: impl Into<SmolStr>, form: SymbolicNameForm, span: Span) -> Self {
        Self {
            value: value.into(),
            form,
            span,
        }
    }

    pub fn text(&self) -> &str {
        self.value.as_str()
    }
}

/// A bound variable reference, e.g. the `n` in `MATCH (n)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: SymbolicName,
    pub span: Span,
}

impl Variable {
    pub fn new(name: SymbolicName, span: Span) -> Self {
        Self { name, span }
    }

    pub fn text(&self) -> &str {
        self.name.text()
    }
}
