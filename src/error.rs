//! The fatal error taxonomy surfaced by lexing, parsing, and lowering.
//!
//! Most lexer/parser problems are recoverable and flow through the
//! [`crate::diag::Diag`] → [`miette::Report`] pipeline alongside any other
//! diagnostic. The five kinds here name the ways a pass can fail outright:
//! a [`CypherError`] always means the corresponding phase produced no usable
//! output. [`CypherError::into_diag`] folds one back into a [`Diag`] so
//! callers that already collect a `Vec<Diag>` don't need a second channel.

use std::fmt;

use miette::{Diagnostic, LabeledSpan, Severity};

use crate::ast::Span;
use crate::diag::Diag;

/// A fatal failure in lexing, parsing, or lowering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CypherError {
    /// The lexer could not tokenize the source at all (distinct from a
    /// recoverable per-token lex diagnostic, which stays a `Diag`).
    LexError { message: String, span: Span },
    /// The grammar parser could not match the expected rule.
    SyntaxError {
        message: String,
        span: Span,
        expected_rule: &'static str,
    },
    /// A construct the grammar accepts but lowering deliberately rejects,
    /// e.g. a standalone procedure call.
    UnsupportedFeature { rule: &'static str, span: Span },
    /// A literal's raw text could not be decoded to its typed value.
    MalformedLiteral { message: String, span: Span },
    /// A visitor aborted the traversal (`leave` returned `ok = false`); this
    /// propagates to the caller untouched, it is never itself logged.
    VisitorFailure,
}

impl CypherError {
    pub fn span(&self) -> Option<Span> {
        match self {
            CypherError::LexError { span, .. } => Some(span.clone()),
            CypherError::SyntaxError { span, .. } => Some(span.clone()),
            CypherError::UnsupportedFeature { span, .. } => Some(span.clone()),
            CypherError::MalformedLiteral { span, .. } => Some(span.clone()),
            CypherError::VisitorFailure => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CypherError::LexError { .. } => "cypher::lex_error",
            CypherError::SyntaxError { .. } => "cypher::syntax_error",
            CypherError::UnsupportedFeature { .. } => "cypher::unsupported_feature",
            CypherError::MalformedLiteral { .. } => "cypher::malformed_literal",
            CypherError::VisitorFailure => "cypher::visitor_failure",
        }
    }

    /// Folds this error into a [`Diag`] so it can join a plain `Vec<Diag>`
    /// alongside recoverable diagnostics.
    pub fn into_diag(self) -> Diag {
        let code = self.code();
        match self {
            CypherError::LexError { message, span } => {
                Diag::error(message).at(span, "here").with_code(code)
            }
            CypherError::SyntaxError {
                message,
                span,
                expected_rule,
            } => Diag::error(message)
                .at(span, format!("expected {expected_rule}"))
                .with_code(code),
            CypherError::UnsupportedFeature { rule, span } => {
                Diag::error(format!("unsupported feature: {rule}"))
                    .at(span, "not supported by this parser")
                    .with_code(code)
            }
            CypherError::MalformedLiteral { message, span } => {
                Diag::error(message).at(span, "here").with_code(code)
            }
            CypherError::VisitorFailure => Diag::error("visitor aborted traversal").with_code(code),
        }
    }
}

impl fmt::Display for CypherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CypherError::LexError { message, .. } => write!(f, "{message}"),
            CypherError::SyntaxError { message, .. } => write!(f, "{message}"),
            CypherError::UnsupportedFeature { rule, .. } => {
                write!(f, "unsupported feature: {rule}")
            }
            CypherError::MalformedLiteral { message, .. } => write!(f, "{message}"),
            CypherError::VisitorFailure => write!(f, "visitor aborted traversal"),
        }
    }
}

impl std::error::Error for CypherError {}

impl Diagnostic for CypherError {
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code()))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span()?;
        let labeled = LabeledSpan::new_primary_with_span(None, (span.start, span.end - span.start));
        Some(Box::new(std::iter::once(labeled)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_feature_carries_rule_name_into_its_diag() {
        let err = CypherError::UnsupportedFeature {
            rule: "standaloneCall",
            span: 0..4,
        };
        let diag = err.into_diag();
        assert_eq!(diag.code, Some("cypher::unsupported_feature"));
        assert!(diag.message.contains("standaloneCall"));
    }

    #[test]
    fn visitor_failure_has_no_span() {
        assert_eq!(CypherError::VisitorFailure.span(), None);
    }
}
