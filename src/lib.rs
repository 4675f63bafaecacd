#![allow(rustdoc::broken_intra_doc_links, rustdoc::invalid_html_tags)]
//! Pure-Rust Cypher parser front-end: lexing, a grammar-driven concrete
//! syntax tree, lowering into a typed AST, an Enter/Leave traversal
//! protocol, and canonical restoration back to source text.
//!
//! # Parse
//!
//! ```
//! use cypher_ast::parse;
//!
//! let result = parse("MATCH (n:Person) WHERE n.age > 18 RETURN n.name");
//! assert!(result.ast.is_some());
//! assert!(result.diagnostics.is_empty());
//! ```
//!
//! # Traverse the AST
//!
//! ```
//! use cypher_ast::ast::CypherStatement;
//! use cypher_ast::ast::visitors::VariableCollector;
//! use cypher_ast::ast::visit::{Node, accept};
//! use cypher_ast::parse;
//!
//! let CypherStatement::Query(query) = parse("MATCH (n)-[:KNOWS]->(m) RETURN m").ast.unwrap() else {
//!     panic!("expected a query");
//! };
//! let mut collector = VariableCollector::new();
//! accept(Node::SingleQuery(query.query), &mut collector);
//! assert!(collector.definitions().contains("n"));
//! assert!(collector.definitions().contains("m"));
//! ```
//!
//! # Restore to source text
//!
//! Restoration is canonical, not verbatim: keywords are upper-cased and
//! identifiers are always backtick-quoted, regardless of how the source
//! spelled them.
//!
//! ```
//! use cypher_ast::ast::restore_to_string;
//! use cypher_ast::parse;
//!
//! let ast = parse("match (n) return n.name").ast.unwrap();
//! assert_eq!(restore_to_string(&ast), "MATCH (`n`) RETURN `n`.`name`");
//! ```

pub mod ast;
pub mod convert;
pub mod cst;
pub mod diag;
pub mod error;
pub mod lexer;
pub mod parser;

// Re-export syntax span primitives.
pub use ast::{Span, Spanned};

// Re-export lexer types for convenience.
pub use diag::{Diag, Severity};
pub use error::CypherError;
pub use lexer::keywords::{is_keyword, lookup_keyword};
pub use lexer::token::{Token, TokenKind};
pub use lexer::{Lexer, LexerResult, tokenize};

// Re-export parser types for convenience.
pub use parser::{ParseResult, Parser};

/// Parses Cypher source text end-to-end (lexing + grammar parsing +
/// lowering).
///
/// This is the recommended API entry point. It guarantees parser input
/// comes from the lexer and merges diagnostics from both phases.
pub fn parse(source: &str) -> ParseResult {
    let lex_result = tokenize(source);
    Parser::new(lex_result.tokens, source)
        .with_lexer_diagnostics(lex_result.diagnostics)
        .parse()
}
