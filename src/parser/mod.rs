//! Parser entry point for Cypher syntax.
//!
//! Parsing runs in three phases: the lexer turns source text into tokens,
//! [`grammar`] matches those tokens against the Cypher grammar into a
//! [`crate::cst::CstNode`], and [`crate::convert`] lowers that tree into the
//! typed AST. A single call to [`Parser::parse`] covers exactly one
//! statement, so unlike a program with several independent top-level
//! statements there is no per-statement recovery loop to run: a grammar or
//! lowering failure is fatal for the whole parse.

pub mod base;
pub mod grammar;

use miette::Report;

use crate::ast::CypherStatement;
use crate::convert::convert_statement;
use crate::diag::{Diag, into_reports};
use crate::lexer::token::{Token, TokenKind};
use base::TokenStream;

/// Result of parsing a single Cypher statement.
#[derive(Debug)]
pub struct ParseResult {
    /// The parsed statement, or `None` if lexing, grammar parsing, or
    /// lowering failed outright.
    pub ast: Option<CypherStatement>,
    /// All collected diagnostics rendered as miette reports.
    pub diagnostics: Vec<Report>,
}

/// Cypher parser with error recovery.
pub struct Parser<'source> {
    tokens: Vec<Token>,
    diagnostics: Vec<Diag>,
    source: &'source str,
}

impl<'source> Parser<'source> {
    /// Creates a new parser from a token stream, appending an EOF marker if
    /// the lexer didn't already produce one.
    pub fn new(mut tokens: Vec<Token>, source: &'source str) -> Self {
        if tokens.is_empty() {
            tokens.push(Token::new(TokenKind::Eof, 0..0));
        } else if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            let eof_pos = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token::new(TokenKind::Eof, eof_pos..eof_pos));
        }

        Self {
            tokens,
            diagnostics: Vec::new(),
            source,
        }
    }

    /// Parses the token stream into a statement.
    pub fn parse(mut self) -> ParseResult {
        let mut ts = TokenStream::new(&self.tokens);
        let cst = if ts.at(&TokenKind::Call) {
            grammar::parse_standalone_call(&mut ts)
        } else {
            grammar::parse_regular_query(&mut ts)
        };
        let cst = cst.and_then(|cst| {
            ts.eat(&TokenKind::Semicolon);
            if ts.at(&TokenKind::Eof) {
                Ok(cst)
            } else {
                Err(ts.unexpected("unexpected trailing tokens after statement"))
            }
        });

        let ast = match cst {
            Ok(cst) => match convert_statement(&cst) {
                Ok(stmt) => Some(stmt),
                Err(err) => {
                    self.diagnostics.push(err.into_diag());
                    None
                }
            },
            Err(diag) => {
                self.diagnostics.push(*diag);
                None
            }
        };

        let reports = into_reports(self.diagnostics, self.source);

        ParseResult { ast, diagnostics: reports }
    }

    /// Prepends diagnostics collected by the lexer so they render in source
    /// order ahead of anything found during parsing or lowering.
    pub fn with_lexer_diagnostics(mut self, lex_diags: Vec<Diag>) -> Self {
        let mut all_diags = lex_diags;
        all_diags.append(&mut self.diagnostics);
        self.diagnostics = all_diags;
        self
    }
}
