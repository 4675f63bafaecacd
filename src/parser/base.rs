//! The token cursor shared by every grammar rule function.
//!
//! A [`TokenStream`] is a pair of slices over the lexer's output: the full
//! token list, and the not-yet-consumed tail of it. Consuming shrinks the
//! tail; the trailing EOF token is never consumed, so [`head`] is total and
//! rule functions can probe freely without bounds checks. Backtracking
//! between grammar alternatives goes through an opaque [`Checkpoint`]
//! (a snapshot of the tail length) rather than raw index arithmetic.
//!
//! [`head`]: TokenStream::head

use crate::ast::Span;
use crate::diag::Diag;
use crate::lexer::token::{Token, TokenKind};

/// Result type for grammar rule functions.
pub type ParseResult<T> = Result<T, Box<Diag>>;

/// A cursor over a lexed token slice. The slice must end in an EOF token;
/// [`crate::parser::Parser::new`] guarantees that.
pub struct TokenStream<'a> {
    full: &'a [Token],
    rest: &'a [Token],
}

/// A rewind point captured with [`TokenStream::checkpoint`].
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint(usize);

impl<'a> TokenStream<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            full: tokens,
            rest: tokens,
        }
    }

    /// The next unconsumed token. Once only the trailing EOF is left, this
    /// keeps returning it.
    pub fn head(&self) -> &Token {
        self.rest
            .first()
            .or_else(|| self.full.last())
            .expect("token stream is never empty")
    }

    /// Lookahead: `nth(0)` is [`head`](Self::head), `nth(1)` the token
    /// after it, and so on.
    pub fn nth(&self, n: usize) -> Option<&Token> {
        self.rest.get(n)
    }

    /// Consumes one token; the trailing EOF stays put.
    pub fn bump(&mut self) {
        if self.rest.len() > 1 {
            self.rest = &self.rest[1..];
        }
    }

    /// Clones the head token out and consumes it.
    pub fn take(&mut self) -> Token {
        let token = self.head().clone();
        self.bump();
        token
    }

    /// Whether the head token has exactly this kind.
    pub fn at(&self, kind: &TokenKind) -> bool {
        &self.head().kind == kind
    }

    /// Consumes the head token if it has this kind, reporting whether it did.
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        let hit = self.at(kind);
        if hit {
            self.bump();
        }
        hit
    }

    /// Consumes a token of the given kind and yields its span, or reports
    /// what was found instead. The cursor does not move on failure.
    pub fn expect(&mut self, kind: TokenKind) -> ParseResult<Span> {
        if self.at(&kind) {
            let span = self.head().span.clone();
            self.bump();
            Ok(span)
        } else {
            Err(self.unexpected(format!("expected {kind}, found {}", self.head().kind)))
        }
    }

    /// An error diagnostic pointing at the head token.
    pub fn unexpected(&self, message: impl Into<String>) -> Box<Diag> {
        Box::new(Diag::error(message).at(self.head().span.clone(), "here"))
    }

    /// Snapshots the cursor so a failed alternative can [`rewind`](Self::rewind).
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.rest.len())
    }

    /// Rewinds to an earlier [`checkpoint`](Self::checkpoint).
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        let unread = checkpoint.0.clamp(1, self.full.len());
        self.rest = &self.full[self.full.len() - unread..];
    }

    /// The span of the most recently consumed token, or of the head when
    /// nothing has been consumed yet. Rule functions use this to close off
    /// the span of the node they just finished.
    pub fn prev_span(&self) -> Span {
        let consumed = self.full.len() - self.rest.len();
        if consumed > 0 {
            self.full[consumed - 1].span.clone()
        } else {
            self.head().span.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smol_str::SmolStr;

    fn tokens() -> Vec<Token> {
        vec![
            Token::new(TokenKind::Return, 0..6),
            Token::new(TokenKind::IntegerLiteral(SmolStr::new("1")), 7..8),
            Token::new(TokenKind::Plus, 9..10),
            Token::new(TokenKind::IntegerLiteral(SmolStr::new("2")), 11..12),
            Token::new(TokenKind::Eof, 12..12),
        ]
    }

    #[test]
    fn head_and_lookahead() {
        let tokens = tokens();
        let ts = TokenStream::new(&tokens);
        assert_eq!(ts.head().kind, TokenKind::Return);
        assert_eq!(ts.nth(0).map(|t| &t.kind), Some(&TokenKind::Return));
        assert_eq!(ts.nth(2).map(|t| &t.kind), Some(&TokenKind::Plus));
        assert_eq!(ts.nth(9), None);
    }

    #[test]
    fn bump_never_walks_past_the_trailing_eof() {
        let tokens = tokens();
        let mut ts = TokenStream::new(&tokens);
        for _ in 0..10 {
            ts.bump();
        }
        assert_eq!(ts.head().kind, TokenKind::Eof);
    }

    #[test]
    fn eat_consumes_only_on_a_match() {
        let tokens = tokens();
        let mut ts = TokenStream::new(&tokens);
        assert!(!ts.eat(&TokenKind::Match));
        assert_eq!(ts.head().kind, TokenKind::Return);
        assert!(ts.eat(&TokenKind::Return));
        assert_ne!(ts.head().kind, TokenKind::Return);
    }

    #[test]
    fn take_clones_the_head_then_moves_on() {
        let tokens = tokens();
        let mut ts = TokenStream::new(&tokens);
        let taken = ts.take();
        assert_eq!(taken.kind, TokenKind::Return);
        assert_eq!(taken.span, 0..6);
        assert_eq!(ts.head().span, 7..8);
    }

    #[test]
    fn expect_failure_names_both_kinds_and_keeps_position() {
        let tokens = tokens();
        let mut ts = TokenStream::new(&tokens);
        let err = ts.expect(TokenKind::Match).unwrap_err();
        assert!(err.message.contains("MATCH"));
        assert!(err.message.contains("RETURN"));
        assert_eq!(ts.head().kind, TokenKind::Return);
    }

    #[test]
    fn checkpoint_rewind_restores_the_cursor() {
        let tokens = tokens();
        let mut ts = TokenStream::new(&tokens);
        ts.bump();
        let checkpoint = ts.checkpoint();
        ts.bump();
        ts.bump();
        assert_eq!(ts.head().span, 11..12);
        ts.rewind(checkpoint);
        assert_eq!(ts.head().span, 7..8);
    }

    #[test]
    fn prev_span_tracks_the_last_consumed_token() {
        let tokens = tokens();
        let mut ts = TokenStream::new(&tokens);
        assert_eq!(ts.prev_span(), 0..6);
        ts.bump();
        assert_eq!(ts.prev_span(), 0..6);
        ts.bump();
        assert_eq!(ts.prev_span(), 7..8);
    }
}
