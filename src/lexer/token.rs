//! Token types and representations for Cypher lexical analysis.

use crate::ast::Span;
use smol_str::SmolStr;
use std::fmt;

/// The kind of a lexical token in Cypher.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Clause keywords
    Match,
    Optional,
    Where,
    Return,
    With,
    Unwind,
    Create,
    Merge,
    Set,
    Delete,
    Detach,
    Remove,
    On,
    As,
    Order,
    By,
    Asc,
    Ascending,
    Desc,
    Descending,
    Skip,
    Limit,
    Union,
    All,
    Distinct,
    Call,

    // Logical/comparison keywords
    And,
    Or,
    Xor,
    Not,
    In,
    Starts,
    Ends,
    Contains,
    Is,

    // Literal keywords
    Null,
    True,
    False,

    // CASE
    Case,
    When,
    Then,
    Else,
    End,

    // Filtering functions treated as keywords by the grammar
    Count,
    Filter,
    Extract,
    Any,
    None,
    Single,

    // Identifiers
    Identifier(SmolStr),
    DelimitedIdentifier(SmolStr),

    // Literals
    StringLiteral(SmolStr),
    IntegerLiteral(SmolStr),
    FloatLiteral(SmolStr),

    // Parameters
    Parameter(SmolStr), // $name or $1

    // Operators
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    Caret,      // ^
    Eq,         // =
    NotEq,      // <>
    Lt,         // <
    Gt,         // >
    LtEq,       // <=
    GtEq,       // >=
    Arrow,      // ->
    LeftArrow,  // <-
    Pipe,       // |
    DotDot,     // ..

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    LBrace,    // {
    RBrace,    // }
    Comma,     // ,
    Semicolon, // ;
    Dot,       // .
    Colon,     // :

    // Special
    Eof,
}

impl TokenKind {
    /// Returns true if this token kind is a keyword.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Match
                | TokenKind::Optional
                | TokenKind::Where
                | TokenKind::Return
                | TokenKind::With
                | TokenKind::Unwind
                | TokenKind::Create
                | TokenKind::Merge
                | TokenKind::Set
                | TokenKind::Delete
                | TokenKind::Detach
                | TokenKind::Remove
                | TokenKind::On
                | TokenKind::As
                | TokenKind::Order
                | TokenKind::By
                | TokenKind::Asc
                | TokenKind::Ascending
                | TokenKind::Desc
                | TokenKind::Descending
                | TokenKind::Skip
                | TokenKind::Limit
                | TokenKind::Union
                | TokenKind::All
                | TokenKind::Distinct
                | TokenKind::Call
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Xor
                | TokenKind::Not
                | TokenKind::In
                | TokenKind::Starts
                | TokenKind::Ends
                | TokenKind::Contains
                | TokenKind::Is
                | TokenKind::Null
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Case
                | TokenKind::When
                | TokenKind::Then
                | TokenKind::Else
                | TokenKind::End
                | TokenKind::Count
                | TokenKind::Filter
                | TokenKind::Extract
                | TokenKind::Any
                | TokenKind::None
                | TokenKind::Single
        )
    }

    /// Returns true if this token kind is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::StringLiteral(_)
                | TokenKind::IntegerLiteral(_)
                | TokenKind::FloatLiteral(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }

    /// Returns true if this token kind is an operator.
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::Caret
                | TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::LtEq
                | TokenKind::GtEq
                | TokenKind::Arrow
                | TokenKind::LeftArrow
                | TokenKind::Pipe
                | TokenKind::DotDot
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Match => write!(f, "MATCH"),
            TokenKind::Optional => write!(f, "OPTIONAL"),
            TokenKind::Where => write!(f, "WHERE"),
            TokenKind::Return => write!(f, "RETURN"),
            TokenKind::With => write!(f, "WITH"),
            TokenKind::Unwind => write!(f, "UNWIND"),
            TokenKind::Create => write!(f, "CREATE"),
            TokenKind::Merge => write!(f, "MERGE"),
            TokenKind::Set => write!(f, "SET"),
            TokenKind::Delete => write!(f, "DELETE"),
            TokenKind::Detach => write!(f, "DETACH"),
            TokenKind::Remove => write!(f, "REMOVE"),
            TokenKind::On => write!(f, "ON"),
            TokenKind::As => write!(f, "AS"),
            TokenKind::Order => write!(f, "ORDER"),
            TokenKind::By => write!(f, "BY"),
            TokenKind::Asc => write!(f, "ASC"),
            TokenKind::Ascending => write!(f, "ASCENDING"),
            TokenKind::Desc => write!(f, "DESC"),
            TokenKind::Descending => write!(f, "DESCENDING"),
            TokenKind::Skip => write!(f, "SKIP"),
            TokenKind::Limit => write!(f, "LIMIT"),
            TokenKind::Union => write!(f, "UNION"),
            TokenKind::All => write!(f, "ALL"),
            TokenKind::Distinct => write!(f, "DISTINCT"),
            TokenKind::Call => write!(f, "CALL"),
            TokenKind::And => write!(f, "AND"),
            TokenKind::Or => write!(f, "OR"),
            TokenKind::Xor => write!(f, "XOR"),
            TokenKind::Not => write!(f, "NOT"),
            TokenKind::In => write!(f, "IN"),
            TokenKind::Starts => write!(f, "STARTS"),
            TokenKind::Ends => write!(f, "ENDS"),
            TokenKind::Contains => write!(f, "CONTAINS"),
            TokenKind::Is => write!(f, "IS"),
            TokenKind::Null => write!(f, "NULL"),
            TokenKind::True => write!(f, "TRUE"),
            TokenKind::False => write!(f, "FALSE"),
            TokenKind::Case => write!(f, "CASE"),
            TokenKind::When => write!(f, "WHEN"),
            TokenKind::Then => write!(f, "THEN"),
            TokenKind::Else => write!(f, "ELSE"),
            TokenKind::End => write!(f, "END"),
            TokenKind::Count => write!(f, "COUNT"),
            TokenKind::Filter => write!(f, "FILTER"),
            TokenKind::Extract => write!(f, "EXTRACT"),
            TokenKind::Any => write!(f, "ANY"),
            TokenKind::None => write!(f, "NONE"),
            TokenKind::Single => write!(f, "SINGLE"),
            TokenKind::Identifier(name) => write!(f, "{name}"),
            TokenKind::DelimitedIdentifier(name) => write!(f, "`{name}`"),
            TokenKind::StringLiteral(s) => write!(f, "'{s}'"),
            TokenKind::IntegerLiteral(n) => write!(f, "{n}"),
            TokenKind::FloatLiteral(n) => write!(f, "{n}"),
            TokenKind::Parameter(name) => write!(f, "${name}"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Caret => write!(f, "^"),
            TokenKind::Eq => write!(f, "="),
            TokenKind::NotEq => write!(f, "<>"),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::LtEq => write!(f, "<="),
            TokenKind::GtEq => write!(f, ">="),
            TokenKind::Arrow => write!(f, "->"),
            TokenKind::LeftArrow => write!(f, "<-"),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::DotDot => write!(f, ".."),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Eof => write!(f, "<EOF>"),
        }
    }
}

/// A lexical token with its kind and source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span in source text.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the source slice covered by this token.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_creation() {
        let token = Token::new(TokenKind::Match, 0..5);
        assert_eq!(token.kind, TokenKind::Match);
        assert_eq!(token.span, 0..5);
    }

    #[test]
    fn token_kind_is_keyword() {
        assert!(TokenKind::Match.is_keyword());
        assert!(TokenKind::Where.is_keyword());
        assert!(TokenKind::And.is_keyword());
        assert!(!TokenKind::Identifier("foo".into()).is_keyword());
        assert!(!TokenKind::Plus.is_keyword());
    }

    #[test]
    fn token_kind_is_literal() {
        assert!(TokenKind::StringLiteral("test".into()).is_literal());
        assert!(TokenKind::IntegerLiteral("42".into()).is_literal());
        assert!(TokenKind::True.is_literal());
        assert!(TokenKind::Null.is_literal());
        assert!(!TokenKind::Match.is_literal());
        assert!(!TokenKind::Plus.is_literal());
    }

    #[test]
    fn token_kind_is_operator() {
        assert!(TokenKind::Plus.is_operator());
        assert!(TokenKind::Arrow.is_operator());
        assert!(TokenKind::Eq.is_operator());
        assert!(!TokenKind::Match.is_operator());
        assert!(!TokenKind::LParen.is_operator());
    }

    #[test]
    fn token_kind_display() {
        assert_eq!(TokenKind::Match.to_string(), "MATCH");
        assert_eq!(TokenKind::Plus.to_string(), "+");
        assert_eq!(TokenKind::Arrow.to_string(), "->");
        assert_eq!(
            TokenKind::StringLiteral("hello".into()).to_string(),
            "'hello'"
        );
        assert_eq!(TokenKind::Identifier("foo".into()).to_string(), "foo");
    }
}
