//! The top-level statement: a single query plus any `UNION` siblings, or an
//! unmodeled standalone procedure call.
//!
//! The grammar distinguishes a single-part query (reading/updating clauses
//! followed by one optional `RETURN`) from a multi-part query (the same,
//! chaining through `WITH` into another query part). Both collapse here into
//! one flat sequence of [`QueryPart`]s separated by their `WITH` clauses,
//! since a multi-part query is just several single parts stitched together.

use super::clause::{ReadingClause, ReturnClause, UpdatingClause, WithClause};
use super::span::Span;

/// One segment of a query: the reading/updating clauses that precede either
/// a `WITH` (continuing into the next part) or the final `RETURN`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPart {
    pub reading_clauses: Vec<ReadingClause>,
    pub updating_clauses: Vec<UpdatingClause>,
    pub with: Option<WithClause>,
    pub span: Span,
}

/// A query body: one or more [`QueryPart`]s terminated by an optional
/// `RETURN`. `return_clause` is `None` only when the last part ends in an
/// updating clause with no `RETURN`, which is legal for write-only queries.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleQuery {
    pub parts: Vec<QueryPart>,
    pub return_clause: Option<ReturnClause>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionClause {
    pub all: bool,
    pub query: SingleQuery,
    pub span: Span,
}

/// `query UNION [ALL] query UNION [ALL] query ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularQuery {
    pub query: SingleQuery,
    pub unions: Vec<UnionClause>,
    pub span: Span,
}

/// A `CALL procedure(...)` statement with no enclosing query. The procedure
/// body itself is out of scope; a statement of this shape parses but is
/// rejected as an unsupported feature during lowering.
#[derive(Debug, Clone, PartialEq)]
pub struct StandaloneCall {
    pub span: Span,
}

/// The top-level parsed unit.
#[derive(Debug, Clone, PartialEq)]
pub enum CypherStatement {
    Query(RegularQuery),
    StandaloneCall(StandaloneCall),
}

impl CypherStatement {
    pub fn span(&self) -> Span {
        match self {
            CypherStatement::Query(q) => q.span.clone(),
            CypherStatement::StandaloneCall(c) => c.span.clone(),
        }
    }
}
