//! Graph patterns: node patterns, relationship patterns, and the paths built
//! by chaining them, as used by `MATCH`, `CREATE`, `MERGE`, and pattern
//! expressions/comprehensions.

use super::expression::Expr;
use super::identifier::{SchemaName, Variable};
use super::span::Span;
use smol_str::SmolStr;

/// A full pattern clause body: one or more comma-separated parts.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub parts: Vec<PatternPart>,
    pub span: Span,
}

/// A single pattern part, optionally bound to a path variable:
/// `p = (a)-->(b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternPart {
    pub variable: Option<Variable>,
    pub element: PatternElement,
    pub span: Span,
}

/// A chain of alternating node and relationship patterns, e.g.
/// `(a)-[r]->(b)-->(c)`. `relationships[i]` connects `nodes[i]` to
/// `nodes[i + 1]`, so `relationships.len() == nodes.len() - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternElement {
    pub nodes: Vec<NodePattern>,
    pub relationships: Vec<RelationshipPattern>,
    pub span: Span,
}

/// A node pattern: `(n:Label {prop: 1})`.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePattern {
    pub variable: Option<Variable>,
    pub labels: Vec<SchemaName>,
    pub properties: Option<Properties>,
    pub span: Span,
}

/// Which way a relationship pattern's arrowheads point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipDirection {
    /// `<-...-`: right-to-left.
    Left,
    /// `-...->`: left-to-right.
    Right,
    /// `<-...->`: both arrowheads present.
    Both,
    /// `-...-`: direction unconstrained, no arrowheads.
    Undirected,
}

/// The decoded hop-count bounds of a variable-length relationship's `*`
/// quantifier. Each syntactic form is its own variant rather than a pair of
/// sentinel-bearing integers, so "unbounded" and "unspecified" can never be
/// confused with a real bound of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopRange {
    /// `*`: zero or more hops, no stated bound either side.
    Unbounded,
    /// `*n`: exactly `n` hops.
    Exact(u32),
    /// `*n..`: at least `n` hops.
    AtLeast(u32),
    /// `*n..m`: between `n` and `m` hops inclusive.
    Between(u32, u32),
    /// `*..m`: at most `m` hops.
    UpTo(u32),
}

impl HopRange {
    /// The hop count used when a relationship pattern carries no `*` at
    /// all: a single, fixed hop, written out during restoration as `*1..1`.
    pub fn single_hop() -> Self {
        HopRange::Between(1, 1)
    }
}

/// A relationship pattern: `-[r:TYPE*1..2 {prop: 1}]->`. `range` is always
/// populated (defaulting to [`HopRange::single_hop`]) since every
/// relationship pattern has a concrete hop count whether or not `*` was
/// written in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipPattern {
    pub variable: Option<Variable>,
    pub types: Vec<SchemaName>,
    pub range: HopRange,
    pub properties: Option<Properties>,
    pub direction: RelationshipDirection,
    pub span: Span,
}

/// The properties attached to a node or relationship pattern: either an
/// inline `{...}` map or a `$parameter` supplying the whole map at run time.
/// Kept distinct from a general map literal because pattern property maps
/// may only appear in this position, not as a general expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Properties {
    Map {
        entries: Vec<(SchemaName, Expr)>,
        span: Span,
    },
    Parameter {
        name: SmolStr,
        span: Span,
    },
}

impl Properties {
    pub fn span(&self) -> Span {
        match self {
            Properties::Map { span, .. } => span.clone(),
            Properties::Parameter { span, .. } => span.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hop_range_single_hop_defaults_to_between_one_one() {
        assert_eq!(HopRange::single_hop(), HopRange::Between(1, 1));
    }

    #[test]
    fn hop_range_variants_are_distinguishable() {
        assert_ne!(HopRange::Unbounded, HopRange::Exact(1));
        assert_ne!(HopRange::AtLeast(2), HopRange::UpTo(2));
    }

    #[test]
    fn pattern_element_invariant_relationship_count() {
        let element = PatternElement {
            nodes: vec![
                NodePattern {
                    variable: None,
                    labels: vec![],
                    properties: None,
                    span: 0..1,
                },
                NodePattern {
                    variable: None,
                    labels: vec![],
                    properties: None,
                    span: 5..6,
                },
            ],
            relationships: vec![RelationshipPattern {
                variable: None,
                types: vec![],
                range: HopRange::single_hop(),
                properties: None,
                direction: RelationshipDirection::Right,
                span: 1..5,
            }],
            span: 0..6,
        };
        assert_eq!(element.relationships.len(), element.nodes.len() - 1);
    }
}
