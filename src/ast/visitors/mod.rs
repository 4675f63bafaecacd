//! Ready-to-use AST visitors built on the Enter/Leave traversal protocol.

pub mod span;
pub mod variable;

pub use span::SpanCollector;
pub use variable::VariableCollector;
