//! Canonical AST vocabulary for the downstream analysis toolchain.
//!
//! Every translated construct becomes a [`Node`]: a tagged kind, an ordered
//! child sequence, and exactly one [`SourceMap`] bundling the full-node
//! range with the named sub-token ranges that kind carries. Nodes are only
//! ever constructed through the [`Builder`] factory, whose argument
//! contracts are the translator's effective output format.

mod builder;
mod node;
mod source_map;

pub use builder::{Builder, CallOperator, KeywordCmd, LogicalOp, LoopKind, Tok};
pub use node::{AstKind, Child, Node};
pub use source_map::SourceMap;

use source_span::Span;

/// A comment adapted to the downstream format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment {
    /// The range covering the comment text, marker included.
    pub span: Span,
}

/// A lexical token adapted to the downstream format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The downstream tag for this token.
    pub name: smol_str::SmolStr,
    /// The token text as written in the source.
    pub text: String,
    pub span: Span,
}
