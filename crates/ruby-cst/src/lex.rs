//! Raw lexical output of the upstream parser: tokens, comments, and the
//! bundle handed to translation.

use crate::{Location, Node};
use smol_str::SmolStr;

/// One token of the upstream lexer's flat stream.
///
/// Kind tags are upstream-defined strings carried through as-is; the
/// adapter downstream re-addresses the range and slices the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexToken {
    /// The upstream kind tag, e.g. `kw_if` or `ident`.
    pub kind: SmolStr,
    pub location: Location,
}

impl LexToken {
    /// Creates a new token.
    pub fn new(kind: impl Into<SmolStr>, location: Location) -> Self {
        Self {
            kind: kind.into(),
            location,
        }
    }
}

/// The kind of a comment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// A `# ...` comment running to the end of the line.
    Line,
    /// An `=begin`/`=end` block.
    Block,
    /// The pseudo-comment covering the data section after the end-of-script
    /// marker. Excluded from translated comment lists.
    TrailingData,
}

/// A comment as reported by the upstream parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    pub location: Location,
}

impl Comment {
    /// Creates a new comment record.
    pub fn new(kind: CommentKind, location: Location) -> Self {
        Self { kind, location }
    }
}

/// Everything the upstream parser emits for one compilation unit.
///
/// `root` is the program node, absent for an empty unit. `tokens` is only
/// populated when the parser was asked to lex as well as parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedUnit {
    /// The original source text all locations index into.
    pub source: String,
    pub root: Option<Node>,
    pub comments: Vec<Comment>,
    pub tokens: Vec<LexToken>,
}

impl ParsedUnit {
    /// Creates a unit with no comments or tokens.
    pub fn new(source: impl Into<String>, root: Option<Node>) -> Self {
        Self {
            source: source.into(),
            root,
            comments: Vec::new(),
            tokens: Vec::new(),
        }
    }
}
