//! Concrete syntax tree vocabulary for the upstream Ruby parser.
//!
//! This crate is the data contract between the external parser and the
//! translation pipeline: the byte-offset [`Location`] type, one struct per
//! CST node kind plus the [`Node`] enum over all of them, the raw lexical
//! token and comment records, and [`ParsedUnit`] bundling everything the
//! parser emits for one compilation unit.
//!
//! Nothing in this crate parses source text. Values of these types are
//! produced by the external parser (or constructed by hand in tests) and
//! consumed read-only by the translator.

mod kind;
mod lex;
mod location;
mod node;

pub use kind::NodeKind;
pub use lex::{Comment, CommentKind, LexToken, ParsedUnit};
pub use location::Location;
pub use node::*;
