//! Translates the upstream Ruby parser's concrete syntax tree into the
//! canonical AST consumed by the downstream analysis toolchain.
//!
//! The parser has already done the lexing, parsing, and error recovery;
//! this crate is purely post-parse. It re-shapes the tree into the target
//! node vocabulary and reconstructs fine-grained source ranges, including
//! ranges for tokens the CST does not retain (optional keywords,
//! separators, assignment operators, heredoc line boundaries).
//!
//! # Example
//!
//! ```
//! use ruby_cst::{
//!     BinaryBooleanNode, Location, Node, ParsedUnit, ProgramNode, StatementsNode,
//!     VariableRefNode,
//! };
//! use ruby_translator::translate;
//!
//! // a and b
//! let source = "a and b";
//! let lvar = |name: &str, start, end| {
//!     Node::LocalVariableRead(VariableRefNode {
//!         name: name.into(),
//!         location: Location::new(start, end),
//!     })
//! };
//! let root = Node::Program(ProgramNode {
//!     locals: vec!["a".into(), "b".into()],
//!     statements: Box::new(StatementsNode {
//!         body: vec![Node::And(BinaryBooleanNode {
//!             left: Box::new(lvar("a", 0, 1)),
//!             right: Box::new(lvar("b", 6, 7)),
//!             operator_loc: Location::new(2, 5),
//!             location: Location::new(0, 7),
//!         })],
//!         location: Location::new(0, 7),
//!     }),
//!     location: Location::new(0, 7),
//! });
//!
//! let unit = ParsedUnit::new(source, Some(root));
//! let ast = translate(&unit).unwrap().unwrap();
//! assert_eq!(ast.to_string(), "(and\n  (lvar :a)\n  (lvar :b))");
//! ```

mod adapter;
mod context;
mod error;
mod heredoc;
mod transducer;
mod validate;

pub use context::Context;
pub use error::TranslateError;
pub use transducer::Translator;
pub use validate::assert_complete;

use ruby_cst::ParsedUnit;
use source_span::OffsetCache;
use std::sync::OnceLock;

/// Everything a translation produces. `comments` and `tokens` are filled
/// only by the entry points that ask for them.
#[derive(Debug)]
pub struct Translation {
    /// The translated tree; `None` for an empty compilation unit.
    pub ast: Option<ruby_ast::Node>,
    pub comments: Vec<ruby_ast::Comment>,
    pub tokens: Vec<ruby_ast::Token>,
}

/// Runs the completeness check once per process, before the first unit.
fn rules_checked() -> Result<(), TranslateError> {
    static CHECKED: OnceLock<Result<(), TranslateError>> = OnceLock::new();
    CHECKED.get_or_init(validate::assert_complete).clone()
}

/// Translates one parsed unit into the target tree.
///
/// Each call builds a fresh translator with its own offset cache, so a
/// failed unit leaves nothing behind for the next one.
pub fn translate(unit: &ParsedUnit) -> Result<Option<ruby_ast::Node>, TranslateError> {
    rules_checked()?;
    match unit.root.as_ref() {
        Some(root) => Translator::new(&unit.source).translate_root(root),
        None => Ok(None),
    }
}

/// Translates one parsed unit, also adapting its comment stream.
pub fn translate_with_comments(unit: &ParsedUnit) -> Result<Translation, TranslateError> {
    let ast = translate(unit)?;
    let mut offsets = OffsetCache::new(&unit.source);
    Ok(Translation {
        ast,
        comments: adapter::comments(unit, &mut offsets),
        tokens: Vec::new(),
    })
}

/// Translates one parsed unit, also adapting its comment and token
/// streams.
pub fn translate_with_tokens(unit: &ParsedUnit) -> Result<Translation, TranslateError> {
    let ast = translate(unit)?;
    let mut offsets = OffsetCache::new(&unit.source);
    Ok(Translation {
        ast,
        comments: adapter::comments(unit, &mut offsets),
        tokens: adapter::tokens(unit, &mut offsets),
    })
}
