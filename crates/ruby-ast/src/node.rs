//! Target AST nodes.

use crate::SourceMap;
use smol_str::SmolStr;
use std::fmt;

/// The closed kind set of the downstream toolchain's AST.
///
/// Not one-to-one with the upstream CST: several CST kinds collapse onto
/// one target kind (every variable write becomes its family's `*asgn`), and
/// a few target kinds arise only from context (`MatchVar` exists only
/// inside patterns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AstKind {
    Alias,
    And,
    AndAsgn,
    Arg,
    Args,
    Array,
    ArrayPattern,
    BackRef,
    Begin,
    Block,
    BlockPass,
    Blockarg,
    Break,
    Case,
    CaseMatch,
    Casgn,
    Cbase,
    Class,
    Complex,
    Const,
    ConstPattern,
    Csend,
    Cvar,
    Cvasgn,
    Def,
    Defined,
    Defs,
    Dstr,
    Dsym,
    EmptyElse,
    EncodingLiteral,
    Ensure,
    Erange,
    False,
    FileLiteral,
    FindPattern,
    Float,
    For,
    ForwardArg,
    ForwardedArgs,
    ForwardedKwrestarg,
    ForwardedRestarg,
    Gvar,
    Gvasgn,
    Hash,
    HashPattern,
    Ident,
    If,
    IfGuard,
    InPattern,
    Index,
    IndexAsgn,
    Int,
    Irange,
    Ivar,
    Ivasgn,
    KwBegin,
    Kwarg,
    Kwnilarg,
    Kwoptarg,
    Kwrestarg,
    Kwsplat,
    Lambda,
    LineLiteral,
    Lvar,
    Lvasgn,
    Masgn,
    MatchAlt,
    MatchAs,
    MatchPattern,
    MatchPatternP,
    MatchRest,
    MatchVar,
    MatchWithLvasgn,
    Mlhs,
    Module,
    Next,
    Nil,
    NthRef,
    OpAsgn,
    Optarg,
    Or,
    OrAsgn,
    Pair,
    Pin,
    Postexe,
    Preexe,
    Procarg0,
    Rational,
    Redo,
    Regexp,
    Regopt,
    Resbody,
    Rescue,
    Restarg,
    Retry,
    Return,
    Sclass,
    SelfExpr,
    Send,
    Shadowarg,
    Splat,
    Str,
    Super,
    Sym,
    True,
    Undef,
    UnlessGuard,
    Until,
    UntilPost,
    When,
    While,
    WhilePost,
    Xstr,
    Yield,
    Zsuper,
}

impl AstKind {
    /// The s-expression tag for this kind.
    pub fn name(self) -> &'static str {
        match self {
            AstKind::Alias => "alias",
            AstKind::And => "and",
            AstKind::AndAsgn => "and_asgn",
            AstKind::Arg => "arg",
            AstKind::Args => "args",
            AstKind::Array => "array",
            AstKind::ArrayPattern => "array_pattern",
            AstKind::BackRef => "back_ref",
            AstKind::Begin => "begin",
            AstKind::Block => "block",
            AstKind::BlockPass => "block_pass",
            AstKind::Blockarg => "blockarg",
            AstKind::Break => "break",
            AstKind::Case => "case",
            AstKind::CaseMatch => "case_match",
            AstKind::Casgn => "casgn",
            AstKind::Cbase => "cbase",
            AstKind::Class => "class",
            AstKind::Complex => "complex",
            AstKind::Const => "const",
            AstKind::ConstPattern => "const_pattern",
            AstKind::Csend => "csend",
            AstKind::Cvar => "cvar",
            AstKind::Cvasgn => "cvasgn",
            AstKind::Def => "def",
            AstKind::Defined => "defined?",
            AstKind::Defs => "defs",
            AstKind::Dstr => "dstr",
            AstKind::Dsym => "dsym",
            AstKind::EmptyElse => "empty_else",
            AstKind::EncodingLiteral => "__ENCODING__",
            AstKind::Ensure => "ensure",
            AstKind::Erange => "erange",
            AstKind::False => "false",
            AstKind::FileLiteral => "__FILE__",
            AstKind::FindPattern => "find_pattern",
            AstKind::Float => "float",
            AstKind::For => "for",
            AstKind::ForwardArg => "forward_arg",
            AstKind::ForwardedArgs => "forwarded_args",
            AstKind::ForwardedKwrestarg => "forwarded_kwrestarg",
            AstKind::ForwardedRestarg => "forwarded_restarg",
            AstKind::Gvar => "gvar",
            AstKind::Gvasgn => "gvasgn",
            AstKind::Hash => "hash",
            AstKind::HashPattern => "hash_pattern",
            AstKind::Ident => "ident",
            AstKind::If => "if",
            AstKind::IfGuard => "if_guard",
            AstKind::InPattern => "in_pattern",
            AstKind::Index => "index",
            AstKind::IndexAsgn => "indexasgn",
            AstKind::Int => "int",
            AstKind::Irange => "irange",
            AstKind::Ivar => "ivar",
            AstKind::Ivasgn => "ivasgn",
            AstKind::KwBegin => "kwbegin",
            AstKind::Kwarg => "kwarg",
            AstKind::Kwnilarg => "kwnilarg",
            AstKind::Kwoptarg => "kwoptarg",
            AstKind::Kwrestarg => "kwrestarg",
            AstKind::Kwsplat => "kwsplat",
            AstKind::Lambda => "lambda",
            AstKind::LineLiteral => "__LINE__",
            AstKind::Lvar => "lvar",
            AstKind::Lvasgn => "lvasgn",
            AstKind::Masgn => "masgn",
            AstKind::MatchAlt => "match_alt",
            AstKind::MatchAs => "match_as",
            AstKind::MatchPattern => "match_pattern",
            AstKind::MatchPatternP => "match_pattern_p",
            AstKind::MatchRest => "match_rest",
            AstKind::MatchVar => "match_var",
            AstKind::MatchWithLvasgn => "match_with_lvasgn",
            AstKind::Mlhs => "mlhs",
            AstKind::Module => "module",
            AstKind::Next => "next",
            AstKind::Nil => "nil",
            AstKind::NthRef => "nth_ref",
            AstKind::OpAsgn => "op_asgn",
            AstKind::Optarg => "optarg",
            AstKind::Or => "or",
            AstKind::OrAsgn => "or_asgn",
            AstKind::Pair => "pair",
            AstKind::Pin => "pin",
            AstKind::Postexe => "postexe",
            AstKind::Preexe => "preexe",
            AstKind::Procarg0 => "procarg0",
            AstKind::Rational => "rational",
            AstKind::Redo => "redo",
            AstKind::Regexp => "regexp",
            AstKind::Regopt => "regopt",
            AstKind::Resbody => "resbody",
            AstKind::Rescue => "rescue",
            AstKind::Restarg => "restarg",
            AstKind::Retry => "retry",
            AstKind::Return => "return",
            AstKind::Sclass => "sclass",
            AstKind::SelfExpr => "self",
            AstKind::Send => "send",
            AstKind::Shadowarg => "shadowarg",
            AstKind::Splat => "splat",
            AstKind::Str => "str",
            AstKind::Super => "super",
            AstKind::Sym => "sym",
            AstKind::True => "true",
            AstKind::Undef => "undef",
            AstKind::UnlessGuard => "unless_guard",
            AstKind::Until => "until",
            AstKind::UntilPost => "until_post",
            AstKind::When => "when",
            AstKind::While => "while",
            AstKind::WhilePost => "while_post",
            AstKind::Xstr => "xstr",
            AstKind::Yield => "yield",
            AstKind::Zsuper => "zsuper",
        }
    }
}

/// One child of a target node: a nested node or a plain value.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Node(Node),
    Sym(SmolStr),
    Str(String),
    Int(i64),
    Float(f64),
    /// An explicitly absent child slot.
    None,
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Child::Node(node)
    }
}

impl From<Option<Node>> for Child {
    fn from(node: Option<Node>) -> Self {
        match node {
            Some(node) => Child::Node(node),
            None => Child::None,
        }
    }
}

/// A target AST node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: AstKind,
    pub children: Vec<Child>,
    pub map: SourceMap,
}

impl Node {
    /// Creates a new node.
    pub fn new(kind: AstKind, children: Vec<Child>, map: SourceMap) -> Self {
        Self {
            kind,
            children,
            map,
        }
    }

    /// Returns the range spanning the whole construct.
    pub fn expression(&self) -> source_span::Span {
        self.map.expression()
    }

    /// Returns the same node re-tagged with another kind.
    pub fn updated(mut self, kind: AstKind) -> Node {
        self.kind = kind;
        self
    }

    /// Returns the text of a single-`Str`-child node, if that is its shape.
    pub fn str_value(&self) -> Option<&str> {
        match self.children.as_slice() {
            [Child::Str(text)] => Some(text),
            _ => None,
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "({}", self.kind.name())?;
        for child in &self.children {
            match child {
                Child::Node(node) => {
                    writeln!(f)?;
                    for _ in 0..indent + 1 {
                        f.write_str("  ")?;
                    }
                    node.fmt_indented(f, indent + 1)?;
                }
                Child::Sym(name) => write!(f, " :{name}")?,
                Child::Str(text) => write!(f, " {:?}", text)?,
                Child::Int(value) => write!(f, " {value}")?,
                Child::Float(value) => write!(f, " {value:?}")?,
                Child::None => f.write_str(" nil")?,
            }
        }
        f.write_str(")")
    }
}

impl fmt::Display for Node {
    /// Renders the node as an indented s-expression.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use source_span::Span;

    fn bare(span: Span) -> SourceMap {
        SourceMap::Bare { expression: span }
    }

    #[test]
    fn test_display_leaf() {
        let node = Node::new(
            AstKind::Int,
            vec![Child::Int(42)],
            bare(Span::new(0u32, 2u32)),
        );
        assert_eq!(node.to_string(), "(int 42)");
    }

    #[test]
    fn test_display_nested() {
        let lhs = Node::new(
            AstKind::Lvar,
            vec![Child::Sym("a".into())],
            bare(Span::new(0u32, 1u32)),
        );
        let rhs = Node::new(
            AstKind::Lvar,
            vec![Child::Sym("b".into())],
            bare(Span::new(6u32, 7u32)),
        );
        let node = Node::new(
            AstKind::And,
            vec![lhs.into(), rhs.into()],
            bare(Span::new(0u32, 7u32)),
        );
        assert_eq!(node.to_string(), "(and\n  (lvar :a)\n  (lvar :b))");
    }

    #[test]
    fn test_display_none_child() {
        let node = Node::new(
            AstKind::Send,
            vec![Child::None, Child::Sym("puts".into())],
            bare(Span::new(0u32, 4u32)),
        );
        assert_eq!(node.to_string(), "(send nil :puts)");
    }
}
