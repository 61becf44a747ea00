//! The node factory.
//!
//! Translation never constructs [`Node`] values directly; every target
//! construct goes through exactly one method here, taking the child nodes
//! and the source tokens that kind records. A token argument is a
//! `(text, span)` pair and is optional wherever the surface syntax can
//! elide the token.

use crate::{AstKind, Child, Node, SourceMap};
use smol_str::SmolStr;
use source_span::Span;

/// A lexical token handed to the factory: its text and its span.
pub type Tok = (SmolStr, Span);

/// The two logical operator node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// The two conditional loop node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    While,
    Until,
}

/// Keyword commands: jump statements and their relatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordCmd {
    Break,
    Next,
    Redo,
    Retry,
    Return,
    Super,
    Yield,
    Zsuper,
    Defined,
}

impl KeywordCmd {
    fn kind(self) -> AstKind {
        match self {
            KeywordCmd::Break => AstKind::Break,
            KeywordCmd::Next => AstKind::Next,
            KeywordCmd::Redo => AstKind::Redo,
            KeywordCmd::Retry => AstKind::Retry,
            KeywordCmd::Return => AstKind::Return,
            KeywordCmd::Super => AstKind::Super,
            KeywordCmd::Yield => AstKind::Yield,
            KeywordCmd::Zsuper => AstKind::Zsuper,
            KeywordCmd::Defined => AstKind::Defined,
        }
    }
}

/// The spelling of a call operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOperator {
    Dot,
    /// `&.`: produces the safe-navigation node kind.
    SafeNavigation,
    DoubleColon,
}

/// The node factory.
///
/// Stateless; one instance serves a whole translation.
#[derive(Debug, Default)]
pub struct Builder;

fn n(kind: AstKind, children: Vec<Child>, map: SourceMap) -> Node {
    Node::new(kind, children, map)
}

fn join(start: Span, end: Span) -> Span {
    Span::new(start.start, end.end)
}

/// The span covering a slice of nodes, if any.
fn parts_span(parts: &[Node]) -> Option<Span> {
    let first = parts.first()?.expression();
    let last = parts.last()?.expression();
    Some(join(first, last))
}

/// The first character of a span.
fn head_char(span: Span) -> Span {
    Span::new(span.start, span.start + text_size::TextSize::from(1))
}

/// The span less its final character.
fn trim_last_char(span: Span) -> Span {
    Span::new(span.start, span.end - text_size::TextSize::from(1))
}

/// The final character of a span.
fn last_char(span: Span) -> Span {
    Span::new(span.end - text_size::TextSize::from(1), span.end)
}

fn collection_map(begin: Option<&Tok>, parts: &[Node], end: Option<&Tok>) -> SourceMap {
    let begin_span = begin.map(|t| t.1);
    let end_span = end.map(|t| t.1);
    let inner = parts_span(parts);

    let start = begin_span
        .or(inner)
        .or(end_span)
        .unwrap_or_else(|| Span::empty(0u32));
    let finish = end_span
        .or(inner)
        .or(begin_span)
        .unwrap_or_else(|| Span::empty(0u32));

    SourceMap::Collection {
        begin: begin_span,
        end: end_span,
        expression: join(start, finish),
    }
}

/// Collection map for string-like composes; heredoc openings get the
/// dedicated heredoc shape instead.
fn string_map(begin: Option<&Tok>, parts: &[Node], end: Option<&Tok>) -> SourceMap {
    if let (Some(begin), Some(end)) = (begin, end) {
        if begin.0.starts_with("<<") {
            let body = parts_span(parts).unwrap_or_else(|| Span::empty(end.1.start));
            return SourceMap::Heredoc {
                expression: begin.1,
                heredoc_body: body,
                heredoc_end: end.1,
            };
        }
    }
    collection_map(begin, parts, end)
}

impl Builder {
    /// Creates a new factory.
    pub fn new() -> Self {
        Self
    }

    // === Literals ===

    /// `nil`
    pub fn nil(&self, t: Tok) -> Node {
        n(AstKind::Nil, vec![], SourceMap::Bare { expression: t.1 })
    }

    /// `true` / `false`
    pub fn boolean(&self, value: bool, t: Tok) -> Node {
        let kind = if value { AstKind::True } else { AstKind::False };
        n(kind, vec![], SourceMap::Bare { expression: t.1 })
    }

    /// `self`
    pub fn self_expr(&self, t: Tok) -> Node {
        n(
            AstKind::SelfExpr,
            vec![],
            SourceMap::Bare { expression: t.1 },
        )
    }

    /// `__ENCODING__`
    pub fn encoding_literal(&self, t: Tok) -> Node {
        n(
            AstKind::EncodingLiteral,
            vec![],
            SourceMap::Bare { expression: t.1 },
        )
    }

    /// `__FILE__`
    pub fn file_literal(&self, t: Tok) -> Node {
        n(
            AstKind::FileLiteral,
            vec![],
            SourceMap::Bare { expression: t.1 },
        )
    }

    /// `__LINE__`
    pub fn line_literal(&self, t: Tok) -> Node {
        n(
            AstKind::LineLiteral,
            vec![],
            SourceMap::Bare { expression: t.1 },
        )
    }

    /// `42`
    pub fn integer(&self, value: i64, span: Span) -> Node {
        n(
            AstKind::Int,
            vec![Child::Int(value)],
            SourceMap::Operator {
                operator: None,
                expression: span,
            },
        )
    }

    /// `1.0`
    pub fn float(&self, value: f64, span: Span) -> Node {
        n(
            AstKind::Float,
            vec![Child::Float(value)],
            SourceMap::Operator {
                operator: None,
                expression: span,
            },
        )
    }

    /// `1r`
    pub fn rational(&self, value: SmolStr, span: Span) -> Node {
        n(
            AstKind::Rational,
            vec![Child::Str(value.to_string())],
            SourceMap::Operator {
                operator: None,
                expression: span,
            },
        )
    }

    /// `1i`
    pub fn complex(&self, value: SmolStr, span: Span) -> Node {
        n(
            AstKind::Complex,
            vec![Child::Str(value.to_string())],
            SourceMap::Operator {
                operator: None,
                expression: span,
            },
        )
    }

    /// A numeric literal whose lexeme carries an explicit sign: the literal
    /// keeps its value, the sign becomes its operator range.
    pub fn unary_num(&self, sign_t: Tok, literal: Node) -> Node {
        let expression = join(sign_t.1, literal.expression());
        let map = literal
            .map
            .clone()
            .with_operator(sign_t.1)
            .with_expression(expression);
        Node::new(literal.kind, literal.children, map)
    }

    // === Strings, symbols, regexps ===

    /// A plain string fragment with no delimiters of its own.
    pub fn string_internal(&self, value: impl Into<String>, span: Span) -> Node {
        n(
            AstKind::Str,
            vec![Child::Str(value.into())],
            SourceMap::Bare { expression: span },
        )
    }

    /// `?a`
    pub fn character(&self, value: impl Into<String>, span: Span) -> Node {
        n(
            AstKind::Str,
            vec![Child::Str(value.into())],
            SourceMap::Collection {
                begin: Some(head_char(span)),
                end: None,
                expression: span,
            },
        )
    }

    /// A delimited string literal, plain or interpolated. A single plain
    /// fragment collapses onto the fragment itself.
    pub fn string_compose(
        &self,
        begin_t: Option<Tok>,
        parts: Vec<Node>,
        end_t: Option<Tok>,
    ) -> Node {
        self.compose(AstKind::Dstr, begin_t, parts, end_t)
    }

    /// A delimited command literal.
    pub fn xstring_compose(&self, begin_t: Tok, parts: Vec<Node>, end_t: Tok) -> Node {
        let map = string_map(Some(&begin_t), &parts, Some(&end_t));
        n(
            AstKind::Xstr,
            parts.into_iter().map(Child::from).collect(),
            map,
        )
    }

    /// `:foo`
    pub fn symbol(&self, value: impl Into<SmolStr>, span: Span) -> Node {
        n(
            AstKind::Sym,
            vec![Child::Sym(value.into())],
            SourceMap::Collection {
                begin: Some(head_char(span)),
                end: None,
                expression: span,
            },
        )
    }

    /// A bare symbol with no sigil, as in word lists and hash keys.
    pub fn symbol_internal(&self, value: impl Into<SmolStr>, span: Span) -> Node {
        n(
            AstKind::Sym,
            vec![Child::Sym(value.into())],
            SourceMap::Bare { expression: span },
        )
    }

    /// `:"foo #{bar}"`
    pub fn symbol_compose(&self, begin_t: Tok, parts: Vec<Node>, end_t: Tok) -> Node {
        if let [part] = parts.as_slice() {
            if part.kind == AstKind::Str {
                let map = collection_map(Some(&begin_t), &parts, Some(&end_t));
                let text = part.str_value().unwrap_or_default();
                return n(AstKind::Sym, vec![Child::Sym(SmolStr::new(text))], map);
            }
        }
        let map = collection_map(Some(&begin_t), &parts, Some(&end_t));
        n(
            AstKind::Dsym,
            parts.into_iter().map(Child::from).collect(),
            map,
        )
    }

    /// The option letters trailing a regexp literal.
    pub fn regexp_options(&self, value: &str, span: Span) -> Node {
        let mut letters: Vec<char> = value.chars().collect();
        letters.sort_unstable();
        letters.dedup();
        let children = letters
            .into_iter()
            .map(|letter| Child::Sym(SmolStr::new(letter.to_string())))
            .collect();
        n(
            AstKind::Regopt,
            children,
            SourceMap::Bare { expression: span },
        )
    }

    /// `/foo #{bar}/i`
    pub fn regexp_compose(
        &self,
        begin_t: Tok,
        parts: Vec<Node>,
        end_t: Tok,
        options: Node,
    ) -> Node {
        let expression = join(begin_t.1, options.expression());
        let mut children: Vec<Child> = parts.into_iter().map(Child::from).collect();
        children.push(options.into());
        n(
            AstKind::Regexp,
            children,
            SourceMap::Collection {
                begin: Some(begin_t.1),
                end: Some(end_t.1),
                expression,
            },
        )
    }

    /// `"foo" "bar"`: juxtaposed literals; a lone part passes through.
    pub fn word(&self, mut parts: Vec<Node>) -> Node {
        if parts.len() == 1 {
            return parts.remove(0);
        }
        let map = collection_map(None, &parts, None);
        n(
            AstKind::Dstr,
            parts.into_iter().map(Child::from).collect(),
            map,
        )
    }

    fn compose(
        &self,
        kind: AstKind,
        begin_t: Option<Tok>,
        parts: Vec<Node>,
        end_t: Option<Tok>,
    ) -> Node {
        let map = string_map(begin_t.as_ref(), &parts, end_t.as_ref());

        // A single plain fragment keeps its own shape, re-spanned to
        // include the delimiters.
        if parts.len() == 1 {
            let sole = &parts[0];
            if sole.kind == AstKind::Str || sole.kind == AstKind::Dstr {
                if begin_t.is_none() && end_t.is_none() {
                    let mut parts = parts;
                    return parts.remove(0);
                }
                let mut parts = parts;
                let sole = parts.remove(0);
                return Node::new(sole.kind, sole.children, map);
            }
        }

        n(kind, parts.into_iter().map(Child::from).collect(), map)
    }

    // === Variables and constants ===

    /// A bare identifier, re-tagged by the caller once its role is known.
    pub fn ident(&self, t: Tok) -> Node {
        let span = t.1;
        n(
            AstKind::Ident,
            vec![Child::Sym(t.0)],
            SourceMap::Variable {
                name: span,
                operator: None,
                expression: span,
            },
        )
    }

    /// `@foo`
    pub fn ivar(&self, t: Tok) -> Node {
        self.variable(AstKind::Ivar, t)
    }

    /// `@@foo`
    pub fn cvar(&self, t: Tok) -> Node {
        self.variable(AstKind::Cvar, t)
    }

    /// `$foo`
    pub fn gvar(&self, t: Tok) -> Node {
        self.variable(AstKind::Gvar, t)
    }

    fn variable(&self, kind: AstKind, t: Tok) -> Node {
        let span = t.1;
        n(
            kind,
            vec![Child::Sym(t.0)],
            SourceMap::Variable {
                name: span,
                operator: None,
                expression: span,
            },
        )
    }

    /// `$+`
    pub fn back_ref(&self, t: Tok) -> Node {
        let span = t.1;
        n(
            AstKind::BackRef,
            vec![Child::Sym(t.0)],
            SourceMap::Bare { expression: span },
        )
    }

    /// `$1`
    pub fn nth_ref(&self, number: u32, span: Span) -> Node {
        n(
            AstKind::NthRef,
            vec![Child::Int(number as i64)],
            SourceMap::Bare { expression: span },
        )
    }

    /// `Foo`
    pub fn const_(&self, name: impl Into<SmolStr>, span: Span) -> Node {
        n(
            AstKind::Const,
            vec![Child::None, Child::Sym(name.into())],
            SourceMap::Constant {
                double_colon: None,
                name: span,
                operator: None,
                expression: span,
            },
        )
    }

    /// `::Foo`
    pub fn const_global(&self, colon_t: Tok, name: impl Into<SmolStr>, name_span: Span) -> Node {
        let cbase = n(
            AstKind::Cbase,
            vec![],
            SourceMap::Bare {
                expression: colon_t.1,
            },
        );
        n(
            AstKind::Const,
            vec![cbase.into(), Child::Sym(name.into())],
            SourceMap::Constant {
                double_colon: Some(colon_t.1),
                name: name_span,
                operator: None,
                expression: join(colon_t.1, name_span),
            },
        )
    }

    /// `Foo::Bar`
    pub fn const_fetch(
        &self,
        scope: Node,
        colon_t: Tok,
        name: impl Into<SmolStr>,
        name_span: Span,
    ) -> Node {
        let expression = join(scope.expression(), name_span);
        n(
            AstKind::Const,
            vec![scope.into(), Child::Sym(name.into())],
            SourceMap::Constant {
                double_colon: Some(colon_t.1),
                name: name_span,
                operator: None,
                expression,
            },
        )
    }

    /// Re-tags a readable node as an assignment target.
    pub fn assignable(&self, node: Node) -> Node {
        match node.kind {
            AstKind::Ident | AstKind::Lvar => node.updated(AstKind::Lvasgn),
            AstKind::Ivar => node.updated(AstKind::Ivasgn),
            AstKind::Cvar => node.updated(AstKind::Cvasgn),
            AstKind::Gvar => node.updated(AstKind::Gvasgn),
            AstKind::Const => node.updated(AstKind::Casgn),
            _ => node,
        }
    }

    /// Wraps a read that may be a bare method call; nothing to resolve
    /// here, the caller already disambiguated.
    pub fn accessible(&self, node: Node) -> Node {
        node
    }

    // === Assignment ===

    /// `lhs = rhs`
    pub fn assign(&self, mut lhs: Node, eql_t: Tok, rhs: Node) -> Node {
        let expression = join(lhs.expression(), rhs.expression());
        lhs.children.push(rhs.into());
        let map = lhs.map.with_operator(eql_t.1).with_expression(expression);
        Node::new(lhs.kind, lhs.children, map)
    }

    /// `lhs += rhs`, `lhs &&= rhs`, `lhs ||= rhs`: the operator token
    /// arrives with its trailing `=` already stripped.
    pub fn op_assign(&self, lhs: Node, op_t: Tok, rhs: Node) -> Node {
        let lhs = match lhs.kind {
            AstKind::Index => lhs.updated(AstKind::IndexAsgn),
            _ => lhs,
        };
        let expression = join(lhs.expression(), rhs.expression());
        let (op_text, op_span) = op_t;
        let map = SourceMap::Operator {
            operator: Some(op_span),
            expression,
        };
        if op_text == "&&" {
            n(AstKind::AndAsgn, vec![lhs.into(), rhs.into()], map)
        } else if op_text == "||" {
            n(AstKind::OrAsgn, vec![lhs.into(), rhs.into()], map)
        } else {
            n(
                AstKind::OpAsgn,
                vec![lhs.into(), Child::Sym(op_text), rhs.into()],
                map,
            )
        }
    }

    /// `(foo, bar)` on the left of an assignment.
    pub fn multi_lhs(&self, begin_t: Option<Tok>, items: Vec<Node>, end_t: Option<Tok>) -> Node {
        let map = collection_map(begin_t.as_ref(), &items, end_t.as_ref());
        n(
            AstKind::Mlhs,
            items.into_iter().map(Child::from).collect(),
            map,
        )
    }

    /// `foo, bar = baz`
    pub fn multi_assign(&self, lhs: Node, eql_t: Tok, rhs: Node) -> Node {
        let expression = join(lhs.expression(), rhs.expression());
        n(
            AstKind::Masgn,
            vec![lhs.into(), rhs.into()],
            SourceMap::Operator {
                operator: Some(eql_t.1),
                expression,
            },
        )
    }

    // === Calls ===

    /// An ordinary method call in any receiver/parenthesization shape.
    #[allow(clippy::too_many_arguments)]
    pub fn call_method(
        &self,
        receiver: Option<Node>,
        dot: Option<(CallOperator, Span)>,
        selector: Option<Tok>,
        lparen_t: Option<Tok>,
        args: Vec<Node>,
        rparen_t: Option<Tok>,
    ) -> Node {
        let kind = match dot {
            Some((CallOperator::SafeNavigation, _)) => AstKind::Csend,
            _ => AstKind::Send,
        };
        let name = selector
            .as_ref()
            .map(|t| t.0.clone())
            .unwrap_or_else(|| SmolStr::new("call"));
        let selector_span = selector.as_ref().map(|t| t.1);

        let start = receiver
            .as_ref()
            .map(|r| r.expression())
            .or(selector_span)
            .or_else(|| lparen_t.as_ref().map(|t| t.1))
            .unwrap_or_else(|| Span::empty(0u32));
        let finish = rparen_t
            .as_ref()
            .map(|t| t.1)
            .or_else(|| args.last().map(|a| a.expression()))
            .or(selector_span)
            .unwrap_or(start);

        let mut children: Vec<Child> = vec![receiver.into(), Child::Sym(name)];
        children.extend(args.into_iter().map(Child::from));

        n(
            kind,
            children,
            SourceMap::Send {
                dot: dot.map(|(_, span)| span),
                selector: selector_span,
                operator: None,
                begin: lparen_t.map(|t| t.1),
                end: rparen_t.map(|t| t.1),
                expression: join(start, finish),
            },
        )
    }

    /// `foo.bar` on the left of an `=`; the `=` arrives via [`Self::assign`].
    pub fn attr_asgn(
        &self,
        receiver: Option<Node>,
        dot: Option<(CallOperator, Span)>,
        selector_t: Tok,
    ) -> Node {
        let kind = match dot {
            Some((CallOperator::SafeNavigation, _)) => AstKind::Csend,
            _ => AstKind::Send,
        };
        let name = SmolStr::new(format!("{}=", selector_t.0));
        let start = receiver
            .as_ref()
            .map(|r| r.expression())
            .unwrap_or(selector_t.1);
        n(
            kind,
            vec![receiver.into(), Child::Sym(name)],
            SourceMap::Send {
                dot: dot.map(|(_, span)| span),
                selector: Some(selector_t.1),
                operator: None,
                begin: None,
                end: None,
                expression: join(start, selector_t.1),
            },
        )
    }

    /// `recv[args]`
    pub fn index(
        &self,
        receiver: Node,
        lbrack_t: Option<Tok>,
        indexes: Vec<Node>,
        rbrack_t: Option<Tok>,
    ) -> Node {
        let recv_span = receiver.expression();
        let begin = lbrack_t
            .map(|t| t.1)
            .unwrap_or_else(|| Span::empty(recv_span.end));
        let end = rbrack_t
            .map(|t| t.1)
            .or_else(|| indexes.last().map(|i| last_char(i.expression())))
            .unwrap_or(begin);
        let mut children: Vec<Child> = vec![receiver.into()];
        children.extend(indexes.into_iter().map(Child::from));
        n(
            AstKind::Index,
            children,
            SourceMap::Index {
                begin,
                end,
                operator: None,
                expression: join(recv_span, end),
            },
        )
    }

    /// `recv[args]` on the left of an `=`.
    pub fn index_asgn(
        &self,
        receiver: Node,
        lbrack_t: Option<Tok>,
        indexes: Vec<Node>,
        rbrack_t: Option<Tok>,
    ) -> Node {
        self.index(receiver, lbrack_t, indexes, rbrack_t)
            .updated(AstKind::IndexAsgn)
    }

    /// `!foo` / `not foo`
    pub fn not_op(
        &self,
        not_t: Tok,
        begin_t: Option<Tok>,
        receiver: Option<Node>,
        end_t: Option<Tok>,
    ) -> Node {
        let receiver_child: Child = match receiver {
            Some(node) => node.into(),
            None => match (&begin_t, &end_t) {
                // `not()` negates an empty parenthesized expression.
                (Some(lparen), Some(rparen)) => n(
                    AstKind::Begin,
                    vec![],
                    SourceMap::Collection {
                        begin: Some(lparen.1),
                        end: Some(rparen.1),
                        expression: join(lparen.1, rparen.1),
                    },
                )
                .into(),
                _ => Child::None,
            },
        };
        let finish = end_t
            .as_ref()
            .map(|t| t.1)
            .or_else(|| match &receiver_child {
                Child::Node(node) => Some(node.expression()),
                _ => None,
            })
            .unwrap_or(not_t.1);
        n(
            AstKind::Send,
            vec![receiver_child, Child::Sym(SmolStr::new("!"))],
            SourceMap::Send {
                dot: None,
                selector: Some(not_t.1),
                operator: None,
                begin: begin_t.map(|t| t.1),
                end: end_t.map(|t| t.1),
                expression: join(not_t.1, finish),
            },
        )
    }

    /// `a and b` / `a or b`
    pub fn logical_op(&self, op: LogicalOp, lhs: Node, op_t: Tok, rhs: Node) -> Node {
        let kind = match op {
            LogicalOp::And => AstKind::And,
            LogicalOp::Or => AstKind::Or,
        };
        let expression = join(lhs.expression(), rhs.expression());
        n(
            kind,
            vec![lhs.into(), rhs.into()],
            SourceMap::Operator {
                operator: Some(op_t.1),
                expression,
            },
        )
    }

    /// `break`, `yield 1`, `super(foo)`, `defined?(a)` and friends.
    pub fn keyword_cmd(
        &self,
        cmd: KeywordCmd,
        keyword_t: Tok,
        lparen_t: Option<Tok>,
        args: Vec<Node>,
        rparen_t: Option<Tok>,
    ) -> Node {
        let finish = rparen_t
            .as_ref()
            .map(|t| t.1)
            .or_else(|| args.last().map(|a| a.expression()))
            .unwrap_or(keyword_t.1);
        n(
            cmd.kind(),
            args.into_iter().map(Child::from).collect(),
            SourceMap::Keyword {
                keyword: keyword_t.1,
                begin: lparen_t.map(|t| t.1),
                end: rparen_t.map(|t| t.1),
                expression: join(keyword_t.1, finish),
            },
        )
    }

    /// `foo(&bar)`
    pub fn block_pass(&self, amp_t: Tok, value: Option<Node>) -> Node {
        let finish = value
            .as_ref()
            .map(|v| v.expression())
            .unwrap_or(amp_t.1);
        n(
            AstKind::BlockPass,
            vec![value.into()],
            SourceMap::Operator {
                operator: Some(amp_t.1),
                expression: join(amp_t.1, finish),
            },
        )
    }

    /// A brace or `do` block adopted by a call.
    pub fn block(
        &self,
        method_call: Node,
        begin_t: Tok,
        args: Option<Node>,
        body: Option<Node>,
        end_t: Tok,
    ) -> Node {
        let expression = join(method_call.expression(), end_t.1);
        n(
            AstKind::Block,
            vec![method_call.into(), args.into(), body.into()],
            SourceMap::Collection {
                begin: Some(begin_t.1),
                end: Some(end_t.1),
                expression,
            },
        )
    }

    /// `->`: the lambda marker a block attaches to.
    pub fn call_lambda(&self, lambda_t: Tok) -> Node {
        n(
            AstKind::Lambda,
            vec![],
            SourceMap::Bare {
                expression: lambda_t.1,
            },
        )
    }

    /// `/regex/ =~ str` with named captures writing locals.
    pub fn match_op(&self, receiver: Node, match_t: Tok, arg: Node) -> Node {
        let expression = join(receiver.expression(), arg.expression());
        n(
            AstKind::MatchWithLvasgn,
            vec![receiver.into(), arg.into()],
            SourceMap::Operator {
                operator: Some(match_t.1),
                expression,
            },
        )
    }

    // === Collections ===

    /// `[1, 2]`
    pub fn array(&self, begin_t: Option<Tok>, elements: Vec<Node>, end_t: Option<Tok>) -> Node {
        let map = collection_map(begin_t.as_ref(), &elements, end_t.as_ref());
        n(
            AstKind::Array,
            elements.into_iter().map(Child::from).collect(),
            map,
        )
    }

    /// `foo(*bar)`
    pub fn splat(&self, star_t: Tok, value: Option<Node>) -> Node {
        let finish = value
            .as_ref()
            .map(|v| v.expression())
            .unwrap_or(star_t.1);
        let children = match value {
            Some(node) => vec![node.into()],
            None => vec![],
        };
        n(
            AstKind::Splat,
            children,
            SourceMap::Operator {
                operator: Some(star_t.1),
                expression: join(star_t.1, finish),
            },
        )
    }

    /// `{ a: 1 }`: or a braceless keyword-argument hash.
    pub fn associate(&self, begin_t: Option<Tok>, pairs: Vec<Node>, end_t: Option<Tok>) -> Node {
        let map = collection_map(begin_t.as_ref(), &pairs, end_t.as_ref());
        n(
            AstKind::Hash,
            pairs.into_iter().map(Child::from).collect(),
            map,
        )
    }

    /// `a => 1`
    pub fn pair(&self, key: Node, assoc_t: Tok, value: Node) -> Node {
        let expression = join(key.expression(), value.expression());
        n(
            AstKind::Pair,
            vec![key.into(), value.into()],
            SourceMap::Operator {
                operator: Some(assoc_t.1),
                expression,
            },
        )
    }

    /// `a: 1`: the span covers the label including its colon.
    pub fn pair_keyword(&self, key_t: Tok, value: Node) -> Node {
        let sym = self.symbol_internal(key_t.0, trim_last_char(key_t.1));
        let expression = join(key_t.1, value.expression());
        n(
            AstKind::Pair,
            vec![sym.into(), value.into()],
            SourceMap::Operator {
                operator: Some(last_char(key_t.1)),
                expression,
            },
        )
    }

    /// `{ foo: }`: shorthand whose value the caller resolved from scope.
    pub fn pair_label(&self, key_t: Tok, value: Node) -> Node {
        self.pair_keyword(key_t, value)
    }

    /// `"foo": 1`: a quoted label; the closing token carries both the
    /// quote and the colon.
    pub fn pair_quoted(&self, begin_t: Tok, parts: Vec<Node>, end_t: Tok, value: Node) -> Node {
        let colon = last_char(end_t.1);
        let quote_end = (end_t.0.clone(), trim_last_char(end_t.1));
        let key = self.symbol_compose(begin_t, parts, quote_end);
        let expression = join(key.expression(), value.expression());
        n(
            AstKind::Pair,
            vec![key.into(), value.into()],
            SourceMap::Operator {
                operator: Some(colon),
                expression,
            },
        )
    }

    /// `{ **foo }`
    pub fn kwsplat(&self, dstar_t: Tok, value: Node) -> Node {
        let expression = join(dstar_t.1, value.expression());
        n(
            AstKind::Kwsplat,
            vec![value.into()],
            SourceMap::Operator {
                operator: Some(dstar_t.1),
                expression,
            },
        )
    }

    /// `0..5` / `0...5`
    pub fn range(
        &self,
        exclusive: bool,
        left: Option<Node>,
        op_t: Tok,
        right: Option<Node>,
    ) -> Node {
        let kind = if exclusive {
            AstKind::Erange
        } else {
            AstKind::Irange
        };
        let start = left.as_ref().map(|l| l.expression()).unwrap_or(op_t.1);
        let finish = right.as_ref().map(|r| r.expression()).unwrap_or(op_t.1);
        n(
            kind,
            vec![left.into(), right.into()],
            SourceMap::Operator {
                operator: Some(op_t.1),
                expression: join(start, finish),
            },
        )
    }

    // === Statement grouping ===

    /// Wraps a statement list; `None` when it is empty, the sole statement
    /// when there is exactly one.
    pub fn compstmt(&self, mut statements: Vec<Node>) -> Option<Node> {
        match statements.len() {
            0 => None,
            1 => Some(statements.remove(0)),
            _ => {
                let map = collection_map(None, &statements, None);
                Some(n(
                    AstKind::Begin,
                    statements.into_iter().map(Child::from).collect(),
                    map,
                ))
            }
        }
    }

    /// `(expr)` and interpolation bodies.
    pub fn begin(&self, begin_t: Tok, body: Option<Node>, end_t: Tok) -> Node {
        let map = SourceMap::Collection {
            begin: Some(begin_t.1),
            end: Some(end_t.1),
            expression: join(begin_t.1, end_t.1),
        };
        match body {
            None => n(AstKind::Begin, vec![], map),
            Some(body) => {
                // Multi-statement and destructuring bodies adopt the
                // delimiters instead of nesting.
                let bare_group = body.kind == AstKind::Mlhs
                    || (body.kind == AstKind::Begin
                        && matches!(body.map, SourceMap::Collection { begin: None, .. }));
                if bare_group {
                    Node::new(body.kind, body.children, map)
                } else {
                    n(AstKind::Begin, vec![body.into()], map)
                }
            }
        }
    }

    /// `begin ... end`
    pub fn begin_keyword(&self, begin_t: Tok, body: Option<Node>, end_t: Tok) -> Node {
        let map = SourceMap::Collection {
            begin: Some(begin_t.1),
            end: Some(end_t.1),
            expression: join(begin_t.1, end_t.1),
        };
        match body {
            None => n(AstKind::KwBegin, vec![], map),
            Some(body) => {
                let bare_group = body.kind == AstKind::Begin
                    && matches!(body.map, SourceMap::Collection { begin: None, .. });
                if bare_group {
                    Node::new(AstKind::KwBegin, body.children, map)
                } else {
                    n(AstKind::KwBegin, vec![body.into()], map)
                }
            }
        }
    }

    // === Conditionals ===

    /// Keyword-form `if`/`unless`/`elsif`.
    #[allow(clippy::too_many_arguments)]
    pub fn condition(
        &self,
        cond_t: Tok,
        cond: Node,
        then_t: Option<Tok>,
        if_true: Option<Node>,
        else_t: Option<Tok>,
        if_false: Option<Node>,
        end_t: Option<Tok>,
    ) -> Node {
        let finish = end_t
            .as_ref()
            .map(|t| t.1)
            .or_else(|| if_false.as_ref().map(|e| e.expression()))
            .or_else(|| else_t.as_ref().map(|t| t.1))
            .or_else(|| if_true.as_ref().map(|e| e.expression()))
            .or_else(|| then_t.as_ref().map(|t| t.1))
            .unwrap_or_else(|| cond.expression());
        n(
            AstKind::If,
            vec![cond.into(), if_true.into(), if_false.into()],
            SourceMap::Condition {
                keyword: Some(cond_t.1),
                begin: then_t.map(|t| t.1),
                else_: else_t.map(|t| t.1),
                end: end_t.map(|t| t.1),
                expression: join(cond_t.1, finish),
            },
        )
    }

    /// Modifier-form `stmt if cond`: the body leads, the predicate trails,
    /// and there is no `end` token to record.
    pub fn condition_mod(
        &self,
        if_true: Option<Node>,
        if_false: Option<Node>,
        cond_t: Tok,
        cond: Node,
    ) -> Node {
        let start = if_true
            .as_ref()
            .or(if_false.as_ref())
            .map(|body| body.expression())
            .unwrap_or(cond_t.1);
        let cond_expr = cond.expression();
        n(
            AstKind::If,
            vec![cond.into(), if_true.into(), if_false.into()],
            SourceMap::Keyword {
                keyword: cond_t.1,
                begin: None,
                end: None,
                expression: join(start, cond_expr),
            },
        )
    }

    /// `foo ? bar : baz`
    pub fn ternary(
        &self,
        cond: Node,
        question_t: Tok,
        if_true: Node,
        colon_t: Tok,
        if_false: Node,
    ) -> Node {
        let expression = join(cond.expression(), if_false.expression());
        n(
            AstKind::If,
            vec![cond.into(), if_true.into(), if_false.into()],
            SourceMap::Ternary {
                question: question_t.1,
                colon: colon_t.1,
                expression,
            },
        )
    }

    // === Case ===

    /// One `when` arm.
    pub fn when(
        &self,
        when_t: Tok,
        conditions: Vec<Node>,
        then_t: Option<Tok>,
        body: Option<Node>,
    ) -> Node {
        let finish = body
            .as_ref()
            .map(|b| b.expression())
            .or_else(|| then_t.as_ref().map(|t| t.1))
            .or_else(|| conditions.last().map(|c| c.expression()))
            .unwrap_or(when_t.1);
        let mut children: Vec<Child> = conditions.into_iter().map(Child::from).collect();
        children.push(body.into());
        n(
            AstKind::When,
            children,
            SourceMap::Keyword {
                keyword: when_t.1,
                begin: then_t.map(|t| t.1),
                end: None,
                expression: join(when_t.1, finish),
            },
        )
    }

    /// `case foo; when ...; end`
    pub fn case(
        &self,
        case_t: Tok,
        expr: Option<Node>,
        when_bodies: Vec<Node>,
        else_t: Option<Tok>,
        else_body: Option<Node>,
        end_t: Tok,
    ) -> Node {
        let mut children: Vec<Child> = vec![expr.into()];
        children.extend(when_bodies.into_iter().map(Child::from));
        children.push(else_body.into());
        n(
            AstKind::Case,
            children,
            SourceMap::Condition {
                keyword: Some(case_t.1),
                begin: None,
                else_: else_t.map(|t| t.1),
                end: Some(end_t.1),
                expression: join(case_t.1, end_t.1),
            },
        )
    }

    /// `case foo; in ...; end`: an `else` with no body becomes an explicit
    /// empty-else marker so the downstream toolchain can see it was written.
    pub fn case_match(
        &self,
        case_t: Tok,
        expr: Option<Node>,
        in_bodies: Vec<Node>,
        else_t: Option<Tok>,
        else_body: Option<Node>,
        end_t: Tok,
    ) -> Node {
        let else_body = match (&else_t, else_body) {
            (Some(else_t), None) => Some(n(
                AstKind::EmptyElse,
                vec![],
                SourceMap::Bare {
                    expression: else_t.1,
                },
            )),
            (_, body) => body,
        };
        let mut children: Vec<Child> = vec![expr.into()];
        children.extend(in_bodies.into_iter().map(Child::from));
        children.push(else_body.into());
        n(
            AstKind::CaseMatch,
            children,
            SourceMap::Condition {
                keyword: Some(case_t.1),
                begin: None,
                else_: else_t.map(|t| t.1),
                end: Some(end_t.1),
                expression: join(case_t.1, end_t.1),
            },
        )
    }

    // === Loops ===

    /// Keyword-form `while`/`until`.
    pub fn loop_(
        &self,
        kind: LoopKind,
        keyword_t: Tok,
        cond: Node,
        do_t: Option<Tok>,
        body: Option<Node>,
        end_t: Tok,
    ) -> Node {
        let kind = match kind {
            LoopKind::While => AstKind::While,
            LoopKind::Until => AstKind::Until,
        };
        n(
            kind,
            vec![cond.into(), body.into()],
            SourceMap::Keyword {
                keyword: keyword_t.1,
                begin: do_t.map(|t| t.1),
                end: Some(end_t.1),
                expression: join(keyword_t.1, end_t.1),
            },
        )
    }

    /// Modifier-form `stmt while cond`; a begin-keyword body makes it the
    /// post-condition loop.
    pub fn loop_mod(
        &self,
        kind: LoopKind,
        body: Option<Node>,
        keyword_t: Tok,
        cond: Node,
    ) -> Node {
        let post = matches!(
            body.as_ref().map(|b| b.kind),
            Some(AstKind::KwBegin)
        );
        let kind = match (kind, post) {
            (LoopKind::While, false) => AstKind::While,
            (LoopKind::While, true) => AstKind::WhilePost,
            (LoopKind::Until, false) => AstKind::Until,
            (LoopKind::Until, true) => AstKind::UntilPost,
        };
        let start = body
            .as_ref()
            .map(|b| b.expression())
            .unwrap_or(keyword_t.1);
        let cond_expr = cond.expression();
        n(
            kind,
            vec![cond.into(), body.into()],
            SourceMap::Keyword {
                keyword: keyword_t.1,
                begin: None,
                end: None,
                expression: join(start, cond_expr),
            },
        )
    }

    /// `for foo in bar do ... end`
    #[allow(clippy::too_many_arguments)]
    pub fn for_(
        &self,
        for_t: Tok,
        index: Node,
        in_t: Tok,
        collection: Node,
        do_t: Option<Tok>,
        body: Option<Node>,
        end_t: Tok,
    ) -> Node {
        n(
            AstKind::For,
            vec![index.into(), collection.into(), body.into()],
            SourceMap::For {
                keyword: for_t.1,
                in_: in_t.1,
                begin: do_t.map(|t| t.1),
                end: end_t.1,
                expression: join(for_t.1, end_t.1),
            },
        )
    }

    // === Begin bodies: rescue, else, ensure ===

    /// One `rescue` clause.
    pub fn rescue_body(
        &self,
        keyword_t: Tok,
        exc_list: Option<Node>,
        assoc_t: Option<Tok>,
        exc_var: Option<Node>,
        then_t: Option<Tok>,
        body: Option<Node>,
    ) -> Node {
        let finish = body
            .as_ref()
            .map(|b| b.expression())
            .or_else(|| then_t.as_ref().map(|t| t.1))
            .or_else(|| exc_var.as_ref().map(|v| v.expression()))
            .or_else(|| exc_list.as_ref().map(|l| l.expression()))
            .unwrap_or(keyword_t.1);
        n(
            AstKind::Resbody,
            vec![exc_list.into(), exc_var.into(), body.into()],
            SourceMap::RescueBody {
                keyword: keyword_t.1,
                assoc: assoc_t.map(|t| t.1),
                begin: then_t.map(|t| t.1),
                expression: join(keyword_t.1, finish),
            },
        )
    }

    /// Layers rescue clauses, an else branch, and an ensure branch around a
    /// body. Returns `None` when there is nothing at all.
    pub fn begin_body(
        &self,
        compound: Option<Node>,
        rescue_bodies: Vec<Node>,
        else_t: Option<Tok>,
        else_: Option<Node>,
        ensure_t: Option<Tok>,
        ensure_body: Option<Node>,
    ) -> Option<Node> {
        let mut compound = compound;

        if !rescue_bodies.is_empty() {
            let start = compound
                .as_ref()
                .map(|c| c.expression())
                .or_else(|| rescue_bodies.first().map(|r| r.expression()))
                .unwrap_or_else(|| Span::empty(0u32));
            let finish = else_
                .as_ref()
                .map(|e| e.expression())
                .or_else(|| else_t.as_ref().map(|t| t.1))
                .or_else(|| rescue_bodies.last().map(|r| r.expression()))
                .unwrap_or(start);

            let mut children: Vec<Child> = vec![compound.into()];
            children.extend(rescue_bodies.into_iter().map(Child::from));
            children.push(else_.into());

            compound = Some(n(
                AstKind::Rescue,
                children,
                SourceMap::Condition {
                    keyword: None,
                    begin: None,
                    else_: else_t.map(|t| t.1),
                    end: None,
                    expression: join(start, finish),
                },
            ));
        } else if let Some(else_body) = else_ {
            // An else with no rescue contributes its statements directly.
            let mut statements = Vec::new();
            if let Some(existing) = compound {
                statements.push(existing);
            }
            statements.push(else_body);
            compound = self.compstmt(statements);
        }

        if let Some(ensure_t) = ensure_t {
            let start = compound
                .as_ref()
                .map(|c| c.expression())
                .unwrap_or(ensure_t.1);
            let finish = ensure_body
                .as_ref()
                .map(|e| e.expression())
                .unwrap_or(ensure_t.1);
            compound = Some(n(
                AstKind::Ensure,
                vec![compound.into(), ensure_body.into()],
                SourceMap::Condition {
                    keyword: Some(ensure_t.1),
                    begin: None,
                    else_: None,
                    end: None,
                    expression: join(start, finish),
                },
            ));
        }

        compound
    }

    // === Definitions ===

    /// `class Foo < Bar; end`
    pub fn def_class(
        &self,
        class_t: Tok,
        name: Node,
        lt_t: Option<Tok>,
        superclass: Option<Node>,
        body: Option<Node>,
        end_t: Tok,
    ) -> Node {
        let name_span = name.expression();
        n(
            AstKind::Class,
            vec![name.into(), superclass.into(), body.into()],
            SourceMap::Definition {
                keyword: class_t.1,
                operator: lt_t.map(|t| t.1),
                name: Some(name_span),
                assignment: None,
                end: Some(end_t.1),
                expression: join(class_t.1, end_t.1),
            },
        )
    }

    /// `module Foo; end`
    pub fn def_module(&self, module_t: Tok, name: Node, body: Option<Node>, end_t: Tok) -> Node {
        let name_span = name.expression();
        n(
            AstKind::Module,
            vec![name.into(), body.into()],
            SourceMap::Definition {
                keyword: module_t.1,
                operator: None,
                name: Some(name_span),
                assignment: None,
                end: Some(end_t.1),
                expression: join(module_t.1, end_t.1),
            },
        )
    }

    /// `class << self; end`
    pub fn def_sclass(
        &self,
        class_t: Tok,
        lshift_t: Tok,
        expr: Node,
        body: Option<Node>,
        end_t: Tok,
    ) -> Node {
        n(
            AstKind::Sclass,
            vec![expr.into(), body.into()],
            SourceMap::Definition {
                keyword: class_t.1,
                operator: Some(lshift_t.1),
                name: None,
                assignment: None,
                end: Some(end_t.1),
                expression: join(class_t.1, end_t.1),
            },
        )
    }

    /// `def foo; end`
    pub fn def_method(
        &self,
        def_t: Tok,
        name_t: Tok,
        args: Option<Node>,
        body: Option<Node>,
        end_t: Tok,
    ) -> Node {
        n(
            AstKind::Def,
            vec![Child::Sym(name_t.0), args.into(), body.into()],
            SourceMap::Definition {
                keyword: def_t.1,
                operator: None,
                name: Some(name_t.1),
                assignment: None,
                end: Some(end_t.1),
                expression: join(def_t.1, end_t.1),
            },
        )
    }

    /// `def foo = bar`
    pub fn def_endless_method(
        &self,
        def_t: Tok,
        name_t: Tok,
        args: Option<Node>,
        assignment_t: Tok,
        body: Option<Node>,
    ) -> Node {
        let finish = body
            .as_ref()
            .map(|b| b.expression())
            .unwrap_or(assignment_t.1);
        n(
            AstKind::Def,
            vec![Child::Sym(name_t.0), args.into(), body.into()],
            SourceMap::Definition {
                keyword: def_t.1,
                operator: None,
                name: Some(name_t.1),
                assignment: Some(assignment_t.1),
                end: None,
                expression: join(def_t.1, finish),
            },
        )
    }

    /// `def self.foo; end`
    #[allow(clippy::too_many_arguments)]
    pub fn def_singleton(
        &self,
        def_t: Tok,
        definee: Node,
        dot_t: Option<Tok>,
        name_t: Tok,
        args: Option<Node>,
        body: Option<Node>,
        end_t: Tok,
    ) -> Node {
        n(
            AstKind::Defs,
            vec![
                definee.into(),
                Child::Sym(name_t.0),
                args.into(),
                body.into(),
            ],
            SourceMap::Definition {
                keyword: def_t.1,
                operator: dot_t.map(|t| t.1),
                name: Some(name_t.1),
                assignment: None,
                end: Some(end_t.1),
                expression: join(def_t.1, end_t.1),
            },
        )
    }

    /// `def self.foo = bar`
    #[allow(clippy::too_many_arguments)]
    pub fn def_endless_singleton(
        &self,
        def_t: Tok,
        definee: Node,
        dot_t: Option<Tok>,
        name_t: Tok,
        args: Option<Node>,
        assignment_t: Tok,
        body: Option<Node>,
    ) -> Node {
        let finish = body
            .as_ref()
            .map(|b| b.expression())
            .unwrap_or(assignment_t.1);
        n(
            AstKind::Defs,
            vec![
                definee.into(),
                Child::Sym(name_t.0),
                args.into(),
                body.into(),
            ],
            SourceMap::Definition {
                keyword: def_t.1,
                operator: dot_t.map(|t| t.1),
                name: Some(name_t.1),
                assignment: Some(assignment_t.1),
                end: None,
                expression: join(def_t.1, finish),
            },
        )
    }

    /// `alias foo bar`
    pub fn alias(&self, alias_t: Tok, new_name: Node, old_name: Node) -> Node {
        let expression = join(alias_t.1, old_name.expression());
        n(
            AstKind::Alias,
            vec![new_name.into(), old_name.into()],
            SourceMap::Keyword {
                keyword: alias_t.1,
                begin: None,
                end: None,
                expression,
            },
        )
    }

    /// `undef foo, :bar`
    pub fn undef_method(&self, undef_t: Tok, names: Vec<Node>) -> Node {
        let finish = names
            .last()
            .map(|name| name.expression())
            .unwrap_or(undef_t.1);
        n(
            AstKind::Undef,
            names.into_iter().map(Child::from).collect(),
            SourceMap::Keyword {
                keyword: undef_t.1,
                begin: None,
                end: None,
                expression: join(undef_t.1, finish),
            },
        )
    }

    /// `BEGIN { ... }`
    pub fn preexe(&self, keyword_t: Tok, lbrace_t: Tok, body: Option<Node>, rbrace_t: Tok) -> Node {
        self.execution_hook(AstKind::Preexe, keyword_t, lbrace_t, body, rbrace_t)
    }

    /// `END { ... }`
    pub fn postexe(
        &self,
        keyword_t: Tok,
        lbrace_t: Tok,
        body: Option<Node>,
        rbrace_t: Tok,
    ) -> Node {
        self.execution_hook(AstKind::Postexe, keyword_t, lbrace_t, body, rbrace_t)
    }

    fn execution_hook(
        &self,
        kind: AstKind,
        keyword_t: Tok,
        lbrace_t: Tok,
        body: Option<Node>,
        rbrace_t: Tok,
    ) -> Node {
        n(
            kind,
            vec![body.into()],
            SourceMap::Keyword {
                keyword: keyword_t.1,
                begin: Some(lbrace_t.1),
                end: Some(rbrace_t.1),
                expression: join(keyword_t.1, rbrace_t.1),
            },
        )
    }

    // === Parameters ===

    /// The parameter list of a def, block, or lambda. `None` when there are
    /// no parameters and no delimiters to record.
    pub fn args(&self, begin_t: Option<Tok>, args: Vec<Node>, end_t: Option<Tok>) -> Option<Node> {
        if begin_t.is_none() && end_t.is_none() && args.is_empty() {
            return None;
        }
        let map = collection_map(begin_t.as_ref(), &args, end_t.as_ref());
        Some(n(
            AstKind::Args,
            args.into_iter().map(Child::from).collect(),
            map,
        ))
    }

    /// `def foo(bar)`
    pub fn arg(&self, name_t: Tok) -> Node {
        let span = name_t.1;
        n(
            AstKind::Arg,
            vec![Child::Sym(name_t.0)],
            SourceMap::Variable {
                name: span,
                operator: None,
                expression: span,
            },
        )
    }

    /// `def foo(bar = 1)`
    pub fn optarg(&self, name_t: Tok, eql_t: Tok, value: Node) -> Node {
        let expression = join(name_t.1, value.expression());
        n(
            AstKind::Optarg,
            vec![Child::Sym(name_t.0), value.into()],
            SourceMap::Variable {
                name: name_t.1,
                operator: Some(eql_t.1),
                expression,
            },
        )
    }

    /// `def foo(*bar)` / `def foo(*)`
    pub fn restarg(&self, star_t: Tok, name_t: Option<Tok>) -> Node {
        self.prefixed_arg(AstKind::Restarg, star_t, name_t)
    }

    /// `def foo(&bar)` / `def foo(&)`
    pub fn blockarg(&self, amp_t: Tok, name_t: Option<Tok>) -> Node {
        self.prefixed_arg(AstKind::Blockarg, amp_t, name_t)
    }

    /// `def foo(**bar)` / `def foo(**)`
    pub fn kwrestarg(&self, dstar_t: Tok, name_t: Option<Tok>) -> Node {
        self.prefixed_arg(AstKind::Kwrestarg, dstar_t, name_t)
    }

    fn prefixed_arg(&self, kind: AstKind, prefix_t: Tok, name_t: Option<Tok>) -> Node {
        let name_span = name_t.as_ref().map(|t| t.1);
        let children = match &name_t {
            Some((name, _)) => vec![Child::Sym(name.clone())],
            None => vec![],
        };
        n(
            kind,
            children,
            SourceMap::Variable {
                name: name_span.unwrap_or(prefix_t.1),
                operator: None,
                expression: join(prefix_t.1, name_span.unwrap_or(prefix_t.1)),
            },
        )
    }

    /// `def foo(bar:)`: the label span includes its colon.
    pub fn kwarg(&self, name: SmolStr, label_span: Span) -> Node {
        n(
            AstKind::Kwarg,
            vec![Child::Sym(name)],
            SourceMap::Variable {
                name: trim_last_char(label_span),
                operator: None,
                expression: label_span,
            },
        )
    }

    /// `def foo(bar: 1)`
    pub fn kwoptarg(&self, name: SmolStr, label_span: Span, value: Node) -> Node {
        let expression = join(label_span, value.expression());
        n(
            AstKind::Kwoptarg,
            vec![Child::Sym(name), value.into()],
            SourceMap::Variable {
                name: trim_last_char(label_span),
                operator: None,
                expression,
            },
        )
    }

    /// `def foo(**nil)`
    pub fn kwnilarg(&self, dstar_t: Tok, nil_t: Tok) -> Node {
        n(
            AstKind::Kwnilarg,
            vec![],
            SourceMap::Variable {
                name: nil_t.1,
                operator: None,
                expression: join(dstar_t.1, nil_t.1),
            },
        )
    }

    /// `foo { |bar; baz| }`: the shadowed block-local.
    pub fn shadowarg(&self, name_t: Tok) -> Node {
        let span = name_t.1;
        n(
            AstKind::Shadowarg,
            vec![Child::Sym(name_t.0)],
            SourceMap::Variable {
                name: span,
                operator: None,
                expression: span,
            },
        )
    }

    /// The expanding single parameter of a block.
    pub fn procarg0(&self, arg: Node) -> Node {
        let map = SourceMap::Bare {
            expression: arg.expression(),
        };
        n(AstKind::Procarg0, vec![arg.into()], map)
    }

    /// `def foo(...)`
    pub fn forward_arg(&self, dots_t: Tok) -> Node {
        n(
            AstKind::ForwardArg,
            vec![],
            SourceMap::Bare {
                expression: dots_t.1,
            },
        )
    }

    /// `bar(...)`
    pub fn forwarded_args(&self, dots_t: Tok) -> Node {
        n(
            AstKind::ForwardedArgs,
            vec![],
            SourceMap::Bare {
                expression: dots_t.1,
            },
        )
    }

    /// `bar(*)` forwarding the enclosing rest.
    pub fn forwarded_restarg(&self, star_t: Tok) -> Node {
        n(
            AstKind::ForwardedRestarg,
            vec![],
            SourceMap::Operator {
                operator: Some(star_t.1),
                expression: star_t.1,
            },
        )
    }

    /// `bar(**)` forwarding the enclosing keyword rest.
    pub fn forwarded_kwrestarg(&self, dstar_t: Tok) -> Node {
        n(
            AstKind::ForwardedKwrestarg,
            vec![],
            SourceMap::Operator {
                operator: Some(dstar_t.1),
                expression: dstar_t.1,
            },
        )
    }

    // === Patterns ===

    /// `foo => bar | baz`
    pub fn match_alt(&self, left: Node, pipe_t: Tok, right: Node) -> Node {
        let expression = join(left.expression(), right.expression());
        n(
            AstKind::MatchAlt,
            vec![left.into(), right.into()],
            SourceMap::Operator {
                operator: Some(pipe_t.1),
                expression,
            },
        )
    }

    /// `foo => bar => baz`
    pub fn match_as(&self, value: Node, assoc_t: Tok, as_: Node) -> Node {
        let expression = join(value.expression(), as_.expression());
        n(
            AstKind::MatchAs,
            vec![value.into(), as_.into()],
            SourceMap::Operator {
                operator: Some(assoc_t.1),
                expression,
            },
        )
    }

    /// A bare name binding inside a pattern.
    pub fn match_var(&self, name: SmolStr, span: Span) -> Node {
        n(
            AstKind::MatchVar,
            vec![Child::Sym(name)],
            SourceMap::Variable {
                name: span,
                operator: None,
                expression: span,
            },
        )
    }

    /// `in { foo: }`: a hash-pattern binding; the span covers the label
    /// including its colon.
    pub fn match_hash_var(&self, name: SmolStr, label_span: Span) -> Node {
        n(
            AstKind::MatchVar,
            vec![Child::Sym(name)],
            SourceMap::Variable {
                name: trim_last_char(label_span),
                operator: None,
                expression: label_span,
            },
        )
    }

    /// `in { "foo": }`: a quoted hash-pattern binding built from its sole
    /// plain fragment; the closing token carries the quote and the colon.
    pub fn match_hash_var_from_str(&self, begin_t: Tok, part: Node, end_t: Tok) -> Node {
        let name = SmolStr::new(part.str_value().unwrap_or_default());
        let name_span = part.expression();
        n(
            AstKind::MatchVar,
            vec![Child::Sym(name)],
            SourceMap::Variable {
                name: name_span,
                operator: None,
                expression: join(begin_t.1, end_t.1),
            },
        )
    }

    /// `in [*, bar]`: the rest marker, named or bare.
    pub fn match_rest(&self, star_t: Tok, name_t: Option<Tok>) -> Node {
        let (children, finish) = match name_t {
            Some((name, span)) => (vec![Child::Node(self.match_var(name, span))], span),
            None => (vec![], star_t.1),
        };
        n(
            AstKind::MatchRest,
            children,
            SourceMap::Operator {
                operator: Some(star_t.1),
                expression: join(star_t.1, finish),
            },
        )
    }

    /// `in [bar, baz]`
    pub fn array_pattern(
        &self,
        begin_t: Option<Tok>,
        elements: Vec<Node>,
        end_t: Option<Tok>,
    ) -> Node {
        let map = collection_map(begin_t.as_ref(), &elements, end_t.as_ref());
        n(
            AstKind::ArrayPattern,
            elements.into_iter().map(Child::from).collect(),
            map,
        )
    }

    /// `in [*, bar, *]`
    pub fn find_pattern(
        &self,
        begin_t: Option<Tok>,
        elements: Vec<Node>,
        end_t: Option<Tok>,
    ) -> Node {
        let map = collection_map(begin_t.as_ref(), &elements, end_t.as_ref());
        n(
            AstKind::FindPattern,
            elements.into_iter().map(Child::from).collect(),
            map,
        )
    }

    /// `in { bar: }`
    pub fn hash_pattern(
        &self,
        begin_t: Option<Tok>,
        elements: Vec<Node>,
        end_t: Option<Tok>,
    ) -> Node {
        let map = collection_map(begin_t.as_ref(), &elements, end_t.as_ref());
        n(
            AstKind::HashPattern,
            elements.into_iter().map(Child::from).collect(),
            map,
        )
    }

    /// `in Foo[bar]` / `in Foo(bar)`
    pub fn const_pattern(
        &self,
        constant: Node,
        lparen_t: Option<Tok>,
        pattern: Node,
        rparen_t: Option<Tok>,
    ) -> Node {
        let finish = rparen_t
            .as_ref()
            .map(|t| t.1)
            .unwrap_or_else(|| pattern.expression());
        let expression = join(constant.expression(), finish);
        n(
            AstKind::ConstPattern,
            vec![constant.into(), pattern.into()],
            SourceMap::Collection {
                begin: lparen_t.map(|t| t.1),
                end: rparen_t.map(|t| t.1),
                expression,
            },
        )
    }

    /// `in ^foo` / `in ^(foo)`
    pub fn pin(&self, pin_t: Tok, var: Node) -> Node {
        let expression = join(pin_t.1, var.expression());
        n(
            AstKind::Pin,
            vec![var.into()],
            SourceMap::Operator {
                operator: Some(pin_t.1),
                expression,
            },
        )
    }

    /// `in pattern if guard`
    pub fn if_guard(&self, if_t: Tok, cond: Node) -> Node {
        let expression = join(if_t.1, cond.expression());
        n(
            AstKind::IfGuard,
            vec![cond.into()],
            SourceMap::Keyword {
                keyword: if_t.1,
                begin: None,
                end: None,
                expression,
            },
        )
    }

    /// `in pattern unless guard`
    pub fn unless_guard(&self, unless_t: Tok, cond: Node) -> Node {
        let expression = join(unless_t.1, cond.expression());
        n(
            AstKind::UnlessGuard,
            vec![cond.into()],
            SourceMap::Keyword {
                keyword: unless_t.1,
                begin: None,
                end: None,
                expression,
            },
        )
    }

    /// One `in` arm of a case-match.
    pub fn in_pattern(
        &self,
        in_t: Tok,
        pattern: Node,
        guard: Option<Node>,
        then_t: Option<Tok>,
        body: Option<Node>,
    ) -> Node {
        let finish = body
            .as_ref()
            .map(|b| b.expression())
            .or_else(|| guard.as_ref().map(|g| g.expression()))
            .unwrap_or_else(|| pattern.expression());
        n(
            AstKind::InPattern,
            vec![pattern.into(), guard.into(), body.into()],
            SourceMap::Keyword {
                keyword: in_t.1,
                begin: then_t.map(|t| t.1),
                end: None,
                expression: join(in_t.1, finish),
            },
        )
    }

    /// `foo in bar`
    pub fn match_pattern_p(&self, value: Node, in_t: Tok, pattern: Node) -> Node {
        let expression = join(value.expression(), pattern.expression());
        n(
            AstKind::MatchPatternP,
            vec![value.into(), pattern.into()],
            SourceMap::Operator {
                operator: Some(in_t.1),
                expression,
            },
        )
    }

    /// `foo => bar`
    pub fn match_pattern(&self, value: Node, assoc_t: Tok, pattern: Node) -> Node {
        let expression = join(value.expression(), pattern.expression());
        n(
            AstKind::MatchPattern,
            vec![value.into(), pattern.into()],
            SourceMap::Operator {
                operator: Some(assoc_t.1),
                expression,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tok(text: &str, start: u32, end: u32) -> Tok {
        (SmolStr::new(text), Span::new(start, end))
    }

    #[test]
    fn test_logical_op_shape() {
        let builder = Builder::new();
        // a and b
        let lhs = builder.ident(tok("a", 0, 1)).updated(AstKind::Lvar);
        let rhs = builder.ident(tok("b", 6, 7)).updated(AstKind::Lvar);
        let node = builder.logical_op(LogicalOp::And, lhs, tok("and", 2, 5), rhs);
        assert_eq!(node.kind, AstKind::And);
        assert_eq!(node.expression(), Span::new(0u32, 7u32));
        assert_eq!(
            node.map,
            SourceMap::Operator {
                operator: Some(Span::new(2u32, 5u32)),
                expression: Span::new(0u32, 7u32),
            }
        );
    }

    #[test]
    fn test_assign_fills_operator_and_value() {
        let builder = Builder::new();
        // a = 1
        let target = builder.assignable(builder.ident(tok("a", 0, 1)));
        assert_eq!(target.kind, AstKind::Lvasgn);
        let value = builder.integer(1, Span::new(4u32, 5u32));
        let node = builder.assign(target, tok("=", 2, 3), value);
        assert_eq!(node.expression(), Span::new(0u32, 5u32));
        assert_eq!(node.children.len(), 2);
        assert_eq!(
            node.map.named_ranges(),
            vec![
                ("name", Span::new(0u32, 1u32)),
                ("operator", Span::new(2u32, 3u32)),
            ]
        );
    }

    #[test]
    fn test_op_assign_selects_kind() {
        let builder = Builder::new();
        let make = |op: &str| {
            let lhs = builder.assignable(builder.ident(tok("a", 0, 1)));
            let rhs = builder.integer(1, Span::new(7u32, 8u32));
            builder.op_assign(lhs, tok(op, 2, 2 + op.len() as u32), rhs)
        };
        assert_eq!(make("+").kind, AstKind::OpAsgn);
        assert_eq!(make("&&").kind, AstKind::AndAsgn);
        assert_eq!(make("||").kind, AstKind::OrAsgn);
    }

    #[test]
    fn test_compstmt_collapses() {
        let builder = Builder::new();
        assert!(builder.compstmt(vec![]).is_none());

        let sole = builder.integer(1, Span::new(0u32, 1u32));
        let wrapped = builder.compstmt(vec![sole.clone()]);
        assert_eq!(wrapped, Some(sole.clone()));

        let two = builder
            .compstmt(vec![sole, builder.integer(2, Span::new(3u32, 4u32))])
            .map(|node| node.kind);
        assert_eq!(two, Some(AstKind::Begin));
    }

    #[test]
    fn test_string_compose_collapses_single_fragment() {
        let builder = Builder::new();
        // "foo"
        let fragment = builder.string_internal("foo", Span::new(1u32, 4u32));
        let node = builder.string_compose(
            Some(tok("\"", 0, 1)),
            vec![fragment],
            Some(tok("\"", 4, 5)),
        );
        assert_eq!(node.kind, AstKind::Str);
        assert_eq!(node.expression(), Span::new(0u32, 5u32));
    }

    #[test]
    fn test_string_compose_heredoc_map() {
        let builder = Builder::new();
        // <<~FOO\n  bar\nFOO
        let fragment = builder.string_internal("bar\n", Span::new(7u32, 13u32));
        let node = builder.string_compose(
            Some(tok("<<~FOO", 0, 6)),
            vec![fragment],
            Some(tok("FOO", 13, 16)),
        );
        assert_eq!(node.kind, AstKind::Str);
        assert_eq!(
            node.map,
            SourceMap::Heredoc {
                expression: Span::new(0u32, 6u32),
                heredoc_body: Span::new(7u32, 13u32),
                heredoc_end: Span::new(13u32, 16u32),
            }
        );
    }

    #[test]
    fn test_case_match_synthesizes_empty_else() {
        let builder = Builder::new();
        let pattern = builder.match_var("x".into(), Span::new(12u32, 13u32));
        let arm = builder.in_pattern(tok("in", 9, 11), pattern, None, None, None);
        let node = builder.case_match(
            tok("case", 0, 4),
            Some(builder.ident(tok("foo", 5, 8)).updated(AstKind::Lvar)),
            vec![arm],
            Some(tok("else", 14, 18)),
            None,
            tok("end", 19, 22),
        );
        let last = node.children.last().cloned();
        match last {
            Some(Child::Node(else_node)) => assert_eq!(else_node.kind, AstKind::EmptyElse),
            other => panic!("expected an empty else node, got {other:?}"),
        }
    }

    #[test]
    fn test_loop_mod_post_detection() {
        let builder = Builder::new();
        let body = builder.begin_keyword(
            tok("begin", 0, 5),
            Some(builder.ident(tok("foo", 6, 9)).updated(AstKind::Lvar)),
            tok("end", 10, 13),
        );
        let cond = builder.ident(tok("bar", 20, 23)).updated(AstKind::Lvar);
        let node = builder.loop_mod(LoopKind::While, Some(body), tok("while", 14, 19), cond);
        assert_eq!(node.kind, AstKind::WhilePost);
    }
}
