//! Pattern-matching arms, guards, and context-sensitive target shapes.

use pretty_assertions::assert_eq;
use ruby_ast::{AstKind, Child, SourceMap};
use ruby_cst::*;
use ruby_translator::{translate, TranslateError};
use source_span::Span;

fn loc(start: usize, end: usize) -> Location {
    Location::new(start, end)
}

fn span(start: u32, end: u32) -> Span {
    Span::new(start, end)
}

fn lvar(name: &str, start: usize, end: usize) -> Node {
    Node::LocalVariableRead(VariableRefNode {
        name: name.into(),
        location: loc(start, end),
    })
}

fn target(name: &str, start: usize, end: usize) -> Node {
    Node::LocalVariableTarget(VariableRefNode {
        name: name.into(),
        location: loc(start, end),
    })
}

fn statements(body: Vec<Node>, start: usize, end: usize) -> Box<StatementsNode> {
    Box::new(StatementsNode {
        body,
        location: loc(start, end),
    })
}

fn unit(source: &str, body: Vec<Node>, locals: Vec<&str>) -> ParsedUnit {
    let end = source.len();
    let root = Node::Program(ProgramNode {
        locals: locals.into_iter().map(Into::into).collect(),
        statements: statements(body, 0, end),
        location: loc(0, end),
    });
    ParsedUnit::new(source, Some(root))
}

#[test]
fn test_case_in_with_guard_peels_the_guard() {
    // `in y if z` arrives as a modifier conditional wrapping the pattern;
    // the guard splits off and the pattern translates in pattern mode.
    let source = "case x\nin y if z\n1\nend";
    let arm = Node::In(InNode {
        pattern: Box::new(Node::If(IfNode {
            if_keyword_loc: Some(loc(12, 14)),
            predicate: Box::new(lvar("z", 15, 16)),
            statements: Some(statements(vec![target("y", 10, 11)], 10, 11)),
            consequent: None,
            end_keyword_loc: None,
            location: loc(10, 16),
        })),
        statements: Some(statements(
            vec![Node::Integer(IntegerNode {
                value: 1,
                location: loc(17, 18),
            })],
            17,
            18,
        )),
        in_loc: loc(7, 9),
        location: loc(7, 18),
    });
    let case = Node::Case(CaseNode {
        predicate: Some(Box::new(lvar("x", 5, 6))),
        conditions: vec![arm],
        consequent: None,
        case_keyword_loc: loc(0, 4),
        end_keyword_loc: loc(19, 22),
        location: loc(0, 22),
    });
    let ast = translate(&unit(source, vec![case], vec!["x", "z"]))
        .unwrap()
        .unwrap();

    assert_eq!(
        ast.to_string(),
        "(case_match\n  (lvar :x)\n  (in_pattern\n    (match_var :y)\n    (if_guard\n      (lvar :z))\n    (int 1)) nil)"
    );
}

#[test]
fn test_pattern_mode_does_not_leak_to_sibling_statements() {
    // The same target shape translates as a pattern capture inside the arm
    // and as a plain assignment target right after it.
    let source = "case x\nin y\nend\ny = 1";
    let arm = Node::In(InNode {
        pattern: Box::new(target("y", 10, 11)),
        statements: None,
        in_loc: loc(7, 9),
        location: loc(7, 11),
    });
    let case = Node::Case(CaseNode {
        predicate: Some(Box::new(lvar("x", 5, 6))),
        conditions: vec![arm],
        consequent: None,
        case_keyword_loc: loc(0, 4),
        end_keyword_loc: loc(12, 15),
        location: loc(0, 15),
    });
    let write = Node::LocalVariableWrite(VariableWriteNode {
        name: "y".into(),
        name_loc: loc(16, 17),
        operator_loc: loc(18, 19),
        value: Box::new(Node::Integer(IntegerNode {
            value: 1,
            location: loc(20, 21),
        })),
        location: loc(16, 21),
    });
    let ast = translate(&unit(source, vec![case, write], vec!["x", "y"]))
        .unwrap()
        .unwrap();

    // Two statements grouped at the top level.
    assert_eq!(ast.kind, AstKind::Begin);
    let children: Vec<&ruby_ast::Node> = ast
        .children
        .iter()
        .filter_map(|child| match child {
            Child::Node(node) => Some(node),
            _ => None,
        })
        .collect();

    let case_match = children[0];
    let in_pattern = match &case_match.children[1] {
        Child::Node(node) => node,
        other => panic!("expected the arm, got {other:?}"),
    };
    let pattern = match &in_pattern.children[0] {
        Child::Node(node) => node,
        other => panic!("expected the pattern, got {other:?}"),
    };
    assert_eq!(pattern.kind, AstKind::MatchVar);

    let write = children[1];
    assert_eq!(write.kind, AstKind::Lvasgn);
}

#[test]
fn test_hash_pattern_binding_from_label() {
    // `in { foo: }` binds a variable; the name range excludes the colon.
    let source = "case x\nin {foo:}\nend";
    let assoc = Node::Assoc(AssocNode {
        key: Box::new(Node::Symbol(SymbolNode {
            opening_loc: None,
            value_loc: Some(loc(11, 14)),
            closing_loc: Some(loc(14, 15)),
            unescaped: "foo".to_string(),
            location: loc(11, 15),
        })),
        value: None,
        operator_loc: None,
        location: loc(11, 15),
    });
    let arm = Node::In(InNode {
        pattern: Box::new(Node::HashPattern(HashPatternNode {
            constant: None,
            assocs: vec![assoc],
            opening_loc: Some(loc(10, 11)),
            closing_loc: Some(loc(15, 16)),
            location: loc(10, 16),
        })),
        statements: None,
        in_loc: loc(7, 9),
        location: loc(7, 16),
    });
    let case = Node::Case(CaseNode {
        predicate: Some(Box::new(lvar("x", 5, 6))),
        conditions: vec![arm],
        consequent: None,
        case_keyword_loc: loc(0, 4),
        end_keyword_loc: loc(17, 20),
        location: loc(0, 20),
    });
    let ast = translate(&unit(source, vec![case], vec!["x"]))
        .unwrap()
        .unwrap();

    let in_pattern = match &ast.children[1] {
        Child::Node(node) => node,
        other => panic!("expected the arm, got {other:?}"),
    };
    let hash_pattern = match &in_pattern.children[0] {
        Child::Node(node) => node,
        other => panic!("expected the pattern, got {other:?}"),
    };
    assert_eq!(hash_pattern.kind, AstKind::HashPattern);
    let binding = match &hash_pattern.children[0] {
        Child::Node(node) => node,
        other => panic!("expected the binding, got {other:?}"),
    };
    assert_eq!(binding.kind, AstKind::MatchVar);
    assert_eq!(
        binding.map,
        SourceMap::Variable {
            name: span(11, 14),
            operator: None,
            expression: span(11, 15),
        }
    );
}

#[test]
fn test_interpolated_hash_pattern_key_is_unsupported() {
    let source = "case x\nin {\"a#{b}\":}\nend";
    let assoc = Node::Assoc(AssocNode {
        key: Box::new(Node::InterpolatedSymbol(InterpolatedDelimitedNode {
            opening_loc: loc(11, 12),
            parts: vec![
                Node::StringLiteral(StringNode {
                    opening_loc: None,
                    content_loc: loc(12, 13),
                    closing_loc: None,
                    unescaped: "a".to_string(),
                    location: loc(12, 13),
                }),
                Node::EmbeddedStatements(EmbeddedStatementsNode {
                    opening_loc: loc(13, 15),
                    statements: Some(statements(vec![lvar("b", 15, 16)], 15, 16)),
                    closing_loc: loc(16, 17),
                    location: loc(13, 17),
                }),
            ],
            closing_loc: loc(17, 19),
            location: loc(11, 19),
        })),
        value: None,
        operator_loc: None,
        location: loc(11, 19),
    });
    let arm = Node::In(InNode {
        pattern: Box::new(Node::HashPattern(HashPatternNode {
            constant: None,
            assocs: vec![assoc],
            opening_loc: Some(loc(10, 11)),
            closing_loc: Some(loc(19, 20)),
            location: loc(10, 20),
        })),
        statements: None,
        in_loc: loc(7, 9),
        location: loc(7, 20),
    });
    let case = Node::Case(CaseNode {
        predicate: Some(Box::new(lvar("x", 5, 6))),
        conditions: vec![arm],
        consequent: None,
        case_keyword_loc: loc(0, 4),
        end_keyword_loc: loc(21, 24),
        location: loc(0, 24),
    });
    let result = translate(&unit(source, vec![case], vec!["x", "b"]));

    assert_eq!(
        result,
        Err(TranslateError::Unsupported {
            construct: "interpolated hash-pattern key",
        })
    );
}

#[test]
fn test_pattern_rest_and_alternation() {
    // `in [a, *rest] | b`: the rest marker and the alternation both keep
    // pattern shapes.
    let source = "case x\nin [a, *rest] | b\nend";
    let array = Node::ArrayPattern(ArrayPatternNode {
        constant: None,
        requireds: vec![target("a", 11, 12)],
        rest: Some(Box::new(Node::Splat(SplatNode {
            operator_loc: loc(14, 15),
            expression: Some(Box::new(target("rest", 15, 19))),
            location: loc(14, 19),
        }))),
        posts: vec![],
        opening_loc: Some(loc(10, 11)),
        closing_loc: Some(loc(19, 20)),
        location: loc(10, 20),
    });
    let pattern = Node::AlternationPattern(AlternationPatternNode {
        left: Box::new(array),
        right: Box::new(target("b", 23, 24)),
        operator_loc: loc(21, 22),
        location: loc(10, 24),
    });
    let arm = Node::In(InNode {
        pattern: Box::new(pattern),
        statements: None,
        in_loc: loc(7, 9),
        location: loc(7, 24),
    });
    let case = Node::Case(CaseNode {
        predicate: Some(Box::new(lvar("x", 5, 6))),
        conditions: vec![arm],
        consequent: None,
        case_keyword_loc: loc(0, 4),
        end_keyword_loc: loc(25, 28),
        location: loc(0, 28),
    });
    let ast = translate(&unit(source, vec![case], vec!["x"]))
        .unwrap()
        .unwrap();

    assert_eq!(
        ast.to_string(),
        "(case_match\n  (lvar :x)\n  (in_pattern\n    (match_alt\n      (array_pattern\n        (match_var :a)\n        (match_rest\n          (match_var :rest)))\n      (match_var :b)) nil nil) nil)"
    );
}

#[test]
fn test_match_predicate_enters_pattern_mode() {
    // `foo in bar`: the right side binds, the left side reads.
    let source = "foo in bar";
    let node = Node::MatchPredicate(MatchNode {
        value: Box::new(lvar("foo", 0, 3)),
        pattern: Box::new(target("bar", 7, 10)),
        operator_loc: loc(4, 6),
        location: loc(0, 10),
    });
    let ast = translate(&unit(source, vec![node], vec!["foo"]))
        .unwrap()
        .unwrap();

    assert_eq!(
        ast.to_string(),
        "(match_pattern_p\n  (lvar :foo)\n  (match_var :bar))"
    );
    assert_eq!(
        ast.map,
        SourceMap::Operator {
            operator: Some(span(4, 6)),
            expression: span(0, 10),
        }
    );
}

#[test]
fn test_destructured_parameter_rest() {
    // `def foo((a, *b)); end`: inside the destructure, the splat becomes a
    // rest-arg, not a pattern rest or value splat.
    let source = "def foo((a, *b)); end";
    let destructured = Node::RequiredDestructuredParameter(RequiredDestructuredParameterNode {
        parameters: vec![
            target("a", 9, 10),
            Node::Splat(SplatNode {
                operator_loc: loc(12, 13),
                expression: Some(Box::new(target("b", 13, 14))),
                location: loc(12, 14),
            }),
        ],
        opening_loc: loc(8, 9),
        closing_loc: loc(14, 15),
        location: loc(8, 15),
    });
    let def = Node::Def(DefNode {
        name: "foo".into(),
        name_loc: loc(4, 7),
        receiver: None,
        parameters: Some(Box::new(ParametersNode {
            requireds: vec![destructured],
            optionals: vec![],
            rest: None,
            posts: vec![],
            keywords: vec![],
            keyword_rest: None,
            block: None,
            location: loc(8, 15),
        })),
        body: None,
        locals: vec!["a".into(), "b".into()],
        def_keyword_loc: loc(0, 3),
        operator_loc: None,
        lparen_loc: Some(loc(7, 8)),
        rparen_loc: Some(loc(15, 16)),
        equal_loc: None,
        end_keyword_loc: Some(loc(18, 21)),
        location: loc(0, 21),
    });
    let ast = translate(&unit(source, vec![def], vec![]))
        .unwrap()
        .unwrap();

    assert_eq!(
        ast.to_string(),
        "(def :foo\n  (args\n    (mlhs\n      (lvasgn :a)\n      (restarg :b))) nil)"
    );
}
