//! End-to-end translation of expression-level constructs.
//!
//! Each test hand-builds the CST the upstream parser would emit for a small
//! source string, translates it, and checks the produced shape and ranges.

use pretty_assertions::assert_eq;
use ruby_ast::{AstKind, Child, SourceMap};
use ruby_cst::*;
use ruby_translator::{translate, Translator};
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

fn int(value: i64, start: usize, end: usize) -> Node {
    Node::Integer(IntegerNode {
        value,
        location: loc(start, end),
    })
}

fn statements(body: Vec<Node>, start: usize, end: usize) -> Box<StatementsNode> {
    Box::new(StatementsNode {
        body,
        location: loc(start, end),
    })
}

fn unit(source: &str, statement: Node) -> ParsedUnit {
    unit_with_locals(source, statement, vec![])
}

fn unit_with_locals(source: &str, statement: Node, locals: Vec<&str>) -> ParsedUnit {
    let end = source.len();
    let root = Node::Program(ProgramNode {
        locals: locals.into_iter().map(Into::into).collect(),
        statements: statements(vec![statement], 0, end),
        location: loc(0, end),
    });
    ParsedUnit::new(source, Some(root))
}

/// Asserts every named range sits inside its node's expression and every
/// child node's expression sits inside its parent's, heredoc bodies
/// excepted (their expression deliberately covers only the opening marker).
fn assert_range_discipline(node: &ruby_ast::Node) {
    let expression = node.expression();
    assert!(expression.start <= expression.end, "inverted expression");

    if !matches!(node.map, SourceMap::Heredoc { .. }) {
        for (name, range) in node.map.named_ranges() {
            assert!(range.start <= range.end, "inverted range {name}");
            assert!(
                expression.contains_span(range) || range.is_empty(),
                "range {name} escapes its node"
            );
        }
        for child in &node.children {
            if let Child::Node(child) = child {
                assert!(
                    expression.contains_span(child.expression()),
                    "child {} escapes its parent {}",
                    child.kind.name(),
                    node.kind.name()
                );
            }
        }
    }

    for child in &node.children {
        if let Child::Node(child) = child {
            assert_range_discipline(child);
        }
    }
}

fn translate_one(unit: &ParsedUnit) -> ruby_ast::Node {
    let ast = translate(unit).expect("translation succeeds");
    let ast = ast.expect("unit is not empty");
    assert_range_discipline(&ast);
    ast
}

#[test]
fn test_boolean_and() {
    let source = "a and b";
    let node = Node::And(BinaryBooleanNode {
        left: Box::new(lvar("a", 0, 1)),
        right: Box::new(lvar("b", 6, 7)),
        operator_loc: loc(2, 5),
        location: loc(0, 7),
    });
    let ast = translate_one(&unit_with_locals(source, node, vec!["a", "b"]));

    assert_eq!(ast.to_string(), "(and\n  (lvar :a)\n  (lvar :b))");
    assert_eq!(
        ast.map,
        SourceMap::Operator {
            operator: Some(span(2, 5)),
            expression: span(0, 7),
        }
    );
}

#[test]
fn test_modifier_conditional_swaps_shape() {
    // Modifier form: body leads, predicate trails, no end token recorded.
    let source = "foo if bar";
    let node = Node::If(IfNode {
        if_keyword_loc: Some(loc(4, 6)),
        predicate: Box::new(lvar("bar", 7, 10)),
        statements: Some(statements(vec![lvar("foo", 0, 3)], 0, 3)),
        consequent: None,
        end_keyword_loc: None,
        location: loc(0, 10),
    });
    let ast = translate_one(&unit_with_locals(source, node, vec!["foo", "bar"]));

    assert_eq!(
        ast.to_string(),
        "(if\n  (lvar :bar)\n  (lvar :foo) nil)"
    );
    assert_eq!(
        ast.map,
        SourceMap::Keyword {
            keyword: span(4, 6),
            begin: None,
            end: None,
            expression: span(0, 10),
        }
    );
}

#[test]
fn test_keyword_conditional_scans_then() {
    let source = "if bar then foo end";
    let node = Node::If(IfNode {
        if_keyword_loc: Some(loc(0, 2)),
        predicate: Box::new(lvar("bar", 3, 6)),
        statements: Some(statements(vec![lvar("foo", 12, 15)], 12, 15)),
        consequent: None,
        end_keyword_loc: Some(loc(16, 19)),
        location: loc(0, 19),
    });
    let ast = translate_one(&unit_with_locals(source, node, vec!["foo", "bar"]));

    assert_eq!(
        ast.map,
        SourceMap::Condition {
            keyword: Some(span(0, 2)),
            begin: Some(span(7, 11)),
            else_: None,
            end: Some(span(16, 19)),
            expression: span(0, 19),
        }
    );
}

#[test]
fn test_keyword_conditional_semicolon_beats_later_then() {
    // Both separators present: the earlier occurrence wins the scan.
    let source = "if bar; foo then end";
    let node = Node::If(IfNode {
        if_keyword_loc: Some(loc(0, 2)),
        predicate: Box::new(lvar("bar", 3, 6)),
        statements: Some(statements(vec![lvar("foo", 8, 11)], 8, 11)),
        consequent: None,
        end_keyword_loc: Some(loc(17, 20)),
        location: loc(0, 20),
    });
    let ast = translate_one(&unit_with_locals(source, node, vec!["foo", "bar"]));

    match ast.map {
        SourceMap::Condition { begin, .. } => assert_eq!(begin, Some(span(6, 7))),
        other => panic!("expected a condition map, got {other:?}"),
    }
}

#[test]
fn test_ternary() {
    let source = "a ? b : c";
    let node = Node::If(IfNode {
        if_keyword_loc: None,
        predicate: Box::new(lvar("a", 0, 1)),
        statements: Some(statements(vec![lvar("b", 4, 5)], 4, 5)),
        consequent: Some(Box::new(Node::Else(ElseNode {
            else_keyword_loc: loc(6, 7),
            statements: Some(statements(vec![lvar("c", 8, 9)], 8, 9)),
            end_keyword_loc: None,
            location: loc(6, 9),
        }))),
        end_keyword_loc: None,
        location: loc(0, 9),
    });
    let ast = translate_one(&unit_with_locals(source, node, vec!["a", "b", "c"]));

    assert_eq!(ast.kind, AstKind::If);
    assert_eq!(
        ast.map,
        SourceMap::Ternary {
            question: span(2, 3),
            colon: span(6, 7),
            expression: span(0, 9),
        }
    );
}

#[test]
fn test_index_write_scans_assignment_operator() {
    let source = "a[0] = 1";
    let node = Node::Call(CallNode {
        receiver: Some(Box::new(lvar("a", 0, 1))),
        call_operator_loc: None,
        name: "[]=".into(),
        message_loc: Some(loc(1, 4)),
        opening_loc: Some(loc(1, 2)),
        arguments: Some(Box::new(ArgumentsNode {
            arguments: vec![int(0, 2, 3), int(1, 7, 8)],
            location: loc(2, 8),
        })),
        closing_loc: Some(loc(3, 4)),
        block: None,
        location: loc(0, 8),
    });
    let ast = translate_one(&unit_with_locals(source, node, vec!["a"]));

    assert_eq!(
        ast.to_string(),
        "(indexasgn\n  (lvar :a)\n  (int 0)\n  (int 1))"
    );
    assert_eq!(
        ast.map,
        SourceMap::Index {
            begin: span(1, 2),
            end: span(3, 4),
            operator: Some(span(5, 6)),
            expression: span(0, 8),
        }
    );
}

#[test]
fn test_attribute_write_scans_assignment_operator() {
    let source = "x.foo = 1";
    let node = Node::Call(CallNode {
        receiver: Some(Box::new(lvar("x", 0, 1))),
        call_operator_loc: Some(loc(1, 2)),
        name: "foo=".into(),
        message_loc: Some(loc(2, 5)),
        opening_loc: None,
        arguments: Some(Box::new(ArgumentsNode {
            arguments: vec![int(1, 8, 9)],
            location: loc(8, 9),
        })),
        closing_loc: None,
        block: None,
        location: loc(0, 9),
    });
    let ast = translate_one(&unit_with_locals(source, node, vec!["x"]));

    assert_eq!(ast.to_string(), "(send\n  (lvar :x) :foo=\n  (int 1))");
    assert_eq!(
        ast.map,
        SourceMap::Send {
            dot: Some(span(1, 2)),
            selector: Some(span(2, 5)),
            operator: Some(span(6, 7)),
            begin: None,
            end: None,
            expression: span(0, 9),
        }
    );
}

#[test]
fn test_receiverless_write_shaped_call_is_always_an_attribute_write() {
    // A call named `foo=` with one argument and no receiver still becomes
    // the write shape, never a generic send.
    let source = "foo = 1";
    let node = Node::Call(CallNode {
        receiver: None,
        call_operator_loc: None,
        name: "foo=".into(),
        message_loc: Some(loc(0, 3)),
        opening_loc: None,
        arguments: Some(Box::new(ArgumentsNode {
            arguments: vec![int(1, 6, 7)],
            location: loc(6, 7),
        })),
        closing_loc: None,
        block: None,
        location: loc(0, 7),
    });
    let ast = translate_one(&unit(source, node));

    assert_eq!(ast.kind, AstKind::Send);
    match &ast.children[1] {
        Child::Sym(name) => assert_eq!(name.as_str(), "foo="),
        other => panic!("expected the selector symbol, got {other:?}"),
    }
    match ast.map {
        SourceMap::Send { operator, .. } => assert_eq!(operator, Some(span(4, 5))),
        other => panic!("expected a send map, got {other:?}"),
    }
}

#[test]
fn test_block_detaches_and_sole_parameter_expands() {
    let source = "foo { |x| x }";
    let block = BlockNode {
        locals: vec!["x".into()],
        parameters: Some(Box::new(BlockParametersNode {
            parameters: Some(Box::new(ParametersNode {
                requireds: vec![Node::RequiredParameter(VariableRefNode {
                    name: "x".into(),
                    location: loc(7, 8),
                })],
                optionals: vec![],
                rest: None,
                posts: vec![],
                keywords: vec![],
                keyword_rest: None,
                block: None,
                location: loc(7, 8),
            })),
            locals: vec![],
            opening_loc: Some(loc(6, 7)),
            closing_loc: Some(loc(8, 9)),
            location: loc(6, 9),
        })),
        body: Some(Box::new(Node::Statements(StatementsNode {
            body: vec![lvar("x", 10, 11)],
            location: loc(10, 11),
        }))),
        opening_loc: loc(4, 5),
        closing_loc: loc(12, 13),
        location: loc(4, 13),
    };
    let node = Node::Call(CallNode {
        receiver: None,
        call_operator_loc: None,
        name: "foo".into(),
        message_loc: Some(loc(0, 3)),
        opening_loc: None,
        arguments: None,
        closing_loc: None,
        block: Some(Box::new(Node::Block(block))),
        location: loc(0, 13),
    });
    let ast = translate_one(&unit(source, node));

    assert_eq!(
        ast.to_string(),
        "(block\n  (send nil :foo)\n  (args\n    (procarg0\n      (arg :x)))\n  (lvar :x))"
    );
}

#[test]
fn test_signed_numeric_literal_records_sign_operator() {
    let source = "-1";
    let node = int(-1, 0, 2);
    let ast = translate_one(&unit(source, node));

    insta::assert_snapshot!(ast.to_string(), @"(int -1)");
    assert_eq!(
        ast.map,
        SourceMap::Operator {
            operator: Some(span(0, 1)),
            expression: span(0, 2),
        }
    );
}

#[test]
fn test_unsigned_numeric_literal_has_no_operator() {
    let source = "42";
    let ast = translate_one(&unit(source, int(42, 0, 2)));
    assert_eq!(
        ast.map,
        SourceMap::Operator {
            operator: None,
            expression: span(0, 2),
        }
    );
}

#[test]
fn test_multiple_assignment() {
    let source = "foo, bar = baz";
    let target = |name: &str, start, end| {
        Node::LocalVariableTarget(VariableRefNode {
            name: name.into(),
            location: loc(start, end),
        })
    };
    let node = Node::MultiWrite(MultiWriteNode {
        targets: vec![target("foo", 0, 3), target("bar", 5, 8)],
        lparen_loc: None,
        rparen_loc: None,
        operator_loc: loc(9, 10),
        value: Box::new(lvar("baz", 11, 14)),
        location: loc(0, 14),
    });
    let ast = translate_one(&unit_with_locals(source, node, vec!["foo", "bar", "baz"]));

    insta::assert_snapshot!(ast.to_string(), @r"
    (masgn
      (mlhs
        (lvasgn :foo)
        (lvasgn :bar))
      (lvar :baz))
    ");
}

#[test]
fn test_begin_rescue_layers() {
    let source = "begin\na\nrescue E => e\nb\nend";
    let node = Node::Begin(BeginNode {
        begin_keyword_loc: Some(loc(0, 5)),
        statements: Some(statements(vec![lvar("a", 6, 7)], 6, 7)),
        rescue_clause: Some(Box::new(RescueNode {
            keyword_loc: loc(8, 14),
            exceptions: vec![Node::ConstantRead(VariableRefNode {
                name: "E".into(),
                location: loc(15, 16),
            })],
            operator_loc: Some(loc(17, 19)),
            reference: Some(Box::new(Node::LocalVariableTarget(VariableRefNode {
                name: "e".into(),
                location: loc(20, 21),
            }))),
            statements: Some(statements(vec![lvar("b", 22, 23)], 22, 23)),
            consequent: None,
            location: loc(8, 23),
        })),
        else_clause: None,
        ensure_clause: None,
        end_keyword_loc: Some(loc(24, 27)),
        location: loc(0, 27),
    });
    let ast = translate_one(&unit_with_locals(source, node, vec!["a", "b", "e"]));

    assert_eq!(
        ast.to_string(),
        "(kwbegin\n  (rescue\n    (lvar :a)\n    (resbody\n      (array\n        (const nil :E))\n      (lvasgn :e)\n      (lvar :b)) nil))"
    );
}

#[test]
fn test_constant_path_from_global_scope() {
    let source = "::Foo::Bar";
    let node = Node::ConstantPath(ConstantPathNode {
        parent: Some(Box::new(Node::ConstantPath(ConstantPathNode {
            parent: None,
            name: "Foo".into(),
            name_loc: loc(2, 5),
            delimiter_loc: loc(0, 2),
            location: loc(0, 5),
        }))),
        name: "Bar".into(),
        name_loc: loc(7, 10),
        delimiter_loc: loc(5, 7),
        location: loc(0, 10),
    });
    let ast = translate_one(&unit(source, node));

    assert_eq!(
        ast.to_string(),
        "(const\n  (const\n    (cbase) :Foo) :Bar)"
    );
    assert_eq!(
        ast.map,
        SourceMap::Constant {
            double_colon: Some(span(5, 7)),
            name: span(7, 10),
            operator: None,
            expression: span(0, 10),
        }
    );
}

#[test]
fn test_forwarded_rest_argument_inside_declaring_scope() {
    let source = "def foo(*)\n  bar(*)\nend";
    let call = Node::Call(CallNode {
        receiver: None,
        call_operator_loc: None,
        name: "bar".into(),
        message_loc: Some(loc(13, 16)),
        opening_loc: Some(loc(16, 17)),
        arguments: Some(Box::new(ArgumentsNode {
            arguments: vec![Node::Splat(SplatNode {
                operator_loc: loc(17, 18),
                expression: None,
                location: loc(17, 18),
            })],
            location: loc(17, 18),
        })),
        closing_loc: Some(loc(18, 19)),
        block: None,
        location: loc(13, 19),
    });
    let node = Node::Def(DefNode {
        name: "foo".into(),
        name_loc: loc(4, 7),
        receiver: None,
        parameters: Some(Box::new(ParametersNode {
            requireds: vec![],
            optionals: vec![],
            rest: Some(Box::new(Node::RestParameter(RestParameterNode {
                name: None,
                name_loc: None,
                operator_loc: loc(8, 9),
                location: loc(8, 9),
            }))),
            posts: vec![],
            keywords: vec![],
            keyword_rest: None,
            block: None,
            location: loc(8, 9),
        })),
        body: Some(Box::new(Node::Statements(StatementsNode {
            body: vec![call],
            location: loc(13, 19),
        }))),
        locals: vec!["*".into()],
        def_keyword_loc: loc(0, 3),
        operator_loc: None,
        lparen_loc: Some(loc(7, 8)),
        rparen_loc: Some(loc(9, 10)),
        equal_loc: None,
        end_keyword_loc: Some(loc(20, 23)),
        location: loc(0, 23),
    });
    let ast = translate_one(&unit(source, node));

    assert_eq!(
        ast.to_string(),
        "(def :foo\n  (args\n    (restarg))\n  (send nil :bar\n    (forwarded_restarg)))"
    );
}

#[test]
fn test_endless_def_records_assignment_not_end() {
    let source = "def foo = 1";
    let node = Node::Def(DefNode {
        name: "foo".into(),
        name_loc: loc(4, 7),
        receiver: None,
        parameters: None,
        body: Some(Box::new(int(1, 10, 11))),
        locals: vec![],
        def_keyword_loc: loc(0, 3),
        operator_loc: None,
        lparen_loc: None,
        rparen_loc: None,
        equal_loc: Some(loc(8, 9)),
        end_keyword_loc: None,
        location: loc(0, 11),
    });
    let ast = translate_one(&unit(source, node));

    assert_eq!(ast.to_string(), "(def :foo nil\n  (int 1))");
    assert_eq!(
        ast.map,
        SourceMap::Definition {
            keyword: span(0, 3),
            operator: None,
            name: Some(span(4, 7)),
            assignment: Some(span(8, 9)),
            end: None,
            expression: span(0, 11),
        }
    );
}

#[test]
fn test_empty_unit_translates_to_none() {
    let unit = ParsedUnit::new("", None);
    assert_eq!(translate(&unit).unwrap(), None);
}

#[test]
fn test_block_node_rejected_standalone() {
    let source = "foo { }";
    let node = Node::Block(BlockNode {
        locals: vec![],
        parameters: None,
        body: None,
        opening_loc: loc(4, 5),
        closing_loc: loc(6, 7),
        location: loc(4, 7),
    });
    let result = translate(&unit(source, node));
    assert!(matches!(
        result,
        Err(ruby_translator::TranslateError::StructuralInvariant { kind: "block", .. })
    ));
}

#[test]
fn test_translator_reusable_after_failed_unit() {
    // A fatal unit leaves nothing behind; the next unit starts clean.
    let source = "foo { }";
    let bad = Node::Block(BlockNode {
        locals: vec![],
        parameters: None,
        body: None,
        opening_loc: loc(4, 5),
        closing_loc: loc(6, 7),
        location: loc(4, 7),
    });
    assert!(translate(&unit(source, bad)).is_err());

    let good = unit_with_locals("a and b", sample_and(), vec!["a", "b"]);
    assert!(translate(&good).is_ok());
}

fn sample_and() -> Node {
    Node::And(BinaryBooleanNode {
        left: Box::new(lvar("a", 0, 1)),
        right: Box::new(lvar("b", 6, 7)),
        operator_loc: loc(2, 5),
        location: loc(0, 7),
    })
}

#[test]
fn test_translate_root_directly() {
    let mut translator = Translator::new("a and b");
    let root = Node::Program(ProgramNode {
        locals: vec!["a".into(), "b".into()],
        statements: statements(vec![sample_and()], 0, 7),
        location: loc(0, 7),
    });
    let ast = translator.translate_root(&root).unwrap().unwrap();
    assert_eq!(ast.kind, AstKind::And);
}
