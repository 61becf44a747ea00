//! Heredoc line splitting and span arithmetic.

use pretty_assertions::assert_eq;
use ruby_ast::{AstKind, Child, SourceMap};
use ruby_cst::*;
use ruby_translator::translate;
use source_span::Span;

fn loc(start: usize, end: usize) -> Location {
    Location::new(start, end)
}

fn span(start: u32, end: u32) -> Span {
    Span::new(start, end)
}

fn unit(source: &str, statement: Node, locals: Vec<&str>) -> ParsedUnit {
    let end = source.len();
    let root = Node::Program(ProgramNode {
        locals: locals.into_iter().map(Into::into).collect(),
        statements: Box::new(StatementsNode {
            body: vec![statement],
            location: loc(0, end),
        }),
        location: loc(0, end),
    });
    ParsedUnit::new(source, Some(root))
}

fn str_fragments(node: &ruby_ast::Node) -> Vec<(String, Span)> {
    node.children
        .iter()
        .filter_map(|child| match child {
            Child::Node(child) if child.kind == AstKind::Str => child
                .str_value()
                .map(|text| (text.to_string(), child.expression())),
            _ => None,
        })
        .collect()
}

#[test]
fn test_multiline_heredoc_splits_per_escaped_line() {
    // The `\t` escape is two bytes of raw source but one character of
    // unescaped text; line spans must follow the raw lengths.
    let source = "x = <<MSG\nl1\\tz\nl2\nMSG\n";
    let node = Node::StringLiteral(StringNode {
        opening_loc: Some(loc(4, 9)),
        content_loc: loc(10, 19),
        closing_loc: Some(loc(19, 23)),
        unescaped: "l1\tz\nl2\n".to_string(),
        location: loc(4, 9),
    });
    let ast = translate(&unit(source, node, vec![]))
        .unwrap()
        .unwrap();

    assert_eq!(ast.kind, AstKind::Dstr);
    assert_eq!(
        ast.map,
        SourceMap::Heredoc {
            expression: span(4, 9),
            heredoc_body: span(10, 19),
            heredoc_end: span(19, 22),
        }
    );

    let fragments = str_fragments(&ast);
    assert_eq!(
        fragments,
        vec![
            ("l1\tz\n".to_string(), span(10, 16)),
            ("l2\n".to_string(), span(16, 19)),
        ]
    );

    // Concatenating the unescaped fragments reproduces the literal.
    let joined: String = fragments.iter().map(|(text, _)| text.as_str()).collect();
    assert_eq!(joined, "l1\tz\nl2\n");
}

#[test]
fn test_interpolated_heredoc_keeps_source_order() {
    let source = "s = <<MSG\na#{x}b\nc\nMSG\n";
    let parts = vec![
        Node::StringLiteral(StringNode {
            opening_loc: None,
            content_loc: loc(10, 11),
            closing_loc: None,
            unescaped: "a".to_string(),
            location: loc(10, 11),
        }),
        Node::EmbeddedStatements(EmbeddedStatementsNode {
            opening_loc: loc(11, 13),
            statements: Some(Box::new(StatementsNode {
                body: vec![Node::LocalVariableRead(VariableRefNode {
                    name: "x".into(),
                    location: loc(13, 14),
                })],
                location: loc(13, 14),
            })),
            closing_loc: loc(14, 15),
            location: loc(11, 15),
        }),
        Node::StringLiteral(StringNode {
            opening_loc: None,
            content_loc: loc(15, 19),
            closing_loc: None,
            unescaped: "b\nc\n".to_string(),
            location: loc(15, 19),
        }),
    ];
    let node = Node::InterpolatedString(InterpolatedStringNode {
        opening_loc: Some(loc(4, 9)),
        parts,
        closing_loc: Some(loc(19, 23)),
        location: loc(4, 9),
    });
    let ast = translate(&unit(source, node, vec!["x"])).unwrap().unwrap();

    assert_eq!(ast.kind, AstKind::Dstr);
    let kinds: Vec<AstKind> = ast
        .children
        .iter()
        .filter_map(|child| match child {
            Child::Node(child) => Some(child.kind),
            _ => None,
        })
        .collect();
    assert_eq!(
        kinds,
        vec![AstKind::Str, AstKind::Begin, AstKind::Str, AstKind::Str]
    );

    let fragments = str_fragments(&ast);
    assert_eq!(
        fragments,
        vec![
            ("a".to_string(), span(10, 11)),
            ("b\n".to_string(), span(15, 17)),
            ("c\n".to_string(), span(17, 19)),
        ]
    );
}

#[test]
fn test_adjacent_open_ended_fragments_merge() {
    // Two plain fragments where the first does not end its line collapse
    // into one fragment covering both ranges.
    let source = "s = <<MSG\nab\nMSG\n";
    let parts = vec![
        Node::StringLiteral(StringNode {
            opening_loc: None,
            content_loc: loc(10, 11),
            closing_loc: None,
            unescaped: "a".to_string(),
            location: loc(10, 11),
        }),
        Node::StringLiteral(StringNode {
            opening_loc: None,
            content_loc: loc(11, 13),
            closing_loc: None,
            unescaped: "b\n".to_string(),
            location: loc(11, 13),
        }),
    ];
    let node = Node::InterpolatedString(InterpolatedStringNode {
        opening_loc: Some(loc(4, 9)),
        parts,
        closing_loc: Some(loc(13, 17)),
        location: loc(4, 9),
    });
    let ast = translate(&unit(source, node, vec![])).unwrap().unwrap();

    // One merged fragment collapses onto a plain string node.
    assert_eq!(ast.kind, AstKind::Str);
    assert_eq!(ast.str_value(), Some("ab\n"));
    assert_eq!(
        ast.map,
        SourceMap::Heredoc {
            expression: span(4, 9),
            heredoc_body: span(10, 13),
            heredoc_end: span(13, 16),
        }
    );
}

#[test]
fn test_single_quoted_heredoc_counts_raw_lines() {
    // Single-quoted heredocs take no escapes; every raw line is its
    // unescaped length plus the newline.
    let source = "x = <<'M'\na\\n\nb\nM\n";
    let node = Node::StringLiteral(StringNode {
        opening_loc: Some(loc(4, 9)),
        content_loc: loc(10, 16),
        closing_loc: Some(loc(16, 18)),
        unescaped: "a\\n\nb\n".to_string(),
        location: loc(4, 9),
    });
    let ast = translate(&unit(source, node, vec![])).unwrap().unwrap();

    let fragments = str_fragments(&ast);
    assert_eq!(
        fragments,
        vec![
            ("a\\n\n".to_string(), span(10, 14)),
            ("b\n".to_string(), span(14, 16)),
        ]
    );
}

#[test]
fn test_closing_delimiter_strips_trailing_whitespace() {
    let source = "x = <<MSG\na\nb\nc\nMSG  \n";
    let node = Node::StringLiteral(StringNode {
        opening_loc: Some(loc(4, 9)),
        content_loc: loc(10, 16),
        closing_loc: Some(loc(16, 22)),
        unescaped: "a\nb\nc\n".to_string(),
        location: loc(4, 9),
    });
    let ast = translate(&unit(source, node, vec![])).unwrap().unwrap();

    match ast.map {
        SourceMap::Heredoc { heredoc_end, .. } => assert_eq!(heredoc_end, span(16, 19)),
        other => panic!("expected a heredoc map, got {other:?}"),
    }
}
