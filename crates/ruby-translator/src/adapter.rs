//! Token and comment adaptation.
//!
//! The upstream parser already produced both streams; this layer only
//! re-addresses them into character spans, slices token text, and drops the
//! records the downstream toolchain never sees.

use ruby_ast as ast;
use ruby_cst::{CommentKind, ParsedUnit};
use smol_str::SmolStr;
use source_span::{OffsetCache, Span};

/// Upstream token kinds with no downstream counterpart.
const DROPPED_TOKEN_KINDS: &[&str] = &["eof", "embdoc_begin", "embdoc_line", "embdoc_end"];

/// Adapts the comment stream, excluding the trailing-data pseudo-comment.
pub fn comments(unit: &ParsedUnit, offsets: &mut OffsetCache<'_>) -> Vec<ast::Comment> {
    unit.comments
        .iter()
        .filter(|comment| comment.kind != CommentKind::TrailingData)
        .map(|comment| {
            let start = offsets.resolve(comment.location.start);
            let end = offsets.resolve(comment.location.end);
            ast::Comment {
                span: Span::new(start, end),
            }
        })
        .collect()
}

/// Adapts the lexical token stream: kind tag carried through, text sliced
/// from the source, offsets converted.
pub fn tokens(unit: &ParsedUnit, offsets: &mut OffsetCache<'_>) -> Vec<ast::Token> {
    unit.tokens
        .iter()
        .filter(|token| !DROPPED_TOKEN_KINDS.contains(&token.kind.as_str()))
        .map(|token| {
            let start = offsets.resolve(token.location.start);
            let end = offsets.resolve(token.location.end);
            ast::Token {
                name: SmolStr::new(&token.kind),
                text: token.location.slice(&unit.source).to_string(),
                span: Span::new(start, end),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ruby_cst::{Comment, LexToken, Location};

    #[test]
    fn test_comments_skip_trailing_data() {
        let mut unit = ParsedUnit::new("# a\n__END__\ndata\n", None);
        unit.comments = vec![
            Comment::new(CommentKind::Line, Location::new(0, 3)),
            Comment::new(CommentKind::TrailingData, Location::new(4, 17)),
        ];
        let mut offsets = OffsetCache::new(&unit.source);
        let adapted = comments(&unit, &mut offsets);
        assert_eq!(adapted.len(), 1);
        assert_eq!(adapted[0].span, Span::new(0u32, 3u32));
    }

    #[test]
    fn test_tokens_slice_text_and_drop_eof() {
        let mut unit = ParsedUnit::new("a = 1", None);
        unit.tokens = vec![
            LexToken::new("ident", Location::new(0, 1)),
            LexToken::new("equal", Location::new(2, 3)),
            LexToken::new("integer", Location::new(4, 5)),
            LexToken::new("eof", Location::new(5, 5)),
        ];
        let mut offsets = OffsetCache::new(&unit.source);
        let adapted = tokens(&unit, &mut offsets);
        assert_eq!(adapted.len(), 3);
        assert_eq!(adapted[0].text, "a");
        assert_eq!(adapted[1].name, "equal");
        assert_eq!(adapted[2].span, Span::new(4u32, 5u32));
    }

    #[test]
    fn test_token_spans_are_character_addressed() {
        // Multi-byte text before the token shifts its character span.
        let mut unit = ParsedUnit::new("é = 1", None);
        unit.tokens = vec![LexToken::new("integer", Location::new(5, 6))];
        let mut offsets = OffsetCache::new(&unit.source);
        let adapted = tokens(&unit, &mut offsets);
        assert_eq!(adapted[0].span, Span::new(4u32, 5u32));
    }
}
