//! Heredoc span reconstruction.
//!
//! A heredoc's plain fragments arrive as one node per interpolation gap,
//! each possibly spanning several physical lines. The downstream toolchain
//! wants one fragment per line, with each line's range measured against the
//! *escaped* source text: escape sequences make the raw line longer than
//! its unescaped value, and a trailing backslash glues physical lines into
//! one logical line.

use crate::context::Context;
use crate::error::TranslateError;
use crate::transducer::Translator;
use ruby_ast as ast;
use ruby_ast::Tok;
use ruby_cst as cst;
use ruby_cst::Location;
use smol_str::SmolStr;

impl<'src> Translator<'src> {
    /// Splits and merges the parts of a heredoc-flavored literal, returning
    /// the fragment/interpolation children in source order plus the closing
    /// delimiter token with trailing whitespace stripped from its range.
    pub(crate) fn heredoc_parts(
        &mut self,
        parts: &[cst::Node],
        closing_loc: Location,
        opening_loc: Location,
        ctx: &Context,
    ) -> Result<(Vec<ast::Node>, Tok), TranslateError> {
        let single_quoted = opening_loc.slice(self.source()).ends_with('\'');
        let mut children: Vec<ast::Node> = Vec::new();

        for part in parts {
            match part {
                cst::Node::StringLiteral(string)
                    if string.unescaped.matches('\n').count() > 1 =>
                {
                    self.split_multiline_fragment(string, single_quoted, &mut children);
                }
                other => {
                    let child = self.node(other, ctx)?;
                    push_merging(&mut children, child);
                }
            }
        }

        Ok((children, self.closing_delimiter(closing_loc)))
    }

    /// One fragment per unescaped line, each spanning its escaped source
    /// text. Lines joined by a trailing backslash share one fragment span.
    fn split_multiline_fragment(
        &mut self,
        string: &cst::StringNode,
        single_quoted: bool,
        children: &mut Vec<ast::Node>,
    ) {
        let unescaped_lines = split_lines(&string.unescaped);
        let escaped = string.content_loc.slice(self.source());
        let escaped_lines = split_lines(escaped);

        let escaped_lengths = if single_quoted {
            escaped_lines.iter().map(|line| line.len() + 1).collect()
        } else {
            continuation_lengths(&escaped_lines)
        };

        let mut start_offset = string.location.start;
        for (index, line) in unescaped_lines.iter().enumerate() {
            let length = escaped_lengths.get(index).copied().unwrap_or(0);
            let end_offset = start_offset + length;
            let span = self.span_offsets(start_offset, end_offset);
            let fragment = self.string_fragment(format!("{line}\n"), span);
            push_merging(children, fragment);
            start_offset = end_offset;
        }
    }

    /// The closing delimiter covers only the delimiter text, not the
    /// trailing newline or dedentation whitespace of its line.
    fn closing_delimiter(&mut self, closing_loc: Location) -> Tok {
        let closing = closing_loc.slice(self.source());
        let trimmed = closing.trim_end();
        let span = self.span_offsets(closing_loc.start, closing_loc.start + trimmed.len());
        (SmolStr::new(trimmed), span)
    }
}

/// Appends a heredoc child, dropping empty fragments and absorbing a plain
/// fragment into its predecessor when that predecessor does not yet end the
/// line. Merged fragments cover both source ranges.
fn push_merging(children: &mut Vec<ast::Node>, child: ast::Node) {
    let Some(text) = child.str_value() else {
        children.push(child);
        return;
    };
    if text.is_empty() {
        return;
    }

    if let Some(last) = children.last_mut() {
        let open_ended = last
            .str_value()
            .is_some_and(|existing| !existing.ends_with('\n'));
        if open_ended {
            let merged_span = last.expression().cover(child.expression());
            if let Some(ast::Child::Str(existing)) = last.children.first_mut() {
                existing.push_str(text);
                last.map = ast::SourceMap::Bare {
                    expression: merged_span,
                };
                return;
            }
        }
    }

    children.push(child);
}

/// Splits on newlines the way the fragment arithmetic expects: interior
/// empty lines survive, trailing empty strings do not.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Byte lengths of logical lines: a line ending in an unescaped backslash
/// joins the next physical line, and every physical line accounts for the
/// newline it consumed.
fn continuation_lengths(lines: &[&str]) -> Vec<usize> {
    let mut lengths = Vec::with_capacity(lines.len());
    let mut bytes = 0usize;
    let mut joined = 0usize;
    for line in lines {
        bytes += line.len();
        joined += 1;
        let continues = line.ends_with('\\') && !line.ends_with("\\\\");
        if !continues {
            lengths.push(bytes + joined);
            bytes = 0;
            joined = 0;
        }
    }
    if joined > 0 {
        lengths.push(bytes + joined);
    }
    lengths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_keeps_interior_blanks() {
        assert_eq!(split_lines("a\n\nb\n"), vec!["a", "", "b"]);
        assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
        assert_eq!(split_lines(""), Vec::<&str>::new());
    }

    #[test]
    fn test_continuation_lengths_plain() {
        // Two independent lines, each length + its newline.
        assert_eq!(continuation_lengths(&["abc", "de"]), vec![4, 3]);
    }

    #[test]
    fn test_continuation_lengths_joined() {
        // "ab\" continues into "cd": one logical line of 2+1 + 2 bytes plus
        // two newlines.
        assert_eq!(continuation_lengths(&["ab\\", "cd"]), vec![7]);
    }

    #[test]
    fn test_continuation_lengths_escaped_backslash_does_not_join() {
        assert_eq!(continuation_lengths(&["ab\\\\", "cd"]), vec![5, 3]);
    }
}
