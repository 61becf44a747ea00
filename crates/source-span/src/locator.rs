//! Windowed scanning for tokens the surface grammar elides.
//!
//! Optional separators and operators (`;`, `then`, `do`, `=`) have no
//! dedicated range on the tree the upstream parser hands over. When one is
//! needed, the raw source between two known byte offsets is scanned for it.

/// Finds the first occurrence of any candidate token within
/// `source[start_offset..end_offset)`.
///
/// The earliest match in the window wins; the caller-supplied candidate
/// order breaks ties only when two candidates start at the same offset.
/// Returns the matched candidate and the absolute byte offset of its first
/// byte, or `None` when no candidate occurs in the window: an absent
/// optional token, not an error.
///
/// The scan never inspects bytes outside the window. Out-of-range and
/// inverted windows yield `None`.
pub fn find(
    source: &str,
    start_offset: usize,
    end_offset: usize,
    candidates: &[&'static str],
) -> Option<(&'static str, usize)> {
    let start = start_offset.min(source.len());
    let end = end_offset.min(source.len());
    if start >= end {
        return None;
    }

    let window = &source.as_bytes()[start..end];
    let mut best: Option<(&'static str, usize)> = None;

    for &candidate in candidates {
        if let Some(index) = find_bytes(window, candidate.as_bytes()) {
            let better = match best {
                Some((_, best_index)) => index < best_index,
                None => true,
            };
            if better {
                best = Some((candidate, index));
            }
        }
    }

    best.map(|(candidate, index)| (candidate, start + index))
}

/// Byte-wise substring search; candidates are short literal tokens, so the
/// naive scan is the right tool.
fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_candidate() {
        let source = "if foo then bar end";
        assert_eq!(find(source, 6, 12, &["then"]), Some(("then", 7)));
    }

    #[test]
    fn test_earliest_occurrence_wins() {
        // "then" occurs before ";" inside the window, so "then" wins even
        // though ";" is listed first.
        let source = "x then y ; z";
        assert_eq!(find(source, 0, source.len(), &[";", "then"]), Some(("then", 2)));
    }

    #[test]
    fn test_priority_breaks_same_offset_ties() {
        let source = "a == b";
        assert_eq!(find(source, 1, 5, &["==", "="]), Some(("==", 2)));
        assert_eq!(find(source, 1, 5, &["=", "=="]), Some(("=", 2)));
    }

    #[test]
    fn test_absent_token() {
        let source = "if foo; bar end";
        assert_eq!(find(source, 0, 6, &["then"]), None);
    }

    #[test]
    fn test_match_outside_window_ignored() {
        let source = "foo = bar";
        assert_eq!(find(source, 0, 3, &["="]), None);
        assert_eq!(find(source, 5, 4, &["="]), None);
    }

    #[test]
    fn test_window_clamped_to_buffer() {
        let source = "a;";
        assert_eq!(find(source, 0, 100, &[";"]), Some((";", 1)));
    }
}
