//! Byte-to-character offset resolution.

use crate::CharOffset;
use rustc_hash::FxHashMap;
use text_size::TextSize;

/// Resolves byte offsets reported by the upstream parser into the character
/// offsets used by [`crate::Span`].
///
/// One cache is created per translated compilation unit and discarded with
/// it. Resolution is memoized lazily; for all-ASCII sources the two offset
/// systems coincide and the memo is never touched.
#[derive(Debug)]
pub struct OffsetCache<'src> {
    source: &'src str,
    ascii_only: bool,
    memo: FxHashMap<usize, u32>,
}

impl<'src> OffsetCache<'src> {
    /// Creates a cache over the given source buffer.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            ascii_only: source.is_ascii(),
            memo: FxHashMap::default(),
        }
    }

    /// Returns the source buffer this cache resolves against.
    #[inline]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Converts a byte offset into a character offset.
    ///
    /// Offsets past the end of the buffer clamp to the final character
    /// offset; offsets inside a multi-byte sequence resolve to the
    /// character that contains them.
    pub fn resolve(&mut self, byte_offset: usize) -> CharOffset {
        if self.ascii_only {
            let clamped = byte_offset.min(self.source.len());
            return TextSize::from(clamped as u32);
        }

        if let Some(&chars) = self.memo.get(&byte_offset) {
            return TextSize::from(chars);
        }

        let clamped = byte_offset.min(self.source.len());
        let chars = self.source[..floor_char_boundary(self.source, clamped)]
            .chars()
            .count() as u32;
        self.memo.insert(byte_offset, chars);
        TextSize::from(chars)
    }
}

/// Rounds a byte index down to the nearest character boundary.
fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_identity() {
        let mut cache = OffsetCache::new("foo = bar");
        assert_eq!(cache.resolve(0), TextSize::from(0));
        assert_eq!(cache.resolve(6), TextSize::from(6));
        assert_eq!(cache.resolve(9), TextSize::from(9));
        assert!(cache.memo.is_empty());
    }

    #[test]
    fn test_ascii_clamps_past_end() {
        let mut cache = OffsetCache::new("ab");
        assert_eq!(cache.resolve(10), TextSize::from(2));
    }

    #[test]
    fn test_multibyte() {
        // "é" is two bytes, one character.
        let source = "é = 1";
        let mut cache = OffsetCache::new(source);
        assert_eq!(cache.resolve(0), TextSize::from(0));
        assert_eq!(cache.resolve(2), TextSize::from(1));
        assert_eq!(cache.resolve(4), TextSize::from(3));
        // Memoized on second hit.
        assert_eq!(cache.resolve(2), TextSize::from(1));
        assert_eq!(cache.memo.len(), 3);
    }

    #[test]
    fn test_mid_sequence_offset() {
        let source = "é";
        let mut cache = OffsetCache::new(source);
        assert_eq!(cache.resolve(1), TextSize::from(0));
    }
}
