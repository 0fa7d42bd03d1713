// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text analysis: cluster, word and line boundaries.

pub(crate) mod bidi;
pub(crate) mod segments;

use alloc::vec::Vec;

use icu_segmenter::options::{LineBreakOptions, WordBreakInvariantOptions};
use icu_segmenter::{GraphemeClusterSegmenter, LineSegmenter, WordSegmenter};

/// Boundary properties of a single offset in the text.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub(crate) struct Boundaries(u8);

impl Boundaries {
    const CHAR_SHIFT: u8 = 0;
    const CLUSTER_SHIFT: u8 = 1;
    const LINE_SHIFT: u8 = 2;
    const WORD_START_SHIFT: u8 = 3;
    const WORD_END_SHIFT: u8 = 4;

    const CHAR: u8 = 1 << Self::CHAR_SHIFT;
    const CLUSTER: u8 = 1 << Self::CLUSTER_SHIFT;
    const LINE: u8 = 1 << Self::LINE_SHIFT;
    const WORD_START: u8 = 1 << Self::WORD_START_SHIFT;
    const WORD_END: u8 = 1 << Self::WORD_END_SHIFT;

    /// Offset is a character boundary.
    #[inline(always)]
    pub(crate) fn is_char(self) -> bool {
        self.0 & Self::CHAR != 0
    }

    /// Offset is a grapheme cluster boundary.
    #[inline(always)]
    pub(crate) fn is_cluster(self) -> bool {
        self.0 & Self::CLUSTER != 0
    }

    /// A line may be broken before this offset.
    #[inline(always)]
    pub(crate) fn is_line_break(self) -> bool {
        self.0 & Self::LINE != 0
    }

    #[inline(always)]
    pub(crate) fn is_word_start(self) -> bool {
        self.0 & Self::WORD_START != 0
    }

    #[inline(always)]
    pub(crate) fn is_word_end(self) -> bool {
        self.0 & Self::WORD_END != 0
    }
}

/// Boundary information for every offset of a text, including its end.
#[derive(Clone, Debug, Default)]
pub(crate) struct TextAnalysis {
    boundaries: Vec<Boundaries>,
}

impl TextAnalysis {
    /// Recomputes boundaries for `text`.
    pub(crate) fn analyze(&mut self, text: &str) {
        let len = text.len();
        self.boundaries.clear();
        self.boundaries.resize(len + 1, Boundaries::default());
        let flags = &mut self.boundaries;

        for (offset, _) in text.char_indices() {
            flags[offset].0 |= Boundaries::CHAR;
        }
        flags[len].0 |= Boundaries::CHAR | Boundaries::CLUSTER;

        for offset in GraphemeClusterSegmenter::new().segment_str(text) {
            flags[offset].0 |= Boundaries::CLUSTER;
        }

        // ICU reports the text edges as boundaries; a line can't start there.
        for offset in LineSegmenter::new_auto(LineBreakOptions::default()).segment_str(text) {
            if offset != 0 && offset != len {
                flags[offset].0 |= Boundaries::LINE;
            }
        }

        let segmenter = WordSegmenter::new_auto(WordBreakInvariantOptions::default());
        let mut words = segmenter.segment_str(text);
        let mut start = 0;
        while let Some(end) = words.next() {
            if end == 0 {
                continue;
            }
            if words.is_word_like() {
                flags[start].0 |= Boundaries::WORD_START;
                flags[end].0 |= Boundaries::WORD_END;
            }
            start = end;
        }
    }

    /// Number of code units covered by the analysis.
    pub(crate) fn len(&self) -> usize {
        self.boundaries.len().saturating_sub(1)
    }

    /// Boundary flags at `offset`, which must be at most the text length.
    #[inline]
    pub(crate) fn at(&self, offset: usize) -> Boundaries {
        self.boundaries.get(offset).copied().unwrap_or_default()
    }

    /// Returns the first offset after `offset` satisfying `f`, or the text
    /// length.
    pub(crate) fn next(&self, offset: usize, f: impl Fn(Boundaries) -> bool) -> usize {
        let len = self.len();
        (offset + 1..len)
            .find(|&ix| f(self.boundaries[ix]))
            .unwrap_or(len)
    }

    /// Returns the last offset before `offset` satisfying `f`, or zero.
    pub(crate) fn previous(&self, offset: usize, f: impl Fn(Boundaries) -> bool) -> usize {
        (1..offset.min(self.len()))
            .rev()
            .find(|&ix| f(self.boundaries[ix]))
            .unwrap_or(0)
    }

    /// Snaps `offset` down to the enclosing character boundary, clamping it
    /// to the text length first.
    pub(crate) fn floor_char(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.len());
        while offset > 0 && !self.at(offset).is_char() {
            offset -= 1;
        }
        offset
    }

    /// Snaps `offset` up to the next character boundary.
    pub(crate) fn ceil_char(&self, offset: usize) -> usize {
        let len = self.len();
        let mut offset = offset.min(len);
        while offset < len && !self.at(offset).is_char() {
            offset += 1;
        }
        offset
    }
}

/// Characters that end a paragraph and force a line break.
pub(crate) fn is_hard_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Whitespace that may be stretched by justification and hangs at line ends.
pub(crate) fn is_space(ch: char) -> bool {
    ch.is_whitespace() && ch != '\t' && !is_hard_break(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str, f: impl Fn(Boundaries) -> bool) -> Vec<usize> {
        let mut analysis = TextAnalysis::default();
        analysis.analyze(text);
        (0..=text.len()).filter(|&ix| f(analysis.at(ix))).collect()
    }

    #[test]
    fn crlf_is_one_break() {
        assert_eq!(collect("ab\r\ncd\ne", Boundaries::is_line_break), [4, 7]);
    }

    #[test]
    fn combining_mark_joins_cluster() {
        assert_eq!(collect("e\u{301}x", Boundaries::is_cluster), [0, 3, 4]);
        assert_eq!(collect("e\u{301}x", Boundaries::is_char), [0, 1, 3, 4]);
    }

    #[test]
    fn line_opportunities_follow_spaces() {
        assert_eq!(collect("ab cd ef", Boundaries::is_line_break), [3, 6]);
    }

    #[test]
    fn words_have_starts_and_ends() {
        assert_eq!(collect("ab, cd", Boundaries::is_word_start), [0, 4]);
        assert_eq!(collect("ab, cd", Boundaries::is_word_end), [2, 6]);
    }

    #[test]
    fn char_snapping() {
        let mut analysis = TextAnalysis::default();
        analysis.analyze("a\u{5d0}b");
        assert_eq!(analysis.floor_char(2), 1);
        assert_eq!(analysis.ceil_char(2), 3);
        assert_eq!(analysis.floor_char(99), 4);
    }
}
