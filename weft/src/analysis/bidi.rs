// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bidirectional level resolution.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use unicode_bidi::{BidiInfo, Level};

use super::segments::Segment;
use crate::layout::Orientation;

/// Embedding level; even levels are left-to-right, odd levels right-to-left.
pub(crate) type BidiLevel = u8;

/// A maximal span of one segment sharing a single embedding level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BidiRun {
    pub(crate) range: Range<usize>,
    pub(crate) level: BidiLevel,
}

/// A bidi paragraph and its resolved base level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Paragraph {
    pub(crate) range: Range<usize>,
    pub(crate) level: BidiLevel,
}

/// Result of running the bidirectional algorithm over every segment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct BidiData {
    /// Level of every code unit.
    pub(crate) levels: Vec<BidiLevel>,
    /// Paragraphs in logical order.
    pub(crate) paragraphs: Vec<Paragraph>,
    /// Runs in logical order.
    pub(crate) runs: Vec<BidiRun>,
    /// Level used where no paragraph exists, such as in empty text.
    pub(crate) default_level: BidiLevel,
}

impl BidiData {
    /// Resolves levels for `text` split into `segments`.
    ///
    /// Each segment is an independent bidi context. A segment's seed
    /// character is resolved with it but never becomes part of the output.
    pub(crate) fn resolve(&mut self, text: &str, segments: &[Segment], orientation: Orientation) {
        self.levels.clear();
        self.levels.resize(text.len(), 0);
        self.paragraphs.clear();
        self.runs.clear();

        let base = match orientation {
            Orientation::LeftToRight => Some(Level::ltr()),
            Orientation::RightToLeft => Some(Level::rtl()),
            Orientation::Auto => None,
        };
        self.default_level = base.map(|level| level.number()).unwrap_or(0);

        let mut seeded = String::new();
        for segment in segments {
            let slice = &text[segment.range.clone()];
            let (source, skip) = match segment.seed {
                Some(seed) => {
                    seeded.clear();
                    seeded.push(seed);
                    seeded.push_str(slice);
                    (seeded.as_str(), seed.len_utf8())
                }
                None => (slice, 0),
            };
            let info = BidiInfo::new(source, base);
            let start = segment.range.start;
            for (offset, level) in info.levels[skip..].iter().enumerate() {
                self.levels[start + offset] = level.number();
            }
            for paragraph in &info.paragraphs {
                let end = paragraph.range.end.saturating_sub(skip);
                if end == 0 {
                    continue;
                }
                self.paragraphs.push(Paragraph {
                    range: start + paragraph.range.start.saturating_sub(skip)..start + end,
                    level: paragraph.level.number(),
                });
            }
            self.split_runs(segment);
        }
    }

    fn split_runs(&mut self, segment: &Segment) {
        let mut run_start = segment.range.start;
        for offset in segment.range.clone().skip(1) {
            if self.levels[offset] != self.levels[run_start] {
                self.runs.push(BidiRun {
                    range: run_start..offset,
                    level: self.levels[run_start],
                });
                run_start = offset;
            }
        }
        self.runs.push(BidiRun {
            range: run_start..segment.range.end,
            level: self.levels[run_start],
        });
    }

    /// Returns the level at `offset`; the end of the text takes the level
    /// of the last code unit.
    pub(crate) fn level_at(&self, offset: usize) -> BidiLevel {
        match self.levels.get(offset) {
            Some(&level) => level,
            None => self.levels.last().copied().unwrap_or(self.default_level),
        }
    }

    /// Returns the base level of the paragraph containing `offset`.
    pub(crate) fn paragraph_level(&self, offset: usize) -> BidiLevel {
        let index = self
            .paragraphs
            .partition_point(|paragraph| paragraph.range.end <= offset);
        self.paragraphs
            .get(index)
            .or(self.paragraphs.last())
            .map(|paragraph| paragraph.level)
            .unwrap_or(self.default_level)
    }
}
