// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Range based style storage.

use alloc::vec::Vec;
use core::ops::Range;

use smallvec::SmallVec;

use super::TextStyle;

/// A style together with the inclusive range of text it covers.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleRange {
    /// Offset of the first styled code unit.
    pub start: usize,
    /// Offset of the last styled code unit (inclusive).
    pub end: usize,
    /// The applied style.
    pub style: TextStyle,
}

#[derive(Clone, Debug, PartialEq)]
struct RangedStyle {
    range: Range<usize>,
    style: TextStyle,
}

/// Ordered, non-overlapping and coalesced sequence of styled ranges.
///
/// Gaps between ranges are unstyled text.
#[derive(Clone, Debug, Default)]
pub(crate) struct StyleRuns {
    runs: Vec<RangedStyle>,
}

impl StyleRuns {
    pub(crate) fn clear(&mut self) {
        self.runs.clear();
    }

    /// Applies `style` to `range`, replacing whatever was there before.
    ///
    /// `None` removes styling from the range. Ranges outside of `range`
    /// keep their remainder.
    pub(crate) fn apply(&mut self, style: Option<TextStyle>, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let first = self.runs.partition_point(|run| run.range.end <= range.start);
        let last = self.runs.partition_point(|run| run.range.start < range.end);

        let mut replacement: SmallVec<[RangedStyle; 3]> = SmallVec::new();
        if first < last {
            let head = &self.runs[first];
            if head.range.start < range.start {
                replacement.push(RangedStyle {
                    range: head.range.start..range.start,
                    style: head.style.clone(),
                });
            }
        }
        if let Some(style) = style {
            replacement.push(RangedStyle {
                range: range.clone(),
                style,
            });
        }
        if first < last {
            let tail = &self.runs[last - 1];
            if tail.range.end > range.end {
                replacement.push(RangedStyle {
                    range: range.end..tail.range.end,
                    style: tail.style.clone(),
                });
            }
        }
        self.runs.splice(first..last, replacement);
        self.coalesce();
    }

    /// Merges touching neighbors that carry equal styles.
    fn coalesce(&mut self) {
        let mut merged: Vec<RangedStyle> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            match merged.last_mut() {
                Some(prev) if prev.range.end == run.range.start && prev.style == run.style => {
                    prev.range.end = run.range.end;
                }
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }

    /// Returns the index of the run covering `offset`.
    pub(crate) fn index_at(&self, offset: usize) -> Option<usize> {
        let index = self.runs.partition_point(|run| run.range.end <= offset);
        self.runs
            .get(index)
            .filter(|run| run.range.start <= offset)
            .map(|_| index)
    }

    pub(crate) fn style_at(&self, offset: usize) -> Option<&TextStyle> {
        self.index_at(offset).map(|index| &self.runs[index].style)
    }

    pub(crate) fn get(&self, index: usize) -> Option<&TextStyle> {
        self.runs.get(index).map(|run| &run.style)
    }

    /// Returns the first style boundary strictly after `offset`, or `limit`.
    pub(crate) fn next_boundary(&self, offset: usize, limit: usize) -> usize {
        let index = self.runs.partition_point(|run| run.range.end <= offset);
        let Some(run) = self.runs.get(index) else {
            return limit;
        };
        let boundary = if run.range.start > offset {
            run.range.start
        } else {
            run.range.end
        };
        boundary.min(limit)
    }

    pub(crate) fn ranges(&self) -> impl Iterator<Item = StyleRange> + '_ {
        self.runs.iter().map(|run| StyleRange {
            start: run.range.start,
            end: run.range.end - 1,
            style: run.style.clone(),
        })
    }
}
