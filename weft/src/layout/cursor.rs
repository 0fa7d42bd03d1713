// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing and caret movement.

use alloc::vec::Vec;

use super::data::{BreakReason, ClusterKind, LayoutData, LineData};
use crate::analysis::{Boundaries, TextAnalysis};

/// Result of mapping a point to the text.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct HitPosition {
    /// Start of the cluster that was hit.
    pub offset: usize,
    /// Zero if the leading edge of the cluster is closest, otherwise the
    /// length of the cluster.
    pub trailing: usize,
}

/// Unit of logical caret movement.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Movement {
    /// One character.
    Char,
    /// One grapheme cluster.
    #[default]
    Cluster,
    /// To the next start or end of a word.
    Word,
    /// To the next start of a word.
    WordStart,
    /// To the next end of a word.
    WordEnd,
}

impl Movement {
    fn matches(self, boundaries: Boundaries) -> bool {
        match self {
            Self::Char => boundaries.is_char(),
            Self::Cluster => boundaries.is_cluster(),
            Self::Word => boundaries.is_word_start() || boundaries.is_word_end(),
            Self::WordStart => boundaries.is_word_start(),
            Self::WordEnd => boundaries.is_word_end(),
        }
    }
}

/// Returns the offset after `offset` reached by `movement`, or the text
/// length.
pub(crate) fn next_offset(analysis: &TextAnalysis, offset: usize, movement: Movement) -> usize {
    analysis.next(offset, |b| movement.matches(b))
}

/// Returns the offset before `offset` reached by `movement`, or zero.
pub(crate) fn previous_offset(analysis: &TextAnalysis, offset: usize, movement: Movement) -> usize {
    analysis.previous(offset, |b| movement.matches(b))
}

impl LayoutData {
    /// Returns the position of the leading or trailing edge of the cluster
    /// containing `offset`, relative to the layout origin.
    ///
    /// The y coordinate is the top of the line.
    pub(crate) fn location(&self, offset: usize, trailing: bool) -> (i32, i32) {
        let line = &self.lines[self.line_index(offset)];
        let (cluster_index, trailing) = if offset >= self.text_len {
            // The end of the text sits after the last cluster.
            match line.cluster_range.clone().last() {
                Some(last) => (last, true),
                None => return (line.x, line.y),
            }
        } else {
            match self.cluster_index(offset) {
                Some(index) => (index, trailing),
                None => return (line.x, line.y),
            }
        };
        let Some(run) = self.line_run_for_cluster(line, cluster_index) else {
            return (line.x, line.y);
        };
        let x = self.cluster_x(run, cluster_index);
        let right_edge = trailing != run.is_rtl();
        let x = if right_edge {
            x + self.clusters[cluster_index].advance
        } else {
            x
        };
        (x, line.y)
    }

    /// Returns the index of the line at vertical position `y`, clamped to
    /// the first and last lines.
    pub(crate) fn line_at(&self, y: i32) -> usize {
        self.lines
            .partition_point(|line| line.y + line.height() <= y)
            .min(self.lines.len().saturating_sub(1))
    }

    /// Maps a point to the nearest cluster edge.
    pub(crate) fn hit_test(&self, x: i32, y: i32) -> (usize, usize) {
        let line = &self.lines[self.line_at(y)];
        let mut last = None;
        for run in &self.line_runs[line.run_range.clone()] {
            for (index, cluster_x) in self.visual_clusters(run) {
                let cluster = &self.clusters[index];
                if cluster.kind == ClusterKind::HardBreak {
                    continue;
                }
                let len = cluster.text_range.len();
                let on_zero_width = cluster.advance == 0 && x == cluster_x;
                if on_zero_width || x < cluster_x + cluster.advance {
                    let left_half = 2 * (x - cluster_x) < cluster.advance;
                    // Zero width clusters are only ever hit on their leading edge.
                    let trailing = cluster.advance > 0 && left_half == run.is_rtl();
                    return (cluster.text_range.start, if trailing { len } else { 0 });
                }
                last = Some((cluster.text_range.start, len, run.is_rtl()));
            }
        }
        // Past the right edge of the line.
        if line.break_reason == BreakReason::Explicit && !line.is_rtl() {
            if let Some(separator) = self.clusters[line.cluster_range.clone()].last() {
                return (separator.text_range.start, 0);
            }
        }
        match last {
            Some((start, len, rtl)) => (start, if rtl { 0 } else { len }),
            None => (line.text_range.start, 0),
        }
    }

    /// Returns the caret offsets of a line with the x position each one is
    /// drawn at, sorted from left to right.
    ///
    /// Every cluster start on the line is a stop, as is the end of the text
    /// on the last line.
    fn caret_stops(&self, line_index: usize) -> Vec<(i32, usize)> {
        let line = &self.lines[line_index];
        let text_end = (line_index + 1 == self.lines.len()).then_some(self.text_len);
        let mut stops: Vec<_> = self.clusters[line.cluster_range.clone()]
            .iter()
            .map(|cluster| cluster.text_range.start)
            .chain(text_end)
            .map(|offset| (self.location(offset, false).0, offset))
            .collect();
        stops.sort_by_key(|&(x, _)| x);
        stops
    }

    /// Moves the caret one cluster to the right (`forward`) or left in
    /// screen order, continuing on the adjacent line at the line edges.
    pub(crate) fn visual_offset(&self, offset: usize, forward: bool) -> usize {
        let line_index = self.line_index(offset);
        let stops = self.caret_stops(line_index);
        let found = match stops.iter().position(|&(_, stop)| stop == offset) {
            Some(index) if forward => stops.get(index + 1),
            Some(index) => index.checked_sub(1).map(|index| &stops[index]),
            None => {
                // Inside a cluster: take the nearest stop on that side.
                let (x, _) = self.location(offset, false);
                if forward {
                    stops.iter().find(|(stop_x, _)| *stop_x > x)
                } else {
                    stops.iter().rev().find(|(stop_x, _)| *stop_x < x)
                }
            }
        };
        if let Some(&(_, stop)) = found {
            return stop;
        }
        if forward {
            match self.lines.get(line_index + 1) {
                Some(next) => next.text_range.start,
                None => offset,
            }
        } else {
            match line_index.checked_sub(1).map(|index| &self.lines[index]) {
                Some(previous) => self.line_content_end(previous),
                None => offset,
            }
        }
    }

    /// Returns the end of a line's text, before its separator.
    fn line_content_end(&self, line: &LineData) -> usize {
        match self.clusters[line.cluster_range.clone()].last() {
            Some(last) if last.kind == ClusterKind::HardBreak => last.text_range.start,
            _ => line.text_range.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(text: &str) -> TextAnalysis {
        let mut analysis = TextAnalysis::default();
        analysis.analyze(text);
        analysis
    }

    #[test]
    fn word_movement() {
        let analysis = analysis("hello big world");
        assert_eq!(next_offset(&analysis, 0, Movement::Word), 5);
        assert_eq!(next_offset(&analysis, 5, Movement::Word), 6);
        assert_eq!(next_offset(&analysis, 0, Movement::WordStart), 6);
        assert_eq!(next_offset(&analysis, 6, Movement::WordEnd), 9);
        assert_eq!(previous_offset(&analysis, 12, Movement::WordStart), 10);
        assert_eq!(previous_offset(&analysis, 10, Movement::WordEnd), 9);
        assert_eq!(next_offset(&analysis, 12, Movement::WordStart), 15);
        assert_eq!(previous_offset(&analysis, 3, Movement::WordEnd), 0);
    }

    #[test]
    fn cluster_and_char_movement() {
        let analysis = analysis("e\u{301}x\r\ny");
        assert_eq!(next_offset(&analysis, 0, Movement::Cluster), 3);
        assert_eq!(next_offset(&analysis, 0, Movement::Char), 1);
        assert_eq!(next_offset(&analysis, 4, Movement::Cluster), 6);
        assert_eq!(previous_offset(&analysis, 6, Movement::Cluster), 4);
        assert_eq!(previous_offset(&analysis, 3, Movement::Char), 1);
        assert_eq!(next_offset(&analysis, 7, Movement::Cluster), 7);
    }
}
