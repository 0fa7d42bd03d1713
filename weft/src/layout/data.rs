// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::ops::Range;

use crate::analysis::bidi::{BidiData, BidiLevel};
use crate::font::{FontId, FontMetrics};

/// What a cluster is, as far as line breaking is concerned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ClusterKind {
    Normal,
    /// Stretchable whitespace.
    Space,
    /// Advances to the next tab stop.
    Tab,
    /// Paragraph separator, always zero width.
    HardBreak,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ClusterData {
    pub(crate) text_range: Range<usize>,
    /// Advance in device units; tabs and justified spaces are resolved
    /// during line breaking.
    pub(crate) advance: i32,
    pub(crate) kind: ClusterKind,
    pub(crate) run_index: usize,
}

impl ClusterData {
    pub(crate) fn is_whitespace(&self) -> bool {
        matches!(self.kind, ClusterKind::Space | ClusterKind::HardBreak)
    }
}

/// A directional run split at style boundaries, the unit of measurement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RunData {
    pub(crate) font: FontId,
    /// Index into the style store, `None` for unstyled text.
    pub(crate) style_index: Option<usize>,
    /// Ascent above the line's baseline, including rise.
    pub(crate) ascent: i32,
    /// Descent below the line's baseline, including rise.
    pub(crate) descent: i32,
    pub(crate) rise: i32,
}

/// Reason that a line was broken.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub(crate) enum BreakReason {
    /// The last line of the text.
    #[default]
    None,
    /// The line was wrapped at a break opportunity or overflowed.
    Regular,
    /// The line ends with a paragraph separator.
    Explicit,
}

/// A run clipped to a line, in visual order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LineRunData {
    pub(crate) run_index: usize,
    pub(crate) cluster_range: Range<usize>,
    /// Level after trailing whitespace has been reset to the paragraph level.
    pub(crate) level: BidiLevel,
    /// Horizontal position relative to the layout origin.
    pub(crate) x: i32,
    pub(crate) advance: i32,
}

impl LineRunData {
    pub(crate) fn is_rtl(&self) -> bool {
        self.level & 1 != 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct LineData {
    pub(crate) text_range: Range<usize>,
    pub(crate) cluster_range: Range<usize>,
    /// Range into [`LayoutData::line_runs`].
    pub(crate) run_range: Range<usize>,
    pub(crate) break_reason: BreakReason,
    /// The line starts a paragraph (and uses `indent` over `wrap_indent`).
    pub(crate) paragraph_start: bool,
    pub(crate) paragraph_level: BidiLevel,
    pub(crate) ascent: i32,
    pub(crate) descent: i32,
    /// Top of the line relative to the layout origin.
    pub(crate) y: i32,
    /// Left edge of the line's content.
    pub(crate) x: i32,
    /// Sum of cluster advances, including trailing whitespace.
    pub(crate) width: i32,
    pub(crate) trailing_whitespace: i32,
    /// Number of stretchable gaps, excluding trailing whitespace.
    pub(crate) num_spaces: usize,
}

impl LineData {
    pub(crate) fn height(&self) -> i32 {
        self.ascent + self.descent
    }

    pub(crate) fn baseline(&self) -> i32 {
        self.y + self.ascent
    }

    pub(crate) fn is_rtl(&self) -> bool {
        self.paragraph_level & 1 != 0
    }
}

/// Everything computed by one pass of the layout pipeline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct LayoutData {
    pub(crate) text_len: usize,
    pub(crate) bidi: BidiData,
    pub(crate) runs: Vec<RunData>,
    pub(crate) clusters: Vec<ClusterData>,
    pub(crate) lines: Vec<LineData>,
    pub(crate) line_runs: Vec<LineRunData>,
    /// Metrics of the default font, used by lines without runs.
    pub(crate) default_metrics: FontMetrics,
    /// Advance of a space in the default font.
    pub(crate) space_advance: i32,
    pub(crate) width: i32,
    pub(crate) height: i32,
}

impl LayoutData {
    pub(crate) fn clear(&mut self) {
        self.text_len = 0;
        self.runs.clear();
        self.clusters.clear();
        self.lines.clear();
        self.line_runs.clear();
        self.width = 0;
        self.height = 0;
    }

    /// Returns the index of the line containing `offset`.
    ///
    /// Offsets on a boundary belong to the line they start; the end of the
    /// text belongs to the last line.
    pub(crate) fn line_index(&self, offset: usize) -> usize {
        self.lines
            .partition_point(|line| line.text_range.end <= offset)
            .min(self.lines.len().saturating_sub(1))
    }

    /// Returns the index of the cluster containing `offset`.
    pub(crate) fn cluster_index(&self, offset: usize) -> Option<usize> {
        let index = self
            .clusters
            .partition_point(|cluster| cluster.text_range.end <= offset);
        self.clusters
            .get(index)
            .filter(|cluster| cluster.text_range.start <= offset)
            .map(|_| index)
    }

    /// Returns the line run containing cluster `cluster_index` on `line`.
    pub(crate) fn line_run_for_cluster(
        &self,
        line: &LineData,
        cluster_index: usize,
    ) -> Option<&LineRunData> {
        self.line_runs[line.run_range.clone()]
            .iter()
            .find(|run| run.cluster_range.contains(&cluster_index))
    }

    /// Iterates the clusters of a line run in visual order with their x
    /// positions.
    pub(crate) fn visual_clusters<'a>(
        &'a self,
        run: &'a LineRunData,
    ) -> impl Iterator<Item = (usize, i32)> + 'a {
        let rtl = run.is_rtl();
        let range = run.cluster_range.clone();
        let mut x = run.x;
        (0..range.len()).map(move |i| {
            let index = if rtl { range.end - 1 - i } else { range.start + i };
            let position = x;
            x += self.clusters[index].advance;
            (index, position)
        })
    }

    /// Returns the x position of cluster `cluster_index` within `run`.
    pub(crate) fn cluster_x(&self, run: &LineRunData, cluster_index: usize) -> i32 {
        let clusters = &self.clusters;
        if run.is_rtl() {
            run.x
                + clusters[cluster_index + 1..run.cluster_range.end]
                    .iter()
                    .map(|cluster| cluster.advance)
                    .sum::<i32>()
        } else {
            run.x
                + clusters[run.cluster_range.start..cluster_index]
                    .iter()
                    .map(|cluster| cluster.advance)
                    .sum::<i32>()
        }
    }
}
