// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy line breaking.

use core::ops::Range;

use smallvec::SmallVec;

use super::config::{to_device, LayoutConfig};
use super::data::{BreakReason, ClusterKind, LayoutData, LineData, LineRunData};
use crate::analysis::bidi::BidiLevel;
use crate::analysis::TextAnalysis;

/// Iteration state of the line currently being built.
#[derive(Clone, Default)]
struct LineState {
    /// First cluster of the line.
    start: usize,
    /// Pen position, measured from the layout origin.
    x: i32,
    paragraph_start: bool,
    /// Cluster at which the line may be broken, remembered until a
    /// cluster overflows.
    prev_boundary: Option<usize>,
}

/// Breaks the measured clusters of `layout` into lines.
///
/// Produces lines with their vertical metrics and visually ordered line
/// runs. Horizontal positions are assigned by alignment.
pub(crate) fn break_lines(layout: &mut LayoutData, analysis: &TextAnalysis, config: &LayoutConfig) {
    layout.lines.clear();
    layout.line_runs.clear();

    let max_advance = config.max_advance();
    let cluster_count = layout.clusters.len();
    let mut state = LineState {
        paragraph_start: true,
        ..Default::default()
    };

    while state.start < cluster_count {
        state.x = config.line_origin(state.paragraph_start);
        state.prev_boundary = None;
        let mut index = state.start;
        let (end, reason) = loop {
            let Some(cluster) = layout.clusters.get(index) else {
                break (cluster_count, BreakReason::None);
            };
            let boundary = analysis.at(cluster.text_range.start);
            if index > state.start && boundary.is_line_break() {
                // Clusters hanging past the edge are committed at the first
                // opportunity after them.
                if max_advance.is_some_and(|max| state.x > max) {
                    break (index, BreakReason::Regular);
                }
                state.prev_boundary = Some(index);
            }
            let advance = match cluster.kind {
                ClusterKind::HardBreak => break (index + 1, BreakReason::Explicit),
                ClusterKind::Tab => {
                    config.next_tab_stop(state.x, layout.space_advance) - state.x
                }
                _ => cluster.advance,
            };
            let next_x = state.x + advance;
            let overflows = cluster.kind != ClusterKind::Space
                && index > state.start
                && max_advance.is_some_and(|max| next_x > max);
            if overflows {
                if let Some(prev) = state.prev_boundary {
                    break (prev, BreakReason::Regular);
                }
            }
            layout.clusters[index].advance = advance;
            state.x = next_x;
            index += 1;
        };

        commit_line(layout, config, state.start..end, reason, state.paragraph_start);
        state.paragraph_start = reason == BreakReason::Explicit;
        state.start = end;
    }

    // Empty text, or text ending in a separator, ends with an empty line.
    if layout.lines.last().is_none_or(|line| line.break_reason == BreakReason::Explicit) {
        commit_line(
            layout,
            config,
            cluster_count..cluster_count,
            BreakReason::None,
            true,
        );
    }

    let spacing = to_device(config.spacing);
    let mut y = 0;
    for line in &mut layout.lines {
        line.y = y;
        y += line.height() + spacing;
    }
}

fn commit_line(
    layout: &mut LayoutData,
    config: &LayoutConfig,
    cluster_range: Range<usize>,
    break_reason: BreakReason,
    paragraph_start: bool,
) {
    let clusters = &layout.clusters[cluster_range.clone()];
    let text_range = match (clusters.first(), clusters.last()) {
        (Some(first), Some(last)) => first.text_range.start..last.text_range.end,
        _ => layout.text_len..layout.text_len,
    };

    let mut ascent = i32::MIN;
    let mut descent = i32::MIN;
    let mut last_run = None;
    for cluster in clusters {
        if last_run == Some(cluster.run_index) {
            continue;
        }
        let run = &layout.runs[cluster.run_index];
        ascent = ascent.max(run.ascent);
        descent = descent.max(run.descent);
        last_run = Some(cluster.run_index);
    }
    if clusters.is_empty() {
        // Empty lines take the metrics of the text before them.
        let metrics = layout.runs.last().map_or(
            (layout.default_metrics.ascent, layout.default_metrics.descent),
            |run| (run.ascent, run.descent),
        );
        (ascent, descent) = metrics;
    }
    if let Some(fixed) = config.ascent {
        ascent = to_device(fixed);
    }
    if let Some(fixed) = config.descent {
        descent = to_device(fixed);
    }

    let width = clusters.iter().map(|cluster| cluster.advance).sum();
    let trailing = clusters
        .iter()
        .rev()
        .take_while(|cluster| cluster.is_whitespace())
        .count();
    let trailing_whitespace = clusters[clusters.len() - trailing..]
        .iter()
        .map(|cluster| cluster.advance)
        .sum();
    let num_spaces = clusters[..clusters.len() - trailing]
        .iter()
        .filter(|cluster| cluster.kind == ClusterKind::Space)
        .count();
    let paragraph_level = layout.bidi.paragraph_level(text_range.start);

    let run_start = layout.line_runs.len();
    build_line_runs(layout, cluster_range.clone(), paragraph_level);
    let run_range = run_start..layout.line_runs.len();
    reorder_line_runs(&mut layout.line_runs[run_range.clone()]);

    log::trace!(
        "line {}: {:?} {:?} width {}",
        layout.lines.len(),
        text_range,
        break_reason,
        width
    );
    layout.lines.push(LineData {
        text_range,
        cluster_range,
        run_range,
        break_reason,
        paragraph_start,
        paragraph_level,
        ascent,
        descent,
        y: 0,
        x: 0,
        width,
        trailing_whitespace,
        num_spaces,
    });
}

/// Splits the clusters of a line into runs of equal level after applying
/// rule L1 of the bidi algorithm.
fn build_line_runs(layout: &mut LayoutData, cluster_range: Range<usize>, paragraph_level: BidiLevel) {
    let clusters = &layout.clusters[cluster_range.clone()];
    let mut levels: SmallVec<[BidiLevel; 64]> = clusters
        .iter()
        .map(|cluster| layout.bidi.level_at(cluster.text_range.start))
        .collect();

    // Separators, tabs and the whitespace before them, as well as the
    // whitespace ending the line, take the paragraph level.
    let mut reset = true;
    for (cluster, level) in clusters.iter().zip(levels.iter_mut()).rev() {
        match cluster.kind {
            ClusterKind::HardBreak | ClusterKind::Tab => {
                *level = paragraph_level;
                reset = true;
            }
            ClusterKind::Space if reset => *level = paragraph_level,
            _ => reset = false,
        }
    }

    let mut offset = 0;
    while offset < clusters.len() {
        let run_index = clusters[offset].run_index;
        let level = levels[offset];
        let mut end = offset + 1;
        while end < clusters.len() && clusters[end].run_index == run_index && levels[end] == level
        {
            end += 1;
        }
        let start = cluster_range.start;
        layout.line_runs.push(LineRunData {
            run_index,
            cluster_range: start + offset..start + end,
            level,
            x: 0,
            advance: 0,
        });
        offset = end;
    }
}

/// Reorders line runs into visual order by reversing every maximal
/// sequence at or above each level, from the highest level down to the
/// lowest odd level.
fn reorder_line_runs(runs: &mut [LineRunData]) {
    let run_count = runs.len();

    // Find the max level and the min *odd* level
    let mut max_level = 0;
    let mut lowest_odd_level = BidiLevel::MAX;
    for run in runs.iter() {
        let level = run.level;
        max_level = max_level.max(level);
        if level & 1 != 0 {
            lowest_odd_level = lowest_odd_level.min(level);
        }
    }

    for level in (lowest_odd_level..=max_level).rev() {
        let mut i = 0;
        while i < run_count {
            if runs[i].level >= level {
                let mut end = i + 1;
                while end < run_count && runs[end].level >= level {
                    end += 1;
                }
                runs[i..end].reverse();
                i = end;
            }
            i += 1;
        }
    }
}
