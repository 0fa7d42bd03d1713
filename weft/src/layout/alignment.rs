// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::config::{Alignment, LayoutConfig};
use super::data::{BreakReason, ClusterKind, LayoutData};

/// Positions lines horizontally and computes the layout extents.
///
/// Justification stretches the spaces of every line but the last one of the
/// text, so it has to run before line runs are positioned.
pub(crate) fn align(layout: &mut LayoutData, config: &LayoutConfig) {
    let max_advance = config.max_advance();
    let line_count = layout.lines.len();

    for line_index in 0..line_count {
        let line = &layout.lines[line_index];
        let origin = config.line_origin(line.paragraph_start);
        let mut offset = 0;

        if let Some(max_advance) = max_advance {
            // Compute free space. Trailing whitespace hangs.
            let free_space = max_advance - origin - line.width + line.trailing_whitespace;
            let is_last = line_index + 1 == line_count;
            let justify = config.justify
                && !is_last
                && line.break_reason != BreakReason::None
                && line.num_spaces != 0
                && free_space > 0;
            if justify {
                justify_line(layout, line_index, free_space);
            } else if free_space > 0 {
                offset = match config.alignment {
                    Alignment::Left => 0,
                    Alignment::Center => free_space / 2,
                    Alignment::Right => free_space,
                };
            }
            let line = &layout.lines[line_index];
            if line.is_rtl() {
                // In RTL text, trailing whitespace is on the left. As we hang
                // that whitespace, offset the line to the left.
                offset -= line.trailing_whitespace;
            }
        }

        let line = &mut layout.lines[line_index];
        line.x = origin + offset;
        let mut x = line.x;
        for run in &mut layout.line_runs[line.run_range.clone()] {
            run.x = x;
            run.advance = layout.clusters[run.cluster_range.clone()]
                .iter()
                .map(|cluster| cluster.advance)
                .sum();
            x += run.advance;
        }
    }

    let mut width = 0;
    for line in &layout.lines {
        width = width.max(line.x + line.width);
    }
    if let Some(max_advance) = max_advance {
        width = width.max(max_advance);
    }
    layout.width = width;
    layout.height = layout
        .lines
        .last()
        .map(|line| line.y + line.height())
        .unwrap_or(0);
}

/// Spreads `free_space` over the inner spaces of a line, giving the
/// remainder to the first gaps in logical order.
fn justify_line(layout: &mut LayoutData, line_index: usize, free_space: i32) {
    let line = &mut layout.lines[line_index];
    let Ok(gaps) = i32::try_from(line.num_spaces) else {
        return;
    };
    let adjustment = free_space / gaps;
    let mut remainder = free_space % gaps;
    let mut applied = 0;
    for cluster in &mut layout.clusters[line.cluster_range.clone()] {
        if applied == line.num_spaces {
            break;
        }
        if cluster.kind == ClusterKind::Space {
            cluster.advance += adjustment;
            if remainder > 0 {
                cluster.advance += 1;
                remainder -= 1;
            }
            applied += 1;
        }
    }
    line.width += free_space;
}
