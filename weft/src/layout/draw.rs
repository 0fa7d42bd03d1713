// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Painting a layout onto a drawing surface.

use alloc::vec::Vec;
use core::ops::{BitOr, BitOrAssign, Range};

use peniko::kurbo::{Point, Rect};
use peniko::Color;

use super::data::{BreakReason, ClusterKind, LayoutData, LineData, LineRunData};
use crate::font::FontId;
use crate::style::{StyleRuns, TextStyle, UnderlineStyle};

/// A measured piece of text handed to a [`Surface`].
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphRun<'a> {
    /// The text of the piece.
    pub text: &'a str,
    /// Range of the piece in the layout's text.
    pub text_range: Range<usize>,
    /// Font the piece was measured with.
    pub font: FontId,
    /// Embedding level; odd levels are right-to-left.
    pub level: u8,
    /// Advance of each cluster, in visual order.
    pub advances: &'a [i32],
}

impl GlyphRun<'_> {
    /// Returns `true` if the piece runs right-to-left.
    pub fn is_rtl(&self) -> bool {
        self.level & 1 != 0
    }

    /// Returns the total advance of the piece.
    pub fn advance(&self) -> i32 {
        self.advances.iter().sum()
    }
}

/// Target of the paint commands produced by a layout.
pub trait Surface {
    /// Draws a piece of text with its left edge at `origin.x` and its
    /// baseline at `origin.y`.
    fn draw_run(&mut self, run: &GlyphRun<'_>, origin: Point, color: Color);

    /// Fills a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);
}

/// A selected range of text and its colors.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Selection {
    /// First selected offset.
    pub start: usize,
    /// Last selected offset (inclusive).
    pub end: usize,
    /// Color of selected text.
    pub foreground: Color,
    /// Color of the selection band.
    pub background: Color,
}

impl Selection {
    fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

/// Options that extend the selection band past the text.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DrawFlags(u8);

impl DrawFlags {
    /// No extensions.
    pub const NONE: Self = Self(0);
    /// A selected line delimiter is painted as a space-wide band.
    pub const DELIMITER_SELECTION: Self = Self(1 << 0);
    /// A selected line delimiter extends the band to the right edge.
    pub const FULL_SELECTION: Self = Self(1 << 1);
    /// A selection running past the end of the text extends the last line.
    pub const LAST_LINE_SELECTION: Self = Self(1 << 2);

    /// Returns `true` if all flags of `other` are set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for DrawFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for DrawFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Everything painting needs besides the layout itself.
pub(crate) struct DrawContext<'a> {
    pub(crate) text: &'a str,
    pub(crate) styles: &'a StyleRuns,
    pub(crate) foreground: Color,
    pub(crate) selection: Option<&'a Selection>,
    pub(crate) flags: DrawFlags,
}

/// A stretch of a line run that is either fully selected or not at all.
struct Piece {
    clusters: Range<usize>,
    x: i32,
    advance: i32,
    selected: bool,
}

impl LayoutData {
    /// Paints every line with the layout origin at `(x, y)`.
    pub(crate) fn draw<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        x: i32,
        y: i32,
        cx: &DrawContext<'_>,
    ) {
        let mut pieces = Vec::new();
        let mut advances = Vec::new();
        for (line_index, line) in self.lines.iter().enumerate() {
            let top = f64::from(y + line.y);
            let bottom = top + f64::from(line.height());
            let runs = &self.line_runs[line.run_range.clone()];

            for run in runs {
                if let Some(background) = self.run_style(run, cx).and_then(|s| s.background) {
                    let left = f64::from(x + run.x);
                    let rect = Rect::new(left, top, left + f64::from(run.advance), bottom);
                    surface.fill_rect(rect, background);
                }
            }

            if let Some(selection) = cx.selection {
                for run in runs {
                    self.split_pieces(run, Some(selection), &mut pieces);
                    for piece in pieces.iter().filter(|piece| piece.selected) {
                        let left = f64::from(x + piece.x);
                        let rect = Rect::new(left, top, left + f64::from(piece.advance), bottom);
                        surface.fill_rect(rect, selection.background);
                    }
                }
                if let Some((start, end)) = self.selection_extension(line_index, line, selection, cx) {
                    let rect = Rect::new(f64::from(x + start), top, f64::from(x + end), bottom);
                    surface.fill_rect(rect, selection.background);
                }
            }

            let baseline = y + line.baseline();
            for run in runs {
                let run_data = &self.runs[run.run_index];
                let style = self.run_style(run, cx);
                let color = style.and_then(|s| s.foreground).unwrap_or(cx.foreground);
                self.split_pieces(run, cx.selection, &mut pieces);
                for piece in &pieces {
                    let clusters = &self.clusters[piece.clusters.clone()];
                    let (Some(first), Some(last)) = (clusters.first(), clusters.last()) else {
                        continue;
                    };
                    advances.clear();
                    advances.extend(clusters.iter().map(|c| c.advance));
                    if run.is_rtl() {
                        advances.reverse();
                    }
                    let text_range = first.text_range.start..last.text_range.end;
                    let glyph_run = GlyphRun {
                        text: &cx.text[text_range.clone()],
                        text_range,
                        font: run_data.font,
                        level: run.level,
                        advances: &advances,
                    };
                    let color = match cx.selection {
                        Some(selection) if piece.selected => selection.foreground,
                        _ => color,
                    };
                    let origin = Point::new(
                        f64::from(x + piece.x),
                        f64::from(baseline - run_data.rise),
                    );
                    surface.draw_run(&glyph_run, origin, color);
                }
            }

            for run in runs {
                let Some(style) = self.run_style(run, cx).filter(|s| s.has_decorations()) else {
                    continue;
                };
                self.draw_decorations(surface, x + run.x, baseline, run, style, cx);
            }
        }
    }

    fn run_style<'a>(&self, run: &LineRunData, cx: &DrawContext<'a>) -> Option<&'a TextStyle> {
        self.runs[run.run_index]
            .style_index
            .and_then(|index| cx.styles.get(index))
    }

    /// Splits a line run into visually ordered pieces of equal selection
    /// state. Separators are left out.
    fn split_pieces(
        &self,
        run: &LineRunData,
        selection: Option<&Selection>,
        pieces: &mut Vec<Piece>,
    ) {
        pieces.clear();
        for (index, cluster_x) in self.visual_clusters(run) {
            let cluster = &self.clusters[index];
            if cluster.kind == ClusterKind::HardBreak {
                continue;
            }
            let selected = selection.is_some_and(|s| s.contains(cluster.text_range.start));
            match pieces.last_mut() {
                Some(piece) if piece.selected == selected => {
                    if run.is_rtl() {
                        piece.clusters.start = index;
                    } else {
                        piece.clusters.end = index + 1;
                    }
                    piece.advance += cluster.advance;
                }
                _ => pieces.push(Piece {
                    clusters: index..index + 1,
                    x: cluster_x,
                    advance: cluster.advance,
                    selected,
                }),
            }
        }
    }

    /// Returns the horizontal extent of the band painted for a selected
    /// line delimiter or past the end of the text.
    fn selection_extension(
        &self,
        line_index: usize,
        line: &LineData,
        selection: &Selection,
        cx: &DrawContext<'_>,
    ) -> Option<(i32, i32)> {
        let delimiter = line.break_reason == BreakReason::Explicit
            && self.clusters[line.cluster_range.clone()]
                .last()
                .is_some_and(|separator| selection.contains(separator.text_range.start));
        let past_end = line_index + 1 == self.lines.len()
            && selection.end >= self.text_len
            && selection.start <= line.text_range.end;
        let extend = (delimiter
            && (cx.flags.contains(DrawFlags::DELIMITER_SELECTION)
                || cx.flags.contains(DrawFlags::FULL_SELECTION)))
            || (past_end && cx.flags.contains(DrawFlags::LAST_LINE_SELECTION));
        if !extend {
            return None;
        }
        let start = line.x + line.width;
        let end = if cx.flags.contains(DrawFlags::FULL_SELECTION) {
            self.width.max(start)
        } else {
            start + self.space_advance
        };
        Some((start, end))
    }

    fn draw_decorations<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        x: i32,
        baseline: i32,
        run: &LineRunData,
        style: &TextStyle,
        cx: &DrawContext<'_>,
    ) {
        let run_data = &self.runs[run.run_index];
        let baseline = baseline - run_data.rise;
        let left = f64::from(x);
        let right = f64::from(x + run.advance);
        let text_color = style.foreground.unwrap_or(cx.foreground);
        let line_rect = |y: i32| Rect::new(left, f64::from(y), right, f64::from(y + 1));

        if let Some(underline) = style.underline {
            let color = style.underline_color.unwrap_or(text_color);
            match underline {
                UnderlineStyle::Single | UnderlineStyle::Link => {
                    surface.fill_rect(line_rect(baseline + 1), color);
                }
                UnderlineStyle::Double => {
                    surface.fill_rect(line_rect(baseline + 1), color);
                    surface.fill_rect(line_rect(baseline + 3), color);
                }
                UnderlineStyle::Squiggle => {
                    let mut step = 0;
                    let mut segment_x = x;
                    while segment_x < x + run.advance {
                        let segment_end = (segment_x + 2).min(x + run.advance);
                        let y = baseline + 1 + (step & 1);
                        let rect = Rect::new(
                            f64::from(segment_x),
                            f64::from(y),
                            f64::from(segment_end),
                            f64::from(y + 1),
                        );
                        surface.fill_rect(rect, color);
                        segment_x = segment_end;
                        step += 1;
                    }
                }
            }
        }
        if style.strikeout {
            let color = style.strikeout_color.unwrap_or(text_color);
            let ascent = run_data.ascent - run_data.rise;
            surface.fill_rect(line_rect(baseline - ascent / 3), color);
        }
    }
}
