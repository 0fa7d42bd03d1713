// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measurement of directional runs.

use alloc::vec::Vec;
use core::ops::Range;

use crate::analysis::{is_hard_break, is_space, TextAnalysis};
use crate::font::{FontId, FontProvider};
use crate::layout::data::{ClusterData, ClusterKind, LayoutData, RunData};
use crate::style::StyleRuns;
use crate::Error;

/// Scratch buffers reused across runs.
#[derive(Default)]
struct ShapeState {
    ranges: Vec<Range<usize>>,
    advances: Vec<i32>,
}

/// Splits the resolved bidi runs at style boundaries and measures their
/// clusters.
///
/// `font` is the layout's font; `None` selects the provider's default.
pub(crate) fn shape_text<P: FontProvider + ?Sized>(
    layout: &mut LayoutData,
    provider: &P,
    text: &str,
    analysis: &TextAnalysis,
    styles: &StyleRuns,
    font: Option<FontId>,
) -> Result<(), Error> {
    let mut state = ShapeState::default();
    let default_font = resolve_font(provider, font)?;

    // The default metrics size empty lines and the default tab interval.
    state.ranges.push(0..1);
    let metrics = provider
        .measure(default_font, " ", &state.ranges, &mut state.advances)
        .ok_or_else(|| Error::resource_unavailable("default font", Some(default_font)))?;
    layout.default_metrics = metrics;
    layout.space_advance = state.advances.first().copied().unwrap_or(0).max(0);

    for bidi_run in &layout.bidi.runs {
        let mut start = bidi_run.range.start;
        while start < bidi_run.range.end {
            let end = styles.next_boundary(start, bidi_run.range.end);
            let style_index = styles.index_at(start);
            let style = style_index.and_then(|index| styles.get(index));
            let run_font = match style.and_then(|style| style.font) {
                Some(requested) => resolve_font(provider, Some(requested))?,
                None => default_font,
            };

            let run_index = layout.runs.len();
            state.ranges.clear();
            state.advances.clear();
            let mut cluster = start;
            while cluster < end {
                let next = analysis.next(cluster, |b| b.is_cluster()).min(end);
                state.ranges.push(cluster..next);
                cluster = next;
            }

            let mut metrics = provider
                .measure(run_font, text, &state.ranges, &mut state.advances)
                .ok_or_else(|| Error::resource_unavailable("font", Some(run_font)))?;
            if state.advances.len() != state.ranges.len() {
                log::warn!(
                    "font {} measured {} clusters, expected {}",
                    run_font.get(),
                    state.advances.len(),
                    state.ranges.len()
                );
                state.advances.resize(state.ranges.len(), 0);
            }
            let fixed = style.and_then(|style| style.metrics);
            if let Some(fixed) = fixed {
                metrics.ascent = fixed.ascent;
                metrics.descent = fixed.descent;
            }

            for (range, &advance) in state.ranges.iter().zip(&state.advances) {
                let kind = cluster_kind(&text[range.clone()]);
                let advance = match kind {
                    ClusterKind::Tab | ClusterKind::HardBreak => 0,
                    _ => fixed.map(|fixed| fixed.width).unwrap_or(advance).max(0),
                };
                layout.clusters.push(ClusterData {
                    text_range: range.clone(),
                    advance,
                    kind,
                    run_index,
                });
            }

            let rise = style.map(|style| style.rise).unwrap_or(0);
            layout.runs.push(RunData {
                font: run_font,
                style_index,
                ascent: metrics.ascent + rise,
                descent: metrics.descent - rise,
                rise,
            });
            start = end;
        }
    }
    Ok(())
}

fn resolve_font<P: FontProvider + ?Sized>(
    provider: &P,
    font: Option<FontId>,
) -> Result<FontId, Error> {
    provider
        .resolve(font)
        .ok_or_else(|| match font {
            Some(font) => Error::resource_unavailable("font", Some(font)),
            None => Error::resource_unavailable("default font", None),
        })
}

fn cluster_kind(cluster: &str) -> ClusterKind {
    match cluster.chars().next() {
        Some('\t') => ClusterKind::Tab,
        Some(ch) if is_hard_break(ch) => ClusterKind::HardBreak,
        Some(ch) if is_space(ch) => ClusterKind::Space,
        _ => ClusterKind::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::segments::Segments;
    use crate::layout::Orientation;
    use crate::style::{GlyphMetrics, TextStyle};
    use crate::testing::FixedFontProvider;

    fn shape(text: &str, styles: &StyleRuns, provider: &FixedFontProvider) -> LayoutData {
        let mut analysis = TextAnalysis::default();
        analysis.analyze(text);
        let mut layout = LayoutData::default();
        let spans = Segments::default().spans(text.len());
        layout.bidi.resolve(text, &spans, Orientation::LeftToRight);
        shape_text(&mut layout, provider, text, &analysis, styles, None).unwrap();
        layout
    }

    #[test]
    fn runs_split_at_style_boundaries() {
        let provider = FixedFontProvider::new();
        let mut styles = StyleRuns::default();
        styles.apply(
            Some(TextStyle {
                rise: 3,
                ..Default::default()
            }),
            2..4,
        );
        let layout = shape("abcdef", &styles, &provider);
        let owners: Vec<_> = layout.clusters.iter().map(|c| c.run_index).collect();
        assert_eq!(owners, [0, 0, 1, 1, 2, 2]);
        assert_eq!(layout.runs[1].style_index, Some(0));
        assert_eq!(layout.runs[1].ascent, layout.runs[0].ascent + 3);
        assert_eq!(layout.runs[1].descent, layout.runs[0].descent - 3);
    }

    #[test]
    fn clusters_classified() {
        let provider = FixedFontProvider::new();
        let layout = shape("a \te\u{301}\r\n", &StyleRuns::default(), &provider);
        let kinds: Vec<_> = layout.clusters.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            [
                ClusterKind::Normal,
                ClusterKind::Space,
                ClusterKind::Tab,
                ClusterKind::Normal,
                ClusterKind::HardBreak
            ]
        );
        assert_eq!(layout.clusters[3].text_range, 3..6);
        assert_eq!(layout.clusters[2].advance, 0);
        assert_eq!(layout.clusters[4].advance, 0);
    }

    #[test]
    fn glyph_metrics_replace_font() {
        let provider = FixedFontProvider::new();
        let mut styles = StyleRuns::default();
        styles.apply(
            Some(TextStyle {
                metrics: Some(GlyphMetrics::new(30, 5, 40)),
                ..Default::default()
            }),
            1..2,
        );
        let layout = shape("abc", &styles, &provider);
        assert_eq!(layout.clusters[1].advance, 40);
        assert_eq!(layout.runs[1].ascent, 30);
        assert_eq!(layout.runs[1].descent, 5);
    }

    #[test]
    fn missing_default_font() {
        let provider = FixedFontProvider::empty();
        let mut analysis = TextAnalysis::default();
        analysis.analyze("a");
        let mut layout = LayoutData::default();
        let err = shape_text(
            &mut layout,
            &provider,
            "a",
            &analysis,
            &StyleRuns::default(),
            None,
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::ResourceUnavailable);
        assert_eq!(err.font(), None);
    }
}
