// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The text layout object.

mod alignment;
mod config;
mod cursor;
pub(crate) mod data;
mod draw;
mod line_break;

pub use config::{Alignment, LayoutConfig, Orientation};
pub use cursor::{HitPosition, Movement};
pub use draw::{DrawFlags, GlyphRun, Selection, Surface};

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "libm")]
#[allow(unused_imports, reason = "float methods come from std when it is enabled")]
use core_maths::CoreFloat;

use peniko::kurbo::{Point, Rect};
use peniko::Color;

use self::config::{to_device, validate_tabs};
use self::data::LayoutData;
use self::draw::DrawContext;
use crate::analysis::segments::Segments;
use crate::analysis::TextAnalysis;
use crate::font::{FontId, FontProvider};
use crate::shape::shape_text;
use crate::style::{StyleRange, StyleRuns, TextStyle};
use crate::Error;

/// Validity of the cached layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    /// Something changed since the last computation.
    Dirty,
    Clean,
    /// Terminal.
    Disposed,
}

/// Vertical metrics of a laid out line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LineMetrics {
    /// Distance from the top of the line to its baseline.
    pub ascent: i32,
    /// Distance from the baseline to the bottom of the line.
    pub descent: i32,
    /// Sum of ascent and descent.
    pub height: i32,
    /// Position of the baseline relative to the top of the layout.
    pub baseline: i32,
}

/// A styled paragraph of text, laid out on demand.
///
/// Every setter invalidates the layout, even when the new value equals the
/// old one; the next query recomputes it. Setting identical text is the one
/// exception and does nothing at all.
///
/// Offsets are byte offsets into the text. Offsets passed to geometry
/// queries are clamped to the text length and snapped to the enclosing
/// character boundary.
#[derive(Debug)]
pub struct TextLayout<P: FontProvider> {
    provider: P,
    text: String,
    styles: StyleRuns,
    segments: Segments,
    config: LayoutConfig,
    analysis: TextAnalysis,
    data: LayoutData,
    state: State,
}

impl<P: FontProvider> TextLayout<P> {
    /// Creates an empty layout measuring text with `provider`.
    pub fn new(provider: P) -> Self {
        let mut analysis = TextAnalysis::default();
        analysis.analyze("");
        Self {
            provider,
            text: String::new(),
            styles: StyleRuns::default(),
            segments: Segments::default(),
            config: LayoutConfig::default(),
            analysis,
            data: LayoutData::default(),
            state: State::Dirty,
        }
    }

    /// Creates an empty layout with the given configuration.
    pub fn with_config(provider: P, config: LayoutConfig) -> Result<Self, Error> {
        config.validate()?;
        let mut layout = Self::new(provider);
        layout.config = config;
        Ok(layout)
    }

    /// Returns the font provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the font provider for modification.
    ///
    /// Invalidates the layout, since fonts may have been released.
    pub fn provider_mut(&mut self) -> &mut P {
        self.invalidate();
        &mut self.provider
    }

    fn check(&self) -> Result<(), Error> {
        if self.state == State::Disposed {
            return Err(Error::disposed());
        }
        Ok(())
    }

    fn invalidate(&mut self) {
        if self.state != State::Disposed {
            self.state = State::Dirty;
        }
    }

    /// Runs `f` on the configuration of a live layout and invalidates it.
    fn configure(&mut self, f: impl FnOnce(&mut LayoutConfig)) -> Result<(), Error> {
        self.check()?;
        f(&mut self.config);
        self.invalidate();
        Ok(())
    }

    /// Recomputes the layout if anything changed since the last time.
    fn update(&mut self) -> Result<&LayoutData, Error> {
        match self.state {
            State::Disposed => return Err(Error::disposed()),
            State::Clean => return Ok(&self.data),
            State::Dirty => {}
        }
        let data = &mut self.data;
        data.clear();
        data.text_len = self.text.len();
        let spans = self.segments.spans(self.text.len());
        data.bidi
            .resolve(&self.text, &spans, self.config.orientation);
        if let Err(err) = shape_text(
            data,
            &self.provider,
            &self.text,
            &self.analysis,
            &self.styles,
            self.config.font,
        ) {
            data.clear();
            return Err(err);
        }
        line_break::break_lines(data, &self.analysis, &self.config);
        alignment::align(data, &self.config);
        log::debug!(
            "laid out {} bytes: {} runs, {} clusters, {} lines, {}x{}",
            data.text_len,
            data.runs.len(),
            data.clusters.len(),
            data.lines.len(),
            data.width,
            data.height
        );
        self.state = State::Clean;
        Ok(&self.data)
    }

    /// Clamps an offset into the text and snaps it to a character boundary.
    fn clamp_offset(&self, offset: usize) -> usize {
        self.analysis.floor_char(offset)
    }

    /// Releases all cached data and styles.
    ///
    /// Every later call fails with [`ErrorKind::Disposed`](crate::ErrorKind::Disposed),
    /// including another `dispose`.
    pub fn dispose(&mut self) -> Result<(), Error> {
        self.check()?;
        self.text = String::new();
        self.styles.clear();
        self.segments.clear();
        self.analysis = TextAnalysis::default();
        self.data = LayoutData::default();
        self.state = State::Disposed;
        Ok(())
    }

    /// Returns `true` once the layout has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.state == State::Disposed
    }

    // --- Text and styles ---

    /// Replaces the text.
    ///
    /// Different text removes all styles and segments. Identical text is
    /// ignored.
    pub fn set_text(&mut self, text: &str) -> Result<(), Error> {
        self.check()?;
        if self.text == text {
            return Ok(());
        }
        self.text.clear();
        self.text.push_str(text);
        self.analysis.analyze(text);
        self.styles.clear();
        self.segments.clear();
        self.invalidate();
        Ok(())
    }

    /// Returns the text.
    pub fn get_text(&self) -> Result<&str, Error> {
        self.check()?;
        Ok(&self.text)
    }

    /// Applies `style` to the inclusive range `start..=end`; `None` removes
    /// styling.
    ///
    /// The range is clamped to the text and widened to whole characters.
    /// Styles outside the range are left untouched.
    pub fn set_style(
        &mut self,
        style: Option<TextStyle>,
        start: usize,
        end: usize,
    ) -> Result<(), Error> {
        self.check()?;
        self.invalidate();
        let Some(last) = self.text.len().checked_sub(1) else {
            return Ok(());
        };
        let start = start.min(last);
        let end = end.min(last);
        if start > end {
            return Ok(());
        }
        let start = self.analysis.floor_char(start);
        let end = self.analysis.ceil_char(end + 1);
        self.styles.apply(style, start..end);
        Ok(())
    }

    /// Returns the style at `offset`.
    pub fn get_style(&self, offset: usize) -> Result<Option<&TextStyle>, Error> {
        self.check()?;
        if offset > self.text.len() {
            return Err(Error::invalid_argument("offset", offset));
        }
        Ok(self.styles.style_at(offset))
    }

    /// Returns the styles of [`get_ranges`](Self::get_ranges), in order.
    pub fn get_styles(&self) -> Result<Vec<TextStyle>, Error> {
        self.check()?;
        Ok(self.styles.ranges().map(|range| range.style).collect())
    }

    /// Returns the styled ranges, sorted and with equal neighbors merged.
    pub fn get_ranges(&self) -> Result<Vec<StyleRange>, Error> {
        self.check()?;
        Ok(self.styles.ranges().collect())
    }

    // --- Segments ---

    /// Sets the boundaries of the bidi-isolated segments of the text.
    ///
    /// The first boundary must be zero and the last the text length, with
    /// ordered boundaries in between that fall on character boundaries.
    pub fn set_segments(&mut self, segments: Option<&[usize]>) -> Result<(), Error> {
        self.check()?;
        let analysis = &self.analysis;
        self.segments
            .set_offsets(segments, self.text.len(), |offset| {
                analysis.at(offset).is_char()
            })?;
        self.invalidate();
        Ok(())
    }

    /// Returns the segment boundaries.
    pub fn get_segments(&self) -> Result<Option<&[usize]>, Error> {
        self.check()?;
        Ok(self.segments.offsets())
    }

    /// Sets the directional control character seeding each segment after
    /// the first.
    ///
    /// Requires segments; one character is needed per internal boundary.
    pub fn set_segments_chars(&mut self, chars: Option<&[char]>) -> Result<(), Error> {
        self.check()?;
        self.segments.set_chars(chars)?;
        self.invalidate();
        Ok(())
    }

    /// Returns the segment seed characters.
    pub fn get_segments_chars(&self) -> Result<Option<&[char]>, Error> {
        self.check()?;
        Ok(self.segments.chars())
    }

    // --- Configuration ---

    /// Replaces the whole configuration.
    pub fn set_config(&mut self, config: LayoutConfig) -> Result<(), Error> {
        self.check()?;
        config.validate()?;
        self.configure(|current| *current = config)
    }

    /// Returns the configuration.
    pub fn get_config(&self) -> Result<&LayoutConfig, Error> {
        self.check()?;
        Ok(&self.config)
    }

    /// Sets the font of unstyled text; `None` selects the provider's
    /// default font.
    pub fn set_font(&mut self, font: Option<FontId>) -> Result<(), Error> {
        self.configure(|config| config.font = font)
    }

    /// Returns the font of unstyled text.
    pub fn get_font(&self) -> Result<Option<FontId>, Error> {
        self.check()?;
        Ok(self.config.font)
    }

    /// Sets the wrap width; `-1` disables wrapping.
    pub fn set_width(&mut self, width: i32) -> Result<(), Error> {
        self.check()?;
        let width = optional_pixels("width", width)?;
        self.configure(|config| config.width = width)
    }

    /// Returns the wrap width, or `-1` if the layout does not wrap.
    pub fn get_width(&self) -> Result<i32, Error> {
        self.check()?;
        Ok(self.config.width.map_or(-1, to_device))
    }

    /// Sets the line alignment.
    pub fn set_alignment(&mut self, alignment: Alignment) -> Result<(), Error> {
        self.configure(|config| config.alignment = alignment)
    }

    /// Returns the line alignment.
    pub fn get_alignment(&self) -> Result<Alignment, Error> {
        self.check()?;
        Ok(self.config.alignment)
    }

    /// Sets whether wrapped lines are stretched to the width.
    pub fn set_justify(&mut self, justify: bool) -> Result<(), Error> {
        self.configure(|config| config.justify = justify)
    }

    /// Returns whether wrapped lines are stretched to the width.
    pub fn get_justify(&self) -> Result<bool, Error> {
        self.check()?;
        Ok(self.config.justify)
    }

    /// Sets the base direction.
    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<(), Error> {
        self.configure(|config| config.orientation = orientation)
    }

    /// Returns the base direction.
    pub fn get_orientation(&self) -> Result<Orientation, Error> {
        self.check()?;
        Ok(self.config.orientation)
    }

    /// Sets the indentation of the first line of each paragraph.
    pub fn set_indent(&mut self, indent: i32) -> Result<(), Error> {
        self.check()?;
        let indent = pixels("indent", indent)?;
        self.configure(|config| config.indent = indent)
    }

    /// Returns the indentation of the first line of each paragraph.
    pub fn get_indent(&self) -> Result<i32, Error> {
        self.check()?;
        Ok(to_device(self.config.indent))
    }

    /// Sets the indentation of continuation lines.
    pub fn set_wrap_indent(&mut self, wrap_indent: i32) -> Result<(), Error> {
        self.check()?;
        let wrap_indent = pixels("wrap indent", wrap_indent)?;
        self.configure(|config| config.wrap_indent = wrap_indent)
    }

    /// Returns the indentation of continuation lines.
    pub fn get_wrap_indent(&self) -> Result<i32, Error> {
        self.check()?;
        Ok(to_device(self.config.wrap_indent))
    }

    /// Sets the extra space between lines.
    pub fn set_spacing(&mut self, spacing: i32) -> Result<(), Error> {
        self.check()?;
        let spacing = pixels("spacing", spacing)?;
        self.configure(|config| config.spacing = spacing)
    }

    /// Returns the extra space between lines.
    pub fn get_spacing(&self) -> Result<i32, Error> {
        self.check()?;
        Ok(to_device(self.config.spacing))
    }

    /// Sets the tab stops; `None` restores stops every eight spaces.
    pub fn set_tabs(&mut self, tabs: Option<&[u32]>) -> Result<(), Error> {
        self.check()?;
        if let Some(tabs) = tabs {
            validate_tabs(tabs)?;
        }
        let tabs = tabs.map(<[u32]>::to_vec);
        self.configure(|config| config.tabs = tabs)
    }

    /// Returns the tab stops.
    pub fn get_tabs(&self) -> Result<Option<&[u32]>, Error> {
        self.check()?;
        Ok(self.config.tabs.as_deref())
    }

    /// Sets a fixed line ascent; `-1` computes it from the fonts.
    pub fn set_ascent(&mut self, ascent: i32) -> Result<(), Error> {
        self.check()?;
        let ascent = optional_pixels("ascent", ascent)?;
        self.configure(|config| config.ascent = ascent)
    }

    /// Returns the fixed line ascent, or `-1`.
    pub fn get_ascent(&self) -> Result<i32, Error> {
        self.check()?;
        Ok(self.config.ascent.map_or(-1, to_device))
    }

    /// Sets a fixed line descent; `-1` computes it from the fonts.
    pub fn set_descent(&mut self, descent: i32) -> Result<(), Error> {
        self.check()?;
        let descent = optional_pixels("descent", descent)?;
        self.configure(|config| config.descent = descent)
    }

    /// Returns the fixed line descent, or `-1`.
    pub fn get_descent(&self) -> Result<i32, Error> {
        self.check()?;
        Ok(self.config.descent.map_or(-1, to_device))
    }

    /// Sets the color of text without a foreground style.
    pub fn set_foreground(&mut self, color: Color) -> Result<(), Error> {
        self.configure(|config| config.foreground = color)
    }

    /// Returns the color of text without a foreground style.
    pub fn get_foreground(&self) -> Result<Color, Error> {
        self.check()?;
        Ok(self.config.foreground)
    }

    // --- Geometry ---

    /// Returns the bounds of the laid out text.
    ///
    /// When the layout wraps, the width is at least the wrap width.
    pub fn get_bounds(&mut self) -> Result<Rect, Error> {
        let data = self.update()?;
        Ok(rect(0, 0, data.width, data.height))
    }

    /// Returns the union of the cluster boxes of the inclusive range
    /// `start..=end`.
    ///
    /// The range is clamped to the text; an empty text or range has empty
    /// bounds.
    pub fn get_bounds_range(&mut self, start: usize, end: usize) -> Result<Rect, Error> {
        let data = self.update()?;
        let Some(last) = data.text_len.checked_sub(1) else {
            return Ok(Rect::ZERO);
        };
        let (start, end) = (start.min(last), end.min(last));
        if start > end {
            return Ok(Rect::ZERO);
        }
        let mut bounds: Option<Rect> = None;
        for line in &data.lines {
            if line.text_range.end <= start || line.text_range.start > end {
                continue;
            }
            for run in &data.line_runs[line.run_range.clone()] {
                for (index, x) in data.visual_clusters(run) {
                    let cluster = &data.clusters[index];
                    if cluster.text_range.end <= start || cluster.text_range.start > end {
                        continue;
                    }
                    let cluster_rect = rect(x, line.y, cluster.advance, line.height());
                    bounds = Some(bounds.map_or(cluster_rect, |b| b.union(cluster_rect)));
                }
            }
        }
        Ok(bounds.unwrap_or(Rect::ZERO))
    }

    /// Returns the number of lines; there is always at least one.
    pub fn get_line_count(&mut self) -> Result<usize, Error> {
        Ok(self.update()?.lines.len())
    }

    /// Returns the index of the line containing `offset`.
    pub fn get_line_index(&mut self, offset: usize) -> Result<usize, Error> {
        let offset = self.clamp_offset(offset);
        Ok(self.update()?.line_index(offset))
    }

    /// Returns the start offset of every line followed by the text length.
    pub fn get_line_offsets(&mut self) -> Result<Vec<usize>, Error> {
        let data = self.update()?;
        let mut offsets: Vec<usize> = data.lines.iter().map(|line| line.text_range.start).collect();
        offsets.push(data.text_len);
        Ok(offsets)
    }

    /// Returns the bounds of line `line`, including trailing whitespace.
    pub fn get_line_bounds(&mut self, line: usize) -> Result<Rect, Error> {
        let data = self.update()?;
        let line = data
            .lines
            .get(line)
            .ok_or_else(|| Error::invalid_argument("line index", line))?;
        Ok(rect(line.x, line.y, line.width, line.height()))
    }

    /// Returns the vertical metrics of line `line`.
    pub fn get_line_metrics(&mut self, line: usize) -> Result<LineMetrics, Error> {
        let data = self.update()?;
        let line = data
            .lines
            .get(line)
            .ok_or_else(|| Error::invalid_argument("line index", line))?;
        Ok(LineMetrics {
            ascent: line.ascent,
            descent: line.descent,
            height: line.height(),
            baseline: line.baseline(),
        })
    }

    /// Returns the embedding level at `offset`; odd levels are
    /// right-to-left.
    pub fn get_level(&mut self, offset: usize) -> Result<u8, Error> {
        self.check()?;
        if offset > self.text.len() {
            return Err(Error::invalid_argument("offset", offset));
        }
        Ok(self.update()?.bidi.level_at(offset))
    }

    /// Returns the resolved direction of the first paragraph, either
    /// [`Orientation::LeftToRight`] or [`Orientation::RightToLeft`].
    pub fn get_text_direction(&mut self) -> Result<Orientation, Error> {
        let level = self.update()?.bidi.paragraph_level(0);
        Ok(if level & 1 != 0 {
            Orientation::RightToLeft
        } else {
            Orientation::LeftToRight
        })
    }

    // --- Hit testing and caret movement ---

    /// Returns the position of the leading or trailing edge of the cluster
    /// at `offset`, with y at the top of its line.
    ///
    /// The end of the text maps to the trailing edge of the last cluster.
    pub fn get_location(&mut self, offset: usize, trailing: bool) -> Result<Point, Error> {
        let offset = self.clamp_offset(offset);
        let (x, y) = self.update()?.location(offset, trailing);
        Ok(Point::new(f64::from(x), f64::from(y)))
    }

    /// Returns the cluster edge closest to `point`.
    ///
    /// Points outside of the layout are clamped to the nearest line and
    /// cluster.
    pub fn get_offset(&mut self, point: Point) -> Result<HitPosition, Error> {
        let (offset, trailing) = self.update()?.hit_test(device(point.x), device(point.y));
        Ok(HitPosition { offset, trailing })
    }

    /// Returns the cluster edge closest to `(x, y)`.
    pub fn get_offset_xy(&mut self, x: f64, y: f64) -> Result<HitPosition, Error> {
        self.get_offset(Point::new(x, y))
    }

    /// Returns the offset after `offset` in logical order.
    pub fn get_next_offset(&mut self, offset: usize, movement: Movement) -> Result<usize, Error> {
        self.check()?;
        let offset = self.clamp_offset(offset);
        Ok(cursor::next_offset(&self.analysis, offset, movement))
    }

    /// Returns the offset before `offset` in logical order.
    pub fn get_previous_offset(
        &mut self,
        offset: usize,
        movement: Movement,
    ) -> Result<usize, Error> {
        self.check()?;
        let offset = self.clamp_offset(offset);
        Ok(cursor::previous_offset(&self.analysis, offset, movement))
    }

    /// Returns the caret offset one cluster to the right of `offset` on
    /// screen.
    pub fn get_next_visual_offset(&mut self, offset: usize) -> Result<usize, Error> {
        let offset = self.clamp_offset(offset);
        Ok(self.update()?.visual_offset(offset, true))
    }

    /// Returns the caret offset one cluster to the left of `offset` on
    /// screen.
    pub fn get_previous_visual_offset(&mut self, offset: usize) -> Result<usize, Error> {
        let offset = self.clamp_offset(offset);
        Ok(self.update()?.visual_offset(offset, false))
    }

    // --- Painting ---

    /// Paints the layout onto `surface` with its top left corner at
    /// `(x, y)`.
    pub fn draw<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        x: i32,
        y: i32,
        selection: Option<&Selection>,
        flags: DrawFlags,
    ) -> Result<(), Error> {
        self.update()?;
        let cx = DrawContext {
            text: &self.text,
            styles: &self.styles,
            foreground: self.config.foreground,
            selection,
            flags,
        };
        self.data.draw(surface, x, y, &cx);
        Ok(())
    }
}

fn pixels(what: &'static str, value: i32) -> Result<u32, Error> {
    u32::try_from(value).map_err(|_| Error::invalid_argument(what, value))
}

/// `-1` means unset.
fn optional_pixels(what: &'static str, value: i32) -> Result<Option<u32>, Error> {
    match value {
        -1 => Ok(None),
        value => pixels(what, value).map(Some),
    }
}

fn rect(x: i32, y: i32, width: i32, height: i32) -> Rect {
    Rect::new(
        f64::from(x),
        f64::from(y),
        f64::from(x + width),
        f64::from(y + height),
    )
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "coordinates saturate at the device range"
)]
fn device(value: f64) -> i32 {
    value.floor() as i32
}
