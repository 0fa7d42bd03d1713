// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic collaborators for tests and headless use.
//!
//! [`FixedFontProvider`] measures every cluster with a fixed advance, and
//! [`RecordingSurface`] records paint commands instead of rasterizing them.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::ops::Range;

use peniko::kurbo::{Point, Rect};
use peniko::Color;

use crate::font::{FontId, FontMetrics, FontProvider};
use crate::layout::{GlyphRun, Surface};

/// Metrics of a font known to a [`FixedFontProvider`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FixedFont {
    /// Advance of every cluster.
    pub advance: i32,
    /// Ascent of the font.
    pub ascent: i32,
    /// Descent of the font.
    pub descent: i32,
}

impl FixedFont {
    /// Creates new font metrics.
    pub fn new(advance: i32, ascent: i32, descent: i32) -> Self {
        Self {
            advance,
            ascent,
            descent,
        }
    }
}

/// A font provider where every cluster of a font has the same advance.
///
/// Fonts can be released to exercise resource errors.
#[derive(Clone, Debug, Default)]
pub struct FixedFontProvider {
    fonts: Vec<Option<FixedFont>>,
    default: Option<FontId>,
}

impl FixedFontProvider {
    /// Advance of the default font.
    pub const ADVANCE: i32 = 10;
    /// Ascent of the default font.
    pub const ASCENT: i32 = 8;
    /// Descent of the default font.
    pub const DESCENT: i32 = 2;

    /// Creates a provider whose default font has an advance of
    /// [`ADVANCE`](Self::ADVANCE) and a line height of ten.
    pub fn new() -> Self {
        let mut provider = Self::empty();
        let font = provider.add_font(FixedFont::new(Self::ADVANCE, Self::ASCENT, Self::DESCENT));
        provider.default = Some(font);
        provider
    }

    /// Creates a provider without any fonts.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registers a font.
    pub fn add_font(&mut self, font: FixedFont) -> FontId {
        let id = FontId::new(u32::try_from(self.fonts.len()).unwrap_or(u32::MAX));
        self.fonts.push(Some(font));
        id
    }

    /// Releases a font. Returns `false` if it was not registered.
    pub fn release(&mut self, font: FontId) -> bool {
        self.slot(font).and_then(Option::take).is_some()
    }

    /// Returns the default font.
    pub fn default_font(&self) -> Option<FontId> {
        self.default
    }

    fn slot(&mut self, font: FontId) -> Option<&mut Option<FixedFont>> {
        self.fonts.get_mut(usize::try_from(font.get()).ok()?)
    }

    fn get(&self, font: FontId) -> Option<&FixedFont> {
        self.fonts.get(usize::try_from(font.get()).ok()?)?.as_ref()
    }
}

impl FontProvider for FixedFontProvider {
    fn resolve(&self, font: Option<FontId>) -> Option<FontId> {
        let font = font.or(self.default)?;
        self.get(font).map(|_| font)
    }

    fn measure(
        &self,
        font: FontId,
        _text: &str,
        clusters: &[Range<usize>],
        advances: &mut Vec<i32>,
    ) -> Option<FontMetrics> {
        let font = self.get(font)?;
        advances.extend(clusters.iter().map(|_| font.advance));
        Some(FontMetrics {
            ascent: font.ascent,
            descent: font.descent,
        })
    }
}

/// A paint command recorded by a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// A piece of text.
    Run {
        /// The text of the piece.
        text: String,
        /// Range of the piece in the layout's text.
        text_range: Range<usize>,
        /// Font of the piece.
        font: FontId,
        /// Baseline origin.
        origin: Point,
        /// Advance of the piece.
        advance: i32,
        /// Text color.
        color: Color,
    },
    /// A filled rectangle.
    Rect {
        /// The rectangle.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
}

/// A surface that records paint commands in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    /// The recorded commands.
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Creates an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the text of every recorded run, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Run { text, .. } => Some(text.as_str()),
                DrawCommand::Rect { .. } => None,
            })
            .collect()
    }

    /// Returns every recorded rectangle, in order.
    pub fn rects(&self) -> Vec<(Rect, Color)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Rect { rect, color } => Some((*rect, *color)),
                DrawCommand::Run { .. } => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn draw_run(&mut self, run: &GlyphRun<'_>, origin: Point, color: Color) {
        self.commands.push(DrawCommand::Run {
            text: run.text.to_string(),
            text_range: run.text_range.clone(),
            font: run.font,
            origin,
            advance: run.advance(),
            color,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }
}
