// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rich styling support.

mod ranges;

pub use ranges::StyleRange;
pub(crate) use ranges::StyleRuns;

use crate::font::FontId;
use peniko::Color;

/// Style of an underline decoration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum UnderlineStyle {
    /// A single line below the baseline.
    #[default]
    Single,
    /// Two parallel lines below the baseline.
    Double,
    /// A zigzag line, typically used to flag errors.
    Squiggle,
    /// A single line marking a hyperlink.
    Link,
}

/// Fixed metrics that replace font measurements for every cluster of a
/// styled range.
///
/// This is how embedded objects reserve space inside a line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GlyphMetrics {
    /// Ascent of each cluster.
    pub ascent: i32,
    /// Descent of each cluster.
    pub descent: i32,
    /// Advance of each cluster.
    pub width: i32,
}

impl GlyphMetrics {
    /// Creates new glyph metrics.
    pub fn new(ascent: i32, descent: i32, width: i32) -> Self {
        Self {
            ascent,
            descent,
            width,
        }
    }
}

/// Style applied to a range of text.
///
/// Unset fields fall back to the layout's defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextStyle {
    /// Font override.
    pub font: Option<FontId>,
    /// Text color.
    pub foreground: Option<Color>,
    /// Color painted behind the text.
    pub background: Option<Color>,
    /// Baseline shift in pixels; positive values raise the text.
    pub rise: i32,
    /// Underline decoration.
    pub underline: Option<UnderlineStyle>,
    /// Color of the underline, defaults to the text color.
    pub underline_color: Option<Color>,
    /// Whether the text is struck out.
    pub strikeout: bool,
    /// Color of the strikeout line, defaults to the text color.
    pub strikeout_color: Option<Color>,
    /// Fixed metrics overriding the font.
    pub metrics: Option<GlyphMetrics>,
}

impl TextStyle {
    /// Creates a style that only overrides the font.
    pub fn with_font(font: FontId) -> Self {
        Self {
            font: Some(font),
            ..Default::default()
        }
    }

    /// Returns `true` if this style paints anything below or across the
    /// glyphs.
    pub(crate) fn has_decorations(&self) -> bool {
        self.underline.is_some() || self.strikeout
    }
}
