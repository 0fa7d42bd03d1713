// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Styled text layout.
//!
//! A [`TextLayout`] holds a paragraph of text with style ranges and layout
//! constraints. On demand it resolves bidirectional levels, measures
//! clusters through a [`FontProvider`], breaks lines, and answers geometry,
//! hit testing and caret movement queries. It paints onto any [`Surface`].
//!
//! ```
//! use weft::testing::FixedFontProvider;
//! use weft::TextLayout;
//!
//! let mut layout = TextLayout::new(FixedFontProvider::new());
//! layout.set_text("AB\nCD").unwrap();
//! assert_eq!(layout.get_line_offsets().unwrap(), [0, 3, 5]);
//! ```

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("weft requires either the `std` or `libm` feature to be enabled");

extern crate alloc;

pub use peniko;
pub use peniko::kurbo::{Point, Rect};
pub use peniko::Color;

mod analysis;
mod error;
mod font;
mod layout;
mod shape;
mod style;

pub mod testing;

#[cfg(test)]
mod tests;

pub use error::{Error, ErrorKind};
pub use font::{FontId, FontMetrics, FontProvider};
pub use layout::{
    Alignment, DrawFlags, GlyphRun, HitPosition, LayoutConfig, LineMetrics, Movement,
    Orientation, Selection, Surface, TextLayout,
};
pub use style::{GlyphMetrics, StyleRange, TextStyle, UnderlineStyle};

#[cfg(feature = "skrifa")]
pub use font::SkrifaFontProvider;
