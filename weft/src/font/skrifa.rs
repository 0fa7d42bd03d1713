// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font provider backed by in-memory font files.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::Range;

#[cfg(feature = "libm")]
#[allow(unused_imports, reason = "float methods come from std when it is enabled")]
use core_maths::CoreFloat;

use skrifa::instance::{LocationRef, Size};
use skrifa::{FontRef, GlyphId, MetadataProvider};

use super::{FontId, FontMetrics, FontProvider};
use crate::Error;

#[derive(Clone, Debug)]
struct LoadedFont {
    data: Arc<[u8]>,
    index: u32,
    size: f32,
}

impl LoadedFont {
    fn font_ref(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(&self.data, self.index).ok()
    }
}

/// A [`FontProvider`] that measures text with `skrifa`.
///
/// Fonts are registered from raw font file data at a fixed pixel size.
/// Released fonts keep their handle slot so stale handles are detected.
#[derive(Clone, Debug, Default)]
pub struct SkrifaFontProvider {
    fonts: Vec<Option<LoadedFont>>,
    default: Option<FontId>,
}

impl SkrifaFontProvider {
    /// Creates a provider without fonts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the font at `index` in the font file `data`, rendered at
    /// `size` pixels per em.
    ///
    /// The first registered font becomes the default font.
    pub fn add_font(
        &mut self,
        data: impl Into<Arc<[u8]>>,
        index: u32,
        size: f32,
    ) -> Result<FontId, Error> {
        if !(size.is_finite() && size > 0.0) {
            return Err(Error::invalid_argument("font size", round(size)));
        }
        let font = LoadedFont {
            data: data.into(),
            index,
            size,
        };
        if font.font_ref().is_none() {
            return Err(Error::resource_unavailable("font data", None));
        }
        let id = FontId::new(
            u32::try_from(self.fonts.len())
                .map_err(|_| Error::invalid_argument("font count", self.fonts.len()))?,
        );
        self.fonts.push(Some(font));
        if self.default.is_none() {
            self.default = Some(id);
        }
        Ok(id)
    }

    /// Releases a font. Returns `false` if it was already released.
    pub fn release(&mut self, font: FontId) -> bool {
        let released = self
            .fonts
            .get_mut(font.get() as usize)
            .and_then(Option::take)
            .is_some();
        if released && self.default == Some(font) {
            self.default = None;
        }
        released
    }

    /// Sets the font used when a layout requests the default font.
    pub fn set_default(&mut self, font: Option<FontId>) {
        self.default = font;
    }

    fn get(&self, font: FontId) -> Option<&LoadedFont> {
        self.fonts.get(font.get() as usize)?.as_ref()
    }
}

impl FontProvider for SkrifaFontProvider {
    fn resolve(&self, font: Option<FontId>) -> Option<FontId> {
        let font = font.or(self.default)?;
        self.get(font).map(|_| font)
    }

    fn measure(
        &self,
        font: FontId,
        text: &str,
        clusters: &[Range<usize>],
        advances: &mut Vec<i32>,
    ) -> Option<FontMetrics> {
        let loaded = self.get(font)?;
        let font_ref = loaded.font_ref()?;
        let size = Size::new(loaded.size);
        let location = LocationRef::default();
        let charmap = font_ref.charmap();
        let glyph_metrics = font_ref.glyph_metrics(size, location);
        for cluster in clusters {
            let advance: f32 = text[cluster.clone()]
                .chars()
                .map(|ch| {
                    let glyph = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
                    glyph_metrics.advance_width(glyph).unwrap_or_default()
                })
                .sum();
            advances.push(round(advance).max(0));
        }
        let metrics = font_ref.metrics(size, location);
        Some(FontMetrics {
            ascent: round(metrics.ascent),
            descent: round(-metrics.descent),
        })
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "font units scaled to pixels fit in device coordinates"
)]
fn round(value: f32) -> i32 {
    value.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    /// Writes each value as a big endian 16-bit word. Negative font values
    /// are given in two's complement.
    fn words(out: &mut Vec<u8>, values: &[u16]) {
        for value in values {
            out.extend_from_slice(&value.to_be_bytes());
        }
    }

    /// Assembles a font file from tables sorted by tag.
    fn font_file(tables: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0x0001_0000_u32.to_be_bytes());
        let num_tables = u16::try_from(tables.len()).unwrap();
        words(&mut out, &[num_tables, 64, 2, num_tables * 16 - 64]);
        let header_len = 12 + 16 * tables.len();
        let mut data = Vec::new();
        for (tag, table) in tables {
            let offset = u32::try_from(header_len + data.len()).unwrap();
            let length = u32::try_from(table.len()).unwrap();
            out.extend_from_slice(&tag[..]);
            out.extend_from_slice(&0_u32.to_be_bytes());
            out.extend_from_slice(&offset.to_be_bytes());
            out.extend_from_slice(&length.to_be_bytes());
            data.extend_from_slice(table);
            data.resize(data.len().next_multiple_of(4), 0);
        }
        out.extend(data);
        out
    }

    /// A font with 1000 units per em, an ascender of 800 and a descender
    /// of -200. `a` and `b` map to glyphs 1 and 2.
    fn test_font() -> Vec<u8> {
        let mut cmap = Vec::new();
        words(&mut cmap, &[0, 1, 3, 1]);
        cmap.extend_from_slice(&12_u32.to_be_bytes());
        // Format 4 with segments a..=b and the final 0xFFFF segment.
        words(
            &mut cmap,
            &[
                4, 32, 0, 4, 4, 1, 0, // header
                0x62, 0xFFFF, // end codes
                0,    // pad
                0x61, 0xFFFF, // start codes
                0xFFA0, 1, // deltas, -96 maps a to glyph 1
                0, 0, // range offsets
            ],
        );

        let mut head = Vec::new();
        words(&mut head, &[1, 0, 1, 0, 0, 0, 0x5F0F, 0x3CF5, 0, 1000]);
        head.extend_from_slice(&[0; 16]);
        words(&mut head, &[0, 0xFF38, 1000, 800, 0, 0, 2, 0, 0]);

        let mut hhea = Vec::new();
        words(
            &mut hhea,
            &[1, 0, 800, 0xFF38, 0, 1000, 0, 0, 1000, 1, 0, 0, 0, 0, 0, 0, 0, 3],
        );

        let mut hmtx = Vec::new();
        words(&mut hmtx, &[500, 0, 600, 0, 1000, 0]);

        let mut maxp = Vec::new();
        words(&mut maxp, &[0, 0x5000, 3]);

        font_file(&[
            (b"cmap", cmap),
            (b"head", head),
            (b"hhea", hhea),
            (b"hmtx", hmtx),
            (b"maxp", maxp),
        ])
    }

    #[test]
    fn measures_advances_and_metrics() {
        let mut provider = SkrifaFontProvider::new();
        let font = provider.add_font(test_font(), 0, 10.0).unwrap();
        assert_eq!(provider.resolve(None), Some(font));

        let mut advances = Vec::new();
        let metrics = provider
            .measure(font, "ab?", &[0..1, 1..2, 2..3], &mut advances)
            .unwrap();
        // Unmapped characters use the advance of glyph zero.
        assert_eq!(advances, [6, 10, 5]);
        assert_eq!(
            metrics,
            FontMetrics {
                ascent: 8,
                descent: 2,
            }
        );

        advances.clear();
        provider.measure(font, "ab", &[0..2], &mut advances).unwrap();
        assert_eq!(advances, [16]);
    }

    #[test]
    fn rejects_bad_fonts_and_sizes() {
        let mut provider = SkrifaFontProvider::new();
        let err = provider.add_font(vec![0_u8; 8], 0, 10.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceUnavailable);
        let err = provider.add_font(test_font(), 0, 0.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err = provider.add_font(test_font(), 0, f32::NAN).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(provider.resolve(None), None);
    }

    #[test]
    fn released_fonts_no_longer_resolve() {
        let mut provider = SkrifaFontProvider::new();
        let first = provider.add_font(test_font(), 0, 10.0).unwrap();
        let second = provider.add_font(test_font(), 0, 20.0).unwrap();
        assert_eq!(provider.resolve(None), Some(first));
        assert_eq!(provider.resolve(Some(second)), Some(second));

        assert!(provider.release(first));
        assert!(!provider.release(first));
        assert_eq!(provider.resolve(Some(first)), None);
        assert_eq!(provider.resolve(None), None);
        assert!(provider.measure(first, "a", &[0..1], &mut Vec::new()).is_none());

        provider.set_default(Some(second));
        assert_eq!(provider.resolve(None), Some(second));
        let mut advances = Vec::new();
        provider.measure(second, "a", &[0..1], &mut advances).unwrap();
        assert_eq!(advances, [12]);
    }

    #[test]
    fn lays_out_text() {
        let mut provider = SkrifaFontProvider::new();
        provider.add_font(test_font(), 0, 10.0).unwrap();
        let mut layout = crate::TextLayout::new(provider);
        layout.set_text("abba").unwrap();
        let bounds = layout.get_bounds().unwrap();
        assert_eq!(bounds.width(), 32.0);
        assert_eq!(bounds.height(), 10.0);
    }
}
