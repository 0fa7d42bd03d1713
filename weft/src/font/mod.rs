// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font handles and the font provider interface.
//!
//! The layout engine never loads font files. It refers to fonts through
//! [`FontId`] handles and asks a [`FontProvider`] to resolve them and to
//! measure clusters of text.

#[cfg(feature = "skrifa")]
mod skrifa;

#[cfg(feature = "skrifa")]
pub use self::skrifa::SkrifaFontProvider;

use alloc::{boxed::Box, rc::Rc, sync::Arc, vec::Vec};
use core::ops::Range;

/// Non-owning handle to a font managed by a [`FontProvider`].
///
/// Handles stay valid as values after the font is released; using a released
/// font makes the next layout computation fail with
/// [`ErrorKind::ResourceUnavailable`](crate::ErrorKind::ResourceUnavailable).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(u32);

impl FontId {
    /// Creates a handle from a provider-defined identifier.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the provider-defined identifier.
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Vertical metrics of a font in integer device units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the line box.
    pub ascent: i32,
    /// Distance from the baseline to the bottom of the line box.
    pub descent: i32,
}

impl FontMetrics {
    /// Returns the sum of ascent and descent.
    pub fn height(&self) -> i32 {
        self.ascent + self.descent
    }
}

/// Source of fonts and font measurements.
///
/// Implementations are the platform specific part of the layout engine. They
/// are only ever accessed through shared references.
pub trait FontProvider {
    /// Maps a requested font to a live font handle.
    ///
    /// `None` requests the platform default font. Returns `None` if the
    /// requested font has been released or if no default font exists.
    fn resolve(&self, font: Option<FontId>) -> Option<FontId>;

    /// Measures the clusters of `text` in `font`.
    ///
    /// `clusters` are byte ranges into `text`. Implementations push exactly
    /// one advance per cluster onto `advances` and return the font's vertical
    /// metrics, or return `None` if the font is no longer available.
    fn measure(
        &self,
        font: FontId,
        text: &str,
        clusters: &[Range<usize>],
        advances: &mut Vec<i32>,
    ) -> Option<FontMetrics>;
}

macro_rules! forward_provider {
    ($($ty:ty),*) => {
        $(
            impl<T: FontProvider + ?Sized> FontProvider for $ty {
                fn resolve(&self, font: Option<FontId>) -> Option<FontId> {
                    (**self).resolve(font)
                }

                fn measure(
                    &self,
                    font: FontId,
                    text: &str,
                    clusters: &[Range<usize>],
                    advances: &mut Vec<i32>,
                ) -> Option<FontMetrics> {
                    (**self).measure(font, text, clusters, advances)
                }
            }
        )*
    };
}

forward_provider!(&T, Box<T>, Rc<T>, Arc<T>);
