// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explicit segment boundaries.

use alloc::vec::Vec;
use core::ops::Range;

use crate::Error;

/// Bidi-isolated spans of the logical text.
///
/// When no boundaries are set the whole text is a single segment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Segments {
    offsets: Option<Vec<usize>>,
    chars: Option<Vec<char>>,
}

/// One span handed to the bidi resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Segment {
    pub(crate) range: Range<usize>,
    /// Directional control character seeding the span, not part of the text.
    pub(crate) seed: Option<char>,
}

impl Segments {
    pub(crate) fn clear(&mut self) {
        self.offsets = None;
        self.chars = None;
    }

    pub(crate) fn offsets(&self) -> Option<&[usize]> {
        self.offsets.as_deref()
    }

    pub(crate) fn chars(&self) -> Option<&[char]> {
        self.chars.as_deref()
    }

    /// Replaces the segment boundaries.
    ///
    /// `is_boundary` reports whether an offset falls on a character
    /// boundary. Seed characters are dropped if their count no longer fits.
    pub(crate) fn set_offsets(
        &mut self,
        offsets: Option<&[usize]>,
        len: usize,
        is_boundary: impl Fn(usize) -> bool,
    ) -> Result<(), Error> {
        let Some(offsets) = offsets else {
            self.clear();
            return Ok(());
        };
        let (Some(&first), Some(&last)) = (offsets.first(), offsets.last()) else {
            return Err(Error::invalid_configuration("segment list is empty"));
        };
        if first != 0 {
            return Err(Error::invalid_configuration(
                "first segment boundary is not zero",
            ));
        }
        if last != len {
            return Err(Error::invalid_configuration(
                "last segment boundary is not the text length",
            ));
        }
        if offsets.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(Error::invalid_configuration(
                "segment boundaries are not ordered",
            ));
        }
        if !offsets.iter().all(|&offset| is_boundary(offset)) {
            return Err(Error::invalid_configuration(
                "segment boundary splits a character",
            ));
        }
        if self
            .chars
            .as_ref()
            .is_some_and(|chars| chars.len() != internal_count(offsets))
        {
            self.chars = None;
        }
        self.offsets = Some(offsets.to_vec());
        Ok(())
    }

    /// Replaces the seed characters, one per internal boundary.
    pub(crate) fn set_chars(&mut self, chars: Option<&[char]>) -> Result<(), Error> {
        let Some(chars) = chars else {
            self.chars = None;
            return Ok(());
        };
        let Some(offsets) = &self.offsets else {
            return Err(Error::invalid_configuration(
                "segment characters require segment boundaries",
            ));
        };
        if chars.len() != internal_count(offsets) {
            return Err(Error::invalid_configuration(
                "one segment character is required per internal boundary",
            ));
        }
        if !chars.iter().all(|&ch| is_bidi_control(ch)) {
            return Err(Error::invalid_configuration(
                "segment characters must be bidi controls",
            ));
        }
        self.chars = Some(chars.to_vec());
        Ok(())
    }

    /// Returns the non-empty spans of a text of length `len`.
    pub(crate) fn spans(&self, len: usize) -> Vec<Segment> {
        let Some(offsets) = &self.offsets else {
            return if len == 0 {
                Vec::new()
            } else {
                alloc::vec![Segment {
                    range: 0..len,
                    seed: None,
                }]
            };
        };
        offsets
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[0] < pair[1])
            .map(|(index, pair)| Segment {
                range: pair[0]..pair[1],
                seed: index
                    .checked_sub(1)
                    .and_then(|boundary| self.chars.as_ref()?.get(boundary).copied()),
            })
            .collect()
    }
}

fn internal_count(offsets: &[usize]) -> usize {
    offsets.len().saturating_sub(2)
}

/// Marks, embeddings, overrides and isolates of UAX #9.
fn is_bidi_control(ch: char) -> bool {
    matches!(
        ch,
        '\u{061C}' | '\u{200E}' | '\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}'
    )
}
