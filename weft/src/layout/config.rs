// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout constraints.

use alloc::vec::Vec;

use peniko::Color;

use crate::font::FontId;
use crate::Error;

/// Horizontal placement of lines within the layout width.
///
/// Alignment is in screen space and does not depend on the text direction.
/// It has no effect when the layout does not wrap.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Lines start at the left edge.
    #[default]
    Left,
    /// Lines are centered.
    Center,
    /// Lines end at the right edge.
    Right,
}

/// Base direction of the paragraphs in a layout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Paragraphs are left-to-right.
    #[default]
    LeftToRight,
    /// Paragraphs are right-to-left.
    RightToLeft,
    /// Each paragraph takes the direction of its first strong character.
    Auto,
}

/// Caller owned layout configuration.
///
/// Pixel values are integer device units.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Font of unstyled text; `None` selects the provider's default font.
    pub font: Option<FontId>,
    /// Wrap width; `None` disables wrapping.
    pub width: Option<u32>,
    /// Line alignment, ignored when `width` is `None`.
    pub alignment: Alignment,
    /// Stretch every line but the last to `width`.
    pub justify: bool,
    /// Base direction.
    pub orientation: Orientation,
    /// Offset of the first line of each paragraph.
    pub indent: u32,
    /// Offset of continuation lines.
    pub wrap_indent: u32,
    /// Extra space between lines.
    pub spacing: u32,
    /// Tab stops measured from the line origin. The last interval repeats.
    pub tabs: Option<Vec<u32>>,
    /// Fixed line ascent overriding font metrics.
    pub ascent: Option<u32>,
    /// Fixed line descent overriding font metrics.
    pub descent: Option<u32>,
    /// Color of text without a foreground style.
    pub foreground: Color,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font: None,
            width: None,
            alignment: Alignment::Left,
            justify: false,
            orientation: Orientation::LeftToRight,
            indent: 0,
            wrap_indent: 0,
            spacing: 0,
            tabs: None,
            ascent: None,
            descent: None,
            foreground: Color::BLACK,
        }
    }
}

impl LayoutConfig {
    /// Checks the configuration for values the layout cannot use.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(tabs) = &self.tabs {
            validate_tabs(tabs)?;
        }
        let limit = i32::MAX as u32;
        let values = [
            ("width", self.width),
            ("indent", Some(self.indent)),
            ("wrap indent", Some(self.wrap_indent)),
            ("spacing", Some(self.spacing)),
            ("ascent", self.ascent),
            ("descent", self.descent),
        ];
        for (what, value) in values {
            if let Some(value) = value.filter(|&value| value > limit) {
                return Err(Error::invalid_argument(what, value));
            }
        }
        Ok(())
    }

    /// Returns the wrap width in device units.
    pub(crate) fn max_advance(&self) -> Option<i32> {
        self.width.map(to_device)
    }

    /// Returns the origin of a line.
    pub(crate) fn line_origin(&self, paragraph_start: bool) -> i32 {
        to_device(if paragraph_start {
            self.indent
        } else {
            self.wrap_indent
        })
    }

    /// Returns the first tab stop strictly after `pen`.
    ///
    /// `space_advance` sizes the default stops, eight spaces apart.
    pub(crate) fn next_tab_stop(&self, pen: i32, space_advance: i32) -> i32 {
        let (last, interval) = match self.tabs.as_deref() {
            Some(tabs) => {
                if let Some(&stop) = tabs.iter().find(|&&stop| to_device(stop) > pen) {
                    return to_device(stop);
                }
                let last = tabs.last().copied().map(to_device).unwrap_or(0);
                let previous = match tabs.len() {
                    0 | 1 => 0,
                    len => to_device(tabs[len - 2]),
                };
                (last, last - previous)
            }
            None => (0, space_advance * 8),
        };
        if interval <= 0 {
            return pen;
        }
        if pen < last {
            return last;
        }
        last + ((pen - last) / interval + 1) * interval
    }
}

/// Tab stops must be positive and strictly increasing.
pub(crate) fn validate_tabs(tabs: &[u32]) -> Result<(), Error> {
    if tabs.is_empty() {
        return Err(Error::invalid_configuration("tab stop list is empty"));
    }
    if tabs[0] == 0 {
        return Err(Error::invalid_configuration("tab stops must be positive"));
    }
    if tabs.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(Error::invalid_configuration(
            "tab stops are not strictly increasing",
        ));
    }
    if tabs.iter().any(|&stop| stop > i32::MAX as u32) {
        return Err(Error::invalid_configuration("tab stop out of range"));
    }
    Ok(())
}

/// Converts a validated pixel value.
pub(crate) fn to_device(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn default_tab_stops_repeat() {
        let config = LayoutConfig::default();
        assert_eq!(config.next_tab_stop(0, 10), 80);
        assert_eq!(config.next_tab_stop(79, 10), 80);
        assert_eq!(config.next_tab_stop(80, 10), 160);
        assert_eq!(config.next_tab_stop(5, 0), 5);
    }

    #[test]
    fn last_interval_repeats() {
        let config = LayoutConfig {
            tabs: Some(alloc::vec![30, 50]),
            ..Default::default()
        };
        assert_eq!(config.next_tab_stop(10, 10), 30);
        assert_eq!(config.next_tab_stop(30, 10), 50);
        assert_eq!(config.next_tab_stop(60, 10), 70);
        assert_eq!(config.next_tab_stop(70, 10), 90);

        let single = LayoutConfig {
            tabs: Some(alloc::vec![25]),
            ..Default::default()
        };
        assert_eq!(single.next_tab_stop(25, 10), 50);
    }

    #[test]
    fn malformed_tabs_rejected() {
        for tabs in [alloc::vec![], alloc::vec![0, 10], alloc::vec![20, 20]] {
            let config = LayoutConfig {
                tabs: Some(tabs),
                ..Default::default()
            };
            let err = config.validate().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        }
    }
}
