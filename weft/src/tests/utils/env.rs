// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::testing::{FixedFontProvider, RecordingSurface};
use crate::{DrawFlags, LayoutConfig, Selection, TextLayout};

/// Advance of every cluster in the default test font.
pub(crate) const ADVANCE: i32 = FixedFontProvider::ADVANCE;
/// Height of a line in the default test font.
pub(crate) const LINE_HEIGHT: i32 = FixedFontProvider::ASCENT + FixedFontProvider::DESCENT;

pub(crate) struct TestEnv {
    test_name: &'static str,
    pub(crate) layout: TextLayout<FixedFontProvider>,
}

impl TestEnv {
    pub(crate) fn new(test_name: &'static str, text: &str) -> Self {
        Self::with_config(test_name, text, LayoutConfig::default())
    }

    pub(crate) fn with_config(test_name: &'static str, text: &str, config: LayoutConfig) -> Self {
        let mut layout = TextLayout::with_config(FixedFontProvider::new(), config)
            .unwrap_or_else(|err| panic!("{test_name}: invalid config: {err}"));
        layout.set_text(text).unwrap();
        Self { test_name, layout }
    }

    pub(crate) fn line_offsets(&mut self) -> Vec<usize> {
        self.layout.get_line_offsets().unwrap()
    }

    pub(crate) fn location(&mut self, offset: usize, trailing: bool) -> (i32, i32) {
        let point = self.layout.get_location(offset, trailing).unwrap();
        (point.x as i32, point.y as i32)
    }

    /// Hit tests `(x, y)` and returns the offset and trailing length.
    pub(crate) fn hit(&mut self, x: i32, y: i32) -> (usize, usize) {
        let hit = self
            .layout
            .get_offset_xy(f64::from(x), f64::from(y))
            .unwrap();
        (hit.offset, hit.trailing)
    }

    /// Follows visual caret movement from `start` until it stops, returning
    /// every offset visited.
    pub(crate) fn visual_walk(&mut self, start: usize, forward: bool) -> Vec<usize> {
        let name = self.test_name;
        let limit = self.layout.get_text().unwrap().len() + 2;
        let mut offsets = vec![start];
        let mut offset = start;
        loop {
            let next = if forward {
                self.layout.get_next_visual_offset(offset).unwrap()
            } else {
                self.layout.get_previous_visual_offset(offset).unwrap()
            };
            if next == offset {
                return offsets;
            }
            offsets.push(next);
            offset = next;
            assert!(offsets.len() <= limit, "{name}: visual walk does not end: {offsets:?}");
        }
    }

    pub(crate) fn draw(&mut self, selection: Option<&Selection>, flags: DrawFlags) -> RecordingSurface {
        let mut surface = RecordingSurface::new();
        self.layout
            .draw(&mut surface, 0, 0, selection, flags)
            .unwrap();
        surface
    }

    /// Checks that the lines partition the text without gaps and that every
    /// offset maps back to the line containing it.
    pub(crate) fn check_line_partition(&mut self) {
        let name = self.test_name;
        let offsets = self.line_offsets();
        let len = self.layout.get_text().unwrap().len();
        assert!(offsets.len() >= 2, "{name}: no lines");
        assert_eq!(offsets[0], 0, "{name}: first line does not start at 0");
        assert_eq!(*offsets.last().unwrap(), len, "{name}: last line does not end at the text end");
        assert!(
            offsets.windows(2).all(|pair| pair[0] <= pair[1]),
            "{name}: line offsets out of order: {offsets:?}"
        );
        let line_count = offsets.len() - 1;
        for offset in 0..=len {
            if !self.layout.get_text().unwrap().is_char_boundary(offset) {
                continue;
            }
            let line = self.layout.get_line_index(offset).unwrap();
            let in_line = offsets[line] <= offset
                && (offset < offsets[line + 1] || line + 1 == line_count);
            assert!(in_line, "{name}: offset {offset} reported on line {line}, lines {offsets:?}");
        }
    }

    /// Checks that the middle of every cluster hit tests back to the
    /// cluster.
    pub(crate) fn check_round_trip(&mut self) {
        let name = self.test_name;
        let text = self.layout.get_text().unwrap().to_string();
        let mut offset = 0;
        while offset < text.len() {
            let next = self
                .layout
                .get_next_offset(offset, crate::Movement::Cluster)
                .unwrap();
            let is_separator = text[offset..next].chars().all(|ch| ch == '\n' || ch == '\r');
            if !is_separator {
                let (leading, y) = self.location(offset, false);
                let (trailing, _) = self.location(offset, true);
                let x = (leading + trailing) / 2;
                let (hit, _) = self.hit(x, y + 1);
                assert_eq!(hit, offset, "{name}: round trip of {offset} at x {x}");
            }
            offset = next;
        }
    }
}
