// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{GlyphMetrics, HitPosition, Movement, Point, TextStyle};

use super::utils::{TestEnv, LINE_HEIGHT};

#[test]
fn hit_picks_the_closer_edge() {
    let mut env = TestEnv::new(test_name!(), "abc");
    assert_eq!(env.hit(14, 5), (1, 0));
    assert_eq!(env.hit(16, 5), (1, 1));
    assert_eq!(env.hit(-5, 5), (0, 0));
    assert_eq!(env.hit(500, 5), (2, 1));
    assert_eq!(
        env.layout.get_offset(Point::new(16.5, 2.0)).unwrap(),
        HitPosition {
            offset: 1,
            trailing: 1
        }
    );
}

#[test]
fn hit_finds_zero_width_clusters() {
    let mut env = TestEnv::new(test_name!(), "abc");
    let collapsed = TextStyle {
        metrics: Some(GlyphMetrics::new(8, 2, 0)),
        ..Default::default()
    };
    env.layout.set_style(Some(collapsed), 1, 1).unwrap();
    assert_eq!(env.location(1, false), (10, 0));
    assert_eq!(env.location(1, true), (10, 0));
    assert_eq!(env.hit(10, 5), (1, 0));
    assert_eq!(env.hit(14, 5), (2, 0));
    assert_eq!(env.hit(16, 5), (2, 1));
    assert_eq!(env.hit(9, 5), (0, 1));
}

#[test]
fn hit_clamps_to_lines() {
    let mut env = TestEnv::new(test_name!(), "ab\ncd");
    assert_eq!(env.hit(5, 100), (3, 0));
    assert_eq!(env.hit(5, -10), (0, 0));
    // Past the end of a line lands before its separator.
    assert_eq!(env.hit(500, 5), (2, 0));
    assert_eq!(env.hit(500, LINE_HEIGHT + 5), (4, 1));
}

#[test]
fn hit_on_empty_line() {
    let mut env = TestEnv::new(test_name!(), "ab\n\ncd");
    assert_eq!(env.line_offsets(), [0, 3, 4, 6]);
    assert_eq!(env.hit(50, LINE_HEIGHT + 5), (3, 0));
    assert_eq!(env.hit(0, LINE_HEIGHT + 5), (3, 0));
}

#[test]
fn location_of_text_end() {
    let mut env = TestEnv::new(test_name!(), "abc");
    assert_eq!(env.location(3, false), (30, 0));
    assert_eq!(env.location(3, true), (30, 0));
    assert_eq!(env.location(100, false), (30, 0));
    assert_eq!(env.location(1, true), (20, 0));
}

#[test]
fn location_across_separator() {
    let mut env = TestEnv::new(test_name!(), "ab\ncd");
    assert_eq!(env.location(2, false), (20, 0));
    assert_eq!(env.location(3, false), (0, LINE_HEIGHT));
    assert_eq!(env.location(5, false), (20, LINE_HEIGHT));
}

#[test]
fn round_trip_with_multibyte_text() {
    let mut env = TestEnv::new(test_name!(), "hello\nwörld");
    assert_eq!(env.location(7, false), (10, LINE_HEIGHT));
    // Offsets inside a character snap to its start.
    assert_eq!(env.location(8, false), (10, LINE_HEIGHT));
    assert_eq!(env.location(9, false), (20, LINE_HEIGHT));
    env.check_round_trip();
    env.check_line_partition();
}

#[test]
fn logical_movement() {
    let mut env = TestEnv::new(test_name!(), "hello world");
    assert_eq!(env.layout.get_next_offset(0, Movement::Word).unwrap(), 5);
    assert_eq!(
        env.layout
            .get_previous_offset(11, Movement::WordStart)
            .unwrap(),
        6
    );
    assert_eq!(env.layout.get_next_offset(100, Movement::Cluster).unwrap(), 11);
    assert_eq!(env.layout.get_previous_offset(0, Movement::Char).unwrap(), 0);

    env.layout.set_text("e\u{301}x").unwrap();
    assert_eq!(env.layout.get_next_offset(0, Movement::Cluster).unwrap(), 3);
    assert_eq!(env.layout.get_next_offset(0, Movement::Char).unwrap(), 1);
    assert_eq!(env.layout.get_previous_offset(4, Movement::Cluster).unwrap(), 3);
}

#[test]
fn visual_movement_wraps_between_lines() {
    let mut env = TestEnv::new(test_name!(), "ab\ncd");
    assert_eq!(env.layout.get_next_visual_offset(0).unwrap(), 1);
    assert_eq!(env.layout.get_next_visual_offset(2).unwrap(), 3);
    assert_eq!(env.layout.get_previous_visual_offset(3).unwrap(), 2);
    assert_eq!(env.layout.get_previous_visual_offset(0).unwrap(), 0);
    assert_eq!(env.layout.get_next_visual_offset(5).unwrap(), 5);
}
