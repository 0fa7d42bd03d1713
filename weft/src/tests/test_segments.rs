// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{ErrorKind, LayoutConfig, Orientation};

use super::utils::TestEnv;

fn auto() -> LayoutConfig {
    LayoutConfig {
        orientation: Orientation::Auto,
        ..Default::default()
    }
}

#[test]
fn malformed_segments_leave_state_unchanged() {
    let mut env = TestEnv::new(test_name!(), "ab\u{5d0}cd");
    env.layout.set_segments(Some(&[0, 2, 6])).unwrap();
    let cases: [&[usize]; 5] = [&[], &[1, 6], &[0, 5], &[0, 4, 3, 6], &[0, 3, 6]];
    for bad in cases {
        let err = env.layout.set_segments(Some(bad)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration, "{bad:?}");
    }
    assert_eq!(env.layout.get_segments().unwrap(), Some(&[0, 2, 6][..]));
}

#[test]
fn segments_isolate_direction() {
    let text = "\u{5d0}\u{5d1}ab";
    let mut env = TestEnv::with_config(test_name!(), text, auto());
    assert_eq!(env.layout.get_level(4).unwrap(), 2);

    env.layout.set_segments(Some(&[0, 4, 6])).unwrap();
    assert_eq!(env.layout.get_level(0).unwrap(), 1);
    assert_eq!(env.layout.get_level(4).unwrap(), 0);
    assert_eq!(env.line_offsets(), [0, 6]);
}

#[test]
fn seed_characters_direct_segments() {
    let mut env = TestEnv::with_config(test_name!(), "abcd", auto());
    env.layout.set_segments(Some(&[0, 2, 4])).unwrap();
    env.layout.set_segments_chars(Some(&['\u{200F}'])).unwrap();
    assert_eq!(env.layout.get_level(0).unwrap(), 0);
    assert_eq!(env.layout.get_level(2).unwrap(), 2);

    // Seeds never become text.
    assert_eq!(env.layout.get_text().unwrap(), "abcd");
    assert_eq!(env.line_offsets(), [0, 4]);
    assert_eq!(env.layout.get_bounds().unwrap().width(), 40.0);
    assert_eq!(env.layout.get_segments_chars().unwrap(), Some(&['\u{200F}'][..]));
}

#[test]
fn seed_characters_are_validated() {
    let mut env = TestEnv::new(test_name!(), "abcd");
    let err = env.layout.set_segments_chars(Some(&['\u{200F}'])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);

    env.layout.set_segments(Some(&[0, 2, 4])).unwrap();
    for chars in [&['\u{200F}', '\u{200E}'][..], &['x'][..]] {
        let err = env.layout.set_segments_chars(Some(chars)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }
    env.layout.set_segments_chars(Some(&['\u{2067}'])).unwrap();

    // A new boundary count drops the seeds.
    env.layout.set_segments(Some(&[0, 1, 2, 4])).unwrap();
    assert_eq!(env.layout.get_segments_chars().unwrap(), None);
}

#[test]
fn empty_segments_contribute_nothing() {
    let mut env = TestEnv::new(test_name!(), "ab");
    env.layout.set_segments(Some(&[0, 0, 2, 2])).unwrap();
    assert_eq!(env.layout.get_line_count().unwrap(), 1);
    assert_eq!(env.layout.get_bounds().unwrap().width(), 20.0);
    env.check_line_partition();
}

#[test]
fn new_text_clears_segments() {
    let mut env = TestEnv::new(test_name!(), "abcd");
    env.layout.set_segments(Some(&[0, 2, 4])).unwrap();
    env.layout.set_text("abcd").unwrap();
    assert!(env.layout.get_segments().unwrap().is_some());
    env.layout.set_text("xyz").unwrap();
    assert_eq!(env.layout.get_segments().unwrap(), None);
    assert_eq!(env.layout.get_segments_chars().unwrap(), None);
}
