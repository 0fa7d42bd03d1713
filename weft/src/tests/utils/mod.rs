// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Expands to the name of the enclosing test function.
macro_rules! test_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            core::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = &name[..name.len() - 3];
        &name[name.rfind(':').map(|x| x + 1).unwrap_or(0)..]
    }};
}

mod env;

pub(crate) use env::{TestEnv, ADVANCE, LINE_HEIGHT};
