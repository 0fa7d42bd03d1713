// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[macro_use]
mod utils;

mod test_cursor;
mod test_segments;
