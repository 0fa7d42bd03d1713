// Copyright 2026 the Weft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::font::FontId;

/// Error type for text layout operations.
///
/// Carries a non-exhaustive [`ErrorKind`] plus a short description of what
/// was rejected and, when relevant, the offending value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// The non-exhaustive category describing this error.
    kind: ErrorKind,

    /// What the caller supplied (or what the engine needed) that failed.
    what: &'static str,

    /// The offending value, for range and argument errors.
    value: Option<i64>,

    /// The font that could not be used, for resource errors.
    font: Option<FontId>,
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// A short description of the rejected argument or missing resource.
    pub fn what(&self) -> &'static str {
        self.what
    }

    /// The offending value, if the error concerns a numeric argument.
    pub fn value(&self) -> Option<i64> {
        self.value
    }

    /// The font handle that could not be resolved, if any.
    pub fn font(&self) -> Option<FontId> {
        self.font
    }

    pub(crate) fn invalid_argument(what: &'static str, value: impl TryInto<i64>) -> Self {
        Self {
            kind: ErrorKind::InvalidArgument,
            what,
            value: value.try_into().ok(),
            font: None,
        }
    }

    pub(crate) fn invalid_configuration(what: &'static str) -> Self {
        Self {
            kind: ErrorKind::InvalidConfiguration,
            what,
            value: None,
            font: None,
        }
    }

    pub(crate) fn resource_unavailable(what: &'static str, font: Option<FontId>) -> Self {
        Self {
            kind: ErrorKind::ResourceUnavailable,
            what,
            value: None,
            font,
        }
    }

    pub(crate) fn disposed() -> Self {
        Self {
            kind: ErrorKind::Disposed,
            what: "text layout",
            value: None,
            font: None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::InvalidArgument => match self.value {
                Some(value) => write!(f, "invalid argument: {} ({value})", self.what),
                None => write!(f, "invalid argument: {}", self.what),
            },
            ErrorKind::InvalidConfiguration => write!(f, "invalid configuration: {}", self.what),
            ErrorKind::ResourceUnavailable => match self.font {
                Some(font) => write!(f, "{} unavailable: font {}", self.what, font.get()),
                None => write!(f, "{} unavailable", self.what),
            },
            ErrorKind::Disposed => write!(f, "{} has been disposed", self.what),
        }
    }
}

impl core::error::Error for Error {}

/// Classification of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A required argument was missing or an offset, index or length was
    /// outside of the representable range.
    InvalidArgument,
    /// A segment or tab stop list was malformed.
    InvalidConfiguration,
    /// A referenced font has been released, or no default font exists.
    ResourceUnavailable,
    /// The layout has been disposed.
    Disposed,
}
