// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;

use crate::scanner::ScanError;

/// Failure of a single rewrite pass.
///
/// Every variant aborts only the pass in which it occurs; the caller keeps
/// the original buffer and the host pipeline continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteError {
    /// The scanner could not find an expected delimiter or token. Carries
    /// the furthest successfully scanned offset for diagnostics.
    Syntax { offset: usize },
    /// The rewritten message would exceed the configured maximum size.
    OutOfBounds { limit: usize },
    /// The message has no header/body separator.
    Framing,
    /// The new content-length value needs more characters than the existing
    /// field holds; the stale value is left in place.
    UnsupportedGrowth { have: usize, need: usize },
}

impl fmt::Display for RewriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteError::Syntax { offset } => {
                write!(f, "syntax error at offset {}, rewrite aborted", offset)
            }
            RewriteError::OutOfBounds { limit } => {
                write!(f, "rewritten message exceeds the {} byte limit", limit)
            }
            RewriteError::Framing => write!(f, "message has no header/body separator"),
            RewriteError::UnsupportedGrowth { have, need } => {
                write!(
                    f,
                    "content-length field holds {} characters but the new value needs {}",
                    have, need
                )
            }
        }
    }
}

impl std::error::Error for RewriteError {}

impl From<ScanError> for RewriteError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::EmptyBuffer => RewriteError::Syntax { offset: 0 },
            ScanError::Syntax { offset } => RewriteError::Syntax { offset },
            ScanError::OutOfBounds { offset, .. } => RewriteError::Syntax { offset },
        }
    }
}
