// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content-Length recomputation after a body rewrite.
//!
//! The body length is the byte count after the blank-line separator that
//! ends the headers. The numeric value in the `Content-Length` header is
//! patched in place when the new decimal fits the existing character span,
//! right-padded with spaces so the header line keeps its width and the
//! surrounding text never shifts. A value that has outgrown its field is
//! reported as [`RewriteError::UnsupportedGrowth`] and left stale.

use tracing::{debug, warn};

use crate::error::RewriteError;
use crate::scanner::Scanner;

const BODY_SEPARATOR: &[u8] = b"\r\n\r\n";
const CONTENT_LENGTH: &[u8] = b"Content-Length";
const DIGITS: &[u8] = b"0123456789";

/// Byte count of everything after the header/body separator.
///
/// A message without the separator has broken framing; that must never
/// happen for well-formed traffic and is reported as
/// [`RewriteError::Framing`] rather than a crash.
pub fn body_length(buffer: &[u8]) -> Result<usize, RewriteError> {
    match buffer.windows(BODY_SEPARATOR.len()).position(|w| w == BODY_SEPARATOR) {
        Some(pos) => Ok(buffer.len() - (pos + BODY_SEPARATOR.len())),
        None => Err(RewriteError::Framing),
    }
}

/// Patches the numeric value of the `Content-Length` header in place and
/// returns the new body length.
///
/// The buffer is left unchanged when the header cannot be located or the
/// new value needs more characters than the existing span holds.
pub fn patch_content_length(buffer: &mut [u8]) -> Result<usize, RewriteError> {
    let new_len = body_length(buffer)?;
    let digits = new_len.to_string();

    let value_span = {
        let mut scanner = Scanner::new(buffer)?;
        if scanner.find_literal(CONTENT_LENGTH).is_none() {
            return Err(RewriteError::Syntax { offset: scanner.pos() });
        }
        scanner.scan_fixed(CONTENT_LENGTH.len())?;
        scanner.scan_until_any_of(DIGITS)?;
        scanner.scan_until_byte(b'\r')?
    };

    if digits.len() > value_span.len() {
        warn!(
            have = value_span.len(),
            need = digits.len(),
            "content-length value outgrew its field, leaving it stale"
        );
        return Err(RewriteError::UnsupportedGrowth {
            have: value_span.len(),
            need: digits.len(),
        });
    }

    let field = &mut buffer[value_span.start()..value_span.end()];
    field.fill(b' ');
    field[..digits.len()].copy_from_slice(digits.as_bytes());
    debug!(new_len, "content-length patched in place");
    Ok(new_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_length_counts_bytes_after_separator() {
        assert_eq!(body_length(b"Content-Length: 4\r\n\r\nabcd").unwrap(), 4);
        assert_eq!(body_length(b"Content-Length: 0\r\n\r\n").unwrap(), 0);
    }

    #[test]
    fn missing_separator_is_a_framing_error() {
        assert_eq!(body_length(b"no separator here").unwrap_err(), RewriteError::Framing);
    }

    #[test]
    fn patch_keeps_field_width_when_value_fits() {
        let mut buffer = b"Content-Length: 4\r\n\r\nabcdef".to_vec();
        let len = patch_content_length(&mut buffer).unwrap();
        assert_eq!(len, 6);
        assert_eq!(&buffer, b"Content-Length: 6\r\n\r\nabcdef");
    }

    #[test]
    fn patch_pads_shrinking_value_with_spaces() {
        let mut buffer = b"Content-Length: 129\r\n\r\nshort body\r\n".to_vec();
        let len = patch_content_length(&mut buffer).unwrap();
        assert_eq!(len, 12);
        assert_eq!(&buffer, b"Content-Length: 12 \r\n\r\nshort body\r\n");
    }

    #[test]
    fn patch_is_stable_across_repeated_padding() {
        // A previously padded field keeps its original width.
        let mut buffer = b"Content-Length: 12 \r\n\r\nx\r\n".to_vec();
        let len = patch_content_length(&mut buffer).unwrap();
        assert_eq!(len, 3);
        assert_eq!(&buffer, b"Content-Length: 3  \r\n\r\nx\r\n");
    }

    #[test]
    fn growth_beyond_field_width_is_unsupported() {
        let mut buffer = b"Content-Length: 4\r\n\r\nabcdefghijkl".to_vec();
        let err = patch_content_length(&mut buffer).unwrap_err();
        assert_eq!(err, RewriteError::UnsupportedGrowth { have: 1, need: 2 });
        // Stale value left untouched.
        assert_eq!(&buffer, b"Content-Length: 4\r\n\r\nabcdefghijkl");
    }

    #[test]
    fn missing_header_is_a_syntax_error() {
        let mut buffer = b"Via: SIP/2.0/UDP host\r\n\r\nbody".to_vec();
        assert!(matches!(
            patch_content_length(&mut buffer),
            Err(RewriteError::Syntax { .. })
        ));
    }
}
