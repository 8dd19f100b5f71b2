// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Address-family rewriting of SDP-bearing message bodies.
//!
//! Both directions share one loop: find the next source-family token, emit
//! everything before it plus the opposite token, skip the token in the
//! source, copy the separating whitespace, extract the address literal up
//! to its line terminator, and emit the replacement literal. When no
//! further token exists the unprocessed tail is appended verbatim and the
//! rewrite is complete.
//!
//! The scan phase is read-only; output is assembled in a separate,
//! capacity-checked buffer. Any scan failure aborts the pass with the
//! furthest scanned offset and the caller keeps the original message.

use bytes::BytesMut;
use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::error::RewriteError;
use crate::family::AddressFamily;
use crate::resolver::{resolve_or_synthesize, AddressResolver};
use crate::scanner::Scanner;

/// Non-routable placeholder emitted in outgoing bodies when no mapped
/// address is configured. The peer cannot route media to it, which forces
/// latching onto the first arriving packets instead.
pub const UNROUTABLE_IPV4: &str = "192.168.1.1";

/// Rewrites every `IP4` token and the literal after it to `IP6`, resolving
/// each extracted literal through the oracle.
///
/// On success returns the rewritten buffer; on failure the input has not
/// been modified and the error carries the furthest scanned offset.
pub fn rewrite_ipv4_to_ipv6(
    buffer: &[u8],
    resolver: &dyn AddressResolver,
    max_size: usize,
) -> Result<BytesMut, RewriteError> {
    rewrite_tokens(buffer, AddressFamily::V4, max_size, |literal| {
        resolve_or_synthesize(resolver, literal, AddressFamily::V6)
    })
}

/// Rewrites every `IP6` token and the literal after it to `IP4`.
///
/// Emits `mapped_address` when configured (the externally visible address
/// of the active registration), otherwise [`UNROUTABLE_IPV4`].
pub fn rewrite_ipv6_to_ipv4(
    buffer: &[u8],
    mapped_address: Option<&str>,
    max_size: usize,
) -> Result<BytesMut, RewriteError> {
    let replacement = SmolStr::new(mapped_address.unwrap_or(UNROUTABLE_IPV4));
    rewrite_tokens(buffer, AddressFamily::V6, max_size, |_| replacement.clone())
}

fn rewrite_tokens<F>(
    buffer: &[u8],
    source: AddressFamily,
    max_size: usize,
    mut replace: F,
) -> Result<BytesMut, RewriteError>
where
    F: FnMut(&str) -> SmolStr,
{
    let token = source.token().as_bytes();
    let target = source.opposite().token().as_bytes();
    let lead = source.address_lead_bytes();

    let mut scanner = Scanner::new(buffer)?;
    let mut out = BytesMut::with_capacity(buffer.len() + 64);

    loop {
        let checkpoint = scanner.save();
        let Some(prefix) = scanner.find_literal(token) else {
            // No further tokens: rewriting is complete, keep the tail.
            scanner.restore(checkpoint);
            append_checked(&mut out, scanner.remaining(), max_size)?;
            break;
        };
        append_checked(&mut out, scanner.slice(prefix), max_size)?;
        append_checked(&mut out, target, max_size)?;
        scanner.scan_fixed(token.len())?;

        // Whitespace between token and literal rides through verbatim.
        let separator = scanner.scan_until_any_of(lead)?;
        append_checked(&mut out, scanner.slice(separator), max_size)?;

        let literal_span = scanner.scan_until_byte(b'\r')?;
        let literal = std::str::from_utf8(scanner.slice(literal_span))
            .map_err(|_| RewriteError::Syntax { offset: literal_span.start() })?;
        let replacement = replace(literal);
        trace!(literal, replacement = replacement.as_str(), "substituting address literal");
        append_checked(&mut out, replacement.as_bytes(), max_size)?;
    }

    debug!(
        from = source.token(),
        to = source.opposite().token(),
        old_len = buffer.len(),
        new_len = out.len(),
        "body rewritten"
    );
    Ok(out)
}

fn append_checked(out: &mut BytesMut, bytes: &[u8], max_size: usize) -> Result<(), RewriteError> {
    if out.len() + bytes.len() > max_size {
        return Err(RewriteError::OutOfBounds { limit: max_size });
    }
    out.extend_from_slice(bytes);
    Ok(())
}
