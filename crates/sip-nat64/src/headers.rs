// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host substitution on already-parsed address headers.
//!
//! No text scanning happens here: the embedding stack has parsed the
//! contact/route headers into structured fields, so the contract is read
//! the host sub-field, resolve it, write the new host back, and leave
//! every other sub-field untouched.

use smol_str::SmolStr;
use tracing::debug;

use crate::family::AddressFamily;
use crate::msg::{AddrField, InboundMessage};
use crate::resolver::{resolve_or_synthesize, AddressResolver};

/// Replaces the host sub-field of one parsed address header.
///
/// Returns `true` when the host changed; an unresolvable host leaves the
/// field as it was.
pub fn rewrite_host_field(
    field: &mut AddrField,
    resolver: &dyn AddressResolver,
    target: AddressFamily,
) -> bool {
    let resolved = resolve_or_synthesize(resolver, field.host.as_str(), target);
    if resolved == field.host {
        return false;
    }
    debug!(old = field.host.as_str(), new = resolved.as_str(), "address header host rewritten");
    field.host = resolved;
    true
}

/// Rewrites the contact and route hosts of an inbound message so that
/// follow-up requests in the dialog (ACK, BYE) target a reachable
/// transport address. Returns the number of fields that changed.
pub fn rewrite_address_headers(
    msg: &mut InboundMessage,
    resolver: &dyn AddressResolver,
    target: AddressFamily,
) -> usize {
    let mut rewritten = 0;
    if let Some(contact) = msg.contact.as_mut() {
        if rewrite_host_field(contact, resolver, target) {
            rewritten += 1;
        }
    }
    for route in msg.routes.iter_mut() {
        if rewrite_host_field(route, resolver, target) {
            rewritten += 1;
        }
    }
    rewritten
}

/// Convenience wrapper for callers holding a bare host string.
pub fn rewrite_host(
    host: &mut SmolStr,
    resolver: &dyn AddressResolver,
    target: AddressFamily,
) -> bool {
    let resolved = resolve_or_synthesize(resolver, host.as_str(), target);
    if resolved == *host {
        return false;
    }
    *host = resolved;
    true
}
