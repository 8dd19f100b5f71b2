// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::net::IpAddr;

/// IP address family of an SDP address-type token.
///
/// Every rewrite direction is defined as source family to target family;
/// [`AddressFamily::opposite`] gives the target for a given source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// The SDP address-type token for this family.
    pub fn token(&self) -> &'static str {
        match self {
            AddressFamily::V4 => "IP4",
            AddressFamily::V6 => "IP6",
        }
    }

    /// The family a rewrite away from this one translates into.
    pub fn opposite(&self) -> Self {
        match self {
            AddressFamily::V4 => AddressFamily::V6,
            AddressFamily::V6 => AddressFamily::V4,
        }
    }

    /// True when `addr` belongs to this family.
    pub fn matches(&self, addr: &IpAddr) -> bool {
        match self {
            AddressFamily::V4 => addr.is_ipv4(),
            AddressFamily::V6 => addr.is_ipv6(),
        }
    }

    /// Bytes an address literal of this family can start with, used to find
    /// the literal after its token while preserving the whitespace in
    /// between verbatim.
    pub(crate) fn address_lead_bytes(&self) -> &'static [u8] {
        match self {
            AddressFamily::V4 => b"0123456789",
            AddressFamily::V6 => b"0123456789abcdef",
        }
    }
}
