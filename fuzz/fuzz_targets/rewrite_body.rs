// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![no_main]
use libfuzzer_sys::fuzz_target;
use sip_nat64::{rewrite_ipv4_to_ipv6, rewrite_ipv6_to_ipv4, StaticResolver, DEFAULT_MAX_MESSAGE_SIZE};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > 8192 {
        return;
    }
    let resolver = StaticResolver::single("2001:db8::1".parse().unwrap());
    // Rewriting must either succeed or return an error, never panic, and
    // never produce output beyond the configured bound.
    if let Ok(out) = rewrite_ipv4_to_ipv6(data, &resolver, DEFAULT_MAX_MESSAGE_SIZE) {
        assert!(out.len() <= DEFAULT_MAX_MESSAGE_SIZE);
    }
    if let Ok(out) = rewrite_ipv6_to_ipv4(data, None, DEFAULT_MAX_MESSAGE_SIZE) {
        assert!(out.len() <= DEFAULT_MAX_MESSAGE_SIZE);
    }
});
