// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![no_main]
use libfuzzer_sys::fuzz_target;
use sip_nat64::patch_content_length;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > 8192 {
        return;
    }
    let mut buffer = data.to_vec();
    // The patch must never move bytes: only the content-length value span
    // may change, and the buffer length is invariant.
    let before_len = buffer.len();
    let _ = patch_content_length(&mut buffer);
    assert_eq!(buffer.len(), before_len);
});
