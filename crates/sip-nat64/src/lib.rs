// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! NAT64/DNS64 traversal helpers for SIP signaling.
//!
//! When a signaling message crosses an IPv4-only/IPv6-only boundary, the
//! address-family tokens (`IP4`/`IP6`) and address literals embedded in its
//! SDP body must be translated to the family usable on the other side, and
//! the `Content-Length` framing kept consistent with the rewritten body.
//! This crate provides:
//! - **Scanner**: a forward-only cursor with save/restore checkpoints over
//!   the raw message text ([`Scanner`])
//! - **Body rewriting**: [`rewrite_ipv4_to_ipv6`] for incoming and
//!   [`rewrite_ipv6_to_ipv4`] for outgoing INVITE traffic
//! - **Length recalculation**: [`body_length`] and the width-preserving
//!   in-place [`patch_content_length`]
//! - **Header rewriting**: host substitution on already-parsed
//!   contact/route fields ([`rewrite_address_headers`])
//! - **Proxy resolution**: [`resolve_proxy_host`] /
//!   [`extract_proxy_hostname`] for outbound proxy strings
//! - **Hook points**: [`on_rx_message`] / [`on_tx_message`] for the
//!   embedding stack's message pipeline, driven by [`Nat64Config`]
//!
//! Rewriting is copy-based and bounded: a failed pass leaves the original
//! message untouched and is reported through `tracing`, never as a failure
//! of the host pipeline. Address resolution is delegated to an
//! [`AddressResolver`] oracle; a DNS64-capable resolver makes incoming
//! IPv4 literals come back as synthesized IPv6 addresses.
//!
//! # Example
//! ```
//! use sip_nat64::{rewrite_ipv4_to_ipv6, StaticResolver, DEFAULT_MAX_MESSAGE_SIZE};
//!
//! let resolver = StaticResolver::single("2001:db8::cafe".parse().unwrap());
//! let body = b"c=IN IP4 203.0.113.5\r\n";
//! let rewritten = rewrite_ipv4_to_ipv6(body, &resolver, DEFAULT_MAX_MESSAGE_SIZE).unwrap();
//! assert_eq!(rewritten.as_ref(), b"c=IN IP6 2001:db8::cafe\r\n");
//! ```

pub mod body;
pub mod content_length;
pub mod error;
pub mod family;
pub mod headers;
pub mod module;
pub mod msg;
pub mod proxy;
pub mod resolver;
pub mod scanner;

pub use body::{rewrite_ipv4_to_ipv6, rewrite_ipv6_to_ipv4, UNROUTABLE_IPV4};
pub use content_length::{body_length, patch_content_length};
pub use error::RewriteError;
pub use family::AddressFamily;
pub use headers::{rewrite_address_headers, rewrite_host, rewrite_host_field};
pub use module::{on_rx_message, on_tx_message, HookStatus, Nat64Config, RewriteOptions};
pub use msg::{AddrField, InboundMessage, OutboundMessage};
pub use proxy::{extract_proxy_hostname, resolve_proxy_host, ProxyAddress};
pub use resolver::{resolve_or_synthesize, AddressResolver, StaticResolver, SystemResolver};
pub use scanner::{Checkpoint, ScanError, Scanner, Span};

/// Upper bound for a rewritten message when the embedding application does
/// not configure one.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024;
