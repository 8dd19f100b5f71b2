// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hook points for the embedding stack's message pipeline.
//!
//! The host invokes [`on_rx_message`] once per received message and
//! [`on_tx_message`] once per message about to be sent. Only INVITE
//! transactions (the initial request and its responses) are considered;
//! everything else passes through untouched. Both hooks always report
//! [`HookStatus::Continue`]: a failed rewrite is logged and contained,
//! never surfaced as a pipeline failure.
//!
//! Configuration is an explicit value owned by the embedding application,
//! read-only for the duration of a hook call and updated only between
//! messages.

use smol_str::SmolStr;
use tracing::{debug, error, warn};

use crate::body;
use crate::content_length;
use crate::error::RewriteError;
use crate::family::AddressFamily;
use crate::headers;
use crate::msg::{InboundMessage, OutboundMessage};
use crate::resolver::AddressResolver;
use crate::DEFAULT_MAX_MESSAGE_SIZE;

/// Pipeline verdict returned by the hook points. Rewriting never
/// terminates message processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStatus {
    Continue,
}

/// Independently togglable rewrite behaviors. All disabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewriteOptions {
    /// Replace IPv6 addresses in outgoing SDP with IPv4.
    pub outgoing_sdp: bool,
    /// Replace IPv4 addresses in incoming SDP with IPv6.
    pub incoming_sdp: bool,
    /// Rewrite the parsed Contact/Route hosts of incoming INVITE traffic
    /// so ACK and BYE use a reachable transport target.
    pub route_and_contact: bool,
}

impl RewriteOptions {
    /// Enables every behavior; what most NAT64 deployments want.
    pub fn all() -> Self {
        Self { outgoing_sdp: true, incoming_sdp: true, route_and_contact: true }
    }
}

/// Per-call configuration owned by the embedding application.
#[derive(Debug, Clone)]
pub struct Nat64Config {
    pub options: RewriteOptions,
    /// Externally visible IPv4 address of the active registration,
    /// preferred over the latching placeholder in outgoing SDP.
    pub mapped_address: Option<SmolStr>,
    /// Upper bound for a rewritten message.
    pub max_message_size: usize,
}

impl Default for Nat64Config {
    fn default() -> Self {
        Self {
            options: RewriteOptions::default(),
            mapped_address: None,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl Nat64Config {
    pub fn with_options(options: RewriteOptions) -> Self {
        Self { options, ..Self::default() }
    }
}

/// Inbound hook: rewrites IPv4 SDP to IPv6 and, when enabled, the parsed
/// contact/route hosts. On success the buffer is committed, the
/// content-length patched, and the transport counters updated; on failure
/// the message is left exactly as received.
pub fn on_rx_message(
    config: &Nat64Config,
    resolver: &dyn AddressResolver,
    msg: &mut InboundMessage,
) -> HookStatus {
    if !msg.is_invite() {
        return HookStatus::Continue;
    }
    if config.options.incoming_sdp {
        match body::rewrite_ipv4_to_ipv6(&msg.buffer, resolver, config.max_message_size) {
            Ok(mut rewritten) => {
                match content_length::patch_content_length(&mut rewritten) {
                    Ok(len) => msg.body_len = len,
                    Err(err @ RewriteError::UnsupportedGrowth { .. }) => {
                        warn!(%err, "content-length left stale after inbound rewrite");
                        if let Ok(len) = content_length::body_length(&rewritten) {
                            msg.body_len = len;
                        }
                    }
                    Err(err) => {
                        error!(%err, "content-length could not be located after inbound rewrite");
                    }
                }
                msg.packet_len = rewritten.len();
                msg.last_recv_len = rewritten.len();
                msg.buffer = rewritten;
                debug!(len = msg.packet_len, "inbound message rewritten for ipv6");
            }
            Err(err) => {
                error!(%err, "inbound rewrite failed, message left unmodified");
            }
        }
    }
    if config.options.route_and_contact {
        let rewritten = headers::rewrite_address_headers(msg, resolver, AddressFamily::V6);
        if rewritten > 0 {
            debug!(fields = rewritten, "inbound address headers rewritten");
        }
    }
    HookStatus::Continue
}

/// Outbound hook: rewrites IPv6 SDP to IPv4, preferring the configured
/// mapped address over the latching placeholder. On failure the message
/// is sent as serialized.
pub fn on_tx_message(config: &Nat64Config, msg: &mut OutboundMessage) -> HookStatus {
    if !msg.is_invite() || !config.options.outgoing_sdp {
        return HookStatus::Continue;
    }
    match body::rewrite_ipv6_to_ipv4(
        &msg.buffer,
        config.mapped_address.as_deref(),
        config.max_message_size,
    ) {
        Ok(mut rewritten) => {
            match content_length::patch_content_length(&mut rewritten) {
                Ok(_) => {}
                Err(err @ RewriteError::UnsupportedGrowth { .. }) => {
                    warn!(%err, "content-length left stale after outbound rewrite");
                }
                Err(err) => {
                    error!(%err, "content-length could not be located after outbound rewrite");
                }
            }
            msg.buffer = rewritten;
            debug!(len = msg.buffer.len(), "outbound message rewritten for ipv4");
        }
        Err(err) => {
            error!(%err, "outbound rewrite failed, message left unmodified");
        }
    }
    HookStatus::Continue
}
