// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Facade over the host stack's message objects.
//!
//! The embedding signaling stack owns message parsing and transport; the
//! rewrite hooks only need the raw text buffer, the CSeq method that gates
//! rewriting, the parsed body-length attribute, and the transport counters
//! that must stay consistent after an inbound rewrite. All buffers are
//! owned by the caller and never retained past a single hook call.

use bytes::BytesMut;
use smol_str::SmolStr;

/// Host-bearing sub-fields of an address header (Contact, Route,
/// Record-Route) as parsed by the embedding stack.
///
/// Only `host` is ever rewritten; the remaining sub-fields ride along
/// untouched through a rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddrField {
    pub scheme: SmolStr,
    pub user: Option<SmolStr>,
    pub host: SmolStr,
    pub port: Option<u16>,
}

impl AddrField {
    pub fn new(scheme: impl Into<SmolStr>, host: impl Into<SmolStr>) -> Self {
        Self { scheme: scheme.into(), user: None, host: host.into(), port: None }
    }

    pub fn with_user(mut self, user: impl Into<SmolStr>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }
}

/// Received message handed to [`crate::on_rx_message`].
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Raw message text as received.
    pub buffer: BytesMut,
    /// Method from the parsed CSeq header, when present.
    pub cseq_method: Option<SmolStr>,
    /// Parsed body-length attribute, kept consistent with the text.
    pub body_len: usize,
    /// Packet length counter carried by the message object.
    pub packet_len: usize,
    /// Last received length recorded on the transport.
    pub last_recv_len: usize,
    /// Parsed Contact host field, when present.
    pub contact: Option<AddrField>,
    /// Parsed Route/Record-Route host fields, in header order.
    pub routes: Vec<AddrField>,
}

impl InboundMessage {
    /// Wraps a raw datagram, priming the counters from its length.
    pub fn from_raw(raw: impl Into<BytesMut>, cseq_method: Option<SmolStr>) -> Self {
        let buffer = raw.into();
        let len = buffer.len();
        Self {
            buffer,
            cseq_method,
            body_len: 0,
            packet_len: len,
            last_recv_len: len,
            contact: None,
            routes: Vec::new(),
        }
    }

    /// True when the message belongs to an INVITE transaction (the initial
    /// request or a response to it).
    pub fn is_invite(&self) -> bool {
        self.cseq_method
            .as_deref()
            .is_some_and(|method| method.eq_ignore_ascii_case("INVITE"))
    }
}

/// Message about to be sent, handed to [`crate::on_tx_message`].
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    /// Raw message text as serialized for the wire.
    pub buffer: BytesMut,
    /// Method from the parsed CSeq header, when present.
    pub cseq_method: Option<SmolStr>,
}

impl OutboundMessage {
    pub fn from_raw(raw: impl Into<BytesMut>, cseq_method: Option<SmolStr>) -> Self {
        Self { buffer: raw.into(), cseq_method }
    }

    /// True when the message belongs to an INVITE transaction.
    pub fn is_invite(&self) -> bool {
        self.cseq_method
            .as_deref()
            .is_some_and(|method| method.eq_ignore_ascii_case("INVITE"))
    }
}
