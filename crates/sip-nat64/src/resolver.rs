// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolve-or-synthesize oracle consumed by the rewrite components.
//!
//! The rewrite core treats name resolution as a black box: an oracle that
//! turns a hostname or literal address into zero or more address records,
//! each tagged with its family. Behind a DNS64-capable resolver, lookups
//! for IPv4-only destinations come back with synthesized IPv6 records,
//! which is what makes inbound rewriting produce reachable addresses.

use std::collections::BTreeMap;
use std::net::IpAddr;

use anyhow::Result;
use smol_str::SmolStr;
use tracing::{debug, warn};
use trust_dns_resolver::Resolver;

use crate::family::AddressFamily;

/// Name-resolution oracle.
///
/// Resolution happens synchronously on the message hot path, mirroring the
/// blocking lookup the embedding stack performs; callers needing bounded
/// latency wrap the oracle externally.
pub trait AddressResolver: Send + Sync {
    fn resolve(&self, host: &str) -> Result<Vec<IpAddr>>;
}

/// Resolves `host` and returns a literal of the requested family.
///
/// Falls back to the input unchanged when resolution fails, yields no
/// records, or yields only records of another family. A single
/// unresolvable address never fails the surrounding rewrite; the condition
/// is logged and the original literal rides through.
pub fn resolve_or_synthesize(
    resolver: &dyn AddressResolver,
    host: &str,
    target: AddressFamily,
) -> SmolStr {
    let records = match resolver.resolve(host) {
        Ok(records) => records,
        Err(err) => {
            warn!(host, error = %err, "address resolution failed, keeping original literal");
            return SmolStr::new(host);
        }
    };
    if records.is_empty() {
        warn!(host, "resolver returned no records, keeping original literal");
        return SmolStr::new(host);
    }
    match records.iter().find(|addr| target.matches(addr)) {
        Some(addr) => {
            let literal = SmolStr::new(addr.to_string());
            debug!(host, family = target.token(), literal = literal.as_str(), "resolved replacement literal");
            literal
        }
        None => {
            warn!(
                host,
                family = target.token(),
                "no record of the requested family, keeping original literal"
            );
            SmolStr::new(host)
        }
    }
}

/// Oracle backed by the system resolver configuration.
///
/// Numeric literals are returned as-is. Synthesized records (DNS64-style
/// embedding of IPv4-only destinations) are the configured DNS service's
/// responsibility, not this adapter's.
pub struct SystemResolver {
    inner: Resolver,
}

impl SystemResolver {
    /// Creates a resolver from the system DNS configuration.
    pub fn from_system() -> Result<Self> {
        Ok(Self { inner: Resolver::from_system_conf()? })
    }
}

impl AddressResolver for SystemResolver {
    fn resolve(&self, host: &str) -> Result<Vec<IpAddr>> {
        if let Ok(addr) = host.parse::<IpAddr>() {
            return Ok(vec![addr]);
        }
        let lookup = self.inner.lookup_ip(host)?;
        Ok(lookup.iter().collect())
    }
}

/// Oracle for tests returning pre-configured records.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    default: Vec<IpAddr>,
    by_host: BTreeMap<SmolStr, Vec<IpAddr>>,
}

impl StaticResolver {
    /// Answers every lookup with the same records.
    pub fn new(records: Vec<IpAddr>) -> Self {
        Self { default: records, by_host: BTreeMap::new() }
    }

    /// Answers every lookup with a single record.
    pub fn single(addr: IpAddr) -> Self {
        Self::new(vec![addr])
    }

    /// Answers nothing, for exercising the fallback paths.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Adds a per-host answer consulted before the default records.
    pub fn with_mapping(mut self, host: impl Into<SmolStr>, records: Vec<IpAddr>) -> Self {
        self.by_host.insert(host.into(), records);
        self
    }
}

impl AddressResolver for StaticResolver {
    fn resolve(&self, host: &str) -> Result<Vec<IpAddr>> {
        if let Some(records) = self.by_host.get(host) {
            return Ok(records.clone());
        }
        Ok(self.default.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesizes_requested_family() {
        let resolver = StaticResolver::new(vec![
            "192.0.2.7".parse().unwrap(),
            "2001:db8::7".parse().unwrap(),
        ]);
        let literal = resolve_or_synthesize(&resolver, "host.example.com", AddressFamily::V6);
        assert_eq!(literal.as_str(), "2001:db8::7");
        let literal = resolve_or_synthesize(&resolver, "host.example.com", AddressFamily::V4);
        assert_eq!(literal.as_str(), "192.0.2.7");
    }

    #[test]
    fn empty_resolution_keeps_input() {
        let resolver = StaticResolver::empty();
        let literal = resolve_or_synthesize(&resolver, "203.0.113.5", AddressFamily::V6);
        assert_eq!(literal.as_str(), "203.0.113.5");
    }

    #[test]
    fn family_mismatch_keeps_input() {
        let resolver = StaticResolver::single("192.0.2.9".parse().unwrap());
        let literal = resolve_or_synthesize(&resolver, "203.0.113.5", AddressFamily::V6);
        assert_eq!(literal.as_str(), "203.0.113.5");
    }

    #[test]
    fn per_host_mapping_beats_default() {
        let resolver = StaticResolver::single("2001:db8::1".parse().unwrap())
            .with_mapping("a.example.com", vec!["2001:db8::a".parse().unwrap()]);
        let literal = resolve_or_synthesize(&resolver, "a.example.com", AddressFamily::V6);
        assert_eq!(literal.as_str(), "2001:db8::a");
        let literal = resolve_or_synthesize(&resolver, "b.example.com", AddressFamily::V6);
        assert_eq!(literal.as_str(), "2001:db8::1");
    }
}
