// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host resolution inside free-form proxy address strings.
//!
//! An outbound proxy is configured as a string shaped like
//! `sips:host:443;transport=TLS`. When the host must be replaced with a
//! resolved or synthesized literal, everything around it (scheme, user,
//! port, parameters) is preserved byte for byte. Invoked once per proxy
//! configuration change, not per message.

use std::net::Ipv6Addr;

use smol_str::SmolStr;
use tracing::debug;

use crate::resolver::AddressResolver;

/// Lossless decomposition of a proxy string around its host substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyAddress {
    /// Everything before the host (scheme and optional user part).
    pub prefix: SmolStr,
    /// The host substring, without brackets.
    pub host: SmolStr,
    /// Everything after the host (port and parameters), verbatim.
    pub suffix: SmolStr,
}

impl ProxyAddress {
    /// Splits a proxy string into prefix, host, and suffix.
    ///
    /// The host starts after the user separator `@` or, failing that,
    /// after the scheme separator `:`. It ends at the closing bracket of a
    /// bracketed IPv6 literal, else at the port separator `:`, else at the
    /// first parameter separator `;`, else at the end of the string.
    /// Returns `None` when no address portion can be located; that is not
    /// an error, just nothing to rewrite.
    pub fn parse(input: &str) -> Option<Self> {
        let start = match input.find('@') {
            Some(at) => at + 1,
            None => input.find(':')? + 1,
        };
        let rest = &input[start..];
        if rest.is_empty() {
            return None;
        }

        let (host, consumed) = if let Some(inner) = rest.strip_prefix('[') {
            let close = inner.find(']')?;
            (&inner[..close], close + 2)
        } else {
            let end = rest.find(':').or_else(|| rest.find(';')).unwrap_or(rest.len());
            (&rest[..end], end)
        };
        if host.is_empty() {
            return None;
        }

        Some(Self {
            prefix: SmolStr::new(&input[..start]),
            host: SmolStr::new(host),
            suffix: SmolStr::new(&rest[consumed..]),
        })
    }

    /// Reassembles the proxy string with `host` in place of the original
    /// host substring, bracketing IPv6 literals.
    pub fn assemble(&self, host: &str) -> SmolStr {
        if host.parse::<Ipv6Addr>().is_ok() {
            SmolStr::new(format!("{}[{}]{}", self.prefix, host, self.suffix))
        } else {
            SmolStr::new(format!("{}{}{}", self.prefix, host, self.suffix))
        }
    }
}

/// Resolves the host inside a proxy string and returns the reassembled
/// string.
///
/// `None` means no address portion was found and the string is the
/// caller's to use unchanged. An unresolvable host reassembles with the
/// original host substring, keeping the contract "replace if possible".
pub fn resolve_proxy_host(proxy: &str, resolver: &dyn AddressResolver) -> Option<SmolStr> {
    let parsed = ProxyAddress::parse(proxy)?;
    let records = resolver.resolve(parsed.host.as_str()).unwrap_or_default();
    match records.first() {
        Some(addr) => {
            let rewritten = parsed.assemble(&addr.to_string());
            debug!(proxy, rewritten = rewritten.as_str(), "proxy host resolved");
            Some(rewritten)
        }
        None => {
            debug!(proxy, "proxy host did not resolve, keeping it");
            Some(parsed.assemble(parsed.host.as_str()))
        }
    }
}

/// Extracts the host substring of a proxy string without resolving it.
pub fn extract_proxy_hostname(proxy: &str) -> Option<SmolStr> {
    ProxyAddress::parse(proxy).map(|parsed| parsed.host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::StaticResolver;

    #[test]
    fn parses_scheme_host_port_params() {
        let parsed = ProxyAddress::parse("sips:voice.example.com:443;transport=TLS").unwrap();
        assert_eq!(parsed.prefix.as_str(), "sips:");
        assert_eq!(parsed.host.as_str(), "voice.example.com");
        assert_eq!(parsed.suffix.as_str(), ":443;transport=TLS");
    }

    #[test]
    fn parses_bracketed_ipv6_host() {
        let parsed = ProxyAddress::parse("sips:[2001:db8::1]:443;transport=TLS").unwrap();
        assert_eq!(parsed.prefix.as_str(), "sips:");
        assert_eq!(parsed.host.as_str(), "2001:db8::1");
        assert_eq!(parsed.suffix.as_str(), ":443;transport=TLS");
    }

    #[test]
    fn parses_user_part_before_host() {
        let parsed = ProxyAddress::parse("sip:alice@proxy.example.com:5061").unwrap();
        assert_eq!(parsed.prefix.as_str(), "sip:alice@");
        assert_eq!(parsed.host.as_str(), "proxy.example.com");
        assert_eq!(parsed.suffix.as_str(), ":5061");
    }

    #[test]
    fn falls_back_to_parameter_separator_without_port() {
        let parsed = ProxyAddress::parse("sip:proxy.example.com;transport=udp").unwrap();
        assert_eq!(parsed.host.as_str(), "proxy.example.com");
        assert_eq!(parsed.suffix.as_str(), ";transport=udp");
    }

    #[test]
    fn bare_host_after_scheme() {
        let parsed = ProxyAddress::parse("sip:proxy.example.com").unwrap();
        assert_eq!(parsed.host.as_str(), "proxy.example.com");
        assert_eq!(parsed.suffix.as_str(), "");
    }

    #[test]
    fn string_without_address_is_not_found() {
        assert!(ProxyAddress::parse("proxy.example.com").is_none());
        assert!(ProxyAddress::parse("sip:").is_none());
    }

    #[test]
    fn resolve_replaces_host_with_bracketed_ipv6() {
        let resolver = StaticResolver::single("2001:db8::1".parse().unwrap());
        let rewritten =
            resolve_proxy_host("sips:voice.example.com:443;transport=TLS", &resolver).unwrap();
        assert_eq!(rewritten.as_str(), "sips:[2001:db8::1]:443;transport=TLS");
    }

    #[test]
    fn resolve_replaces_host_with_plain_ipv4() {
        let resolver = StaticResolver::single("198.51.100.3".parse().unwrap());
        let rewritten = resolve_proxy_host("sip:proxy.example.com:5060", &resolver).unwrap();
        assert_eq!(rewritten.as_str(), "sip:198.51.100.3:5060");
    }

    #[test]
    fn unresolvable_host_reassembles_unchanged() {
        let resolver = StaticResolver::empty();
        let rewritten =
            resolve_proxy_host("sips:voice.example.com:443;transport=TLS", &resolver).unwrap();
        assert_eq!(rewritten.as_str(), "sips:voice.example.com:443;transport=TLS");
    }

    #[test]
    fn extract_returns_raw_hostname() {
        assert_eq!(
            extract_proxy_hostname("sips:voice.example.com:443;transport=TLS").unwrap().as_str(),
            "voice.example.com"
        );
        assert_eq!(
            extract_proxy_hostname("sips:[2001:db8::1]:443").unwrap().as_str(),
            "2001:db8::1"
        );
        assert!(extract_proxy_hostname("no-address-here").is_none());
    }
}
