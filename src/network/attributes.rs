//! Boolean address attributes and embedded IPv4 extraction.

use std::net::Ipv4Addr;

use serde::Serialize;

use super::address::{Ipv6Prefix, ParsedAddress};
use super::classification::{ClassificationResult, MulticastScope};

const LINK_LOCAL: Ipv6Prefix = Ipv6Prefix::new(0xfe80 << 112, 10);
const MULTICAST: Ipv6Prefix = Ipv6Prefix::new(0xff00 << 112, 8);
const UNIQUE_LOCAL: Ipv6Prefix = Ipv6Prefix::new(0xfc00 << 112, 7);
const TEREDO: Ipv6Prefix = Ipv6Prefix::new(0x2001 << 112, 32);
const IPV4_MAPPED: Ipv6Prefix = Ipv6Prefix::new(0xffff << 32, 96);
const SIX_TO_FOUR: Ipv6Prefix = Ipv6Prefix::new(0x2002 << 112, 16);
const NAT64: Ipv6Prefix = Ipv6Prefix::new(0x0064_ff9b << 96, 96);

/// Yes/no properties of an address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AddressAttributes {
    pub link_local: bool,
    pub multicast: bool,
    pub loopback: bool,
    pub unique_local: bool,
    pub unspecified: bool,
    pub teredo: bool,
    pub ipv4_mapped: bool,
    pub six_to_four: bool,
    /// Typed exactly in the fully expanded form.
    pub canonical: bool,
    /// Typed exactly in the RFC 5952 compressed form.
    pub correct_form: bool,
}

impl AddressAttributes {
    pub fn derive(parsed: &ParsedAddress, classification: &ClassificationResult) -> Self {
        let value = parsed.integer_value;
        let link_local_multicast = classification
            .multicast_details
            .is_some_and(|m| m.scope == MulticastScope::LinkLocal);
        let typed = parsed.address.to_ascii_lowercase();

        Self {
            link_local: LINK_LOCAL.contains_address(value) || link_local_multicast,
            multicast: MULTICAST.contains_address(value),
            loopback: value == 1,
            unique_local: UNIQUE_LOCAL.contains_address(value),
            unspecified: value == 0,
            teredo: TEREDO.contains_address(value),
            ipv4_mapped: IPV4_MAPPED.contains_address(value),
            six_to_four: SIX_TO_FOUR.contains_address(value),
            canonical: parsed.address == parsed.fully_expanded_form,
            correct_form: typed == parsed.normalized_form && parsed.address == typed,
        }
    }
}

/// Where an IPv4 address embedded in an IPv6 address came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddedIpv4 {
    Mapped(Ipv4Addr),
    Nat64(Ipv4Addr),
    SixToFour(Ipv4Addr),
    Teredo { server: Ipv4Addr, client: Ipv4Addr },
}

impl EmbeddedIpv4 {
    /// Extract the IPv4 address carried by a transition-mechanism prefix.
    pub fn extract(value: u128) -> Option<Self> {
        if IPV4_MAPPED.contains_address(value) {
            Some(EmbeddedIpv4::Mapped(low_ipv4(value)))
        } else if NAT64.contains_address(value) {
            Some(EmbeddedIpv4::Nat64(low_ipv4(value)))
        } else if SIX_TO_FOUR.contains_address(value) {
            Some(EmbeddedIpv4::SixToFour(Ipv4Addr::from((value >> 80) as u32)))
        } else if TEREDO.contains_address(value) {
            // Client address is stored obfuscated (bitwise inverted)
            Some(EmbeddedIpv4::Teredo {
                server: Ipv4Addr::from((value >> 64) as u32),
                client: Ipv4Addr::from(!(value as u32)),
            })
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EmbeddedIpv4::Mapped(_) => "IPv4-Mapped",
            EmbeddedIpv4::Nat64(_) => "NAT64",
            EmbeddedIpv4::SixToFour(_) => "6to4",
            EmbeddedIpv4::Teredo { .. } => "Teredo",
        }
    }
}

impl std::fmt::Display for EmbeddedIpv4 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbeddedIpv4::Mapped(ip) | EmbeddedIpv4::Nat64(ip) | EmbeddedIpv4::SixToFour(ip) => {
                write!(f, "{}", ip)
            }
            EmbeddedIpv4::Teredo { server, client } => {
                write!(f, "server {}, client {}", server, client)
            }
        }
    }
}

fn low_ipv4(value: u128) -> Ipv4Addr {
    Ipv4Addr::from(value as u32)
}

/// Short note for prefix lengths with a conventional meaning.
pub fn prefix_length_note(prefix_length: u8) -> Option<&'static str> {
    match prefix_length {
        128 => Some("Single Host"),
        64 => Some("Standard LAN"),
        48 => Some("Standard Site"),
        32 => Some("ISP Block"),
        _ => None,
    }
}

/// `Single Host` for a /128, otherwise `Network Subnet`.
pub fn structure_label(parsed: &ParsedAddress) -> &'static str {
    if parsed.is_single_host() {
        "Single Host"
    } else {
        "Network Subnet"
    }
}
