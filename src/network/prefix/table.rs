//! Compiled-in knowledge base of IANA special-purpose and well-known IPv6
//! prefixes. Entry order is significant: it breaks ties between equally
//! specific matches and orders the reference listing.

use lazy_static::lazy_static;

use super::types::AddressType::{self, *};
use super::types::Category::{self, *};
use super::types::KnownPrefixEntry;
use crate::network::address::Ipv6Prefix;

const fn known(
    prefix: &'static str,
    name: &'static str,
    description: &'static str,
    rfc_reference: &'static str,
    category: Category,
    address_type: AddressType,
) -> KnownPrefixEntry {
    KnownPrefixEntry {
        prefix,
        name,
        description,
        rfc_reference,
        category,
        address_type,
    }
}

pub static KNOWN_PREFIXES: &[KnownPrefixEntry] = &[
    // Unspecified & Loopback
    known(
        "::/128",
        "Unspecified Address",
        "The address :: indicates the absence of an address. It is used by a device while it is initializing and has not yet acquired a valid address.",
        "RFC 4291",
        CommonAndDocumentation,
        Unspecified,
    ),
    known(
        "::1/128",
        "Loopback Address",
        "The address ::1 is used by a node to send packets to itself. It is treated as having Link-Local scope and is never sent on a physical link.",
        "RFC 4291",
        CommonAndDocumentation,
        Loopback,
    ),
    // Documentation
    known(
        "2001:db8::/32",
        "Documentation Prefix (Standard)",
        "Addresses in this block are reserved for use in documentation and example code. They should never be used in a production network.",
        "RFC 3849",
        CommonAndDocumentation,
        Unicast,
    ),
    known(
        "2001:db8::1/128",
        "Documentation Example",
        "A specific example address within the standard documentation prefix.",
        "RFC 3849",
        CommonAndDocumentation,
        Unicast,
    ),
    known(
        "3fff::/20",
        "Documentation Prefix (Expanded)",
        "An additional block reserved for documentation purposes, allowing for larger example topologies.",
        "RFC 9637 (July 2024)",
        CommonAndDocumentation,
        Unicast,
    ),
    // Special & Reserved Prefixes
    known(
        "100::/64",
        "Discard Prefix",
        "A prefix reserved for use in discarding (dropping) packets. It is used for remotely triggered black hole filtering.",
        "RFC 6666",
        SpecialAndReserved,
        Unicast,
    ),
    known(
        "64:ff9b::/96",
        "NAT64 Well-Known Prefix",
        "Used for synthesizing IPv6 addresses from IPv4 addresses in NAT64 translation (IPv6-only client to IPv4-only server).",
        "RFC 6052",
        SpecialAndReserved,
        Unicast,
    ),
    known(
        "64:ff9b:1::/48",
        "Local-Use NAT64",
        "Reserved for Local-Use IPv4/IPv6 Translation. Similar to the well-known prefix but for local deployments.",
        "RFC 8215",
        SpecialAndReserved,
        Unicast,
    ),
    known(
        "2001::/23",
        "IETF Protocol Assignments",
        "Block for special protocol assignments.",
        "RFC 2928",
        SpecialAndReserved,
        Unicast,
    ),
    known(
        "2001:1::1/128",
        "Port Control Protocol (PCP) Anycast",
        "Anycast address for the Port Control Protocol (PCP), allowing clients to control how upstream NATs/firewalls handle their traffic.",
        "RFC 7723",
        SpecialAndReserved,
        Anycast,
    ),
    known(
        "2001:1::2/128",
        "TURN Anycast",
        "Anycast address for Traversal Using Relays around NAT (TURN), used for discovering TURN servers.",
        "RFC 8155",
        SpecialAndReserved,
        Anycast,
    ),
    known(
        "2001:1::3/128",
        "DNS-SD SRP Anycast",
        "Anycast address for DNS-Based Service Discovery (DNS-SD) Service Registration Protocol (SRP).",
        "RFC 9665 (April 2024)",
        SpecialAndReserved,
        Anycast,
    ),
    known(
        "2001:2::/48",
        "Benchmarking",
        "Reserved for use in network performance benchmarking documentation and testing (BMWG).",
        "RFC 5180",
        SpecialAndReserved,
        Unicast,
    ),
    known(
        "2001:3::/32",
        "Automatic Multicast Tunneling (AMT)",
        "Reserved for Automatic Multicast Tunneling (AMT) relays and gateways.",
        "RFC 7450",
        SpecialAndReserved,
        Anycast,
    ),
    known(
        "2001:4:112::/48",
        "AS112-v6",
        "Used for Anycast sinking of reverse DNS queries for private networks to protect the root servers.",
        "RFC 7535",
        SpecialAndReserved,
        Anycast,
    ),
    known(
        "2001:5::/32",
        "EID Space",
        "Prefix for Locator/ID Separation Protocol (LISP) Endpoint ID (EID) space. Experimental.",
        "RFC 7954",
        SpecialAndReserved,
        Unicast,
    ),
    known(
        "2001:10::/28",
        "ORCHIDv2",
        "Overlay Routable Cryptographic Hash Identifiers (Generation 2). Used for cryptographic identifiers that look like IPv6 addresses (e.g. HIP).",
        "RFC 7343",
        SpecialAndReserved,
        Unicast,
    ),
    known(
        "2001:20::/28",
        "ORCHID (Legacy)",
        "Original ORCHID prefix. Deprecated in favor of ORCHIDv2.",
        "RFC 4843",
        SpecialAndReserved,
        Unicast,
    ),
    known(
        "2001:30::/28",
        "Drone Remote ID",
        "Drone Remote ID Protocol Entity Tags. Used for identification of drones/UAVs.",
        "RFC 9374",
        SpecialAndReserved,
        Unicast,
    ),
    known(
        "5f00::/16",
        "Segment Routing (SRv6) SIDs",
        "Block reserved for Segment Routing over IPv6 (SRv6) Segment Identifiers (SIDs).",
        "RFC 9602 (April 2024)",
        SpecialAndReserved,
        Unicast,
    ),
    // Transition
    known(
        "2002::/16",
        "6to4",
        "IPv4/IPv6 transition.",
        "RFC 3056",
        Transition,
        Unicast,
    ),
    known(
        "2001:0000::/32",
        "Teredo",
        "NAT traversal tunneling.",
        "RFC 4380",
        Transition,
        Unicast,
    ),
    known(
        "::ffff:0:0/96",
        "IPv4-Mapped",
        "Internal OS representation of IPv4.",
        "RFC 4291",
        Transition,
        Unicast,
    ),
    known(
        "::/96",
        "IPv4-Compatible",
        "Deprecated tunneling.",
        "RFC 4291 (Deprecated)",
        Transition,
        Unicast,
    ),
    // Local
    known(
        "fe80::/10",
        "Link-Local",
        "Single network segment communication.",
        "RFC 4291",
        Local,
        Unicast,
    ),
    known(
        "fc00::/7",
        "Unique Local (ULA)",
        "Private local network.",
        "RFC 4193",
        Local,
        Unicast,
    ),
    known(
        "fec0::/10",
        "Site-Local",
        "Deprecated site-wide addressing.",
        "RFC 3879 (Deprecated)",
        Local,
        Unicast,
    ),
    // Multicast: Basic
    known(
        "ff00::/8",
        "Multicast",
        "Identifier for a set of interfaces.",
        "RFC 4291",
        MulticastBasic,
        Multicast,
    ),
    known(
        "ff01::1/128",
        "All Nodes (Interface)",
        "Interface-Local loopback.",
        "RFC 4291",
        MulticastBasic,
        Multicast,
    ),
    known(
        "ff01::2/128",
        "All Routers (Interface)",
        "Interface-Local.",
        "RFC 4291",
        MulticastBasic,
        Multicast,
    ),
    known(
        "ff02::1/128",
        "All Nodes (Link)",
        "Reach all devices on wire.",
        "RFC 4291",
        MulticastBasic,
        Multicast,
    ),
    known(
        "ff02::2/128",
        "All Routers (Link)",
        "Reach all routers on wire.",
        "RFC 4291",
        MulticastBasic,
        Multicast,
    ),
    known(
        "ff05::2/128",
        "All Routers (Site)",
        "Reach all routers in site.",
        "RFC 4291",
        MulticastBasic,
        Multicast,
    ),
    // Multicast: IoT
    known(
        "ff02::fa/128",
        "All Matter Nodes (Link)",
        "Matter IoT Protocol.",
        "CSA",
        MulticastIot,
        Multicast,
    ),
    known(
        "ff05::fa/128",
        "All Matter Nodes (Site)",
        "Matter IoT Protocol.",
        "CSA",
        MulticastIot,
        Multicast,
    ),
    known(
        "ff02::fd/128",
        "All CoAP Nodes (Link)",
        "Constrained Application Protocol.",
        "RFC 7252",
        MulticastIot,
        Multicast,
    ),
    known(
        "ff05::fd/128",
        "All CoAP Nodes (Site)",
        "Constrained Application Protocol.",
        "RFC 7252",
        MulticastIot,
        Multicast,
    ),
    known(
        "ff02::fb/128",
        "mDNS",
        "Multicast DNS (Bonjour/Avahi).",
        "RFC 6762",
        MulticastIot,
        Multicast,
    ),
    known(
        "ff02::c/128",
        "SSDP",
        "Simple Service Discovery Protocol (UPnP).",
        "UPnP",
        MulticastIot,
        Multicast,
    ),
    known(
        "ff02::f/128",
        "UPnP",
        "Universal Plug and Play.",
        "UPnP",
        MulticastIot,
        Multicast,
    ),
    known(
        "ff02::1:3/128",
        "LLMNR",
        "Link-Local Multicast Name Resolution.",
        "RFC 4795",
        MulticastIot,
        Multicast,
    ),
    // Multicast: Routing
    known(
        "ff02::9/128",
        "RIPng Routers",
        "Routing Information Protocol.",
        "RFC 2080",
        MulticastRouting,
        Multicast,
    ),
    known(
        "ff02::a/128",
        "EIGRP Routers",
        "Enhanced Interior Gateway Routing Protocol.",
        "RFC 7868",
        MulticastRouting,
        Multicast,
    ),
    known(
        "ff02::d/128",
        "PIM Routers",
        "Protocol Independent Multicast.",
        "RFC 7761",
        MulticastRouting,
        Multicast,
    ),
    known(
        "ff02::5/128",
        "OSPFv3 All Routers",
        "Open Shortest Path First.",
        "RFC 5340",
        MulticastRouting,
        Multicast,
    ),
    known(
        "ff02::6/128",
        "OSPFv3 DRs",
        "OSPF Designated Routers.",
        "RFC 5340",
        MulticastRouting,
        Multicast,
    ),
    known(
        "ff02::4/128",
        "DVMRP Routers",
        "Distance Vector Multicast.",
        "RFC 1075",
        MulticastRouting,
        Multicast,
    ),
    known(
        "ff02::12/128",
        "VRRP",
        "Virtual Router Redundancy Protocol.",
        "RFC 5798",
        MulticastRouting,
        Multicast,
    ),
    known(
        "ff02::16/128",
        "MLDv2 Reports",
        "Multicast Listener Discovery.",
        "RFC 3810",
        MulticastRouting,
        Multicast,
    ),
    known(
        "ff02::1a/128",
        "RPL Nodes",
        "Routing Protocol for Low-Power Networks.",
        "RFC 6550",
        MulticastRouting,
        Multicast,
    ),
    known(
        "ff02::1:6/128",
        "Babel Routers",
        "Babel Routing Protocol.",
        "RFC 8966",
        MulticastRouting,
        Multicast,
    ),
    known(
        "ff02::6b/128",
        "PTP (Peer Delay)",
        "Precision Time Protocol.",
        "IEEE 1588",
        MulticastRouting,
        Multicast,
    ),
    known(
        "ff02::fc/128",
        "MPL Forwarders",
        "Multicast Protocol for Low-Power and Lossy Networks.",
        "RFC 7731",
        MulticastRouting,
        Multicast,
    ),
    known(
        "ff02::109/128",
        "HAIP",
        "High Availability IP.",
        "N/A",
        MulticastRouting,
        Multicast,
    ),
    // Multicast: Services
    known(
        "ff02::1:2/128",
        "DHCPv6 Agents",
        "All DHCPv6 Servers and Relays.",
        "RFC 3315",
        MulticastService,
        Multicast,
    ),
    known(
        "ff05::1:3/128",
        "DHCPv6 Servers",
        "Site-Local DHCPv6 Servers.",
        "RFC 3315",
        MulticastService,
        Multicast,
    ),
    known(
        "ff02::101/128",
        "NTP (Link)",
        "Network Time Protocol.",
        "RFC 5905",
        MulticastService,
        Multicast,
    ),
    known(
        "ff05::101/128",
        "NTP (Site)",
        "Network Time Protocol.",
        "RFC 5905",
        MulticastService,
        Multicast,
    ),
    known(
        "ff02::152/128",
        "CAPWAP (Control)",
        "Wireless Access Point Control.",
        "RFC 5415",
        MulticastService,
        Multicast,
    ),
    known(
        "ff02::cca/128",
        "CAPWAP (Discovery)",
        "Access Controller Discovery.",
        "RFC 5415",
        MulticastService,
        Multicast,
    ),
    known(
        "ff02::108/128",
        "NIS+",
        "Network Information Service Plus.",
        "RFC 3150",
        MulticastService,
        Multicast,
    ),
    known(
        "ff02::202/128",
        "Sun RPC",
        "Sun Remote Procedure Call.",
        "N/A",
        MulticastService,
        Multicast,
    ),
    known(
        "ff02::1:4/128",
        "DTCP",
        "Distributed Transport Control Protocol.",
        "RFC 3956",
        MulticastService,
        Multicast,
    ),
    // Special Multicast Types
    known(
        "ff02::1:ff00:0/104",
        "Solicited-Node",
        "Used by NDP for address resolution.",
        "RFC 4291",
        MulticastAdvanced,
        Multicast,
    ),
    known(
        "ff30::/12",
        "Unicast-Prefix-based",
        "Multicast derived from unicast prefix.",
        "RFC 3306",
        MulticastAdvanced,
        Multicast,
    ),
    known(
        "ff70::/12",
        "Embedded-RP",
        "Embeds Rendezvous Point address.",
        "RFC 3956",
        MulticastAdvanced,
        Multicast,
    ),
    // Anycast & Reserved IDs
    known(
        "fdff:ffff:ffff:fffe/128",
        "Mobile IPv6 HA Anycast",
        "Home Agent Anycast.",
        "RFC 2526",
        SpecialAndReserved,
        Anycast,
    ),
    known(
        "fdff:ffff:ffff:ff80/121",
        "Reserved Anycast",
        "Reserved Anycast Range Base.",
        "RFC 2526",
        SpecialAndReserved,
        Anycast,
    ),
    // Public DNS Examples
    known(
        "2001:4860:4860::8888/128",
        "Google Public DNS",
        "Public DNS.",
        "N/A",
        CommonAndDocumentation,
        Unicast,
    ),
    known(
        "2606:4700:4700::1111/128",
        "Cloudflare Public DNS",
        "Public DNS.",
        "N/A",
        CommonAndDocumentation,
        Unicast,
    ),
];

/// A table entry paired with its parsed block. `network` is `None` when the
/// published prefix text is not a valid CIDR; such entries stay searchable
/// but never match an address.
#[derive(Debug, Clone, Copy)]
pub struct CompiledEntry {
    pub entry: &'static KnownPrefixEntry,
    pub network: Option<Ipv6Prefix>,
}

lazy_static! {
    static ref COMPILED_PREFIXES: Vec<CompiledEntry> = compile(KNOWN_PREFIXES);
}

/// The knowledge base with every prefix parsed, built once per process.
pub fn compiled_prefixes() -> &'static [CompiledEntry] {
    &COMPILED_PREFIXES
}

pub(crate) fn compile(entries: &'static [KnownPrefixEntry]) -> Vec<CompiledEntry> {
    let compiled: Vec<CompiledEntry> = entries
        .iter()
        .map(|entry| {
            let network = match Ipv6Prefix::parse(entry.prefix) {
                Ok(network) => Some(network),
                Err(e) => {
                    tracing::warn!(
                        prefix = entry.prefix,
                        name = entry.name,
                        error = %e,
                        "known prefix is not a valid CIDR and will never match"
                    );
                    None
                }
            };
            CompiledEntry { entry, network }
        })
        .collect();

    tracing::debug!(
        entries = compiled.len(),
        matchable = compiled.iter().filter(|c| c.network.is_some()).count(),
        "compiled known prefix table"
    );
    compiled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        assert_eq!(KNOWN_PREFIXES.len(), 70);
        assert_eq!(compiled_prefixes().len(), KNOWN_PREFIXES.len());
    }

    #[test]
    fn test_only_interface_id_entries_are_unmatchable() {
        let unmatchable: Vec<&str> = compiled_prefixes()
            .iter()
            .filter(|c| c.network.is_none())
            .map(|c| c.entry.prefix)
            .collect();
        assert_eq!(
            unmatchable,
            vec!["fdff:ffff:ffff:fffe/128", "fdff:ffff:ffff:ff80/121"]
        );
    }

    #[test]
    fn test_declared_length_matches_parsed_length() {
        for compiled in compiled_prefixes() {
            if let Some(network) = compiled.network {
                assert_eq!(
                    network.length(),
                    compiled.entry.declared_length(),
                    "{}",
                    compiled.entry.prefix
                );
            }
        }
    }

    #[test]
    fn test_every_entry_has_text() {
        for entry in KNOWN_PREFIXES {
            assert!(!entry.name.is_empty());
            assert!(!entry.description.is_empty());
            assert!(!entry.rfc_reference.is_empty());
            assert!(!entry.description.contains('<'), "{}", entry.name);
        }
    }
}
