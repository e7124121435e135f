//! Network range and capacity arithmetic for CIDR blocks.

use alloy_primitives::U256;
use serde::Serialize;

use super::address::{ADDRESS_BITS, ParsedAddress, compress, expand};

/// Standard allocation boundaries used for subnet breakdowns.
pub const STANDARD_BOUNDARIES: [u8; 4] = [32, 48, 56, 64];

/// First and last address of a block plus its size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRange {
    pub prefix_length: u8,
    pub start: u128,
    pub end: u128,
    /// 2^(128 - prefix_length); needs more than 128 bits for /0.
    pub total_addresses: U256,
    pub subdivisions: Vec<Subdivision>,
}

impl NetworkRange {
    pub fn start_compressed(&self) -> String {
        compress(self.start)
    }

    pub fn start_expanded(&self) -> String {
        expand(self.start)
    }

    pub fn end_compressed(&self) -> String {
        compress(self.end)
    }

    pub fn end_expanded(&self) -> String {
        expand(self.end)
    }

    /// Whether the block covers more than one address.
    pub fn is_block(&self) -> bool {
        self.start != self.end
    }
}

/// How many standard-size subnets fit in a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subdivision {
    pub boundary: u8,
    #[serde(serialize_with = "serialize_decimal")]
    pub count: U256,
    pub label: &'static str,
    pub note: &'static str,
}

/// Capacity of a block without a concrete base address, used for the
/// reserved block an address falls in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockCapacity {
    pub prefix_length: u8,
    #[serde(serialize_with = "serialize_decimal")]
    pub total_addresses: U256,
    pub subdivisions: Vec<Subdivision>,
}

/// Compute the range covered by the parsed block.
pub fn compute_range(parsed: &ParsedAddress) -> NetworkRange {
    let prefix = parsed.prefix();
    NetworkRange {
        prefix_length: prefix.length(),
        start: prefix.first(),
        end: prefix.last(),
        total_addresses: address_count(prefix.length()),
        subdivisions: subdivisions(prefix.length()),
    }
}

/// Capacity breakdown for a block of the given prefix length.
pub fn block_capacity(prefix_length: u8) -> BlockCapacity {
    let prefix_length = prefix_length.min(ADDRESS_BITS);
    BlockCapacity {
        prefix_length,
        total_addresses: address_count(prefix_length),
        subdivisions: subdivisions(prefix_length),
    }
}

/// 2^(128 - prefix_length).
pub fn address_count(prefix_length: u8) -> U256 {
    power_of_two(ADDRESS_BITS - prefix_length.min(ADDRESS_BITS))
}

/// Subnet counts for every standard boundary longer than `prefix_length`.
pub fn subdivisions(prefix_length: u8) -> Vec<Subdivision> {
    STANDARD_BOUNDARIES
        .iter()
        .filter(|boundary| prefix_length < **boundary)
        .map(|boundary| {
            let (label, note) = boundary_text(*boundary);
            Subdivision {
                boundary: *boundary,
                count: power_of_two(boundary - prefix_length),
                label,
                note,
            }
        })
        .collect()
}

fn boundary_text(boundary: u8) -> (&'static str, &'static str) {
    match boundary {
        32 => ("ISPs", "Each /32 has 65,536 /48s"),
        48 => ("Sites", "Each /48 has 65,536 /64s"),
        56 => ("Allocations", "Each /56 has 256 /64s"),
        64 => ("LANs", "Standard single subnet"),
        _ => ("Subnets", ""),
    }
}

fn power_of_two(exponent: u8) -> U256 {
    U256::from(1u8) << usize::from(exponent)
}

/// Render a count with `,` thousands separators.
pub fn format_count(value: &U256) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub(crate) fn serialize_decimal<S: serde::Serializer>(
    value: &U256,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::address::parse;
    use proptest::prelude::*;

    #[test]
    fn test_documentation_site_range() {
        let range = compute_range(&parse("2001:db8::/48").unwrap());
        assert_eq!(
            range.start_expanded(),
            "2001:0db8:0000:0000:0000:0000:0000:0000"
        );
        assert_eq!(range.start_compressed(), "2001:db8::");
        assert_eq!(
            range.end_expanded(),
            "2001:0db8:0000:ffff:ffff:ffff:ffff:ffff"
        );
        assert_eq!(range.end_compressed(), "2001:db8:0:ffff:ffff:ffff:ffff:ffff");
        assert_eq!(range.total_addresses, U256::from(1u8) << 80usize);

        let boundaries: Vec<u8> = range.subdivisions.iter().map(|s| s.boundary).collect();
        assert_eq!(boundaries, vec![56, 64]);
        assert_eq!(range.subdivisions[0].count, U256::from(256u32));
        assert_eq!(range.subdivisions[1].count, U256::from(65_536u32));
        assert_eq!(range.subdivisions[1].label, "LANs");
    }

    #[test]
    fn test_documentation_isp_range() {
        let range = compute_range(&parse("2001:db8::/32").unwrap());
        assert_eq!(range.end_compressed(), "2001:db8:ffff:ffff:ffff:ffff:ffff:ffff");
    }

    #[test]
    fn test_host_range() {
        let range = compute_range(&parse("::1").unwrap());
        assert!(!range.is_block());
        assert_eq!(range.total_addresses, U256::from(1u8));
        assert!(range.subdivisions.is_empty());
    }

    #[test]
    fn test_whole_space_exceeds_u128() {
        let range = compute_range(&parse("::/0").unwrap());
        assert_eq!(range.start, 0);
        assert_eq!(range.end, u128::MAX);
        assert_eq!(
            range.total_addresses.to_string(),
            "340282366920938463463374607431768211456"
        );
        assert_eq!(range.subdivisions.len(), 4);
        assert_eq!(range.subdivisions[0].count, U256::from(1u64 << 32));
    }

    #[test]
    fn test_block_capacity() {
        let capacity = block_capacity(10);
        let boundaries: Vec<u8> = capacity.subdivisions.iter().map(|s| s.boundary).collect();
        assert_eq!(boundaries, vec![32, 48, 56, 64]);
        assert_eq!(capacity.subdivisions[0].count, U256::from(1u32 << 22));

        assert!(block_capacity(64).subdivisions.is_empty());
        assert_eq!(block_capacity(200).prefix_length, 128);
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(&U256::from(0u8)), "0");
        assert_eq!(format_count(&U256::from(999u32)), "999");
        assert_eq!(format_count(&U256::from(1000u32)), "1,000");
        assert_eq!(format_count(&U256::from(65_536u32)), "65,536");
        assert_eq!(
            format_count(&address_count(48)),
            "1,208,925,819,614,629,174,706,176"
        );
    }

    #[test]
    fn test_subdivision_serializes_count_as_string() {
        let json = serde_json::to_value(&subdivisions(48)[0]).unwrap();
        assert_eq!(json["count"], "256");
        assert_eq!(json["note"], "Each /56 has 256 /64s");
    }

    proptest! {
        #[test]
        fn test_capacity_matches_bounds(value in any::<u128>(), length in 0u8..128) {
            let parsed = parse(&format!("{}/{}", std::net::Ipv6Addr::from(value), length)).unwrap();
            let range = compute_range(&parsed);
            let span = U256::from(range.end) - U256::from(range.start) + U256::from(1u8);
            prop_assert_eq!(range.total_addresses, span);
            prop_assert_eq!(range.total_addresses, U256::from(1u8) << usize::from(128 - length));
            prop_assert!(range.is_block());
        }
    }
}
