//! IPv6 address parsing and text forms. Accepts bracketed `[addr]:port`,
//! `%zone` suffixes, `/len` CIDR suffixes and an embedded dotted IPv4 tail,
//! and renders both the fully expanded and the RFC 5952 compressed form.

use std::net::Ipv4Addr;

use crate::error::{AddressError, Result};

/// Width of an IPv6 address in bits.
pub const ADDRESS_BITS: u8 = 128;

const GROUPS: usize = 8;

/// An address as typed by the user, decomposed into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
    /// Raw input before any trimming.
    pub original: String,
    /// Core address text as typed, without brackets, port, zone or prefix.
    pub address: String,
    /// Canonical compressed form (RFC 5952).
    pub normalized_form: String,
    /// Eight groups of four lowercase hex digits.
    pub fully_expanded_form: String,
    pub prefix_length: u8,
    /// False when the input carried no `/len` suffix and 128 was assumed.
    pub explicit_prefix: bool,
    pub integer_value: u128,
    pub segments: [u16; GROUPS],
    pub port: Option<u16>,
    pub scope_id: Option<String>,
}

impl ParsedAddress {
    /// The block this input denotes (`address/prefix_length`).
    pub fn prefix(&self) -> Ipv6Prefix {
        Ipv6Prefix::new(self.integer_value, self.prefix_length)
    }

    /// Whether the input names a single host rather than a block.
    pub fn is_single_host(&self) -> bool {
        self.prefix_length == ADDRESS_BITS
    }

    /// Segments without zero padding, as parsed (`2001:db8:0:0:0:0:0:1`).
    pub fn parsed_parts(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("{:x}", s))
            .collect::<Vec<_>>()
            .join(":")
    }
}

/// A CIDR block over the 128-bit address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv6Prefix {
    value: u128,
    length: u8,
}

impl Ipv6Prefix {
    /// Lengths above 128 are clamped to 128.
    pub const fn new(value: u128, length: u8) -> Self {
        let length = if length > ADDRESS_BITS {
            ADDRESS_BITS
        } else {
            length
        };
        Self { value, length }
    }

    pub const fn host(value: u128) -> Self {
        Self::new(value, ADDRESS_BITS)
    }

    /// Parse `addr/len` text; a missing suffix means /128.
    pub fn parse(text: &str) -> Result<Self> {
        let parsed = parse(text)?;
        Ok(parsed.prefix())
    }

    pub fn value(&self) -> u128 {
        self.value
    }

    pub fn length(&self) -> u8 {
        self.length
    }

    /// First address of the block (host bits cleared).
    pub fn first(&self) -> u128 {
        self.value & mask(self.length)
    }

    /// Last address of the block (host bits set).
    pub fn last(&self) -> u128 {
        self.value | !mask(self.length)
    }

    /// Whether `other` lies entirely inside this block: it must be at least
    /// as specific, and its top `self.length` bits must equal ours.
    pub fn contains(&self, other: &Ipv6Prefix) -> bool {
        let mask = mask(self.length);
        other.length >= self.length && (other.value & mask) == (self.value & mask)
    }

    pub fn contains_address(&self, value: u128) -> bool {
        self.contains(&Ipv6Prefix::host(value))
    }
}

impl std::fmt::Display for Ipv6Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", compress(self.value), self.length)
    }
}

/// Network mask with the top `length` bits set.
pub fn mask(length: u8) -> u128 {
    match length.min(ADDRESS_BITS) {
        0 => 0,
        n => u128::MAX << (ADDRESS_BITS - n),
    }
}

/// Parse user input into its address, port, zone and prefix length.
pub fn parse(raw: &str) -> Result<ParsedAddress> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AddressError::invalid("input is empty"));
    }

    let (rest, port) = split_brackets(trimmed)?;
    let (rest, prefix_length) = split_prefix(rest)?;
    let (core, scope_id) = split_zone(rest)?;

    let segments = parse_segments(core)?;
    let integer_value = value_of(&segments);

    Ok(ParsedAddress {
        original: raw.to_string(),
        address: core.to_string(),
        normalized_form: compress(integer_value),
        fully_expanded_form: expand(integer_value),
        prefix_length: prefix_length.unwrap_or(ADDRESS_BITS),
        explicit_prefix: prefix_length.is_some(),
        integer_value,
        segments,
        port,
        scope_id,
    })
}

fn split_brackets(input: &str) -> Result<(&str, Option<u16>)> {
    let Some(inner) = input.strip_prefix('[') else {
        if input.contains(']') {
            return Err(AddressError::invalid("unbalanced ']'"));
        }
        return Ok((input, None));
    };

    let Some((address, tail)) = inner.split_once(']') else {
        return Err(AddressError::invalid("missing closing ']'"));
    };
    if tail.is_empty() {
        return Ok((address, None));
    }
    let Some(port) = tail.strip_prefix(':') else {
        return Err(AddressError::invalid(format!(
            "unexpected text after ']': '{}'",
            tail
        )));
    };
    Ok((address, Some(parse_port(port)?)))
}

fn parse_port(text: &str) -> Result<u16> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AddressError::invalid(format!("invalid port '{}'", text)));
    }
    text.parse::<u16>()
        .map_err(|_| AddressError::invalid(format!("port {} is out of range", text)))
}

fn split_prefix(input: &str) -> Result<(&str, Option<u8>)> {
    let Some((address, length)) = input.rsplit_once('/') else {
        return Ok((input, None));
    };
    if address.contains('/') {
        return Err(AddressError::invalid("more than one '/' prefix separator"));
    }
    if length.is_empty() || !length.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AddressError::invalid(format!(
            "invalid prefix length '{}'",
            length
        )));
    }
    match length.parse::<u8>() {
        Ok(n) if n <= ADDRESS_BITS => Ok((address, Some(n))),
        _ => Err(AddressError::invalid(format!(
            "prefix length {} is outside 0-128",
            length
        ))),
    }
}

fn split_zone(input: &str) -> Result<(&str, Option<String>)> {
    let Some((address, zone)) = input.split_once('%') else {
        return Ok((input, None));
    };
    if zone.is_empty() {
        return Err(AddressError::invalid("empty zone identifier"));
    }
    if zone.contains('%') || zone.chars().any(char::is_whitespace) {
        return Err(AddressError::invalid(format!(
            "invalid zone identifier '{}'",
            zone
        )));
    }
    Ok((address, Some(zone.to_string())))
}

fn parse_segments(text: &str) -> Result<[u16; GROUPS]> {
    if text.is_empty() {
        return Err(AddressError::invalid("missing address"));
    }

    let mut segments = [0u16; GROUPS];
    match text.split_once("::") {
        Some((head, tail)) => {
            if tail.contains("::") {
                return Err(AddressError::invalid(
                    "more than one '::' compression marker",
                ));
            }
            // An IPv4 tail is only valid as the final 32 bits, so never before `::`.
            let head = parse_groups(head, false)?;
            let tail = parse_groups(tail, true)?;
            if head.len() + tail.len() >= GROUPS {
                return Err(AddressError::invalid(format!(
                    "'::' used with {} explicit groups",
                    head.len() + tail.len()
                )));
            }
            segments[..head.len()].copy_from_slice(&head);
            segments[GROUPS - tail.len()..].copy_from_slice(&tail);
        }
        None => {
            let groups = parse_groups(text, true)?;
            if groups.len() != GROUPS {
                return Err(AddressError::invalid(format!(
                    "expected 8 groups, found {}",
                    groups.len()
                )));
            }
            segments.copy_from_slice(&groups);
        }
    }
    Ok(segments)
}

fn parse_groups(text: &str, allow_ipv4_tail: bool) -> Result<Vec<u16>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let parts: Vec<&str> = text.split(':').collect();
    let last = parts.len() - 1;
    let mut groups = Vec::with_capacity(parts.len() + 1);
    for (index, part) in parts.iter().enumerate() {
        if index == last && allow_ipv4_tail && part.contains('.') {
            let ipv4: Ipv4Addr = part.parse().map_err(|_| {
                AddressError::invalid(format!("invalid embedded IPv4 address '{}'", part))
            })?;
            let [a, b, c, d] = ipv4.octets();
            groups.push(u16::from_be_bytes([a, b]));
            groups.push(u16::from_be_bytes([c, d]));
        } else {
            groups.push(parse_group(part)?);
        }
    }
    Ok(groups)
}

fn parse_group(part: &str) -> Result<u16> {
    if part.is_empty() {
        return Err(AddressError::invalid("empty group"));
    }
    if part.len() > 4 || !part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AddressError::invalid(format!("invalid group '{}'", part)));
    }
    u16::from_str_radix(part, 16)
        .map_err(|_| AddressError::invalid(format!("invalid group '{}'", part)))
}

/// Split a 128-bit value into big-endian 16-bit words.
pub fn segments_of(value: u128) -> [u16; GROUPS] {
    std::array::from_fn(|i| (value >> (112 - 16 * i)) as u16)
}

/// Join big-endian 16-bit words into a 128-bit value.
pub fn value_of(segments: &[u16; GROUPS]) -> u128 {
    segments
        .iter()
        .fold(0u128, |acc, s| (acc << 16) | u128::from(*s))
}

/// Fully expanded form: 8 groups, each zero-padded to 4 hex digits.
pub fn expand(value: u128) -> String {
    segments_of(value)
        .iter()
        .map(|s| format!("{:04x}", s))
        .collect::<Vec<_>>()
        .join(":")
}

/// Canonical compressed form: the leftmost longest run of two or more zero
/// groups becomes `::`, remaining groups drop leading zeros.
pub fn compress(value: u128) -> String {
    let segments = segments_of(value);
    match longest_zero_run(&segments) {
        Some((start, len)) => format!(
            "{}::{}",
            join_hex(&segments[..start]),
            join_hex(&segments[start + len..])
        ),
        None => join_hex(&segments),
    }
}

fn join_hex(segments: &[u16]) -> String {
    segments
        .iter()
        .map(|s| format!("{:x}", s))
        .collect::<Vec<_>>()
        .join(":")
}

fn longest_zero_run(segments: &[u16]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut i = 0;
    while i < segments.len() {
        if segments[i] != 0 {
            i += 1;
            continue;
        }
        let start = i;
        while i < segments.len() && segments[i] == 0 {
            i += 1;
        }
        let len = i - start;
        // Strictly longer only, so the leftmost run wins a tie
        if len >= 2 && best.is_none_or(|(_, best_len)| len > best_len) {
            best = Some((start, len));
        }
    }
    best
}
