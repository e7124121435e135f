//! Full analysis of one input, shared by the CLI and the HTTP API.
//! Serialises to JSON (large integers as decimal strings) and renders as a
//! sectioned text report.

use std::fmt;

use alloy_primitives::U256;
use serde::Serialize;

use crate::error::AddressError;
use crate::network::address::{ParsedAddress, parse};
use crate::network::attributes::{
    AddressAttributes, EmbeddedIpv4, prefix_length_note, structure_label,
};
use crate::network::classification::{ClassificationResult, MulticastDetails, classify};
use crate::network::prefix::KnownPrefixEntry;
use crate::network::range::{
    BlockCapacity, Subdivision, block_capacity, compute_range, format_count, serialize_decimal,
};

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub input: String,
    pub basic: BasicInfo,
    pub classification: ClassificationReport,
    pub formats: Formats,
    pub attributes: AddressAttributes,
    /// Present only when the input denotes more than one address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BasicInfo {
    pub address: String,
    pub structure: &'static str,
    pub port: Option<u16>,
    pub scope_id: Option<String>,
    pub standard_form: String,
    pub subnet: String,
    pub subnet_note: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassificationReport {
    pub category: &'static str,
    pub description: Option<&'static str>,
    pub primary_match: Option<&'static KnownPrefixEntry>,
    pub block_match: Option<&'static KnownPrefixEntry>,
    pub matches: Vec<&'static KnownPrefixEntry>,
    pub reserved_block: Option<&'static str>,
    pub block_capacity: Option<BlockCapacity>,
    pub rfc_reference: Option<&'static str>,
    pub rfc_url: Option<String>,
    pub multicast: Option<MulticastReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MulticastReport {
    #[serde(flatten)]
    pub details: MulticastDetails,
    pub flags: Vec<&'static str>,
    pub flag_descriptions: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Formats {
    pub full_form: String,
    pub integer_value: String,
    pub parsed_parts: String,
    pub embedded_ipv4: Option<EmbeddedIpv4>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RangeReport {
    pub start: String,
    pub start_full: String,
    pub end: String,
    pub end_full: String,
    #[serde(serialize_with = "serialize_decimal")]
    pub total_addresses: U256,
    pub subdivisions: Vec<Subdivision>,
}

/// Parse, classify and compute everything shown for one input.
pub fn analyze(raw: &str) -> Result<Report, AddressError> {
    let parsed = parse(raw)?;
    let classification = classify(&parsed);
    Ok(Report::build(&parsed, &classification))
}

impl Report {
    pub fn build(parsed: &ParsedAddress, classification: &ClassificationResult) -> Self {
        let range = compute_range(parsed);
        let range = range.is_block().then(|| RangeReport {
            start: range.start_compressed(),
            start_full: range.start_expanded(),
            end: range.end_compressed(),
            end_full: range.end_expanded(),
            total_addresses: range.total_addresses,
            subdivisions: range.subdivisions.clone(),
        });

        Report {
            input: parsed.original.clone(),
            basic: BasicInfo {
                address: parsed.address.clone(),
                structure: structure_label(parsed),
                port: parsed.port,
                scope_id: parsed.scope_id.clone(),
                standard_form: parsed.normalized_form.clone(),
                subnet: format!("/{}", parsed.prefix_length),
                subnet_note: prefix_length_note(parsed.prefix_length),
            },
            classification: ClassificationReport::build(classification),
            formats: Formats {
                full_form: parsed.fully_expanded_form.clone(),
                integer_value: parsed.integer_value.to_string(),
                parsed_parts: parsed.parsed_parts(),
                embedded_ipv4: EmbeddedIpv4::extract(parsed.integer_value),
            },
            attributes: AddressAttributes::derive(parsed, classification),
            range,
        }
    }
}

impl ClassificationReport {
    fn build(classification: &ClassificationResult) -> Self {
        let block = classification.block_match;
        ClassificationReport {
            category: classification.category(),
            description: classification.primary_match.map(|e| e.description),
            primary_match: classification.primary_match,
            block_match: block,
            matches: classification.matched_entries.clone(),
            reserved_block: block.map(|e| e.prefix),
            block_capacity: block.map(|e| block_capacity(e.declared_length())),
            rfc_reference: block
                .filter(|e| e.has_reference())
                .map(|e| e.rfc_reference),
            rfc_url: block.and_then(|e| e.rfc_url()),
            multicast: classification
                .multicast_details
                .map(|details| MulticastReport {
                    details,
                    flags: details.flag_labels(),
                    flag_descriptions: details.flag_descriptions(),
                }),
        }
    }
}

fn row(f: &mut fmt::Formatter<'_>, label: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "  {:<18} {}", format!("{}:", label), value)
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let basic = &self.basic;
        writeln!(f, "Basic Information")?;
        row(f, "Valid", "Yes")?;
        row(f, "Address", &basic.address)?;
        row(f, "Structure", basic.structure)?;
        if let Some(port) = basic.port {
            row(f, "Port", port)?;
        }
        if let Some(scope_id) = &basic.scope_id {
            row(f, "Scope ID", scope_id)?;
        }
        row(f, "Standard Form", &basic.standard_form)?;
        match basic.subnet_note {
            Some(note) => row(f, "Subnet Mask", format!("{} ({})", basic.subnet, note))?,
            None => row(f, "Subnet Mask", &basic.subnet)?,
        }

        let class = &self.classification;
        let has_class_rows = class.primary_match.is_some() || class.multicast.is_some();
        if has_class_rows {
            writeln!(f)?;
            writeln!(f, "Classification")?;
        }
        if class.primary_match.is_some() {
            row(f, "Category", class.category)?;
            if let Some(description) = class.description {
                row(f, "Description", description)?;
            }
            if let Some(block) = class.reserved_block {
                row(f, "Reserved Block", block)?;
            }
            if let Some(capacity) = &class.block_capacity {
                row(f, "Block Capacity", format_count(&capacity.total_addresses))?;
                if capacity.subdivisions.is_empty() {
                    writeln!(f, "    Single Block (/{})", capacity.prefix_length)?;
                }
                for sub in &capacity.subdivisions {
                    writeln!(
                        f,
                        "    /{}: {} ({}) - {}",
                        sub.boundary,
                        format_count(&sub.count),
                        sub.label,
                        sub.note
                    )?;
                }
            }
            if let Some(reference) = class.rfc_reference {
                match &class.rfc_url {
                    Some(url) => row(f, "Defined in", format!("{} <{}>", reference, url))?,
                    None => row(f, "Defined in", reference)?,
                }
            }
        }
        if let Some(multicast) = &class.multicast {
            row(f, "Multicast Scope", multicast.details.scope)?;
            row(f, "Multicast Flags", multicast.flags.join(", "))?;
        }

        let formats = &self.formats;
        writeln!(f)?;
        writeln!(f, "Structure & Formats")?;
        row(f, "Full Form", &formats.full_form)?;
        row(f, "Integer Value", &formats.integer_value)?;
        row(f, "Parsed Parts", &formats.parsed_parts)?;
        if let Some(embedded) = &formats.embedded_ipv4 {
            row(f, &format!("IPv4 ({})", embedded.label()), embedded)?;
        }

        let attrs = &self.attributes;
        writeln!(f)?;
        writeln!(f, "Flags & Attributes")?;
        row(f, "Link Local", yes_no(attrs.link_local))?;
        row(f, "Multicast", yes_no(attrs.multicast))?;
        row(f, "Loopback", yes_no(attrs.loopback))?;
        row(f, "Unique Local", yes_no(attrs.unique_local))?;
        row(f, "Unspecified", yes_no(attrs.unspecified))?;
        row(f, "Teredo", yes_no(attrs.teredo))?;
        row(f, "V4 Mapped", yes_no(attrs.ipv4_mapped))?;
        row(f, "6to4", yes_no(attrs.six_to_four))?;
        row(f, "Canonical", yes_no(attrs.canonical))?;

        if let Some(range) = &self.range {
            writeln!(f)?;
            writeln!(f, "Network Range")?;
            row(f, "Start Address", &range.start)?;
            row(f, "Start (Full)", &range.start_full)?;
            row(f, "End Address", &range.end)?;
            row(f, "End (Full)", &range.end_full)?;
            row(f, "Total Addresses", format_count(&range.total_addresses))?;
            for sub in &range.subdivisions {
                row(
                    f,
                    &format!("/{} {}", sub.boundary, sub.label),
                    format_count(&sub.count),
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback_report() {
        let report = analyze("::1").unwrap();
        assert_eq!(report.classification.category, "Loopback Address");
        assert_eq!(report.basic.structure, "Single Host");
        assert_eq!(report.basic.subnet_note, Some("Single Host"));
        assert_eq!(
            report.formats.full_form,
            "0000:0000:0000:0000:0000:0000:0000:0001"
        );
        assert_eq!(report.formats.integer_value, "1");
        assert!(report.attributes.loopback);
        // A single host has no range section
        assert!(report.range.is_none());
        // ::/96 is the enclosing block
        assert_eq!(report.classification.reserved_block, Some("::/96"));
    }

    #[test]
    fn test_block_report() {
        let report = analyze("2001:db8::/48").unwrap();
        let range = report.range.as_ref().unwrap();
        assert_eq!(range.start_full, "2001:0db8:0000:0000:0000:0000:0000:0000");
        assert_eq!(range.end, "2001:db8:0:ffff:ffff:ffff:ffff:ffff");
        assert_eq!(range.total_addresses, U256::from(1u8) << 80usize);
        assert_eq!(report.basic.structure, "Network Subnet");
        assert_eq!(report.classification.reserved_block, Some("2001:db8::/32"));
        assert_eq!(report.classification.rfc_reference, Some("RFC 3849"));
        assert_eq!(
            report.classification.rfc_url.as_deref(),
            Some("https://datatracker.ietf.org/doc/html/rfc3849")
        );
        let capacity = report.classification.block_capacity.as_ref().unwrap();
        assert_eq!(capacity.prefix_length, 32);
        assert_eq!(capacity.subdivisions.len(), 3);
    }

    #[test]
    fn test_unknown_reference_is_hidden() {
        let report = analyze("2001:4860:4860::8888").unwrap();
        assert_eq!(report.classification.category, "Google Public DNS");
        assert_eq!(report.classification.rfc_reference, None);
        assert_eq!(report.classification.rfc_url, None);
    }

    #[test]
    fn test_report_json_shape() {
        let report = analyze("[ff02::fb%en0]:5353").unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["basic"]["port"], 5353);
        assert_eq!(json["basic"]["scope_id"], "en0");
        assert_eq!(json["classification"]["category"], "mDNS");
        assert_eq!(json["classification"]["multicast"]["scope"], "Link-Local");
        assert_eq!(json["classification"]["multicast"]["flags"][0], "Permanent");
        assert_eq!(json["classification"]["primary_match"]["category"], "Multicast - IoT");
        assert_eq!(json["attributes"]["multicast"], true);
        assert!(json.get("range").is_none());

        let json = serde_json::to_value(analyze("::/0").unwrap()).unwrap();
        assert_eq!(
            json["range"]["total_addresses"],
            "340282366920938463463374607431768211456"
        );
        assert_eq!(json["formats"]["integer_value"], "0");
    }

    #[test]
    fn test_text_report_sections() {
        let text = analyze("2001:db8::/48").unwrap().to_string();
        assert!(text.contains("Basic Information"));
        assert!(text.contains("  Reserved Block:    2001:db8::/32\n"));
        assert!(text.contains("  Total Addresses:   1,208,925,819,614,629,174,706,176\n"));
        assert!(text.contains("  /64 LANs:          65,536\n"));

        let text = analyze("2a00:1450::1").unwrap().to_string();
        assert!(!text.contains("Classification"));
        assert!(!text.contains("Network Range"));
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            analyze("not-an-address"),
            Err(AddressError::InvalidAddressFormat(_))
        ));
    }
}
