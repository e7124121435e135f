//! Address classification. Matches a parsed address against the known
//! prefix table and decodes multicast scope and flag bits.

use serde::Serialize;

use super::address::ParsedAddress;
use super::prefix::{CompiledEntry, KnownPrefixEntry, compiled_prefixes};

/// Category label used when nothing in the table matches.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Outcome of matching one address against the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    /// Most specific first; equally specific entries keep table order.
    pub matched_entries: Vec<&'static KnownPrefixEntry>,
    /// First /128 match, else the most specific match.
    pub primary_match: Option<&'static KnownPrefixEntry>,
    /// Most specific range (non-/128) match, else `primary_match`.
    pub block_match: Option<&'static KnownPrefixEntry>,
    pub multicast_details: Option<MulticastDetails>,
}

impl ClassificationResult {
    /// Display category: the primary match's name, or `Unknown`.
    pub fn category(&self) -> &'static str {
        self.primary_match.map_or(UNKNOWN_CATEGORY, |entry| entry.name)
    }

    pub fn is_multicast(&self) -> bool {
        self.multicast_details.is_some()
    }
}

/// Multicast scope, the low nibble of the second address byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MulticastScope {
    Reserved(u8),
    InterfaceLocal,
    LinkLocal,
    RealmLocal,
    AdminLocal,
    SiteLocal,
    OrganizationLocal,
    Global,
    Unknown(u8),
}

impl MulticastScope {
    pub fn from_nibble(nibble: u8) -> Self {
        match nibble & 0x0f {
            0 => MulticastScope::Reserved(0),
            1 => MulticastScope::InterfaceLocal,
            2 => MulticastScope::LinkLocal,
            3 => MulticastScope::RealmLocal,
            4 => MulticastScope::AdminLocal,
            5 => MulticastScope::SiteLocal,
            8 => MulticastScope::OrganizationLocal,
            14 => MulticastScope::Global,
            15 => MulticastScope::Reserved(15),
            other => MulticastScope::Unknown(other),
        }
    }

    pub fn value(&self) -> u8 {
        match self {
            MulticastScope::Reserved(n) | MulticastScope::Unknown(n) => *n,
            MulticastScope::InterfaceLocal => 1,
            MulticastScope::LinkLocal => 2,
            MulticastScope::RealmLocal => 3,
            MulticastScope::AdminLocal => 4,
            MulticastScope::SiteLocal => 5,
            MulticastScope::OrganizationLocal => 8,
            MulticastScope::Global => 14,
        }
    }
}

impl std::fmt::Display for MulticastScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MulticastScope::Reserved(_) => "Reserved",
            MulticastScope::InterfaceLocal => "Interface-Local",
            MulticastScope::LinkLocal => "Link-Local",
            MulticastScope::RealmLocal => "Realm-Local",
            MulticastScope::AdminLocal => "Admin-Local",
            MulticastScope::SiteLocal => "Site-Local",
            MulticastScope::OrganizationLocal => "Organization-Local",
            MulticastScope::Global => "Global",
            MulticastScope::Unknown(n) => return write!(f, "Unknown ({})", n),
        };
        write!(f, "{}", name)
    }
}

impl Serialize for MulticastScope {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Decoded `ff<flags><scope>::` header of a multicast address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MulticastDetails {
    pub scope: MulticastScope,
    /// T bit: dynamically assigned rather than IANA well-known.
    pub transient: bool,
    /// P bit: derived from a unicast prefix (RFC 3306).
    pub prefix_based: bool,
    /// R bit: embeds a rendezvous point address (RFC 3956).
    pub rendezvous_point: bool,
}

impl MulticastDetails {
    /// Decode the header if the first segment lies in ff00::/8.
    pub fn from_first_segment(segment: u16) -> Option<Self> {
        let [high, low] = segment.to_be_bytes();
        if high != 0xff {
            return None;
        }
        let flags = low >> 4;
        Some(Self {
            scope: MulticastScope::from_nibble(low & 0x0f),
            transient: flags & 0b001 != 0,
            prefix_based: flags & 0b010 != 0,
            rendezvous_point: flags & 0b100 != 0,
        })
    }

    /// Active flag labels; `Permanent` stands in for a clear T bit.
    pub fn flag_labels(&self) -> Vec<&'static str> {
        let mut labels = vec![if self.transient {
            "Transient (T)"
        } else {
            "Permanent"
        }];
        if self.prefix_based {
            labels.push("Prefix-Based (P)");
        }
        if self.rendezvous_point {
            labels.push("Rendezvous (R)");
        }
        labels
    }

    /// Longer explanation for each active flag, in the same order as
    /// [`MulticastDetails::flag_labels`].
    pub fn flag_descriptions(&self) -> Vec<&'static str> {
        let mut descriptions = vec![if self.transient {
            "Transient (T): Dynamically assigned, not permanent."
        } else {
            "Permanent: Well-known, IANA-assigned."
        }];
        if self.prefix_based {
            descriptions.push("Prefix-Based (P): Derived from a unicast prefix.");
        }
        if self.rendezvous_point {
            descriptions.push("Rendezvous (R): Contains embedded RP address.");
        }
        descriptions
    }
}

/// Classify against the process-wide knowledge base.
pub fn classify(parsed: &ParsedAddress) -> ClassificationResult {
    classify_with(parsed, compiled_prefixes())
}

/// Classify against an explicit table. Pure: the result depends only on
/// `parsed` and `table`.
pub fn classify_with(parsed: &ParsedAddress, table: &[CompiledEntry]) -> ClassificationResult {
    let query = parsed.prefix();

    let mut matched: Vec<(u8, &'static KnownPrefixEntry)> = table
        .iter()
        .filter_map(|compiled| {
            let network = compiled.network?;
            network
                .contains(&query)
                .then_some((network.length(), compiled.entry))
        })
        .collect();
    // Stable, so equal lengths keep table order
    matched.sort_by(|a, b| b.0.cmp(&a.0));

    let primary_match = matched
        .iter()
        .find(|(length, _)| *length == 128)
        .or_else(|| matched.first())
        .map(|(_, entry)| *entry);
    let block_match = matched
        .iter()
        .find(|(length, _)| *length < 128)
        .map(|(_, entry)| *entry)
        .or(primary_match);

    let result = ClassificationResult {
        matched_entries: matched.into_iter().map(|(_, entry)| entry).collect(),
        primary_match,
        block_match,
        multicast_details: MulticastDetails::from_first_segment(parsed.segments[0]),
    };

    tracing::debug!(
        address = %parsed.normalized_form,
        prefix_length = parsed.prefix_length,
        matches = result.matched_entries.len(),
        category = result.category(),
        "classified address"
    );
    result
}
