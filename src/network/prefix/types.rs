use serde::Serialize;

/// Reference grouping for knowledge base entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    #[serde(rename = "Common & Documentation")]
    CommonAndDocumentation,
    #[serde(rename = "Special & Reserved")]
    SpecialAndReserved,
    #[serde(rename = "Transition")]
    Transition,
    #[serde(rename = "Local")]
    Local,
    #[serde(rename = "Multicast - Basic")]
    MulticastBasic,
    #[serde(rename = "Multicast - IoT")]
    MulticastIot,
    #[serde(rename = "Multicast - Routing")]
    MulticastRouting,
    #[serde(rename = "Multicast - Service")]
    MulticastService,
    #[serde(rename = "Multicast - Advanced")]
    MulticastAdvanced,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::CommonAndDocumentation => "Common & Documentation",
            Category::SpecialAndReserved => "Special & Reserved",
            Category::Transition => "Transition",
            Category::Local => "Local",
            Category::MulticastBasic => "Multicast - Basic",
            Category::MulticastIot => "Multicast - IoT",
            Category::MulticastRouting => "Multicast - Routing",
            Category::MulticastService => "Multicast - Service",
            Category::MulticastAdvanced => "Multicast - Advanced",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Delivery semantics of an entry's addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    Unicast,
    Multicast,
    Anycast,
    Loopback,
    Unspecified,
}

impl AddressType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Unicast => "unicast",
            AddressType::Multicast => "multicast",
            AddressType::Anycast => "anycast",
            AddressType::Loopback => "loopback",
            AddressType::Unspecified => "unspecified",
        }
    }
}

impl std::fmt::Display for AddressType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const RFC_BASE_URL: &str = "https://datatracker.ietf.org/doc/html/rfc";

/// One record of the compiled-in knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnownPrefixEntry {
    /// CIDR text as published (`2001:db8::/32`).
    pub prefix: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Defining document, e.g. `RFC 4291 (Deprecated)`, `UPnP` or `N/A`.
    pub rfc_reference: &'static str,
    pub category: Category,
    pub address_type: AddressType,
}

impl KnownPrefixEntry {
    /// Prefix length declared in the CIDR text; /128 when absent or unreadable.
    pub fn declared_length(&self) -> u8 {
        self.prefix
            .rsplit_once('/')
            .and_then(|(_, len)| len.parse::<u8>().ok())
            .unwrap_or(128)
    }

    /// Whether the entry names one host rather than a range.
    pub fn is_host(&self) -> bool {
        self.declared_length() == 128
    }

    /// Address to show and query with: host entries drop their `/128`.
    pub fn display_address(&self) -> &'static str {
        self.prefix.strip_suffix("/128").unwrap_or(self.prefix)
    }

    /// Whether the reference names an actual document (not `N/A`).
    pub fn has_reference(&self) -> bool {
        !self.rfc_reference.is_empty() && self.rfc_reference != "N/A"
    }

    /// IETF datatracker link for the first `RFC <n>` in the reference.
    pub fn rfc_url(&self) -> Option<String> {
        rfc_number(self.rfc_reference).map(|n| format!("{}{}", RFC_BASE_URL, n))
    }

    /// Case-insensitive substring match over name, prefix and description.
    pub fn matches_filter(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.name.to_lowercase().contains(needle_lower)
            || self.prefix.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
    }
}

/// Extract the number following the first `RFC` (case-insensitive, one
/// optional space) in a reference string.
pub(crate) fn rfc_number(reference: &str) -> Option<u32> {
    let lower = reference.to_ascii_lowercase();
    let mut offset = 0;
    while let Some(pos) = lower[offset..].find("rfc") {
        let after = &lower[offset + pos + 3..];
        let after = after.strip_prefix(' ').unwrap_or(after);
        let digits: String = after.chars().take_while(|c| c.is_ascii_digit()).collect();
        if let Ok(n) = digits.parse() {
            return Some(n);
        }
        offset += pos + 3;
    }
    None
}
