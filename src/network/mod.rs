pub mod address;
pub mod attributes;
pub mod classification;
pub mod prefix;
pub mod range;

pub use address::{Ipv6Prefix, ParsedAddress, parse};
pub use attributes::{AddressAttributes, EmbeddedIpv4};
pub use classification::{ClassificationResult, MulticastDetails, MulticastScope, classify};
pub use prefix::{AddressType, Category, CategoryGroup, KnownPrefixEntry, search_known_prefixes};
pub use range::{BlockCapacity, NetworkRange, Subdivision, block_capacity, compute_range};
