//! IPv6 address classifier. Parses an address or CIDR block, matches it
//! against a compiled-in knowledge base of IANA special-purpose and
//! well-known prefixes, and explains the result: category, defining RFC,
//! multicast scope and flags, network range and capacity.

pub mod config;
pub mod error;
pub mod network;
pub mod report;
pub mod web;

pub use error::AddressError;
pub use network::{
    ClassificationResult, KnownPrefixEntry, NetworkRange, ParsedAddress, classify, compute_range,
    parse, search_known_prefixes,
};
pub use report::{Report, analyze};

/// Parse and classify raw user input in one step.
pub fn classify_address(raw: &str) -> Result<ClassificationResult, AddressError> {
    let parsed = parse(raw)?;
    Ok(classify(&parsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_address_reports_invalid_input() {
        let err = classify_address("not-an-address").unwrap_err();
        assert!(matches!(err, AddressError::InvalidAddressFormat(_)));
        assert_eq!(err.code(), "invalid_address_format");
        assert!(err.to_string().starts_with("invalid IPv6 address format"));
    }

    #[test]
    fn test_classify_address_is_idempotent() {
        let first = classify_address("2001:db8::1").unwrap();
        let second = classify_address("2001:db8::1").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.primary_match.unwrap().name, "Documentation Example");
    }
}
