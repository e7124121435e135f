//! Error type for address parsing.

/// Raised for any input that cannot be parsed into a well-formed IPv6
/// address. Parsing is deterministic, so the same input always fails the
/// same way and callers should surface the message rather than retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("invalid IPv6 address format: {0}")]
    InvalidAddressFormat(String),
}

impl AddressError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        AddressError::InvalidAddressFormat(reason.into())
    }

    /// Stable machine-readable code used by the HTTP API.
    pub fn code(&self) -> &'static str {
        match self {
            AddressError::InvalidAddressFormat(_) => "invalid_address_format",
        }
    }
}

pub type Result<T> = std::result::Result<T, AddressError>;
