mod search;
mod table;
mod types;

pub use search::{CategoryGroup, matching_entries, search_known_prefixes};
pub use table::{CompiledEntry, KNOWN_PREFIXES, compiled_prefixes};
pub use types::{AddressType, Category, KnownPrefixEntry};
