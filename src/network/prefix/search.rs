//! Reference lookup over the knowledge base.

use serde::Serialize;

use super::table::KNOWN_PREFIXES;
use super::types::{Category, KnownPrefixEntry};

/// Entries of one category, in table order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub entries: Vec<&'static KnownPrefixEntry>,
}

/// Entries whose name, prefix or description contains `filter`
/// (case-insensitive), in table order. A blank filter matches everything;
/// any other filter is used as typed, surrounding spaces included.
pub fn matching_entries(filter: &str) -> impl Iterator<Item = &'static KnownPrefixEntry> {
    let needle = if filter.trim().is_empty() {
        String::new()
    } else {
        filter.to_lowercase()
    };
    KNOWN_PREFIXES
        .iter()
        .filter(move |entry| entry.matches_filter(&needle))
}

/// Matching entries grouped by category. Groups appear in the order their
/// first entry appears in the table.
pub fn search_known_prefixes(filter: &str) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for entry in matching_entries(filter) {
        match groups.iter_mut().find(|g| g.category == entry.category) {
            Some(group) => group.entries.push(entry),
            None => groups.push(CategoryGroup {
                category: entry.category,
                entries: vec![entry],
            }),
        }
    }
    tracing::debug!(filter, groups = groups.len(), "searched known prefixes");
    groups
}
