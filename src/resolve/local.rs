use std::sync::Arc;

use super::table::{normalize, MappingTable};
use super::NameResolver;

/// Tier 1: normalized equality against the table.
pub struct ExactLookup {
    table: Arc<MappingTable>,
}

impl ExactLookup {
    pub fn new(table: Arc<MappingTable>) -> Self {
        ExactLookup { table }
    }
}

impl NameResolver for ExactLookup {
    fn tier(&self) -> &'static str {
        "exact"
    }

    fn resolve(&self, title: &str) -> Option<String> {
        self.table.exact(&normalize(title)).map(str::to_string)
    }
}

/// Tier 2: qualifier-insensitive and substring matching, first entry wins.
pub struct FuzzyLookup {
    table: Arc<MappingTable>,
}

impl FuzzyLookup {
    pub fn new(table: Arc<MappingTable>) -> Self {
        FuzzyLookup { table }
    }
}

impl NameResolver for FuzzyLookup {
    fn tier(&self) -> &'static str {
        "fuzzy"
    }

    fn resolve(&self, title: &str) -> Option<String> {
        self.table.fuzzy(&normalize(title)).map(str::to_string)
    }
}
