//! Source-to-target identifier translation table.

use std::collections::HashMap;

/// Per-run table translating source identifiers to target identifiers.
///
/// Three independent mappings, one per resource kind. Entries are added only
/// when a creation call succeeds; a missing entry means "not migrated" and is
/// never represented by a placeholder. Created fresh for each replication run
/// and discarded afterward.
#[derive(Debug, Clone, Default)]
pub struct RemapTable {
    roles: HashMap<u64, u64>,
    categories: HashMap<u64, u64>,
    channels: HashMap<u64, u64>,
}

impl RemapTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a successfully created role.
    pub fn record_role(&mut self, source: u64, target: u64) {
        self.roles.insert(source, target);
    }

    /// Look up the target role for a source role id.
    pub fn role(&self, source: u64) -> Option<u64> {
        self.roles.get(&source).copied()
    }

    /// Register a successfully created category.
    pub fn record_category(&mut self, source: u64, target: u64) {
        self.categories.insert(source, target);
    }

    /// Look up the target category for a source category id.
    pub fn category(&self, source: u64) -> Option<u64> {
        self.categories.get(&source).copied()
    }

    /// Register a successfully created channel.
    pub fn record_channel(&mut self, source: u64, target: u64) {
        self.channels.insert(source, target);
    }

    /// Look up the target channel for a source channel id.
    pub fn channel(&self, source: u64) -> Option<u64> {
        self.channels.get(&source).copied()
    }

    /// Number of role entries.
    pub fn role_count(&self) -> usize {
        self.roles.len()
    }

    /// Number of category entries.
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Number of channel entries.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Total number of entries across all three mappings.
    pub fn len(&self) -> usize {
        self.roles.len() + self.categories.len() + self.channels.len()
    }

    /// True when nothing has been migrated yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mappings_are_independent() {
        let mut remap = RemapTable::new();
        remap.record_role(1, 10);
        remap.record_category(1, 20);
        remap.record_channel(1, 30);

        assert_eq!(remap.role(1), Some(10));
        assert_eq!(remap.category(1), Some(20));
        assert_eq!(remap.channel(1), Some(30));
        assert_eq!(remap.len(), 3);
    }

    #[test]
    fn test_missing_entry_is_none() {
        let remap = RemapTable::new();
        assert_eq!(remap.role(42), None);
        assert!(remap.is_empty());
    }
}
