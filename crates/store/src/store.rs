//! Key-value item store keyed by upc.

use std::collections::BTreeMap;

use shelfmark_core::Item;

/// Record store for scanned items, keyed by upc.
///
/// Inserting an existing upc replaces the record (last write wins).
pub trait ItemStore {
    /// Insert or replace the record with the same upc.
    fn insert(&mut self, item: Item);

    /// Exact-key lookup.
    fn get(&self, upc: &str) -> Option<Item>;

    /// All records in deterministic (upc) order.
    fn get_all(&self) -> Vec<Item>;

    /// Records belonging to the given section.
    fn in_section(&self, section_key: &str) -> Vec<Item>;

    /// Remove one record by upc.
    fn delete(&mut self, upc: &str);

    /// Remove every record in a section.
    fn delete_section(&mut self, section_key: &str);

    /// Remove everything.
    fn delete_all(&mut self);
}

/// In-memory store backed by a `BTreeMap` for deterministic iteration.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, Item>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no records are held.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemStore for MemoryStore {
    fn insert(&mut self, item: Item) {
        self.items.insert(item.upc.clone(), item);
    }

    fn get(&self, upc: &str) -> Option<Item> {
        self.items.get(upc).cloned()
    }

    fn get_all(&self) -> Vec<Item> {
        self.items.values().cloned().collect()
    }

    fn in_section(&self, section_key: &str) -> Vec<Item> {
        self.items
            .values()
            .filter(|item| item.section_key == section_key)
            .cloned()
            .collect()
    }

    fn delete(&mut self, upc: &str) {
        self.items.remove(upc);
    }

    fn delete_section(&mut self, section_key: &str) {
        self.items.retain(|_, item| item.section_key != section_key);
    }

    fn delete_all(&mut self) {
        self.items.clear();
    }
}
