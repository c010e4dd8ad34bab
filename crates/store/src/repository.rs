//! Item repository with normalized-upc fallback and planogram export.

use anyhow::Result;
use tracing::{info, warn};

use shelfmark_core::Item;

use crate::codec::{decode_planogram, encode_planogram};
use crate::export::ExportStore;
use crate::store::ItemStore;

/// File name of the planogram offset record.
pub const PLANOGRAM_FILE: &str = "planogram.json";

/// Storage front door: logged CRUD plus upc normalization fallbacks.
#[derive(Debug)]
pub struct Repository<S> {
    store: S,
    export: ExportStore,
}

impl<S: ItemStore> Repository<S> {
    /// Repository over the given record store and export target.
    pub fn new(store: S, export: ExportStore) -> Self {
        Self { store, export }
    }

    /// Insert or replace an item record.
    pub fn insert(&mut self, item: Item) {
        info!(upc = %item.upc, section = %item.section_key, "insert item");
        self.store.insert(item);
    }

    /// Lookup with fallback through normalized key variants: exact upc,
    /// zero-padded upc, and for 14-character codes the form with the first
    /// two characters stripped. A final miss returns a placeholder record
    /// carrying the queried upc rather than failing.
    pub fn lookup(&self, upc: &str) -> Item {
        info!(%upc, "lookup item");
        if let Some(item) = self.store.get(upc) {
            return item;
        }
        if let Some(item) = self.store.get(&format!("0{upc}")) {
            return item;
        }
        if upc.len() == 14 {
            if let Some(item) = upc.get(2..).and_then(|tail| self.store.get(tail)) {
                return item;
            }
        }
        Item::placeholder(upc)
    }

    /// All stored records.
    pub fn get_all(&self) -> Vec<Item> {
        info!("get all items");
        self.store.get_all()
    }

    /// Records belonging to one section.
    pub fn in_section(&self, section_key: &str) -> Vec<Item> {
        self.store.in_section(section_key)
    }

    /// Remove every stored record.
    pub fn delete_all(&mut self) {
        info!("delete all items");
        self.store.delete_all();
    }

    /// Write the planogram record for everything currently stored.
    ///
    /// Items are read back out of the store so the file reflects durable
    /// state, not the caller's working copy.
    pub fn write_planogram(&self) -> Result<()> {
        let items = self.store.get_all();
        info!(items = items.len(), "write planogram record");
        let content = encode_planogram(&items);
        self.export.write(PLANOGRAM_FILE, &content)
    }

    /// Read the planogram record, tolerating missing or corrupt files by
    /// returning whatever decoded cleanly.
    pub fn read_planogram(&self) -> Vec<Item> {
        match self.export.read(PLANOGRAM_FILE) {
            Ok(content) => decode_planogram(&content),
            Err(err) => {
                warn!(%err, "no planogram record to restore");
                Vec::new()
            }
        }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
