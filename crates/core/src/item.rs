//! Item records captured relative to a section anchor.

use serde::{Deserialize, Serialize};

/// A scanned product with its position recorded relative to its section.
///
/// `x_offset`/`y_offset` are relative to the world pose of the section that
/// was active when the item was scanned; they are meaningless without that
/// section's anchor at replay time. `upc` is the primary key in durable
/// storage (last write wins on conflict).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    /// Unique product identifier.
    pub upc: String,
    /// Key of the owning section, held by value.
    pub section_key: String,
    /// Store location the record belongs to.
    pub location_id: i64,
    /// Human-readable product description.
    pub item_description: String,
    /// Product category.
    pub category: String,
    /// Unit price.
    pub price: f32,
    /// Stock on hand.
    pub quantity_on_hand: i32,
    /// Signed horizontal distance from the section anchor, metres.
    /// Negative means left of the section.
    pub x_offset: f32,
    /// Vertical distance from the section anchor, metres.
    pub y_offset: f32,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            upc: String::new(),
            section_key: String::new(),
            location_id: 0,
            item_description: String::new(),
            category: String::new(),
            price: 0.0,
            quantity_on_hand: 0,
            x_offset: 0.0,
            y_offset: 0.0,
        }
    }
}

impl Item {
    /// Placeholder record returned when every lookup variant misses.
    pub fn placeholder(upc: &str) -> Self {
        Self {
            upc: upc.to_owned(),
            ..Self::default()
        }
    }
}

/// Non-spatial field defaults applied to items at scan time.
///
/// The scanner only yields a upc; descriptions, categories, and pricing are
/// filled in from a catalog later, so authoring stamps these stand-ins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemDefaults {
    /// Default store location id.
    pub location_id: i64,
    /// Default description text.
    pub item_description: String,
    /// Default category text.
    pub category: String,
    /// Default unit price.
    pub price: f32,
    /// Default stock on hand.
    pub quantity_on_hand: i32,
}

impl Default for ItemDefaults {
    fn default() -> Self {
        Self {
            location_id: 1,
            item_description: "itemDescription".to_owned(),
            category: "category".to_owned(),
            price: 399.99,
            quantity_on_hand: 1,
        }
    }
}
