//! Planogram offset record encoding and tolerant streaming decode.
//!
//! The wire format is a single JSON object: each section key maps to an
//! array of item records, and a sibling `"sections"` key carries the
//! section count (string-typed for compatibility with existing records).
//! Decoding is forward-compatible and tolerant: unknown fields are skipped,
//! missing fields default, and a truncated or corrupt record yields every
//! item parsed before the error instead of failing the caller.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{DeserializeSeed, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::error;

use shelfmark_core::Item;

/// Metadata key carrying the section count; recognized and skipped on read.
const SECTIONS_KEY: &str = "sections";

/// Per-item wire record. The section key travels as the enclosing map key,
/// not as a field.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ItemRecord {
    category: String,
    location_id: i64,
    upc: String,
    item_description: String,
    price: f32,
    quantity_on_hand: i32,
    x_offset: f32,
    y_offset: f32,
}

impl ItemRecord {
    fn from_item(item: &Item) -> Self {
        Self {
            category: item.category.clone(),
            location_id: item.location_id,
            upc: item.upc.clone(),
            item_description: item.item_description.clone(),
            price: item.price,
            quantity_on_hand: item.quantity_on_hand,
            x_offset: item.x_offset,
            y_offset: item.y_offset,
        }
    }

    fn into_item(self, section_key: &str) -> Item {
        Item {
            upc: self.upc,
            section_key: section_key.to_owned(),
            location_id: self.location_id,
            item_description: self.item_description,
            category: self.category,
            price: self.price,
            quantity_on_hand: self.quantity_on_hand,
            x_offset: self.x_offset,
            y_offset: self.y_offset,
        }
    }
}

/// Encodes items grouped by section into the planogram record.
pub fn encode_planogram(items: &[Item]) -> String {
    let mut by_section: BTreeMap<&str, Vec<&Item>> = BTreeMap::new();
    for item in items {
        by_section
            .entry(item.section_key.as_str())
            .or_default()
            .push(item);
    }

    let mut root = serde_json::Map::new();
    for (section, items) in &by_section {
        let records: Vec<ItemRecord> = items.iter().map(|item| ItemRecord::from_item(item)).collect();
        let value =
            serde_json::to_value(records).expect("item records serialize to plain JSON");
        root.insert((*section).to_owned(), value);
    }
    root.insert(
        SECTIONS_KEY.to_owned(),
        Value::String(by_section.len().to_string()),
    );
    Value::Object(root).to_string()
}

/// Decodes a planogram record, returning every item parsed before any
/// malformed region. Never fails; corrupt input is logged and truncated.
pub fn decode_planogram(input: &str) -> Vec<Item> {
    let mut items = Vec::new();
    let mut de = serde_json::Deserializer::from_str(input);
    if let Err(err) = (PlanogramSeed { items: &mut items }).deserialize(&mut de) {
        error!(%err, parsed = items.len(), "malformed planogram record, keeping parsed prefix");
    }
    items
}

/// Streams the top-level section map, pushing items as they parse so a
/// later error cannot take already-decoded records with it.
struct PlanogramSeed<'a> {
    items: &'a mut Vec<Item>,
}

impl<'de> DeserializeSeed<'de> for PlanogramSeed<'_> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(PlanogramVisitor { items: self.items })
    }
}

struct PlanogramVisitor<'a> {
    items: &'a mut Vec<Item>,
}

impl<'de> Visitor<'de> for PlanogramVisitor<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a planogram object keyed by section")
    }

    fn visit_map<A>(self, mut map: A) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        while let Some(key) = map.next_key::<String>()? {
            if key == SECTIONS_KEY {
                map.next_value::<IgnoredAny>()?;
            } else {
                map.next_value_seed(SectionSeed {
                    section_key: &key,
                    items: &mut *self.items,
                })?;
            }
        }
        Ok(())
    }
}

struct SectionSeed<'a> {
    section_key: &'a str,
    items: &'a mut Vec<Item>,
}

impl<'de> DeserializeSeed<'de> for SectionSeed<'_> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(SectionVisitor {
            section_key: self.section_key,
            items: self.items,
        })
    }
}

struct SectionVisitor<'a> {
    section_key: &'a str,
    items: &'a mut Vec<Item>,
}

impl<'de> Visitor<'de> for SectionVisitor<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of item records")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        while let Some(record) = seq.next_element::<ItemRecord>()? {
            self.items.push(record.into_item(self.section_key));
        }
        Ok(())
    }
}
