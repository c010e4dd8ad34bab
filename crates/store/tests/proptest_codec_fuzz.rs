//! Fuzz-style property tests for the planogram codec
//!
//! These tests validate that decoding handles arbitrary inputs gracefully
//! without crashing, even on malformed data.
//!
//! Critical properties:
//! - Decoder never panics on arbitrary input
//! - Valid records always roundtrip through encode/decode
//! - Truncation never loses items parsed before the cut

use proptest::prelude::*;
use shelfmark_core::Item;
use shelfmark_store::{decode_planogram, encode_planogram};

fn arb_item() -> impl Strategy<Value = Item> {
    (
        "[0-9]{8,14}",
        "[A-Z][0-9]{1,3}",
        any::<i32>(),
        -100.0f32..100.0f32,
        -100.0f32..100.0f32,
    )
        .prop_map(|(upc, section_key, quantity, x_offset, y_offset)| Item {
            upc,
            section_key,
            location_id: 1,
            item_description: "itemDescription".to_owned(),
            category: "category".to_owned(),
            price: 399.99,
            quantity_on_hand: quantity,
            x_offset,
            y_offset,
        })
}

proptest! {
    /// Property: Arbitrary strings don't crash the decoder
    ///
    /// For any input, decode_planogram should return a (possibly empty)
    /// item list. It should NEVER panic.
    #[test]
    fn arbitrary_input_does_not_crash(input in ".*") {
        let _ = decode_planogram(&input);
    }

    /// Property: Arbitrary byte-like JSON fragments don't crash either
    #[test]
    fn json_shaped_fragments_do_not_crash(
        fragment in prop::collection::vec(
            prop::sample::select(vec!["{", "}", "[", "]", ":", ",", "\"a\"", "1.5", "null", "true"]),
            0..50,
        )
    ) {
        let input = fragment.concat();
        let _ = decode_planogram(&input);
    }

    /// Property: Valid item sets roundtrip through the codec
    #[test]
    fn valid_records_roundtrip(mut items in prop::collection::vec(arb_item(), 0..20)) {
        // The store keys records by upc, so deduplicate before comparing.
        items.sort_by(|a, b| a.upc.cmp(&b.upc));
        items.dedup_by(|a, b| a.upc == b.upc);

        let encoded = encode_planogram(&items);
        let decoded = decode_planogram(&encoded);

        prop_assert_eq!(decoded.len(), items.len());
        for item in &items {
            let restored = decoded
                .iter()
                .find(|d| d.upc == item.upc)
                .expect("roundtrip kept the record");
            prop_assert_eq!(&restored.section_key, &item.section_key);
            prop_assert!((restored.x_offset - item.x_offset).abs() < 1e-5);
            prop_assert!((restored.y_offset - item.y_offset).abs() < 1e-5);
            prop_assert_eq!(restored.quantity_on_hand, item.quantity_on_hand);
        }
    }

    /// Property: Truncating a valid record never panics and never yields
    /// more items than were encoded.
    #[test]
    fn truncation_yields_a_prefix(
        items in prop::collection::vec(arb_item(), 1..10),
        cut_fraction in 0.0f64..1.0f64,
    ) {
        let encoded = encode_planogram(&items);
        let cut = ((encoded.len() as f64) * cut_fraction) as usize;
        let truncated = &encoded[..cut.min(encoded.len())];

        // The encoded record is ASCII JSON, so any cut point is a valid
        // char boundary.
        let decoded = decode_planogram(truncated);
        prop_assert!(decoded.len() <= items.len());
    }
}
