//! Conversion between character lists and raw ranges.
//!
//! Offsets and lengths count Unicode scalar values, the same unit block
//! offsets use everywhere else.

use super::types::{InlineStyleRange, RawEntityRange};
use crate::model::block::ContentBlock;
use crate::model::block_map::find_ranges;
use crate::model::character::InlineStyle;
use indexmap::{IndexMap, IndexSet};

/// One range per maximal run of each style, styles in order of first use.
pub fn encode_inline_style_ranges(block: &ContentBlock) -> Vec<InlineStyleRange> {
    let styles: IndexSet<&str> = block
        .character_list()
        .iter()
        .flat_map(|c| c.style().iter().map(String::as_str))
        .collect();

    let mut ranges = Vec::new();
    for style in styles {
        find_ranges(
            block.character_list(),
            |a, b| a.has_style(style) == b.has_style(style),
            |c| c.has_style(style),
            |start, end| {
                ranges.push(InlineStyleRange {
                    offset: start,
                    length: end - start,
                    style: style.to_string(),
                })
            },
        );
    }
    ranges
}

/// One range per entity run. Entity keys are translated through
/// `storage_keys`, which assigns the next free index to keys seen first.
pub fn encode_entity_ranges(
    block: &ContentBlock,
    storage_keys: &mut IndexMap<String, u64>,
) -> Vec<RawEntityRange> {
    let mut ranges = Vec::new();
    block.find_entity_ranges(
        |c| c.entity().is_some(),
        |start, end| {
            let Some(entity) = block.entity_at(start) else {
                return;
            };
            let next = storage_keys.len() as u64;
            let key = *storage_keys.entry(entity.to_string()).or_insert(next);
            ranges.push(RawEntityRange {
                offset: start,
                length: end - start,
                key,
            });
        },
    );
    ranges
}

/// Per-character style sets for `text`. Ranges past the end are clipped.
pub fn decode_inline_style_ranges(text: &str, ranges: &[InlineStyleRange]) -> Vec<InlineStyle> {
    let len = text.chars().count();
    let mut styles = vec![InlineStyle::new(); len];
    for range in ranges {
        let end = range.offset.saturating_add(range.length).min(len);
        for style in styles.iter_mut().take(end).skip(range.offset) {
            style.insert(range.style.clone());
        }
    }
    styles
}

/// Per-character raw entity keys for `text`. Later ranges win where ranges
/// overlap; ranges past the end are clipped.
pub fn decode_entity_ranges(text: &str, ranges: &[RawEntityRange]) -> Vec<Option<u64>> {
    let len = text.chars().count();
    let mut entities = vec![None; len];
    for range in ranges {
        let end = range.offset.saturating_add(range.length).min(len);
        for slot in entities.iter_mut().take(end).skip(range.offset) {
            *slot = Some(range.key);
        }
    }
    entities
}
