use std::rc::Rc;

use draftquill::exploration::tree::relink_tree;
use draftquill::exploration::{get_ancestor_keys, get_descendant_keys, get_next_delimiter_block_key};
use draftquill::model::block::{BlockLinks, BlockType, ContentBlock};
use draftquill::model::block_map::BlockMap;
use draftquill::testing::sample_content_state;

/// A(next B), B(children C, next D), C, D(children E F), E(next F), F
fn delimiter_tree() -> BlockMap {
    let node = |key: &str, parent: Option<&str>| {
        Rc::new(
            ContentBlock::new_tree(key, BlockType::Unstyled, key).with_links(Some(BlockLinks {
                parent: parent.map(str::to_string),
                ..BlockLinks::default()
            })),
        )
    };
    let blocks = vec![
        node("A", None),
        node("B", None),
        node("C", Some("B")),
        node("D", None),
        node("E", Some("D")),
        node("F", Some("D")),
    ];
    let lineage = BlockMap::from_blocks(blocks.clone());
    relink_tree(blocks, &lineage)
}

fn delimiter(map: &BlockMap, key: &str) -> Option<String> {
    get_next_delimiter_block_key(map.get(key).unwrap(), map)
}

#[test]
fn test_relink_derives_links_from_parents() {
    let map = delimiter_tree();
    let b = map.get("B").unwrap();
    assert_eq!(b.child_keys(), ["C".to_string()]);
    assert_eq!(b.prev_sibling_key(), Some("A"));
    assert_eq!(b.next_sibling_key(), Some("D"));
    assert_eq!(
        map.get("D").unwrap().child_keys(),
        ["E".to_string(), "F".to_string()]
    );
    assert_eq!(map.get("E").unwrap().next_sibling_key(), Some("F"));
    assert_eq!(map.get("C").unwrap().next_sibling_key(), None);
}

#[test]
fn test_next_delimiter_block_key() {
    let map = delimiter_tree();
    assert_eq!(delimiter(&map, "A").as_deref(), Some("B"));
    assert_eq!(delimiter(&map, "C").as_deref(), Some("D"));
    assert_eq!(delimiter(&map, "D"), None);
    assert_eq!(delimiter(&map, "E").as_deref(), Some("F"));
    assert_eq!(delimiter(&map, "F"), None);
}

#[test]
fn test_next_delimiter_of_flat_block_is_none() {
    let content = sample_content_state();
    let a = content.block("a").unwrap();
    assert_eq!(get_next_delimiter_block_key(a, content.block_map()), None);
}

#[test]
fn test_ancestors_and_descendants() {
    let map = delimiter_tree();
    assert_eq!(get_ancestor_keys("E", &map), vec!["D".to_string()]);
    assert!(get_ancestor_keys("A", &map).is_empty());
    assert_eq!(
        get_descendant_keys("D", &map),
        vec!["E".to_string(), "F".to_string()]
    );
}

#[test]
fn test_relink_reuses_unchanged_blocks() {
    let map = delimiter_tree();
    let relinked = relink_tree(map.to_vec(), &map);
    for (before, after) in map.iter().zip(relinked.iter()) {
        assert!(Rc::ptr_eq(before, after));
    }
}
