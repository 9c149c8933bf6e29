//! Block forest navigation.
//!
//! Tree blocks reference each other by key: a parent lists its children, and
//! siblings point at each other. These helpers walk those links over a
//! `BlockMap`, and [`relink_tree`] rebuilds every link of a block sequence from
//! parent pointers plus document order after a structural edit.

use crate::model::block::{BlockLinks, ContentBlock};
use crate::model::block_map::BlockMap;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Key of the next block in document order that is not a descendant of
/// `block`, or `None` for flat blocks and for the last subtree.
pub fn get_next_delimiter_block_key(block: &ContentBlock, block_map: &BlockMap) -> Option<String> {
    if !block.is_tree_block() {
        return None;
    }

    if let Some(next) = block.next_sibling_key() {
        return Some(next.to_string());
    }

    let mut ancestor = block.parent_key().and_then(|key| block_map.get(key));
    while let Some(current) = ancestor {
        if let Some(next) = current.next_sibling_key() {
            return Some(next.to_string());
        }
        ancestor = current.parent_key().and_then(|key| block_map.get(key));
    }
    None
}

/// Parent, grandparent, ... of `key`, nearest first.
pub fn get_ancestor_keys(key: &str, block_map: &BlockMap) -> Vec<String> {
    let mut ancestors = Vec::new();
    let mut current = block_map.get(key).and_then(|b| b.parent_key());
    while let Some(parent) = current {
        if ancestors.iter().any(|k| k == parent) || ancestors.len() > block_map.len() {
            break;
        }
        ancestors.push(parent.to_string());
        current = block_map.get(parent).and_then(|b| b.parent_key());
    }
    ancestors
}

/// All descendants of `key`, in pre-order.
pub fn get_descendant_keys(key: &str, block_map: &BlockMap) -> Vec<String> {
    let mut out = Vec::new();
    let mut stack: Vec<String> = block_map
        .get(key)
        .map(|b| b.child_keys().iter().rev().cloned().collect())
        .unwrap_or_default();
    while let Some(next) = stack.pop() {
        if let Some(block) = block_map.get(&next) {
            stack.extend(block.child_keys().iter().rev().cloned());
        }
        out.push(next);
    }
    out
}

/// Whether `key` lies somewhere below `ancestor_key`.
pub fn is_descendant_of(key: &str, ancestor_key: &str, block_map: &BlockMap) -> bool {
    get_ancestor_keys(key, block_map)
        .iter()
        .any(|k| k == ancestor_key)
}

/// Rebuilds tree links for `blocks`, which must be in pre-order.
///
/// Each tree block keeps its parent if that parent is still present;
/// otherwise it is attached to its nearest surviving ancestor according to
/// `lineage`. Children lists and sibling links are then derived from document
/// order. Flat blocks, and tree blocks whose links come out unchanged, are
/// passed through as the same `Rc`.
pub fn relink_tree(blocks: Vec<Rc<ContentBlock>>, lineage: &BlockMap) -> BlockMap {
    let present: HashSet<&str> = blocks
        .iter()
        .filter(|b| b.is_tree_block())
        .map(|b| b.key())
        .collect();

    let parents: Vec<Option<String>> = blocks
        .iter()
        .map(|block| {
            if !block.is_tree_block() {
                return None;
            }
            let mut parent = block.parent_key().map(str::to_string);
            let mut steps = 0;
            while let Some(candidate) = parent.clone() {
                if candidate != block.key() && present.contains(candidate.as_str()) {
                    break;
                }
                steps += 1;
                if steps > lineage.len() {
                    return None;
                }
                parent = lineage
                    .get(&candidate)
                    .and_then(|b| b.parent_key())
                    .map(str::to_string);
            }
            parent
        })
        .collect();

    let mut groups: HashMap<Option<String>, Vec<String>> = HashMap::new();
    for (block, parent) in blocks.iter().zip(&parents) {
        if block.is_tree_block() {
            groups
                .entry(parent.clone())
                .or_default()
                .push(block.key().to_string());
        }
    }

    let mut siblings: HashMap<String, (Option<String>, Option<String>)> = HashMap::new();
    for members in groups.values() {
        for (index, key) in members.iter().enumerate() {
            let prev = index.checked_sub(1).map(|i| members[i].clone());
            let next = members.get(index + 1).cloned();
            siblings.insert(key.clone(), (prev, next));
        }
    }

    let relinked = blocks.into_iter().zip(parents).map(|(block, parent)| {
        if !block.is_tree_block() {
            return block;
        }
        let (prev_sibling, next_sibling) = siblings.remove(block.key()).unwrap_or_default();
        let links = BlockLinks {
            parent,
            children: groups
                .get(&Some(block.key().to_string()))
                .cloned()
                .unwrap_or_default(),
            prev_sibling,
            next_sibling,
        };
        if block.links() == Some(&links) {
            block
        } else {
            Rc::new((*block).clone().with_links(Some(links)))
        }
    });

    BlockMap::from_blocks(relinked.collect::<Vec<_>>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::block::BlockType;

    fn node(key: &str, parent: Option<&str>) -> Rc<ContentBlock> {
        Rc::new(
            ContentBlock::new_tree(key, BlockType::Unstyled, "")
                .with_parent(parent.map(str::to_string)),
        )
    }

    /// A(next B), B(children C, next D), C, D(children E, F), E(next F), F.
    fn forest() -> BlockMap {
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

    #[test]
    fn test_relink_builds_symmetric_links() {
        let map = forest();
        let a = map.get("A").unwrap();
        let b = map.get("B").unwrap();
        let d = map.get("D").unwrap();
        let e = map.get("E").unwrap();
        assert_eq!(a.next_sibling_key(), Some("B"));
        assert_eq!(b.prev_sibling_key(), Some("A"));
        assert_eq!(b.child_keys(), &["C".to_string()]);
        assert_eq!(b.next_sibling_key(), Some("D"));
        assert_eq!(d.child_keys(), &["E".to_string(), "F".to_string()]);
        assert_eq!(e.next_sibling_key(), Some("F"));
        assert_eq!(map.get("F").unwrap().prev_sibling_key(), Some("E"));
        assert_eq!(map.get("C").unwrap().parent_key(), Some("B"));
    }

    #[test]
    fn test_relink_reuses_unchanged_blocks() {
        let map = forest();
        let again = relink_tree(map.to_vec(), &map);
        for block in map.iter() {
            assert!(Rc::ptr_eq(block, again.get(block.key()).unwrap()));
        }
    }

    #[test]
    fn test_relink_reattaches_orphans_to_surviving_ancestor() {
        let map = forest();
        let without_d: Vec<_> = map.iter().filter(|b| b.key() != "D").cloned().collect();
        let relinked = relink_tree(without_d, &map);
        let e = relinked.get("E").unwrap();
        assert_eq!(e.parent_key(), None);
        assert_eq!(relinked.get("B").unwrap().next_sibling_key(), Some("E"));
    }

    #[test]
    fn test_next_delimiter_block_key() {
        let map = forest();
        let key = |k: &str| get_next_delimiter_block_key(map.get(k).unwrap(), &map);
        assert_eq!(key("A").as_deref(), Some("B"));
        assert_eq!(key("C").as_deref(), Some("D"));
        assert_eq!(key("D"), None);
        assert_eq!(key("E").as_deref(), Some("F"));
        assert_eq!(key("F"), None);
    }

    #[test]
    fn test_next_delimiter_is_none_for_flat_blocks() {
        let flat = Rc::new(ContentBlock::new("x", BlockType::Unstyled, "x"));
        let map = BlockMap::from_blocks(vec![flat.clone()]);
        assert_eq!(get_next_delimiter_block_key(&flat, &map), None);
    }

    #[test]
    fn test_ancestors_and_descendants() {
        let map = forest();
        assert_eq!(get_ancestor_keys("E", &map), vec!["D".to_string()]);
        assert!(get_ancestor_keys("A", &map).is_empty());
        assert_eq!(
            get_descendant_keys("D", &map),
            vec!["E".to_string(), "F".to_string()]
        );
        assert!(is_descendant_of("C", "B", &map));
        assert!(!is_descendant_of("C", "D", &map));
    }
}
