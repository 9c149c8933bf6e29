//! Canned documents shared by unit and integration tests.

use crate::model::block::{BlockLinks, BlockType, CharacterList, ContentBlock};
use crate::model::block_map::BlockMapBuilder;
use crate::model::character::{CharacterMetadata, InlineStyle};
use crate::model::content_state::ContentState;
use crate::model::entity::{EntityMutability, EntityStore};
use crate::model::selection::SelectionState;
use std::rc::Rc;

fn styled(text: &str, style: &[&str], entity: Option<&str>) -> CharacterList {
    let style: InlineStyle = style.iter().map(|s| s.to_string()).collect();
    let character = CharacterMetadata::create(style, entity.map(str::to_string));
    vec![character; text.chars().count()]
}

fn block(key: &str, block_type: BlockType, text: &str, chars: CharacterList) -> Rc<ContentBlock> {
    Rc::new(ContentBlock::new(key, block_type, "").with_text(text, chars))
}

/// Six flat blocks:
///
/// | key | type | text | characters |
/// |-----|------|------|------------|
/// | `a` | unstyled | "Alpha" | BOLD |
/// | `b` | unordered-list-item | "Bravo" | ITALIC, IMMUTABLE `IMAGE` entity |
/// | `c` | code-block | "Test" | plain |
/// | `d` | code-block | "" | |
/// | `e` | code-block | "" | |
/// | `f` | blockquote | "Charlie" | ITALIC |
///
/// Both selections are collapsed at the start of `a`, with focus.
pub fn sample_content_state() -> ContentState {
    let store = Rc::new(EntityStore::new());
    let image = store.create("IMAGE", EntityMutability::Immutable, None);

    let blocks = vec![
        block("a", BlockType::Unstyled, "Alpha", styled("Alpha", &["BOLD"], None)),
        block(
            "b",
            BlockType::UnorderedListItem,
            "Bravo",
            styled("Bravo", &["ITALIC"], Some(&image)),
        ),
        block("c", BlockType::CodeBlock, "Test", styled("Test", &[], None)),
        block("d", BlockType::CodeBlock, "", Vec::new()),
        block("e", BlockType::CodeBlock, "", Vec::new()),
        block(
            "f",
            BlockType::Blockquote,
            "Charlie",
            styled("Charlie", &["ITALIC"], None),
        ),
    ];

    let selection = SelectionState::collapsed("a", 0).with_has_focus(true);
    ContentState::new(
        BlockMapBuilder::create_from_array(blocks),
        selection.clone(),
        selection,
        store,
    )
}

/// A nested document:
///
/// ```text
/// alpha      "Alpha"
/// container  ""
///   bravo    "Bravo"
///   charlie  "Charlie"
/// delta      "Delta"
/// ```
///
/// Both selections are collapsed at the start of `alpha`, with focus.
pub fn tree_content_state() -> ContentState {
    let node = |key: &str, text: &str, links: BlockLinks| {
        Rc::new(ContentBlock::new_tree(key, BlockType::Unstyled, text).with_links(Some(links)))
    };
    let link = |parent: Option<&str>, children: &[&str], prev: Option<&str>, next: Option<&str>| {
        BlockLinks {
            parent: parent.map(str::to_string),
            children: children.iter().map(|c| c.to_string()).collect(),
            prev_sibling: prev.map(str::to_string),
            next_sibling: next.map(str::to_string),
        }
    };

    let blocks = vec![
        node("alpha", "Alpha", link(None, &[], None, Some("container"))),
        node(
            "container",
            "",
            link(None, &["bravo", "charlie"], Some("alpha"), Some("delta")),
        ),
        node("bravo", "Bravo", link(Some("container"), &[], None, Some("charlie"))),
        node("charlie", "Charlie", link(Some("container"), &[], Some("bravo"), None)),
        node("delta", "Delta", link(None, &[], Some("container"), None)),
    ];

    let selection = SelectionState::collapsed("alpha", 0).with_has_focus(true);
    ContentState::new(
        BlockMapBuilder::create_from_array(blocks),
        selection.clone(),
        selection,
        Rc::new(EntityStore::new()),
    )
}
