//! The raw interchange format.
//!
//! Raw content is the plain JSON shape documents are stored and exchanged in:
//! blocks carry their text plus style and entity *ranges*, and entities live
//! in a separate map keyed by small integers. Character lists never appear in
//! raw content; they are rebuilt from the ranges on import.
//!
//! # Example
//!
//! ```
//! use draftquill::raw::{convert_from_raw, convert_to_raw, RawDraftContentState};
//!
//! let json = r#"{
//!     "blocks": [{
//!         "key": "a1",
//!         "type": "unstyled",
//!         "text": "Hello",
//!         "depth": 0,
//!         "inlineStyleRanges": [{"offset": 0, "length": 5, "style": "BOLD"}],
//!         "entityRanges": [],
//!         "data": {}
//!     }],
//!     "entityMap": {}
//! }"#;
//! let raw = RawDraftContentState::from_json(json).unwrap();
//! let content = convert_from_raw(&raw).unwrap();
//! assert!(content.block("a1").unwrap().character_list()[4].has_style("BOLD"));
//! assert_eq!(convert_to_raw(&content).unwrap(), raw);
//! ```

pub mod convert;
pub mod ranges;
pub mod types;

pub use crate::model::content_state::ImportedContent;
pub use convert::{convert_from_raw, convert_to_raw};
pub use ranges::{
    decode_entity_ranges, decode_inline_style_ranges, encode_entity_ranges,
    encode_inline_style_ranges,
};
pub use types::{
    InlineStyleRange, RawDraftContentBlock, RawDraftContentState, RawDraftEntity, RawEntityRange,
};
