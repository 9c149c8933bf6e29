//! Word segments of segmented entities.
//!
//! Text of a `SEGMENTED` entity is removed a space-delimited segment at a
//! time. Given the selection and the entity's text, [`get_removal_range`]
//! widens the selection to whole segments, taking one adjoining space with it
//! so that no double or dangling spaces are left behind.

use crate::transaction::RemovalDirection;

/// Widens `[selection_start, selection_end)` to whole segments of `text`,
/// which starts at `entity_start` within its block. Returns `(start, end)`.
pub fn get_removal_range(
    selection_start: usize,
    selection_end: usize,
    text: &str,
    entity_start: usize,
    direction: RemovalDirection,
) -> (usize, usize) {
    let pieces: Vec<&str> = text.split(' ').collect();
    let count = pieces.len();
    let lengths = pieces.iter().enumerate().map(|(index, piece)| {
        let len = piece.chars().count();
        let padded = match direction {
            RemovalDirection::Forward => index > 0,
            RemovalDirection::Backward => index + 1 < count,
        };
        if padded {
            len + 1
        } else {
            len
        }
    });

    let mut segment_start = entity_start;
    let mut removal: Option<(usize, usize)> = None;
    for length in lengths {
        let segment_end = segment_start + length;
        if selection_start < segment_end && segment_start < selection_end {
            removal = Some(match removal {
                Some((start, _)) => (start, segment_end),
                None => (segment_start, segment_end),
            });
        } else if removal.is_some() {
            break;
        }
        segment_start = segment_end;
    }

    let (mut start, mut end) = removal.unwrap_or((selection_start, selection_end));
    let entity_end = entity_start + text.chars().count();
    let at_start = start == entity_start;
    let at_end = end == entity_end;
    if at_start != at_end {
        match direction {
            RemovalDirection::Forward if end != entity_end => end += 1,
            RemovalDirection::Backward if start != entity_start => start -= 1,
            _ => {}
        }
    }
    (start, end)
}
