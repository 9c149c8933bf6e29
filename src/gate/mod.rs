//! Host-supplied feature gate.
//!
//! The host decides which experimental behaviors are on by installing a
//! `(flag name) -> bool` function. The gate is consulted every time a decision
//! is made, so reconfiguring it takes effect immediately for subsequent edits.

use std::cell::RefCell;
use std::rc::Rc;

/// Flag controlling whether new content is built from tree blocks.
pub const TREE_DATA_SUPPORT: &str = "draft_tree_data_support";

pub type GateFn = Rc<dyn Fn(&str) -> bool>;

thread_local! {
    static GATE: RefCell<Option<GateFn>> = const { RefCell::new(None) };
}

/// Installs the gate function for this thread.
pub fn set_feature_gate<F>(gate: F)
where
    F: Fn(&str) -> bool + 'static,
{
    GATE.with(|slot| *slot.borrow_mut() = Some(Rc::new(gate)));
}

/// Removes any installed gate; every flag then reads as disabled.
pub fn reset_feature_gate() {
    GATE.with(|slot| *slot.borrow_mut() = None);
}

/// Looks up `flag` through the installed gate.
pub fn is_enabled(flag: &str) -> bool {
    let gate = GATE.with(|slot| slot.borrow().clone());
    match gate {
        Some(gate) => gate(flag),
        None => false,
    }
}

/// Shorthand for the tree data support flag.
pub fn tree_data_support() -> bool {
    is_enabled(TREE_DATA_SUPPORT)
}
