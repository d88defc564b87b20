use crate::model::{EditorState, Leaf};
use crate::spans::SpanRegistry;

/// Why no trigger span is active. Expected outcomes, never surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NotFound {
    #[error("selection is not collapsed")]
    SelectionExpanded,
    #[error("editor does not have focus")]
    NoFocus,
    #[error("no mounted span contains the cursor")]
    NoSpanAtCursor,
}

/// Find the mounted span containing the caret.
///
/// Only spans in the caret's block are inspected. Registry entries whose leaf
/// is missing from the span tree are skipped: the tree may not have caught up
/// with the mount yet. With overlapping leaves the first in registry order wins.
pub fn locate<S: EditorState + ?Sized>(state: &S, registry: &SpanRegistry) -> Result<Leaf, NotFound> {
    let selection = state.selection();

    if !selection.is_collapsed() {
        return Err(NotFound::SelectionExpanded);
    }
    if !selection.has_focus {
        return Err(NotFound::NoFocus);
    }

    let anchor_key = &selection.anchor_key;
    let Some(tree) = state.block_tree(anchor_key) else {
        return Err(NotFound::NoSpanAtCursor);
    };

    registry
        .list()
        .filter(|id| &id.block_key == anchor_key)
        .filter_map(|id| tree.leaf(id.pass_id, id.leaf_id))
        .find(|leaf| leaf.contains(selection.anchor_offset))
        .ok_or(NotFound::NoSpanAtCursor)
}
