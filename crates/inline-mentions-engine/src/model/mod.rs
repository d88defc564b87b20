//! Editor model consumed by the mention core.
//!
//! The core only ever reads through [`EditorState`]. [`Document`] is an
//! in-memory implementation used by the terminal demo and the tests; any
//! editor that can answer these queries can host the overlay instead.

pub mod block;
pub mod commands;
pub mod document;
pub mod patch;
pub mod selection;

pub use block::{Block, BlockKey, DecoratedRange, Leaf, SpanTree};
pub use commands::Cmd;
pub use document::{Document, DocumentError};
pub use patch::Patch;
pub use selection::Selection;

/// Read-only view of a live editing session.
pub trait EditorState {
    fn selection(&self) -> &Selection;

    fn block_for_key(&self, key: &BlockKey) -> Option<&Block>;

    /// Span tree from the latest render pass for a block
    fn block_tree(&self, key: &BlockKey) -> Option<&SpanTree>;

    /// Whether span trees and mounted spans reflect the latest edit.
    fn is_committed(&self) -> bool {
        true
    }
}
