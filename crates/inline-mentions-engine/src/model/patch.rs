use crate::model::{BlockKey, Selection};

/// Result of applying a command
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub changed_blocks: Vec<BlockKey>,
    pub new_selection: Selection,
    pub version: u64,
}
