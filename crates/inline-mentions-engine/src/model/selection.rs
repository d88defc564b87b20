use crate::model::BlockKey;

/// Anchor/focus selection over the document, offsets in chars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub anchor_key: BlockKey,
    pub anchor_offset: usize,
    pub focus_key: BlockKey,
    pub focus_offset: usize,
    pub has_focus: bool,
}

impl Selection {
    /// A caret at `offset` in `key`.
    pub fn collapsed(key: BlockKey, offset: usize) -> Self {
        Self {
            anchor_key: key.clone(),
            anchor_offset: offset,
            focus_key: key,
            focus_offset: offset,
            has_focus: true,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor_key == self.focus_key && self.anchor_offset == self.focus_offset
    }

    pub fn with_focus(mut self, has_focus: bool) -> Self {
        self.has_focus = has_focus;
        self
    }

    /// The start of the selection if both ends are in the same block
    pub(crate) fn ordered_in_block(&self) -> Option<(usize, usize)> {
        (self.anchor_key == self.focus_key).then(|| {
            (
                self.anchor_offset.min(self.focus_offset),
                self.anchor_offset.max(self.focus_offset),
            )
        })
    }
}
