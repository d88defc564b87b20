use std::collections::{BTreeSet, HashMap};

use crate::decorate::MentionDecorator;
use crate::model::{Block, BlockKey, Cmd, EditorState, Patch, Selection, SpanTree};
use crate::spans::{SpanId, SpanLifecycle};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("Unknown block: {key}")]
    UnknownBlock { key: BlockKey },
}

/// In-memory editor model: ordered blocks, one selection, and the span trees
/// produced by the last render pass.
///
/// Edits go through [`Document::apply`]; span trees and the set of mounted
/// spans only move forward in [`Document::commit`]. Between the two the
/// document reports itself as uncommitted so readers can tell the span data
/// is stale.
#[derive(Debug, Clone)]
pub struct Document {
    blocks: Vec<Block>,
    selection: Selection,
    trees: HashMap<BlockKey, SpanTree>,
    /// Spans mounted by the last commit
    rendered: BTreeSet<SpanId>,
    version: u64,
    committed: bool,
}

impl Document {
    /// An empty document with one block and an unfocused caret at its start.
    pub fn new() -> Self {
        Self::from_blocks([(BlockKey::generate(), "")])
    }

    /// Build a document from `(key, text)` pairs.
    ///
    /// The caret starts unfocused at the end of the last block. Passing no
    /// blocks yields a single empty block.
    pub fn from_blocks<K, S, I>(blocks: I) -> Self
    where
        K: Into<BlockKey>,
        S: AsRef<str>,
        I: IntoIterator<Item = (K, S)>,
    {
        let mut blocks: Vec<Block> = blocks
            .into_iter()
            .map(|(key, text)| Block::new(key.into(), text.as_ref()))
            .collect();
        if blocks.is_empty() {
            blocks.push(Block::new(BlockKey::generate(), ""));
        }

        let last = &blocks[blocks.len() - 1];
        let selection = Selection::collapsed(last.key().clone(), last.char_len()).with_focus(false);

        Self {
            blocks,
            selection,
            trees: HashMap::new(),
            rendered: BTreeSet::new(),
            version: 0,
            committed: false,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Mounted spans as of the last commit
    pub fn rendered_spans(&self) -> impl Iterator<Item = &SpanId> {
        self.rendered.iter()
    }

    /// Apply a command to the text and selection.
    ///
    /// Leaves the document uncommitted until the next [`Document::commit`].
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, DocumentError> {
        let mut changed = Vec::new();

        match cmd {
            Cmd::InsertText { text } => {
                let (key, at) = self.delete_selection(&mut changed)?;
                debug_assert!(!text.contains('\n'), "use SplitBlock for newlines");
                let index = self.index_of(&key)?;
                self.blocks[index].insert(at, &text);
                self.selection = Selection::collapsed(key.clone(), at + text.chars().count());
                push_unique(&mut changed, key);
            }
            Cmd::DeleteBackward => {
                if self.selection.is_collapsed() {
                    self.delete_char_before_caret(&mut changed)?;
                } else {
                    let (key, at) = self.delete_selection(&mut changed)?;
                    self.selection = Selection::collapsed(key, at);
                }
            }
            Cmd::MoveLeft => {
                let (key, offset) = self.caret();
                let index = self.index_of(&key)?;
                self.selection = if offset > 0 {
                    Selection::collapsed(key, offset - 1)
                } else if index > 0 {
                    let prev = &self.blocks[index - 1];
                    Selection::collapsed(prev.key().clone(), prev.char_len())
                } else {
                    Selection::collapsed(key, 0)
                };
            }
            Cmd::MoveRight => {
                let (key, offset) = self.caret();
                let index = self.index_of(&key)?;
                let len = self.blocks[index].char_len();
                self.selection = if offset < len {
                    Selection::collapsed(key, offset + 1)
                } else if let Some(next) = self.blocks.get(index + 1) {
                    Selection::collapsed(next.key().clone(), 0)
                } else {
                    Selection::collapsed(key, len)
                };
            }
            Cmd::MoveTo { block, offset } => {
                let offset = self.clamp_offset(&block, offset)?;
                self.selection = Selection::collapsed(block, offset);
            }
            Cmd::Select {
                anchor_block,
                anchor_offset,
                focus_block,
                focus_offset,
            } => {
                let anchor_offset = self.clamp_offset(&anchor_block, anchor_offset)?;
                let focus_offset = self.clamp_offset(&focus_block, focus_offset)?;
                self.selection = Selection {
                    anchor_key: anchor_block,
                    anchor_offset,
                    focus_key: focus_block,
                    focus_offset,
                    has_focus: true,
                };
            }
            Cmd::SplitBlock => {
                let (key, at) = self.delete_selection(&mut changed)?;
                let index = self.index_of(&key)?;
                let tail = self.blocks[index].split_off(at);
                let new_key = self.unused_key(BlockKey::generate);
                self.blocks
                    .insert(index + 1, Block::new(new_key.clone(), &tail));
                self.selection = Selection::collapsed(new_key.clone(), 0);
                push_unique(&mut changed, key);
                push_unique(&mut changed, new_key);
            }
            Cmd::Focus => self.selection.has_focus = true,
            Cmd::Blur => self.selection.has_focus = false,
        }

        self.version += 1;
        self.committed = false;

        Ok(Patch {
            changed_blocks: changed,
            new_selection: self.selection.clone(),
            version: self.version,
        })
    }

    /// Render pass: re-decorate every block and report span mount/unmount
    /// events for the difference against the previous render.
    pub fn commit<L: SpanLifecycle>(&mut self, decorator: &MentionDecorator, lifecycle: &mut L) {
        let mut trees = HashMap::with_capacity(self.blocks.len());
        let mut mounted = BTreeSet::new();

        for block in &self.blocks {
            let tree = decorator.decorate(&block.text());
            for (pass_id, range) in tree.decorated() {
                for leaf_id in 0..range.leaves.len() {
                    mounted.insert(SpanId::new(block.key().clone(), pass_id, leaf_id));
                }
            }
            trees.insert(block.key().clone(), tree);
        }

        for gone in self.rendered.difference(&mounted) {
            lifecycle.on_unmount(gone);
        }
        for added in mounted.difference(&self.rendered) {
            lifecycle.on_mount(added.clone());
        }

        self.trees = trees;
        self.rendered = mounted;
        self.committed = true;
    }

    /// Draw keys from `generate` until one is not taken by an existing block.
    fn unused_key(&self, mut generate: impl FnMut() -> BlockKey) -> BlockKey {
        loop {
            let key = generate();
            if self.blocks.iter().all(|block| block.key() != &key) {
                return key;
            }
            log::debug!("block key {key} already in use, regenerating");
        }
    }

    fn caret(&self) -> (BlockKey, usize) {
        (
            self.selection.focus_key.clone(),
            self.selection.focus_offset,
        )
    }

    fn index_of(&self, key: &BlockKey) -> Result<usize, DocumentError> {
        self.blocks
            .iter()
            .position(|block| block.key() == key)
            .ok_or_else(|| DocumentError::UnknownBlock { key: key.clone() })
    }

    fn clamp_offset(&self, key: &BlockKey, offset: usize) -> Result<usize, DocumentError> {
        let index = self.index_of(key)?;
        Ok(offset.min(self.blocks[index].char_len()))
    }

    /// Remove the selected text, returning the caret position left behind.
    fn delete_selection(
        &mut self,
        changed: &mut Vec<BlockKey>,
    ) -> Result<(BlockKey, usize), DocumentError> {
        if self.selection.is_collapsed() {
            return Ok(self.caret());
        }

        if let Some((start, end)) = self.selection.ordered_in_block() {
            let key = self.selection.anchor_key.clone();
            let index = self.index_of(&key)?;
            self.blocks[index].delete(start, end);
            push_unique(changed, key.clone());
            return Ok((key, start));
        }

        // Selection spans blocks: keep the head of the first, the tail of the
        // last, drop everything between
        let anchor = self.index_of(&self.selection.anchor_key)?;
        let focus = self.index_of(&self.selection.focus_key)?;
        let (first, first_offset, last, last_offset) = if anchor < focus {
            (anchor, self.selection.anchor_offset, focus, self.selection.focus_offset)
        } else {
            (focus, self.selection.focus_offset, anchor, self.selection.anchor_offset)
        };

        let tail = {
            let last_block = &self.blocks[last];
            last_block.slice(last_offset, last_block.char_len())
        };
        let first_len = self.blocks[first].char_len();
        self.blocks[first].delete(first_offset, first_len);
        self.blocks[first].insert(first_offset, &tail);
        self.blocks.drain(first + 1..=last);

        let key = self.blocks[first].key().clone();
        push_unique(changed, key.clone());
        Ok((key, first_offset))
    }

    fn delete_char_before_caret(&mut self, changed: &mut Vec<BlockKey>) -> Result<(), DocumentError> {
        let (key, offset) = self.caret();
        let index = self.index_of(&key)?;

        if offset > 0 {
            self.blocks[index].delete(offset - 1, offset);
            self.selection = Selection::collapsed(key.clone(), offset - 1);
            push_unique(changed, key);
        } else if index > 0 {
            let removed = self.blocks.remove(index);
            let prev = &mut self.blocks[index - 1];
            let join_at = prev.char_len();
            prev.insert(join_at, &removed.text());
            let prev_key = prev.key().clone();
            self.selection = Selection::collapsed(prev_key.clone(), join_at);
            push_unique(changed, prev_key);
        }

        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState for Document {
    fn selection(&self) -> &Selection {
        &self.selection
    }

    fn block_for_key(&self, key: &BlockKey) -> Option<&Block> {
        self.blocks.iter().find(|block| block.key() == key)
    }

    fn block_tree(&self, key: &BlockKey) -> Option<&SpanTree> {
        self.trees.get(key)
    }

    fn is_committed(&self) -> bool {
        self.committed
    }
}

fn push_unique(changed: &mut Vec<BlockKey>, key: BlockKey) {
    if !changed.contains(&key) {
        changed.push(key);
    }
}
