use serde::Serialize;
use xi_rope::Rope;

/// Stable identifier of a block within a document.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BlockKey(pub String);

impl BlockKey {
    /// Generate a short random key for a freshly created block
    pub fn generate() -> Self {
        let id = uuid::Uuid::new_v4().simple().to_string();
        Self(id[..5].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlockKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl std::fmt::Display for BlockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Character bounds `[start, end]` of one decorated span within a block.
///
/// Offsets count `char`s of the block's plain text. `end` is inclusive for
/// cursor containment (a caret sitting right after the span is still inside it)
/// and exclusive for slicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Leaf {
    pub start: usize,
    pub end: usize,
}

impl Leaf {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "leaf start {start} past end {end}");
        Self { start, end }
    }

    /// Returns true if a caret at `offset` sits within the leaf bounds.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

/// One range of a block's span tree: either a decorated span or the plain
/// text between spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecoratedRange {
    pub start: usize,
    pub end: usize,
    pub decorated: bool,
    pub leaves: Vec<Leaf>,
}

/// Per-block decoration output: ranges indexed by decoration pass id, leaves
/// within each range indexed by leaf id.
///
/// Ranges cover the whole block text in order, alternating between plain and
/// decorated text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpanTree {
    pub ranges: Vec<DecoratedRange>,
}

impl SpanTree {
    /// Nested lookup: pass id, then leaf id within that pass.
    pub fn leaf(&self, pass_id: usize, leaf_id: usize) -> Option<Leaf> {
        self.ranges.get(pass_id)?.leaves.get(leaf_id).copied()
    }

    /// Iterate `(pass_id, range)` pairs for decorated ranges only.
    pub fn decorated(&self) -> impl Iterator<Item = (usize, &DecoratedRange)> {
        self.ranges
            .iter()
            .enumerate()
            .filter(|(_, range)| range.decorated)
    }

    /// Range whose bounds contain `offset`. On a boundary a decorated range
    /// wins over its plain neighbour, matching the inclusive [`Leaf::contains`]
    /// used to locate spans; otherwise the earlier range wins.
    pub fn range_at(&self, offset: usize) -> Option<&DecoratedRange> {
        let mut containing = self
            .ranges
            .iter()
            .filter(|range| range.start <= offset && offset <= range.end);
        let first = containing.next()?;
        if first.decorated {
            return Some(first);
        }
        Some(containing.find(|range| range.decorated).unwrap_or(first))
    }
}

/// A block of plain text, stored in a rope.
#[derive(Clone)]
pub struct Block {
    key: BlockKey,
    text: Rope,
}

impl Block {
    pub fn new(key: BlockKey, text: &str) -> Self {
        Self {
            key,
            text: Rope::from(text),
        }
    }

    pub fn key(&self) -> &BlockKey {
        &self.key
    }

    /// Get the block's plain text
    pub fn text(&self) -> String {
        self.text.slice_to_cow(0..self.text.len()).into_owned()
    }

    /// Length of the text in chars
    pub fn char_len(&self) -> usize {
        self.text.slice_to_cow(0..self.text.len()).chars().count()
    }

    /// Substring by char offsets, clamped to the text.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let text = self.text();
        let start_byte = byte_offset(&text, start);
        let end_byte = byte_offset(&text, end).max(start_byte);
        text[start_byte..end_byte].to_string()
    }

    pub(crate) fn insert(&mut self, at: usize, inserted: &str) {
        let at = byte_offset(&self.text(), at);
        self.text.edit(at..at, inserted);
    }

    pub(crate) fn delete(&mut self, start: usize, end: usize) {
        let text = self.text();
        let start = byte_offset(&text, start);
        let end = byte_offset(&text, end).max(start);
        self.text.edit(start..end, "");
    }

    /// Split the block at `at`, keeping the head and returning the tail text.
    pub(crate) fn split_off(&mut self, at: usize) -> String {
        let tail = self.slice(at, self.char_len());
        self.delete(at, self.char_len());
        tail
    }
}

impl std::fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Block")
            .field("key", &self.key)
            .field("text", &self.text())
            .finish()
    }
}

/// Convert a char offset into a byte offset, clamping past-the-end offsets.
pub(crate) fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}
