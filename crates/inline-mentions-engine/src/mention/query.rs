use crate::model::{Block, Leaf, Selection};

/// How much of the located span forms the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    /// Only the text typed up to the caret.
    UntilCursor,
    /// The whole matched span, including text after the caret.
    #[default]
    WholeSpan,
}

impl QueryMode {
    pub fn from_until_cursor(query_until_cursor: bool) -> Self {
        if query_until_cursor {
            QueryMode::UntilCursor
        } else {
            QueryMode::WholeSpan
        }
    }
}

/// The in-progress query of a located span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedQuery {
    /// Query text, starting at the trigger when one was found
    pub text: String,
    /// Char index of the trigger within the span text (the narrowing offset
    /// for positioning). `None` if the span holds no trigger.
    pub trigger_index: Option<usize>,
}

/// Derive the query text for `leaf` in `block`.
///
/// The span text is cut at its last trigger so whitespace captured in front
/// of the trigger is dropped. A span without a trigger is returned whole.
pub fn extract_query(
    block: &Block,
    selection: &Selection,
    leaf: Leaf,
    mode: QueryMode,
    trigger: char,
) -> ExtractedQuery {
    let end = match mode {
        QueryMode::UntilCursor => leaf.end.min(selection.anchor_offset),
        QueryMode::WholeSpan => leaf.end,
    };
    let span_text = block.slice(leaf.start, end.max(leaf.start));

    let trigger_index = span_text
        .chars()
        .enumerate()
        .filter(|&(_, ch)| ch == trigger)
        .map(|(index, _)| index)
        .last();

    let text = match trigger_index {
        Some(index) => span_text.chars().skip(index).collect(),
        None => span_text,
    };

    ExtractedQuery {
        text,
        trigger_index,
    }
}

/// Strip everything up to and including the first trigger, for handing the
/// bare query to a candidate source. Input without a trigger is returned as is.
pub fn without_trigger(query: &str, trigger: char) -> &str {
    match query.find(trigger) {
        Some(index) => &query[index + trigger.len_utf8()..],
        None => query,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockKey;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn block(text: &str) -> Block {
        Block::new(BlockKey::from("a"), text)
    }

    fn caret(offset: usize) -> Selection {
        Selection::collapsed(BlockKey::from("a"), offset)
    }

    #[rstest]
    #[case(QueryMode::UntilCursor, 9, "@wo")]
    #[case(QueryMode::UntilCursor, 12, "@world")]
    #[case(QueryMode::UntilCursor, 7, "@")]
    #[case(QueryMode::WholeSpan, 9, "@world")]
    #[case(QueryMode::WholeSpan, 6, "@world")]
    fn extracts_query_from_span(
        #[case] mode: QueryMode,
        #[case] offset: usize,
        #[case] expected: &str,
    ) {
        let query = extract_query(
            &block("hello @world"),
            &caret(offset),
            Leaf::new(5, 12),
            mode,
            '@',
        );
        assert_eq!(query.text, expected);
        assert_eq!(query.trigger_index, Some(1));
    }

    #[test]
    fn caret_before_trigger_yields_empty_query() {
        // Caret between the captured space and the trigger
        let query = extract_query(
            &block("hi @ap"),
            &caret(2),
            Leaf::new(2, 6),
            QueryMode::UntilCursor,
            '@',
        );
        assert_eq!(
            query,
            ExtractedQuery {
                text: String::new(),
                trigger_index: None,
            }
        );
    }

    #[test]
    fn span_without_trigger_is_returned_whole() {
        let query = extract_query(
            &block("plain words"),
            &caret(5),
            Leaf::new(0, 5),
            QueryMode::WholeSpan,
            '@',
        );
        assert_eq!(query.text, "plain");
        assert_eq!(query.trigger_index, None);
    }

    #[test]
    fn last_trigger_wins() {
        let query = extract_query(
            &block("@a@b"),
            &caret(4),
            Leaf::new(0, 4),
            QueryMode::WholeSpan,
            '@',
        );
        assert_eq!(query.text, "@b");
        assert_eq!(query.trigger_index, Some(2));
    }

    #[test]
    fn multibyte_text_uses_char_offsets() {
        let query = extract_query(
            &block("grüße @jürgen"),
            &caret(10),
            Leaf::new(5, 13),
            QueryMode::UntilCursor,
            '@',
        );
        assert_eq!(query.text, "@jür");
    }

    #[test]
    fn empty_leaf_yields_empty_query() {
        let query = extract_query(&block(""), &caret(0), Leaf::new(0, 0), QueryMode::WholeSpan, '@');
        assert_eq!(query.text, "");
    }

    #[rstest]
    #[case("@ap", "ap")]
    #[case("@", "")]
    #[case("ap", "ap")]
    #[case("@a@b", "a@b")]
    fn strips_first_trigger(#[case] query: &str, #[case] expected: &str) {
        assert_eq!(without_trigger(query, '@'), expected);
    }

    #[test]
    fn mode_from_flag() {
        assert_eq!(QueryMode::from_until_cursor(true), QueryMode::UntilCursor);
        assert_eq!(QueryMode::from_until_cursor(false), QueryMode::WholeSpan);
        assert_eq!(QueryMode::default(), QueryMode::WholeSpan);
    }
}
