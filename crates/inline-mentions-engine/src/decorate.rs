//! Mention decoration pass: scans block text for trigger spans and builds the
//! block's [`SpanTree`].

use regex::Regex;

use crate::model::{DecoratedRange, Leaf, SpanTree};

pub const DEFAULT_TRIGGER: char = '@';

/// Finds `(?:\s|^)<trigger>\w*` spans in block text.
///
/// A span includes the single whitespace char that precedes the trigger, so
/// `"hi @ap"` decorates `" @ap"`.
#[derive(Debug, Clone)]
pub struct MentionDecorator {
    trigger: char,
    pattern: Regex,
}

impl MentionDecorator {
    pub fn new(trigger: char) -> Self {
        let source = format!(r"(?:\s|^){}\w*", regex::escape(&trigger.to_string()));
        let pattern = Regex::new(&source).expect("escaped trigger pattern is a valid regex");
        Self { trigger, pattern }
    }

    pub fn trigger(&self) -> char {
        self.trigger
    }

    /// Non-overlapping matches in text order, as char offsets.
    pub fn find_spans(&self, text: &str) -> Vec<Leaf> {
        let mut spans = Vec::new();
        // Running (byte, char) position so each match only counts new chars
        let mut byte_pos = 0;
        let mut char_pos = 0;

        for found in self.pattern.find_iter(text) {
            char_pos += text[byte_pos..found.start()].chars().count();
            let start = char_pos;
            char_pos += found.as_str().chars().count();
            byte_pos = found.end();
            spans.push(Leaf::new(start, char_pos));
        }

        spans
    }

    /// Build the span tree for one block's text.
    pub fn decorate(&self, text: &str) -> SpanTree {
        let len = text.chars().count();
        let mut ranges = Vec::new();
        let mut cursor = 0;

        let plain = |start: usize, end: usize| DecoratedRange {
            start,
            end,
            decorated: false,
            leaves: vec![Leaf::new(start, end)],
        };

        for span in self.find_spans(text) {
            if span.start > cursor {
                ranges.push(plain(cursor, span.start));
            }
            ranges.push(DecoratedRange {
                start: span.start,
                end: span.end,
                decorated: true,
                leaves: vec![span],
            });
            cursor = span.end;
        }

        if cursor < len || ranges.is_empty() {
            ranges.push(plain(cursor, len));
        }

        SpanTree { ranges }
    }
}

impl Default for MentionDecorator {
    fn default() -> Self {
        Self::new(DEFAULT_TRIGGER)
    }
}
