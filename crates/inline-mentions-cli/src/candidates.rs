use inline_mentions_engine::without_trigger;

/// Narrows the configured candidates to those matching the overlay query.
///
/// Starts with no matches. The first query seen after a reset is only
/// recorded; matching runs when the query without its trigger changes, so
/// redraws between keystrokes reuse the previous result.
pub struct CandidateFilter {
    candidates: Vec<String>,
    trigger: char,
    last: Option<String>,
    matches: Vec<usize>,
}

impl CandidateFilter {
    pub fn new(candidates: Vec<String>, trigger: char) -> Self {
        Self {
            candidates,
            trigger,
            last: None,
            matches: Vec::new(),
        }
    }

    /// Update for `query` (which still carries its trigger). Returns whether
    /// the match list was recomputed.
    pub fn update(&mut self, query: &str) -> bool {
        let needle = without_trigger(query, self.trigger);
        match self.last.as_deref() {
            None => {
                self.last = Some(needle.to_string());
                return false;
            }
            Some(last) if last == needle => return false,
            Some(_) => {}
        }

        self.matches = self
            .candidates
            .iter()
            .enumerate()
            .filter(|(_, candidate)| candidate.to_lowercase().contains(needle))
            .map(|(index, _)| index)
            .collect();
        log::debug!(
            "query {:?} matches {} of {} candidates",
            needle,
            self.matches.len(),
            self.candidates.len()
        );
        self.last = Some(needle.to_string());
        true
    }

    /// Forget the cached query and matches, e.g. when the overlay hides.
    pub fn reset(&mut self) {
        self.last = None;
        self.matches.clear();
    }

    pub fn matches(&self) -> impl Iterator<Item = &str> {
        self.matches
            .iter()
            .map(|&index| self.candidates[index].as_str())
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
