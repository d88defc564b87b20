use crate::decorate::DEFAULT_TRIGGER;
use crate::mention::locate::{NotFound, locate};
use crate::mention::position::{NativeSelection, compute_rect};
use crate::mention::query::{QueryMode, extract_query};
use crate::model::EditorState;
use crate::spans::SpanRegistry;

/// Coordinate used while hidden so an unmeasured overlay never shows at the origin.
pub const OFFSCREEN: f64 = -9999.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
}

/// What the suggestion list needs: where to draw and what was typed.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayState {
    pub visibility: Visibility,
    pub top: f64,
    pub left: f64,
    /// Query including the trigger; stripping it is up to the candidate source
    pub query: String,
}

impl OverlayState {
    pub fn hidden() -> Self {
        Self {
            visibility: Visibility::Hidden,
            top: OFFSCREEN,
            left: OFFSCREEN,
            query: String::new(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }
}

impl Default for OverlayState {
    fn default() -> Self {
        Self::hidden()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayOptions {
    pub trigger: char,
    pub query_mode: QueryMode,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            trigger: DEFAULT_TRIGGER,
            query_mode: QueryMode::WholeSpan,
        }
    }
}

/// Hidden/visible state machine driven by document-state changes.
///
/// A change only marks a recomputation as pending; [`run_pending`] performs
/// it once the editor reports its render pass as committed. Several changes
/// before a commit collapse into one recomputation.
///
/// [`run_pending`]: TriggerOverlayController::run_pending
#[derive(Debug, Clone, Default)]
pub struct TriggerOverlayController {
    options: OverlayOptions,
    state: OverlayState,
    pending: bool,
}

impl TriggerOverlayController {
    pub fn new(options: OverlayOptions) -> Self {
        Self {
            options,
            state: OverlayState::hidden(),
            pending: false,
        }
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Record a document-state change. Supersedes any earlier pending change.
    pub fn notify_change(&mut self) {
        self.pending = true;
    }

    /// Recompute if a change is pending and the editor has committed it.
    ///
    /// Returns the newly published state, or `None` if nothing ran.
    pub fn run_pending<S, N>(
        &mut self,
        editor: &S,
        registry: &SpanRegistry,
        native: &N,
    ) -> Option<&OverlayState>
    where
        S: EditorState + ?Sized,
        N: NativeSelection + ?Sized,
    {
        if !self.pending {
            return None;
        }
        if !editor.is_committed() {
            log::warn!("overlay recomputation deferred: render pass not committed");
            return None;
        }

        self.pending = false;
        Some(self.recompute(editor, registry, native))
    }

    /// Locate, extract and position, publishing the result.
    pub fn recompute<S, N>(&mut self, editor: &S, registry: &SpanRegistry, native: &N) -> &OverlayState
    where
        S: EditorState + ?Sized,
        N: NativeSelection + ?Sized,
    {
        self.state = match self.compute(editor, registry, native) {
            Ok(state) => state,
            Err(reason) => {
                log::debug!("overlay hidden: {reason}");
                OverlayState::hidden()
            }
        };
        &self.state
    }

    fn compute<S, N>(
        &self,
        editor: &S,
        registry: &SpanRegistry,
        native: &N,
    ) -> Result<OverlayState, Hide>
    where
        S: EditorState + ?Sized,
        N: NativeSelection + ?Sized,
    {
        let leaf = locate(editor, registry)?;
        let selection = editor.selection();
        let block = editor
            .block_for_key(&selection.anchor_key)
            .ok_or(Hide::Located(NotFound::NoSpanAtCursor))?;

        let query = extract_query(
            block,
            selection,
            leaf,
            self.options.query_mode,
            self.options.trigger,
        );
        let rect = compute_rect(native, query.trigger_index).ok_or(Hide::NoNativeSelection)?;

        log::debug!(
            "overlay visible at ({}, {}) for {:?}",
            rect.left,
            rect.bottom,
            query.text
        );
        Ok(OverlayState {
            visibility: Visibility::Visible,
            top: rect.bottom,
            left: rect.left,
            query: query.text,
        })
    }
}

/// Internal reasons for hiding, logged at debug level.
#[derive(Debug, thiserror::Error)]
enum Hide {
    #[error(transparent)]
    Located(#[from] NotFound),
    #[error("no native selection to measure")]
    NoNativeSelection,
}
