use crate::decorate::MentionDecorator;
use crate::mention::{OverlayOptions, OverlayState, TextLayout, TriggerOverlayController};
use crate::model::{Cmd, Document, DocumentError, Patch};
use crate::spans::SpanRegistry;

/// One editing session: the document, its span registry and the overlay
/// controller, updated in two phases per command.
///
/// 1. the command is applied and the controller is told a change happened
/// 2. the render pass commits span trees and mount/unmount events, then the
///    pending recomputation runs against the committed state
#[derive(Debug, Clone)]
pub struct EditorSession {
    document: Document,
    registry: SpanRegistry,
    decorator: MentionDecorator,
    controller: TriggerOverlayController,
}

impl EditorSession {
    pub fn new(document: Document, options: OverlayOptions) -> Self {
        let mut session = Self {
            document,
            registry: SpanRegistry::new(),
            decorator: MentionDecorator::new(options.trigger),
            controller: TriggerOverlayController::new(options),
        };
        session
            .document
            .commit(&session.decorator, &mut session.registry);
        session
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn registry(&self) -> &SpanRegistry {
        &self.registry
    }

    pub fn overlay(&self) -> &OverlayState {
        self.controller.state()
    }

    pub fn trigger(&self) -> char {
        self.decorator.trigger()
    }

    /// Apply `cmd`, commit the render pass and recompute the overlay.
    ///
    /// The published state is available from [`EditorSession::overlay`].
    pub fn apply<L: TextLayout>(&mut self, cmd: Cmd, layout: &L) -> Result<Patch, DocumentError> {
        let patch = self.document.apply(cmd)?;
        self.controller.notify_change();

        self.document.commit(&self.decorator, &mut self.registry);

        let native = layout.native_selection(&self.document);
        self.controller
            .run_pending(&self.document, &self.registry, &native);

        Ok(patch)
    }

    /// Re-measure without an edit, e.g. after the layout moved.
    pub fn relayout<L: TextLayout>(&mut self, layout: &L) -> &OverlayState {
        let native = layout.native_selection(&self.document);
        self.controller
            .recompute(&self.document, &self.registry, &native)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mention::{GridLayout, GridMetrics, QueryMode};
    use crate::model::EditorState;
    use pretty_assertions::assert_eq;

    fn layout() -> GridLayout {
        GridLayout::new(GridMetrics::cells(0, 0, 80))
    }

    #[test]
    fn new_session_commits_initial_render() {
        let session = EditorSession::new(
            Document::from_blocks([("a", "@already here")]),
            OverlayOptions::default(),
        );
        assert!(session.document().is_committed());
        assert_eq!(session.registry().len(), 1);
        assert!(!session.overlay().is_visible());
    }

    #[test]
    fn registry_tracks_rendered_spans_after_each_command() {
        let mut session = EditorSession::new(Document::from_blocks([("a", "")]), OverlayOptions::default());
        let layout = layout();

        session.apply(Cmd::insert("@x @y"), &layout).unwrap();
        assert_eq!(session.registry().len(), 2);

        session.apply(Cmd::DeleteBackward, &layout).unwrap();
        assert_eq!(session.registry().len(), 2, "\"@x @\" still has two spans");

        session.apply(Cmd::DeleteBackward, &layout).unwrap();
        assert_eq!(session.registry().len(), 1);

        let rendered: Vec<_> = session.document().rendered_spans().cloned().collect();
        let registered: Vec<_> = session.registry().list().cloned().collect();
        assert_eq!(rendered, registered);
    }

    #[test]
    fn custom_trigger_flows_through() {
        let options = OverlayOptions {
            trigger: '#',
            query_mode: QueryMode::UntilCursor,
        };
        let mut session = EditorSession::new(Document::from_blocks([("a", "")]), options);
        session.apply(Cmd::insert("see #iss"), &layout()).unwrap();

        assert_eq!(session.trigger(), '#');
        assert_eq!(session.overlay().query, "#iss");
        assert_eq!(session.overlay().left, 4.0);
    }

    #[test]
    fn whole_span_query_from_span_start_measures_the_trigger_cell() {
        let mut session = EditorSession::new(Document::from_blocks([("blk", "hi @ap")]), OverlayOptions::default());
        session.apply(Cmd::move_to("blk", 2), &layout()).unwrap();

        let overlay = session.overlay();
        assert_eq!(overlay.query, "@ap");
        assert_eq!(overlay.left, 3.0);
        assert_eq!(overlay.top, 1.0);
    }

    #[test]
    fn relayout_moves_visible_overlay() {
        let mut session = EditorSession::new(Document::from_blocks([("a", "")]), OverlayOptions::default());
        session.apply(Cmd::insert("@ap"), &layout()).unwrap();
        assert_eq!(session.overlay().left, 0.0);

        let shifted = GridLayout::new(GridMetrics::cells(10, 5, 80));
        let state = session.relayout(&shifted);
        assert_eq!(state.left, 10.0);
        assert_eq!(state.top, 6.0);
    }
}
