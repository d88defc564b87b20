//! End-to-end overlay scenarios: typing and moving through a session and
//! checking what the suggestion list would be told.

use inline_mentions_engine::{
    BlockKey, Cmd, Document, EditorSession, EditorState, GridLayout, GridMetrics, OFFSCREEN,
    OverlayOptions, OverlayState, QueryMode, Visibility, without_trigger,
};
use pretty_assertions::assert_eq;

fn layout() -> GridLayout {
    GridLayout::new(GridMetrics {
        origin_x: 20.0,
        origin_y: 40.0,
        cell_width: 8.0,
        line_height: 16.0,
        columns: 60,
    })
}

fn until_cursor() -> OverlayOptions {
    OverlayOptions {
        trigger: '@',
        query_mode: QueryMode::UntilCursor,
    }
}

fn typed(text: &str, options: OverlayOptions) -> EditorSession {
    let mut session = EditorSession::new(Document::from_blocks([("blk", "")]), options);
    let layout = layout();
    for ch in text.chars() {
        session.apply(Cmd::insert(ch.to_string()), &layout).unwrap();
    }
    session
}

#[test]
fn typing_a_mention_shows_overlay_below_trigger() {
    let session = typed("hi @ap", until_cursor());

    assert_eq!(
        session.overlay(),
        &OverlayState {
            visibility: Visibility::Visible,
            // Row 0 bottom edge, '@' in column 3
            top: 56.0,
            left: 20.0 + 3.0 * 8.0,
            query: "@ap".to_string(),
        }
    );
    assert_eq!(without_trigger(&session.overlay().query, '@'), "ap");
}

#[test]
fn moving_out_of_the_span_hides_overlay() {
    let mut session = typed("hi @ap", until_cursor());
    session.apply(Cmd::move_to("blk", 1), &layout()).unwrap();

    assert_eq!(session.overlay(), &OverlayState::hidden());
    assert_eq!(session.overlay().top, OFFSCREEN);
}

#[test]
fn caret_at_span_start_positions_overlay_at_trigger() {
    // Caret right after "hi", on the boundary of " @ap"
    let mut session = typed("hi @ap", OverlayOptions::default());
    session.apply(Cmd::move_to("blk", 2), &layout()).unwrap();

    assert_eq!(
        session.overlay(),
        &OverlayState {
            visibility: Visibility::Visible,
            top: 56.0,
            left: 20.0 + 3.0 * 8.0,
            query: "@ap".to_string(),
        }
    );
}

#[test]
fn overlay_tracks_each_keystroke() {
    let mut session = EditorSession::new(Document::from_blocks([("blk", "hi")]), until_cursor());
    let layout = layout();
    session.apply(Cmd::move_to("blk", 2), &layout).unwrap();

    let mut queries = Vec::new();
    for ch in [" ", "@", "a", "p"] {
        session.apply(Cmd::insert(ch), &layout).unwrap();
        queries.push(session.overlay().query.clone());
    }

    assert_eq!(queries, vec!["", "@", "@a", "@ap"]);
}

#[test]
fn query_until_cursor_versus_whole_span() {
    let layout = layout();
    let doc = || Document::from_blocks([("blk", "hello @world")]);

    let mut until = EditorSession::new(doc(), until_cursor());
    until.apply(Cmd::move_to("blk", 9), &layout).unwrap();
    assert_eq!(until.overlay().query, "@wo");

    let mut whole = EditorSession::new(doc(), OverlayOptions::default());
    whole.apply(Cmd::move_to("blk", 9), &layout).unwrap();
    assert_eq!(whole.overlay().query, "@world");

    // Both measure from the trigger, not the caret
    assert_eq!(until.overlay().left, whole.overlay().left);
    assert_eq!(until.overlay().left, 20.0 + 6.0 * 8.0);
}

#[test]
fn expanded_selection_hides_overlay() {
    let mut session = typed("hi @ap", until_cursor());
    session
        .apply(
            Cmd::Select {
                anchor_block: BlockKey::from("blk"),
                anchor_offset: 4,
                focus_block: BlockKey::from("blk"),
                focus_offset: 6,
            },
            &layout(),
        )
        .unwrap();
    assert!(!session.overlay().is_visible());
}

#[test]
fn blur_hides_and_focus_restores() {
    let mut session = typed("hi @ap", until_cursor());
    let layout = layout();

    session.apply(Cmd::Blur, &layout).unwrap();
    assert!(!session.overlay().is_visible());

    session.apply(Cmd::Focus, &layout).unwrap();
    assert_eq!(session.overlay().query, "@ap");
}

#[test]
fn mention_in_second_block_is_positioned_on_its_row() {
    let mut session = typed("first line", until_cursor());
    let layout = layout();
    session.apply(Cmd::SplitBlock, &layout).unwrap();
    for ch in ["@", "b", "o"] {
        session.apply(Cmd::insert(ch), &layout).unwrap();
    }

    let overlay = session.overlay();
    assert_eq!(overlay.query, "@bo");
    assert_eq!(overlay.left, 20.0);
    // Second row's bottom edge
    assert_eq!(overlay.top, 40.0 + 2.0 * 16.0);
}

#[test]
fn spans_in_other_blocks_do_not_leak() {
    let mut session = EditorSession::new(
        Document::from_blocks([("one", "@someone"), ("two", "plain text")]),
        until_cursor(),
    );
    session.apply(Cmd::move_to("two", 3), &layout()).unwrap();
    assert!(!session.overlay().is_visible());

    session.apply(Cmd::move_to("one", 3), &layout()).unwrap();
    assert_eq!(session.overlay().query, "@so");
}

#[test]
fn deleting_the_trigger_unmounts_and_hides() {
    let mut session = typed("hi @", until_cursor());
    assert!(session.overlay().is_visible());
    assert_eq!(session.registry().len(), 1);

    session.apply(Cmd::DeleteBackward, &layout()).unwrap();
    assert!(!session.overlay().is_visible());
    assert!(session.registry().is_empty());
    assert!(session.document().is_committed());
}

#[test]
fn email_addresses_are_not_mentions() {
    let session = typed("mail bob@example", until_cursor());
    assert!(!session.overlay().is_visible());
    assert!(session.registry().is_empty());
}
