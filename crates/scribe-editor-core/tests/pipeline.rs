//! End-to-end pipeline tests over the in-memory engine.

use scribe_editor_core::{
    BlockNode, BlockTag, DEFAULT_CONTENT, EditorConfig, EditorEngine, EditorSession,
    EditorViewState, HeadingLevel, PlainEngine, RawAction, StoreAction, StoreError, ViewMode,
};
use serde_json::json;

fn mount(html: &str) -> EditorSession<PlainEngine> {
    let config = EditorConfig::default();
    let engine = PlainEngine::from_html(html, &config).unwrap();
    EditorSession::mount(&config, engine).unwrap()
}

fn demo() -> EditorSession<PlainEngine> {
    let config = EditorConfig::default();
    let engine = PlainEngine::from_fragments(DEFAULT_CONTENT, &config).unwrap();
    EditorSession::mount(&config, engine).unwrap()
}

fn assert_counts_fresh(session: &EditorSession<PlainEngine>) {
    let engine = session.engine().unwrap();
    let state = session.store().state();
    assert_eq!(state.word_count, engine.word_count());
    assert_eq!(state.char_count, engine.character_count());
}

#[test]
fn heading_and_paragraph_yield_one_control() {
    let session = mount("<h1>The heading</h1><p>Some text.</p>");

    assert_eq!(session.nodes().len(), 2);
    assert_eq!(session.controls().len(), 1);

    let control = &session.controls()[0];
    assert_eq!(control.level, HeadingLevel::H1);
    assert!(!control.options[0].enabled);
    assert!(control.options[1..].iter().all(|o| o.enabled));
}

#[test]
fn heading_three_on_garlic_bread() {
    let mut session = mount("<p>Intro</p><h1>Garlic bread</h1><p>Outro</p>");
    let before = session.engine().unwrap().child_nodes();

    let change = session.select(0, HeadingLevel::H3).unwrap().unwrap();
    assert_eq!(change.index, 1);

    let after = session.engine().unwrap().child_nodes();
    assert_eq!(after.len(), 3);
    assert_eq!(
        BlockTag::classify(&after[1].tag_name()),
        BlockTag::Heading(HeadingLevel::H3)
    );
    assert_eq!(after[1].inner_html(), "Garlic bread");
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
    assert!(!before[1].is_attached());

    assert_eq!(session.controls().len(), 1);
    assert_eq!(session.controls()[0].level, HeadingLevel::H3);
    assert_eq!(session.controls()[0].index, 1);
}

#[test]
fn demo_document_tracks_every_block() {
    let session = demo();
    let engine = session.engine().unwrap();

    assert_eq!(session.nodes().len(), DEFAULT_CONTENT.len());
    let headings = engine
        .child_nodes()
        .iter()
        .filter(|n| BlockTag::classify(&n.tag_name()).is_heading())
        .count();
    assert_eq!(headings, 3);
    assert_eq!(session.controls().len(), headings);

    let levels: Vec<_> = session.controls().iter().map(|c| c.level).collect();
    assert_eq!(levels, vec![HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3]);
    assert!(session.store().state().word_count > 0);
    assert_counts_fresh(&session);
}

#[test]
fn controls_sit_in_the_gutter() {
    let session = demo();
    let config = EditorConfig::default();
    for control in session.controls() {
        let node = &session.nodes()[control.index];
        assert_eq!(
            control.position.left,
            node.offset.left - config.overlay.gutter_width
        );
        assert_eq!(
            control.position.top,
            node.offset.top + config.overlay.nudge(control.level)
        );
    }
}

#[test]
fn retag_preserves_inner_html_of_rich_content() {
    let mut session = demo();
    let node = session.nodes()[4].node.clone();
    let content = node.inner_html();

    session.set_heading_level(&node, HeadingLevel::H2).unwrap();

    let replaced = &session.nodes()[4].node;
    assert_eq!(replaced.inner_html(), content);
    assert_eq!(session.nodes()[4].tag, BlockTag::Heading(HeadingLevel::H2));
}

#[test]
fn counts_never_stale() {
    let mut session = demo();
    assert_counts_fresh(&session);

    let node = session.nodes()[1].node.clone();
    session
        .engine_mut()
        .unwrap()
        .set_inner_html(&node, "Short <em>now</em>.")
        .unwrap();
    assert_counts_fresh(&session);

    session
        .engine_mut()
        .unwrap()
        .insert_html(0, "<p>A brand new opening line</p>")
        .unwrap();
    assert_counts_fresh(&session);
    assert!(!session.is_dirty());

    session.edit(|engine| {
        let last = engine.child_nodes().pop().unwrap();
        engine.remove_block(&last)
    });
    assert_counts_fresh(&session);

    let heading = session.controls()[0].node.clone();
    session.set_heading_level(&heading, HeadingLevel::H6).unwrap();
    assert_counts_fresh(&session);

    session.undo();
    assert_counts_fresh(&session);
}

#[test]
fn overlay_stale_until_engine_change_when_edits_are_silent() {
    let mut session = mount("<h1>Garlic bread</h1><p>Body</p>");
    session.engine_mut().unwrap().set_notify_structural_edits(false);
    let passes = session.tracker().passes();

    session.select(0, HeadingLevel::H3).unwrap();

    // Engine changed, but nothing told the session.
    assert_eq!(session.tracker().passes(), passes);
    assert_eq!(session.controls()[0].level, HeadingLevel::H1);
    assert!(!session.controls()[0].node.is_attached());

    // Acting on the stale control is a no-op.
    assert_eq!(session.select(0, HeadingLevel::H2).unwrap(), None);
    assert_eq!(
        session.engine().unwrap().to_html(),
        "<h3>Garlic bread</h3><p>Body</p>"
    );

    // The next content edit brings the overlay back in sync.
    let paragraph = session.nodes()[1].node.clone();
    session
        .engine_mut()
        .unwrap()
        .set_inner_html(&paragraph, "Body text")
        .unwrap();
    assert_eq!(session.tracker().passes(), passes + 1);
    assert_eq!(session.controls()[0].level, HeadingLevel::H3);
    assert!(session.controls()[0].node.is_attached());
}

#[test]
fn undo_and_redo_heading_change() {
    let mut session = mount(r#"<h1 id="top">Garlic bread</h1>"#);
    session.select(0, HeadingLevel::H3).unwrap();
    assert_eq!(
        session.engine().unwrap().to_html(),
        "<h3>Garlic bread</h3>"
    );

    assert!(session.undo());
    assert_eq!(
        session.engine().unwrap().to_html(),
        r#"<h1 id="top">Garlic bread</h1>"#
    );
    assert_eq!(session.controls()[0].level, HeadingLevel::H1);

    assert!(session.redo());
    assert_eq!(session.controls()[0].level, HeadingLevel::H3);
    assert!(!session.redo());
}

#[test]
fn disabled_option_changes_nothing() {
    let mut session = mount("<h2>Title</h2>");
    let passes = session.tracker().passes();
    assert_eq!(session.select(0, HeadingLevel::H2).unwrap(), None);
    assert_eq!(session.tracker().passes(), passes);
    assert!(!session.engine().unwrap().can_undo());
}

#[test]
fn store_actions_through_session() {
    let session = mount("<p>one two</p>");
    let store = session.store();
    let before = store.state();

    let state = store.dispatch(StoreAction::SetWordCount(42));
    assert_eq!(state.word_count, 42);
    assert_eq!(state.view, before.view);
    assert_eq!(state.char_count, before.char_count);

    let err = store
        .dispatch_raw(RawAction::new("SET_FONT", json!("serif")))
        .unwrap_err();
    assert_eq!(err, StoreError::UnknownAction("SET_FONT".into()));
    assert_eq!(store.state(), state);

    let state = store
        .dispatch_raw(RawAction::new("SET_VIEW", json!("output")))
        .unwrap();
    assert_eq!(
        state,
        EditorViewState {
            view: ViewMode::Output,
            word_count: 42,
            char_count: before.char_count,
        }
    );
}
