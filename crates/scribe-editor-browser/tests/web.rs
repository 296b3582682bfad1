//! WASM browser tests for scribe-editor-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use scribe_editor_browser::{
    BlockNode, BlockTag, DomEngine, EditorConfig, EditorEngine, EditorSession, EngineError,
    EngineHandle, HeadingLevel, HeadingOverlay, OverlayRenderer, SelectCallback, block_children,
};

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn root_with(html: &str) -> web_sys::HtmlElement {
    let root: web_sys::HtmlElement = document().create_element("div").unwrap().unchecked_into();
    root.set_inner_html(html);
    document().body().unwrap().append_child(&root).unwrap();
    root
}

/// Minimal host engine: retags by cloning content into a fresh element,
/// keeps a one-level undo stack and fires change listeners.
fn fake_handle(root: &web_sys::HtmlElement) -> EngineHandle {
    let factory = js_sys::Function::new_with_args(
        "root",
        r#"
        const listeners = [];
        const extensions = [];
        const undo = [];
        const redo = [];
        const swap = (index, tag) => {
            const old = root.children[index];
            const el = document.createElement(tag);
            el.innerHTML = old.innerHTML;
            old.replaceWith(el);
            listeners.forEach((f) => f());
            return old.tagName.toLowerCase();
        };
        return {
            root,
            extensions,
            wordCount() { return root.innerText.split(/\s+/).filter(Boolean).length; },
            characterCount() { return root.innerText.replace(/\n/g, '').length; },
            onChange(f) { listeners.push(f); },
            hasMark(name) { return name === 'code'; },
            registerExtension(d) { extensions.push(d.name); },
            setBlockType(index, tag) {
                if (index >= root.children.length) return false;
                undo.push([index, swap(index, tag)]);
                redo.length = 0;
                return true;
            },
            undo() {
                const step = undo.pop();
                if (!step) return false;
                redo.push([step[0], swap(step[0], step[1])]);
                return true;
            },
            redo() {
                const step = redo.pop();
                if (!step) return false;
                undo.push([step[0], swap(step[0], step[1])]);
                return true;
            },
        };
        "#,
    );
    factory.call1(&JsValue::NULL, root).unwrap().unchecked_into()
}

// === DomNode ===

#[wasm_bindgen_test]
fn test_block_children_in_order() {
    let root = root_with("<h1>The heading</h1><p>Body</p><ul><li>x</li></ul>");
    let nodes = block_children(&root);
    let tags: Vec<_> = nodes
        .iter()
        .map(|n| BlockTag::classify(&n.tag_name()))
        .collect();
    assert_eq!(
        tags,
        vec![
            BlockTag::Heading(HeadingLevel::H1),
            BlockTag::Paragraph,
            BlockTag::List
        ]
    );
    assert!(nodes.iter().all(|n| n.is_attached()));
    assert_eq!(nodes[0].inner_html(), "The heading");
    root.remove();
    assert!(!nodes[0].is_attached());
}

#[wasm_bindgen_test]
fn test_dom_node_attributes() {
    let root = root_with(r#"<h2 id="a" class="b">T</h2>"#);
    let node = &block_children(&root)[0];
    assert_eq!(node.attributes(), r#"id="a" class="b""#);
    root.remove();
}

// === DomEngine ===

#[wasm_bindgen_test]
fn test_retag_through_handle() {
    let root = root_with("<p>a</p><h1>Garlic <em>bread</em></h1>");
    let mut engine = DomEngine::new(fake_handle(&root));
    let heading = engine.child_nodes()[1].clone();

    let change = engine
        .set_block_tag(&heading, &BlockTag::Heading(HeadingLevel::H3))
        .unwrap()
        .unwrap();
    assert_eq!(change.index, 1);
    assert_eq!(change.from.tag_name, "h1");
    assert_eq!(change.to.tag_name, "h3");

    let after = engine.child_nodes();
    assert_eq!(after[1].tag_name(), "H3");
    assert_eq!(after[1].inner_html(), "Garlic <em>bread</em>");
    assert!(!heading.is_attached());

    // Stale handle is a no-op.
    assert_eq!(
        engine
            .set_block_tag(&heading, &BlockTag::Heading(HeadingLevel::H2))
            .unwrap(),
        None
    );

    assert!(engine.undo());
    assert_eq!(engine.child_nodes()[1].tag_name(), "H1");
    root.remove();
}

#[wasm_bindgen_test]
fn test_duplicate_extension_rejected() {
    let root = root_with("<p>a</p>");
    let mut engine = DomEngine::new(fake_handle(&root));
    let codemark = scribe_editor_browser::CodemarkExtension::for_engine(&engine).unwrap();
    engine.register_extension(Box::new(codemark.clone())).unwrap();
    assert_eq!(
        engine.register_extension(Box::new(codemark)),
        Err(EngineError::DuplicateExtension("CodemarkExtension".into()))
    );
    root.remove();
}

#[wasm_bindgen_test]
fn test_session_over_dom() {
    let root = root_with("<h1>The heading</h1><p>one two three</p>");
    let engine = DomEngine::new(fake_handle(&root));
    let mut session = EditorSession::mount(&EditorConfig::default(), engine).unwrap();

    assert_eq!(session.nodes().len(), 2);
    assert_eq!(session.controls().len(), 1);
    assert_eq!(session.store().state().word_count, 5);

    session.select(0, HeadingLevel::H2).unwrap();
    assert_eq!(session.controls()[0].level, HeadingLevel::H2);
    assert!(session.undo());
    assert_eq!(session.controls()[0].level, HeadingLevel::H1);
    root.remove();
}

// === Overlay rendering ===

#[wasm_bindgen_test]
fn test_render_controls() {
    let root = root_with("<h1>A</h1><p>b</p><h3>C</h3>");
    let overlay_root = root_with("");
    let engine = DomEngine::new(fake_handle(&root));
    let session = EditorSession::mount(&EditorConfig::default(), engine).unwrap();
    let views: Vec<_> = session.controls().iter().map(|c| c.view()).collect();

    let picked = Rc::new(RefCell::new(Vec::new()));
    let sink = picked.clone();
    let on_select: SelectCallback = Rc::new(move |i, level| sink.borrow_mut().push((i, level)));

    let mut renderer = OverlayRenderer::new(overlay_root.clone()).unwrap();
    renderer.render(&views, &on_select).unwrap();

    assert!(overlay_root.class_list().contains("ui-editor-actions"));
    let controls = overlay_root.query_selector_all(".ui-editor-action").unwrap();
    assert_eq!(controls.length(), 2);

    let disabled = overlay_root
        .query_selector_all(".ui-editor-action-option[disabled]")
        .unwrap();
    assert_eq!(disabled.length(), 2);

    let expected_left = format!(
        "{}px",
        session.nodes()[0].offset.left - HeadingOverlay::default().config().gutter_width
    );
    let first: web_sys::HtmlElement = controls.item(0).unwrap().unchecked_into();
    assert_eq!(first.style().get_property_value("left").unwrap(), expected_left);

    let option: web_sys::HtmlElement = overlay_root
        .query_selector(r#".ui-editor-action[data-index="2"] [data-level="4"]"#)
        .unwrap()
        .unwrap()
        .unchecked_into();
    option.click();
    assert_eq!(*picked.borrow(), vec![(1, HeadingLevel::H4)]);

    renderer.clear();
    assert_eq!(overlay_root.child_element_count(), 0);
    root.remove();
    overlay_root.remove();
}
