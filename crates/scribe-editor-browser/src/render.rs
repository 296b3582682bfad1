//! Overlay control rendering.
//!
//! Each heading control becomes an absolutely positioned `div` inside the
//! overlay container, holding a trigger button and a menu of six level
//! buttons. Rendering replaces the container's content wholesale.
//!
//! Rendering drops the click listeners of the previous pass, so it must not
//! run from inside one of those listeners: defer it with [`crate::defer`].

use std::rc::Rc;

use gloo_events::EventListener;
use scribe_editor_core::{ControlView, HeadingLevel};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

/// Called with the control's position in the rendered list and the chosen
/// level.
pub type SelectCallback = Rc<dyn Fn(usize, HeadingLevel)>;

pub struct OverlayRenderer {
    container: HtmlElement,
    listeners: Vec<EventListener>,
}

impl OverlayRenderer {
    pub const CONTAINER_CLASS: &'static str = "ui-editor-actions";
    pub const CONTROL_CLASS: &'static str = "ui-editor-action";
    pub const TRIGGER_CLASS: &'static str = "ui-editor-action-trigger";
    pub const MENU_CLASS: &'static str = "ui-editor-action-menu";
    pub const OPTION_CLASS: &'static str = "ui-editor-action-option";
    pub const SHORTCUT_CLASS: &'static str = "ui-editor-action-shortcut";

    pub fn new(container: HtmlElement) -> Result<Self, JsValue> {
        container.class_list().add_1(Self::CONTAINER_CLASS)?;
        Ok(Self {
            container,
            listeners: Vec::new(),
        })
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// Remove every control.
    pub fn clear(&mut self) {
        self.listeners.clear();
        self.container.set_inner_html("");
    }

    pub fn render(&mut self, controls: &[ControlView], on_select: &SelectCallback) -> Result<(), JsValue> {
        self.clear();
        let document = self
            .container
            .owner_document()
            .ok_or_else(|| JsValue::from_str("overlay container has no document"))?;

        for (position, control) in controls.iter().enumerate() {
            let element = self.render_control(&document, position, control, on_select)?;
            self.container.append_child(&element)?;
        }

        tracing::trace!(controls = controls.len(), "rendered heading overlay");
        Ok(())
    }

    fn render_control(
        &mut self,
        document: &Document,
        position: usize,
        control: &ControlView,
        on_select: &SelectCallback,
    ) -> Result<HtmlElement, JsValue> {
        let wrapper = create(document, "div", Self::CONTROL_CLASS)?;
        wrapper.set_attribute("data-index", &control.index.to_string())?;
        let style = wrapper.style();
        style.set_property("position", "absolute")?;
        style.set_property("top", &px(control.position.top))?;
        style.set_property("left", &px(control.position.left))?;

        let trigger = create(document, "button", Self::TRIGGER_CLASS)?;
        trigger.set_attribute("type", "button")?;
        trigger.set_attribute("aria-haspopup", "menu")?;
        trigger.set_attribute("data-icon", control.level.icon())?;
        trigger.set_text_content(Some(&format!("H{}", control.level.number())));

        let menu = create(document, "div", Self::MENU_CLASS)?;
        menu.set_attribute("role", "menu")?;
        menu.set_hidden(true);

        let toggled = menu.clone();
        self.listeners
            .push(EventListener::new(&trigger, "click", move |_| {
                toggled.set_hidden(!toggled.hidden());
            }));

        for option in &control.options {
            let button = create(document, "button", Self::OPTION_CLASS)?;
            button.set_attribute("type", "button")?;
            button.set_attribute("role", "menuitem")?;
            button.set_attribute("data-level", &option.level.number().to_string())?;
            button.set_attribute("data-icon", option.icon)?;

            let label = document.create_element("span")?;
            label.set_text_content(Some(option.label));
            let shortcut = document.create_element("span")?;
            shortcut.set_class_name(Self::SHORTCUT_CLASS);
            shortcut.set_text_content(Some(option.shortcut));
            button.append_child(&label)?;
            button.append_child(&shortcut)?;

            if option.enabled {
                let level = option.level;
                let callback = on_select.clone();
                let menu = menu.clone();
                self.listeners
                    .push(EventListener::new(&button, "click", move |_| {
                        menu.set_hidden(true);
                        callback(position, level);
                    }));
            } else {
                button.set_attribute("disabled", "")?;
            }
            menu.append_child(&button)?;
        }

        wrapper.append_child(&trigger)?;
        wrapper.append_child(&menu)?;
        Ok(wrapper)
    }
}

fn create(document: &Document, tag: &str, class: &str) -> Result<HtmlElement, JsValue> {
    let element = document
        .create_element(tag)?
        .dyn_into::<HtmlElement>()
        .map_err(JsValue::from)?;
    element.set_class_name(class);
    Ok(element)
}

fn px(value: i32) -> String {
    format!("{value}px")
}
