//! Block handles over live DOM elements.

use scribe_editor_core::{BlockNode, Offset};
use smol_str::SmolStr;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

/// A top-level block element of the rendered document.
///
/// Equality is element identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomNode(HtmlElement);

impl DomNode {
    pub fn new(element: HtmlElement) -> Self {
        Self(element)
    }

    pub fn element(&self) -> &HtmlElement {
        &self.0
    }

    /// Attributes serialized as they would appear in a start tag.
    pub fn attributes(&self) -> String {
        self.0
            .get_attribute_names()
            .iter()
            .filter_map(|name| {
                let name = name.as_string()?;
                let value = self.0.get_attribute(&name)?;
                Some(format!("{name}=\"{}\"", escape_attribute(&value)))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<HtmlElement> for DomNode {
    fn from(element: HtmlElement) -> Self {
        Self(element)
    }
}

impl BlockNode for DomNode {
    fn tag_name(&self) -> SmolStr {
        SmolStr::new(self.0.tag_name())
    }

    fn offset(&self) -> Offset {
        Offset::new(self.0.offset_top(), self.0.offset_left())
    }

    fn inner_html(&self) -> String {
        self.0.inner_html()
    }

    fn is_attached(&self) -> bool {
        self.0.is_connected()
    }

    fn same_node(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

/// Element children of `root`, in document order.
pub fn block_children(root: &HtmlElement) -> Vec<DomNode> {
    let children = root.children();
    (0..children.length())
        .filter_map(|i| children.item(i))
        .filter_map(|element| element.dyn_into::<HtmlElement>().ok())
        .map(DomNode::new)
        .collect()
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
