//! Markup for tables of contents, and HTML rendering.
//!
//! A [`TocList`] is materialized as elements with fixed class names:
//!
//! ```html
//! <ul class="toc-list">
//!   <li class="toc-item"><a href="#intro" class="toc-link">Intro</a>
//!     <ul class="toc-list">...</ul>
//!   </li>
//! </ul>
//! ```
//!
//! Headings receive `<a class="toc-anchor" href="#intro" id="intro">#</a>`.

use crate::attr::Attrs;
use crate::node::{Document, Element, Node};
use crate::tree::{ItemContent, TocItem, TocList};

pub const LIST_CLASS: &str = "toc-list";
pub const ITEM_CLASS: &str = "toc-item";
pub const LINK_CLASS: &str = "toc-link";
pub const ANCHOR_CLASS: &str = "toc-anchor";

// =============================================================================
// TocList → Element
// =============================================================================

/// Build the `<ul>`/`<ol>` element for a list and all nested lists.
pub fn list_element(list: &TocList) -> Element {
    let tag = if list.ordered { "ol" } else { "ul" };
    let mut elem = Element::new(tag).with_class(LIST_CLASS);
    for item in &list.items {
        elem.push_elem(item_element(item));
    }
    elem
}

fn item_element(item: &TocItem) -> Element {
    let mut li = Element::new("li").with_class(ITEM_CLASS);
    match &item.content {
        ItemContent::Link { label, href } => {
            let text = if label.is_empty() { href } else { label };
            li.push_elem(
                Element::new("a")
                    .attr("href", href.as_str())
                    .with_class(LINK_CLASS)
                    .text(text.as_str()),
            );
        }
        ItemContent::Label(label) if !label.is_empty() => li.push_text(label.as_str()),
        ItemContent::Label(_) | ItemContent::Placeholder => {}
    }
    if let Some(children) = &item.children {
        li.push_elem(list_element(children));
    }
    li
}

/// Anchor appended inside a heading so `#id` links land on it.
pub fn anchor_element(id: &str, text: &str) -> Element {
    Element::new("a")
        .with_class(ANCHOR_CLASS)
        .attr("href", format!("#{id}"))
        .with_id(id)
        .text(text)
}

// =============================================================================
// HTML rendering
// =============================================================================

/// Render a document to HTML string.
pub fn render_document(doc: &Document) -> String {
    render_element(&doc.root)
}

/// Render a list tree to HTML string.
pub fn render_list(list: &TocList) -> String {
    render_element(&list_element(list))
}

/// Render an element and its subtree to HTML string.
pub fn render_element(elem: &Element) -> String {
    let mut output = String::new();
    write_element(elem, &mut output);
    output
}

fn write_element(elem: &Element, output: &mut String) {
    output.push('<');
    output.push_str(&elem.tag);
    write_attrs(&elem.attrs, output);

    // Void elements
    if is_void_element(&elem.tag) {
        output.push_str(" />");
        return;
    }

    output.push('>');
    for child in &elem.children {
        match child {
            Node::Element(e) => write_element(e, output),
            Node::Text(text) => output.push_str(&escape_html(&text.content)),
        }
    }
    output.push_str("</");
    output.push_str(&elem.tag);
    output.push('>');
}

fn write_attrs(attrs: &Attrs, output: &mut String) {
    for (name, value) in attrs {
        output.push(' ');
        output.push_str(name);
        output.push_str("=\"");
        output.push_str(&escape_attr(value));
        output.push('"');
    }
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape attribute value special characters.
fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Check if element is a void element (self-closing).
fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

// =============================================================================
// Tests
// =============================================================================
