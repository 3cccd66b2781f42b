//! A small virtual DOM and the macros used to build it.
//!
//! ```
//! # use pokequiz::{button, div};
//! # use pokequiz::html::{class, data_action};
//! let html = div!(class("box"), button!(data_action("next"), "Next"));
//! assert_eq!(
//!     html.to_string(),
//!     r#"<div class="box"><button data-action="next">Next</button></div>"#
//! );
//! ```

use std::fmt;

use derive_more::{Constructor, Display, From};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element as DomElement, Node};

use crate::{JsResult, Str};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum Tag {
    #[display(fmt = "div")]
    Div,
    #[display(fmt = "span")]
    Span,
    #[display(fmt = "p")]
    P,
    #[display(fmt = "button")]
    Button,
    #[display(fmt = "img")]
    Img,
    #[display(fmt = "strong")]
    Strong,
}

impl Tag {
    /// Elements which never have children or a closing tag
    fn is_void(self) -> bool {
        match self {
            Tag::Img => true,
            _ => false,
        }
    }
}

/// A single `key="value"` pair on an element.
///
/// Boolean attributes (e.g. `disabled`) are stored with an empty value; their
/// presence is what counts.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Attribute {
    key: Str,
    value: Str,
}

impl Attribute {
    pub fn new(key: impl Into<Str>, value: impl Into<Str>) -> Attribute {
        Attribute {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

macro_rules! attr_key_value {
    ($func_name: ident, $key: expr) => {
        pub fn $func_name(val: impl Into<Str>) -> Attribute {
            Attribute::new($key, val)
        }
    };
}

attr_key_value!(id, "id");
attr_key_value!(class, "class");
attr_key_value!(src, "src");
attr_key_value!(alt, "alt");
attr_key_value!(style, "style");
attr_key_value!(button_type, "type");
attr_key_value!(data_action, "data-action");
attr_key_value!(data_name, "data-name");

/// Several classes at once, space separated
pub fn classes<'a>(names: impl IntoIterator<Item = &'a str>) -> Attribute {
    let joined: Vec<&str> = names.into_iter().filter(|n| !n.is_empty()).collect();
    Attribute::new("class", joined.join(" "))
}

pub fn disabled() -> Attribute {
    Attribute::new("disabled", "")
}

/// Represents an HTML Element
#[derive(Clone, Debug, PartialEq, Eq, Constructor)]
pub struct Element {
    tag: Tag,
    attrs: Vec<Attribute>,
    children: Vec<Html>,
}

/// Represents a HTML DOM Node
#[derive(Clone, Debug, PartialEq, Eq, From)]
pub enum Html {
    Text(Str),
    Element(Element),
}

impl Element {
    /// Create an empty tagged element
    pub fn tag(tag: Tag) -> Element {
        Element::new(tag, Vec::new(), Vec::new())
    }

    pub fn tag_name(&self) -> Tag {
        self.tag
    }

    pub(crate) fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.key() == key)
            .map(Attribute::value)
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attr(key).is_some()
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|c| c == name))
            .unwrap_or(false)
    }

    pub fn children(&self) -> &[Html] {
        &self.children
    }

    /// All text content below this element, concatenated
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.gather_text(&mut out);
        }
        out
    }

    pub(crate) fn render_to_dom(&self, document: &Document) -> JsResult<DomElement> {
        let element = document.create_element(&self.tag.to_string())?;
        for attr in &self.attrs {
            element.set_attribute(attr.key(), attr.value())?;
        }
        for child in &self.children {
            let child_node = child.render_to_dom(document)?;
            element.append_child(&child_node)?;
        }
        Ok(element)
    }
}

impl Html {
    pub fn text(text: impl Into<Str>) -> Html {
        Html::Text(text.into())
    }

    /// Depth-first search for every element matching `pred`
    pub fn find_all(&self, pred: impl Fn(&Element) -> bool) -> Vec<&Element> {
        let mut found = Vec::new();
        self.gather(&pred, &mut found);
        found
    }

    pub fn find(&self, pred: impl Fn(&Element) -> bool) -> Option<&Element> {
        self.find_all(pred).into_iter().next()
    }

    pub fn by_id(&self, id: &str) -> Option<&Element> {
        self.find(|e| e.attr("id") == Some(id))
    }

    fn gather<'a>(&'a self, pred: &dyn Fn(&Element) -> bool, found: &mut Vec<&'a Element>) {
        if let Html::Element(elem) = self {
            if pred(elem) {
                found.push(elem);
            }
            for child in &elem.children {
                child.gather(pred, found);
            }
        }
    }

    fn gather_text(&self, out: &mut String) {
        match self {
            Html::Text(text) => out.push_str(text),
            Html::Element(elem) => {
                for child in &elem.children {
                    child.gather_text(out);
                }
            }
        }
    }

    pub(crate) fn render_to_dom(&self, doc: &Document) -> JsResult<Node> {
        match self {
            Html::Text(text) => Ok(doc.create_text_node(text).unchecked_into()),
            Html::Element(elem) => elem.render_to_dom(doc).map(|e| e.unchecked_into()),
        }
    }
}

fn escape(s: &str, f: &mut fmt::Formatter) -> fmt::Result {
    for c in s.chars() {
        match c {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            '"' => f.write_str("&quot;")?,
            c => write!(f, "{}", c)?,
        }
    }
    Ok(())
}

impl fmt::Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Html::Text(text) => escape(text, f),
            Html::Element(elem) => write!(f, "{}", elem),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for attr in &self.attrs {
            if attr.value().is_empty() {
                write!(f, " {}", attr.key())?;
            } else {
                write!(f, " {}=\"", attr.key())?;
                escape(attr.value(), f)?;
                f.write_str("\"")?;
            }
        }
        f.write_str(">")?;
        if self.tag.is_void() {
            return Ok(());
        }
        for c in &self.children {
            write!(f, "{}", c)?;
        }
        write!(f, "</{}>", self.tag)
    }
}

/// Anything that can be passed to the element macros: text, attributes,
/// child nodes, or collections and options of those.
#[doc(hidden)]
pub trait ElemMod {
    fn modify_element(self, elem: &mut Element);
}

impl ElemMod for &'static str {
    fn modify_element(self, elem: &mut Element) {
        elem.children.push(Html::text(self))
    }
}

impl ElemMod for String {
    fn modify_element(self, elem: &mut Element) {
        elem.children.push(Html::text(self))
    }
}

impl ElemMod for Attribute {
    fn modify_element(self, elem: &mut Element) {
        elem.attrs.push(self)
    }
}

impl ElemMod for Html {
    fn modify_element(self, elem: &mut Element) {
        elem.children.push(self)
    }
}

impl<T: ElemMod> ElemMod for Vec<T> {
    fn modify_element(self, elem: &mut Element) {
        for item in self {
            item.modify_element(elem)
        }
    }
}

impl<T: ElemMod> ElemMod for Option<T> {
    fn modify_element(self, elem: &mut Element) {
        if let Some(item) = self {
            item.modify_element(elem)
        }
    }
}

macro_rules! make_dsl_macros {
    ($d:tt $($name:ident : $tag:ident),*) => {
        $(
            #[macro_export]
            macro_rules! $name {
                ($d($d modifier:expr),* $d(,)?) => {{
                    #[allow(unused_mut)]
                    let mut elem = $d crate::html::Element::tag($d crate::html::Tag::$tag);
                    $d($d crate::html::ElemMod::modify_element($d modifier, &mut elem);)*
                    $d crate::html::Html::from(elem)
                }};
            }
        )*
    }
}

// Pass in the '$' symbol - workaround for macro_rules bug - see
// https://github.com/rust-lang/rust/issues/35853#issuecomment-415993963
make_dsl_macros!($ div: Div, span: Span, p: P, button: Button, img: Img, strong: Strong);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_div() {
        let html = div!(
            id("root"),
            "some text",
            p!(class("bluesy"), "Classy!"),
            img!(src("/img/25.png"), alt("sprite")),
            button!(disabled(), data_name("pikachu"), "Pikachu")
        );
        assert_eq!(
            html.to_string(),
            "<div id=\"root\">some text<p class=\"bluesy\">Classy!</p>\
             <img src=\"/img/25.png\" alt=\"sprite\">\
             <button disabled data-name=\"pikachu\">Pikachu</button></div>"
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        let html = span!(data_name("a\"b"), "<script>&");
        assert_eq!(
            html.to_string(),
            "<span data-name=\"a&quot;b\">&lt;script&gt;&amp;</span>"
        );
    }

    #[test]
    fn optional_and_repeated_children() {
        let items = vec!["a", "b", "c"];
        let html = div!(
            None::<Attribute>,
            Some(class("list")),
            items.iter().map(|i| span!(i.to_string())).collect::<Vec<_>>()
        );
        assert_eq!(
            html.to_string(),
            "<div class=\"list\"><span>a</span><span>b</span><span>c</span></div>"
        );
    }

    #[test]
    fn query_helpers() {
        let html = div!(
            div!(id("inner"), classes(vec!["option-btn", "", "correct"])),
            p!("hello ", strong!("world"))
        );
        let inner = html.by_id("inner").unwrap();
        assert!(inner.has_class("correct"));
        assert!(inner.has_class("option-btn"));
        assert!(!inner.has_class("wrong"));
        assert_eq!(inner.attr("class"), Some("option-btn correct"));
        let para = html.find(|e| e.tag_name() == Tag::P).unwrap();
        assert_eq!(para.text(), "hello world");
        assert_eq!(html.find_all(|e| e.tag_name() == Tag::Div).len(), 2);
    }
}
