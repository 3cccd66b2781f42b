//! Compare two renders of the virtual DOM and patch the live DOM with the difference.

use std::collections::BTreeSet;
use std::fmt::{self, Debug};

use wasm_bindgen::JsCast;
use web_sys::{Document, Element as DomElement, Node};

use crate::html::{Attribute, Html};
use crate::JsResult;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Delta<T> {
    Add(T),
    Remove(T),
}

/// A tree describing which nodes have changed and how
#[derive(Clone, PartialEq, Eq)]
pub(crate) enum Diff<'a> {
    Insert(&'a Html),
    Replace(&'a Html),
    Remove,
    Update {
        attrs: Vec<Delta<&'a Attribute>>,
        children: Vec<(u32, Diff<'a>)>,
    },
    Unchanged,
}

impl<'a> Debug for Diff<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Diff::*;
        let txt = match self {
            Insert(_) => "Insert",
            Replace(_) => "Replace",
            Remove => "Remove",
            Unchanged => "Unchanged",
            Update { attrs, children } => {
                write!(f, "Update {{ ")?;
                if !attrs.is_empty() {
                    write!(f, "attrs ")?;
                }
                if !children.is_empty() {
                    write!(f, "children: [")?;
                    for c in children {
                        write!(f, "{:?}", c)?;
                    }
                    write!(f, "]")?;
                }
                return write!(f, "}}");
            }
        };
        write!(f, "{}", txt)
    }
}

impl<'a> Diff<'a> {
    pub(crate) fn is_unchanged(&self) -> bool {
        if let Diff::Unchanged = self {
            true
        } else {
            false
        }
    }
}

pub(crate) fn diff_vdom<'a>(old: &'a Html, new: &'a Html) -> Diff<'a> {
    let (old_el, new_el) = match (old, new) {
        (Html::Text(t1), Html::Text(t2)) => {
            return if t1 == t2 {
                Diff::Unchanged
            } else {
                Diff::Replace(new)
            }
        }
        (Html::Element(e1), Html::Element(e2)) => (e1, e2),
        _ => return Diff::Replace(new),
    };

    if old_el.tag_name() != new_el.tag_name() {
        // assume everything can be nuked
        return Diff::Replace(new);
    }

    let attrs = if old_el.attrs() == new_el.attrs() {
        Vec::new()
    } else {
        let mut deltas = Vec::new();
        let oldset: BTreeSet<&Attribute> = old_el.attrs().iter().collect();
        let newset: BTreeSet<&Attribute> = new_el.attrs().iter().collect();
        // removals go first so that a changed value for the same key
        // (remove old, add new) leaves the new value in place
        for &attr in oldset.difference(&newset) {
            deltas.push(Delta::Remove(attr))
        }
        for &attr in newset.difference(&oldset) {
            deltas.push(Delta::Add(attr))
        }
        deltas
    };

    let mut child_diffs = Vec::new();

    for (ix, (cold, cnew)) in old_el
        .children()
        .iter()
        .zip(new_el.children().iter())
        .enumerate()
    {
        let diff = diff_vdom(cold, cnew);
        if !diff.is_unchanged() {
            child_diffs.push((ix as u32, diff))
        }
    }

    // Find nodes which have been added/removed
    let curct = old_el.children().len();
    let nextct = new_el.children().len();
    if nextct > curct {
        for ix in curct..nextct {
            child_diffs.push((ix as u32, Diff::Insert(&new_el.children()[ix])));
        }
    } else {
        for ix in nextct..curct {
            child_diffs.push((ix as u32, Diff::Remove))
        }
    }

    child_diffs.sort_by_key(|t| t.0);
    if attrs.is_empty() && child_diffs.is_empty() {
        Diff::Unchanged
    } else {
        Diff::Update {
            attrs,
            children: child_diffs,
        }
    }
}

pub(crate) fn render_diff(
    this_el: &Node,
    child_diffs: &[(u32, Diff)],
    doc: &Document,
) -> JsResult<()> {
    // Changes are applied from the parent, since creating, removing and
    // replacing a node can only be done through its parent
    if child_diffs.is_empty() {
        return Ok(());
    }
    let child_els = this_el.child_nodes();
    let mut rmct = 0;
    for &(ix, ref diff) in child_diffs.iter() {
        let ix = ix - rmct; // adjust index for previously-removed nodes
        match diff {
            Diff::Unchanged => (),
            Diff::Insert(node) => {
                // inserts only ever happen past the end of the old children
                let new_el = node.render_to_dom(doc)?;
                this_el.append_child(&new_el)?;
            }
            Diff::Replace(node) => {
                let old_el = child_at(&child_els, ix)?;
                let new_el = node.render_to_dom(doc)?;
                this_el.replace_child(&new_el, &old_el)?;
            }
            Diff::Remove => {
                let old_el = child_at(&child_els, ix)?;
                this_el.remove_child(&old_el)?;
                rmct += 1;
            }
            Diff::Update { attrs, children } => {
                let child_el = child_at(&child_els, ix)?;
                if !attrs.is_empty() {
                    let el: &DomElement = child_el
                        .dyn_ref()
                        .ok_or_else(|| wasm_bindgen::JsValue::from_str("Not an element"))?;
                    update_attrs(el, attrs)?;
                }
                render_diff(&child_el, children, doc)?;
            }
        }
    }
    Ok(())
}

fn child_at(children: &web_sys::NodeList, ix: u32) -> JsResult<Node> {
    children
        .get(ix)
        .ok_or_else(|| wasm_bindgen::JsValue::from_str(&format!("bad node index {}", ix)))
}

fn update_attrs(element: &DomElement, attrs: &[Delta<&Attribute>]) -> JsResult<()> {
    for delta in attrs {
        match delta {
            Delta::Add(attr) => element.set_attribute(attr.key(), attr.value())?,
            Delta::Remove(attr) => element.remove_attribute(attr.key())?,
        }
    }
    Ok(())
}
