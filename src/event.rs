//! Delegated click handling.
//!
//! A single listener sits on the mount element for the lifetime of the app.
//! Controls announce what they do through `data-action` (and optionally
//! `data-name`) attributes, so re-rendering never has to attach or detach
//! per-element handlers.

use std::fmt::{self, Debug};

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Element as DomElement, Event as DomEvent};

use crate::{App, Cmd, JsResult, Model, Str};

/// The control a click landed on, as described by its data attributes
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Activation {
    pub action: String,
    pub value: Option<String>,
}

impl Activation {
    pub fn new(action: impl Into<String>, value: Option<String>) -> Activation {
        Activation {
            action: action.into(),
            value,
        }
    }

    /// Resolve the nearest `[data-action]` ancestor of the event target.
    ///
    /// Disabled controls never activate.
    fn from_event(event: &DomEvent) -> Option<Activation> {
        let target = event.target()?;
        let target_el: &DomElement = target.dyn_ref()?;
        let control = target_el.closest("[data-action]").ok()??;
        if control.has_attribute("disabled") {
            trace!("Ignoring click on disabled control");
            return None;
        }
        let action = control.get_attribute("data-action")?;
        Some(Activation::new(action, control.get_attribute("data-name")))
    }
}

/// Represents a listener attached to the DOM.
/// When it is dropped it will detach the corresponding listener.
pub(crate) struct Listener {
    element: DomElement,
    type_: Str,
    closure: Closure<dyn FnMut(DomEvent)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(e) = self
            .element
            .remove_event_listener_with_callback(&self.type_, self.closure.as_ref().unchecked_ref())
        {
            warn!("Failed to remove {} listener: {:?}", self.type_, e);
        }
    }
}

impl Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Listener({})", self.type_)
    }
}

pub(crate) fn event_handler<S: Into<Str>, F: FnMut(DomEvent) + 'static>(
    element: DomElement,
    event_name: S,
    handler: F,
) -> JsResult<Listener> {
    let type_ = event_name.into();
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(DomEvent)>);
    element.add_event_listener_with_callback(&type_, closure.as_ref().unchecked_ref())?;
    Ok(Listener {
        element,
        type_,
        closure,
    })
}

/// Route every click below `root` through `Model::dispatch` and into the update loop
pub(crate) fn delegate_clicks<M: Model>(root: DomElement) -> JsResult<Listener> {
    let handler = move |event: DomEvent| {
        let activation = match Activation::from_event(&event) {
            Some(activation) => activation,
            None => return,
        };
        debug!("Activated: {:?}", activation);
        let outcome = App::<M>::with(|app| match app.model.dispatch(&activation) {
            Some(msg) => app.loop_update(Cmd::msg(msg)),
            None => Ok(()),
        });
        match outcome {
            Some(Ok(())) => (),
            Some(Err(e)) => error!("Update failed: {:?}", e),
            None => error!("Click received but no app is running"),
        }
    };
    event_handler(root, "click", handler)
}
