//! "Who's that Pokémon?" in the browser.
//!
//! A sprite is shown in silhouette, the player picks a name, the answer is
//! revealed and scored, and the next question is fetched from the server.
//!
//! Built on a small implementation of The [Elm](https://elm-lang.org/) Architecture:
//! all state lives in a [`Model`], changes only through [`Model::update`], and is
//! drawn by [`Model::view`] into a virtual DOM that is diffed onto the page.
//!

#[macro_use]
extern crate log;

use futures::future::LocalBoxFuture;
use futures::{Future, FutureExt};
use wasm_bindgen::prelude::*;
use web_sys::{Element as DomElement, Window};

use crate::config::Config;

use std::any::Any;
use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt::{self, Debug};

#[macro_use]
pub mod html;

pub mod config;
mod diff;
pub mod error;
pub mod event;
pub mod fetch;
pub mod program;
pub mod question;
pub mod quiz;
pub mod score;
pub mod timer;
pub mod util;

pub use event::Activation;
pub use html::Html;
pub use quiz::{Msg, Quiz};

pub use wasm_bindgen::JsValue;

type JsResult<T> = Result<T, JsValue>;

// Convenience alias
type Str = Cow<'static, str>;

/// A trait to associate a Model with a Msg type.
pub trait Model: 'static + Sized + Debug {
    type Msg: Debug + 'static;

    fn view(&self) -> Html;
    fn update(&mut self, msg: Self::Msg) -> Cmd<Self::Msg>;

    /// Translate a click on a `data-action` control into a message
    fn dispatch(&self, activation: &Activation) -> Option<Self::Msg>;
}

/// Mount the quiz on the element with id `target`.
///
/// The element may carry `data-config` and `data-question` JSON attributes,
/// see [`Quiz::boot`].
#[wasm_bindgen]
pub fn mount(target: &str) -> Result<(), JsValue> {
    program::run(
        |root: &DomElement| {
            let (config, rejected) =
                match Config::from_attribute(root.get_attribute("data-config").as_deref()) {
                    Ok(config) => (config, None),
                    Err(e) => (Config::default(), Some(e)),
                };
            util::init_logging(&config);
            if let Some(e) = rejected {
                error!("{}; using defaults", e);
            }
            Quiz::boot(config, root.get_attribute("data-question").as_deref())
        },
        target,
    )
}

/// The running application.
///
/// `program::run` builds one and stores it in a thread-local. Thereafter every
/// page event and every finished future borrows it through `App::with`, feeds
/// a message to `update`, and re-renders.
///
/// Any side-effect (fetching, reloading the page) is expressed ONLY as a `Cmd`
/// returned from `update`, so the loop (command -> update -> view -> command...)
/// is never broken.
pub(crate) struct App<M: Model> {
    window: Window,
    target: DomElement,
    pub(crate) model: M,
    current_vdom: Html,
    // kept alive for as long as the app is
    _clicks: event::Listener,
}

thread_local! {
    static APP: RefCell<Option<Box<dyn Any>>> = RefCell::new(None);
}

impl<M: Model> Debug for App<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "App (model: {:?})", self.model)
    }
}

impl<M: Model> App<M> {
    /// Make `app` the running application, replacing any previous one
    fn install(app: App<M>) {
        APP.with(|slot| {
            if slot.replace(Some(Box::new(app))).is_some() {
                warn!("Replacing an already running app");
            }
        })
    }

    /// Run a function with the running App.
    ///
    /// Returns `None` if there is no app of this type, or it is already
    /// borrowed further up the stack.
    fn with<R>(f: impl FnOnce(&mut Self) -> R) -> Option<R> {
        APP.with(|slot| {
            let mut slot = match slot.try_borrow_mut() {
                Ok(slot) => slot,
                Err(_) => {
                    error!("App is already in use");
                    return None;
                }
            };
            slot.as_mut()
                .and_then(|app| app.downcast_mut::<App<M>>())
                .map(f)
        })
    }

    /// Update the model with the given Cmd
    ///
    /// Each command may trigger another command, and we do not want to render
    /// each time, so we call update in a loop and explicitly break
    /// when we eventually receive a `None` command.
    ///
    /// After breaking the loop, we re-render the DOM
    fn loop_update(&mut self, Cmd(mut cmd): Cmd<M::Msg>) -> JsResult<()> {
        let mut loopct = 0;
        loop {
            loopct += 1;
            match cmd {
                CmdInner::None => break,
                // return without rendering
                CmdInner::NoOp => return Ok(()),
                CmdInner::Msg(msg) => {
                    trace!("Update: {:?}", msg);
                    let Cmd(new_cmd) = self.model.update(msg);
                    cmd = new_cmd; // we go again
                }
                CmdInner::Spawn(fut) => {
                    wasm_bindgen_futures::spawn_local(async move {
                        let msg = fut.await;
                        match App::<M>::with(|app| app.loop_update(Cmd::msg(msg))) {
                            Some(Ok(())) => (),
                            Some(Err(e)) => error!("Update failed: {:?}", e),
                            None => error!("Future resolved but no app is running"),
                        }
                    });
                    break;
                }
                CmdInner::Reload(notice) => {
                    if let Some(notice) = notice {
                        self.window.alert_with_message(&notice)?;
                    }
                    info!("Reloading page");
                    // this destroys the app, so don't bother rendering
                    return self.window.location().reload();
                }
            }
            if loopct > 100 {
                return Err(JsValue::from_str("Update loop did not settle"));
            }
        }
        self.current_vdom = self.render_dom()?;
        Ok(())
    }

    fn render_dom(&self) -> JsResult<Html> {
        let new_vdom = self.model.view();
        let diff = diff::diff_vdom(&self.current_vdom, &new_vdom);
        if diff.is_unchanged() {
            trace!("No change");
        } else {
            trace!("vdom diff: {:?}", diff);
            let document = self
                .window
                .document()
                .ok_or_else(|| JsValue::from_str("No document"))?;
            diff::render_diff(&self.target, &[(0, diff)], &document)?;
        }
        Ok(new_vdom)
    }
}

/// An event loop command.
///
/// Describes a side effect for the runtime to carry out after `update`.
/// See the various constructors for further explanation
pub struct Cmd<Msg>(pub(crate) CmdInner<Msg>);

pub(crate) enum CmdInner<Msg> {
    None,
    /// Indicates that no work should be done (no diffing or rendering)
    NoOp,
    Msg(Msg),
    Spawn(LocalBoxFuture<'static, Msg>),
    Reload(Option<Str>),
}

impl<Msg> Cmd<Msg> {
    /// Do nothing, but re-render
    pub fn none() -> Self {
        Cmd(CmdInner::None)
    }

    /// Do nothing, not even render. For messages that turned out not to
    /// change the model.
    pub fn noop() -> Self {
        Cmd(CmdInner::NoOp)
    }

    /// Send a message to the `update` function. The page is rendered after all messages
    /// in a chain have been run.
    ///
    /// Care should be taken not to create an infinite chain of messages as this will
    /// effectively block the event loop
    pub fn msg(msg: Msg) -> Self {
        Cmd(CmdInner::Msg(msg))
    }

    /// Spawn a future. When the future resolves, its message will be run in the
    /// event loop.
    pub fn spawn(fut: impl Future<Output = Msg> + 'static) -> Self {
        Cmd(CmdInner::Spawn(fut.boxed_local()))
    }

    /// Show `notice` in a blocking alert, then reload the page. All state is lost.
    pub fn reload(notice: impl Into<Str>) -> Self {
        Cmd(CmdInner::Reload(Some(notice.into())))
    }

    pub fn is_none(&self) -> bool {
        matches!(self.0, CmdInner::None | CmdInner::NoOp)
    }

    pub fn is_spawn(&self) -> bool {
        matches!(self.0, CmdInner::Spawn(_))
    }

    /// The alert shown before reloading, if this command reloads the page
    pub fn reload_notice(&self) -> Option<&str> {
        match &self.0 {
            CmdInner::Reload(notice) => Some(notice.as_deref().unwrap_or("")),
            _ => None,
        }
    }
}

impl<Msg: Debug> Debug for Cmd<Msg> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.0 {
            CmdInner::None => write!(f, "Cmd::None"),
            CmdInner::NoOp => write!(f, "Cmd::NoOp"),
            CmdInner::Msg(msg) => write!(f, "Cmd::Msg({:?})", msg),
            CmdInner::Spawn(_) => write!(f, "Cmd::Spawn"),
            CmdInner::Reload(notice) => write!(f, "Cmd::Reload({:?})", notice),
        }
    }
}

impl<T> From<T> for Cmd<T> {
    fn from(t: T) -> Self {
        Cmd::msg(t)
    }
}
