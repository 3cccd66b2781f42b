use crate::html::{Element, Html, Tag};
use crate::{event, App, Cmd, JsResult, JsValue, Model};

use web_sys::Element as DomElement;

/// Mount an application on the element with id `target` and run its first command.
///
/// `init` sees the mount element before it is cleared, so it can read any
/// server-rendered data attributes off it.
pub fn run<M: Model>(
    init: impl FnOnce(&DomElement) -> (M, Cmd<M::Msg>),
    target: &str,
) -> JsResult<()> {
    console_error_panic_hook::set_once();
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No global `window` exists"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document"))?;
    let root = document
        .get_element_by_id(target)
        .ok_or_else(|| JsValue::from_str(&format!("Target element #{} not found", target)))?;

    let (model, initcmd) = init(&root);

    // blank the target and create an initial child, so dom and vdom start in sync
    let initial = document.create_element(&Tag::Div.to_string())?;
    root.set_inner_html("");
    root.append_child(&initial)?;

    let clicks = event::delegate_clicks::<M>(root.clone())?;
    App::install(App {
        window,
        target: root,
        model,
        current_vdom: Html::from(Element::tag(Tag::Div)),
        _clicks: clicks,
    });
    info!("Mounted on #{}", target);

    // From this point on we only interact with App through App::with
    App::<M>::with(|app| app.loop_update(initcmd))
        .unwrap_or_else(|| Err(JsValue::from_str("App was not installed")))
}
