use js_sys::{Function, Promise};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

/// Longest wait between two fetch attempts
pub const MAX_DELAY_MS: u32 = 8_000;

/// Delay before retry number `attempt` (1-based): `base`, then doubling, capped
pub fn backoff(base_ms: u32, attempt: u32) -> u32 {
    let shift = attempt.saturating_sub(1).min(16);
    base_ms.saturating_mul(1 << shift).min(MAX_DELAY_MS)
}

/// `setTimeout` takes a signed delay; anything longer is clamped
fn timeout_arg(ms: u32) -> i32 {
    ms.min(i32::MAX as u32) as i32
}

/// Resolve after `ms` milliseconds, using `window.setTimeout`.
///
/// Without a window (or if scheduling fails) it resolves immediately.
pub async fn delay(ms: u32) {
    let mut schedule = |resolve: Function, _reject: Function| {
        let scheduled = web_sys::window().map(|window| {
            window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout_arg(ms))
        });
        match scheduled {
            Some(Ok(_handle)) => (),
            Some(Err(e)) => {
                warn!("setTimeout failed: {:?}", e);
                let _ = resolve.call0(&JsValue::NULL);
            }
            None => {
                let _ = resolve.call0(&JsValue::NULL);
            }
        }
    };
    let promise = Promise::new(&mut schedule);
    if let Err(e) = JsFuture::from(promise).await {
        warn!("Timer rejected: {:?}", e);
    }
}
