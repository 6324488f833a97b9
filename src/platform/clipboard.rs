//! Clipboard access for the share button

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen(inline_js = "
    export function write_clipboard(text) {
        return navigator.clipboard.writeText(text);
    }
")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn write_clipboard(text: &str) -> Result<js_sys::Promise, JsValue>;
}

/// Copy text; false if the browser refused
pub async fn copy_text(text: &str) -> bool {
    let promise = match write_clipboard(text) {
        Ok(promise) => promise,
        Err(err) => {
            log::warn!("Clipboard unavailable: {err:?}");
            return false;
        }
    };
    match JsFuture::from(promise).await {
        Ok(_) => true,
        Err(err) => {
            log::warn!("Clipboard write failed: {err:?}");
            false
        }
    }
}
