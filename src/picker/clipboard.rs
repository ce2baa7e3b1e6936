//! Clipboard writes for `ColorPicker`.
//!
//! Copying is fire-and-forget from the picker's point of view: the promise
//! always resolves, to `true` or `false`, and state is never touched.
//! Secure contexts use the async clipboard API; everything else goes through
//! a hidden `<textarea>` and `document.execCommand("copy")`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{Document, HtmlDocument, HtmlTextAreaElement, Window};

pub(crate) fn copy_text(text: String) -> js_sys::Promise {
    future_to_promise(async move {
        let copied = write_text(&text).await;
        if !copied {
            tracing::warn!(text = %text, "Clipboard write failed");
        }
        Ok(JsValue::from_bool(copied))
    })
}

async fn write_text(text: &str) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    if has_async_clipboard(&window) {
        return JsFuture::from(window.navigator().clipboard().write_text(text))
            .await
            .is_ok();
    }
    match window.document() {
        Some(document) => copy_with_textarea(&document, text).unwrap_or_else(|e| {
            tracing::debug!(error = ?e, "execCommand copy failed");
            false
        }),
        None => false,
    }
}

/// `navigator.clipboard` only exists in secure contexts of newer browsers.
fn has_async_clipboard(window: &Window) -> bool {
    window.is_secure_context()
        && js_sys::Reflect::get(&window.navigator(), &JsValue::from_str("clipboard"))
            .is_ok_and(|c| !c.is_undefined() && !c.is_null())
}

fn copy_with_textarea(document: &Document, text: &str) -> Result<bool, JsValue> {
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("Document has no body"))?;
    let textarea = document
        .create_element("textarea")?
        .dyn_into::<HtmlTextAreaElement>()
        .map_err(|_| JsValue::from_str("Failed to create textarea"))?;
    textarea.set_value(text);
    // Fixed and transparent so the page neither scrolls nor flashes
    let style = textarea.style();
    style.set_property("position", "fixed")?;
    style.set_property("opacity", "0")?;

    body.append_child(&textarea)?;
    textarea.select();
    let copied = textarea
        .set_selection_range(0, u32::MAX)
        .and_then(|()| {
            document
                .dyn_ref::<HtmlDocument>()
                .ok_or_else(|| JsValue::from_str("Not an HTML document"))?
                .exec_command("copy")
        });
    body.remove_child(&textarea)?;
    copied
}
