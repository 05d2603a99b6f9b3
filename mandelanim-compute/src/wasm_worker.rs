//! Browser entry point: runs the compute worker inside a dedicated Web Worker.
//!
//! The host posts `{ request, buffer }` where `request` is the JSON form of
//! [`MainToWorker`](mandelanim_core::MainToWorker) and `buffer` is the
//! transferred `ArrayBuffer`. Replies go back as `{ reply, buffer }` with the
//! buffer in the transfer list.

use crate::envelope::process_posted;
use js_sys::{Array, ArrayBuffer, Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DedicatedWorkerGlobalScope, MessageEvent};

fn global_scope() -> Result<DedicatedWorkerGlobalScope, JsValue> {
    js_sys::global().dyn_into::<DedicatedWorkerGlobalScope>()
}

/// Worker initialization - called when the worker script loads
#[wasm_bindgen]
pub fn init_worker() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger not installed: {}", err)));
    }

    let onmessage = Closure::wrap(Box::new(move |e: MessageEvent| {
        if let Err(err) = handle_event(e.data()) {
            web_sys::console::error_1(&err);
        }
    }) as Box<dyn FnMut(_)>);

    global_scope()?.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    onmessage.forget();
    Ok(())
}

/// Handle one posted message.
#[wasm_bindgen]
pub fn handle_event(event_data: JsValue) -> Result<(), JsValue> {
    let request_str = Reflect::get(&event_data, &JsValue::from_str("request"))?
        .as_string()
        .ok_or_else(|| JsValue::from_str("No request field"))?;

    // Terminate carries no buffer.
    let transferred = Reflect::get(&event_data, &JsValue::from_str("buffer"))?
        .dyn_into::<ArrayBuffer>()
        .map(|buffer| Uint8Array::new(&buffer).to_vec())
        .unwrap_or_default();

    let outcome = process_posted(&request_str, transferred)
        .map_err(|e| JsValue::from_str(&format!("Worker message error: {}", e)))?;

    let global = global_scope()?;
    match outcome {
        Some(envelope) => {
            let pixels = Uint8Array::from(envelope.buffer.as_slice()).buffer();
            let message = Object::new();
            Reflect::set(&message, &JsValue::from_str("reply"), &JsValue::from_str(&envelope.reply))?;
            Reflect::set(&message, &JsValue::from_str("buffer"), &pixels)?;
            global.post_message_with_transfer(&message, &Array::of1(&pixels))?;
        }
        None => global.close(),
    }

    Ok(())
}
