use anyhow::{Context, Result, anyhow};
use leptos::prelude::ClassAttribute;
use leptos::prelude::ElementChild;
use leptos::{IntoView, component, view};
use wasm_bindgen::{JsCast, convert::FromWasmAbi, prelude::Closure};
use web_sys::{EventTarget, HtmlCanvasElement};

#[component]
pub fn WebGPUNotSupportedMsg() -> impl IntoView {
    view! {
        <div class="max-w-md mx-auto bg-blue-50 border border-blue-200 rounded-lg p-6 shadow-sm text-blue-800">
          <h2 class="text-xl font-semibold mb-2">WebGPU Not Supported</h2>
          <p class="mb-4 leading-relaxed">
            The fish are drawn with <span class="font-bold">WebGPU</span>.<br/>
            Your browser could not provide a GPU adapter for this canvas.
          </p>
          <p class="text-sm text-blue-700">
            <span class="font-semibold">Note:</span>"Chrome, Edge and Opera support WebGPU; "
            "Firefox and Safari may need it enabled by hand."
          </p>
        </div>
    }
}

/// Registers `f` for `ty` events on `target` for the lifetime of the page.
pub fn add_listener<T, F>(target: &EventTarget, ty: &str, f: F) -> Result<()>
where
    T: 'static + JsCast + FromWasmAbi,
    F: 'static + FnMut(T),
{
    let cb = Closure::wrap(Box::new(f) as Box<dyn FnMut(_)>);
    target
        .add_event_listener_with_callback(ty, cb.as_ref().unchecked_ref())
        .map_err(|e| anyhow!("add {ty} listener: {e:?}"))?;
    cb.forget();
    Ok(())
}

pub fn find_canvas(id: &str) -> Result<HtmlCanvasElement> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .context("no document")?;
    document
        .get_element_by_id(id)
        .context("canvas not in DOM yet")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| anyhow!("#{id} is not a canvas"))
}

/// Window size scaled by `scale`, in whole pixels, never zero.
pub fn canvas_size(scale: f32) -> Result<(u32, u32)> {
    let window = web_sys::window().context("no window")?;
    let px = |v: wasm_bindgen::JsValue| v.as_f64().unwrap_or(0.0) as f32;

    let w = px(window.inner_width().map_err(|e| anyhow!("{e:?}"))?);
    let h = px(window.inner_height().map_err(|e| anyhow!("{e:?}"))?);
    Ok((((w * scale) as u32).max(1), ((h * scale) as u32).max(1)))
}

pub fn log_error(context: &str, err: &anyhow::Error) {
    web_sys::console::error_1(&format!("{context}: {err:?}").into());
}
