use anyhow::anyhow;
use ocean_core::{EventBus, SceneEvent, ViewportState};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn js_err(e: JsValue) -> anyhow::Error {
    anyhow!("{:?}", e)
}

/// For failed `dyn_into` casts that hand back the original element.
pub fn js_err_el(e: web::Element) -> anyhow::Error {
    anyhow!("unexpected element {}", e.tag_name())
}

pub fn scene_canvas(document: &web::Document) -> anyhow::Result<web::HtmlCanvasElement> {
    document
        .query_selector("canvas.webgl")
        .map_err(js_err)?
        .ok_or_else(|| anyhow!("missing canvas.webgl"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow!("canvas.webgl is not a canvas: {:?}", e))
}

/// Flags from the URL fragment: `#debug&plain` -> ["debug", "plain"].
pub fn hash_flags(window: &web::Window) -> Vec<String> {
    let hash = window.location().hash().unwrap_or_default();
    hash.trim_start_matches('#')
        .split(['&', ','])
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Window size in CSS pixels plus the device pixel ratio.
pub fn viewport(window: &web::Window) -> ViewportState {
    let css = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(1.0) as u32;
    ViewportState::new(
        css(window.inner_width()),
        css(window.inner_height()),
        window.device_pixel_ratio(),
    )
}

/// Backing store at device pixels, CSS size at logical pixels.
pub fn apply_canvas_size(canvas: &web::HtmlCanvasElement, viewport: ViewportState) {
    let (w, h) = viewport.physical_size();
    canvas.set_width(w);
    canvas.set_height(h);
    let style = canvas.style();
    style
        .set_property("width", &format!("{}px", viewport.width))
        .ok();
    style
        .set_property("height", &format!("{}px", viewport.height))
        .ok();
}

pub fn wire_resize(window: &web::Window, canvas: &web::HtmlCanvasElement, bus: EventBus) {
    let canvas = canvas.clone();
    let closure = Closure::wrap(Box::new(move || {
        if let Some(w) = web::window() {
            let vp = viewport(&w);
            apply_canvas_size(&canvas, vp);
            bus.send(SceneEvent::Resize(vp));
        }
    }) as Box<dyn FnMut()>);
    window
        .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
        .ok();
    closure.forget();
}
