use ocean_core::{wheel_input, DragMode, DragTracker, EventBus, SceneEvent};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

fn listen<E: JsCast + 'static>(
    target: &web::EventTarget,
    kind: &str,
    mut handler: impl FnMut(E) + 'static,
) {
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        if let Ok(ev) = ev.dyn_into::<E>() {
            handler(ev);
        }
    }) as Box<dyn FnMut(web::Event)>);
    let callback = closure.as_ref().unchecked_ref();
    if let Err(e) = target.add_event_listener_with_callback(kind, callback) {
        log::warn!("could not listen for {}: {:?}", kind, e);
    }
    closure.forget();
}

/// Pointer drags orbit or pan, the wheel dollies. Everything goes through the bus.
pub fn wire_orbit(canvas: &web::HtmlCanvasElement, bus: EventBus) {
    let target: &web::EventTarget = canvas.as_ref();
    let drag = Rc::new(RefCell::new(DragTracker::default()));

    {
        let drag = drag.clone();
        let canvas = canvas.clone();
        listen(target, "pointerdown", move |ev: web::PointerEvent| {
            let mode = u32::try_from(ev.button())
                .ok()
                .and_then(|b| DragMode::for_button(b, ev.shift_key()));
            if let Some(mode) = mode {
                canvas.set_pointer_capture(ev.pointer_id()).ok();
                drag.borrow_mut()
                    .press(mode, ev.client_x() as f32, ev.client_y() as f32);
            }
        });
    }
    {
        let drag = drag.clone();
        let bus = bus.clone();
        listen(target, "pointermove", move |ev: web::PointerEvent| {
            if let Some(input) = drag
                .borrow_mut()
                .move_to(ev.client_x() as f32, ev.client_y() as f32)
            {
                bus.send(SceneEvent::Orbit(input));
            }
        });
    }
    for kind in ["pointerup", "pointercancel"] {
        let drag = drag.clone();
        listen(target, kind, move |_: web::PointerEvent| drag.borrow_mut().release());
    }
    listen(target, "wheel", move |ev: web::WheelEvent| {
        ev.prevent_default();
        if let Some(input) = wheel_input(ev.delta_y() as f32) {
            bus.send(SceneEvent::Orbit(input));
        }
    });
    // Right-drag pans; keep the browser menu out of the way.
    listen(target, "contextmenu", |ev: web::MouseEvent| ev.prevent_default());
}
