//! DOM rendering of the debug panel (`#debug`). Controls only ever send
//! events; the scene applies them on its next tick.

use crate::dom::{js_err, js_err_el};
use crate::panel::{self, Control, Widget};
use ocean_core::{EventBus, ParamChange, ParamValue, Scene, SceneEvent};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

const PANEL_STYLE: &str = "position:fixed;top:8px;right:8px;width:350px;max-height:95vh;\
    overflow:auto;background:rgba(20,20,24,0.85);color:#ddd;font:12px monospace;\
    padding:6px;border-radius:6px;z-index:10";

fn element(document: &web::Document, tag: &str) -> anyhow::Result<web::Element> {
    document.create_element(tag).map_err(js_err)
}

fn folder(
    document: &web::Document,
    parent: &web::Element,
    title: &str,
) -> anyhow::Result<web::Element> {
    let details = element(document, "details")?;
    details.set_attribute("open", "").map_err(js_err)?;
    let summary = element(document, "summary")?;
    summary.set_text_content(Some(title));
    details.append_child(&summary).map_err(js_err)?;
    parent.append_child(&details).map_err(js_err)?;
    Ok(details)
}

fn row(
    document: &web::Document,
    parent: &web::Element,
    label: &str,
    input_type: &str,
) -> anyhow::Result<web::HtmlInputElement> {
    let wrapper = element(document, "label")?;
    wrapper
        .set_attribute("style", "display:flex;justify-content:space-between;gap:8px;margin:2px 0")
        .map_err(js_err)?;
    let text = element(document, "span")?;
    text.set_text_content(Some(label));
    let input = element(document, "input")?
        .dyn_into::<web::HtmlInputElement>()
        .map_err(js_err_el)?;
    input.set_type(input_type);
    wrapper.append_child(&text).map_err(js_err)?;
    wrapper.append_child(&input).map_err(js_err)?;
    parent.append_child(&wrapper).map_err(js_err)?;
    Ok(input)
}

fn on_input(input: &web::HtmlInputElement, kind: &str, mut handler: impl FnMut() + 'static) {
    let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    input
        .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        .ok();
    closure.forget();
}

fn wire_control(
    input: web::HtmlInputElement,
    control: Control,
    shared: Rc<Cell<Option<ParamValue>>>,
    bus: EventBus,
) {
    let source = input.clone();
    on_input(&input, "input", move || {
        let raw = source.value();
        match panel::read_control(&control, &raw, shared.get()) {
            Some(value) => {
                shared.set(Some(value));
                bus.send(SceneEvent::Param(ParamChange::new(control.param.clone(), value)));
            }
            None => log::warn!("ignoring {} = '{}'", control.label, raw),
        }
    });
}

/// Build the panel for `scene`'s parameters and passes and attach it to `<body>`.
pub fn build_panel(document: &web::Document, scene: &Scene) -> anyhow::Result<()> {
    let body = document
        .body()
        .ok_or_else(|| anyhow::anyhow!("no <body> for debug panel"))?;
    let root = element(document, "div")?;
    root.set_id("debug-panel");
    root.set_attribute("style", PANEL_STYLE).map_err(js_err)?;
    let bus = scene.bus();

    for group in panel::folders(scene.params()) {
        let parent = folder(document, &root, group.title)?;
        // Vector components share one value so each slider sends the full vector.
        let mut shared: Vec<(String, Rc<Cell<Option<ParamValue>>>)> = Vec::new();
        for control in group.controls {
            let cell = match shared.iter().find(|(name, _)| *name == control.param) {
                Some((_, cell)) => cell.clone(),
                None => {
                    let cell = Rc::new(Cell::new(scene.params().value(&control.param)));
                    shared.push((control.param.clone(), cell.clone()));
                    cell
                }
            };
            let input = match control.widget {
                Widget::ColorPicker => row(document, &parent, &control.label, "color")?,
                Widget::Slider { min, max, step } => {
                    let input = row(document, &parent, &control.label, "range")?;
                    input.set_min(&min.to_string());
                    input.set_max(&max.to_string());
                    if step > 0.0 {
                        input.set_step(&step.to_string());
                    } else {
                        input.set_step("any");
                    }
                    input
                }
            };
            input.set_value(&control.initial);
            wire_control(input, control, cell, bus.clone());
        }
    }

    let passes = folder(document, &root, "Passes")?;
    for (kind, enabled) in panel::pass_toggles(scene.passes()) {
        let input = row(document, &passes, kind.label(), "checkbox")?;
        input.set_checked(enabled);
        let source = input.clone();
        let bus = bus.clone();
        on_input(&input, "change", move || {
            bus.send(SceneEvent::SetPassEnabled {
                kind,
                enabled: source.checked(),
            });
        });
    }

    body.append_child(&root).map_err(js_err)?;
    log::info!("debug panel ready");
    Ok(())
}
