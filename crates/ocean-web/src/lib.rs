#![cfg(target_arch = "wasm32")]

mod asset;
mod debug;
mod dom;
mod frame;
mod input;
mod panel;

use anyhow::anyhow;
use ocean_core::{Scene, SceneConfig, Scheduler, StopToken, PARTICLE_MASK_PATH};
use ocean_render::Renderer;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

thread_local! {
    static STOP: RefCell<Option<StopToken>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("ocean-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Stop the frame loop after the current frame.
#[wasm_bindgen]
pub fn stop_scene() {
    STOP.with(|s| {
        if let Some(token) = s.borrow().as_ref() {
            token.cancel();
        }
    });
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow!("no document"))?;
    let canvas = dom::scene_canvas(&document)?;

    let config = SceneConfig::from_flags(dom::hash_flags(&window));
    let viewport = dom::viewport(&window);
    dom::apply_canvas_size(&canvas, viewport);
    let mut scene = Scene::new(config, viewport)?;

    let mask = asset::fetch_mask(&window, PARTICLE_MASK_PATH).await;
    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
    let renderer = Renderer::new(&instance, surface, &mut scene, &mask).await?;

    dom::wire_resize(&window, &canvas, scene.bus());
    input::wire_orbit(&canvas, scene.bus());
    if scene.config().debug {
        if let Err(e) = debug::build_panel(&document, &scene) {
            log::warn!("debug panel unavailable: {:?}", e);
        }
    }

    let scheduler = Scheduler::start();
    STOP.with(|s| *s.borrow_mut() = Some(scheduler.stop_token()));
    frame::start_loop(frame::FrameLoop::new(scene, renderer, scheduler));
    Ok(())
}
