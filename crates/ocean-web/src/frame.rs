use ocean_core::{Scene, Scheduler};
use ocean_render::Renderer;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameLoop {
    scene: Scene,
    renderer: Renderer<'static>,
    scheduler: Scheduler,
}

impl FrameLoop {
    pub fn new(scene: Scene, renderer: Renderer<'static>, scheduler: Scheduler) -> Self {
        Self {
            scene,
            renderer,
            scheduler,
        }
    }

    /// Run one frame. Returns false once the stop token has been cancelled.
    pub fn frame(&mut self) -> bool {
        let Some(tick) = self.scheduler.next_tick() else {
            return false;
        };
        let plan = self.scene.tick(tick);
        let result = match self.renderer.render(&plan) {
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.renderer.reconfigure();
                Ok(())
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("[frame {}] surface timeout, skipping", tick.index);
                Ok(())
            }
            other => other,
        };
        self.scheduler.report(&tick, result);
        true
    }

    pub fn frames(&self) -> u64 {
        self.scheduler.frames()
    }
}

/// Drive `frame_loop` from `requestAnimationFrame` until it reports a stop.
pub fn start_loop(frame_loop: FrameLoop) {
    let frame_loop = Rc::new(RefCell::new(frame_loop));
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let mut ctx = frame_loop.borrow_mut();
        if !ctx.frame() {
            log::info!("frame loop stopped after {} frames", ctx.frames());
            return;
        }
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        if let Err(e) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", e);
        }
    }
}
