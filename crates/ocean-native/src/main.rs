use anyhow::Context;
use ocean_core::{
    wheel_input, DragMode, DragTracker, EventBus, PassKind, Scene, SceneConfig, SceneEvent,
    Scheduler, ViewportState, PARTICLE_MASK_PATH,
};
use ocean_render::{MaskImage, Renderer};
use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

/// Number keys toggle the optional passes in chain order.
fn pass_for_key(key: &str) -> Option<PassKind> {
    match key {
        "1" => Some(PassKind::Glitch),
        "2" => Some(PassKind::DotScreen),
        "3" => Some(PassKind::RgbShift),
        "4" => Some(PassKind::Bloom),
        _ => None,
    }
}

fn mouse_button_index(button: MouseButton) -> Option<u32> {
    match button {
        MouseButton::Left => Some(0),
        MouseButton::Middle => Some(1),
        MouseButton::Right => Some(2),
        _ => None,
    }
}

fn viewport_for(window: &Window, size: PhysicalSize<u32>) -> ViewportState {
    let scale = window.scale_factor();
    let logical = size.to_logical::<f64>(scale);
    ViewportState::new(logical.width.round() as u32, logical.height.round() as u32, scale)
}

fn load_mask(path: &str) -> MaskImage {
    match std::fs::read(path) {
        Ok(bytes) => MaskImage::decode_or_solid(&bytes),
        Err(e) => {
            log::warn!("particle mask {} unavailable, using solid sprite: {}", path, e);
            MaskImage::solid()
        }
    }
}

/// Pointer state in logical pixels, matching the web host's CSS pixels.
#[derive(Default)]
struct Pointer {
    drag: DragTracker,
    position: [f32; 2],
    shift: bool,
}

impl Pointer {
    fn button(&mut self, state: ElementState, button: MouseButton) {
        match state {
            ElementState::Pressed => {
                let mode = mouse_button_index(button)
                    .and_then(|b| DragMode::for_button(b, self.shift));
                if let Some(mode) = mode {
                    self.drag.press(mode, self.position[0], self.position[1]);
                }
            }
            ElementState::Released => self.drag.release(),
        }
    }

    fn moved(&mut self, bus: &EventBus, x: f32, y: f32) {
        self.position = [x, y];
        if let Some(input) = self.drag.move_to(x, y) {
            bus.send(SceneEvent::Orbit(input));
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SceneConfig::from_flags(std::env::args().skip(1));
    let event_loop = EventLoop::new().context("creating event loop")?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Ocean (native)")
            .build(&event_loop)
            .context("creating window")?,
    );

    let viewport = viewport_for(&window, window.inner_size());
    let mut scene = Scene::new(config, viewport).context("building scene")?;
    let mask = load_mask(PARTICLE_MASK_PATH);
    let instance = wgpu::Instance::default();
    let surface = instance
        .create_surface(window.clone())
        .context("creating surface")?;
    let mut renderer = pollster::block_on(Renderer::new(&instance, surface, &mut scene, &mask))?;

    let bus = scene.bus();
    let mut scheduler = Scheduler::start();
    let stop = scheduler.stop_token();
    let mut pointer = Pointer::default();
    log::info!("keys: 1 glitch, 2 dot screen, 3 rgb shift, 4 bloom, Esc quit");

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => stop.cancel(),
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                bus.send(SceneEvent::Resize(viewport_for(&window, window.inner_size())));
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                pointer.shift = modifiers.state().shift_key()
            }
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(window.scale_factor());
                pointer.moved(&bus, logical.x, logical.y);
            }
            WindowEvent::MouseInput { state, button, .. } => pointer.button(state, button),
            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports scroll-up as positive; the orbit expects DOM sign.
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y,
                    MouseScrollDelta::PixelDelta(p) => -p.y as f32,
                };
                if let Some(input) = wheel_input(dy) {
                    bus.send(SceneEvent::Orbit(input));
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match logical_key {
                Key::Named(NamedKey::Escape) => stop.cancel(),
                Key::Character(c) => {
                    if let Some(kind) = pass_for_key(c.as_str()) {
                        bus.send(SceneEvent::SetPassEnabled {
                            kind,
                            enabled: !scene.passes().is_enabled(kind),
                        });
                    }
                }
                _ => {}
            },
            _ => {}
        },
        Event::AboutToWait => {
            let Some(tick) = scheduler.next_tick() else {
                log::info!("stopping after {} frames", scheduler.frames());
                elwt.exit();
                return;
            };
            let plan = scene.tick(tick);
            let result = match renderer.render(&plan) {
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    renderer.reconfigure();
                    Ok(())
                }
                Err(wgpu::SurfaceError::Timeout) => Ok(()),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory");
                    elwt.exit();
                    return;
                }
                other => other,
            };
            scheduler.report(&tick, result);
            window.request_redraw();
        }
        _ => {}
    })?;
    Ok(())
}
