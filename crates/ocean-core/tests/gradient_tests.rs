// Host-side tests for the backdrop gradient.

use ocean_core::*;

fn black_to_white() -> GradientDescriptor {
    GradientDescriptor {
        top: Color::WHITE,
        bottom: Color::BLACK,
    }
}

#[test]
fn color_at_runs_bottom_to_top() {
    let g = black_to_white();
    assert_eq!(g.color_at(0.0), Color::BLACK);
    assert_eq!(g.color_at(1.0), Color::WHITE);
    assert_eq!(g.color_at(0.5), Color::rgb(0.5, 0.5, 0.5));
}

#[test]
fn color_at_clamps_outside_the_screen() {
    let g = black_to_white();
    assert_eq!(g.color_at(-3.0), Color::BLACK);
    assert_eq!(g.color_at(7.5), Color::WHITE);
}

#[test]
fn defaults_use_the_configured_hex_colors() {
    let g = GradientDescriptor::default();
    assert_eq!(g.top, Color::from_hex(GRADIENT_TOP_HEX).unwrap());
    assert_eq!(g.bottom, Color::from_hex(GRADIENT_BOTTOM_HEX).unwrap());
    assert_eq!(g.color_at(0.0), g.bottom);
}

#[test]
fn uniforms_ignore_elapsed_time() {
    let mut scene = Scene::new(SceneConfig::default(), ViewportState::new(800, 600, 1.0)).unwrap();
    let early = scene.tick(FrameTick {
        index: 0,
        elapsed: 0.0,
        delta: 0.0,
    });
    let late = scene.tick(FrameTick {
        index: 1,
        elapsed: 42.0,
        delta: 42.0,
    });
    assert!(early.gradient.is_some());
    assert_eq!(early.gradient, late.gradient);
    assert_ne!(early.surface.time, late.surface.time);
}
