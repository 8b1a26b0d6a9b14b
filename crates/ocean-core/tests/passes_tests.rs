// Host-side tests for the pass chain, its plans and the glitch trigger.

use ocean_core::*;

#[test]
fn chain_order_is_fixed() {
    let chain = PassChain::new();
    let kinds: Vec<_> = chain.entries().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, PassKind::ORDER.to_vec());
}

#[test]
fn default_plan_pingpongs_through_enabled_effects() {
    let plan = PassChain::new().plan();
    let steps = plan.steps();
    assert_eq!(steps.len(), 4);
    assert_eq!(
        steps[0],
        PassStep {
            op: StepOp::Scene,
            source: None,
            dest: TargetId::A
        }
    );
    assert_eq!(
        steps[1],
        PassStep {
            op: StepOp::Effect(PassKind::RgbShift),
            source: Some(TargetId::A),
            dest: TargetId::B
        }
    );
    assert_eq!(
        steps[2],
        PassStep {
            op: StepOp::Effect(PassKind::Bloom),
            source: Some(TargetId::B),
            dest: TargetId::A
        }
    );
    assert_eq!(
        steps[3],
        PassStep { op: StepOp::Present, source: Some(TargetId::A), dest: TargetId::Screen }
    );
    assert!(!plan.runs(PassKind::Glitch));
    assert!(!plan.runs(PassKind::DotScreen));
}

#[test]
fn all_effects_off_is_render_then_present() {
    let mut chain = PassChain::new();
    for kind in PassKind::ORDER.into_iter().filter(|k| k.is_optional()) {
        chain.set_enabled(kind, false).unwrap();
    }
    let plan = chain.plan();
    let ops: Vec<_> = plan.steps().iter().map(|s| s.op).collect();
    assert_eq!(ops, vec![StepOp::Scene, StepOp::Present]);
    assert_eq!(plan.final_target(), TargetId::A);
}

#[test]
fn every_effect_on_runs_in_chain_order() {
    let mut chain = PassChain::new();
    for kind in PassKind::ORDER {
        chain.set_enabled(kind, true).unwrap();
    }
    let plan = chain.plan();
    let effects: Vec<_> = plan.effects().collect();
    assert_eq!(
        effects,
        vec![PassKind::Glitch, PassKind::DotScreen, PassKind::RgbShift, PassKind::Bloom]
    );
    assert_eq!(plan.final_target(), TargetId::A);
}

#[test]
fn toggling_off_and_on_restores_the_plan() {
    let mut chain = PassChain::new();
    let before = chain.clone();
    let plan = chain.plan();
    for kind in [PassKind::RgbShift, PassKind::Bloom, PassKind::Glitch] {
        chain.toggle(kind).unwrap();
        chain.toggle(kind).unwrap();
    }
    assert_eq!(chain, before);
    assert_eq!(chain.plan(), plan);
}

#[test]
fn base_render_cannot_be_disabled() {
    let mut chain = PassChain::new();
    assert_eq!(chain.set_enabled(PassKind::Render, false), Err(PassError::BaseRequired));
    assert!(chain.is_enabled(PassKind::Render));
    assert_eq!(chain.set_enabled(PassKind::Render, true), Ok(false));
}

#[test]
fn settings_can_be_replaced() {
    let mut chain = PassChain::new();
    chain
        .set_settings(PassSettings::Bloom(BloomSettings {
            strength: 1.0,
            ..BloomSettings::default()
        }))
        .unwrap();
    assert_eq!(chain.bloom().strength, 1.0);
    assert_eq!(chain.rgb_shift(), RgbShiftSettings::default());
}

#[test]
fn glitch_bursts_follow_the_trigger_interval() {
    let mut g = GlitchState::new(5);
    let mut strong_frames = Vec::new();
    for frame in 0..2000u32 {
        let interval = g.trigger_interval();
        let phase = g.frame();
        let (mode, u) = g.step(GlitchSettings::default());
        match mode {
            GlitchMode::Strong => strong_frames.push(frame),
            GlitchMode::Weak => {
                assert!(phase < interval / 5);
                assert!(u.amount <= 1.0 / 90.0);
            }
            GlitchMode::Bypass => assert_eq!(u.bypass, 1),
        }
    }
    assert_eq!(strong_frames[0], 0);
    for w in strong_frames.windows(2) {
        let gap = w[1] - w[0];
        assert!(
            (GLITCH_TRIGGER_MIN_FRAMES..=GLITCH_TRIGGER_MAX_FRAMES).contains(&gap),
            "gap {gap}"
        );
    }
}

#[test]
fn wild_glitch_is_always_strong() {
    let mut g = GlitchState::new(9);
    for _ in 0..50 {
        let (mode, u) = g.step(GlitchSettings { go_wild: true });
        assert_eq!(mode, GlitchMode::Strong);
        assert_eq!(u.bypass, 0);
    }
}

#[test]
fn glitch_noise_is_square_rgba() {
    let mut g = GlitchState::new(2);
    let data = g.noise_texture();
    assert_eq!(data.len(), (GLITCH_NOISE_SIZE * GLITCH_NOISE_SIZE * 4) as usize);
    assert!(data.chunks(4).all(|px| px[0] == px[1] && px[1] == px[2] && px[3] == 255));
}

#[test]
fn bloom_weights_blend_toward_inverse_factors() {
    let s = BloomSettings { radius: 0.0, ..BloomSettings::default() };
    assert_eq!(s.level_weights(), BLOOM_LEVEL_FACTORS);
    let s = BloomSettings { radius: 1.0, ..BloomSettings::default() };
    let w = s.level_weights();
    for (wi, fi) in w.iter().zip(BLOOM_LEVEL_FACTORS) {
        assert!((wi - (1.2 - fi)).abs() < 1e-6);
    }
    let composite = BloomCompositeUniforms::from(BloomSettings::default());
    assert_eq!(composite.strength, BLOOM_STRENGTH);
    assert_eq!(&composite.weights[BLOOM_LEVELS..], &[0.0; 8 - BLOOM_LEVELS]);
}

#[test]
fn post_uniform_layouts_match_wgsl() {
    assert_eq!(std::mem::size_of::<RgbShiftUniforms>(), 16);
    assert_eq!(std::mem::size_of::<DotScreenUniforms>(), 32);
    assert_eq!(std::mem::size_of::<GlitchUniforms>(), 48);
    assert_eq!(std::mem::size_of::<BloomBrightUniforms>(), 16);
    assert_eq!(std::mem::size_of::<BlurUniforms>(), 32);
    assert_eq!(std::mem::size_of::<BloomCompositeUniforms>(), 48);
}

#[test]
fn blur_uses_the_level_kernel() {
    let u = BlurUniforms::new(2, true, (320, 180));
    assert_eq!(u.direction, [1.0, 0.0]);
    assert_eq!(u.sigma, BLOOM_KERNEL_SIGMAS[2]);
    assert_eq!(u.texel_size, [1.0 / 320.0, 1.0 / 180.0]);
    assert_eq!(BlurUniforms::new(99, false, (0, 0)).sigma, BLOOM_KERNEL_SIGMAS[BLOOM_LEVELS - 1]);
}
