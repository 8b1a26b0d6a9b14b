// Host-side tests for the parameter store.

use glam::Vec2;
use ocean_core::*;

fn store() -> ParameterStore {
    let mut store = ParameterStore::new();
    SurfaceDescriptor::default().declare_params(&mut store).unwrap();
    declare_particle_params(&mut store).unwrap();
    GradientDescriptor::default().declare_params(&mut store).unwrap();
    for owner in ParamOwner::ALL {
        store.take_dirty(owner);
    }
    store
}

#[test]
fn declared_defaults_are_readable() {
    let store = store();
    assert_eq!(store.scalar(U_BIG_WAVES_ELEVATION), Some(BIG_WAVES_ELEVATION));
    assert_eq!(store.vector2(U_BIG_WAVES_FREQUENCY), Some(BIG_WAVES_FREQUENCY));
    assert_eq!(store.scalar(U_SIZE), Some(PARTICLE_SIZE));
    assert_eq!(store.color(U_TOP_COLOR), Color::from_hex(GRADIENT_TOP_HEX).ok());
}

#[test]
fn unknown_names_are_rejected() {
    let mut store = store();
    let err = store.set("uNope", ParamValue::Scalar(1.0)).unwrap_err();
    assert_eq!(err, ParamError::Unknown("uNope".to_string()));
}

#[test]
fn kind_mismatch_is_rejected() {
    let mut store = store();
    let err = store
        .set(U_BIG_WAVES_ELEVATION, ParamValue::Color(Color::WHITE))
        .unwrap_err();
    assert!(matches!(
        err,
        ParamError::KindMismatch {
            expected: ParamKind::Scalar,
            found: ParamKind::Color,
            ..
        }
    ));
    assert_eq!(store.scalar(U_BIG_WAVES_ELEVATION), Some(BIG_WAVES_ELEVATION));
}

#[test]
fn non_finite_values_are_rejected() {
    let mut store = store();
    assert!(matches!(
        store.set(U_COLOR_OFFSET, ParamValue::Scalar(f32::NAN)),
        Err(ParamError::NonFinite(_))
    ));
    assert!(matches!(
        store.set(U_BIG_WAVES_FREQUENCY, ParamValue::Vector2(Vec2::new(1.0, f32::INFINITY))),
        Err(ParamError::NonFinite(_))
    ));
    assert!(!store.is_dirty(ParamOwner::Surface));
}

#[test]
fn out_of_range_values_are_clamped() {
    let mut store = store();
    let applied = store
        .set(U_BIG_WAVES_ELEVATION, ParamValue::Scalar(10.0))
        .unwrap();
    assert_eq!(applied, ParamValue::Scalar(0.5));
    let applied = store
        .set(U_BIG_WAVES_FREQUENCY, ParamValue::Vector2(Vec2::new(-3.0, 50.0)))
        .unwrap();
    assert_eq!(applied, ParamValue::Vector2(Vec2::new(0.0, 10.0)));
}

#[test]
fn clock_parameters_only_move_with_the_clock() {
    let mut store = store();
    assert!(matches!(
        store.set(U_WATER_TIME, ParamValue::Scalar(3.0)),
        Err(ParamError::ClockBound(_))
    ));
    store.push_clock(3.0);
    assert_eq!(store.scalar(U_WATER_TIME), Some(3.0));
    assert_eq!(store.scalar(U_PARTICLES_TIME), Some(3.0));
}

#[test]
fn changes_mark_only_their_owner_dirty() {
    let mut store = store();
    store
        .apply(&ParamChange::new(U_BOTTOM_COLOR, ParamValue::Color(Color::WHITE)))
        .unwrap();
    assert!(store.is_dirty(ParamOwner::Gradient));
    assert!(!store.is_dirty(ParamOwner::Surface));
    assert!(!store.is_dirty(ParamOwner::Particles));
    assert!(store.take_dirty(ParamOwner::Gradient));
    assert!(!store.take_dirty(ParamOwner::Gradient));
}

#[test]
fn setting_the_same_value_is_not_a_change() {
    let mut store = store();
    store
        .set(U_SIZE, ParamValue::Scalar(PARTICLE_SIZE))
        .unwrap();
    assert!(!store.is_dirty(ParamOwner::Particles));
}

#[test]
fn duplicate_declarations_fail() {
    let mut store = store();
    let err = declare_particle_params(&mut store).unwrap_err();
    assert!(matches!(err, ParamError::Duplicate(_)));
}

#[test]
fn panel_groups_keep_declaration_order() {
    let store = store();
    assert_eq!(
        store.groups(),
        vec![
            GROUP_WATER_COLORS,
            GROUP_BIG_WAVES,
            GROUP_SMALL_WAVES,
            GROUP_PARTICLES,
            GROUP_GRADIENT
        ]
    );
}
