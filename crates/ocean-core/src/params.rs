//! Named, typed uniform values with live-update bookkeeping.
//!
//! Every value a GPU program reads from the host is declared here once, tagged
//! with the component that owns it. Debug controls and the scheduler mutate
//! values through the store, which clamps them to their bounds and marks the
//! owning component dirty so the next frame re-uploads its uniform block.

use crate::color::Color;
use fnv::FnvHashMap;
use glam::Vec2;
use thiserror::Error;

/// Component whose GPU program consumes a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamOwner {
    Surface,
    Particles,
    Gradient,
}

impl ParamOwner {
    pub const ALL: [ParamOwner; 3] = [
        ParamOwner::Surface,
        ParamOwner::Particles,
        ParamOwner::Gradient,
    ];

    fn index(self) -> usize {
        match self {
            ParamOwner::Surface => 0,
            ParamOwner::Particles => 1,
            ParamOwner::Gradient => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Scalar,
    Vector2,
    Color,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamValue {
    Scalar(f32),
    Vector2(Vec2),
    Color(Color),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Scalar(_) => ParamKind::Scalar,
            ParamValue::Vector2(_) => ParamKind::Vector2,
            ParamValue::Color(_) => ParamKind::Color,
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            ParamValue::Scalar(v) => v.is_finite(),
            ParamValue::Vector2(v) => v.is_finite(),
            ParamValue::Color(c) => c.is_finite(),
        }
    }

    fn clamped(self, bounds: Option<Bounds>) -> Self {
        match (self, bounds) {
            (ParamValue::Scalar(v), Some(b)) => ParamValue::Scalar(b.clamp(v)),
            (ParamValue::Vector2(v), Some(b)) => {
                ParamValue::Vector2(Vec2::new(b.clamp(v.x), b.clamp(v.y)))
            }
            (other, _) => other,
        }
    }
}

/// Slider range for scalar and vector parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Bounds {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    #[inline]
    pub fn clamp(&self, v: f32) -> f32 {
        v.clamp(self.min, self.max)
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max && self.step >= 0.0
    }
}

/// Who is allowed to write a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
    /// Tunable from the debug panel.
    Panel,
    /// Driven by the scheduler's elapsed time only.
    Clock,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub owner: ParamOwner,
    pub group: &'static str,
    pub value: ParamValue,
    pub bounds: Option<Bounds>,
    pub binding: Binding,
}

impl Parameter {
    pub fn scalar(
        owner: ParamOwner,
        group: &'static str,
        name: &str,
        value: f32,
        bounds: Bounds,
    ) -> Self {
        Self {
            name: name.to_string(),
            owner,
            group,
            value: ParamValue::Scalar(value),
            bounds: Some(bounds),
            binding: Binding::Panel,
        }
    }

    pub fn vector2(
        owner: ParamOwner,
        group: &'static str,
        name: &str,
        value: Vec2,
        bounds: Bounds,
    ) -> Self {
        Self {
            name: name.to_string(),
            owner,
            group,
            value: ParamValue::Vector2(value),
            bounds: Some(bounds),
            binding: Binding::Panel,
        }
    }

    pub fn color(owner: ParamOwner, group: &'static str, name: &str, value: Color) -> Self {
        Self {
            name: name.to_string(),
            owner,
            group,
            value: ParamValue::Color(value),
            bounds: None,
            binding: Binding::Panel,
        }
    }

    /// A scalar written by the scheduler each frame (`uTime`).
    pub fn clock(owner: ParamOwner, name: &str) -> Self {
        Self {
            name: name.to_string(),
            owner,
            group: "Clock",
            value: ParamValue::Scalar(0.0),
            bounds: None,
            binding: Binding::Clock,
        }
    }

    pub fn kind(&self) -> ParamKind {
        self.value.kind()
    }
}

/// A control's request to change one parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamChange {
    pub name: String,
    pub value: ParamValue,
}

impl ParamChange {
    pub fn new(name: impl Into<String>, value: ParamValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("unknown parameter `{0}`")]
    Unknown(String),
    #[error("parameter `{name}` holds a {expected:?}, got a {found:?}")]
    KindMismatch {
        name: String,
        expected: ParamKind,
        found: ParamKind,
    },
    #[error("parameter `{0}` rejects non-finite values")]
    NonFinite(String),
    #[error("parameter `{0}` is declared twice")]
    Duplicate(String),
    #[error("parameter `{0}` is driven by the clock")]
    ClockBound(String),
    #[error("parameter `{0}` has inverted or non-finite bounds")]
    InvalidBounds(String),
}

#[derive(Default)]
pub struct ParameterStore {
    params: Vec<Parameter>,
    index: FnvHashMap<String, usize>,
    dirty: [bool; 3],
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, mut param: Parameter) -> Result<(), ParamError> {
        if self.index.contains_key(&param.name) {
            return Err(ParamError::Duplicate(param.name));
        }
        if let Some(b) = param.bounds {
            if !b.is_valid() {
                return Err(ParamError::InvalidBounds(param.name));
            }
        }
        if !param.value.is_finite() {
            return Err(ParamError::NonFinite(param.name));
        }
        param.value = param.value.clamped(param.bounds);
        self.dirty[param.owner.index()] = true;
        self.index.insert(param.name.clone(), self.params.len());
        self.params.push(param);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.index.get(name).map(|&i| &self.params[i])
    }

    pub fn value(&self, name: &str) -> Option<ParamValue> {
        self.get(name).map(|p| p.value)
    }

    pub fn scalar(&self, name: &str) -> Option<f32> {
        match self.value(name)? {
            ParamValue::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn vector2(&self, name: &str) -> Option<Vec2> {
        match self.value(name)? {
            ParamValue::Vector2(v) => Some(v),
            _ => None,
        }
    }

    pub fn color(&self, name: &str) -> Option<Color> {
        match self.value(name)? {
            ParamValue::Color(c) => Some(c),
            _ => None,
        }
    }

    /// Set a panel-bound parameter. Returns the value actually stored after
    /// clamping to the parameter's bounds.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<ParamValue, ParamError> {
        let i = *self
            .index
            .get(name)
            .ok_or_else(|| ParamError::Unknown(name.to_string()))?;
        let param = &mut self.params[i];
        if param.binding == Binding::Clock {
            return Err(ParamError::ClockBound(param.name.clone()));
        }
        if param.kind() != value.kind() {
            return Err(ParamError::KindMismatch {
                name: param.name.clone(),
                expected: param.kind(),
                found: value.kind(),
            });
        }
        if !value.is_finite() {
            return Err(ParamError::NonFinite(param.name.clone()));
        }
        let applied = value.clamped(param.bounds);
        if applied != param.value {
            param.value = applied;
            self.dirty[param.owner.index()] = true;
        }
        Ok(applied)
    }

    pub fn apply(&mut self, change: &ParamChange) -> Result<ParamValue, ParamError> {
        self.set(&change.name, change.value)
    }

    /// Write `elapsed` into every clock-bound parameter.
    pub fn push_clock(&mut self, elapsed: f32) {
        for param in self.params.iter_mut().filter(|p| p.binding == Binding::Clock) {
            param.value = ParamValue::Scalar(elapsed);
            self.dirty[param.owner.index()] = true;
        }
    }

    pub fn is_dirty(&self, owner: ParamOwner) -> bool {
        self.dirty[owner.index()]
    }

    /// Returns whether `owner` changed since the last call, clearing the flag.
    pub fn take_dirty(&mut self, owner: ParamOwner) -> bool {
        std::mem::take(&mut self.dirty[owner.index()])
    }

    /// Parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// Panel groups in first-declared order.
    pub fn groups(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        for p in self.params.iter().filter(|p| p.binding == Binding::Panel) {
            if !out.contains(&p.group) {
                out.push(p.group);
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
