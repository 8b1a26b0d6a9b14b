// Debug panel layout derived from the parameter store. Free of DOM types so
// the mapping from widget strings to parameter values runs on the host too.

use glam::Vec2;
use ocean_core::{Binding, Color, ParamValue, ParameterStore, PassChain, PassKind};

#[derive(Clone, Debug, PartialEq)]
pub enum Widget {
    ColorPicker,
    Slider { min: f32, max: f32, step: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Control {
    pub param: String,
    pub label: String,
    /// Vector component this slider edits.
    pub component: Option<usize>,
    pub widget: Widget,
    pub initial: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Folder {
    pub title: &'static str,
    pub controls: Vec<Control>,
}

fn slider(bounds: Option<ocean_core::Bounds>) -> Widget {
    match bounds {
        Some(b) => Widget::Slider {
            min: b.min,
            max: b.max,
            step: b.step,
        },
        None => Widget::Slider {
            min: 0.0,
            max: 1.0,
            step: 0.0,
        },
    }
}

/// One folder per panel group, in declaration order. Clock-driven values
/// are left out.
pub fn folders(store: &ParameterStore) -> Vec<Folder> {
    store
        .groups()
        .into_iter()
        .map(|title| {
            let mut controls = Vec::new();
            for p in store
                .iter()
                .filter(|p| p.group == title && p.binding == Binding::Panel)
            {
                match p.value {
                    ParamValue::Color(c) => controls.push(Control {
                        param: p.name.clone(),
                        label: p.name.clone(),
                        component: None,
                        widget: Widget::ColorPicker,
                        initial: c.to_hex(),
                    }),
                    ParamValue::Scalar(v) => controls.push(Control {
                        param: p.name.clone(),
                        label: p.name.clone(),
                        component: None,
                        widget: slider(p.bounds),
                        initial: v.to_string(),
                    }),
                    ParamValue::Vector2(v) => {
                        for (i, (axis, value)) in [("x", v.x), ("y", v.y)].into_iter().enumerate() {
                            controls.push(Control {
                                param: p.name.clone(),
                                label: format!("{}.{}", p.name, axis),
                                component: Some(i),
                                widget: slider(p.bounds),
                                initial: value.to_string(),
                            });
                        }
                    }
                }
            }
            Folder { title, controls }
        })
        .collect()
}

/// Turn a widget's string value into a parameter value. Vector sliders need
/// the parameter's `previous` value to fill in the other component.
pub fn read_control(
    control: &Control,
    raw: &str,
    previous: Option<ParamValue>,
) -> Option<ParamValue> {
    match control.widget {
        Widget::ColorPicker => Color::from_hex(raw).ok().map(ParamValue::Color),
        Widget::Slider { .. } => {
            let v: f32 = raw.trim().parse().ok()?;
            match (control.component, previous) {
                (None, _) => Some(ParamValue::Scalar(v)),
                (Some(i), Some(ParamValue::Vector2(prev))) => {
                    let mut next = prev;
                    match i {
                        0 => next.x = v,
                        _ => next.y = v,
                    }
                    Some(ParamValue::Vector2(next))
                }
                (Some(i), _) => {
                    let mut next = Vec2::ZERO;
                    next[i.min(1)] = v;
                    Some(ParamValue::Vector2(next))
                }
            }
        }
    }
}

/// Checkbox state for every pass the panel may toggle.
pub fn pass_toggles(chain: &PassChain) -> Vec<(PassKind, bool)> {
    PassKind::ORDER
        .iter()
        .filter(|k| k.is_optional())
        .map(|&k| (k, chain.is_enabled(k)))
        .collect()
}
