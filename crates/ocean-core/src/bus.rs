use crate::camera::OrbitInput;
use crate::params::ParamChange;
use crate::passes::PassKind;
use crate::viewport::ViewportState;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Everything a host callback may ask of the scene. Applied at the start of
/// the next tick so a frame always sees one consistent snapshot.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneEvent {
    Param(ParamChange),
    SetPassEnabled { kind: PassKind, enabled: bool },
    Resize(ViewportState),
    Orbit(OrbitInput),
}

/// Single-threaded FIFO shared between host callbacks and the frame loop.
#[derive(Clone, Default)]
pub struct EventBus {
    queue: Rc<RefCell<VecDeque<SceneEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&self, event: SceneEvent) {
        self.queue.borrow_mut().push_back(event);
    }

    /// Take every queued event, oldest first.
    pub fn drain(&self) -> Vec<SceneEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}
