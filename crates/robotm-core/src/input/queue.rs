/// Raw input events delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A key was pressed. Codes follow `KeyboardEvent.keyCode`.
    KeyDown { key_code: u32 },
    KeyUp { key_code: u32 },
    /// A custom event from the page UI (restart button, ...).
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// A queue of input events.
/// The host pushes events between frames; the runner drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Take all pending events, leaving the queue empty.
    pub fn take(&mut self) -> InputQueue {
        InputQueue {
            events: std::mem::take(&mut self.events),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Whether a custom event of `kind` is pending.
    pub fn has_custom(&self, kind: u32) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, InputEvent::Custom { kind: k, .. } if *k == kind))
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
