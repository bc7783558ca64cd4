//! Input types for the viewer, independent of any windowing library.
//!
//! A host event loop converts its own events into these types before passing
//! them to [`crate::Viewer::handle_event`].

/// Whether a button or key went down or up.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ElementState {
    Pressed,
    Released,
}

/// Mouse buttons, including the wheel directions.
///
/// The wheel is modelled as two momentary buttons: a wheel step presses one of
/// them and nothing ever releases it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
}

/// Scroll amount reported by the host.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseScrollDelta {
    /// Lines or rows, positive away from the user.
    LineDelta(f32, f32),
    /// Pixels, positive away from the user.
    PixelDelta(f32, f32),
}

impl MouseScrollDelta {
    /// The wheel button a scroll maps to, `None` for a purely horizontal scroll.
    pub fn wheel_button(&self) -> Option<MouseButton> {
        let vertical = match *self {
            MouseScrollDelta::LineDelta(_, y) | MouseScrollDelta::PixelDelta(_, y) => y,
        };
        if vertical > 0.0 {
            Some(MouseButton::WheelUp)
        } else if vertical < 0.0 {
            Some(MouseButton::WheelDown)
        } else {
            None
        }
    }
}

/// Logical key meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Named(NamedKey),
    Character(char),
}

/// Non-character keys the viewer cares about.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
}

/// A keyboard event.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    pub logical_key: Key,
    pub state: ElementState,
    /// True when the key is held down and the OS is repeating it.
    pub repeat: bool,
}

impl KeyEvent {
    pub fn pressed(logical_key: Key) -> Self {
        Self {
            logical_key,
            state: ElementState::Pressed,
            repeat: false,
        }
    }
}
