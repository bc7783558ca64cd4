use crate::input::{ElementState, KeyEvent, MouseButton, MouseScrollDelta};

/// Window events delivered by the host event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Window was resized to the given physical size (width, height)
    Resized((u32, u32)),
    /// Keyboard input occurred; it applies at the current cursor position
    KeyboardInput {
        event: KeyEvent,
    },
    /// Cursor position changed, in physical pixels with a top-left origin
    CursorMoved {
        position: (f64, f64),
    },
    /// Mouse button was pressed or released at the current cursor position
    MouseInput {
        state: ElementState,
        button: MouseButton,
    },
    /// Mouse wheel was scrolled at the current cursor position
    MouseWheel {
        delta: MouseScrollDelta,
    },
}
