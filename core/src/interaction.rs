use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::action::Action;
use crate::config::ViewerConfig;
use crate::input::{ElementState, Key, MouseButton, NamedKey};
use crate::scene::Shape;
use crate::trackball::{OrbitTrackball, Trackball};

/// What the host should do after an input was handled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputResponse {
    /// The window contents changed and should be redrawn.
    pub redraw: bool,
    /// An action for the registered handlers.
    pub action: Option<Action>,
}

impl InputResponse {
    fn redraw() -> Self {
        Self { redraw: true, action: None }
    }

    fn trigger(action: Action) -> Self {
        Self { redraw: true, action: Some(action) }
    }
}

/// Turns raw pointer and keyboard input into camera changes and actions.
///
/// Only one button is tracked at a time. Positions are given in window pixels
/// with the origin at the top-left and flipped to a bottom-left origin before
/// use.
pub struct Interaction {
    pressed: Option<MouseButton>,
    /// Camera pan, applied after the trackball rotation.
    translation: Vector3<f32>,
    last_location: (f32, f32),
    trackball: Box<dyn Trackball>,
    height: u32,
    pan_sensitivity: f32,
    wheel_step: f32,
}

impl Interaction {
    pub fn new(config: &ViewerConfig) -> Self {
        let trackball = OrbitTrackball::new(config.trackball_theta, config.trackball_distance);
        Self::with_trackball(config, Box::new(trackball))
    }

    pub fn with_trackball(config: &ViewerConfig, trackball: Box<dyn Trackball>) -> Self {
        Self {
            pressed: None,
            translation: Vector3::new(0.0, 0.0, 0.0),
            last_location: (0.0, 0.0),
            trackball,
            height: config.height,
            pan_sensitivity: config.pan_sensitivity,
            wheel_step: config.wheel_step,
        }
    }

    pub fn pressed(&self) -> Option<MouseButton> {
        self.pressed
    }

    pub fn translation(&self) -> Vector3<f32> {
        self.translation
    }

    /// Last pointer location, bottom-left origin.
    pub fn last_location(&self) -> (f32, f32) {
        self.last_location
    }

    pub fn trackball(&self) -> &dyn Trackball {
        self.trackball.as_ref()
    }

    pub fn set_height(&mut self, height: u32) {
        self.height = height;
    }

    /// Pans the camera.
    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.translation += Vector3::new(x, y, z);
    }

    /// The pan applied on top of the trackball rotation.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation) * self.trackball.matrix()
    }

    /// Maps view space back to world space, `None` if the trackball yields a
    /// singular matrix.
    pub fn inverse_view(&self) -> Option<Matrix4<f32>> {
        self.view_matrix().invert()
    }

    fn flip_y(&self, y: f32) -> f32 {
        self.height as f32 - y
    }

    /// Handles a button press or release at a window position.
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState, x: f32, y: f32) -> InputResponse {
        let y = self.flip_y(y);

        if state == ElementState::Released {
            self.pressed = None;
            return InputResponse::redraw();
        }

        self.last_location = (x, y);
        self.pressed = Some(button);

        match button {
            MouseButton::Left => InputResponse::trigger(Action::Pick { x, y }),
            MouseButton::WheelUp => {
                self.translate(0.0, 0.0, self.wheel_step);
                InputResponse::redraw()
            }
            MouseButton::WheelDown => {
                self.translate(0.0, 0.0, -self.wheel_step);
                InputResponse::redraw()
            }
            MouseButton::Middle | MouseButton::Right => InputResponse::redraw(),
        }
    }

    /// Handles pointer motion to a window position.
    pub fn handle_mouse_move(&mut self, x: f32, y: f32) -> InputResponse {
        let y = self.flip_y(y);
        let (last_x, last_y) = self.last_location;
        let (dx, dy) = (x - last_x, y - last_y);
        self.last_location = (x, y);

        let Some(button) = self.pressed else {
            return InputResponse::default();
        };

        match button {
            MouseButton::Right => {
                self.trackball.drag(last_x, last_y, dx, dy);
                InputResponse::redraw()
            }
            MouseButton::Left => InputResponse::trigger(Action::Move { x, y }),
            MouseButton::Middle => {
                let scale = self.pan_sensitivity;
                self.translate(dx / scale, dy / scale, 0.0);
                InputResponse::redraw()
            }
            MouseButton::WheelUp | MouseButton::WheelDown => InputResponse::redraw(),
        }
    }

    /// Handles a key press while the pointer is at a window position.
    pub fn handle_keystroke(&mut self, key: &Key, x: f32, y: f32) -> InputResponse {
        let y = self.flip_y(y);

        let action = match key {
            Key::Character('s') => Some(Action::Place { shape: Shape::Sphere, x, y }),
            Key::Character('c') => Some(Action::Place { shape: Shape::Cube, x, y }),
            Key::Named(NamedKey::ArrowUp) => Some(Action::Scale { up: true }),
            Key::Named(NamedKey::ArrowDown) => Some(Action::Scale { up: false }),
            Key::Named(NamedKey::ArrowLeft) => Some(Action::RotateColor { forward: true }),
            Key::Named(NamedKey::ArrowRight) => Some(Action::RotateColor { forward: false }),
            _ => None,
        };

        InputResponse { redraw: true, action }
    }
}
