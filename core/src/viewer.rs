use cgmath::Matrix4;

use crate::{
    action::{Action, ActionContext, ActionDispatcher, ActionKind},
    camera::Camera,
    common::MIN_COLOR,
    config::ViewerConfig,
    event::Event,
    input::{ElementState, Key, MouseButton},
    interaction::{InputResponse, Interaction},
    scene::{DrawCommand, Frame, NodeDescriptor, Scene},
};

/// One interactive modelling session: the scene, the camera and the input
/// handling that edits the scene.
pub struct Viewer {
    scene: Scene,
    camera: Camera,
    interaction: Interaction,
    dispatcher: ActionDispatcher,
    config: ViewerConfig,
    /// Last cursor position reported by the host, top-left origin
    cursor_position: (f32, f32),
}

impl Viewer {
    /// Creates a viewer on the sample scene.
    pub fn new(config: ViewerConfig) -> Self {
        Self::with_scene(config, Self::sample_scene())
    }

    /// Creates a viewer on the given scene.
    pub fn with_scene(config: ViewerConfig, scene: Scene) -> Self {
        let mut viewer = Self {
            scene,
            camera: Camera::from_config(&config),
            interaction: Interaction::new(&config),
            dispatcher: ActionDispatcher::new(),
            config,
            cursor_position: (0.0, 0.0),
        };
        viewer.register_default_handlers();
        viewer
    }

    /// A cube, a sphere and a snow figure spread around the origin.
    pub fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_node(NodeDescriptor::cube().with_translation(2.0, 0.0, 2.0).with_color_index(2));
        scene.add_node(NodeDescriptor::sphere().with_translation(-2.0, 0.0, 2.0).with_color_index(3));
        scene.add_node(
            NodeDescriptor::snow_figure()
                .with_translation(-2.0, 0.0, -2.0)
                .with_color_index(MIN_COLOR),
        );
        scene
    }

    /// Register default action handlers that edit the scene.
    fn register_default_handlers(&mut self) {
        self.dispatcher.register(ActionKind::Pick, |action, ctx| {
            if let Action::Pick { x, y } = *action {
                match ctx.ray_at(x, y) {
                    Ok(ray) => {
                        ctx.scene.pick(&ray, &ctx.inverse_view);
                    }
                    Err(err) => log::warn!("pick at ({}, {}) skipped: {}", x, y, err),
                }
            }
        });

        self.dispatcher.register(ActionKind::Move, |action, ctx| {
            if let Action::Move { x, y } = *action {
                match ctx.ray_at(x, y) {
                    Ok(ray) => {
                        ctx.scene.move_selected(&ray, &ctx.inverse_view);
                    }
                    Err(err) => log::warn!("move to ({}, {}) skipped: {}", x, y, err),
                }
            }
        });

        self.dispatcher.register(ActionKind::Place, |action, ctx| {
            if let Action::Place { shape, x, y } = *action {
                match ctx.ray_at(x, y) {
                    Ok(ray) => {
                        ctx.scene.place(shape, &ray, &ctx.inverse_view);
                    }
                    Err(err) => log::warn!("placing a {} at ({}, {}) skipped: {}", shape, x, y, err),
                }
            }
        });

        self.dispatcher.register(ActionKind::RotateColor, |action, ctx| {
            if let Action::RotateColor { forward } = *action {
                ctx.scene.rotate_selected_color(forward);
            }
        });

        self.dispatcher.register(ActionKind::Scale, |action, ctx| {
            if let Action::Scale { up } = *action {
                ctx.scene.scale_selected(up);
            }
        });
    }

    /// Handle a single host event. Returns whether the window should be redrawn.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        let (x, y) = self.cursor_position;
        match event {
            Event::Resized((width, height)) => {
                self.resize(*width, *height);
                true
            }
            Event::CursorMoved { position } => {
                let (x, y) = (position.0 as f32, position.1 as f32);
                self.cursor_position = (x, y);
                self.handle_mouse_move(x, y)
            }
            Event::MouseInput { state, button } => self.handle_mouse_button(*button, *state, x, y),
            Event::MouseWheel { delta } => match delta.wheel_button() {
                Some(button) => self.handle_mouse_button(button, ElementState::Pressed, x, y),
                None => false,
            },
            Event::KeyboardInput { event } => {
                // Held keys would otherwise place a node per OS repeat
                if event.state != ElementState::Pressed || event.repeat {
                    return false;
                }
                self.handle_keystroke(&event.logical_key, x, y)
            }
        }
    }

    /// Handles a button press or release at a window position (top-left origin).
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState, x: f32, y: f32) -> bool {
        let response = self.interaction.handle_mouse_button(button, state, x, y);
        self.apply(response)
    }

    /// Handles pointer motion to a window position (top-left origin).
    pub fn handle_mouse_move(&mut self, x: f32, y: f32) -> bool {
        let response = self.interaction.handle_mouse_move(x, y);
        self.apply(response)
    }

    /// Handles a key press with the pointer at a window position (top-left origin).
    pub fn handle_keystroke(&mut self, key: &Key, x: f32, y: f32) -> bool {
        let response = self.interaction.handle_keystroke(key, x, y);
        self.apply(response)
    }

    fn apply(&mut self, response: InputResponse) -> bool {
        if let Some(action) = response.action {
            self.trigger(&action);
        }
        response.redraw
    }

    /// Runs every handler registered for the action's kind and returns how many ran.
    pub fn trigger(&mut self, action: &Action) -> usize {
        let Some(inverse_view) = self.interaction.inverse_view() else {
            log::warn!("view transform is singular, dropping action '{}'", action);
            return 0;
        };

        let mut ctx = ActionContext {
            scene: &mut self.scene,
            camera: &self.camera,
            inverse_view,
        };
        self.dispatcher.trigger(action, &mut ctx)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
        self.interaction.set_height(height);
        log::debug!("viewport resized to {}x{}", width, height);
    }

    /// Camera pan applied after the trackball rotation.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.interaction.view_matrix()
    }

    pub fn inverse_view(&self) -> Option<Matrix4<f32>> {
        self.interaction.inverse_view()
    }

    /// Draws the scene followed by the ground plane.
    pub fn render<F: Frame>(&self, frame: &mut F) {
        let view = self.view_matrix();
        self.scene.render(frame, view);
        frame.draw(DrawCommand::ground_plane(view));
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut ActionDispatcher {
        &mut self.dispatcher
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn size(&self) -> (u32, u32) {
        (self.camera.width, self.camera.height)
    }
}
