pub mod action;
mod camera;
pub mod config;
pub mod event;
pub mod input;
pub mod interaction;
pub mod trackball;
mod viewer;

// `crate::scene::*` resolves to the scene crate
pub use modeller_scene as scene;
pub use modeller_scene::common;

pub use action::{Action, ActionContext, ActionDispatcher, ActionKind, ActionParseError, CallbackId};
pub use camera::{Camera, CameraError, RAY_FAR_DEPTH, RAY_NEAR_DEPTH};
pub use config::{ConfigError, ViewerConfig};
pub use event::Event;
pub use interaction::{InputResponse, Interaction};
pub use modeller_scene::{DrawCommand, Frame, NodeDescriptor, NodeId, Scene, Shape};
pub use trackball::{OrbitTrackball, Trackball};
pub use viewer::Viewer;
