use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use cgmath::Matrix4;
use thiserror::Error;

use crate::camera::{Camera, CameraError};
use crate::common::Ray;
use crate::scene::{Scene, Shape};

/// Context passed to action handlers, giving them the state of the session.
///
/// ## Lifetime Parameters
/// - `'c`: the duration of a single trigger; the context borrows the viewer's
///   scene mutably for that long
pub struct ActionContext<'c> {
    pub scene: &'c mut Scene,
    pub camera: &'c Camera,
    /// Maps view space (where picking rays live) to world space.
    pub inverse_view: Matrix4<f32>,
}

impl ActionContext<'_> {
    /// Generates the view-space picking ray through a window position
    /// (bottom-left origin).
    pub fn ray_at(&self, x: f32, y: f32) -> Result<Ray, CameraError> {
        self.camera.generate_ray(x, y)
    }
}

/// Unique identifier for a registered callback.
pub type CallbackId = u32;

/// Type alias for action callback functions.
///
/// Every handler registered for an action's kind runs; there is no way for a
/// handler to stop the others.
type ActionCallback = Box<dyn for<'c> Fn(&Action, &mut ActionContext<'c>)>;

/// The kinds of action the interaction layer can raise.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ActionKind {
    Pick,
    Move,
    Place,
    Scale,
    RotateColor,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        ActionKind::Pick,
        ActionKind::Move,
        ActionKind::Place,
        ActionKind::Scale,
        ActionKind::RotateColor,
    ];

    /// Stable name of the action.
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Pick => "pick",
            ActionKind::Move => "move",
            ActionKind::Place => "place",
            ActionKind::Scale => "scale",
            ActionKind::RotateColor => "rotate_color",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ActionParseError {
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error("action '{action}' expects {expected}")]
    MissingArgument { action: ActionKind, expected: &'static str },
    #[error("invalid coordinate '{0}'")]
    InvalidCoordinate(String),
    #[error("invalid direction '{0}'")]
    InvalidDirection(String),
    #[error(transparent)]
    Shape(#[from] crate::scene::ShapeParseError),
    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),
}

impl FromStr for ActionKind {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ActionParseError::UnknownAction(s.to_string()))
    }
}

/// A named, argument-carrying request raised by the interaction layer.
///
/// Positions are window coordinates with the origin at the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Pick { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Place { shape: Shape, x: f32, y: f32 },
    Scale { up: bool },
    RotateColor { forward: bool },
}

impl Action {
    /// Returns the [`ActionKind`] discriminant for this action.
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Pick { .. } => ActionKind::Pick,
            Action::Move { .. } => ActionKind::Move,
            Action::Place { .. } => ActionKind::Place,
            Action::Scale { .. } => ActionKind::Scale,
            Action::RotateColor { .. } => ActionKind::RotateColor,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Pick { x, y } => write!(f, "pick {x} {y}"),
            Action::Move { x, y } => write!(f, "move {x} {y}"),
            Action::Place { shape, x, y } => write!(f, "place {shape} {x} {y}"),
            Action::Scale { up } => write!(f, "scale {}", if *up { "up" } else { "down" }),
            Action::RotateColor { forward } => {
                write!(f, "rotate_color {}", if *forward { "forward" } else { "backward" })
            }
        }
    }
}

fn next_word<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    action: ActionKind,
    expected: &'static str,
) -> Result<&'a str, ActionParseError> {
    words
        .next()
        .ok_or(ActionParseError::MissingArgument { action, expected })
}

fn next_coordinate<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    action: ActionKind,
    expected: &'static str,
) -> Result<f32, ActionParseError> {
    let word = next_word(words, action, expected)?;
    word.parse()
        .map_err(|_| ActionParseError::InvalidCoordinate(word.to_string()))
}

/// Parses the textual form printed by `Display`, e.g. `place sphere 10 20`.
impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let kind: ActionKind = words.next().unwrap_or_default().parse()?;

        let action = match kind {
            ActionKind::Pick => Action::Pick {
                x: next_coordinate(&mut words, kind, "x y")?,
                y: next_coordinate(&mut words, kind, "x y")?,
            },
            ActionKind::Move => Action::Move {
                x: next_coordinate(&mut words, kind, "x y")?,
                y: next_coordinate(&mut words, kind, "x y")?,
            },
            ActionKind::Place => Action::Place {
                shape: next_word(&mut words, kind, "shape x y")?.parse()?,
                x: next_coordinate(&mut words, kind, "shape x y")?,
                y: next_coordinate(&mut words, kind, "shape x y")?,
            },
            ActionKind::Scale => match next_word(&mut words, kind, "up|down")? {
                "up" => Action::Scale { up: true },
                "down" => Action::Scale { up: false },
                other => return Err(ActionParseError::InvalidDirection(other.to_string())),
            },
            ActionKind::RotateColor => match next_word(&mut words, kind, "forward|backward")? {
                "forward" => Action::RotateColor { forward: true },
                "backward" => Action::RotateColor { forward: false },
                other => return Err(ActionParseError::InvalidDirection(other.to_string())),
            },
        };

        let rest: Vec<&str> = words.collect();
        if !rest.is_empty() {
            return Err(ActionParseError::TrailingInput(rest.join(" ")));
        }
        Ok(action)
    }
}

/// Registry of action handlers.
///
/// Handlers are registered per [`ActionKind`] and invoked synchronously, in
/// registration order, when an action of that kind is triggered. The same
/// closure may be registered more than once; each registration gets its own
/// [`CallbackId`].
#[derive(Default)]
pub struct ActionDispatcher {
    callback_map: HashMap<ActionKind, Vec<(CallbackId, ActionCallback)>>,
    next_id: CallbackId,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for a specific action kind.
    ///
    /// Returns a [`CallbackId`] that can be used to unregister the callback.
    pub fn register<F>(&mut self, kind: ActionKind, callback: F) -> CallbackId
    where
        F: for<'c> Fn(&Action, &mut ActionContext<'c>) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;

        self.callback_map
            .entry(kind)
            .or_default()
            .push((id, Box::new(callback)));

        id
    }

    /// Unregisters a callback by its ID.
    ///
    /// Returns `true` if the callback was found and removed, `false` otherwise.
    pub fn unregister(&mut self, id: CallbackId) -> bool {
        for callbacks in self.callback_map.values_mut() {
            if let Some(pos) = callbacks.iter().position(|(cid, _)| *cid == id) {
                let _ = callbacks.remove(pos);
                return true;
            }
        }
        false
    }

    /// Number of callbacks registered for a kind.
    pub fn callback_count(&self, kind: ActionKind) -> usize {
        self.callback_map.get(&kind).map_or(0, Vec::len)
    }

    /// Invokes every callback registered for the action's kind and returns how
    /// many ran. An action nobody listens to is silently dropped.
    pub fn trigger(&self, action: &Action, ctx: &mut ActionContext<'_>) -> usize {
        let Some(callbacks) = self.callback_map.get(&action.kind()).filter(|c| !c.is_empty()) else {
            log::trace!("no handler for action '{}'", action);
            return 0;
        };

        for (_id, callback) in callbacks {
            callback(action, ctx);
        }
        callbacks.len()
    }
}
