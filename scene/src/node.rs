use std::fmt;
use std::str::FromStr;

use cgmath::{Matrix4, Point3, SquareMatrix, Vector3};
use thiserror::Error;

use crate::common::{step_color_index, Aabb, MAX_COLOR, MIN_COLOR};

/// Unique identifier for a Node in the scene arena.
pub type NodeId = u32;

/// Factor applied to a node's scale by one "scale up" step.
pub const SCALE_UP_FACTOR: f32 = 1.1;
/// Factor applied to a node's scale by one "scale down" step.
pub const SCALE_DOWN_FACTOR: f32 = 0.9;

/// Shared renderable shapes a primitive can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Plane,
    Sphere,
    Cube,
}

impl Shape {
    /// Stable lowercase name, as used by the `place` action.
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Plane => "plane",
            Shape::Sphere => "sphere",
            Shape::Cube => "cube",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown shape '{0}'")]
pub struct ShapeParseError(pub String);

impl FromStr for Shape {
    type Err = ShapeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plane" => Ok(Shape::Plane),
            "sphere" => Ok(Shape::Sphere),
            "cube" => Ok(Shape::Cube),
            _ => Err(ShapeParseError(s.to_string())),
        }
    }
}

/// What a node is: a drawable leaf or a container of other nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Primitive { shape: Shape },
    Composite { children: Vec<NodeId> },
}

/// Where the picking ray struck a selected node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickState {
    /// Distance along the picking ray.
    pub depth: f32,
    /// Hit location in the picking ray's space.
    pub hit_point: Point3<f32>,
}

/// A node in the scene tree.
///
/// Nodes only exist inside a [`crate::Scene`] arena; build them with a
/// [`NodeDescriptor`].
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    kind: NodeKind,
    parent: Option<NodeId>,

    translation: Matrix4<f32>,
    scaling: Matrix4<f32>,
    bounds: Aabb,
    color_index: usize,

    // Some while selected
    pick_state: Option<PickState>,
}

impl Node {
    pub(crate) fn new(
        id: NodeId,
        kind: NodeKind,
        parent: Option<NodeId>,
        translation: Vector3<f32>,
        scale: Vector3<f32>,
        color_index: usize,
    ) -> Self {
        Self {
            id,
            kind,
            parent,
            translation: Matrix4::from_translation(translation),
            scaling: Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z),
            bounds: Aabb::default(),
            color_index: color_index.clamp(MIN_COLOR, MAX_COLOR),
            pick_state: None,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The shape of a primitive, `None` for composites.
    pub fn shape(&self) -> Option<Shape> {
        match self.kind {
            NodeKind::Primitive { shape } => Some(shape),
            NodeKind::Composite { .. } => None,
        }
    }

    /// Gets the list of child node IDs (always empty for primitives).
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Primitive { .. } => &[],
            NodeKind::Composite { children } => children,
        }
    }

    pub(crate) fn set_children(&mut self, children: Vec<NodeId>) {
        debug_assert!(matches!(self.kind, NodeKind::Composite { .. }));
        self.kind = NodeKind::Composite { children };
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    // ========== Transform ==========

    pub fn translation(&self) -> Matrix4<f32> {
        self.translation
    }

    pub fn scaling(&self) -> Matrix4<f32> {
        self.scaling
    }

    /// Translation followed by scale, relative to the parent.
    pub fn compute_local_transform(&self) -> Matrix4<f32> {
        self.translation * self.scaling
    }

    /// Position of the node's origin in its parent's frame.
    pub fn position(&self) -> Point3<f32> {
        let column = self.translation.w;
        Point3::new(column.x, column.y, column.z)
    }

    /// Translates the node by the given offset, expressed in its parent's frame.
    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.translation = self.translation * Matrix4::from_translation(offset);
    }

    /// Applies one uniform scale step: grows when `up`, shrinks otherwise.
    pub fn scale(&mut self, up: bool) {
        let factor = if up { SCALE_UP_FACTOR } else { SCALE_DOWN_FACTOR };
        self.scaling = self.scaling * Matrix4::from_scale(factor);
    }

    /// Uniform scale factor along x. Every scaling path keeps scale uniform
    /// except descriptors whose `scale` field is set non-uniformly.
    pub fn scale_factor(&self) -> f32 {
        self.scaling.x.x
    }

    /// Whether the local transform can be inverted (no axis scaled to zero).
    pub fn is_invertible(&self) -> bool {
        self.compute_local_transform().invert().is_some()
    }

    // ========== Bounds ==========

    /// Bounding box in the node's local space.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub(crate) fn set_bounds(&mut self, bounds: Aabb) {
        self.bounds = bounds;
    }

    // ========== Colour ==========

    pub fn color_index(&self) -> usize {
        self.color_index
    }

    pub fn set_color_index(&mut self, index: usize) {
        self.color_index = index.clamp(MIN_COLOR, MAX_COLOR);
    }

    /// Cycles the palette index, wrapping at either end.
    pub fn rotate_color(&mut self, forward: bool) {
        self.color_index = step_color_index(self.color_index, forward);
    }

    // ========== Selection ==========

    pub fn is_selected(&self) -> bool {
        self.pick_state.is_some()
    }

    pub fn pick_state(&self) -> Option<PickState> {
        self.pick_state
    }

    /// Distance from the camera at pick time; only meaningful while selected.
    pub fn depth(&self) -> Option<f32> {
        self.pick_state.map(|state| state.depth)
    }

    /// Where the picking ray struck; only meaningful while selected.
    pub fn hit_point(&self) -> Option<Point3<f32>> {
        self.pick_state.map(|state| state.hit_point)
    }

    pub(crate) fn select(&mut self, depth: f32, hit_point: Point3<f32>) {
        self.pick_state = Some(PickState { depth, hit_point });
    }

    pub(crate) fn deselect(&mut self) {
        self.pick_state = None;
    }

    pub(crate) fn set_hit_point(&mut self, hit_point: Point3<f32>) {
        if let Some(state) = self.pick_state.as_mut() {
            state.hit_point = hit_point;
        }
    }
}

/// Owned description of a node subtree, consumed by [`crate::Scene::add_node`].
///
/// Children can only be supplied here, as values, so a node can never end up
/// as its own ancestor.
#[derive(Debug, Clone)]
pub struct NodeDescriptor {
    pub content: NodeContent,
    pub translation: Vector3<f32>,
    pub scale: Vector3<f32>,
    /// `None` picks a random palette colour on insertion.
    pub color_index: Option<usize>,
    /// `None` uses the unit box for primitives and the children's aggregate for composites.
    pub bounds: Option<Aabb>,
}

#[derive(Debug, Clone)]
pub enum NodeContent {
    Primitive(Shape),
    Composite(Vec<NodeDescriptor>),
}

impl NodeDescriptor {
    fn with_content(content: NodeContent) -> Self {
        Self {
            content,
            translation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            color_index: None,
            bounds: None,
        }
    }

    pub fn primitive(shape: Shape) -> Self {
        Self::with_content(NodeContent::Primitive(shape))
    }

    pub fn sphere() -> Self {
        Self::primitive(Shape::Sphere)
    }

    pub fn cube() -> Self {
        Self::primitive(Shape::Cube)
    }

    pub fn composite(children: Vec<NodeDescriptor>) -> Self {
        Self::with_content(NodeContent::Composite(children))
    }

    /// Three stacked spheres shrinking towards the top.
    pub fn snow_figure() -> Self {
        Self::composite(vec![
            Self::sphere().with_translation(0.0, -0.6, 0.0).with_color_index(MIN_COLOR),
            Self::sphere()
                .with_translation(0.0, 0.1, 0.0)
                .with_uniform_scale(0.8)
                .with_color_index(MIN_COLOR),
            Self::sphere()
                .with_translation(0.0, 0.75, 0.0)
                .with_uniform_scale(0.7)
                .with_color_index(MIN_COLOR),
        ])
    }

    pub fn with_translation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.translation = Vector3::new(x, y, z);
        self
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vector3::new(scale, scale, scale);
        self
    }

    pub fn with_color_index(mut self, index: usize) -> Self {
        self.color_index = Some(index);
        self
    }

    pub fn with_bounds(mut self, bounds: Aabb) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Local transform the described node will have.
    pub fn local_transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}
