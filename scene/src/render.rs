use cgmath::{Matrix4, SquareMatrix};

use crate::common::{palette_color, RgbaColor};
use crate::tree::{walk_tree, TreeVisitor};
use crate::{Node, NodeId, NodeKind, Scene, Shape};

/// Ambient emission applied to every primitive below a selected node.
pub const SELECTION_EMISSION: RgbaColor = RgbaColor::grey(0.3);

/// One primitive draw, fully resolved for the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// `None` for scene furniture that is not a node, like the ground plane.
    pub node_id: Option<NodeId>,
    pub shape: Shape,
    /// Parent transform followed by the node's translation.
    pub world_transform: Matrix4<f32>,
    pub scaling: Matrix4<f32>,
    /// `world_transform * scaling`.
    pub model: Matrix4<f32>,
    pub color: RgbaColor,
    pub color_index: usize,
    pub selected: bool,
    /// `RgbaColor::NONE` unless the node or one of its ancestors is selected.
    pub emission: RgbaColor,
    /// Whether the renderer should apply lighting.
    pub lit: bool,
}

/// Palette slot the ground plane is drawn with.
pub const GROUND_COLOR_INDEX: usize = 7;

impl DrawCommand {
    /// The unlit ground plane drawn under the view transform.
    pub fn ground_plane(view: Matrix4<f32>) -> Self {
        Self {
            node_id: None,
            shape: Shape::Plane,
            world_transform: view,
            scaling: Matrix4::identity(),
            model: view,
            color: palette_color(GROUND_COLOR_INDEX),
            color_index: GROUND_COLOR_INDEX,
            selected: false,
            emission: RgbaColor::NONE,
            lit: false,
        }
    }
}

/// Receives draw commands from a scene traversal.
pub trait Frame {
    fn draw(&mut self, command: DrawCommand);
}

impl Frame for Vec<DrawCommand> {
    fn draw(&mut self, command: DrawCommand) {
        self.push(command);
    }
}

/// Walks the tree keeping a stack of model matrices and emissions, so a
/// selected composite lights up all of its children but none of its siblings.
struct RenderVisitor<'a, F: Frame> {
    frame: &'a mut F,
    transform_stack: Vec<Matrix4<f32>>,
    emission_stack: Vec<RgbaColor>,
}

impl<'a, F: Frame> RenderVisitor<'a, F> {
    fn new(frame: &'a mut F, view: Matrix4<f32>) -> Self {
        Self {
            frame,
            transform_stack: vec![view],
            emission_stack: vec![RgbaColor::NONE],
        }
    }
}

impl<F: Frame> TreeVisitor for RenderVisitor<'_, F> {
    fn enter_node(&mut self, node: &Node) -> bool {
        let parent = *self.transform_stack.last().expect("transform stack holds the view");
        let inherited = *self.emission_stack.last().expect("emission stack holds a base value");

        let world_transform = parent * node.translation();
        let model = world_transform * node.scaling();
        let emission = if node.is_selected() { SELECTION_EMISSION } else { inherited };

        if let NodeKind::Primitive { shape } = node.kind() {
            self.frame.draw(DrawCommand {
                node_id: Some(node.id),
                shape: *shape,
                world_transform,
                scaling: node.scaling(),
                model,
                color: palette_color(node.color_index()),
                color_index: node.color_index(),
                selected: node.is_selected(),
                emission,
                lit: true,
            });
        }

        self.transform_stack.push(model);
        self.emission_stack.push(emission);
        true
    }

    fn exit_node(&mut self, _node: &Node) {
        self.transform_stack.pop();
        self.emission_stack.pop();
    }
}

/// Emits one draw command per primitive, visiting roots in insertion order.
/// `view` is the transform the whole scene is drawn under.
pub fn render_scene<F: Frame>(scene: &Scene, frame: &mut F, view: Matrix4<f32>) {
    let mut visitor = RenderVisitor::new(frame, view);
    for &root_id in scene.root_nodes() {
        walk_tree(scene, root_id, &mut visitor);
    }
}
