pub use modeller_common as common;

pub mod geom_query;
mod node;
mod render;
mod tree;

use cgmath::{EuclideanSpace, Matrix4, Point3, SquareMatrix};

pub use geom_query::RayPickResult;
pub use node::{
    Node, NodeContent, NodeDescriptor, NodeId, NodeKind, PickState, Shape, ShapeParseError,
    SCALE_DOWN_FACTOR, SCALE_UP_FACTOR,
};
pub use render::{render_scene, DrawCommand, Frame, GROUND_COLOR_INDEX, SELECTION_EMISSION};
pub use tree::{walk_tree, TreeVisitor};

use crate::common::{Aabb, Ray, MAX_COLOR, MIN_COLOR};

/// Distance along the picking ray at which new primitives are placed.
pub const PLACE_DEPTH: f32 = 15.0;

/// The scene container: an arena of nodes, the ordered roots and the selection.
///
/// # Examples
///
/// ```
/// use modeller_scene::{NodeDescriptor, Scene};
/// use modeller_scene::common::Ray;
/// use cgmath::{Matrix4, Point3, SquareMatrix, Vector3};
///
/// let mut scene = Scene::new();
/// let cube = scene.add_node(NodeDescriptor::cube().with_translation(0.0, 0.0, -5.0));
///
/// let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0)).unwrap();
/// let hit = scene.pick(&ray, &Matrix4::identity()).unwrap();
/// assert_eq!(hit.node_id, cube);
/// assert_eq!(scene.selected_node(), Some(cube));
/// ```
#[derive(Debug, Default)]
pub struct Scene {
    pub(crate) nodes: Vec<Node>,
    root_nodes: Vec<NodeId>,
    selected: Option<NodeId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Tree ==========

    /// Adds a descriptor tree as a new root and returns the root's id.
    ///
    /// Ids are handed out depth-first, so a composite's id precedes its children's.
    pub fn add_node(&mut self, descriptor: NodeDescriptor) -> NodeId {
        let (id, _) = self.insert_descriptor(descriptor, None);
        self.root_nodes.push(id);
        log::debug!("added root node {} ({} nodes total)", id, self.nodes.len());
        id
    }

    /// Inserts a descriptor subtree, returning its id and its local bounds.
    fn insert_descriptor(&mut self, descriptor: NodeDescriptor, parent: Option<NodeId>) -> (NodeId, Aabb) {
        let id = self.nodes.len() as NodeId;
        let color_index = descriptor
            .color_index
            .unwrap_or_else(|| rand::random_range(MIN_COLOR..=MAX_COLOR));

        match descriptor.content {
            NodeContent::Primitive(shape) => {
                let mut node = Node::new(
                    id,
                    NodeKind::Primitive { shape },
                    parent,
                    descriptor.translation,
                    descriptor.scale,
                    color_index,
                );
                let bounds = descriptor.bounds.unwrap_or_default();
                node.set_bounds(bounds);
                self.nodes.push(node);
                (id, bounds)
            }
            NodeContent::Composite(children) => {
                // Reserve the slot first so children get larger ids
                self.nodes.push(Node::new(
                    id,
                    NodeKind::Composite { children: Vec::new() },
                    parent,
                    descriptor.translation,
                    descriptor.scale,
                    color_index,
                ));

                let mut child_ids = Vec::with_capacity(children.len());
                let mut aggregate: Option<Aabb> = None;
                for child in children {
                    let child_transform = child.local_transform();
                    let (child_id, child_bounds) = self.insert_descriptor(child, Some(id));
                    let placed = child_bounds.transform(&child_transform);
                    aggregate = Some(match aggregate {
                        Some(bounds) => bounds.merge(&placed),
                        None => placed,
                    });
                    child_ids.push(child_id);
                }

                let bounds = descriptor.bounds.or(aggregate).unwrap_or_default();
                let node = &mut self.nodes[id as usize];
                node.set_children(child_ids);
                node.set_bounds(bounds);
                (id, bounds)
            }
        }
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes
            .get_mut(id as usize)
            .expect("Node ID not found in scene")
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Root ids in insertion order, which is also draw order.
    pub fn root_nodes(&self) -> &[NodeId] {
        &self.root_nodes
    }

    /// Computes the world transform of a node (ancestors' transforms and its own
    /// translation and scale, without any view transform).
    pub fn nodes_transform(&self, id: NodeId) -> Matrix4<f32> {
        let Some(node) = self.get_node(id) else {
            return Matrix4::identity();
        };
        let local = node.compute_local_transform();
        match node.parent() {
            Some(parent_id) => self.nodes_transform(parent_id) * local,
            None => local,
        }
    }

    /// World-space bounding box of a node's subtree.
    pub fn nodes_bounding(&self, id: NodeId) -> Option<Aabb> {
        let node = self.get_node(id)?;
        Some(node.bounds().transform(&self.nodes_transform(id)))
    }

    /// World-space bounding box of the whole scene, `None` when it is empty.
    pub fn bounding(&self) -> Option<Aabb> {
        self.root_nodes
            .iter()
            .filter_map(|&id| self.nodes_bounding(id))
            .reduce(|a, b| a.merge(&b))
    }

    // ========== Rendering ==========

    /// Emits one draw command per primitive into `frame`, roots in insertion order.
    pub fn render<F: Frame>(&self, frame: &mut F, view: Matrix4<f32>) {
        render_scene(self, frame, view);
    }

    // ========== Selection ==========

    pub fn selected_node(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Node> {
        self.selected.and_then(|id| self.get_node(id))
    }

    /// Clears the current selection, if any.
    pub fn clear_selection(&mut self) {
        if let Some(previous) = self.selected.take() {
            self.node_mut(previous).deselect();
        }
    }

    /// Selects the root nearest along a view-space ray.
    ///
    /// The previous selection is always cleared first, so a miss leaves nothing
    /// selected.
    pub fn pick(&mut self, ray: &Ray, inverse_view: &Matrix4<f32>) -> Option<RayPickResult> {
        self.clear_selection();

        let result = geom_query::pick_closest_from_ray(self, ray, inverse_view);
        match &result {
            Some(hit) => {
                self.node_mut(hit.node_id).select(hit.distance, hit.hit_point);
                self.selected = Some(hit.node_id);
                log::debug!("picked node {} at depth {:.3}", hit.node_id, hit.distance);
            }
            None => log::debug!("pick missed every node"),
        }
        result
    }

    // ========== Editing ==========

    /// Drags the selection so that it stays under a new view-space ray at its
    /// pick depth. Returns false when nothing is selected.
    pub fn move_selected(&mut self, ray: &Ray, inverse_view: &Matrix4<f32>) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        let node = self.node_mut(id);
        let Some(state) = node.pick_state() else {
            return false;
        };

        let new_location = ray.point_at(state.depth);
        let view_delta = new_location - state.hit_point;
        let world_delta = (inverse_view * view_delta.extend(0.0)).truncate();

        node.translate(world_delta);
        node.set_hit_point(new_location);
        true
    }

    /// Adds a primitive with a random palette colour at [`PLACE_DEPTH`] along a
    /// view-space ray.
    pub fn place(&mut self, shape: Shape, ray: &Ray, inverse_view: &Matrix4<f32>) -> NodeId {
        let view_point = ray.point_at(PLACE_DEPTH);
        let world_point = Point3::from_homogeneous(inverse_view * view_point.to_homogeneous());
        let translation = world_point.to_vec();

        let id = self.add_node(
            NodeDescriptor::primitive(shape).with_translation(translation.x, translation.y, translation.z),
        );
        log::info!(
            "placed {} {} at ({:.2}, {:.2}, {:.2})",
            shape,
            id,
            translation.x,
            translation.y,
            translation.z
        );
        id
    }

    /// Cycles the selection's colour. Returns false when nothing is selected.
    pub fn rotate_selected_color(&mut self, forward: bool) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        self.node_mut(id).rotate_color(forward);
        true
    }

    /// Grows or shrinks the selection by one step. Returns false when nothing
    /// is selected.
    pub fn scale_selected(&mut self, up: bool) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        self.node_mut(id).scale(up);
        true
    }
}

#[cfg(test)]
mod scene_tests;
