use cgmath::{Matrix4, Point3, SquareMatrix};

use crate::common::Ray;
use crate::{NodeId, NodeKind, Scene};

/// Result of a ray-node intersection test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayPickResult {
    /// The root node that was hit
    pub node_id: NodeId,
    /// Distance along the picking ray to the hit point
    pub distance: f32,
    /// Hit location in the picking ray's space
    pub hit_point: Point3<f32>,
}

/// Tests a ray against one node and its subtree.
///
/// The ray lives in view space; `inverse_view` maps it to world space before it
/// is carried into each primitive's local space. Returns the parametric distance
/// of the nearest hit.
pub fn pick_node_from_ray(
    scene: &Scene,
    node_id: NodeId,
    ray: &Ray,
    inverse_view: &Matrix4<f32>,
) -> Option<f32> {
    let world_ray = ray.transform(inverse_view);
    let parent = match scene.get_node(node_id).and_then(|node| node.parent()) {
        Some(parent_id) => scene.nodes_transform(parent_id),
        None => Matrix4::identity(),
    };
    pick_subtree(scene, node_id, &world_ray, &parent)
}

/// Picks the nearest root hit by the ray. On ties the root added first wins.
pub fn pick_closest_from_ray(scene: &Scene, ray: &Ray, inverse_view: &Matrix4<f32>) -> Option<RayPickResult> {
    let world_ray = ray.transform(inverse_view);
    let identity = Matrix4::identity();

    let mut closest: Option<(NodeId, f32)> = None;
    for &root_id in scene.root_nodes() {
        let Some(distance) = pick_subtree(scene, root_id, &world_ray, &identity) else {
            continue;
        };
        if closest.map_or(true, |(_, best)| distance < best) {
            closest = Some((root_id, distance));
        }
    }

    closest.map(|(node_id, distance)| RayPickResult {
        node_id,
        distance,
        hit_point: ray.point_at(distance),
    })
}

/// Recursively tests a world-space ray against a node. `parent` is the world
/// transform of the node's parent.
fn pick_subtree(scene: &Scene, node_id: NodeId, world_ray: &Ray, parent: &Matrix4<f32>) -> Option<f32> {
    let node = scene
        .get_node(node_id)
        .expect("Node ID not found in scene during picking");
    let model = parent * node.compute_local_transform();

    match node.kind() {
        NodeKind::Primitive { .. } => {
            let Some(world_to_local) = model.invert() else {
                log::warn!("node {} has a singular transform, skipping it for picking", node_id);
                return None;
            };
            node.bounds().intersects_ray(&world_ray.transform(&world_to_local))
        }
        NodeKind::Composite { children } => {
            let mut nearest: Option<f32> = None;
            for &child_id in children {
                if let Some(distance) = pick_subtree(scene, child_id, world_ray, &model) {
                    if nearest.map_or(true, |best| distance < best) {
                        nearest = Some(distance);
                    }
                }
            }
            nearest
        }
    }
}
