use super::*;
use crate::common::EPSILON;
use cgmath::{Matrix4, Point3, SquareMatrix, Vector3};

fn ray(origin: [f32; 3], direction: [f32; 3]) -> Ray {
    Ray::new(Point3::from(origin), Vector3::from(direction)).unwrap()
}

fn forward_ray() -> Ray {
    ray([0.0, 0.0, 0.0], [0.0, 0.0, -1.0])
}

fn selected_count(scene: &Scene) -> usize {
    scene.nodes().iter().filter(|n| n.is_selected()).count()
}

// ========================================================================
// Scene Creation and Tree Construction
// ========================================================================

#[test]
fn test_scene_new() {
    let scene = Scene::new();

    assert!(scene.nodes().is_empty());
    assert!(scene.root_nodes().is_empty());
    assert_eq!(scene.selected_node(), None);
    assert_eq!(scene.bounding(), None);
}

#[test]
fn test_add_root_node() {
    let mut scene = Scene::new();

    let node_id = scene.add_node(NodeDescriptor::cube().with_color_index(4));

    assert_eq!(node_id, 0);
    assert_eq!(scene.nodes().len(), 1);
    assert_eq!(scene.root_nodes(), &[node_id]);

    let node = scene.get_node(node_id).unwrap();
    assert_eq!(node.parent(), None);
    assert_eq!(node.shape(), Some(Shape::Cube));
    assert_eq!(node.color_index(), 4);
}

#[test]
fn test_add_node_random_color_in_palette() {
    let mut scene = Scene::new();
    for _ in 0..32 {
        let id = scene.add_node(NodeDescriptor::sphere());
        let index = scene.get_node(id).unwrap().color_index();
        assert!((MIN_COLOR..=MAX_COLOR).contains(&index));
    }
}

#[test]
fn test_add_composite_links_children() {
    let mut scene = Scene::new();

    let root = scene.add_node(NodeDescriptor::snow_figure());

    assert_eq!(scene.root_nodes(), &[root]);
    assert_eq!(scene.nodes().len(), 4);

    let children = scene.get_node(root).unwrap().children().to_vec();
    assert_eq!(children, vec![1, 2, 3]);
    for child in children {
        let node = scene.get_node(child).unwrap();
        assert_eq!(node.parent(), Some(root));
        assert_eq!(node.color_index(), MIN_COLOR);
        assert_eq!(node.shape(), Some(Shape::Sphere));
    }
}

#[test]
fn test_composite_bounds_aggregate_children() {
    let mut scene = Scene::new();
    let root = scene.add_node(NodeDescriptor::snow_figure());

    let bounds = scene.get_node(root).unwrap().bounds();
    assert!((bounds.min.y - -1.1).abs() < 1e-5);
    assert!((bounds.max.y - 1.1).abs() < 1e-5);
    assert!((bounds.min.x - -0.5).abs() < 1e-5);
    assert!((bounds.max.z - 0.5).abs() < 1e-5);
}

#[test]
fn test_explicit_bounds_override_aggregate() {
    let mut scene = Scene::new();
    let bounds = Aabb::new(Point3::new(-2.0, -2.0, -2.0), Point3::new(2.0, 2.0, 2.0));
    let root = scene.add_node(NodeDescriptor::composite(vec![NodeDescriptor::cube()]).with_bounds(bounds));

    assert_eq!(scene.get_node(root).unwrap().bounds(), bounds);
}

#[test]
fn test_empty_composite_gets_default_bounds() {
    let mut scene = Scene::new();
    let root = scene.add_node(NodeDescriptor::composite(Vec::new()));

    let node = scene.get_node(root).unwrap();
    assert!(node.children().is_empty());
    assert_eq!(node.bounds(), Aabb::default());
}

#[test]
fn test_nodes_transform_composes_parent_to_child() {
    let mut scene = Scene::new();
    let root = scene.add_node(
        NodeDescriptor::composite(vec![NodeDescriptor::cube().with_translation(0.0, 1.0, 0.0)])
            .with_translation(5.0, 0.0, 0.0)
            .with_uniform_scale(2.0),
    );
    let child = scene.get_node(root).unwrap().children()[0];

    let transform = scene.nodes_transform(child);
    let origin = Point3::from_homogeneous(transform * Point3::new(0.0, 0.0, 0.0).to_homogeneous());
    assert!((origin.x - 5.0).abs() < EPSILON);
    assert!((origin.y - 2.0).abs() < EPSILON);
}

#[test]
fn test_scene_bounding() {
    let mut scene = Scene::new();
    scene.add_node(NodeDescriptor::cube().with_translation(2.0, 0.0, 2.0));
    scene.add_node(NodeDescriptor::sphere().with_translation(-2.0, 0.0, -2.0));

    let bounds = scene.bounding().unwrap();
    assert_eq!(bounds.min, Point3::new(-2.5, -0.5, -2.5));
    assert_eq!(bounds.max, Point3::new(2.5, 0.5, 2.5));
}

// ========================================================================
// Picking
// ========================================================================

#[test]
fn test_pick_single_box_records_depth() {
    let mut scene = Scene::new();
    let id = scene.add_node(NodeDescriptor::cube().with_translation(0.0, 0.0, -5.0));

    let hit = scene.pick(&forward_ray(), &Matrix4::identity()).unwrap();

    assert_eq!(hit.node_id, id);
    assert!((hit.distance - 4.5).abs() < EPSILON);
    assert_eq!(scene.selected_node(), Some(id));

    let node = scene.get_node(id).unwrap();
    assert!(node.is_selected());
    assert!((node.depth().unwrap() - 4.5).abs() < EPSILON);
    let hit_point = node.hit_point().unwrap();
    assert!((hit_point.z - -4.5).abs() < EPSILON);
}

#[test]
fn test_pick_overlapping_boxes_nearest_wins() {
    let mut scene = Scene::new();
    // Far box first so insertion order cannot decide
    let far = scene.add_node(NodeDescriptor::cube().with_translation(0.0, 0.0, -5.5));
    let near = scene.add_node(NodeDescriptor::cube().with_translation(0.0, 0.0, -2.5));

    let hit = scene.pick(&forward_ray(), &Matrix4::identity()).unwrap();

    assert_eq!(hit.node_id, near);
    assert!((hit.distance - 2.0).abs() < EPSILON);
    assert!(!scene.get_node(far).unwrap().is_selected());
    assert_eq!(selected_count(&scene), 1);
}

#[test]
fn test_pick_miss_clears_previous_selection() {
    let mut scene = Scene::new();
    let id = scene.add_node(NodeDescriptor::cube().with_translation(0.0, 0.0, -5.0));
    scene.pick(&forward_ray(), &Matrix4::identity()).unwrap();
    assert_eq!(scene.selected_node(), Some(id));

    let miss = ray([10.0, 10.0, 0.0], [0.0, 0.0, -1.0]);
    assert!(scene.pick(&miss, &Matrix4::identity()).is_none());

    assert_eq!(scene.selected_node(), None);
    assert_eq!(selected_count(&scene), 0);
    assert_eq!(scene.get_node(id).unwrap().depth(), None);
}

#[test]
fn test_pick_empty_scene() {
    let mut scene = Scene::new();
    assert!(scene.pick(&forward_ray(), &Matrix4::identity()).is_none());
    assert_eq!(scene.selected_node(), None);
}

#[test]
fn test_pick_at_most_one_selected() {
    let mut scene = Scene::new();
    for i in 0..5 {
        scene.add_node(NodeDescriptor::cube().with_translation(i as f32 * 0.2, 0.0, -3.0 - i as f32));
    }

    let rays = [
        forward_ray(),
        ray([0.8, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ray([40.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ray([0.4, 0.1, 0.0], [0.0, 0.0, -1.0]),
    ];
    for r in rays {
        scene.pick(&r, &Matrix4::identity());
        assert!(selected_count(&scene) <= 1);
        assert_eq!(selected_count(&scene) == 1, scene.selected_node().is_some());
    }
}

#[test]
fn test_pick_composite_reports_nearest_child() {
    let mut scene = Scene::new();
    let figure = scene.add_node(NodeDescriptor::snow_figure().with_translation(0.0, 0.0, -5.0));

    // Straight down through the top of the figure hits the head sphere first
    let down = ray([0.0, 10.0, -5.0], [0.0, -1.0, 0.0]);
    let hit = scene.pick(&down, &Matrix4::identity()).unwrap();

    assert_eq!(hit.node_id, figure);
    // Head spans y in [0.4, 1.1]
    assert!((hit.distance - 8.9).abs() < 1e-4);
}

#[test]
fn test_pick_composite_gap_between_children_misses() {
    let mut scene = Scene::new();
    scene.add_node(
        NodeDescriptor::composite(vec![
            NodeDescriptor::cube().with_translation(-2.0, 0.0, 0.0),
            NodeDescriptor::cube().with_translation(2.0, 0.0, 0.0),
        ])
        .with_translation(0.0, 0.0, -5.0),
    );

    // The aggregate box spans the gap, but no child does
    assert!(scene.pick(&forward_ray(), &Matrix4::identity()).is_none());
}

#[test]
fn test_pick_from_inside_box_is_a_miss() {
    let mut scene = Scene::new();
    scene.add_node(NodeDescriptor::cube().with_uniform_scale(4.0));

    assert!(scene.pick(&forward_ray(), &Matrix4::identity()).is_none());
}

#[test]
fn test_pick_uses_inverse_view() {
    let mut scene = Scene::new();
    let id = scene.add_node(NodeDescriptor::cube());

    // Eye sitting 10 units back along +z
    let view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -10.0));
    let inverse_view = view.invert().unwrap();
    let hit = scene.pick(&forward_ray(), &inverse_view).unwrap();

    assert_eq!(hit.node_id, id);
    assert!((hit.distance - 9.5).abs() < EPSILON);
    // Hit point stays in view space
    assert!((hit.hit_point.z - -9.5).abs() < EPSILON);
}

// ========================================================================
// Editing
// ========================================================================

#[test]
fn test_move_selected_keeps_depth() {
    let mut scene = Scene::new();
    let id = scene.add_node(NodeDescriptor::cube().with_translation(0.0, 0.0, -5.0));
    scene.pick(&forward_ray(), &Matrix4::identity()).unwrap();

    let moved_ray = ray([0.0, 0.0, 0.0], [1.0, 0.0, -4.5]);
    assert!(scene.move_selected(&moved_ray, &Matrix4::identity()));

    let node = scene.get_node(id).unwrap();
    let expected = moved_ray.point_at(4.5);
    let hit_point = node.hit_point().unwrap();
    assert!((hit_point - expected).x.abs() < EPSILON);
    assert!((node.depth().unwrap() - 4.5).abs() < EPSILON);

    // The node moved by the same delta as the hit point
    let position = node.position();
    assert!((position.x - expected.x).abs() < 1e-5);
    assert!((position.z - (-5.0 + expected.z + 4.5)).abs() < 1e-5);
}

#[test]
fn test_move_selected_delta_uses_inverse_view_direction() {
    let mut scene = Scene::new();
    let id = scene.add_node(NodeDescriptor::cube().with_translation(0.0, 0.0, -5.0));

    // View rotated a quarter turn about y; the node sits straight ahead in world
    let view = Matrix4::from_angle_y(cgmath::Deg(90.0));
    let inverse_view = view.invert().unwrap();
    let view_ray = forward_ray().transform(&view);
    let view_ray = Ray::new(view_ray.origin, view_ray.direction).unwrap();
    scene.pick(&view_ray, &inverse_view).unwrap();

    let start = scene.get_node(id).unwrap().hit_point().unwrap();
    let shifted = Ray::new(view_ray.origin, view_ray.direction + Vector3::new(0.0, 0.1, 0.0)).unwrap();
    scene.move_selected(&shifted, &inverse_view);

    let end = scene.get_node(id).unwrap().hit_point().unwrap();
    let world_delta = (inverse_view * (end - start).extend(0.0)).truncate();
    let position = scene.get_node(id).unwrap().position();
    assert!((position.x - world_delta.x).abs() < 1e-5);
    assert!((position.y - world_delta.y).abs() < 1e-5);
    assert!((position.z - (-5.0 + world_delta.z)).abs() < 1e-5);
}

#[test]
fn test_move_without_selection_is_noop() {
    let mut scene = Scene::new();
    let id = scene.add_node(NodeDescriptor::cube().with_translation(0.0, 0.0, -5.0));

    assert!(!scene.move_selected(&forward_ray(), &Matrix4::identity()));
    assert_eq!(scene.get_node(id).unwrap().position(), Point3::new(0.0, 0.0, -5.0));
}

#[test]
fn test_place_at_place_depth() {
    let mut scene = Scene::new();

    let id = scene.place(Shape::Sphere, &ray([0.0, 0.0, 0.0], [0.0, 0.6, -0.8]), &Matrix4::identity());

    let node = scene.get_node(id).unwrap();
    assert_eq!(scene.root_nodes(), &[id]);
    assert_eq!(node.shape(), Some(Shape::Sphere));
    assert!((node.position().y - 9.0).abs() < 1e-5);
    assert!((node.position().z - -12.0).abs() < 1e-5);
    assert!((MIN_COLOR..=MAX_COLOR).contains(&node.color_index()));
    assert!(!node.is_selected());
}

#[test]
fn test_place_maps_through_inverse_view() {
    let mut scene = Scene::new();
    let inverse_view = Matrix4::from_translation(Vector3::new(0.0, 0.0, 15.0));

    let id = scene.place(Shape::Cube, &forward_ray(), &inverse_view);

    let position = scene.get_node(id).unwrap().position();
    assert!(position.z.abs() < 1e-5);
}

#[test]
fn test_placed_node_is_pickable() {
    let mut scene = Scene::new();
    let id = scene.place(Shape::Cube, &forward_ray(), &Matrix4::identity());

    let hit = scene.pick(&forward_ray(), &Matrix4::identity()).unwrap();
    assert_eq!(hit.node_id, id);
    assert!((hit.distance - (PLACE_DEPTH - 0.5)).abs() < 1e-5);
}

#[test]
fn test_rotate_selected_color_wraps() {
    let mut scene = Scene::new();
    let id = scene.add_node(
        NodeDescriptor::cube()
            .with_translation(0.0, 0.0, -5.0)
            .with_color_index(MAX_COLOR),
    );
    assert!(!scene.rotate_selected_color(true));

    scene.pick(&forward_ray(), &Matrix4::identity()).unwrap();
    assert!(scene.rotate_selected_color(true));
    assert_eq!(scene.get_node(id).unwrap().color_index(), MIN_COLOR);

    assert!(scene.rotate_selected_color(false));
    assert!(scene.rotate_selected_color(false));
    assert_eq!(scene.get_node(id).unwrap().color_index(), MAX_COLOR - 1);
}

#[test]
fn test_scale_selected_steps() {
    let mut scene = Scene::new();
    let id = scene.add_node(NodeDescriptor::cube().with_translation(0.0, 0.0, -5.0));
    assert!(!scene.scale_selected(true));

    scene.pick(&forward_ray(), &Matrix4::identity()).unwrap();
    assert!(scene.scale_selected(true));
    assert!((scene.get_node(id).unwrap().scale_factor() - SCALE_UP_FACTOR).abs() < EPSILON);

    assert!(scene.scale_selected(false));
    let expected = SCALE_UP_FACTOR * SCALE_DOWN_FACTOR;
    assert!((scene.get_node(id).unwrap().scale_factor() - expected).abs() < 1e-5);
}

#[test]
fn test_scaled_node_picks_closer() {
    let mut scene = Scene::new();
    scene.add_node(NodeDescriptor::cube().with_translation(0.0, 0.0, -5.0));
    scene.pick(&forward_ray(), &Matrix4::identity()).unwrap();
    scene.scale_selected(true);

    let hit = scene.pick(&forward_ray(), &Matrix4::identity()).unwrap();
    assert!((hit.distance - (5.0 - 0.55)).abs() < 1e-5);
}

#[test]
fn test_render_through_scene() {
    let mut scene = Scene::new();
    scene.add_node(NodeDescriptor::snow_figure());
    scene.add_node(NodeDescriptor::cube());

    let mut frame: Vec<DrawCommand> = Vec::new();
    scene.render(&mut frame, Matrix4::identity());

    assert_eq!(frame.len(), 4);
}
