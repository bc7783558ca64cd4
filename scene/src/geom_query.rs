mod ray_picking;

pub use ray_picking::{pick_closest_from_ray, pick_node_from_ray, RayPickResult};
