use glam::Vec3;
use tiltcam_core::{LayerMask, ObjectId, RayHit, RaycastProvider, TargetHandle, TargetPose, TargetSource};

//
// ──────────────────────────────────────────────────────────────
//   Demo scene
//
//   Rolling procedural terrain, a ring of pillars, and one cart
//   driving a circle through them. Stands in for the physics and
//   scene services of a real engine.
// ──────────────────────────────────────────────────────────────
//

pub const CART: TargetHandle = ObjectId(1);

const TERRAIN_LAYER: u32 = 0;
const PILLAR_LAYER: u32 = 1;

const MAP_CENTRE: Vec3 = Vec3::new(50.0, 0.0, 50.0);
const CART_ORBIT_RADIUS: f32 = 25.0;
const CART_SPEED: f32 = 0.3; // radians per second
const PILLAR_COUNT: usize = 8;
const PILLAR_RADIUS: f32 = 2.0;

struct Pillar
{
  id: ObjectId,
  centre: Vec3,
  radius: f32,
}

pub struct DemoScene
{
  cart_angle: f32,
  pillars: Vec<Pillar>,
}

impl DemoScene
{
  pub fn new() -> Self
  {
    let pillars = (0..PILLAR_COUNT)
      .map(|i| {
        let a = i as f32 / PILLAR_COUNT as f32 * std::f32::consts::TAU;
        let x = MAP_CENTRE.x + (CART_ORBIT_RADIUS + 4.0) * a.cos();
        let z = MAP_CENTRE.z + (CART_ORBIT_RADIUS + 4.0) * a.sin();
        Pillar { id: ObjectId(100 + i as u64), centre: Vec3::new(x, terrain_height(x, z) + 4.0, z), radius: PILLAR_RADIUS }
      })
      .collect();

    Self { cart_angle: 0.0, pillars }
  }

  pub fn centre(&self) -> Vec3
  {
    MAP_CENTRE
  }

  /// Moves scene objects by one frame of game time.
  pub fn advance(&mut self, dt: f32)
  {
    self.cart_angle = (self.cart_angle + CART_SPEED * dt).rem_euclid(std::f32::consts::TAU);
  }

  fn cart_pose(&self) -> TargetPose
  {
    let (sin, cos) = self.cart_angle.sin_cos();
    let x = MAP_CENTRE.x + CART_ORBIT_RADIUS * cos;
    let z = MAP_CENTRE.z + CART_ORBIT_RADIUS * sin;

    // Counter-clockwise tangent in the XZ plane
    let forward = Vec3::new(-sin, 0.0, cos);

    TargetPose { position: Vec3::new(x, terrain_height(x, z), z), forward }
  }
}

impl TargetSource for DemoScene
{
  fn pose(&self, handle: TargetHandle) -> Option<TargetPose>
  {
    (handle == CART).then(|| self.cart_pose())
  }
}

impl RaycastProvider for DemoScene
{
  /// Only straight-down rays hit the terrain; everything else misses.
  fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> Option<RayHit>
  {
    if !mask.contains(TERRAIN_LAYER) || direction.y > -0.999
    {
      return None;
    }

    let ground = terrain_height(origin.x, origin.z);
    let distance = origin.y - ground;
    if distance < 0.0 || distance > max_distance
    {
      return None;
    }

    Some(RayHit { point: Vec3::new(origin.x, ground, origin.z), distance, object: ObjectId(0) })
  }

  fn sphere_cast(
    &self,
    origin: Vec3,
    radius: f32,
    direction: Vec3,
    max_distance: f32,
    mask: LayerMask,
  ) -> Option<RayHit>
  {
    if !mask.contains(PILLAR_LAYER)
    {
      return None;
    }

    self
      .pillars
      .iter()
      .filter_map(|p| {
        let t = ray_sphere(origin, direction, p.centre, p.radius + radius)?;
        (t <= max_distance).then(|| RayHit { point: origin + direction * t, distance: t, object: p.id })
      })
      .min_by(|a, b| a.distance.total_cmp(&b.distance))
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Geometry helpers
// ──────────────────────────────────────────────────────────────
//

pub fn terrain_height(x: f32, z: f32) -> f32
{
  2.0 + (x * 0.1).sin() * 1.5 + (z * 0.07).cos()
}

/// Distance along a unit ray to the first entry into a sphere. Rays that
/// start inside the sphere do not hit it.
fn ray_sphere(origin: Vec3, direction: Vec3, centre: Vec3, radius: f32) -> Option<f32>
{
  let oc = origin - centre;
  let b = oc.dot(direction);
  let c = oc.length_squared() - radius * radius;

  if c < 0.0
  {
    return None;
  }

  let disc = b * b - c;
  if disc < 0.0
  {
    return None;
  }

  let t = -b - disc.sqrt();
  (t >= 0.0).then_some(t)
}
