use glam::Vec3;

use crate::services::TargetHandle;

//
// ──────────────────────────────────────────────────────────────
//   Follow notifications
// ──────────────────────────────────────────────────────────────
//

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FollowEvent
{
  Began(TargetHandle),
  Ended(TargetHandle),
}

/// Receives begin/end follow transitions from a rig.
pub trait FollowObserver
{
  fn on_follow_event(&mut self, event: FollowEvent);
}

impl<F> FollowObserver for F
where
  F: FnMut(FollowEvent),
{
  fn on_follow_event(&mut self, event: FollowEvent)
  {
    self(event)
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Follow geometry
// ──────────────────────────────────────────────────────────────
//

/// Yaw (degrees) that puts the camera directly behind an object facing
/// `forward`, plus `offset`.
pub fn follow_behind_heading(forward: Vec3, offset: f32) -> f32
{
  let back = -forward;

  let angle = if back.length_squared() > 0.0 { Vec3::Z.angle_between(back).to_degrees() } else { 0.0 };
  let sign = if back.dot(Vec3::X) > 0.0 { 1.0 } else { -1.0 };

  180.0 + sign * angle + offset
}

/// Squared distance between two points projected onto the ground plane.
pub fn horizontal_distance_sq(a: Vec3, b: Vec3) -> f32
{
  let d = Vec3::new(a.x - b.x, 0.0, a.z - b.z);
  d.length_squared()
}
