use std::ops::Not;

use glam::Vec3;
use serde::{Deserialize, Serialize};

//
// ──────────────────────────────────────────────────────────────
//   Host services
//
//   Everything the rig needs from the engine is behind one of
//   these traits, so the rig runs (and is tested) without one:
//     TargetSource     → follow-target transforms by handle
//     RaycastProvider  → ray / sphere casts against scene geometry
//     HeightProvider   → terrain height at (x, z)
// ──────────────────────────────────────────────────────────────
//

/// Identifies a scene object known to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl ObjectId
{
  /// Reserved for the rig's own marker; hosts must not hand it out.
  pub const MARKER: ObjectId = ObjectId(u64::MAX);
}

/// Handle to an object the rig can follow. It may outlive the object,
/// so it is re-validated through [`TargetSource`] before every use.
pub type TargetHandle = ObjectId;

/// Bitmask of the 32 physics layers a query is allowed to hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask
{
  pub const ALL: LayerMask = LayerMask(u32::MAX);
  pub const NONE: LayerMask = LayerMask(0);

  pub fn layer(index: u32) -> Self
  {
    LayerMask(1u32.checked_shl(index).unwrap_or(0))
  }

  pub fn contains(self, layer: u32) -> bool
  {
    self.0 & Self::layer(layer).0 != 0
  }
}

impl Not for LayerMask
{
  type Output = LayerMask;

  fn not(self) -> LayerMask
  {
    LayerMask(!self.0)
  }
}

impl Default for LayerMask
{
  fn default() -> Self
  {
    Self::ALL
  }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit
{
  pub point: Vec3,
  pub distance: f32,
  pub object: ObjectId,
}

pub trait RaycastProvider
{
  /// Nearest hit along `direction` (unit length) within `max_distance`.
  fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> Option<RayHit>;

  /// Nearest hit of a sphere of `radius` swept along `direction`.
  fn sphere_cast(
    &self,
    origin: Vec3,
    radius: f32,
    direction: Vec3,
    max_distance: f32,
    mask: LayerMask,
  ) -> Option<RayHit>;
}

/// Physics stand-in for hosts without collision geometry: every cast misses.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPhysics;

impl RaycastProvider for NoPhysics
{
  fn raycast(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32, _mask: LayerMask) -> Option<RayHit>
  {
    None
  }

  fn sphere_cast(
    &self,
    _origin: Vec3,
    _radius: f32,
    _direction: Vec3,
    _max_distance: f32,
    _mask: LayerMask,
  ) -> Option<RayHit>
  {
    None
  }
}

pub trait HeightProvider
{
  fn height_at(&self, x: f32, z: f32) -> f32;
}

impl<F> HeightProvider for F
where
  F: Fn(f32, f32) -> f32,
{
  fn height_at(&self, x: f32, z: f32) -> f32
  {
    self(x, z)
  }
}

/// World transform of a followed object, sampled for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetPose
{
  pub position: Vec3,
  /// Unit vector the object faces (+Z local axis).
  pub forward: Vec3,
}

impl TargetPose
{
  pub fn at(position: Vec3) -> Self
  {
    Self { position, forward: Vec3::Z }
  }
}

pub trait TargetSource
{
  /// `None` once the object behind `handle` has been destroyed.
  fn pose(&self, handle: TargetHandle) -> Option<TargetPose>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoTargets;

impl TargetSource for NoTargets
{
  fn pose(&self, _handle: TargetHandle) -> Option<TargetPose>
  {
    None
  }
}

/// Borrowed host services for a single rig update.
#[derive(Clone, Copy)]
pub struct Services<'a>
{
  pub targets: &'a dyn TargetSource,
  pub physics: &'a dyn RaycastProvider,
}

impl<'a> Services<'a>
{
  pub fn new(targets: &'a dyn TargetSource, physics: &'a dyn RaycastProvider) -> Self
  {
    Self { targets, physics }
  }

  /// No follow targets and no physics.
  pub fn none() -> Services<'static>
  {
    Services { targets: &NoTargets, physics: &NoPhysics }
  }
}
