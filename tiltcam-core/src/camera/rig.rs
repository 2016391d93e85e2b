use glam::{Quat, Vec3};
use log::{debug, trace, warn};

use super::follow::{follow_behind_heading, horizontal_distance_sq, FollowEvent, FollowObserver};
use super::pose::{CameraPose, Lens};
use super::smoothing::{exp_factor, lerp, lerp_angle, lerp_vec3};
use crate::config::RigConfig;
use crate::frame::FrameContext;
use crate::services::{HeightProvider, ObjectId, RaycastProvider, Services, TargetHandle, TargetPose, TargetSource};
use crate::startup::DeferredAction;

//
// ──────────────────────────────────────────────────────────────
//   Camera rig
//
//   Two sets of orbit parameters:
//     target  (look_at, distance, rotation, tilt)  → written by
//             input and game code, clamped every update
//     current (marker, current_*)                  → eased toward
//             the targets and used to place the camera
//
//   The camera sits at marker + Euler(tilt, rotation, 0) * (0,0,-d).
// ──────────────────────────────────────────────────────────────
//

/// Gap left between the camera and an obstacle found by the visibility cast.
pub const VISIBILITY_CLEARANCE: f32 = 0.1;

/// Extra reach of the downward terrain ray beyond the vertical bounds.
const TERRAIN_RAY_MARGIN: f32 = 1.0;

/// The point the camera actually orbits; it trails the look-at target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker
{
  pub position: Vec3,
  /// Debug visibility only; never affects camera placement.
  pub visible: bool,
}

impl Marker
{
  pub const ID: ObjectId = ObjectId::MARKER;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitSnapshot
{
  pub look_at: Vec3,
  pub distance: f32,
  pub rotation: f32,
  pub tilt: f32,
}

/// Effective per-axis dampening rates for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dampening
{
  pub movement: f32,
  pub zoom: f32,
  pub rotation: f32,
  pub tilt: f32,
}

impl Dampening
{
  fn from_config(config: &RigConfig) -> Self
  {
    Self {
      movement: config.move_dampening,
      zoom: config.zoom_dampening,
      rotation: config.rotation_dampening,
      tilt: config.tilt_dampening,
    }
  }

  fn uniform(rate: f32) -> Self
  {
    Self { movement: rate, zoom: rate, rotation: rate, tilt: rate }
  }
}

pub struct CameraRig
{
  pub config: RigConfig,

  pub look_at: Vec3,
  pub distance: f32,
  pub rotation: f32,
  pub tilt: f32,

  current_distance: f32,
  current_rotation: f32,
  current_tilt: f32,
  marker: Marker,

  move_vector: Vec3,
  follow: Option<TargetHandle>,
  initial: OrbitSnapshot,
  dampening: Dampening,

  lens: Lens,
  pose: CameraPose,

  height_provider: Option<Box<dyn HeightProvider>>,
  observers: Vec<Box<dyn FollowObserver>>,
  exclusive_startup: Option<DeferredAction>,
}

//
// ──────────────────────────────────────────────────────────────
//   Public API
// ──────────────────────────────────────────────────────────────
//

impl CameraRig
{
  /// Activates a rig: the configured orbit becomes both the reset snapshot
  /// and the starting smoothed state.
  pub fn new(config: RigConfig) -> Self
  {
    let initial = OrbitSnapshot {
      look_at: config.look_at,
      distance: config.distance,
      rotation: config.rotation,
      tilt: config.tilt,
    };

    let dampening = match config.realtime_dampening
    {
      Some(rate) => Dampening::uniform(rate),
      None => Dampening::from_config(&config),
    };

    let marker = Marker { position: initial.look_at, visible: config.show_debug_marker };
    let pose = CameraPose::orbit(marker.position, initial.distance, initial.rotation, initial.tilt);

    Self {
      look_at: initial.look_at,
      distance: initial.distance,
      rotation: initial.rotation,
      tilt: initial.tilt,

      current_distance: initial.distance,
      current_rotation: initial.rotation,
      current_tilt: initial.tilt,
      marker,

      move_vector: Vec3::ZERO,
      follow: None,
      initial,
      dampening,

      lens: Lens::default(),
      pose,

      height_provider: None,
      observers: Vec::new(),
      exclusive_startup: None,

      config,
    }
  }

  /// Advances the rig by one frame and returns the new camera pose.
  /// Call once per frame, after all input for the frame has been applied.
  pub fn update(&mut self, frame: &FrameContext, services: &Services<'_>) -> CameraPose
  {
    self.refresh_dampening(frame);
    self.marker.visible = self.config.show_debug_marker;
    self.tick_exclusive_startup(frame.unscaled_dt);

    let followed = self.resolve_follow(services.targets);

    match followed
    {
      Some(target) => self.look_at = target.position,
      None => self.apply_pan(services.physics),
    }
    self.look_at.y += self.config.look_at_height_offset;

    self.clamp_targets();
    self.advance_smoothing(frame.dt);
    self.move_vector = Vec3::ZERO;

    if let Some(target) = followed
    {
      if self.config.follow_behind
      {
        self.force_follow_behind(&target);
      }

      if self.config.target_visibility_via_physics && self.marker_near(&target)
      {
        self.ensure_target_visible(services.physics);
      }
    }

    self.place_camera();
    trace!("camera pose {:?} (distance {:.2})", self.pose.position, self.current_distance);

    self.pose
  }

  /// Restores distance, rotation and tilt (and optionally the look-at point)
  /// captured at activation. `snap` skips the easing.
  pub fn reset_to_initial_values(&mut self, include_position: bool, snap: bool)
  {
    if include_position
    {
      self.look_at = self.initial.look_at;
    }

    self.distance = self.initial.distance;
    self.rotation = self.initial.rotation;
    self.tilt = self.initial.tilt;

    if snap
    {
      self.current_distance = self.distance;
      self.current_rotation = self.rotation;
      self.current_tilt = self.tilt;
      self.marker.position = self.look_at;
    }

    debug!("rig reset (position: {include_position}, snap: {snap})");
  }

  /// Leaves follow mode and moves the look-at point.
  pub fn jump_to(&mut self, position: Vec3, snap: bool)
  {
    self.end_follow();

    self.look_at = position;

    if snap
    {
      self.marker.position = position;
    }

    debug!("rig jumped to {position:?} (snap: {snap})");
  }

  /// Jumps to an object's current position. Returns false (and does nothing)
  /// if the object no longer exists.
  pub fn jump_to_target(&mut self, target: TargetHandle, targets: &dyn TargetSource, snap: bool) -> bool
  {
    match targets.pose(target)
    {
      Some(pose) =>
      {
        self.jump_to(pose.position, snap);
        true
      }
      None =>
      {
        warn!("jump target {target:?} no longer exists");
        false
      }
    }
  }

  /// Switches follow mode to `target`, or back to free movement with `None`.
  /// Observers see `Ended` for the previous target and `Began` for the new
  /// one. A handle that no longer resolves behaves like `None`.
  pub fn follow(&mut self, target: Option<TargetHandle>, snap: bool, targets: &dyn TargetSource)
  {
    let resolved = target.and_then(|handle| match targets.pose(handle)
    {
      Some(pose) => Some((handle, pose)),
      None =>
      {
        warn!("follow target {handle:?} no longer exists");
        None
      }
    });

    self.set_follow(resolved, snap);
  }

  pub fn end_follow(&mut self)
  {
    self.set_follow(None, false);
  }

  /// Queues a pan for the next update, in the rig's yaw frame
  /// (+z pans along the view direction). The vertical part is ignored.
  pub fn add_to_position(&mut self, dx: f32, dy: f32, dz: f32)
  {
    self.move_vector += Vec3::new(dx, dy, dz);
  }

  pub fn add_observer(&mut self, observer: impl FollowObserver + 'static)
  {
    self.observers.push(Box::new(observer));
  }

  /// Terrain height callback; takes priority over physics sampling.
  pub fn set_height_provider(&mut self, provider: impl HeightProvider + 'static)
  {
    self.height_provider = Some(Box::new(provider));
  }

  pub fn clear_height_provider(&mut self)
  {
    self.height_provider = None;
  }

  /// Schedules `action` (typically disabling other camera controllers) after
  /// the configured real-time delay. Returns false when the config disables
  /// the exclusive claim.
  pub fn set_exclusive_startup(&mut self, action: impl FnOnce() + 'static) -> bool
  {
    match self.config.exclusive_startup_delay
    {
      Some(delay) =>
      {
        self.exclusive_startup = Some(DeferredAction::new(delay, action));
        true
      }
      None => false,
    }
  }

  /// Ground height at (x, z): height callback, else a physics ray cast
  /// down through the bounds if enabled, else 0.
  pub fn height_at(&self, x: f32, z: f32, physics: &dyn RaycastProvider) -> f32
  {
    if let Some(provider) = &self.height_provider
    {
      return provider.height_at(x, z);
    }

    if self.config.terrain_height_via_physics
    {
      let top = self.config.max_bounds.y;
      let reach = self.config.max_bounds.y - self.config.min_bounds.y + TERRAIN_RAY_MARGIN;
      let origin = Vec3::new(x, top, z);

      return match physics.raycast(origin, Vec3::NEG_Y, reach, self.config.terrain_layers)
      {
        Some(hit) => hit.point.y,
        None => 0.0,
      };
    }

    0.0
  }

  //
  //   Accessors
  //

  pub fn is_following(&self) -> bool
  {
    self.follow.is_some()
  }

  pub fn follow_target(&self) -> Option<TargetHandle>
  {
    self.follow
  }

  pub fn marker(&self) -> &Marker
  {
    &self.marker
  }

  pub fn current_distance(&self) -> f32
  {
    self.current_distance
  }

  pub fn current_rotation(&self) -> f32
  {
    self.current_rotation
  }

  pub fn current_tilt(&self) -> f32
  {
    self.current_tilt
  }

  pub fn dampening(&self) -> Dampening
  {
    self.dampening
  }

  pub fn initial(&self) -> &OrbitSnapshot
  {
    &self.initial
  }

  pub fn pose(&self) -> CameraPose
  {
    self.pose
  }

  pub fn lens(&self) -> &Lens
  {
    &self.lens
  }

  pub fn lens_mut(&mut self) -> &mut Lens
  {
    &mut self.lens
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Update steps
// ──────────────────────────────────────────────────────────────
//

impl CameraRig
{
  fn refresh_dampening(&mut self, frame: &FrameContext)
  {
    match self.config.realtime_dampening
    {
      None => self.dampening = Dampening::from_config(&self.config),
      Some(rate) =>
      {
        // Below the floor the last rates stay in effect
        if frame.time_scale_active()
        {
          self.dampening = Dampening::uniform(rate / frame.time_scale);
        }
      }
    }
  }

  fn tick_exclusive_startup(&mut self, unscaled_dt: f32)
  {
    if let Some(action) = &mut self.exclusive_startup
    {
      if action.tick(unscaled_dt)
      {
        debug!("rig claimed exclusive camera control");
        self.exclusive_startup = None;
      }
    }
  }

  /// Samples the followed object, dropping follow mode if it is gone.
  fn resolve_follow(&mut self, targets: &dyn TargetSource) -> Option<TargetPose>
  {
    let handle = self.follow?;

    match targets.pose(handle)
    {
      Some(pose) => Some(pose),
      None =>
      {
        warn!("follow target {handle:?} disappeared; ending follow");
        self.end_follow();
        None
      }
    }
  }

  fn apply_pan(&mut self, physics: &dyn RaycastProvider)
  {
    self.move_vector.y = 0.0;
    self.look_at += Quat::from_rotation_y(self.rotation.to_radians()) * self.move_vector;
    self.look_at.y = self.height_at(self.look_at.x, self.look_at.z, physics);
  }

  fn clamp_targets(&mut self)
  {
    let cfg = &self.config;

    // max-then-min rather than clamp(): a misconfigured range must not panic
    self.tilt = self.tilt.max(cfg.min_tilt).min(cfg.max_tilt);
    self.distance = self.distance.max(cfg.min_distance).min(cfg.max_distance);
    self.look_at = self.look_at.max(cfg.min_bounds).min(cfg.max_bounds);
  }

  fn advance_smoothing(&mut self, dt: f32)
  {
    if !self.config.smoothing
    {
      self.current_rotation = self.rotation;
      self.current_distance = self.distance;
      self.current_tilt = self.tilt;
      self.marker.position = self.look_at;
      return;
    }

    let d = self.dampening;

    self.current_rotation = lerp_angle(self.current_rotation, self.rotation, exp_factor(d.rotation, dt));
    self.current_distance = lerp(self.current_distance, self.distance, exp_factor(d.zoom, dt));
    self.current_tilt = lerp_angle(self.current_tilt, self.tilt, exp_factor(d.tilt, dt));
    self.marker.position = lerp_vec3(self.marker.position, self.look_at, exp_factor(d.movement, dt));
  }

  fn force_follow_behind(&mut self, target: &TargetPose)
  {
    let heading = follow_behind_heading(target.forward, self.config.follow_rotation_offset);
    self.rotation = heading;
    self.current_rotation = heading;
  }

  fn marker_near(&self, target: &TargetPose) -> bool
  {
    let radius = self.config.visibility_follow_radius;
    horizontal_distance_sq(self.marker.position, target.position) < radius * radius
  }

  /// Pulls the smoothed distance in front of any obstacle between the
  /// marker and the camera.
  fn ensure_target_visible(&mut self, physics: &dyn RaycastProvider)
  {
    let origin = self.marker.position;
    let camera =
      CameraPose::orbit(origin, self.current_distance, self.current_rotation, self.current_tilt).position;

    let direction = (camera - origin).normalize_or_zero();
    if direction == Vec3::ZERO
    {
      return;
    }

    let mask = !self.config.visibility_ignore_layers;
    let hit = physics.sphere_cast(origin, self.config.camera_radius, direction, self.distance, mask);

    if let Some(hit) = hit
    {
      if hit.object != Marker::ID
      {
        self.current_distance = (hit.distance - VISIBILITY_CLEARANCE).max(0.0);
        trace!("view blocked by {:?}; distance pulled in to {:.2}", hit.object, self.current_distance);
      }
    }
  }

  fn place_camera(&mut self)
  {
    self.pose =
      CameraPose::orbit(self.marker.position, self.current_distance, self.current_rotation, self.current_tilt);

    if self.lens.is_orthographic()
    {
      self.lens.ortho_half_size = self.current_distance;
    }
  }

  fn set_follow(&mut self, target: Option<(TargetHandle, TargetPose)>, snap: bool)
  {
    if let Some(previous) = self.follow.take()
    {
      debug!("end follow {previous:?}");
      self.notify(FollowEvent::Ended(previous));
    }

    if let Some((handle, pose)) = target
    {
      self.follow = Some(handle);

      if snap
      {
        self.look_at = pose.position;
      }

      debug!("begin follow {handle:?} (snap: {snap})");
      self.notify(FollowEvent::Began(handle));
    }
  }

  fn notify(&mut self, event: FollowEvent)
  {
    for observer in &mut self.observers
    {
      observer.on_follow_event(event);
    }
  }
}
