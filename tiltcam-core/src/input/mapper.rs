use log::debug;

use super::InputSource;
use crate::camera::CameraRig;
use crate::config::{AxisOrKeys, MapperConfig};
use crate::frame::FrameContext;

//
// ──────────────────────────────────────────────────────────────
//   Thresholds
// ──────────────────────────────────────────────────────────────
//

const AXIS_DEADZONE: f32 = 0.001;

//
// ──────────────────────────────────────────────────────────────
//   Effective speeds
//
//   Configured speeds are per real second. Dividing by the time
//   scale before multiplying by the scaled dt keeps input feel
//   the same in slow motion.
// ──────────────────────────────────────────────────────────────
//

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Speeds
{
  pub movement: f32,
  pub fast_movement: f32,
  pub rotate: f32,
  pub zoom: f32,
  pub tilt: f32,
}

impl Speeds
{
  fn scaled(config: &MapperConfig, time_scale: f32) -> Self
  {
    Self {
      movement: config.move_speed / time_scale,
      fast_movement: config.fast_move_speed / time_scale,
      rotate: config.rotate_speed / time_scale,
      zoom: config.zoom_speed / time_scale,
      tilt: config.tilt_speed / time_scale,
    }
  }
}

/// Which target field a rotate/zoom/tilt control drives.
#[derive(Clone, Copy)]
enum Channel
{
  Rotation,
  Distance,
  Tilt,
}

//
// ──────────────────────────────────────────────────────────────
//   Public API
// ──────────────────────────────────────────────────────────────
//

pub struct InputMapper
{
  pub config: MapperConfig,
  speeds: Speeds,
}

impl InputMapper
{
  pub fn new(config: MapperConfig) -> Self
  {
    let speeds = Speeds::scaled(&config, 1.0);
    Self { config, speeds }
  }

  pub fn speeds(&self) -> Speeds
  {
    self.speeds
  }

  /// Applies this frame's input to the rig's targets. Run before
  /// [`CameraRig::update`].
  pub fn apply(&mut self, input: &dyn InputSource, frame: &FrameContext, rig: &mut CameraRig)
  {
    // Near-zero time scales would blow the speeds up; keep the last ones
    if frame.time_scale_active()
    {
      self.speeds = Speeds::scaled(&self.config, frame.time_scale);
    }

    apply_pan(&self.config, &self.speeds, input, frame.dt, rig);

    if self.config.allow_rotate
    {
      apply_channel(&self.config.rotate, self.speeds.rotate, input, frame.dt, rig, Channel::Rotation);
    }

    if self.config.allow_zoom
    {
      apply_channel(&self.config.zoom, self.speeds.zoom, input, frame.dt, rig, Channel::Distance);
    }

    if self.config.allow_tilt
    {
      apply_channel(&self.config.tilt, self.speeds.tilt, input, frame.dt, rig, Channel::Tilt);
    }

    apply_reset(&self.config, input, rig);
  }
}

impl Default for InputMapper
{
  fn default() -> Self
  {
    Self::new(MapperConfig::default())
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Input handlers
// ──────────────────────────────────────────────────────────────
//

fn apply_pan(config: &MapperConfig, speeds: &Speeds, input: &dyn InputSource, dt: f32, rig: &mut CameraRig)
{
  if !config.allow_move
  {
    return;
  }

  if rig.is_following() && !config.movement_breaks_follow
  {
    return;
  }

  let fast_held = config.fast_move_keys.iter().any(|&k| input.key_held(k));
  let speed = if config.allow_fast_move && fast_held { speeds.fast_movement } else { speeds.movement };

  let mut moved = false;

  let h = input.axis(&config.horizontal_axis);
  if h.abs() > AXIS_DEADZONE
  {
    moved = true;
    rig.add_to_position(h * speed * dt, 0.0, 0.0);
  }

  let v = input.axis(&config.vertical_axis);
  if v.abs() > AXIS_DEADZONE
  {
    moved = true;
    rig.add_to_position(0.0, 0.0, v * speed * dt);
  }

  if moved && rig.is_following()
  {
    debug!("pan input broke follow");
    rig.end_follow();
  }
}

fn apply_channel(
  source: &AxisOrKeys,
  speed: f32,
  input: &dyn InputSource,
  dt: f32,
  rig: &mut CameraRig,
  channel: Channel,
)
{
  let delta = match source
  {
    AxisOrKeys::Axis(name) =>
    {
      let value = input.axis(name);
      if value.abs() <= AXIS_DEADZONE
      {
        return;
      }
      value * speed * dt
    }

    AxisOrKeys::Keys { increase, decrease } =>
    {
      let mut delta = 0.0;
      if input.key_held(*increase)
      {
        delta += speed * dt;
      }
      if input.key_held(*decrease)
      {
        delta -= speed * dt;
      }
      delta
    }
  };

  match channel
  {
    Channel::Rotation => rig.rotation += delta,
    Channel::Distance => rig.distance += delta,
    Channel::Tilt => rig.tilt += delta,
  }
}

fn apply_reset(config: &MapperConfig, input: &dyn InputSource, rig: &mut CameraRig)
{
  let key = match config.reset_key
  {
    Some(k) => k,
    None => return,
  };

  if input.key_down(key)
  {
    rig.reset_to_initial_values(config.include_position_on_reset, false);
  }
}
