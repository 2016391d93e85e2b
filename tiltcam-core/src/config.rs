use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::{Key, HORIZONTAL_AXIS, VERTICAL_AXIS};
use crate::services::LayerMask;

//
// ──────────────────────────────────────────────────────────────
//   Rig configuration
//
//   Angles are in degrees, distances in world units, dampening
//   rates in 1/second. Y is up.
// ──────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig
{
  /// Initial look-at point; captured as the reset snapshot.
  pub look_at: Vec3,
  pub distance: f32,
  pub rotation: f32,
  pub tilt: f32,

  pub smoothing: bool,
  pub move_dampening: f32,
  pub zoom_dampening: f32,
  pub rotation_dampening: f32,
  pub tilt_dampening: f32,

  /// When set, all four dampening rates become `value / time_scale`
  /// each frame so easing runs at the same real-time speed in slow motion.
  pub realtime_dampening: Option<f32>,

  pub min_bounds: Vec3,
  pub max_bounds: Vec3,

  pub min_distance: f32,
  pub max_distance: f32,

  pub min_tilt: f32,
  pub max_tilt: f32,

  pub look_at_height_offset: f32,

  pub terrain_height_via_physics: bool,
  pub terrain_layers: LayerMask,

  pub target_visibility_via_physics: bool,
  pub camera_radius: f32,
  pub visibility_ignore_layers: LayerMask,
  /// Visibility checks only run once the marker is this close
  /// (horizontally) to the followed object.
  pub visibility_follow_radius: f32,

  pub follow_behind: bool,
  pub follow_rotation_offset: f32,

  pub show_debug_marker: bool,

  /// Real-time delay before the rig claims exclusive control of the
  /// camera; `None` disables the claim.
  pub exclusive_startup_delay: Option<f32>,
}

impl Default for RigConfig
{
  fn default() -> Self
  {
    Self {
      look_at: Vec3::new(10.0, 0.0, 22.5),
      distance: 10.0,
      rotation: -90.0,
      tilt: 45.0,

      smoothing: true,
      move_dampening: 5.0,
      zoom_dampening: 5.0,
      rotation_dampening: 5.0,
      tilt_dampening: 5.0,
      realtime_dampening: None,

      min_bounds: Vec3::new(0.0, 3.0, 0.0),
      max_bounds: Vec3::new(100.0, 100.0, 100.0),

      min_distance: 2.0,
      max_distance: 32.0,

      min_tilt: 10.0,
      max_tilt: 85.0,

      look_at_height_offset: 1.0,

      terrain_height_via_physics: false,
      terrain_layers: LayerMask::ALL,

      target_visibility_via_physics: false,
      camera_radius: 1.0,
      visibility_ignore_layers: LayerMask::NONE,
      visibility_follow_radius: 1.0,

      follow_behind: false,
      follow_rotation_offset: 0.0,

      show_debug_marker: false,

      exclusive_startup_delay: Some(2.0),
    }
  }
}

impl RigConfig
{
  /// Load-time sanity check. Runtime writes are clamped instead.
  pub fn validate(&self) -> Result<(), ConfigError>
  {
    check_range("distance", self.min_distance, self.max_distance)?;
    check_range("tilt", self.min_tilt, self.max_tilt)?;

    for (axis, min, max) in [
      ("x", self.min_bounds.x, self.max_bounds.x),
      ("y", self.min_bounds.y, self.max_bounds.y),
      ("z", self.min_bounds.z, self.max_bounds.z),
    ]
    {
      if min > max
      {
        return Err(ConfigError::InvertedBounds { axis, min, max });
      }
    }

    check_non_negative("move_dampening", self.move_dampening)?;
    check_non_negative("zoom_dampening", self.zoom_dampening)?;
    check_non_negative("rotation_dampening", self.rotation_dampening)?;
    check_non_negative("tilt_dampening", self.tilt_dampening)?;
    if let Some(rate) = self.realtime_dampening
    {
      check_non_negative("realtime_dampening", rate)?;
    }
    check_non_negative("visibility_follow_radius", self.visibility_follow_radius)?;

    if self.camera_radius <= 0.0
    {
      return Err(ConfigError::NonPositive { field: "camera_radius", value: self.camera_radius });
    }

    Ok(())
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Input mapper configuration
// ──────────────────────────────────────────────────────────────
//

/// Where a rotate/zoom/tilt control reads from: a named analog axis, or an
/// increase/decrease key pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AxisOrKeys
{
  Axis(String),
  Keys
  {
    increase: Key,
    decrease: Key,
  },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig
{
  pub allow_move: bool,
  pub move_speed: f32,
  pub allow_fast_move: bool,
  pub fast_move_speed: f32,
  pub fast_move_keys: [Key; 2],

  pub allow_rotate: bool,
  pub rotate_speed: f32,
  pub rotate: AxisOrKeys,

  pub allow_zoom: bool,
  pub zoom_speed: f32,
  pub zoom: AxisOrKeys,

  pub allow_tilt: bool,
  pub tilt_speed: f32,
  pub tilt: AxisOrKeys,

  pub reset_key: Option<Key>,
  pub include_position_on_reset: bool,

  pub movement_breaks_follow: bool,

  pub horizontal_axis: String,
  pub vertical_axis: String,
}

impl Default for MapperConfig
{
  fn default() -> Self
  {
    Self {
      allow_move: true,
      move_speed: 15.0,
      allow_fast_move: true,
      fast_move_speed: 30.0,
      fast_move_keys: [Key::LeftShift, Key::RightShift],

      allow_rotate: true,
      rotate_speed: 180.0,
      rotate: AxisOrKeys::Keys { increase: Key::Q, decrease: Key::E },

      allow_zoom: true,
      zoom_speed: 15.0,
      zoom: AxisOrKeys::Keys { increase: Key::Z, decrease: Key::X },

      allow_tilt: true,
      tilt_speed: 90.0,
      tilt: AxisOrKeys::Keys { increase: Key::R, decrease: Key::F },

      reset_key: Some(Key::Return),
      include_position_on_reset: true,

      movement_breaks_follow: true,

      horizontal_axis: HORIZONTAL_AXIS.to_string(),
      vertical_axis: VERTICAL_AXIS.to_string(),
    }
  }
}

impl MapperConfig
{
  pub fn validate(&self) -> Result<(), ConfigError>
  {
    check_non_negative("move_speed", self.move_speed)?;
    check_non_negative("fast_move_speed", self.fast_move_speed)?;
    check_non_negative("rotate_speed", self.rotate_speed)?;
    check_non_negative("zoom_speed", self.zoom_speed)?;
    check_non_negative("tilt_speed", self.tilt_speed)?;
    Ok(())
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Errors
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError
{
  #[error("{field}: min {min} is greater than max {max}")]
  InvertedRange
  {
    field: &'static str,
    min: f32,
    max: f32,
  },

  #[error("bounds {axis}: min {min} is greater than max {max}")]
  InvertedBounds
  {
    axis: &'static str,
    min: f32,
    max: f32,
  },

  #[error("{field} must not be negative (got {value})")]
  Negative
  {
    field: &'static str,
    value: f32,
  },

  #[error("{field} must be positive (got {value})")]
  NonPositive
  {
    field: &'static str,
    value: f32,
  },
}

fn check_range(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError>
{
  if min > max
  {
    return Err(ConfigError::InvertedRange { field, min, max });
  }
  Ok(())
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError>
{
  if value < 0.0
  {
    return Err(ConfigError::Negative { field, value });
  }
  Ok(())
}
