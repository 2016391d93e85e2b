use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tiltcam_core::{MapperConfig, RigConfig};

/// Demo settings file: `{ "rig": { ... }, "mapper": { ... } }`.
/// Missing fields keep their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings
{
  pub rig: RigConfig,
  pub mapper: MapperConfig,
}

impl Default for Settings
{
  /// Demo defaults: terrain from the scene's physics, obstacle-aware
  /// follow, and easing that keeps real-time speed under slow motion.
  fn default() -> Self
  {
    let rig = RigConfig {
      look_at: glam::Vec3::new(50.0, 0.0, 50.0),
      terrain_height_via_physics: true,
      target_visibility_via_physics: true,
      realtime_dampening: Some(7.0),
      ..RigConfig::default()
    };

    Self { rig, mapper: MapperConfig::default() }
  }
}

pub fn load(path: Option<&Path>) -> anyhow::Result<Settings>
{
  let settings = match path
  {
    Some(path) =>
    {
      let text = fs::read_to_string(path).with_context(|| format!("reading settings from {}", path.display()))?;
      serde_json::from_str::<Settings>(&text).with_context(|| format!("parsing settings in {}", path.display()))?
    }
    None => Settings::default(),
  };

  settings.rig.validate().context("invalid rig settings")?;
  settings.mapper.validate().context("invalid input settings")?;

  Ok(settings)
}
