//
// ──────────────────────────────────────────────────────────────
//   Frame timing
//
//   The host passes one FrameContext to the input mapper and the
//   rig each frame instead of the rig reading global clocks.
//     dt          = scaled frame time (game time)
//     unscaled_dt = wall-clock frame time
//     time_scale  = global game speed (1.0 = normal)
// ──────────────────────────────────────────────────────────────
//

/// Below this time scale speeds and dampening stop being rescaled.
pub const TIME_SCALE_FLOOR: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext
{
  pub dt: f32,
  pub unscaled_dt: f32,
  pub time_scale: f32,
}

impl FrameContext
{
  pub fn new(unscaled_dt: f32, time_scale: f32) -> Self
  {
    let time_scale = time_scale.max(0.0);

    Self { dt: unscaled_dt * time_scale, unscaled_dt, time_scale }
  }

  /// Fixed-step frame at normal speed, mostly for tests and tools.
  pub fn fixed(dt: f32) -> Self
  {
    Self::new(dt, 1.0)
  }

  /// Whether per-frame speed compensation should run this frame.
  pub fn time_scale_active(&self) -> bool
  {
    self.time_scale > TIME_SCALE_FLOOR
  }
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn scaled_dt_follows_time_scale()
  {
    let frame = FrameContext::new(0.1, 0.5);
    assert!((frame.dt - 0.05).abs() < 1e-6);
    assert_eq!(frame.unscaled_dt, 0.1);
  }

  #[test]
  fn negative_time_scale_is_treated_as_paused()
  {
    let frame = FrameContext::new(0.1, -2.0);
    assert_eq!(frame.dt, 0.0);
    assert!(!frame.time_scale_active());
  }

  #[test]
  fn compensation_only_above_floor()
  {
    assert!(FrameContext::new(0.016, 1.0).time_scale_active());
    assert!(!FrameContext::new(0.016, 0.2).time_scale_active());
    assert!(!FrameContext::new(0.016, 0.05).time_scale_active());
  }
}
