use glam::Vec3;

//
// ──────────────────────────────────────────────────────────────
//   Frame-rate independent easing
//
//     value += (target - value) * (1 - exp(-rate * dt))
//
//   The blend factor stays in [0, 1), so a smoothed value never
//   overshoots its target whatever the frame time.
// ──────────────────────────────────────────────────────────────
//

pub fn exp_factor(rate: f32, dt: f32) -> f32
{
  if rate <= 0.0 || dt <= 0.0
  {
    return 0.0;
  }

  1.0 - (-rate * dt).exp()
}

pub fn lerp(from: f32, to: f32, t: f32) -> f32
{
  from + (to - from) * t
}

pub fn lerp_vec3(from: Vec3, to: Vec3, t: f32) -> Vec3
{
  from.lerp(to, t)
}

/// Shortest signed difference `to - from` in degrees, in (-180, 180].
pub fn delta_angle(from: f32, to: f32) -> f32
{
  let mut delta = (to - from).rem_euclid(360.0);
  if delta > 180.0
  {
    delta -= 360.0;
  }
  delta
}

/// Interpolates degrees the short way round.
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32
{
  from + delta_angle(from, to) * t
}
