use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

//
// ──────────────────────────────────────────────────────────────
//   Camera pose (Y-up, left-handed, camera looks along local +Z)
//
//     X → right
//     Y → up
//     Z → forward
// ──────────────────────────────────────────────────────────────
//

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose
{
  pub position: Vec3,
  pub orientation: Quat,
}

impl Default for CameraPose
{
  fn default() -> Self
  {
    Self { position: Vec3::ZERO, orientation: Quat::IDENTITY }
  }
}

impl CameraPose
{
  /// Pose orbiting `centre` at `distance`, yawed by `rotation_deg` about +Y
  /// and pitched down by `tilt_deg`.
  pub fn orbit(centre: Vec3, distance: f32, rotation_deg: f32, tilt_deg: f32) -> Self
  {
    let orientation = orbit_orientation(rotation_deg, tilt_deg);
    let arm = orientation * Vec3::new(0.0, 0.0, -distance);

    Self { position: centre + arm, orientation }
  }

  pub fn forward(&self) -> Vec3
  {
    self.orientation * Vec3::Z
  }

  pub fn right(&self) -> Vec3
  {
    self.orientation * Vec3::X
  }

  pub fn up(&self) -> Vec3
  {
    self.orientation * Vec3::Y
  }

  /// World → view.
  pub fn view_matrix(&self) -> Mat4
  {
    Mat4::from_quat(self.orientation.conjugate()) * Mat4::from_translation(-self.position)
  }
}

/// Rotation built from (tilt, rotation, 0) Euler degrees: roll, then pitch,
/// then yaw.
pub fn orbit_orientation(rotation_deg: f32, tilt_deg: f32) -> Quat
{
  Quat::from_euler(EulerRot::YXZ, rotation_deg.to_radians(), tilt_deg.to_radians(), 0.0)
}

//
// ──────────────────────────────────────────────────────────────
//   Lens
// ──────────────────────────────────────────────────────────────
//

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Projection
{
  Perspective,
  Orthographic,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lens
{
  pub projection: Projection,
  pub aspect: f32,
  pub fovy: f32,
  pub znear: f32,
  pub zfar: f32,
  /// Half the vertical view height in orthographic mode. The rig keeps it
  /// equal to the smoothed distance so zoom works in both modes.
  pub ortho_half_size: f32,
}

impl Lens
{
  pub fn new(aspect: f32) -> Self
  {
    Self {
      projection: Projection::Perspective,
      aspect,
      fovy: std::f32::consts::FRAC_PI_4, // 45° vertical FOV
      znear: 0.1,
      zfar: 10_000.0,
      ortho_half_size: 5.0,
    }
  }

  pub fn set_aspect(&mut self, aspect: f32)
  {
    self.aspect = aspect;
  }

  pub fn is_orthographic(&self) -> bool
  {
    self.projection == Projection::Orthographic
  }

  pub fn projection_matrix(&self) -> Mat4
  {
    match self.projection
    {
      Projection::Perspective => Mat4::perspective_lh(self.fovy, self.aspect, self.znear, self.zfar),
      Projection::Orthographic =>
      {
        let h = self.ortho_half_size;
        let w = h * self.aspect;
        Mat4::orthographic_lh(-w, w, -h, h, self.znear, self.zfar)
      }
    }
  }
}

impl Default for Lens
{
  fn default() -> Self
  {
    Self::new(16.0 / 9.0)
  }
}
