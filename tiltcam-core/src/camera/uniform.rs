use glam::Mat4;

use super::pose::{CameraPose, Lens};

//
// ──────────────────────────────────────────────────────────────
//   Camera Uniform (GPU side)
//
//   WGSL layout expected by host shaders:
//     view_proj : mat4x4<f32>   → 64 bytes
//   Total: 64 bytes
// ──────────────────────────────────────────────────────────────
//

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform
{
  pub view_proj: [[f32; 4]; 4], // 64 bytes
}

// Catch CPU/GPU layout mismatches at compile time
const _: () = assert!(std::mem::size_of::<CameraUniform>() == 64);

impl CameraUniform
{
  pub fn from_pose(pose: &CameraPose, lens: &Lens) -> Self
  {
    let mat: Mat4 = build_view_proj(pose, lens);
    Self { view_proj: mat.to_cols_array_2d() }
  }
}

pub fn build_view_proj(pose: &CameraPose, lens: &Lens) -> Mat4
{
  let view = pose.view_matrix();
  let proj = lens.projection_matrix();
  proj * view
}
