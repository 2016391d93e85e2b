use glam::Vec3;

use super::rig::CameraRig;

//
// ──────────────────────────────────────────────────────────────
//   Constants
// ──────────────────────────────────────────────────────────────
//

const MARKER_ARM: f32 = 0.25; // half the marker's 0.5 diameter
const COL_MARKER: [f32; 3] = [0.2, 1.0, 0.2]; // green
const COL_BOUNDS: [f32; 3] = [1.0, 1.0, 0.2]; // yellow
const COL_ARM: [f32; 3] = [0.5, 0.5, 0.5]; // grey

//
// ──────────────────────────────────────────────────────────────
//   Vertex layout: [x, y, z,  r, g, b]  (line list)
// ──────────────────────────────────────────────────────────────
//

pub type Vertex = [f32; 6];

// 3 arms * 2 verts for the marker, 12 edges * 2 verts for the bounds,
// plus 2 for the orbit arm
pub const MAX_VERTS: usize = 6 + 24 + 2;

//
// ──────────────────────────────────────────────────────────────
//   DebugLines
// ──────────────────────────────────────────────────────────────
//

/// Line-list overlay for the rig: marker cross and orbit arm (while the
/// debug marker is shown) and the look-at bounds box.
#[derive(Clone, Debug, Default)]
pub struct DebugLines
{
  pub vertices: Vec<Vertex>,
}

impl DebugLines
{
  pub fn build(rig: &CameraRig) -> Self
  {
    let mut verts: Vec<Vertex> = Vec::with_capacity(MAX_VERTS);

    if rig.marker().visible
    {
      let marker = rig.marker().position;
      push_cross(&mut verts, marker, COL_MARKER);

      verts.push(make_vertex(marker, COL_ARM));
      verts.push(make_vertex(rig.pose().position, COL_ARM));
    }

    push_box(&mut verts, rig.config.min_bounds, rig.config.max_bounds, COL_BOUNDS);

    Self { vertices: verts }
  }

  pub fn vertex_count(&self) -> u32
  {
    self.vertices.len() as u32
  }

  pub fn as_bytes(&self) -> &[u8]
  {
    bytemuck::cast_slice(&self.vertices)
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Geometry helpers
// ──────────────────────────────────────────────────────────────
//

fn make_vertex(pos: Vec3, col: [f32; 3]) -> Vertex
{
  [pos.x, pos.y, pos.z, col[0], col[1], col[2]]
}

fn push_line(verts: &mut Vec<Vertex>, a: Vec3, b: Vec3, col: [f32; 3])
{
  verts.push(make_vertex(a, col));
  verts.push(make_vertex(b, col));
}

fn push_cross(verts: &mut Vec<Vertex>, centre: Vec3, col: [f32; 3])
{
  push_line(verts, centre - Vec3::X * MARKER_ARM, centre + Vec3::X * MARKER_ARM, col);
  push_line(verts, centre - Vec3::Y * MARKER_ARM, centre + Vec3::Y * MARKER_ARM, col);
  push_line(verts, centre - Vec3::Z * MARKER_ARM, centre + Vec3::Z * MARKER_ARM, col);
}

fn push_box(verts: &mut Vec<Vertex>, min: Vec3, max: Vec3, col: [f32; 3])
{
  let corner = |x: bool, y: bool, z: bool| {
    Vec3::new(if x { max.x } else { min.x }, if y { max.y } else { min.y }, if z { max.z } else { min.z })
  };

  // Edges along each axis: fix the other two coordinates at each of 4 combinations
  for (a, b) in [(false, false), (false, true), (true, false), (true, true)]
  {
    push_line(verts, corner(false, a, b), corner(true, a, b), col);
    push_line(verts, corner(a, false, b), corner(a, true, b), col);
    push_line(verts, corner(a, b, false), corner(a, b, true), col);
  }
}
