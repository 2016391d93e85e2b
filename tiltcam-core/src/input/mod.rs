mod mapper;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub use mapper::{InputMapper, Speeds};

//
// ──────────────────────────────────────────────────────────────
//   Keys and polled input
// ──────────────────────────────────────────────────────────────
//

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key
{
  A,
  D,
  E,
  F,
  Q,
  R,
  S,
  W,
  X,
  Z,
  Digit0,
  Digit1,
  Up,
  Down,
  Left,
  Right,
  LeftShift,
  RightShift,
  Return,
  Space,
  Home,
  F1,
}

/// Input state the mapper polls once per frame.
pub trait InputSource
{
  /// Raw value of a named axis in `[-1, 1]`; unknown names read 0.
  fn axis(&self, name: &str) -> f32;

  fn key_held(&self, key: Key) -> bool;

  /// True only on the frame the key went down.
  fn key_down(&self, key: Key) -> bool;
}

//
// ──────────────────────────────────────────────────────────────
//   Virtual axes (digital keys → analog axis)
// ──────────────────────────────────────────────────────────────
//

pub const HORIZONTAL_AXIS: &str = "Horizontal";
pub const VERTICAL_AXIS: &str = "Vertical";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisBinding
{
  pub name: String,
  pub positive: Vec<Key>,
  pub negative: Vec<Key>,
}

/// Named axes synthesised from held keys, for hosts whose input layer
/// only reports key state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VirtualAxes
{
  pub bindings: Vec<AxisBinding>,
}

impl VirtualAxes
{
  pub fn new() -> Self
  {
    Self { bindings: Vec::new() }
  }

  pub fn bind(mut self, name: &str, positive: &[Key], negative: &[Key]) -> Self
  {
    self.bindings.push(AxisBinding { name: name.to_string(), positive: positive.to_vec(), negative: negative.to_vec() });
    self
  }

  pub fn value(&self, name: &str, held: &HashSet<Key>) -> f32
  {
    let binding = match self.bindings.iter().find(|b| b.name == name)
    {
      Some(b) => b,
      None => return 0.0,
    };

    let pos = binding.positive.iter().any(|k| held.contains(k));
    let neg = binding.negative.iter().any(|k| held.contains(k));

    match (pos, neg)
    {
      (true, false) => 1.0,
      (false, true) => -1.0,
      _ => 0.0,
    }
  }
}

impl Default for VirtualAxes
{
  /// WASD and arrow keys on the two pan axes.
  fn default() -> Self
  {
    Self::new()
      .bind(HORIZONTAL_AXIS, &[Key::D, Key::Right], &[Key::A, Key::Left])
      .bind(VERTICAL_AXIS, &[Key::W, Key::Up], &[Key::S, Key::Down])
  }
}
