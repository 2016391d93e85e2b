use std::collections::HashSet;

use tiltcam_core::{InputSource, Key, VirtualAxes};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keyboard state collected from window events, polled once per frame by
/// the input mapper.
pub struct KeyboardState
{
  held: HashSet<Key>,
  pressed: HashSet<Key>,
  axes: VirtualAxes,
}

impl KeyboardState
{
  pub fn new() -> Self
  {
    Self { held: HashSet::new(), pressed: HashSet::new(), axes: VirtualAxes::default() }
  }

  pub fn handle_event(&mut self, event: &WindowEvent)
  {
    match event
    {
      WindowEvent::KeyboardInput { event, .. } =>
      {
        let key = match event.physical_key
        {
          PhysicalKey::Code(code) => map_key(code),
          PhysicalKey::Unidentified(_) => None,
        };

        let Some(key) = key
        else
        {
          return;
        };

        match event.state
        {
          ElementState::Pressed =>
          {
            // OS key repeat must not re-trigger press edges
            if !event.repeat
            {
              self.pressed.insert(key);
            }
            self.held.insert(key);
          }
          ElementState::Released =>
          {
            self.held.remove(&key);
          }
        }
      }

      WindowEvent::Focused(false) =>
      {
        self.held.clear();
      }

      _ =>
      {}
    }
  }

  pub fn end_frame(&mut self)
  {
    self.pressed.clear();
  }
}

impl InputSource for KeyboardState
{
  fn axis(&self, name: &str) -> f32
  {
    self.axes.value(name, &self.held)
  }

  fn key_held(&self, key: Key) -> bool
  {
    self.held.contains(&key)
  }

  fn key_down(&self, key: Key) -> bool
  {
    self.pressed.contains(&key)
  }
}

fn map_key(code: KeyCode) -> Option<Key>
{
  let key = match code
  {
    KeyCode::KeyA => Key::A,
    KeyCode::KeyD => Key::D,
    KeyCode::KeyE => Key::E,
    KeyCode::KeyF => Key::F,
    KeyCode::KeyQ => Key::Q,
    KeyCode::KeyR => Key::R,
    KeyCode::KeyS => Key::S,
    KeyCode::KeyW => Key::W,
    KeyCode::KeyX => Key::X,
    KeyCode::KeyZ => Key::Z,
    KeyCode::Digit0 => Key::Digit0,
    KeyCode::Digit1 => Key::Digit1,
    KeyCode::ArrowUp => Key::Up,
    KeyCode::ArrowDown => Key::Down,
    KeyCode::ArrowLeft => Key::Left,
    KeyCode::ArrowRight => Key::Right,
    KeyCode::ShiftLeft => Key::LeftShift,
    KeyCode::ShiftRight => Key::RightShift,
    KeyCode::Enter => Key::Return,
    KeyCode::Space => Key::Space,
    KeyCode::Home => Key::Home,
    KeyCode::F1 => Key::F1,
    _ => return None,
  };

  Some(key)
}
