//
// ──────────────────────────────────────────────────────────────
//   One-shot deferred action
//
//   Ticked with wall-clock time so slow motion does not delay it.
//   Used by the rig to take exclusive control of the camera a
//   short while after activation (the host disables any other
//   camera controllers in the callback).
// ──────────────────────────────────────────────────────────────
//

pub struct DeferredAction
{
  delay: f32,
  elapsed: f32,
  action: Option<Box<dyn FnOnce()>>,
}

impl DeferredAction
{
  pub fn new(delay: f32, action: impl FnOnce() + 'static) -> Self
  {
    Self { delay: delay.max(0.0), elapsed: 0.0, action: Some(Box::new(action)) }
  }

  /// Advances the timer; runs the action on the tick that crosses the
  /// delay and returns true exactly then.
  pub fn tick(&mut self, unscaled_dt: f32) -> bool
  {
    if self.action.is_none()
    {
      return false;
    }

    self.elapsed += unscaled_dt.max(0.0);
    if self.elapsed < self.delay
    {
      return false;
    }

    if let Some(action) = self.action.take()
    {
      action();
    }
    true
  }

  pub fn is_pending(&self) -> bool
  {
    self.action.is_some()
  }
}

impl std::fmt::Debug for DeferredAction
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
  {
    f.debug_struct("DeferredAction")
      .field("delay", &self.delay)
      .field("elapsed", &self.elapsed)
      .field("pending", &self.is_pending())
      .finish()
  }
}

#[cfg(test)]
mod tests
{
  use std::cell::Cell;
  use std::rc::Rc;

  use super::*;

  #[test]
  fn fires_once_after_delay()
  {
    let count = Rc::new(Cell::new(0));
    let c = count.clone();
    let mut action = DeferredAction::new(2.0, move || c.set(c.get() + 1));

    assert!(!action.tick(1.0));
    assert!(!action.tick(0.5));
    assert!(action.tick(0.5));
    assert!(!action.tick(10.0));

    assert_eq!(count.get(), 1);
    assert!(!action.is_pending());
  }

  #[test]
  fn zero_delay_fires_on_first_tick()
  {
    let fired = Rc::new(Cell::new(false));
    let f = fired.clone();
    let mut action = DeferredAction::new(0.0, move || f.set(true));

    assert!(action.tick(0.0));
    assert!(fired.get());
  }
}
