use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use log::info;
use tiltcam_core::{CameraRig, FollowEvent, FrameContext, InputMapper, InputSource, Key, Services};
use winit::{
  application::ApplicationHandler,
  event::WindowEvent,
  event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
  window::{Window, WindowId},
};

use crate::input::KeyboardState;
use crate::scene::{DemoScene, CART};
use crate::settings::Settings;

//
// ──────────────────────────────────────────────────────────────
//   Constants
// ──────────────────────────────────────────────────────────────
//

const SLOW_MOTION: f32 = 0.25;
const TITLE_INTERVAL: f32 = 0.25; // seconds between title refreshes
const MAX_FRAME_DT: f32 = 0.1; // clamp hitches (window drags, breakpoints)

pub fn run(settings: Settings) -> anyhow::Result<()>
{
  let event_loop = EventLoop::new().context("creating event loop")?;
  let mut app = TiltcamApp::new(settings);

  event_loop.run_app(&mut app).context("running event loop")?;
  Ok(())
}

struct TiltcamApp
{
  window: Option<Arc<Window>>,
  rig: CameraRig,
  mapper: InputMapper,
  input: KeyboardState,
  scene: DemoScene,

  time_scale: f32,
  last_frame: Option<Instant>,
  title_timer: f32,
}

impl TiltcamApp
{
  fn new(settings: Settings) -> Self
  {
    let mut rig = CameraRig::new(settings.rig);

    rig.add_observer(|event: FollowEvent| match event
    {
      FollowEvent::Began(target) => info!("camera following {target:?}"),
      FollowEvent::Ended(target) => info!("camera stopped following {target:?}"),
    });

    // Nothing else drives this window's camera; the claim is just reported
    rig.set_exclusive_startup(|| info!("tiltcam rig has exclusive camera control"));

    Self {
      window: None,
      rig,
      mapper: InputMapper::new(settings.mapper),
      input: KeyboardState::new(),
      scene: DemoScene::new(),

      time_scale: 1.0,
      last_frame: None,
      title_timer: 0.0,
    }
  }

  fn init_window(&mut self, event_loop: &ActiveEventLoop)
  {
    if self.window.is_some()
    {
      return;
    }

    let attrs = Window::default_attributes().with_title("tiltcam");
    match event_loop.create_window(attrs)
    {
      Ok(window) =>
      {
        let size = window.inner_size();
        if size.width > 0 && size.height > 0
        {
          self.rig.lens_mut().set_aspect(size.width as f32 / size.height as f32);
        }
        self.window = Some(Arc::new(window));
      }
      Err(err) =>
      {
        log::error!("failed to create window: {err}");
        event_loop.exit();
      }
    }
  }

  fn handle_window_event(&mut self, elwt: &ActiveEventLoop, window_id: WindowId, event: WindowEvent)
  {
    match &self.window
    {
      Some(w) if w.id() == window_id =>
      {}
      _ => return,
    }

    self.input.handle_event(&event);

    match event
    {
      WindowEvent::CloseRequested =>
      {
        elwt.exit();
      }

      WindowEvent::Resized(size) =>
      {
        if size.width == 0 || size.height == 0
        {
          return;
        }

        self.rig.lens_mut().set_aspect(size.width as f32 / size.height as f32);
      }

      _ =>
      {}
    }
  }

  /// Demo-only shortcuts that exercise the rig's public API.
  fn handle_demo_keys(&mut self)
  {
    if self.input.key_down(Key::Space)
    {
      self.time_scale = if self.time_scale < 1.0 { 1.0 } else { SLOW_MOTION };
      info!("time scale {}", self.time_scale);
    }

    if self.input.key_down(Key::F1)
    {
      self.rig.config.show_debug_marker = !self.rig.config.show_debug_marker;
    }

    if self.input.key_down(Key::Digit1)
    {
      self.rig.follow(Some(CART), false, &self.scene);
    }

    if self.input.key_down(Key::Digit0)
    {
      self.rig.end_follow();
    }

    if self.input.key_down(Key::Home)
    {
      self.rig.jump_to(self.scene.centre(), false);
    }
  }

  fn frame(&mut self)
  {
    let now = Instant::now();
    let unscaled_dt = match self.last_frame
    {
      Some(last) => (now - last).as_secs_f32().min(MAX_FRAME_DT),
      None => 0.0,
    };
    self.last_frame = Some(now);

    let frame = FrameContext::new(unscaled_dt, self.time_scale);

    self.scene.advance(frame.dt);
    self.handle_demo_keys();

    self.mapper.apply(&self.input, &frame, &mut self.rig);
    let pose = self.rig.update(&frame, &Services::new(&self.scene, &self.scene));

    self.title_timer += unscaled_dt;
    if self.title_timer >= TITLE_INTERVAL
    {
      self.title_timer = 0.0;

      if let Some(window) = &self.window
      {
        let p = pose.position;
        let follow = if self.rig.is_following() { " [follow]" } else { "" };
        window.set_title(&format!(
          "tiltcam  eye ({:.1}, {:.1}, {:.1})  dist {:.1}  yaw {:.0}  tilt {:.0}{follow}",
          p.x,
          p.y,
          p.z,
          self.rig.current_distance(),
          self.rig.current_rotation(),
          self.rig.current_tilt(),
        ));
      }
    }

    self.input.end_frame();

    if let Some(window) = &self.window
    {
      window.request_redraw();
    }
  }
}

impl ApplicationHandler for TiltcamApp
{
  fn resumed(&mut self, event_loop: &ActiveEventLoop)
  {
    event_loop.set_control_flow(ControlFlow::Poll);
    self.init_window(event_loop);
  }

  fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent)
  {
    self.handle_window_event(event_loop, window_id, event);
  }

  fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop)
  {
    if self.window.is_some()
    {
      self.frame();
    }
  }
}
