use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec3;
use tiltcam_core::camera::rig::VISIBILITY_CLEARANCE;
use tiltcam_core::{
  CameraRig, FollowEvent, FrameContext, InputMapper, InputSource, Key, LayerMask, MapperConfig, NoPhysics, ObjectId,
  RayHit, RaycastProvider, RigConfig, Services, TargetPose, TargetSource,
};

//
// ──────────────────────────────────────────────────────────────
//   Fake host services
// ──────────────────────────────────────────────────────────────
//

#[derive(Default)]
struct Scene
{
  objects: HashMap<ObjectId, TargetPose>,
}

impl Scene
{
  fn with(mut self, id: u64, position: Vec3) -> Self
  {
    self.objects.insert(ObjectId(id), TargetPose::at(position));
    self
  }
}

impl TargetSource for Scene
{
  fn pose(&self, handle: ObjectId) -> Option<TargetPose>
  {
    self.objects.get(&handle).copied()
  }
}

/// Sphere casts hit `object` at a fixed distance; rays miss.
struct Wall
{
  distance: f32,
  object: ObjectId,
  casts: RefCell<u32>,
}

impl Wall
{
  fn new(distance: f32, object: ObjectId) -> Self
  {
    Self { distance, object, casts: RefCell::new(0) }
  }
}

impl RaycastProvider for Wall
{
  fn raycast(&self, _: Vec3, _: Vec3, _: f32, _: LayerMask) -> Option<RayHit>
  {
    None
  }

  fn sphere_cast(&self, origin: Vec3, _: f32, direction: Vec3, max_distance: f32, _: LayerMask) -> Option<RayHit>
  {
    *self.casts.borrow_mut() += 1;
    if self.distance > max_distance
    {
      return None;
    }
    Some(RayHit { point: origin + direction * self.distance, distance: self.distance, object: self.object })
  }
}

#[derive(Default)]
struct Keys
{
  horizontal: f32,
}

impl InputSource for Keys
{
  fn axis(&self, name: &str) -> f32
  {
    if name == "Horizontal" { self.horizontal } else { 0.0 }
  }

  fn key_held(&self, _key: Key) -> bool
  {
    false
  }

  fn key_down(&self, _key: Key) -> bool
  {
    false
  }
}

fn frame() -> FrameContext
{
  FrameContext::fixed(1.0 / 60.0)
}

fn snapping() -> RigConfig
{
  RigConfig { smoothing: false, look_at_height_offset: 0.0, ..RigConfig::default() }
}

fn recorded(rig: &mut CameraRig) -> Rc<RefCell<Vec<FollowEvent>>>
{
  let events = Rc::new(RefCell::new(Vec::new()));
  let sink = events.clone();
  rig.add_observer(move |e: FollowEvent| sink.borrow_mut().push(e));
  events
}

//
// ──────────────────────────────────────────────────────────────
//   Clamping
// ──────────────────────────────────────────────────────────────
//

#[test]
fn targets_stay_in_range_every_frame()
{
  let mut rig = CameraRig::new(RigConfig::default());
  let cfg = rig.config.clone();

  let writes = [
    (500.0, -40.0, Vec3::new(-20.0, -5.0, 300.0)),
    (-3.0, 170.0, Vec3::new(250.0, 400.0, -1.0)),
    (16.0, 30.0, Vec3::new(50.0, 50.0, 50.0)),
    (f32::MAX, f32::MIN, Vec3::splat(1.0e9)),
  ];

  for (distance, tilt, look_at) in writes
  {
    rig.distance = distance;
    rig.tilt = tilt;
    rig.look_at = look_at;
    rig.add_to_position(1000.0, 0.0, -1000.0);

    rig.update(&frame(), &Services::none());

    assert!(rig.distance >= cfg.min_distance && rig.distance <= cfg.max_distance);
    assert!(rig.tilt >= cfg.min_tilt && rig.tilt <= cfg.max_tilt);
    assert!(rig.look_at.cmpge(cfg.min_bounds).all(), "{:?}", rig.look_at);
    assert!(rig.look_at.cmple(cfg.max_bounds).all(), "{:?}", rig.look_at);
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Follow / jump / reset
// ──────────────────────────────────────────────────────────────
//

#[test]
fn follow_with_snap_tracks_target()
{
  let scene = Scene::default().with(1, Vec3::new(30.0, 5.0, 40.0));
  let mut rig = CameraRig::new(snapping());
  let events = recorded(&mut rig);

  rig.follow(Some(ObjectId(1)), true, &scene);
  assert!(rig.is_following());
  assert_eq!(rig.look_at, Vec3::new(30.0, 5.0, 40.0));

  rig.update(&frame(), &Services::new(&scene, &NoPhysics));

  assert_eq!(rig.marker().position, Vec3::new(30.0, 5.0, 40.0));
  assert_eq!(rig.follow_target(), Some(ObjectId(1)));
  assert_eq!(*events.borrow(), vec![FollowEvent::Began(ObjectId(1))]);
}

#[test]
fn follow_converges_with_smoothing()
{
  let mut scene = Scene::default().with(1, Vec3::new(30.0, 5.0, 40.0));
  let mut rig = CameraRig::new(RigConfig { look_at_height_offset: 0.0, ..RigConfig::default() });

  rig.follow(Some(ObjectId(1)), false, &scene);
  for _ in 0..600
  {
    rig.update(&frame(), &Services::new(&scene, &NoPhysics));
  }
  assert!(rig.marker().position.abs_diff_eq(Vec3::new(30.0, 5.0, 40.0), 1e-3));

  // The target moves; the look-at point is slaved to it
  scene.objects.insert(ObjectId(1), TargetPose::at(Vec3::new(60.0, 5.0, 40.0)));
  rig.update(&frame(), &Services::new(&scene, &NoPhysics));
  assert_eq!(rig.look_at, Vec3::new(60.0, 5.0, 40.0));
}

#[test]
fn switching_targets_ends_previous_once()
{
  let scene = Scene::default().with(1, Vec3::new(30.0, 5.0, 40.0)).with(2, Vec3::new(70.0, 5.0, 10.0));
  let mut rig = CameraRig::new(snapping());
  let events = recorded(&mut rig);

  rig.follow(Some(ObjectId(1)), false, &scene);
  rig.follow(Some(ObjectId(2)), true, &scene);

  assert_eq!(
    *events.borrow(),
    vec![FollowEvent::Began(ObjectId(1)), FollowEvent::Ended(ObjectId(1)), FollowEvent::Began(ObjectId(2))]
  );
  assert_eq!(rig.follow_target(), Some(ObjectId(2)));
}

#[test]
fn end_follow_notifies_end_only()
{
  let scene = Scene::default().with(1, Vec3::new(30.0, 5.0, 40.0));
  let mut rig = CameraRig::new(snapping());
  rig.follow(Some(ObjectId(1)), false, &scene);

  let events = recorded(&mut rig);
  rig.end_follow();

  assert!(!rig.is_following());
  assert_eq!(*events.borrow(), vec![FollowEvent::Ended(ObjectId(1))]);

  // Ending again is silent
  rig.end_follow();
  assert_eq!(events.borrow().len(), 1);
}

#[test]
fn follow_none_clears_without_begin()
{
  let scene = Scene::default().with(1, Vec3::new(30.0, 5.0, 40.0));
  let mut rig = CameraRig::new(snapping());
  let events = recorded(&mut rig);

  rig.follow(None, true, &scene);
  assert!(!rig.is_following());
  assert!(events.borrow().is_empty());

  // A handle that does not resolve is treated like None
  rig.follow(Some(ObjectId(9)), true, &scene);
  assert!(!rig.is_following());
  assert!(events.borrow().is_empty());
}

#[test]
fn vanished_target_ends_follow()
{
  let mut scene = Scene::default().with(1, Vec3::new(30.0, 5.0, 40.0));
  let mut rig = CameraRig::new(snapping());
  let events = recorded(&mut rig);

  rig.follow(Some(ObjectId(1)), true, &scene);
  rig.update(&frame(), &Services::new(&scene, &NoPhysics));

  scene.objects.clear();
  rig.update(&frame(), &Services::new(&scene, &NoPhysics));

  assert!(!rig.is_following());
  assert_eq!(*events.borrow(), vec![FollowEvent::Began(ObjectId(1)), FollowEvent::Ended(ObjectId(1))]);
}

#[test]
fn jump_with_snap_moves_marker_immediately()
{
  let scene = Scene::default().with(1, Vec3::new(30.0, 5.0, 40.0));
  let mut rig = CameraRig::new(RigConfig::default());
  let events = recorded(&mut rig);
  rig.follow(Some(ObjectId(1)), false, &scene);

  let p = Vec3::new(80.0, 4.0, 12.0);
  rig.jump_to(p, true);

  assert!(!rig.is_following());
  assert_eq!(rig.marker().position, p);
  assert_eq!(rig.look_at, p);
  assert_eq!(events.borrow().last(), Some(&FollowEvent::Ended(ObjectId(1))));
}

#[test]
fn jump_without_snap_eases()
{
  let mut rig = CameraRig::new(RigConfig { look_at_height_offset: 0.0, ..RigConfig::default() });
  let start = rig.marker().position;

  rig.jump_to(Vec3::new(80.0, 0.0, 80.0), false);
  assert_eq!(rig.marker().position, start);

  rig.update(&frame(), &Services::none());
  let moved = rig.marker().position;
  assert!(moved.x > start.x && moved.x < 80.0);
}

#[test]
fn jump_to_object()
{
  let scene = Scene::default().with(3, Vec3::new(20.0, 6.0, 20.0));
  let mut rig = CameraRig::new(RigConfig::default());

  assert!(rig.jump_to_target(ObjectId(3), &scene, true));
  assert_eq!(rig.marker().position, Vec3::new(20.0, 6.0, 20.0));

  assert!(!rig.jump_to_target(ObjectId(4), &scene, true));
  assert_eq!(rig.look_at, Vec3::new(20.0, 6.0, 20.0));
}

#[test]
fn reset_with_position_and_snap()
{
  let mut rig = CameraRig::new(RigConfig::default());
  for _ in 0..5
  {
    rig.update(&frame(), &Services::none());
  }

  rig.look_at = Vec3::new(70.0, 10.0, 70.0);
  rig.distance = 25.0;
  rig.rotation = 45.0;
  rig.tilt = 20.0;
  for _ in 0..30
  {
    rig.update(&frame(), &Services::none());
  }

  rig.reset_to_initial_values(true, true);
  let initial = *rig.initial();

  assert_eq!(rig.look_at, initial.look_at);
  assert_eq!(rig.distance, initial.distance);
  assert_eq!(rig.rotation, initial.rotation);
  assert_eq!(rig.tilt, initial.tilt);
  assert_eq!(rig.current_distance(), initial.distance);
  assert_eq!(rig.current_rotation(), initial.rotation);
  assert_eq!(rig.current_tilt(), initial.tilt);
  assert_eq!(rig.marker().position, rig.look_at);
}

#[test]
fn reset_without_snap_keeps_smoothed_state()
{
  let mut rig = CameraRig::new(RigConfig::default());
  rig.distance = 25.0;
  for _ in 0..30
  {
    rig.update(&frame(), &Services::none());
  }
  let eased = rig.current_distance();

  rig.reset_to_initial_values(false, false);
  assert_eq!(rig.distance, 10.0);
  assert_eq!(rig.current_distance(), eased);
}

//
// ──────────────────────────────────────────────────────────────
//   Smoothing
// ──────────────────────────────────────────────────────────────
//

#[test]
fn distance_step_approaches_monotonically()
{
  let mut rig = CameraRig::new(RigConfig::default());
  rig.distance = 30.0;

  let mut previous = rig.current_distance();
  let mut frames = 0;

  while (30.0 - rig.current_distance()).abs() > 1e-3
  {
    rig.update(&frame(), &Services::none());
    let current = rig.current_distance();

    assert!(current > previous, "frame {frames}: {current} <= {previous}");
    assert!(current <= 30.0, "overshoot {current}");

    previous = current;
    frames += 1;
    assert!(frames < 300, "did not converge");
  }
}

#[test]
fn rotation_eases_the_short_way()
{
  let mut rig = CameraRig::new(RigConfig { rotation: 170.0, ..RigConfig::default() });
  rig.rotation = -170.0;

  rig.update(&frame(), &Services::none());

  // Moves up through 180 rather than back down through 0
  assert!(rig.current_rotation() > 170.0);
}

#[test]
fn disabled_smoothing_snaps()
{
  let mut rig = CameraRig::new(snapping());
  rig.distance = 30.0;
  rig.tilt = 60.0;
  rig.rotation = 12.0;
  rig.look_at = Vec3::new(40.0, 0.0, 40.0);

  rig.update(&frame(), &Services::none());

  assert_eq!(rig.current_distance(), 30.0);
  assert_eq!(rig.current_tilt(), 60.0);
  assert_eq!(rig.current_rotation(), 12.0);
  assert_eq!(rig.marker().position, Vec3::new(40.0, 3.0, 40.0));
}

#[test]
fn camera_orbits_marker()
{
  let mut rig = CameraRig::new(snapping());
  let pose = rig.update(&frame(), &Services::none());

  let offset = pose.position - rig.marker().position;
  assert!((offset.length() - rig.current_distance()).abs() < 1e-4);

  let to_marker = (rig.marker().position - pose.position).normalize();
  assert!(pose.forward().abs_diff_eq(to_marker, 1e-4));
}

//
// ──────────────────────────────────────────────────────────────
//   Input while following
// ──────────────────────────────────────────────────────────────
//

#[test]
fn pan_is_ignored_while_following_unless_it_breaks_follow()
{
  let scene = Scene::default().with(1, Vec3::new(30.0, 5.0, 40.0));
  let mut rig = CameraRig::new(snapping());
  let mut mapper = InputMapper::new(MapperConfig { movement_breaks_follow: false, ..MapperConfig::default() });
  let input = Keys { horizontal: 1.0 };

  rig.follow(Some(ObjectId(1)), true, &scene);
  for _ in 0..10
  {
    mapper.apply(&input, &frame(), &mut rig);
    rig.update(&frame(), &Services::new(&scene, &NoPhysics));
  }

  assert!(rig.is_following());
  assert_eq!(rig.look_at, Vec3::new(30.0, 5.0, 40.0));
}

#[test]
fn pan_breaks_follow_when_configured()
{
  let scene = Scene::default().with(1, Vec3::new(30.0, 5.0, 40.0));
  let mut rig = CameraRig::new(snapping());
  let events = recorded(&mut rig);
  let mut mapper = InputMapper::default();

  rig.follow(Some(ObjectId(1)), true, &scene);
  mapper.apply(&Keys { horizontal: 1.0 }, &frame(), &mut rig);

  assert!(!rig.is_following());
  assert_eq!(events.borrow().last(), Some(&FollowEvent::Ended(ObjectId(1))));

  // The pan that broke follow is still applied; at yaw -90° screen-right is +Z
  rig.update(&frame(), &Services::new(&scene, &NoPhysics));
  assert!((rig.look_at.x - 30.0).abs() < 1e-4);
  assert!((rig.look_at.z - 40.25).abs() < 1e-4);
}

//
// ──────────────────────────────────────────────────────────────
//   Follow behind / visibility
// ──────────────────────────────────────────────────────────────
//

#[test]
fn follow_behind_overrides_rotation()
{
  let mut scene = Scene::default();
  scene
    .objects
    .insert(ObjectId(1), TargetPose { position: Vec3::new(50.0, 5.0, 50.0), forward: Vec3::X });

  let config = RigConfig { follow_behind: true, follow_rotation_offset: 10.0, ..RigConfig::default() };
  let mut rig = CameraRig::new(config);

  rig.follow(Some(ObjectId(1)), true, &scene);
  rig.update(&frame(), &Services::new(&scene, &NoPhysics));

  assert!((rig.rotation - 100.0).abs() < 1e-3);
  assert!((rig.current_rotation() - 100.0).abs() < 1e-3);
}

#[test]
fn obstacle_pulls_camera_in()
{
  let scene = Scene::default().with(1, Vec3::new(50.0, 5.0, 50.0));
  let wall = Wall::new(4.0, ObjectId(7));

  let config = RigConfig { target_visibility_via_physics: true, ..snapping() };
  let mut rig = CameraRig::new(config);
  assert!(rig.current_distance() > 4.0);

  rig.follow(Some(ObjectId(1)), true, &scene);
  rig.update(&frame(), &Services::new(&scene, &wall));

  assert_eq!(*wall.casts.borrow(), 1);
  assert!(rig.current_distance() <= 4.0 - VISIBILITY_CLEARANCE + 1e-5);

  let camera = rig.pose().position;
  assert!((camera.distance(rig.marker().position) - rig.current_distance()).abs() < 1e-4);
}

#[test]
fn marker_hit_is_not_an_obstacle()
{
  let scene = Scene::default().with(1, Vec3::new(50.0, 5.0, 50.0));
  let wall = Wall::new(4.0, ObjectId::MARKER);

  let mut rig = CameraRig::new(RigConfig { target_visibility_via_physics: true, ..snapping() });
  rig.follow(Some(ObjectId(1)), true, &scene);
  rig.update(&frame(), &Services::new(&scene, &wall));

  assert_eq!(rig.current_distance(), 10.0);
}

#[test]
fn visibility_waits_until_marker_reaches_target()
{
  let scene = Scene::default().with(1, Vec3::new(90.0, 5.0, 90.0));
  let wall = Wall::new(4.0, ObjectId(7));

  let config =
    RigConfig { target_visibility_via_physics: true, look_at_height_offset: 0.0, ..RigConfig::default() };
  let mut rig = CameraRig::new(config);

  // Not snapped: marker is still far from the target on the first frame
  rig.follow(Some(ObjectId(1)), false, &scene);
  rig.update(&frame(), &Services::new(&scene, &wall));

  assert_eq!(*wall.casts.borrow(), 0);
  assert_eq!(rig.current_distance(), 10.0);
}

#[test]
fn visibility_is_skipped_in_free_mode()
{
  let wall = Wall::new(4.0, ObjectId(7));
  let mut rig = CameraRig::new(RigConfig { target_visibility_via_physics: true, ..snapping() });

  rig.update(&frame(), &Services::new(&Scene::default(), &wall));
  assert_eq!(*wall.casts.borrow(), 0);
}
