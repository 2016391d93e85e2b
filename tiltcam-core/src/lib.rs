//! Orbit camera rig for top-down and third-person views.
//!
//! The rig orbits, pans, zooms and tilts a camera around a look-at point,
//! eases every axis toward its target, clamps everything into configured
//! ranges, and can follow an external object. Engine services (raycasts,
//! terrain height, follow-target transforms, input) are injected, so a host
//! drives it by calling [`InputMapper::apply`] and then [`CameraRig::update`]
//! once per frame.

pub mod camera;
pub mod config;
pub mod frame;
pub mod input;
pub mod services;
pub mod startup;

pub use camera::{CameraPose, CameraRig, CameraUniform, FollowEvent, FollowObserver, Lens, Marker, Projection};
pub use config::{ConfigError, MapperConfig, RigConfig};
pub use frame::FrameContext;
pub use input::{InputMapper, InputSource, Key, VirtualAxes};
pub use services::{
  HeightProvider, LayerMask, NoPhysics, NoTargets, ObjectId, RayHit, RaycastProvider, Services, TargetHandle, TargetPose,
  TargetSource,
};
