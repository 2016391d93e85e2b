pub mod debug;
pub mod follow;
pub mod pose;
pub mod rig;
pub mod smoothing;
pub mod uniform;

pub use debug::DebugLines;
pub use follow::{FollowEvent, FollowObserver};
pub use pose::{CameraPose, Lens, Projection};
pub use rig::{CameraRig, Dampening, Marker, OrbitSnapshot};
pub use uniform::CameraUniform;
