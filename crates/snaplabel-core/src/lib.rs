pub mod camera;
pub mod controller;
pub mod decode;
pub mod error;
pub mod permission;
pub mod render;
pub mod session;

pub use camera::Camera;
pub use controller::CaptureLabelController;
pub use error::{ControllerError, CycleError};
pub use permission::PermissionAuthority;
