//! Blender-style camera controls
//!
//! Maps raw mouse input onto a look-at [`Camera`]:
//!
//! - **Dolly**: mouse wheel, or right-drag vertically
//! - **Orbit**: middle-drag rotates around the target
//! - **Pan**: shift + middle-drag slides target and position together
//!
//! The controller does not read any input device itself. The caller fills a
//! [`CameraInput`] every frame, typically only when the UI is not capturing
//! the mouse.
//!
//! # Example
//!
//! ```rust
//! use blender_camera::{Camera, CameraController, CameraInput, Gesture};
//! use glam::Vec2;
//!
//! let mut camera = Camera::default();
//! let mut controller = CameraController::default();
//!
//! let gesture = controller.update(&mut camera, &CameraInput {
//!     mouse_position: Vec2::new(400.0, 300.0),
//!     wheel: 1.0,
//!     ..Default::default()
//! });
//! assert_eq!(gesture, Some(Gesture::WheelDolly));
//! ```

mod camera;
mod controller;

pub use camera::*;
pub use controller::*;

// Re-export glam to make it easier for users to use the correct version.
pub use glam;
