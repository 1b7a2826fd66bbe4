//! Mouse gestures mapped onto the camera

use crate::Camera;
use glam::{Quat, Vec2, Vec3};
use tracing::trace;

/// Closest the camera may dolly towards its target
pub const MIN_DISTANCE: f32 = 0.1;

/// Per-gesture scale factors
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Sensitivity {
    /// Fraction of the distance covered per wheel notch
    pub wheel: f32,
    /// Fraction of the distance covered per pixel of right-drag
    pub drag_zoom: f32,
    /// Radians per pixel of middle-drag
    pub rotate: f32,
    /// Distance-relative translation per pixel of shift+middle-drag
    pub pan: f32,
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self {
            wheel: 0.2,
            drag_zoom: 0.002,
            rotate: 0.005,
            pan: 0.0007,
        }
    }
}

/// One frame of raw input, already known not to be consumed by the UI
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraInput {
    pub mouse_position: Vec2,
    /// Wheel notches this frame, positive away from the user
    pub wheel: f32,
    pub right_down: bool,
    pub middle_down: bool,
    pub shift_down: bool,
}

/// The gesture a frame's input was interpreted as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    WheelDolly,
    DragDolly,
    Orbit,
    Pan,
}

/// Blender-like orbit, pan and dolly controls.
///
/// Gestures are checked in priority order and the first match wins:
///
/// 1. wheel moved: dolly by the wheel
/// 2. right button held with vertical motion: dolly by the motion
/// 3. middle button held: orbit around the target
/// 4. shift + middle button held: pan target and position together
///
/// The only state kept between frames is the previous mouse position. It
/// starts unset and is taken from the first sample, so the first frame
/// never sees a spurious delta.
#[derive(Debug, Clone, Default)]
pub struct CameraController {
    previous_mouse: Option<Vec2>,
    sensitivity: Sensitivity,
}

impl CameraController {
    pub fn new(sensitivity: Sensitivity) -> Self {
        Self {
            previous_mouse: None,
            sensitivity,
        }
    }

    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    pub fn set_sensitivity(&mut self, sensitivity: Sensitivity) {
        self.sensitivity = sensitivity;
    }

    /// Forget the previous mouse position, e.g. after the UI held the mouse
    pub fn reset_tracking(&mut self) {
        self.previous_mouse = None;
    }

    /// Apply this frame's input with the controller's own sensitivity
    pub fn update(&mut self, camera: &mut Camera, input: &CameraInput) -> Option<Gesture> {
        let sensitivity = self.sensitivity;
        self.update_with(camera, input, &sensitivity)
    }

    /// Apply this frame's input with the given sensitivity
    pub fn update_with(
        &mut self,
        camera: &mut Camera,
        input: &CameraInput,
        sensitivity: &Sensitivity,
    ) -> Option<Gesture> {
        let delta = self.mouse_delta(input.mouse_position);

        let gesture = if input.wheel != 0.0 {
            dolly(camera, input.wheel * sensitivity.wheel);
            Gesture::WheelDolly
        } else if input.right_down && delta.y != 0.0 {
            dolly(camera, delta.y * sensitivity.drag_zoom);
            Gesture::DragDolly
        } else if input.middle_down && !input.shift_down {
            orbit(camera, delta, sensitivity.rotate);
            Gesture::Orbit
        } else if input.middle_down {
            pan(camera, delta, sensitivity.pan);
            Gesture::Pan
        } else {
            return None;
        };

        trace!(?gesture, ?delta, "camera gesture");
        Some(gesture)
    }

    fn mouse_delta(&mut self, mouse_position: Vec2) -> Vec2 {
        let previous = self.previous_mouse.replace(mouse_position);
        previous.map_or(Vec2::ZERO, |previous| mouse_position - previous)
    }
}

/// Move the camera along its view axis, keeping the target.
///
/// The new distance is `max(MIN_DISTANCE, d - d * amount)`.
pub fn dolly(camera: &mut Camera, amount: f32) {
    let offset = camera.position - camera.target;
    let distance = offset.length();
    let Some(direction) = offset.try_normalize() else {
        return;
    };
    let distance = (distance - distance * amount).max(MIN_DISTANCE);
    camera.position = camera.target + direction * distance;
}

/// Rotate the camera around its target.
///
/// Horizontal motion yaws about world Y, vertical motion pitches about the
/// camera's right axis. Each rotation only runs when its own delta is
/// nonzero.
pub fn orbit(camera: &mut Camera, delta: Vec2, rotate: f32) {
    if delta.x != 0.0 {
        let yaw = Quat::from_axis_angle(Vec3::Y, -rotate * delta.x);
        camera.position = camera.target + yaw * (camera.position - camera.target);
        camera.up = yaw * camera.up;
    }

    if delta.y != 0.0 {
        let (right, up) = camera_basis(camera);
        let pitch = Quat::from_axis_angle(right, rotate * delta.y);
        camera.position = camera.target + pitch * (camera.position - camera.target);
        camera.up = up;
    }
}

/// Translate target and position together in the view plane.
///
/// The move is `distance * pan * (dy * up + dx * right)`, so distance and
/// view direction never change.
pub fn pan(camera: &mut Camera, delta: Vec2, pan: f32) {
    let (right, up) = camera_basis(camera);
    let scale = camera.distance() * pan;
    let movement = up * (scale * delta.y) + right * (scale * delta.x);
    camera.target += movement;
    camera.position += movement;
}

/// Right and re-orthogonalized up axes of the camera.
///
/// A zero-length up falls back to world Y, and so does an up parallel to
/// the view axis.
fn camera_basis(camera: &Camera) -> (Vec3, Vec3) {
    let forward = camera.position - camera.target;
    let up = if camera.up.length() <= f32::EPSILON {
        Vec3::Y
    } else {
        camera.up
    };
    let right = forward
        .cross(up)
        .try_normalize()
        .or_else(|| forward.cross(Vec3::Y).try_normalize())
        .unwrap_or(Vec3::X);
    let up = right.cross(forward).normalize_or(Vec3::Y);
    (right, up)
}
