//! Poll-style host input

use crate::HostKey;

/// Mouse buttons the bridge forwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostMouseButton {
    Left,
    Right,
    Middle,
}

/// Host input queried by polling, once per frame.
///
/// Edge queries (`is_key_pressed`, `is_key_released`) report transitions
/// since the previous frame; level queries report the current state.
pub trait InputSource {
    fn is_key_pressed(&self, key: HostKey) -> bool;
    fn is_key_released(&self, key: HostKey) -> bool;
    fn is_key_down(&self, key: HostKey) -> bool;
    fn is_mouse_button_down(&self, button: HostMouseButton) -> bool;
    /// Pointer position in window coordinates
    fn mouse_position(&self) -> [f32; 2];
    /// Vertical wheel movement since the previous frame, in lines
    fn mouse_wheel(&self) -> f32;
    /// Next typed character, if any. Each call consumes one.
    fn take_char(&mut self) -> Option<char>;
    /// Window size in logical pixels
    fn screen_size(&self) -> [f32; 2];
    /// Seconds since the previous frame
    fn frame_time(&self) -> f32;
}
