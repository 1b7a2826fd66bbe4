//! Where the bridge writes a frame's input

use crate::{HostMouseButton, Modifiers};
use dear_imgui_rs::input::MouseButton;
use dear_imgui_rs::{Io, Key};

/// The UI library's input model
pub trait UiInputSink {
    fn set_display_size(&mut self, size: [f32; 2]);
    fn set_framebuffer_scale(&mut self, scale: [f32; 2]);
    fn set_delta_time(&mut self, delta_time: f32);
    fn add_mouse_pos(&mut self, pos: [f32; 2]);
    fn add_mouse_button(&mut self, button: HostMouseButton, down: bool);
    /// Wheel movement is accumulated by the sink, never overwritten
    fn add_mouse_wheel(&mut self, horizontal: f32, vertical: f32);
    fn add_key(&mut self, key: Key, down: bool);
    fn set_modifiers(&mut self, modifiers: Modifiers);
    fn add_char(&mut self, character: char);
}

impl From<HostMouseButton> for MouseButton {
    fn from(button: HostMouseButton) -> Self {
        match button {
            HostMouseButton::Left => MouseButton::Left,
            HostMouseButton::Right => MouseButton::Right,
            HostMouseButton::Middle => MouseButton::Middle,
        }
    }
}

impl UiInputSink for Io {
    fn set_display_size(&mut self, size: [f32; 2]) {
        Io::set_display_size(self, size);
    }

    fn set_framebuffer_scale(&mut self, scale: [f32; 2]) {
        self.set_display_framebuffer_scale(scale);
    }

    fn set_delta_time(&mut self, delta_time: f32) {
        Io::set_delta_time(self, delta_time);
    }

    fn add_mouse_pos(&mut self, pos: [f32; 2]) {
        self.add_mouse_pos_event(pos);
    }

    fn add_mouse_button(&mut self, button: HostMouseButton, down: bool) {
        self.add_mouse_button_event(button.into(), down);
    }

    fn add_mouse_wheel(&mut self, horizontal: f32, vertical: f32) {
        // Wheel events queue up inside ImGui and are summed per frame.
        self.add_mouse_wheel_event([horizontal, vertical]);
    }

    fn add_key(&mut self, key: Key, down: bool) {
        self.add_key_event(key, down);
    }

    fn set_modifiers(&mut self, modifiers: Modifiers) {
        // Our Key enum has Left/Right variants instead of Mod variants
        self.add_key_event(Key::LeftShift, modifiers.shift);
        self.add_key_event(Key::RightShift, modifiers.shift);
        self.add_key_event(Key::LeftCtrl, modifiers.ctrl);
        self.add_key_event(Key::RightCtrl, modifiers.ctrl);
        self.add_key_event(Key::LeftAlt, modifiers.alt);
        self.add_key_event(Key::RightAlt, modifiers.alt);
        self.add_key_event(Key::LeftSuper, modifiers.super_key);
        self.add_key_event(Key::RightSuper, modifiers.super_key);
    }

    fn add_char(&mut self, character: char) {
        self.add_input_character(character);
    }
}
