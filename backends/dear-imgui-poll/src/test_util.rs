use crate::{HostKey, HostMouseButton, InputSource, Modifiers, UiInputSink};
use dear_imgui_rs::Key;
use std::collections::{HashSet, VecDeque};

/// Input source whose state is set directly by the test
#[derive(Debug, Default)]
pub(crate) struct ScriptedInput {
    pub(crate) pressed: HashSet<HostKey>,
    pub(crate) released: HashSet<HostKey>,
    pub(crate) down: HashSet<HostKey>,
    pub(crate) buttons_down: HashSet<HostMouseButton>,
    pub(crate) mouse_position: [f32; 2],
    pub(crate) wheel: f32,
    pub(crate) chars: VecDeque<char>,
    pub(crate) screen_size: [f32; 2],
    pub(crate) frame_time: f32,
}

impl InputSource for ScriptedInput {
    fn is_key_pressed(&self, key: HostKey) -> bool {
        self.pressed.contains(&key)
    }

    fn is_key_released(&self, key: HostKey) -> bool {
        self.released.contains(&key)
    }

    fn is_key_down(&self, key: HostKey) -> bool {
        self.down.contains(&key)
    }

    fn is_mouse_button_down(&self, button: HostMouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    fn mouse_position(&self) -> [f32; 2] {
        self.mouse_position
    }

    fn mouse_wheel(&self) -> f32 {
        self.wheel
    }

    fn take_char(&mut self) -> Option<char> {
        self.chars.pop_front()
    }

    fn screen_size(&self) -> [f32; 2] {
        self.screen_size
    }

    fn frame_time(&self) -> f32 {
        self.frame_time
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    DisplaySize([f32; 2]),
    FramebufferScale([f32; 2]),
    DeltaTime(f32),
    MousePos([f32; 2]),
    MouseButton(HostMouseButton, bool),
    Key(Key, bool),
    Modifiers(Modifiers),
    Char(char),
}

/// Sink that records events and sums the wheel the way ImGui does
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub(crate) events: Vec<Event>,
    pub(crate) wheel: [f32; 2],
}

impl UiInputSink for RecordingSink {
    fn set_display_size(&mut self, size: [f32; 2]) {
        self.events.push(Event::DisplaySize(size));
    }

    fn set_framebuffer_scale(&mut self, scale: [f32; 2]) {
        self.events.push(Event::FramebufferScale(scale));
    }

    fn set_delta_time(&mut self, delta_time: f32) {
        self.events.push(Event::DeltaTime(delta_time));
    }

    fn add_mouse_pos(&mut self, pos: [f32; 2]) {
        self.events.push(Event::MousePos(pos));
    }

    fn add_mouse_button(&mut self, button: HostMouseButton, down: bool) {
        self.events.push(Event::MouseButton(button, down));
    }

    fn add_mouse_wheel(&mut self, horizontal: f32, vertical: f32) {
        self.wheel[0] += horizontal;
        self.wheel[1] += vertical;
    }

    fn add_key(&mut self, key: Key, down: bool) {
        self.events.push(Event::Key(key, down));
    }

    fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.events.push(Event::Modifiers(modifiers));
    }

    fn add_char(&mut self, character: char) {
        self.events.push(Event::Char(character));
    }
}
