//! Poll-style input state folded from winit window events

use crate::{HostKey, HostMouseButton, InputSource};
use std::collections::{HashSet, VecDeque};
use std::time::Instant;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key, KeyLocation, NamedKey};
use winit::window::Window;

/// Typed characters kept around when the UI consumes one per frame
const MAX_QUEUED_CHARS: usize = 64;

/// Map a winit key to the host key set
pub fn winit_key_to_host_key(key: &Key, location: KeyLocation) -> Option<HostKey> {
    match key {
        Key::Character(s) => match s.chars().next()? {
            'a' | 'A' => Some(HostKey::A),
            'c' | 'C' => Some(HostKey::C),
            'v' | 'V' => Some(HostKey::V),
            'x' | 'X' => Some(HostKey::X),
            'y' | 'Y' => Some(HostKey::Y),
            'z' | 'Z' => Some(HostKey::Z),
            _ => None,
        },
        Key::Named(named_key) => match named_key {
            NamedKey::Tab => Some(HostKey::Tab),
            NamedKey::ArrowLeft => Some(HostKey::Left),
            NamedKey::ArrowRight => Some(HostKey::Right),
            NamedKey::ArrowUp => Some(HostKey::Up),
            NamedKey::ArrowDown => Some(HostKey::Down),
            NamedKey::PageUp => Some(HostKey::PageUp),
            NamedKey::PageDown => Some(HostKey::PageDown),
            NamedKey::Home => Some(HostKey::Home),
            NamedKey::End => Some(HostKey::End),
            NamedKey::Insert => Some(HostKey::Insert),
            NamedKey::Delete => Some(HostKey::Delete),
            NamedKey::Backspace => Some(HostKey::Backspace),
            NamedKey::Space => Some(HostKey::Space),
            NamedKey::Enter => match location {
                KeyLocation::Numpad => Some(HostKey::KeypadEnter),
                _ => Some(HostKey::Enter),
            },
            NamedKey::Escape => Some(HostKey::Escape),
            // Modifier keys - distinguish left/right, default to left
            NamedKey::Shift => match location {
                KeyLocation::Right => Some(HostKey::RightShift),
                _ => Some(HostKey::LeftShift),
            },
            NamedKey::Control => match location {
                KeyLocation::Right => Some(HostKey::RightControl),
                _ => Some(HostKey::LeftControl),
            },
            NamedKey::Alt => match location {
                KeyLocation::Right => Some(HostKey::RightAlt),
                _ => Some(HostKey::LeftAlt),
            },
            NamedKey::Super => match location {
                KeyLocation::Right => Some(HostKey::RightSuper),
                _ => Some(HostKey::LeftSuper),
            },
            _ => None,
        },
        _ => None,
    }
}

fn host_mouse_button(button: MouseButton) -> Option<HostMouseButton> {
    match button {
        MouseButton::Left => Some(HostMouseButton::Left),
        MouseButton::Right => Some(HostMouseButton::Right),
        MouseButton::Middle => Some(HostMouseButton::Middle),
        _ => None,
    }
}

/// Input state for one winit window.
///
/// Feed it every [`WindowEvent`], call [`begin_frame`](Self::begin_frame)
/// before polling and [`end_frame`](Self::end_frame) after the frame is
/// presented so edges and the wheel reset.
#[derive(Debug)]
pub struct WinitInput {
    down: HashSet<HostKey>,
    pressed: HashSet<HostKey>,
    released: HashSet<HostKey>,
    buttons: HashSet<HostMouseButton>,
    mouse_position: [f32; 2],
    wheel: f32,
    chars: VecDeque<char>,
    physical_size: PhysicalSize<u32>,
    scale_factor: f64,
    last_frame: Instant,
    frame_time: f32,
}

impl WinitInput {
    pub fn new(window: &Window) -> Self {
        Self::with_size(window.inner_size(), window.scale_factor())
    }

    pub fn with_size(physical_size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        Self {
            down: HashSet::new(),
            pressed: HashSet::new(),
            released: HashSet::new(),
            buttons: HashSet::new(),
            mouse_position: [0.0, 0.0],
            wheel: 0.0,
            chars: VecDeque::new(),
            physical_size,
            scale_factor,
            last_frame: Instant::now(),
            frame_time: 0.0,
        }
    }

    /// Fold one window event into the state
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::Resized(size) => self.physical_size = *size,
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = *scale_factor;
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let pressed = event.state == ElementState::Pressed;
                if let Some(key) = winit_key_to_host_key(&event.logical_key, event.location) {
                    self.key_changed(key, pressed);
                }
                if pressed && let Some(text) = &event.text {
                    for character in text.chars() {
                        self.push_char(character);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => self.cursor_moved(*position),
            WindowEvent::MouseInput { button, state, .. } => {
                if let Some(button) = host_mouse_button(*button) {
                    self.button_changed(button, *state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.wheel += match delta {
                    MouseScrollDelta::LineDelta(_, v) => *v,
                    // Scale pixel delta
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
            }
            WindowEvent::Focused(false) => {
                // Nothing stays held while the window is unfocused
                self.released.extend(self.down.drain());
                self.buttons.clear();
            }
            _ => {}
        }
    }

    /// Stamp the frame time. Call once per frame before polling.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        self.frame_time = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
    }

    /// Forget this frame's edges and wheel movement
    pub fn end_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
        self.wheel = 0.0;
    }

    pub fn is_shift_down(&self) -> bool {
        self.down.contains(&HostKey::LeftShift) || self.down.contains(&HostKey::RightShift)
    }

    fn key_changed(&mut self, key: HostKey, pressed: bool) {
        if pressed {
            // Key repeat arrives as more presses; only the first is an edge
            if self.down.insert(key) {
                self.pressed.insert(key);
            }
        } else if self.down.remove(&key) {
            self.released.insert(key);
        }
    }

    fn button_changed(&mut self, button: HostMouseButton, pressed: bool) {
        if pressed {
            self.buttons.insert(button);
        } else {
            self.buttons.remove(&button);
        }
    }

    fn cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        let logical = position.to_logical::<f64>(self.scale_factor);
        self.mouse_position = [logical.x as f32, logical.y as f32];
    }

    fn push_char(&mut self, character: char) {
        if self.chars.len() < MAX_QUEUED_CHARS {
            self.chars.push_back(character);
        }
    }
}

impl InputSource for WinitInput {
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
        self.buttons.contains(&button)
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
        let logical = self.physical_size.to_logical::<f64>(self.scale_factor);
        [logical.width as f32, logical.height as f32]
    }

    fn frame_time(&self) -> f32 {
        self.frame_time
    }
}
