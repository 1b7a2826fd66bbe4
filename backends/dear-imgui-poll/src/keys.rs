//! Host key identifiers and the keys the UI gets to see

use dear_imgui_rs::Key;

/// Keys a host input source can report.
///
/// Only the keys the bridge or the application care about are named; an
/// input source simply never reports the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostKey {
    Tab,
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Insert,
    Delete,
    Backspace,
    Space,
    Enter,
    Escape,
    KeypadEnter,
    A,
    C,
    V,
    X,
    Y,
    Z,
    LeftShift,
    RightShift,
    LeftControl,
    RightControl,
    LeftAlt,
    RightAlt,
    LeftSuper,
    RightSuper,
}

/// Keys forwarded to Dear ImGui, in forwarding order.
///
/// Navigation and editing keys plus the letters behind the select-all,
/// copy, paste, cut, redo and undo shortcuts. Every other key stays with the
/// application.
pub const RECOGNIZED_KEYS: &[(HostKey, Key)] = &[
    (HostKey::Tab, Key::Tab),
    (HostKey::Left, Key::LeftArrow),
    (HostKey::Right, Key::RightArrow),
    (HostKey::Up, Key::UpArrow),
    (HostKey::Down, Key::DownArrow),
    (HostKey::PageUp, Key::PageUp),
    (HostKey::PageDown, Key::PageDown),
    (HostKey::Home, Key::Home),
    (HostKey::End, Key::End),
    (HostKey::Insert, Key::Insert),
    (HostKey::Delete, Key::Delete),
    (HostKey::Backspace, Key::Backspace),
    (HostKey::Space, Key::Space),
    (HostKey::Enter, Key::Enter),
    (HostKey::Escape, Key::Escape),
    (HostKey::KeypadEnter, Key::KeypadEnter),
    (HostKey::A, Key::A),
    (HostKey::C, Key::C),
    (HostKey::V, Key::V),
    (HostKey::X, Key::X),
    (HostKey::Y, Key::Y),
    (HostKey::Z, Key::Z),
];

/// Modifier state, each flag the OR of its left and right key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub super_key: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn recognized_keys_are_unique() {
        let host: HashSet<HostKey> = RECOGNIZED_KEYS.iter().map(|(host, _)| *host).collect();
        assert_eq!(host.len(), RECOGNIZED_KEYS.len());
        assert_eq!(RECOGNIZED_KEYS.len(), 22);
    }

    #[test]
    fn modifier_keys_are_not_forwarded_directly() {
        let modifiers = [
            HostKey::LeftShift,
            HostKey::RightShift,
            HostKey::LeftControl,
            HostKey::RightControl,
        ];
        assert!(
            RECOGNIZED_KEYS
                .iter()
                .all(|(host, _)| !modifiers.contains(host))
        );
    }

    #[test]
    fn shortcut_letters_map_to_themselves() {
        let lookup = |host| {
            RECOGNIZED_KEYS
                .iter()
                .find(|(h, _)| *h == host)
                .map(|(_, key)| *key)
        };
        assert_eq!(lookup(HostKey::C), Some(Key::C));
        assert_eq!(lookup(HostKey::V), Some(Key::V));
        assert_eq!(lookup(HostKey::Z), Some(Key::Z));
    }
}
