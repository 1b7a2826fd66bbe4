//! The per-frame input bridge

use crate::{
    ClipboardPassthrough, HostClipboard, HostKey, HostMouseButton, InputSource, Modifiers,
    RECOGNIZED_KEYS, UiInputSink,
};
use dear_imgui_rs::Context;
use tracing::warn;

/// Smallest delta time handed to Dear ImGui, which rejects zero
const MIN_DELTA_TIME: f32 = 1.0e-5;

/// Copies a snapshot of host input into Dear ImGui once per frame
#[derive(Debug, Default)]
pub struct PollPlatform {
    _private: (),
}

impl PollPlatform {
    /// Create the bridge and announce it to the context
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dear_imgui_rs::Context;
    /// use dear_imgui_poll::PollPlatform;
    ///
    /// let mut imgui_ctx = Context::create();
    /// let platform = PollPlatform::new(&mut imgui_ctx);
    /// ```
    pub fn new(imgui_ctx: &mut Context) -> Self {
        if let Err(err) = imgui_ctx.set_platform_name(Some(format!(
            "dear-imgui-poll {}",
            env!("CARGO_PKG_VERSION")
        ))) {
            warn!("Failed to set platform name: {err}");
        }
        if let Err(err) = imgui_ctx.set_ini_filename(None::<String>) {
            warn!("Failed to disable ini file: {err}");
        }
        Self { _private: () }
    }

    /// Route Dear ImGui's clipboard through `host`
    pub fn attach_clipboard<H: HostClipboard>(&self, imgui_ctx: &mut Context, host: H) {
        imgui_ctx.set_clipboard_backend(ClipboardPassthrough(host));
    }

    /// Whether the UI wants the mouse for itself.
    ///
    /// Reflects the last built frame, so read it before starting the next
    /// one to decide whether the application may react to the mouse.
    pub fn wants_mouse(imgui_ctx: &Context) -> bool {
        imgui_ctx.io().want_capture_mouse()
    }

    /// Write this frame's input into the UI. Run before building widgets.
    pub fn prepare_frame<S, U>(&mut self, source: &mut S, ui: &mut U)
    where
        S: InputSource + ?Sized,
        U: UiInputSink + ?Sized,
    {
        // Multi-DPI scaling is not handled.
        ui.set_display_size(source.screen_size());
        ui.set_framebuffer_scale([1.0, 1.0]);
        ui.set_delta_time(source.frame_time().max(MIN_DELTA_TIME));

        ui.add_mouse_pos(source.mouse_position());
        for button in [
            HostMouseButton::Left,
            HostMouseButton::Right,
            HostMouseButton::Middle,
        ] {
            ui.add_mouse_button(button, source.is_mouse_button_down(button));
        }

        let wheel = source.mouse_wheel();
        if wheel != 0.0 {
            ui.add_mouse_wheel(0.0, wheel);
        }

        for &(host, key) in RECOGNIZED_KEYS {
            if source.is_key_pressed(host) {
                ui.add_key(key, true);
            }
            if source.is_key_released(host) {
                ui.add_key(key, false);
            }
        }

        let either = |left, right| source.is_key_down(left) || source.is_key_down(right);
        ui.set_modifiers(Modifiers {
            ctrl: either(HostKey::LeftControl, HostKey::RightControl),
            shift: either(HostKey::LeftShift, HostKey::RightShift),
            alt: either(HostKey::LeftAlt, HostKey::RightAlt),
            super_key: either(HostKey::LeftSuper, HostKey::RightSuper),
        });

        if let Some(character) = source.take_char().filter(|c| !c.is_control()) {
            ui.add_char(character);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{Event, RecordingSink, ScriptedInput};
    use dear_imgui_rs::Key;
    use pretty_assertions::assert_eq;

    fn run(source: &mut ScriptedInput) -> RecordingSink {
        let mut sink = RecordingSink::default();
        PollPlatform::default().prepare_frame(source, &mut sink);
        sink
    }

    #[test]
    fn display_and_timing_are_forwarded_with_unit_scale() {
        let mut source = ScriptedInput {
            screen_size: [1920.0, 1080.0],
            frame_time: 0.016,
            ..Default::default()
        };
        let sink = run(&mut source);

        assert_eq!(
            &sink.events[..3],
            &[
                Event::DisplaySize([1920.0, 1080.0]),
                Event::FramebufferScale([1.0, 1.0]),
                Event::DeltaTime(0.016),
            ]
        );
    }

    #[test]
    fn zero_frame_time_is_raised_to_a_positive_value() {
        let mut source = ScriptedInput::default();
        let sink = run(&mut source);
        assert!(sink.events.contains(&Event::DeltaTime(MIN_DELTA_TIME)));
    }

    #[test]
    fn mouse_state_is_forwarded() {
        let mut source = ScriptedInput {
            mouse_position: [12.0, 34.0],
            ..Default::default()
        };
        source.buttons_down.insert(HostMouseButton::Middle);
        let sink = run(&mut source);

        assert!(sink.events.contains(&Event::MousePos([12.0, 34.0])));
        assert!(
            sink.events
                .contains(&Event::MouseButton(HostMouseButton::Left, false))
        );
        assert!(
            sink.events
                .contains(&Event::MouseButton(HostMouseButton::Middle, true))
        );
    }

    #[test]
    fn wheel_is_added_not_set() {
        let mut source = ScriptedInput {
            wheel: 1.5,
            ..Default::default()
        };
        let mut sink = RecordingSink::default();
        let mut platform = PollPlatform::default();
        platform.prepare_frame(&mut source, &mut sink);
        platform.prepare_frame(&mut source, &mut sink);

        assert_eq!(sink.wheel, [0.0, 3.0]);
    }

    #[test]
    fn recognized_keys_follow_press_and_release_edges() {
        let mut source = ScriptedInput::default();
        source.pressed.insert(HostKey::Enter);
        source.released.insert(HostKey::Backspace);
        let sink = run(&mut source);

        let keys: Vec<&Event> = sink
            .events
            .iter()
            .filter(|e| matches!(e, Event::Key(..)))
            .collect();
        assert_eq!(
            keys,
            vec![&Event::Key(Key::Backspace, false), &Event::Key(Key::Enter, true)]
        );
    }

    #[test]
    fn held_keys_without_edges_send_nothing() {
        let mut source = ScriptedInput::default();
        source.down.insert(HostKey::Tab);
        let sink = run(&mut source);
        assert!(!sink.events.iter().any(|e| matches!(e, Event::Key(..))));
    }

    #[test]
    fn modifiers_are_the_or_of_left_and_right() {
        let mut source = ScriptedInput::default();
        source.down.insert(HostKey::RightControl);
        source.down.insert(HostKey::LeftShift);
        let sink = run(&mut source);

        assert!(sink.events.contains(&Event::Modifiers(Modifiers {
            ctrl: true,
            shift: true,
            alt: false,
            super_key: false,
        })));
    }

    #[test]
    fn at_most_one_character_per_frame() {
        let mut source = ScriptedInput::default();
        source.chars.extend(['h', 'i']);
        let first = run(&mut source);
        let second = run(&mut source);
        let third = run(&mut source);

        let chars = |sink: &RecordingSink| -> Vec<char> {
            sink.events
                .iter()
                .filter_map(|e| match e {
                    Event::Char(c) => Some(*c),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(chars(&first), vec!['h']);
        assert_eq!(chars(&second), vec!['i']);
        assert!(chars(&third).is_empty());
    }

    #[test]
    fn control_characters_are_dropped() {
        let mut source = ScriptedInput::default();
        source.chars.push_back('\u{8}');
        let sink = run(&mut source);
        assert!(!sink.events.iter().any(|e| matches!(e, Event::Char(_))));
    }
}
