//! Clipboard pass-through

use dear_imgui_rs::ClipboardBackend;

/// The host's clipboard
pub trait HostClipboard: 'static {
    fn get_text(&mut self) -> Option<String>;
    fn set_text(&mut self, text: &str);
}

/// Hands Dear ImGui's clipboard requests straight to the host
pub struct ClipboardPassthrough<H>(pub H);

impl<H: HostClipboard> ClipboardBackend for ClipboardPassthrough<H> {
    fn get(&mut self) -> Option<String> {
        self.0.get_text()
    }

    fn set(&mut self, value: &str) {
        self.0.set_text(value);
    }
}
