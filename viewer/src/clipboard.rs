//! System clipboard via arboard

use dear_imgui_poll::HostClipboard;
use tracing::{debug, warn};

pub struct ArboardClipboard {
    inner: arboard::Clipboard,
}

impl ArboardClipboard {
    /// Open the system clipboard, or `None` when the platform has none
    pub fn open() -> Option<Self> {
        match arboard::Clipboard::new() {
            Ok(inner) => Some(Self { inner }),
            Err(err) => {
                warn!("System clipboard unavailable: {err}");
                None
            }
        }
    }
}

impl HostClipboard for ArboardClipboard {
    fn get_text(&mut self) -> Option<String> {
        match self.inner.get_text() {
            Ok(text) => Some(text),
            Err(err) => {
                debug!("Clipboard read failed: {err}");
                None
            }
        }
    }

    fn set_text(&mut self, text: &str) {
        if let Err(err) = self.inner.set_text(text.to_owned()) {
            warn!("Clipboard write failed: {err}");
        }
    }
}
