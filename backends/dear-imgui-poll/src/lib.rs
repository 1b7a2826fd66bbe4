//! Poll-style input bridge for Dear ImGui
//!
//! Hosts that expose input as "what is the state right now" queries instead
//! of an event stream can use [`PollPlatform`] to copy a snapshot of that
//! state into Dear ImGui once per frame: display size, delta time, mouse
//! position and buttons, wheel, key edges for a fixed key set, modifiers and
//! one typed character.
//!
//! # Features
//!
//! - **Input seam**: the [`InputSource`] trait is the host side, the
//!   [`UiInputSink`] trait is the UI side (implemented for [`Io`](dear_imgui_rs::Io))
//! - **Clipboard**: [`HostClipboard`] routes copy and paste through the host
//! - **winit**: [`WinitInput`] folds winit window events into a pollable
//!   snapshot (feature `winit`, enabled by default)
//!
//! # Example
//!
//! ```rust,no_run
//! use dear_imgui_rs::Context;
//! use dear_imgui_poll::{InputSource, PollPlatform};
//!
//! fn frame(imgui: &mut Context, platform: &mut PollPlatform, input: &mut impl InputSource) {
//!     platform.prepare_frame(input, imgui.io_mut());
//!     let ui = imgui.frame();
//!     ui.text("Hello");
//! }
//! ```

mod clipboard;
mod keys;
mod platform;
mod sink;
mod source;

#[cfg(feature = "winit")]
mod winit_source;

#[cfg(test)]
mod test_util;

pub use clipboard::*;
pub use keys::*;
pub use platform::*;
pub use sink::*;
pub use source::*;

#[cfg(feature = "winit")]
pub use winit_source::{WinitInput, winit_key_to_host_key};

// Re-export winit to make it easier for users to use the correct version.
#[cfg(feature = "winit")]
pub use winit;
