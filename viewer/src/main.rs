//! Orbit viewer: a grid and a cube under a Blender-style camera, with a
//! Dear ImGui debug panel drawn through the mesh backend.
//!
//! Controls:
//! - mouse wheel or right-drag: dolly
//! - middle-drag: orbit
//! - shift + middle-drag: pan
//! - Escape: quit
//!
//! Set `RUST_LOG` to change the log filter and `ORBIT_VIEWER_VSYNC=0` to
//! turn vsync off.

mod app;
mod clipboard;
mod config;
mod error;
mod panel;
mod scene;

use config::ViewerConfig;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "orbit_viewer=info,dear_imgui_mesh=info,dear_imgui_poll=info,blender_camera=info,warn"
            .into()
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

fn main() {
    init_tracing();

    let config = ViewerConfig::from_env();
    if let Err(e) = app::run(config) {
        error!("Viewer failed: {e}");
        std::process::exit(1);
    }
}
