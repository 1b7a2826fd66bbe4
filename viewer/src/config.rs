use blender_camera::Sensitivity;
use tracing::warn;

/// Environment variable that turns vsync on (`1`) or off (`0`)
pub const VSYNC_ENV: &str = "ORBIT_VIEWER_VSYNC";

/// Viewer configuration
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub window_title: String,
    pub window_size: (f64, f64),
    pub vsync: bool,
    pub clear_color: [f32; 4],
    /// Grid cells across, split evenly around the origin
    pub grid_slices: u32,
    pub grid_spacing: f32,
    pub cube_size: f32,
    pub cube_color: [f32; 4],
    pub sensitivity: Sensitivity,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: format!("Orbit Viewer - {}", env!("CARGO_PKG_VERSION")),
            window_size: (1920.0, 1080.0),
            vsync: true,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            grid_slices: 10,
            grid_spacing: 1.0,
            cube_size: 1.0,
            cube_color: [1.0, 1.0, 1.0, 1.0],
            sensitivity: Sensitivity::default(),
        }
    }
}

impl ViewerConfig {
    /// Defaults with overrides from the environment applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_vsync_override(std::env::var(VSYNC_ENV).ok().as_deref());
        config
    }

    fn apply_vsync_override(&mut self, value: Option<&str>) {
        match value.map(str::trim) {
            None => {}
            Some("1") | Some("true") | Some("on") => self.vsync = true,
            Some("0") | Some("false") | Some("off") => self.vsync = false,
            Some(other) => warn!("Ignoring {VSYNC_ENV}={other:?}, expected 0 or 1"),
        }
    }
}
