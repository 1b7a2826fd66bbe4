//! The debug panel and the images it shows

use crate::scene::SceneSettings;
use blender_camera::{Camera, Gesture};
use dear_imgui_mesh::{GlTexture, GlowDevice, MeshRenderer, RenderDevice, TextureUpload};
use dear_imgui_rs::{Condition, TextureId, Ui};
use tracing::debug;

const IMAGE_SIZE: u32 = 128;
const CHECKER_SIZE: u32 = 16;

/// Two-tone checkerboard, `cell` pixels per square
pub fn checkerboard_pixels(width: u32, height: u32, cell: u32) -> Vec<u8> {
    let cell = cell.max(1);
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let is_light = ((x / cell) + (y / cell)) % 2 == 0;
            let value = if is_light { 255 } else { 64 };
            data.extend_from_slice(&[value, value, value, 255]);
        }
    }
    data
}

/// Red grows to the right, green grows downwards, blue along the diagonal
pub fn gradient_pixels(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let r = (x as f32 / width as f32 * 255.0) as u8;
            let g = (y as f32 / height as f32 * 255.0) as u8;
            let b = ((x + y) as f32 / (width + height) as f32 * 255.0) as u8;
            data.extend_from_slice(&[r, g, b, 255]);
        }
    }
    data
}

/// A texture created by the viewer and registered with the UI renderer
#[derive(Debug, Clone, Copy)]
struct PanelImage {
    id: TextureId,
    texture: GlTexture,
}

impl PanelImage {
    fn create(
        device: &mut GlowDevice,
        renderer: &mut MeshRenderer<GlTexture>,
        size: u32,
        pixels: &[u8],
    ) -> dear_imgui_mesh::RenderResult<Self> {
        let upload = TextureUpload::rgba(size, size, pixels)?;
        let texture = device.create_texture(&upload)?;
        let id = renderer.register_texture(texture);
        debug!("Registered panel image {} ({size}x{size})", id.id());
        Ok(Self { id, texture })
    }

    fn destroy(self, device: &mut GlowDevice, renderer: &mut MeshRenderer<GlTexture>) {
        renderer.unregister_texture(self.id);
        device.destroy_texture(self.texture);
    }
}

/// Per-frame readings shown by the panel
#[derive(Debug, Clone, Copy)]
pub struct PanelStats {
    pub framerate: f32,
    pub ui_draw_calls: usize,
    pub ui_culled: usize,
    pub last_gesture: Option<Gesture>,
}

/// What the user asked for this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelActions {
    pub reset_camera: bool,
}

/// The debug window: scene controls, camera readout and image viewers
pub struct Panel {
    checkerboard: PanelImage,
    gradient: PanelImage,
    show_demo_window: bool,
}

impl Panel {
    pub fn new(
        device: &mut GlowDevice,
        renderer: &mut MeshRenderer<GlTexture>,
    ) -> dear_imgui_mesh::RenderResult<Self> {
        let checkerboard = PanelImage::create(
            device,
            renderer,
            IMAGE_SIZE,
            &checkerboard_pixels(IMAGE_SIZE, IMAGE_SIZE, CHECKER_SIZE),
        )?;
        let gradient = match PanelImage::create(
            device,
            renderer,
            IMAGE_SIZE,
            &gradient_pixels(IMAGE_SIZE, IMAGE_SIZE),
        ) {
            Ok(image) => image,
            Err(err) => {
                checkerboard.destroy(device, renderer);
                return Err(err);
            }
        };

        Ok(Self {
            checkerboard,
            gradient,
            show_demo_window: false,
        })
    }

    pub fn build(
        &mut self,
        ui: &Ui,
        stats: &PanelStats,
        settings: &mut SceneSettings,
        camera: &Camera,
    ) -> PanelActions {
        let mut actions = PanelActions::default();

        ui.window("Debug")
            .position([10.0, 10.0], Condition::FirstUseEver)
            .size([340.0, 620.0], Condition::FirstUseEver)
            .build(|| {
                ui.text(format!("{:.0} FPS", stats.framerate));
                ui.text(format!(
                    "UI: {} draw calls, {} culled",
                    stats.ui_draw_calls, stats.ui_culled
                ));
                ui.separator();

                ui.slider_f32("Cube size", &mut settings.cube_size, 0.1, 5.0);
                ui.color_edit4("Cube color", &mut settings.cube_color);
                ui.checkbox("Wireframe", &mut settings.wireframe);
                ui.separator();

                let p = camera.position;
                let t = camera.target;
                ui.text(format!("Position: {:.2}, {:.2}, {:.2}", p.x, p.y, p.z));
                ui.text(format!("Target:   {:.2}, {:.2}, {:.2}", t.x, t.y, t.z));
                ui.text(format!("Distance: {:.2}", camera.distance()));
                match stats.last_gesture {
                    Some(gesture) => ui.text(format!("Gesture: {gesture:?}")),
                    None => ui.text("Gesture: -"),
                }
                if ui.button("Reset camera") {
                    actions.reset_camera = true;
                }
                ui.separator();

                let size = [IMAGE_SIZE as f32, IMAGE_SIZE as f32];
                ui.text("Checkerboard");
                ui.image(self.checkerboard.id, size);
                ui.text("Gradient");
                ui.image(self.gradient.id, size);
                ui.separator();

                ui.checkbox("Show demo window", &mut self.show_demo_window);
            });

        if self.show_demo_window {
            ui.show_demo_window(&mut self.show_demo_window);
        }

        actions
    }

    /// Unregister and free the panel images. The GL context must be current.
    pub fn destroy(self, device: &mut GlowDevice, renderer: &mut MeshRenderer<GlTexture>) {
        self.checkerboard.destroy(device, renderer);
        self.gradient.destroy(device, renderer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pixel(data: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let start = ((y * width + x) * 4) as usize;
        [data[start], data[start + 1], data[start + 2], data[start + 3]]
    }

    #[test]
    fn checkerboard_alternates_every_cell() {
        let data = checkerboard_pixels(32, 32, 16);
        assert_eq!(data.len(), 32 * 32 * 4);
        assert_eq!(pixel(&data, 32, 0, 0), [255, 255, 255, 255]);
        assert_eq!(pixel(&data, 32, 15, 15), [255, 255, 255, 255]);
        assert_eq!(pixel(&data, 32, 16, 0), [64, 64, 64, 255]);
        assert_eq!(pixel(&data, 32, 16, 16), [255, 255, 255, 255]);
    }

    #[test]
    fn zero_cell_size_does_not_divide_by_zero() {
        let data = checkerboard_pixels(2, 2, 0);
        assert_eq!(pixel(&data, 2, 1, 0), [64, 64, 64, 255]);
    }

    #[test]
    fn gradient_runs_along_both_axes() {
        let data = gradient_pixels(128, 128);
        assert_eq!(pixel(&data, 128, 0, 0), [0, 0, 0, 255]);
        assert_eq!(pixel(&data, 128, 64, 0), [127, 0, 63, 255]);
        assert_eq!(pixel(&data, 128, 0, 64), [0, 127, 63, 255]);
    }
}
