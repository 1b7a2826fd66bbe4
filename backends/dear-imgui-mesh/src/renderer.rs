//! Frame renderer: draw data in, device calls out

use crate::{
    BlendMode, DrawCommand, DrawListView, FrameDrawData, MeshData, RenderDevice, RenderResult,
    ScissorRect, TextureRegistry, TextureSlot, TextureUpload, TransientMesh, is_visible,
    project_clip_rect, scissor_rect,
};
use dear_imgui_rs::render::DrawData;
use dear_imgui_rs::{BackendFlags, Context, TextureData, TextureFormat, TextureId, TextureStatus};
use glam::Mat4;
use tracing::{debug, warn};

/// Renderer configuration
#[derive(Debug, Clone)]
pub struct MeshRendererConfig {
    /// Reported to Dear ImGui as the renderer backend name
    pub renderer_name: String,
}

impl Default for MeshRendererConfig {
    fn default() -> Self {
        Self {
            renderer_name: format!("dear-imgui-mesh {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// What the last rendered frame did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Element commands that produced a mesh draw
    pub draw_calls: usize,
    /// Element commands skipped by the framebuffer bounds check
    pub culled: usize,
    /// Element commands skipped because their indices were out of range
    pub malformed: usize,
    pub callbacks: usize,
    pub state_resets: usize,
}

/// Renders Dear ImGui draw data through a [`RenderDevice`], one transient
/// mesh per draw command.
#[derive(Debug)]
pub struct MeshRenderer<T> {
    config: MeshRendererConfig,
    textures: TextureRegistry<T>,
    last_frame: FrameStats,
}

impl<T: Copy + PartialEq + std::fmt::Debug> Default for MeshRenderer<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Open 2D scope. Dropping it turns scissoring off and closes the scope.
struct FrameScope<'d, D: RenderDevice> {
    device: &'d mut D,
}

impl<'d, D: RenderDevice> FrameScope<'d, D> {
    fn begin(device: &'d mut D, frame: &FrameDrawData<'_>) -> Self {
        device.begin_mode_2d(frame.display_pos, frame.display_size);
        Self { device }
    }

    fn device(&mut self) -> &mut D {
        self.device
    }
}

impl<D: RenderDevice> Drop for FrameScope<'_, D> {
    fn drop(&mut self) {
        self.device.disable_scissor_test();
        self.device.end_mode_2d();
    }
}

/// Baseline state every UI draw assumes.
///
/// Reapplied after a `ResetRenderState` command since callbacks may have
/// changed anything.
fn set_up_render_state<D: RenderDevice>(device: &mut D, framebuffer: [f32; 2]) {
    let full = ScissorRect::full(framebuffer);
    device.set_viewport(full);
    device.set_blend_mode(BlendMode::Alpha);
    device.set_backface_culling(false);
    device.set_depth_test(false);
    device.set_wireframe(false);
    device.enable_scissor_test();
    device.set_scissor(full);
}

impl<T: Copy + PartialEq + std::fmt::Debug> MeshRenderer<T> {
    pub fn new() -> Self {
        Self::with_config(MeshRendererConfig::default())
    }

    pub fn with_config(config: MeshRendererConfig) -> Self {
        Self {
            config,
            textures: TextureRegistry::new(),
            last_frame: FrameStats::default(),
        }
    }

    /// Announce this renderer to a Dear ImGui context.
    ///
    /// Sets the renderer name and advertises `RENDERER_HAS_TEXTURES` so the
    /// font atlas arrives through [`update_textures`](Self::update_textures).
    /// Vertex offsets are not advertised: draw lists stay within 16-bit
    /// indices.
    pub fn configure_context(&self, imgui_context: &mut Context) {
        if let Err(err) = imgui_context.set_renderer_name(Some(self.config.renderer_name.clone())) {
            warn!("Failed to set renderer name: {err}");
        }
        let io = imgui_context.io_mut();
        let mut flags = io.backend_flags();
        flags.insert(BackendFlags::RENDERER_HAS_TEXTURES);
        io.set_backend_flags(flags);
    }

    /// Make an application-owned texture drawable by the UI
    pub fn register_texture(&mut self, texture: T) -> TextureId {
        self.textures.insert(TextureSlot::External(texture))
    }

    /// Forget an application texture. Library-managed textures are left alone.
    pub fn unregister_texture(&mut self, id: TextureId) -> Option<T> {
        match self.textures.get(id) {
            Some(TextureSlot::External(_)) => self.textures.remove(id).map(|slot| slot.texture()),
            _ => None,
        }
    }

    pub fn textures(&self) -> &TextureRegistry<T> {
        &self.textures
    }

    pub fn last_frame_stats(&self) -> FrameStats {
        self.last_frame
    }

    /// Render one frame of Dear ImGui draw data
    pub fn render<D>(&mut self, device: &mut D, draw_data: &DrawData) -> RenderResult<()>
    where
        D: RenderDevice<Texture = T>,
    {
        let fb_width = draw_data.display_size()[0] * draw_data.framebuffer_scale()[0];
        let fb_height = draw_data.display_size()[1] * draw_data.framebuffer_scale()[1];
        if !(fb_width > 0.0 && fb_height > 0.0) {
            return Ok(());
        }

        // Texture ids are resolved while building the view, so requests
        // must be handled first.
        self.update_textures(device, draw_data);
        let frame = FrameDrawData::from_draw_data(draw_data);
        self.render_frame(device, &frame)
    }

    /// Process Dear ImGui's texture requests (font atlas creation, glyph
    /// updates, destruction).
    pub fn update_textures<D>(&mut self, device: &mut D, draw_data: &DrawData)
    where
        D: RenderDevice<Texture = T>,
    {
        for mut texture_data in draw_data.textures() {
            match texture_data.status() {
                TextureStatus::WantCreate => self.create_managed(device, &mut texture_data),
                TextureStatus::WantUpdates => {
                    let id = texture_data.tex_id();
                    match self.textures.get(id).copied() {
                        Some(TextureSlot::FontAtlas(texture)) => {
                            let result = upload_from(&texture_data)
                                .and_then(|upload| device.update_texture(texture, &upload));
                            match result {
                                Ok(()) => texture_data.set_status(TextureStatus::OK),
                                Err(err) => {
                                    warn!("Failed to update texture {}: {err}", id.id());
                                    texture_data.set_status(TextureStatus::Destroyed);
                                }
                            }
                        }
                        // First update of a texture we never created
                        _ => self.create_managed(device, &mut texture_data),
                    }
                }
                TextureStatus::WantDestroy => {
                    let id = texture_data.tex_id();
                    if let Some(TextureSlot::FontAtlas(texture)) = self.textures.get(id).copied() {
                        self.textures.remove(id);
                        device.destroy_texture(texture);
                        debug!("Destroyed managed texture {}", id.id());
                    }
                    texture_data.set_tex_id(TextureId::null());
                    texture_data.set_status(TextureStatus::Destroyed);
                }
                TextureStatus::OK | TextureStatus::Destroyed => {}
            }
        }
    }

    fn create_managed<D>(&mut self, device: &mut D, texture_data: &mut TextureData)
    where
        D: RenderDevice<Texture = T>,
    {
        let created = upload_from(texture_data).and_then(|upload| device.create_texture(&upload));
        match created {
            Ok(texture) => {
                let id = self.textures.insert(TextureSlot::FontAtlas(texture));
                debug!(
                    "Created managed texture {} ({}x{})",
                    id.id(),
                    texture_data.width(),
                    texture_data.height()
                );
                texture_data.set_tex_id(id);
                texture_data.set_status(TextureStatus::OK);
            }
            Err(err) => {
                // Leave it destroyed to avoid a retry storm
                warn!("Failed to create managed texture: {err}");
                texture_data.set_status(TextureStatus::Destroyed);
            }
        }
    }

    /// Release every library-managed texture. Call before the device goes away.
    pub fn destroy_textures<D>(&mut self, device: &mut D)
    where
        D: RenderDevice<Texture = T>,
    {
        for texture in self.textures.drain_font_atlases() {
            device.destroy_texture(texture);
        }
    }

    /// Render a prepared frame view
    pub fn render_frame<D>(&mut self, device: &mut D, frame: &FrameDrawData<'_>) -> RenderResult<()>
    where
        D: RenderDevice<Texture = T>,
    {
        self.last_frame = FrameStats::default();

        // Avoid rendering when minimized
        let framebuffer = frame.framebuffer_size();
        if !(framebuffer[0] > 0.0 && framebuffer[1] > 0.0) {
            return Ok(());
        }

        let mut scope = FrameScope::begin(device, frame);
        set_up_render_state(scope.device(), framebuffer);

        for draw_list in &frame.draw_lists {
            self.render_draw_list(scope.device(), frame, framebuffer, draw_list)?;
        }

        Ok(())
    }

    fn render_draw_list<D>(
        &mut self,
        device: &mut D,
        frame: &FrameDrawData<'_>,
        framebuffer: [f32; 2],
        draw_list: &DrawListView<'_>,
    ) -> RenderResult<()>
    where
        D: RenderDevice<Texture = T>,
    {
        for command in &draw_list.commands {
            match command {
                DrawCommand::Elements {
                    count,
                    clip_rect,
                    texture_id,
                    vtx_offset,
                    idx_offset,
                } => {
                    let clip =
                        project_clip_rect(*clip_rect, frame.display_pos, frame.framebuffer_scale);
                    if !is_visible(clip, framebuffer) {
                        self.last_frame.culled += 1;
                        continue;
                    }

                    device.set_scissor(scissor_rect(clip, framebuffer[1]));

                    let Some(mesh_data) = MeshData::gather(
                        draw_list.vtx_buffer,
                        draw_list.idx_buffer,
                        *vtx_offset,
                        *idx_offset..*idx_offset + *count,
                    ) else {
                        warn!(
                            "Skipping draw command with out-of-range indices (offset {idx_offset}, count {count})"
                        );
                        self.last_frame.malformed += 1;
                        continue;
                    };

                    let texture = self.textures.resolve(*texture_id, device.default_texture());
                    let mut mesh = TransientMesh::upload(device, &mesh_data)?;
                    mesh.draw(texture, Mat4::IDENTITY);
                    self.last_frame.draw_calls += 1;
                }
                DrawCommand::ResetRenderState => {
                    set_up_render_state(device, framebuffer);
                    self.last_frame.state_resets += 1;
                }
                DrawCommand::Callback(callback) => {
                    match callback {
                        crate::UserCallback::Native(callback) => callback(),
                        crate::UserCallback::Segment(callback) => callback(draw_list),
                    }
                    self.last_frame.callbacks += 1;
                }
            }
        }
        Ok(())
    }
}

fn upload_from(texture_data: &TextureData) -> RenderResult<TextureUpload<'_>> {
    let width = texture_data.width().max(0) as u32;
    let height = texture_data.height().max(0) as u32;
    let pixels = texture_data.pixels().ok_or_else(|| {
        crate::RenderError::InvalidTexture("texture has no pixel data".to_string())
    })?;
    match texture_data.format() {
        TextureFormat::RGBA32 => TextureUpload::rgba(width, height, pixels),
        TextureFormat::Alpha8 => TextureUpload::alpha8(width, height, pixels),
    }
}
