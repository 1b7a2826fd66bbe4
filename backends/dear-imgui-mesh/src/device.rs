//! The low-level primitives the renderer draws through

use crate::{MeshData, RenderResult, TextureUpload};
use glam::Mat4;

/// How fragments are combined with the framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Straight alpha blending (`src * a + dst * (1 - a)`)
    Alpha,
    /// Blending off
    Disabled,
}

/// A rectangle in framebuffer pixels with a bottom-left origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScissorRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ScissorRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle covering a whole framebuffer of the given size
    pub fn full(framebuffer: [f32; 2]) -> Self {
        Self::new(0, 0, framebuffer[0] as i32, framebuffer[1] as i32)
    }
}

/// A retained renderer that can host the UI.
///
/// The methods mirror what an immediate 2D overlay needs from a 3D renderer:
/// a 2D drawing scope, a few global state toggles, mesh lifetime and
/// texture binding. Implementations are expected to be cheap to call
/// repeatedly with the same state.
pub trait RenderDevice {
    /// GPU-resident mesh handle. Owned: freeing consumes it.
    type Mesh;
    /// Texture handle. Borrowed freely, ownership stays with whoever created it.
    type Texture: Copy + PartialEq + std::fmt::Debug;

    /// Open a 2D scope whose projection maps the UI display rectangle onto the viewport
    fn begin_mode_2d(&mut self, display_pos: [f32; 2], display_size: [f32; 2]);
    /// Close the scope opened by [`begin_mode_2d`](Self::begin_mode_2d)
    fn end_mode_2d(&mut self);

    fn set_viewport(&mut self, rect: ScissorRect);
    fn set_blend_mode(&mut self, mode: BlendMode);
    fn set_backface_culling(&mut self, enabled: bool);
    fn set_depth_test(&mut self, enabled: bool);
    fn set_wireframe(&mut self, enabled: bool);

    fn enable_scissor_test(&mut self);
    fn disable_scissor_test(&mut self);
    fn set_scissor(&mut self, rect: ScissorRect);

    /// Allocate a mesh and upload the given attribute streams
    fn upload_mesh(&mut self, data: &MeshData) -> RenderResult<Self::Mesh>;
    /// Draw a mesh with the currently bound texture
    fn draw_mesh(&mut self, mesh: &Self::Mesh, transform: Mat4);
    fn free_mesh(&mut self, mesh: Self::Mesh);

    fn bind_texture(&mut self, texture: Self::Texture);
    /// Unbind whatever [`bind_texture`](Self::bind_texture) bound
    fn reset_texture(&mut self);
    /// A 1x1 opaque white texture used when a draw names no texture
    fn default_texture(&self) -> Self::Texture;

    fn create_texture(&mut self, upload: &TextureUpload<'_>) -> RenderResult<Self::Texture>;
    fn update_texture(
        &mut self,
        texture: Self::Texture,
        upload: &TextureUpload<'_>,
    ) -> RenderResult<()>;
    fn destroy_texture(&mut self, texture: Self::Texture);
}
