//! OpenGL implementation of [`RenderDevice`]

mod shaders;
mod versions;

pub use versions::GlVersion;

use crate::{
    BlendMode, InitError, InitResult, MeshData, MeshTopology, RenderDevice, RenderError,
    RenderResult, ScissorRect, TextureUpload,
};
use glam::Mat4;
use glow::{Context, HasContext};
use shaders::Shaders;
use std::rc::Rc;
use tracing::debug;

pub type GlTexture = <Context as HasContext>::Texture;
type GlBuffer = <Context as HasContext>::Buffer;
type GlVertexArray = <Context as HasContext>::VertexArray;

/// A mesh uploaded to the GPU: one buffer per attribute stream
#[derive(Debug)]
pub struct GlMesh {
    vertex_array: Option<GlVertexArray>,
    positions: GlBuffer,
    texcoords: GlBuffer,
    colors: GlBuffer,
    vertex_count: i32,
    mode: u32,
}

impl GlMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertex_count as usize
    }
}

/// A minimal retained renderer over `glow`.
///
/// Draws non-indexed meshes with one shader (position, texcoord, color,
/// sampled texture) and keeps a single projection matrix that is swapped
/// when entering and leaving the 2D and 3D scopes.
pub struct GlowDevice {
    gl: Rc<Context>,
    gl_version: GlVersion,
    shaders: Shaders,
    blank_texture: GlTexture,
    bound_texture: Option<GlTexture>,
    projection: Mat4,
    saved_projection: Mat4,
    is_destroyed: bool,
}

impl GlowDevice {
    /// Create the device on the current OpenGL context
    pub fn new(gl: Rc<Context>) -> InitResult<Self> {
        let gl_version = GlVersion::read(&gl);
        debug!("OpenGL version: {:?}", gl_version);

        let shaders = Shaders::new(&gl, gl_version)?;
        let blank_texture = match create_blank_texture(&gl) {
            Ok(texture) => texture,
            Err(err) => {
                unsafe { gl.delete_program(shaders.program) };
                return Err(err);
            }
        };

        Ok(Self {
            gl,
            gl_version,
            shaders,
            blank_texture,
            bound_texture: None,
            projection: Mat4::IDENTITY,
            saved_projection: Mat4::IDENTITY,
            is_destroyed: false,
        })
    }

    pub fn gl(&self) -> &Rc<Context> {
        &self.gl
    }

    pub fn gl_version(&self) -> GlVersion {
        self.gl_version
    }

    pub fn clear(&mut self, color: [f32; 4]) {
        unsafe {
            self.gl.clear_color(color[0], color[1], color[2], color[3]);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    /// Enter a 3D scope drawn with `view_projection`
    pub fn begin_mode_3d(&mut self, view_projection: Mat4) {
        self.projection = view_projection;
    }

    pub fn end_mode_3d(&mut self) {
        self.projection = Mat4::IDENTITY;
    }

    /// Free GPU resources owned by the device. The GL context must be current.
    pub fn destroy(&mut self) {
        if self.is_destroyed {
            return;
        }
        unsafe {
            self.gl.delete_program(self.shaders.program);
            self.gl.delete_texture(self.blank_texture);
        }
        self.is_destroyed = true;
    }

    unsafe fn bind_attributes(&self, mesh: &GlMesh) {
        unsafe {
            let gl = &self.gl;
            let streams = [
                (mesh.positions, self.shaders.attrib_position, 3, glow::FLOAT, false),
                (mesh.texcoords, self.shaders.attrib_texcoord, 2, glow::FLOAT, false),
                (mesh.colors, self.shaders.attrib_color, 4, glow::UNSIGNED_BYTE, true),
            ];
            for (buffer, location, size, data_type, normalized) in streams {
                gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
                gl.enable_vertex_attrib_array(location);
                gl.vertex_attrib_pointer_f32(location, size, data_type, normalized, 0, 0);
            }
        }
    }

    unsafe fn upload_stream(&self, bytes: &[u8]) -> RenderResult<GlBuffer> {
        unsafe {
            let buffer = self.gl.create_buffer().map_err(RenderError::MeshUpload)?;
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytes, glow::STATIC_DRAW);
            Ok(buffer)
        }
    }
}

impl Drop for GlowDevice {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn create_blank_texture(gl: &Context) -> InitResult<GlTexture> {
    let upload = TextureUpload::rgba(1, 1, &[255, 255, 255, 255])
        .map_err(|err| InitError::CreateTexture(err.to_string()))?;
    unsafe { create_texture(gl, &upload) }.map_err(|err| InitError::CreateTexture(err.to_string()))
}

unsafe fn create_texture(gl: &Context, upload: &TextureUpload<'_>) -> RenderResult<GlTexture> {
    unsafe {
        let texture = gl.create_texture().map_err(RenderError::TextureUpload)?;
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
        upload_pixels(gl, upload);
        gl.bind_texture(glow::TEXTURE_2D, None);
        Ok(texture)
    }
}

unsafe fn upload_pixels(gl: &Context, upload: &TextureUpload<'_>) {
    unsafe {
        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA as i32,
            upload.width as i32,
            upload.height as i32,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            glow::PixelUnpackData::Slice(Some(upload.rgba.as_ref())),
        );
    }
}

fn toggle(gl: &Context, capability: u32, enabled: bool) {
    unsafe {
        if enabled {
            gl.enable(capability);
        } else {
            gl.disable(capability);
        }
    }
}

impl RenderDevice for GlowDevice {
    type Mesh = GlMesh;
    type Texture = GlTexture;

    fn begin_mode_2d(&mut self, display_pos: [f32; 2], display_size: [f32; 2]) {
        let [left, top] = display_pos;
        let right = left + display_size[0];
        let bottom = top + display_size[1];
        self.saved_projection = self.projection;
        self.projection = Mat4::orthographic_rh_gl(left, right, bottom, top, -1.0, 1.0);
    }

    fn end_mode_2d(&mut self) {
        self.projection = self.saved_projection;
    }

    fn set_viewport(&mut self, rect: ScissorRect) {
        unsafe { self.gl.viewport(rect.x, rect.y, rect.width, rect.height) };
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        match mode {
            BlendMode::Alpha => unsafe {
                self.gl.enable(glow::BLEND);
                self.gl.blend_equation(glow::FUNC_ADD);
                self.gl.blend_func_separate(
                    glow::SRC_ALPHA,
                    glow::ONE_MINUS_SRC_ALPHA,
                    glow::ONE,
                    glow::ONE_MINUS_SRC_ALPHA,
                );
            },
            BlendMode::Disabled => toggle(&self.gl, glow::BLEND, false),
        }
    }

    fn set_backface_culling(&mut self, enabled: bool) {
        toggle(&self.gl, glow::CULL_FACE, enabled);
    }

    fn set_depth_test(&mut self, enabled: bool) {
        toggle(&self.gl, glow::DEPTH_TEST, enabled);
    }

    fn set_wireframe(&mut self, enabled: bool) {
        if self.gl_version.polygon_mode_support() {
            let mode = if enabled { glow::LINE } else { glow::FILL };
            unsafe { self.gl.polygon_mode(glow::FRONT_AND_BACK, mode) };
        }
    }

    fn enable_scissor_test(&mut self) {
        toggle(&self.gl, glow::SCISSOR_TEST, true);
    }

    fn disable_scissor_test(&mut self) {
        toggle(&self.gl, glow::SCISSOR_TEST, false);
    }

    fn set_scissor(&mut self, rect: ScissorRect) {
        unsafe { self.gl.scissor(rect.x, rect.y, rect.width, rect.height) };
    }

    fn upload_mesh(&mut self, data: &MeshData) -> RenderResult<Self::Mesh> {
        let vertex_count = i32::try_from(data.vertex_count())
            .map_err(|_| RenderError::MeshUpload("too many vertices".to_string()))?;
        let mode = match data.topology {
            MeshTopology::Triangles => glow::TRIANGLES,
            MeshTopology::Lines => glow::LINES,
        };

        unsafe {
            let vertex_array = if self.gl_version.vertex_array_support() {
                let vao = self
                    .gl
                    .create_vertex_array()
                    .map_err(RenderError::MeshUpload)?;
                self.gl.bind_vertex_array(Some(vao));
                Some(vao)
            } else {
                None
            };

            let mut buffers = Vec::with_capacity(3);
            let streams: [&[u8]; 3] = [
                bytemuck::cast_slice(&data.positions),
                bytemuck::cast_slice(&data.texcoords),
                bytemuck::cast_slice(&data.colors),
            ];
            for bytes in streams {
                match self.upload_stream(bytes) {
                    Ok(buffer) => buffers.push(buffer),
                    Err(err) => {
                        for buffer in buffers {
                            self.gl.delete_buffer(buffer);
                        }
                        if let Some(vao) = vertex_array {
                            self.gl.bind_vertex_array(None);
                            self.gl.delete_vertex_array(vao);
                        }
                        return Err(err);
                    }
                }
            }

            let mesh = GlMesh {
                vertex_array,
                positions: buffers[0],
                texcoords: buffers[1],
                colors: buffers[2],
                vertex_count,
                mode,
            };

            if vertex_array.is_some() {
                self.bind_attributes(&mesh);
                self.gl.bind_vertex_array(None);
            }
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            Ok(mesh)
        }
    }

    fn draw_mesh(&mut self, mesh: &Self::Mesh, transform: Mat4) {
        let mvp = self.projection * transform;
        let texture = self.bound_texture.unwrap_or(self.blank_texture);
        unsafe {
            let gl = &self.gl;
            gl.use_program(Some(self.shaders.program));
            gl.uniform_matrix_4_f32_slice(
                self.shaders.uniform_mvp.as_ref(),
                false,
                &mvp.to_cols_array(),
            );
            gl.uniform_1_i32(self.shaders.uniform_texture.as_ref(), 0);
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));

            match mesh.vertex_array {
                Some(vao) => gl.bind_vertex_array(Some(vao)),
                None => self.bind_attributes(mesh),
            }
            gl.draw_arrays(mesh.mode, 0, mesh.vertex_count);

            if mesh.vertex_array.is_some() {
                gl.bind_vertex_array(None);
            }
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }

    fn free_mesh(&mut self, mesh: Self::Mesh) {
        unsafe {
            self.gl.delete_buffer(mesh.positions);
            self.gl.delete_buffer(mesh.texcoords);
            self.gl.delete_buffer(mesh.colors);
            if let Some(vao) = mesh.vertex_array {
                self.gl.delete_vertex_array(vao);
            }
        }
    }

    fn bind_texture(&mut self, texture: Self::Texture) {
        self.bound_texture = Some(texture);
    }

    fn reset_texture(&mut self) {
        self.bound_texture = None;
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, None) };
    }

    fn default_texture(&self) -> Self::Texture {
        self.blank_texture
    }

    fn create_texture(&mut self, upload: &TextureUpload<'_>) -> RenderResult<Self::Texture> {
        unsafe { create_texture(&self.gl, upload) }
    }

    fn update_texture(
        &mut self,
        texture: Self::Texture,
        upload: &TextureUpload<'_>,
    ) -> RenderResult<()> {
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            upload_pixels(&self.gl, upload);
            self.gl.bind_texture(glow::TEXTURE_2D, None);
        }
        Ok(())
    }

    fn destroy_texture(&mut self, texture: Self::Texture) {
        unsafe { self.gl.delete_texture(texture) };
    }
}
