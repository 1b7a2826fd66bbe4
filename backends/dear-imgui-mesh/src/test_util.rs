use crate::{
    BlendMode, MeshData, RenderDevice, RenderError, RenderResult, ScissorRect, TextureUpload,
};
use glam::Mat4;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Dear ImGui keeps one current context per process; tests that create a
/// real `Context` take this lock first.
pub(crate) fn context_guard() -> MutexGuard<'static, ()> {
    static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
    GUARD
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Texture handle the recording device hands out for its blank texture
pub(crate) const BLANK_TEXTURE: u32 = 0;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    BeginMode2d {
        display_pos: [f32; 2],
        display_size: [f32; 2],
    },
    EndMode2d,
    Viewport(ScissorRect),
    Blend(BlendMode),
    BackfaceCulling(bool),
    DepthTest(bool),
    Wireframe(bool),
    EnableScissor,
    DisableScissor,
    Scissor(ScissorRect),
    UploadMesh {
        mesh: u32,
        vertices: usize,
    },
    DrawMesh {
        mesh: u32,
    },
    FreeMesh(u32),
    BindTexture(u32),
    ResetTexture,
    CreateTexture {
        texture: u32,
        width: u32,
        height: u32,
    },
    UpdateTexture(u32),
    DestroyTexture(u32),
}

/// Mesh handle that is deliberately neither `Copy` nor `Clone`
#[derive(Debug)]
pub(crate) struct RecordedMesh(u32);

impl RecordedMesh {
    pub(crate) fn id(&self) -> u32 {
        self.0
    }
}

/// A device that records every call and keeps uploaded data for readback
#[derive(Debug, Default)]
pub(crate) struct RecordingDevice {
    pub(crate) calls: Vec<Call>,
    pub(crate) uploads: HashMap<u32, MeshData>,
    pub(crate) textures: HashMap<u32, Vec<u8>>,
    pub(crate) fail_uploads: bool,
    live: HashSet<u32>,
    next_mesh: u32,
    next_texture: u32,
}

impl RecordingDevice {
    /// A device whose mesh uploads always fail
    pub(crate) fn failing_uploads() -> Self {
        Self {
            fail_uploads: true,
            ..Self::default()
        }
    }

    pub(crate) fn live_meshes(&self) -> usize {
        self.live.len()
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(call)).count()
    }

    pub(crate) fn uploads_count(&self) -> usize {
        self.count(|call| matches!(call, Call::UploadMesh { .. }))
    }
}

impl RenderDevice for RecordingDevice {
    type Mesh = RecordedMesh;
    type Texture = u32;

    fn begin_mode_2d(&mut self, display_pos: [f32; 2], display_size: [f32; 2]) {
        self.calls.push(Call::BeginMode2d {
            display_pos,
            display_size,
        });
    }

    fn end_mode_2d(&mut self) {
        self.calls.push(Call::EndMode2d);
    }

    fn set_viewport(&mut self, rect: ScissorRect) {
        self.calls.push(Call::Viewport(rect));
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.calls.push(Call::Blend(mode));
    }

    fn set_backface_culling(&mut self, enabled: bool) {
        self.calls.push(Call::BackfaceCulling(enabled));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.calls.push(Call::DepthTest(enabled));
    }

    fn set_wireframe(&mut self, enabled: bool) {
        self.calls.push(Call::Wireframe(enabled));
    }

    fn enable_scissor_test(&mut self) {
        self.calls.push(Call::EnableScissor);
    }

    fn disable_scissor_test(&mut self) {
        self.calls.push(Call::DisableScissor);
    }

    fn set_scissor(&mut self, rect: ScissorRect) {
        self.calls.push(Call::Scissor(rect));
    }

    fn upload_mesh(&mut self, data: &MeshData) -> RenderResult<Self::Mesh> {
        if self.fail_uploads {
            return Err(RenderError::MeshUpload("out of memory".to_string()));
        }
        self.next_mesh += 1;
        let id = self.next_mesh;
        self.calls.push(Call::UploadMesh {
            mesh: id,
            vertices: data.vertex_count(),
        });
        self.uploads.insert(id, data.clone());
        self.live.insert(id);
        Ok(RecordedMesh(id))
    }

    fn draw_mesh(&mut self, mesh: &Self::Mesh, _transform: Mat4) {
        assert!(self.live.contains(&mesh.0), "draw after free");
        self.calls.push(Call::DrawMesh { mesh: mesh.0 });
    }

    fn free_mesh(&mut self, mesh: Self::Mesh) {
        assert!(self.live.remove(&mesh.0), "double free");
        self.calls.push(Call::FreeMesh(mesh.0));
    }

    fn bind_texture(&mut self, texture: Self::Texture) {
        self.calls.push(Call::BindTexture(texture));
    }

    fn reset_texture(&mut self) {
        self.calls.push(Call::ResetTexture);
    }

    fn default_texture(&self) -> Self::Texture {
        BLANK_TEXTURE
    }

    fn create_texture(&mut self, upload: &TextureUpload<'_>) -> RenderResult<Self::Texture> {
        self.next_texture += 1;
        let id = 100 + self.next_texture;
        self.calls.push(Call::CreateTexture {
            texture: id,
            width: upload.width,
            height: upload.height,
        });
        self.textures.insert(id, upload.rgba.to_vec());
        Ok(id)
    }

    fn update_texture(
        &mut self,
        texture: Self::Texture,
        upload: &TextureUpload<'_>,
    ) -> RenderResult<()> {
        self.calls.push(Call::UpdateTexture(texture));
        self.textures.insert(texture, upload.rgba.to_vec());
        Ok(())
    }

    fn destroy_texture(&mut self, texture: Self::Texture) {
        self.calls.push(Call::DestroyTexture(texture));
        self.textures.remove(&texture);
    }
}
