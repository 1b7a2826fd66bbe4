//! Mesh staging and the transient mesh guard

use crate::{RenderDevice, RenderError, RenderResult};
use dear_imgui_rs::render::{DrawIdx, DrawVert};
use glam::Mat4;
use std::ops::Range;

/// Primitive assembly for a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeshTopology {
    #[default]
    Triangles,
    Lines,
}

/// Parallel, equal-length vertex attribute streams in the renderer's layout.
///
/// Meshes are not indexed: every vertex is stored as many times as it is
/// referenced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub texcoords: Vec<[f32; 2]>,
    /// RGBA8, red in byte 0
    pub colors: Vec<[u8; 4]>,
    pub topology: MeshTopology,
}

impl MeshData {
    pub fn with_capacity(topology: MeshTopology, vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            texcoords: Vec::with_capacity(vertices),
            colors: Vec::with_capacity(vertices),
            topology,
        }
    }

    /// Build from already separated streams, checking they have equal length
    pub fn from_streams(
        positions: Vec<[f32; 3]>,
        texcoords: Vec<[f32; 2]>,
        colors: Vec<[u8; 4]>,
        topology: MeshTopology,
    ) -> RenderResult<Self> {
        if positions.len() != texcoords.len() || positions.len() != colors.len() {
            return Err(RenderError::MismatchedStreams {
                positions: positions.len(),
                texcoords: texcoords.len(),
                colors: colors.len(),
            });
        }
        Ok(Self {
            positions,
            texcoords,
            colors,
            topology,
        })
    }

    pub fn push(&mut self, position: [f32; 3], texcoord: [f32; 2], color: [u8; 4]) {
        self.positions.push(position);
        self.texcoords.push(texcoord);
        self.colors.push(color);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Gather one vertex per index of `idx_range`, in index order.
    ///
    /// Returns `None` if the range or any index it holds falls outside the
    /// buffers.
    pub fn gather(
        vertices: &[DrawVert],
        indices: &[DrawIdx],
        vtx_offset: usize,
        idx_range: Range<usize>,
    ) -> Option<Self> {
        let indices = indices.get(idx_range)?;
        let mut data = Self::with_capacity(MeshTopology::Triangles, indices.len());
        for &index in indices {
            let vertex = vertices.get(vtx_offset + index as usize)?;
            data.push(
                [vertex.pos[0], vertex.pos[1], 0.0],
                vertex.uv,
                unpack_color(vertex.col),
            );
        }
        Some(data)
    }
}

/// Split a packed Dear ImGui color into RGBA bytes
#[inline]
pub fn unpack_color(col: u32) -> [u8; 4] {
    col.to_le_bytes()
}

/// A mesh that lives for exactly one draw.
///
/// The mesh is freed when the guard drops, so every path out of the
/// draw (including `?` and early `continue`) releases it.
pub struct TransientMesh<'d, D: RenderDevice> {
    device: &'d mut D,
    mesh: Option<D::Mesh>,
}

impl<'d, D: RenderDevice> TransientMesh<'d, D> {
    pub fn upload(device: &'d mut D, data: &MeshData) -> RenderResult<Self> {
        let mesh = device.upload_mesh(data)?;
        Ok(Self {
            device,
            mesh: Some(mesh),
        })
    }

    /// Bind `texture`, draw, then unbind it again
    pub fn draw(&mut self, texture: D::Texture, transform: Mat4) {
        if let Some(mesh) = &self.mesh {
            self.device.bind_texture(texture);
            self.device.draw_mesh(mesh, transform);
            self.device.reset_texture();
        }
    }
}

impl<D: RenderDevice> Drop for TransientMesh<'_, D> {
    fn drop(&mut self) {
        if let Some(mesh) = self.mesh.take() {
            self.device.free_mesh(mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{Call, RecordingDevice};
    use pretty_assertions::assert_eq;

    fn vert(x: f32, y: f32, col: u32) -> DrawVert {
        DrawVert {
            pos: [x, y],
            uv: [x / 100.0, y / 100.0],
            col,
        }
    }

    #[test]
    fn gather_emits_one_vertex_per_index() {
        let vertices = [
            vert(0.0, 0.0, 0xFF00_00FF),
            vert(10.0, 0.0, 0xFF00_FF00),
            vert(10.0, 10.0, 0xFFFF_0000),
            vert(0.0, 10.0, 0xFFFF_FFFF),
        ];
        let indices = [0, 1, 2, 0, 2, 3];

        let data = MeshData::gather(&vertices, &indices, 0, 0..6).unwrap();

        assert_eq!(data.vertex_count(), 6);
        assert_eq!(data.positions[3], data.positions[0]);
        assert_eq!(data.positions[4], data.positions[2]);
        assert!(data.positions.iter().all(|p| p[2] == 0.0));
    }

    #[test]
    fn gather_respects_offsets() {
        let vertices = [
            vert(0.0, 0.0, 0),
            vert(1.0, 0.0, 0),
            vert(2.0, 0.0, 0),
            vert(3.0, 0.0, 0),
        ];
        let indices = [0, 1, 2, 0, 1];

        let data = MeshData::gather(&vertices, &indices, 1, 3..5).unwrap();

        assert_eq!(data.positions, vec![[1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
    }

    #[test]
    fn gather_rejects_out_of_range_indices() {
        let vertices = [vert(0.0, 0.0, 0)];
        assert!(MeshData::gather(&vertices, &[0, 1, 0], 0, 0..3).is_none());
        assert!(MeshData::gather(&vertices, &[0, 0, 0], 0, 1..4).is_none());
    }

    #[test]
    fn packed_colors_keep_rgba_byte_order() {
        // IM_COL32(0x11, 0x22, 0x33, 0x44)
        assert_eq!(unpack_color(0x4433_2211), [0x11, 0x22, 0x33, 0x44]);
    }

    #[test]
    fn mismatched_streams_are_rejected() {
        let err = MeshData::from_streams(
            vec![[0.0; 3]; 3],
            vec![[0.0; 2]; 3],
            vec![[0; 4]; 2],
            MeshTopology::Triangles,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::MismatchedStreams { colors: 2, .. }));
    }

    #[test]
    fn uploaded_data_reads_back_unchanged() {
        let positions = vec![[1.5, -2.25, 0.0], [1e-3, 4096.125, 0.0], [0.1, 0.2, 0.0]];
        let texcoords = vec![[0.0, 1.0], [0.333_333_34, 0.666_666_7], [1.0, 0.0]];
        let colors = vec![[255, 0, 0, 255], [0, 128, 0, 64], [1, 2, 3, 4]];
        let data = MeshData::from_streams(
            positions.clone(),
            texcoords.clone(),
            colors.clone(),
            MeshTopology::Triangles,
        )
        .unwrap();

        let mut device = RecordingDevice::default();
        let id = {
            let mesh = TransientMesh::upload(&mut device, &data).unwrap();
            mesh.mesh.as_ref().unwrap().id()
        };

        let uploaded = &device.uploads[&id];
        assert_eq!(uploaded.positions, positions);
        assert_eq!(uploaded.texcoords, texcoords);
        assert_eq!(uploaded.colors, colors);
    }

    #[test]
    fn guard_frees_on_drop_and_unbinds_after_draw() {
        let mut device = RecordingDevice::default();
        let data = MeshData::gather(&[vert(0.0, 0.0, 0)], &[0, 0, 0], 0, 0..3).unwrap();

        {
            let mut mesh = TransientMesh::upload(&mut device, &data).unwrap();
            mesh.draw(7, Mat4::IDENTITY);
        }

        assert_eq!(device.live_meshes(), 0);
        assert_eq!(
            device.calls,
            vec![
                Call::UploadMesh { mesh: 1, vertices: 3 },
                Call::BindTexture(7),
                Call::DrawMesh { mesh: 1 },
                Call::ResetTexture,
                Call::FreeMesh(1),
            ]
        );
    }
}
