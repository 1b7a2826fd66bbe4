//! The 3D scene: a ground grid and a cube with outlined edges

use blender_camera::Camera;
use dear_imgui_mesh::{
    BlendMode, GlMesh, GlowDevice, MeshData, MeshTopology, RenderDevice, RenderResult,
    ScissorRect,
};
use glam::{Mat4, Vec3};
use tracing::debug;

const GRID_AXIS_COLOR: [u8; 4] = [128, 128, 128, 255];
const GRID_LINE_COLOR: [u8; 4] = [191, 191, 191, 255];
const WIRE_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Scene parameters the debug panel edits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneSettings {
    pub cube_size: f32,
    pub cube_color: [f32; 4],
    pub wireframe: bool,
}

/// Quantize a float color to RGBA8
pub fn color_to_rgba8(color: [f32; 4]) -> [u8; 4] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Lines on the XZ plane centered on the origin, `slices` cells across.
///
/// The two lines through the origin are darker.
pub fn grid_mesh(slices: u32, spacing: f32) -> MeshData {
    let half_slices = (slices / 2) as i32;
    let extent = half_slices as f32 * spacing;
    let lines = (2 * half_slices + 1) as usize;
    let mut mesh = MeshData::with_capacity(MeshTopology::Lines, lines * 4);

    for i in -half_slices..=half_slices {
        let color = if i == 0 {
            GRID_AXIS_COLOR
        } else {
            GRID_LINE_COLOR
        };
        let offset = i as f32 * spacing;
        mesh.push([offset, 0.0, -extent], [0.0, 0.0], color);
        mesh.push([offset, 0.0, extent], [0.0, 0.0], color);
        mesh.push([-extent, 0.0, offset], [0.0, 0.0], color);
        mesh.push([extent, 0.0, offset], [0.0, 0.0], color);
    }
    mesh
}

const CUBE_CORNERS: [[f32; 3]; 8] = [
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
    [0.5, 0.5, -0.5],
    [-0.5, 0.5, -0.5],
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [0.5, 0.5, 0.5],
    [-0.5, 0.5, 0.5],
];

/// Two counter-clockwise triangles per face, as corner indices
const CUBE_FACES: [[usize; 6]; 6] = [
    [4, 5, 6, 4, 6, 7], // front
    [1, 0, 3, 1, 3, 2], // back
    [3, 7, 6, 3, 6, 2], // top
    [0, 1, 5, 0, 5, 4], // bottom
    [5, 1, 2, 5, 2, 6], // right
    [0, 4, 7, 0, 7, 3], // left
];

const CUBE_EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// Unit cube centered on the origin
pub fn cube_mesh(color: [u8; 4]) -> MeshData {
    let mut mesh = MeshData::with_capacity(MeshTopology::Triangles, 36);
    for corner in CUBE_FACES.iter().flatten() {
        mesh.push(CUBE_CORNERS[*corner], [0.0, 0.0], color);
    }
    mesh
}

/// The twelve edges of the unit cube
pub fn cube_wires_mesh(color: [u8; 4]) -> MeshData {
    let mut mesh = MeshData::with_capacity(MeshTopology::Lines, 24);
    for corner in CUBE_EDGES.iter().flatten() {
        mesh.push(CUBE_CORNERS[*corner], [0.0, 0.0], color);
    }
    mesh
}

/// Scene meshes, uploaded once and kept for the lifetime of the window
pub struct Scene {
    grid: GlMesh,
    cube: GlMesh,
    wires: GlMesh,
    cube_color: [u8; 4],
}

impl Scene {
    pub fn new(
        device: &mut GlowDevice,
        grid_slices: u32,
        grid_spacing: f32,
        cube_color: [f32; 4],
    ) -> RenderResult<Self> {
        let cube_color = color_to_rgba8(cube_color);
        let grid = device.upload_mesh(&grid_mesh(grid_slices, grid_spacing))?;
        let cube = match device.upload_mesh(&cube_mesh(cube_color)) {
            Ok(cube) => cube,
            Err(err) => {
                device.free_mesh(grid);
                return Err(err);
            }
        };
        let wires = match device.upload_mesh(&cube_wires_mesh(WIRE_COLOR)) {
            Ok(wires) => wires,
            Err(err) => {
                device.free_mesh(grid);
                device.free_mesh(cube);
                return Err(err);
            }
        };
        debug!(
            "Scene uploaded: grid {} vertices, cube {} vertices",
            grid.vertex_count(),
            cube.vertex_count()
        );

        Ok(Self {
            grid,
            cube,
            wires,
            cube_color,
        })
    }

    /// Draw the scene with depth testing into a `framebuffer` sized viewport
    pub fn draw(
        &mut self,
        device: &mut GlowDevice,
        camera: &Camera,
        settings: &SceneSettings,
        framebuffer: [u32; 2],
    ) -> RenderResult<()> {
        let cube_color = color_to_rgba8(settings.cube_color);
        if cube_color != self.cube_color {
            let cube = device.upload_mesh(&cube_mesh(cube_color))?;
            device.free_mesh(std::mem::replace(&mut self.cube, cube));
            self.cube_color = cube_color;
        }

        let [width, height] = framebuffer;
        let aspect = width as f32 / height.max(1) as f32;
        device.set_viewport(ScissorRect::new(0, 0, width as i32, height as i32));
        device.begin_mode_3d(camera.view_projection_matrix(aspect));
        device.set_blend_mode(BlendMode::Disabled);
        device.set_backface_culling(false);
        device.set_depth_test(true);
        device.reset_texture();

        device.draw_mesh(&self.grid, Mat4::IDENTITY);

        let cube_transform = Mat4::from_scale(Vec3::splat(settings.cube_size));
        device.set_wireframe(settings.wireframe);
        device.draw_mesh(&self.cube, cube_transform);
        device.set_wireframe(false);
        device.draw_mesh(&self.wires, cube_transform);

        device.set_depth_test(false);
        device.end_mode_3d();
        Ok(())
    }

    /// Free the scene meshes. The GL context must be current.
    pub fn release(self, device: &mut GlowDevice) {
        device.free_mesh(self.grid);
        device.free_mesh(self.cube);
        device.free_mesh(self.wires);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn grid_has_two_lines_per_slice_step() {
        let mesh = grid_mesh(10, 1.0);
        assert_eq!(mesh.topology, MeshTopology::Lines);
        // 11 lines along each axis, 2 vertices per line
        assert_eq!(mesh.vertex_count(), 44);
        assert!(
            mesh.positions
                .iter()
                .all(|p| p[0].abs() <= 5.0 && p[1] == 0.0 && p[2].abs() <= 5.0)
        );
    }

    #[test]
    fn grid_center_lines_are_darker() {
        let mesh = grid_mesh(2, 0.5);
        // i = -1, 0, 1
        assert_eq!(mesh.colors[0], GRID_LINE_COLOR);
        assert_eq!(mesh.colors[4], GRID_AXIS_COLOR);
        assert_eq!(mesh.positions[4], [0.0, 0.0, -0.5]);
    }

    #[test]
    fn cube_is_twelve_triangles_inside_the_unit_box() {
        let mesh = cube_mesh([255, 0, 0, 255]);
        assert_eq!(mesh.topology, MeshTopology::Triangles);
        assert_eq!(mesh.vertex_count(), 36);
        assert!(mesh.colors.iter().all(|c| *c == [255, 0, 0, 255]));
        assert!(mesh.positions.iter().flatten().all(|c| c.abs() == 0.5));
    }

    #[test]
    fn cube_faces_point_outwards() {
        let mesh = cube_mesh([255; 4]);
        for triangle in mesh.positions.chunks(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(Vec3::from);
            let normal = (b - a).cross(c - a);
            let center = (a + b + c) / 3.0;
            assert!(normal.dot(center) > 0.0, "inward face at {center:?}");
        }
    }

    #[test]
    fn wires_cover_every_edge_once() {
        let mesh = cube_wires_mesh(WIRE_COLOR);
        assert_eq!(mesh.vertex_count(), 24);
        for edge in mesh.positions.chunks(2) {
            let length = Vec3::from(edge[0]).distance(Vec3::from(edge[1]));
            assert_eq!(length, 1.0);
        }
    }

    #[test]
    fn colors_are_quantized_and_clamped() {
        assert_eq!(color_to_rgba8([1.0, 0.5, 0.0, 2.0]), [255, 128, 0, 255]);
        assert_eq!(color_to_rgba8([-1.0, 0.25, 1.0, 0.0]), [0, 64, 255, 0]);
    }
}
