//! Vertex types and screen-space overlay geometry building.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Vertex for the screen-space overlay pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct OverlayVertex {
    /// NDC position (x, y) in -1..1.
    pub position: [f32; 2],
    /// UV into the glyph texture (negative x = solid color quad).
    pub tex_coords: [f32; 2],
    /// RGBA color.
    pub color: [f32; 4],
}

impl OverlayVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OverlayVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// UV sentinel marking a quad as solid color (no texture sample).
const SOLID_UV: [f32; 2] = [-1.0, -1.0];

/// Builds overlay geometry in pixel coordinates: solid rectangles and
/// rotated, tinted sprite quads that sample the glyph texture. Positions are
/// converted to NDC so the overlay pipeline needs no uniforms.
pub struct OverlayBuilder {
    pub vertices: Vec<OverlayVertex>,
    pub indices: Vec<u32>,
    screen_w: f32,
    screen_h: f32,
}

impl OverlayBuilder {
    pub fn new(screen_w: f32, screen_h: f32) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            screen_w,
            screen_h,
        }
    }

    pub fn screen_width(&self) -> f32 {
        self.screen_w
    }

    pub fn screen_height(&self) -> f32 {
        self.screen_h
    }

    /// Convert pixel coords to NDC.
    fn px_to_ndc(&self, px: f32, py: f32) -> [f32; 2] {
        [
            (px / self.screen_w) * 2.0 - 1.0,
            1.0 - (py / self.screen_h) * 2.0,
        ]
    }

    /// Push one quad given its corner positions in pixels (any winding;
    /// the overlay pipeline does not cull).
    fn push_quad(&mut self, corners: [Vec2; 4], uvs: [[f32; 2]; 4], color: [f32; 4]) {
        let base = self.vertices.len() as u32;
        for (corner, uv) in corners.iter().zip(uvs.iter()) {
            let position = self.px_to_ndc(corner.x, corner.y);
            self.vertices.push(OverlayVertex {
                position,
                tex_coords: *uv,
                color,
            });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Add a solid-color rectangle. Coordinates in pixels, top-left origin.
    pub fn add_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
        let corners = [
            Vec2::new(x, y),
            Vec2::new(x + w, y),
            Vec2::new(x + w, y + h),
            Vec2::new(x, y + h),
        ];
        self.push_quad(corners, [SOLID_UV; 4], color);
    }

    /// Add a square sprite of the glyph texture, centered at (cx, cy) and
    /// rotated about its own center. Positive angles rotate clockwise on
    /// screen. The rotation and tint live in the emitted vertices, so they
    /// cannot leak into any other quad.
    pub fn add_sprite(&mut self, cx: f32, cy: f32, size: f32, rotation_deg: f32, color: [f32; 4]) {
        let half = size * 0.5;
        let (sin, cos) = rotation_deg.to_radians().sin_cos();
        let center = Vec2::new(cx, cy);
        // Screen space has y down, so the standard rotation matrix turns
        // quads clockwise as seen by the viewer.
        let rotate = |dx: f32, dy: f32| center + Vec2::new(dx * cos - dy * sin, dx * sin + dy * cos);
        let corners = [
            rotate(-half, -half),
            rotate(half, -half),
            rotate(half, half),
            rotate(-half, half),
        ];
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        self.push_quad(corners, uvs, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn px_to_ndc_maps_corners() {
        let tb = OverlayBuilder::new(800.0, 600.0);
        assert_eq!(tb.px_to_ndc(0.0, 0.0), [-1.0, 1.0]);
        assert_eq!(tb.px_to_ndc(800.0, 600.0), [1.0, -1.0]);
        assert_eq!(tb.px_to_ndc(400.0, 300.0), [0.0, 0.0]);
    }

    #[test]
    fn rect_is_solid_quad() {
        let mut tb = OverlayBuilder::new(800.0, 600.0);
        tb.add_rect(10.0, 10.0, 20.0, 20.0, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(tb.vertices.len(), 4);
        assert_eq!(tb.indices.len(), 6);
        assert!(tb.vertices.iter().all(|v| v.tex_coords[0] < 0.0));
    }

    #[test]
    fn sprite_has_unit_uvs_and_rotates_corners() {
        let mut tb = OverlayBuilder::new(200.0, 200.0);
        // 90 degrees clockwise: the top-left corner moves to the top-right.
        tb.add_sprite(100.0, 100.0, 20.0, 90.0, [1.0; 4]);
        assert_eq!(tb.vertices.len(), 4);
        assert!(tb.vertices.iter().all(|v| v.tex_coords[0] >= 0.0));
        // First corner was (-10, -10) relative; rotated it becomes (10, -10),
        // i.e. pixel (110, 90) -> NDC (0.1, 0.1).
        let p = tb.vertices[0].position;
        assert!((p[0] - 0.1).abs() < 1e-5);
        assert!((p[1] - 0.1).abs() < 1e-5);
    }
}
