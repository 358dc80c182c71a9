/// Graphics device interface consumed by the scene.
///
/// Implementations own the shader program and every buffer; the core only
/// holds the opaque `Buffer` handles they hand out.
use nalgebra::Matrix4;

use crate::error::Result;
use crate::projection::Viewport;

/// Vertex attribute carrying `vec3` positions
pub const POSITION_ATTRIBUTE: &str = "vertexPos";
/// Vertex attribute carrying `vec4` colors
pub const COLOR_ATTRIBUTE: &str = "vertexColor";

/// Per-draw matrix uniforms of the shared program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uniform {
    Projection,
    ModelView,
}

impl Uniform {
    pub fn name(&self) -> &'static str {
        match self {
            Uniform::Projection => "projectionMatrix",
            Uniform::ModelView => "modelViewMatrix",
        }
    }
}

/// One indexed triangle-list draw
#[derive(Debug)]
pub struct DrawCall<'a, B> {
    pub vertex_buffer: &'a B,
    pub color_buffer: &'a B,
    pub index_buffer: &'a B,
    /// Floats per position (3)
    pub position_components: usize,
    /// Floats per color (4)
    pub color_components: usize,
    pub index_count: usize,
}

pub trait RenderDevice {
    type Buffer;

    /// Allocate an empty buffer. Only called during setup.
    fn create_buffer(&mut self) -> Result<Self::Buffer>;

    fn upload_vertex_data(&mut self, buffer: &Self::Buffer, data: &[f32]);

    fn upload_index_data(&mut self, buffer: &Self::Buffer, data: &[u32]);

    fn set_viewport(&mut self, viewport: Viewport);

    /// Make the shared program current. Called once per frame.
    fn bind_shader_program(&mut self);

    fn set_uniform(&mut self, uniform: Uniform, value: &Matrix4<f32>);

    fn draw_indexed_triangles(&mut self, call: DrawCall<'_, Self::Buffer>);

    /// Clear color and depth and enable depth testing
    fn clear_frame(&mut self);
}
