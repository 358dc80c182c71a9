/// WebGL2 implementation of the core render device
use log::debug;
use nalgebra::Matrix4;
use poly3d_core::{
    DrawCall, Error, RenderDevice, Result, ShaderStage, Uniform, Viewport, COLOR_ATTRIBUTE,
    POSITION_ATTRIBUTE,
};
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram,
    WebGlUniformLocation,
};

use crate::shader::{self, FRAGMENT_SHADER, VERTEX_SHADER};

const NO_WEBGL: &str = "Your browser does not support WebGL, or it is not enabled by default.";

const CLEAR_COLOR: [f32; 4] = [0.1, 0.1, 0.1, 1.0];

/// The linked program and the locations the draw path needs
struct ProgramHandles {
    program: WebGlProgram,
    position: u32,
    color: u32,
    projection: Option<WebGlUniformLocation>,
    model_view: Option<WebGlUniformLocation>,
}

impl ProgramHandles {
    fn build(gl: &Gl) -> Result<Self> {
        let vertex = shader::compile_shader(gl, ShaderStage::Vertex, VERTEX_SHADER)?;
        let fragment = shader::compile_shader(gl, ShaderStage::Fragment, FRAGMENT_SHADER)?;
        let program = shader::link_program(gl, &vertex, &fragment)?;

        let position = attribute(gl, &program, POSITION_ATTRIBUTE)?;
        let color = attribute(gl, &program, COLOR_ATTRIBUTE)?;
        gl.enable_vertex_attrib_array(position);
        gl.enable_vertex_attrib_array(color);

        Ok(Self {
            projection: gl.get_uniform_location(&program, Uniform::Projection.name()),
            model_view: gl.get_uniform_location(&program, Uniform::ModelView.name()),
            program,
            position,
            color,
        })
    }

    fn uniform(&self, uniform: Uniform) -> Option<&WebGlUniformLocation> {
        match uniform {
            Uniform::Projection => self.projection.as_ref(),
            Uniform::ModelView => self.model_view.as_ref(),
        }
    }
}

fn attribute(gl: &Gl, program: &WebGlProgram, name: &str) -> Result<u32> {
    u32::try_from(gl.get_attrib_location(program, name))
        .map_err(|_| Error::ShaderLink(format!("attribute '{}' is not active", name)))
}

pub struct WebGlDevice {
    gl: Gl,
    program: ProgramHandles,
}

impl WebGlDevice {
    /// Acquire a WebGL2 context from `canvas` and build the shared program
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self> {
        let gl = canvas
            .get_context("webgl2")
            .map_err(|err| Error::ContextUnavailable(format!("Error creating WebGL Context!: {:?}", err)))?
            .ok_or_else(|| Error::ContextUnavailable(NO_WEBGL.to_string()))?
            .dyn_into::<Gl>()
            .map_err(|_| Error::ContextUnavailable(NO_WEBGL.to_string()))?;

        let program = ProgramHandles::build(&gl)?;
        debug!("WebGL2 program linked");
        Ok(Self { gl, program })
    }
}

impl RenderDevice for WebGlDevice {
    type Buffer = WebGlBuffer;

    fn create_buffer(&mut self) -> Result<WebGlBuffer> {
        self.gl
            .create_buffer()
            .ok_or(Error::BufferAllocation("WebGL"))
    }

    fn upload_vertex_data(&mut self, buffer: &WebGlBuffer, data: &[f32]) {
        self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));
        self.gl.buffer_data_with_u8_array(
            Gl::ARRAY_BUFFER,
            bytemuck::cast_slice(data),
            Gl::STATIC_DRAW,
        );
    }

    fn upload_index_data(&mut self, buffer: &WebGlBuffer, data: &[u32]) {
        self.gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(buffer));
        self.gl.buffer_data_with_u8_array(
            Gl::ELEMENT_ARRAY_BUFFER,
            bytemuck::cast_slice(data),
            Gl::STATIC_DRAW,
        );
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.gl
            .viewport(0, 0, viewport.width as i32, viewport.height as i32);
    }

    fn bind_shader_program(&mut self) {
        self.gl.use_program(Some(&self.program.program));
    }

    fn set_uniform(&mut self, uniform: Uniform, value: &Matrix4<f32>) {
        // nalgebra storage is column-major, as GL expects
        self.gl
            .uniform_matrix4fv_with_f32_array(self.program.uniform(uniform), false, value.as_slice());
    }

    fn draw_indexed_triangles(&mut self, call: DrawCall<'_, WebGlBuffer>) {
        let gl = &self.gl;

        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(call.vertex_buffer));
        gl.vertex_attrib_pointer_with_i32(
            self.program.position,
            call.position_components as i32,
            Gl::FLOAT,
            false,
            0,
            0,
        );

        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(call.color_buffer));
        gl.vertex_attrib_pointer_with_i32(
            self.program.color,
            call.color_components as i32,
            Gl::FLOAT,
            false,
            0,
            0,
        );

        gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(call.index_buffer));
        gl.draw_elements_with_i32(Gl::TRIANGLES, call.index_count as i32, Gl::UNSIGNED_INT, 0);
    }

    fn clear_frame(&mut self) {
        let [r, g, b, a] = CLEAR_COLOR;
        self.gl.clear_color(r, g, b, a);
        self.gl.enable(Gl::DEPTH_TEST);
        self.gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
    }
}
