/// The single flat-color program every solid is drawn with
use poly3d_core::{Error, Result, ShaderStage};
use web_sys::{WebGl2RenderingContext as Gl, WebGlProgram, WebGlShader};

pub const VERTEX_SHADER: &str = r#"
attribute vec3 vertexPos;
attribute vec4 vertexColor;
uniform mat4 modelViewMatrix;
uniform mat4 projectionMatrix;
varying vec4 vColor;

void main(void) {
    gl_Position = projectionMatrix * modelViewMatrix * vec4(vertexPos, 1.0);
    vColor = vertexColor;
}
"#;

pub const FRAGMENT_SHADER: &str = r#"
precision lowp float;
varying vec4 vColor;

void main(void) {
    gl_FragColor = vColor;
}
"#;

fn stage_type(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => Gl::VERTEX_SHADER,
        ShaderStage::Fragment => Gl::FRAGMENT_SHADER,
    }
}

/// Compile one stage, returning the driver's info log on failure
pub fn compile_shader(gl: &Gl, stage: ShaderStage, source: &str) -> Result<WebGlShader> {
    let shader = gl.create_shader(stage_type(stage)).ok_or_else(|| Error::ShaderCompile {
        stage,
        log: "could not create shader object".to_string(),
    })?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let compiled = gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if compiled {
        Ok(shader)
    } else {
        let log = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown error".to_string());
        gl.delete_shader(Some(&shader));
        Err(Error::ShaderCompile { stage, log })
    }
}

pub fn link_program(gl: &Gl, vertex: &WebGlShader, fragment: &WebGlShader) -> Result<WebGlProgram> {
    let program = gl
        .create_program()
        .ok_or_else(|| Error::ShaderLink("could not create program object".to_string()))?;
    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    gl.link_program(&program);

    let linked = gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if linked {
        Ok(program)
    } else {
        let log = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "could not initialise shaders".to_string());
        gl.delete_program(Some(&program));
        Err(Error::ShaderLink(log))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poly3d_core::{Uniform, COLOR_ATTRIBUTE, POSITION_ATTRIBUTE};

    #[test]
    fn test_sources_declare_core_interface() {
        assert!(VERTEX_SHADER.contains(&format!("attribute vec3 {};", POSITION_ATTRIBUTE)));
        assert!(VERTEX_SHADER.contains(&format!("attribute vec4 {};", COLOR_ATTRIBUTE)));
        for uniform in [Uniform::Projection, Uniform::ModelView] {
            assert!(VERTEX_SHADER.contains(&format!("uniform mat4 {};", uniform.name())));
        }
    }

    #[test]
    fn test_fragment_passes_color_through() {
        assert!(FRAGMENT_SHADER.contains("gl_FragColor = vColor;"));
        assert!(!FRAGMENT_SHADER.contains("uniform"));
    }
}
