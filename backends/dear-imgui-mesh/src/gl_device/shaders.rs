//! Shader program shared by UI and scene meshes

use super::GlVersion;
use crate::{InitError, InitResult};
use glow::{Context, HasContext};

pub(crate) type GlProgram = <Context as HasContext>::Program;
pub(crate) type GlUniformLocation = <Context as HasContext>::UniformLocation;

/// Shader program and its attribute/uniform locations
pub(crate) struct Shaders {
    pub program: GlProgram,
    pub uniform_mvp: Option<GlUniformLocation>,
    pub uniform_texture: Option<GlUniformLocation>,
    pub attrib_position: u32,
    pub attrib_texcoord: u32,
    pub attrib_color: u32,
}

impl Shaders {
    pub fn new(gl: &Context, gl_version: GlVersion) -> InitResult<Self> {
        let vertex_source = vertex_shader_source(gl_version);
        let fragment_source = fragment_shader_source(gl_version);

        unsafe {
            let vertex_shader = compile(gl, glow::VERTEX_SHADER, &vertex_source, "Vertex")?;
            let fragment_shader =
                match compile(gl, glow::FRAGMENT_SHADER, &fragment_source, "Fragment") {
                    Ok(shader) => shader,
                    Err(err) => {
                        gl.delete_shader(vertex_shader);
                        return Err(err);
                    }
                };

            let program = gl.create_program().map_err(InitError::CreateShader)?;
            gl.attach_shader(program, vertex_shader);
            gl.attach_shader(program, fragment_shader);
            gl.link_program(program);

            gl.detach_shader(program, vertex_shader);
            gl.detach_shader(program, fragment_shader);
            gl.delete_shader(vertex_shader);
            gl.delete_shader(fragment_shader);

            if !gl.get_program_link_status(program) {
                let error = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(InitError::LinkProgram(error));
            }

            let attrib = |name: &'static str| {
                gl.get_attrib_location(program, name)
                    .ok_or(InitError::MissingAttribute(name))
            };
            let locations = (attrib("Position"), attrib("TexCoord"), attrib("Color"));
            let (attrib_position, attrib_texcoord, attrib_color) = match locations {
                (Ok(position), Ok(texcoord), Ok(color)) => (position, texcoord, color),
                (Err(err), _, _) | (_, Err(err), _) | (_, _, Err(err)) => {
                    gl.delete_program(program);
                    return Err(err);
                }
            };

            Ok(Self {
                uniform_mvp: gl.get_uniform_location(program, "Mvp"),
                uniform_texture: gl.get_uniform_location(program, "Texture"),
                program,
                attrib_position,
                attrib_texcoord,
                attrib_color,
            })
        }
    }
}

unsafe fn compile(
    gl: &Context,
    kind: u32,
    source: &str,
    stage: &str,
) -> InitResult<<Context as HasContext>::Shader> {
    unsafe {
        let shader = gl.create_shader(kind).map_err(InitError::CreateShader)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            let error = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(InitError::CompileShader(format!("{stage} shader: {error}")));
        }
        Ok(shader)
    }
}

fn vertex_shader_source(gl_version: GlVersion) -> String {
    let (input, output) = if gl_version.legacy_glsl() {
        ("attribute", "varying")
    } else {
        ("in", "out")
    };
    format!(
        r#"{header}
uniform mat4 Mvp;
{input} vec3 Position;
{input} vec2 TexCoord;
{input} vec4 Color;
{output} vec2 Frag_UV;
{output} vec4 Frag_Color;

void main()
{{
    Frag_UV = TexCoord;
    Frag_Color = Color;
    gl_Position = Mvp * vec4(Position, 1.0);
}}
"#,
        header = gl_version.glsl_header(),
    )
}

fn fragment_shader_source(gl_version: GlVersion) -> String {
    if gl_version.legacy_glsl() {
        format!(
            r#"{header}
uniform sampler2D Texture;
varying vec2 Frag_UV;
varying vec4 Frag_Color;

void main()
{{
    gl_FragColor = Frag_Color * texture2D(Texture, Frag_UV.st);
}}
"#,
            header = gl_version.glsl_header(),
        )
    } else {
        format!(
            r#"{header}
uniform sampler2D Texture;
in vec2 Frag_UV;
in vec4 Frag_Color;
out vec4 Out_Color;

void main()
{{
    Out_Color = Frag_Color * texture(Texture, Frag_UV.st);
}}
"#,
            header = gl_version.glsl_header(),
        )
    }
}
