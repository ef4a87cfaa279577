// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::attribs::{
    build_attribute_setters, AttributeConstant, AttributeSetters, BufferDescriptor,
};
use super::error::{BindError, ProgramError};
use super::gl::*;
use super::uniforms::{build_uniform_setters, UniformSetters, UniformValue};
use log::{debug, error};

/// Options for [`Program::new`]. Build with chained calls, like
/// `ProgramOptions::default().reserve_unit_zero()`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ProgramOptions {
    texture_unit_base: u32,
}

impl ProgramOptions {
    /// Leaves texture unit 0 free for binding textures outside of any program (uploads, etc.).
    pub fn reserve_unit_zero(self) -> Self {
        self.texture_unit_base(1)
    }

    /// First texture unit handed to samplers.
    pub fn texture_unit_base(mut self, base: u32) -> Self {
        self.texture_unit_base = base;
        self
    }
}

/// A linked program plus the setters for all of its active uniforms and attributes. The program
/// is deleted when this is dropped.
pub struct Program<C: GlContext + Clone> {
    gl: C,
    program: C::Program,
    uniforms: UniformSetters<C>,
    attributes: AttributeSetters,
}

/// Deletes a shader when dropped. Shaders are only needed until the program is linked.
struct ShaderGuard<'a, C: GlContext> {
    gl: &'a C,
    shader: C::Shader,
}

impl<'a, C: GlContext> Drop for ShaderGuard<'a, C> {
    fn drop(&mut self) {
        self.gl.delete_shader(&self.shader);
    }
}

fn compile<'a, C: GlContext>(
    gl: &'a C,
    stage: ShaderStage,
    source: &str,
) -> Result<ShaderGuard<'a, C>, ProgramError> {
    let shader = ShaderGuard {
        gl,
        shader: gl
            .create_shader(stage)
            .ok_or(ProgramError::CreateFailed("shader"))?,
    };
    gl.compile_shader(&shader.shader, source);

    if !gl.shader_compile_status(&shader.shader) {
        let log = gl.shader_info_log(&shader.shader);
        error!("{stage} shader compile error: {log}");
        return Err(ProgramError::ShaderCompile { stage, log });
    }
    Ok(shader)
}

impl<C: GlContext + Clone> Program<C> {
    /// Compiles, links and introspects a program from GLSL sources.
    pub fn new(
        gl: &C,
        vertex: &str,
        fragment: &str,
        options: ProgramOptions,
    ) -> Result<Self, ProgramError> {
        let vertex = compile(gl, ShaderStage::Vertex, vertex)?;
        let fragment = compile(gl, ShaderStage::Fragment, fragment)?;

        let program = gl
            .create_program()
            .ok_or(ProgramError::CreateFailed("program"))?;
        gl.attach_shader(&program, &vertex.shader);
        gl.attach_shader(&program, &fragment.shader);
        gl.link_program(&program);

        if !gl.program_link_status(&program) {
            let log = gl.program_info_log(&program);
            error!("program link error: {log}");
            gl.delete_program(&program);
            return Err(ProgramError::ProgramLink { log });
        }

        // Attached shaders live as long as the program.
        drop(fragment);
        drop(vertex);

        let uniforms = match build_uniform_setters(gl, &program, options.texture_unit_base) {
            Ok(uniforms) => uniforms,
            Err(e) => {
                gl.delete_program(&program);
                return Err(e);
            }
        };
        let attributes = build_attribute_setters(gl, &program);
        debug!(
            "linked program with {} uniforms ({} texture units) and {} attributes",
            uniforms.len(),
            uniforms.texture_units_used(),
            attributes.len()
        );

        Ok(Self {
            gl: gl.clone(),
            program,
            uniforms,
            attributes,
        })
    }

    /// Makes this the current program. Required before setting uniforms.
    pub fn use_program(&self) {
        self.gl.use_program(Some(&self.program));
    }

    /// The underlying program handle.
    pub fn handle(&self) -> &C::Program {
        &self.program
    }

    /// Uniform setters.
    pub fn uniforms(&self) -> &UniformSetters<C> {
        &self.uniforms
    }

    /// Attribute setters.
    pub fn attributes(&self) -> &AttributeSetters {
        &self.attributes
    }

    /// Sets one uniform. Names the program doesn't use are ignored, since compilers strip unused
    /// uniforms freely.
    pub fn set_uniform<'a>(
        &self,
        name: &str,
        value: impl Into<UniformValue<'a, C::Texture>>,
    ) -> Result<(), BindError>
    where
        C::Texture: 'a,
    {
        match self.uniforms.get(name) {
            Some(setter) => setter.set(&self.gl, value.into()),
            None => Ok(()),
        }
    }

    /// Sets many uniforms, stopping at the first misuse.
    pub fn set_uniforms<'a, N: AsRef<str>>(
        &self,
        values: impl IntoIterator<Item = (N, UniformValue<'a, C::Texture>)>,
    ) -> Result<(), BindError>
    where
        C::Texture: 'a,
    {
        values
            .into_iter()
            .try_for_each(|(name, value)| self.set_uniform(name.as_ref(), value))
    }

    /// Sets a constant attribute value. Names the program doesn't use are ignored.
    pub fn set_attribute_constant(
        &self,
        name: &str,
        value: AttributeConstant<'_>,
    ) -> Result<(), BindError> {
        match self.attributes.get(name) {
            Some(setter) => setter.set_constant(&self.gl, value),
            None => Ok(()),
        }
    }

    /// See [`AttributeSetters::construct_vertex_array`].
    pub fn construct_vertex_array<'b, N, I>(
        &self,
        attributes: I,
        indices: Option<&C::Buffer>,
    ) -> Result<C::VertexArray, BindError>
    where
        C::Buffer: 'b,
        N: AsRef<str>,
        I: IntoIterator<Item = (N, BufferDescriptor<'b, C::Buffer>)>,
    {
        self.attributes.construct_vertex_array(&self.gl, attributes, indices)
    }
}

impl<C: GlContext + Clone> Drop for Program<C> {
    fn drop(&mut self) {
        self.gl.delete_program(&self.program);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::mock::{Call, MockGl};

    const VERTEX: &str =
        "attribute vec2 position; void main() { gl_Position = vec4(position, 0, 1); }";
    const FRAGMENT: &str = "uniform vec4 color; uniform sampler2D tex; void main() {}";

    fn scene() -> MockGl {
        MockGl::new()
            .uniform("color", tag::FLOAT_VEC4, 1)
            .uniform("tex", tag::SAMPLER_2D, 1)
            .attrib("position", tag::FLOAT_VEC2, 0)
    }

    #[test]
    fn end_to_end() {
        let gl = scene();
        let program = Program::new(&gl, VERTEX, FRAGMENT, ProgramOptions::default()).unwrap();
        assert_eq!(
            gl.take_calls(),
            [
                Call::CreateShader(ShaderStage::Vertex),
                Call::CompileShader(1),
                Call::CreateShader(ShaderStage::Fragment),
                Call::CompileShader(2),
                Call::CreateProgram,
                Call::AttachShader(3, 1),
                Call::AttachShader(3, 2),
                Call::LinkProgram(3),
                Call::DeleteShader(2),
                Call::DeleteShader(1),
            ]
        );
        assert_eq!(program.uniforms().names().collect::<Vec<_>>(), ["color", "tex"]);
        assert_eq!(program.attributes().names().collect::<Vec<_>>(), ["position"]);

        let texture = 40;
        let positions = 41;
        program.use_program();
        program
            .set_uniforms([
                ("color", UniformValue::Floats(&[1.0, 0.0, 0.0, 1.0])),
                ("tex", UniformValue::Texture(&texture)),
            ])
            .unwrap();
        let vao = program
            .construct_vertex_array([("position", BufferDescriptor::new(&positions, 2))], None)
            .unwrap();

        assert_eq!(
            gl.take_calls(),
            [
                Call::UseProgram(Some(3)),
                Call::Uniform4fv("color".to_owned(), vec![1.0, 0.0, 0.0, 1.0]),
                Call::Uniform1i("tex".to_owned(), 0),
                Call::ActiveTexture(0),
                Call::BindTexture(TextureTarget::D2, Some(texture)),
                Call::CreateVertexArray,
                Call::BindVertexArray(Some(vao)),
                Call::EnableVertexAttribArray(0),
                Call::BindBuffer(BufferTarget::Array, Some(positions)),
                Call::VertexAttribPointer {
                    index: 0,
                    components: 2,
                    element_type: ElementType::Float,
                    normalize: false,
                    stride: 0,
                    offset: 0,
                },
                Call::VertexAttribDivisor(0, 1),
                Call::BindVertexArray(None),
            ]
        );

        drop(program);
        assert_eq!(gl.calls(), [Call::DeleteProgram(3)]);
    }

    #[test]
    fn reserved_unit_zero() {
        let gl = scene();
        let program =
            Program::new(&gl, VERTEX, FRAGMENT, ProgramOptions::default().reserve_unit_zero())
                .unwrap();
        assert_eq!(program.uniforms().get("tex").unwrap().texture_units(), Some(1..2));
    }

    #[test]
    fn unknown_names_ignored() {
        let gl = scene();
        let program = Program::new(&gl, VERTEX, FRAGMENT, ProgramOptions::default()).unwrap();
        gl.take_calls();

        program.set_uniform("unused", 1.0f32).unwrap();
        program
            .set_attribute_constant("normal", AttributeConstant::Scalar(1.0))
            .unwrap();
        assert!(gl.calls().is_empty());
    }

    #[test]
    fn misuse_stops_set_uniforms() {
        let gl = scene();
        let program = Program::new(&gl, VERTEX, FRAGMENT, ProgramOptions::default()).unwrap();
        gl.take_calls();

        let result = program.set_uniforms([
            ("color", UniformValue::Float(1.0)),
            ("tex", UniformValue::Texture(&40)),
        ]);
        assert!(matches!(result, Err(BindError::ValueMismatch { name, .. }) if name == "color"));
        assert!(gl.calls().is_empty());
    }

    #[test]
    fn compile_failure_stops_before_link() {
        let gl = scene().fail_compile(ShaderStage::Fragment, "0:1: syntax error");
        let result = Program::new(&gl, VERTEX, FRAGMENT, ProgramOptions::default());
        assert_eq!(
            result.err(),
            Some(ProgramError::ShaderCompile {
                stage: ShaderStage::Fragment,
                log: "0:1: syntax error".to_owned(),
            })
        );
        assert_eq!(
            gl.calls(),
            [
                Call::CreateShader(ShaderStage::Vertex),
                Call::CompileShader(1),
                Call::CreateShader(ShaderStage::Fragment),
                Call::CompileShader(2),
                Call::DeleteShader(2),
                Call::DeleteShader(1),
            ]
        );
    }

    #[test]
    fn vertex_failure_skips_fragment() {
        let gl = scene().fail_compile(ShaderStage::Vertex, "bad");
        let result = Program::new(&gl, VERTEX, FRAGMENT, ProgramOptions::default());
        assert!(matches!(
            result.err(),
            Some(ProgramError::ShaderCompile {
                stage: ShaderStage::Vertex,
                ..
            })
        ));
        assert_eq!(
            gl.calls(),
            [
                Call::CreateShader(ShaderStage::Vertex),
                Call::CompileShader(1),
                Call::DeleteShader(1),
            ]
        );
    }

    #[test]
    fn link_failure_deletes_everything() {
        let gl = scene().fail_link("varying mismatch");
        let result = Program::new(&gl, VERTEX, FRAGMENT, ProgramOptions::default());
        assert_eq!(
            result.err(),
            Some(ProgramError::ProgramLink {
                log: "varying mismatch".to_owned(),
            })
        );
        let calls = gl.calls();
        assert_eq!(
            &calls[calls.len() - 3..],
            [
                Call::DeleteProgram(3),
                Call::DeleteShader(2),
                Call::DeleteShader(1),
            ]
        );
    }

    #[test]
    fn unsupported_uniform_deletes_program() {
        let gl = scene().uniform("volume", tag::SAMPLER_3D, 1);
        let result = Program::new(&gl, VERTEX, FRAGMENT, ProgramOptions::default());
        assert_eq!(
            result.err(),
            Some(ProgramError::UnsupportedUniformType {
                name: "volume".to_owned(),
                type_tag: tag::SAMPLER_3D,
            })
        );
        assert_eq!(gl.calls().last(), Some(&Call::DeleteProgram(3)));
    }
}
