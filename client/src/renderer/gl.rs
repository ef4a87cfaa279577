// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

//! The rendering context seam. Everything above this module talks to a [`GlContext`], never to
//! a concrete WebGL object, so binders can be exercised against any backend.

use strum_macros::{Display, IntoStaticStr};

/// Raw type tags reported by active variable introspection (`getActiveUniform` /
/// `getActiveAttrib`). Values are shared by every GL flavor.
#[allow(missing_docs)]
pub mod tag {
    pub const FLOAT: u32 = 0x1406;
    pub const FLOAT_VEC2: u32 = 0x8B50;
    pub const FLOAT_VEC3: u32 = 0x8B51;
    pub const FLOAT_VEC4: u32 = 0x8B52;
    pub const INT: u32 = 0x1404;
    pub const INT_VEC2: u32 = 0x8B53;
    pub const INT_VEC3: u32 = 0x8B54;
    pub const INT_VEC4: u32 = 0x8B55;
    pub const BOOL: u32 = 0x8B56;
    pub const BOOL_VEC2: u32 = 0x8B57;
    pub const BOOL_VEC3: u32 = 0x8B58;
    pub const BOOL_VEC4: u32 = 0x8B59;
    pub const FLOAT_MAT2: u32 = 0x8B5A;
    pub const FLOAT_MAT3: u32 = 0x8B5B;
    pub const FLOAT_MAT4: u32 = 0x8B5C;
    pub const SAMPLER_2D: u32 = 0x8B5E;
    pub const SAMPLER_3D: u32 = 0x8B5F;
    pub const SAMPLER_CUBE: u32 = 0x8B60;
}

/// One entry of active variable introspection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveInfo {
    /// Name as reported, including any `[0]` array decoration.
    pub name: String,
    /// Raw type tag, see [`tag`].
    pub type_tag: u32,
    /// Declared array length (1 for non-arrays).
    pub size: u32,
}

/// Shader pipeline stage.
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq, IntoStaticStr)]
pub enum ShaderStage {
    /// Vertex shader.
    #[strum(serialize = "vertex")]
    Vertex,
    /// Fragment shader.
    #[strum(serialize = "fragment")]
    Fragment,
}

/// Where a texture is bound.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TextureTarget {
    /// `TEXTURE_2D`.
    D2,
    /// `TEXTURE_CUBE_MAP`.
    Cube,
}

/// Face of a texture that an image is uploaded into.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TextureFace {
    /// The only face of a 2D texture.
    D2,
    /// Positive X face of a cube map.
    PX,
    /// Negative X face of a cube map.
    NX,
    /// Positive Y face of a cube map.
    PY,
    /// Negative Y face of a cube map.
    NY,
    /// Positive Z face of a cube map.
    PZ,
    /// Negative Z face of a cube map.
    NZ,
}

impl TextureFace {
    /// Cube faces in upload order.
    pub const CUBE: [Self; 6] = [Self::PX, Self::NX, Self::PY, Self::NY, Self::PZ, Self::NZ];
}

/// Minification and magnification filters.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Filter {
    /// `NEAREST`.
    Nearest,
    /// `LINEAR`.
    Linear,
    /// `LINEAR_MIPMAP_LINEAR`, only valid for minification.
    Trilinear,
}

/// Texture coordinate wrapping.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Wrap {
    /// `CLAMP_TO_EDGE`.
    ClampToEdge,
    /// `REPEAT`.
    Repeat,
}

/// A texture parameter write.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TexParameter {
    /// `TEXTURE_MIN_FILTER`.
    MinFilter(Filter),
    /// `TEXTURE_MAG_FILTER`.
    MagFilter(Filter),
    /// `TEXTURE_WRAP_S`.
    WrapS(Wrap),
    /// `TEXTURE_WRAP_T`.
    WrapT(Wrap),
    /// `TEXTURE_MAX_ANISOTROPY_EXT`.
    MaxAnisotropy(f32),
}

/// Element type of a vertex attribute buffer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ElementType {
    /// `i8`.
    Byte,
    /// `u8`.
    UnsignedByte,
    /// `i16`.
    Short,
    /// `u16`.
    UnsignedShort,
    /// `f32`.
    #[default]
    Float,
}

/// Buffer binding point.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BufferTarget {
    /// `ARRAY_BUFFER`.
    Array,
    /// `ELEMENT_ARRAY_BUFFER`.
    ElementArray,
}

/// Capabilities toggled by [`GlContext::enable`] / [`GlContext::disable`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Capability {
    /// `DEPTH_TEST`.
    DepthTest,
    /// `SCISSOR_TEST`.
    ScissorTest,
}

/// A rendering context exposing program, texture and buffer primitives.
///
/// Method names mirror the WebGL calls they stand for. Writes that have several structurally
/// similar forms (`uniform1f` vs `uniform1fv`, `uniform2fv` vs `uniform2iv`...) stay separate
/// methods so callers pick the exact form.
pub trait GlContext {
    /// Linked program.
    type Program;
    /// Compiled shader stage.
    type Shader;
    /// Uniform storage location, only valid for the program it came from.
    type UniformLocation;
    /// Texture object.
    type Texture;
    /// Buffer object.
    type Buffer;
    /// Vertex array object.
    type VertexArray;

    /// Creates an empty shader of `stage`.
    fn create_shader(&self, stage: ShaderStage) -> Option<Self::Shader>;
    /// Uploads `source` and compiles it.
    fn compile_shader(&self, shader: &Self::Shader, source: &str);
    /// Whether the last compile succeeded.
    fn shader_compile_status(&self, shader: &Self::Shader) -> bool;
    /// Compiler diagnostics.
    fn shader_info_log(&self, shader: &Self::Shader) -> String;
    /// Deletes a shader (deferred by the backend while attached).
    fn delete_shader(&self, shader: &Self::Shader);

    /// Creates an empty program.
    fn create_program(&self) -> Option<Self::Program>;
    /// Attaches a compiled stage.
    fn attach_shader(&self, program: &Self::Program, shader: &Self::Shader);
    /// Links attached stages.
    fn link_program(&self, program: &Self::Program);
    /// Whether the last link succeeded.
    fn program_link_status(&self, program: &Self::Program) -> bool;
    /// Linker diagnostics.
    fn program_info_log(&self, program: &Self::Program) -> String;
    /// Deletes a program.
    fn delete_program(&self, program: &Self::Program);
    /// Makes `program` current for subsequent draws (or none).
    fn use_program(&self, program: Option<&Self::Program>);

    /// Number of active uniforms.
    fn active_uniform_count(&self, program: &Self::Program) -> u32;
    /// Introspects active uniform `index`; may be `None` even below the count.
    fn active_uniform(&self, program: &Self::Program, index: u32) -> Option<ActiveInfo>;
    /// Number of active attributes.
    fn active_attrib_count(&self, program: &Self::Program) -> u32;
    /// Introspects active attribute `index`.
    fn active_attrib(&self, program: &Self::Program, index: u32) -> Option<ActiveInfo>;
    /// Resolves a uniform by its introspected name.
    fn uniform_location(&self, program: &Self::Program, name: &str)
        -> Option<Self::UniformLocation>;
    /// Resolves an attribute index by name.
    fn attrib_location(&self, program: &Self::Program, name: &str) -> Option<u32>;

    /// Maximum number of combined texture units, if the backend reports it.
    fn max_texture_units(&self) -> Option<u32> {
        None
    }

    /// `uniform1f`. Writes to a `None` location are ignored, as WebGL2 ignores a null location.
    fn uniform1f(&self, location: Option<&Self::UniformLocation>, x: f32);
    /// `uniform1fv`.
    fn uniform1fv(&self, location: Option<&Self::UniformLocation>, data: &[f32]);
    /// `uniform2fv`.
    fn uniform2fv(&self, location: Option<&Self::UniformLocation>, data: &[f32]);
    /// `uniform3fv`.
    fn uniform3fv(&self, location: Option<&Self::UniformLocation>, data: &[f32]);
    /// `uniform4fv`.
    fn uniform4fv(&self, location: Option<&Self::UniformLocation>, data: &[f32]);
    /// `uniform1i`.
    fn uniform1i(&self, location: Option<&Self::UniformLocation>, x: i32);
    /// `uniform1iv`.
    fn uniform1iv(&self, location: Option<&Self::UniformLocation>, data: &[i32]);
    /// `uniform2iv`.
    fn uniform2iv(&self, location: Option<&Self::UniformLocation>, data: &[i32]);
    /// `uniform3iv`.
    fn uniform3iv(&self, location: Option<&Self::UniformLocation>, data: &[i32]);
    /// `uniform4iv`.
    fn uniform4iv(&self, location: Option<&Self::UniformLocation>, data: &[i32]);
    /// `uniformMatrix2fv` (column major, never transposed).
    fn uniform_matrix2fv(&self, location: Option<&Self::UniformLocation>, data: &[f32]);
    /// `uniformMatrix3fv` (column major, never transposed).
    fn uniform_matrix3fv(&self, location: Option<&Self::UniformLocation>, data: &[f32]);
    /// `uniformMatrix4fv` (column major, never transposed).
    fn uniform_matrix4fv(&self, location: Option<&Self::UniformLocation>, data: &[f32]);

    /// Selects texture unit `unit` (`TEXTURE0 + unit`).
    fn active_texture(&self, unit: u32);
    /// Binds (or unbinds) a texture to `target` of the active unit.
    fn bind_texture(&self, target: TextureTarget, texture: Option<&Self::Texture>);
    /// Creates a texture object.
    fn create_texture(&self) -> Option<Self::Texture>;
    /// Specifies an RGBA8 image for `face` at level 0. `pixels` of `None` allocates only.
    fn tex_image_2d(&self, face: TextureFace, width: u32, height: u32, pixels: Option<&[u8]>);
    /// Overwrites an RGBA8 sub-rectangle of `face` at level 0.
    fn tex_sub_image_2d(
        &self,
        face: TextureFace,
        x_offset: u32,
        y_offset: u32,
        width: u32,
        height: u32,
        pixels: &[u8],
    );
    /// Sets a parameter of the texture bound to `target`.
    fn tex_parameter(&self, target: TextureTarget, parameter: TexParameter);
    /// Generates mipmaps of the texture bound to `target`.
    fn generate_mipmap(&self, target: TextureTarget);
    /// Maximum anisotropy, if anisotropic filtering is available.
    fn max_anisotropy(&self) -> Option<f32> {
        None
    }

    /// Creates a buffer object.
    fn create_buffer(&self) -> Option<Self::Buffer>;
    /// Binds (or unbinds) a buffer.
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<&Self::Buffer>);
    /// Uploads static data into the buffer bound to `target`.
    fn buffer_data(&self, target: BufferTarget, data: &[u8]);

    /// Enables reading attribute `index` from an array.
    fn enable_vertex_attrib_array(&self, index: u32);
    /// Disables reading attribute `index` from an array, so its constant value is used.
    fn disable_vertex_attrib_array(&self, index: u32);
    /// Programs the per-vertex layout of attribute `index` from the bound array buffer.
    fn vertex_attrib_pointer(
        &self,
        index: u32,
        components: u32,
        element_type: ElementType,
        normalize: bool,
        stride: u32,
        offset: u32,
    );
    /// Instancing divisor of attribute `index`.
    fn vertex_attrib_divisor(&self, index: u32, divisor: u32);
    /// `vertexAttrib1f`.
    fn vertex_attrib1f(&self, index: u32, x: f32);
    /// `vertexAttrib2f`.
    fn vertex_attrib2f(&self, index: u32, x: f32, y: f32);
    /// `vertexAttrib3f`.
    fn vertex_attrib3f(&self, index: u32, x: f32, y: f32, z: f32);
    /// `vertexAttrib4f`.
    fn vertex_attrib4f(&self, index: u32, x: f32, y: f32, z: f32, w: f32);

    /// Creates a vertex array object.
    fn create_vertex_array(&self) -> Option<Self::VertexArray>;
    /// Binds (or unbinds) a vertex array object.
    fn bind_vertex_array(&self, vertex_array: Option<&Self::VertexArray>);

    /// Sets the clear color.
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    /// Sets the clear depth.
    fn clear_depth(&self, depth: f32);
    /// Clears color and depth buffers.
    fn clear_color_and_depth(&self);
    /// Enables a capability.
    fn enable(&self, capability: Capability);
    /// Disables a capability.
    fn disable(&self, capability: Capability);
    /// Uses `LEQUAL` depth comparison.
    fn depth_func_less_equal(&self);
    /// Sets the viewport in framebuffer pixels.
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    /// Sets the scissor box in framebuffer pixels.
    fn scissor(&self, x: i32, y: i32, width: i32, height: i32);
    /// Draws `count` `u16`-indexed triangles starting at byte `offset` of the element buffer.
    fn draw_triangles_u16(&self, count: u32, offset: u32);
}
