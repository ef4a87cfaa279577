// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::gl::*;
use log::warn;
use web_sys::{
    WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlShader, WebGlTexture,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

#[cfg(feature = "anisotropy")]
use web_sys::ExtTextureFilterAnisotropic as Ani;

impl TextureTarget {
    fn gl(self) -> u32 {
        match self {
            Self::D2 => Gl::TEXTURE_2D,
            Self::Cube => Gl::TEXTURE_CUBE_MAP,
        }
    }
}

impl TextureFace {
    fn gl(self) -> u32 {
        match self {
            Self::D2 => Gl::TEXTURE_2D,
            Self::PX => Gl::TEXTURE_CUBE_MAP_POSITIVE_X,
            Self::NX => Gl::TEXTURE_CUBE_MAP_NEGATIVE_X,
            Self::PY => Gl::TEXTURE_CUBE_MAP_POSITIVE_Y,
            Self::NY => Gl::TEXTURE_CUBE_MAP_NEGATIVE_Y,
            Self::PZ => Gl::TEXTURE_CUBE_MAP_POSITIVE_Z,
            Self::NZ => Gl::TEXTURE_CUBE_MAP_NEGATIVE_Z,
        }
    }
}

impl Filter {
    fn gl(self) -> i32 {
        (match self {
            Self::Nearest => Gl::NEAREST,
            Self::Linear => Gl::LINEAR,
            Self::Trilinear => Gl::LINEAR_MIPMAP_LINEAR,
        }) as i32
    }
}

impl Wrap {
    fn gl(self) -> i32 {
        (match self {
            Self::ClampToEdge => Gl::CLAMP_TO_EDGE,
            Self::Repeat => Gl::REPEAT,
        }) as i32
    }
}

impl ElementType {
    fn gl(self) -> u32 {
        match self {
            Self::Byte => Gl::BYTE,
            Self::UnsignedByte => Gl::UNSIGNED_BYTE,
            Self::Short => Gl::SHORT,
            Self::UnsignedShort => Gl::UNSIGNED_SHORT,
            Self::Float => Gl::FLOAT,
        }
    }
}

impl BufferTarget {
    fn gl(self) -> u32 {
        match self {
            Self::Array => Gl::ARRAY_BUFFER,
            Self::ElementArray => Gl::ELEMENT_ARRAY_BUFFER,
        }
    }
}

impl Capability {
    fn gl(self) -> u32 {
        match self {
            Self::DepthTest => Gl::DEPTH_TEST,
            Self::ScissorTest => Gl::SCISSOR_TEST,
        }
    }
}

fn active_info(info: web_sys::WebGlActiveInfo) -> ActiveInfo {
    ActiveInfo {
        name: info.name(),
        type_tag: info.type_(),
        size: info.size().max(1) as u32,
    }
}

impl GlContext for Gl {
    type Program = WebGlProgram;
    type Shader = WebGlShader;
    type UniformLocation = WebGlUniformLocation;
    type Texture = WebGlTexture;
    type Buffer = WebGlBuffer;
    type VertexArray = WebGlVertexArrayObject;

    fn create_shader(&self, stage: ShaderStage) -> Option<WebGlShader> {
        Gl::create_shader(
            self,
            match stage {
                ShaderStage::Vertex => Gl::VERTEX_SHADER,
                ShaderStage::Fragment => Gl::FRAGMENT_SHADER,
            },
        )
    }

    fn compile_shader(&self, shader: &WebGlShader, source: &str) {
        self.shader_source(shader, source);
        Gl::compile_shader(self, shader);
    }

    fn shader_compile_status(&self, shader: &WebGlShader) -> bool {
        self.get_shader_parameter(shader, Gl::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: &WebGlShader) -> String {
        self.get_shader_info_log(shader).unwrap_or_default()
    }

    fn delete_shader(&self, shader: &WebGlShader) {
        Gl::delete_shader(self, Some(shader));
    }

    fn create_program(&self) -> Option<WebGlProgram> {
        Gl::create_program(self)
    }

    fn attach_shader(&self, program: &WebGlProgram, shader: &WebGlShader) {
        Gl::attach_shader(self, program, shader);
    }

    fn link_program(&self, program: &WebGlProgram) {
        Gl::link_program(self, program);
    }

    fn program_link_status(&self, program: &WebGlProgram) -> bool {
        self.get_program_parameter(program, Gl::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: &WebGlProgram) -> String {
        self.get_program_info_log(program).unwrap_or_default()
    }

    fn delete_program(&self, program: &WebGlProgram) {
        Gl::delete_program(self, Some(program));
    }

    fn use_program(&self, program: Option<&WebGlProgram>) {
        Gl::use_program(self, program);
    }

    fn active_uniform_count(&self, program: &WebGlProgram) -> u32 {
        self.get_program_parameter(program, Gl::ACTIVE_UNIFORMS)
            .as_f64()
            .unwrap_or(0.0) as u32
    }

    fn active_uniform(&self, program: &WebGlProgram, index: u32) -> Option<ActiveInfo> {
        self.get_active_uniform(program, index).map(active_info)
    }

    fn active_attrib_count(&self, program: &WebGlProgram) -> u32 {
        self.get_program_parameter(program, Gl::ACTIVE_ATTRIBUTES)
            .as_f64()
            .unwrap_or(0.0) as u32
    }

    fn active_attrib(&self, program: &WebGlProgram, index: u32) -> Option<ActiveInfo> {
        self.get_active_attrib(program, index).map(active_info)
    }

    fn uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.get_uniform_location(program, name)
    }

    fn attrib_location(&self, program: &WebGlProgram, name: &str) -> Option<u32> {
        u32::try_from(self.get_attrib_location(program, name)).ok()
    }

    fn max_texture_units(&self) -> Option<u32> {
        self.get_parameter(Gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS)
            .ok()
            .and_then(|v| v.as_f64())
            .map(|v| v as u32)
    }

    fn uniform1f(&self, location: Option<&WebGlUniformLocation>, x: f32) {
        Gl::uniform1f(self, location, x);
    }

    fn uniform1fv(&self, location: Option<&WebGlUniformLocation>, data: &[f32]) {
        self.uniform1fv_with_f32_array(location, data);
    }

    fn uniform2fv(&self, location: Option<&WebGlUniformLocation>, data: &[f32]) {
        self.uniform2fv_with_f32_array(location, data);
    }

    fn uniform3fv(&self, location: Option<&WebGlUniformLocation>, data: &[f32]) {
        self.uniform3fv_with_f32_array(location, data);
    }

    fn uniform4fv(&self, location: Option<&WebGlUniformLocation>, data: &[f32]) {
        self.uniform4fv_with_f32_array(location, data);
    }

    fn uniform1i(&self, location: Option<&WebGlUniformLocation>, x: i32) {
        Gl::uniform1i(self, location, x);
    }

    fn uniform1iv(&self, location: Option<&WebGlUniformLocation>, data: &[i32]) {
        self.uniform1iv_with_i32_array(location, data);
    }

    fn uniform2iv(&self, location: Option<&WebGlUniformLocation>, data: &[i32]) {
        self.uniform2iv_with_i32_array(location, data);
    }

    fn uniform3iv(&self, location: Option<&WebGlUniformLocation>, data: &[i32]) {
        self.uniform3iv_with_i32_array(location, data);
    }

    fn uniform4iv(&self, location: Option<&WebGlUniformLocation>, data: &[i32]) {
        self.uniform4iv_with_i32_array(location, data);
    }

    fn uniform_matrix2fv(&self, location: Option<&WebGlUniformLocation>, data: &[f32]) {
        self.uniform_matrix2fv_with_f32_array(location, false, data);
    }

    fn uniform_matrix3fv(&self, location: Option<&WebGlUniformLocation>, data: &[f32]) {
        self.uniform_matrix3fv_with_f32_array(location, false, data);
    }

    fn uniform_matrix4fv(&self, location: Option<&WebGlUniformLocation>, data: &[f32]) {
        self.uniform_matrix4fv_with_f32_array(location, false, data);
    }

    fn active_texture(&self, unit: u32) {
        Gl::active_texture(self, Gl::TEXTURE0 + unit);
    }

    fn bind_texture(&self, target: TextureTarget, texture: Option<&WebGlTexture>) {
        Gl::bind_texture(self, target.gl(), texture);
    }

    fn create_texture(&self) -> Option<WebGlTexture> {
        Gl::create_texture(self)
    }

    fn tex_image_2d(&self, face: TextureFace, width: u32, height: u32, pixels: Option<&[u8]>) {
        if let Err(e) = self
            .tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
                face.gl(),
                0,
                Gl::RGBA8 as i32,
                width as i32,
                height as i32,
                0,
                Gl::RGBA,
                Gl::UNSIGNED_BYTE,
                pixels,
            )
        {
            warn!("tex_image_2d failed: {e:?}");
        }
    }

    fn tex_sub_image_2d(
        &self,
        face: TextureFace,
        x_offset: u32,
        y_offset: u32,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) {
        if let Err(e) = self.tex_sub_image_2d_with_i32_and_i32_and_u32_and_type_and_opt_u8_array(
            face.gl(),
            0,
            x_offset as i32,
            y_offset as i32,
            width as i32,
            height as i32,
            Gl::RGBA,
            Gl::UNSIGNED_BYTE,
            Some(pixels),
        ) {
            warn!("tex_sub_image_2d failed: {e:?}");
        }
    }

    fn tex_parameter(&self, target: TextureTarget, parameter: TexParameter) {
        let target = target.gl();
        match parameter {
            TexParameter::MinFilter(f) => {
                self.tex_parameteri(target, Gl::TEXTURE_MIN_FILTER, f.gl())
            }
            TexParameter::MagFilter(f) => {
                self.tex_parameteri(target, Gl::TEXTURE_MAG_FILTER, f.gl())
            }
            TexParameter::WrapS(w) => self.tex_parameteri(target, Gl::TEXTURE_WRAP_S, w.gl()),
            TexParameter::WrapT(w) => self.tex_parameteri(target, Gl::TEXTURE_WRAP_T, w.gl()),
            #[cfg(feature = "anisotropy")]
            TexParameter::MaxAnisotropy(a) => {
                self.tex_parameterf(target, Ani::TEXTURE_MAX_ANISOTROPY_EXT, a)
            }
            #[cfg(not(feature = "anisotropy"))]
            TexParameter::MaxAnisotropy(_) => {}
        }
    }

    fn generate_mipmap(&self, target: TextureTarget) {
        Gl::generate_mipmap(self, target.gl());
    }

    #[cfg(feature = "anisotropy")]
    fn max_anisotropy(&self) -> Option<f32> {
        ["EXT_texture_filter_anisotropic", "WEBKIT_EXT_texture_filter_anisotropic"]
            .into_iter()
            .find_map(|name| self.get_extension(name).ok().flatten())?;
        self.get_parameter(Ani::MAX_TEXTURE_MAX_ANISOTROPY_EXT)
            .ok()
            .and_then(|v| v.as_f64())
            .map(|v| v as f32)
    }

    fn create_buffer(&self) -> Option<WebGlBuffer> {
        Gl::create_buffer(self)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<&WebGlBuffer>) {
        Gl::bind_buffer(self, target.gl(), buffer);
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        self.buffer_data_with_u8_array(target.gl(), data, Gl::STATIC_DRAW);
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        Gl::enable_vertex_attrib_array(self, index);
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        Gl::disable_vertex_attrib_array(self, index);
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        components: u32,
        element_type: ElementType,
        normalize: bool,
        stride: u32,
        offset: u32,
    ) {
        self.vertex_attrib_pointer_with_i32(
            index,
            components as i32,
            element_type.gl(),
            normalize,
            stride as i32,
            offset as i32,
        );
    }

    fn vertex_attrib_divisor(&self, index: u32, divisor: u32) {
        Gl::vertex_attrib_divisor(self, index, divisor);
    }

    fn vertex_attrib1f(&self, index: u32, x: f32) {
        Gl::vertex_attrib1f(self, index, x);
    }

    fn vertex_attrib2f(&self, index: u32, x: f32, y: f32) {
        Gl::vertex_attrib2f(self, index, x, y);
    }

    fn vertex_attrib3f(&self, index: u32, x: f32, y: f32, z: f32) {
        Gl::vertex_attrib3f(self, index, x, y, z);
    }

    fn vertex_attrib4f(&self, index: u32, x: f32, y: f32, z: f32, w: f32) {
        Gl::vertex_attrib4f(self, index, x, y, z, w);
    }

    fn create_vertex_array(&self) -> Option<WebGlVertexArrayObject> {
        Gl::create_vertex_array(self)
    }

    fn bind_vertex_array(&self, vertex_array: Option<&WebGlVertexArrayObject>) {
        Gl::bind_vertex_array(self, vertex_array);
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        Gl::clear_color(self, r, g, b, a);
    }

    fn clear_depth(&self, depth: f32) {
        Gl::clear_depth(self, depth);
    }

    fn clear_color_and_depth(&self) {
        self.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
    }

    fn enable(&self, capability: Capability) {
        Gl::enable(self, capability.gl());
    }

    fn disable(&self, capability: Capability) {
        Gl::disable(self, capability.gl());
    }

    fn depth_func_less_equal(&self) {
        self.depth_func(Gl::LEQUAL);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        Gl::viewport(self, x, y, width, height);
    }

    fn scissor(&self, x: i32, y: i32, width: i32, height: i32) {
        Gl::scissor(self, x, y, width, height);
    }

    fn draw_triangles_u16(&self, count: u32, offset: u32) {
        self.draw_elements_with_i32(Gl::TRIANGLES, count as i32, Gl::UNSIGNED_SHORT, offset as i32);
    }
}
