// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

//! A [`GlContext`] that records every call, for tests.

use super::gl::*;
use std::cell::{Ref, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Handles are plain ids. Uniform locations are the raw name they were resolved with.
pub(crate) type Id = u32;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    CreateShader(ShaderStage),
    CompileShader(Id),
    DeleteShader(Id),
    CreateProgram,
    AttachShader(Id, Id),
    LinkProgram(Id),
    DeleteProgram(Id),
    UseProgram(Option<Id>),
    Uniform1f(String, f32),
    Uniform1fv(String, Vec<f32>),
    Uniform2fv(String, Vec<f32>),
    Uniform3fv(String, Vec<f32>),
    Uniform4fv(String, Vec<f32>),
    Uniform1i(String, i32),
    Uniform1iv(String, Vec<i32>),
    Uniform2iv(String, Vec<i32>),
    Uniform3iv(String, Vec<i32>),
    Uniform4iv(String, Vec<i32>),
    UniformMatrix2fv(String, Vec<f32>),
    UniformMatrix3fv(String, Vec<f32>),
    UniformMatrix4fv(String, Vec<f32>),
    ActiveTexture(u32),
    BindTexture(TextureTarget, Option<Id>),
    CreateTexture,
    TexImage2d {
        face: TextureFace,
        width: u32,
        height: u32,
        pixels: bool,
    },
    TexSubImage2d {
        face: TextureFace,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    TexParameter(TextureTarget, TexParameter),
    GenerateMipmap(TextureTarget),
    CreateBuffer,
    BindBuffer(BufferTarget, Option<Id>),
    BufferData(BufferTarget, usize),
    EnableVertexAttribArray(u32),
    DisableVertexAttribArray(u32),
    VertexAttribPointer {
        index: u32,
        components: u32,
        element_type: ElementType,
        normalize: bool,
        stride: u32,
        offset: u32,
    },
    VertexAttribDivisor(u32, u32),
    VertexAttrib1f(u32, f32),
    VertexAttrib2f(u32, f32, f32),
    VertexAttrib3f(u32, f32, f32, f32),
    VertexAttrib4f(u32, f32, f32, f32, f32),
    CreateVertexArray,
    BindVertexArray(Option<Id>),
    ClearColor(f32, f32, f32, f32),
    ClearDepth(f32),
    Clear,
    Enable(Capability),
    Disable(Capability),
    DepthFuncLessEqual,
    Viewport(i32, i32, i32, i32),
    Scissor(i32, i32, i32, i32),
    DrawTrianglesU16(u32, u32),
}

#[derive(Default)]
pub(crate) struct MockState {
    pub calls: Vec<Call>,
    /// `None` entries simulate the backend reporting fewer uniforms than its count.
    pub uniforms: Vec<Option<ActiveInfo>>,
    pub unlocated_uniforms: HashSet<String>,
    pub attribs: Vec<(ActiveInfo, u32)>,
    pub compile_failure: Option<(ShaderStage, String)>,
    pub link_failure: Option<String>,
    pub shader_stages: HashMap<Id, ShaderStage>,
    pub bound_vertex_array: Option<Id>,
    pub max_texture_units: Option<u32>,
    pub max_anisotropy: Option<f32>,
    pub refuse_vertex_array: bool,
    next_id: Id,
}

#[derive(Clone, Default)]
pub(crate) struct MockGl(Rc<RefCell<MockState>>);

impl MockGl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uniform(self, name: &str, type_tag: u32, size: u32) -> Self {
        self.0.borrow_mut().uniforms.push(Some(ActiveInfo {
            name: name.to_owned(),
            type_tag,
            size,
        }));
        self
    }

    pub fn missing_uniform(self) -> Self {
        self.0.borrow_mut().uniforms.push(None);
        self
    }

    pub fn unlocated_uniform(self, name: &str, type_tag: u32) -> Self {
        self.0
            .borrow_mut()
            .unlocated_uniforms
            .insert(name.to_owned());
        self.uniform(name, type_tag, 1)
    }

    /// Attribute locations are deliberately not the enumeration index.
    pub fn attrib(self, name: &str, type_tag: u32, location: u32) -> Self {
        self.0.borrow_mut().attribs.push((
            ActiveInfo {
                name: name.to_owned(),
                type_tag,
                size: 1,
            },
            location,
        ));
        self
    }

    pub fn fail_compile(self, stage: ShaderStage, log: &str) -> Self {
        self.0.borrow_mut().compile_failure = Some((stage, log.to_owned()));
        self
    }

    pub fn fail_link(self, log: &str) -> Self {
        self.0.borrow_mut().link_failure = Some(log.to_owned());
        self
    }

    pub fn max_texture_units(self, units: u32) -> Self {
        self.0.borrow_mut().max_texture_units = Some(units);
        self
    }

    #[cfg(feature = "anisotropy")]
    pub fn anisotropy(self, max: f32) -> Self {
        self.0.borrow_mut().max_anisotropy = Some(max);
        self
    }

    pub fn refuse_vertex_array(self) -> Self {
        self.0.borrow_mut().refuse_vertex_array = true;
        self
    }

    pub fn state(&self) -> Ref<'_, MockState> {
        self.0.borrow()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut self.0.borrow_mut().calls)
    }

    fn record(&self, call: Call) {
        self.0.borrow_mut().calls.push(call);
    }

    /// Null locations are dropped like WebGL2 drops them.
    fn record_uniform(&self, location: Option<&String>, call: impl FnOnce(String) -> Call) {
        if let Some(location) = location {
            self.record(call(location.clone()));
        }
    }

    fn next_id(&self) -> Id {
        let mut state = self.0.borrow_mut();
        state.next_id += 1;
        state.next_id
    }
}

impl GlContext for MockGl {
    type Program = Id;
    type Shader = Id;
    type UniformLocation = String;
    type Texture = Id;
    type Buffer = Id;
    type VertexArray = Id;

    fn create_shader(&self, stage: ShaderStage) -> Option<Id> {
        self.record(Call::CreateShader(stage));
        let id = self.next_id();
        self.0.borrow_mut().shader_stages.insert(id, stage);
        Some(id)
    }

    fn compile_shader(&self, shader: &Id, _source: &str) {
        self.record(Call::CompileShader(*shader));
    }

    fn shader_compile_status(&self, shader: &Id) -> bool {
        let state = self.0.borrow();
        let stage = state.shader_stages.get(shader).copied();
        !matches!(&state.compile_failure, Some((failing, _)) if Some(*failing) == stage)
    }

    fn shader_info_log(&self, _shader: &Id) -> String {
        self.0
            .borrow()
            .compile_failure
            .as_ref()
            .map(|(_, log)| log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: &Id) {
        self.record(Call::DeleteShader(*shader));
    }

    fn create_program(&self) -> Option<Id> {
        self.record(Call::CreateProgram);
        Some(self.next_id())
    }

    fn attach_shader(&self, program: &Id, shader: &Id) {
        self.record(Call::AttachShader(*program, *shader));
    }

    fn link_program(&self, program: &Id) {
        self.record(Call::LinkProgram(*program));
    }

    fn program_link_status(&self, _program: &Id) -> bool {
        self.0.borrow().link_failure.is_none()
    }

    fn program_info_log(&self, _program: &Id) -> String {
        self.0.borrow().link_failure.clone().unwrap_or_default()
    }

    fn delete_program(&self, program: &Id) {
        self.record(Call::DeleteProgram(*program));
    }

    fn use_program(&self, program: Option<&Id>) {
        self.record(Call::UseProgram(program.copied()));
    }

    fn active_uniform_count(&self, _program: &Id) -> u32 {
        self.0.borrow().uniforms.len() as u32
    }

    fn active_uniform(&self, _program: &Id, index: u32) -> Option<ActiveInfo> {
        self.0.borrow().uniforms.get(index as usize).cloned().flatten()
    }

    fn active_attrib_count(&self, _program: &Id) -> u32 {
        self.0.borrow().attribs.len() as u32
    }

    fn active_attrib(&self, _program: &Id, index: u32) -> Option<ActiveInfo> {
        self.0
            .borrow()
            .attribs
            .get(index as usize)
            .map(|(info, _)| info.clone())
    }

    fn uniform_location(&self, _program: &Id, name: &str) -> Option<String> {
        let state = self.0.borrow();
        let active = state.uniforms.iter().flatten().any(|u| u.name == name);
        (active && !state.unlocated_uniforms.contains(name)).then(|| name.to_owned())
    }

    fn attrib_location(&self, _program: &Id, name: &str) -> Option<u32> {
        self.0
            .borrow()
            .attribs
            .iter()
            .find(|(info, _)| info.name == name)
            .map(|(_, location)| *location)
    }

    fn max_texture_units(&self) -> Option<u32> {
        self.0.borrow().max_texture_units
    }

    fn uniform1f(&self, location: Option<&String>, x: f32) {
        self.record_uniform(location, |l| Call::Uniform1f(l, x));
    }

    fn uniform1fv(&self, location: Option<&String>, data: &[f32]) {
        self.record_uniform(location, |l| Call::Uniform1fv(l, data.to_vec()));
    }

    fn uniform2fv(&self, location: Option<&String>, data: &[f32]) {
        self.record_uniform(location, |l| Call::Uniform2fv(l, data.to_vec()));
    }

    fn uniform3fv(&self, location: Option<&String>, data: &[f32]) {
        self.record_uniform(location, |l| Call::Uniform3fv(l, data.to_vec()));
    }

    fn uniform4fv(&self, location: Option<&String>, data: &[f32]) {
        self.record_uniform(location, |l| Call::Uniform4fv(l, data.to_vec()));
    }

    fn uniform1i(&self, location: Option<&String>, x: i32) {
        self.record_uniform(location, |l| Call::Uniform1i(l, x));
    }

    fn uniform1iv(&self, location: Option<&String>, data: &[i32]) {
        self.record_uniform(location, |l| Call::Uniform1iv(l, data.to_vec()));
    }

    fn uniform2iv(&self, location: Option<&String>, data: &[i32]) {
        self.record_uniform(location, |l| Call::Uniform2iv(l, data.to_vec()));
    }

    fn uniform3iv(&self, location: Option<&String>, data: &[i32]) {
        self.record_uniform(location, |l| Call::Uniform3iv(l, data.to_vec()));
    }

    fn uniform4iv(&self, location: Option<&String>, data: &[i32]) {
        self.record_uniform(location, |l| Call::Uniform4iv(l, data.to_vec()));
    }

    fn uniform_matrix2fv(&self, location: Option<&String>, data: &[f32]) {
        self.record_uniform(location, |l| Call::UniformMatrix2fv(l, data.to_vec()));
    }

    fn uniform_matrix3fv(&self, location: Option<&String>, data: &[f32]) {
        self.record_uniform(location, |l| Call::UniformMatrix3fv(l, data.to_vec()));
    }

    fn uniform_matrix4fv(&self, location: Option<&String>, data: &[f32]) {
        self.record_uniform(location, |l| Call::UniformMatrix4fv(l, data.to_vec()));
    }

    fn active_texture(&self, unit: u32) {
        self.record(Call::ActiveTexture(unit));
    }

    fn bind_texture(&self, target: TextureTarget, texture: Option<&Id>) {
        self.record(Call::BindTexture(target, texture.copied()));
    }

    fn create_texture(&self) -> Option<Id> {
        self.record(Call::CreateTexture);
        Some(self.next_id())
    }

    fn tex_image_2d(&self, face: TextureFace, width: u32, height: u32, pixels: Option<&[u8]>) {
        self.record(Call::TexImage2d {
            face,
            width,
            height,
            pixels: pixels.is_some(),
        });
    }

    fn tex_sub_image_2d(
        &self,
        face: TextureFace,
        x_offset: u32,
        y_offset: u32,
        width: u32,
        height: u32,
        _pixels: &[u8],
    ) {
        self.record(Call::TexSubImage2d {
            face,
            x: x_offset,
            y: y_offset,
            width,
            height,
        });
    }

    fn tex_parameter(&self, target: TextureTarget, parameter: TexParameter) {
        self.record(Call::TexParameter(target, parameter));
    }

    fn generate_mipmap(&self, target: TextureTarget) {
        self.record(Call::GenerateMipmap(target));
    }

    fn max_anisotropy(&self) -> Option<f32> {
        self.0.borrow().max_anisotropy
    }

    fn create_buffer(&self) -> Option<Id> {
        self.record(Call::CreateBuffer);
        Some(self.next_id())
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<&Id>) {
        self.record(Call::BindBuffer(target, buffer.copied()));
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        self.record(Call::BufferData(target, data.len()));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableVertexAttribArray(index));
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::DisableVertexAttribArray(index));
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
        self.record(Call::VertexAttribPointer {
            index,
            components,
            element_type,
            normalize,
            stride,
            offset,
        });
    }

    fn vertex_attrib_divisor(&self, index: u32, divisor: u32) {
        self.record(Call::VertexAttribDivisor(index, divisor));
    }

    fn vertex_attrib1f(&self, index: u32, x: f32) {
        self.record(Call::VertexAttrib1f(index, x));
    }

    fn vertex_attrib2f(&self, index: u32, x: f32, y: f32) {
        self.record(Call::VertexAttrib2f(index, x, y));
    }

    fn vertex_attrib3f(&self, index: u32, x: f32, y: f32, z: f32) {
        self.record(Call::VertexAttrib3f(index, x, y, z));
    }

    fn vertex_attrib4f(&self, index: u32, x: f32, y: f32, z: f32, w: f32) {
        self.record(Call::VertexAttrib4f(index, x, y, z, w));
    }

    fn create_vertex_array(&self) -> Option<Id> {
        self.record(Call::CreateVertexArray);
        if self.0.borrow().refuse_vertex_array {
            return None;
        }
        Some(self.next_id())
    }

    fn bind_vertex_array(&self, vertex_array: Option<&Id>) {
        self.record(Call::BindVertexArray(vertex_array.copied()));
        self.0.borrow_mut().bound_vertex_array = vertex_array.copied();
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(Call::ClearColor(r, g, b, a));
    }

    fn clear_depth(&self, depth: f32) {
        self.record(Call::ClearDepth(depth));
    }

    fn clear_color_and_depth(&self) {
        self.record(Call::Clear);
    }

    fn enable(&self, capability: Capability) {
        self.record(Call::Enable(capability));
    }

    fn disable(&self, capability: Capability) {
        self.record(Call::Disable(capability));
    }

    fn depth_func_less_equal(&self) {
        self.record(Call::DepthFuncLessEqual);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn scissor(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Scissor(x, y, width, height));
    }

    fn draw_triangles_u16(&self, count: u32, offset: u32) {
        self.record(Call::DrawTrianglesU16(count, offset));
    }
}
