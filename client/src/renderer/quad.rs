// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::attribs::BufferDescriptor;
use super::error::BindError;
use super::gl::*;
use super::program::Program;
use glam::{Vec2, Vec3};

/// Corners of the unit square in clip space, counter clockwise from bottom left.
const POSITIONS: [Vec3; 4] = [
    Vec3::new(-1.0, -1.0, 0.0),
    Vec3::new(1.0, -1.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(-1.0, 1.0, 0.0),
];

/// Images have (0, 0) at the top left.
const TEX_COORDS: [Vec2; 4] = [
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, 0.0),
];

const INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

/// Buffers for a full screen quad, read by attributes named `aVertexPosition` (`vec3`) and
/// `aTexCoord` (`vec2`).
pub struct QuadBuffers<C: GlContext> {
    positions: C::Buffer,
    tex_coords: C::Buffer,
    indices: C::Buffer,
}

fn upload<C: GlContext>(gl: &C, target: BufferTarget, data: &[u8]) -> Result<C::Buffer, BindError> {
    let buffer = gl
        .create_buffer()
        .ok_or(BindError::CreateFailed("buffer"))?;
    gl.bind_buffer(target, Some(&buffer));
    gl.buffer_data(target, data);
    Ok(buffer)
}

impl<C: GlContext> QuadBuffers<C> {
    /// Number of indices to draw.
    pub const INDEX_COUNT: u32 = INDICES.len() as u32;

    /// Uploads the quad.
    pub fn new(gl: &C) -> Result<Self, BindError> {
        Ok(Self {
            positions: upload(gl, BufferTarget::Array, bytemuck::cast_slice(&POSITIONS))?,
            tex_coords: upload(gl, BufferTarget::Array, bytemuck::cast_slice(&TEX_COORDS))?,
            indices: upload(gl, BufferTarget::ElementArray, bytemuck::cast_slice(&INDICES))?,
        })
    }

    /// Attribute layout, per vertex.
    pub fn attributes(&self) -> [(&'static str, BufferDescriptor<'_, C::Buffer>); 2] {
        [
            (
                "aVertexPosition",
                BufferDescriptor::new(&self.positions, 3).per_vertex(),
            ),
            (
                "aTexCoord",
                BufferDescriptor::new(&self.tex_coords, 2).per_vertex(),
            ),
        ]
    }

    /// `u16` element buffer.
    pub fn indices(&self) -> &C::Buffer {
        &self.indices
    }

    /// Creates a vertex array reading the quad into `program`'s attributes.
    pub fn vertex_array(&self, program: &Program<C>) -> Result<C::VertexArray, BindError>
    where
        C: Clone,
    {
        program.construct_vertex_array(self.attributes(), Some(&self.indices))
    }
}
