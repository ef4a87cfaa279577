// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::error::BindError;
use super::gl::*;
use super::program::Program;
use super::uniforms::UniformValue;
use super::viewport::Viewport;
use glam::UVec2;

/// Sets transparent black clear color, depth testing and the viewport, then clears color and
/// depth. With a `porthole`, rendering is also scissored to it (undo with [`draw_scene`] or
/// `disable(ScissorTest)`).
pub fn prepare_canvas<C: GlContext>(gl: &C, porthole: Option<&Viewport>, canvas_size: UVec2) {
    gl.clear_color(0.0, 0.0, 0.0, 0.0);
    gl.clear_depth(1.0);
    gl.enable(Capability::DepthTest);
    gl.depth_func_less_equal();

    if let Some(porthole) = porthole {
        let [x, y, width, height] = porthole.to_array();
        gl.viewport(x, y, width, height);
        gl.enable(Capability::ScissorTest);
        gl.scissor(x, y, width, height);
    } else {
        gl.viewport(0, 0, canvas_size.x as i32, canvas_size.y as i32);
    }

    gl.clear_color_and_depth();
}

/// Clears color and depth inside `rect` only.
pub fn clear_rect<C: GlContext>(gl: &C, rect: &Viewport) {
    gl.clear_color(0.0, 0.0, 0.0, 0.0);
    gl.clear_depth(1.0);

    let [x, y, width, height] = rect.to_array();
    gl.enable(Capability::ScissorTest);
    gl.scissor(x, y, width, height);
    gl.clear_color_and_depth();
    gl.disable(Capability::ScissorTest);
}

/// Draws `count` indexed triangles from `vertex_array` over whatever is already on the canvas.
/// The viewport must already be set.
pub fn draw_elements<'a, C, N>(
    gl: &C,
    program: &Program<C>,
    vertex_array: &C::VertexArray,
    count: u32,
    uniforms: impl IntoIterator<Item = (N, UniformValue<'a, C::Texture>)>,
) -> Result<(), BindError>
where
    C: GlContext + Clone,
    C::Texture: 'a,
    N: AsRef<str>,
{
    program.use_program();
    program.set_uniforms(uniforms)?;

    gl.bind_vertex_array(Some(vertex_array));
    gl.draw_triangles_u16(count, 0);
    gl.bind_vertex_array(None);
    Ok(())
}

/// [`prepare_canvas`] then [`draw_elements`], leaving the scissor test disabled.
pub fn draw_scene<'a, C, N>(
    gl: &C,
    program: &Program<C>,
    vertex_array: &C::VertexArray,
    count: u32,
    uniforms: impl IntoIterator<Item = (N, UniformValue<'a, C::Texture>)>,
    porthole: Option<&Viewport>,
    canvas_size: UVec2,
) -> Result<(), BindError>
where
    C: GlContext + Clone,
    C::Texture: 'a,
    N: AsRef<str>,
{
    prepare_canvas(gl, porthole, canvas_size);
    let result = draw_elements(gl, program, vertex_array, count, uniforms);
    gl.disable(Capability::ScissorTest);
    result
}
