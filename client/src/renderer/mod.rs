// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

//! # Renderer
//!
//! [`renderer`][`crate::renderer`] introspects linked
//! [WebGL2](https://rustwasm.github.io/wasm-bindgen/api/web_sys/struct.WebGl2RenderingContext.html)
//! programs and builds typed setters for their uniforms and attributes, so callers can bind
//! values by name without tracking locations, texture units or attribute indices.
//!
//! Everything is written against [`GlContext`], which is implemented for
//! `web_sys::WebGl2RenderingContext` with the `webgl` feature.

mod attribs;
mod draw;
mod error;
mod gl;
#[cfg(test)]
mod mock;
mod program;
mod quad;
mod texture;
mod uniforms;
mod viewport;
#[cfg(feature = "webgl")]
mod webgl;

pub use self::attribs::*;
pub use self::draw::*;
pub use self::error::*;
pub use self::gl::*;
pub use self::program::*;
pub use self::quad::*;
pub use self::texture::*;
pub use self::uniforms::*;
pub use self::viewport::*;
