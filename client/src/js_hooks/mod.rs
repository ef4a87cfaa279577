// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

//! # Js Hooks
//!
//! [`js_hooks`][`crate::js_hooks`] finds the canvas and WebGL2 context a program renders into,
//! and routes [`log`] output to JavaScript's console.

use crate::renderer::Rect;
use glam::Vec2;
use js_sys::Reflect;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, DomRect, Element, HtmlCanvasElement, WebGl2RenderingContext, Window};

/// Failure to reach the browser objects rendering needs.
#[derive(Error, Debug)]
pub enum ContextError {
    /// Not running in a browser window (e.g. a worker).
    #[error("no window")]
    NoWindow,
    /// The window has no document.
    #[error("no document")]
    NoDocument,
    /// No element has the id.
    #[error("no element with id {0:?}")]
    NoCanvas(String),
    /// The element with the id isn't a `<canvas>`.
    #[error("element {0:?} is not a canvas")]
    NotCanvas(String),
    /// The browser or device doesn't support WebGL2.
    #[error("webgl2 not supported")]
    NoWebGl2,
    /// A JavaScript exception.
    #[error("javascript error: {0}")]
    Js(String),
    /// [`init_logging`] was already called, or another logger is installed.
    #[error(transparent)]
    Logger(#[from] log::SetLoggerError),
}

/// Gets the window.
pub fn window() -> Result<Window, ContextError> {
    web_sys::window().ok_or(ContextError::NoWindow)
}

/// Gets the document.
pub fn document() -> Result<Document, ContextError> {
    window()?.document().ok_or(ContextError::NoDocument)
}

/// Gets the canvas with the given id.
pub fn canvas_by_id(id: &str) -> Result<HtmlCanvasElement, ContextError> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| ContextError::NoCanvas(id.to_owned()))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| ContextError::NotCanvas(id.to_owned()))
}

/// Gets a WebGL2 context for `canvas`. The result implements
/// [`GlContext`][`crate::renderer::GlContext`].
pub fn webgl2_context(canvas: &HtmlCanvasElement) -> Result<WebGl2RenderingContext, ContextError> {
    canvas
        .get_context("webgl2")
        .map_err(|e| ContextError::Js(error_message(&e).unwrap_or_default()))?
        .ok_or(ContextError::NoWebGl2)?
        .dyn_into::<WebGl2RenderingContext>()
        .map_err(|_| ContextError::NoWebGl2)
}

/// Gets `element`'s bounding rectangle relative to the window.
pub fn client_rect(element: &Element) -> Rect {
    Rect::from(&element.get_bounding_client_rect())
}

/// Gets `element`'s displayed size in CSS pixels.
pub fn client_size(element: &Element) -> Vec2 {
    Vec2::new(element.client_width() as f32, element.client_height() as f32)
}

impl From<&DomRect> for Rect {
    fn from(rect: &DomRect) -> Self {
        Self::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.right() as f32,
            rect.bottom() as f32,
        )
    }
}

/// Extracts an error message from a JavaScript error.
pub fn error_message(error: &JsValue) -> Option<String> {
    Reflect::get(error, &JsValue::from_str("message"))
        .as_ref()
        .ok()
        .and_then(JsValue::as_string)
}

/// Sends [`log`] records at or above `level` to the console, and panics to `console.error`.
pub fn init_logging(level: log::Level) -> Result<(), ContextError> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(level)?;
    Ok(())
}
