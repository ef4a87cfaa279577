// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

#![warn(missing_docs)]
//! # Shader Binder
//!
//! Typed uniform and attribute binding for WebGL2 programs, plus the texture, viewport and draw
//! helpers that usually sit next to them.

#[cfg(feature = "webgl")]
pub mod js_hooks;
pub mod renderer;
