// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::gl::ShaderStage;
use thiserror::Error;

/// Fatal errors raised while building a [`Program`][`super::Program`]. None of these can occur
/// once a program exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgramError {
    /// A stage failed to compile. The backend's log is kept verbatim.
    #[error("error compiling {stage} shader:\n{log}")]
    ShaderCompile {
        /// Stage that failed.
        stage: ShaderStage,
        /// Compiler diagnostics.
        log: String,
    },
    /// Compiled stages failed to link. The backend's log is kept verbatim.
    #[error("error linking program:\n{log}")]
    ProgramLink {
        /// Linker diagnostics.
        log: String,
    },
    /// Introspection reported a uniform type this layer has no setter for.
    #[error("uniform {name:?} has unsupported type 0x{type_tag:x}")]
    UnsupportedUniformType {
        /// Introspected name.
        name: String,
        /// Raw type tag.
        type_tag: u32,
    },
    /// The context refused to allocate an object (usually a lost context).
    #[error("failed to create {0}")]
    CreateFailed(&'static str),
}

/// Errors from misusing a setter at draw time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The value doesn't have the shape the variable was declared with.
    #[error("uniform {name:?} expects {expected}")]
    ValueMismatch {
        /// Variable name (array decoration stripped).
        name: String,
        /// Description of the accepted shape.
        expected: &'static str,
    },
    /// A constant attribute value must have 1 to 4 components.
    #[error("attribute {name:?} constant has {len} components, expected 1..=4")]
    ConstantArity {
        /// Attribute name.
        name: String,
        /// Supplied component count.
        len: usize,
    },
    /// The context refused to allocate an object.
    #[error("failed to create {0}")]
    CreateFailed(&'static str),
}
