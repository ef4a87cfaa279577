// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::error::BindError;
use super::gl::*;
use linear_map::LinearMap;
use log::{debug, warn};

/// Describes how an attribute reads from a buffer. The buffer is borrowed, never modified.
pub struct BufferDescriptor<'a, B> {
    buffer: &'a B,
    components: u32,
    element_type: ElementType,
    normalize: bool,
    stride: u32,
    offset: u32,
    divisor: Option<u32>,
}

impl<'a, B> BufferDescriptor<'a, B> {
    /// Tightly packed `f32`s, `components` (1 to 4) per element, instanced with divisor 1 unless
    /// overridden.
    pub fn new(buffer: &'a B, components: u32) -> Self {
        if !(1..=4).contains(&components) {
            warn!("buffer descriptor has {components} components, expected 1 to 4");
        }
        Self {
            buffer,
            components,
            element_type: ElementType::Float,
            normalize: false,
            stride: 0,
            offset: 0,
            divisor: None,
        }
    }

    /// Element type of the buffer.
    pub fn element_type(mut self, element_type: ElementType) -> Self {
        self.element_type = element_type;
        self
    }

    /// Normalize integer elements to `[0, 1]` or `[-1, 1]`.
    pub fn normalized(mut self) -> Self {
        self.normalize = true;
        self
    }

    /// Byte spacing between consecutive elements (0 means tightly packed).
    pub fn stride(mut self, stride: u32) -> Self {
        self.stride = stride;
        self
    }

    /// Byte offset of the first element.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Instancing divisor.
    pub fn divisor(mut self, divisor: u32) -> Self {
        self.divisor = Some(divisor);
        self
    }

    /// Advance once per vertex instead of once per instance (divisor 0).
    pub fn per_vertex(self) -> Self {
        self.divisor(0)
    }

    /// Divisor that will be programmed.
    pub fn effective_divisor(&self) -> u32 {
        self.divisor.unwrap_or(1)
    }
}

/// A constant attribute value, used when no buffer is bound to the attribute.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AttributeConstant<'a> {
    /// Fills the first component.
    Scalar(f32),
    /// 1 to 4 components.
    Vector(&'a [f32]),
}

/// Binds one attribute of one program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeSetter {
    name: String,
    index: u32,
}

impl AttributeSetter {
    /// Attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved attribute index.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Stops reading the attribute from an array and uses `value` for every vertex.
    pub fn set_constant<C: GlContext>(
        &self,
        gl: &C,
        value: AttributeConstant<'_>,
    ) -> Result<(), BindError> {
        let (len, [x, y, z, w]) = match value {
            AttributeConstant::Scalar(x) | AttributeConstant::Vector(&[x]) => {
                (1, [x, 0.0, 0.0, 1.0])
            }
            AttributeConstant::Vector(&[x, y]) => (2, [x, y, 0.0, 1.0]),
            AttributeConstant::Vector(&[x, y, z]) => (3, [x, y, z, 1.0]),
            AttributeConstant::Vector(&[x, y, z, w]) => (4, [x, y, z, w]),
            AttributeConstant::Vector(v) => {
                return Err(BindError::ConstantArity {
                    name: self.name.clone(),
                    len: v.len(),
                })
            }
        };

        // Only disabled once the value is known to be writable.
        let i = self.index;
        gl.disable_vertex_attrib_array(i);
        match len {
            1 => gl.vertex_attrib1f(i, x),
            2 => gl.vertex_attrib2f(i, x, y),
            3 => gl.vertex_attrib3f(i, x, y, z),
            _ => gl.vertex_attrib4f(i, x, y, z, w),
        }
        Ok(())
    }

    fn bind_buffer<C: GlContext>(&self, gl: &C, descriptor: &BufferDescriptor<'_, C::Buffer>) {
        let i = self.index;
        gl.enable_vertex_attrib_array(i);
        gl.bind_buffer(BufferTarget::Array, Some(descriptor.buffer));
        gl.vertex_attrib_pointer(
            i,
            descriptor.components,
            descriptor.element_type,
            descriptor.normalize,
            descriptor.stride,
            descriptor.offset,
        );
        gl.vertex_attrib_divisor(i, descriptor.effective_divisor());
    }
}

/// Attribute setters of one program, keyed by name in enumeration order.
#[derive(Clone, Debug, Default)]
pub struct AttributeSetters {
    setters: LinearMap<String, AttributeSetter>,
}

/// Keeps a vertex array bound until dropped.
struct VertexArrayBinding<'a, C: GlContext> {
    gl: &'a C,
}

impl<'a, C: GlContext> VertexArrayBinding<'a, C> {
    fn new(gl: &'a C, vertex_array: &C::VertexArray) -> Self {
        gl.bind_vertex_array(Some(vertex_array));
        Self { gl }
    }
}

impl<'a, C: GlContext> Drop for VertexArrayBinding<'a, C> {
    fn drop(&mut self) {
        // Unbinding VAO is ALWAYS required (unlike all other render unbinds).
        self.gl.bind_vertex_array(None);
    }
}

impl AttributeSetters {
    /// Gets the setter for `name`.
    pub fn get(&self, name: &str) -> Option<&AttributeSetter> {
        self.setters.get(name)
    }

    /// Names in enumeration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.setters.keys().map(String::as_str)
    }

    /// Number of active attributes.
    pub fn len(&self) -> usize {
        self.setters.len()
    }

    /// Returns `true` iff the program has no active attributes.
    pub fn is_empty(&self) -> bool {
        self.setters.is_empty()
    }

    /// Creates a vertex array reading each named buffer into its attribute, plus `indices` as the
    /// element buffer. Names the program doesn't use are skipped. No vertex array is bound on
    /// return.
    pub fn construct_vertex_array<'b, C, N, I>(
        &self,
        gl: &C,
        attributes: I,
        indices: Option<&C::Buffer>,
    ) -> Result<C::VertexArray, BindError>
    where
        C: GlContext,
        C::Buffer: 'b,
        N: AsRef<str>,
        I: IntoIterator<Item = (N, BufferDescriptor<'b, C::Buffer>)>,
    {
        let vertex_array = gl
            .create_vertex_array()
            .ok_or(BindError::CreateFailed("vertex array"))?;
        let binding = VertexArrayBinding::new(gl, &vertex_array);

        for (name, descriptor) in attributes {
            let name = name.as_ref();
            match self.get(name) {
                Some(setter) => setter.bind_buffer(gl, &descriptor),
                None => debug!("attribute {name:?} not active, skipping"),
            }
        }

        if let Some(indices) = indices {
            gl.bind_buffer(BufferTarget::ElementArray, Some(indices));
        }

        drop(binding);
        Ok(vertex_array)
    }
}

/// Introspects `program`'s active attributes, resolving each index by name.
pub fn build_attribute_setters<C: GlContext>(gl: &C, program: &C::Program) -> AttributeSetters {
    let count = gl.active_attrib_count(program);
    let mut setters = LinearMap::with_capacity(count as usize);

    for i in 0..count {
        let Some(info) = gl.active_attrib(program, i) else {
            debug!("active attribute {i} of {count} not reported, skipping");
            continue;
        };
        // Built-ins like gl_VertexID are active but have no location.
        let Some(index) = gl.attrib_location(program, &info.name) else {
            debug!("attribute {:?} has no location, skipping", info.name);
            continue;
        };
        setters.insert(
            info.name.clone(),
            AttributeSetter {
                name: info.name,
                index,
            },
        );
    }

    AttributeSetters { setters }
}
