// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::error::{BindError, ProgramError};
use super::gl::*;
use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use linear_map::LinearMap;
use log::{debug, warn};
use std::ops::Range;
use strum_macros::{Display, IntoStaticStr};

/// Suffix `getActiveUniform` appends to array names.
const ARRAY_SUFFIX: &str = "[0]";

/// Base type of a uniform or attribute. Closed set; anything else is unsupported.
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq, IntoStaticStr)]
#[allow(missing_docs)]
pub enum VariableType {
    Float,
    Int,
    Bool,
    FloatVec2,
    FloatVec3,
    FloatVec4,
    IntVec2,
    IntVec3,
    IntVec4,
    BoolVec2,
    BoolVec3,
    BoolVec4,
    FloatMat2,
    FloatMat3,
    FloatMat4,
    Sampler2D,
    SamplerCube,
}

impl VariableType {
    /// Classifies a raw introspection type tag.
    pub fn from_tag(type_tag: u32) -> Option<Self> {
        Some(match type_tag {
            tag::FLOAT => Self::Float,
            tag::INT => Self::Int,
            tag::BOOL => Self::Bool,
            tag::FLOAT_VEC2 => Self::FloatVec2,
            tag::FLOAT_VEC3 => Self::FloatVec3,
            tag::FLOAT_VEC4 => Self::FloatVec4,
            tag::INT_VEC2 => Self::IntVec2,
            tag::INT_VEC3 => Self::IntVec3,
            tag::INT_VEC4 => Self::IntVec4,
            tag::BOOL_VEC2 => Self::BoolVec2,
            tag::BOOL_VEC3 => Self::BoolVec3,
            tag::BOOL_VEC4 => Self::BoolVec4,
            tag::FLOAT_MAT2 => Self::FloatMat2,
            tag::FLOAT_MAT3 => Self::FloatMat3,
            tag::FLOAT_MAT4 => Self::FloatMat4,
            tag::SAMPLER_2D => Self::Sampler2D,
            tag::SAMPLER_CUBE => Self::SamplerCube,
            _ => return None,
        })
    }

    /// Texture target for sampler types.
    pub fn sampler_target(self) -> Option<TextureTarget> {
        match self {
            Self::Sampler2D => Some(TextureTarget::D2),
            Self::SamplerCube => Some(TextureTarget::Cube),
            _ => None,
        }
    }

    /// Returns `true` iff the type consumes texture units.
    pub fn is_sampler(self) -> bool {
        self.sampler_target().is_some()
    }
}

/// Shape of one active variable, derived once from introspection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VariableDescriptor {
    /// Name with any `[0]` decoration stripped.
    pub name: String,
    /// Base type.
    pub base_type: VariableType,
    /// Array length, or 1.
    pub declared_count: u32,
    /// Whether the introspected name carried the array decoration.
    pub is_array: bool,
}

impl VariableDescriptor {
    /// Fails with the raw tag if the type is outside [`VariableType`].
    pub fn from_active(info: &ActiveInfo) -> Result<Self, u32> {
        let base_type = VariableType::from_tag(info.type_tag).ok_or(info.type_tag)?;
        let (name, is_array) = strip_array_suffix(&info.name);
        Ok(Self {
            name: name.to_owned(),
            base_type,
            declared_count: if is_array { info.size.max(1) } else { 1 },
            is_array,
        })
    }
}

/// `"lights[0]"` => `("lights", true)`, `"color"` => `("color", false)`.
pub fn strip_array_suffix(name: &str) -> (&str, bool) {
    match name.strip_suffix(ARRAY_SUFFIX) {
        Some(stripped) => (stripped, true),
        None => (name, false),
    }
}

/// Assigns each sampler `declared_count` consecutive texture units starting at `base`, in order.
/// Non-samplers get `None`.
pub fn allocate_texture_units(
    descriptors: &[VariableDescriptor],
    base: u32,
) -> Vec<Option<Range<u32>>> {
    descriptors
        .iter()
        .scan(base, |next, descriptor| {
            Some(descriptor.base_type.is_sampler().then(|| {
                let units = *next..*next + descriptor.declared_count;
                *next = units.end;
                units
            }))
        })
        .collect()
}

/// A value for [`UniformSetter::set`]. Matrices are column major.
#[derive(Debug)]
pub enum UniformValue<'a, T> {
    /// A single float.
    Float(f32),
    /// A single int.
    Int(i32),
    /// A single bool.
    Bool(bool),
    /// Flat floats (vectors, matrices, arrays).
    Floats(&'a [f32]),
    /// Flat ints (int and bool vectors, arrays).
    Ints(&'a [i32]),
    /// A texture for a sampler.
    Texture(&'a T),
    /// Textures for a sampler array, in unit order.
    Textures(&'a [T]),
}

impl<'a, T> From<f32> for UniformValue<'a, T> {
    fn from(x: f32) -> Self {
        Self::Float(x)
    }
}

impl<'a, T> From<i32> for UniformValue<'a, T> {
    fn from(x: i32) -> Self {
        Self::Int(x)
    }
}

impl<'a, T> From<bool> for UniformValue<'a, T> {
    fn from(x: bool) -> Self {
        Self::Bool(x)
    }
}

impl<'a, T> From<&'a [f32]> for UniformValue<'a, T> {
    fn from(x: &'a [f32]) -> Self {
        Self::Floats(x)
    }
}

impl<'a, T> From<&'a [i32]> for UniformValue<'a, T> {
    fn from(x: &'a [i32]) -> Self {
        Self::Ints(x)
    }
}

macro_rules! impl_from_glam {
    ($($typ:ty => $n:literal),*) => {
        $(
            impl<'a, T> From<&'a $typ> for UniformValue<'a, T> {
                fn from(x: &'a $typ) -> Self {
                    let array: &'a [f32; $n] = x.as_ref();
                    Self::Floats(array)
                }
            }
        )*
    }
}

impl_from_glam!(Vec2 => 2, Vec3 => 3, Vec4 => 4, Mat2 => 4, Mat3 => 9, Mat4 => 16);

/// The write form chosen at build time.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Write {
    Float,
    FloatArray,
    FloatVec(u8),
    Int,
    IntArray,
    IntVec(u8),
    Matrix(u8),
    Sampler {
        target: TextureTarget,
        units: Range<u32>,
        /// Precomputed for `uniform1iv`.
        unit_indices: Box<[i32]>,
        is_array: bool,
    },
}

impl Write {
    fn new(descriptor: &VariableDescriptor, units: Option<Range<u32>>) -> Self {
        use VariableType::*;
        match descriptor.base_type {
            Float if descriptor.is_array => Self::FloatArray,
            Float => Self::Float,
            Int | Bool if descriptor.is_array => Self::IntArray,
            Int | Bool => Self::Int,
            FloatVec2 => Self::FloatVec(2),
            FloatVec3 => Self::FloatVec(3),
            FloatVec4 => Self::FloatVec(4),
            IntVec2 | BoolVec2 => Self::IntVec(2),
            IntVec3 | BoolVec3 => Self::IntVec(3),
            IntVec4 | BoolVec4 => Self::IntVec(4),
            FloatMat2 => Self::Matrix(2),
            FloatMat3 => Self::Matrix(3),
            FloatMat4 => Self::Matrix(4),
            Sampler2D | SamplerCube => {
                let units = units.unwrap_or(0..0);
                Self::Sampler {
                    target: descriptor.base_type.sampler_target().unwrap_or(TextureTarget::D2),
                    unit_indices: units.clone().map(|u| u as i32).collect(),
                    units,
                    is_array: descriptor.is_array,
                }
            }
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            Self::Float => "a float",
            Self::FloatArray => "floats",
            Self::FloatVec(2) => "floats in multiples of 2",
            Self::FloatVec(3) => "floats in multiples of 3",
            Self::FloatVec(_) => "floats in multiples of 4",
            Self::Int => "an int or bool",
            Self::IntArray => "ints",
            Self::IntVec(2) => "ints in multiples of 2",
            Self::IntVec(3) => "ints in multiples of 3",
            Self::IntVec(_) => "ints in multiples of 4",
            Self::Matrix(2) => "floats in multiples of 4",
            Self::Matrix(3) => "floats in multiples of 9",
            Self::Matrix(_) => "floats in multiples of 16",
            Self::Sampler { .. } => "textures",
        }
    }
}

fn whole<T>(data: &[T], chunk: usize) -> bool {
    !data.is_empty() && data.len() % chunk == 0
}

/// Writes one uniform of one program. Built by [`build_uniform_setters`]; the write form and any
/// texture units are fixed at build time.
///
/// Active uniforms without a location (e.g. uniform block members) still get a setter, whose
/// writes are dropped by the context.
pub struct UniformSetter<C: GlContext> {
    descriptor: VariableDescriptor,
    location: Option<C::UniformLocation>,
    write: Write,
}

impl<C: GlContext> UniformSetter<C> {
    /// The variable this setter writes.
    pub fn descriptor(&self) -> &VariableDescriptor {
        &self.descriptor
    }

    /// Texture units owned by a sampler, or `None` for other types.
    pub fn texture_units(&self) -> Option<Range<u32>> {
        match &self.write {
            Write::Sampler { units, .. } => Some(units.clone()),
            _ => None,
        }
    }

    /// Returns `true` iff writes reach the program.
    pub fn has_location(&self) -> bool {
        self.location.is_some()
    }

    /// Issues the write. The owning program must be in use.
    pub fn set(&self, gl: &C, value: UniformValue<'_, C::Texture>) -> Result<(), BindError> {
        use UniformValue::*;
        let loc = self.location.as_ref();
        match (&self.write, value) {
            (Write::Float, Float(x)) => gl.uniform1f(loc, x),
            (Write::Float, Floats(&[x])) => gl.uniform1f(loc, x),
            (Write::FloatArray, Float(x)) => gl.uniform1fv(loc, &[x]),
            (Write::FloatArray, Floats(v)) if !v.is_empty() => gl.uniform1fv(loc, v),
            (Write::FloatVec(2), Floats(v)) if whole(v, 2) => gl.uniform2fv(loc, v),
            (Write::FloatVec(3), Floats(v)) if whole(v, 3) => gl.uniform3fv(loc, v),
            (Write::FloatVec(4), Floats(v)) if whole(v, 4) => gl.uniform4fv(loc, v),
            (Write::Int, Int(x)) => gl.uniform1i(loc, x),
            (Write::Int, Bool(b)) => gl.uniform1i(loc, b as i32),
            (Write::Int, Ints(&[x])) => gl.uniform1i(loc, x),
            (Write::IntArray, Int(x)) => gl.uniform1iv(loc, &[x]),
            (Write::IntArray, Bool(b)) => gl.uniform1iv(loc, &[b as i32]),
            (Write::IntArray, Ints(v)) if !v.is_empty() => gl.uniform1iv(loc, v),
            (Write::IntVec(2), Ints(v)) if whole(v, 2) => gl.uniform2iv(loc, v),
            (Write::IntVec(3), Ints(v)) if whole(v, 3) => gl.uniform3iv(loc, v),
            (Write::IntVec(4), Ints(v)) if whole(v, 4) => gl.uniform4iv(loc, v),
            (Write::Matrix(2), Floats(v)) if whole(v, 4) => gl.uniform_matrix2fv(loc, v),
            (Write::Matrix(3), Floats(v)) if whole(v, 9) => gl.uniform_matrix3fv(loc, v),
            (Write::Matrix(4), Floats(v)) if whole(v, 16) => gl.uniform_matrix4fv(loc, v),
            (Write::Sampler { .. }, Texture(texture)) => {
                self.bind_textures(gl, std::iter::once(texture), 1)
            }
            (Write::Sampler { .. }, Textures(textures)) => {
                self.bind_textures(gl, textures.iter(), textures.len())
            }
            (write, _) => {
                return Err(BindError::ValueMismatch {
                    name: self.descriptor.name.clone(),
                    expected: write.expected(),
                })
            }
        }
        Ok(())
    }

    /// Publishes the unit indices, then binds each texture to its unit in order.
    fn bind_textures<'t>(
        &self,
        gl: &C,
        textures: impl Iterator<Item = &'t C::Texture>,
        count: usize,
    ) where
        C::Texture: 't,
    {
        let Write::Sampler {
            target,
            units,
            unit_indices,
            is_array,
        } = &self.write
        else {
            return;
        };

        if *is_array {
            gl.uniform1iv(self.location.as_ref(), unit_indices);
        } else {
            gl.uniform1i(self.location.as_ref(), units.start as i32);
        }

        if count > units.len() {
            warn!(
                "{} textures supplied to {:?} which has {} units, extras ignored",
                count,
                self.descriptor.name,
                units.len()
            );
        }

        for (unit, texture) in units.clone().zip(textures) {
            gl.active_texture(unit);
            gl.bind_texture(*target, Some(texture));
        }
    }
}

/// Uniform setters of one program, keyed by name with array decoration stripped, in
/// enumeration order.
pub struct UniformSetters<C: GlContext> {
    setters: LinearMap<String, UniformSetter<C>>,
    units_used: u32,
}

impl<C: GlContext> UniformSetters<C> {
    /// Gets the setter for `name`.
    pub fn get(&self, name: &str) -> Option<&UniformSetter<C>> {
        self.setters.get(name)
    }

    /// Names in enumeration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.setters.keys().map(String::as_str)
    }

    /// Setters in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformSetter<C>)> + '_ {
        self.setters.iter().map(|(name, setter)| (name.as_str(), setter))
    }

    /// Number of setters.
    pub fn len(&self) -> usize {
        self.setters.len()
    }

    /// Returns `true` iff the program has no settable uniforms.
    pub fn is_empty(&self) -> bool {
        self.setters.is_empty()
    }

    /// Total texture units claimed by samplers.
    pub fn texture_units_used(&self) -> u32 {
        self.units_used
    }
}

/// Introspects `program`'s active uniforms and builds one setter per uniform. Samplers receive
/// texture units starting at `base_unit` in enumeration order, so rebuilding the same program
/// yields the same units.
pub fn build_uniform_setters<C: GlContext>(
    gl: &C,
    program: &C::Program,
    base_unit: u32,
) -> Result<UniformSetters<C>, ProgramError> {
    let count = gl.active_uniform_count(program);
    let mut active = Vec::with_capacity(count as usize);

    for index in 0..count {
        let Some(info) = gl.active_uniform(program, index) else {
            debug!("active uniform {index} of {count} not reported, skipping");
            continue;
        };

        let descriptor = VariableDescriptor::from_active(&info).map_err(|type_tag| {
            ProgramError::UnsupportedUniformType {
                name: info.name.clone(),
                type_tag,
            }
        })?;

        // Resolved with the raw name; stripping is only for the key.
        let location = gl.uniform_location(program, &info.name);
        if location.is_none() {
            debug!("uniform {:?} has no location, writes will be dropped", info.name);
        }

        active.push((descriptor, location));
    }

    let descriptors: Vec<_> = active.iter().map(|(d, _)| d.clone()).collect();
    let allocations = allocate_texture_units(&descriptors, base_unit);

    let mut setters = LinearMap::with_capacity(active.len());
    let mut units_used = 0;
    for ((descriptor, location), units) in active.into_iter().zip(allocations) {
        units_used += units.as_ref().map_or(0, |u| u.len() as u32);
        let write = Write::new(&descriptor, units);
        let name = descriptor.name.clone();
        if setters
            .insert(
                name,
                UniformSetter {
                    descriptor,
                    location,
                    write,
                },
            )
            .is_some()
        {
            warn!("duplicate uniform name, last one wins");
        }
    }

    if let Some(max) = gl.max_texture_units() {
        if base_unit + units_used > max {
            warn!(
                "samplers need units up to {} but the context has {max}",
                base_unit + units_used
            );
        }
    }

    Ok(UniformSetters {
        setters,
        units_used,
    })
}
