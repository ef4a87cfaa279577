// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::error::BindError;
use super::gl::*;
use glam::UVec2;
use log::warn;

/// Color of placeholder textures, shown until real pixels arrive.
const PLACEHOLDER: [u8; 4] = [0, 0, 255, 255];

/// Decoded RGBA8 pixels, row major.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ImageData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// An image filled with one color.
    pub fn solid(dimensions: UVec2, color: [u8; 4]) -> Self {
        let count = (dimensions.x * dimensions.y) as usize;
        Self {
            width: dimensions.x,
            height: dimensions.y,
            pixels: color.repeat(count),
        }
    }

    /// Gets dimensions in pixels.
    pub fn dimensions(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    fn check(&self) {
        debug_assert_eq!(
            self.pixels.len() as u32,
            self.width * self.height * 4,
            "{}x{}x4",
            self.width,
            self.height
        );
    }
}

/// Options for creating a [`Texture`]. Chain calls like
/// `TextureOptions::default().nearest().repeating()`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TextureOptions {
    mipmap: bool,
    repeating: bool,
    nearest: bool,
    #[cfg_attr(not(feature = "anisotropy"), allow(dead_code))]
    anisotropy: bool,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            mipmap: true,
            repeating: false,
            nearest: false,
            anisotropy: true,
        }
    }
}

impl TextureOptions {
    /// Don't generate mipmaps even if dimensions are powers of 2.
    pub fn disable_mipmap(mut self) -> Self {
        self.mipmap = false;
        self
    }

    /// Repeat instead of clamping. Only honored for power of 2 dimensions.
    pub fn repeating(mut self) -> Self {
        self.repeating = true;
        self
    }

    /// Nearest neighbor filtering instead of linear (minification of mipmapped textures stays
    /// trilinear).
    pub fn nearest(mut self) -> Self {
        self.nearest = true;
        self
    }

    /// Don't apply anisotropic filtering to mipmapped textures.
    pub fn disable_anisotropy(mut self) -> Self {
        self.anisotropy = false;
        self
    }
}

/// A 2D or cube map texture with RGBA8 pixels. Pass [`Texture::handle`] as a sampler uniform.
pub struct Texture<C: GlContext> {
    texture: C::Texture,
    target: TextureTarget,
    dimensions: UVec2,
    options: TextureOptions,
}

impl<C: GlContext> Texture<C> {
    fn create(gl: &C, target: TextureTarget, options: TextureOptions) -> Result<Self, BindError> {
        Ok(Self {
            texture: gl
                .create_texture()
                .ok_or(BindError::CreateFailed("texture"))?,
            target,
            dimensions: UVec2::ZERO,
            options,
        })
    }

    /// Creates an empty 2D texture of `dimensions`.
    pub fn new_2d(gl: &C, dimensions: UVec2, options: TextureOptions) -> Result<Self, BindError> {
        let mut texture = Self::create(gl, TextureTarget::D2, options)?;
        texture.bind(gl);
        gl.tex_image_2d(TextureFace::D2, dimensions.x, dimensions.y, None);
        texture.dimensions = dimensions;
        texture.apply_parameters(gl);
        Ok(texture)
    }

    /// Creates a 1x1 opaque blue 2D texture, for use until the real image is ready.
    pub fn placeholder(gl: &C) -> Result<Self, BindError> {
        let mut texture = Self::create(gl, TextureTarget::D2, TextureOptions::default())?;
        texture.replace(gl, &ImageData::solid(UVec2::ONE, PLACEHOLDER));
        Ok(texture)
    }

    /// Gets the underlying handle.
    pub fn handle(&self) -> &C::Texture {
        &self.texture
    }

    /// Gets the target this texture binds to.
    pub fn target(&self) -> TextureTarget {
        self.target
    }

    /// Gets dimensions in pixels (of one face, for cube maps).
    pub fn dimensions(&self) -> UVec2 {
        self.dimensions
    }

    /// Gets aspect ratio (width / height).
    pub fn aspect(&self) -> f32 {
        let [width, height] = self.dimensions.as_vec2().to_array();
        width / height
    }

    /// Returns `true` iff mipmaps are generated for the current dimensions.
    pub fn is_mipmapped(&self) -> bool {
        self.options.mipmap && is_pow2(self.dimensions)
    }

    // Uploads go through unit 0; samplers rebind their own units on every set.
    fn bind(&self, gl: &C) {
        gl.active_texture(0);
        gl.bind_texture(self.target, Some(&self.texture));
    }

    /// Re-specifies the whole image, which may change size, and reapplies filtering.
    pub fn replace(&mut self, gl: &C, image: &ImageData) {
        debug_assert_eq!(self.target, TextureTarget::D2);
        image.check();
        self.bind(gl);
        gl.tex_image_2d(TextureFace::D2, image.width, image.height, Some(&image.pixels));
        self.dimensions = image.dimensions();
        self.apply_parameters(gl);
    }

    /// Overwrites the image in place. `image` should have the current dimensions.
    pub fn update(&self, gl: &C, image: &ImageData) {
        if image.dimensions() != self.dimensions {
            warn!(
                "updating {} texture with {} image",
                self.dimensions,
                image.dimensions()
            );
        }
        self.update_partial(gl, image, UVec2::ZERO);
    }

    /// Writes `image` with its top left corner at `offset`.
    pub fn update_partial(&self, gl: &C, image: &ImageData, offset: UVec2) {
        debug_assert_eq!(self.target, TextureTarget::D2);
        image.check();
        self.bind(gl);
        gl.tex_sub_image_2d(
            TextureFace::D2,
            offset.x,
            offset.y,
            image.width,
            image.height,
            &image.pixels,
        );
        if self.is_mipmapped() {
            gl.generate_mipmap(self.target);
        }
    }

    /// Mipmaps for power of 2 dimensions (unless disabled), clamping unless repeating.
    fn apply_parameters(&self, gl: &C) {
        let target = self.target;
        let options = self.options;
        let pow2 = is_pow2(self.dimensions);
        let mipmap = self.is_mipmapped();

        let linear = if options.nearest {
            Filter::Nearest
        } else {
            Filter::Linear
        };
        if mipmap {
            gl.generate_mipmap(target);
            gl.tex_parameter(target, TexParameter::MinFilter(Filter::Trilinear));
        } else {
            gl.tex_parameter(target, TexParameter::MinFilter(linear));
        }
        gl.tex_parameter(target, TexParameter::MagFilter(linear));

        if options.repeating && pow2 {
            gl.tex_parameter(target, TexParameter::WrapS(Wrap::Repeat));
            gl.tex_parameter(target, TexParameter::WrapT(Wrap::Repeat));
        } else {
            if options.repeating {
                warn!("repeating texture must be power of 2, got {}", self.dimensions);
            }
            // Power of 2 textures keep the default S wrap.
            if !pow2 {
                gl.tex_parameter(target, TexParameter::WrapS(Wrap::ClampToEdge));
            }
            gl.tex_parameter(target, TexParameter::WrapT(Wrap::ClampToEdge));
        }

        #[cfg(feature = "anisotropy")]
        if mipmap && options.anisotropy {
            if let Some(max) = gl.max_anisotropy() {
                gl.tex_parameter(target, TexParameter::MaxAnisotropy(max));
            }
        }
    }

    /// Creates a cube map with 1x1 opaque blue faces. Fill it with [`Texture::fill_cube`].
    pub fn new_cube(gl: &C) -> Result<Self, BindError> {
        let mut texture = Self::create(gl, TextureTarget::Cube, TextureOptions::default())?;
        texture.bind(gl);
        for face in TextureFace::CUBE {
            gl.tex_image_2d(face, 1, 1, Some(&PLACEHOLDER));
        }
        texture.dimensions = UVec2::ONE;

        let target = texture.target;
        gl.tex_parameter(target, TexParameter::MinFilter(Filter::Linear));
        gl.tex_parameter(target, TexParameter::MagFilter(Filter::Linear));
        gl.tex_parameter(target, TexParameter::WrapS(Wrap::ClampToEdge));
        gl.tex_parameter(target, TexParameter::WrapT(Wrap::ClampToEdge));
        Ok(texture)
    }

    /// Uploads faces in +X, -X, +Y, -Y, +Z, -Z order and generates mipmaps.
    pub fn fill_cube(&mut self, gl: &C, faces: &[ImageData; 6]) {
        debug_assert_eq!(self.target, TextureTarget::Cube);
        let dimensions = faces[0].dimensions();
        if dimensions.x != dimensions.y || faces.iter().any(|f| f.dimensions() != dimensions) {
            warn!("cube map faces must be equal squares");
        }

        self.bind(gl);
        for (face, image) in TextureFace::CUBE.into_iter().zip(faces) {
            image.check();
            gl.tex_image_2d(face, image.width, image.height, Some(&image.pixels));
        }
        self.dimensions = dimensions;

        let target = self.target;
        gl.generate_mipmap(target);
        gl.tex_parameter(target, TexParameter::MagFilter(Filter::Linear));
        gl.tex_parameter(target, TexParameter::MinFilter(Filter::Trilinear));
        gl.tex_parameter(target, TexParameter::WrapS(Wrap::ClampToEdge));
        gl.tex_parameter(target, TexParameter::WrapT(Wrap::ClampToEdge));
    }
}

fn is_pow2(dimensions: UVec2) -> bool {
    dimensions.x.is_power_of_two() && dimensions.y.is_power_of_two()
}

/// A 2D texture divided into a grid of equally sized tiles, updated one tile at a time.
pub struct TiledTexture<C: GlContext> {
    texture: Texture<C>,
    tiles: UVec2,
    tile_size: UVec2,
}

impl<C: GlContext> TiledTexture<C> {
    /// Creates an empty texture of `tiles * tile_size` pixels.
    pub fn new(
        gl: &C,
        tiles: UVec2,
        tile_size: UVec2,
        options: TextureOptions,
    ) -> Result<Self, BindError> {
        Ok(Self {
            texture: Texture::new_2d(gl, tiles * tile_size, options)?,
            tiles,
            tile_size,
        })
    }

    /// Gets the whole texture.
    pub fn texture(&self) -> &Texture<C> {
        &self.texture
    }

    /// Gets the number of tiles on each axis.
    pub fn tiles(&self) -> UVec2 {
        self.tiles
    }

    /// Gets the dimensions of one tile.
    pub fn tile_size(&self) -> UVec2 {
        self.tile_size
    }

    /// Overwrites one tile. Out of range tiles and wrongly sized images are skipped.
    pub fn update_tile(&self, gl: &C, tile: UVec2, image: &ImageData) {
        if tile.cmpge(self.tiles).any() {
            warn!("tile {tile} out of range {}", self.tiles);
            return;
        }
        if image.dimensions() != self.tile_size {
            warn!("tile image {} isn't {}", image.dimensions(), self.tile_size);
            return;
        }
        self.texture.update_partial(gl, image, tile * self.tile_size);
    }

    /// Makes every tile transparent.
    pub fn clear(&self, gl: &C) {
        let blank = ImageData::solid(self.texture.dimensions(), [0; 4]);
        self.texture.update(gl, &blank);
    }
}
