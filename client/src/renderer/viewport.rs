// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use glam::Vec2;

/// An axis aligned rectangle in CSS pixels, y increasing downward (like `getBoundingClientRect`).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// One past the right-most pixel.
    pub right: f32,
    /// One past the bottom-most pixel.
    pub bottom: f32,
}

impl Rect {
    /// Creates a [`Rect`] from its edges.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height in pixels.
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Width and height in pixels.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }
}

/// Maps pointer positions on a canvas to the tangents of rays leaving a camera with a fixed
/// vertical field of view.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Screen {
    tan_fov: f32,
    client_size: Vec2,
    max_ray: Vec2,
}

impl Screen {
    /// `fov` is the full vertical view angle in degrees.
    pub fn new(client_size: Vec2, fov: f32) -> Self {
        let tan_fov = (fov.to_radians() * 0.5).tan();
        let mut screen = Self {
            tan_fov,
            client_size,
            max_ray: Vec2::new(0.0, tan_fov),
        };
        screen.resized(client_size);
        screen
    }

    /// Tangents of the half angles to the right and top edges.
    pub fn max_ray(&self) -> Vec2 {
        self.max_ray
    }

    /// Tangent of the half angle to the top edge.
    pub fn top_edge(&self) -> f32 {
        self.max_ray.y
    }

    /// Tangent of the half angle to the right edge.
    pub fn right_edge(&self) -> f32 {
        self.max_ray.x
    }

    /// Canvas size in CSS pixels.
    pub fn client_size(&self) -> Vec2 {
        self.client_size
    }

    /// Recomputes the horizontal extent for a new canvas size. Returns `true` iff the size
    /// changed, meaning the drawing buffer should be resized to match.
    pub fn resized(&mut self, client_size: Vec2) -> bool {
        let aspect = client_size.x / client_size.y;
        self.max_ray.x = aspect * self.tan_fov;
        let changed = client_size != self.client_size;
        self.client_size = client_size;
        changed
    }

    /// Tangents of the ray through the pixel at `client` (window coordinates), for a canvas
    /// currently at `rect`. Corner pixels map exactly to `±max_ray`.
    pub fn ray_params(&self, client: Vec2, rect: &Rect) -> Vec2 {
        // rect.right and rect.bottom are one past the last pixel.
        let x = client.x - rect.left;
        let y = rect.bottom - client.y - 1.0;
        // Normalized by pixel distance, not count, so the ends land on -1 and 1.
        let ratio = 2.0 * Vec2::new(x, y) / (self.client_size - 1.0) - 1.0;
        ratio * self.max_ray
    }
}

/// Arguments for `viewport`/`scissor` that render into a porthole element overlaying a larger
/// display canvas. WebGL coordinates, so y increases upward.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Distance from the display's left edge.
    pub left: f32,
    /// Distance from the display's bottom edge.
    pub bottom: f32,
    /// Porthole width.
    pub width: f32,
    /// Porthole height.
    pub height: f32,
}

impl Viewport {
    /// Computes the porthole's position relative to the display.
    pub fn from_rects(display: &Rect, porthole: &Rect) -> Self {
        Self {
            left: porthole.left - display.left,
            bottom: display.bottom - porthole.bottom,
            width: porthole.width(),
            height: porthole.height(),
        }
    }

    /// Recomputes from new rectangles. Returns `true` iff anything changed.
    pub fn update(&mut self, display: &Rect, porthole: &Rect) -> bool {
        let new = Self::from_rects(display, porthole);
        let changed = new != *self;
        *self = new;
        changed
    }

    /// `[x, y, width, height]` in whole pixels.
    pub fn to_array(&self) -> [i32; 4] {
        [self.left, self.bottom, self.width, self.height].map(|v| v.round() as i32)
    }
}
