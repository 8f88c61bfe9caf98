// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversions between world, grid, and view space.

use kurbo::{Point, Rect, Size, Vec2};

use crate::int::{IPoint, IRect, ISize};

/// A uniform scale followed by a translation.
///
/// Points map to `p * scale + translation`; sizes only scale.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScaleTranslate {
    /// Uniform scale factor.
    pub scale: f64,
    /// Translation applied after scaling.
    pub translation: Vec2,
}

impl ScaleTranslate {
    /// The identity mapping.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translation: Vec2::ZERO,
    };

    /// Create a mapping.
    #[inline]
    pub const fn new(scale: f64, translation: Vec2) -> Self {
        Self { scale, translation }
    }

    /// The mapping that undoes this one.
    #[inline]
    pub fn inverse(self) -> Self {
        let inv = 1.0 / self.scale;
        Self::new(inv, -self.translation * inv)
    }

    #[inline]
    fn point(self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.translation.x,
            p.y * self.scale + self.translation.y,
        )
    }

    #[inline]
    fn size(self, s: Size) -> Size {
        Size::new(s.width * self.scale, s.height * self.scale)
    }
}

/// Values that can be carried from one coordinate space to another.
///
/// Integer values convert through `f64` and round back with
/// [`IPoint::round`], [`ISize::round`], and [`IRect::round`].
pub trait Mappable: Sized {
    /// Apply `map` to `self`.
    fn map_with(self, map: ScaleTranslate) -> Self;
}

impl Mappable for Point {
    #[inline]
    fn map_with(self, map: ScaleTranslate) -> Self {
        map.point(self)
    }
}

impl Mappable for Size {
    #[inline]
    fn map_with(self, map: ScaleTranslate) -> Self {
        map.size(self)
    }
}

impl Mappable for Rect {
    #[inline]
    fn map_with(self, map: ScaleTranslate) -> Self {
        Self::from_points(map.point(self.origin()), map.point(Point::new(self.x1, self.y1)))
    }
}

impl Mappable for IPoint {
    #[inline]
    fn map_with(self, map: ScaleTranslate) -> Self {
        Self::round(map.point(self.to_point()))
    }
}

impl Mappable for ISize {
    #[inline]
    fn map_with(self, map: ScaleTranslate) -> Self {
        Self::round(map.size(self.to_size()))
    }
}

impl Mappable for IRect {
    #[inline]
    fn map_with(self, map: ScaleTranslate) -> Self {
        Self::round(self.to_rect().map_with(map))
    }
}

/// Converts values between the three coordinate spaces of a zoomable canvas.
///
/// - World space is where shapes live.
/// - Grid space is world space scaled by the zoom factor. Cache tiles are
///   laid out in grid space so they keep a constant pixel size.
/// - View space is screen pixels: world space shifted by the viewport offset
///   (a world point) and then scaled.
///
/// Every conversion accepts [`Point`], [`Size`], [`Rect`], and their integer
/// counterparts through [`Mappable`]. Sizes ignore translation, so grid and
/// view sizes are identical.
///
/// ```rust
/// use kurbo::Point;
/// use understory_view2d::CoordinateTransformer;
///
/// let t = CoordinateTransformer::new(2.0, Point::new(100.0, 50.0));
/// let view = t.world_to_view(Point::new(110.0, 60.0));
/// assert_eq!(view, Point::new(20.0, 20.0));
/// assert_eq!(t.grid_to_view(t.world_to_grid(Point::new(110.0, 60.0))), view);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoordinateTransformer {
    zoom: f64,
    offset: Point,
}

impl Default for CoordinateTransformer {
    fn default() -> Self {
        Self::new(1.0, Point::ZERO)
    }
}

impl CoordinateTransformer {
    /// Create a transformer for the given zoom factor and viewport offset.
    ///
    /// `zoom` must be finite and strictly positive.
    #[inline]
    pub fn new(zoom: f64, offset: Point) -> Self {
        debug_assert!(
            zoom.is_finite() && zoom > 0.0,
            "zoom must be finite and strictly positive"
        );
        Self { zoom, offset }
    }

    /// Current zoom factor.
    #[inline]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Current viewport offset, in world space.
    #[inline]
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Replace the zoom factor, keeping the offset.
    #[inline]
    pub fn set_zoom(&mut self, zoom: f64) {
        debug_assert!(
            zoom.is_finite() && zoom > 0.0,
            "zoom must be finite and strictly positive"
        );
        self.zoom = zoom;
    }

    /// Replace the viewport offset.
    #[inline]
    pub fn set_offset(&mut self, offset: Point) {
        self.offset = offset;
    }

    /// Change the zoom factor while keeping the world point under `anchor`
    /// (a view-space point) fixed on screen.
    pub fn zoom_about(&mut self, zoom: f64, anchor: Point) {
        let before = self.view_to_world(anchor);
        self.set_zoom(zoom);
        let after = self.view_to_world(anchor);
        self.offset += before - after;
    }

    /// Mapping from world space to view space.
    #[inline]
    pub fn world_to_view_map(&self) -> ScaleTranslate {
        ScaleTranslate::new(self.zoom, -self.offset.to_vec2() * self.zoom)
    }

    /// Mapping from world space to grid space.
    #[inline]
    pub fn world_to_grid_map(&self) -> ScaleTranslate {
        ScaleTranslate::new(self.zoom, Vec2::ZERO)
    }

    /// Mapping from view space to grid space.
    #[inline]
    pub fn view_to_grid_map(&self) -> ScaleTranslate {
        ScaleTranslate::new(1.0, self.offset.to_vec2() * self.zoom)
    }

    /// `(p - offset) * zoom`.
    #[inline]
    pub fn world_to_view<T: Mappable>(&self, value: T) -> T {
        value.map_with(self.world_to_view_map())
    }

    /// `p / zoom + offset`.
    #[inline]
    pub fn view_to_world<T: Mappable>(&self, value: T) -> T {
        value.map_with(self.world_to_view_map().inverse())
    }

    /// `p * zoom`.
    #[inline]
    pub fn world_to_grid<T: Mappable>(&self, value: T) -> T {
        value.map_with(self.world_to_grid_map())
    }

    /// `p / zoom`.
    #[inline]
    pub fn grid_to_world<T: Mappable>(&self, value: T) -> T {
        value.map_with(self.world_to_grid_map().inverse())
    }

    /// `p + world_to_grid(offset)`.
    #[inline]
    pub fn view_to_grid<T: Mappable>(&self, value: T) -> T {
        value.map_with(self.view_to_grid_map())
    }

    /// `p - world_to_grid(offset)`.
    #[inline]
    pub fn grid_to_view<T: Mappable>(&self, value: T) -> T {
        value.map_with(self.view_to_grid_map().inverse())
    }
}
