// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer points, sizes, and rectangles for pixel and tile addressing.

use kurbo::{Point, Rect, Size};

use crate::util::{ceil_to_i32, floor_to_i32, round_half_away};

/// An integer point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IPoint {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl IPoint {
    /// The origin.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a point from its coordinates.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Round a float point to the nearest integer point, halves away from zero.
    #[inline]
    pub fn round(p: Point) -> Self {
        Self::new(round_half_away(p.x), round_half_away(p.y))
    }

    /// Convert to a float point.
    #[inline]
    pub fn to_point(self) -> Point {
        Point::new(f64::from(self.x), f64::from(self.y))
    }
}

/// An integer size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ISize {
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl ISize {
    /// Create a size from its extents.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Round a float size per axis, halves away from zero.
    #[inline]
    pub fn round(s: Size) -> Self {
        Self::new(round_half_away(s.width), round_half_away(s.height))
    }

    /// Convert to a float size.
    #[inline]
    pub fn to_size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Whether either extent is zero or negative.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// An integer rectangle with inclusive min and exclusive max corners.
///
/// A rectangle covers the pixels `x0..x1` by `y0..y1`, so its width is
/// `x1 - x0`. Rectangles with `x1 <= x0` or `y1 <= y0` are empty.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IRect {
    /// Minimum x (inclusive).
    pub x0: i32,
    /// Minimum y (inclusive).
    pub y0: i32,
    /// Maximum x (exclusive).
    pub x1: i32,
    /// Maximum y (exclusive).
    pub y1: i32,
}

impl IRect {
    /// Create a rectangle from its corners.
    #[inline]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Create a rectangle from an origin and a size.
    #[inline]
    pub const fn from_origin_size(origin: IPoint, size: ISize) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x.saturating_add(size.width),
            origin.y.saturating_add(size.height),
        )
    }

    /// Round each corner of a float rectangle, halves away from zero.
    ///
    /// Width and height are the deltas of the rounded corners, so two
    /// rectangles sharing an edge still share it after rounding.
    #[inline]
    pub fn round(r: Rect) -> Self {
        Self::new(
            round_half_away(r.x0),
            round_half_away(r.y0),
            round_half_away(r.x1),
            round_half_away(r.y1),
        )
    }

    /// The smallest integer rectangle covering a float rectangle.
    #[inline]
    pub fn round_out(r: Rect) -> Self {
        Self::new(
            floor_to_i32(r.x0),
            floor_to_i32(r.y0),
            ceil_to_i32(r.x1),
            ceil_to_i32(r.y1),
        )
    }

    /// The min corner.
    #[inline]
    pub const fn origin(self) -> IPoint {
        IPoint::new(self.x0, self.y0)
    }

    /// The extents of the rectangle.
    #[inline]
    pub const fn size(self) -> ISize {
        ISize::new(self.width(), self.height())
    }

    /// Horizontal extent.
    #[inline]
    pub const fn width(self) -> i32 {
        self.x1.saturating_sub(self.x0)
    }

    /// Vertical extent.
    #[inline]
    pub const fn height(self) -> i32 {
        self.y1.saturating_sub(self.y0)
    }

    /// Whether the rectangle covers no pixels.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Whether the pixel at `p` lies inside the rectangle.
    #[inline]
    pub const fn contains(self, p: IPoint) -> bool {
        p.x >= self.x0 && p.x < self.x1 && p.y >= self.y0 && p.y < self.y1
    }

    /// Whether the two rectangles share at least one pixel.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }

    /// Convert to a float rectangle.
    #[inline]
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x0),
            f64::from(self.y0),
            f64::from(self.x1),
            f64::from(self.y1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_rounding_uses_corner_deltas() {
        let r = IRect::round(Rect::new(0.5, 0.4, 1.5, 1.4));
        assert_eq!(r, IRect::new(1, 0, 2, 1), "corners round independently");
        assert_eq!(r.width(), 1, "width derives from rounded corners");

        // Adjacent float rects stay adjacent.
        let a = IRect::round(Rect::new(0.0, 0.0, 10.5, 1.0));
        let b = IRect::round(Rect::new(10.5, 0.0, 20.0, 1.0));
        assert_eq!(a.x1, b.x0, "shared edges survive rounding");
    }

    #[test]
    fn round_out_covers_fractional_rects() {
        let r = IRect::round_out(Rect::new(-0.5, 0.2, 3.1, 4.0));
        assert_eq!(r, IRect::new(-1, 0, 4, 4), "corners move outward");
    }

    #[test]
    fn intersects_is_half_open() {
        let a = IRect::new(0, 0, 10, 10);
        assert!(a.intersects(IRect::new(9, 9, 20, 20)), "one shared pixel");
        assert!(!a.intersects(IRect::new(10, 0, 20, 10)), "touching edges do not overlap");
        assert!(a.contains(IPoint::new(0, 9)), "min edge is inclusive");
        assert!(!a.contains(IPoint::new(10, 5)), "max edge is exclusive");
    }

    #[test]
    fn origin_size_round_trip() {
        let r = IRect::from_origin_size(IPoint::new(-5, 3), ISize::new(7, 2));
        assert_eq!(r.origin(), IPoint::new(-5, 3), "origin is the min corner");
        assert_eq!(r.size(), ISize::new(7, 2), "size is the corner delta");
        assert!(!r.is_empty(), "positive size is not empty");
        assert!(IRect::new(3, 0, 3, 5).is_empty(), "zero width is empty");
    }
}
