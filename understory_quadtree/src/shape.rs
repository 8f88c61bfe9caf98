// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The contract shapes fulfil to be indexed, and shape identity.

use alloc::rc::Rc;

use kurbo::{Line, Rect};

use crate::query::{overlaps, segment_intersects_rect};

/// A shape that can be stored in a [`QuadTree`](crate::QuadTree).
///
/// Shapes are shared through [`Rc`] and identified by pointer: two `Rc`s
/// are the same shape when they point at the same allocation. The tree never
/// constructs or mutates shapes.
///
/// The bounding box is in world space. Edges count as inside, so a
/// zero-area box (a dot, or an axis-aligned segment) is still indexed.
pub trait Shape {
    /// World-space axis-aligned bounds.
    fn bounding_box(&self) -> Rect;

    /// Precise test against a world-space rectangle.
    ///
    /// Defaults to the bounding-box test.
    fn intersects_rect(&self, rect: Rect) -> bool {
        overlaps(self.bounding_box(), rect)
    }

    /// Precise test against a world-space segment.
    ///
    /// Defaults to clipping the segment against the bounding box.
    fn intersects_line(&self, line: Line) -> bool {
        segment_intersects_rect(line, self.bounding_box())
    }
}

impl Shape for Rect {
    fn bounding_box(&self) -> Rect {
        *self
    }
}

/// Identity of a shared shape: the address of its allocation.
///
/// Stable for as long as any `Rc` to the shape is alive, which holds while
/// the shape is stored in a tree or an ordered list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ShapeKey(usize);

impl ShapeKey {
    #[inline]
    pub(crate) fn of<S: ?Sized>(shape: &Rc<S>) -> Self {
        Self(Rc::as_ptr(shape).cast::<()>().addr())
    }
}
