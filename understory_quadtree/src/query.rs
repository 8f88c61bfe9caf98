// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query primitives and the predicates used to filter query candidates.

use kurbo::{Line, Point, Rect};

/// The geometry a query is made with.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Query {
    /// Everything at a world point.
    Point(Point),
    /// Everything touching a world rectangle.
    Rect(Rect),
    /// Everything along a world segment.
    Line(Line),
}

impl Query {
    /// Whether the query geometry touches `region` (edges inclusive).
    pub fn touches(&self, region: Rect) -> bool {
        match *self {
            Self::Point(p) => contains_point(region, p),
            Self::Rect(r) => overlaps(region, r),
            Self::Line(l) => segment_intersects_rect(l, region),
        }
    }
}

impl From<Point> for Query {
    fn from(p: Point) -> Self {
        Self::Point(p)
    }
}

impl From<Rect> for Query {
    fn from(r: Rect) -> Self {
        Self::Rect(r)
    }
}

impl From<Line> for Query {
    fn from(l: Line) -> Self {
        Self::Line(l)
    }
}

/// Candidate filters for [`QuadTree::query_items_with`](crate::QuadTree::query_items_with).
///
/// A filter sees every distinct shape stored in a node the query touched and
/// decides whether it belongs in the result.
pub mod filter {
    use kurbo::Rect;

    use super::{Query, contains_rect};
    use crate::Shape;

    /// The shape's bounding box touches the query. This is the default filter.
    pub fn bounds_intersect<S: Shape + ?Sized>(shape: &S, query: &Query) -> bool {
        query.touches(shape.bounding_box())
    }

    /// The query rectangle fully contains the shape's bounding box.
    ///
    /// Point and line queries never contain a shape.
    pub fn bounds_inside<S: Shape + ?Sized>(shape: &S, query: &Query) -> bool {
        match query {
            Query::Rect(r) => contains_rect(*r, shape.bounding_box()),
            Query::Point(_) | Query::Line(_) => false,
        }
    }

    /// Defer to the shape's own intersection tests.
    pub fn exact<S: Shape + ?Sized>(shape: &S, query: &Query) -> bool {
        match *query {
            Query::Point(p) => shape.intersects_rect(Rect::from_points(p, p)),
            Query::Rect(r) => shape.intersects_rect(r),
            Query::Line(l) => shape.intersects_line(l),
        }
    }

    /// Accept every candidate, including shapes stored in a touched node
    /// whose own bounds miss the query.
    pub fn any<S: Shape + ?Sized>(_shape: &S, _query: &Query) -> bool {
        true
    }
}

/// Inclusive rectangle overlap: shared edges count.
#[inline]
pub(crate) fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

#[inline]
pub(crate) fn contains_point(r: Rect, p: Point) -> bool {
    p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
}

#[inline]
pub(crate) fn contains_rect(outer: Rect, inner: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.x1 <= outer.x1 && inner.y0 >= outer.y0 && inner.y1 <= outer.y1
}

/// Liang-Barsky clip of a segment against a rectangle, edges inclusive.
pub(crate) fn segment_intersects_rect(line: Line, r: Rect) -> bool {
    let d = line.p1 - line.p0;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    let edges = [
        (-d.x, line.p0.x - r.x0),
        (d.x, r.x1 - line.p0.x),
        (-d.y, line.p0.y - r.y0),
        (d.y, r.y1 - line.p0.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            // Parallel to this edge: reject when outside of it.
            if q < 0.0 {
                return false;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return false;
            }
            if t > t0 {
                t0 = t;
            }
        } else {
            if t < t0 {
                return false;
            }
            if t < t1 {
                t1 = t;
            }
        }
    }
    true
}
