// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_quadtree --heading-base-level=0

//! Understory Quadtree: an unbounded spatial index with a stable paint order.
//!
//! [`QuadTree`] indexes shared shapes ([`Rc`](alloc::rc::Rc) of anything implementing
//! [`Shape`]) by their world-space bounding boxes.
//!
//! - The root grows on demand, so shapes can be inserted anywhere on an unbounded plane.
//! - A node that fills up splits into four quadrants; a shape straddling a split is stored
//!   in every quadrant it touches, and queries return each shape once.
//! - Queries take a point, a rectangle, or a segment ([`Query`]) and an optional predicate
//!   (see [`filter`]).
//! - An [`OrderedList`] owned by the tree keeps the back-to-front z-order. Raising or
//!   lowering a shape is O(1) and never renumbers the other shapes.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Rect};
//! use understory_quadtree::{QuadTree, filter};
//!
//! let mut tree = QuadTree::with_capacity(Rect::new(0.0, 0.0, 500.0, 500.0), 1).unwrap();
//! let a = Rc::new(Rect::new(-10.0, -10.0, 10.0, 10.0));
//! let b = Rc::new(Rect::new(0.0, 0.0, 40.0, 40.0));
//! tree.insert_item(a.clone());
//! tree.insert_item(b.clone());
//!
//! // The root grew to contain `a`.
//! assert!(tree.region().x0 <= -10.0);
//!
//! // Paint order: `b` was inserted last, so it is on top.
//! let mut hits = tree.query_items(Point::new(5.0, 5.0));
//! tree.reorder(&mut hits).unwrap();
//! assert!(Rc::ptr_eq(&hits[1], &b));
//!
//! // Raise `a` above `b`.
//! tree.order_mut().bring_to_front(&a).unwrap();
//! tree.reorder(&mut hits).unwrap();
//! assert!(Rc::ptr_eq(&hits[1], &a));
//!
//! // Only shapes entirely inside the rectangle.
//! let inside = tree.query_items_with(Rect::new(-1.0, -1.0, 50.0, 50.0), filter::bounds_inside);
//! assert_eq!(inside.len(), 1);
//! ```
//!
//! ## Features
//!
//! - `std` *(default)*: forwards to `kurbo/std`.
//! - `libm`: forwards to `kurbo/libm` for `no_std` targets.
//!
//! ### Float semantics
//!
//! Bounding boxes and query geometry are expected to be finite. Shapes with non-finite
//! bounds are not indexed, and a warning is logged.

#![no_std]

extern crate alloc;

mod error;
mod ordered_list;
mod query;
mod shape;
mod tree;

pub use error::Error;
pub use ordered_list::{Iter, OrderedList};
pub use query::{Query, filter};
pub use shape::Shape;
pub use tree::QuadTree;
