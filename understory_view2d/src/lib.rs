// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_view2d --heading-base-level=0

//! Understory View2D: coordinate spaces for zoomable, pannable 2D canvases.
//!
//! A canvas with a tile cache works in three spaces:
//!
//! - **World** space holds the content. It is unbounded and independent of zoom and pan.
//! - **Grid** space is world space scaled by the zoom factor. Cache tiles are laid out here
//!   so a tile always covers the same number of pixels, whatever the zoom.
//! - **View** space is screen pixels, offset by the viewport position.
//!
//! [`CoordinateTransformer`] converts points, sizes, and rectangles between these spaces.
//! Integer variants ([`IPoint`], [`ISize`], [`IRect`]) round halves away from zero per axis;
//! rectangles round their corners so adjacent rectangles stay adjacent.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_view2d::{CoordinateTransformer, IRect};
//!
//! let t = CoordinateTransformer::new(2.0, Point::new(-100.0, 0.0));
//!
//! // A world rect becomes a zoomed grid rect; integer rects round their corners.
//! let grid = t.world_to_grid(IRect::new(0, 0, 250, 250));
//! assert_eq!(grid, IRect::new(0, 0, 500, 500));
//!
//! // Grid and view space differ only by the zoomed offset.
//! let view = t.grid_to_view(Rect::new(0.0, 0.0, 500.0, 500.0));
//! assert_eq!(view, Rect::new(200.0, 0.0, 700.0, 500.0));
//! ```
//!
//! ## Features
//!
//! - `std` *(default)*: forwards to `kurbo/std`.
//! - `libm`: forwards to `kurbo/libm` for `no_std` targets.

#![no_std]

mod int;
mod transform;
pub(crate) mod util;

pub use int::{IPoint, IRect, ISize};
pub use transform::{CoordinateTransformer, Mappable, ScaleTranslate};
