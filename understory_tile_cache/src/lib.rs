// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tile_cache --heading-base-level=0

//! Understory Tile Cache: a bounded pool of rendered tiles with dirty tracking.
//!
//! A [`CacheGrid`] splits grid space (zoom-scaled world space, see `understory_view2d`) into
//! fixed-size tiles, [`TILE_SIZE`] by default, addressed by integer tile coordinates.
//!
//! - Tiles are created on first access, blank and dirty.
//! - Every access promotes the tile to most recently used. When the cache is full, a miss
//!   evicts the least recently used tile first.
//! - [`CacheGrid::mark_dirty`] flags every tile overlapping a pixel rectangle. The renderer
//!   redraws dirty tiles and clears the flag with [`CacheCell::set_dirty`]; the cache never
//!   clears it on its own.
//!
//! The surface type is pluggable through [`TileSurface`]; [`Pixels`] is a plain RGBA8 buffer.
//!
//! # Example
//!
//! ```rust
//! use understory_tile_cache::{CacheGrid, Pixels};
//! use understory_view2d::{IPoint, IRect};
//!
//! let mut cache = CacheGrid::<Pixels>::new(2).unwrap();
//! cache.cell(IPoint::new(0, 0)).set_dirty(false);
//! cache.cell(IPoint::new(1, 0)).set_dirty(false);
//!
//! // Touching a third tile evicts the least recently used one.
//! cache.cell(IPoint::new(2, 0));
//! assert!(!cache.contains(IPoint::new(0, 0)));
//! assert_eq!(cache.size(), 2);
//!
//! // Invalidate a pixel rectangle inside tile (1, 0).
//! cache.mark_dirty(IRect::new(600, 10, 700, 20));
//! assert!(cache.get(IPoint::new(1, 0)).unwrap().is_dirty());
//! ```

#![no_std]

extern crate alloc;

mod cell;
mod error;
mod grid;

pub use cell::{CacheCell, Pixels, TileSurface};
pub use error::Error;
pub use grid::{CacheGrid, TILE_SIZE};
