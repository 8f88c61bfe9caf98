// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_board --heading-base-level=0

//! Understory Board: the core of an infinite whiteboard.
//!
//! A [`Board`] ties the other Understory crates together:
//!
//! - shapes live in an `understory_quadtree` index whose root grows without bound,
//! - their paint order is the tree's ordered list,
//! - the viewport is a zoom and a world-space offset (`understory_view2d`),
//! - pixels are cached per 500 by 500 grid tile in an `understory_tile_cache` grid.
//!
//! Every mutation marks the tiles under the affected world region dirty and queues a render.
//! [`Board::tick`] then redraws the dirty tiles under the viewport from the shapes that touch
//! them, back to front, and blits every visible tile to a [`Screen`]. Panning moves the view
//! over the same tiles; zooming rescales grid space and invalidates every tile.
//!
//! Shapes decide how they paint through [`Draw`]; the tile surface type is any
//! `understory_tile_cache::TileSurface`.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Rect, Vec2};
//! use understory_board::{Board, BoardConfig, Draw, Screen};
//! use understory_quadtree::Shape;
//! use understory_tile_cache::Pixels;
//! use understory_view2d::{IRect, ISize};
//!
//! struct Square(Rect);
//!
//! impl Shape for Square {
//!     fn bounding_box(&self) -> Rect {
//!         self.0
//!     }
//! }
//!
//! impl Draw<Pixels> for Square {
//!     fn draw(&self, surface: &mut Pixels, origin: Point, zoom: f64) {
//!         let x = ((self.0.x0 - origin.x) * zoom) as i32;
//!         let y = ((self.0.y0 - origin.y) * zoom) as i32;
//!         if let Some(px) = surface.pixel_mut(x, y) {
//!             *px = [0, 0, 0, 255];
//!         }
//!     }
//! }
//!
//! struct Window(usize);
//!
//! impl Screen<Pixels> for Window {
//!     fn blit(&mut self, _tile: &Pixels, _dest: IRect) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let mut board: Board<Square, Pixels> = Board::new(BoardConfig::default()).unwrap();
//! board.resize(ISize::new(800, 600)).unwrap();
//! board.insert(Rc::new(Square(Rect::new(10.0, 10.0, 40.0, 40.0))));
//!
//! let mut window = Window(0);
//! assert!(board.tick(&mut window));
//! assert_eq!(window.0, 4);
//!
//! // Nothing changed, nothing to do.
//! assert!(!board.tick(&mut window));
//!
//! board.pan_by(Vec2::new(-100.0, 0.0));
//! assert!(board.tick(&mut window));
//! assert!(board.pick(Point::new(120.0, 20.0)).is_some());
//! ```
//!
//! ## Features
//!
//! - `std` *(default)*: forwards to `std` in every Understory dependency.
//! - `libm`: forwards to `libm` for `no_std` targets.

#![no_std]

extern crate alloc;

mod board;
mod config;
mod error;
mod frame;
mod surface;

pub use board::{Board, RenderStats};
pub use config::BoardConfig;
pub use error::BoardError;
pub use frame::FrameRequest;
pub use surface::{Draw, Screen};
