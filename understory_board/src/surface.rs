// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contracts for drawing shapes onto tiles and tiles onto the screen.

use kurbo::Point;
use understory_view2d::IRect;

/// A shape that can paint itself onto a tile surface of type `T`.
pub trait Draw<T> {
    /// Paint onto `surface`.
    ///
    /// The surface's top-left pixel sits at world point `origin`, and one
    /// world unit spans `zoom` pixels.
    fn draw(&self, surface: &mut T, origin: Point, zoom: f64);
}

/// The target tiles are copied to at the end of a render pass.
pub trait Screen<T> {
    /// Copy `tile` to the view-space pixel rectangle `dest`.
    fn blit(&mut self, tile: &T, dest: IRect);
}
