// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cache cells and the raster surfaces they own.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use understory_view2d::{IPoint, IRect, ISize};

/// A raster surface that a cache cell can own.
pub trait TileSurface {
    /// A fully transparent surface of `size` pixels.
    fn blank(size: ISize) -> Self;

    /// Reset every pixel to transparent.
    fn clear(&mut self);
}

/// A plain premultiplied RGBA8 pixel buffer, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct Pixels {
    size: ISize,
    data: Vec<[u8; 4]>,
}

impl Debug for Pixels {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pixels")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl Pixels {
    /// Dimensions in pixels.
    pub fn size(&self) -> ISize {
        self.size
    }

    /// All pixels, row-major.
    pub fn data(&self) -> &[[u8; 4]] {
        &self.data
    }

    /// The pixel at `(x, y)`, if inside the surface.
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        self.index(x, y).map(|i| self.data[i])
    }

    /// Mutable access to the pixel at `(x, y)`, if inside the surface.
    pub fn pixel_mut(&mut self, x: i32, y: i32) -> Option<&mut [u8; 4]> {
        self.index(x, y).map(|i| &mut self.data[i])
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        let w = usize::try_from(self.size.width).ok()?;
        let h = usize::try_from(self.size.height).ok()?;
        (x < w && y < h).then_some(y * w + x)
    }
}

impl TileSurface for Pixels {
    fn blank(size: ISize) -> Self {
        let w = usize::try_from(size.width).unwrap_or(0);
        let h = usize::try_from(size.height).unwrap_or(0);
        Self {
            size,
            data: vec![[0; 4]; w * h],
        }
    }

    fn clear(&mut self) {
        self.data.fill([0; 4]);
    }
}

/// One cached tile: its grid coordinate, its surface, and whether the surface
/// is stale.
///
/// A cell starts dirty. Only the renderer clears the flag, after redrawing
/// the surface.
pub struct CacheCell<T> {
    pub(crate) coord: IPoint,
    pub(crate) rect: IRect,
    pub(crate) surface: T,
    pub(crate) dirty: bool,
    // Recency links, least recent toward the head.
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
}

impl<T> Debug for CacheCell<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CacheCell")
            .field("coord", &self.coord)
            .field("rect", &self.rect)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl<T> CacheCell<T> {
    /// Tile coordinate of this cell.
    pub fn coord(&self) -> IPoint {
        self.coord
    }

    /// Pixel rectangle covered by this cell, in grid space.
    pub fn rect(&self) -> IRect {
        self.rect
    }

    /// Whether the surface must be redrawn before use.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Set or clear the dirty flag.
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// The cached raster.
    pub fn surface(&self) -> &T {
        &self.surface
    }

    /// Mutable access to the cached raster.
    pub fn surface_mut(&mut self) -> &mut T {
        &mut self.surface
    }
}
