// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;
use understory_tile_cache::TILE_SIZE;
use understory_view2d::ISize;

/// Construction parameters for a [`Board`](crate::Board).
#[derive(Clone, Debug, PartialEq)]
pub struct BoardConfig {
    /// Root region of the spatial index. It grows as shapes are added.
    pub initial_region: Rect,
    /// Shapes per quadtree node before it subdivides.
    pub node_capacity: usize,
    /// Tiles the cache holds until the first [`Board::resize`](crate::Board::resize).
    pub cache_capacity: usize,
    /// Tile size in grid pixels.
    pub tile_size: ISize,
    /// Zoom change per step of [`Board::zoom_by`](crate::Board::zoom_by).
    pub zoom_step: f64,
    /// Smallest zoom factor.
    pub min_zoom: f64,
    /// Cache budget per viewport tile, applied on resize.
    pub tile_budget_factor: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            initial_region: Rect::new(0.0, 0.0, 1000.0, 1000.0),
            node_capacity: 100,
            cache_capacity: 100,
            tile_size: TILE_SIZE,
            zoom_step: 0.1,
            min_zoom: 0.1,
            tile_budget_factor: 9,
        }
    }
}
