// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Errors returned by [`Board`](crate::Board).
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The spatial index or the paint order rejected the operation.
    #[error(transparent)]
    Index(#[from] understory_quadtree::Error),
    /// The tile cache rejected the operation.
    #[error(transparent)]
    Cache(#[from] understory_tile_cache::Error),
}
