// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by the ordered list and the quadtree.

/// Errors returned by [`OrderedList`](crate::OrderedList) and [`QuadTree`](crate::QuadTree).
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The shape is not tracked by the ordered list.
    #[error("shape is not tracked by the ordered list")]
    NotFound,
    /// The tree cannot be built with the given parameters.
    #[error("invalid quadtree configuration: {0}")]
    InvalidConfiguration(&'static str),
}
