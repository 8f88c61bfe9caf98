// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Errors returned by [`CacheGrid`](crate::CacheGrid).
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The cache cannot operate with the given parameters.
    #[error("invalid tile cache configuration: {0}")]
    InvalidConfiguration(&'static str),
}
