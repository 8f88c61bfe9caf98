// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Work requested for the next frame tick.

bitflags::bitflags! {
    /// What the next [`Board::tick`](crate::Board::tick) has to do.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FrameRequest: u8 {
        /// Redraw dirty tiles covering the viewport and blit them.
        const RENDER = 0b0000_0001;
        /// Present the screen again without touching tiles.
        const UPDATE = 0b0000_0010;
    }
}
