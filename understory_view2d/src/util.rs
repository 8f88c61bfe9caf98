// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Float to integer helpers that work without `std` float intrinsics.
//!
//! All helpers saturate at the `i32` range and map NaN to zero, following
//! the semantics of `as` casts.

#[allow(
    clippy::cast_possible_truncation,
    reason = "Integer coordinates are intentionally i32; out-of-range values are saturated."
)]
#[inline]
pub(crate) fn round_half_away(value: f64) -> i32 {
    let t = value as i32;
    let frac = value - f64::from(t);
    if frac >= 0.5 {
        t.saturating_add(1)
    } else if frac <= -0.5 {
        t.saturating_sub(1)
    } else {
        t
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Integer coordinates are intentionally i32; out-of-range values are saturated."
)]
#[inline]
pub(crate) fn floor_to_i32(value: f64) -> i32 {
    let t = value as i32;
    // The cast truncates toward zero.
    if value < f64::from(t) {
        t.saturating_sub(1)
    } else {
        t
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Integer coordinates are intentionally i32; out-of-range values are saturated."
)]
#[inline]
pub(crate) fn ceil_to_i32(value: f64) -> i32 {
    let t = value as i32;
    if value > f64::from(t) {
        t.saturating_add(1)
    } else {
        t
    }
}
