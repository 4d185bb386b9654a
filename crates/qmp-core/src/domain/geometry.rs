//! Screen geometry and coordinate normalization.
//!
//! QEMU's absolute pointer devices (USB tablet, virtio tablet) do not speak
//! pixels.  They expect every `abs` event value in a fixed virtual range
//! `0..=32767`, independent of the guest's display resolution.  Callers, on
//! the other hand, describe positions in pixels of a logical screen (for
//! example a 1280×720 screenshot).  [`ScreenGeometry::normalize`] converts
//! between the two:
//!
//! ```text
//! x' = x * vptr_max // width
//! y' = y * vptr_max // height
//! ```
//!
//! Division is floor division, including for negative inputs, so `-1`
//! pixels maps to a negative virtual value rather than to zero.
//!
//! Relative offsets (`move` with `offset`) go through the same formula.  A
//! delta in pixels and a position in pixels are different quantities, but
//! the host-side behavior depends on this exact scaling, so it is kept.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::action::Action;

/// Default logical screen width in pixels.
pub const DEFAULT_SCREEN_WIDTH: u32 = 1280;

/// Default logical screen height in pixels.
pub const DEFAULT_SCREEN_HEIGHT: u32 = 720;

/// Maximum value of QEMU's absolute pointer axis.
pub const DEFAULT_VPTR_MAX: u32 = 32767;

/// Errors produced when constructing a [`ScreenGeometry`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    /// Width or height was zero.
    #[error("screen dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
}

/// A 2-D integer point.
///
/// In pixel space before normalization, in virtual-pointer space after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Logical screen size plus the virtual pointer range it maps onto.
///
/// Constant for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenGeometry {
    width: u32,
    height: u32,
    vptr_max: u32,
}

impl ScreenGeometry {
    /// Creates a geometry for a `width`×`height` logical screen.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroDimension`] if either dimension is zero.
    pub fn new(width: u32, height: u32, vptr_max: u32) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::ZeroDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            vptr_max,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn vptr_max(&self) -> u32 {
        self.vptr_max
    }

    /// Rescales a pixel point into the virtual pointer range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use qmp_core::domain::geometry::{Point, ScreenGeometry};
    ///
    /// let geometry = ScreenGeometry::default();
    /// assert_eq!(geometry.normalize(Point::new(640, 360)), Point::new(16383, 16383));
    /// ```
    pub fn normalize(&self, point: Point) -> Point {
        Point {
            x: scale(point.x, self.vptr_max, self.width),
            y: scale(point.y, self.vptr_max, self.height),
        }
    }

    /// Returns a copy of `action` with every `point`, `offset`, and `path`
    /// entry normalized.  The input is left untouched.
    pub fn normalize_action(&self, action: &Action) -> Action {
        action.map_points(|p| self.normalize(p))
    }
}

impl Default for ScreenGeometry {
    /// 1280×720 logical screen mapped onto `0..=32767`.
    fn default() -> Self {
        Self {
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
            vptr_max: DEFAULT_VPTR_MAX,
        }
    }
}

fn scale(value: i64, vptr_max: u32, extent: u32) -> i64 {
    // i128 keeps the product exact for any i64 input.
    let scaled = (value as i128 * vptr_max as i128).div_euclid(extent as i128);
    scaled.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_origin() {
        let g = ScreenGeometry::default();
        assert_eq!(g.normalize(Point::new(0, 0)), Point::new(0, 0));
    }

    #[test]
    fn test_center_uses_floor_division() {
        // 640 * 32767 / 1280 = 16383.5, 360 * 32767 / 720 = 16383.5
        let g = ScreenGeometry::default();
        assert_eq!(g.normalize(Point::new(640, 360)), Point::new(16383, 16383));
    }

    #[test]
    fn test_formula_holds_across_the_screen() {
        let g = ScreenGeometry::default();
        for x in (0..1280).step_by(37) {
            for y in (0..720).step_by(29) {
                let p = g.normalize(Point::new(x, y));
                assert_eq!(p.x, x * 32767 / 1280);
                assert_eq!(p.y, y * 32767 / 720);
            }
        }
    }

    #[test]
    fn test_negative_values_round_toward_negative_infinity() {
        // -10 * 32767 / 1280 = -255.99..., floor is -256
        let g = ScreenGeometry::default();
        assert_eq!(g.normalize(Point::new(-10, 0)).x, -256);
    }

    #[test]
    fn test_custom_geometry() {
        let g = ScreenGeometry::new(1920, 1080, 65535).unwrap();
        assert_eq!(g.normalize(Point::new(1919, 1079)), Point::new(65500, 65474));
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        assert_eq!(
            ScreenGeometry::new(0, 720, DEFAULT_VPTR_MAX),
            Err(GeometryError::ZeroDimension { width: 0, height: 720 })
        );
    }
}
