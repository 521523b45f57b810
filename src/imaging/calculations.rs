//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! Arithmetic is done in `i64` so that the rounding rules are defined for
//! zero and negative inputs too; [`target_dimensions`] narrows back to `u32`.

use super::backend::Dimensions;

/// Scale `n` by `factor`, truncating toward zero.
///
/// # Examples
/// ```
/// # use photo_resizer::imaging::scale_then_floor;
/// assert_eq!(scale_then_floor(4, 1.5), 6);
/// assert_eq!(scale_then_floor(10000, 0.3333), 3333);
/// assert_eq!(scale_then_floor(1, 0.9999), 0);
/// ```
pub fn scale_then_floor(n: i64, factor: f64) -> i64 {
    (n as f64 * factor) as i64
}

/// Snap `n` down to a multiple of `unit`, never collapsing a positive value to zero.
///
/// - `n <= 0` → `0`
/// - `unit <= 1` → `n` unchanged
/// - otherwise the largest multiple of `unit` not above `n`, or `unit`
///   itself when `n < unit`
///
/// # Examples
/// ```
/// # use photo_resizer::imaging::round_to_unit;
/// assert_eq!(round_to_unit(1, 4), 4);
/// assert_eq!(round_to_unit(11, 4), 8);
/// assert_eq!(round_to_unit(5, 0), 5);
/// assert_eq!(round_to_unit(-1, 4), 0);
/// ```
pub fn round_to_unit(n: i64, unit: i64) -> i64 {
    if n <= 0 {
        return 0;
    }
    if unit <= 1 {
        return n;
    }
    match n / unit {
        0 => unit,
        q => q * unit,
    }
}

/// Compute the target size of a scaled image.
///
/// Width and height are scaled and rounded independently, so the aspect
/// ratio drifts slightly when the unit does not divide both axes evenly.
pub fn target_dimensions(original: Dimensions, scale: f64, unit: u32) -> Dimensions {
    let axis = |n: u32| {
        let rounded = round_to_unit(scale_then_floor(i64::from(n), scale), i64::from(unit));
        u32::try_from(rounded).unwrap_or(u32::MAX)
    };
    Dimensions {
        width: axis(original.width),
        height: axis(original.height),
    }
}

/// Optional size limits applied to target dimensions.
///
/// `min` only applies when shrinking, `max` only when growing. Absent
/// bounds are `None`, which is not the same thing as a zero-sized bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeBounds {
    pub min: Option<Dimensions>,
    pub max: Option<Dimensions>,
}

/// Decide whether resizing `original` to `target` is worth doing.
///
/// Returns `false` when rounding produced the original size again, when a
/// target axis collapsed to zero, or when the target falls outside the
/// bound that applies to the scale direction. Bounds are inclusive.
pub fn is_resizable(
    original: Dimensions,
    target: Dimensions,
    scale: f64,
    bounds: &SizeBounds,
) -> bool {
    if target == original {
        return false;
    }
    if target.width == 0 || target.height == 0 {
        return false;
    }

    if scale < 1.0 {
        if let Some(min) = bounds.min {
            if target.width < min.width || target.height < min.height {
                return false;
            }
        }
    } else if let Some(max) = bounds.max {
        if target.width > max.width || target.height > max.height {
            return false;
        }
    }

    true
}
