//! # Size Display Derivation
//!
//! Builds the human-readable size label stored on tire sizes, wheel sizes
//! and products. The label is denormalized onto the product row at write
//! time so size search/filter never recomputes it.
//!
//! ## Formats
//! - Tire: `"{width}/{aspect_ratio}R{diameter}"`, plus
//!   `" {load_index}{speed_rating}"` when either rating is present.
//!   `205/55R16`, `205/55R16 91V`
//! - Wheel: `"{diameter}x{width}"`, plus `" PCD:{pcd}"`, `" {n} Stud"`,
//!   `" ({stud_type})"` for each attribute present.
//!   `16x7 PCD:4x100 5 Stud (Long Stud)`

use std::fmt::Write;

/// Derives the display label for a tire size.
///
/// The load index and speed rating are concatenated without a separator
/// (industry notation: `91V`), and either may stand alone.
pub fn tire_size_display(
    width: i64,
    aspect_ratio: i64,
    diameter: i64,
    load_index: Option<&str>,
    speed_rating: Option<&str>,
) -> String {
    let mut label = format!("{}/{}R{}", width, aspect_ratio, diameter);

    let rating: String = [load_index, speed_rating]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if !rating.is_empty() {
        let _ = write!(label, " {}", rating);
    }

    label
}

/// Derives the display label for an alloy wheel size.
///
/// Diameter and width format without trailing `.0` for whole values
/// (`16x7`, `16x7.5`).
pub fn wheel_size_display(
    diameter: f64,
    width: f64,
    pcd: Option<&str>,
    stud_count: Option<i64>,
    stud_type: Option<&str>,
) -> String {
    let mut label = format!("{}x{}", diameter, width);

    if let Some(pcd) = pcd.map(str::trim).filter(|s| !s.is_empty()) {
        let _ = write!(label, " PCD:{}", pcd);
    }

    if let Some(count) = stud_count {
        let _ = write!(label, " {} Stud", count);
    }

    if let Some(kind) = stud_type.map(str::trim).filter(|s| !s.is_empty()) {
        let _ = write!(label, " ({})", kind);
    }

    label
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tire_display_bare() {
        assert_eq!(tire_size_display(205, 55, 16, None, None), "205/55R16");
    }

    #[test]
    fn test_tire_display_with_ratings() {
        assert_eq!(
            tire_size_display(205, 55, 16, Some("91"), Some("V")),
            "205/55R16 91V"
        );
    }

    #[test]
    fn test_tire_display_load_index_only() {
        assert_eq!(
            tire_size_display(205, 55, 16, Some("91"), None),
            "205/55R16 91"
        );
    }

    #[test]
    fn test_tire_display_speed_rating_only() {
        assert_eq!(
            tire_size_display(185, 65, 15, None, Some("H")),
            "185/65R15 H"
        );
    }

    #[test]
    fn test_tire_display_ignores_blank_ratings() {
        assert_eq!(tire_size_display(205, 55, 16, Some(""), Some("  ")), "205/55R16");
    }

    #[test]
    fn test_wheel_display_full() {
        let label = wheel_size_display(16.0, 7.0, Some("4x100"), Some(5), Some("Long Stud"));
        assert_eq!(label, "16x7 PCD:4x100 5 Stud (Long Stud)");
    }

    #[test]
    fn test_wheel_display_minimal() {
        assert_eq!(wheel_size_display(17.0, 7.5, None, None, None), "17x7.5");
    }

    #[test]
    fn test_wheel_display_partial() {
        assert_eq!(
            wheel_size_display(16.0, 7.0, None, Some(5), Some("Long Stud")),
            "16x7 5 Stud (Long Stud)"
        );
    }
}
