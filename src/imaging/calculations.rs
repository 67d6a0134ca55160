//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the dimensions of `source` fitted inside a `(max_w, max_h)` box.
///
/// A zero bound leaves that axis unconstrained. Aspect ratio is preserved:
/// the constraining axis lands exactly on its bound and the other is rounded,
/// never below 1 px and never past its own bound.
///
/// With `allow_upscale == false`, a source that already fits is returned
/// unchanged. A box with no bound at all never changes the source, even when
/// upscaling is allowed.
///
/// # Examples
/// ```
/// # use jpegfit::imaging::calculate_fit_dimensions;
/// // 4000x3000 into a 1000x1000 box → 1000x750
/// assert_eq!(calculate_fit_dimensions((4000, 3000), (1000, 1000), false), (1000, 750));
///
/// // Height-only bound
/// assert_eq!(calculate_fit_dimensions((800, 600), (0, 300), false), (400, 300));
/// ```
pub fn calculate_fit_dimensions(
    source: (u32, u32),
    bounds: (u32, u32),
    allow_upscale: bool,
) -> (u32, u32) {
    let (src_w, src_h) = source;
    if src_w == 0 || src_h == 0 || bounds == (0, 0) {
        return source;
    }
    let max_w = if bounds.0 == 0 { u32::MAX } else { bounds.0 };
    let max_h = if bounds.1 == 0 { u32::MAX } else { bounds.1 };

    if !allow_upscale && src_w <= max_w && src_h <= max_h {
        return source;
    }

    let scale_w = max_w as f64 / src_w as f64;
    let scale_h = max_h as f64 / src_h as f64;

    if scale_w <= scale_h {
        // Width is the constraint
        let h = (src_h as f64 * scale_w).round() as u64;
        (max_w, h.clamp(1, max_h as u64) as u32)
    } else {
        // Height is the constraint
        let w = (src_w as f64 * scale_h).round() as u64;
        (w.clamp(1, max_w as u64) as u32, max_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_into_square_box() {
        assert_eq!(
            calculate_fit_dimensions((4000, 3000), (1000, 1000), false),
            (1000, 750)
        );
    }

    #[test]
    fn portrait_into_square_box() {
        assert_eq!(
            calculate_fit_dimensions((3000, 4000), (1000, 1000), false),
            (750, 1000)
        );
    }

    #[test]
    fn width_only_bound() {
        assert_eq!(calculate_fit_dimensions((2000, 1000), (500, 0), false), (500, 250));
    }

    #[test]
    fn height_only_bound() {
        assert_eq!(calculate_fit_dimensions((800, 600), (0, 300), false), (400, 300));
    }

    #[test]
    fn tighter_axis_wins() {
        // 1600x900 into 800x800: width scale 0.5, height scale 0.89 → width wins
        assert_eq!(calculate_fit_dimensions((1600, 900), (800, 800), false), (800, 450));
        // 1600x900 into 1600x300: height scale 0.33 → height wins
        assert_eq!(calculate_fit_dimensions((1600, 900), (1600, 300), false), (533, 300));
    }

    #[test]
    fn small_image_kept_without_upscale() {
        assert_eq!(calculate_fit_dimensions((200, 100), (1000, 1000), false), (200, 100));
    }

    #[test]
    fn small_image_enlarged_with_upscale() {
        assert_eq!(calculate_fit_dimensions((200, 100), (1000, 1000), true), (1000, 500));
    }

    #[test]
    fn unbounded_box_never_upscales() {
        assert_eq!(calculate_fit_dimensions((200, 100), (0, 0), true), (200, 100));
    }

    #[test]
    fn upscale_follows_the_only_bound() {
        assert_eq!(calculate_fit_dimensions((200, 100), (0, 400), true), (800, 400));
    }

    #[test]
    fn extreme_aspect_never_collapses_to_zero() {
        assert_eq!(calculate_fit_dimensions((10000, 2), (100, 100), false), (100, 1));
    }

    #[test]
    fn rounding_never_exceeds_bound() {
        for (src, bounds) in [
            ((1001, 999), (100, 100)),
            ((333, 777), (50, 120)),
            ((4096, 2731), (1920, 1080)),
        ] {
            let (w, h) = calculate_fit_dimensions(src, bounds, false);
            assert!(w <= bounds.0 && h <= bounds.1, "{src:?} in {bounds:?} → {w}x{h}");
        }
    }

    #[test]
    fn aspect_ratio_preserved_within_rounding() {
        let (w, h) = calculate_fit_dimensions((4000, 3000), (640, 640), false);
        let src_ratio = 4000.0 / 3000.0;
        let out_ratio = w as f64 / h as f64;
        assert!((src_ratio - out_ratio).abs() < 0.01);
    }
}
