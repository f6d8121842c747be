/// Pixel margin added around a face before cropping it for search.
pub const FACE_CROP_MARGIN: i32 = 20;

/// A corner-coordinate face box `(x1, y1) - (x2, y2)` inside frame bounds.
///
/// Derived from a center-form detection plus a margin. Both corners are
/// clamped to `[0, width-1] x [0, height-1]` and the box is never empty on
/// frames of at least 2x2 pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceRegion {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl FaceRegion {
    /// Builds a region from a center-form box expanded by `margin` pixels.
    pub fn around_center(
        center: (f64, f64),
        size: (f64, f64),
        margin: i32,
        frame_w: u32,
        frame_h: u32,
    ) -> Self {
        let (cx, cy) = center;
        let half_w = size.0.max(0.0) / 2.0;
        let half_h = size.1.max(0.0) / 2.0;
        let margin = f64::from(margin);

        let (x1, x2) = clamp_span(cx - half_w - margin, cx + half_w + margin, frame_w);
        let (y1, y2) = clamp_span(cy - half_h - margin, cy + half_h + margin, frame_h);
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }
}

/// Clamps `[lo, hi]` into `[0, extent-1]`, keeping `lo < hi` when possible.
///
/// Clamping happens in `f64` before truncation, so arbitrarily large or
/// off-frame boxes cannot overflow. NaN edges collapse to 0.
fn clamp_span(lo: f64, hi: f64, extent: u32) -> (i32, i32) {
    let max = extent.saturating_sub(1).min(i32::MAX as u32) as i32;
    let to_pixel = |v: f64| v.clamp(0.0, f64::from(max)) as i32;
    let mut lo = to_pixel(lo);
    let mut hi = to_pixel(hi);
    if hi <= lo && max >= 1 {
        if lo < max {
            hi = lo + 1;
        } else {
            lo = max - 1;
            hi = max;
        }
    }
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn region(cx: f64, cy: f64, w: f64, h: f64, margin: i32) -> FaceRegion {
        FaceRegion::around_center((cx, cy), (w, h), margin, 640, 480)
    }

    #[test]
    fn test_margin_expands_centered_box() {
        let r = region(100.0, 100.0, 50.0, 50.0, FACE_CROP_MARGIN);
        assert_eq!(
            r,
            FaceRegion {
                x1: 55,
                y1: 55,
                x2: 145,
                y2: 145
            }
        );
    }

    #[test]
    fn test_zero_margin_matches_detection_box() {
        let r = region(100.0, 100.0, 50.0, 50.0, 0);
        assert_eq!((r.x1, r.y1, r.x2, r.y2), (75, 75, 125, 125));
        assert_eq!(r.width(), 50);
        assert_eq!(r.height(), 50);
    }

    #[test]
    fn test_clamps_at_top_left_corner() {
        let r = region(10.0, 5.0, 60.0, 40.0, FACE_CROP_MARGIN);
        assert_eq!((r.x1, r.y1), (0, 0));
        assert_eq!((r.x2, r.y2), (60, 45));
    }

    #[test]
    fn test_clamps_at_bottom_right_corner() {
        let r = region(630.0, 470.0, 80.0, 80.0, FACE_CROP_MARGIN);
        assert_eq!((r.x2, r.y2), (639, 479));
        assert_eq!((r.x1, r.y1), (570, 410));
    }

    #[test]
    fn test_box_entirely_off_frame_stays_non_empty() {
        let r = region(5000.0, -300.0, 10.0, 10.0, 0);
        assert_eq!((r.x1, r.x2), (638, 639));
        assert_eq!((r.y1, r.y2), (0, 1));
    }

    #[test]
    fn test_huge_box_with_margin_covers_frame() {
        let r = region(100.0, 100.0, 1e10, 1e10, FACE_CROP_MARGIN);
        assert_eq!((r.x1, r.y1, r.x2, r.y2), (0, 0, 639, 479));
    }

    #[test]
    fn test_far_off_frame_center_with_margin_clamps() {
        let r = region(-1e10, 100.0, 50.0, 50.0, FACE_CROP_MARGIN);
        assert_eq!((r.x1, r.x2), (0, 1));
        assert_eq!((r.y1, r.y2), (55, 145));
    }

    #[test]
    fn test_nan_center_collapses_to_origin() {
        let r = region(f64::NAN, 100.0, 50.0, 50.0, 0);
        assert_eq!((r.x1, r.x2), (0, 1));
    }

    #[test]
    fn test_negative_size_treated_as_zero() {
        let r = region(100.0, 100.0, -40.0, -40.0, 0);
        assert_eq!((r.x1, r.x2), (100, 101));
        assert_eq!((r.y1, r.y2), (100, 101));
    }

    // ── Bounds invariant ─────────────────────────────────────────────

    #[rstest]
    fn test_region_always_inside_frame(
        #[values(-1e10, -100.0, 0.0, 1.0, 320.0, 639.0, 900.0, 1e10)] cx: f64,
        #[values(-1e10, -50.0, 0.0, 240.0, 479.0, 700.0, 1e10)] cy: f64,
        #[values(0.0, 1.0, 50.0, 2000.0, 1e10, f64::INFINITY)] size: f64,
        #[values(0, FACE_CROP_MARGIN)] margin: i32,
    ) {
        let r = region(cx, cy, size, size, margin);
        assert!(0 <= r.x1 && r.x1 < r.x2 && r.x2 <= 639, "{r:?}");
        assert!(0 <= r.y1 && r.y1 < r.y2 && r.y2 <= 479, "{r:?}");
    }
}
