//! Resize dimension resolution.
//!
//! Computes the destination offset, destination size, source offset and
//! source window for resizing an image into a target box. Pure geometry: no
//! pixel operations and no allocations, so it builds under `no_std`.
//!
//! `round` is half away from zero. `floor` and `ceil` are applied only at
//! fixed points; everything else stays in `f64` until the final truncation.
//!
//! # Example
//!
//! ```
//! use zenfit::{Anchor, ResizeRequest};
//!
//! let plan = ResizeRequest::new(400, 0).resolve(800, 600).unwrap();
//! assert_eq!(plan.as_tuple(), (0, 0, 0, 0, 400, 300, 800, 600));
//!
//! let plan = ResizeRequest::new(200, 100)
//!     .crop(true)
//!     .anchor(Anchor::Right)
//!     .resolve(100, 100)
//!     .unwrap();
//! assert_eq!(plan.src_x, 100);
//! ```

use num_traits::Float;

/// Where the source window is placed when the crop geometry doesn't center.
///
/// Horizontal and vertical components are independent; corner anchors set
/// both.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// No anchor adjustment. The mode's own source offset is kept.
    #[default]
    None,
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// Center on both axes.
    Center,
}

/// Placement of one anchor component along an axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Edge {
    Near,
    Middle,
    Far,
}

impl Anchor {
    /// Parse a short code (`L`, `TR`, `C`, …) or a name (`left`,
    /// `topright`, `top-right`, `center`, …). Case-insensitive.
    pub fn from_code(s: &str) -> Option<Self> {
        let s = s.trim();
        let mut buf = [0u8; 16];
        let mut len = 0;
        for b in s.bytes().filter(|b| !matches!(b, b'-' | b'_' | b' ')) {
            if len == buf.len() {
                return None;
            }
            buf[len] = b.to_ascii_lowercase();
            len += 1;
        }
        let key = core::str::from_utf8(&buf[..len]).ok()?;
        let anchor = match key {
            "" | "none" => Self::None,
            "l" | "left" => Self::Left,
            "r" | "right" => Self::Right,
            "t" | "top" => Self::Top,
            "b" | "bottom" => Self::Bottom,
            "tl" | "topleft" => Self::TopLeft,
            "tr" | "topright" => Self::TopRight,
            "bl" | "bottomleft" => Self::BottomLeft,
            "br" | "bottomright" => Self::BottomRight,
            "c" | "center" | "centre" | "middle" => Self::Center,
            _ => return None,
        };
        Some(anchor)
    }

    /// Short code, or `None` for [`Anchor::None`].
    pub const fn code(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Left => Some("L"),
            Self::Right => Some("R"),
            Self::Top => Some("T"),
            Self::Bottom => Some("B"),
            Self::TopLeft => Some("TL"),
            Self::TopRight => Some("TR"),
            Self::BottomLeft => Some("BL"),
            Self::BottomRight => Some("BR"),
            Self::Center => Some("C"),
        }
    }

    fn horizontal(self) -> Edge {
        match self {
            Self::Left | Self::TopLeft | Self::BottomLeft => Edge::Near,
            Self::Right | Self::TopRight | Self::BottomRight => Edge::Far,
            _ => Edge::Middle,
        }
    }

    fn vertical(self) -> Edge {
        match self {
            Self::Top | Self::TopLeft | Self::TopRight => Edge::Near,
            Self::Bottom | Self::BottomLeft | Self::BottomRight => Edge::Far,
            _ => Edge::Middle,
        }
    }
}

impl core::str::FromStr for Anchor {
    type Err = UnknownAnchor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or(UnknownAnchor)
    }
}

/// Returned by [`Anchor::from_str`](core::str::FromStr) for unrecognized input.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized anchor (expected L, R, T, B, TL, TR, BL, BR, C or a position name)")]
pub struct UnknownAnchor;

/// Why a request could not be resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Reason {
    /// Original width or height is zero or negative.
    #[error("original dimensions {width}x{height} are not positive")]
    NonPositiveSource { width: i32, height: i32 },
    /// Neither target dimension is positive.
    #[error("at least one target dimension must be positive")]
    MissingTarget,
    /// Crop mode derived a zero-sized working box, so no crop window exists.
    #[error("crop target collapses to zero on one axis")]
    DegenerateCrop,
    /// The result would be the same size or larger than the original while a
    /// different size was requested on both axes.
    #[error("resize to {width}x{height} would not shrink the original")]
    UpscaleSuppressed { width: i32, height: i32 },
}

/// No valid [`ResizePlan`] exists for the request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[error("could not calculate resized image dimensions: {reason}")]
pub struct Unresolvable {
    pub reason: Reason,
}

impl From<Reason> for Unresolvable {
    fn from(reason: Reason) -> Self {
        Self { reason }
    }
}

/// Computed resize geometry, in the argument order of an area-resampling copy.
///
/// Offsets may be negative when an anchor places the source window outside
/// the original; consumers clip.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResizePlan {
    /// Horizontal offset of the drawn content within the destination canvas.
    pub dest_x: i32,
    /// Vertical offset of the drawn content within the destination canvas.
    pub dest_y: i32,
    /// Horizontal read offset within the source.
    pub src_x: i32,
    /// Vertical read offset within the source.
    pub src_y: i32,
    /// Width of the resampled output.
    pub dest_w: i32,
    /// Height of the resampled output.
    pub dest_h: i32,
    /// Width of the region read from the source.
    pub src_w: i32,
    /// Height of the region read from the source.
    pub src_h: i32,
}

impl ResizePlan {
    /// `(dest_x, dest_y, src_x, src_y, dest_w, dest_h, src_w, src_h)`.
    #[allow(clippy::type_complexity)]
    pub const fn as_tuple(&self) -> (i32, i32, i32, i32, i32, i32, i32, i32) {
        (
            self.dest_x,
            self.dest_y,
            self.src_x,
            self.src_y,
            self.dest_w,
            self.dest_h,
            self.src_w,
            self.src_h,
        )
    }

    /// Size of the area the source region is drawn into.
    ///
    /// The destination offset is applied symmetrically, so the drawn area
    /// shrinks by twice the offset on each axis.
    pub const fn draw_size(&self) -> (i32, i32) {
        (self.dest_w - 2 * self.dest_x, self.dest_h - 2 * self.dest_y)
    }

    /// Source region as `(x, y, width, height)`.
    pub const fn src_rect(&self) -> (i32, i32, i32, i32) {
        (self.src_x, self.src_y, self.src_w, self.src_h)
    }

    /// Destination draw region as `(x, y, width, height)`.
    pub const fn dest_rect(&self) -> (i32, i32, i32, i32) {
        let (w, h) = self.draw_size();
        (self.dest_x, self.dest_y, w, h)
    }

    /// Whether every size in the plan is positive.
    pub const fn is_non_empty(&self) -> bool {
        self.src_w > 0 && self.src_h > 0 && self.dest_w > 0 && self.dest_h > 0
    }
}

/// A resize request: target box plus mode flags.
///
/// A target dimension of 0 means "unspecified"; negative values are treated
/// the same way for sizing, but anchor offsets use them as given.
///
/// # Example
///
/// ```
/// use zenfit::{Anchor, ResizeRequest};
///
/// let plan = ResizeRequest::new(150, 150)
///     .crop(true)
///     .resolve(300, 300)
///     .unwrap();
/// assert_eq!(plan.as_tuple(), (0, 0, 0, 0, 150, 150, 300, 300));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ResizeRequest {
    pub width: i32,
    pub height: i32,
    pub crop: bool,
    pub anchor: Anchor,
    pub ignore_aspect_ratio: bool,
}

impl ResizeRequest {
    /// Bounding-box request for a `width × height` target.
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            crop: false,
            anchor: Anchor::None,
            ignore_aspect_ratio: false,
        }
    }

    /// Fill the target box, selecting a window of the source.
    pub const fn crop(mut self, crop: bool) -> Self {
        self.crop = crop;
        self
    }

    /// Place the source window by anchor.
    pub const fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Stretch to the exact target, ignoring aspect ratio. Overrides crop and
    /// anchor.
    pub const fn ignore_aspect_ratio(mut self, ignore: bool) -> Self {
        self.ignore_aspect_ratio = ignore;
        self
    }

    /// Resolve against an original of `orig_w × orig_h`.
    pub fn resolve(&self, orig_w: i32, orig_h: i32) -> Result<ResizePlan, Unresolvable> {
        resolve(
            orig_w,
            orig_h,
            self.width,
            self.height,
            self.crop,
            self.anchor,
            self.ignore_aspect_ratio,
        )
    }
}

/// Working values before the final truncation to integers.
struct Working {
    dest_x: f64,
    dest_y: f64,
    src_x: f64,
    src_y: f64,
    new_w: f64,
    new_h: f64,
    crop_w: f64,
    crop_h: f64,
}

/// Resolve resize geometry for an `orig_w × orig_h` original and a
/// `dest_w × dest_h` target.
///
/// Evaluation order:
/// 1. crop-fit or bounding-box fit establishes the working size and crop window,
/// 2. the anchor (if any) overrides the source offset,
/// 3. `ignore_aspect_ratio` overrides everything with an exact stretch,
/// 4. upscale suppression rejects same-or-larger results when a different size
///    was requested on both axes.
pub fn resolve(
    orig_w: i32,
    orig_h: i32,
    dest_w: i32,
    dest_h: i32,
    crop: bool,
    anchor: Anchor,
    ignore_aspect_ratio: bool,
) -> Result<ResizePlan, Unresolvable> {
    if orig_w <= 0 || orig_h <= 0 {
        return Err(Reason::NonPositiveSource {
            width: orig_w,
            height: orig_h,
        }
        .into());
    }
    // Anchors read the requested values as given; sizing treats negatives as 0.
    let (req_w, req_h) = (dest_w, dest_h);
    let dest_w = dest_w.max(0);
    let dest_h = dest_h.max(0);
    if dest_w == 0 && dest_h == 0 {
        return Err(Reason::MissingTarget.into());
    }

    let w = if ignore_aspect_ratio {
        stretch(orig_w, orig_h, dest_w, dest_h)
    } else {
        let mut w = if crop {
            crop_fit(orig_w, orig_h, dest_w, dest_h)?
        } else {
            bounding_box(orig_w, orig_h, dest_w, dest_h)
        };
        if anchor != Anchor::None {
            let (sx, sy) = anchor_offset(anchor, orig_w, orig_h, req_w, req_h);
            w.src_x = sx;
            w.src_y = sy;
        }
        w
    };

    // Compared against the requested target, which is 0 for an unspecified axis.
    if w.new_w >= f64::from(orig_w)
        && w.new_h >= f64::from(orig_h)
        && dest_w != orig_w
        && dest_h != orig_h
    {
        return Err(Reason::UpscaleSuppressed {
            width: w.new_w as i32,
            height: w.new_h as i32,
        }
        .into());
    }

    Ok(ResizePlan {
        dest_x: w.dest_x as i32,
        dest_y: w.dest_y as i32,
        src_x: w.src_x as i32,
        src_y: w.src_y as i32,
        dest_w: w.new_w as i32,
        dest_h: w.new_h as i32,
        src_w: w.crop_w as i32,
        src_h: w.crop_h as i32,
    })
}

/// Scale so the target box is covered, reading from the source origin.
///
/// When the crop window overflows the original, the destination offset
/// shifts the drawn content inward instead of moving the source window.
fn crop_fit(orig_w: i32, orig_h: i32, dest_w: i32, dest_h: i32) -> Result<Working, Unresolvable> {
    let ow = f64::from(orig_w);
    let oh = f64::from(orig_h);
    let fixed_box = dest_w > 0 && dest_h > 0;
    let aspect_ratio = ow / oh;

    let mut new_w = f64::from(if fixed_box { dest_w } else { dest_w.min(orig_w) });
    let mut new_h = f64::from(if fixed_box { dest_h } else { dest_h.min(orig_h) });
    if new_w == 0.0 {
        new_w = Float::trunc(new_h * aspect_ratio);
    }
    if new_h == 0.0 {
        new_h = Float::trunc(new_w / aspect_ratio);
    }
    if new_w <= 0.0 || new_h <= 0.0 {
        return Err(Reason::DegenerateCrop.into());
    }

    let ratio_w = new_w / ow;
    let ratio_h = new_h / oh;
    let size_ratio = ratio_w.min(ratio_h);

    let mut crop_w = Float::round(new_w / size_ratio);
    let mut crop_h = Float::round(new_h / size_ratio);

    let dest_x = if crop_w > ow {
        Float::floor((ow - crop_w) / 2.0 * size_ratio * -1.0)
    } else {
        0.0
    };
    let dest_y = if crop_h > oh {
        Float::floor((oh - crop_h) / 2.0 * size_ratio * -1.0)
    } else {
        0.0
    };

    if ratio_w > ratio_h {
        crop_w = crop_w.min(ow);
    }
    if ratio_w < ratio_h {
        crop_h = crop_h.min(oh);
    }

    Ok(Working {
        dest_x,
        dest_y,
        src_x: 0.0,
        src_y: 0.0,
        new_w,
        new_h,
        crop_w,
        crop_h,
    })
}

/// Fit the whole original inside the target box.
fn bounding_box(orig_w: i32, orig_h: i32, dest_w: i32, dest_h: i32) -> Working {
    let (new_w, new_h) = constrain_dimensions(orig_w, orig_h, dest_w, dest_h);
    Working {
        dest_x: 0.0,
        dest_y: 0.0,
        src_x: 0.0,
        src_y: 0.0,
        new_w: f64::from(new_w),
        new_h: f64::from(new_h),
        crop_w: f64::from(orig_w),
        crop_h: f64::from(orig_h),
    }
}

/// Stretch to the exact target: `ceil(orig * dest / orig)`, evaluated in
/// `i64` so the result is exact for every `i32` input.
fn stretch(orig_w: i32, orig_h: i32, dest_w: i32, dest_h: i32) -> Working {
    let new_w = ceil_scale(orig_w, dest_w) as f64;
    let new_h = ceil_scale(orig_h, dest_h) as f64;
    Working {
        dest_x: 0.0,
        dest_y: 0.0,
        src_x: 0.0,
        src_y: 0.0,
        new_w,
        new_h,
        crop_w: f64::from(orig_w),
        crop_h: f64::from(orig_h),
    }
}

/// `ceil(orig * dest / orig)` in integers. `orig > 0` and `dest >= 0`.
fn ceil_scale(orig: i32, dest: i32) -> i64 {
    let product = i64::from(orig) * i64::from(dest);
    let orig = i64::from(orig);
    (product + orig - 1) / orig
}

/// Source offset for an anchor, from the requested box and the original size.
fn anchor_offset(anchor: Anchor, orig_w: i32, orig_h: i32, dest_w: i32, dest_h: i32) -> (f64, f64) {
    let dx = f64::from(dest_w) - f64::from(orig_w);
    let dy = f64::from(dest_h) - f64::from(orig_h);
    let x = match anchor.horizontal() {
        Edge::Near => 0.0,
        Edge::Far => Float::round(dx),
        Edge::Middle => Float::round(dx / 2.0),
    };
    let y = match anchor.vertical() {
        Edge::Near => 0.0,
        Edge::Far => Float::round(dy),
        Edge::Middle => Float::round(dy / 2.0),
    };
    (x, y)
}

/// Constrain `cur_w × cur_h` within a `max_w × max_h` box, preserving aspect
/// ratio and never upscaling.
///
/// A non-positive max means that axis is unconstrained. Results are at least
/// 1×1. When rounding leaves a constrained axis one pixel short of its max, it
/// is bumped up to the max.
///
/// ```
/// use zenfit::constrain_dimensions;
///
/// assert_eq!(constrain_dimensions(800, 600, 400, 0), (400, 300));
/// assert_eq!(constrain_dimensions(465, 700, 177, 177), (118, 177));
/// assert_eq!(constrain_dimensions(100, 50, 400, 400), (100, 50));
/// ```
pub fn constrain_dimensions(cur_w: i32, cur_h: i32, max_w: i32, max_h: i32) -> (i32, i32) {
    if max_w <= 0 && max_h <= 0 {
        return (cur_w, cur_h);
    }

    let cw = f64::from(cur_w);
    let ch = f64::from(cur_h);
    let mut width_ratio = 1.0;
    let mut height_ratio = 1.0;
    let mut did_width = false;
    let mut did_height = false;

    if max_w > 0 && cur_w > 0 && cur_w > max_w {
        width_ratio = f64::from(max_w) / cw;
        did_width = true;
    }
    if max_h > 0 && cur_h > 0 && cur_h > max_h {
        height_ratio = f64::from(max_h) / ch;
        did_height = true;
    }

    let smaller_ratio = width_ratio.min(height_ratio);
    let larger_ratio = width_ratio.max(height_ratio);

    // The larger ratio is the snugger fit, unless it overflows either axis.
    let ratio = if Float::round(cw * larger_ratio) as i32 > max_w
        || Float::round(ch * larger_ratio) as i32 > max_h
    {
        smaller_ratio
    } else {
        larger_ratio
    };

    let mut w = (Float::round(cw * ratio) as i32).max(1);
    let mut h = (Float::round(ch * ratio) as i32).max(1);

    if did_width && w == max_w - 1 {
        w = max_w;
    }
    if did_height && h == max_h - 1 {
        h = max_h;
    }
    (w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(
        ow: i32,
        oh: i32,
        dw: i32,
        dh: i32,
        crop: bool,
        anchor: Anchor,
        iar: bool,
    ) -> (i32, i32, i32, i32, i32, i32, i32, i32) {
        resolve(ow, oh, dw, dh, crop, anchor, iar)
            .unwrap_or_else(|e| panic!("{ow}x{oh} -> {dw}x{dh}: {e}"))
            .as_tuple()
    }

    fn reason(ow: i32, oh: i32, dw: i32, dh: i32, crop: bool, anchor: Anchor, iar: bool) -> Reason {
        resolve(ow, oh, dw, dh, crop, anchor, iar)
            .expect_err("expected rejection")
            .reason
    }

    // ── Input validation ────────────────────────────────────────────────

    #[test]
    fn rejects_non_positive_source() {
        assert_eq!(
            reason(0, 100, 50, 50, false, Anchor::None, false),
            Reason::NonPositiveSource {
                width: 0,
                height: 100
            }
        );
        assert!(matches!(
            reason(100, -1, 50, 50, true, Anchor::None, false),
            Reason::NonPositiveSource { .. }
        ));
    }

    #[test]
    fn rejects_missing_target() {
        assert_eq!(
            reason(100, 100, 0, 0, false, Anchor::None, false),
            Reason::MissingTarget
        );
        assert_eq!(
            reason(100, 100, -5, 0, true, Anchor::Center, true),
            Reason::MissingTarget
        );
    }

    #[test]
    fn negative_target_is_unspecified() {
        assert_eq!(
            plan(800, 600, 400, -10, false, Anchor::None, false),
            plan(800, 600, 400, 0, false, Anchor::None, false)
        );
    }

    #[test]
    fn anchor_reads_negative_target_as_given() {
        let p = resolve(800, 600, 400, -10, false, Anchor::Bottom, false).unwrap();
        assert_eq!((p.src_x, p.src_y), (-200, -610));
        assert_eq!((p.dest_w, p.dest_h), (400, 300));
    }

    // ── Bounding-box mode ───────────────────────────────────────────────

    #[test]
    fn bounding_box_width_only() {
        assert_eq!(
            plan(800, 600, 400, 0, false, Anchor::None, false),
            (0, 0, 0, 0, 400, 300, 800, 600)
        );
    }

    #[test]
    fn bounding_box_height_only() {
        assert_eq!(
            plan(800, 600, 0, 150, false, Anchor::None, false),
            (0, 0, 0, 0, 200, 150, 800, 600)
        );
    }

    #[test]
    fn bounding_box_both_landscape() {
        // 1000×500 into 400×300 → width constrains → 400×200
        assert_eq!(
            plan(1000, 500, 400, 300, false, Anchor::None, false),
            (0, 0, 0, 0, 400, 200, 1000, 500)
        );
    }

    #[test]
    fn bounding_box_both_portrait() {
        // 500×1000 into 400×300 → height constrains → 150×300
        assert_eq!(
            plan(500, 1000, 400, 300, false, Anchor::None, false),
            (0, 0, 0, 0, 150, 300, 500, 1000)
        );
    }

    #[test]
    fn bounding_box_never_exceeds_target_and_keeps_aspect() {
        for &(ow, oh) in &[(1000, 500), (640, 480), (333, 777), (1920, 1080), (7, 1000)] {
            for &(dw, dh) in &[(100, 100), (150, 90), (64, 256), (300, 299)] {
                let Ok(p) = resolve(ow, oh, dw, dh, false, Anchor::None, false) else {
                    continue;
                };
                assert!(p.dest_w <= dw && p.dest_h <= dh, "{ow}x{oh} in {dw}x{dh}: {p:?}");
                // Aspect within one unit of rounding on the derived axis.
                let expect_h = f64::from(p.dest_w) * f64::from(oh) / f64::from(ow);
                let expect_w = f64::from(p.dest_h) * f64::from(ow) / f64::from(oh);
                assert!(
                    (expect_h - f64::from(p.dest_h)).abs() <= 1.0
                        || (expect_w - f64::from(p.dest_w)).abs() <= 1.0,
                    "{ow}x{oh} in {dw}x{dh}: {p:?}"
                );
            }
        }
    }

    #[test]
    fn bounding_box_smaller_source_is_suppressed() {
        assert_eq!(
            reason(100, 100, 200, 200, false, Anchor::None, false),
            Reason::UpscaleSuppressed {
                width: 100,
                height: 100
            }
        );
    }

    #[test]
    fn bounding_box_same_size_on_one_axis_passes_guard() {
        // Width matches the original, so the guard does not trip.
        assert_eq!(
            plan(100, 100, 100, 200, false, Anchor::None, false),
            (0, 0, 0, 0, 100, 100, 100, 100)
        );
    }

    #[test]
    fn single_axis_guard_compares_against_zero() {
        // 100×100 with only w=300: result is 100×100, h=0 != 100 → rejected.
        assert!(matches!(
            reason(100, 100, 300, 0, false, Anchor::None, false),
            Reason::UpscaleSuppressed { .. }
        ));
    }

    // ── constrain_dimensions ────────────────────────────────────────────

    #[test]
    fn constrain_unconstrained_returns_current() {
        assert_eq!(constrain_dimensions(640, 480, 0, 0), (640, 480));
    }

    #[test]
    fn constrain_height_ratio_wins() {
        // 465×700 in 177×177: width 117.58 → 118, height 177 exactly.
        assert_eq!(constrain_dimensions(465, 700, 177, 177), (118, 177));
    }

    #[test]
    fn constrain_one_pixel_shy_is_bumped() {
        // 114×113 in 100×100 rounds to 100×99; height was constrained, so 99
        // becomes 100.
        assert_eq!(constrain_dimensions(114, 113, 100, 100), (100, 100));
        assert_eq!(constrain_dimensions(163, 165, 100, 100), (100, 100));
    }

    #[test]
    fn constrain_minimum_one_pixel() {
        assert_eq!(constrain_dimensions(10000, 10, 100, 0), (100, 1));
    }

    #[test]
    fn constrain_never_upscales() {
        assert_eq!(constrain_dimensions(50, 40, 500, 400), (50, 40));
    }

    // ── Crop mode ───────────────────────────────────────────────────────

    #[test]
    fn crop_square_into_square() {
        assert_eq!(
            plan(100, 100, 50, 50, true, Anchor::None, false),
            (0, 0, 0, 0, 50, 50, 100, 100)
        );
    }

    #[test]
    fn crop_wide_source_into_narrower_box() {
        // 1000×500 → 400×300: size ratio 0.4, crop window 1000×750 overflows
        // the original height, so the content shifts down by 50 and the
        // window is clamped to 500.
        assert_eq!(
            plan(1000, 500, 400, 300, true, Anchor::None, false),
            (0, 50, 0, 0, 400, 300, 1000, 500)
        );
    }

    #[test]
    fn crop_tall_source_into_wider_box() {
        // 500×1000 → 300×400: size ratio 0.4, window 750×1000, shift right 50.
        assert_eq!(
            plan(500, 1000, 300, 400, true, Anchor::None, false),
            (50, 0, 0, 0, 300, 400, 500, 1000)
        );
    }

    #[test]
    fn crop_wider_box_than_source() {
        // 100×100 → 200×100: window 200×100, offset 50, clamped back to 100.
        assert_eq!(
            plan(100, 100, 200, 100, true, Anchor::None, false),
            (50, 0, 0, 0, 200, 100, 100, 100)
        );
    }

    #[test]
    fn crop_source_offset_is_origin_not_center() {
        let p = resolve(1600, 900, 300, 300, true, Anchor::None, false).unwrap();
        assert_eq!((p.src_x, p.src_y), (0, 0));
    }

    #[test]
    fn crop_width_only_derives_height() {
        // 800×600 → w=400 only: height derived 300, no crop window change.
        assert_eq!(
            plan(800, 600, 400, 0, true, Anchor::None, false),
            (0, 0, 0, 0, 400, 300, 800, 600)
        );
    }

    #[test]
    fn crop_height_only_derives_width() {
        assert_eq!(
            plan(800, 400, 0, 200, true, Anchor::None, false),
            (0, 0, 0, 0, 400, 200, 800, 400)
        );
    }

    #[test]
    fn crop_degenerate_axis_is_rejected() {
        // 1×1000 with h=10: width derives to trunc(0.01) = 0.
        assert_eq!(
            reason(1, 1000, 0, 10, true, Anchor::None, false),
            Reason::DegenerateCrop
        );
    }

    #[test]
    fn crop_single_axis_larger_than_source_is_suppressed() {
        // w is clamped to the original, so the result equals the original.
        assert!(matches!(
            reason(200, 100, 500, 0, true, Anchor::None, false),
            Reason::UpscaleSuppressed { .. }
        ));
    }

    // ── Anchors ─────────────────────────────────────────────────────────

    #[test]
    fn anchor_right_and_left() {
        let right = plan(100, 100, 200, 100, true, Anchor::Right, false);
        assert_eq!(right, (50, 0, 100, 0, 200, 100, 100, 100));
        let left = plan(100, 100, 200, 100, true, Anchor::Left, false);
        assert_eq!(left.2, 0);
    }

    #[test]
    fn anchor_corners_set_both_components() {
        let p = resolve(1000, 500, 400, 300, true, Anchor::BottomRight, false).unwrap();
        assert_eq!((p.src_x, p.src_y), (-600, -200));
        let p = resolve(1000, 500, 400, 300, true, Anchor::TopLeft, false).unwrap();
        assert_eq!((p.src_x, p.src_y), (0, 0));
        let p = resolve(1000, 500, 400, 300, true, Anchor::TopRight, false).unwrap();
        assert_eq!((p.src_x, p.src_y), (-600, 0));
        let p = resolve(1000, 500, 400, 300, true, Anchor::BottomLeft, false).unwrap();
        assert_eq!((p.src_x, p.src_y), (0, -200));
    }

    #[test]
    fn anchor_edges_center_the_other_axis() {
        // (400-1000)/2 = -300, (300-500)/2 = -100
        let p = resolve(1000, 500, 400, 300, true, Anchor::Top, false).unwrap();
        assert_eq!((p.src_x, p.src_y), (-300, 0));
        let p = resolve(1000, 500, 400, 300, true, Anchor::Bottom, false).unwrap();
        assert_eq!((p.src_x, p.src_y), (-300, -200));
        let p = resolve(1000, 500, 400, 300, true, Anchor::Left, false).unwrap();
        assert_eq!((p.src_x, p.src_y), (0, -100));
    }

    #[test]
    fn anchor_center_rounds_half_away_from_zero() {
        // (400-1001)/2 = -300.5 → -301
        let p = resolve(1001, 500, 400, 300, true, Anchor::Center, false).unwrap();
        assert_eq!(p.src_x, -301);
    }

    #[test]
    fn anchor_applies_in_bounding_box_mode() {
        // Requested box is used for the anchor, not the fitted size.
        let p = resolve(1000, 500, 400, 300, false, Anchor::Center, false).unwrap();
        assert_eq!(p.as_tuple(), (0, 0, -300, -100, 400, 200, 1000, 500));
    }

    #[test]
    fn anchor_with_unspecified_axis_uses_zero() {
        let p = resolve(800, 600, 400, 0, false, Anchor::Bottom, false).unwrap();
        assert_eq!((p.src_x, p.src_y), (-200, -600));
    }

    // ── Ignore aspect ratio ─────────────────────────────────────────────

    #[test]
    fn stretch_exact_target() {
        assert_eq!(
            plan(1000, 500, 300, 300, false, Anchor::None, true),
            (0, 0, 0, 0, 300, 300, 1000, 500)
        );
    }

    #[test]
    fn stretch_overrides_crop_and_anchor() {
        assert_eq!(
            plan(1000, 500, 300, 300, true, Anchor::BottomRight, true),
            (0, 0, 0, 0, 300, 300, 1000, 500)
        );
    }

    #[test]
    fn stretch_larger_than_source_is_suppressed() {
        assert_eq!(
            reason(100, 100, 200, 150, false, Anchor::None, true),
            Reason::UpscaleSuppressed {
                width: 200,
                height: 150
            }
        );
    }

    #[test]
    fn stretch_one_axis_larger_passes() {
        assert_eq!(
            plan(100, 100, 200, 50, false, Anchor::None, true),
            (0, 0, 0, 0, 200, 50, 100, 100)
        );
    }

    #[test]
    fn stretch_zero_axis_yields_zero_size() {
        let p = resolve(100, 100, 50, 0, false, Anchor::None, true).unwrap();
        assert_eq!((p.dest_w, p.dest_h), (50, 0));
        assert!(!p.is_non_empty());
    }

    #[test]
    fn stretch_requested_size_is_exact_across_grid() {
        for ow in [3, 17, 640, 999] {
            for oh in [5, 480, 1001] {
                for (dw, dh) in [(1, 1), (2, 3), (320, 2), (1, 479)] {
                    let p = resolve(ow, oh, dw, dh, false, Anchor::None, true).unwrap();
                    assert_eq!((p.dest_w, p.dest_h), (dw, dh), "{ow}x{oh} -> {dw}x{dh}");
                    assert_eq!((p.src_w, p.src_h), (ow, oh));
                    assert_eq!((p.src_x, p.src_y, p.dest_x, p.dest_y), (0, 0, 0, 0));
                }
            }
        }

        // Products past 2^53 must not round up through f64.
        for (ow, dw) in [
            (622_301_270, 1_989_657_837),
            (i32::MAX, i32::MAX - 1),
            (999_999_937, 2_000_000_011),
        ] {
            let p = resolve(ow, 1, dw, 1, false, Anchor::None, true).unwrap();
            assert_eq!(p.dest_w, dw, "{ow} -> {dw}");
            let p = resolve(1, ow, 1, dw, false, Anchor::None, true).unwrap();
            assert_eq!(p.dest_h, dw, "{ow} -> {dw}");
        }
    }

    // ── Anchor parsing ──────────────────────────────────────────────────

    #[test]
    fn anchor_codes_and_names() {
        assert_eq!(Anchor::from_code("TL"), Some(Anchor::TopLeft));
        assert_eq!(Anchor::from_code("br"), Some(Anchor::BottomRight));
        assert_eq!(Anchor::from_code("Top-Right"), Some(Anchor::TopRight));
        assert_eq!(Anchor::from_code("bottom_left"), Some(Anchor::BottomLeft));
        assert_eq!(Anchor::from_code("C"), Some(Anchor::Center));
        assert_eq!(Anchor::from_code(""), Some(Anchor::None));
        assert_eq!(Anchor::from_code("diagonal"), None);
        assert_eq!("r".parse::<Anchor>(), Ok(Anchor::Right));
        assert_eq!("nope".parse::<Anchor>(), Err(UnknownAnchor));
    }

    #[test]
    fn anchor_code_round_trips() {
        for a in [
            Anchor::Left,
            Anchor::Right,
            Anchor::Top,
            Anchor::Bottom,
            Anchor::TopLeft,
            Anchor::TopRight,
            Anchor::BottomLeft,
            Anchor::BottomRight,
            Anchor::Center,
        ] {
            assert_eq!(a.code().and_then(Anchor::from_code), Some(a));
        }
        assert_eq!(Anchor::None.code(), None);
    }

    // ── Plan helpers ────────────────────────────────────────────────────

    #[test]
    fn draw_size_subtracts_both_sides() {
        let p = resolve(1000, 500, 400, 300, true, Anchor::None, false).unwrap();
        assert_eq!(p.draw_size(), (400, 200));
        assert_eq!(p.dest_rect(), (0, 50, 400, 200));
        assert_eq!(p.src_rect(), (0, 0, 1000, 500));
    }

    #[test]
    fn request_builder_matches_free_function() {
        let req = ResizeRequest::new(400, 300)
            .crop(true)
            .anchor(Anchor::Center)
            .ignore_aspect_ratio(false);
        assert_eq!(
            req.resolve(1000, 500),
            resolve(1000, 500, 400, 300, true, Anchor::Center, false)
        );
    }

    #[test]
    fn error_messages() {
        let e = resolve(100, 100, 0, 0, false, Anchor::None, false).unwrap_err();
        assert_eq!(
            e.to_string(),
            "could not calculate resized image dimensions: at least one target dimension must be positive"
        );
    }
}
