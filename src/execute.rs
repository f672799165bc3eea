//! Resize execution over decoded images.
//!
//! Resolves a [`ResizeRequest`] against a decoded image, then performs the
//! raster work the plan describes: a background-filled canvas, an
//! area-averaging resample of the source window, and an optional conversion
//! back to indexed color for palette sources.
//!
//! # Example
//!
//! ```
//! use image::{DynamicImage, Rgba, RgbaImage};
//! use zenfit::{Background, ResizeRequest};
//! use zenfit::execute::{self, ResizeSource};
//!
//! let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(80, 60, Rgba([0, 0, 255, 255])));
//! let out = execute::resize(
//!     &ResizeSource::new(&img, "photo.png"),
//!     &ResizeRequest::new(40, 0),
//!     Some(Background::BLACK),
//! )
//! .unwrap();
//! assert_eq!(out.dimensions(), (40, 30));
//! ```

use std::collections::HashMap;
use std::collections::HashSet;

use fast_image_resize as fr;
use fr::images::Image;
use image::imageops::{self, ColorMap};
use image::{DynamicImage, GenericImageView, GrayImage, ImageFormat, Rgba, RgbaImage};
use log::{debug, warn};

use crate::canvas::Background;
use crate::resolve::{ResizePlan, ResizeRequest, Unresolvable};

/// Largest palette an indexed image can carry.
const MAX_PALETTE: usize = 256;

/// Largest canvas allocated, in pixels (1 GiB of RGBA).
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;

/// Execution error.
#[derive(Debug, thiserror::Error)]
pub enum ResizeError {
    /// The resolver rejected the request.
    #[error("{source} ({file})")]
    Dimensions {
        #[source]
        source: Unresolvable,
        /// Name of the resource being resized.
        file: String,
    },
    /// The plan leaves the destination canvas without area.
    #[error("image resize failed: empty {width}x{height} canvas ({file})")]
    EmptyCanvas { width: i32, height: i32, file: String },
    #[error("image resize failed: {0}")]
    Resample(#[from] fr::ResizeError),
    #[error("image resize failed: {0}")]
    Buffer(#[from] fr::ImageBufferError),
    /// The canvas or draw area exceeds [`MAX_CANVAS_PIXELS`].
    #[error("image resize failed: {width}x{height} exceeds the canvas size limit ({file})")]
    CanvasTooLarge { width: u32, height: u32, file: String },
    /// Resampled pixels didn't fit the expected buffer size.
    #[error("image resize failed: output buffer does not match {width}x{height}")]
    Canvas { width: u32, height: u32 },
}

/// A decoded image to resize, with the identity used in diagnostics.
#[derive(Copy, Clone, Debug)]
pub struct ResizeSource<'a> {
    pub image: &'a DynamicImage,
    /// Resource name (typically a file path) reported in errors.
    pub name: &'a str,
    /// Encoded format of the source, if known.
    pub format: Option<ImageFormat>,
    /// Whether the source was stored with an indexed palette.
    pub indexed: bool,
}

impl<'a> ResizeSource<'a> {
    pub fn new(image: &'a DynamicImage, name: &'a str) -> Self {
        Self {
            image,
            name,
            format: None,
            indexed: false,
        }
    }

    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Mark the source as palette-indexed.
    pub fn indexed(mut self, indexed: bool) -> Self {
        self.indexed = indexed;
        self
    }

    /// Indexed PNGs are converted back to a palette after resizing.
    fn wants_palette(&self) -> bool {
        self.indexed && self.format == Some(ImageFormat::Png)
    }
}

/// Palette image: one index per pixel into `palette`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedImage {
    pub indices: GrayImage,
    pub palette: Vec<Rgba<u8>>,
}

impl IndexedImage {
    /// Expand to RGBA.
    pub fn to_rgba(&self) -> RgbaImage {
        let (w, h) = self.indices.dimensions();
        RgbaImage::from_fn(w, h, |x, y| {
            let idx = self.indices.get_pixel(x, y).0[0] as usize;
            self.palette.get(idx).copied().unwrap_or(Rgba([0, 0, 0, 0]))
        })
    }
}

/// Output pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pixels {
    TrueColor(RgbaImage),
    Indexed(IndexedImage),
}

/// A finished resize.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resized {
    /// The plan that was executed.
    pub plan: ResizePlan,
    pub pixels: Pixels,
}

impl Resized {
    /// Final canvas dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        match &self.pixels {
            Pixels::TrueColor(img) => img.dimensions(),
            Pixels::Indexed(img) => img.indices.dimensions(),
        }
    }

    /// Output as RGBA, expanding a palette if needed.
    pub fn to_rgba(&self) -> RgbaImage {
        match &self.pixels {
            Pixels::TrueColor(img) => img.clone(),
            Pixels::Indexed(img) => img.to_rgba(),
        }
    }
}

/// Resize `source` per `request`.
///
/// The canvas is the requested box; an unspecified axis takes the plan's
/// size. It is filled with `background` (white when `None`) at half alpha,
/// then the plan's source window is resampled into its destination area and
/// composited on top.
pub fn resize(
    source: &ResizeSource<'_>,
    request: &ResizeRequest,
    background: Option<Background>,
) -> Result<Resized, ResizeError> {
    let (img_w, img_h) = source.image.dimensions();
    let orig_w = i32::try_from(img_w).unwrap_or(i32::MAX);
    let orig_h = i32::try_from(img_h).unwrap_or(i32::MAX);

    let plan = request.resolve(orig_w, orig_h).map_err(|e| {
        warn!("{}: {}", source.name, e);
        ResizeError::Dimensions {
            source: e,
            file: source.name.to_owned(),
        }
    })?;
    debug!("{}: {img_w}x{img_h} -> {:?}", source.name, plan);

    let canvas_w = if request.width > 0 { request.width } else { plan.dest_w };
    let canvas_h = if request.height > 0 { request.height } else { plan.dest_h };
    if canvas_w <= 0 || canvas_h <= 0 {
        return Err(ResizeError::EmptyCanvas {
            width: canvas_w,
            height: canvas_h,
            file: source.name.to_owned(),
        });
    }
    let (canvas_w, canvas_h) = (canvas_w as u32, canvas_h as u32);
    check_area(canvas_w, canvas_h, source.name)?;

    let fill = Rgba(background.unwrap_or_default().fill_rgba());
    let mut canvas = RgbaImage::from_pixel(canvas_w, canvas_h, fill);
    debug!("{}: canvas {canvas_w}x{canvas_h}", source.name);

    match clip_blit(&plan, img_w, img_h) {
        Some(blit) => {
            check_area(blit.dest_w, blit.dest_h, source.name)?;
            let drawn = resample(source.image, &blit)?;
            imageops::overlay(&mut canvas, &drawn, blit.dest_x, blit.dest_y);
        }
        None => warn!(
            "{}: source window {:?} does not intersect the image, nothing drawn",
            source.name,
            plan.src_rect()
        ),
    }

    let pixels = if source.wants_palette() {
        let colors = count_colors(source.image);
        debug!("{}: restoring {colors}-color palette", source.name);
        Pixels::Indexed(to_palette(&canvas, colors))
    } else {
        Pixels::TrueColor(canvas)
    };

    Ok(Resized { plan, pixels })
}

fn check_area(width: u32, height: u32, file: &str) -> Result<(), ResizeError> {
    if u64::from(width) * u64::from(height) > MAX_CANVAS_PIXELS {
        warn!("{file}: refusing {width}x{height} allocation");
        return Err(ResizeError::CanvasTooLarge {
            width,
            height,
            file: file.to_owned(),
        });
    }
    Ok(())
}

/// Source window and destination area after clipping to the image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Blit {
    src_x: u32,
    src_y: u32,
    src_w: u32,
    src_h: u32,
    dest_x: i64,
    dest_y: i64,
    dest_w: u32,
    dest_h: u32,
}

/// Clip the plan's source window to the image, shrinking the destination area
/// by the same proportion so the visible part keeps its placement.
fn clip_blit(plan: &ResizePlan, img_w: u32, img_h: u32) -> Option<Blit> {
    let (sx, sy, sw, sh) = plan.src_rect();
    let (dx, dy, dw, dh) = plan.dest_rect();
    if sw <= 0 || sh <= 0 || dw <= 0 || dh <= 0 {
        return None;
    }

    let (x0, x1) = clip_span(sx, sw, img_w)?;
    let (y0, y1) = clip_span(sy, sh, img_h)?;
    let (dest_x, dest_w) = map_span(dx, dw, sx, sw, x0, x1)?;
    let (dest_y, dest_h) = map_span(dy, dh, sy, sh, y0, y1)?;

    Some(Blit {
        src_x: x0 as u32,
        src_y: y0 as u32,
        src_w: (x1 - x0) as u32,
        src_h: (y1 - y0) as u32,
        dest_x,
        dest_y,
        dest_w,
        dest_h,
    })
}

/// `[start, start + len)` intersected with `[0, limit)`.
fn clip_span(start: i32, len: i32, limit: u32) -> Option<(i64, i64)> {
    let s = i64::from(start).max(0);
    let e = (i64::from(start) + i64::from(len)).min(i64::from(limit));
    (e > s).then_some((s, e))
}

/// Map a clipped source span onto the destination span it scales into.
fn map_span(
    dest: i32,
    dest_len: i32,
    src: i32,
    src_len: i32,
    lo: i64,
    hi: i64,
) -> Option<(i64, u32)> {
    let scale = f64::from(dest_len) / f64::from(src_len);
    let start = (f64::from(dest) + (lo - i64::from(src)) as f64 * scale).round();
    let end = (f64::from(dest) + (hi - i64::from(src)) as f64 * scale).round();
    let len = end - start;
    (len >= 1.0).then_some((start as i64, len as u32))
}

/// Area-averaging resample of the blit's source window.
fn resample(image: &DynamicImage, blit: &Blit) -> Result<RgbaImage, ResizeError> {
    let (w, h) = image.dimensions();
    let src = Image::from_vec_u8(w, h, image.to_rgba8().into_raw(), fr::PixelType::U8x4)?;
    let mut dst = Image::new(blit.dest_w, blit.dest_h, fr::PixelType::U8x4);

    let options = fr::ResizeOptions::new()
        .resize_alg(fr::ResizeAlg::Convolution(fr::FilterType::Box))
        .crop(
            f64::from(blit.src_x),
            f64::from(blit.src_y),
            f64::from(blit.src_w),
            f64::from(blit.src_h),
        );
    fr::Resizer::new().resize(&src, &mut dst, &options)?;

    RgbaImage::from_raw(blit.dest_w, blit.dest_h, dst.into_vec()).ok_or(ResizeError::Canvas {
        width: blit.dest_w,
        height: blit.dest_h,
    })
}

/// Number of distinct colors in an image, capped at the palette limit.
fn count_colors(image: &DynamicImage) -> usize {
    let mut seen = HashSet::new();
    for (_, _, px) in image.pixels() {
        seen.insert(px.0);
        if seen.len() == MAX_PALETTE {
            break;
        }
    }
    seen.len().max(1)
}

/// Fixed palette with nearest-color lookup.
struct Palette(Vec<Rgba<u8>>);

impl Palette {
    /// The `colors` most frequent colors of `image` (popularity quantizer).
    fn popular(image: &RgbaImage, colors: usize) -> Self {
        let mut counts: HashMap<[u8; 4], usize> = HashMap::new();
        for px in image.pixels() {
            *counts.entry(px.0).or_default() += 1;
        }
        let mut ranked: Vec<([u8; 4], usize)> = counts.into_iter().collect();
        // Ties break on the color value so the palette is deterministic.
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(colors.clamp(1, MAX_PALETTE));
        Self(ranked.into_iter().map(|(c, _)| Rgba(c)).collect())
    }
}

impl ColorMap for Palette {
    type Color = Rgba<u8>;

    fn index_of(&self, color: &Rgba<u8>) -> usize {
        let mut best = 0;
        let mut best_dist = u32::MAX;
        for (i, p) in self.0.iter().enumerate() {
            let dist: u32 = p
                .0
                .iter()
                .zip(color.0.iter())
                .map(|(&a, &b)| {
                    let d = u32::from(a.abs_diff(b));
                    d * d
                })
                .sum();
            if dist < best_dist {
                best = i;
                best_dist = dist;
                if dist == 0 {
                    break;
                }
            }
        }
        best
    }

    fn lookup(&self, index: usize) -> Option<Rgba<u8>> {
        self.0.get(index).copied()
    }

    fn has_lookup(&self) -> bool {
        true
    }

    fn map_color(&self, color: &mut Rgba<u8>) {
        if let Some(c) = self.lookup(self.index_of(color)) {
            *color = c;
        }
    }
}

/// Convert to an indexed image with at most `colors` palette entries, without
/// dithering.
fn to_palette(image: &RgbaImage, colors: usize) -> IndexedImage {
    let palette = Palette::popular(image, colors);
    let indices = imageops::index_colors(image, &palette);
    IndexedImage {
        indices,
        palette: palette.0,
    }
}
