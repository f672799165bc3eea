//! Parsed representation of a request string.

use crate::canvas::Background;
use crate::resolve::{Anchor, ResizeRequest};

/// Parsed resize instructions.
///
/// Produced by [`crate::query::parse()`], consumed by
/// [`to_request()`](Self::to_request).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct Instructions {
    /// Target width (`w`, `width`).
    pub w: Option<i32>,
    /// Target height (`h`, `height`).
    pub h: Option<i32>,
    /// Crop-fit instead of bounding-box fit (`crop`).
    pub crop: Option<bool>,
    /// Source window anchor (`anchor`, `far`).
    pub anchor: Option<Anchor>,
    /// Stretch to the exact target (`iar`, `ignoreaspect`, `stretch=fill`).
    pub ignore_aspect_ratio: Option<bool>,
    /// Canvas background (`bgcolor`, `bg`).
    pub bgcolor: Option<Background>,
}

impl Instructions {
    /// Create empty instructions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the resize request. Missing dimensions are unspecified (0).
    pub fn to_request(&self) -> ResizeRequest {
        ResizeRequest::new(self.w.unwrap_or(0), self.h.unwrap_or(0))
            .crop(self.crop.unwrap_or(false))
            .anchor(self.anchor.unwrap_or(Anchor::None))
            .ignore_aspect_ratio(self.ignore_aspect_ratio.unwrap_or(false))
    }

    /// Background color, white when not given.
    pub fn background(&self) -> Background {
        self.bgcolor.unwrap_or_default()
    }
}
