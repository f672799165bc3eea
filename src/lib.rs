//! Resize dimension resolution for thumbnailing and fitting images into boxes.
//!
//! Given original and requested dimensions, [`resolve`] computes where the
//! resized content lands on the destination canvas and which window of the
//! source it is sampled from. Crop-fit, bounding-box fit, exact stretch,
//! anchors and upscale suppression are all handled in integer pixels.
//!
//! The core is pure geometry and `no_std` compatible. Optional layers add a
//! request-string parser and an executor that performs the pixel work.
//!
//! # Modules
//!
//! - [`resolve`]: the resolver, [`ResizeRequest`] builder and [`constrain_dimensions`]
//! - [`canvas`]: background color of the destination canvas
//! - `query` (feature `query`): `w=…&h=…&crop=…&anchor=…` request strings
//! - `execute` (feature `execute`): resampling into a canvas with `image` and
//!   `fast_image_resize`
//!
//! # Example
//!
//! ```
//! use zenfit::{Anchor, ResizeRequest};
//!
//! let plan = ResizeRequest::new(400, 300)
//!     .crop(true)
//!     .anchor(Anchor::BottomRight)
//!     .resolve(1000, 500)
//!     .unwrap();
//! assert_eq!(plan.as_tuple(), (0, 50, -600, -200, 400, 300, 1000, 500));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod canvas;
pub mod resolve;

#[cfg(feature = "query")]
pub mod query;

#[cfg(feature = "execute")]
pub mod execute;

pub use canvas::Background;
pub use resolve::{
    Anchor, Reason, ResizePlan, ResizeRequest, UnknownAnchor, Unresolvable, constrain_dimensions,
    resolve,
};
