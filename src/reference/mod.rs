//! Visual crops and reference-image preparation.
//!
//! The reference is what the model matches against: the visual-crop box cut
//! from its frame with some surrounding context, padded to a square and
//! resized to a fixed side length.

use crate::candidate::bbox::BBox;
use crate::image::{conform_size, FrameSource};
use crate::trace::{trace_span, trace_warn};
use crate::util::{VqError, VqResult};
use image::RgbImage;
use std::borrow::Cow;

mod context;

pub use context::extract_window_with_context;

/// The query object: a box in one frame of the clip.
///
/// `original_width`/`original_height` are the frame dimensions the box was
/// annotated against; decoded frames of another size are resized to them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisualCrop {
    pub frame_number: usize,
    pub original_width: u32,
    pub original_height: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl VisualCrop {
    /// Checks for zero frame dimensions and empty boxes.
    pub fn validate(&self) -> VqResult<()> {
        if self.original_width == 0 || self.original_height == 0 {
            return Err(VqError::InvalidDimensions {
                width: self.original_width as usize,
                height: self.original_height as usize,
            });
        }
        if self.width == 0 || self.height == 0 {
            let bbox = self.bbox();
            return Err(VqError::DegenerateBox {
                x1: bbox.x1,
                y1: bbox.y1,
                x2: bbox.x2,
                y2: bbox.y2,
            });
        }
        Ok(())
    }

    /// Returns the crop as an absolute `(x1, y1, x2, y2)` box.
    pub fn bbox(&self) -> BBox {
        let x = i64::from(self.x);
        let y = i64::from(self.y);
        BBox::new(
            self.frame_number,
            x,
            y,
            x + i64::from(self.width),
            y + i64::from(self.height),
        )
    }

    /// Returns the annotated frame size as `(width, height)`.
    pub fn original_size(&self) -> (u32, u32) {
        (self.original_width, self.original_height)
    }
}

/// Parameters of the reference crop, normally tied to the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferenceConfig {
    /// Context in pixels added on every side of the crop box.
    pub context_pad: u32,
    /// Side length of the square reference image.
    pub size: u32,
    /// Fill value for the square padding.
    pub pad_value: u8,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            context_pad: 16,
            size: 256,
            pad_value: 125,
        }
    }
}

/// Fixed-size square RGB crop of the visual-crop frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceImage {
    img: RgbImage,
}

impl ReferenceImage {
    /// Returns the reference pixels.
    pub fn image(&self) -> &RgbImage {
        &self.img
    }

    /// Returns the side length in pixels.
    pub fn size(&self) -> u32 {
        self.img.width()
    }

    /// Consumes the reference and returns its pixels.
    pub fn into_image(self) -> RgbImage {
        self.img
    }
}

/// Reads the visual-crop frame and builds the reference image.
pub fn prepare_reference<S>(
    source: &mut S,
    crop: &VisualCrop,
    cfg: &ReferenceConfig,
) -> VqResult<ReferenceImage>
where
    S: FrameSource + ?Sized,
{
    crop.validate()?;
    let _span = trace_span!("prepare_reference", frame = crop.frame_number).entered();

    let frame = source.frame(crop.frame_number)?;
    let frame = conform_size(&frame, crop.original_width, crop.original_height)?;
    if matches!(frame, Cow::Owned(_)) {
        trace_warn!(
            "reference_size_mismatch",
            frame = crop.frame_number,
            width = crop.original_width,
            height = crop.original_height
        );
    }

    let bbox = crop.bbox();
    let img = extract_window_with_context(
        &frame,
        (bbox.x1, bbox.y1, bbox.x2, bbox.y2),
        cfg.context_pad,
        cfg.size,
        cfg.pad_value,
    )?;
    Ok(ReferenceImage { img })
}
