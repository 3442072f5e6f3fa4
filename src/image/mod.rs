//! Frame access and resizing.
//!
//! Frames are packed RGB images (`image::RgbImage`, row-major, 3 channels).
//! A [`FrameSource`] gives random access to the decoded frames of one clip by
//! absolute frame index.

use crate::util::math::scaled_len;
use crate::util::{VqError, VqResult};
use image::imageops::{self, FilterType};
use image::RgbImage;
use std::borrow::Cow;

#[cfg(feature = "image-io")]
pub mod io;

/// Filter used for every resize: bilinear, antialiased when downscaling.
pub(crate) const RESIZE_FILTER: FilterType = FilterType::Triangle;

/// Random-access source of decoded RGB frames.
pub trait FrameSource {
    /// Returns the number of frames in the clip.
    fn len(&self) -> usize;

    /// Returns true if the clip has no frames.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decodes the frame at `index`.
    fn frame(&mut self, index: usize) -> VqResult<RgbImage>;
}

impl<S: FrameSource + ?Sized> FrameSource for &mut S {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn frame(&mut self, index: usize) -> VqResult<RgbImage> {
        (**self).frame(index)
    }
}

/// Frames held in memory, indexed by position.
#[derive(Clone, Debug, Default)]
pub struct MemoryFrames {
    frames: Vec<RgbImage>,
}

impl MemoryFrames {
    /// Wraps already decoded frames.
    pub fn new(frames: Vec<RgbImage>) -> Self {
        Self { frames }
    }

    /// Returns the stored frames.
    pub fn frames(&self) -> &[RgbImage] {
        &self.frames
    }

    /// Consumes the source and returns its frames.
    pub fn into_frames(self) -> Vec<RgbImage> {
        self.frames
    }
}

impl From<Vec<RgbImage>> for MemoryFrames {
    fn from(frames: Vec<RgbImage>) -> Self {
        Self::new(frames)
    }
}

impl FrameSource for MemoryFrames {
    fn len(&self) -> usize {
        self.frames.len()
    }

    fn frame(&mut self, index: usize) -> VqResult<RgbImage> {
        self.frames
            .get(index)
            .cloned()
            .ok_or(VqError::FrameOutOfRange {
                index,
                len: self.frames.len(),
            })
    }
}

/// Resizes `img` to `width x height` unless it already has that size.
///
/// Borrows the input when no resize is needed.
pub(crate) fn conform_size(
    img: &RgbImage,
    width: u32,
    height: u32,
) -> VqResult<Cow<'_, RgbImage>> {
    if width == 0 || height == 0 {
        return Err(VqError::InvalidDimensions {
            width: width as usize,
            height: height as usize,
        });
    }
    if img.dimensions() == (width, height) {
        return Ok(Cow::Borrowed(img));
    }
    Ok(Cow::Owned(imageops::resize(img, width, height, RESIZE_FILTER)))
}

/// Scales `img` so its height becomes `target_height`, keeping aspect ratio.
///
/// Returns the resized image and the applied ratio `target_height / height`.
pub(crate) fn downscale_to_height(
    img: &RgbImage,
    target_height: u32,
) -> VqResult<(RgbImage, f64)> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(VqError::InvalidDimensions {
            width: width as usize,
            height: height as usize,
        });
    }
    let scale = f64::from(target_height) / f64::from(height);
    let dst_width = scaled_len(width, scale);
    let dst_height = scaled_len(height, scale);
    if (dst_width, dst_height) == (width, height) {
        return Ok((img.clone(), scale));
    }
    Ok((
        imageops::resize(img, dst_width, dst_height, RESIZE_FILTER),
        scale,
    ))
}
