//! Context-padded window extraction.

use crate::image::RESIZE_FILTER;
use crate::util::{VqError, VqResult};
use image::imageops;
use image::{Rgb, RgbImage};

/// Cuts `bbox` plus `context_pad` pixels of context out of `image` and
/// returns it as a `size x size` square.
///
/// The expanded box is clipped to the image. The shorter side of the clipped
/// window is padded with `pad_value` on both sides (the odd pixel goes to the
/// right or bottom) and the square is resized with bilinear filtering.
pub fn extract_window_with_context(
    image: &RgbImage,
    bbox: (i64, i64, i64, i64),
    context_pad: u32,
    size: u32,
    pad_value: u8,
) -> VqResult<RgbImage> {
    if size == 0 {
        return Err(VqError::InvalidDimensions {
            width: 0,
            height: 0,
        });
    }
    let (img_width, img_height) = image.dimensions();
    let pad = i64::from(context_pad);
    let (x1, y1, x2, y2) = bbox;
    let x1 = (x1 - pad).max(0);
    let y1 = (y1 - pad).max(0);
    let x2 = (x2 + pad).min(i64::from(img_width));
    let y2 = (y2 + pad).min(i64::from(img_height));
    if x2 <= x1 || y2 <= y1 {
        return Err(VqError::DegenerateBox { x1, y1, x2, y2 });
    }

    let width = (x2 - x1) as u32;
    let height = (y2 - y1) as u32;
    let window = imageops::crop_imm(image, x1 as u32, y1 as u32, width, height).to_image();

    let side = width.max(height);
    let mut square = RgbImage::from_pixel(side, side, Rgb([pad_value; 3]));
    let left = (side - width) / 2;
    let top = (side - height) / 2;
    imageops::replace(&mut square, &window, i64::from(left), i64::from(top));

    if side == size {
        return Ok(square);
    }
    Ok(imageops::resize(&square, size, size, RESIZE_FILTER))
}
