//! Frame sources backed by image files via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::FrameSource;
use crate::util::{VqError, VqResult};
use image::RgbImage;
use std::path::{Path, PathBuf};

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// A clip stored as one image file per frame in a directory.
///
/// Files are ordered by name, so zero-padded names (`000123.jpg`) map to
/// their frame numbers.
#[derive(Clone, Debug)]
pub struct ImageDirSource {
    paths: Vec<PathBuf>,
}

impl ImageDirSource {
    /// Scans `dir` for PNG/JPEG files.
    pub fn open<P: AsRef<Path>>(dir: P) -> VqResult<Self> {
        let entries = std::fs::read_dir(dir.as_ref()).map_err(|err| VqError::ImageIo {
            reason: format!("{}: {err}", dir.as_ref().display()),
        })?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|err| VqError::ImageIo {
                    reason: err.to_string(),
                })?
                .path();
            if path.is_file() && has_frame_extension(&path) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(Self { paths })
    }

    /// Builds a source from explicit frame paths, in frame order.
    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Returns the frame file paths in frame order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

fn has_frame_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            FRAME_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

impl FrameSource for ImageDirSource {
    fn len(&self) -> usize {
        self.paths.len()
    }

    fn frame(&mut self, index: usize) -> VqResult<RgbImage> {
        let path = self.paths.get(index).ok_or(VqError::FrameOutOfRange {
            index,
            len: self.paths.len(),
        })?;
        load_rgb_image(path)
    }
}

/// Loads an image from disk and converts it to RGB.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> VqResult<RgbImage> {
    let img = image::open(path).map_err(|err| VqError::ImageIo {
        reason: err.to_string(),
    })?;
    Ok(img.to_rgb8())
}

/// Writes an RGB image, picking the format from the file extension.
pub fn save_rgb_image<P: AsRef<Path>>(img: &RgbImage, path: P) -> VqResult<()> {
    img.save(path).map_err(|err| VqError::ImageIo {
        reason: err.to_string(),
    })
}
