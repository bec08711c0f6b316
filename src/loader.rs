use std::path::{Path, PathBuf};

use image::GenericImageView;
use tracing::debug;

use crate::error::{MeasureError, MeasureResult};
use crate::intake::is_image_path;
use crate::mapper::ImageDimensions;

/// An image decoded to RGBA8 for display, with its natural size.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub path: PathBuf,
    pub dimensions: ImageDimensions,
    pub pixels: Vec<u8>,
}

fn ensure_image(path: &Path) -> MeasureResult<()> {
    if is_image_path(path) {
        Ok(())
    } else {
        Err(MeasureError::NotAnImage(path.to_path_buf()))
    }
}

/// Read only the header to get the natural pixel size.
pub fn read_dimensions(path: &Path) -> MeasureResult<ImageDimensions> {
    ensure_image(path)?;
    let (width, height) = image::image_dimensions(path)?;
    if width == 0 || height == 0 {
        return Err(MeasureError::ZeroDimensions);
    }
    Ok(ImageDimensions::new(width, height))
}

/// Fully decode the image for display.
pub fn decode_image(path: &Path) -> MeasureResult<DecodedImage> {
    ensure_image(path)?;
    let image = image::open(path)?;
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(MeasureError::ZeroDimensions);
    }
    debug!(path = %path.display(), width, height, "decoded image");
    Ok(DecodedImage {
        path: path.to_path_buf(),
        dimensions: ImageDimensions::new(width, height),
        pixels: image.to_rgba8().into_raw(),
    })
}
