use std::path::PathBuf;

use image::{Rgba, RgbaImage};

/// Writes a `width` x `height` PNG into a temp directory and returns its path.
///
/// White background with a 1 pixel orange border so the corners are easy to
/// spot when the file is opened by hand.
pub fn generate_test_image(name: &str, width: u32, height: u32) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("measure_image_tests_{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("failed to create temp dir");
    let path = dir.join(name);

    let orange = Rgba([255, 165, 0, 255]);
    let white = Rgba([255, 255, 255, 255]);
    let img = RgbaImage::from_fn(width, height, |x, y| {
        if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
            orange
        } else {
            white
        }
    });

    img.save(&path).expect("failed to save test image");
    path
}
