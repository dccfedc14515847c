pub mod fits;

use std::path::Path;

use ndarray::Array2;

use crate::error::Result;
use crate::io::fits::FitsReader;

/// Load the primary 2-D data plane of an image file.
///
/// FITS files go through the built-in primary-HDU reader; anything else is
/// decoded by the `image` crate and converted to a grayscale plane. The
/// file handle (and memory map) is released before this returns.
pub fn load_plane(path: &Path) -> Result<Array2<f64>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("fits" | "fit" | "fts") => {
            let reader = FitsReader::open(path)?;
            reader.read_plane()
        }
        _ => load_gray_plane(path),
    }
}

/// Load a non-FITS raster image as a grayscale plane.
/// Sample values are the raw 16-bit luma levels, not normalized.
fn load_gray_plane(path: &Path) -> Result<Array2<f64>> {
    let img = image::open(path)?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();
    let mut data = Array2::<f64>::zeros((h as usize, w as usize));

    for row in 0..h as usize {
        for col in 0..w as usize {
            let pixel = gray.get_pixel(col as u32, row as u32);
            data[[row, col]] = f64::from(pixel.0[0]);
        }
    }

    Ok(data)
}
