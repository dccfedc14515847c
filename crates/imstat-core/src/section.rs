use ndarray::Array2;

/// A rectangular section of a single image's primary data plane.
/// Pixel values are f64; NaN marks pixels excluded from the statistics.
#[derive(Clone, Debug)]
pub struct ImageSection {
    /// Image name as supplied, with any bracket suffix stripped.
    pub image: String,
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f64>,
}

impl ImageSection {
    pub fn new(image: impl Into<String>, data: Array2<f64>) -> Self {
        Self {
            image: image.into(),
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }
}
