use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{DEFAULT_HIGH_SIGMA, DEFAULT_LOW_SIGMA};
use crate::stats::nan_mean_stddev;

/// Pixel rejection parameters: a fixed acceptance range plus an optional
/// number of sigma-clipping passes around it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipParams {
    /// Smallest accepted pixel value.
    pub lower: f64,
    /// Largest accepted pixel value.
    pub upper: f64,
    /// Number of sigma-clipping passes to run after the range filter.
    pub nclip: usize,
    /// Clip pixels below `mean - low_sigma * stddev`.
    pub low_sigma: f64,
    /// Clip pixels above `mean + high_sigma * stddev`.
    pub high_sigma: f64,
}

impl Default for ClipParams {
    fn default() -> Self {
        Self {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
            nclip: 0,
            low_sigma: DEFAULT_LOW_SIGMA,
            high_sigma: DEFAULT_HIGH_SIGMA,
        }
    }
}

/// Replace pixels outside `[lower, upper]` with NaN. Bounds are
/// inclusive; pixels already NaN stay NaN.
pub fn range_filter(data: &Array2<f64>, lower: f64, upper: f64) -> Array2<f64> {
    data.mapv(|v| if v < lower || v > upper { f64::NAN } else { v })
}

/// Apply the acceptance range, then run exactly `nclip` sigma-clipping
/// passes over the survivors.
///
/// Each pass recomputes the mean and stddev of the current sample and
/// rejects pixels outside `mean ± sigma * stddev`. Passes are not cut
/// short when nothing is rejected; once the sample is empty the bounds
/// turn NaN and later passes reject nothing more.
pub fn filter_and_clip(data: &Array2<f64>, params: &ClipParams) -> Array2<f64> {
    let mut current = range_filter(data, params.lower, params.upper);

    for pass in 0..params.nclip {
        let (mean, stddev) = nan_mean_stddev(&current);
        let low = mean - params.low_sigma * stddev;
        let high = mean + params.high_sigma * stddev;
        debug!(
            pass = pass + 1,
            mean,
            stddev,
            low,
            high,
            "Sigma clipping pass"
        );
        current = range_filter(&current, low, high);
    }

    current
}
