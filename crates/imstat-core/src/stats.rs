use std::collections::BTreeMap;

use ndarray::Array2;
use tracing::warn;

use crate::error::{ImstatError, Result};

/// Descriptive statistics for one image section.
///
/// Built once per invocation and immutable afterwards. Every field is
/// always present; statistics that are undefined for the sample (too few
/// pixels, degenerate binning) are NaN rather than absent.
#[derive(Clone, Debug)]
pub struct ImageStatistics {
    /// Image name the section came from.
    pub image: String,
    /// Number of non-NaN pixels used for the statistics.
    pub npix: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
    /// Third standardized moment (biased).
    pub skew: f64,
    /// Fourth standardized moment, Fisher convention (normal = 0, biased).
    pub kurtosis: f64,
    /// Interpolated median of the binned distribution.
    pub midpt: f64,
    /// Most frequent bin edge; ties broken by the smallest value.
    pub mode: f64,
}

/// Histogram-derived estimators for the median and mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistogramEstimates {
    pub midpt: f64,
    pub mode: f64,
}

/// Compute the full statistics record for a (possibly filtered) section.
///
/// Moment statistics ignore NaN entries. midpt/mode come from the
/// histogram estimators; a degenerate bin width (see
/// [`histogram_estimates`]) is reported as a warning and leaves both NaN,
/// so the record still carries all ten fields.
pub fn compute_statistics(image: &str, data: &Array2<f64>, binwidth: f64) -> ImageStatistics {
    let npix = nan_count(data);
    let (mean, stddev) = nan_mean_stddev(data);
    let (min, max) = nan_min_max(data);
    let (skew, kurtosis) = nan_standardized_moments(data, mean, npix);

    let (midpt, mode) = match histogram_estimates(data, min, max, stddev, binwidth) {
        Ok(est) => (est.midpt, est.mode),
        Err(err) => {
            warn!(image, error = %err, "Histogram median and mode are undefined");
            (f64::NAN, f64::NAN)
        }
    };

    ImageStatistics {
        image: image.to_string(),
        npix,
        mean,
        stddev,
        min,
        max,
        skew,
        kurtosis,
        midpt,
        mode,
    }
}

/// Number of non-NaN entries.
pub fn nan_count(data: &Array2<f64>) -> usize {
    data.iter().filter(|v| !v.is_nan()).count()
}

/// NaN-aware mean and population standard deviation.
/// Both are NaN when every entry is NaN.
pub fn nan_mean_stddev(data: &Array2<f64>) -> (f64, f64) {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &v in data.iter() {
        if !v.is_nan() {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        return (f64::NAN, f64::NAN);
    }
    let mean = sum / count as f64;

    let mut var_sum = 0.0;
    for &v in data.iter() {
        if !v.is_nan() {
            let d = v - mean;
            var_sum += d * d;
        }
    }
    (mean, (var_sum / count as f64).sqrt())
}

/// NaN-aware extrema. Both are NaN when every entry is NaN.
pub fn nan_min_max(data: &Array2<f64>) -> (f64, f64) {
    let mut min = f64::NAN;
    let mut max = f64::NAN;
    for &v in data.iter() {
        if v.is_nan() {
            continue;
        }
        if min.is_nan() || v < min {
            min = v;
        }
        if max.is_nan() || v > max {
            max = v;
        }
    }
    (min, max)
}

/// Skew and kurtosis over non-NaN entries. Undefined (NaN) for fewer than
/// two usable pixels or a zero second moment.
fn nan_standardized_moments(data: &Array2<f64>, mean: f64, count: usize) -> (f64, f64) {
    if count < 2 {
        return (f64::NAN, f64::NAN);
    }

    let mut m2 = 0.0;
    let mut m3 = 0.0;
    let mut m4 = 0.0;
    for &v in data.iter() {
        if v.is_nan() {
            continue;
        }
        let d = v - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }

    let n = count as f64;
    let m2_norm = m2 / n;
    if m2_norm <= 0.0 {
        return (f64::NAN, f64::NAN);
    }
    let skew = (m3 / n) / m2_norm.powf(1.5);
    let kurtosis = (m4 / n) / (m2_norm * m2_norm) - 3.0;
    (skew, kurtosis)
}

/// Histogram median/mode estimators over the non-NaN entries.
///
/// Bin edges start at `min` and step by `binwidth * stddev`, stopping
/// before `max`; every sample is digitized to the left edge of its bin
/// (NaNs are excluded from all counts). With `trmed` the median of the
/// digitized values, `midpt` is `trmed` when no sample ties it, otherwise
/// the grouped-data interpolation
/// `trmed - 0.5 + (0.5 * npix - n_below) / n_equal`. `mode` is the most
/// frequent edge, ties broken by the smallest value.
///
/// A bin width that is zero, negative, or non-finite (all-NaN data makes
/// the stddev NaN) cannot be binned and yields `DegenerateBinning`.
pub fn histogram_estimates(
    data: &Array2<f64>,
    min: f64,
    max: f64,
    stddev: f64,
    binwidth: f64,
) -> Result<HistogramEstimates> {
    let step = binwidth * stddev;
    if !step.is_finite() || step <= 0.0 {
        return Err(ImstatError::DegenerateBinning {
            bin_width: step,
            stddev,
        });
    }

    // Half-open arithmetic progression of edges: min, min+step, ... < max.
    // Edges are never materialized; the count only clamps indices.
    let last_edge_index = edge_count(min, max, step).saturating_sub(1);

    let mut digitized = Vec::with_capacity(data.len());
    let mut bin_counts: BTreeMap<usize, usize> = BTreeMap::new();
    for &v in data.iter() {
        if v.is_nan() {
            continue;
        }
        let index = (((v - min) / step) as usize).min(last_edge_index);
        digitized.push(min + index as f64 * step);
        *bin_counts.entry(index).or_insert(0) += 1;
    }

    digitized.sort_by(f64::total_cmp);
    let trmed = median_of_sorted(&digitized);

    let total = digitized.len();
    let n_below = digitized.iter().filter(|&&v| v < trmed).count();
    let n_equal = digitized.iter().filter(|&&v| v == trmed).count();
    let midpt = if n_equal == 0 {
        trmed
    } else {
        trmed - 0.5 + ((0.5 * total as f64 - n_below as f64) / n_equal as f64)
    };

    // Ascending iteration with a strict comparison keeps the smallest edge
    // on ties.
    let mut mode_index = 0usize;
    let mut mode_count = 0usize;
    for (&index, &count) in &bin_counts {
        if count > mode_count {
            mode_index = index;
            mode_count = count;
        }
    }
    let mode = min + mode_index as f64 * step;

    Ok(HistogramEstimates { midpt, mode })
}

/// Length of the half-open edge progression, matching
/// `ceil((max - min) / step)` with a floor of one edge.
fn edge_count(min: f64, max: f64, step: f64) -> usize {
    let span = max - min;
    if !(span > 0.0) {
        return 1;
    }
    (span / step).ceil() as usize
}

fn median_of_sorted(values: &[f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return f64::NAN;
    }
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}
