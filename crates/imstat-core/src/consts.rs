/// Default comma-separated field list reported when the caller gives none.
pub const DEFAULT_FIELDS: &str = "image,npix,mean,stddev,min,max";

/// Default histogram bin width as a fraction of the standard deviation.
pub const DEFAULT_BINWIDTH: f64 = 0.1;

/// Default sigma multiplier for the lower clipping bound.
pub const DEFAULT_LOW_SIGMA: f64 = 3.0;

/// Default sigma multiplier for the upper clipping bound.
pub const DEFAULT_HIGH_SIGMA: f64 = 3.0;

/// Column separator for printed field/value lines.
pub const DISPLAY_SEPARATOR: &str = "    ";

/// Separator for the internally retained string form of a report.
pub const STRING_SEPARATOR: &str = ",";
