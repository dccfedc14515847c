use std::path::Path;

use ndarray::s;

use crate::error::{ImstatError, Result};
use crate::io;
use crate::section::ImageSection;

/// Zero-based, half-open pixel bounds parsed from a `[xmin:xmax,ymin:ymax]`
/// suffix. The notation is 1-based inclusive; mins are stored decremented
/// and maxes kept as-is, so slicing is a standard half-open range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBounds {
    pub x_min: usize,
    pub x_max: usize,
    pub y_min: usize,
    pub y_max: usize,
}

/// Image locator plus optional pixel bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionSpec {
    /// Image name as supplied, with any bracket suffix stripped.
    pub image: String,
    pub bounds: Option<PixelBounds>,
}

/// Parse an input string into an image name and optional pixel bounds.
///
/// Only the first whitespace-separated token is used; trailing tokens are
/// accepted and ignored. A malformed bracket expression is always a hard
/// error, never a silent fall-back to the whole image.
pub fn parse_region(raw: &str) -> Result<RegionSpec> {
    let token = raw
        .split_whitespace()
        .next()
        .ok_or_else(|| syntax_error(raw, "empty input string"))?;

    let Some(open) = token.find('[') else {
        return Ok(RegionSpec {
            image: token.to_string(),
            bounds: None,
        });
    };

    let close = token[open + 1..]
        .find(']')
        .ok_or_else(|| syntax_error(token, "missing closing bracket"))?;
    let body = &token[open + 1..open + 1 + close];
    let bounds = parse_bounds(token, body)?;

    Ok(RegionSpec {
        image: token[..open].to_string(),
        bounds: Some(bounds),
    })
}

/// Parse `raw`, open the image under `base_dir`, and slice the requested
/// sub-region. Without bounds the whole data plane is used. The image file
/// handle is scoped to this call and released on every exit path.
pub fn load_section(raw: &str, base_dir: &Path) -> Result<ImageSection> {
    let spec = parse_region(raw)?;
    let path = base_dir.join(&spec.image);
    let full = io::load_plane(&path).map_err(|err| ImstatError::OpenImage {
        path: path.clone(),
        reason: err.to_string(),
    })?;

    let data = match spec.bounds {
        None => full,
        Some(b) => {
            let (height, width) = full.dim();
            // Inverted ranges would otherwise slice to an empty section.
            if b.x_min >= b.x_max || b.y_min >= b.y_max || b.x_max > width || b.y_max > height {
                return Err(ImstatError::RegionOutOfRange {
                    x_min: b.x_min,
                    x_max: b.x_max,
                    y_min: b.y_min,
                    y_max: b.y_max,
                    width,
                    height,
                });
            }
            full.slice(s![b.y_min..b.y_max, b.x_min..b.x_max]).to_owned()
        }
    };

    Ok(ImageSection::new(spec.image, data))
}

fn parse_bounds(token: &str, body: &str) -> Result<PixelBounds> {
    let mut halves = body.split(',');
    let (Some(x_part), Some(y_part), None) = (halves.next(), halves.next(), halves.next()) else {
        return Err(syntax_error(
            token,
            "expected exactly one comma between axis ranges",
        ));
    };

    let (x_min, x_max) = parse_axis(token, x_part)?;
    let (y_min, y_max) = parse_axis(token, y_part)?;

    Ok(PixelBounds {
        x_min,
        x_max,
        y_min,
        y_max,
    })
}

/// Parse one `min:max` half. Bounds are 1-based inclusive integers; the
/// min comes back decremented, the max unchanged (exclusive upper bound).
fn parse_axis(token: &str, part: &str) -> Result<(usize, usize)> {
    let mut ends = part.split(':');
    let (Some(lo), Some(hi), None) = (ends.next(), ends.next(), ends.next()) else {
        return Err(syntax_error(token, "expected min:max for each axis"));
    };

    let lo = parse_bound(token, lo)?;
    let hi = parse_bound(token, hi)?;
    if lo == 0 {
        return Err(syntax_error(token, "bounds are 1-based"));
    }

    Ok((lo - 1, hi))
}

fn parse_bound(token: &str, text: &str) -> Result<usize> {
    text.trim()
        .parse::<usize>()
        .map_err(|_| syntax_error(token, "bounds must be positive integers"))
}

fn syntax_error(region: &str, reason: &str) -> ImstatError {
    ImstatError::RegionSyntax {
        region: region.to_string(),
        reason: reason.to_string(),
    }
}
