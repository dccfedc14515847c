use std::fs::File;
use std::path::Path;

use byteorder::{BigEndian, ByteOrder};
use memmap2::Mmap;
use ndarray::Array2;

use crate::error::{ImstatError, Result};

const FITS_BLOCK_SIZE: usize = 2880;
const FITS_CARD_SIZE: usize = 80;
const FITS_MAGIC: &[u8; 6] = b"SIMPLE";

/// Primary-HDU header fields needed to locate and decode the data plane.
#[derive(Clone, Debug)]
pub struct FitsHeader {
    pub bitpix: i64,
    pub naxes: Vec<usize>,
    pub bscale: f64,
    pub bzero: f64,
    /// Sentinel marking undefined pixels in integer-BITPIX images.
    pub blank: Option<i64>,
}

impl FitsHeader {
    /// Bytes per pixel for the stored BITPIX type.
    pub fn bytes_per_pixel(&self) -> usize {
        (self.bitpix.unsigned_abs() / 8) as usize
    }

    /// NAXIS1: number of columns.
    pub fn width(&self) -> usize {
        self.naxes.first().copied().unwrap_or(0)
    }

    /// NAXIS2: number of rows.
    pub fn height(&self) -> usize {
        self.naxes.get(1).copied().unwrap_or(0)
    }

    /// Total bytes of the 2-D data plane, or None when the dimensions
    /// overflow the addressable range.
    pub fn plane_byte_size(&self) -> Option<usize> {
        self.width()
            .checked_mul(self.height())?
            .checked_mul(self.bytes_per_pixel())
    }

    /// Raw integer sample as f64, with BLANK sentinels mapped to NaN.
    fn int_sample(&self, raw: i64) -> f64 {
        if self.blank == Some(raw) {
            f64::NAN
        } else {
            raw as f64
        }
    }
}

/// Memory-mapped reader for the primary HDU of a FITS file.
#[derive(Debug)]
pub struct FitsReader {
    mmap: Mmap,
    pub header: FitsHeader,
    data_start: usize,
    plane_size: usize,
}

impl FitsReader {
    /// Open a FITS file and parse its primary header.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < FITS_BLOCK_SIZE {
            return Err(ImstatError::InvalidFits(
                "File too small for a FITS header block".into(),
            ));
        }

        if &mmap[0..6] != FITS_MAGIC {
            return Err(ImstatError::InvalidFits("Missing SIMPLE keyword".into()));
        }

        let (header, data_start) = parse_header(&mmap)?;

        if !matches!(header.bitpix, 8 | 16 | 32 | 64 | -32 | -64) {
            return Err(ImstatError::InvalidFits(format!(
                "Unsupported BITPIX {}",
                header.bitpix
            )));
        }
        if header.naxes.len() < 2 {
            return Err(ImstatError::InvalidFits(
                "Primary HDU has no 2-D data plane".into(),
            ));
        }
        // Trailing degenerate axes (length 1) are tolerated; real cubes are not.
        if header.naxes[2..].iter().any(|&n| n > 1) {
            return Err(ImstatError::InvalidFits(
                "Multi-plane images are not supported".into(),
            ));
        }
        if header.width() == 0 || header.height() == 0 {
            return Err(ImstatError::InvalidDimensions {
                width: header.width(),
                height: header.height(),
            });
        }

        let plane_size = header.plane_byte_size().ok_or_else(|| {
            ImstatError::InvalidFits("Image dimensions overflow the addressable size".into())
        })?;
        let expected_size = data_start.saturating_add(plane_size);
        if mmap.len() < expected_size {
            return Err(ImstatError::InvalidFits(format!(
                "File truncated: expected at least {} bytes, got {}",
                expected_size,
                mmap.len()
            )));
        }

        Ok(Self {
            mmap,
            header,
            data_start,
            plane_size,
        })
    }

    /// Read the primary data plane, applying BSCALE/BZERO calibration.
    /// Data is stored big-endian, NAXIS1 varying fastest. Integer samples
    /// equal to the BLANK sentinel decode to NaN.
    pub fn read_plane(&self) -> Result<Array2<f64>> {
        let h = self.header.height();
        let w = self.header.width();
        let bpp = self.header.bytes_per_pixel();
        let raw = &self.mmap[self.data_start..self.data_start + self.plane_size];

        let mut data = Array2::<f64>::zeros((h, w));
        for row in 0..h {
            for col in 0..w {
                let idx = (row * w + col) * bpp;
                let val = match self.header.bitpix {
                    8 => self.header.int_sample(i64::from(raw[idx])),
                    16 => self.header.int_sample(i64::from(BigEndian::read_i16(&raw[idx..]))),
                    32 => self.header.int_sample(i64::from(BigEndian::read_i32(&raw[idx..]))),
                    64 => self.header.int_sample(BigEndian::read_i64(&raw[idx..])),
                    -32 => f64::from(BigEndian::read_f32(&raw[idx..])),
                    _ => BigEndian::read_f64(&raw[idx..]),
                };
                data[[row, col]] = self.header.bscale * val + self.header.bzero;
            }
        }

        Ok(data)
    }
}

fn parse_header(buf: &[u8]) -> Result<(FitsHeader, usize)> {
    let mut bitpix: Option<i64> = None;
    let mut naxis: Option<usize> = None;
    let mut naxes: Vec<usize> = Vec::new();
    let mut bscale = 1.0_f64;
    let mut bzero = 0.0_f64;
    let mut blank: Option<i64> = None;

    let mut offset = 0;
    let mut end_found = false;
    while offset + FITS_CARD_SIZE <= buf.len() {
        let card = &buf[offset..offset + FITS_CARD_SIZE];
        offset += FITS_CARD_SIZE;

        let keyword = read_keyword(card);
        if keyword == "END" {
            end_found = true;
            break;
        }
        // Cards without the "= " value indicator (COMMENT, HISTORY, blanks)
        // carry no value.
        if &card[8..10] != b"= " {
            continue;
        }
        let value = read_value(&card[10..]);

        match keyword.as_str() {
            "SIMPLE" => {
                if value != "T" {
                    return Err(ImstatError::InvalidFits(
                        "Not a standard FITS file (SIMPLE is not T)".into(),
                    ));
                }
            }
            "BITPIX" => bitpix = Some(parse_int(&keyword, &value)?),
            "NAXIS" => naxis = Some(parse_axis_len(&keyword, &value)?),
            "BSCALE" => bscale = parse_float(&keyword, &value)?,
            "BZERO" => bzero = parse_float(&keyword, &value)?,
            "BLANK" => blank = Some(parse_int(&keyword, &value)?),
            _ => {
                if let Some(axis) = keyword.strip_prefix("NAXIS") {
                    if let Ok(n) = axis.parse::<usize>() {
                        if n >= 1 {
                            let len = parse_axis_len(&keyword, &value)?;
                            if naxes.len() < n {
                                naxes.resize(n, 0);
                            }
                            naxes[n - 1] = len;
                        }
                    }
                }
            }
        }
    }

    if !end_found {
        return Err(ImstatError::InvalidFits("Missing END card".into()));
    }

    let bitpix =
        bitpix.ok_or_else(|| ImstatError::InvalidFits("Missing BITPIX keyword".into()))?;
    let naxis = naxis.ok_or_else(|| ImstatError::InvalidFits("Missing NAXIS keyword".into()))?;
    if naxes.len() != naxis {
        return Err(ImstatError::InvalidFits(format!(
            "NAXIS is {} but {} NAXISn keywords were found",
            naxis,
            naxes.len()
        )));
    }

    // Data begins at the next block boundary after the END card.
    let data_start = offset.div_ceil(FITS_BLOCK_SIZE) * FITS_BLOCK_SIZE;

    Ok((
        FitsHeader {
            bitpix,
            naxes,
            bscale,
            bzero,
            blank,
        },
        data_start,
    ))
}

fn read_keyword(card: &[u8]) -> String {
    String::from_utf8_lossy(&card[..8]).trim().to_string()
}

/// Value substring of a card: everything after "= " up to the comment slash.
fn read_value(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let text = match text.find('/') {
        Some(i) => &text[..i],
        None => &text[..],
    };
    text.trim().to_string()
}

fn parse_int(keyword: &str, value: &str) -> Result<i64> {
    value
        .parse::<i64>()
        .map_err(|_| ImstatError::InvalidFits(format!("Bad {keyword} value {value:?}")))
}

fn parse_axis_len(keyword: &str, value: &str) -> Result<usize> {
    let n = parse_int(keyword, value)?;
    usize::try_from(n)
        .map_err(|_| ImstatError::InvalidFits(format!("Bad {keyword} value {value:?}")))
}

/// FITS floats may carry a Fortran-style D exponent.
fn parse_float(keyword: &str, value: &str) -> Result<f64> {
    value
        .replace(['D', 'd'], "E")
        .parse::<f64>()
        .map_err(|_| ImstatError::InvalidFits(format!("Bad {keyword} value {value:?}")))
}
