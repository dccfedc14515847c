use std::io::Write;

use tempfile::NamedTempFile;

pub const FITS_BLOCK_SIZE: usize = 2880;
pub const FITS_CARD_SIZE: usize = 80;

/// Append one 80-byte header card.
pub fn push_card(buf: &mut Vec<u8>, text: &str) {
    assert!(text.len() <= FITS_CARD_SIZE);
    buf.extend_from_slice(text.as_bytes());
    buf.resize(buf.len() + FITS_CARD_SIZE - text.len(), b' ');
}

fn pad_to_block(buf: &mut Vec<u8>, fill: u8) {
    while buf.len() % FITS_BLOCK_SIZE != 0 {
        buf.push(fill);
    }
}

/// Build a complete single-plane FITS file in memory.
///
/// `extra_cards` are keyword/value pairs inserted between NAXIS2 and END
/// (BSCALE, BZERO, degenerate NAXISn). `data` is the raw big-endian
/// payload; the header and data areas are both padded to the 2880-byte
/// block size.
pub fn build_fits_full(
    bitpix: i64,
    width: usize,
    height: usize,
    extra_cards: &[(&str, &str)],
    data: &[u8],
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2 * FITS_BLOCK_SIZE);

    push_card(&mut buf, "SIMPLE  =                    T");
    push_card(&mut buf, &format!("BITPIX  = {bitpix}"));
    push_card(&mut buf, "NAXIS   = 2");
    push_card(&mut buf, &format!("NAXIS1  = {width}"));
    push_card(&mut buf, &format!("NAXIS2  = {height}"));
    for (keyword, value) in extra_cards {
        push_card(&mut buf, &format!("{keyword:<8}= {value}"));
    }
    push_card(&mut buf, "END");
    pad_to_block(&mut buf, b' ');

    buf.extend_from_slice(data);
    pad_to_block(&mut buf, 0);
    buf
}

/// Build a FITS file with no extra header cards.
pub fn build_fits(bitpix: i64, width: usize, height: usize, data: &[u8]) -> Vec<u8> {
    build_fits_full(bitpix, width, height, &[], data)
}

/// 32-bit float FITS file from row-major sample values.
pub fn build_f32_fits(width: usize, height: usize, values: &[f32]) -> Vec<u8> {
    assert_eq!(values.len(), width * height);
    let mut data = Vec::with_capacity(values.len() * 4);
    for &v in values {
        data.extend_from_slice(&v.to_be_bytes());
    }
    build_fits(-32, width, height, &data)
}

/// 16-bit integer FITS file from row-major sample values.
pub fn build_i16_fits(width: usize, height: usize, values: &[i16]) -> Vec<u8> {
    assert_eq!(values.len(), width * height);
    let mut data = Vec::with_capacity(values.len() * 2);
    for &v in values {
        data.extend_from_slice(&v.to_be_bytes());
    }
    build_fits(16, width, height, &data)
}

/// Write FITS bytes to a temp file carrying a `.fits` extension, so the
/// loader routes it to the FITS reader.
pub fn write_fits_file(bytes: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".fits")
        .tempfile()
        .unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}
