// pgm.rs — Portable Gray Map reader (P2/P5) and writer (P2).
//
// File layout:
//
//   P2                     <- format tag: P2 = ASCII samples, P5 = binary
//   # optional comments    <- '#' to end of line, allowed anywhere in header
//   256 256                <- width height
//   255                    <- maxval
//   0 0 255 255 ...        <- P2: whitespace-separated decimals
//                             P5: one whitespace byte, then w*h raw bytes
//
// Reading always produces Image<f32> luminance, since that is what the
// Sobel extractor consumes. Writing always emits P2 with maxval 255.
//
// Samples are taken as-is: maxval is validated but values are not rescaled
// against it.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{GradMagError, Result};
use crate::image::{Image, Pixel};

/// Magnitudes are doubled before clamping so faint edges stay visible.
pub const MAGNITUDE_SCALE: f32 = 2.0;

/// Largest sample value the writer emits.
pub const MAX_SAMPLE: u8 = 255;

/// The two PGM variants we understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PgmKind {
    /// `P2`: ASCII decimal samples.
    Plain,
    /// `P5`: one byte per sample.
    Raw,
}

impl PgmKind {
    fn from_tag(tag: &[u8]) -> Result<Self> {
        match tag {
            b"P2" => Ok(PgmKind::Plain),
            b"P5" => Ok(PgmKind::Raw),
            other => Err(GradMagError::format(format!(
                "not a PGM file: format tag {:?} is neither P2 nor P5",
                String::from_utf8_lossy(other)
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Load a P2 or P5 file from disk as f32 luminance.
///
/// Fails with `Io` if the file cannot be read and `Format` if its contents
/// are not a PGM we can decode.
pub fn read_pgm(path: impl AsRef<Path>) -> Result<Image<f32>> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| GradMagError::io(path, e))?;
    let img = decode_pgm(&bytes)?;
    debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "loaded PGM"
    );
    Ok(img)
}

/// Decode an in-memory PGM.
pub fn decode_pgm(bytes: &[u8]) -> Result<Image<f32>> {
    let mut cur = Cursor::new(bytes);

    let tag = cur
        .token()
        .ok_or_else(|| GradMagError::format("empty input: missing format tag"))?;
    let kind = PgmKind::from_tag(tag)?;

    let width = cur.header_value("width")?;
    let height = cur.header_value("height")?;
    let maxval = cur.header_value("maxval")?;

    if maxval == 0 || maxval > 65535 {
        return Err(GradMagError::format(format!(
            "maxval {maxval} outside 1..=65535"
        )));
    }
    let n = width.checked_mul(height).ok_or_else(|| {
        GradMagError::format(format!("image {width}×{height} overflows usize"))
    })?;

    let data = match kind {
        PgmKind::Plain => cur.plain_samples(n)?,
        PgmKind::Raw => {
            if maxval > 255 {
                return Err(GradMagError::format(format!(
                    "P5 with maxval {maxval} needs 16-bit samples, which are unsupported"
                )));
            }
            cur.raw_samples(n)?
        }
    };

    Image::try_from_vec(width, height, data)
}

/// Byte cursor over a PGM file.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Cursor { bytes, pos: 0 }
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if b == b'#' {
                while let Some(&c) = self.bytes.get(self.pos) {
                    self.pos += 1;
                    if c == b'\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    /// Next whitespace-delimited token, or None at end of input.
    fn token(&mut self) -> Option<&'a [u8]> {
        self.skip_whitespace_and_comments();
        let start = self.pos;
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() {
                break;
            }
            self.pos += 1;
        }
        if self.pos > start {
            Some(&self.bytes[start..self.pos])
        } else {
            None
        }
    }

    fn header_value(&mut self, field: &str) -> Result<usize> {
        let tok = self
            .token()
            .ok_or_else(|| GradMagError::format(format!("truncated header: missing {field}")))?;
        parse_decimal(tok)
            .ok_or_else(|| GradMagError::format(format!("malformed {field}: {:?}", lossy(tok))))
    }

    fn plain_samples(&mut self, n: usize) -> Result<Vec<f32>> {
        // Every sample takes at least two bytes (digit + separator), so the
        // remaining input bounds how many can follow, whatever the header says.
        let remaining = self.bytes.len() - self.pos;
        let mut data = Vec::with_capacity(n.min(remaining / 2 + 1));
        for i in 0..n {
            let tok = self.token().ok_or_else(|| {
                GradMagError::format(format!("truncated P2 data: got {i} of {n} samples"))
            })?;
            let v = parse_decimal(tok).ok_or_else(|| {
                GradMagError::format(format!("malformed P2 sample #{i}: {:?}", lossy(tok)))
            })?;
            data.push(v as f32);
        }
        Ok(data)
    }

    fn raw_samples(&mut self, n: usize) -> Result<Vec<f32>> {
        // Exactly one whitespace byte separates maxval from the raster.
        match self.bytes.get(self.pos) {
            Some(b) if b.is_ascii_whitespace() => self.pos += 1,
            _ => return Err(GradMagError::format("P5 header not followed by whitespace")),
        }
        let raster = &self.bytes[self.pos..];
        if raster.len() < n {
            return Err(GradMagError::format(format!(
                "truncated P5 data: got {} of {n} bytes",
                raster.len()
            )));
        }
        self.pos += n;
        Ok(raster[..n].iter().map(|&b| b.to_f32()).collect())
    }
}

fn parse_decimal(tok: &[u8]) -> Option<usize> {
    std::str::from_utf8(tok).ok()?.parse().ok()
}

fn lossy(tok: &[u8]) -> String {
    String::from_utf8_lossy(tok).into_owned()
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Serialize an 8-bit image as P2.
///
/// Header is `P2\n<w> <h>\n255\n`; samples are space-separated with a
/// newline after the last sample of each row.
pub fn encode_pgm<W: Write>(out: &mut W, img: &Image<u8>) -> std::io::Result<()> {
    write!(out, "P2\n{} {}\n{}\n", img.width(), img.height(), MAX_SAMPLE)?;
    for y in 0..img.height() {
        let row = img.row(y);
        for (x, v) in row.iter().enumerate() {
            let sep = if x + 1 == row.len() { '\n' } else { ' ' };
            write!(out, "{v}{sep}")?;
        }
    }
    Ok(())
}

/// Write an 8-bit image to `path` as P2.
pub fn write_pgm(path: impl AsRef<Path>, img: &Image<u8>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| GradMagError::io(path, e))?;
    let mut out = BufWriter::new(file);
    encode_pgm(&mut out, img)
        .and_then(|()| out.flush())
        .map_err(|e| GradMagError::io(path, e))?;
    debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "wrote PGM"
    );
    Ok(())
}

/// Map the first `width * height` magnitudes to displayable gray levels:
/// `round(min(255, value * 2))`, with negatives and NaN mapping to 0.
pub fn magnitude_to_gray(mag: &[f32], width: usize, height: usize) -> Result<Image<u8>> {
    let n = width.checked_mul(height).ok_or_else(|| {
        GradMagError::invalid(format!("image {width}×{height} overflows usize"))
    })?;
    if mag.len() < n {
        return Err(GradMagError::invalid(format!(
            "magnitude buffer holds {} values, {width}×{height} image needs {n}",
            mag.len()
        )));
    }
    let data = mag[..n].iter().map(|&v| u8::from_f32(v * MAGNITUDE_SCALE)).collect();
    Image::try_from_vec(width, height, data)
}

/// Display-map a magnitude buffer and write it as P2.
pub fn write_magnitude(
    path: impl AsRef<Path>,
    mag: &[f32],
    width: usize,
    height: usize,
) -> Result<()> {
    let gray = magnitude_to_gray(mag, width, height)?;
    write_pgm(path, &gray)
}
