// workload.rs — Replicated gradient workload and kernel timing.
//
// A single 256×256 image is only 64K elements, which the magnitude kernel
// chews through in microseconds. To get a stable measurement we tile the
// image's gradients `iterations` times into one large buffer:
//
//   gx: [ tile 0 | tile 1 | tile 2 | ... | tile k-1 ]     tile = w*h
//         ^ Sobel output, copied into every other tile
//
// and run the kernel exactly once over the whole thing. Only tile 0 of the
// magnitude buffer is later written to disk.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::buffer::AlignedBuffer;
use crate::error::{GradMagError, Result};
use crate::gradient::sobel_into;
use crate::image::{Image, Pixel};
use crate::magnitude::compute_magnitude;

/// Copy `buf[..tile]` into each of the following `iterations - 1` tiles.
///
/// Fails with `InvalidArgument` if `tile * iterations` overflows or exceeds
/// `buf.len()`.
pub fn replicate(buf: &mut [f32], tile: usize, iterations: usize) -> Result<()> {
    let total = tile.checked_mul(iterations).ok_or_else(|| {
        GradMagError::invalid(format!("{tile} × {iterations} overflows usize"))
    })?;
    if total > buf.len() {
        return Err(GradMagError::invalid(format!(
            "{iterations} tiles of {tile} need {total} elements, buffer has {}",
            buf.len()
        )));
    }
    if tile == 0 {
        return Ok(());
    }
    let (first, rest) = buf[..total].split_at_mut(tile);
    for dst in rest.chunks_exact_mut(tile) {
        dst.copy_from_slice(first);
    }
    Ok(())
}

/// Wall-clock result of one kernel run.
#[derive(Debug, Clone, Copy)]
pub struct KernelTiming {
    /// Elements processed.
    pub elements: usize,
    pub elapsed: Duration,
}

impl KernelTiming {
    /// Elements per second. Zero when the run was too short to measure.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.elements as f64 / secs
        } else {
            0.0
        }
    }
}

/// Gx, Gy and Mag buffers for `iterations` copies of one image.
pub struct Workload {
    pub gx: AlignedBuffer,
    pub gy: AlignedBuffer,
    pub mag: AlignedBuffer,
    width: usize,
    height: usize,
    iterations: usize,
}

impl Workload {
    /// Allocate zeroed buffers, extract Sobel gradients of `lum` into the
    /// first tile and replicate them across all tiles.
    ///
    /// Fails with `InvalidArgument` for an empty image, zero iterations, a
    /// total size that overflows `usize` or buffers that cannot be
    /// allocated.
    pub fn from_luminance<T: Pixel>(lum: &Image<T>, iterations: usize) -> Result<Self> {
        if lum.is_empty() {
            return Err(GradMagError::invalid(format!(
                "cannot build a workload from an empty {}×{} image",
                lum.width(),
                lum.height()
            )));
        }
        if iterations == 0 {
            return Err(GradMagError::invalid("iterations must be at least 1"));
        }
        let tile = lum.len();
        let total = tile.checked_mul(iterations).ok_or_else(|| {
            GradMagError::invalid(format!("{tile} × {iterations} elements overflows usize"))
        })?;

        let mut gx = AlignedBuffer::try_zeroed(total)?;
        let mut gy = AlignedBuffer::try_zeroed(total)?;
        let mag = AlignedBuffer::try_zeroed(total)?;

        sobel_into(lum, &mut gx, &mut gy)?;
        replicate(&mut gx, tile, iterations)?;
        replicate(&mut gy, tile, iterations)?;
        debug!(tile, iterations, total, "workload replicated");

        Ok(Workload {
            gx,
            gy,
            mag,
            width: lum.width(),
            height: lum.height(),
            iterations,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Elements in one tile (one image).
    pub fn tile_len(&self) -> usize {
        self.width * self.height
    }

    /// Elements across all tiles.
    pub fn len(&self) -> usize {
        self.mag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mag.is_empty()
    }

    /// Run the magnitude kernel once over every element, timing only the
    /// kernel call.
    pub fn run_timed(&mut self) -> Result<KernelTiming> {
        let n = self.len();
        let start = Instant::now();
        compute_magnitude(&self.gx, &self.gy, &mut self.mag, n)?;
        let elapsed = start.elapsed();

        let timing = KernelTiming {
            elements: n,
            elapsed,
        };
        info!(
            elements = n,
            elapsed_s = elapsed.as_secs_f64(),
            melem_per_s = timing.throughput() / 1e6,
            "magnitude kernel finished"
        );
        Ok(timing)
    }

    /// Magnitudes of the first tile, i.e. of the input image.
    pub fn first_tile(&self) -> &[f32] {
        &self.mag[..self.tile_len()]
    }
}
