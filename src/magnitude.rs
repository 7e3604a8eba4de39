// magnitude.rs — The gradient-magnitude kernel.
//
//   mag[i] = sqrt(gx[i]² + gy[i]²)      for i in [0, n)
//
// This is the hot loop of the crate. It is written so LLVM can
// auto-vectorise it:
//   - inputs are re-sliced to exactly `n` before the loop, so every
//     `[i]` bounds check is proven redundant and hoisted out
//   - no branches, no calls through indirection, no allocation
//   - each iteration touches only index i (no loop-carried dependency)
//
// f32 `sqrt` is IEEE 754 correctly rounded and lowers to a vector sqrt
// instruction. Rust never contracts `a*a + b*b` into an FMA on its own,
// so the result matches a plain multiply, add, sqrt sequence bit for bit.
//
// Aliasing: `gx`/`gy` are shared borrows and `mag` is an exclusive one, so
// writing the result into one of the inputs cannot be expressed.

use crate::buffer::AlignedBuffer;
use crate::error::{GradMagError, Result};

/// Compute `mag[i] = sqrt(gx[i]² + gy[i]²)` for the first `n` elements.
///
/// Elements of `mag` at index `n` and beyond are not touched. NaN and
/// infinite inputs propagate per IEEE 754.
///
/// Fails with `InvalidArgument`, before writing anything, if any of the
/// three slices is shorter than `n`.
pub fn compute_magnitude(gx: &[f32], gy: &[f32], mag: &mut [f32], n: usize) -> Result<()> {
    if gx.len() < n || gy.len() < n || mag.len() < n {
        return Err(GradMagError::invalid(format!(
            "n = {n} exceeds buffer lengths (gx: {}, gy: {}, mag: {})",
            gx.len(),
            gy.len(),
            mag.len()
        )));
    }
    magnitude_kernel(&gx[..n], &gy[..n], &mut mag[..n]);
    Ok(())
}

/// Allocating form: returns a fresh aligned buffer of `gx.len()` magnitudes.
///
/// Fails with `InvalidArgument` if `gx` and `gy` differ in length.
pub fn magnitude(gx: &[f32], gy: &[f32]) -> Result<AlignedBuffer> {
    if gx.len() != gy.len() {
        return Err(GradMagError::invalid(format!(
            "gradient length mismatch (gx: {}, gy: {})",
            gx.len(),
            gy.len()
        )));
    }
    let mut mag = AlignedBuffer::zeroed(gx.len());
    magnitude_kernel(gx, gy, &mut mag);
    Ok(mag)
}

/// The loop itself. All three slices have the same length.
#[inline]
#[allow(clippy::needless_range_loop)]
fn magnitude_kernel(gx: &[f32], gy: &[f32], mag: &mut [f32]) {
    let n = mag.len();
    let gx = &gx[..n];
    let gy = &gy[..n];
    for i in 0..n {
        mag[i] = (gx[i] * gx[i] + gy[i] * gy[i]).sqrt();
    }
}
