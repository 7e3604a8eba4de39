// gradient.rs — Image gradients via the 3×3 Sobel operator.
//
// Masks (row = ky, column = kx, centre at [1][1]):
//
//   SOBEL_X            SOBEL_Y
//   [-1  0  1]         [ 1  2  1]
//   [-2  0  2]         [ 0  0  0]
//   [-1  0  1]         [-1 -2 -1]
//
// Gx is positive where intensity increases to the right. Gy is positive
// where intensity increases *upward* (the row above is weighted +1).
//
// BORDER HANDLING: none. Only interior pixels (1 <= x < w-1, 1 <= y < h-1)
// are written. The one-pixel frame keeps whatever the destination buffer
// already held, which is zero for freshly allocated buffers. Images with
// fewer than 3 rows or columns have no interior and are left untouched.
//
// Each 3×3 window is accumulated in f32, row by row (ky outer, kx inner),
// so results are bit-reproducible across runs and platforms.

use crate::error::{GradMagError, Result};
use crate::image::{Image, Pixel};

/// Horizontal-derivative Sobel mask.
pub const SOBEL_X: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];

/// Vertical-derivative Sobel mask.
pub const SOBEL_Y: [[f32; 3]; 3] = [[1.0, 2.0, 1.0], [0.0, 0.0, 0.0], [-1.0, -2.0, -1.0]];

/// Write Sobel gradients of `src` into the first `width * height` elements
/// of `gx` and `gy`, leaving border indices untouched.
///
/// Fails with `InvalidArgument` if either destination is shorter than the
/// image. Elements past `width * height` are never touched either.
pub fn sobel_into<T: Pixel>(src: &Image<T>, gx: &mut [f32], gy: &mut [f32]) -> Result<()> {
    let n = src.len();
    if gx.len() < n || gy.len() < n {
        return Err(GradMagError::invalid(format!(
            "gradient buffers (gx: {}, gy: {}) shorter than {}×{} image",
            gx.len(),
            gy.len(),
            src.width(),
            src.height()
        )));
    }
    sobel_interior(src, &mut gx[..n], &mut gy[..n]);
    Ok(())
}

/// Compute both gradients into fresh zero-initialised images.
pub fn sobel_xy<T: Pixel>(src: &Image<T>) -> (Image<f32>, Image<f32>) {
    let mut gx = Image::<f32>::new(src.width(), src.height());
    let mut gy = Image::<f32>::new(src.width(), src.height());
    sobel_interior(src, gx.as_mut_slice(), gy.as_mut_slice());
    (gx, gy)
}

/// Shared loop. `gx` and `gy` are exactly `src.len()` long.
fn sobel_interior<T: Pixel>(src: &Image<T>, gx: &mut [f32], gy: &mut [f32]) {
    let w = src.width();
    let h = src.height();
    if w < 3 || h < 3 {
        return;
    }

    for y in 1..h - 1 {
        let rows = [src.row(y - 1), src.row(y), src.row(y + 1)];
        for x in 1..w - 1 {
            let mut sum_x = 0.0f32;
            let mut sum_y = 0.0f32;
            for (ky, row) in rows.iter().enumerate() {
                for kx in 0..3 {
                    let p = row[x + kx - 1].to_f32();
                    sum_x += p * SOBEL_X[ky][kx];
                    sum_y += p * SOBEL_Y[ky][kx];
                }
            }
            gx[y * w + x] = sum_x;
            gy[y * w + x] = sum_y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_gradient() {
        // Vertical step edge: left half = 0, right half = 100.
        let mut img = Image::<u8>::new(20, 10);
        for y in 0..10 {
            for x in 10..20 {
                img.set(x, y, 100);
            }
        }

        let (gx, gy) = sobel_xy(&img);

        // Columns 9 and 10 straddle the edge: 4 * (100 - 0).
        assert_eq!(gx.get(9, 5), 400.0);
        assert_eq!(gx.get(10, 5), 400.0);
        assert_eq!(gx.get(5, 5), 0.0);
        assert_eq!(gx.get(15, 5), 0.0);
        // No vertical variation anywhere.
        assert!(gy.pixels().all(|(_, _, v)| v == 0.0));
    }

    #[test]
    fn test_vertical_gradient_sign() {
        // Horizontal step edge: top half = 0, bottom half = 100.
        // The row above carries +1, so brighter-below is negative.
        let mut img = Image::<u8>::new(10, 20);
        for y in 10..20 {
            for x in 0..10 {
                img.set(x, y, 100);
            }
        }

        let (gx, gy) = sobel_xy(&img);
        assert_eq!(gy.get(5, 10), -400.0);
        assert_eq!(gy.get(5, 5), 0.0);
        assert!(gx.pixels().all(|(_, _, v)| v == 0.0));
    }

    #[test]
    fn test_constant_image_zero_gradient() {
        let img = Image::from_vec(10, 10, vec![128u8; 100]);
        let (gx, gy) = sobel_xy(&img);

        for (x, y, v) in gx.pixels() {
            assert_eq!(v, 0.0, "Gx nonzero at ({x},{y})");
        }
        for (x, y, v) in gy.pixels() {
            assert_eq!(v, 0.0, "Gy nonzero at ({x},{y})");
        }
    }

    #[test]
    fn test_linear_horizontal_ramp() {
        // value = x: each mask row sees a difference of 2, weighted 1+2+1.
        let mut img = Image::<f32>::new(20, 10);
        for y in 0..10 {
            for x in 0..20 {
                img.set(x, y, x as f32);
            }
        }

        let (gx, gy) = sobel_xy(&img);
        for y in 1..9 {
            for x in 1..19 {
                assert_eq!(gx.get(x, y), 8.0, "Gx at ({x},{y})");
                assert_eq!(gy.get(x, y), 0.0, "Gy at ({x},{y})");
            }
        }
    }

    #[test]
    fn test_border_left_untouched() {
        let img = Image::from_vec(5, 4, (0..20).map(|v| (v * v) as f32).collect());
        let mut gx = vec![7.0f32; 20];
        let mut gy = vec![-3.0f32; 20];
        sobel_into(&img, &mut gx, &mut gy).unwrap();

        for y in 0..4 {
            for x in 0..5 {
                if x == 0 || x == 4 || y == 0 || y == 3 {
                    assert_eq!(gx[y * 5 + x], 7.0, "Gx border ({x},{y}) touched");
                    assert_eq!(gy[y * 5 + x], -3.0, "Gy border ({x},{y}) touched");
                }
            }
        }
    }

    #[test]
    fn test_extra_capacity_untouched() {
        let img = Image::from_vec(3, 3, vec![0.0, 0.0, 9.0, 0.0, 0.0, 9.0, 0.0, 0.0, 9.0]);
        let mut gx = vec![1.0f32; 12];
        let mut gy = vec![1.0f32; 12];
        sobel_into(&img, &mut gx, &mut gy).unwrap();
        assert_eq!(gx[4], 36.0);
        assert_eq!(&gx[9..], &[1.0, 1.0, 1.0]);
        assert_eq!(&gy[9..], &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_too_small_has_no_interior() {
        let img = Image::from_vec(2, 5, vec![50.0f32; 10]);
        let mut gx = vec![5.0f32; 10];
        let mut gy = vec![5.0f32; 10];
        sobel_into(&img, &mut gx, &mut gy).unwrap();
        assert!(gx.iter().chain(gy.iter()).all(|&v| v == 5.0));
    }

    #[test]
    fn test_short_buffer_rejected() {
        let img = Image::<f32>::new(4, 4);
        let mut gx = vec![0.0f32; 16];
        let mut gy = vec![0.0f32; 15];
        let err = sobel_into(&img, &mut gx, &mut gy).unwrap_err();
        assert!(matches!(err, GradMagError::InvalidArgument(_)));
    }
}
