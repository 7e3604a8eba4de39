// chessboard.rs — Synthetic chessboard test image.
//
// A pixel is white (255) when its square column and square row have the
// same parity, black (0) otherwise, so the top-left square is white:
//
//   ■■□□■■
//   ■■□□■■
//   □□■■□□      (■ = 255, square = 2)
//
// Every square boundary is a perfect step edge, which gives the Sobel
// extractor a dense, predictable set of nonzero gradients.

use crate::error::{GradMagError, Result};
use crate::image::Image;

/// Generate a `width`×`height` chessboard with `square`-pixel cells.
///
/// Fails with `InvalidArgument` if `square` is zero.
pub fn chessboard(width: usize, height: usize, square: usize) -> Result<Image<u8>> {
    if square == 0 {
        return Err(GradMagError::invalid("chessboard square size must be at least 1"));
    }
    let mut img = Image::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let is_white = (x / square) % 2 == (y / square) % 2;
            img.set(x, y, if is_white { 255 } else { 0 });
        }
    }
    Ok(img)
}
