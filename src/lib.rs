// gradmag: scalar Sobel gradient-magnitude kernel
//
// The kernel (magnitude.rs) computes sqrt(Gx² + Gy²) over large, aligned
// f32 buffers. Everything around it exists to feed and measure it:
// PGM I/O, Sobel extraction, a synthetic chessboard and a replicated
// workload for stable timings.

pub mod error;
pub mod buffer;
pub mod image;
pub mod pgm;
pub mod gradient;
pub mod magnitude;
pub mod workload;
pub mod chessboard;
pub mod config;
pub mod pipeline;

pub use error::{GradMagError, Result};
