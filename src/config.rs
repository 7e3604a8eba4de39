// config.rs — Run parameters threaded through the pipeline.
//
// Nothing in the crate reads global state: the binary builds one of these
// from its command line and hands it down.

use std::path::PathBuf;

/// Parameters for one load → gradient → magnitude → write run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// PGM to read (P2 or P5).
    pub input: PathBuf,
    /// Where to write the display-mapped magnitude image (P2).
    pub output: PathBuf,
    /// Number of copies of the image's gradients in the timed workload.
    pub iterations: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            input: PathBuf::from("input.pgm"),
            output: PathBuf::from("output_scalar.pgm"),
            iterations: 800,
        }
    }
}

/// Parameters for the synthetic chessboard generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChessboardConfig {
    pub output: PathBuf,
    pub width: usize,
    pub height: usize,
    /// Side length of one square in pixels.
    pub square: usize,
}

impl Default for ChessboardConfig {
    fn default() -> Self {
        ChessboardConfig {
            output: PathBuf::from("ajedrez.pgm"),
            width: 256,
            height: 256,
            square: 32,
        }
    }
}
