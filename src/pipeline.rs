// pipeline.rs — End-to-end runs.
//
//   read_pgm ──► Workload::from_luminance ──► run_timed ──► write_magnitude
//   (Io/Format)   (Sobel + replicate)          (kernel)      (tile 0 only)
//
// Any loader error stops the run before buffers are allocated, and an empty
// image is rejected before the kernel sees it.

use tracing::info;

use crate::chessboard::chessboard;
use crate::config::{ChessboardConfig, PipelineConfig};
use crate::error::{GradMagError, Result};
use crate::pgm::{read_pgm, write_magnitude, write_pgm};
use crate::workload::{KernelTiming, Workload};

/// Summary of a completed pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub width: usize,
    pub height: usize,
    pub iterations: usize,
    pub timing: KernelTiming,
}

/// Load `config.input`, time the magnitude kernel over the replicated
/// workload and write the first tile to `config.output`.
pub fn run(config: &PipelineConfig) -> Result<RunReport> {
    let lum = read_pgm(&config.input)?;
    if lum.is_empty() {
        return Err(GradMagError::invalid(format!(
            "{} holds an empty {}×{} image",
            config.input.display(),
            lum.width(),
            lum.height()
        )));
    }
    info!(
        input = %config.input.display(),
        width = lum.width(),
        height = lum.height(),
        iterations = config.iterations,
        "building workload"
    );

    let mut workload = Workload::from_luminance(&lum, config.iterations)?;
    let timing = workload.run_timed()?;

    write_magnitude(
        &config.output,
        workload.first_tile(),
        workload.width(),
        workload.height(),
    )?;
    info!(output = %config.output.display(), "magnitude image written");

    Ok(RunReport {
        width: workload.width(),
        height: workload.height(),
        iterations: workload.iterations(),
        timing,
    })
}

/// Write a synthetic chessboard as P2 (raw 0/255 samples, no scaling).
pub fn generate_chessboard(config: &ChessboardConfig) -> Result<()> {
    let img = chessboard(config.width, config.height, config.square)?;
    write_pgm(&config.output, &img)?;
    info!(
        output = %config.output.display(),
        width = config.width,
        height = config.height,
        square = config.square,
        "chessboard written"
    );
    Ok(())
}
