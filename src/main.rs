// main.rs — `gradmag` command line.
//
//   gradmag run [--input input.pgm] [--output output_scalar.pgm] [--iterations 800]
//   gradmag chessboard [--output ajedrez.pgm] [--width 256] [--height 256] [--square 32]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use gradmag::config::{ChessboardConfig, PipelineConfig};
use gradmag::pipeline;

#[derive(Debug, Parser)]
#[command(name = "gradmag", version, about = "Sobel gradient magnitude benchmark")]
struct Cli {
    /// Log at DEBUG instead of INFO.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Time the magnitude kernel on a PGM image and write the result.
    Run {
        #[arg(long, default_value = "input.pgm")]
        input: PathBuf,
        #[arg(long, default_value = "output_scalar.pgm")]
        output: PathBuf,
        /// Copies of the image's gradients in the timed workload.
        #[arg(long, default_value_t = 800)]
        iterations: usize,
    },
    /// Write a synthetic chessboard PGM.
    Chessboard {
        #[arg(long, default_value = "ajedrez.pgm")]
        output: PathBuf,
        #[arg(long, default_value_t = 256)]
        width: usize,
        #[arg(long, default_value_t = 256)]
        height: usize,
        /// Side of one square in pixels.
        #[arg(long, default_value_t = 32)]
        square: usize,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let _ = tracing_subscriber::fmt().with_max_level(level).try_init();
}

fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run {
            input,
            output,
            iterations,
        } => {
            let config = PipelineConfig {
                input,
                output,
                iterations,
            };
            let report = pipeline::run(&config)
                .with_context(|| format!("processing {}", config.input.display()))?;
            println!(
                "Scalar kernel time: {:.6} s ({}x{} x {} iterations)",
                report.timing.elapsed.as_secs_f64(),
                report.width,
                report.height,
                report.iterations
            );
            println!("Wrote {}", config.output.display());
        }
        Command::Chessboard {
            output,
            width,
            height,
            square,
        } => {
            let config = ChessboardConfig {
                output,
                width,
                height,
                square,
            };
            pipeline::generate_chessboard(&config)
                .with_context(|| format!("writing {}", config.output.display()))?;
            println!("Wrote {}", config.output.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_defaults_match_config() {
        let cli = Cli::try_parse_from(["gradmag", "run"]).unwrap();
        let defaults = PipelineConfig::default();
        match cli.command {
            Command::Run {
                input,
                output,
                iterations,
            } => {
                assert_eq!(input, defaults.input);
                assert_eq!(output, defaults.output);
                assert_eq!(iterations, defaults.iterations);
            }
            other => panic!("parsed {other:?}"),
        }
    }

    #[test]
    fn test_chessboard_args() {
        let cli = Cli::try_parse_from([
            "gradmag", "-v", "chessboard", "--width", "64", "--square", "8",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Chessboard {
                width,
                height,
                square,
                ..
            } => assert_eq!((width, height, square), (64, 256, 8)),
            other => panic!("parsed {other:?}"),
        }
    }
}
