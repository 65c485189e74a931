use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use common::config::{BooleanConfig, DecimateConfig, InfillConfig, InfillPattern, OffsetConfig};
use polyslice::format::Format;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Parser)]
/// polyslice command line interface.
pub struct Args {
    #[arg(value_enum)]
    /// Operation to run on the input shapes.
    pub operation: Operation,
    /// JSON file with the operand shapes, `{ "a": {..}, "b": {..} }`.
    pub input: PathBuf,
    /// File to save the result to.
    pub output: PathBuf,
    #[arg(long)]
    /// Output format, guessed from the output extension when missing.
    pub format: Option<Format>,

    #[arg(long, default_value_t = 1)]
    /// Winding depth at which a point counts as inside A.
    pub min_depth_a: i32,
    #[arg(long, default_value_t = 1)]
    /// Winding depth at which a point counts as inside B.
    pub min_depth_b: i32,

    #[arg(long, default_value_t = -0.4, allow_negative_numbers = true)]
    /// Offset distance, negative shrinks the shapes.
    pub distance: f64,
    #[arg(long, default_value_t = 0.01)]
    /// Offset and decimation tolerance.
    pub tolerance: f64,

    #[arg(long, default_value_t = InfillPattern::Linear)]
    /// Infill pattern, `linear` or `grid`.
    pub pattern: InfillPattern,
    #[arg(long, default_value_t = 45.0, allow_negative_numbers = true)]
    /// Infill line angle in degrees.
    pub angle: f64,
    #[arg(long, default_value_t = 0.4)]
    /// Infill line spacing at full density.
    pub spacing: f64,
    #[arg(long, default_value_t = 0.2)]
    /// Infill density in (0, 1].
    pub density: f64,
    #[arg(long)]
    /// Put infill lines on multiples of the spacing.
    pub parity: bool,
    #[arg(long)]
    /// Join the ends of successive infill lines.
    pub connect_lines: bool,

    #[arg(short, long, action = clap::ArgAction::Count)]
    /// Log more, repeat for even more.
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Operation {
    Union,
    Intersection,
    Difference,
    FullDifference,
    Offset,
    Decimate,
    Infill,
}

impl Args {
    pub fn boolean_config(&self) -> BooleanConfig {
        BooleanConfig {
            min_depth_a: self.min_depth_a,
            min_depth_b: self.min_depth_b,
        }
    }

    pub fn offset_config(&self) -> OffsetConfig {
        OffsetConfig {
            distance: self.distance,
            tolerance: self.tolerance,
        }
    }

    pub fn decimate_config(&self) -> DecimateConfig {
        DecimateConfig {
            tolerance: self.tolerance,
        }
    }

    pub fn infill_config(&self) -> InfillConfig {
        InfillConfig {
            pattern: self.pattern,
            angle: self.angle,
            spacing: self.spacing,
            density: self.density,
            parity: self.parity,
            connect_lines: self.connect_lines,
            min_depth: self.min_depth_a,
        }
    }

    pub fn output_format(&self) -> Option<Format> {
        self.format.or_else(|| {
            let extension = self.output.extension()?.to_string_lossy();
            Format::from_extension(&extension)
        })
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}
