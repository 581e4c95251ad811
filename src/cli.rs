use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// sample rate the fingerprinting core operates at; input audio is resampled to this
    #[arg(long, default_value_t = 16_000)]
    pub sample_rate: u32,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// estimates the time offset needed to shift `sample` onto `reference`
    Align { sample: PathBuf, reference: PathBuf },

    /// fingerprints a single file and dumps its patterns as CSV
    Dump { source: PathBuf, output: PathBuf },
}
