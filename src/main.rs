mod cli;
mod utils;

use std::path::Path;

use clap::Parser;

use audio_align::{Configuration, FittingOptions, Fingerprint};

fn fingerprint_file(source: &Path, sample_rate: u32) -> anyhow::Result<Fingerprint> {
    let pcm = audio_align::pcm::load_mono_pcm(source, sample_rate)?;
    let configuration = Configuration {
        sample_rate,
        ..Configuration::default()
    };
    let fingerprint = Fingerprint::new(&pcm.samples, configuration)?;
    Ok(fingerprint)
}

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    match cli.command {
        cli::Commands::Align { sample, reference } => {
            let pb = utils::progress_bar(2).map_err(|e| anyhow::anyhow!("{e}"))?;

            pb.set_message("fingerprinting reference");
            let reference_fp = fingerprint_file(&reference, cli.sample_rate)?;
            pb.inc(1);

            pb.set_message("fingerprinting sample");
            let sample_fp = fingerprint_file(&sample, cli.sample_rate)?;
            pb.inc(1);
            pb.finish_and_clear();

            let alignment = sample_fp.align(&reference_fp, FittingOptions::default())?;
            println!("estimated_time_offset: {:.6}s", alignment.estimated_time_offset);
        }

        cli::Commands::Dump { source, output } => {
            let fingerprint = fingerprint_file(&source, cli.sample_rate)?;

            let mut wtr = csv::Writer::from_path(&output)?;
            wtr.write_record(["frequency_a", "frequency_b", "position_delta", "anchor_position"])?;
            for ((freq_a, freq_b, delta), anchor) in &fingerprint.patterns {
                wtr.write_record(&[
                    freq_a.to_string(),
                    freq_b.to_string(),
                    delta.to_string(),
                    anchor.to_string(),
                ])?;
            }
            wtr.flush()?;
            println!("wrote {} patterns to {}", fingerprint.patterns.len(), output.display());
        }
    }

    Ok(())
}
