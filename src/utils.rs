use indicatif::{ProgressBar, ProgressStyle};

/// A progress bar styled consistently across the CLI's subcommands.
pub fn progress_bar(pb_len: usize) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let style = ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")?
        .tick_chars("##-");
    let pb = ProgressBar::new(u64::try_from(pb_len)?);
    pb.set_style(style);
    Ok(pb)
}
