use indicatif::{ProgressBar, ProgressStyle};

/// Bar shown while routing paths into packages; hidden when `quiet`.
pub fn create_routing_bar(total: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Routing [{wide_bar:.cyan/blue}] {pos}/{len} files")
            .expect("Failed to create progress template")
            .progress_chars("#>-"),
    );
    pb
}

/// Spinner shown while walking an install root; hidden when `quiet`.
pub fn create_scan_spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("Failed to create spinner template"),
    );
    spinner.set_message(message.to_string());
    spinner
}
