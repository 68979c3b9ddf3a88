use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar over `len` items; hidden unless running in tui mode.
pub(crate) fn progress_bar(len: usize, msg: &str, tui: bool) -> anyhow::Result<ProgressBar> {
    if !tui {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(len as u64).with_style(
        ProgressStyle::default_bar()
            .template(
                "{msg} {spinner:.magenta}\n\
                [{elapsed_precise:.magenta}] |{bar:40.cyan/blue}| {human_pos}/{human_len} \
                [Rate: {per_sec:.magenta}, ETA: {eta:.blue}]",
            )?
            .progress_chars("##-"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Spinner for steps of unknown length.
pub(crate) fn spinner(msg: &str, tui: bool) -> anyhow::Result<ProgressBar> {
    if !tui {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new_spinner().with_style(
        ProgressStyle::default_spinner().template("{msg} {spinner:.magenta} [{elapsed:.magenta}]")?,
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

pub(crate) fn banner(name: &str, tui: bool) {
    if tui {
        println!("{bar}\n{name:^40}\n{bar}", bar = "=".repeat(40));
    }
}
