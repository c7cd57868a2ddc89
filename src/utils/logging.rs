// file: src/utils/logging.rs
// description: Tracing subscriber initialization and colored console summaries

use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// `RUST_LOG` wins over the verbosity flag when set.
pub fn init_logger(colored_output: bool, verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .compact()
        .with_ansi(colored_output);

    colored::control::set_override(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

/// Numbered `old -> new` summary row, e.g. `  1. a_day_in_the_l -> a-day-in-the-life-revisited`.
pub fn format_mapping(index: usize, title: &str, old: &str, new: &str) -> String {
    format!(
        "{:3}. {}\n     {} {}\n     {} {}",
        index,
        title.bold(),
        "old:".dimmed(),
        old,
        "new:".dimmed(),
        new.cyan()
    )
}
