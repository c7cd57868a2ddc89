// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use typepad_migrate::utils::logging::{
    format_error, format_mapping, format_success, format_warning, init_logger,
};
use typepad_migrate::{Config, MappingSet, MigrationPipeline};

const SUMMARY_ROWS: usize = 5;

#[derive(Parser)]
#[command(name = "typepad_migrate")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Rewrite Typepad export basenames and post URLs for WordPress", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct MigrationArgs {
    /// Host name of the old blog
    #[arg(long, env = "TYPEPAD_MIGRATE_OLD_DOMAIN")]
    old_domain: Option<String>,

    /// Host name of the new blog
    #[arg(long, env = "TYPEPAD_MIGRATE_NEW_DOMAIN")]
    new_domain: Option<String>,

    /// Path segment between the old domain and the date, e.g. `blog`
    #[arg(long)]
    old_path_prefix: Option<String>,

    #[arg(long, value_name = "FILE")]
    basename_mappings: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    url_replacements: Option<PathBuf>,

    /// Also write a JSON report of the run
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the mappings and rewrite the export
    Migrate {
        input: PathBuf,

        output: PathBuf,

        #[command(flatten)]
        args: MigrationArgs,

        /// Leave BASENAME lines as exported
        #[arg(long)]
        keep_basename_lines: bool,

        #[arg(long)]
        no_progress: bool,
    },

    /// Build and write the mapping tables without rewriting the export
    Plan {
        input: PathBuf,

        #[command(flatten)]
        args: MigrationArgs,

        #[arg(short, long, default_value_t = SUMMARY_ROWS)]
        limit: usize,
    },

    /// List old post urls left outside UNIQUE URL lines
    Check {
        file: PathBuf,

        #[arg(long, env = "TYPEPAD_MIGRATE_OLD_DOMAIN")]
        old_domain: Option<String>,

        #[arg(long)]
        old_path_prefix: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger(cli.color, cli.verbose);

    info!("Typepad basename migration");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    let result = match cli.command {
        Commands::Migrate {
            input,
            output,
            args,
            keep_basename_lines,
            no_progress,
        } => {
            let mut config = apply_overrides(config, args);
            if keep_basename_lines {
                config.migration.rewrite_basename_lines = false;
            }
            cmd_migrate(config, input, output, !no_progress, cli.color)
        }
        Commands::Plan { input, args, limit } => {
            cmd_plan(apply_overrides(config, args), input, limit)
        }
        Commands::Check {
            file,
            old_domain,
            old_path_prefix,
        } => {
            let args = MigrationArgs {
                old_domain,
                old_path_prefix,
                ..Default::default()
            };
            cmd_check(apply_overrides(config, args), file)
        }
    };

    if let Err(e) = result {
        eprintln!("{}", format_error(&format!("{:#}", e)));
        std::process::exit(1);
    }

    Ok(())
}

fn apply_overrides(mut config: Config, args: MigrationArgs) -> Config {
    if let Some(old_domain) = args.old_domain {
        config.migration.old_domain = old_domain;
    }
    if let Some(new_domain) = args.new_domain {
        config.migration.new_domain = new_domain;
    }
    if let Some(prefix) = args.old_path_prefix {
        config.migration.old_path_prefix = prefix;
    }
    if let Some(path) = args.basename_mappings {
        config.output.basename_mappings_file = path;
    }
    if let Some(path) = args.url_replacements {
        config.output.url_replacements_file = path;
    }
    if args.report.is_some() {
        config.output.report_file = args.report;
    }
    config
}

fn cmd_migrate(
    config: Config,
    input: PathBuf,
    output: PathBuf,
    show_progress: bool,
    colored: bool,
) -> Result<()> {
    info!(
        "Replacing URLs from '{}' to '{}'",
        config.migration.old_url_root(),
        config.migration.new_domain
    );

    let pipeline = MigrationPipeline::new(config).with_progress(show_progress, colored);
    let outcome = pipeline
        .run(&input, &output)
        .with_context(|| format!("Migration of {} failed", input.display()))?;

    print_mapping_summary(&outcome.mappings, SUMMARY_ROWS);

    let output_config = &pipeline.config().output;
    println!(
        "{}",
        format_success(&format!(
            "Processed {} and wrote results to {}",
            input.display(),
            output.display()
        ))
    );
    println!(
        "{}",
        format_success(&format!(
            "Created {} basename mappings (saved to {})",
            outcome.mappings.basenames.len(),
            output_config.basename_mappings_file.display()
        ))
    );
    println!(
        "{}",
        format_success(&format!(
            "Made {} URL replacements on {} lines (table saved to {})",
            outcome.rewrite.replacements,
            outcome.rewrite.rewritten_lines,
            output_config.url_replacements_file.display()
        ))
    );
    if let Some(report) = &output_config.report_file {
        println!(
            "{}",
            format_success(&format!("Report saved to {}", report.display()))
        );
    }

    if !outcome.mappings.skipped.is_empty() {
        println!(
            "{}",
            format_warning(&format!(
                "{} post(s) skipped without a mapping",
                outcome.mappings.skipped.len()
            ))
        );
    }
    print_root_mismatches(pipeline.config(), &outcome.mappings);
    if !outcome.unresolved.is_empty() {
        println!(
            "{}",
            format_warning(&format!(
                "{} old URL(s) have no mapping and were left unchanged",
                outcome.unresolved.len()
            ))
        );
    }

    Ok(())
}

fn cmd_plan(config: Config, input: PathBuf, limit: usize) -> Result<()> {
    let pipeline = MigrationPipeline::new(config);
    let outcome = pipeline
        .plan(&input)
        .with_context(|| format!("Planning {} failed", input.display()))?;

    print_mapping_summary(&outcome.mappings, limit);

    for skipped in &outcome.mappings.skipped {
        println!(
            "{}",
            format_warning(&format!(
                "line {}: {} ({})",
                skipped.line,
                skipped.old_basename.as_deref().unwrap_or("?"),
                skipped.reason
            ))
        );
    }

    print_root_mismatches(pipeline.config(), &outcome.mappings);

    for path in &outcome.written {
        println!("{}", format_success(&format!("Wrote {}", path.display())));
    }

    Ok(())
}

fn cmd_check(config: Config, file: PathBuf) -> Result<()> {
    let pipeline = MigrationPipeline::new(config);
    let remaining = pipeline
        .check(&file)
        .with_context(|| format!("Checking {} failed", file.display()))?;

    if remaining.is_empty() {
        println!(
            "{}",
            format_success(&format!("No old post URLs left in {}", file.display()))
        );
        return Ok(());
    }

    for link in &remaining {
        println!("{:>6}: {}", link.line, link.url);
    }

    Err(anyhow::anyhow!(
        "{} old post URL(s) remain in {}",
        remaining.len(),
        file.display()
    ))
}

fn print_root_mismatches(config: &Config, mappings: &MappingSet) {
    if mappings.root_mismatches == 0 {
        return;
    }
    println!(
        "{}",
        format_warning(&format!(
            "{} post URL(s) are not under http(s)://{}/ and their links were not mapped; set --old-path-prefix",
            mappings.root_mismatches,
            config.migration.old_url_root()
        ))
    );
}

fn print_mapping_summary(mappings: &MappingSet, limit: usize) {
    let basenames = mappings.basenames.entries();
    if !basenames.is_empty() {
        println!("\nBasename Mapping Summary:");
        for (i, entry) in basenames.iter().take(limit).enumerate() {
            println!(
                "\n{}",
                format_mapping(i + 1, &entry.title, &entry.old_basename, &entry.new_basename)
            );
        }
        if basenames.len() > limit {
            println!("\n... and {} more mappings", basenames.len() - limit);
        }
    }

    let urls = mappings.urls.entries();
    if !urls.is_empty() {
        println!("\nURL Replacement Summary:");
        for (i, (replacement, entry)) in urls.iter().zip(basenames).take(limit).enumerate() {
            println!(
                "\n{}",
                format_mapping(i + 1, &entry.title, &replacement.old_url, &replacement.new_url)
            );
        }
        if urls.len() > limit {
            println!("\n... and {} more replacements", urls.len() - limit);
        }
    }
    println!();
}
