//! spdx-writer: build and serialize SPDX 2.3 documents

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use spdx_writer::{
    cli,
    config::{self, AppConfig, Validatable},
    serialize::OutputFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "spdx-writer")]
#[command(version, about = "Build and serialize SPDX 2.3 documents", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Write the demo document as pretty JSON to stdout
    spdx-writer demo

    # Write it as tag-value to a file
    spdx-writer demo --format tag-value -O demo.spdx

    # Check identifiers against the SPDX license list
    spdx-writer check-license MIT Apache-2.0 LLVM-exception")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SPDX licenses.json to use instead of the built-in license tables
    #[arg(long, global = true, env = "SPDX_WRITER_LICENSE_LIST")]
    license_list: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `demo` subcommand
#[derive(Parser)]
struct DemoArgs {
    /// Document name
    #[arg(long, default_value = "spdx-writer-demo")]
    name: String,

    /// Output format
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Emit compact JSON
    #[arg(long)]
    compact: bool,

    /// Skip the validation pass
    #[arg(long)]
    no_validate: bool,

    /// Fail when validation reports warnings
    #[arg(long)]
    fail_on_warning: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a sample document and serialize it
    Demo(DemoArgs),

    /// Look up license and exception identifiers in the license registry
    CheckLicense {
        /// License or exception identifiers
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();

    let mut overrides = AppConfig::default();
    overrides.registry.license_list.clone_from(&cli.license_list);

    match cli.command {
        Commands::Demo(args) => {
            if let Some(format) = args.format {
                overrides.output.format = format;
            }
            overrides.output.pretty = !args.compact;
            overrides.output.file = args.output_file;
            overrides.validation.validate_before_write = !args.no_validate;
            overrides.validation.fail_on_warning = args.fail_on_warning;

            let config = load_config(cli.config.as_deref(), &overrides)?;
            cli::run_demo(&config, &args.name)
        }

        Commands::CheckLicense { ids } => {
            let config = load_config(cli.config.as_deref(), &overrides)?;
            cli::run_check_license(&config.registry, &ids)
        }

        Commands::ConfigSchema { output } => {
            let schema = config::generate_json_schema()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
            Ok(())
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "spdx-writer", &mut io::stdout());
            Ok(())
        }
    }
}

/// Load the config file, apply CLI overrides and validate the result
fn load_config(path: Option<&std::path::Path>, overrides: &AppConfig) -> Result<AppConfig> {
    let (config, loaded_from) = AppConfig::from_file_with_overrides(path, overrides);
    if let Some(path) = &loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }

    let errors = config.validate();
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        anyhow::bail!("invalid configuration:\n  {}", messages.join("\n  "));
    }
    Ok(config)
}
