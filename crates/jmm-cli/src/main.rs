//! Jmm compiler command-line driver
//!
//! Reads the parser's JSON tree for one compilation unit and runs the
//! engine on it: `check` reports diagnostics, `ollir` writes the IR text,
//! `build` writes both the IR and the Jasmin assembly.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jmmc")]
#[command(about = "Jmm compiler: semantic checks, OLLIR and Jasmin", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to jmm.toml next to the input)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Colored output: auto, always, never
    #[arg(long, global = true)]
    color: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run semantic analysis and report diagnostics
    Check {
        /// JSON tree produced by the parser
        file: PathBuf,
        /// Diagnostic format: text or json
        #[arg(long)]
        format: Option<String>,
        /// Jmm source the tree was parsed from, for annotated diagnostics
        #[arg(long)]
        source: Option<PathBuf>,
    },

    /// Lower to OLLIR
    Ollir {
        /// JSON tree produced by the parser
        file: PathBuf,
        /// Output directory
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
        /// Print to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Lower to OLLIR and generate Jasmin
    Build {
        /// JSON tree produced by the parser
        file: PathBuf,
        /// Output directory
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
        /// Jmm source the tree was parsed from, for annotated diagnostics
        #[arg(long)]
        source: Option<PathBuf>,
        /// Never rewrite `x = x + k` into `iinc`
        #[arg(long)]
        no_increment_fusion: bool,
        /// Emit code even when semantic analysis reports errors
        #[arg(long)]
        continue_on_error: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(cli.verbose, cli.quiet, cli.log_format) {
        eprintln!("failed to set up logging: {e}");
    }

    let color = output::resolve_color_choice(cli.color.as_deref());
    let result = run(cli, color);

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let mut out = output::StyledOutput::new(color);
            out.stderr_error("error");
            eprintln!(": {e:#}");
            std::process::exit(2);
        }
    }
}

fn run(cli: Cli, color: termcolor::ColorChoice) -> Result<i32> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Check {
            file,
            format,
            source,
        } => {
            let mut config = commands::load_config(config_path, &file)?;
            if let Some(format) = format {
                config.output.diagnostics_format = commands::parse_format(&format)?;
            }
            commands::check::execute(&file, source.as_deref(), &config, color)
        }

        Commands::Ollir {
            file,
            out_dir,
            stdout,
        } => {
            let mut config = commands::load_config(config_path, &file)?;
            config.codegen.emit_ollir = true;
            config.codegen.emit_jasmin = false;
            if out_dir.is_some() {
                config.output.dir = out_dir;
            }
            let target = if stdout {
                commands::build::Target::Stdout
            } else {
                commands::build::Target::Files
            };
            commands::build::execute(&file, None, &config, target, color)
        }

        Commands::Build {
            file,
            out_dir,
            source,
            no_increment_fusion,
            continue_on_error,
        } => {
            let mut config = commands::load_config(config_path, &file)?;
            if out_dir.is_some() {
                config.output.dir = out_dir;
            }
            if no_increment_fusion {
                config.codegen.increment_fusion = false;
            }
            if continue_on_error {
                config.check.continue_on_error = true;
            }
            commands::build::execute(
                &file,
                source.as_deref(),
                &config,
                commands::build::Target::Files,
                color,
            )
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool, log_format: LogFormat) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if let Ok(filter) = EnvFilter::try_from_env("JMM_LOG") {
        filter
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let formatter = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_level(true);

    match log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(formatter)
            .with(filter)
            .try_init()?,
        LogFormat::Json => tracing_subscriber::registry()
            .with(formatter.json())
            .with(filter)
            .try_init()?,
    }

    Ok(())
}
