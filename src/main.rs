use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use promptspec::analysis::{AnalysisOptions, in_guarded_step};
use promptspec::cli::ReportFormat;
use promptspec::cli::commands::{analyze, batch, config, score};
use promptspec::constants::batch::DEFAULT_CONCURRENCY;

#[derive(Parser)]
#[command(name = "promptspec")]
#[command(
    version,
    about = "Turn prompts into structured specs, score them and suggest fixes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, global = true, help = "Use this config file instead of the layered chain")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Draft a specification, detect gaps and propose patches
    Analyze {
        #[arg(help = "Prompt text; read from stdin when omitted or '-'")]
        prompt: Option<String>,
        #[arg(short = 'd', long, help = "Domain: code, docs, data, product, research")]
        domain: Option<String>,
        #[arg(long, help = "Skip structural validation")]
        no_validation: bool,
        #[arg(long, help = "Skip patch suggestions")]
        no_improvements: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json, yaml"
        )]
        format: ReportFormat,
    },

    /// Show per-signal clarity and completeness tables
    Score {
        #[arg(help = "Prompt text; read from stdin when omitted or '-'")]
        prompt: Option<String>,
        #[arg(short = 'd', long)]
        domain: Option<String>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json, yaml"
        )]
        format: ReportFormat,
    },

    /// Analyze a file of prompts, one per line
    Batch {
        file: PathBuf,
        #[arg(short = 'd', long)]
        domain: Option<String>,
        #[arg(short = 'j', long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json, yaml"
        )]
        format: ReportFormat,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json, yaml"
        )]
        format: ReportFormat,
    },
    /// Show configuration file paths
    Path,
    /// Write a default configuration file
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        // Recovered by the pipeline guard, which logs the fault itself
        if in_guarded_step() {
            return;
        }

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mpromptspec encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Analyze {
            prompt,
            domain,
            no_validation,
            no_improvements,
            format,
        } => {
            analyze::run(
                analyze::AnalyzeArgs {
                    prompt,
                    domain,
                    options: AnalysisOptions {
                        include_validation: !no_validation,
                        include_improvements: !no_improvements,
                    },
                    format,
                },
                config_path,
            )?;
        }
        Commands::Score {
            prompt,
            domain,
            format,
        } => {
            score::run(prompt, domain.as_deref(), format, config_path)?;
        }
        Commands::Batch {
            file,
            domain,
            concurrency,
            format,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(batch::run(&file, domain, concurrency, format, config_path))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => config::show(format, config_path)?,
            ConfigAction::Path => config::path()?,
            ConfigAction::Init { global, force } => config::init(global, force)?,
        },
    }

    Ok(())
}
