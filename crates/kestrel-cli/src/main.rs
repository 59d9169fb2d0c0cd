use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use kestrel_cli::{OutputFormat, StrategyArg, commands};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kestrel")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "A CLI tool for normalizing page-speed data and building analysis workbooks",
    long_about = "Kestrel turns PageSpeed Insights lab runs, Chrome UX Report field data and \
                  browser network captures into one normalized model, and renders it as a \
                  four-sheet spreadsheet report."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the analysis workbook from a collected data bundle
    Report {
        /// Path to the bundle JSON
        #[arg(value_name = "BUNDLE")]
        bundle: PathBuf,

        /// Directory the workbook is written to
        #[arg(long, env = "KESTREL_OUTPUT_DIR", default_value = "./output")]
        output_dir: PathBuf,

        /// Job identifier prefixed to the workbook file name
        #[arg(long, env = "KESTREL_JOB_ID")]
        job_id: Option<String>,
    },

    /// Normalize a PageSpeed Insights response
    Lab {
        /// Path to the PSI JSON
        #[arg(value_name = "PSI_JSON")]
        file: PathBuf,

        /// Strategy the response was captured with
        #[arg(long, value_enum, default_value = "mobile")]
        strategy: StrategyArg,
    },

    /// Normalize a Chrome UX Report record
    Field {
        /// Path to the CrUX JSON
        #[arg(value_name = "CRUX_JSON")]
        file: PathBuf,
    },

    /// Summarize a browser network capture
    Network {
        /// Path to the capture JSON
        #[arg(value_name = "CAPTURE_JSON")]
        file: PathBuf,
    },

    /// Generate shell completion scripts
    #[command(after_help = "SUPPORTED SHELLS:
    bash, zsh, fish, powershell, elvish

INSTALLATION:
    Bash:
        kestrel completion --shell bash >> ~/.bashrc

    Zsh:
        kestrel completion --shell zsh > \"${fpath[1]}/_kestrel\"
        # or add to ~/.zshrc:
        eval \"$(kestrel completion --shell zsh)\"

    Fish:
        kestrel completion --shell fish > ~/.config/fish/completions/kestrel.fish

    PowerShell:
        kestrel completion --shell powershell >> $PROFILE")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);
    tracing::debug!("Output format: {}", cli.format.as_str());

    match cli.command {
        Commands::Report {
            bundle,
            output_dir,
            job_id,
        } => commands::report::execute(&bundle, output_dir, job_id, cli.format),
        Commands::Lab { file, strategy } => {
            commands::lab::execute(&file, strategy.into(), cli.format)
        }
        Commands::Field { file } => commands::field::execute(&file, cli.format),
        Commands::Network { file } => commands::network::execute(&file, cli.format),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("kestrel=debug,kestrel_core=debug,kestrel_report=debug")
    } else {
        EnvFilter::new("kestrel=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
