use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

mod commands;

#[derive(Parser)]
#[command(name = "ledgermatch", version, about = "Match receipts to bank transactions")]
struct Cli {
    /// Log output format (logs always go to stderr).
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Raise the default log level to debug. `RUST_LOG` takes precedence.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile a match request (`{"receipts": [...], "transactions": [...]}`).
    Match {
        /// Request JSON file; `-` reads stdin.
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
        /// Write the report here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// TOML file overriding weights and thresholds.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the assignment strategy from the config file.
        #[arg(long)]
        strategy: Option<ledgermatch_matching::AssignmentStrategy>,
        /// Pretty-print the report.
        #[arg(long)]
        pretty: bool,
    },
    /// Print the default configuration as TOML.
    Config,
}

fn init_tracing(format: LogFormat, verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let result = match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| e.to_string()),
        LogFormat::Json => {
            use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
            let subscriber = Registry::default()
                .with(filter)
                .with(JsonStorageLayer)
                .with(BunyanFormattingLayer::new("ledgermatch".into(), std::io::stderr));
            tracing::subscriber::set_global_default(subscriber).map_err(|e| e.to_string())
        }
    };
    if let Err(e) = result {
        eprintln!("Failed to initialise logging: {e}");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_format, cli.verbose);

    let result = match cli.command {
        Command::Match {
            input,
            output,
            config,
            strategy,
            pretty,
        } => commands::run_match(&commands::MatchArgs {
            input,
            output,
            config,
            strategy,
            pretty,
        }),
        Command::Config => commands::print_default_config(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
