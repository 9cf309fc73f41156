//! `my-tools` — command-line entry point.
//!
//! `process` sequence:
//!   1. Load config (`~/.my-ai-tools/.env`, environment overrides)
//!   2. Init logger (CLI `-v` flags > `RUST_LOG` > config)
//!   3. Run the operation against the configured endpoint
//!   4. Copy the result to the clipboard, then show it in a dialog
//!
//! Any failure prints `Error: <message>` and exits with status 1.

use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use my_ai_tools::error::AppError;
use my_ai_tools::{AzureOpenAiProvider, DispatchError, Operation, TextProcessor, config, logger, output};

#[derive(Debug, Parser)]
#[command(name = "my-tools", version, about = "My Automator tools")]
struct Cli {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Process text content
    #[command(after_help = operations_help())]
    Process {
        /// Function to be executed (see the list below)
        function: String,

        /// Text to be operated on
        text: String,

        /// Do not show the result dialog
        #[arg(long)]
        no_dialog: bool,

        /// Do not copy the result to the clipboard
        #[arg(long)]
        no_clipboard: bool,

        /// Also print the result to stdout
        #[arg(long)]
        print: bool,
    },

    /// Configure the Azure OpenAI endpoint and API key
    #[cfg(feature = "setup")]
    Setup,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let cli_level = logger::level_for_verbosity(cli.verbose);

    match cli.command {
        Command::Process { function, text, no_dialog, no_clipboard, print } => {
            let config = config::load()?;
            logger::init(cli_level.unwrap_or(config.log_level.as_str()), cli_level.is_some())?;
            info!(api_url = %config.api_url, function = %function, "config loaded");

            let provider = AzureOpenAiProvider::from_config(&config).map_err(DispatchError::from)?;
            let processor = TextProcessor::new(provider);

            let spinner = spinner(&function);
            let result = processor.process(&function, &text).await;
            spinner.finish_and_clear();
            let result = result?;

            info!(result_len = result.len(), "completion received");

            if print {
                println!("{result}");
            }
            if !no_clipboard {
                output::copy_to_clipboard(&result).await?;
            }
            if !no_dialog {
                if let Err(e) = output::show_dialog(&result).await {
                    warn!(error = %e, "could not show result dialog");
                }
            }
            Ok(())
        }
        #[cfg(feature = "setup")]
        Command::Setup => {
            logger::init(cli_level.unwrap_or("warn"), cli_level.is_some())?;
            my_ai_tools::setup::run().map_err(|e| AppError::Setup(format!("{e:#}")))
        }
    }
}

/// The operation table printed under `process --help`.
fn operations_help() -> String {
    let mut help = String::from("Functions:");
    for op in Operation::ALL {
        help.push_str(&format!("\n  {:<17}{}", op.id(), op.description()));
    }
    help
}

/// Stderr spinner shown while the request is in flight; invisible when stderr
/// is not a terminal.
fn spinner(function: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("{function}…"));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
