//! wolfies-whatsapp - bulk WhatsApp Desktop sender
//!
//! Imports numbers from a spreadsheet, normalizes them to +92 format and
//! drives WhatsApp Desktop through WinAppDriver to send one message each.
//!
//! CHANGELOG:
//! - 10/16/2026 - Added --dry-run and settings overrides on send
//! - 10/16/2026 - Initial CLI

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use wolfies_whatsapp::commands;
use wolfies_whatsapp::commands::send::SendRequest;
use wolfies_whatsapp::config::Settings;
use wolfies_whatsapp::message::{ImageAttachment, ImageMode};
use wolfies_whatsapp::output::{self, OutputControls};

/// Bulk WhatsApp Desktop sender driven by a spreadsheet of phone numbers.
#[derive(Parser, Debug)]
#[command(name = "wolfies-whatsapp")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Compact JSON output (no whitespace)
    #[arg(long, global = true)]
    compact: bool,

    /// More detail: -v shows every automation step, -vv enables debug tracing
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file (defaults to $WHATSAPP_AUTOMATOR_CONFIG or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a spreadsheet and list the numbers that would be messaged
    Load {
        /// .xlsx/.xls/.ods workbook or .csv file
        file: PathBuf,
    },

    /// Find the installed WhatsApp Desktop
    Locate {
        /// Explicit WhatsApp.exe path or package family id
        #[arg(long)]
        app: Option<String>,
    },

    /// Send a message to every number in a spreadsheet
    Send {
        /// .xlsx/.xls/.ods workbook or .csv file
        file: PathBuf,

        /// Message text (%PHONE% and %DATE% are substituted)
        message: Vec<String>,

        /// Read the message from a file instead
        #[arg(long, conflicts_with = "message")]
        message_file: Option<PathBuf>,

        /// Image to attach
        #[arg(long)]
        image: Option<PathBuf>,

        /// Where the image goes relative to the text
        #[arg(long, value_enum, default_value_t = ImageMode::None)]
        image_mode: ImageMode,

        /// Validate and list recipients without touching WhatsApp
        #[arg(long)]
        dry_run: bool,

        /// Explicit WhatsApp.exe path or package family id
        #[arg(long)]
        app: Option<String>,

        /// WinAppDriver endpoint
        #[arg(long)]
        driver_url: Option<String>,

        /// Pause after every click/keystroke
        #[arg(long)]
        step_delay_ms: Option<u64>,
    },

    /// Show the effective settings
    Config,
}

fn load_settings(path: Option<&PathBuf>) -> anyhow::Result<Settings> {
    match path {
        Some(path) => Settings::load(path),
        None => Settings::load_default(),
    }
}

fn run(cli: Cli, output: &OutputControls) -> anyhow::Result<()> {
    let mut settings = load_settings(cli.config.as_ref())?;

    match cli.command {
        Command::Load { file } => commands::load::run(&file, output),
        Command::Locate { app } => {
            if app.is_some() {
                settings.app_path = app;
            }
            commands::locate::run(&settings, output)
        }
        Command::Send {
            file,
            message,
            message_file,
            image,
            image_mode,
            dry_run,
            app,
            driver_url,
            step_delay_ms,
        } => {
            if app.is_some() {
                settings.app_path = app;
            }
            if let Some(url) = driver_url {
                settings.driver_url = url;
            }
            if let Some(ms) = step_delay_ms {
                settings.step_delay_ms = ms;
            }

            let request = SendRequest {
                file,
                message: (!message.is_empty()).then(|| message.join(" ")),
                message_file,
                image: ImageAttachment {
                    mode: image_mode,
                    path: image,
                },
                dry_run,
            };
            commands::send::run(&request, &settings, output)
        }
        Command::Config => commands::config::show(&settings, output),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let output_controls = OutputControls {
        json: cli.json,
        compact: cli.compact,
        verbose: cli.verbose > 0,
    };

    match run(cli, &output_controls) {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            if output_controls.json {
                println!("{}", output::format_error(&format!("{:#}", e)));
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::from(1)
        }
    }
}
