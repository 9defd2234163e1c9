// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use geocam::app::AppModel;
use geocam::i18n;

mod cli;

#[derive(Parser)]
#[command(name = "geocam")]
#[command(about = "Capture photos tagged with their location")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture one photo, tag it with the current location and save it
    Capture {
        /// Album to save into (default: the configured album, "Camera")
        #[arg(short, long)]
        album: Option<String>,

        /// Use the front camera instead of the configured one
        #[arg(long)]
        front: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG to control the log level
    // Examples: RUST_LOG=debug, RUST_LOG=geocam=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Capture { album, front }) => cli::capture(album, front),
        None => run_gui(),
    }
}

fn run_gui() -> Result<(), Box<dyn std::error::Error>> {
    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    let settings = cosmic::app::Settings::default().size_limits(
        cosmic::iced::Limits::NONE
            .min_width(360.0)
            .min_height(560.0),
    );

    cosmic::app::run::<AppModel>(settings, ())?;

    Ok(())
}
