use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod chat;
pub mod init;
pub mod serve;
pub mod settings;

use crate::core::AppConfig;
use settings::SettingsCommand;

#[derive(Subcommand)]
enum Command {
    /// Create the storage directory and database
    Init {},
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// Start an interactive chat session
    Chat {
        /// Channel to start in. Created if it doesn't exist.
        #[arg(long)]
        channel: Option<String>,
    },
    /// Show or update the API settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

fn init_tracing(default_filter: String) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    let config = AppConfig::default();

    // Handle each sub command
    match args.command {
        Some(Command::Init {}) => {
            init_tracing(format!("{}=info", env!("CARGO_CRATE_NAME")));
            init::run(&config).await?;
        }
        Some(Command::Serve { host, port }) => {
            // axum logs rejections from built-in extractors with the
            // `axum::rejection` target, at `TRACE` level
            init_tracing(format!(
                "{}=debug,tower_http=debug,axum::rejection=trace",
                env!("CARGO_CRATE_NAME")
            ));
            serve::run(host, port, config).await?;
        }
        Some(Command::Chat { channel }) => {
            init_tracing(format!("{}=warn", env!("CARGO_CRATE_NAME")));
            chat::run(config, channel).await?;
        }
        Some(Command::Settings { command }) => {
            init_tracing(format!("{}=warn", env!("CARGO_CRATE_NAME")));
            settings::run(config, command).await?;
        }
        None => {}
    }

    Ok(())
}
