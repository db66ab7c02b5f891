use anyhow::{Result, bail};
use clap::Subcommand;
use clap::builder::PossibleValuesParser;

use crate::api::AppState;
use crate::core::AppConfig;
use crate::core::SessionConfig;
use crate::core::settings::{SUPPORTED_MODELS, SettingsError, TokenKind, mask_api_key};

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Print the settings used for completions
    Show {},
    /// Validate and save new settings. Omitted values keep their
    /// current setting.
    Set {
        #[arg(long)]
        api_key: Option<String>,

        #[arg(long)]
        api_base_url: Option<String>,

        #[arg(long, value_parser = PossibleValuesParser::new(SUPPORTED_MODELS))]
        model: Option<String>,
    },
}

fn print_settings(config: &SessionConfig) {
    let token_kind = TokenKind::detect(&config.api_key);
    println!("API key:      {}", mask_api_key(&config.api_key));
    println!("API base URL: {}", config.api_base_url);
    println!("Model:        {}", config.model);
    println!("{}", token_kind.hint());
}

pub async fn run(config: AppConfig, command: SettingsCommand) -> Result<()> {
    let chat = AppState::load(config).await?.chat;
    let settings = chat.settings();

    match command {
        SettingsCommand::Show {} => print_settings(&settings.resolve()),
        SettingsCommand::Set {
            api_key,
            api_base_url,
            model,
        } => {
            let current = settings.resolve();
            let next = SessionConfig {
                api_key: api_key.unwrap_or(current.api_key),
                api_base_url: api_base_url.unwrap_or(current.api_base_url),
                model: model.unwrap_or(current.model),
            };

            match settings.save(next).await {
                Ok(()) => {
                    println!("Settings saved");
                    print_settings(&settings.resolve());
                }
                Err(SettingsError::Invalid(err)) => bail!("{}", err),
                Err(SettingsError::Store(err)) => return Err(err),
            }
        }
    }

    Ok(())
}
