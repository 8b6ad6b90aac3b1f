//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod model_list;
pub mod say;
pub mod settings;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::model_list::list_models;
use crate::cli::say::run_say;
use crate::cli::settings::{apply_set, unset_setting, SetCommand};
use crate::core::config::{resolve_from_env, Config};
use crate::ui::chat_loop::run_chat;
use crate::ui::theme::Theme;
use crate::utils::logging::{init_tracing, LogTarget};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    " for ",
    env!("VERGEN_CARGO_TARGET_TRIPLE"),
    ")"
);

#[derive(Parser)]
#[command(name = "mindease")]
#[command(version = VERSION)]
#[command(about = "A terminal companion for supportive conversations")]
#[command(
    long_about = "MindEase is a full-screen terminal chat client for a supportive-listening \
model backend. It shows which model answered each message and lets you switch the \
backend's active model during a conversation.\n\n\
Environment Variables:\n\
  MINDEASE_BASE_URL   Backend address (default http://localhost:8000)\n\
  MINDEASE_MODEL      Model assumed active until the backend reports one\n\
  MINDEASE_LOG        Log filter directives, e.g. debug or mindease=trace\n\n\
Controls:\n\
  Enter             Send the message\n\
  Tab               Open or close the model picker\n\
  Up/Down           Scroll, or move the picker selection\n\
  PageUp/PageDown   Scroll faster\n\
  Esc               Close the model picker\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model assumed active until the backend reports one
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Backend base URL
    #[arg(short = 'u', long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Write diagnostic logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send one message and print the reply
    Say {
        /// Message to send (multiple words are joined with spaces)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// List the models the backend offers
    Models,
    /// Set a configuration value, or print the configuration when no value is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Option<Vec<String>>,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let command = args.command.unwrap_or(Commands::Chat);
    let interactive = command == Commands::Chat;
    init_tracing(LogTarget::for_command(args.log_file.as_deref(), interactive))?;

    match command {
        Commands::Chat => {
            let config = Config::load()?;
            let settings = resolve_from_env(&config, args.base_url.as_deref(), args.model.as_deref());
            let theme = Theme::from_name(config.theme.as_deref());
            run_chat(settings, theme).await
        }
        Commands::Say { prompt } => {
            let config = Config::load()?;
            let settings = resolve_from_env(&config, args.base_url.as_deref(), args.model.as_deref());
            run_say(prompt, settings, args.model.is_some()).await
        }
        Commands::Models => {
            let config = Config::load()?;
            let settings = resolve_from_env(&config, args.base_url.as_deref(), args.model.as_deref());
            list_models(&settings).await
        }
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            let words = value.unwrap_or_default();
            match apply_set(&mut config, key.as_deref(), &words) {
                Ok(SetCommand::Show) => config.print_all(),
                Ok(SetCommand::Updated(message)) => {
                    config.save()?;
                    println!("{message}");
                }
                Err(err) => {
                    err.print();
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            match unset_setting(&mut config, &key) {
                Ok(message) => {
                    config.save()?;
                    println!("{message}");
                }
                Err(err) => {
                    err.print();
                    std::process::exit(1);
                }
            }
            Ok(())
        }
    }
}
