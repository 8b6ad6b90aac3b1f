//! MindEase is a terminal chat client for a remote supportive-listening model
//! backend.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`api`] defines the wire payloads and the [`api::client::Backend`]
//!   capability, plus its HTTP implementation.
//! - [`core`] owns the transcript, the model-session controller that mediates
//!   every backend call, configuration, and interactive app state.
//! - [`ui`] renders the terminal interface and runs the event loop that feeds
//!   user input and backend completions into [`core`].
//! - [`cli`] parses arguments and dispatches subcommands.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
