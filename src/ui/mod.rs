//! Terminal UI for interactive sessions.
//!
//! - [`chat_loop`]: terminal lifecycle and the event loop that feeds key
//!   presses and backend completions into [`crate::core::app::App`].
//! - [`renderer`]: frame composition for the transcript, input and picker.
//! - [`theme`]: color and style policy.
//! - [`picker`]: selection state for the model picker overlay.
//! - [`text_wrapping`]: word wrapping shared by the transcript and footer.
//!
//! This layer presents and captures interaction state; [`crate::core`] owns
//! session logic and backend coordination.

pub mod chat_loop;
pub mod picker;
pub mod renderer;
pub mod text_wrapping;
pub mod theme;
