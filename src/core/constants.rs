//! User-facing strings and defaults shared by the controller and the UI.

/// Model assumed active until the backend reports otherwise.
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// Assistant name shown above replies and in the thinking row.
pub const ASSISTANT_NAME: &str = "MindEase";

/// First transcript entry of every session.
pub const GREETING: &str =
    "Hello, I'm MindEase, your compassionate AI companion. How can I support you today?";

/// Assistant-authored stand-in appended when a chat request fails.
pub const CHAT_FALLBACK_MESSAGE: &str =
    "I'm experiencing technical difficulties. Please try again later.";

/// Inline picker error after a failed model switch.
pub const MODEL_SWITCH_FAILED_MESSAGE: &str = "Failed to switch model. Please try again.";

/// Disclaimer rendered under the input line.
pub const DISCLAIMER: &str =
    "MindEase provides supportive listening but is not a substitute for professional help.";

/// System notice appended after a confirmed model switch.
pub fn model_switched_notice(model: &str) -> String {
    format!("AI model has been switched to {model}. How can I assist you now?")
}
