//! TUI-less "say" command

use std::error::Error;
use std::sync::Arc;

use crate::api::client::HttpBackend;
use crate::core::config::ResolvedSettings;
use crate::core::controller::{ModelSessionController, SendOutcome, SendRejected};
use crate::core::transcript::Transcript;

/// Result of a one-shot exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SayReply {
    pub text: String,
    pub model: String,
    pub outcome: SendOutcome,
}

/// Send `prompt` once through the controller. The catalog is fetched first
/// unless the caller pinned a model, so the send is tagged with the backend's
/// active model.
pub async fn say(
    controller: &mut ModelSessionController,
    prompt: &str,
    refresh_catalog: bool,
) -> Result<SayReply, SendRejected> {
    if refresh_catalog {
        controller.initialize().await;
    }

    let mut transcript = Transcript::new();
    let outcome = controller.send(prompt, &mut transcript).await?;
    let text = transcript
        .last()
        .map(|message| message.content().to_string())
        .unwrap_or_default();

    Ok(SayReply {
        text,
        model: controller.current_model().to_string(),
        outcome,
    })
}

pub async fn run_say(
    prompt: Vec<String>,
    settings: ResolvedSettings,
    model_pinned: bool,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: mindease say <message>");
        std::process::exit(1);
    }

    let backend = Arc::new(HttpBackend::new(settings.base_url.clone()));
    let mut controller = ModelSessionController::new(backend, settings.default_model.clone());

    let reply = say(&mut controller, &prompt, !model_pinned).await?;
    match reply.outcome {
        SendOutcome::Replied { drifted, .. } => {
            if drifted {
                eprintln!("ℹ️  Backend answered with model {}", reply.model);
            }
            println!("{}", reply.text);
            Ok(())
        }
        SendOutcome::Failed => {
            eprintln!("❌ {}", reply.text);
            std::process::exit(1);
        }
    }
}
