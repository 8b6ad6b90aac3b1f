//! Model listing for `mindease models`

use std::error::Error;

use crate::api::client::{Backend, HttpBackend};
use crate::api::ModelsResponse;
use crate::core::config::ResolvedSettings;

pub fn format_model_list(base_url: &str, catalog: &ModelsResponse) -> String {
    let mut out = String::new();
    out.push_str(&format!("🤖 Available Models at {base_url}\n"));
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    if catalog.available_models.is_empty() {
        out.push_str("No models available.\n");
    }
    for model in &catalog.available_models {
        if *model == catalog.current_model {
            out.push_str(&format!("  • {model}  (current)\n"));
        } else {
            out.push_str(&format!("  • {model}\n"));
        }
    }

    if !catalog.available_models.contains(&catalog.current_model) {
        out.push_str(&format!("\nActive model: {}\n", catalog.current_model));
    }
    out
}

pub async fn list_models(settings: &ResolvedSettings) -> Result<(), Box<dyn Error>> {
    let backend = HttpBackend::new(settings.base_url.clone());
    let catalog = backend
        .list_models()
        .await
        .map_err(|err| format!("Failed to fetch models from {}: {err}", backend.base_url()))?;
    print!("{}", format_model_list(backend.base_url(), &catalog));
    Ok(())
}
