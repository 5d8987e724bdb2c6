use serde_json::Value;
use tracing::warn;

use crate::console::ConsoleController;

/// Dispatch one inbound frame from the browser surface. Every form event
/// arrives as `{"type": ..., ...}`; field edits carry the new value.
pub async fn handle_message(console: &ConsoleController, text: &str) -> anyhow::Result<()> {
    let msg: Value = serde_json::from_str(text)?;
    let msg_type = msg.get("type").and_then(|v| v.as_str());

    match msg_type {
        Some("apply-api-address") => {
            let address = msg.get("address").and_then(|v| v.as_str()).unwrap_or("");
            console.apply_api_address(address).await;
        }
        Some("source-text-input") => {
            let text = msg.get("text").and_then(|v| v.as_str()).unwrap_or("");
            console.set_source_text(text).await;
        }
        Some("select-model") => {
            let model = msg.get("model").and_then(|v| v.as_str()).unwrap_or("");
            console.select_model(model).await;
        }
        Some("select-source-lang") => {
            let lang = msg.get("lang").and_then(|v| v.as_str()).unwrap_or("");
            console.select_source_language(lang).await;
        }
        Some("select-target-lang") => {
            let lang = msg.get("lang").and_then(|v| v.as_str()).unwrap_or("");
            console.select_target_language(lang).await;
        }
        Some("translate") => {
            console.translate().await;
        }
        Some("clear") => {
            console.clear_all().await;
        }
        Some("swap-languages") => {
            console.swap_languages().await;
        }
        _ => {
            warn!("Unknown message type: {:?}", msg_type);
        }
    }

    Ok(())
}
