use serde::Serialize;

/// Outbound frame pushed to the browser surface. Serialized with a
/// `"type"` tag so the frontend dispatches the same way we dispatch
/// inbound messages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ConsoleUpdate {
    Status { text: String, error: bool },
    ApiBase { value: String },
    ModelOptions { models: Vec<String>, selected: String },
    SourceText { text: String },
    TargetText { text: String },
    CharCount { text: String },
    TranslateBusy { disabled: bool },
    LanguageOptions {
        languages: Vec<String>,
        source: String,
        target: String,
    },
    LanguageSelection { source: String, target: String },
}
