/// Sentinel source-language value meaning "let the model detect the language"
pub const AUTO_LANG: &str = "auto";

/// Build the instruction prompt sent as the single user message
pub fn build_prompt(text: &str, from: &str, to: &str) -> String {
    let source_instruction = if from == AUTO_LANG {
        "Detect the source language automatically.".to_string()
    } else {
        format!("The source language is {}.", from)
    };

    [
        "You are a precise translator.",
        &source_instruction,
        &format!("Translate the provided text into {}.", to),
        "Return only the translated text with no explanations or notes.",
        "",
        "Text:",
        text,
    ]
    .join("\n")
}
