use regex::Regex;

use crate::config::TranslatorConfig;

use super::catalog::ModelCatalog;
use super::prompt::{build_prompt, AUTO_LANG};
use super::updates::ConsoleUpdate;

/// Normalize an API base address: trim, substitute the default when empty,
/// strip trailing slashes. Pure.
pub fn normalize_api_base(raw: &str, default_base: &str) -> String {
    let trimmed = raw.trim();
    let base = if trimmed.is_empty() { default_base } else { trimmed };
    base.trim_end_matches('/').to_string()
}

/// Current status line plus its error flag
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub text: String,
    pub error: bool,
}

/// Snapshot of a validated translation attempt, taken before the request
/// is issued so later field edits cannot leak into an in-flight call
#[derive(Debug, Clone)]
pub struct TranslationJob {
    pub api_base: String,
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
}

pub enum TranslateStart {
    Started {
        job: TranslationJob,
        updates: Vec<ConsoleUpdate>,
    },
    Rejected(Vec<ConsoleUpdate>),
}

/// All interactive state of one console surface. Every mutation returns the
/// frames the surface must render, so operations are invocable directly in
/// tests without a socket.
pub struct ConsoleSession {
    settings: TranslatorConfig,
    api_base: String,
    catalog: ModelCatalog,
    selected_model: String,
    source_lang: String,
    target_lang: String,
    source_text: String,
    target_text: String,
    status: Status,
    busy: bool,
}

impl ConsoleSession {
    pub fn new(settings: TranslatorConfig) -> Self {
        let api_base = normalize_api_base(&settings.api_base, &settings.api_base);
        let catalog = ModelCatalog::rebuild(&settings.default_model, vec![]);
        let selected_model = catalog.default_selection().to_string();
        let target_lang = settings
            .languages
            .first()
            .cloned()
            .unwrap_or_else(|| "English".to_string());

        Self {
            api_base,
            catalog,
            selected_model,
            source_lang: AUTO_LANG.to_string(),
            target_lang,
            source_text: String::new(),
            target_text: String::new(),
            status: Status {
                text: "Idle".to_string(),
                error: false,
            },
            busy: false,
            settings,
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn target_text(&self) -> &str {
        &self.target_text
    }

    /// Initial surface sync on connect, mirroring the page-load sequence:
    /// normalized address, offered languages, counter. The catalog follows
    /// from the silent model refresh.
    pub fn hello_updates(&self) -> Vec<ConsoleUpdate> {
        vec![
            ConsoleUpdate::ApiBase {
                value: self.api_base.clone(),
            },
            ConsoleUpdate::LanguageOptions {
                languages: self.settings.languages.clone(),
                source: self.source_lang.clone(),
                target: self.target_lang.clone(),
            },
            self.char_count_update(),
        ]
    }

    /// Returns the frames to render and whether a model refresh should be
    /// issued (only after a scheme-valid apply).
    pub fn apply_api_address(&mut self, raw: &str) -> (Vec<ConsoleUpdate>, bool) {
        let normalized = normalize_api_base(raw, &self.settings.api_base);
        if !Regex::new(r"(?i)^https?://").unwrap().is_match(&normalized) {
            let updates = vec![self.set_status("API address must start with http:// or https://", true)];
            return (updates, false);
        }

        self.api_base = normalized.clone();
        let updates = vec![
            ConsoleUpdate::ApiBase { value: normalized },
            self.set_status("API address applied. Loading models...", false),
        ];
        (updates, true)
    }

    /// Rebuild the catalog wholesale from a fetch outcome. An empty list
    /// collapses it to just the default model.
    pub fn set_model_options(&mut self, models: Vec<String>) -> Vec<ConsoleUpdate> {
        self.catalog = ModelCatalog::rebuild(&self.settings.default_model, models);
        self.selected_model = self.catalog.default_selection().to_string();
        vec![ConsoleUpdate::ModelOptions {
            models: self.catalog.models().to_vec(),
            selected: self.selected_model.clone(),
        }]
    }

    /// Catalog fetch failure: collapse to the default entry. The error is
    /// surfaced only for user-initiated reloads; the silent startup load
    /// swallows it.
    pub fn model_load_failed(&mut self, show_error: bool) -> Vec<ConsoleUpdate> {
        let mut updates = self.set_model_options(Vec::new());
        if show_error {
            updates.push(self.set_status("Unable to load models from this API address.", true));
        }
        updates
    }

    pub fn set_source_text(&mut self, text: &str) -> Vec<ConsoleUpdate> {
        self.source_text = text.to_string();
        vec![self.char_count_update()]
    }

    pub fn select_model(&mut self, model: &str) -> Vec<ConsoleUpdate> {
        self.selected_model = model.to_string();
        Vec::new()
    }

    pub fn select_source_language(&mut self, lang: &str) -> Vec<ConsoleUpdate> {
        self.source_lang = lang.to_string();
        Vec::new()
    }

    pub fn select_target_language(&mut self, lang: &str) -> Vec<ConsoleUpdate> {
        self.target_lang = lang.to_string();
        Vec::new()
    }

    /// Validation order is first-failure-wins; nothing reaches the network
    /// until every check passes.
    pub fn begin_translation(&mut self) -> TranslateStart {
        if self.busy {
            // surface control is disabled while a translation is in flight
            return TranslateStart::Rejected(Vec::new());
        }

        let input = self.source_text.trim().to_string();
        let model = self.selected_model.trim().to_string();

        if input.is_empty() {
            self.target_text.clear();
            let updates = vec![
                self.set_status("Enter text to translate.", true),
                ConsoleUpdate::TargetText {
                    text: String::new(),
                },
            ];
            return TranslateStart::Rejected(updates);
        }

        if model.is_empty() {
            return TranslateStart::Rejected(vec![self.set_status("Select a model.", true)]);
        }

        if self.source_lang != AUTO_LANG && self.source_lang == self.target_lang {
            return TranslateStart::Rejected(vec![
                self.set_status("Source and target languages must be different.", true),
            ]);
        }

        self.busy = true;
        self.target_text.clear();

        let job = TranslationJob {
            api_base: self.api_base.clone(),
            prompt: build_prompt(&input, &self.source_lang, &self.target_lang),
            model,
            temperature: self.settings.temperature,
        };
        let updates = vec![
            ConsoleUpdate::TranslateBusy { disabled: true },
            self.set_status("Translating...", false),
            ConsoleUpdate::TargetText {
                text: String::new(),
            },
        ];
        TranslateStart::Started { job, updates }
    }

    /// Always re-enables the translate control, whatever the outcome
    pub fn finish_translation(&mut self, outcome: Result<String, String>) -> Vec<ConsoleUpdate> {
        self.busy = false;
        let mut updates = Vec::new();

        match outcome {
            Ok(content) => {
                let content = content.trim().to_string();
                if content.is_empty() {
                    updates.push(
                        self.set_status("Translation failed: Empty translation returned.", true),
                    );
                } else {
                    self.target_text = content.clone();
                    updates.push(ConsoleUpdate::TargetText { text: content });
                    updates.push(self.set_status("Done", false));
                }
            }
            Err(message) => {
                updates.push(self.set_status(&format!("Translation failed: {}", message), true));
            }
        }

        updates.push(ConsoleUpdate::TranslateBusy { disabled: false });
        updates
    }

    pub fn clear_all(&mut self) -> Vec<ConsoleUpdate> {
        self.source_text.clear();
        self.target_text.clear();
        vec![
            ConsoleUpdate::SourceText {
                text: String::new(),
            },
            ConsoleUpdate::TargetText {
                text: String::new(),
            },
            self.set_status("Idle", false),
            self.char_count_update(),
        ]
    }

    /// No-op while the source language is the auto sentinel
    pub fn swap_languages(&mut self) -> Vec<ConsoleUpdate> {
        if self.source_lang == AUTO_LANG {
            return Vec::new();
        }

        std::mem::swap(&mut self.source_lang, &mut self.target_lang);
        std::mem::swap(&mut self.source_text, &mut self.target_text);

        vec![
            ConsoleUpdate::LanguageSelection {
                source: self.source_lang.clone(),
                target: self.target_lang.clone(),
            },
            ConsoleUpdate::SourceText {
                text: self.source_text.clone(),
            },
            ConsoleUpdate::TargetText {
                text: self.target_text.clone(),
            },
            self.char_count_update(),
        ]
    }

    fn char_count_update(&self) -> ConsoleUpdate {
        ConsoleUpdate::CharCount {
            text: format!(
                "{} / {}",
                self.source_text.chars().count(),
                self.settings.char_limit
            ),
        }
    }

    fn set_status(&mut self, text: &str, error: bool) -> ConsoleUpdate {
        self.status = Status {
            text: text.to_string(),
            error,
        };
        ConsoleUpdate::Status {
            text: text.to_string(),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranslatorConfig;

    fn session() -> ConsoleSession {
        ConsoleSession::new(TranslatorConfig::default())
    }

    #[test]
    fn normalize_substitutes_default_and_strips_slashes() {
        let default = "http://127.0.0.1:1234";
        assert_eq!(normalize_api_base("", default), default);
        assert_eq!(normalize_api_base("   ", default), default);
        assert_eq!(normalize_api_base("http://x/", default), "http://x");
        assert_eq!(normalize_api_base("  http://x//  ", default), "http://x");
    }

    #[test]
    fn apply_rejects_non_http_scheme_without_refresh() {
        let mut session = session();
        let before = session.api_base().to_string();
        let (updates, refresh) = session.apply_api_address("ftp://x");

        assert!(!refresh);
        assert!(session.status().error);
        assert_eq!(session.api_base(), before);
        assert_eq!(
            updates,
            vec![ConsoleUpdate::Status {
                text: "API address must start with http:// or https://".to_string(),
                error: true,
            }]
        );
    }

    #[test]
    fn apply_normalizes_and_requests_refresh() {
        let mut session = session();
        let (updates, refresh) = session.apply_api_address("  HTTPS://host:9000//  ");

        assert!(refresh);
        assert_eq!(session.api_base(), "HTTPS://host:9000");
        assert_eq!(
            updates[0],
            ConsoleUpdate::ApiBase {
                value: "HTTPS://host:9000".to_string()
            }
        );
        assert_eq!(
            session.status().text,
            "API address applied. Loading models..."
        );
        assert!(!session.status().error);
    }

    #[test]
    fn empty_model_list_yields_default_only() {
        let mut session = session();
        let updates = session.set_model_options(vec![]);
        assert_eq!(
            updates,
            vec![ConsoleUpdate::ModelOptions {
                models: vec!["qwen3-4b".to_string()],
                selected: "qwen3-4b".to_string(),
            }]
        );
    }

    #[test]
    fn model_list_is_deduped_with_default_first() {
        let mut session = session();
        let updates = session.set_model_options(vec!["a".into(), "a".into(), "b".into()]);
        assert_eq!(
            updates,
            vec![ConsoleUpdate::ModelOptions {
                models: vec!["qwen3-4b".into(), "a".into(), "b".into()],
                selected: "qwen3-4b".to_string(),
            }]
        );
    }

    #[test]
    fn silent_load_failure_collapses_without_status() {
        let mut session = session();
        session.set_model_options(vec!["a".into()]);
        let updates = session.model_load_failed(false);
        assert_eq!(
            updates,
            vec![ConsoleUpdate::ModelOptions {
                models: vec!["qwen3-4b".to_string()],
                selected: "qwen3-4b".to_string(),
            }]
        );
        assert!(!session.status().error);
    }

    #[test]
    fn explicit_load_failure_surfaces_the_error() {
        let mut session = session();
        let updates = session.model_load_failed(true);
        assert_eq!(
            updates.last(),
            Some(&ConsoleUpdate::Status {
                text: "Unable to load models from this API address.".to_string(),
                error: true,
            })
        );
    }

    #[test]
    fn empty_input_rejects_before_any_network_call() {
        let mut session = session();
        session.set_source_text("   ");
        match session.begin_translation() {
            TranslateStart::Rejected(updates) => {
                assert_eq!(
                    updates[0],
                    ConsoleUpdate::Status {
                        text: "Enter text to translate.".to_string(),
                        error: true,
                    }
                );
                assert!(updates.contains(&ConsoleUpdate::TargetText {
                    text: String::new()
                }));
            }
            TranslateStart::Started { .. } => panic!("validation should have failed"),
        }
        assert!(!session.is_busy());
    }

    #[test]
    fn missing_model_rejects() {
        let mut session = session();
        session.set_source_text("Hola");
        session.select_model("  ");
        match session.begin_translation() {
            TranslateStart::Rejected(updates) => {
                assert_eq!(
                    updates,
                    vec![ConsoleUpdate::Status {
                        text: "Select a model.".to_string(),
                        error: true,
                    }]
                );
            }
            TranslateStart::Started { .. } => panic!("validation should have failed"),
        }
    }

    #[test]
    fn same_source_and_target_rejects() {
        let mut session = session();
        session.set_source_text("Bonjour");
        session.select_source_language("French");
        session.select_target_language("French");
        match session.begin_translation() {
            TranslateStart::Rejected(updates) => {
                assert_eq!(
                    updates,
                    vec![ConsoleUpdate::Status {
                        text: "Source and target languages must be different.".to_string(),
                        error: true,
                    }]
                );
            }
            TranslateStart::Started { .. } => panic!("validation should have failed"),
        }
    }

    #[test]
    fn auto_source_skips_language_equality_check() {
        let mut session = session();
        session.set_source_text("Hola");
        session.select_source_language("auto");
        session.select_target_language("English");
        assert!(matches!(
            session.begin_translation(),
            TranslateStart::Started { .. }
        ));
    }

    #[test]
    fn started_translation_snapshots_the_request() {
        let mut session = session();
        session.apply_api_address("http://localhost:8080/");
        session.set_source_text("  Hola  ");
        session.select_target_language("English");

        match session.begin_translation() {
            TranslateStart::Started { job, updates } => {
                assert_eq!(job.api_base, "http://localhost:8080");
                assert_eq!(job.model, "qwen3-4b");
                assert!(job.prompt.ends_with("Text:\nHola"));
                assert!((job.temperature - 0.1).abs() < f32::EPSILON);
                assert_eq!(
                    updates[0],
                    ConsoleUpdate::TranslateBusy { disabled: true }
                );
                assert_eq!(session.status().text, "Translating...");
            }
            TranslateStart::Rejected(_) => panic!("validation should have passed"),
        }
        assert!(session.is_busy());
    }

    #[test]
    fn second_translation_while_busy_is_ignored() {
        let mut session = session();
        session.set_source_text("Hola");
        assert!(matches!(
            session.begin_translation(),
            TranslateStart::Started { .. }
        ));
        match session.begin_translation() {
            TranslateStart::Rejected(updates) => assert!(updates.is_empty()),
            TranslateStart::Started { .. } => panic!("busy guard should have held"),
        }
    }

    #[test]
    fn successful_translation_trims_and_completes() {
        let mut session = session();
        session.set_source_text("Hola");
        session.begin_translation();

        let updates = session.finish_translation(Ok(" Hello ".to_string()));
        assert_eq!(session.target_text(), "Hello");
        assert_eq!(session.status().text, "Done");
        assert!(!session.is_busy());
        assert_eq!(
            updates,
            vec![
                ConsoleUpdate::TargetText {
                    text: "Hello".to_string()
                },
                ConsoleUpdate::Status {
                    text: "Done".to_string(),
                    error: false,
                },
                ConsoleUpdate::TranslateBusy { disabled: false },
            ]
        );
    }

    #[test]
    fn whitespace_only_content_is_a_failure() {
        let mut session = session();
        session.set_source_text("Hola");
        session.begin_translation();

        let updates = session.finish_translation(Ok("   ".to_string()));
        assert_eq!(session.target_text(), "");
        assert_eq!(
            session.status().text,
            "Translation failed: Empty translation returned."
        );
        assert!(session.status().error);
        assert_eq!(
            updates.last(),
            Some(&ConsoleUpdate::TranslateBusy { disabled: false })
        );
    }

    #[test]
    fn fetch_failure_reenables_the_control() {
        let mut session = session();
        session.set_source_text("Hola");
        session.begin_translation();

        let updates = session.finish_translation(Err("HTTP 500".to_string()));
        assert!(!session.is_busy());
        assert_eq!(session.status().text, "Translation failed: HTTP 500");
        assert!(session.status().error);
        assert_eq!(
            updates.last(),
            Some(&ConsoleUpdate::TranslateBusy { disabled: false })
        );
    }

    #[test]
    fn clear_resets_fields_status_and_counter() {
        let mut session = session();
        session.set_source_text("Hola");
        session.begin_translation();
        session.finish_translation(Ok("Hello".to_string()));

        let updates = session.clear_all();
        assert_eq!(
            updates,
            vec![
                ConsoleUpdate::SourceText {
                    text: String::new()
                },
                ConsoleUpdate::TargetText {
                    text: String::new()
                },
                ConsoleUpdate::Status {
                    text: "Idle".to_string(),
                    error: false,
                },
                ConsoleUpdate::CharCount {
                    text: "0 / 5000".to_string()
                },
            ]
        );
    }

    #[test]
    fn swap_is_a_noop_for_auto_source() {
        let mut session = session();
        session.set_source_text("Hola");
        let updates = session.swap_languages();
        assert!(updates.is_empty());
    }

    #[test]
    fn swap_exchanges_languages_and_texts() {
        let mut session = session();
        session.select_source_language("French");
        session.select_target_language("English");
        session.set_source_text("Bonjour");
        session.begin_translation();
        session.finish_translation(Ok("Hello".to_string()));

        let updates = session.swap_languages();
        assert!(updates.contains(&ConsoleUpdate::LanguageSelection {
            source: "English".to_string(),
            target: "French".to_string(),
        }));
        assert!(updates.contains(&ConsoleUpdate::SourceText {
            text: "Hello".to_string()
        }));
        assert!(updates.contains(&ConsoleUpdate::TargetText {
            text: "Bonjour".to_string()
        }));
        assert!(updates.contains(&ConsoleUpdate::CharCount {
            text: "5 / 5000".to_string()
        }));
    }

    #[test]
    fn counter_is_advisory_past_the_cap() {
        let mut session = session();
        let long_input = "x".repeat(5001);
        let updates = session.set_source_text(&long_input);
        assert_eq!(
            updates,
            vec![ConsoleUpdate::CharCount {
                text: "5001 / 5000".to_string()
            }]
        );
        // input past the cap still translates
        assert!(matches!(
            session.begin_translation(),
            TranslateStart::Started { .. }
        ));
    }
}
