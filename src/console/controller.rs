use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use crate::llm::{ChatBackend, CompletionRequest};

use super::session::{ConsoleSession, TranslateStart};
use super::updates::ConsoleUpdate;

/// Binds one console session to the chat backend and the outbound frame
/// sink. The inbound loop drives it one message at a time; model refreshes
/// run as fire-and-forget tasks so applying an address never blocks typing.
pub struct ConsoleController {
    session: Arc<Mutex<ConsoleSession>>,
    backend: Arc<dyn ChatBackend>,
    updates: mpsc::UnboundedSender<ConsoleUpdate>,
    refresh_seq: Arc<AtomicU64>,
}

impl ConsoleController {
    pub fn new(
        session: ConsoleSession,
        backend: Arc<dyn ChatBackend>,
        updates: mpsc::UnboundedSender<ConsoleUpdate>,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            backend,
            updates,
            refresh_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    fn push(&self, updates: Vec<ConsoleUpdate>) {
        for update in updates {
            // a closed receiver just means the surface went away
            let _ = self.updates.send(update);
        }
    }

    /// Initial surface sync plus the silent model load, mirroring page load
    pub async fn hello(&self) {
        let updates = self.session.lock().await.hello_updates();
        self.push(updates);
        self.spawn_model_refresh(false);
    }

    pub async fn apply_api_address(&self, raw: &str) {
        let (updates, refresh) = self.session.lock().await.apply_api_address(raw);
        self.push(updates);
        if refresh {
            self.spawn_model_refresh(true);
        }
    }

    /// Each refresh carries a sequence token; a response resolving after a
    /// newer refresh was issued is discarded instead of overwriting the
    /// catalog.
    pub fn spawn_model_refresh(&self, show_error: bool) {
        let token = self.refresh_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let session = self.session.clone();
        let backend = self.backend.clone();
        let sender = self.updates.clone();
        let refresh_seq = self.refresh_seq.clone();

        tokio::spawn(async move {
            let api_base = session.lock().await.api_base().to_string();
            let result = backend.list_models(&api_base).await;

            let mut session = session.lock().await;
            if refresh_seq.load(Ordering::SeqCst) != token {
                debug!("Discarding stale model list for {}", api_base);
                return;
            }

            let updates = match result {
                Ok(models) => {
                    info!("Loaded {} models from {}", models.len(), api_base);
                    session.set_model_options(models)
                }
                Err(e) => {
                    debug!("Model list fetch from {} failed: {}", api_base, e);
                    session.model_load_failed(show_error)
                }
            };
            for update in updates {
                let _ = sender.send(update);
            }
        });
    }

    /// One translation attempt end to end. No retries; every failure is
    /// terminal for the attempt and the control is always re-enabled.
    pub async fn translate(&self) {
        let start = self.session.lock().await.begin_translation();
        let job = match start {
            TranslateStart::Rejected(updates) => {
                self.push(updates);
                return;
            }
            TranslateStart::Started { job, updates } => {
                self.push(updates);
                job
            }
        };

        info!("Translation request to {} with model {}", job.api_base, job.model);
        let request = CompletionRequest {
            model: job.model,
            prompt: job.prompt,
            temperature: job.temperature,
        };
        let outcome = self.backend.chat_completion(&job.api_base, request).await;

        let updates = self
            .session
            .lock()
            .await
            .finish_translation(outcome.map_err(|e| e.to_string()));
        self.push(updates);
    }

    pub async fn set_source_text(&self, text: &str) {
        let updates = self.session.lock().await.set_source_text(text);
        self.push(updates);
    }

    pub async fn select_model(&self, model: &str) {
        let updates = self.session.lock().await.select_model(model);
        self.push(updates);
    }

    pub async fn select_source_language(&self, lang: &str) {
        let updates = self.session.lock().await.select_source_language(lang);
        self.push(updates);
    }

    pub async fn select_target_language(&self, lang: &str) {
        let updates = self.session.lock().await.select_target_language(lang);
        self.push(updates);
    }

    pub async fn clear_all(&self) {
        let updates = self.session.lock().await.clear_all();
        self.push(updates);
    }

    pub async fn swap_languages(&self) {
        let updates = self.session.lock().await.swap_languages();
        self.push(updates);
    }
}
