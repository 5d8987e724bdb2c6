/// Ordered list of model identifiers offered by the configured server.
/// The default model is always pinned first; the rest keep the server's
/// order with duplicates and empty ids dropped.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<String>,
}

impl ModelCatalog {
    pub fn rebuild(default_model: &str, incoming: Vec<String>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let mut models = Vec::with_capacity(incoming.len() + 1);

        for id in std::iter::once(default_model.to_string()).chain(incoming) {
            if id.is_empty() || !seen.insert(id.clone()) {
                continue;
            }
            models.push(id);
        }

        Self { models }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// The entry selected after every rebuild (the pinned default)
    pub fn default_selection(&self) -> &str {
        &self.models[0]
    }
}
