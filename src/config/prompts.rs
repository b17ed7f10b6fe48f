use std::fs;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptsError {
    #[error("failed to read prompts file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse prompts file '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Prompt texts and canned user-facing messages.
///
/// The defaults are the French texts the product ships with; a JSON file
/// given via `--prompts-path` can override any subset of fields.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
    /// System instruction for the summarization call.
    pub system: String,
    /// User-message template; `{context}` and `{query}` are expanded.
    pub user_template: String,
    /// Header line opening the article context block.
    pub context_header: String,
    /// Returned when the search yields no articles.
    pub no_results: String,
    /// Returned when the generation backend fails.
    pub generation_error: String,
    /// Body of the feedback acknowledgement.
    pub feedback_ack: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            system: "Vous êtes un assistant spécialisé dans l'analyse et la synthèse \
                     d'articles de presse. Vos réponses doivent être structurées, \
                     chronologiques et mettre en évidence les dates et événements clés."
                .to_string(),
            user_template: "{context}\nQuestion: {query}\n\nVeuillez fournir une synthèse \
                            détaillée et chronologique, en mettant en évidence les dates et \
                            événements importants."
                .to_string(),
            context_header: "Sur la base des articles de presse suivants :\n\n".to_string(),
            no_results: "Aucun article trouvé pour cette recherche.".to_string(),
            generation_error: "Une erreur s'est produite lors de la génération du résumé."
                .to_string(),
            feedback_ack: "Merci pour votre retour !".to_string(),
        }
    }
}

impl Prompts {
    pub fn user_message(&self, context: &str, query: &str) -> String {
        self.user_template
            .replace("{context}", context)
            .replace("{query}", query)
    }
}

pub fn load_prompts(path: &str) -> Result<Arc<Prompts>, PromptsError> {
    let text = fs::read_to_string(path).map_err(|source| PromptsError::Io {
        path: path.to_string(),
        source,
    })?;
    let prompts: Prompts = serde_json::from_str(&text).map_err(|source| PromptsError::Json {
        path: path.to_string(),
        source,
    })?;
    Ok(Arc::new(prompts))
}
