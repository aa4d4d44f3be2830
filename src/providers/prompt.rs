//! Fixed diagnostic prompt template.
//!
//! Only symptoms, the description and an image *count* are sent; image
//! bytes never travel in a cascade attempt.

use serde::Serialize;

use crate::types::InferenceRequest;

const SYSTEM_PROMPT: &str = "Tu es un vétérinaire spécialisé en aviculture et en élevage. \
À partir des informations fournies par l'éleveur, propose le diagnostic le plus probable. \
Réponds UNIQUEMENT avec un objet JSON de la forme \
{\"diagnosis\": string, \"confidence\": entier entre 0 et 100, \"treatmentPlan\": string}, \
sans aucun texte autour.";

/// The two messages sent for every attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticPrompt {
    pub system: String,
    pub user: String,
}

impl DiagnosticPrompt {
    pub fn from_request(request: &InferenceRequest) -> Self {
        let symptoms = if request.symptoms.is_empty() {
            "aucun".to_string()
        } else {
            request.symptoms.join(", ")
        };
        let description = match request.description.trim() {
            "" => "aucune",
            d => d,
        };

        let user = format!(
            "Symptômes observés : {symptoms}\n\
             Description de l'éleveur : {description}\n\
             Nombre de photos fournies : {}\n\n\
             Donne le diagnostic, ton niveau de confiance et un plan de traitement détaillé.",
            request.images.len()
        );

        Self {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }
}
