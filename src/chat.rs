//! Record-grounded chat responder.
//!
//! Builds a grounding instruction from a previously acquired Medicine record,
//! replays the visible conversation after it, and returns the backend's reply
//! verbatim. Provenance only changes the authority wording in the grounding
//! text ("FDA" vs generic "medical" data), never the retrieval behavior.
//! Backend failures surface directly; there is no fallback tier here.

use thiserror::Error;

use crate::models::{Medicine, Message, Provenance, Role};
use crate::sources::gemini::Content;
use crate::sources::GenerativeBackend;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generative backend failed: {0}")]
    Backend(String),
}

impl GenerationError {
    /// The underlying backend message, for the diagnostics field of the
    /// error response.
    pub fn details(&self) -> &str {
        match self {
            Self::Backend(details) => details,
        }
    }
}

fn authority_label(provenance: Provenance) -> &'static str {
    match provenance {
        Provenance::Structured => "FDA",
        Provenance::Generative => "medical",
    }
}

/// The grounding instruction: all six record fields verbatim, plus the fixed
/// behavioral policy.
pub fn grounding_prompt(record: &Medicine) -> String {
    let authority = authority_label(record.provenance());
    format!(
        "You are a knowledgeable medical information assistant. You provide \
         factual information about medicines based on official data. You should:\n\
         \n\
         MEDICINE CONTEXT:\n\
         Using verified {authority} data for {name}:\n\
         - Name: {name}\n\
         - Generic Name: {generic_name}\n\
         - Description: {description}\n\
         - Indications: {indications}\n\
         - Warnings: {warnings}\n\
         - Dosage: {dosage}\n\
         \n\
         YOUR APPROACH:\n\
         1. Share information from the official data clearly and directly\n\
         2. Explain medical terms in simple language\n\
         3. Include relevant safety information when appropriate\n\
         4. If asked about something not in the data, explain what information is available\n\
         5. For specific medical situations, recommend consulting a healthcare provider \
         while still sharing the general information available\n\
         6. Maintain a helpful, informative tone while being factual\n\
         7. Share dosage information from the official data, adding that a healthcare \
         provider can give specific guidance\n\
         8. Use bullet points for clarity when listing multiple points\n\
         \n\
         Remember: While recommending consulting healthcare providers when needed, you \
         should still provide the factual information available in the medicine data.",
        name = record.name,
        generic_name = record.generic_name,
        description = record.description,
        indications = record.indications,
        warnings = record.warnings,
        dosage = record.dosage,
    )
}

/// Assemble the turn sequence: grounding instruction first (as a model turn),
/// then the conversation history in original order.
pub fn build_turns(history: &[Message], record: &Medicine) -> Vec<Content> {
    let mut turns = Vec::with_capacity(history.len() + 1);
    turns.push(Content::model(grounding_prompt(record)));
    for message in history {
        turns.push(match message.role {
            Role::User => Content::user(message.content.clone()),
            Role::Assistant => Content::model(message.content.clone()),
        });
    }
    turns
}

/// Forward the grounded conversation to the backend and return its reply
/// verbatim. Never retries.
pub async fn respond<G: GenerativeBackend>(
    backend: &G,
    history: &[Message],
    record: &Medicine,
) -> Result<String, GenerationError> {
    let turns = build_turns(history, record);
    backend
        .converse(&turns)
        .await
        .map_err(|e| GenerationError::Backend(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NO_WARNINGS, UNKNOWN};
    use crate::sources::MockBackend;

    fn record(id: &str) -> Medicine {
        Medicine {
            id: id.into(),
            name: "Aspirin".into(),
            generic_name: "acetylsalicylic acid".into(),
            description: "An NSAID.".into(),
            indications: "Pain relief.".into(),
            warnings: "Bleeding risk.".into(),
            dosage: "325mg as needed.".into(),
        }
    }

    #[test]
    fn grounding_cites_fda_for_structured_records() {
        let prompt = grounding_prompt(&record("a1b2"));
        assert!(prompt.contains("Using verified FDA data for Aspirin:"));
    }

    #[test]
    fn grounding_cites_medical_for_fallback_records() {
        let prompt = grounding_prompt(&record("gemini-1722470400000"));
        assert!(prompt.contains("Using verified medical data for Aspirin:"));
    }

    #[test]
    fn grounding_embeds_all_six_fields() {
        let prompt = grounding_prompt(&record("a1b2"));
        for needle in [
            "- Name: Aspirin",
            "- Generic Name: acetylsalicylic acid",
            "- Description: An NSAID.",
            "- Indications: Pain relief.",
            "- Warnings: Bleeding risk.",
            "- Dosage: 325mg as needed.",
        ] {
            assert!(prompt.contains(needle), "missing {needle}");
        }
    }

    #[test]
    fn grounding_embeds_sentinels_verbatim() {
        let mut rec = record("a1b2");
        rec.generic_name = UNKNOWN.into();
        rec.warnings = NO_WARNINGS.into();
        let prompt = grounding_prompt(&rec);
        assert!(prompt.contains("- Generic Name: Unknown"));
        assert!(prompt.contains("- Warnings: No warnings available"));
    }

    #[test]
    fn turn_sequence_puts_grounding_first_then_history_in_order() {
        let history = [
            Message::user("A"),
            Message::assistant("B"),
            Message::user("C"),
        ];
        let turns = build_turns(&history, &record("a1b2"));

        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].role, "model");
        assert!(turns[0].text().contains("MEDICINE CONTEXT"));
        assert_eq!((turns[1].role.as_str(), turns[1].text().as_str()), ("user", "A"));
        assert_eq!((turns[2].role.as_str(), turns[2].text().as_str()), ("model", "B"));
        assert_eq!((turns[3].role.as_str(), turns[3].text().as_str()), ("user", "C"));
    }

    #[test]
    fn empty_history_yields_grounding_only() {
        let turns = build_turns(&[], &record("a1b2"));
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, "model");
    }

    #[tokio::test]
    async fn respond_returns_reply_verbatim() {
        let backend = MockBackend::replying("Aspirin relieves pain.");
        let reply = respond(&backend, &[Message::user("What is it for?")], &record("a1"))
            .await
            .unwrap();
        assert_eq!(reply, "Aspirin relieves pain.");
    }

    #[tokio::test]
    async fn respond_passes_built_turns_downstream() {
        let backend = MockBackend::replying("ok");
        let history = [Message::user("Q")];
        respond(&backend, &history, &record("a1")).await.unwrap();

        let conversations = backend.conversations();
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0], build_turns(&history, &record("a1")));
    }

    #[tokio::test]
    async fn respond_surfaces_backend_failure_with_details() {
        let backend = MockBackend::failing("quota exceeded");
        let err = respond(&backend, &[], &record("a1")).await.unwrap_err();
        assert!(err.details().contains("quota exceeded"));
    }
}
