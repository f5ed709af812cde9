//! Built-in prompt definitions.

use crate::types::{PromptBehavior, PromptDefinition};

/// Identifier of the note-grounded answer prompt.
pub const ANSWER_PROMPT_ID: &str = "notes.answer";

const ANSWER_SYSTEM: &str = "You are a question-answering assistant for the user's Get Notes \
knowledge base. You answer strictly from the notes you are given.";

const ANSWER_TEMPLATE: &str = r#"Answer the user's question using the notes below.

Rules:
1. Use only information contained in the notes. Do not add anything the notes do not say.
2. Cite every factual claim with the marker of the note it comes from, written exactly as [noteN] where N is the note number, e.g. [note1] or [note2].
3. Highlight quoted note content in **bold**.
4. If the notes do not contain enough information to answer, say clearly that the notes do not cover the question and suggest rephrasing it.
5. Answer in the language of the question.

Question: {{query}}

Notes:
{{context}}

Answer:"#;

/// The built-in note-grounded answer prompt.
///
/// Renders with the `query` and `context` variables.
pub fn default_answer_prompt() -> PromptDefinition {
    PromptDefinition {
        id: ANSWER_PROMPT_ID.to_string(),
        title: "Cited answer from notes".to_string(),
        api_version: "1.0".to_string(),
        created_by: "builtin".to_string(),
        behavior: Some(PromptBehavior {
            tone: "professional".to_string(),
            style: "concise".to_string(),
        }),
        system: Some(ANSWER_SYSTEM.to_string()),
        template: ANSWER_TEMPLATE.to_string(),
    }
}
