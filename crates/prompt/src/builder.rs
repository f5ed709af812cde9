//! Prompt builder for rendering templates.

use crate::types::{BuiltPrompt, PromptDefinition};
use getnote_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Build a prompt from a definition and input variables.
///
/// Both the user template and the optional system template are rendered
/// with the same variables. Rendering is strict: a template that references
/// a variable missing from `variables` fails instead of rendering blank.
///
/// # Example
/// ```no_run
/// use getnote_prompt::{build_prompt, default_answer_prompt};
/// use std::collections::HashMap;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut vars = HashMap::new();
/// vars.insert("query".to_string(), "What is Rust?".to_string());
/// vars.insert("context".to_string(), "[note1]\nTitle: Rust".to_string());
///
/// let built = build_prompt(&default_answer_prompt(), vars)?;
/// println!("User prompt: {}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    variables: HashMap<String, String>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    let user = render_template(&definition.template, &variables)?;
    let system = definition
        .system
        .as_deref()
        .map(|template| render_template(template, &variables))
        .transpose()?;

    Ok(BuiltPrompt::new(
        system,
        user,
        definition.id.clone(),
        variables,
    ))
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_answer_prompt;

    fn vars(query: &str, context: &str) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert("query".to_string(), query.to_string());
        vars.insert("context".to_string(), context.to_string());
        vars
    }

    #[test]
    fn test_render_simple_template() {
        let result = render_template("Question: {{query}}", &vars("Hello, world!", ""));
        assert_eq!(result.unwrap(), "Question: Hello, world!");
    }

    #[test]
    fn test_render_does_not_escape() {
        let result = render_template("{{context}}", &vars("", "<b>a & b</b>"));
        assert_eq!(result.unwrap(), "<b>a & b</b>");
    }

    #[test]
    fn test_render_template_missing_variable() {
        let result = render_template("Question: {{missing}}", &HashMap::new());
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_build_default_answer_prompt() {
        let built = build_prompt(
            &default_answer_prompt(),
            vars("How do I sleep better?", "[note1]\nTitle: Sleep\nContent: Go to bed early."),
        )
        .unwrap();

        assert!(built.user.contains("Question: How do I sleep better?"));
        assert!(built.user.contains("Content: Go to bed early."));
        assert!(built.system.is_some());
        assert_eq!(built.metadata.source_prompt_id, "notes.answer");
        assert_eq!(built.metadata.resolved_variables.len(), 2);
    }
}
