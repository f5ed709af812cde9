//! Prompt loader for YAML prompt definitions.

use crate::defaults::{default_answer_prompt, ANSWER_PROMPT_ID};
use crate::types::PromptDefinition;
use getnote_core::{AppError, AppResult};
use std::path::Path;

/// Load a prompt definition by ID from a prompts directory.
///
/// This function reads `<prompts_dir>/<id>.yml`.
///
/// # Example
/// ```no_run
/// use getnote_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("prompts"), "notes.answer")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(prompts_dir: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir.join(format!("{}.yml", prompt_id));

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    if !prompt_file.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Load the override for `prompt_id` if one exists, else the built-in.
///
/// Only [`ANSWER_PROMPT_ID`] has a built-in; other ids without a file are an
/// error.
pub fn load_prompt_or_default(
    prompts_dir: Option<&Path>,
    prompt_id: &str,
) -> AppResult<PromptDefinition> {
    if let Some(dir) = prompts_dir {
        if dir.join(format!("{}.yml", prompt_id)).exists() {
            return load_prompt(dir, prompt_id);
        }
    }

    if prompt_id == ANSWER_PROMPT_ID {
        tracing::debug!("Using built-in prompt: {}", prompt_id);
        return Ok(default_answer_prompt());
    }

    Err(AppError::Prompt(format!(
        "No prompt definition available for id: {}",
        prompt_id
    )))
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    // Validate API version format (simple check)
    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_prompt(dir: &Path, id: &str, valid: bool) -> PathBuf {
        let content = if valid {
            format!(
                r#"
id: {}
title: "Test Prompt"
apiVersion: "1.0"
createdBy: test
template: "Q: {{{{query}}}} C: {{{{context}}}}"
"#,
                id
            )
        } else {
            "invalid: yaml: content:".to_string()
        };

        let file_path = dir.join(format!("{}.yml", id));
        fs::write(&file_path, content).unwrap();
        file_path
    }

    #[test]
    fn test_load_valid_prompt() {
        let temp_dir = TempDir::new().unwrap();
        create_test_prompt(temp_dir.path(), "test.prompt", true);

        let prompt = load_prompt(temp_dir.path(), "test.prompt").unwrap();
        assert_eq!(prompt.id, "test.prompt");
        assert_eq!(prompt.title, "Test Prompt");
        assert_eq!(prompt.template, "Q: {{query}} C: {{context}}");
    }

    #[test]
    fn test_load_nonexistent_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_prompt(temp_dir.path(), "nonexistent");
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        create_test_prompt(temp_dir.path(), "invalid", false);

        let result = load_prompt(temp_dir.path(), "invalid");
        assert!(result.is_err());
    }

    #[test]
    fn test_override_takes_precedence() {
        let temp_dir = TempDir::new().unwrap();
        create_test_prompt(temp_dir.path(), ANSWER_PROMPT_ID, true);

        let prompt = load_prompt_or_default(Some(temp_dir.path()), ANSWER_PROMPT_ID).unwrap();
        assert_eq!(prompt.title, "Test Prompt");
    }

    #[test]
    fn test_falls_back_to_builtin() {
        let temp_dir = TempDir::new().unwrap();
        let prompt = load_prompt_or_default(Some(temp_dir.path()), ANSWER_PROMPT_ID).unwrap();
        assert_eq!(prompt.created_by, "builtin");

        let prompt = load_prompt_or_default(None, ANSWER_PROMPT_ID).unwrap();
        assert_eq!(prompt.id, ANSWER_PROMPT_ID);
    }

    #[test]
    fn test_unknown_id_without_file_fails() {
        assert!(load_prompt_or_default(None, "other.prompt").is_err());
    }
}
