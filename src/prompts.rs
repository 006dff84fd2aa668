use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::context::ContextWindow;
use crate::error::{Error, Result};
use crate::offense::{Category, Offense};

const DEFAULT_GENERIC: &str = include_str!("default_prompts/generic.md");
const DEFAULT_DEVELOPMENT_DEPENDENCY: &str =
    include_str!("default_prompts/development-dependency.md");

const CATEGORIES: &[Category] = &[Category::Generic, Category::DevelopmentDependency];

fn default_template(category: Category) -> &'static str {
    match category {
        Category::Generic => DEFAULT_GENERIC,
        Category::DevelopmentDependency => DEFAULT_DEVELOPMENT_DEPENDENCY,
    }
}

fn template_filename(category: Category) -> String {
    format!("{}.md", category.template_name())
}

/// A rendered prompt, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub category: Category,
    pub text: String,
}

#[derive(Serialize)]
struct PromptVars<'a> {
    offense: &'a str,
    line: &'a str,
    context: String,
}

/// Prompt templates, one per category. Files in `override_dir` named
/// `<template>.md` take precedence over the embedded defaults.
pub struct PromptEngine {
    engine: upon::Engine<'static>,
}

impl PromptEngine {
    pub fn new(override_dir: Option<&Path>) -> Result<Self> {
        let mut engine = upon::Engine::new();
        for &category in CATEGORIES {
            let source = load_template(override_dir, category)?;
            engine
                .add_template(category.template_name(), source)
                .map_err(|e| {
                    Error::Prompt(format!(
                        "invalid template {}: {e}",
                        template_filename(category)
                    ))
                })?;
        }
        Ok(Self { engine })
    }

    pub fn render(&self, offense: &Offense, context: &ContextWindow) -> Result<Prompt> {
        let vars = PromptVars {
            offense: &offense.raw,
            line: &context.target_line,
            context: context.render(),
        };
        let template = self
            .engine
            .get_template(offense.category.template_name())
            .ok_or_else(|| Error::Prompt(format!("no template for {}", offense.category)))?;
        let text = template
            .render(&vars)
            .to_string()
            .map_err(|e| Error::Prompt(format!("failed to render {}: {e}", offense.category)))?;
        Ok(Prompt {
            category: offense.category,
            text,
        })
    }
}

fn load_template(override_dir: Option<&Path>, category: Category) -> Result<String> {
    if let Some(dir) = override_dir {
        let path: PathBuf = dir.join(template_filename(category));
        if path.exists() {
            return std::fs::read_to_string(&path).map_err(|e| {
                Error::Prompt(format!(
                    "failed to read override template {}: {e}",
                    path.display()
                ))
            });
        }
    }
    Ok(default_template(category).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offense::parse_offense;
    use std::fs;
    use tempfile::TempDir;

    fn context() -> ContextWindow {
        ContextWindow {
            target_line: "  if a = 1".to_string(),
            window: vec![
                (1, "def x".to_string()),
                (2, "  if a = 1".to_string()),
                (3, "  end".to_string()),
            ],
        }
    }

    #[test]
    fn test_generic_prompt() {
        let engine = PromptEngine::new(None).unwrap();
        let offense = parse_offense("a.rb:2:3: W: Lint/AssignmentInCondition: Wrap it.").unwrap();
        let prompt = engine.render(&offense, &context()).unwrap();
        assert_eq!(prompt.category, Category::Generic);
        assert!(prompt.text.contains("never changes the meaning"));
        assert!(prompt.text.contains("Fix this RuboCop offense: a.rb:2:3: W: Lint/AssignmentInCondition: Wrap it."));
        assert!(prompt.text.contains("Print only the fixed line, NOTHING ELSE"));
        assert!(prompt.text.contains("line     1:def x\nline     2:  if a = 1\nline     3:  end"));
    }

    #[test]
    fn test_development_dependency_prompt_uses_line_only() {
        let engine = PromptEngine::new(None).unwrap();
        let offense = parse_offense(
            "foo.gemspec:2:3: C: Gemspec/DevelopmentDependencies: Specify development dependencies in Gemfile.",
        )
        .unwrap();
        let prompt = engine.render(&offense, &context()).unwrap();
        assert_eq!(prompt.category, Category::DevelopmentDependency);
        assert!(prompt.text.contains("group: :development"));
        assert!(prompt.text.contains("Do not add any comments"));
        assert!(prompt.text.contains("Do not indent the line"));
        assert!(prompt.text.ends_with("  if a = 1\n"));
        assert!(!prompt.text.contains("line     1:"));
    }

    #[test]
    fn test_unknown_cop_falls_back_to_generic() {
        let engine = PromptEngine::new(None).unwrap();
        let offense = parse_offense("a.rb:2:1: C: Made/Up: nope").unwrap();
        let prompt = engine.render(&offense, &context()).unwrap();
        assert_eq!(prompt.category, Category::Generic);
        assert!(prompt.text.contains("Fix this RuboCop offense"));
    }

    #[test]
    fn test_override_takes_precedence() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("generic.md"), "Fix {{ offense }} in:\n{{ context }}").unwrap();

        let engine = PromptEngine::new(Some(dir.path())).unwrap();
        let offense = parse_offense("a.rb:2:1: bad").unwrap();
        let prompt = engine.render(&offense, &context()).unwrap();
        assert!(prompt.text.starts_with("Fix a.rb:2:1: bad in:\nline     1:def x"));
    }

    #[test]
    fn test_override_fallback_to_default() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("generic.md"), "custom {{ offense }}").unwrap();

        let engine = PromptEngine::new(Some(dir.path())).unwrap();
        let offense = parse_offense(
            "foo.gemspec:2:3: C: Gemspec/DevelopmentDependencies: Specify development dependencies in Gemfile.",
        )
        .unwrap();
        let prompt = engine.render(&offense, &context()).unwrap();
        assert!(prompt.text.contains("group: :development"));
    }

    #[test]
    fn test_invalid_override_errors() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("generic.md"), "broken {{ offense").unwrap();
        let err = PromptEngine::new(Some(dir.path())).err().unwrap();
        assert!(err.to_string().contains("invalid template generic.md"));
    }

    #[test]
    fn test_unknown_variable_errors_on_render() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("generic.md"), "{{ nope }}").unwrap();
        let engine = PromptEngine::new(Some(dir.path())).unwrap();
        let offense = parse_offense("a.rb:2:1: bad").unwrap();
        let err = engine.render(&offense, &context()).unwrap_err();
        assert!(err.to_string().contains("failed to render generic"));
    }
}
