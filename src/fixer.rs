use std::fmt;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::context;
use crate::error::Result;
use crate::model::ModelClient;
use crate::offense::{Category, Offense, parse_offense};
use crate::patch;
use crate::prompts::PromptEngine;
use crate::report::Reporter;
use crate::sanitize::{SanitizedEdit, sanitize};

/// The edit written for one offense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedFix {
    pub offense: Offense,
    pub content: String,
}

impl fmt::Display for AppliedFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixing {} with:\n{}", self.offense, self.content)
    }
}

/// Runs one offense through context, prompt, model, sanitizer and patcher.
pub struct Fixer<'a, M> {
    config: &'a Config,
    prompts: &'a PromptEngine,
    model: &'a M,
    reporter: &'a dyn Reporter,
}

impl<'a, M: ModelClient> Fixer<'a, M> {
    pub fn new(
        config: &'a Config,
        prompts: &'a PromptEngine,
        model: &'a M,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            config,
            prompts,
            model,
            reporter,
        }
    }

    pub fn fix_raw(&self, raw: &str) -> Result<AppliedFix> {
        self.fix(&parse_offense(raw)?)
    }

    pub fn fix(&self, offense: &Offense) -> Result<AppliedFix> {
        let window = context::extract(&offense.path, offense.line, self.config.context_radius)?;
        let prompt = self.prompts.render(offense, &window)?;
        self.reporter.prompt(&prompt.text);
        debug!(category = %prompt.category, chars = prompt.text.len(), "prompt rendered");

        let answer = self.model.complete(&prompt.text)?;
        self.reporter.answer(&answer);
        debug!(chars = answer.len(), "answer received");

        let edit = sanitize(&answer, &window.target_line, offense.category);
        if edit.content.contains('\n') {
            warn!(offense = %offense, "model answered with more than one line");
        }

        let fix = AppliedFix {
            offense: offense.clone(),
            content: edit.content.clone(),
        };
        self.reporter.fixed(&fix);
        self.apply(offense, &edit)?;
        info!(path = %offense.path.display(), line = offense.line, category = %offense.category, "applied fix");
        Ok(fix)
    }

    fn apply(&self, offense: &Offense, edit: &SanitizedEdit) -> Result<()> {
        match edit.category {
            Category::Generic => patch::replace_line(&offense.path, offense.line, &edit.content),
            Category::DevelopmentDependency => {
                patch::append_line(&self.config.manifest, &edit.content)?;
                patch::remove_line(&offense.path, offense.line)?;
                Ok(())
            }
        }
    }
}
