use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::fixer::Fixer;
use crate::linter::Linter;
use crate::model::ModelClient;
use crate::offense::{Offense, parse_offense};
use crate::prompts::PromptEngine;
use crate::report::{Reporter, StdoutReporter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The linter had nothing left for us.
    Clean,
    /// Every remaining offense was fixed.
    Fixed { fixed: usize },
    /// The run limit was reached with offenses left over.
    Remaining { fixed: usize, left: usize },
}

impl RunOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            RunOutcome::Clean | RunOutcome::Fixed { .. } => 0,
            RunOutcome::Remaining { .. } => 1,
        }
    }
}

/// Order offenses so that fixing one never shifts the line of a later one:
/// per file, highest line (and column) first.
pub fn order_for_editing(offenses: &mut [Offense]) {
    offenses.sort_by(|a, b| {
        b.path
            .cmp(&a.path)
            .then(b.line.cmp(&a.line))
            .then(b.column.cmp(&a.column))
    });
}

pub struct Orchestrator<L, M, P = StdoutReporter> {
    linter: L,
    model: M,
    prompts: PromptEngine,
    reporter: P,
    config: Config,
}

impl<L: Linter, M: ModelClient, P: Reporter> Orchestrator<L, M, P> {
    pub fn new(linter: L, model: M, prompts: PromptEngine, reporter: P, config: Config) -> Self {
        Self {
            linter,
            model,
            prompts,
            reporter,
            config,
        }
    }

    pub fn reporter(&self) -> &P {
        &self.reporter
    }

    /// Autocorrect, list what is left, then fix up to `max_offenses` of it.
    /// The first error aborts the run; fixes already written stay.
    pub fn run(&self) -> Result<RunOutcome> {
        let paths = &self.config.paths;

        self.reporter.autocorrecting();
        if self.linter.autofix(paths)? {
            info!("autocorrect left nothing to fix");
            return Ok(RunOutcome::Clean);
        }

        self.reporter.listing();
        let raw = self.linter.remaining_offenses(paths)?;
        if raw.is_empty() {
            info!("no offenses remaining");
            return Ok(RunOutcome::Clean);
        }

        let mut offenses = raw
            .iter()
            .map(|line| parse_offense(line))
            .collect::<Result<Vec<_>>>()?;
        order_for_editing(&mut offenses);

        let total = offenses.len();
        let max = self.config.max_offenses;
        self.reporter.fixing_batch(max, total, &self.config.model);

        let fixer = Fixer::new(&self.config, &self.prompts, &self.model, &self.reporter);
        for offense in offenses.iter().take(max) {
            fixer.fix(offense)?;
        }

        let fixed = total.min(max);
        if total > max {
            let left = total - max;
            self.reporter.remaining(left);
            return Ok(RunOutcome::Remaining { fixed, left });
        }
        Ok(RunOutcome::Fixed { fixed })
    }
}
