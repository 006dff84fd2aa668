use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::error::{Error, Result};
use crate::process::{ProcessConfig, ProcessOutput, spawn_and_collect};

static ANSI_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[(\d+)(;\d+)*m").expect("ansi pattern is valid"));

const AUTOCORRECT_FLAG: &str = "--autocorrect-all";
const LIST_FLAG: &str = "--parallel";

/// Number of output lines per offense: message, source line, caret.
const LINES_PER_OFFENSE: usize = 3;
/// Blank-line-delimited block holding the offense list.
const OFFENSE_BLOCK: usize = 2;

/// The external linter.
pub trait Linter {
    /// Run the linter's own autocorrect. `true` means nothing is left to fix.
    fn autofix(&self, paths: &[String]) -> Result<bool>;

    /// Raw diagnostic lines for every offense still reported.
    fn remaining_offenses(&self, paths: &[String]) -> Result<Vec<String>>;
}

/// Runs RuboCop (or anything with the same output layout) as a child process.
pub struct RubocopLinter {
    command: Vec<String>,
    working_dir: PathBuf,
    runtime: tokio::runtime::Runtime,
}

impl RubocopLinter {
    pub fn new(command: Vec<String>, working_dir: PathBuf) -> Result<Self> {
        if command.is_empty() {
            return Err(Error::ConfigValidation(
                "linter must name a command".to_string(),
            ));
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            command,
            working_dir,
            runtime,
        })
    }

    fn process_config(&self, flag: &str, paths: &[String]) -> ProcessConfig {
        let mut args: Vec<String> = self.command[1..].to_vec();
        args.push(flag.to_string());
        args.extend(paths.iter().cloned());
        ProcessConfig {
            command: self.command[0].clone(),
            args,
            working_dir: self.working_dir.clone(),
            log_prefix: "linter".to_string(),
        }
    }

    fn run(&self, config: ProcessConfig) -> Result<ProcessOutput> {
        self.runtime.block_on(spawn_and_collect(config))
    }
}

impl Linter for RubocopLinter {
    fn autofix(&self, paths: &[String]) -> Result<bool> {
        let config = self.process_config(AUTOCORRECT_FLAG, paths);
        info!(command = %config.display(), "running autocorrect");
        Ok(self.run(config)?.success())
    }

    fn remaining_offenses(&self, paths: &[String]) -> Result<Vec<String>> {
        let config = self.process_config(LIST_FLAG, paths);
        info!(command = %config.display(), "listing remaining offenses");
        let output = self.run(config.clone())?;
        if output.success() {
            return Ok(Vec::new());
        }
        let text = strip_colors(&output.combined());
        parse_offense_list(&config.display(), &text)
    }
}

pub fn strip_colors(text: &str) -> String {
    ANSI_COLOR_RE.replace_all(text, "").into_owned()
}

/// Pull the diagnostic lines out of RuboCop's default formatter output.
///
/// The layout is assumed, not probed: the third blank-line-delimited block
/// is the offense list, and every offense spans exactly three lines.
pub fn parse_offense_list(command: &str, output: &str) -> Result<Vec<String>> {
    let unparseable = || Error::UnparseableOutput {
        command: command.to_string(),
        output: output.to_string(),
    };

    let block = output.split("\n\n").nth(OFFENSE_BLOCK).ok_or_else(unparseable)?;
    let lines: Vec<&str> = block.lines().collect();
    if lines.len() % LINES_PER_OFFENSE != 0 {
        return Err(unparseable());
    }

    let offenses: Vec<String> = lines
        .chunks(LINES_PER_OFFENSE)
        .map(|group| group[0].to_string())
        .collect();
    if offenses.is_empty() {
        return Err(Error::NoOffenses {
            output: output.to_string(),
        });
    }
    Ok(offenses)
}
