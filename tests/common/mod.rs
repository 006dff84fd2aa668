#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use rubofix::config::Config;
use rubofix::error::{Error, Result};
use rubofix::linter::Linter;
use rubofix::model::ModelClient;

/// Sensible default `Config` for tests. Callers can override fields via struct update syntax.
pub fn default_test_config(root: &Path) -> Config {
    Config {
        api_key: "x".to_string(),
        model: "x".to_string(),
        base_url: "http://127.0.0.1:9".to_string(),
        max_offenses: 1,
        context_radius: 0,
        debug: false,
        linter: vec!["rubocop".to_string()],
        manifest: root.join("Gemfile"),
        prompt_dir: None,
        paths: vec![],
    }
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Replies with canned answers in order and remembers every prompt.
#[derive(Default)]
pub struct StubModel {
    pub replies: RefCell<VecDeque<Result<String>>>,
    pub prompts: RefCell<Vec<String>>,
}

impl StubModel {
    pub fn replying(replies: &[&str]) -> Self {
        Self {
            replies: RefCell::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, body: &str) -> Self {
        Self {
            replies: RefCell::new(VecDeque::from([Err(Error::Upstream {
                status,
                body: body.to_string(),
            })])),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl ModelClient for StubModel {
    fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Response("stub has no more replies".to_string())))
    }
}

/// Linter that reports a fixed set of outcomes.
pub struct MockLinter {
    pub autofix_clean: bool,
    pub offenses: Result<Vec<String>>,
    pub calls: RefCell<Vec<String>>,
}

impl MockLinter {
    pub fn with_offenses(offenses: Vec<String>) -> Self {
        Self {
            autofix_clean: false,
            offenses: Ok(offenses),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn clean() -> Self {
        Self {
            autofix_clean: true,
            offenses: Ok(vec![]),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl Linter for MockLinter {
    fn autofix(&self, _paths: &[String]) -> Result<bool> {
        self.calls.borrow_mut().push("autofix".to_string());
        Ok(self.autofix_clean)
    }

    fn remaining_offenses(&self, _paths: &[String]) -> Result<Vec<String>> {
        self.calls.borrow_mut().push("list".to_string());
        match &self.offenses {
            Ok(offenses) => Ok(offenses.clone()),
            Err(e) => Err(Error::UnparseableOutput {
                command: "rubocop".to_string(),
                output: e.to_string(),
            }),
        }
    }
}
