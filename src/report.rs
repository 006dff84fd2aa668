use std::cell::RefCell;

use crate::fixer::AppliedFix;

/// Observer for user-facing progress of a run.
pub trait Reporter {
    fn autocorrecting(&self);
    fn listing(&self);
    fn fixing_batch(&self, max: usize, total: usize, model: &str);
    fn prompt(&self, text: &str);
    fn answer(&self, text: &str);
    fn fixed(&self, fix: &AppliedFix);
    fn remaining(&self, left: usize);
}

/// Prints progress to stdout; prompts and answers only in debug mode.
pub struct StdoutReporter {
    pub debug: bool,
}

impl Reporter for StdoutReporter {
    fn autocorrecting(&self) {
        println!("Attempting to use builtin autocorrect ...");
    }

    fn listing(&self) {
        println!("Getting remaining offenses ...");
    }

    fn fixing_batch(&self, max: usize, total: usize, model: &str) {
        println!("Fixing MAX={max} of {total} offenses with MODEL={model} ...");
    }

    fn prompt(&self, text: &str) {
        if self.debug {
            println!("prompt:{text}");
        }
    }

    fn answer(&self, text: &str) {
        if self.debug {
            println!("answer:\n{text}");
        }
    }

    fn fixed(&self, fix: &AppliedFix) {
        println!("{fix}");
    }

    fn remaining(&self, left: usize) {
        eprintln!("Not all offenses fixed, run again to fix more ({left} left)");
    }
}

/// Collects every event as a line of text. Handy in tests.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    fn push(&self, event: String) {
        self.events.borrow_mut().push(event);
    }
}

impl Reporter for RecordingReporter {
    fn autocorrecting(&self) {
        self.push("autocorrect".to_string());
    }

    fn listing(&self) {
        self.push("list".to_string());
    }

    fn fixing_batch(&self, max: usize, total: usize, model: &str) {
        self.push(format!("batch max={max} total={total} model={model}"));
    }

    fn prompt(&self, text: &str) {
        self.push(format!("prompt:{text}"));
    }

    fn answer(&self, text: &str) {
        self.push(format!("answer:{text}"));
    }

    fn fixed(&self, fix: &AppliedFix) {
        self.push(fix.to_string());
    }

    fn remaining(&self, left: usize) {
        self.push(format!("remaining {left}"));
    }
}
