pub mod buffer;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod fixer;
pub mod linter;
pub mod model;
pub mod offense;
pub mod orchestrator;
pub mod patch;
pub mod process;
pub mod prompts;
pub mod report;
pub mod sanitize;
