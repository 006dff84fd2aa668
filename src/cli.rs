use clap::Parser;

/// rubofix — fix RuboCop offenses that autocorrect cannot, one line at a time
#[derive(Parser, Debug, Clone)]
#[command(name = "rubofix", version, about)]
pub struct Cli {
    /// Files or directories handed to the linter
    pub paths: Vec<String>,

    /// Maximum number of offenses to fix in this run (env: MAX, default: 1)
    #[arg(long)]
    pub max: Option<usize>,

    /// Lines of context above and below the offense (env: CONTEXT, default: 0)
    #[arg(long)]
    pub context: Option<usize>,

    /// Model to ask for fixes (env: MODEL, default: gpt-4o-mini)
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL of the completion API (env: OPENAI_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Linter command, split on whitespace (default: "bundle exec rubocop")
    #[arg(long)]
    pub linter: Option<String>,

    /// Echo prompts and answers (env: DEBUG)
    #[arg(long)]
    pub debug: bool,

    /// Path to config file (default: .rubofix.toml when present)
    #[arg(long)]
    pub config: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare() {
        let cli = Cli::parse_from(["rubofix"]);
        assert!(cli.paths.is_empty());
        assert!(cli.max.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn test_parse_paths() {
        let cli = Cli::parse_from(["rubofix", "app", "lib/foo.rb"]);
        assert_eq!(cli.paths, vec!["app", "lib/foo.rb"]);
    }

    #[test]
    fn test_parse_all_overrides() {
        let cli = Cli::parse_from([
            "rubofix",
            "--max",
            "5",
            "--context",
            "3",
            "--model",
            "gpt-test",
            "--base-url",
            "http://localhost:1234",
            "--linter",
            "rubocop",
            "--debug",
            "--config",
            "custom.toml",
            "lib",
        ]);
        assert_eq!(cli.max, Some(5));
        assert_eq!(cli.context, Some(3));
        assert_eq!(cli.model.as_deref(), Some("gpt-test"));
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:1234"));
        assert_eq!(cli.linter.as_deref(), Some("rubocop"));
        assert!(cli.debug);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
        assert_eq!(cli.paths, vec!["lib"]);
    }
}
