use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// `path:line:column: ` followed by an optional `S: [Correctable] Dept/Cop:` token.
static OFFENSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<path>.+?):(?P<line>\d+):(?P<column>\d+): (?:(?P<severity>[A-Z]): (?:\[[^\]]*\] )?(?P<cop>\w+(?:/\w+)+):)?",
    )
    .expect("offense pattern is valid")
});

/// How an offense gets turned into a prompt and an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Rewrite the offending line in place.
    Generic,
    /// Move a gemspec development dependency into the Gemfile.
    DevelopmentDependency,
}

impl Category {
    pub fn from_cop(cop: Option<&str>) -> Self {
        match cop {
            Some("Gemspec/DevelopmentDependencies") => Category::DevelopmentDependency,
            _ => Category::Generic,
        }
    }

    /// Name of the prompt template used for this category.
    pub fn template_name(self) -> &'static str {
        match self {
            Category::Generic => "generic",
            Category::DevelopmentDependency => "development-dependency",
        }
    }

    /// Whether the model's answer replaces the original line and therefore
    /// inherits its indentation.
    pub fn reattaches_indent(self) -> bool {
        match self {
            Category::Generic => true,
            Category::DevelopmentDependency => false,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.template_name())
    }
}

/// One diagnostic reported by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offense {
    pub path: PathBuf,
    /// 1-based.
    pub line: usize,
    pub column: usize,
    pub severity: Option<char>,
    pub cop: Option<String>,
    pub category: Category,
    pub raw: String,
}

impl fmt::Display for Offense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parse one diagnostic line such as
/// `app/models/user.rb:12:5: C: [Correctable] Style/StringLiterals: Prefer single quotes.`
pub fn parse_offense(raw: &str) -> Result<Offense> {
    let fail = |reason: &str| Error::Parse {
        raw: raw.to_string(),
        reason: reason.to_string(),
    };

    let caps = OFFENSE_RE
        .captures(raw)
        .ok_or_else(|| fail("expected path:line:column: prefix"))?;

    let line: usize = caps["line"]
        .parse()
        .map_err(|_| fail("line number out of range"))?;
    if line == 0 {
        return Err(fail("line numbers start at 1"));
    }
    let column: usize = caps["column"]
        .parse()
        .map_err(|_| fail("column number out of range"))?;

    let cop = caps.name("cop").map(|m| m.as_str().to_string());
    let severity = caps
        .name("severity")
        .and_then(|m| m.as_str().chars().next());

    Ok(Offense {
        path: PathBuf::from(&caps["path"]),
        line,
        column,
        severity,
        category: Category::from_cop(cop.as_deref()),
        cop,
        raw: raw.to_string(),
    })
}
