use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to parse offense {raw} ({reason})")]
    Parse { raw: String, reason: String },

    #[error("unparseable offenses found with command:\n{command}\n{output}")]
    UnparseableOutput { command: String, output: String },

    #[error("no offenses found\n{output}")]
    NoOffenses { output: String },

    #[error("invalid http response {status}:\n{body}")]
    Upstream { status: u16, body: String },

    #[error("completion request failed: {0}")]
    Transport(String),

    #[error("invalid completion response: {0}")]
    Response(String),

    #[error("prompt error: {0}")]
    Prompt(String),

    #[error("line {line} is out of range for {} ({len} lines)", .path.display())]
    LineOutOfRange {
        path: PathBuf,
        line: usize,
        len: usize,
    },

    #[error("{} is not valid UTF-8 ({reason})", .path.display())]
    Encoding { path: PathBuf, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("process error: {0}")]
    Process(String),

    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    ConfigValidation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
