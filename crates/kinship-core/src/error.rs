use std::fmt;
use std::path::PathBuf;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InputUnreadable,
    ConfigParseError,
    CycleDetected,
    MalformedInput,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InputUnreadable => "E1001",
            Self::ConfigParseError => "E1002",
            Self::CycleDetected => "E2001",
            Self::MalformedInput => "E2002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InputUnreadable => "Edge list could not be read",
            Self::ConfigParseError => "Config file parse error",
            Self::CycleDetected => "Cycle reachable from root",
            Self::MalformedInput => "Malformed edge list lines",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InputUnreadable => Some("Check the path and read permissions."),
            Self::ConfigParseError => Some("Fix syntax in kinship.toml and retry."),
            Self::CycleDetected => {
                Some("Remove one edge of the reported cycle; the graph must be acyclic below the root.")
            }
            Self::MalformedInput => {
                Some("Each line must be `parent, child`; drop --strict to skip bad lines.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Fatal failures of the analysis pipeline.
///
/// Malformed lines are not errors by default: the loader skips them and
/// records them. [`AnalysisError::MalformedInput`] is only produced when a
/// caller opts into strict parsing.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("failed to read edge list {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cycle reachable from root '{root}': {}", members.join(", "))]
    CycleDetected { root: String, members: Vec<String> },

    #[error("{count} malformed line(s) in edge list, first at line {first_line}")]
    MalformedInput { count: usize, first_line: usize },

    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl AnalysisError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::InputUnreadable,
            Self::CycleDetected { .. } => ErrorCode::CycleDetected,
            Self::MalformedInput { .. } => ErrorCode::MalformedInput,
            Self::Config { .. } => ErrorCode::ConfigParseError,
        }
    }

    /// Remediation text, falling back to the code's summary.
    #[must_use]
    pub fn suggestion(&self) -> String {
        let code = self.code();
        code.hint().unwrap_or(code.message()).to_string()
    }
}
