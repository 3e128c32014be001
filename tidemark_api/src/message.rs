use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity levels for check messages.
///
/// `Fatal` is a classification for the caller (e.g., block a merge); the engine
/// itself never stops on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Potential issue that may require attention.
    Warning,
    /// Definite issue that must be addressed before submission.
    Error,
    /// Issue that must block the change outright.
    Fatal,
}

impl Severity {
    /// Lowercase label used in text output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where inside a file a message is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MessageLine {
    /// Attached to the file as a whole.
    Virtual,
    /// Attached to a concrete diff line.
    At {
        /// Zero-based index of the line within the patch.
        position: usize,
        /// 1-based line number on the base side if applicable.
        #[serde(default)]
        base_line: Option<u32>,
        /// 1-based line number on the head side if applicable.
        #[serde(default)]
        head_line: Option<u32>,
    },
}

impl MessageLine {
    /// The most useful line number for display: head side first, then base side.
    #[must_use]
    pub fn display_line(&self) -> Option<u32> {
        match self {
            Self::Virtual => None,
            Self::At {
                base_line,
                head_line,
                ..
            } => head_line.or(*base_line),
        }
    }
}

/// Diagnostic emitted by a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Path relative to the repository root.
    pub path: String,
    /// Line the message is attached to.
    pub line: MessageLine,
    /// Severity level of the message.
    pub severity: Severity,
    /// Human-readable description of the problem.
    pub text: String,
    /// Stable identifier of the check that produced the message.
    pub check: String,
}

impl Message {
    /// Convenience constructor.
    pub fn new(
        path: impl Into<String>,
        line: MessageLine,
        severity: Severity,
        text: impl Into<String>,
        check: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            line,
            severity,
            text: text.into(),
            check: check.into(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line.display_line() {
            Some(line) => write!(f, "{}:{line}: ", self.path)?,
            None => write!(f, "{}: ", self.path)?,
        }
        write!(f, "{}: {} [{}]", self.severity, self.text, self.check)
    }
}
