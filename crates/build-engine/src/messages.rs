//! Compiler messages
//!
//! Diagnostics produced by the packaging tools, tagged with a category and
//! an optional position.

use std::fmt;
use serde::Serialize;

/// Severity of a compiler message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilerMessageCategory {
    Info,
    Warning,
    Error,
}

impl fmt::Display for CompilerMessageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompilerMessageCategory::Info => write!(f, "info"),
            CompilerMessageCategory::Warning => write!(f, "warning"),
            CompilerMessageCategory::Error => write!(f, "error"),
        }
    }
}

/// One diagnostic line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilerMessage {
    pub category: CompilerMessageCategory,
    pub text: String,
    /// `file://` url of the file the message points at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl CompilerMessage {
    /// Message without position
    pub fn new(category: CompilerMessageCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
            url: None,
            line: None,
            column: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(CompilerMessageCategory::Error, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(CompilerMessageCategory::Warning, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(CompilerMessageCategory::Info, text)
    }

    /// Attach a position
    pub fn at(mut self, url: impl Into<String>, line: Option<u32>, column: Option<u32>) -> Self {
        self.url = Some(url.into());
        self.line = line;
        self.column = column;
        self
    }
}

impl fmt::Display for CompilerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref url) = self.url {
            write!(f, "{}", url.trim_start_matches("file://"))?;
            if let Some(line) = self.line {
                write!(f, ":{}", line)?;
                if let Some(column) = self.column {
                    write!(f, ":{}", column)?;
                }
            }
            write!(f, ": ")?;
        }
        write!(f, "{}: {}", self.category, self.text)
    }
}

/// Messages collected from one tool run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolMessages {
    messages: Vec<CompilerMessage>,
}

impl ToolMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: CompilerMessage) {
        self.messages.push(message);
    }

    pub fn count(&self, category: CompilerMessageCategory) -> usize {
        self.messages.iter().filter(|m| m.category == category).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(CompilerMessageCategory::Error) > 0
    }

    pub fn messages(&self) -> &[CompilerMessage] {
        &self.messages
    }
}

impl From<Vec<CompilerMessage>> for ToolMessages {
    fn from(messages: Vec<CompilerMessage>) -> Self {
        Self { messages }
    }
}

impl IntoIterator for ToolMessages {
    type Item = CompilerMessage;
    type IntoIter = std::vec::IntoIter<CompilerMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}
