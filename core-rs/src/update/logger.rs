//! Narrative change log and error log for an upgrade run
//!
//! Entries are always kept in memory for the operator report. When file sinks
//! are attached each entry is also appended there; a failing sink is reported
//! through `tracing` and otherwise ignored, so logging can never abort a run.

use chrono::{DateTime, Utc};
use oxigraph::model::{Subject, Term, Triple};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::errors::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

type Sink = Mutex<Box<dyn Write + Send>>;

pub struct ChangeLogger {
    entries: Mutex<Vec<LogEntry>>,
    change_log: Option<Sink>,
    error_log: Option<Sink>,
}

impl std::fmt::Debug for ChangeLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeLogger")
            .field("entries", &self.entries.lock().map(|e| e.len()).unwrap_or(0))
            .field("change_log", &self.change_log.as_ref().map(|_| "<Write>"))
            .field("error_log", &self.error_log.as_ref().map(|_| "<Write>"))
            .finish()
    }
}

impl Default for ChangeLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeLogger {
    /// In-memory only
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            change_log: None,
            error_log: None,
        }
    }

    pub fn with_writers(change_log: Box<dyn Write + Send>, error_log: Box<dyn Write + Send>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            change_log: Some(Mutex::new(change_log)),
            error_log: Some(Mutex::new(error_log)),
        }
    }

    /// Append to (and create if needed) the two log files
    pub fn with_files(change_log: &Path, error_log: &Path) -> Result<Self> {
        Ok(Self::with_writers(
            Box::new(open_append(change_log)?),
            Box::new(open_append(error_log)?),
        ))
    }

    /// Narrative entry: advisories, additions, removals
    pub fn log(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(target: "abox_update::change_log", "{}", message);
        self.push(LogLevel::Info, message);
    }

    /// Lookup failures, unresolved ancestry, bad change kinds
    pub fn log_error(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(target: "abox_update::change_log", "{}", message);
        self.push(LogLevel::Error, message);
    }

    /// `Added Statement: ...` / `Removed Statement: ...`
    pub fn log_statement(&self, statement: &Triple, added: bool) {
        self.log(format!(
            "{} Statement: subject = {} property = {} object = {}",
            if added { "Added" } else { "Removed" },
            subject_label(&statement.subject),
            statement.predicate.as_str(),
            term_label(&statement.object)
        ));
    }

    fn push(&self, level: LogLevel, message: String) {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            message,
        };

        let sink = match level {
            LogLevel::Info => self.change_log.as_ref(),
            LogLevel::Error => self.error_log.as_ref(),
        };
        if let Some(sink) = sink {
            let mut writer = sink.lock().unwrap_or_else(PoisonError::into_inner);
            let written = writeln!(writer, "{} {}", entry.timestamp.to_rfc3339(), entry.message)
                .and_then(|_| writer.flush());
            if let Err(e) = written {
                tracing::warn!(error = %e, "log sink write failed; entry kept in memory only");
            }
        }

        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages_at(LogLevel::Info)
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages_at(LogLevel::Error)
    }

    pub fn error_count(&self) -> usize {
        self.errors().len()
    }
}

fn open_append(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

pub(crate) fn subject_label(subject: &Subject) -> String {
    match subject {
        Subject::NamedNode(node) => node.as_str().to_string(),
        other => other.to_string(),
    }
}

pub(crate) fn term_label(term: &Term) -> String {
    match term {
        Term::NamedNode(node) => node.as_str().to_string(),
        Term::Literal(literal) => literal.value().to_string(),
        other => other.to_string(),
    }
}
