//! Atomic ontology changes produced by an ontology diff
//!
//! A change list file is a YAML (or JSON) sequence:
//!
//! ```yaml
//! - sourceUri: http://example.org/Mammal
//!   destinationUri: http://example.org/Animal
//!   kind: rename
//! - destinationUri: http://example.org/Reptile
//!   kind: add
//!   notes: split out of Animal
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::errors::{Result, UpdateError};

/// Kind of edit distinguishing two schema versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AtomicChangeType {
    Add,
    Delete,
    Rename,
}

impl FromStr for AtomicChangeType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "delete" => Ok(Self::Delete),
            "rename" => Ok(Self::Rename),
            other => Err(format!("unknown change type: {}", other)),
        }
    }
}

impl fmt::Display for AtomicChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "ADD"),
            Self::Delete => write!(f, "DELETE"),
            Self::Rename => write!(f, "RENAME"),
        }
    }
}

/// One add, delete or rename of a class or property
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtomicOntologyChange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_uri: Option<String>,
    pub kind: Option<AtomicChangeType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AtomicOntologyChange {
    pub fn new(
        source_uri: Option<&str>,
        destination_uri: Option<&str>,
        kind: Option<AtomicChangeType>,
    ) -> Self {
        Self {
            source_uri: source_uri.map(str::to_string),
            destination_uri: destination_uri.map(str::to_string),
            kind,
            notes: None,
        }
    }

    pub fn add(destination_uri: &str) -> Self {
        Self::new(None, Some(destination_uri), Some(AtomicChangeType::Add))
    }

    pub fn delete(source_uri: &str) -> Self {
        Self::new(Some(source_uri), None, Some(AtomicChangeType::Delete))
    }

    pub fn rename(source_uri: &str, destination_uri: &str) -> Self {
        Self::new(
            Some(source_uri),
            Some(destination_uri),
            Some(AtomicChangeType::Rename),
        )
    }

    pub fn source(&self) -> Result<&str> {
        self.source_uri
            .as_deref()
            .ok_or(UpdateError::MissingUri("source"))
    }

    pub fn destination(&self) -> Result<&str> {
        self.destination_uri
            .as_deref()
            .ok_or(UpdateError::MissingUri("destination"))
    }
}

impl fmt::Display for AtomicOntologyChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self
            .kind
            .map(|k| k.to_string())
            .unwrap_or_else(|| "<none>".to_string());
        write!(
            f,
            "{} {} -> {}",
            kind,
            self.source_uri.as_deref().unwrap_or("-"),
            self.destination_uri.as_deref().unwrap_or("-")
        )
    }
}

/// On-disk shape of a change; `kind` is kept as free text so an unknown
/// value reaches the processor instead of failing the whole file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangeEntry {
    #[serde(default)]
    source_uri: Option<String>,
    #[serde(default)]
    destination_uri: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

impl From<ChangeEntry> for AtomicOntologyChange {
    fn from(entry: ChangeEntry) -> Self {
        let kind = entry.kind.as_deref().and_then(|raw| match raw.parse::<AtomicChangeType>() {
            Ok(kind) => Some(kind),
            Err(e) => {
                tracing::warn!(
                    source = entry.source_uri.as_deref().unwrap_or("-"),
                    destination = entry.destination_uri.as_deref().unwrap_or("-"),
                    "{}", e
                );
                None
            }
        });
        Self {
            source_uri: entry.source_uri,
            destination_uri: entry.destination_uri,
            kind,
            notes: entry.notes,
        }
    }
}

/// Parse a YAML change list. YAML is a superset of JSON, so JSON input works too.
pub fn parse_changes(content: &str) -> Result<Vec<AtomicOntologyChange>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let entries: Vec<ChangeEntry> = serde_yaml::from_str(content)?;
    Ok(entries.into_iter().map(Into::into).collect())
}

/// Load a change list from disk; `.json` files go through serde_json.
pub fn load_changes(path: &Path) -> Result<Vec<AtomicOntologyChange>> {
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let changes = if is_json {
        let entries: Vec<ChangeEntry> = serde_json::from_str(&content)?;
        entries.into_iter().map(Into::into).collect()
    } else {
        parse_changes(&content)?
    };

    tracing::debug!(path = %path.display(), count = changes.len(), "loaded change list");
    Ok(changes)
}
