/**
 * config.rs
 * Parser for upgrade settings files (YAML format)
 *
 * Format:
 * ```yaml
 * oldTbox: ontology/v1.ttl
 * newTbox: ontology/v2.ttl
 * abox: data/abox.ttl
 * classChanges: diff/classes.yaml
 * propertyChanges: diff/properties.yaml
 * changeLog: logs/knowledgeBaseUpdate.log
 * errorLog: logs/knowledgeBaseUpdate.error.log
 * outputDir: out
 * ```
 *
 * Relative paths resolve against the directory holding the settings file.
 */

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::UpdateError;

/// Upgrade run settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettings {
    /// Previous ontology version (Turtle)
    pub old_tbox: PathBuf,
    /// New ontology version (Turtle)
    pub new_tbox: PathBuf,
    /// Instance data to reconcile (Turtle)
    pub abox: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_changes: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_changes: Option<PathBuf>,
    /// Narrative log file (appended)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_log: Option<PathBuf>,
    /// Error log file (appended)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_log: Option<PathBuf>,
    /// Receives additions.nt, retractions.nt and the updated abox.nt
    pub output_dir: PathBuf,
}

impl UpdateSettings {
    /// Load settings from a YAML file, resolving relative paths against its directory
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, UpdateError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(UpdateError::FileNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        let content = fs::read_to_string(path)?;
        let mut settings: UpdateSettings = serde_yaml::from_str(&content)?;

        if let Some(base) = path.parent() {
            settings.resolve_against(base);
        }

        settings.validate()?;

        Ok(settings)
    }

    fn resolve_against(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        resolve(&mut self.old_tbox);
        resolve(&mut self.new_tbox);
        resolve(&mut self.abox);
        resolve(&mut self.output_dir);
        for p in [
            &mut self.class_changes,
            &mut self.property_changes,
            &mut self.change_log,
            &mut self.error_log,
        ]
        .into_iter()
        .flatten()
        {
            resolve(p);
        }
    }

    /// Ensures the input graphs exist and at least one change list is named
    pub fn validate(&self) -> Result<(), UpdateError> {
        for (field, p) in [
            ("oldTbox", &self.old_tbox),
            ("newTbox", &self.new_tbox),
            ("abox", &self.abox),
        ] {
            if !p.is_file() {
                return Err(UpdateError::Validation(format!(
                    "{} does not point to a file: {}",
                    field,
                    p.display()
                )));
            }
        }

        if self.class_changes.is_none() && self.property_changes.is_none() {
            return Err(UpdateError::Validation(
                "at least one of classChanges or propertyChanges is required".to_string(),
            ));
        }

        Ok(())
    }
}
