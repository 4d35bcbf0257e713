//! One complete upgrade run driven by `UpdateSettings`
//!
//! Class changes run before property changes. Outputs land in `outputDir`:
//! `additions.nt`, `retractions.nt` and the updated `abox.nt`.

use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use crate::change::{load_changes, AtomicOntologyChange};
use crate::config::UpdateSettings;
use crate::errors::Result;
use crate::graph::{Abox, SchemaVersion, Tbox};
use crate::update::{ChangeLogger, ChangeProcessor, ChangeRecord, MigrationContext, ProcessSummary};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeReport {
    pub classes: ProcessSummary,
    pub properties: ProcessSummary,
    pub additions: usize,
    pub retractions: usize,
    pub errors: usize,
    pub additions_path: PathBuf,
    pub retractions_path: PathBuf,
    pub abox_path: PathBuf,
}

/// Change lists named by the settings, in processing order
#[derive(Debug, Default)]
pub struct ChangeLists {
    pub classes: Vec<AtomicOntologyChange>,
    pub properties: Vec<AtomicOntologyChange>,
}

impl ChangeLists {
    pub fn load(settings: &UpdateSettings) -> Result<Self> {
        let classes = match &settings.class_changes {
            Some(path) => load_changes(path)?,
            None => Vec::new(),
        };
        let properties = match &settings.property_changes {
            Some(path) => load_changes(path)?,
            None => Vec::new(),
        };
        Ok(Self { classes, properties })
    }
}

fn open_logger(settings: &UpdateSettings) -> Result<ChangeLogger> {
    match (&settings.change_log, &settings.error_log) {
        (Some(change_log), Some(error_log)) => ChangeLogger::with_files(change_log, error_log),
        (Some(change_log), None) => {
            ChangeLogger::with_files(change_log, &change_log.with_extension("error.log"))
        }
        (None, Some(error_log)) => {
            ChangeLogger::with_files(&error_log.with_extension("change.log"), error_log)
        }
        (None, None) => Ok(ChangeLogger::new()),
    }
}

pub fn run_upgrade(settings: &UpdateSettings) -> Result<UpgradeReport> {
    let old_tbox = Tbox::load_file(SchemaVersion::Old, &settings.old_tbox)?;
    let new_tbox = Tbox::load_file(SchemaVersion::New, &settings.new_tbox)?;
    let abox = Abox::load_file(&settings.abox)?;
    let changes = ChangeLists::load(settings)?;

    let logger = open_logger(settings)?;
    let record = ChangeRecord::new();
    let processor = ChangeProcessor::new(MigrationContext {
        old_tbox: &old_tbox,
        new_tbox: &new_tbox,
        abox: &abox,
        logger: &logger,
        record: &record,
    });

    let classes = processor.process_class_changes(&changes.classes);
    let properties = processor.process_property_changes(&changes.properties);

    let (additions_path, retractions_path) = record.save(&settings.output_dir)?;
    let abox_path = settings.output_dir.join("abox.nt");
    fs::create_dir_all(&settings.output_dir)?;
    abox.write_ntriples(BufWriter::new(File::create(&abox_path)?))?;

    Ok(UpgradeReport {
        classes,
        properties,
        additions: record.additions()?.len(),
        retractions: record.retractions()?.len(),
        errors: logger.error_count(),
        additions_path,
        retractions_path,
        abox_path,
    })
}
