//! Audit trail of every statement added to or retracted from the ABox
//!
//! One `ChangeRecord` spans a whole run, so a single additions/retractions
//! pair summarizes the migration for downstream rollback and reporting.

use oxigraph::model::{Graph, Triple};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::errors::{Result, UpdateError};

#[derive(Debug, Default)]
pub struct ChangeRecord {
    additions: Mutex<Graph>,
    retractions: Mutex<Graph>,
}

fn lock<'a>(graph: &'a Mutex<Graph>, name: &str) -> Result<MutexGuard<'a, Graph>> {
    graph
        .lock()
        .map_err(|e| UpdateError::Lock(format!("{} record: {}", name, e)))
}

impl ChangeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the additions graph; an empty slice is a no-op
    pub fn record_additions(&self, statements: &[Triple]) -> Result<()> {
        let mut graph = lock(&self.additions, "additions")?;
        for statement in statements {
            graph.insert(statement);
        }
        Ok(())
    }

    /// Append to the retractions graph; an empty slice is a no-op
    pub fn record_retractions(&self, statements: &[Triple]) -> Result<()> {
        let mut graph = lock(&self.retractions, "retractions")?;
        for statement in statements {
            graph.insert(statement);
        }
        Ok(())
    }

    pub fn additions(&self) -> Result<Graph> {
        Ok(lock(&self.additions, "additions")?.clone())
    }

    pub fn retractions(&self) -> Result<Graph> {
        Ok(lock(&self.retractions, "retractions")?.clone())
    }

    /// Write `additions.nt` and `retractions.nt` into `dir`
    pub fn save(&self, dir: &Path) -> Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(dir)?;
        let additions_path = dir.join("additions.nt");
        let retractions_path = dir.join("retractions.nt");

        let additions = lock(&self.additions, "additions")?;
        write_graph(&additions, &additions_path)?;
        let retractions = lock(&self.retractions, "retractions")?;
        write_graph(&retractions, &retractions_path)?;

        Ok((additions_path, retractions_path))
    }
}

fn write_graph(graph: &Graph, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for triple in graph.iter() {
        writeln!(writer, "{} .", triple)?;
    }
    writer.flush()?;
    tracing::debug!(path = %path.display(), statements = graph.len(), "wrote audit graph");
    Ok(())
}
