//! Dispatches ordered change lists to the class and property migrators
//!
//! Changes run strictly in the order given; a later change may refer to an
//! entity an earlier one created or renamed. A failing change is written to
//! the error log and the batch moves on.

use serde::Serialize;

use crate::change::{AtomicChangeType, AtomicOntologyChange};
use crate::errors::{Result, UpdateError};
use crate::update::{
    ChangeLogger, ChangeOutcome, ClassMigrator, MigrationContext, PropertyMigrator,
};

/// Per-batch tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessSummary {
    /// Changes that rewrote or removed statements
    pub applied: usize,
    pub advisories: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl ProcessSummary {
    pub fn total(&self) -> usize {
        self.applied + self.advisories + self.unchanged + self.failed
    }

    fn count(&mut self, outcome: &ChangeOutcome) {
        match outcome {
            ChangeOutcome::Rewritten { .. } | ChangeOutcome::Removed { .. } => self.applied += 1,
            ChangeOutcome::Advisory { .. } => self.advisories += 1,
            ChangeOutcome::Unchanged => self.unchanged += 1,
        }
    }
}

impl std::ops::AddAssign for ProcessSummary {
    fn add_assign(&mut self, other: Self) {
        self.applied += other.applied;
        self.advisories += other.advisories;
        self.unchanged += other.unchanged;
        self.failed += other.failed;
    }
}

pub struct ChangeProcessor<'a> {
    classes: ClassMigrator<'a>,
    properties: PropertyMigrator<'a>,
    logger: &'a ChangeLogger,
}

impl<'a> ChangeProcessor<'a> {
    pub fn new(ctx: MigrationContext<'a>) -> Self {
        Self {
            classes: ClassMigrator::new(ctx),
            properties: PropertyMigrator::new(ctx),
            logger: ctx.logger,
        }
    }

    pub fn classes(&self) -> &ClassMigrator<'a> {
        &self.classes
    }

    pub fn properties(&self) -> &PropertyMigrator<'a> {
        &self.properties
    }

    pub fn process_class_changes(&self, changes: &[AtomicOntologyChange]) -> ProcessSummary {
        self.process("processClassChanges", changes, |kind, change| match kind {
            AtomicChangeType::Add => self.classes.add_class(change),
            AtomicChangeType::Delete => self.classes.delete_class(change),
            AtomicChangeType::Rename => self.classes.rename_class(change),
        })
    }

    pub fn process_property_changes(&self, changes: &[AtomicOntologyChange]) -> ProcessSummary {
        self.process("processPropertyChanges", changes, |kind, change| match kind {
            AtomicChangeType::Add => self.properties.add_property(change),
            AtomicChangeType::Delete => self.properties.delete_property(change),
            AtomicChangeType::Rename => self.properties.rename_property(change),
        })
    }

    fn process<F>(&self, batch: &str, changes: &[AtomicOntologyChange], handle: F) -> ProcessSummary
    where
        F: Fn(AtomicChangeType, &AtomicOntologyChange) -> Result<ChangeOutcome>,
    {
        let mut summary = ProcessSummary::default();

        for (index, change) in changes.iter().enumerate() {
            let result = match change.kind {
                Some(kind) => handle(kind, change),
                None => Err(UpdateError::MissingChangeKind),
            };

            match result {
                Ok(outcome) => {
                    tracing::debug!(batch, index, change = %change, ?outcome, "change processed");
                    summary.count(&outcome);
                }
                Err(e) => {
                    summary.failed += 1;
                    self.logger
                        .log_error(format!("{} [{}] {}: {}", batch, index, change, e));
                }
            }
        }

        tracing::info!(
            batch,
            applied = summary.applied,
            advisories = summary.advisories,
            unchanged = summary.unchanged,
            failed = summary.failed,
            "batch finished"
        );
        summary
    }
}
