//! ABox reconciliation against a changed TBox
//!
//! ```text
//! ChangeProcessor
//!     ├── ClassMigrator     ─┐
//!     └── PropertyMigrator  ─┴── AncestorResolver (old/new Tbox, read-only)
//!                                    │
//!                     Abox::write() ─┴─> ChangeRecord (audit) + ChangeLogger
//! ```
//!
//! Every handler returns `Result<ChangeOutcome>`; only the processor turns an
//! `Err` into an error-log entry, so a failing change never aborts its batch.

pub mod ancestor;
pub mod class;
pub mod logger;
pub mod processor;
pub mod property;
pub mod record;

pub use ancestor::{AncestorResolver, Ancestry};
pub use class::ClassMigrator;
pub use logger::{ChangeLogger, LogEntry, LogLevel};
pub use processor::{ChangeProcessor, ProcessSummary};
pub use property::PropertyMigrator;
pub use record::ChangeRecord;

use oxigraph::model::{NamedNode, Triple};
use std::collections::HashSet;

use crate::graph::{Abox, Tbox};

/// Everything a migrator reads from or writes to during one run
#[derive(Clone, Copy)]
pub struct MigrationContext<'a> {
    pub old_tbox: &'a Tbox,
    pub new_tbox: &'a Tbox,
    pub abox: &'a Abox,
    pub logger: &'a ChangeLogger,
    pub record: &'a ChangeRecord,
}

/// What a single change did to the ABox
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Review advice was logged; nothing was mutated
    Advisory { matches: usize },
    /// References to `from` were rewritten to `to`
    Rewritten {
        from: NamedNode,
        to: NamedNode,
        retracted: usize,
        added: usize,
    },
    /// Statements using a property with no surviving ancestor were dropped
    Removed { property: NamedNode, retracted: usize },
    Unchanged,
}

/// Retractions and their replacements, each statement staged at most once
#[derive(Default)]
pub(crate) struct StagedRewrite {
    retracted: HashSet<Triple>,
    added: HashSet<Triple>,
    pub(crate) retractions: Vec<Triple>,
    pub(crate) additions: Vec<Triple>,
}

impl StagedRewrite {
    pub(crate) fn stage(&mut self, old: Triple, new: Triple) {
        if !self.retracted.insert(old.clone()) {
            return;
        }
        self.retractions.push(old);
        if self.added.insert(new.clone()) {
            self.additions.push(new);
        }
    }
}
