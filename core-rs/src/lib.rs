//! # ABox Update - knowledge base reconciliation across ontology versions
//!
//! When the schema ("TBox") of a knowledge base moves from one ontology version
//! to the next, the instance data ("ABox") must follow. Given the ordered list
//! of atomic schema changes between the two versions, this crate rewrites the
//! affected statements, records every addition and retraction for audit, and
//! logs the situations that need a human to look at them.
//!
//! ## Architecture
//!
//! ```text
//!   change list ──> ChangeProcessor ──> ClassMigrator / PropertyMigrator
//!                                             │
//!              old Tbox, new Tbox <── AncestorResolver
//!                                             │
//!                         Abox::write() ──────┴──> ChangeRecord + ChangeLogger
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use abox_update::{
//!     Abox, AtomicOntologyChange, ChangeLogger, ChangeProcessor, ChangeRecord,
//!     MigrationContext, SchemaVersion, Tbox,
//! };
//!
//! # fn example() -> abox_update::errors::Result<()> {
//! let old = Tbox::from_turtle(SchemaVersion::Old, "...")?;
//! let new = Tbox::from_turtle(SchemaVersion::New, "...")?;
//! let abox = Abox::from_turtle("...")?;
//! let logger = ChangeLogger::new();
//! let record = ChangeRecord::new();
//!
//! let processor = ChangeProcessor::new(MigrationContext {
//!     old_tbox: &old,
//!     new_tbox: &new,
//!     abox: &abox,
//!     logger: &logger,
//!     record: &record,
//! });
//! processor.process_class_changes(&[AtomicOntologyChange::rename(
//!     "http://example.org/Mammal",
//!     "http://example.org/Animal",
//! )]);
//! # Ok(())
//! # }
//! ```

pub mod change;
pub mod config;
pub mod errors;
pub mod graph;
pub mod update;
pub mod upgrade;
pub mod vocab;

pub use change::{load_changes, parse_changes, AtomicChangeType, AtomicOntologyChange};
pub use config::UpdateSettings;
pub use errors::UpdateError;
pub use graph::{Abox, Hierarchy, SchemaVersion, Tbox};
pub use update::{
    AncestorResolver, Ancestry, ChangeLogger, ChangeOutcome, ChangeProcessor, ChangeRecord,
    ClassMigrator, LogEntry, LogLevel, MigrationContext, ProcessSummary, PropertyMigrator,
};
pub use upgrade::{run_upgrade, ChangeLists, UpgradeReport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
