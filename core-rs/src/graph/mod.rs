/**
 * graph module
 *
 * - tbox: read-only schema graphs with class/property hierarchy views
 * - abox: instance graph with scoped read/write locking and atomic commits
 */

pub mod abox;
pub mod tbox;

pub use abox::{Abox, AboxReadGuard, AboxWriteGuard};
pub use tbox::{ClassHierarchy, Hierarchy, PropertyHierarchy, SchemaVersion, Tbox};
