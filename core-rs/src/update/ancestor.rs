//! Nearest surviving ancestor lookup
//!
//! Walks the old schema's superclass (or superproperty) links upward from a
//! removed entity and stops at the first ancestor the new schema still
//! declares. A level with more than one parent is never guessed at.

use oxigraph::model::{NamedNode, NamedNodeRef};
use std::collections::HashSet;

use crate::errors::{Result, UpdateError};
use crate::graph::Hierarchy;
use crate::vocab::owl;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ancestry {
    /// Nearest ancestor present in the new schema
    Survivor(NamedNode),
    /// The chain reached the top without a surviving ancestor
    NoSurvivor,
    /// `at` has several parents, so there is no single chain to follow
    Ambiguous { at: NamedNode, parents: Vec<NamedNode> },
}

pub struct AncestorResolver<H> {
    old: H,
    new: H,
}

impl<H: Hierarchy> AncestorResolver<H> {
    pub fn new(old: H, new: H) -> Self {
        Self { old, new }
    }

    /// Resolve the survivor for `entity`, starting at its immediate parent.
    /// `owl:Thing` ends the chain and is never returned as a survivor.
    pub fn resolve(&self, entity: NamedNodeRef<'_>) -> Result<Ancestry> {
        let mut current = entity.into_owned();
        let mut visited = HashSet::from([current.clone()]);

        loop {
            let mut parents: Vec<NamedNode> = self
                .old
                .parents(current.as_ref())?
                .into_iter()
                .filter(|p| p.as_ref() != owl::THING)
                .collect();

            let parent = match parents.len() {
                0 => return Ok(Ancestry::NoSurvivor),
                1 => parents.remove(0),
                _ => {
                    return Ok(Ancestry::Ambiguous {
                        at: current,
                        parents,
                    })
                }
            };

            if !visited.insert(parent.clone()) {
                tracing::warn!(
                    entity = entity.as_str(),
                    at = parent.as_str(),
                    "{} hierarchy cycle in old schema",
                    H::ENTITY
                );
                return Ok(Ancestry::NoSurvivor);
            }

            if self.new.exists(parent.as_ref())? {
                tracing::debug!(entity = entity.as_str(), survivor = parent.as_str(), "resolved surviving ancestor");
                return Ok(Ancestry::Survivor(parent));
            }

            current = parent;
        }
    }
}

/// Manual-review error for an entity whose ancestry forks at `at`
pub(crate) fn ambiguous(entity: &'static str, uri: &str, at: NamedNode, parents: Vec<NamedNode>) -> UpdateError {
    UpdateError::AmbiguousAncestry {
        entity,
        uri: uri.to_string(),
        at: at.into_string(),
        parents: parents.into_iter().map(NamedNode::into_string).collect(),
    }
}
