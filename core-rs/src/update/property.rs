//! Property additions, deletions and renames

use oxigraph::model::{NamedNode, Triple};

use crate::change::AtomicOntologyChange;
use crate::errors::Result;
use crate::graph::Hierarchy;
use crate::update::ancestor::{ambiguous, AncestorResolver, Ancestry};
use crate::update::{ChangeOutcome, MigrationContext, StagedRewrite};

pub struct PropertyMigrator<'a> {
    ctx: MigrationContext<'a>,
}

impl<'a> PropertyMigrator<'a> {
    pub fn new(ctx: MigrationContext<'a>) -> Self {
        Self { ctx }
    }

    /// Report how often each super-property of the new property is used.
    /// A property with no super-property needs no advice.
    pub fn add_property(&self, change: &AtomicOntologyChange) -> Result<ChangeOutcome> {
        let properties = self.ctx.new_tbox.properties();
        let added = properties.require(change.destination()?)?;
        let supers = properties.parents(added.as_ref())?;

        if supers.is_empty() {
            return Ok(ChangeOutcome::Unchanged);
        }

        let counts = {
            let reader = self.ctx.abox.read()?;
            supers
                .iter()
                .map(|sup| reader.count(None, Some(sup.as_ref()), None).map(|n| (sup, n)))
                .collect::<Result<Vec<_>>>()?
        };

        let mut matches = 0;
        for (sup, count) in counts {
            matches += count;
            self.ctx.logger.log(format!(
                "The property {} which occurs {} times in the database has a new subproperty {} \
                 in the new ontology version. Please review accordingly.",
                sup.as_str(),
                count,
                added.as_str()
            ));
        }

        Ok(ChangeOutcome::Advisory { matches })
    }

    /// Move statements onto the nearest surviving super-property, or drop
    /// them when the property has none left.
    pub fn delete_property(&self, change: &AtomicOntologyChange) -> Result<ChangeOutcome> {
        let source = change.source()?;
        let deleted = self.ctx.old_tbox.properties().require(source)?;

        let resolver = AncestorResolver::new(
            self.ctx.old_tbox.properties(),
            self.ctx.new_tbox.properties(),
        );
        match resolver.resolve(deleted.as_ref())? {
            Ancestry::Survivor(survivor) => {
                self.rename_property(&AtomicOntologyChange::rename(source, survivor.as_str()))
            }
            Ancestry::NoSurvivor => self.remove_property(deleted),
            Ancestry::Ambiguous { at, parents } => Err(ambiguous("property", source, at, parents)),
        }
    }

    fn remove_property(&self, property: NamedNode) -> Result<ChangeOutcome> {
        let removed = {
            let guard = self.ctx.abox.write()?;
            let removed = guard
                .statements(None, Some(property.as_ref()), None)
                .collect::<Result<Vec<Triple>>>()?;
            guard.commit(&removed, &[])?;
            self.ctx.record.record_retractions(&removed)?;
            removed
        };

        self.ctx.logger.log(format!(
            "{} statements using {} were removed. Please refer to the removed data model",
            removed.len(),
            property.as_str()
        ));
        tracing::info!(property = property.as_str(), retracted = removed.len(), "removed property");

        Ok(ChangeOutcome::Removed {
            retracted: removed.len(),
            property,
        })
    }

    /// Rewrite the predicate of every statement using the old property
    pub fn rename_property(&self, change: &AtomicOntologyChange) -> Result<ChangeOutcome> {
        let from = self.ctx.old_tbox.properties().require(change.source()?)?;
        let to = self.ctx.new_tbox.properties().require(change.destination()?)?;

        if from == to {
            return Ok(ChangeOutcome::Unchanged);
        }

        let staged = {
            let guard = self.ctx.abox.write()?;
            let mut staged = StagedRewrite::default();
            for statement in guard.statements(None, Some(from.as_ref()), None) {
                let statement = statement?;
                let replacement = Triple::new(
                    statement.subject.clone(),
                    to.clone(),
                    statement.object.clone(),
                );
                staged.stage(statement, replacement);
            }
            guard.commit(&staged.retractions, &staged.additions)?;
            self.ctx.record.record_additions(&staged.additions)?;
            self.ctx.record.record_retractions(&staged.retractions)?;
            staged
        };

        self.ctx.logger.log(format!(
            "{} statements using property {} were changed to use {} instead. Please refer to the \
             removed data model and the added data model.",
            staged.retractions.len(),
            from.as_str(),
            to.as_str()
        ));
        tracing::info!(
            from = from.as_str(),
            to = to.as_str(),
            retracted = staged.retractions.len(),
            "renamed property"
        );

        Ok(ChangeOutcome::Rewritten {
            retracted: staged.retractions.len(),
            added: staged.additions.len(),
            from,
            to,
        })
    }
}
