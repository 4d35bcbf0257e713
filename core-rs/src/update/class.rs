//! Class additions, deletions and renames

use oxigraph::model::{NamedNode, Subject, Term, Triple};

use crate::change::AtomicOntologyChange;
use crate::errors::{Result, UpdateError};
use crate::graph::Hierarchy;
use crate::update::ancestor::{ambiguous, AncestorResolver, Ancestry};
use crate::update::logger::subject_label;
use crate::update::{ChangeOutcome, MigrationContext, StagedRewrite};
use crate::vocab::{owl, rdf};

pub struct ClassMigrator<'a> {
    ctx: MigrationContext<'a>,
}

impl<'a> ClassMigrator<'a> {
    pub fn new(ctx: MigrationContext<'a>) -> Self {
        Self { ctx }
    }

    /// Advise review of individuals typed with a parent of the added class.
    /// The ABox is not touched.
    pub fn add_class(&self, change: &AtomicOntologyChange) -> Result<ChangeOutcome> {
        let classes = self.ctx.new_tbox.classes();
        let added = classes.require(change.destination()?)?;
        let parents = classes.parents(added.as_ref())?;

        let mut advisories = Vec::new();
        {
            let reader = self.ctx.abox.read()?;
            for parent in parents.iter().filter(|p| p.as_ref() != owl::THING) {
                let individuals = reader
                    .statements(None, Some(rdf::TYPE), Some(parent.as_ref().into()))
                    .map(|statement| statement.map(|s| subject_label(&s.subject)))
                    .collect::<Result<Vec<_>>>()?;
                if !individuals.is_empty() {
                    advisories.push((parent, individuals));
                }
            }
        }

        let mut matches = 0;
        for (parent, individuals) in advisories {
            matches += individuals.len();
            let listing: String = individuals.iter().map(|i| format!("\n\t{}", i)).collect();
            self.ctx.logger.log(format!(
                "There are {} individuals in the model that are of type {}, and a new subclass of that \
                 class has been added: {}. Please review the following individuals to see whether they \
                 should be of type: {}:{}",
                individuals.len(),
                parent.as_str(),
                added.as_str(),
                added.as_str(),
                listing
            ));
        }

        Ok(ChangeOutcome::Advisory { matches })
    }

    /// Move every reference to the deleted class onto its nearest surviving
    /// ancestor. No survivor, or several parents, needs manual review.
    pub fn delete_class(&self, change: &AtomicOntologyChange) -> Result<ChangeOutcome> {
        let source = change.source()?;
        let deleted = self.ctx.old_tbox.classes().require(source)?;

        let resolver = AncestorResolver::new(self.ctx.old_tbox.classes(), self.ctx.new_tbox.classes());
        match resolver.resolve(deleted.as_ref())? {
            Ancestry::Survivor(survivor) => {
                self.ctx.logger.log(format!(
                    "Class {} was deleted; references to it are moved to its closest remaining ancestor {}",
                    source,
                    survivor.as_str()
                ));
                self.rename_class(&AtomicOntologyChange::rename(source, survivor.as_str()))
            }
            Ancestry::NoSurvivor => Err(UpdateError::NoSurvivingAncestor {
                entity: "class",
                uri: source.to_string(),
            }),
            Ancestry::Ambiguous { at, parents } => Err(ambiguous("class", source, at, parents)),
        }
    }

    /// Rewrite the class URI wherever it is subject or object of a statement
    pub fn rename_class(&self, change: &AtomicOntologyChange) -> Result<ChangeOutcome> {
        let from = NamedNode::new(change.source()?)?;
        let to = NamedNode::new(change.destination()?)?;

        if from == to {
            self.ctx
                .logger
                .log(format!("Class {} renamed to itself; nothing to do", from.as_str()));
            return Ok(ChangeOutcome::Unchanged);
        }

        let staged = {
            let guard = self.ctx.abox.write()?;
            let mut staged = StagedRewrite::default();

            for statement in guard.statements(Some(from.as_ref().into()), None, None) {
                let statement = statement?;
                let replacement = substitute(&statement, &from, &to);
                staged.stage(statement, replacement);
            }
            for statement in guard.statements(None, None, Some(from.as_ref().into())) {
                let statement = statement?;
                let replacement = substitute(&statement, &from, &to);
                staged.stage(statement, replacement);
            }

            guard.commit(&staged.retractions, &staged.additions)?;
            self.ctx.record.record_retractions(&staged.retractions)?;
            self.ctx.record.record_additions(&staged.additions)?;
            staged
        };

        for statement in &staged.retractions {
            self.ctx.logger.log_statement(statement, false);
        }
        for statement in &staged.additions {
            self.ctx.logger.log_statement(statement, true);
        }

        tracing::info!(
            from = from.as_str(),
            to = to.as_str(),
            retracted = staged.retractions.len(),
            added = staged.additions.len(),
            "renamed class"
        );

        Ok(ChangeOutcome::Rewritten {
            retracted: staged.retractions.len(),
            added: staged.additions.len(),
            from,
            to,
        })
    }
}

/// Replace `from` with `to` in subject and object position
fn substitute(statement: &Triple, from: &NamedNode, to: &NamedNode) -> Triple {
    let subject = match &statement.subject {
        Subject::NamedNode(node) if node == from => Subject::NamedNode(to.clone()),
        other => other.clone(),
    };
    let object = match &statement.object {
        Term::NamedNode(node) if node == from => Term::NamedNode(to.clone()),
        other => other.clone(),
    };
    Triple::new(subject, statement.predicate.clone(), object)
}
