/**
 * abox.rs
 * Mutable instance graph guarded by a reader/writer lock
 *
 * Every read-stage-commit sequence runs while holding `Abox::write()`; the
 * guard releases the lock when dropped, including on early `?` returns.
 * External readers take `Abox::read()` and therefore never observe a
 * half-applied change.
 */

use oxigraph::io::RdfFormat;
use oxigraph::model::{
    GraphNameRef, NamedNodeRef, SubjectRef, TermRef, Triple, TripleRef,
};
use oxigraph::store::{StorageError, Store};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::{Result, UpdateError};

/// Instance data ("ABox") held in the default graph of an oxigraph store
pub struct Abox {
    store: Store,
    lock: RwLock<()>,
}

impl fmt::Debug for Abox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Abox")
            .field("store", &"<Store>")
            .field("len", &self.store.len().ok())
            .finish()
    }
}

impl Abox {
    pub fn new() -> Result<Self> {
        Ok(Self {
            store: Store::new()?,
            lock: RwLock::new(()),
        })
    }

    pub fn from_turtle(turtle: &str) -> Result<Self> {
        let abox = Self::new()?;
        abox.store
            .load_from_reader(RdfFormat::Turtle, turtle.as_bytes())
            .map_err(|e| UpdateError::Load(e.to_string()))?;
        Ok(abox)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(UpdateError::FileNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        let abox = Self::new()?;
        abox.store
            .load_from_reader(RdfFormat::Turtle, content.as_bytes())
            .map_err(|e| UpdateError::Load(format!("{}: {}", path.display(), e)))?;
        tracing::info!(path = %path.display(), statements = abox.store.len()?, "loaded instance graph");
        Ok(abox)
    }

    /// Exclusive scope for a mutation; no reader runs until the guard drops
    pub fn write(&self) -> Result<AboxWriteGuard<'_>> {
        let guard = self
            .lock
            .write()
            .map_err(|e| UpdateError::Lock(e.to_string()))?;
        Ok(AboxWriteGuard {
            store: &self.store,
            _guard: guard,
        })
    }

    /// Shared scope for consistent reads
    pub fn read(&self) -> Result<AboxReadGuard<'_>> {
        let guard = self
            .lock
            .read()
            .map_err(|e| UpdateError::Lock(e.to_string()))?;
        Ok(AboxReadGuard {
            store: &self.store,
            _guard: guard,
        })
    }

    /// Assert one statement under the write lock
    pub fn insert<'a>(&self, triple: impl Into<TripleRef<'a>>) -> Result<bool> {
        let triple: TripleRef<'a> = triple.into();
        let _guard = self.write()?;
        Ok(self.store.insert(triple.in_graph(GraphNameRef::DefaultGraph))?)
    }

    pub fn contains<'a>(&self, triple: impl Into<TripleRef<'a>>) -> Result<bool> {
        self.read()?.contains(triple)
    }

    pub fn len(&self) -> Result<usize> {
        self.read()?.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Serialize every statement as N-Triples
    pub fn write_ntriples<W: Write>(&self, mut writer: W) -> Result<()> {
        let reader = self.read()?;
        for triple in reader.statements(None, None, None) {
            writeln!(writer, "{} .", triple?)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn pattern<'s>(
    store: &'s Store,
    subject: Option<SubjectRef<'_>>,
    predicate: Option<NamedNodeRef<'_>>,
    object: Option<TermRef<'_>>,
) -> impl Iterator<Item = Result<Triple>> + 's {
    store
        .quads_for_pattern(subject, predicate, object, Some(GraphNameRef::DefaultGraph))
        .map(|quad| -> Result<Triple> {
            let quad = quad?;
            Ok(Triple::new(quad.subject, quad.predicate, quad.object))
        })
}

fn count(
    store: &Store,
    subject: Option<SubjectRef<'_>>,
    predicate: Option<NamedNodeRef<'_>>,
    object: Option<TermRef<'_>>,
) -> Result<usize> {
    let mut n = 0;
    for triple in pattern(store, subject, predicate, object) {
        triple?;
        n += 1;
    }
    Ok(n)
}

/// Held for the whole enumerate-stage-commit sequence of one change
pub struct AboxWriteGuard<'a> {
    store: &'a Store,
    _guard: RwLockWriteGuard<'a, ()>,
}

impl AboxWriteGuard<'_> {
    /// Stream statements matching a pattern (`None` is a wildcard)
    pub fn statements(
        &self,
        subject: Option<SubjectRef<'_>>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<TermRef<'_>>,
    ) -> impl Iterator<Item = Result<Triple>> + '_ {
        pattern(self.store, subject, predicate, object)
    }

    pub fn count(
        &self,
        subject: Option<SubjectRef<'_>>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<TermRef<'_>>,
    ) -> Result<usize> {
        count(self.store, subject, predicate, object)
    }

    /// Remove `retractions` then assert `additions` in one store transaction.
    /// On error nothing from either set is applied.
    pub fn commit(&self, retractions: &[Triple], additions: &[Triple]) -> Result<()> {
        self.store.transaction(|mut transaction| {
            for triple in retractions {
                transaction.remove(triple.as_ref().in_graph(GraphNameRef::DefaultGraph))?;
            }
            for triple in additions {
                transaction.insert(triple.as_ref().in_graph(GraphNameRef::DefaultGraph))?;
            }
            Ok::<_, StorageError>(())
        })?;
        tracing::debug!(
            retracted = retractions.len(),
            added = additions.len(),
            "committed abox transaction"
        );
        Ok(())
    }
}

pub struct AboxReadGuard<'a> {
    store: &'a Store,
    _guard: RwLockReadGuard<'a, ()>,
}

impl AboxReadGuard<'_> {
    pub fn statements(
        &self,
        subject: Option<SubjectRef<'_>>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<TermRef<'_>>,
    ) -> impl Iterator<Item = Result<Triple>> + '_ {
        pattern(self.store, subject, predicate, object)
    }

    pub fn count(
        &self,
        subject: Option<SubjectRef<'_>>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<TermRef<'_>>,
    ) -> Result<usize> {
        count(self.store, subject, predicate, object)
    }

    pub fn contains<'a>(&self, triple: impl Into<TripleRef<'a>>) -> Result<bool> {
        let triple: TripleRef<'a> = triple.into();
        Ok(self.store.contains(triple.in_graph(GraphNameRef::DefaultGraph))?)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.store.len()?)
    }
}
