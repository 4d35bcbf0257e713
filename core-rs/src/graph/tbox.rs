/**
 * tbox.rs
 * Read-only schema graph with class and property hierarchy views
 */

use oxigraph::io::RdfFormat;
use oxigraph::model::{NamedNode, NamedNodeRef, QuadRef, GraphNameRef, Term};
use oxigraph::store::Store;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::errors::{Result, UpdateError};
use crate::vocab::{rdf, rdfs, CLASS_TYPES, PROPERTY_TYPES};

/// Which side of the upgrade a schema graph describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    Old,
    New,
}

impl SchemaVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::Old => "old",
            SchemaVersion::New => "new",
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema graph for one ontology version. Never mutated after loading.
pub struct Tbox {
    store: Store,
    version: SchemaVersion,
}

impl fmt::Debug for Tbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tbox")
            .field("version", &self.version)
            .field("store", &"<Store>")
            .finish()
    }
}

impl Tbox {
    pub fn from_turtle(version: SchemaVersion, turtle: &str) -> Result<Self> {
        let store = Store::new()?;
        store
            .load_from_reader(RdfFormat::Turtle, turtle.as_bytes())
            .map_err(|e| UpdateError::Load(e.to_string()))?;
        Ok(Self { store, version })
    }

    pub fn load_file(version: SchemaVersion, path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(UpdateError::FileNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        let store = Store::new()?;
        store
            .load_from_reader(RdfFormat::Turtle, content.as_bytes())
            .map_err(|e| UpdateError::Load(format!("{}: {}", path.display(), e)))?;
        let tbox = Self { store, version };
        tracing::info!(version = %version, path = %path.display(), "loaded schema graph");
        Ok(tbox)
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    pub fn classes(&self) -> ClassHierarchy<'_> {
        ClassHierarchy { tbox: self }
    }

    pub fn properties(&self) -> PropertyHierarchy<'_> {
        PropertyHierarchy { tbox: self }
    }

    fn has_any_type(&self, node: NamedNodeRef<'_>, types: &[NamedNodeRef<'_>]) -> Result<bool> {
        for ty in types {
            let quad = QuadRef::new(node, rdf::TYPE, *ty, GraphNameRef::DefaultGraph);
            if self.store.contains(quad)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Named objects of `node predicate ?o`, self-references and blank nodes skipped
    fn named_objects(&self, node: NamedNodeRef<'_>, predicate: NamedNodeRef<'_>) -> Result<Vec<NamedNode>> {
        let mut found: Vec<NamedNode> = Vec::new();
        for quad in self
            .store
            .quads_for_pattern(Some(node.into()), Some(predicate), None, None)
        {
            if let Term::NamedNode(parent) = quad?.object {
                if parent.as_ref() != node && !found.contains(&parent) {
                    found.push(parent);
                }
            }
        }
        Ok(found)
    }
}

/// Uniform view over a class or property hierarchy in one schema version
pub trait Hierarchy {
    /// Human name of the entity kind ("class" / "property")
    const ENTITY: &'static str;

    fn version(&self) -> SchemaVersion;

    fn exists(&self, uri: NamedNodeRef<'_>) -> Result<bool>;

    /// Direct named superclasses or superproperties
    fn parents(&self, uri: NamedNodeRef<'_>) -> Result<Vec<NamedNode>>;

    /// Parse `uri` and fail with `NotFound` unless the entity is declared
    fn require(&self, uri: &str) -> Result<NamedNode> {
        let node = NamedNode::new(uri)?;
        if self.exists(node.as_ref())? {
            Ok(node)
        } else {
            Err(UpdateError::NotFound {
                entity: Self::ENTITY,
                uri: uri.to_string(),
                version: self.version().as_str(),
            })
        }
    }
}

#[derive(Clone, Copy)]
pub struct ClassHierarchy<'a> {
    tbox: &'a Tbox,
}

impl Hierarchy for ClassHierarchy<'_> {
    const ENTITY: &'static str = "class";

    fn version(&self) -> SchemaVersion {
        self.tbox.version
    }

    fn exists(&self, uri: NamedNodeRef<'_>) -> Result<bool> {
        self.tbox.has_any_type(uri, &CLASS_TYPES)
    }

    fn parents(&self, uri: NamedNodeRef<'_>) -> Result<Vec<NamedNode>> {
        self.tbox.named_objects(uri, rdfs::SUB_CLASS_OF)
    }
}

#[derive(Clone, Copy)]
pub struct PropertyHierarchy<'a> {
    tbox: &'a Tbox,
}

impl Hierarchy for PropertyHierarchy<'_> {
    const ENTITY: &'static str = "property";

    fn version(&self) -> SchemaVersion {
        self.tbox.version
    }

    fn exists(&self, uri: NamedNodeRef<'_>) -> Result<bool> {
        self.tbox.has_any_type(uri, &PROPERTY_TYPES)
    }

    fn parents(&self, uri: NamedNodeRef<'_>) -> Result<Vec<NamedNode>> {
        self.tbox.named_objects(uri, rdfs::SUB_PROPERTY_OF)
    }
}
