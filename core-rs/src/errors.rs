//! Error types for the ABox updater

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("Change is missing its {0} URI")]
    MissingUri(&'static str),

    #[error("Change type missing or unrecognized")]
    MissingChangeKind,

    #[error("Didn't find the {entity} {uri} in the {version} ontology")]
    NotFound {
        entity: &'static str,
        uri: String,
        version: &'static str,
    },

    #[error("No ancestor of {entity} {uri} survives in the new ontology; manual review required")]
    NoSurvivingAncestor { entity: &'static str, uri: String },

    #[error(
        "{entity} {uri} has multiple parents at {at} ({}); manual review required",
        .parents.join(", ")
    )]
    AmbiguousAncestry {
        entity: &'static str,
        uri: String,
        at: String,
        parents: Vec<String>,
    },

    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Lock error: {0}")]
    Lock(String),

    #[error("Failed to load graph: {0}")]
    Load(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<oxigraph::model::IriParseError> for UpdateError {
    fn from(err: oxigraph::model::IriParseError) -> Self {
        UpdateError::InvalidIri(err.to_string())
    }
}

impl From<oxigraph::store::StorageError> for UpdateError {
    fn from(err: oxigraph::store::StorageError) -> Self {
        UpdateError::Store(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, UpdateError>;
