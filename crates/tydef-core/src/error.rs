use thiserror::Error;

use crate::schema::RefPath;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),

    #[error("document root is not a schema")]
    InvalidRoot,
}

/// Errors raised while compiling a schema document into declarations.
///
/// All variants abort the compilation at the point of detection; there is
/// no partial-success mode. The `Unsupported*` variants carry the offending
/// fragment for diagnostics.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("unsupported schema: {0}")]
    UnsupportedSchema(serde_json::Value),

    #[error("unsupported type tag: {0}")]
    UnsupportedType(String),

    #[error("unsupported enum value: {0}")]
    UnsupportedEnum(serde_json::Value),

    #[error("reference target not found: {0}")]
    RefTargetNotFound(RefPath),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
