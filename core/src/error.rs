use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    /// Invalid generated model name
    #[error("invalid model name {name:?}: {reason}")]
    Naming { name: String, reason: String },
    /// Relation target cannot be resolved
    #[error("cannot resolve relation field {field:?} of table {table:?}: {detail}")]
    RelationResolution {
        table: String,
        field: String,
        detail: String,
    },
    /// Invalid column match pattern in a field option
    #[error("invalid column pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, GenError>;
