use sea_orm::DbErr;

/// Failure of a domain operation on the models.
///
/// Variants map one-to-one onto HTTP classes at the API edge.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

impl DomainError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Formats a set of ids the way error messages list them: `{1, 2}`.
pub fn format_ids<I: IntoIterator<Item = i64>>(ids: I) -> String {
    let mut ids: Vec<i64> = ids.into_iter().collect();
    ids.sort_unstable();
    let parts: Vec<String> = ids.iter().map(|i| i.to_string()).collect();
    format!("{{{}}}", parts.join(", "))
}
