//! Error types for column mapping.

use crate::roles::ColumnRole;

/// Errors from resolving table columns onto roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// One or more required roles have no column in the table.
    #[error(
        "missing required columns for {}; available columns: {}",
        join_roles(.roles),
        .available.join(", ")
    )]
    MissingColumns {
        roles: Vec<ColumnRole>,
        available: Vec<String>,
    },
}

fn join_roles(roles: &[ColumnRole]) -> String {
    roles
        .iter()
        .copied()
        .map(ColumnRole::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, MappingError>;
