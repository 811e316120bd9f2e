use std::path::PathBuf;

use regions_model::RegionId;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("region '{name}' already exists")]
    DuplicateRegion { name: String },

    #[error("code '{value}' in namespace '{namespace}' already belongs to region '{existing}'")]
    CodeConflict {
        namespace: String,
        value: String,
        existing: String,
    },

    #[error("unknown region id {}", .0.index())]
    UnknownRegion(RegionId),

    #[error("unknown namespace '{0}'")]
    UnknownNamespace(String),

    #[error("setting parent '{parent}' on region '{region}' would create a cycle")]
    CyclicParent { region: String, parent: String },

    #[error("failed to import namespace '{namespace}' from {path}: {message}")]
    Bootstrap {
        namespace: String,
        path: PathBuf,
        message: String,
    },

    #[error("failed to access store snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid store snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("reference store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn bootstrap(
        namespace: impl Into<String>,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self::Bootstrap {
            namespace: namespace.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
