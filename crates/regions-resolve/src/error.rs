use regions_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("could not resolve region '{value}'{}", namespace_suffix(.namespace))]
    UnresolvedCode {
        value: String,
        namespace: Option<String>,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn namespace_suffix(namespace: &Option<String>) -> String {
    namespace
        .as_deref()
        .map(|ns| format!(" in namespace '{ns}'"))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, ResolveError>;
