//! Substrate-wide error kinds (`spec.md` §7), composed from the per-concern
//! errors below the way `cortex-core::errors` splits `StorageError` /
//! `RetrievalError` / `CausalError` per subsystem.

mod backend;
mod pattern;
mod store;

pub use backend::BackendError;
pub use pattern::PatternError;
pub use store::StoreError;

/// The unified error type returned by the in-process API (§6).
#[derive(Debug, thiserror::Error)]
pub enum SubstrateError {
    #[error("backend unavailable: {0}")]
    BackendUnavailable(#[from] BackendError),

    #[error("persistence error: {0}")]
    Persistence(#[source] StoreError),

    #[error("corrupt state: {details}")]
    CorruptState { details: String },

    #[error("not found: {kind} {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("pattern/context mismatch: {0}")]
    PatternMismatch(#[from] PatternError),

    #[error("directory locked: {path}")]
    DirectoryLocked { path: String },

    #[error("operation cancelled")]
    Cancelled,
}

pub type SubstrateResult<T> = Result<T, SubstrateError>;

/// `StoreError::DirectoryLocked`/`Corrupt` name substrate-level conditions of
/// their own (`spec.md` §7); a blanket `#[from]` would silently fold both
/// into `Persistence` before callers can branch on them (e.g. to map
/// directory-locked to HTTP 409 rather than 500), so the conversion is
/// hand-written instead.
impl From<StoreError> for SubstrateError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DirectoryLocked { path } => SubstrateError::DirectoryLocked {
                path: path.display().to_string(),
            },
            StoreError::Corrupt { path, details } => SubstrateError::CorruptState {
                details: format!("{}: {details}", path.display()),
            },
            other => SubstrateError::Persistence(other),
        }
    }
}

/// HTTP status fixture for the external front-end (`spec.md` §7). The HTTP
/// layer itself is out of scope; this mapping is kept here so integration
/// fixtures in other repos have a single source of truth.
pub fn http_status(err: &SubstrateError) -> u16 {
    match err {
        SubstrateError::BackendUnavailable(_) => 503,
        SubstrateError::Persistence(_) => 500,
        SubstrateError::CorruptState { .. } => 500,
        SubstrateError::NotFound { .. } => 404,
        SubstrateError::PatternMismatch(_) => 400,
        SubstrateError::DirectoryLocked { .. } => 409,
        SubstrateError::Cancelled => 499,
    }
}
