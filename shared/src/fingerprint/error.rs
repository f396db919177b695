use thiserror::Error;

/// Errors raised while building a fingerprint from host content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FingerprintError {
    /// The content provider could not read a file it had listed.
    #[error("failed to read {rel_path} of {package_id}")]
    FileRead {
        package_id: String,
        rel_path: String,
    },
}
