//! Cache construction errors.

/// Errors raised while setting up an `IconCache`.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Failed to spawn icon worker thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("Icon worker exited before signalling readiness")]
    WorkerNotReady,
}
