use thiserror::Error;

/// Failures of the analysis run outside the layout core.
///
/// The core itself never fails; fetch failures are absorbed per week (see
/// `gig_source::FetchError`). What's left is rendering and writing output.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("I/O error writing {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Packing task failed: {0}")]
    Packing(#[from] tokio::task::JoinError),
}
