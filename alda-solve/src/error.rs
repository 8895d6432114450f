//! Error handling for alda-solve.

/// alda-solve error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An [`alda_types::Error`].
    #[error(transparent)]
    AldaTypes(#[from] alda_types::Error),

    /// An [`alda_repo::Error`] raised while loading repository metadata.
    #[error(transparent)]
    Repo(#[from] alda_repo::Error),
}
