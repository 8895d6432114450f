//! Error handling for alda.

/// alda error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An [`alda_types::Error`].
    #[error(transparent)]
    AldaTypes(#[from] alda_types::Error),

    /// An [`alda_repo::Error`].
    #[error(transparent)]
    Repo(#[from] alda_repo::Error),

    /// An [`alda_solve::Error`].
    #[error(transparent)]
    Solve(#[from] alda_solve::Error),

    /// An operation that needs a loaded sack was called before `load_sack`.
    #[error("The package sack has not been loaded")]
    SackNotLoaded,

    /// A package names a source rpm file that is not a `.src.rpm`.
    #[error("Malformed source rpm filename '{sourcerpm}' of package {package}")]
    MalformedSourceRpm {
        /// The package carrying the reference.
        package: String,
        /// The offending filename.
        sourcerpm: String,
    },

    /// More than one source rpm in the sack matches a package's source rpm
    /// filename.
    #[error("Multiple source rpms match '{sourcerpm}'")]
    AmbiguousSourceRpm {
        /// The ambiguous filename.
        sourcerpm: String,
    },
}
