//! Error handling for alda-repo.

use std::path::PathBuf;

/// alda-repo error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An [`alda_types::Error`].
    #[error(transparent)]
    AldaTypes(#[from] alda_types::Error),

    /// An I/O error with the path it occurred on.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// An XML parsing error.
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    /// An XML attribute error.
    #[error(transparent)]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    /// A repository path with an unrecognized scheme.
    #[error("Incorrect repo path '{0}'")]
    InvalidRepoPath(String),

    /// A required metadata file is missing from the repository.
    #[error("Missing repository metadata: {0}")]
    MissingMetadata(String),

    /// Metadata compressed with an unsupported algorithm.
    #[error("Unsupported metadata compression: {}", path.display())]
    UnsupportedCompression {
        /// The offending metadata file.
        path: PathBuf,
    },

    /// Structurally invalid metadata.
    #[error("Malformed metadata in {}: {reason}", path.display())]
    MalformedMetadata {
        /// The offending metadata file.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// A metadata download failure.
    #[error("Failed to download {url}: {source}")]
    Download {
        /// The URL that failed.
        url: String,
        /// The underlying error.
        source: reqwest::Error,
    },
}
