#![doc = include_str!("../README.md")]

mod compress;
mod error;
mod fetch;
mod filelists;
mod primary;
mod repomd;

pub use error::Error;
pub use fetch::{RepoMetadata, fetch_metadata};
pub use filelists::{FilelistsPackage, read_filelists};
pub use primary::{Primary, read_primary};
pub use repomd::{Repomd, RepomdRecord, read_repomd};
