//! Repository metadata retrieval.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::TempDir;

use crate::repomd::read_repomd;
use crate::Error;

/// The metadata files of one repository, ready to be loaded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepoMetadata {
    /// Path to `repomd.xml`.
    pub repomd: PathBuf,
    /// Path to the `primary` metadata file.
    pub primary: PathBuf,
    /// Path to the `filelists` metadata file.
    pub filelists: PathBuf,
}

/// A classified repository location.
#[derive(Clone, Debug, Eq, PartialEq)]
enum RepoLocation {
    /// A repository on the local filesystem.
    Local(PathBuf),
    /// A repository reachable over the network.
    Remote(String),
}

/// Classifies a repository path.
///
/// Absolute filesystem paths are treated as `file://` locations. `http://`,
/// `https://` and `ftp://` URLs are remote. Anything else is rejected.
fn classify(path: &str) -> Result<RepoLocation, Error> {
    if path.starts_with('/') {
        Ok(RepoLocation::Local(PathBuf::from(path)))
    } else if let Some(stripped) = path.strip_prefix("file://") {
        Ok(RepoLocation::Local(PathBuf::from(stripped)))
    } else if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("ftp://")
    {
        Ok(RepoLocation::Remote(
            path.trim_end_matches('/').to_string(),
        ))
    } else {
        Err(Error::InvalidRepoPath(path.to_string()))
    }
}

fn require_file(path: PathBuf) -> Result<PathBuf, Error> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(Error::MissingMetadata(path.display().to_string()))
    }
}

fn metadata_href(repomd_path: &Path, mdtype: &str) -> Result<String, Error> {
    let repomd = read_repomd(repomd_path)?;
    repomd
        .record(mdtype)
        .map(|record| record.location_href.clone())
        .ok_or_else(|| Error::MissingMetadata(format!("{mdtype} in {}", repomd_path.display())))
}

fn local_metadata(base: &Path) -> Result<RepoMetadata, Error> {
    let repomd = require_file(base.join("repodata").join("repomd.xml"))?;
    let primary = require_file(base.join(metadata_href(&repomd, "primary")?))?;
    let filelists = require_file(base.join(metadata_href(&repomd, "filelists")?))?;
    Ok(RepoMetadata {
        repomd,
        primary,
        filelists,
    })
}

fn download(client: &reqwest::blocking::Client, url: &str, dest: &Path) -> Result<(), Error> {
    debug!("downloading {url}");
    let wrap = |source| Error::Download {
        url: url.to_string(),
        source,
    };
    let response = client.get(url).send().map_err(wrap)?;
    let response = response.error_for_status().map_err(wrap)?;
    let bytes = response.bytes().map_err(wrap)?;
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(dest, &bytes).map_err(|source| Error::Io {
        path: dest.to_path_buf(),
        source,
    })
}

fn remote_metadata(name: &str, url: &str) -> Result<(RepoMetadata, TempDir), Error> {
    let destdir = tempfile::Builder::new()
        .prefix(&format!("{name}."))
        .tempdir()
        .map_err(|source| Error::Io {
            path: std::env::temp_dir(),
            source,
        })?;

    let client = reqwest::blocking::Client::new();
    let repomd = destdir.path().join("repodata").join("repomd.xml");
    download(&client, &format!("{url}/repodata/repomd.xml"), &repomd)?;

    let mut fetch_record = |mdtype: &str| -> Result<PathBuf, Error> {
        let href = metadata_href(&repomd, mdtype)?;
        let dest = destdir.path().join(&href);
        download(&client, &format!("{url}/{href}"), &dest)?;
        Ok(dest)
    };
    let primary = fetch_record("primary")?;
    let filelists = fetch_record("filelists")?;

    Ok((
        RepoMetadata {
            repomd,
            primary,
            filelists,
        },
        destdir,
    ))
}

/// Retrieves the metadata of one repository.
///
/// Local repositories (absolute paths and `file://` URLs) are read in place
/// and no temporary directory is created. Remote repositories (`http://`,
/// `https://`, `ftp://`) are downloaded into a fresh temporary directory
/// named `<name>.<random>`, whose guard is returned so the caller controls
/// when it is deleted.
///
/// # Errors
///
/// Returns an error for unrecognized schemes, missing metadata files, and
/// download or parse failures.
pub fn fetch_metadata(name: &str, path: &str) -> Result<(RepoMetadata, Option<TempDir>), Error> {
    info!("downloading repo metadata from {path}");
    match classify(path)? {
        RepoLocation::Local(base) => Ok((local_metadata(&base)?, None)),
        RepoLocation::Remote(url) => {
            let (metadata, destdir) = remote_metadata(name, &url)?;
            Ok((metadata, Some(destdir)))
        }
    }
}
