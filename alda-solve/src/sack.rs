//! The package universe.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;

use alda_repo::{RepoMetadata, read_filelists, read_primary};
use alda_types::{Arch, PackageObject};
use log::debug;

use crate::Error;
use crate::query::Query;

/// The identifier of a package inside a [`Sack`].
///
/// Identifiers are only meaningful for the sack that produced them.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PackageId(pub(crate) u32);

impl PackageId {
    /// Returns the raw index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A repository whose metadata files have been located.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Repo {
    /// The repository name.
    pub name: String,
    /// Path to `repomd.xml`.
    pub repomd_fn: PathBuf,
    /// Path to the `primary` metadata file.
    pub primary_fn: PathBuf,
    /// Path to the `filelists` metadata file.
    pub filelists_fn: PathBuf,
}

impl Repo {
    /// Creates a [`Repo`] from fetched repository metadata.
    pub fn new(name: &str, metadata: &RepoMetadata) -> Self {
        Repo {
            name: name.to_string(),
            repomd_fn: metadata.repomd.clone(),
            primary_fn: metadata.primary.clone(),
            filelists_fn: metadata.filelists.clone(),
        }
    }
}

/// Returns the set of architectures compatible with a base architecture.
///
/// Always contains the base architecture itself, `noarch`, and `src`;
/// multilib base architectures additionally accept their 32-bit ancestors.
fn compatible_arches(base: &Arch) -> BTreeSet<Arch> {
    let extra: &[&str] = match base.inner() {
        "x86_64" => &["i686", "i586", "i486", "i386"],
        "i686" => &["i586", "i486", "i386"],
        "ppc64" => &["ppc"],
        "s390x" => &["s390"],
        _ => &[],
    };
    let mut arches = BTreeSet::from([base.clone()]);
    for arch in ["noarch", "src"].iter().chain(extra) {
        arches.insert(Arch::from_str(arch).expect("static architecture names are valid"));
    }
    arches
}

/// The queryable universe of packages across all loaded repositories.
///
/// Packages live in an arena and are addressed by [`PackageId`]; the sack is
/// read-only once loading is done.
#[derive(Debug, Default)]
pub struct Sack {
    arches: Option<BTreeSet<Arch>>,
    packages: Vec<PackageObject>,
}

impl Sack {
    /// Creates an unrestricted [`Sack`].
    pub fn new() -> Self {
        Sack::default()
    }

    /// Creates a [`Sack`] restricted to architectures compatible with
    /// `arch`.
    pub fn with_arch(arch: &Arch) -> Self {
        Sack {
            arches: Some(compatible_arches(arch)),
            packages: Vec::new(),
        }
    }

    /// Loads a repository's packages into the sack.
    ///
    /// Returns the number of packages loaded; packages with an incompatible
    /// architecture are skipped. When `load_filelists` is false only the
    /// files listed in the primary metadata are known to the solver.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository metadata cannot be parsed.
    pub fn load_repo(&mut self, repo: &Repo, load_filelists: bool) -> Result<usize, Error> {
        let mut primary = read_primary(&repo.primary_fn, &repo.name)?;
        if load_filelists {
            primary.merge_filelists(read_filelists(&repo.filelists_fn)?);
        }

        let mut loaded = 0;
        for package in primary.into_packages() {
            if self.add_package(package).is_some() {
                loaded += 1;
            }
        }
        debug!("loaded {loaded} packages from repo '{}'", repo.name);
        Ok(loaded)
    }

    /// Adds a single package to the sack.
    ///
    /// Returns its identifier, or [`None`] if the package's architecture is
    /// not compatible with the sack's architecture restriction.
    pub fn add_package(&mut self, package: PackageObject) -> Option<PackageId> {
        if let Some(arches) = &self.arches {
            if !arches.contains(package.arch()) {
                return None;
            }
        }
        let id = PackageId(u32::try_from(self.packages.len()).expect("package count fits in u32"));
        self.packages.push(package);
        Some(id)
    }

    /// Returns the package with the given identifier.
    ///
    /// # Panics
    ///
    /// Panics if the identifier does not belong to this sack.
    pub fn package(&self, id: PackageId) -> &PackageObject {
        &self.packages[id.index()]
    }

    /// Returns an iterator over all packages with their identifiers.
    pub fn packages(&self) -> impl Iterator<Item = (PackageId, &PackageObject)> {
        self.packages
            .iter()
            .enumerate()
            .map(|(index, package)| (PackageId(index as u32), package))
    }

    /// Returns the number of packages in the sack.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns `true` if the sack contains no packages.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Returns the architectures known to the sack.
    ///
    /// For an architecture-restricted sack this is the compatibility set;
    /// otherwise the distinct architectures of the loaded packages.
    pub fn list_arches(&self) -> Vec<Arch> {
        match &self.arches {
            Some(arches) => arches.iter().cloned().collect(),
            None => self
                .packages
                .iter()
                .map(|package| package.arch().clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        }
    }

    /// Starts a new [`Query`] over the sack.
    pub fn query(&self) -> Query<'_> {
        Query::new(self)
    }
}
