//! The ALDA orchestrator.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use alda_repo::fetch_metadata;
use alda_solve::{Goal, InstallTarget, Repo, Sack, Selector};
use alda_types::{Arch, PackageObject, PackageRef};
use log::{error, info, warn};
use tempfile::TempDir;

use crate::Error;
use crate::accumulator::Accumulator;
use crate::options::Options;

/// Joins a repository base path or URL with a package location.
fn join_url(base: &str, location: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), location)
}

/// The ALDA orchestrator: loads the package universe from a set of
/// repositories, resolves user requests through the [`Accumulator`], and
/// exposes the results.
#[derive(Debug)]
pub struct Alda {
    repodict: BTreeMap<String, String>,
    metadirs: Vec<TempDir>,
    sack: Option<Arc<Sack>>,
    accumulator: Accumulator,
    problems: BTreeSet<PackageRef>,
}

impl Alda {
    /// Creates a new orchestrator over a `name -> path-or-url` repository
    /// map with the given options.
    pub fn new(repodict: BTreeMap<String, String>, options: Options) -> Self {
        Alda {
            repodict,
            metadirs: Vec::new(),
            sack: None,
            accumulator: Accumulator::new(options),
            problems: BTreeSet::new(),
        }
    }

    /// Retrieves the metadata of every repository and loads it into a fresh
    /// sack.
    ///
    /// Passing an architecture restricts the sack to compatible
    /// architectures. Temporary metadata directories created for remote
    /// repositories are kept until [`Alda::resolve_dependencies`] finishes
    /// (and are deleted when the orchestrator is dropped, at the latest).
    ///
    /// # Errors
    ///
    /// Returns an error if metadata cannot be retrieved or parsed.
    pub fn load_sack(&mut self, arch: Option<&Arch>, load_filelists: bool) -> Result<(), Error> {
        let mut repos = Vec::new();
        for (name, path) in &self.repodict {
            let (metadata, metadir) = fetch_metadata(name, path)?;
            repos.push(Repo::new(name, &metadata));
            if let Some(metadir) = metadir {
                self.metadirs.push(metadir);
            }
        }

        let mut sack = match arch {
            Some(arch) => Sack::with_arch(arch),
            None => Sack::new(),
        };
        for repo in &repos {
            sack.load_repo(repo, load_filelists)?;
        }

        let sack = Arc::new(sack);
        self.accumulator.set_sack(sack.clone());
        self.sack = Some(sack);
        Ok(())
    }

    /// Resolves the dependency closure of the given package references.
    ///
    /// References with no match in the sack are skipped with a warning.
    /// References whose resolution fails are recorded in
    /// [`Alda::problems`]; resolution continues with the next reference.
    /// Temporary metadata directories are deleted before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the sack is not loaded or the accumulator hits
    /// an invariant violation.
    pub fn resolve_dependencies(
        &mut self,
        packages: &[PackageRef],
        excludes: Option<BTreeSet<PackageRef>>,
    ) -> Result<(), Error> {
        let result = self.resolve_packages(packages, excludes);
        // Cleanup runs on every exit path. Dropping the guards deletes the
        // metadata directories.
        self.metadirs.clear();
        result
    }

    fn resolve_packages(
        &mut self,
        packages: &[PackageRef],
        excludes: Option<BTreeSet<PackageRef>>,
    ) -> Result<(), Error> {
        let sack = self.sack.clone().ok_or(Error::SackNotLoaded)?;

        if let Some(excludes) = excludes {
            self.accumulator.set_excludes(excludes);
        }

        for package in packages {
            info!("resolving dependencies for {package}");
            let mut query = sack.query().name(&package.name);
            if let Some(arch) = &package.arch {
                query = query.arch(arch);
            }
            if query.count() == 0 {
                warn!("{package}: package not found");
                continue;
            }

            let mut goal = Goal::new(sack.clone());
            goal.install(InstallTarget::Selector(Selector::from_ref(package)));
            self.accumulator.update(&mut goal)?;
            if !goal.problems().is_empty() {
                error!("encountered errors when getting dependencies for {package}");
                for problem in goal.problems() {
                    error!("{problem}");
                }
                self.problems.insert(package.clone());
            }
        }
        Ok(())
    }

    /// Returns the architectures known to the sack.
    ///
    /// # Errors
    ///
    /// Returns an error if the sack is not loaded.
    pub fn arches(&self) -> Result<Vec<Arch>, Error> {
        self.sack
            .as_ref()
            .map(|sack| sack.list_arches())
            .ok_or(Error::SackNotLoaded)
    }

    /// Returns a copy of the resolved package set.
    pub fn installs(&self) -> Vec<PackageObject> {
        match &self.sack {
            Some(sack) => self
                .accumulator
                .data()
                .iter()
                .map(|&id| sack.package(id).clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Returns the `name-evr.arch` string of every resolved package.
    pub fn installs_as_strings(&self) -> Vec<String> {
        self.installs()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Returns the download URL of every resolved package, joined from its
    /// repository's configured path and the package location.
    pub fn urls(&self) -> Vec<String> {
        self.installs()
            .iter()
            .filter_map(|package| {
                self.repodict
                    .get(&package.reponame)
                    .map(|base| join_url(base, &package.location))
            })
            .collect()
    }

    /// Returns the package references whose top-level resolution failed.
    pub fn problems(&self) -> &BTreeSet<PackageRef> {
        &self.problems
    }

    /// Returns the accumulator, for closure diagnostics.
    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }
}
