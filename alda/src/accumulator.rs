//! The closure engine.

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;

use alda_solve::{Goal, InstallTarget, PackageId, Request, Sack, Selector};
use alda_types::{Arch, Name, PackageObject, PackageRef};
use log::{debug, error, warn};

use crate::Error;
use crate::options::Options;

/// A frozen request descriptor of a successfully solved or failed
/// resolution.
///
/// A resolution with a single install request freezes to its string form;
/// one with several requests freezes to the tuple of their string forms.
/// Only `Single` descriptors (and failed-request identities) participate in
/// skiplist membership tests for one package - a tuple never equals one
/// package identity.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum RequestDescriptor {
    /// The string form of a single install request.
    Single(String),
    /// The string forms of several install requests.
    Multi(Vec<String>),
}

/// The closure engine: owns the growing result set, the excludes, and the
/// skiplist, and drives the recursive expansion of source RPMs, debuginfo
/// and sibling subpackages.
///
/// The accumulator is long-lived within one orchestrator run; its result
/// set only ever grows.
#[derive(Debug, Default)]
pub struct Accumulator {
    options: Options,
    sack: Option<Arc<Sack>>,
    excludes: BTreeSet<PackageRef>,
    data: BTreeSet<PackageId>,
    active_requests: Vec<Vec<String>>,
    max_requests: usize,
    solved: BTreeSet<RequestDescriptor>,
    problems: BTreeSet<String>,
}

impl Accumulator {
    /// Creates a new [`Accumulator`] with the given options.
    pub fn new(options: Options) -> Self {
        Accumulator {
            options,
            sack: None,
            excludes: BTreeSet::new(),
            data: BTreeSet::new(),
            active_requests: Vec::new(),
            max_requests: 0,
            solved: BTreeSet::new(),
            problems: BTreeSet::new(),
        }
    }

    /// Binds the accumulator to a loaded sack.
    pub fn set_sack(&mut self, sack: Arc<Sack>) {
        self.sack = Some(sack);
    }

    /// Sets the exclude filters.
    ///
    /// An exclude matches a package by name, and by architecture as well
    /// when the exclude specifies one.
    pub fn set_excludes(&mut self, excludes: BTreeSet<PackageRef>) {
        self.excludes = excludes;
    }

    /// Integrates a resolver goal into the accumulator.
    ///
    /// In greedy mode every alternative solution of the goal is ingested;
    /// otherwise only the first. A goal whose resolution fails is left
    /// untouched - recording its problems is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns an error on invariant violations (no sack bound, malformed
    /// or ambiguous source rpm references); solver failures are not errors.
    pub fn update(&mut self, goal: &mut Goal) -> Result<(), Error> {
        if self.options.greedy {
            for solution in goal.run_all() {
                goal.adopt_solution(solution);
                self.new_solution_cb(goal)?;
            }
        } else if goal.run() {
            self.new_solution_cb(goal)?;
        }
        Ok(())
    }

    /// Ingests one solution: records the in-flight request frame, expands
    /// the solution, and freezes the frame into the solved set.
    fn new_solution_cb(&mut self, goal: &Goal) -> Result<(), Error> {
        // Save the new install request.
        self.active_requests.push(goal.install_requests_as_strings());
        self.max_requests = self.max_requests.max(self.active_requests.len());
        // Resolve the solution.
        let result = self.ingest_solution(goal);
        // The frame is popped on the error path too, keeping the stack
        // balanced.
        let solved = self
            .active_requests
            .pop()
            .expect("the frame pushed above is still on the stack");
        result?;
        // Mark the request as solved.
        debug!("{solved:?}: request solved");
        self.solved.insert(match solved.as_slice() {
            [single] => RequestDescriptor::Single(single.clone()),
            _ => RequestDescriptor::Multi(solved),
        });
        Ok(())
    }

    fn ingest_solution(&mut self, goal: &Goal) -> Result<(), Error> {
        let sack = self.sack.clone().ok_or(Error::SackNotLoaded)?;

        // Get the new packages.
        let mut new_packages: BTreeSet<PackageId> = goal
            .list_installs()
            .difference(&self.data)
            .copied()
            .collect();
        if new_packages.is_empty() {
            debug!("{:?}: no new packages to add", self.last_request());
            return Ok(());
        }

        // Check if some of the packages should not be excluded. A single
        // hit drops the whole candidate set of this frame.
        for &id in &new_packages {
            let package = sack.package(id);
            for exclude in &self.excludes {
                if package.name() == &exclude.name
                    && exclude
                        .arch
                        .as_ref()
                        .is_none_or(|arch| package.arch() == arch)
                {
                    warn!(
                        "{:?}: package '{package}' in exclude list",
                        self.last_request()
                    );
                    return Ok(());
                }
            }
        }

        // Remove the source packages if we don't want them.
        if !self.options.source {
            new_packages.retain(|&id| !sack.package(id).is_source());
        }

        // Add the new packages to the set.
        self.data.extend(new_packages.iter().copied());

        // Add the related packages, in ascending string order.
        let mut ordered: Vec<PackageId> = new_packages.into_iter().collect();
        ordered.sort_by_key(|&id| sack.package(id).to_string());
        for id in ordered {
            let package = sack.package(id).clone();
            debug!("added {package}");
            self.expand_source(&sack, &package)?;
            self.expand_debuginfo(&sack, &package);
            self.expand_subpackages(&sack, &package)?;
        }
        Ok(())
    }

    /// Locates the source rpm a package was built from.
    ///
    /// # Errors
    ///
    /// Returns an error if the `sourcerpm` filename is not a `.src.rpm` or
    /// matches more than one source rpm in the sack.
    fn find_srpm(&self, sack: &Sack, package: &PackageObject) -> Result<Option<PackageId>, Error> {
        if package.sourcerpm.is_empty() {
            return Ok(None);
        }

        let stem = package
            .sourcerpm
            .strip_suffix(".src.rpm")
            .ok_or_else(|| Error::MalformedSourceRpm {
                package: package.to_string(),
                sourcerpm: package.sourcerpm.clone(),
            })?;
        // The stem is <name>-<version>-<release>.
        let mut fields = stem.rsplitn(3, '-');
        let (_release, _version) = (fields.next(), fields.next());
        let name = fields.next().ok_or_else(|| Error::MalformedSourceRpm {
            package: package.to_string(),
            sourcerpm: package.sourcerpm.clone(),
        })?;

        let matches: Vec<PackageId> = sack
            .query()
            .name(&Name::new(name)?)
            .arch(&Arch::from_str("src").expect("`src` is a valid architecture"))
            .run()
            .into_iter()
            .filter(|&id| sack.package(id).location.ends_with(&package.sourcerpm))
            .collect();
        if matches.len() > 1 {
            return Err(Error::AmbiguousSourceRpm {
                sourcerpm: package.sourcerpm.clone(),
            });
        }
        Ok(matches.first().copied())
    }

    /// Adds the package's source rpm and, when self-hosting, the source
    /// rpm's build dependency closure.
    fn expand_source(&mut self, sack: &Arc<Sack>, package: &PackageObject) -> Result<(), Error> {
        let Some(srpm_id) = self.find_srpm(sack, package)? else {
            return Ok(());
        };
        if self.data.contains(&srpm_id) {
            return Ok(());
        }
        let srpm = sack.package(srpm_id).clone();

        if self.options.source {
            self.data.insert(srpm_id);
            debug!("added srpm {srpm}");
        }

        // Builddeps.
        if self.options.selfhosting && !self.skiplist_contains(&srpm) {
            let mut builddeps_goal = Goal::new(sack.clone());
            builddeps_goal.install(InstallTarget::Package(srpm_id));
            self.update(&mut builddeps_goal)?;
            if !builddeps_goal.problems().is_empty() {
                error!("encountered errors when getting builddeps for {srpm}");
                for problem in builddeps_goal.problems() {
                    error!("{problem}");
                }
                self.problems.insert(srpm.to_string());
            }
        }
        Ok(())
    }

    /// Adds the debuginfo subpackages matching the package's source rpm and
    /// architecture.
    fn expand_debuginfo(&mut self, sack: &Sack, package: &PackageObject) {
        if !self.options.debuginfo || package.sourcerpm.is_empty() {
            return;
        }
        let debuginfo = sack
            .query()
            .sourcerpm(&package.sourcerpm)
            .name_substr("-debuginfo")
            .arch(package.arch())
            .run();
        for id in debuginfo {
            if self.data.insert(id) {
                debug!("added debuginfo {}", sack.package(id));
            }
        }
    }

    /// Resolves and adds every sibling subpackage built from the package's
    /// source rpm.
    fn expand_subpackages(
        &mut self,
        sack: &Arc<Sack>,
        package: &PackageObject,
    ) -> Result<(), Error> {
        if !self.options.fulltree || package.sourcerpm.is_empty() {
            return Ok(());
        }

        let selectors: Vec<Selector> = sack
            .query()
            .sourcerpm(&package.sourcerpm)
            .run()
            .into_iter()
            .filter(|id| !self.data.contains(id))
            .filter(|&id| !self.skiplist_contains(sack.package(id)))
            .map(|id| {
                let sibling = sack.package(id);
                Selector::for_package(sibling.name().clone(), sibling.arch().clone(), id)
            })
            .collect();

        for selector in selectors {
            let request = self.request_string(sack, &selector.request);
            let mut subpackages_goal = Goal::new(sack.clone());
            subpackages_goal.install(InstallTarget::Selector(selector));
            self.update(&mut subpackages_goal)?;
            if !subpackages_goal.problems().is_empty() {
                error!("encountered errors when adding subpackage {request}");
                for problem in subpackages_goal.problems() {
                    error!("{problem}");
                }
                self.problems.insert(request);
            }
        }
        Ok(())
    }

    fn request_string(&self, sack: &Sack, request: &Request) -> String {
        match request {
            Request::Name(name) => name.clone(),
            Request::Package(id) => sack.package(*id).to_string(),
        }
    }

    /// Returns `true` if the package's identity is quarantined by the
    /// skiplist.
    fn skiplist_contains(&self, package: &PackageObject) -> bool {
        let identity = package.to_string();
        self.problems.contains(&identity)
            || self.solved.contains(&RequestDescriptor::Single(identity))
    }

    /// Returns the growing result set.
    pub fn data(&self) -> &BTreeSet<PackageId> {
        &self.data
    }

    /// Returns the identities of requests that failed to resolve.
    pub fn problems(&self) -> &BTreeSet<String> {
        &self.problems
    }

    /// Returns the descriptors of successfully solved requests.
    pub fn solved(&self) -> &BTreeSet<RequestDescriptor> {
        &self.solved
    }

    /// Returns the stack of in-flight resolver request frames.
    pub fn active_requests(&self) -> &[Vec<String>] {
        &self.active_requests
    }

    /// Returns the innermost in-flight request frame, if any.
    pub fn last_request(&self) -> Option<&Vec<String>> {
        self.active_requests.last()
    }

    /// Returns the high-water mark of the request stack depth.
    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// Returns the skiplist: the union of solved and failed request
    /// descriptors.
    pub fn skiplist(&self) -> BTreeSet<RequestDescriptor> {
        self.solved
            .iter()
            .cloned()
            .chain(
                self.problems
                    .iter()
                    .map(|problem| RequestDescriptor::Single(problem.clone())),
            )
            .collect()
    }
}
