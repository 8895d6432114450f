//! One depsolve transaction.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::debug;
use resolvo::{Problem, UnsolvableOrCancelled};

use crate::provider::RpmDependencyProvider;
use crate::sack::{PackageId, Sack};
use crate::selector::{Request, Selector};
use crate::types::DepSpec;

/// An install request submitted to a [`Goal`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InstallTarget {
    /// Install every package of a query result.
    Query(Vec<PackageId>),
    /// Install one specific package.
    Package(PackageId),
    /// Install whatever a selector resolves to.
    Selector(Selector),
}

/// One depsolve transaction bound to a [`Sack`].
///
/// Install requests are accumulated first; [`Goal::run`] then attempts a
/// single resolution. A goal that reports problems is terminal for that
/// attempt: callers record the originating request and do not retry.
#[derive(Debug)]
pub struct Goal {
    sack: Arc<Sack>,
    targets: Vec<InstallTarget>,
    requests: BTreeSet<Request>,
    installs: BTreeSet<PackageId>,
    problems: Vec<String>,
}

impl Goal {
    /// Creates a new [`Goal`] over the given sack.
    pub fn new(sack: Arc<Sack>) -> Self {
        Goal {
            sack,
            targets: Vec::new(),
            requests: BTreeSet::new(),
            installs: BTreeSet::new(),
            problems: Vec::new(),
        }
    }

    /// Adds an install request.
    ///
    /// Query results register every member package as a request; a selector
    /// registers its request tag.
    pub fn install(&mut self, target: InstallTarget) {
        match &target {
            InstallTarget::Query(ids) => {
                for &id in ids {
                    self.requests.insert(Request::Package(id));
                }
            }
            InstallTarget::Package(id) => {
                self.requests.insert(Request::Package(*id));
            }
            InstallTarget::Selector(selector) => {
                self.requests.insert(selector.request.clone());
            }
        }
        self.targets.push(target);
    }

    /// Attempts the depsolve once.
    ///
    /// Returns whether a solution was found; on `false`, [`Goal::problems`]
    /// is nonempty.
    pub fn run(&mut self) -> bool {
        match self.solve(&[]) {
            Ok(installs) => {
                self.installs = installs;
                self.problems.clear();
                true
            }
            Err(problems) => {
                self.installs.clear();
                self.problems = problems;
                false
            }
        }
    }

    /// Enumerates alternative solutions.
    ///
    /// For every combination of candidates the submitted selectors could
    /// resolve to, one resolution is attempted; the distinct solutions are
    /// returned. [`Goal::problems`] is set iff no combination solves. Use
    /// [`Goal::adopt_solution`] to replay one solution into the goal.
    pub fn run_all(&mut self) -> Vec<BTreeSet<PackageId>> {
        let provider = RpmDependencyProvider::new(self.sack.clone());

        // Only selectors have alternatives; packages and query members are
        // fixed requirements.
        let axes: Vec<(usize, Vec<PackageId>)> = self
            .targets
            .iter()
            .enumerate()
            .filter_map(|(index, target)| match target {
                InstallTarget::Selector(selector) => {
                    Some((index, provider.selector_candidates(selector)))
                }
                InstallTarget::Query(_) | InstallTarget::Package(_) => None,
            })
            .collect();
        drop(provider);

        let mut combinations: Vec<Vec<(usize, PackageId)>> = vec![Vec::new()];
        for (index, candidates) in &axes {
            let mut next = Vec::new();
            for prefix in &combinations {
                for &candidate in candidates {
                    let mut combination = prefix.clone();
                    combination.push((*index, candidate));
                    next.push(combination);
                }
            }
            combinations = next;
        }

        // A selector without candidates leaves no combinations; fall back to
        // a plain run so the problems are properly reported.
        if combinations.is_empty() {
            self.run();
            return Vec::new();
        }

        let mut solutions: Vec<BTreeSet<PackageId>> = Vec::new();
        let mut problems = Vec::new();
        for pins in &combinations {
            match self.solve(pins) {
                Ok(installs) => {
                    if !solutions.contains(&installs) {
                        solutions.push(installs);
                    }
                }
                Err(mut errors) => {
                    if problems.is_empty() {
                        problems.append(&mut errors);
                    }
                }
            }
        }
        debug!(
            "{} of {} candidate combinations solved",
            solutions.len(),
            combinations.len()
        );

        if solutions.is_empty() {
            self.installs.clear();
            self.problems = problems;
        } else {
            self.problems.clear();
            if let Some(first) = solutions.first() {
                self.installs = first.clone();
            }
        }
        solutions
    }

    /// Replaces the goal's install list with one solution of
    /// [`Goal::run_all`].
    pub fn adopt_solution(&mut self, installs: BTreeSet<PackageId>) {
        self.installs = installs;
    }

    /// Returns the packages that would be installed by the current solution.
    pub fn list_installs(&self) -> &BTreeSet<PackageId> {
        &self.installs
    }

    /// Returns the problems of a failed resolution.
    ///
    /// Nonempty iff the last attempt found no solution.
    pub fn problems(&self) -> &[String] {
        &self.problems
    }

    /// Returns the originally submitted request identities.
    pub fn install_requests(&self) -> &BTreeSet<Request> {
        &self.requests
    }

    /// Returns the string forms of the submitted request identities, sorted.
    pub fn install_requests_as_strings(&self) -> Vec<String> {
        let mut requests: Vec<String> = self
            .requests
            .iter()
            .map(|request| match request {
                Request::Name(name) => name.clone(),
                Request::Package(id) => self.sack.package(*id).to_string(),
            })
            .collect();
        requests.sort();
        requests
    }

    /// Attempts one resolution, with selector targets optionally pinned to a
    /// specific candidate.
    fn solve(&self, pins: &[(usize, PackageId)]) -> Result<BTreeSet<PackageId>, Vec<String>> {
        let provider = RpmDependencyProvider::new(self.sack.clone());

        let mut requirements = Vec::new();
        for (index, target) in self.targets.iter().enumerate() {
            match target {
                InstallTarget::Package(id) => {
                    requirements.push(provider.requirement(
                        self.sack.package(*id).name().inner(),
                        DepSpec::exact(*id),
                    ));
                }
                InstallTarget::Query(ids) => {
                    for &id in ids {
                        requirements.push(provider.requirement(
                            self.sack.package(id).name().inner(),
                            DepSpec::exact(id),
                        ));
                    }
                }
                InstallTarget::Selector(selector) => {
                    let pinned = pins
                        .iter()
                        .find(|(pin_index, _)| *pin_index == index)
                        .map(|(_, id)| *id);
                    let spec = match pinned {
                        Some(id) => DepSpec::exact(id),
                        None => DepSpec::for_selector(selector.arch.clone()),
                    };
                    requirements.push(provider.requirement(selector.name.inner(), spec));
                }
            }
        }

        let mut solver = resolvo::Solver::new(provider);
        let problem = Problem::new().requirements(requirements);
        match solver.solve(problem) {
            Ok(solvables) => {
                let mut installs = BTreeSet::new();
                for solvable in solvables {
                    let record = &solver.provider().pool.resolve_solvable(solvable).record;
                    // Capabilities pull in their provider; only real
                    // packages are part of the install set.
                    if !record.is_virtual() {
                        installs.insert(record.package());
                    }
                }
                Ok(installs)
            }
            Err(UnsolvableOrCancelled::Unsolvable(conflict)) => {
                Err(vec![conflict.display_user_friendly(&solver).to_string()])
            }
            Err(UnsolvableOrCancelled::Cancelled(_)) => {
                Err(vec!["dependency resolution was cancelled".to_string()])
            }
        }
    }
}
