//! Dependency provider for rpm packages.

use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use resolvo::{
    Candidates,
    Condition,
    ConditionId,
    ConditionalRequirement,
    Dependencies,
    DependencyProvider,
    HintDependenciesAvailable,
    Interner,
    KnownDependencies,
    NameId,
    Requirement,
    SolvableId,
    SolverCache,
    StringId,
    VersionSetId,
    VersionSetUnionId,
    utils::Pool,
};

use crate::sack::{PackageId, Sack};
use crate::selector::Selector;
use crate::types::{Candidate, DepName, DepSpec};

/// Dependency provider for rpm packages.
///
/// Implements the [`DependencyProvider`] trait for use with the [`resolvo`]
/// solver. Every package of the sack becomes a real solvable under its own
/// name; its provides and owned files become virtual solvables that depend
/// on exactly their providing package.
pub(crate) struct RpmDependencyProvider {
    /// Internalized data about available packages.
    pub(crate) pool: Pool<DepSpec, DepName>,

    /// Cache of candidates for dependency names.
    pub(crate) records: HashMap<NameId, Candidates>,

    /// The universe the candidates came from.
    sack: Arc<Sack>,
}

impl RpmDependencyProvider {
    /// Creates a new [`RpmDependencyProvider`] over a sack.
    pub(crate) fn new(sack: Arc<Sack>) -> Self {
        let mut this = Self {
            pool: Pool::default(),
            records: HashMap::new(),
            sack,
        };

        let sack = this.sack.clone();
        for (id, package) in sack.packages() {
            let name_id = this
                .pool
                .intern_package_name(DepName(package.name().inner().to_string()));
            let solvable = this.pool.intern_solvable(
                name_id,
                Candidate::Real {
                    package: id,
                    nevra: package.nevra.clone(),
                },
            );
            this.records
                .entry(name_id)
                .or_default()
                .candidates
                .push(solvable);

            // Source RPMs provide nothing; they are only installable as
            // explicit targets.
            if package.is_source() {
                continue;
            }

            for provide in &package.provides {
                // The real solvable already covers the package's own name.
                if provide.name == package.name().inner() {
                    continue;
                }
                let virtual_name_id = this.pool.intern_package_name(DepName(provide.name.clone()));
                let solvable = this.pool.intern_solvable(
                    virtual_name_id,
                    Candidate::Virtual {
                        provider: id,
                        provider_nevra: package.nevra.clone(),
                        version: provide.provided_evr().cloned(),
                    },
                );
                this.records
                    .entry(virtual_name_id)
                    .or_default()
                    .candidates
                    .push(solvable);
            }

            for file in &package.files {
                let file_name_id = this.pool.intern_package_name(DepName(file.clone()));
                let solvable = this.pool.intern_solvable(
                    file_name_id,
                    Candidate::Virtual {
                        provider: id,
                        provider_nevra: package.nevra.clone(),
                        version: None,
                    },
                );
                this.records
                    .entry(file_name_id)
                    .or_default()
                    .candidates
                    .push(solvable);
            }
        }

        // We populate everything upfront, so all dependencies are available.
        for candidates in this.records.values_mut() {
            candidates.hint_dependencies_available = HintDependenciesAvailable::All;
        }

        this
    }

    /// Builds a solver requirement for `name` under the given spec.
    pub(crate) fn requirement(&self, name: &str, spec: DepSpec) -> ConditionalRequirement {
        let name_id = self.pool.intern_package_name(DepName(name.to_string()));
        let version_set = self.pool.intern_version_set(name_id, spec);
        ConditionalRequirement {
            condition: None,
            requirement: Requirement::Single(version_set),
        }
    }

    /// Returns the packages a selector could resolve to, deduplicated, in
    /// candidate preference order.
    pub(crate) fn selector_candidates(&self, selector: &Selector) -> Vec<PackageId> {
        let name_id = self
            .pool
            .intern_package_name(DepName(selector.name.inner().to_string()));
        let spec = DepSpec::for_selector(selector.arch.clone());

        let mut solvables = match self.records.get(&name_id) {
            Some(candidates) => candidates.candidates.clone(),
            None => return Vec::new(),
        };
        crate::utils::sort_candidates(&self.pool, &mut solvables);

        let mut packages = Vec::new();
        for solvable in solvables {
            let record = &self.pool.resolve_solvable(solvable).record;
            if spec.matches(record) && !packages.contains(&record.package()) {
                packages.push(record.package());
            }
        }
        packages
    }
}

impl Interner for RpmDependencyProvider {
    fn display_solvable(&self, solvable: SolvableId) -> impl Display + '_ {
        &self.pool.resolve_solvable(solvable).record
    }

    fn display_name(&self, name: NameId) -> impl Display + '_ {
        self.pool.resolve_package_name(name)
    }

    fn display_version_set(&self, version_set: VersionSetId) -> impl Display + '_ {
        self.pool.resolve_version_set(version_set)
    }

    fn display_string(&self, string_id: StringId) -> impl Display + '_ {
        self.pool.resolve_string(string_id)
    }

    fn version_set_name(&self, version_set: VersionSetId) -> NameId {
        self.pool.resolve_version_set_package_name(version_set)
    }

    fn solvable_name(&self, solvable: SolvableId) -> NameId {
        self.pool.resolve_solvable(solvable).name
    }

    fn version_sets_in_union(
        &self,
        version_set_union: VersionSetUnionId,
    ) -> impl Iterator<Item = VersionSetId> {
        self.pool.resolve_version_set_union(version_set_union)
    }

    fn resolve_condition(&self, condition: ConditionId) -> Condition {
        self.pool.resolve_condition(condition).clone()
    }
}

impl DependencyProvider for RpmDependencyProvider {
    async fn filter_candidates(
        &self,
        candidates: &[SolvableId],
        version_set: VersionSetId,
        inverse: bool,
    ) -> Vec<SolvableId> {
        let spec = self.pool.resolve_version_set(version_set);
        candidates
            .iter()
            .copied()
            .filter(|&solvable| {
                spec.matches(&self.pool.resolve_solvable(solvable).record) ^ inverse
            })
            .collect()
    }

    async fn get_candidates(&self, name: NameId) -> Option<Candidates> {
        self.records.get(&name).cloned()
    }

    async fn sort_candidates(&self, _solver: &SolverCache<Self>, solvables: &mut [SolvableId]) {
        crate::utils::sort_candidates(&self.pool, solvables);
    }

    async fn get_dependencies(&self, solvable: SolvableId) -> Dependencies {
        let mut known_dependencies = KnownDependencies::default();

        let candidate = self.pool.resolve_solvable(solvable).record.clone();
        match candidate {
            Candidate::Real { package, .. } => {
                for require in &self.sack.package(package).requires {
                    let name_id = self.pool.intern_package_name(DepName(require.name.clone()));
                    let spec = DepSpec::from_requirement(require.requirement.clone());
                    let version_set = self.pool.intern_version_set(name_id, spec);
                    known_dependencies
                        .requirements
                        .push(ConditionalRequirement {
                            condition: None,
                            requirement: Requirement::Single(version_set),
                        });
                }
            }
            Candidate::Virtual {
                provider,
                provider_nevra,
                ..
            } => {
                // A capability "depends" on exactly its providing package,
                // which pulls in the provider's actual dependencies.
                let provider_name_id = self
                    .pool
                    .intern_package_name(DepName(provider_nevra.name.inner().to_string()));
                let provider_version_set = self
                    .pool
                    .intern_version_set(provider_name_id, DepSpec::exact(provider));
                known_dependencies
                    .requirements
                    .push(ConditionalRequirement {
                        condition: None,
                        requirement: Requirement::Single(provider_version_set),
                    });
            }
        }

        Dependencies::Known(known_dependencies)
    }
}

impl Debug for RpmDependencyProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpmDependencyProvider").finish_non_exhaustive()
    }
}
