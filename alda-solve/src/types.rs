//! Solver-internal candidate and match-specification types.

use std::fmt::{Display, Formatter};

use alda_types::{Arch, Evr, EvrRequirement, Nevra};
use resolvo::utils::VersionSet;

use crate::sack::PackageId;

/// An interned dependency name.
///
/// This is a single namespace covering package names, virtual capabilities
/// and absolute file paths, matching rpm capability semantics.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) struct DepName(pub(crate) String);

impl Display for DepName {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        write!(fmt, "{}", self.0)
    }
}

/// A solver candidate under some dependency name.
///
/// Candidates distinguish actual packages from the capabilities and files
/// they provide; the latter link back to their providing package.
#[derive(Clone, Debug, Hash)]
pub(crate) enum Candidate {
    /// An actual package.
    Real {
        /// The package.
        package: PackageId,
        /// Its identity, for matching and display.
        nevra: Nevra,
    },
    /// A capability or file provided by a package.
    Virtual {
        /// The providing package.
        provider: PackageId,
        /// The providing package's identity.
        provider_nevra: Nevra,
        /// The provided version, if the provide entry names one.
        version: Option<Evr>,
    },
}

impl Candidate {
    /// Returns the package this candidate resolves to.
    pub(crate) fn package(&self) -> PackageId {
        match self {
            Candidate::Real { package, .. } => *package,
            Candidate::Virtual { provider, .. } => *provider,
        }
    }

    /// Returns the candidate's version, if any.
    pub(crate) fn version(&self) -> Option<&Evr> {
        match self {
            Candidate::Real { nevra, .. } => Some(&nevra.evr),
            Candidate::Virtual { version, .. } => version.as_ref(),
        }
    }

    /// Returns `true` for provided capabilities and files.
    pub(crate) fn is_virtual(&self) -> bool {
        matches!(self, Candidate::Virtual { .. })
    }
}

impl Display for Candidate {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        match self {
            Candidate::Real { nevra, .. } => write!(fmt, "{nevra}"),
            Candidate::Virtual {
                provider_nevra,
                version,
                ..
            } => {
                match version {
                    Some(version) => write!(fmt, "{version}")?,
                    None => write!(fmt, "<any version>")?,
                }
                write!(fmt, " (provided by {provider_nevra})")
            }
        }
    }
}

/// Match criteria for the candidates of one dependency name.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) struct DepSpec {
    /// The version requirement, if any.
    pub(crate) requirement: Option<EvrRequirement>,
    /// If set, restricts matching to packages of this architecture.
    pub(crate) arch: Option<Arch>,
    /// If set, only this package (or a capability it provides) matches.
    pub(crate) exact: Option<PackageId>,
    /// Whether source RPM candidates may match.
    ///
    /// Dependencies never match source RPMs; only explicit install targets
    /// do.
    pub(crate) allow_source: bool,
}

impl DepSpec {
    /// Creates a [`DepSpec`] for a dependency relation.
    pub(crate) fn from_requirement(requirement: Option<EvrRequirement>) -> Self {
        DepSpec {
            requirement,
            arch: None,
            exact: None,
            allow_source: false,
        }
    }

    /// Creates a [`DepSpec`] for a selector with an optional architecture.
    pub(crate) fn for_selector(arch: Option<Arch>) -> Self {
        let allow_source = arch.as_ref().is_some_and(Arch::is_source);
        DepSpec {
            requirement: None,
            arch,
            exact: None,
            allow_source,
        }
    }

    /// Creates a [`DepSpec`] matching exactly one package.
    pub(crate) fn exact(package: PackageId) -> Self {
        DepSpec {
            requirement: None,
            arch: None,
            exact: Some(package),
            allow_source: true,
        }
    }

    /// Returns `true` if the candidate satisfies this match specification.
    pub(crate) fn matches(&self, candidate: &Candidate) -> bool {
        if let Some(exact) = self.exact {
            return candidate.package() == exact;
        }
        match candidate {
            Candidate::Real { nevra, .. } => {
                if nevra.arch.is_source() && !self.allow_source {
                    return false;
                }
                if let Some(arch) = &self.arch {
                    if nevra.arch != *arch {
                        return false;
                    }
                }
                match &self.requirement {
                    Some(requirement) => requirement.is_satisfied_by(&nevra.evr),
                    None => true,
                }
            }
            Candidate::Virtual { version, .. } => {
                // Architecture-restricted selectors target real packages.
                if self.arch.is_some() {
                    return false;
                }
                match &self.requirement {
                    // An unversioned provide does not satisfy a versioned
                    // requirement.
                    Some(requirement) => version
                        .as_ref()
                        .is_some_and(|version| requirement.is_satisfied_by(version)),
                    None => true,
                }
            }
        }
    }
}

impl VersionSet for DepSpec {
    type V = Candidate;
}

impl Display for DepSpec {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        match &self.requirement {
            Some(requirement) => write!(fmt, "{requirement}")?,
            None => write!(fmt, "<any version>")?,
        }
        if let Some(arch) = &self.arch {
            write!(fmt, " ({arch})")?;
        }
        Ok(())
    }
}
