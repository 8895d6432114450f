// SPDX-FileCopyrightText: 2026 ALDA Developers
// SPDX-License-Identifier: GPL-2.0-or-later
//! Package identities and package objects.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::name::{Arch, KNOWN_ARCHES, Name};
use crate::relation::Relation;
use crate::version::Evr;
use crate::Error;

/// A user-supplied package reference: a name with an optional architecture.
///
/// The string form is `name.arch` when the architecture is present, else
/// just the name. Parsing splits a trailing `.arch` component only when it
/// is a known architecture (see [`KNOWN_ARCHES`]), so names containing dots
/// survive.
///
/// ## Examples
/// ```
/// use std::str::FromStr;
/// use alda_types::PackageRef;
///
/// let plain = PackageRef::from_str("dummy-basesystem").unwrap();
/// assert!(plain.arch.is_none());
///
/// let with_arch = PackageRef::from_str("dummy-bash.x86_64").unwrap();
/// assert_eq!(with_arch.to_string(), "dummy-bash.x86_64");
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PackageRef {
    /// The package name.
    pub name: Name,
    /// The architecture, if the reference is restricted to one.
    pub arch: Option<Arch>,
}

impl PackageRef {
    /// Creates a new [`PackageRef`].
    pub fn new(name: Name, arch: Option<Arch>) -> Self {
        PackageRef { name, arch }
    }
}

impl FromStr for PackageRef {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if let Some((name, arch)) = input.rsplit_once('.') {
            if KNOWN_ARCHES.contains(&arch) {
                return Ok(PackageRef::new(Name::new(name)?, Some(Arch::new(arch)?)));
            }
        }
        Ok(PackageRef::new(Name::new(input)?, None))
    }
}

impl Display for PackageRef {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        match &self.arch {
            Some(arch) => write!(fmt, "{}.{}", self.name, arch),
            None => write!(fmt, "{}", self.name),
        }
    }
}

/// The canonical identity of a package: name, epoch-version-release and
/// architecture.
///
/// The string form is `<name>-<evr>.<arch>`, e.g.
/// `dummy-bash-4.2.24-2.x86_64`. This is the form used wherever output
/// determinism is observable.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Nevra {
    /// The package name.
    pub name: Name,
    /// The epoch-version-release.
    pub evr: Evr,
    /// The architecture.
    pub arch: Arch,
}

impl Nevra {
    /// Creates a new [`Nevra`].
    pub fn new(name: Name, evr: Evr, arch: Arch) -> Self {
        Nevra { name, evr, arch }
    }
}

impl Display for Nevra {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        write!(fmt, "{}-{}.{}", self.name, self.evr, self.arch)
    }
}

impl Ord for Nevra {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.evr.cmp(&other.evr))
            .then_with(|| self.arch.cmp(&other.arch))
    }
}

impl PartialOrd for Nevra {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A package object yielded by a loaded package universe.
///
/// Carries the package identity together with the metadata the closure
/// engine and the solver need: the source RPM filename, the location inside
/// the repository, the name of the repository it came from, and its
/// dependency data. Two package objects are equal iff their full NEVRA and
/// repository identity match.
#[derive(Clone, Debug)]
pub struct PackageObject {
    /// The package identity.
    pub nevra: Nevra,
    /// The filename of the source RPM this package was built from.
    ///
    /// Empty for source RPMs themselves.
    pub sourcerpm: String,
    /// The package file location, relative to its repository.
    pub location: String,
    /// The name of the repository this package came from.
    pub reponame: String,
    /// The capabilities this package requires.
    ///
    /// For a source RPM these are its build dependencies.
    pub requires: Vec<Relation>,
    /// The capabilities this package provides.
    pub provides: Vec<Relation>,
    /// The files this package owns.
    pub files: Vec<String>,
}

impl PackageObject {
    /// Creates a new [`PackageObject`] with empty metadata.
    pub fn new(nevra: Nevra, reponame: &str) -> Self {
        PackageObject {
            nevra,
            sourcerpm: String::new(),
            location: String::new(),
            reponame: reponame.to_string(),
            requires: Vec::new(),
            provides: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Returns the package name.
    pub fn name(&self) -> &Name {
        &self.nevra.name
    }

    /// Returns the package architecture.
    pub fn arch(&self) -> &Arch {
        &self.nevra.arch
    }

    /// Returns the epoch-version-release.
    pub fn evr(&self) -> &Evr {
        &self.nevra.evr
    }

    /// Returns `true` if this package is a source RPM.
    pub fn is_source(&self) -> bool {
        self.nevra.arch.is_source()
    }
}

impl PartialEq for PackageObject {
    fn eq(&self, other: &Self) -> bool {
        self.nevra == other.nevra && self.reponame == other.reponame
    }
}

impl Eq for PackageObject {}

impl Ord for PackageObject {
    fn cmp(&self, other: &Self) -> Ordering {
        self.nevra
            .cmp(&other.nevra)
            .then_with(|| self.reponame.cmp(&other.reponame))
    }
}

impl PartialOrd for PackageObject {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for PackageObject {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        write!(fmt, "{}", self.nevra)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("dummy-basesystem", "dummy-basesystem", None)]
    #[case("dummy-bash.x86_64", "dummy-bash", Some("x86_64"))]
    #[case("dummy-basesystem.src", "dummy-basesystem", Some("src"))]
    #[case("libfoo2.0", "libfoo2.0", None)]
    fn package_ref_parse(#[case] input: &str, #[case] name: &str, #[case] arch: Option<&str>) {
        let package = PackageRef::from_str(input).unwrap();
        assert_eq!(package.name.inner(), name);
        assert_eq!(package.arch.as_ref().map(Arch::inner), arch);
        assert_eq!(package.to_string(), input);
    }

    #[test]
    fn nevra_display() {
        let nevra = Nevra::new(
            Name::from_str("dummy-bash").unwrap(),
            Evr::from_str("4.2.24-2").unwrap(),
            Arch::from_str("x86_64").unwrap(),
        );
        assert_eq!(nevra.to_string(), "dummy-bash-4.2.24-2.x86_64");
    }

    #[test]
    fn package_equality_includes_repo() {
        let nevra = Nevra::new(
            Name::from_str("dummy-bash").unwrap(),
            Evr::from_str("4.2.24-2").unwrap(),
            Arch::from_str("x86_64").unwrap(),
        );
        let one = PackageObject::new(nevra.clone(), "repo-one");
        let two = PackageObject::new(nevra, "repo-two");
        assert_ne!(one, two);
    }
}
