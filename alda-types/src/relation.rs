// SPDX-FileCopyrightText: 2026 ALDA Developers
// SPDX-License-Identifier: GPL-2.0-or-later
//! Dependency relations as found in repository metadata.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::version::{Evr, EvrComparison, EvrRequirement};
use crate::Error;

/// A dependency relation of a package.
///
/// The name may be a package name, a virtual capability, or an absolute file
/// path (e.g. `/usr/bin/bash`). An optional version requirement restricts
/// which candidates satisfy the relation.
///
/// ## Examples
/// ```
/// use std::str::FromStr;
/// use alda_types::Relation;
///
/// let relation = Relation::from_str("dummy-filesystem >= 3-2").unwrap();
/// assert_eq!(relation.to_string(), "dummy-filesystem >= 3-2");
///
/// let file = Relation::from_str("/usr/bin/bash").unwrap();
/// assert!(file.requirement.is_none());
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Relation {
    /// The name of the required or provided capability.
    pub name: String,
    /// The version requirement, if any.
    pub requirement: Option<EvrRequirement>,
}

impl Relation {
    /// Creates an unversioned [`Relation`].
    pub fn new(name: &str) -> Self {
        Relation {
            name: name.to_string(),
            requirement: None,
        }
    }

    /// Creates a [`Relation`] with a version requirement.
    pub fn with_requirement(name: &str, comparison: EvrComparison, evr: Evr) -> Self {
        Relation {
            name: name.to_string(),
            requirement: Some(EvrRequirement::new(comparison, evr)),
        }
    }

    /// Returns the version this relation provides, if it names one.
    ///
    /// Provide entries carry a point version (`foo = 1.2-3`); the comparison
    /// function is ignored.
    pub fn provided_evr(&self) -> Option<&Evr> {
        self.requirement.as_ref().map(|requirement| &requirement.evr)
    }
}

impl FromStr for Relation {
    type Err = Error;

    /// Parses a `name` or `name <op> <evr>` string.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parts = input.split_whitespace();
        let name = parts
            .next()
            .ok_or_else(|| Error::InvalidRelation(input.to_string()))?;
        match (parts.next(), parts.next(), parts.next()) {
            (None, ..) => Ok(Relation::new(name)),
            (Some(comparison), Some(evr), None) => Ok(Relation::with_requirement(
                name,
                EvrComparison::from_str(comparison)?,
                Evr::from_str(evr)?,
            )),
            _ => Err(Error::InvalidRelation(input.to_string())),
        }
    }
}

impl Display for Relation {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        write!(fmt, "{}", self.name)?;
        if let Some(requirement) = &self.requirement {
            write!(fmt, " {requirement}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("dummy-bash")]
    #[case("dummy-filesystem >= 3-2")]
    #[case("/usr/bin/bash")]
    #[case("webserver = 1:2.0")]
    fn roundtrip(#[case] input: &str) {
        assert_eq!(Relation::from_str(input).unwrap().to_string(), input);
    }

    #[rstest]
    #[case("")]
    #[case("foo >=")]
    #[case("foo >= 1.0 extra")]
    #[case("foo ~ 1.0")]
    fn invalid(#[case] input: &str) {
        assert!(Relation::from_str(input).is_err());
    }
}
