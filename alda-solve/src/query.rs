//! Conjunctive filters over the package universe.

use alda_types::{Arch, Name};

use crate::sack::{PackageId, Sack};

/// A filtered view of a [`Sack`].
///
/// Filters compose conjunctively; an unfiltered query matches every package.
///
/// Results are returned in ascending identifier order, which follows the
/// repository load order; callers that need output determinism sort by the
/// package string form instead.
#[derive(Clone, Debug)]
pub struct Query<'a> {
    sack: &'a Sack,
    name: Option<Name>,
    arch: Option<Arch>,
    sourcerpm: Option<String>,
    name_substr: Option<String>,
}

impl<'a> Query<'a> {
    pub(crate) fn new(sack: &'a Sack) -> Self {
        Query {
            sack,
            name: None,
            arch: None,
            sourcerpm: None,
            name_substr: None,
        }
    }

    /// Restricts the query to packages with the given name.
    pub fn name(mut self, name: &Name) -> Self {
        self.name = Some(name.clone());
        self
    }

    /// Restricts the query to packages with the given architecture.
    pub fn arch(mut self, arch: &Arch) -> Self {
        self.arch = Some(arch.clone());
        self
    }

    /// Restricts the query to packages built from the given source RPM.
    pub fn sourcerpm(mut self, sourcerpm: &str) -> Self {
        self.sourcerpm = Some(sourcerpm.to_string());
        self
    }

    /// Restricts the query to packages whose name contains the substring.
    pub fn name_substr(mut self, substr: &str) -> Self {
        self.name_substr = Some(substr.to_string());
        self
    }

    /// Runs the query.
    pub fn run(&self) -> Vec<PackageId> {
        self.sack
            .packages()
            .filter(|(_, package)| {
                self.name
                    .as_ref()
                    .is_none_or(|name| package.name() == name)
                    && self.arch.as_ref().is_none_or(|arch| package.arch() == arch)
                    && self
                        .sourcerpm
                        .as_ref()
                        .is_none_or(|sourcerpm| &package.sourcerpm == sourcerpm)
                    && self
                        .name_substr
                        .as_ref()
                        .is_none_or(|substr| package.name().inner().contains(substr.as_str()))
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Returns the number of matching packages.
    pub fn count(&self) -> usize {
        self.run().len()
    }
}
