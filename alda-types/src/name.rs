// SPDX-FileCopyrightText: 2026 ALDA Developers
// SPDX-License-Identifier: GPL-2.0-or-later
//! Package names and architectures.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::Error;

/// Architectures recognized when splitting a `name.arch` package reference.
///
/// A trailing `.` component is only treated as an architecture if it is one
/// of these; anything else stays part of the package name.
pub const KNOWN_ARCHES: &[&str] = &[
    "aarch64", "armv7hl", "i386", "i486", "i586", "i686", "noarch", "ppc", "ppc64", "ppc64le",
    "riscv64", "s390", "s390x", "src", "x86_64",
];

/// A package name.
///
/// Package names must be nonempty and must not contain whitespace or `/`.
///
/// ## Examples
/// ```
/// use std::str::FromStr;
/// use alda_types::Name;
///
/// assert!(Name::from_str("dummy-bash").is_ok());
/// assert!(Name::from_str("dummy bash").is_err());
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty or contains whitespace or `/`.
    pub fn new(name: &str) -> Result<Self, Error> {
        if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(Error::InvalidName(name.to_string()));
        }
        Ok(Name(name.to_string()))
    }

    /// Returns a reference to the inner string.
    pub fn inner(&self) -> &str {
        &self.0
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Name::new(input)
    }
}

impl Display for Name {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        write!(fmt, "{}", self.inner())
    }
}

/// A package architecture.
///
/// Apart from hardware architectures this includes the pseudo-architectures
/// `noarch` (architecture independent) and `src` (source RPM).
///
/// ## Examples
/// ```
/// use std::str::FromStr;
/// use alda_types::Arch;
///
/// assert!(Arch::from_str("x86_64").is_ok());
/// assert!(Arch::from_str("src").unwrap().is_source());
/// assert!(Arch::from_str("x86 64").is_err());
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Arch(String);

impl Arch {
    /// Creates a new [`Arch`] from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty or contains characters other
    /// than lowercase ASCII alphanumerics and `_`.
    pub fn new(arch: &str) -> Result<Self, Error> {
        if arch.is_empty()
            || !arch
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(Error::InvalidArch(arch.to_string()));
        }
        Ok(Arch(arch.to_string()))
    }

    /// Returns a reference to the inner string.
    pub fn inner(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this is the source RPM pseudo-architecture.
    pub fn is_source(&self) -> bool {
        self.0 == "src"
    }
}

impl FromStr for Arch {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Arch::new(input)
    }
}

impl Display for Arch {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        write!(fmt, "{}", self.inner())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("dummy-bash", true)]
    #[case("libfoo++", true)]
    #[case("", false)]
    #[case("foo bar", false)]
    #[case("foo/bar", false)]
    fn name_validation(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(Name::new(input).is_ok(), valid);
    }

    #[rstest]
    #[case("x86_64", true)]
    #[case("noarch", true)]
    #[case("", false)]
    #[case("X86", false)]
    fn arch_validation(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(Arch::new(input).is_ok(), valid);
    }
}
