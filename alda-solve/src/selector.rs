//! Install selectors.

use alda_types::{Arch, Name, PackageRef};

use crate::sack::PackageId;

/// The accounting tag of an install request.
///
/// This is what a [`crate::Goal`] reports as the originally submitted
/// identity: the user-facing request string, or the package a selector was
/// built for.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Request {
    /// A request identified by its string form.
    Name(String),
    /// A request identified by a package.
    Package(PackageId),
}

/// An install target: a package name with an optional architecture,
/// carrying a [`Request`] tag for downstream accounting.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Selector {
    /// The package name to install.
    pub name: Name,
    /// The architecture restriction, if any.
    pub arch: Option<Arch>,
    /// The request tag.
    pub request: Request,
}

impl Selector {
    /// Creates a [`Selector`] for a user-supplied package reference.
    ///
    /// The request tag is the reference's string form.
    pub fn from_ref(package: &PackageRef) -> Self {
        Selector {
            name: package.name.clone(),
            arch: package.arch.clone(),
            request: Request::Name(package.to_string()),
        }
    }

    /// Creates a [`Selector`] targeting a specific package's name and
    /// architecture, tagged with that package.
    pub fn for_package(name: Name, arch: Arch, package: PackageId) -> Self {
        Selector {
            name,
            arch: Some(arch),
            request: Request::Package(package),
        }
    }
}
