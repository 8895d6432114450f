// SPDX-FileCopyrightText: 2026 ALDA Developers
// SPDX-License-Identifier: GPL-2.0-or-later
#![doc = include_str!("../README.md")]

mod error;
mod name;
mod package;
mod relation;
mod version;

pub use error::Error;
pub use name::{Arch, KNOWN_ARCHES, Name};
pub use package::{Nevra, PackageObject, PackageRef};
pub use relation::Relation;
pub use version::{Evr, EvrComparison, EvrRequirement, rpmvercmp};
