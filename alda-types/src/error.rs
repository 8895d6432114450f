// SPDX-FileCopyrightText: 2026 ALDA Developers
// SPDX-License-Identifier: GPL-2.0-or-later
//! Error handling for alda-types.

/// alda-types error.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An invalid package name.
    #[error("Invalid package name: {0}")]
    InvalidName(String),

    /// An invalid architecture.
    #[error("Invalid architecture: {0}")]
    InvalidArch(String),

    /// An invalid epoch-version-release string.
    #[error("Invalid EVR: {0}")]
    InvalidEvr(String),

    /// An invalid version comparison operator.
    #[error("Invalid version comparison: {0}")]
    InvalidEvrComparison(String),

    /// An invalid dependency relation.
    #[error("Invalid relation: {0}")]
    InvalidRelation(String),
}
