// SPDX-FileCopyrightText: 2026 ALDA Developers
// SPDX-License-Identifier: GPL-2.0-or-later
//! Epoch-version-release handling and rpm version comparison.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::Error;

/// Compares two rpm version strings.
///
/// This follows librpm's `rpmvercmp`: the strings are walked as alternating
/// numeric and alphabetic segments separated by any other characters.
/// Numeric segments compare as numbers (longer digit runs win once leading
/// zeroes are dropped), alphabetic segments compare lexically, and a numeric
/// segment is always newer than an alphabetic one. A `~` sorts before
/// anything, including the end of the string (pre-releases), while a `^`
/// sorts after the bare base version but before any longer version
/// (post-releases).
///
/// ## Examples
/// ```
/// use std::cmp::Ordering;
/// use alda_types::rpmvercmp;
///
/// assert_eq!(rpmvercmp("1.0", "1.0"), Ordering::Equal);
/// assert_eq!(rpmvercmp("1.10", "1.9"), Ordering::Greater);
/// assert_eq!(rpmvercmp("1.0~rc1", "1.0"), Ordering::Less);
/// assert_eq!(rpmvercmp("1.0^post1", "1.0"), Ordering::Greater);
/// ```
pub fn rpmvercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let mut one = a.as_bytes();
    let mut two = b.as_bytes();

    loop {
        // Skip over segment separators.
        while one
            .first()
            .is_some_and(|&c| !c.is_ascii_alphanumeric() && c != b'~' && c != b'^')
        {
            one = &one[1..];
        }
        while two
            .first()
            .is_some_and(|&c| !c.is_ascii_alphanumeric() && c != b'~' && c != b'^')
        {
            two = &two[1..];
        }

        // A tilde sorts before everything, even the end of the string.
        match (one.first() == Some(&b'~'), two.first() == Some(&b'~')) {
            (true, true) => {
                one = &one[1..];
                two = &two[1..];
                continue;
            }
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        // A caret sorts after the bare base version, but before a longer one.
        if one.first() == Some(&b'^') {
            if two.first() == Some(&b'^') {
                one = &one[1..];
                two = &two[1..];
                continue;
            }
            return if two.is_empty() {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }
        if two.first() == Some(&b'^') {
            return if one.is_empty() {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }

        if one.is_empty() || two.is_empty() {
            break;
        }

        // Grab the next completely numeric or completely alphabetic segment.
        let numeric = one[0].is_ascii_digit();
        let segment_len = |s: &[u8]| {
            s.iter()
                .take_while(|c| {
                    if numeric {
                        c.is_ascii_digit()
                    } else {
                        c.is_ascii_alphabetic()
                    }
                })
                .count()
        };
        let len_one = segment_len(one);
        let len_two = segment_len(two);

        // Different segment types: the numeric one is newer.
        if len_two == 0 {
            return if numeric {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        let (mut seg_one, mut seg_two) = (&one[..len_one], &two[..len_two]);
        if numeric {
            while seg_one.first() == Some(&b'0') {
                seg_one = &seg_one[1..];
            }
            while seg_two.first() == Some(&b'0') {
                seg_two = &seg_two[1..];
            }
            // Whichever number has more digits wins.
            match seg_one.len().cmp(&seg_two.len()) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }

        // Byte comparison decides equal-length numbers and alphabetic runs.
        match seg_one.cmp(seg_two) {
            Ordering::Equal => {}
            ord => return ord,
        }

        one = &one[len_one..];
        two = &two[len_two..];
    }

    match (one.is_empty(), two.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, _) => Ordering::Greater,
    }
}

/// An epoch-version-release of a package.
///
/// The epoch is optional and treated as `0` when absent, both for display
/// and for comparison. The release is optional because dependency entries in
/// repository metadata may carry a bare version.
///
/// Equality is structural; ordering follows rpm version ordering (see
/// [`rpmvercmp`]), comparing epoch, then version, then release, with a
/// missing release ordering before any present one.
///
/// ## Examples
/// ```
/// use std::str::FromStr;
/// use alda_types::Evr;
///
/// let evr = Evr::from_str("4.2.24-2").unwrap();
/// assert_eq!(evr.to_string(), "4.2.24-2");
///
/// let with_epoch = Evr::from_str("1:2.0-3").unwrap();
/// assert!(with_epoch > evr);
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Evr {
    /// The epoch, if any.
    pub epoch: Option<u64>,
    /// The upstream version.
    pub version: String,
    /// The build release, if any.
    pub release: Option<String>,
}

impl Evr {
    /// Creates a new [`Evr`].
    pub fn new(epoch: Option<u64>, version: &str, release: Option<&str>) -> Self {
        Evr {
            epoch,
            version: version.to_string(),
            release: release.map(ToString::to_string),
        }
    }
}

impl FromStr for Evr {
    type Err = Error;

    /// Parses an `[epoch:]version[-release]` string.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (epoch, rest) = match input.split_once(':') {
            Some((epoch, rest)) => {
                let epoch = epoch
                    .parse()
                    .map_err(|_| Error::InvalidEvr(input.to_string()))?;
                (Some(epoch), rest)
            }
            None => (None, input),
        };
        let (version, release) = match rest.rsplit_once('-') {
            Some((version, release)) => (version, Some(release)),
            None => (rest, None),
        };
        if version.is_empty() || release.is_some_and(str::is_empty) {
            return Err(Error::InvalidEvr(input.to_string()));
        }
        Ok(Evr::new(epoch, version, release))
    }
}

impl Display for Evr {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        if let Some(epoch) = self.epoch {
            if epoch > 0 {
                write!(fmt, "{epoch}:")?;
            }
        }
        write!(fmt, "{}", self.version)?;
        if let Some(release) = &self.release {
            write!(fmt, "-{release}")?;
        }
        Ok(())
    }
}

impl Ord for Evr {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .unwrap_or(0)
            .cmp(&other.epoch.unwrap_or(0))
            .then_with(|| rpmvercmp(&self.version, &other.version))
            .then_with(|| match (&self.release, &other.release) {
                (Some(one), Some(two)) => rpmvercmp(one, two),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            })
    }
}

impl PartialOrd for Evr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Specifies the comparison function for an [`EvrRequirement`].
///
/// Repository metadata spells these as the flags `LT`, `LE`, `EQ`, `GE` and
/// `GT`; the string forms `<`, `<=`, `=`, `>=` and `>` are accepted as well.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EvrComparison {
    /// Less than (`<`).
    Less,
    /// Less than or equal to (`<=`).
    LessOrEqual,
    /// Equal to (`=`).
    Equal,
    /// Greater than or equal to (`>=`).
    GreaterOrEqual,
    /// Greater than (`>`).
    Greater,
}

impl EvrComparison {
    /// Returns `true` if a comparison outcome between an actual and a
    /// required version satisfies this comparison function.
    fn is_compatible_with(self, ord: Ordering) -> bool {
        matches!(
            (self, ord),
            (EvrComparison::Less, Ordering::Less)
                | (EvrComparison::LessOrEqual, Ordering::Less | Ordering::Equal)
                | (EvrComparison::Equal, Ordering::Equal)
                | (
                    EvrComparison::GreaterOrEqual,
                    Ordering::Greater | Ordering::Equal
                )
                | (EvrComparison::Greater, Ordering::Greater)
        )
    }
}

impl FromStr for EvrComparison {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "LT" | "<" => Ok(EvrComparison::Less),
            "LE" | "<=" => Ok(EvrComparison::LessOrEqual),
            "EQ" | "=" => Ok(EvrComparison::Equal),
            "GE" | ">=" => Ok(EvrComparison::GreaterOrEqual),
            "GT" | ">" => Ok(EvrComparison::Greater),
            _ => Err(Error::InvalidEvrComparison(input.to_string())),
        }
    }
}

impl Display for EvrComparison {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        let s = match self {
            EvrComparison::Less => "<",
            EvrComparison::LessOrEqual => "<=",
            EvrComparison::Equal => "=",
            EvrComparison::GreaterOrEqual => ">=",
            EvrComparison::Greater => ">",
        };
        write!(fmt, "{s}")
    }
}

/// A version requirement of a dependency relation, e.g. `>= 1.2-3`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct EvrRequirement {
    /// The comparison function.
    pub comparison: EvrComparison,
    /// The required version.
    pub evr: Evr,
}

impl EvrRequirement {
    /// Creates a new [`EvrRequirement`].
    pub fn new(comparison: EvrComparison, evr: Evr) -> Self {
        EvrRequirement { comparison, evr }
    }

    /// Returns `true` if the candidate version satisfies this requirement.
    ///
    /// Follows rpm matching rules: a missing epoch counts as `0` on either
    /// side, and when the requirement carries no release the candidate's
    /// release is ignored.
    pub fn is_satisfied_by(&self, candidate: &Evr) -> bool {
        let ord = candidate
            .epoch
            .unwrap_or(0)
            .cmp(&self.evr.epoch.unwrap_or(0))
            .then_with(|| rpmvercmp(&candidate.version, &self.evr.version))
            .then_with(|| match (&candidate.release, &self.evr.release) {
                (Some(have), Some(want)) => rpmvercmp(have, want),
                _ => Ordering::Equal,
            });
        self.comparison.is_compatible_with(ord)
    }
}

impl Display for EvrRequirement {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        write!(fmt, "{} {}", self.comparison, self.evr)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("1.0", "1.0", Ordering::Equal)]
    #[case("1.0", "2.0", Ordering::Less)]
    #[case("2.0.1", "2.0", Ordering::Greater)]
    #[case("1.10", "1.9", Ordering::Greater)]
    #[case("5.5p1", "5.5p2", Ordering::Less)]
    #[case("10xyz", "10.1xyz", Ordering::Less)]
    #[case("xyz10", "xyz10.1", Ordering::Less)]
    #[case("1.0010", "1.9", Ordering::Greater)]
    #[case("1.05", "1.5", Ordering::Equal)]
    #[case("2.50", "2.5", Ordering::Greater)]
    #[case("fc4", "fc.4", Ordering::Equal)]
    #[case("1b.fc17", "1.fc17", Ordering::Less)]
    #[case("1.fc17", "1g.fc17", Ordering::Less)]
    #[case("alpha", "beta", Ordering::Less)]
    #[case("1.0~rc1", "1.0", Ordering::Less)]
    #[case("1.0~rc1", "1.0~rc2", Ordering::Less)]
    #[case("1.0~rc1~git123", "1.0~rc1", Ordering::Less)]
    #[case("1.0^", "1.0", Ordering::Greater)]
    #[case("1.0^git1", "1.0", Ordering::Greater)]
    #[case("1.0^git1", "1.01", Ordering::Less)]
    #[case("1.0^20160101", "1.0.1", Ordering::Less)]
    #[case("1.0~rc1^git1", "1.0~rc1", Ordering::Greater)]
    fn vercmp(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(rpmvercmp(a, b), expected);
        assert_eq!(rpmvercmp(b, a), expected.reverse());
    }

    #[rstest]
    #[case("4.2.24-2", None, "4.2.24", Some("2"))]
    #[case("3-2", None, "3", Some("2"))]
    #[case("2.8.48", None, "2.8.48", None)]
    #[case("1:2.0-3", Some(1), "2.0", Some("3"))]
    fn evr_parse(
        #[case] input: &str,
        #[case] epoch: Option<u64>,
        #[case] version: &str,
        #[case] release: Option<&str>,
    ) {
        let evr = Evr::from_str(input).unwrap();
        assert_eq!(evr, Evr::new(epoch, version, release));
        assert_eq!(evr.to_string(), input);
    }

    #[rstest]
    #[case("x:1")]
    #[case("1:")]
    #[case("1.0-")]
    fn evr_parse_invalid(#[case] input: &str) {
        assert!(Evr::from_str(input).is_err());
    }

    #[test]
    fn evr_zero_epoch_is_elided() {
        assert_eq!(Evr::from_str("0:1.0-1").unwrap().to_string(), "1.0-1");
    }

    #[test]
    fn evr_ordering() {
        let old = Evr::from_str("4.2.24-1").unwrap();
        let new = Evr::from_str("4.2.24-2").unwrap();
        let epoch = Evr::from_str("1:1.0-1").unwrap();
        assert!(old < new);
        assert!(new < epoch);
    }

    #[rstest]
    #[case("GE", "3", "3-2", true)]
    #[case("GE", "3-3", "3-2", false)]
    #[case("EQ", "4.2.24", "4.2.24-2", true)]
    #[case("EQ", "4.2.24-2", "4.2.24-2", true)]
    #[case("LT", "2.0", "1:1.0", false)]
    #[case("GT", "1.0~rc1", "1.0", true)]
    fn requirement_satisfaction(
        #[case] comparison: &str,
        #[case] required: &str,
        #[case] candidate: &str,
        #[case] satisfied: bool,
    ) {
        let requirement = EvrRequirement::new(
            EvrComparison::from_str(comparison).unwrap(),
            Evr::from_str(required).unwrap(),
        );
        assert_eq!(
            requirement.is_satisfied_by(&Evr::from_str(candidate).unwrap()),
            satisfied
        );
    }
}
