//! Command line interface of the `alda` executable.

use alda_types::{Arch, PackageRef};
use clap::{ArgAction, Parser, ValueEnum};
use strum::Display;

/// Parses a `NAME=PATH_OR_URL` repository specification.
fn parse_repo(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_string(), path.to_string()))
        }
        _ => Err(format!("expected NAME=PATH_OR_URL, got '{input}'")),
    }
}

/// What to print for each resolved package.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// The `name-evr.arch` string.
    #[strum(to_string = "nevra")]
    Nevra,
    /// The download URL.
    #[strum(to_string = "urls")]
    Urls,
}

/// Automatic Linux Dependency Analyzer.
///
/// Computes the closure of packages required to install the given packages
/// from the given repositories and prints it, one package per line.
#[derive(Debug, Parser)]
#[clap(name = "alda", version)]
pub struct Cli {
    /// Verbose mode (-v, -vv, -vvv)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// A repository to load, as NAME=PATH_OR_URL.
    ///
    /// PATH_OR_URL may be an absolute directory, a file:// URL, or an
    /// http://, https:// or ftp:// URL. May be given multiple times.
    #[clap(short, long = "repo", value_name = "NAME=PATH", value_parser = parse_repo, required = true)]
    pub repos: Vec<(String, String)>,

    /// Restrict the loaded packages to architectures compatible with ARCH.
    #[clap(short, long, value_name = "ARCH")]
    pub arch: Option<Arch>,

    /// Exclude packages matching this reference. May be given multiple
    /// times.
    #[clap(short = 'x', long = "exclude", value_name = "NAME[.ARCH]")]
    pub excludes: Vec<PackageRef>,

    /// Ingest every alternative solution, not just the first.
    #[clap(long)]
    pub greedy: bool,

    /// Do not include source rpms in the result.
    #[clap(long)]
    pub no_source: bool,

    /// Include the build dependency closure of every included source rpm.
    #[clap(long)]
    pub selfhosting: bool,

    /// Do not include debuginfo subpackages.
    #[clap(long)]
    pub no_debuginfo: bool,

    /// Include every sibling subpackage of the included packages.
    #[clap(long)]
    pub fulltree: bool,

    /// Do not load filelists metadata.
    ///
    /// Dependencies on file paths only listed there will fail to resolve.
    #[clap(long)]
    pub no_filelists: bool,

    /// What to print for each resolved package.
    #[clap(short, long, value_enum, default_value_t = OutputFormat::Nevra)]
    pub output: OutputFormat,

    /// The packages to resolve, as NAME[.ARCH].
    #[clap(value_name = "PACKAGE", required = true)]
    pub packages: Vec<PackageRef>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn repo_specs_require_name_and_path() {
        assert!(parse_repo("fedora=/srv/repo").is_ok());
        assert!(parse_repo("fedora").is_err());
        assert!(parse_repo("=path").is_err());
        assert!(parse_repo("name=").is_err());
    }
}
