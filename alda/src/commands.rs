//! Command implementation of the `alda` executable.

use std::collections::BTreeMap;

use alda::cli::{Cli, OutputFormat};
use alda::{Alda, Error, Options};
use alda_types::PackageRef;

/// Resolves the requested closure and prints it.
///
/// Returns the package references that failed to resolve.
pub fn resolve(args: Cli) -> Result<Vec<PackageRef>, Error> {
    let options = Options {
        greedy: args.greedy,
        source: !args.no_source,
        selfhosting: args.selfhosting,
        debuginfo: !args.no_debuginfo,
        fulltree: args.fulltree,
    };

    let repodict: BTreeMap<String, String> = args.repos.into_iter().collect();
    let mut alda = Alda::new(repodict, options);
    alda.load_sack(args.arch.as_ref(), !args.no_filelists)?;
    alda.resolve_dependencies(&args.packages, Some(args.excludes.into_iter().collect()))?;

    let mut lines = match args.output {
        OutputFormat::Nevra => alda.installs_as_strings(),
        OutputFormat::Urls => alda.urls(),
    };
    lines.sort();
    for line in lines {
        println!("{line}");
    }

    let problems: Vec<PackageRef> = alda.problems().iter().cloned().collect();
    for problem in &problems {
        eprintln!("failed to resolve dependencies for {problem}");
    }
    Ok(problems)
}
